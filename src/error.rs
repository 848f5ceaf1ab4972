//! Error type shared by the table, the loader and the query path.
//!
//! Missing keys are not errors: lookups return `Option`/`bool`. The variants
//! here cover bad construction parameters, bucket-array growth that cannot be
//! satisfied, I/O while reading a dictionary, and rejected console input.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Construction parameters that cannot describe a usable table.
    #[error("invalid table configuration: {0}")]
    InvalidConfig(String),

    /// A resize asked for zero buckets.
    #[error("bucket count must be positive")]
    ZeroCapacity,

    /// Doubling the bucket count would overflow `usize`.
    #[error("bucket count overflow while growing from {current} buckets")]
    CapacityOverflow { current: usize },

    /// The new bucket array could not be allocated. The table is unchanged.
    #[error("failed to allocate a bucket array of {requested} slots")]
    Allocation { requested: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Console input that is empty or contains something other than letters.
    #[error("invalid query {0:?}: expected a single word containing only letters")]
    InvalidQuery(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Error::InvalidConfig(msg.into())
    }
}
