//! Construction parameters for `ChainedHashMap`.

use crate::error::{Error, Result};

/// Bucket count used when no capacity is given.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Average chain length at which `put` doubles the bucket array.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Smallest accepted growth threshold. Each entry may claim up to
/// `1 / max_load_factor` buckets, so this caps that at 1024.
pub const MIN_MAX_LOAD_FACTOR: f64 = 1.0 / 1024.0;

/// Bucket count and growth threshold for a table.
///
/// ```
/// use chained_speller::TableConfig;
///
/// let cfg = TableConfig::default()
///     .with_initial_capacity(1000)
///     .with_max_load_factor(2.0);
/// assert!(cfg.validate().is_ok());
/// assert!(TableConfig::default().with_initial_capacity(0).validate().is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub max_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_max_load_factor(mut self, load_factor: f64) -> Self {
        self.max_load_factor = load_factor;
        self
    }

    /// Rejects a zero bucket count, and any threshold that is not finite or is
    /// below `MIN_MAX_LOAD_FACTOR`.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::invalid_config("initial capacity must be positive"));
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor < MIN_MAX_LOAD_FACTOR {
            return Err(Error::invalid_config(format!(
                "max load factor must be finite and at least {MIN_MAX_LOAD_FACTOR}, got {}",
                self.max_load_factor
            )));
        }
        Ok(())
    }
}
