//! chained-speller: a separate-chaining hash table and an edit-distance
//! spelling suggester built on it.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a dictionary lookup that is O(1) on average for known words and
//!   proposes the closest dictionary words for unknown ones.
//! - Layers:
//!   - ChainedHashMap<K, V, S>: bucket array of chain heads over a
//!     generational arena of entries; put/get/remove/resize, with a
//!     debug-only reentrancy guard around chain walks.
//!   - suggest: edit distance from a query to every key, held in a side
//!     map keyed by entry handle, then a bounded selection of candidates.
//!   - loader / query / SpellChecker: tokenizing a dictionary source,
//!     normalizing console input, and the facade the CLI drives.
//!
//! Constraints
//! - Single-threaded: the table is `!Send`/`!Sync` (no locking).
//! - Unique keys: `put` updates in place; `len()` counts distinct keys and
//!   always equals the number of entries reachable through the chains.
//! - Growth: `put` doubles the bucket array before inserting once
//!   `len / capacity` has reached the configured threshold.
//! - Resize relinks entries from their cached hashes; it never calls
//!   `K: Hash` and never copies a key or value. A failed resize leaves the
//!   table as it was.
//!
//! Chain layout
//! - Each bucket holds `Option<DefaultKey>` for its head; each entry holds the
//!   key of its successor. New entries are prepended. Removal re-points the
//!   bucket head or the predecessor's `next`, then drops the slot.
//! - Handles are the arena keys. They stay valid across resizes and go stale
//!   on removal; a stale handle never resolves to a later entry.
//!
//! Hashing
//! - The default `PolynomialState` sums `(position + 1) * byte` over the
//!   bytes the key's `Hash` impl writes. Any `BuildHasher` may be used; bucket
//!   selection is `hash % capacity` everywhere.
//!
//! Suggestions
//! - `RankingPolicy::Nearest` (default) returns the true closest entries,
//!   skipping exact matches.
//! - `RankingPolicy::FirstExceeding` keeps the older replace-the-first-worse
//!   slot behaviour, which is not a true top-k, and reproduces the legacy
//!   console output.
//! - Dictionaries smaller than the limit give shorter lists.
//!
//! Notes and non-goals
//! - No persistence, no concurrent access, no Unicode-aware tokenizing.
//! - No `clear()`: a table is released as a whole when dropped.

pub mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
pub mod distance;
pub mod error;
pub mod hash;
pub mod loader;
pub mod query;
mod reentrancy;
pub mod spell_checker;
pub mod suggest;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Handle, TableStats};
pub use config::TableConfig;
pub use distance::edit_distance;
pub use error::{Error, Result};
pub use hash::PolynomialState;
pub use loader::{load_dictionary, LoadReport, Words};
pub use spell_checker::{SpellChecker, Verdict};
pub use suggest::{
    rank_suggestions, score_all, DistanceScores, RankingPolicy, Suggester, Suggestion,
};
