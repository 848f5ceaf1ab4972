//! SpellChecker: a dictionary table plus a suggester.

use crate::chained_hash_map::{ChainedHashMap, TableStats};
use crate::config::TableConfig;
use crate::error::Result;
use crate::loader::{load_dictionary, LoadReport};
use crate::suggest::{Suggester, Suggestion};
use std::io::Read;

/// Bucket count for a dictionary table when none is configured.
pub const DEFAULT_DICTIONARY_CAPACITY: usize = 1000;

/// Dictionary words map to the unit marker; membership is all that is stored.
pub type Dictionary = ChainedHashMap<String, ()>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<'a> {
    Correct,
    Misspelled(Vec<Suggestion<'a, String>>),
}

impl<'a> Verdict<'a> {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }

    /// Suggested words, closest first under the nearest policy.
    pub fn words(&self) -> Vec<&'a str> {
        match self {
            Verdict::Correct => Vec::new(),
            Verdict::Misspelled(s) => s.iter().map(|s| s.key.as_str()).collect(),
        }
    }
}

pub struct SpellChecker {
    words: Dictionary,
    suggester: Suggester,
}

impl SpellChecker {
    pub fn new() -> Self {
        Self {
            words: ChainedHashMap::with_capacity(DEFAULT_DICTIONARY_CAPACITY),
            suggester: Suggester::default(),
        }
    }

    pub fn with_config(config: TableConfig, suggester: Suggester) -> Result<Self> {
        Ok(Self {
            words: ChainedHashMap::with_config(config)?,
            suggester,
        })
    }

    /// Build a checker and fill it from `reader`.
    pub fn from_reader<R: Read>(
        reader: R,
        config: TableConfig,
        suggester: Suggester,
    ) -> Result<(Self, LoadReport)> {
        let mut checker = Self::with_config(config, suggester)?;
        let report = checker.load(reader)?;
        Ok((checker, report))
    }

    /// Add every word of `reader`; may be called more than once.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<LoadReport> {
        load_dictionary(reader, &mut self.words)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Returns true when `word` was not already known.
    pub fn add_word(&mut self, word: &str) -> Result<bool> {
        Ok(self.words.put_copy(word, ())?.is_none())
    }

    /// Returns true when `word` was present.
    pub fn remove_word(&mut self, word: &str) -> bool {
        self.words.remove(word).is_some()
    }

    /// Exact match first; only a miss pays for scoring the whole dictionary.
    pub fn check(&self, word: &str) -> Verdict<'_> {
        if self.contains(word) {
            Verdict::Correct
        } else {
            Verdict::Misspelled(self.suggest(word))
        }
    }

    pub fn suggest(&self, word: &str) -> Vec<Suggestion<'_, String>> {
        self.suggester.rank(&self.words, word)
    }

    pub fn suggester(&self) -> &Suggester {
        &self.suggester
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn stats(&self) -> TableStats {
        self.words.stats()
    }

    pub fn table(&self) -> &Dictionary {
        &self.words
    }
}

impl Default for SpellChecker {
    fn default() -> Self {
        Self::new()
    }
}
