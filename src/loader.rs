//! Dictionary loading: split a byte stream into words and store each one.
//!
//! A word is a maximal run of ASCII letters, ASCII digits or `'`. Any other
//! byte ends the run, empty runs are skipped, and a run still open at end of
//! input is a word too. No case folding happens here.

use crate::chained_hash_map::ChainedHashMap;
use crate::error::Result;
use core::hash::BuildHasher;
use std::io::{self, BufRead, BufReader, Read};
use std::time::{Duration, Instant};
use tracing::info;

#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'\''
}

/// Iterator over the words of a buffered reader.
pub struct Words<R> {
    reader: R,
}

impl<R: BufRead> Words<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for Words<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut word = String::new();
        loop {
            let (used, done) = {
                let available = match self.reader.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Some(Err(e)),
                };
                if available.is_empty() {
                    break;
                }
                let mut used = 0;
                let mut done = false;
                for &b in available {
                    used += 1;
                    if is_word_byte(b) {
                        word.push(char::from(b));
                    } else if !word.is_empty() {
                        done = true;
                        break;
                    }
                }
                (used, done)
            };
            self.reader.consume(used);
            if done {
                break;
            }
        }
        if word.is_empty() {
            None
        } else {
            Some(Ok(word))
        }
    }
}

/// Split an in-memory text the same way `Words` splits a stream.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii() && is_word_byte(c as u8)))
        .filter(|w| !w.is_empty())
}

/// Outcome of a dictionary load.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    /// Words read, repeats included.
    pub words: usize,
    /// Words that were not already in the table.
    pub inserted: usize,
    pub elapsed: Duration,
}

/// Read every word from `reader` into `table` with the unit marker. Each word
/// is freshly allocated by the tokenizer, so the table adopts it.
pub fn load_dictionary<R, S>(
    reader: R,
    table: &mut ChainedHashMap<String, (), S>,
) -> Result<LoadReport>
where
    R: Read,
    S: BuildHasher,
{
    let start = Instant::now();
    let mut words = 0;
    let mut inserted = 0;
    for word in Words::new(BufReader::new(reader)) {
        let word = word?;
        words += 1;
        if table.put(word, ())?.is_none() {
            inserted += 1;
        }
    }
    let report = LoadReport {
        words,
        inserted,
        elapsed: start.elapsed(),
    };
    info!(
        words = report.words,
        distinct = report.inserted,
        buckets = table.capacity(),
        elapsed_ms = report.elapsed.as_secs_f64() * 1e3,
        "dictionary loaded"
    );
    Ok(report)
}
