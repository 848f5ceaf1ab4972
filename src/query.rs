//! Console input normalization.
//!
//! The table and the suggester accept any key bytes; deciding what counts as
//! a word a user may ask about happens here, before either is called.

use crate::error::{Error, Result};

/// Line that ends the interactive loop.
pub const QUIT: &str = "quit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// A lowercased, letters-only word to look up.
    Check(String),
}

/// Strip the line terminator, lowercase ASCII letters, and classify.
///
/// ```
/// use chained_speller::query::{parse_line, Command};
///
/// assert_eq!(parse_line("Apple\n").unwrap(), Command::Check("apple".into()));
/// assert_eq!(parse_line("QUIT\r\n").unwrap(), Command::Quit);
/// assert!(parse_line("two words\n").is_err());
/// ```
pub fn parse_line(line: &str) -> Result<Command> {
    let raw = line.trim_end_matches(['\n', '\r']);
    let word = raw.to_ascii_lowercase();
    if word == QUIT {
        return Ok(Command::Quit);
    }
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_lowercase()) {
        return Err(Error::InvalidQuery(raw.to_string()));
    }
    Ok(Command::Check(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_letters() {
        assert_eq!(parse_line("HeLLo").unwrap(), Command::Check("hello".into()));
    }

    #[test]
    fn quit_in_any_case() {
        for line in ["quit", "Quit\n", "QUIT\r\n"] {
            assert_eq!(parse_line(line).unwrap(), Command::Quit, "{line:?}");
        }
    }

    #[test]
    fn rejects_non_letters() {
        for line in ["", "\n", "don't", "abc1", "two words", " lead", "caf\u{e9}"] {
            match parse_line(line) {
                Err(Error::InvalidQuery(_)) => {}
                other => panic!("{line:?} accepted: {:?}", other),
            }
        }
    }
}
