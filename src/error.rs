// File: src/error.rs
//! Typed failures for every dictionary operation.
//!
//! Each variant carries enough context for a presentation layer to render an
//! exact message without the engine knowing how it is displayed.

use crate::core::types::Language;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The normalizer rejected the input: nothing but hyphens, apostrophes
    /// or foreign characters remained.
    #[error("invalid word: '{0}'")]
    InvalidWord(String),

    #[error("word '{0}' not found")]
    WordNotFound(String),

    #[error("no dictionary snapshot for {0}")]
    SnapshotNotFound(Language),

    #[error("word '{0}' already exists")]
    AlreadyExists(String),

    /// Every configured encoding failed, or the file could not be read at all.
    #[error("cannot read {}: {reason}", .path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("not a corpus file: {}", .0.display())]
    InvalidCorpusFile(PathBuf),

    #[error("corpus directory {}: {reason}", .path.display())]
    CorpusDirectory { path: PathBuf, reason: String },

    #[error("corrupt snapshot {}: {reason}", .path.display())]
    CorruptSnapshot { path: PathBuf, reason: String },

    /// Durable storage failed. The table was NOT saved.
    #[error("persistence failure at {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Merging would push a word count or the table total past the counter
    /// range. The table was left unchanged.
    #[error("word counts overflow: {0}")]
    CountOverflow(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("collation data unavailable: {0}")]
    Collation(String),
}

impl DictionaryError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptSnapshot {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DictionaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_subject() {
        let err = DictionaryError::WordNotFound("кот".to_string());
        assert_eq!(err.to_string(), "word 'кот' not found");

        let err = DictionaryError::SnapshotNotFound(Language::German);
        assert_eq!(err.to_string(), "no dictionary snapshot for german");
    }

    #[test]
    fn test_persistence_keeps_io_source() {
        use std::error::Error as _;
        let err = DictionaryError::persistence("x.json", io::Error::other("disk full"));
        assert_eq!(err.to_string(), "persistence failure at x.json: disk full");
        assert!(err.source().is_some());
    }
}
