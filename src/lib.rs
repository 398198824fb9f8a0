// src/lib.rs

pub mod config;
pub mod core;
pub mod corpus;
pub mod editing;
pub mod error;
pub mod ingestion;
pub mod persistence;
pub mod query;

pub use crate::core::engine::{CreateOutcome, DictionarySession, FrequencyDictionary};
pub use crate::core::normalizer::{normalize, WordNormalizer};
pub use crate::core::types::{FrequencyTable, Language, TableSummary, WordCount};
pub use crate::error::{DictionaryError, Result};
