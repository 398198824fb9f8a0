// src/core/normalizer.rs
use crate::core::types::Language;
use crate::error::{DictionaryError, Result};

const HYPHEN: char = '-';
const APOSTROPHE: char = '\'';

/// Maps raw tokens onto canonical dictionary keys for one language.
///
/// This is the only place that decides what counts as a word; ingestion and
/// manual edits both route through it.
#[derive(Debug, Clone, Copy)]
pub struct WordNormalizer {
    language: Language,
}

impl WordNormalizer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Lower-cases `raw`, drops every character outside the language's
    /// alphabet, then strips boundary hyphens. Returns `None` when no letter
    /// survives.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let filtered: String = raw
            .to_lowercase()
            .chars()
            .filter(|&c| self.is_allowed(c))
            .collect();

        let trimmed = filtered.trim_matches(HYPHEN);
        if !trimmed.chars().any(|c| c != HYPHEN && c != APOSTROPHE) {
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Like [`normalize`](Self::normalize), but rejection is an `InvalidWord` error.
    pub fn canonical(&self, raw: &str) -> Result<String> {
        self.normalize(raw)
            .ok_or_else(|| DictionaryError::InvalidWord(raw.to_string()))
    }

    fn is_allowed(&self, c: char) -> bool {
        match self.language {
            Language::Russian => matches!(c, 'а'..='я' | 'ё' | HYPHEN),
            Language::English => matches!(c, 'a'..='z' | HYPHEN | APOSTROPHE),
            Language::German => {
                matches!(c, 'a'..='z' | 'ä' | 'ö' | 'ü' | 'ß' | HYPHEN | APOSTROPHE)
            }
        }
    }
}

/// Shorthand for a one-off normalization.
pub fn normalize(raw: &str, language: Language) -> Option<String> {
    WordNormalizer::new(language).normalize(raw)
}
