// src/core/types.rs
use crate::error::{DictionaryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Occurrence count of a single canonical word.
pub type WordCount = u64;

/// The closed set of languages a dictionary can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Russian,
    English,
    German,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Russian, Language::English, Language::German];

    /// Parses the identifier used in snapshot file names and on the command line.
    pub fn from_id(id: &str) -> Result<Language> {
        match id.trim().to_lowercase().as_str() {
            "russian" => Ok(Language::Russian),
            "english" => Ok(Language::English),
            "german" => Ok(Language::German),
            _ => Err(DictionaryError::UnsupportedLanguage(id.to_string())),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Language::Russian => "russian",
            Language::English => "english",
            Language::German => "german",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Russian => "Русский",
            Language::English => "English",
            Language::German => "Deutsch",
        }
    }

    /// BCP 47 tag of the collation used for alphabetic listings.
    pub fn collation_tag(&self) -> &'static str {
        match self {
            Language::Russian => "ru-RU",
            Language::English => "en-US",
            Language::German => "de-DE",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The two scalar totals of a table, as reported to users and to
/// read-only statistical consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSummary {
    pub total_words: WordCount,
    pub unique_words: usize,
}

/// A word multiset plus its two derived totals.
///
/// The totals are private and only ever re-derived from `word_counts` by
/// [`FrequencyTable::recount`], so they cannot drift from the mapping. The
/// serialized form is the snapshot record: `word_counts`, `total_words`,
/// `unique_words`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrequencyTable {
    word_counts: HashMap<String, WordCount>,
    total_words: WordCount,
    unique_words: usize,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(word_counts: HashMap<String, WordCount>) -> Self {
        let mut table = Self {
            word_counts,
            total_words: 0,
            unique_words: 0,
        };
        table.recount();
        table
    }

    pub fn counts(&self) -> &HashMap<String, WordCount> {
        &self.word_counts
    }

    pub fn get(&self, word: &str) -> Option<WordCount> {
        self.word_counts.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.word_counts.contains_key(word)
    }

    pub fn total_words(&self) -> WordCount {
        self.total_words
    }

    pub fn unique_words(&self) -> usize {
        self.unique_words
    }

    pub fn is_empty(&self) -> bool {
        self.word_counts.is_empty()
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary {
            total_words: self.total_words,
            unique_words: self.unique_words,
        }
    }

    /// Sum of all counts, or `None` if it does not fit in a [`WordCount`].
    pub fn checked_total(&self) -> Option<WordCount> {
        self.word_counts
            .values()
            .try_fold(0 as WordCount, |acc, &count| acc.checked_add(count))
    }

    /// Whether the stored totals agree with the word map.
    pub fn is_consistent(&self) -> bool {
        self.checked_total() == Some(self.total_words)
            && self.unique_words == self.word_counts.len()
    }

    /// Re-derives both totals from the word map. `total_words` saturates;
    /// loading and merging refuse maps whose sum would not fit.
    pub fn recount(&mut self) {
        self.total_words = self
            .word_counts
            .values()
            .fold(0, |acc: WordCount, &count| acc.saturating_add(count));
        self.unique_words = self.word_counts.len();
    }

    /// Direct access to the word map for the mutating engines. Callers must
    /// `recount` before handing the table back.
    pub(crate) fn counts_mut(&mut self) -> &mut HashMap<String, WordCount> {
        &mut self.word_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_ids_round_trip() {
        for language in Language::ALL {
            assert_eq!(Language::from_id(language.id()).unwrap(), language);
        }
        assert_eq!(Language::from_id(" German ").unwrap(), Language::German);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let err = Language::from_id("french").unwrap_err();
        assert!(matches!(err, DictionaryError::UnsupportedLanguage(ref id) if id == "french"));
    }

    #[test]
    fn test_from_counts_derives_totals() {
        let table = FrequencyTable::from_counts(HashMap::from([
            ("cat".to_string(), 3),
            ("dog".to_string(), 5),
        ]));
        assert_eq!(table.total_words(), 8);
        assert_eq!(table.unique_words(), 2);
        assert!(table.is_consistent());
    }

    #[test]
    fn test_recount_after_direct_mutation() {
        let mut table = FrequencyTable::new();
        table.counts_mut().insert("the".to_string(), 4);
        assert!(!table.is_consistent());
        table.recount();
        assert_eq!(table.summary(), TableSummary { total_words: 4, unique_words: 1 });
    }

    #[test]
    fn test_overflowing_counts_are_never_consistent() {
        let table = FrequencyTable::from_counts(HashMap::from([
            ("a".to_string(), WordCount::MAX),
            ("b".to_string(), 1),
        ]));
        assert_eq!(table.checked_total(), None);
        assert_eq!(table.total_words(), WordCount::MAX);
        assert!(!table.is_consistent());
    }

    #[test]
    fn test_serialized_field_names() {
        let table = FrequencyTable::from_counts(HashMap::from([("ёж".to_string(), 2)]));
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["word_counts"]["ёж"], 2);
        assert_eq!(json["total_words"], 2);
        assert_eq!(json["unique_words"], 1);
    }
}
