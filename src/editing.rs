// File: src/editing.rs
//! Single-word corrections against a loaded table.
//!
//! Each operation works on a copy, saves it, and only then replaces the
//! caller's table, so a failed save leaves memory matching disk.

use crate::core::normalizer::WordNormalizer;
use crate::core::types::{FrequencyTable, Language, WordCount};
use crate::error::{DictionaryError, Result};
use crate::persistence::DictionaryStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Added {
        word: String,
    },
    Deleted {
        word: String,
        count: WordCount,
    },
    Renamed {
        from: String,
        to: String,
        /// Count transferred from `from`.
        moved: WordCount,
        /// Whether `to` already existed and absorbed the count.
        merged: bool,
    },
}

/// Case-folded, trimmed lookup key. Unlike normalization this strips no
/// characters, so keys from older snapshots stay reachable.
fn lookup_key(word: &str) -> String {
    word.trim().to_lowercase()
}

pub struct EditOperations<'a> {
    store: &'a DictionaryStore,
    normalizer: WordNormalizer,
}

impl<'a> EditOperations<'a> {
    pub fn new(store: &'a DictionaryStore, language: Language) -> Self {
        Self {
            store,
            normalizer: WordNormalizer::new(language),
        }
    }

    fn language(&self) -> Language {
        self.normalizer.language()
    }

    fn commit(&self, table: &mut FrequencyTable, mut working: FrequencyTable) -> Result<()> {
        working.recount();
        self.store.save(self.language(), &working)?;
        *table = working;
        Ok(())
    }

    /// Inserts a known-but-unobserved word with count 0.
    pub fn add(&self, table: &mut FrequencyTable, raw_word: &str) -> Result<EditOutcome> {
        let word = self.normalizer.canonical(raw_word)?;
        if table.contains(&word) {
            return Err(DictionaryError::AlreadyExists(word));
        }

        let mut working = table.clone();
        working.counts_mut().insert(word.clone(), 0);
        self.commit(table, working)?;

        tracing::info!(language = %self.language(), %word, "word added");
        Ok(EditOutcome::Added { word })
    }

    /// Removes a word and its whole count. Confirmation is the caller's job.
    pub fn delete(&self, table: &mut FrequencyTable, word: &str) -> Result<EditOutcome> {
        let word = lookup_key(word);
        let mut working = table.clone();
        let count = working
            .counts_mut()
            .remove(&word)
            .ok_or_else(|| DictionaryError::WordNotFound(word.clone()))?;
        self.commit(table, working)?;

        tracing::info!(language = %self.language(), %word, count, "word deleted");
        Ok(EditOutcome::Deleted { word, count })
    }

    /// Moves the whole count of `wrong_word` onto `correct_word` and drops
    /// `wrong_word`. The total word count never changes.
    pub fn rename(
        &self,
        table: &mut FrequencyTable,
        wrong_word: &str,
        correct_word: &str,
    ) -> Result<EditOutcome> {
        let from = lookup_key(wrong_word);
        if !table.contains(&from) {
            return Err(DictionaryError::WordNotFound(from));
        }
        let to = self.normalizer.canonical(correct_word)?;

        let mut working = table.clone();
        let counts = working.counts_mut();
        let moved = counts.remove(&from).unwrap_or_default();
        let merged = from != to && counts.contains_key(&to);
        let target = counts.entry(to.clone()).or_insert(0);
        *target = target
            .checked_add(moved)
            .ok_or_else(|| DictionaryError::CountOverflow(format!("'{to}'")))?;
        self.commit(table, working)?;

        tracing::info!(language = %self.language(), %from, %to, moved, merged, "word renamed");
        Ok(EditOutcome::Renamed {
            from,
            to,
            moved,
            merged,
        })
    }
}
