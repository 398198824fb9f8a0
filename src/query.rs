// File: src/query.rs
//! Read-only listing and prefix search over a table.

use crate::core::types::{FrequencyTable, Language, WordCount};
use crate::error::{DictionaryError, Result};
use icu::collator::options::CollatorOptions;
use icu::collator::{Collator, CollatorBorrowed};
use icu::locale::Locale;
use std::cmp::Ordering;

/// Orders two words for alphabetic listings.
pub trait WordCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Locale-aware ordering from ICU collation data compiled into the binary,
/// so results never depend on the host's installed locales.
pub struct LocaleCollator {
    collator: CollatorBorrowed<'static>,
}

impl LocaleCollator {
    pub fn for_language(language: Language) -> Result<Self> {
        let locale: Locale = language
            .collation_tag()
            .parse()
            .map_err(|e| DictionaryError::Collation(format!("{:?}", e)))?;
        let collator = Collator::try_new(locale.into(), CollatorOptions::default())
            .map_err(|e| DictionaryError::Collation(e.to_string()))?;
        Ok(Self { collator })
    }
}

impl WordCollator for LocaleCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b)
    }
}

/// Plain code point order.
pub struct CodepointCollator;

impl WordCollator for CodepointCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Alphabetic,
    Frequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A sorted snapshot of `(word, count)` pairs borrowed from a table.
/// Iterating does not consume it; call [`iter`](Self::iter) as often as needed.
#[derive(Debug, Clone)]
pub struct SortedView<'t> {
    entries: Vec<(&'t str, WordCount)>,
}

impl<'t> SortedView<'t> {
    pub fn iter(&self) -> impl Iterator<Item = (&'t str, WordCount)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<(String, WordCount)> {
        self.iter().map(|(w, c)| (w.to_string(), c)).collect()
    }
}

impl<'v, 't> IntoIterator for &'v SortedView<'t> {
    type Item = (&'t str, WordCount);
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, (&'t str, WordCount)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().copied()
    }
}

pub struct QueryEngine<C = LocaleCollator> {
    collator: C,
}

impl QueryEngine<LocaleCollator> {
    pub fn for_language(language: Language) -> Result<Self> {
        Ok(Self::with_collator(LocaleCollator::for_language(language)?))
    }
}

impl<C: WordCollator> QueryEngine<C> {
    pub fn with_collator(collator: C) -> Self {
        Self { collator }
    }

    /// Collation order, falling back to code points for collation-equal words.
    fn alphabetic(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b).then_with(|| a.cmp(b))
    }

    /// Frequency order with ties broken alphabetically ascending, whatever
    /// the direction, so equal counts always list the same way.
    fn by_frequency(
        &self,
        a: &(&str, WordCount),
        b: &(&str, WordCount),
        direction: Direction,
    ) -> Ordering {
        let primary = match direction {
            Direction::Ascending => a.1.cmp(&b.1),
            Direction::Descending => b.1.cmp(&a.1),
        };
        primary.then_with(|| self.alphabetic(a.0, b.0))
    }

    pub fn list_sorted<'t>(
        &self,
        table: &'t FrequencyTable,
        order: SortOrder,
        direction: Direction,
    ) -> SortedView<'t> {
        let mut entries: Vec<(&'t str, WordCount)> = table
            .counts()
            .iter()
            .map(|(word, &count)| (word.as_str(), count))
            .collect();

        match order {
            SortOrder::Alphabetic => {
                entries.sort_by(|a, b| {
                    let ord = self.alphabetic(a.0, b.0);
                    match direction {
                        Direction::Ascending => ord,
                        Direction::Descending => ord.reverse(),
                    }
                });
            }
            SortOrder::Frequency => entries.sort_by(|a, b| self.by_frequency(a, b, direction)),
        }
        SortedView { entries }
    }

    /// Words starting with the case-folded `pattern`, most frequent first.
    /// An empty pattern matches every word.
    pub fn search_prefix<'t>(&self, table: &'t FrequencyTable, pattern: &str) -> SortedView<'t> {
        let prefix = pattern.trim().to_lowercase();
        let mut entries: Vec<(&'t str, WordCount)> = table
            .counts()
            .iter()
            .filter(|(word, _)| word.starts_with(&prefix))
            .map(|(word, &count)| (word.as_str(), count))
            .collect();
        entries.sort_by(|a, b| self.by_frequency(a, b, Direction::Descending));
        SortedView { entries }
    }
}
