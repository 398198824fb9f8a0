// File: src/ingestion.rs
use crate::core::normalizer::WordNormalizer;
use crate::core::types::{FrequencyTable, Language, WordCount};
use crate::corpus::CorpusReader;
use crate::error::{DictionaryError, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Transient word counts from one ingestion pass, merged into a table only
/// once fully built.
pub type DeltaTable = HashMap<String, WordCount>;

/// What a merge changed. Purely observational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestStats {
    /// Sum of all delta counts.
    pub words_added: WordCount,
    /// Delta keys that were absent from the table before the merge.
    pub new_unique_words: usize,
    pub total_before: WordCount,
    pub total_after: WordCount,
    pub unique_before: usize,
    pub unique_after: usize,
}

/// A corpus file that was skipped during a batch.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: DictionaryError,
}

/// Outcome of a multi-file ingestion.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files_ingested: usize,
    pub skipped: Vec<SkippedFile>,
    pub stats: IngestStats,
}

/// Turns text into delta tables and folds them into a [`FrequencyTable`].
pub struct IngestionEngine {
    normalizer: WordNormalizer,
}

impl IngestionEngine {
    pub fn new(language: Language) -> Self {
        Self {
            normalizer: WordNormalizer::new(language),
        }
    }

    pub fn language(&self) -> Language {
        self.normalizer.language()
    }

    /// Splits every line on separators and counts the tokens that normalize.
    pub fn build_delta<'a, I>(&self, lines: I) -> DeltaTable
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut delta = DeltaTable::new();
        for line in lines {
            for token in line.split(is_separator).filter(|t| !t.is_empty()) {
                if let Some(word) = self.normalizer.normalize(token) {
                    *delta.entry(word).or_insert(0) += 1;
                }
            }
        }
        delta
    }

    /// Adds `delta` into `table` and re-derives both totals from the map.
    /// Fails with `CountOverflow`, leaving `table` untouched, if any count
    /// or the total would leave the counter range.
    pub fn merge(&self, table: &mut FrequencyTable, delta: DeltaTable) -> Result<IngestStats> {
        let total_before = table.total_words();
        let unique_before = table.unique_words();

        let mut words_added: WordCount = 0;
        for (word, &count) in &delta {
            words_added = words_added
                .checked_add(count)
                .ok_or_else(|| DictionaryError::CountOverflow("delta total".to_string()))?;
            if table.get(word).unwrap_or(0).checked_add(count).is_none() {
                return Err(DictionaryError::CountOverflow(format!("'{word}'")));
            }
        }
        table
            .checked_total()
            .and_then(|total| total.checked_add(words_added))
            .ok_or_else(|| DictionaryError::CountOverflow("table total".to_string()))?;

        let mut new_unique_words = 0;
        let counts = table.counts_mut();
        for (word, count) in delta {
            let entry = counts.entry(word).or_insert_with(|| {
                new_unique_words += 1;
                0
            });
            *entry += count;
        }
        table.recount();

        Ok(IngestStats {
            words_added,
            new_unique_words,
            total_before,
            total_after: table.total_words(),
            unique_before,
            unique_after: table.unique_words(),
        })
    }

    /// Builds the delta for `lines` and merges it. The table is untouched
    /// until the whole delta exists.
    pub fn ingest<'a, I>(&self, table: &mut FrequencyTable, lines: I) -> Result<IngestStats>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let delta = self.build_delta(lines);
        self.merge(table, delta)
    }

    /// Reads and tokenizes every file in parallel, then merges the deltas one
    /// at a time in `paths` order. Unreadable files, and files whose merge
    /// would overflow, are logged and skipped.
    pub fn ingest_files(
        &self,
        table: &mut FrequencyTable,
        reader: &CorpusReader,
        paths: &[PathBuf],
    ) -> BatchReport {
        let deltas: Vec<(&Path, Result<DeltaTable>)> = paths
            .par_iter()
            .map(|path| {
                let delta = reader
                    .read(path)
                    .map(|text| self.build_delta(text.lines()));
                (path.as_path(), delta)
            })
            .collect();

        let mut report = BatchReport {
            stats: IngestStats {
                total_before: table.total_words(),
                total_after: table.total_words(),
                unique_before: table.unique_words(),
                unique_after: table.unique_words(),
                ..IngestStats::default()
            },
            ..BatchReport::default()
        };

        for (path, delta) in deltas {
            match delta.and_then(|delta| self.merge(table, delta)) {
                Ok(stats) => {
                    report.files_ingested += 1;
                    report.stats.words_added += stats.words_added;
                    report.stats.new_unique_words += stats.new_unique_words;
                    report.stats.total_after = stats.total_after;
                    report.stats.unique_after = stats.unique_after;
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping corpus file");
                    report.skipped.push(SkippedFile {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            language = %self.language(),
            files = report.files_ingested,
            skipped = report.skipped.len(),
            words_added = report.stats.words_added,
            "corpus batch merged"
        );
        report
    }
}

/// Unicode whitespace plus the ASCII file, group, record and unit
/// separators (U+001C..U+001F), which also end a token.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TextEncoding;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_delta_counts_accepted_tokens_only() {
        let engine = IngestionEngine::new(Language::English);
        let delta = engine.build_delta(["The cat, the DOG -- 42", "  the\tend "]);
        assert_eq!(delta.get("the"), Some(&3));
        assert_eq!(delta.get("cat"), Some(&1));
        assert_eq!(delta.get("dog"), Some(&1));
        assert_eq!(delta.get("end"), Some(&1));
        assert_eq!(delta.len(), 4);
    }

    #[test]
    fn test_control_separators_split_tokens() {
        let engine = IngestionEngine::new(Language::English);
        let delta = engine.build_delta(["one\u{1c}two\u{1d}three\u{1e}four\u{1f}five\u{85}six"]);
        let mut words: Vec<&str> = delta.keys().map(String::as_str).collect();
        words.sort_unstable();
        assert_eq!(words, vec!["five", "four", "one", "six", "three", "two"]);
    }

    #[test]
    fn test_merge_reports_stats() {
        let engine = IngestionEngine::new(Language::English);
        let mut table = FrequencyTable::from_counts(HashMap::from([("cat".to_string(), 2)]));

        let stats = engine.ingest(&mut table, ["cat dog dog"]).unwrap();
        assert_eq!(table.get("cat"), Some(3));
        assert_eq!(table.get("dog"), Some(2));
        assert_eq!(
            stats,
            IngestStats {
                words_added: 3,
                new_unique_words: 1,
                total_before: 2,
                total_after: 5,
                unique_before: 1,
                unique_after: 2,
            }
        );
        assert!(table.is_consistent());
    }

    #[test]
    fn test_ingest_is_additive() {
        let engine = IngestionEngine::new(Language::Russian);
        let mut table = FrequencyTable::new();
        let text = ["мама мыла раму, мама!"];

        engine.ingest(&mut table, text).unwrap();
        let stats = engine.ingest(&mut table, text).unwrap();
        assert_eq!(table.get("мама"), Some(4));
        assert_eq!(table.get("раму"), Some(2));
        assert_eq!(stats.new_unique_words, 0);
        assert_eq!(table.total_words(), 8);
    }

    #[test]
    fn test_overflowing_merge_leaves_table_untouched() {
        let engine = IngestionEngine::new(Language::English);
        let mut table = FrequencyTable::from_counts(HashMap::from([
            ("cat".to_string(), WordCount::MAX - 1),
        ]));
        let before = table.clone();

        let err = engine.ingest(&mut table, ["cat cat"]).unwrap_err();
        assert!(matches!(err, DictionaryError::CountOverflow(_)));
        assert_eq!(table, before);

        let err = engine.ingest(&mut table, ["dog dog"]).unwrap_err();
        assert!(matches!(err, DictionaryError::CountOverflow(_)));
        assert_eq!(table, before);

        let stats = engine.ingest(&mut table, ["cat"]).unwrap();
        assert_eq!(stats.total_after, WordCount::MAX);
        assert!(table.is_consistent());
    }

    #[test]
    fn test_batch_skips_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.txt");
        let missing = dir.path().join("missing.txt");
        fs::write(&good, "one two two").unwrap();
        fs::write(&bad, [0xFF, 0x81]).unwrap();

        let engine = IngestionEngine::new(Language::English);
        let reader = CorpusReader::new(vec![TextEncoding::Utf8, TextEncoding::Cp1252]);
        let mut table = FrequencyTable::new();
        let report = engine.ingest_files(&mut table, &reader, &[bad, good, missing]);

        assert_eq!(report.files_ingested, 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(report
            .skipped
            .iter()
            .all(|s| matches!(s.error, DictionaryError::UnreadableFile { .. })));
        assert_eq!(table.get("two"), Some(2));
        assert_eq!(report.stats.total_after, 3);
        assert_eq!(report.stats.new_unique_words, 2);
    }

    #[test]
    fn test_batch_counts_new_words_once_across_files() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("1.txt");
        let second = dir.path().join("2.txt");
        fs::write(&first, "alpha beta").unwrap();
        fs::write(&second, "beta gamma").unwrap();

        let engine = IngestionEngine::new(Language::English);
        let mut table = FrequencyTable::new();
        let report = engine.ingest_files(&mut table, &CorpusReader::default(), &[first, second]);

        assert_eq!(report.stats.words_added, 4);
        assert_eq!(report.stats.new_unique_words, 3);
        assert_eq!(report.stats.unique_after, 3);
        assert_eq!(table.get("beta"), Some(2));
    }
}
