// File: src/persistence.rs
use crate::core::types::{FrequencyTable, Language};
use crate::error::{DictionaryError, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

const SNAPSHOT_SUFFIX: &str = "_dictionary.json";

/// Durable snapshots, one JSON file per language inside a directory.
///
/// Nothing is cached: every `load` re-reads the file.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    dir: PathBuf,
}

impl DictionaryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn snapshot_path(&self, language: Language) -> PathBuf {
        self.dir.join(format!("{}{}", language.id(), SNAPSHOT_SUFFIX))
    }

    pub fn exists(&self, language: Language) -> bool {
        self.snapshot_path(language).is_file()
    }

    pub fn load(&self, language: Language) -> Result<FrequencyTable> {
        let path = self.snapshot_path(language);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DictionaryError::SnapshotNotFound(language))
            }
            Err(e) => return Err(DictionaryError::persistence(path, e)),
        };

        let mut table: FrequencyTable =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                if e.is_io() {
                    DictionaryError::persistence(&path, e.into())
                } else {
                    DictionaryError::corrupt(&path, e)
                }
            })?;

        if table.checked_total().is_none() {
            return Err(DictionaryError::corrupt(&path, "word counts overflow"));
        }
        if !table.is_consistent() {
            tracing::warn!(
                path = %path.display(),
                stored_total = table.total_words(),
                stored_unique = table.unique_words(),
                "snapshot totals disagree with word counts, re-deriving"
            );
            table.recount();
        }
        Ok(table)
    }

    /// Writes the full table to a temporary file beside the snapshot and
    /// renames it into place, so a reader sees either the old or the new
    /// snapshot and never a partial one.
    pub fn save(&self, language: Language, table: &FrequencyTable) -> Result<()> {
        let path = self.snapshot_path(language);
        fs::create_dir_all(&self.dir).map_err(|e| DictionaryError::persistence(&self.dir, e))?;

        let temp_file =
            NamedTempFile::new_in(&self.dir).map_err(|e| DictionaryError::persistence(&path, e))?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer_pretty(&mut writer, table)
                .map_err(|e| DictionaryError::persistence(&path, e.into()))?;
            writer
                .flush()
                .map_err(|e| DictionaryError::persistence(&path, e))?;
        }
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| DictionaryError::persistence(&path, e))?;
        temp_file
            .persist(&path)
            .map_err(|e| DictionaryError::persistence(&path, e.error))?;

        tracing::info!(
            %language,
            total_words = table.total_words(),
            unique_words = table.unique_words(),
            "dictionary saved"
        );
        Ok(())
    }
}
