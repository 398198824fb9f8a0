use crate::config::Config;
use crate::core::types::{FrequencyTable, Language, TableSummary};
use crate::corpus::CorpusReader;
use crate::editing::{EditOperations, EditOutcome};
use crate::error::{DictionaryError, Result};
use crate::ingestion::{IngestStats, IngestionEngine, SkippedFile};
use crate::persistence::DictionaryStore;
use crate::query::{Direction, QueryEngine, SortOrder, SortedView};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum CreateOutcome {
    Created {
        summary: TableSummary,
        files_ingested: usize,
        skipped: Vec<SkippedFile>,
    },
    /// A snapshot already existed and `force` was not set.
    AlreadyPresent,
}

/// Entry point tying the corpus directory, the snapshot store and the
/// engines together. Holds no table of its own; tables live in sessions or
/// with the caller.
pub struct FrequencyDictionary {
    config: Config,
    store: DictionaryStore,
    reader: CorpusReader,
}

impl FrequencyDictionary {
    pub fn new(config: Config) -> Self {
        Self {
            store: DictionaryStore::new(&config.dict_dir),
            reader: CorpusReader::new(config.encodings.clone()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    pub fn corpus_dir(&self, language: Language) -> PathBuf {
        self.config.data_dir.join(language.id())
    }

    fn is_corpus_file(&self, path: &Path) -> bool {
        let extension = path.extension().and_then(|ext| ext.to_str());
        path.is_file() && extension == Some(self.config.corpus_extension.as_str())
    }

    /// Corpus files for `language`, sorted by path.
    pub fn corpus_files(&self, language: Language) -> Result<Vec<PathBuf>> {
        let dir = self.corpus_dir(language);
        let entries = fs::read_dir(&dir).map_err(|e| DictionaryError::CorpusDirectory {
            path: dir.clone(),
            reason: e.to_string(),
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| self.is_corpus_file(path))
            .collect();
        if files.is_empty() {
            return Err(DictionaryError::CorpusDirectory {
                path: dir,
                reason: format!("no .{} files", self.config.corpus_extension),
            });
        }
        files.sort();
        Ok(files)
    }

    /// Builds a fresh snapshot from every corpus file of `language`.
    pub fn create(&self, language: Language, force: bool) -> Result<CreateOutcome> {
        if self.store.exists(language) && !force {
            tracing::info!(%language, "dictionary already exists, skipping");
            return Ok(CreateOutcome::AlreadyPresent);
        }

        let files = self.corpus_files(language)?;
        tracing::info!(%language, files = files.len(), "building dictionary");

        let mut table = FrequencyTable::new();
        let report = IngestionEngine::new(language).ingest_files(&mut table, &self.reader, &files);
        self.store.save(language, &table)?;

        tracing::info!(
            %language,
            total_words = table.total_words(),
            unique_words = table.unique_words(),
            "dictionary created"
        );
        Ok(CreateOutcome::Created {
            summary: table.summary(),
            files_ingested: report.files_ingested,
            skipped: report.skipped,
        })
    }

    /// Runs [`create`](Self::create) for every language; one failure does
    /// not stop the others.
    pub fn create_all(&self, force: bool) -> Vec<(Language, Result<CreateOutcome>)> {
        Language::ALL
            .into_iter()
            .map(|language| (language, self.create(language, force)))
            .collect()
    }

    pub fn load(&self, language: Language) -> Result<FrequencyTable> {
        self.store.load(language)
    }

    pub fn save(&self, language: Language, table: &FrequencyTable) -> Result<()> {
        self.store.save(language, table)
    }

    /// Reads one corpus file into `table` and persists the result. `table`
    /// is only replaced once the save succeeded.
    pub fn ingest_file(
        &self,
        language: Language,
        table: &mut FrequencyTable,
        path: &Path,
    ) -> Result<IngestStats> {
        if !self.is_corpus_file(path) {
            return Err(DictionaryError::InvalidCorpusFile(path.to_path_buf()));
        }
        let text = self.reader.read(path)?;

        let mut working = table.clone();
        let stats = IngestionEngine::new(language).ingest(&mut working, text.lines())?;
        self.store.save(language, &working)?;
        *table = working;

        tracing::info!(
            %language,
            path = %path.display(),
            words_added = stats.words_added,
            new_unique_words = stats.new_unique_words,
            "dictionary updated"
        );
        Ok(stats)
    }

    /// Loads the snapshot for `language` into a new session.
    pub fn open(&self, language: Language) -> Result<DictionarySession<'_>> {
        let table = self.store.load(language)?;
        Ok(DictionarySession {
            dictionary: self,
            language,
            table,
            query: QueryEngine::for_language(language)?,
        })
    }
}

/// One language's table held in memory. Every mutating call persists before
/// it returns.
pub struct DictionarySession<'d> {
    dictionary: &'d FrequencyDictionary,
    language: Language,
    table: FrequencyTable,
    query: QueryEngine,
}

impl<'d> DictionarySession<'d> {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn stats(&self) -> TableSummary {
        self.table.summary()
    }

    pub fn list_sorted(&self, order: SortOrder, direction: Direction) -> SortedView<'_> {
        self.query.list_sorted(&self.table, order, direction)
    }

    pub fn search_prefix(&self, pattern: &str) -> SortedView<'_> {
        self.query.search_prefix(&self.table, pattern)
    }

    fn edits(&self) -> EditOperations<'d> {
        EditOperations::new(self.dictionary.store(), self.language)
    }

    pub fn add(&mut self, raw_word: &str) -> Result<EditOutcome> {
        self.edits().add(&mut self.table, raw_word)
    }

    pub fn delete(&mut self, word: &str) -> Result<EditOutcome> {
        self.edits().delete(&mut self.table, word)
    }

    pub fn rename(&mut self, wrong_word: &str, correct_word: &str) -> Result<EditOutcome> {
        self.edits().rename(&mut self.table, wrong_word, correct_word)
    }

    pub fn ingest_file(&mut self, path: &Path) -> Result<IngestStats> {
        self.dictionary.ingest_file(self.language, &mut self.table, path)
    }

    /// Discards the in-memory table and re-reads the snapshot.
    pub fn reload(&mut self) -> Result<()> {
        self.table = self.dictionary.load(self.language)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> FrequencyDictionary {
        FrequencyDictionary::new(Config {
            data_dir: dir.path().join("data"),
            dict_dir: dir.path().join("dictionaries"),
            ..Config::default()
        })
    }

    fn write_corpus(dir: &TempDir, language: Language, name: &str, text: &str) -> PathBuf {
        let lang_dir = dir.path().join("data").join(language.id());
        fs::create_dir_all(&lang_dir).unwrap();
        let path = lang_dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_create_and_open() {
        let dir = TempDir::new().unwrap();
        let dictionary = setup(&dir);
        write_corpus(&dir, Language::English, "a.txt", "The cat saw the dog.");
        write_corpus(&dir, Language::English, "b.txt", "the end");
        write_corpus(&dir, Language::English, "notes.md", "ignored words here");

        let outcome = dictionary.create(Language::English, false).unwrap();
        match outcome {
            CreateOutcome::Created { summary, files_ingested, skipped } => {
                assert_eq!(summary, TableSummary { total_words: 7, unique_words: 5 });
                assert_eq!(files_ingested, 2);
                assert!(skipped.is_empty());
            }
            CreateOutcome::AlreadyPresent => panic!("expected a new dictionary"),
        }

        let session = dictionary.open(Language::English).unwrap();
        assert_eq!(session.table().get("the"), Some(3));
        assert!(session.table().get("ignored").is_none());
    }

    #[test]
    fn test_create_without_force_is_noop() {
        let dir = TempDir::new().unwrap();
        let dictionary = setup(&dir);
        write_corpus(&dir, Language::German, "a.txt", "eins zwei");
        dictionary.create(Language::German, false).unwrap();

        write_corpus(&dir, Language::German, "b.txt", "drei");
        assert!(matches!(
            dictionary.create(Language::German, false).unwrap(),
            CreateOutcome::AlreadyPresent
        ));
        assert_eq!(dictionary.load(Language::German).unwrap().total_words(), 2);

        dictionary.create(Language::German, true).unwrap();
        assert_eq!(dictionary.load(Language::German).unwrap().total_words(), 3);
    }

    #[test]
    fn test_create_reports_missing_or_empty_corpus() {
        let dir = TempDir::new().unwrap();
        let dictionary = setup(&dir);
        assert!(matches!(
            dictionary.create(Language::Russian, false),
            Err(DictionaryError::CorpusDirectory { .. })
        ));

        fs::create_dir_all(dictionary.corpus_dir(Language::Russian)).unwrap();
        assert!(matches!(
            dictionary.create(Language::Russian, false),
            Err(DictionaryError::CorpusDirectory { .. })
        ));
        assert!(!dictionary.store().exists(Language::Russian));
    }

    #[test]
    fn test_create_all_continues_past_failures() {
        let dir = TempDir::new().unwrap();
        let dictionary = setup(&dir);
        write_corpus(&dir, Language::Russian, "a.txt", "один два");

        let results = dictionary.create_all(false);
        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], (Language::Russian, Ok(CreateOutcome::Created { .. }))));
        assert!(results[1].1.is_err());
        assert!(results[2].1.is_err());
    }

    #[test]
    fn test_session_ingest_file_validates_path() {
        let dir = TempDir::new().unwrap();
        let dictionary = setup(&dir);
        write_corpus(&dir, Language::English, "a.txt", "one");
        dictionary.create(Language::English, false).unwrap();
        let mut session = dictionary.open(Language::English).unwrap();

        let other = dir.path().join("extra.csv");
        fs::write(&other, "two").unwrap();
        assert!(matches!(
            session.ingest_file(&other),
            Err(DictionaryError::InvalidCorpusFile(_))
        ));
        assert!(matches!(
            session.ingest_file(&dir.path().join("absent.txt")),
            Err(DictionaryError::InvalidCorpusFile(_))
        ));

        let extra = dir.path().join("extra.txt");
        fs::write(&extra, "one two").unwrap();
        let stats = session.ingest_file(&extra).unwrap();
        assert_eq!(stats.words_added, 2);
        assert_eq!(stats.new_unique_words, 1);
        assert_eq!(session.stats(), TableSummary { total_words: 3, unique_words: 2 });
        assert_eq!(dictionary.load(Language::English).unwrap(), *session.table());
    }

    #[test]
    fn test_session_reload() {
        let dir = TempDir::new().unwrap();
        let dictionary = setup(&dir);
        write_corpus(&dir, Language::English, "a.txt", "the the the then this cat");
        dictionary.create(Language::English, false).unwrap();
        let mut session = dictionary.open(Language::English).unwrap();
        assert_eq!(session.table().get("the"), Some(3));

        dictionary.save(Language::English, &FrequencyTable::new()).unwrap();
        session.reload().unwrap();
        assert!(session.table().is_empty());
    }
}
