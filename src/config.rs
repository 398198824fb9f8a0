use crate::corpus::TextEncoding;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Source corpora, one subdirectory per language
    pub data_dir: PathBuf,
    // Snapshots
    pub dict_dir: PathBuf,

    // Corpus files
    pub corpus_extension: String,
    pub encodings: Vec<TextEncoding>,

    // Display limits, applied by front ends
    pub max_display_words: usize,
    pub max_search_results: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            dict_dir: PathBuf::from("dictionaries"),
            corpus_extension: "txt".to_string(),
            encodings: TextEncoding::DEFAULT_ORDER.to_vec(),
            max_display_words: 50,
            max_search_results: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            data_dir: std::env::var("FREQDICT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            dict_dir: std::env::var("FREQDICT_DICT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dict_dir),

            corpus_extension: std::env::var("FREQDICT_EXTENSION")
                .map(|ext| ext.trim_start_matches('.').to_string())
                .unwrap_or(defaults.corpus_extension),
            encodings: match std::env::var("FREQDICT_ENCODINGS") {
                Ok(list) => parse_encodings(&list).context("FREQDICT_ENCODINGS is invalid")?,
                Err(_) => defaults.encodings,
            },

            max_display_words: std::env::var("FREQDICT_MAX_DISPLAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_display_words),
            max_search_results: std::env::var("FREQDICT_MAX_SEARCH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_search_results),
        })
    }
}

/// Parses a comma-separated, priority-ordered list of encoding labels.
pub fn parse_encodings(list: &str) -> Result<Vec<TextEncoding>> {
    let encodings = list
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(|label| label.parse::<TextEncoding>().map_err(|e| anyhow!(e)))
        .collect::<Result<Vec<_>>>()?;
    if encodings.is_empty() {
        return Err(anyhow!("at least one encoding is required"));
    }
    Ok(encodings)
}
