// File: src/corpus.rs
//! Corpus file reading with encoding fallback.

use crate::error::{DictionaryError, Result};
use encoding_rs::{WINDOWS_1251, WINDOWS_1252};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A text encoding the reader may try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Cp1251,
    Latin1,
    Cp1252,
}

impl TextEncoding {
    pub const DEFAULT_ORDER: [TextEncoding; 4] = [
        TextEncoding::Utf8,
        TextEncoding::Cp1251,
        TextEncoding::Latin1,
        TextEncoding::Cp1252,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Cp1251 => "cp1251",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Cp1252 => "cp1252",
        }
    }

    /// Bytes the code page leaves unassigned. encoding_rs maps these to C1
    /// controls, so they are rejected up front to keep decoding strict.
    fn undefined_bytes(&self) -> &'static [u8] {
        match self {
            TextEncoding::Cp1251 => &[0x98],
            TextEncoding::Cp1252 => &[0x81, 0x8D, 0x8F, 0x90, 0x9D],
            TextEncoding::Utf8 | TextEncoding::Latin1 => &[],
        }
    }

    /// Decodes the whole buffer, or `None` if any byte sequence is invalid.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        let undefined = self.undefined_bytes();
        if bytes.iter().any(|b| undefined.contains(b)) {
            return None;
        }
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Cp1251 => WINDOWS_1251
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            TextEncoding::Cp1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "cp1251" | "windows-1251" => Ok(TextEncoding::Cp1251),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            "cp1252" | "windows-1252" => Ok(TextEncoding::Cp1252),
            other => Err(format!("unknown encoding '{}'", other)),
        }
    }
}

/// The decoded content of one corpus file.
#[derive(Debug, Clone)]
pub struct CorpusText {
    pub path: PathBuf,
    pub encoding: TextEncoding,
    pub text: String,
}

impl CorpusText {
    /// Lines split on `\n`, with a trailing `\r` dropped.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Reads whole files, trying encodings in a fixed priority order.
#[derive(Debug, Clone)]
pub struct CorpusReader {
    encodings: Vec<TextEncoding>,
}

impl Default for CorpusReader {
    fn default() -> Self {
        Self::new(TextEncoding::DEFAULT_ORDER.to_vec())
    }
}

impl CorpusReader {
    pub fn new(encodings: Vec<TextEncoding>) -> Self {
        Self { encodings }
    }

    /// Reads `path` with the first encoding that decodes the entire file.
    pub fn read(&self, path: &Path) -> Result<CorpusText> {
        let bytes = fs::read(path).map_err(|e| DictionaryError::UnreadableFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.decode(path, &bytes)
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<CorpusText> {
        for &encoding in &self.encodings {
            if let Some(text) = encoding.decode(bytes) {
                tracing::debug!(path = %path.display(), %encoding, "decoded corpus file");
                return Ok(CorpusText {
                    path: path.to_path_buf(),
                    encoding,
                    text,
                });
            }
        }
        let tried: Vec<&str> = self.encodings.iter().map(TextEncoding::label).collect();
        Err(DictionaryError::UnreadableFile {
            path: path.to_path_buf(),
            reason: format!("no encoding matched (tried {})", tried.join(", ")),
        })
    }
}
