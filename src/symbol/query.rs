//! Definition and completion lookups

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::index::PcdIndex;
use super::SourceSpan;
use crate::document::{Document, Position};

lazy_static! {
    /// A complete PCD name inside arbitrary text
    static ref DEFINITION_TOKEN: Regex = Regex::new(r"Pcd[A-Za-z0-9_]+").unwrap();
    /// A partial PCD name; a bare `Pcd` is accepted
    static ref COMPLETION_TOKEN: Regex = Regex::new(r"Pcd[A-Za-z0-9_]*").unwrap();
}

/// How completion candidates are matched against the typed text
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CompletionMode {
    /// Candidate names start with the typed text
    #[default]
    Prefix,
    /// Candidate names contain the typed text anywhere
    Substring,
}

impl CompletionMode {
    fn matches(&self, candidate: &str, typed: &str) -> bool {
        match self {
            Self::Prefix => candidate.starts_with(typed),
            Self::Substring => candidate.contains(typed),
        }
    }
}

impl std::fmt::Display for CompletionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prefix => write!(f, "prefix"),
            Self::Substring => write!(f, "substring"),
        }
    }
}

impl std::str::FromStr for CompletionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefix" => Ok(Self::Prefix),
            "substring" => Ok(Self::Substring),
            _ => Err(format!("Unknown completion mode: {}", s)),
        }
    }
}

/// First complete PCD name found in `text`
pub fn definition_token(text: &str) -> Option<&str> {
    DEFINITION_TOKEN.find(text).map(|m| m.as_str())
}

/// First (possibly partial) PCD name found in `text`
pub fn completion_token(text: &str) -> Option<&str> {
    COMPLETION_TOKEN.find(text).map(|m| m.as_str())
}

/// Resolve the PCD name in `text` to its declaration
pub fn lookup_definition(index: &PcdIndex, text: &str) -> Option<SourceSpan> {
    let symbol = definition_token(text)?;
    index.get(symbol).map(|entry| entry.span.clone())
}

/// Every indexed symbol that completes the PCD name in `text`, sorted
pub fn lookup_completions(index: &PcdIndex, text: &str, mode: CompletionMode) -> Vec<String> {
    let Some(typed) = completion_token(text) else {
        return Vec::new();
    };

    let mut candidates: Vec<String> = index
        .symbols()
        .filter(|symbol| mode.matches(symbol, typed))
        .map(str::to_string)
        .collect();
    candidates.sort();
    candidates
}

/// The identifier under `position`, if the cursor touches one.
///
/// A cursor right after the last character of a word still selects it.
pub fn word_at(document: &Document, position: Position) -> Option<&str> {
    let text = document.text();
    let bytes = text.as_bytes();
    let offset = document.offset_at(position);

    let mut start = offset;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = offset;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }

    (start < end).then(|| &text[start..end])
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
