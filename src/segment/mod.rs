use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::core::error::ConfigError;
use crate::core::traits::Segmenter;
use crate::core::types::Token;
use crate::script::classifier::{is_hiragana, is_katakana};

const BUNDLED_READINGS: &str = include_str!("../../data/readings.json");

/// Longest-match segmenter over a surface → reading dictionary.
///
/// Characters no entry covers are grouped into unread tokens, so unknown kanji
/// survive the reduction and are caught by re-classification.
#[derive(Debug, Clone, Default)]
pub struct DictionarySegmenter {
    entries: IndexMap<String, String>,
    max_surface_chars: usize,
}

impl DictionarySegmenter {
    pub fn new<I, S, R>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, R)>,
        S: Into<String>,
        R: Into<String>,
    {
        let mut segmenter = Self::default();
        for (surface, reading) in entries {
            segmenter.insert(surface.into(), reading.into());
        }
        segmenter
    }

    /// Dictionary shipped with the crate (`data/readings.json`).
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json_str(BUNDLED_READINGS, "bundled")
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|error| ConfigError::Dictionary {
            path: path.display().to_string(),
            reason: error.to_string(),
        })?;
        Self::from_json_str(&raw, &path.display().to_string())
    }

    /// Parses a flat JSON object mapping surface forms to kana readings.
    pub fn from_json_str(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        let entries: IndexMap<String, String> =
            serde_json::from_str(raw).map_err(|error| ConfigError::Dictionary {
                path: origin.to_string(),
                reason: error.to_string(),
            })?;

        if let Some((surface, reading)) = entries.iter().find(|(surface, reading)| {
            surface.is_empty()
                || reading.is_empty()
                || !reading.chars().all(|ch| is_hiragana(ch) || is_katakana(ch))
        }) {
            return Err(ConfigError::Dictionary {
                path: origin.to_string(),
                reason: format!("entry {surface:?} has invalid reading {reading:?}"),
            });
        }

        let segmenter = Self::new(entries);
        debug!(origin, entries = segmenter.len(), "loaded reading dictionary");
        Ok(segmenter)
    }

    pub fn insert(&mut self, surface: String, reading: String) {
        self.max_surface_chars = self.max_surface_chars.max(surface.chars().count());
        self.entries.insert(surface, reading);
    }

    /// Adds every entry of `other`; its readings win on conflicts.
    pub fn merge(&mut self, other: DictionarySegmenter) {
        for (surface, reading) in other.entries {
            self.insert(surface, reading);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn longest_match(&self, chars: &[char]) -> Option<(usize, &str)> {
        let longest = self.max_surface_chars.min(chars.len());
        (1..=longest).rev().find_map(|length| {
            let candidate: String = chars[..length].iter().collect();
            self.entries
                .get(&candidate)
                .map(|reading| (length, reading.as_str()))
        })
    }
}

impl Segmenter for DictionarySegmenter {
    fn segment(&self, text: &str) -> Vec<Token> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut unread = String::new();
        let mut index = 0;

        while index < chars.len() {
            match self.longest_match(&chars[index..]) {
                Some((length, reading)) => {
                    if !unread.is_empty() {
                        tokens.push(Token::unread(std::mem::take(&mut unread)));
                    }
                    let surface: String = chars[index..index + length].iter().collect();
                    tokens.push(Token::read(surface, reading));
                    index += length;
                }
                None => {
                    unread.push(chars[index]);
                    index += 1;
                }
            }
        }

        if !unread.is_empty() {
            tokens.push(Token::unread(unread));
        }
        tokens
    }
}
