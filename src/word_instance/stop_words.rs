//! Per-language stop-word lists.
//!
//! A stop word may be "sticky": it attaches to its left or right neighbour
//! (or both) in phrase queries.
//!
//! File format, one word per line, `#` starts a comment:
//! ```text
//! eng the
//! eng of right
//! rus не right
//! tur de left
//! ```
//!
//! # Examples
//!
//! ```
//! use polylemma::language::{LangMask, Language};
//! use polylemma::word_instance::stop_words::{StickySide, StopWords};
//!
//! let stop_words = StopWords::from_text("eng the\neng of right\n").unwrap();
//! let english = LangMask::single(Language::English);
//!
//! assert_eq!(stop_words.lookup("of", english), Some(StickySide::Right));
//! assert_eq!(stop_words.lookup("cat", english), None);
//! ```

use std::path::Path;
use std::str::FromStr;

use ahash::AHashMap;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{PolylemmaError, Result};
use crate::language::{LangMask, Language, alphabet};

/// Neighbour a stop word attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickySide {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl StickySide {
    pub fn union(self, other: StickySide) -> StickySide {
        match (self, other) {
            (StickySide::None, side) | (side, StickySide::None) => side,
            (a, b) if a == b => a,
            _ => StickySide::Both,
        }
    }
}

impl FromStr for StickySide {
    type Err = PolylemmaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(StickySide::None),
            "left" => Ok(StickySide::Left),
            "right" => Ok(StickySide::Right),
            "both" => Ok(StickySide::Both),
            other => Err(PolylemmaError::parse(format!("unknown stickiness '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: AHashMap<(Language, String), StickySide>,
}

impl StopWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PolylemmaError::config(format!(
                "Failed to read stop-word file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let stop_words = Self::from_text(&content).map_err(|e| {
            PolylemmaError::parse(format!(
                "Failed to load stop words from '{}': {}",
                path.display(),
                e
            ))
        })?;
        info!(
            "loaded {} stop words from '{}'",
            stop_words.len(),
            path.display()
        );
        Ok(stop_words)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let mut stop_words = StopWords::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            let (language, word, side) = match fields.as_slice() {
                [language, word] => (*language, *word, "none"),
                [language, word, side] => (*language, *word, *side),
                _ => {
                    return Err(PolylemmaError::parse(format!(
                        "line {}: expected 'language word [stickiness]'",
                        number + 1
                    )));
                }
            };
            let language: Language = language.parse()?;
            stop_words.insert(language, word, side.parse()?);
        }
        Ok(stop_words)
    }

    pub fn insert(&mut self, language: Language, word: &str, side: StickySide) {
        self.words
            .insert((language, alphabet::to_lower(word, language)), side);
    }

    /// Stickiness of `word` as a stop word of any language in `languages`,
    /// `None` when it is not one.
    pub fn lookup(&self, word: &str, languages: LangMask) -> Option<StickySide> {
        let mut found: Option<StickySide> = None;
        for language in languages.iter() {
            let key = (language, alphabet::to_lower(word, language));
            if let Some(side) = self.words.get(&key) {
                found = Some(found.map_or(*side, |f| f.union(*side)));
            }
        }
        found
    }

    pub fn is_stop_word(&self, word: &str, languages: LangMask) -> bool {
        self.lookup(word, languages).is_some()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
