//! Raw multitokens: one text with the spans of its subtokens.
//!
//! Offsets and lengths are measured in characters. The gaps between
//! subtokens (hyphens, apostrophes, ...) and the tail after the last
//! subtoken belong to the text but to no subtoken.
//!
//! # Examples
//!
//! ```
//! use polylemma::analysis::MultiToken;
//!
//! let token = MultiToken::from_text("rock-n-roll");
//! assert_eq!(token.len(), 3);
//! assert_eq!(token.subtoken_text(2), "roll");
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{PolylemmaError, Result};

/// Most subtokens one multitoken may hold.
pub const MAX_SUBTOKENS: usize = 63;

/// A subtoken span, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubToken {
    pub pos: usize,
    pub len: usize,
}

impl SubToken {
    pub fn new(pos: usize, len: usize) -> Self {
        SubToken { pos, len }
    }

    pub fn end(&self) -> usize {
        self.pos + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiToken {
    text: String,
    char_len: usize,
    subtokens: Vec<SubToken>,
}

impl MultiToken {
    /// A multitoken with explicit subtoken spans.
    ///
    /// Spans must be non-empty, ordered, non-overlapping and inside the text.
    pub fn new(text: impl Into<String>, subtokens: Vec<SubToken>) -> Result<Self> {
        let text = text.into();
        let char_len = text.chars().count();
        if subtokens.len() > MAX_SUBTOKENS {
            return Err(PolylemmaError::invalid_argument(format!(
                "a multitoken holds at most {MAX_SUBTOKENS} subtokens, got {}",
                subtokens.len()
            )));
        }
        let mut last_end = 0;
        for subtoken in &subtokens {
            if subtoken.len == 0 || subtoken.pos < last_end || subtoken.end() > char_len {
                return Err(PolylemmaError::invalid_argument(format!(
                    "bad subtoken span {}+{} in '{}'",
                    subtoken.pos, subtoken.len, text
                )));
            }
            last_end = subtoken.end();
        }
        Ok(MultiToken {
            text,
            char_len,
            subtokens,
        })
    }

    /// Splits `text` at Unicode word boundaries; every segment starting with
    /// a letter or digit becomes a subtoken.
    ///
    /// Words past [`MAX_SUBTOKENS`] are left to the tail text.
    pub fn from_text(text: &str) -> Self {
        let mut subtokens = Vec::new();
        let mut dropped = 0;
        let mut pos = 0;
        for segment in text.split_word_bounds() {
            let len = segment.chars().count();
            let is_word = segment.chars().next().is_some_and(char::is_alphanumeric);
            if is_word {
                if subtokens.len() < MAX_SUBTOKENS {
                    subtokens.push(SubToken::new(pos, len));
                } else {
                    dropped += 1;
                }
            }
            pos += len;
        }
        if dropped > 0 {
            warn!("'{text}' has {dropped} words past the {MAX_SUBTOKENS} subtoken limit; they stay in the tail");
        }
        MultiToken {
            text: text.to_string(),
            char_len: pos,
            subtokens,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text length in characters.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn subtokens(&self) -> &[SubToken] {
        &self.subtokens
    }

    /// Number of subtokens.
    pub fn len(&self) -> usize {
        self.subtokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subtokens.is_empty() || self.char_len == 0
    }

    pub fn subtoken_text(&self, index: usize) -> String {
        let subtoken = self.subtokens[index];
        self.text
            .chars()
            .skip(subtoken.pos)
            .take(subtoken.len)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        let token = MultiToken::from_text("europa+");
        assert_eq!(token.subtokens(), &[SubToken::new(0, 6)]);
        assert_eq!(token.char_len(), 7);

        let token = MultiToken::from_text("Нью-Йорк");
        assert_eq!(token.len(), 2);
        assert_eq!(token.subtoken_text(0), "Нью");
        assert_eq!(token.subtoken_text(1), "Йорк");

        assert!(MultiToken::from_text("").is_empty());
        assert!(MultiToken::from_text("--").is_empty());
    }

    #[test]
    fn test_new_validates_spans() {
        assert!(MultiToken::new("isn't", vec![SubToken::new(0, 3), SubToken::new(4, 1)]).is_ok());
        assert!(MultiToken::new("abc", vec![SubToken::new(0, 4)]).is_err());
        assert!(MultiToken::new("abc", vec![SubToken::new(1, 0)]).is_err());
        assert!(MultiToken::new("abcd", vec![SubToken::new(2, 2), SubToken::new(0, 1)]).is_err());

        let text = "a-".repeat(MAX_SUBTOKENS + 1);
        let spans = (0..=MAX_SUBTOKENS).map(|i| SubToken::new(2 * i, 1)).collect();
        assert!(MultiToken::new(text, spans).is_err());
    }

    #[test]
    fn test_from_text_caps_subtokens() {
        let text = vec!["w"; MAX_SUBTOKENS + 2].join("-");
        let token = MultiToken::from_text(&text);
        assert_eq!(token.len(), MAX_SUBTOKENS);
        assert_eq!(token.char_len(), text.chars().count());
        assert_eq!(token.subtokens()[MAX_SUBTOKENS - 1], SubToken::new(2 * (MAX_SUBTOKENS - 1), 1));
    }
}
