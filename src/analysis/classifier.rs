//! Per-subtoken alphabet and case classification.

use crate::analysis::multitoken::{MultiToken, SubToken};
use crate::language::alphabet::{self, CharCategory, classify_case, classify_language};
use crate::language::{LangMask, Language};
use crate::lemma::MAX_INITIAL_LEN;

/// Alphabet languages and case of one subtoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenInfo {
    pub languages: LangMask,
    pub case: CharCategory,
}

/// A multitoken with its lower-cased projections and classification.
///
/// Two projections are kept: a generic one and a Turkish one, where `I`
/// lowers to dotless `ı`. Lower-casing is one character for one character,
/// so subtoken spans are shared by the original text and both projections.
#[derive(Debug, Clone)]
pub struct ClassifiedMultiToken<'a> {
    original: &'a MultiToken,
    generic: String,
    turkish: String,
    info: Vec<TokenInfo>,
    cumulative: TokenInfo,
}

impl<'a> ClassifiedMultiToken<'a> {
    /// Classify `token`; `primary = false` matches the looser secondary
    /// alphabets.
    pub fn new(token: &'a MultiToken, primary: bool) -> Self {
        let chars: Vec<char> = token.text().chars().collect();
        let mut generic: Vec<char> = chars.clone();
        let mut turkish: Vec<char> = chars.clone();
        let mut info = Vec::with_capacity(token.len());

        for subtoken in token.subtokens() {
            let range = subtoken.pos..subtoken.end();
            let text: String = chars[range.clone()].iter().collect();
            for i in range {
                generic[i] = alphabet::lower_char(chars[i], Language::Unknown);
                turkish[i] = alphabet::lower_char(chars[i], Language::Turkish);
            }
            info.push(TokenInfo {
                languages: classify_language(&text, primary),
                case: classify_case(&text),
            });
        }

        let cumulative = TokenInfo {
            languages: info.iter().fold(LangMask::empty(), |acc, t| acc | t.languages),
            case: CharCategory::merge(info.iter().map(|t| t.case)),
        };
        ClassifiedMultiToken {
            original: token,
            generic: generic.into_iter().collect(),
            turkish: turkish.into_iter().collect(),
            info,
            cumulative,
        }
    }

    pub fn original(&self) -> &MultiToken {
        self.original
    }

    pub fn num_tokens(&self) -> usize {
        self.info.len()
    }

    pub fn subtoken(&self, index: usize) -> SubToken {
        self.original.subtokens()[index]
    }

    /// Lower-cased text as seen by `language`.
    pub fn projection(&self, language: Language) -> &str {
        match language {
            Language::Turkish => &self.turkish,
            _ => &self.generic,
        }
    }

    pub fn token_languages(&self, index: usize) -> LangMask {
        self.info[index].languages
    }

    pub fn token_case(&self, index: usize) -> CharCategory {
        self.info[index].case
    }

    /// Union of the subtoken language masks.
    pub fn cumulative_languages(&self) -> LangMask {
        self.cumulative.languages
    }

    pub fn cumulative_case(&self) -> CharCategory {
        self.cumulative.case
    }

    /// Merged case of the subtokens `begin..end`.
    pub fn case_flags(&self, begin: usize, end: usize) -> CharCategory {
        CharCategory::merge(self.info[begin..end].iter().map(|t| t.case))
    }

    /// Projected text from the first to the last of the subtokens
    /// `begin..end`, capped to the initial-form length.
    pub fn span_text(&self, language: Language, begin: usize, end: usize) -> String {
        span(self.projection(language), self.subtoken(begin), self.subtoken(end - 1))
    }

    /// Like [`span_text`](Self::span_text), over the original text.
    pub fn original_span_text(&self, begin: usize, end: usize) -> String {
        span(self.original.text(), self.subtoken(begin), self.subtoken(end - 1))
    }

    /// Text following the subtokens `begin..end` up to the end of the
    /// multitoken, within the initial-form cap counted from `begin`.
    pub fn suffix(&self, language: Language, begin: usize, end: usize) -> String {
        let first = self.subtoken(begin);
        let form_len = (self.subtoken(end - 1).end() - first.pos).min(MAX_INITIAL_LEN);
        let full_len = (self.original.char_len() - first.pos).min(MAX_INITIAL_LEN);
        if full_len <= form_len {
            return String::new();
        }
        self.projection(language)
            .chars()
            .skip(first.pos + form_len)
            .take(full_len - form_len)
            .collect()
    }
}

fn span(text: &str, first: SubToken, last: SubToken) -> String {
    let len = (last.end() - first.pos).min(MAX_INITIAL_LEN);
    text.chars().skip(first.pos).take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projections() {
        let token = MultiToken::from_text("ISTANBUL-Moscow");
        let classified = ClassifiedMultiToken::new(&token, true);
        assert_eq!(classified.projection(Language::English), "istanbul-moscow");
        assert_eq!(classified.projection(Language::Turkish), "ıstanbul-moscow");
        assert_eq!(classified.span_text(Language::Turkish, 0, 1), "ıstanbul");
        assert_eq!(classified.original_span_text(0, 2), "ISTANBUL-Moscow");
    }

    #[test]
    fn test_classification() {
        let token = MultiToken::from_text("Москва-river");
        let classified = ClassifiedMultiToken::new(&token, true);
        assert_eq!(classified.num_tokens(), 2);
        assert!(classified.token_languages(0).contains(Language::Russian));
        assert!(!classified.token_languages(0).contains(Language::English));
        assert!(classified.token_languages(1).contains(Language::English));

        let cumulative = classified.cumulative_languages();
        assert!(cumulative.contains(Language::Russian));
        assert!(cumulative.contains(Language::English));

        assert!(classified.token_case(0).contains(CharCategory::TITLECASE));
        assert!(classified.token_case(1).contains(CharCategory::LOWERCASE));
        assert!(classified.case_flags(0, 2).contains(CharCategory::TITLECASE));
    }

    #[test]
    fn test_suffix() {
        let token = MultiToken::from_text("europa+");
        let classified = ClassifiedMultiToken::new(&token, true);
        assert_eq!(classified.suffix(Language::English, 0, 1), "+");

        let token = MultiToken::from_text("rock-n-roll");
        let classified = ClassifiedMultiToken::new(&token, true);
        assert_eq!(classified.suffix(Language::English, 0, 1), "-n-roll");
        assert_eq!(classified.suffix(Language::English, 0, 3), "");
    }

    #[test]
    fn test_empty() {
        let token = MultiToken::from_text("");
        let classified = ClassifiedMultiToken::new(&token, true);
        assert_eq!(classified.num_tokens(), 0);
        assert!(classified.cumulative_languages().is_empty());
        assert_eq!(classified.cumulative_case(), CharCategory::EMPTY);
    }
}
