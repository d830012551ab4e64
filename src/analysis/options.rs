//! Options of word analysis and of a single recognition call.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PolylemmaError, Result};
use crate::language::{LangMask, Language};
use crate::lemma::MAX_LEMMAS;

/// Quality tiers a recognition call may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accept(u32);

impl_flag_ops!(Accept);

impl Accept {
    pub const NONE: Accept = Accept(0);
    pub const DICTIONARY: Accept = Accept(0x01);
    pub const SOB: Accept = Accept(0x02);
    pub const BASTARD: Accept = Accept(0x04);
    pub const FOUNDLING: Accept = Accept(0x08);
    pub const FROM_ENGLISH: Accept = Accept(0x10);
    pub const TRANSLIT: Accept = Accept(0x20);

    pub const NATIVE: Accept = Accept(0x01 | 0x02 | 0x04 | 0x08);
}

/// Cumulative acceptance level: each level also accepts the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptLevel {
    Dictionary,
    Sob,
    Bastard,
    Foundling,
}

/// What to do with the literal tail of a word past its last subtoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixPolicy {
    No,
    Only,
    #[default]
    Both,
}

/// How a multitoken may be cut into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultitokenSplit {
    #[default]
    SplitAll,
    SplitAllPossible,
    Wholly,
}

/// Mode of one analyzer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeMode {
    Normal,
    Translit,
    Translate,
}

/// Options of [`analyze_word`](crate::analysis::analyze_word).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeOptions {
    /// Longest compound (in separator segments) considered as one chunk.
    pub max_tokens_in_compound: usize,

    /// Maximum number of transliteration results per chunk.
    pub max_translit_lemmas: usize,

    /// Required-grammar filter, e.g. `S,nom|V,inf`.
    pub required_grammar: String,

    pub suffix: SuffixPolicy,

    pub multitoken_split: MultitokenSplit,

    pub accept_dictionary: LangMask,
    pub accept_sob: LangMask,
    pub accept_bastard: LangMask,
    pub accept_foundling: LangMask,
    pub accept_from_english: LangMask,
    pub accept_translit: LangMask,

    /// Languages whose recognizers may invent quasi-bastards.
    pub generate_quasi_bastards: LangMask,

    /// Produce foundlings for languages without a registered capability.
    pub return_foundling_anyway: bool,

    /// Replace heuristic analyses by the literal surface form.
    pub reset_lemma_to_form: bool,

    /// Analyze the whole multitoken once more as a single unit.
    pub analyze_whole_multitoken: bool,

    pub use_fix_list: bool,

    pub allow_deprecated: bool,

    pub allow_empty_lemma: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            max_tokens_in_compound: 3,
            max_translit_lemmas: 4,
            required_grammar: String::new(),
            suffix: SuffixPolicy::Both,
            multitoken_split: MultitokenSplit::SplitAll,
            accept_dictionary: LangMask::all(),
            accept_sob: LangMask::all(),
            accept_bastard: LangMask::all(),
            accept_foundling: LangMask::all(),
            accept_from_english: LangMask::empty(),
            accept_translit: LangMask::empty(),
            generate_quasi_bastards: LangMask::single(Language::Kazakh)
                | LangMask::single(Language::Turkish),
            return_foundling_anyway: false,
            reset_lemma_to_form: false,
            analyze_whole_multitoken: false,
            use_fix_list: true,
            allow_deprecated: false,
            allow_empty_lemma: true,
        }
    }
}

impl AnalyzeOptions {
    /// Options with an explicit grammar filter, policies and cumulative
    /// acceptance level.
    pub fn new(
        required_grammar: impl Into<String>,
        suffix: SuffixPolicy,
        multitoken_split: MultitokenSplit,
        accept: AcceptLevel,
    ) -> Self {
        AnalyzeOptions {
            required_grammar: required_grammar.into(),
            suffix,
            multitoken_split,
            ..Default::default()
        }
        .with_accept_level(accept)
    }

    /// Preset used when indexing documents.
    pub fn indexer() -> Self {
        AnalyzeOptions {
            multitoken_split: MultitokenSplit::SplitAllPossible,
            return_foundling_anyway: true,
            reset_lemma_to_form: true,
            ..Default::default()
        }
    }

    /// Preset producing every analysis of every chunk.
    pub fn lemmatize_all() -> Self {
        AnalyzeOptions {
            multitoken_split: MultitokenSplit::SplitAllPossible,
            ..Default::default()
        }
    }

    /// Preset used for standalone word checks: suffixed variants only.
    pub fn test_preset() -> Self {
        AnalyzeOptions {
            suffix: SuffixPolicy::Only,
            multitoken_split: MultitokenSplit::SplitAllPossible,
            ..Default::default()
        }
    }

    /// Load a full option set from a JSON file. Missing fields keep their
    /// defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PolylemmaError::config(format!(
                "Failed to read options file '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            PolylemmaError::parse(format!(
                "Failed to parse options JSON from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub fn with_required_grammar(mut self, grammar: impl Into<String>) -> Self {
        self.required_grammar = grammar.into();
        self
    }

    pub fn with_suffix(mut self, suffix: SuffixPolicy) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn with_multitoken_split(mut self, split: MultitokenSplit) -> Self {
        self.multitoken_split = split;
        self
    }

    pub fn with_max_tokens_in_compound(mut self, max: usize) -> Self {
        self.max_tokens_in_compound = max;
        self
    }

    /// Dictionary is always accepted; every other native tier is accepted
    /// for all languages up to `level` and for none past it.
    pub fn with_accept_level(mut self, level: AcceptLevel) -> Self {
        let mask = |needed: AcceptLevel| {
            if level >= needed {
                LangMask::all()
            } else {
                LangMask::empty()
            }
        };
        self.accept_dictionary = LangMask::all();
        self.accept_sob = mask(AcceptLevel::Sob);
        self.accept_bastard = mask(AcceptLevel::Bastard);
        self.accept_foundling = mask(AcceptLevel::Foundling);
        self
    }

    pub fn with_accept_from_english(mut self, langs: LangMask) -> Self {
        self.accept_from_english = langs;
        self
    }

    pub fn with_accept_translit(mut self, langs: LangMask) -> Self {
        self.accept_translit = langs;
        self
    }

    pub fn with_return_foundling_anyway(mut self, value: bool) -> Self {
        self.return_foundling_anyway = value;
        self
    }

    pub fn with_reset_lemma_to_form(mut self, value: bool) -> Self {
        self.reset_lemma_to_form = value;
        self
    }

    pub fn with_analyze_whole_multitoken(mut self, value: bool) -> Self {
        self.analyze_whole_multitoken = value;
        self
    }

    pub fn with_use_fix_list(mut self, value: bool) -> Self {
        self.use_fix_list = value;
        self
    }

    pub fn with_allow_deprecated(mut self, value: bool) -> Self {
        self.allow_deprecated = value;
        self
    }

    pub fn with_allow_empty_lemma(mut self, value: bool) -> Self {
        self.allow_empty_lemma = value;
        self
    }

    /// Native tiers configured for `lang`.
    pub fn native_accept(&self, lang: Language) -> Accept {
        let mut accept = Accept::NONE;
        if self.accept_dictionary.contains(lang) {
            accept |= Accept::DICTIONARY;
        }
        if self.accept_sob.contains(lang) {
            accept |= Accept::SOB;
        }
        if self.accept_bastard.contains(lang) {
            accept |= Accept::BASTARD;
        }
        if self.accept_foundling.contains(lang) {
            accept |= Accept::FOUNDLING;
        }
        accept
    }

    /// Options of one recognition call for `lang` accepting `accept`.
    pub fn recognize_options(&self, lang: Language, accept: Accept) -> RecognizeOptions {
        RecognizeOptions {
            max_lemmas: MAX_LEMMAS,
            accept,
            required_grammar: self.required_grammar.clone(),
            use_fix_list: self.use_fix_list,
            skip_validation: self.analyze_whole_multitoken,
            generate_quasi_bastards: self.generate_quasi_bastards.contains(lang),
            allow_deprecated: self.allow_deprecated,
            allow_empty_lemma: self.allow_empty_lemma,
        }
    }

    /// Options of a transliteration call for `lang`.
    pub fn translit_options(&self, lang: Language) -> TranslitOptions {
        TranslitOptions {
            exact_forms: Accept::NATIVE & !self.native_accept(lang),
            required_grammar: self.required_grammar.clone(),
        }
    }
}

/// Options of one `recognize` call on a language capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizeOptions {
    pub max_lemmas: usize,
    pub accept: Accept,
    pub required_grammar: String,
    pub use_fix_list: bool,
    pub skip_validation: bool,
    pub generate_quasi_bastards: bool,
    pub allow_deprecated: bool,
    pub allow_empty_lemma: bool,
}

impl Default for RecognizeOptions {
    fn default() -> Self {
        Self {
            max_lemmas: MAX_LEMMAS,
            accept: Accept::NATIVE,
            required_grammar: String::new(),
            use_fix_list: true,
            skip_validation: false,
            generate_quasi_bastards: false,
            allow_deprecated: false,
            allow_empty_lemma: true,
        }
    }
}

impl RecognizeOptions {
    pub fn with_accept(mut self, accept: Accept) -> Self {
        self.accept = accept;
        self
    }

    pub fn with_required_grammar(mut self, grammar: impl Into<String>) -> Self {
        self.required_grammar = grammar.into();
        self
    }

    pub fn with_use_fix_list(mut self, value: bool) -> Self {
        self.use_fix_list = value;
        self
    }

    pub fn with_allow_deprecated(mut self, value: bool) -> Self {
        self.allow_deprecated = value;
        self
    }
}

/// Options of a transliteration call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslitOptions {
    /// Tiers for which only exact dictionary forms are acceptable.
    pub exact_forms: Accept,
    pub required_grammar: String,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_defaults() {
        let opt = AnalyzeOptions::default();
        assert_eq!(opt.max_tokens_in_compound, 3);
        assert_eq!(opt.suffix, SuffixPolicy::Both);
        assert_eq!(opt.multitoken_split, MultitokenSplit::SplitAll);
        assert_eq!(opt.native_accept(Language::Russian), Accept::NATIVE);
        assert!(opt.accept_translit.is_empty());
        assert!(opt.generate_quasi_bastards.contains(Language::Turkish));
    }

    #[test]
    fn test_accept_level_cascades() {
        let opt = AnalyzeOptions::new(
            "",
            SuffixPolicy::No,
            MultitokenSplit::Wholly,
            AcceptLevel::Sob,
        );
        let accept = opt.native_accept(Language::English);
        assert!(accept.contains(Accept::DICTIONARY | Accept::SOB));
        assert!(!accept.intersects(Accept::BASTARD | Accept::FOUNDLING));

        let translit = opt.translit_options(Language::English);
        assert_eq!(translit.exact_forms, Accept::BASTARD | Accept::FOUNDLING);
    }

    #[test]
    fn test_presets() {
        let indexer = AnalyzeOptions::indexer();
        assert!(indexer.return_foundling_anyway);
        assert!(indexer.reset_lemma_to_form);
        assert_eq!(indexer.multitoken_split, MultitokenSplit::SplitAllPossible);
        assert_eq!(AnalyzeOptions::test_preset().suffix, SuffixPolicy::Only);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"suffix": "only", "accept_translit": ["rus"], "max_tokens_in_compound": 2}}"#
        )
        .unwrap();

        let opt = AnalyzeOptions::load_from_file(file.path()).unwrap();
        assert_eq!(opt.suffix, SuffixPolicy::Only);
        assert_eq!(opt.max_tokens_in_compound, 2);
        assert!(opt.accept_translit.contains(Language::Russian));
        assert_eq!(opt.accept_dictionary, LangMask::all());

        let err = AnalyzeOptions::load_from_file("/nonexistent/options.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/options.json"));
    }
}
