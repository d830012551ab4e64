//! The per-language capability trait.
//!
//! Everything the analyzer needs from a language goes through
//! [`LanguageCapability`]: recognition, normalization, paradigm generation,
//! compound segmentation and lemma-likeness. Only [`lookup`] is required;
//! the other methods have defaults that describe a language without
//! special rules.
//!
//! [`lookup`]: LanguageCapability::lookup

use std::fmt;

use log::warn;

use crate::analysis::options::{Accept, RecognizeOptions, TranslitOptions};
use crate::language::Language;
use crate::language::alphabet;
use crate::lemma::{Lemma, LemmaSetter, LllLevel, default_looks_like_lemma};
use crate::paradigm::filter::{ClueFilter, GrammarFilter, LemmaLikeFilter};
use crate::paradigm::generator::FormGenerator;
use crate::paradigm::wordform::{WordformKit, default_wordforms};

/// Normalization applied to a surface form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Language-specific lower-casing.
    Lower,
    /// Lower-casing followed by the language's character conversion.
    Converted,
}

pub trait LanguageCapability: Send + Sync + fmt::Debug {
    fn language(&self) -> Language;

    fn name(&self) -> &str {
        self.language().name()
    }

    /// Dictionary version, or -1 when unversioned.
    fn version(&self) -> i32 {
        -1
    }

    /// Raw analyses of an already normalized and converted form.
    ///
    /// Implementations honor `opt.accept` for the dictionary, sob and bastard
    /// tiers; foundlings are synthesized by [`recognize`](Self::recognize).
    fn lookup(&self, converted: &str, opt: &RecognizeOptions) -> Vec<Lemma>;

    /// Full recognition of a surface form.
    fn recognize(&self, text: &str, opt: &RecognizeOptions) -> Vec<Lemma> {
        let normalized = self.normalize(text, NormalizeMode::Lower);
        if !opt.skip_validation && !self.is_valid_word(&normalized) {
            return Vec::new();
        }
        let converted = self.normalize(text, NormalizeMode::Converted);
        let mut lemmas = self.lookup(&converted, opt);

        if !opt.required_grammar.trim().is_empty() {
            match self.grammar_filter(&opt.required_grammar) {
                Some(mut clue) => {
                    lemmas.retain_mut(|lemma| match clue.restrict(lemma) {
                        Some(flex) => {
                            let mut setter = LemmaSetter::new(lemma);
                            setter.clear_flex_grammars();
                            for grammar in flex {
                                setter.add_flex_grammar(grammar);
                            }
                            true
                        }
                        None => false,
                    });
                }
                None => warn!("ignoring malformed required grammar '{}'", opt.required_grammar),
            }
        }
        lemmas.truncate(opt.max_lemmas);

        if lemmas.is_empty() && opt.accept.contains(Accept::FOUNDLING) {
            if !opt.allow_empty_lemma && converted.is_empty() {
                return lemmas;
            }
            lemmas.push(Lemma::foundling(self.language(), &converted));
        }

        let converted_len = converted.chars().count();
        for lemma in &mut lemmas {
            let mut setter = LemmaSetter::new(lemma);
            setter.set_language(self.language());
            setter.set_initial_form(text);
            setter.set_normalized_form(&normalized);
            setter.set_converted_len(converted_len);
        }
        lemmas
    }

    /// Analyses of a word written in another script.
    fn recognize_as_transliteration(
        &self,
        _text: &str,
        _max_lemmas: usize,
        _opt: &TranslitOptions,
    ) -> Vec<Lemma> {
        Vec::new()
    }

    /// Whether every letter of a lower-cased form belongs to the alphabet.
    fn is_valid_word(&self, text: &str) -> bool {
        !text.is_empty() && alphabet::classify_language(text, true).contains(self.language())
    }

    fn to_lower(&self, text: &str) -> String {
        alphabet::to_lower(text, self.language())
    }

    /// Character conversion applied after lower-casing.
    fn convert(&self, text: &str) -> String {
        text.to_string()
    }

    fn normalize(&self, text: &str, mode: NormalizeMode) -> String {
        let lowered = self.to_lower(text);
        match mode {
            NormalizeMode::Lower => lowered,
            NormalizeMode::Converted => self.convert(&lowered),
        }
    }

    /// Raw paradigm entries of a lemma, in paradigm order.
    fn wordforms<'a>(&'a self, lemma: &Lemma) -> Box<dyn Iterator<Item = WordformKit> + 'a> {
        Box::new(default_wordforms(lemma).into_iter())
    }

    fn generate_forms<'a>(
        &'a self,
        lemma: &Lemma,
        filter: Option<&dyn GrammarFilter>,
    ) -> FormGenerator<'a> {
        FormGenerator::new(self.wordforms(lemma), lemma, filter)
    }

    /// Number of distinct forms in the lemma's paradigm.
    fn forms_count(&self, lemma: &Lemma) -> usize {
        self.generate_forms(lemma, None).count()
    }

    /// Whether the gap between two subtokens separates words.
    ///
    /// Positions and lengths are character offsets into `text`.
    fn can_break(
        &self,
        _text: &str,
        _pos1: usize,
        _len1: usize,
        _pos2: usize,
        _len2: usize,
        _is_foreign: bool,
    ) -> bool {
        true
    }

    fn looks_like_lemma(&self, lemma: &Lemma) -> LllLevel {
        default_looks_like_lemma(lemma)
    }

    /// Filter keeping the forms of `lemma` that look like a lemma; `None`
    /// when the lemma itself does not.
    fn lemma_like_filter(&self, lemma: &Lemma) -> Option<Box<dyn GrammarFilter>> {
        match self.looks_like_lemma(lemma) {
            LllLevel::No => None,
            level => Some(Box::new(LemmaLikeFilter::new(level))),
        }
    }

    /// Required-grammar filter for this language, `None` for an empty or
    /// malformed clue.
    fn grammar_filter(&self, required: &str) -> Option<ClueFilter> {
        ClueFilter::parse(required).ok().flatten()
    }
}
