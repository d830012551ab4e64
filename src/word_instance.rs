//! Every interpretation of one surface word.
//!
//! A [`WordInstance`] runs the word analyzer on a single word, wraps each
//! resulting lemma in a [`LemmaForms`] and keeps them together with the
//! word's normalized form, case flags and languages. Entries dropped later
//! (for example when a language is filtered out) are not forgotten: they
//! move to a redundant list that query builders may still consult.
//!
//! Post-processing steps live in [`update::WordInstanceUpdate`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use polylemma::language::lexicon::LexiconLanguage;
//! use polylemma::language::{Language, LanguageRegistry};
//! use polylemma::lemma_forms::FormType;
//! use polylemma::word_instance::{LanguageContext, WordInstance};
//!
//! let english = LexiconLanguage::from_json_str(
//!     r#"{"language": "eng", "entries": [{"lemma": "cat", "grammar": ["S"], "forms": [
//!         {"text": "cat", "grammar": [["sg"]]},
//!         {"text": "cats", "grammar": [["pl"]]}
//!     ]}]}"#,
//! )
//! .unwrap();
//! let mut registry = LanguageRegistry::new();
//! registry.register(Arc::new(english));
//! let context = LanguageContext::new(Arc::new(registry));
//!
//! let mut word = WordInstance::new();
//! word.init("Cats", &context, FormType::General, true, true).unwrap();
//!
//! assert_eq!(word.form(), "cats");
//! assert!(word.has_lemma("cat"));
//! assert!(word.lang_mask().contains(Language::English));
//! ```

pub mod context;
pub mod stop_words;
pub mod update;

use std::sync::Arc;

use serde::Serialize;

use crate::analysis::options::{AcceptLevel, AnalyzeOptions, MultitokenSplit, SuffixPolicy};
use crate::analysis::{MultiToken, SubToken, analyze_word};
use crate::error::Result;
use crate::grammar::Grammeme;
use crate::language::alphabet::{self, CharCategory};
use crate::language::{LangMask, Language};
use crate::lemma::{Lemma, LemmaSetter, Quality};
use crate::lemma_forms::{FormType, LemmaForms, SetFormTypeResult, normalize_form};
use crate::paradigm::decimator::FormDecimator;

pub use context::LanguageContext;
pub use stop_words::{StickySide, StopWords};
pub use update::WordInstanceUpdate;

/// Expected number of interpretations of one word.
const LEMMAS_HINT: usize = 16;

#[derive(Debug, Clone, Serialize)]
pub struct WordInstance {
    /// The word as asked, lower-cased.
    form: String,
    normalized_form: String,
    token_count: usize,
    lemmas: Vec<LemmaForms>,
    redundant_lemmas: Vec<LemmaForms>,
    lang_mask: LangMask,
    case_flags: CharCategory,
}

impl Default for WordInstance {
    fn default() -> Self {
        Self::new()
    }
}

/// A leading digit makes a word untitled.
fn fix_case_flags(form: &str, case_flags: &mut CharCategory) {
    if form.chars().next().is_some_and(|c| c.is_numeric()) {
        case_flags.remove(CharCategory::TITLECASE);
    }
}

impl WordInstance {
    pub fn new() -> Self {
        WordInstance {
            form: String::new(),
            normalized_form: String::new(),
            token_count: 1,
            lemmas: Vec::with_capacity(LEMMAS_HINT),
            redundant_lemmas: Vec::new(),
            lang_mask: LangMask::empty(),
            case_flags: CharCategory::default(),
        }
    }

    fn clear(&mut self) {
        self.form.clear();
        self.normalized_form.clear();
        self.token_count = 1;
        self.lemmas.clear();
        self.redundant_lemmas.clear();
        self.lang_mask = LangMask::empty();
        self.case_flags = CharCategory::default();
    }

    fn set_normalized_form(&mut self, word: &str) {
        self.case_flags = alphabet::classify_case(word);
        self.form = alphabet::to_lower(word, Language::Unknown);
        self.normalized_form = normalize_form(&self.form, Language::Unknown);
        fix_case_flags(&self.form, &mut self.case_flags);
    }

    /// Analyzes the whole of `word` as a single token and collects every
    /// lemma. See [`init_span`](Self::init_span).
    pub fn init(
        &mut self,
        word: &str,
        context: &LanguageContext,
        form_type: FormType,
        generate: bool,
        use_fix_list: bool,
    ) -> Result<()> {
        let span = SubToken::new(0, word.chars().count());
        self.init_span(word, span, context, form_type, generate, use_fix_list)
    }

    /// Analyzes the `span` of `word` as a single token and collects every
    /// lemma. Text after the span is kept as a suffix of the lemmas.
    ///
    /// Lemmas of the context's disabled languages are demoted to foundlings.
    /// Forms are generated now when `generate` is set.
    pub fn init_span(
        &mut self,
        word: &str,
        span: SubToken,
        context: &LanguageContext,
        form_type: FormType,
        generate: bool,
        use_fix_list: bool,
    ) -> Result<()> {
        self.clear();
        self.set_normalized_form(word);
        self.token_count = 1;
        if word.is_empty() {
            return Ok(());
        }

        let token = MultiToken::new(word, vec![span])?;
        let mut opt = AnalyzeOptions::new(
            "",
            SuffixPolicy::Only,
            MultitokenSplit::SplitAllPossible,
            AcceptLevel::Foundling,
        )
        .with_use_fix_list(use_fix_list)
        .with_allow_deprecated(context.allow_deprecated());
        opt.accept_translit |= context.translit_languages();

        let mut lemmas = analyze_word(
            context.registry(),
            &token,
            context.lang_mask(),
            context.priority(),
            &opt,
        )?;

        for lemma in &mut lemmas {
            if context.disabled_languages().contains(lemma.language()) {
                let quality = Quality::FOUNDLING | Quality::DISABLED | (lemma.quality() & Quality::FIX);
                LemmaSetter::new(lemma).set_quality(quality);
            }
        }
        context.decimator().decimate_lemmas(&mut lemmas);

        for (i, lemma) in lemmas.iter().enumerate() {
            self.add_lemma(lemma, context, form_type, generate);
            if i == 0 {
                self.form = alphabet::to_lower(lemma.initial_form(), Language::Unknown);
                self.normalized_form = normalize_form(&self.form, Language::Unknown);
                self.case_flags = lemma.case_flags();
            } else {
                self.case_flags |= lemma.case_flags();
            }
        }
        fix_case_flags(&self.form, &mut self.case_flags);
        Ok(())
    }

    /// Builds the instance from lemmas analyzed elsewhere; the form comes
    /// from the first one and the token count is the widest span.
    pub fn init_from_lemmas(
        &mut self,
        lemmas: &[Lemma],
        context: &LanguageContext,
        form_type: FormType,
        generate: bool,
    ) {
        self.clear();
        let Some(first) = lemmas.first() else {
            return;
        };
        self.form = alphabet::to_lower(first.initial_form(), Language::Unknown);
        self.normalized_form = normalize_form(&self.form, Language::Unknown);
        self.case_flags = first.case_flags();

        for lemma in lemmas {
            self.add_lemma(lemma, context, form_type, generate);
            self.case_flags |= lemma.case_flags();
            self.token_count = self.token_count.max(lemma.token_span());
        }
        fix_case_flags(&self.form, &mut self.case_flags);
    }

    fn add_lemma(
        &mut self,
        lemma: &Lemma,
        context: &LanguageContext,
        form_type: FormType,
        generate: bool,
    ) {
        let language = lemma.language();
        self.lang_mask.insert(language);
        let mut lemma_forms = LemmaForms::from_lemma(
            lemma,
            Arc::clone(context.registry().get(language)),
            form_type,
            generate,
            Some(Arc::clone(context.decimator())),
        );
        if language != Language::Unknown {
            if let Some(side) = context
                .stop_words()
                .lookup(lemma_forms.normalized_form(), LangMask::single(language))
            {
                lemma_forms.set_stop_word(true, side);
            }
        }
        self.lemmas.push(lemma_forms);
    }

    /// Adds an entry without analysis. The first entry of an empty instance
    /// also sets its form.
    pub fn add_plain_lemma(&mut self, lemma: &str, language: Language, stop_word: bool) {
        if self.form.is_empty() {
            self.set_normalized_form(lemma);
        }
        self.lang_mask.insert(language);
        let mut lemma_forms = LemmaForms::plain(&self.form, lemma, language);
        if stop_word {
            lemma_forms.set_stop_word(true, StickySide::None);
        }
        self.lemmas.push(lemma_forms);
    }

    pub fn add_lemma_forms(&mut self, lemma_forms: LemmaForms) -> &mut LemmaForms {
        if self.form.is_empty() {
            let form = lemma_forms.normalized_form().to_string();
            self.set_normalized_form(&form);
        }
        self.lang_mask.insert(lemma_forms.language());
        self.lemmas.push(lemma_forms);
        let last = self.lemmas.len() - 1;
        &mut self.lemmas[last]
    }

    /// Generates the forms of every entry, redundant ones included, and
    /// decimates them with `decimator` unless it is the one they were
    /// built with.
    pub fn generate_all_forms(&mut self, decimator: Option<&Arc<FormDecimator>>) {
        for lemma in self.lemmas.iter_mut().chain(self.redundant_lemmas.iter_mut()) {
            lemma.obtain_forms();
            if let Some(decimator) = decimator {
                let own = lemma.decimator().is_some_and(|d| Arc::ptr_eq(d, decimator));
                if !own {
                    decimator.decimate_forms(lemma);
                }
            }
        }
    }

    /// Whether every entry of `languages` has one of the `quality` bits.
    /// An empty mask selects the language-neutral entries.
    pub fn is_bastard(&self, quality: Quality, languages: LangMask) -> bool {
        self.lemmas
            .iter()
            .filter(|lemma| {
                if languages.is_empty() {
                    lemma.language() == Language::Unknown
                } else {
                    languages.contains(lemma.language())
                }
            })
            .all(|lemma| lemma.is_bastard(quality))
    }

    pub fn clean_best_flag(&mut self) {
        for lemma in &mut self.lemmas {
            lemma.set_best(false);
        }
    }

    pub fn set_stop_word(&mut self, stop_word: bool, stickiness: StickySide) {
        for lemma in &mut self.lemmas {
            lemma.set_stop_word(stop_word, stickiness);
        }
    }

    /// Union of the stickiness of the stop-word entries, `None` when no
    /// entry is a stop word.
    pub fn stop_word(&self) -> Option<StickySide> {
        self.lemmas
            .iter()
            .filter(|lemma| lemma.is_stop_word())
            .map(LemmaForms::stickiness)
            .reduce(StickySide::union)
    }

    pub fn is_stop_word(&self) -> bool {
        self.stop_word().is_some()
    }

    /// Moves every entry to `form_type`, dropping those left without forms.
    /// Returns false if any transition failed.
    pub fn set_form_type(&mut self, form_type: FormType) -> bool {
        let had_lemmas = !self.lemmas.is_empty();
        let mut ok = true;
        for i in (0..self.lemmas.len()).rev() {
            if self.set_form_type_or_erase(i, form_type) == SetFormTypeResult::Failed {
                ok = false;
            }
        }
        debug_assert!(!had_lemmas || !self.lemmas.is_empty());
        ok
    }

    /// The least certain form type among the entries.
    pub fn form_type(&self) -> FormType {
        self.lemmas
            .iter()
            .map(LemmaForms::form_type)
            .min_by_key(|form_type| form_type.certainty())
            .unwrap_or_default()
    }

    pub fn set_form_type_or_erase(&mut self, index: usize, form_type: FormType) -> SetFormTypeResult {
        let result = self.lemmas[index].set_form_type(form_type);
        if result == SetFormTypeResult::MustBeDeleted {
            self.lemmas.remove(index);
        }
        result
    }

    /// Removes entry `index`; it survives as an exact-word redundant entry
    /// when its forms allow it.
    pub(crate) fn redund_lemma(&mut self, index: usize) {
        let mut lemma = self.lemmas.remove(index);
        let keep = !lemma.forms_generated() || lemma.has_exact_form();
        if keep && lemma.set_form_type(FormType::ExactWord) != SetFormTypeResult::MustBeDeleted {
            lemma.set_best(false);
            self.redundant_lemmas.push(lemma);
        }
    }

    pub fn has_lemma(&self, lemma: &str) -> bool {
        self.lemmas.iter().any(|l| l.lemma_text() == lemma)
    }

    pub fn has_form_generated(&self, form: &str) -> bool {
        self.lemmas
            .iter()
            .any(|l| l.forms_generated() && l.has_form(form))
    }

    pub fn has_gram(&self, gram: Grammeme) -> bool {
        self.lemmas.iter().any(|l| l.has_gram(gram))
    }

    pub fn forms_generated(&self) -> bool {
        self.lemmas
            .iter()
            .chain(self.redundant_lemmas.iter())
            .all(LemmaForms::forms_generated)
    }

    pub fn discard_forms(&mut self) {
        for lemma in self.lemmas.iter_mut().chain(self.redundant_lemmas.iter_mut()) {
            lemma.discard_forms();
        }
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn normalized_form(&self) -> &str {
        &self.normalized_form
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn lemmas(&self) -> &[LemmaForms] {
        &self.lemmas
    }

    pub fn lemmas_mut(&mut self) -> &mut [LemmaForms] {
        &mut self.lemmas
    }

    pub fn redundant_lemmas(&self) -> &[LemmaForms] {
        &self.redundant_lemmas
    }

    pub fn num_lemmas(&self) -> usize {
        self.lemmas.len()
    }

    pub fn lang_mask(&self) -> LangMask {
        self.lang_mask
    }

    pub fn case_flags(&self) -> CharCategory {
        self.case_flags
    }

    pub fn add_case(&mut self, flags: CharCategory) -> CharCategory {
        self.case_flags |= flags;
        self.case_flags
    }

    pub fn sub_case(&mut self, flags: CharCategory) -> CharCategory {
        self.case_flags.remove(flags);
        self.case_flags
    }
}
