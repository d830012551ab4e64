//! A lemma together with the forms it can take.
//!
//! [`LemmaForms`] keeps a snapshot of the [`Lemma`] it was built from, the
//! language capability that built it, and a map from surface form to
//! [`FormWeight`]. The map is generated lazily and shared between clones
//! until one of them writes to it: every mutation goes through
//! [`LemmaForms::obtain_forms`] or an internal equivalent, which detaches the
//! writer's copy first.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use polylemma::analysis::options::RecognizeOptions;
//! use polylemma::language::LanguageCapability;
//! use polylemma::language::lexicon::LexiconLanguage;
//! use polylemma::lemma_forms::{FormType, LemmaForms};
//!
//! let english: Arc<dyn LanguageCapability> = Arc::new(
//!     LexiconLanguage::from_json_str(r#"{"language": "eng", "entries": [
//!         {"lemma": "cat", "grammar": ["S"], "forms": [
//!             {"text": "cat", "grammar": [["sg"]]},
//!             {"text": "cats", "grammar": [["pl"]]}
//!         ]}
//!     ]}"#)
//!     .unwrap(),
//! );
//!
//! let lemma = english.recognize("Cats", &RecognizeOptions::default()).remove(0);
//! let forms = LemmaForms::from_lemma(&lemma, Arc::clone(&english), FormType::General, true, None);
//!
//! assert_eq!(forms.lemma_text(), "cat");
//! assert_eq!(forms.form(), "cats");
//! assert!(forms.has_exact_form());
//! assert!(forms.has_form("cat"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::analysis::options::{Accept, RecognizeOptions};
use crate::grammar::{GramBitSet, Grammeme, GrammarBunch};
use crate::language::Language;
use crate::language::alphabet;
use crate::language::capability::{LanguageCapability, NormalizeMode};
use crate::lemma::{Lemma, LllLevel, Quality};
use crate::paradigm::decimator::{DecimatorFilter, FormDecimator};
use crate::paradigm::filter::GrammarFilter;
use crate::word_instance::stop_words::StickySide;

/// Surface form -> weight record.
pub type FormMap = BTreeMap<String, FormWeight>;

/// How certain an interpretation of a word is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormType {
    /// Any form of the lemma may match.
    #[default]
    General,
    /// Only the word as written.
    ExactWord,
    /// Exact word forced on a suspicious analysis.
    WeirdExactWord,
    /// Only forms that look like the lemma.
    ExactLemma,
}

impl FormType {
    pub fn is_exact_word(self) -> bool {
        matches!(self, FormType::ExactWord | FormType::WeirdExactWord)
    }

    /// Position in the certainty order; an exact lemma is less certain than
    /// an exact word.
    pub(crate) fn certainty(self) -> u8 {
        match self {
            FormType::General => 0,
            FormType::ExactLemma => 1,
            FormType::ExactWord => 2,
            FormType::WeirdExactWord => 3,
        }
    }
}

/// Outcome of [`LemmaForms::set_form_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetFormTypeResult {
    Ok,
    /// The transition is not possible; nothing changed.
    Failed,
    /// The restriction removed every form; the entry should be dropped.
    MustBeDeleted,
}

/// Weight record of one surface form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FormWeight {
    /// Lower is closer.
    pub weight: u32,
    pub grams: GrammarBunch,
    /// The form is exactly the one analyzed.
    pub is_exact: bool,
}

impl FormWeight {
    pub fn exact() -> Self {
        FormWeight {
            is_exact: true,
            ..Default::default()
        }
    }

    pub fn inexact() -> Self {
        FormWeight::default()
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_grams(mut self, grams: GrammarBunch) -> Self {
        self.grams = grams;
        self
    }

    /// Keeps the smaller weight, unites the grammars and ORs exactness.
    pub fn merge(&mut self, other: &FormWeight) {
        self.weight = self.weight.min(other.weight);
        self.grams.extend(other.grams.iter().copied());
        self.is_exact |= other.is_exact;
    }
}

/// Lower-casing used for synthesized entries, which have no capability.
pub fn normalize_form(text: &str, language: Language) -> String {
    alphabet::to_lower(text, language)
}

/// Feature combinations of a reading: stem with every flex, or the stem alone.
fn reading_grams(stem: GramBitSet, flex: &[GramBitSet]) -> GrammarBunch {
    if flex.is_empty() {
        GrammarBunch::from([stem])
    } else {
        flex.iter().map(|f| stem | *f).collect()
    }
}

/// Merges `weight` into `form`; a form without grammars takes `grams`.
fn insert_form<'m>(
    forms: &'m mut FormMap,
    form: String,
    weight: FormWeight,
    grams: &GrammarBunch,
) -> &'m mut FormWeight {
    let entry = forms
        .entry(form)
        .and_modify(|w| w.merge(&weight))
        .or_insert(weight);
    if entry.grams.is_empty() {
        entry.grams = grams.clone();
    }
    entry
}

fn serialize_forms<S: Serializer>(
    forms: &Option<Arc<FormMap>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match forms {
        Some(forms) => serializer.collect_map(forms.iter()),
        None => serializer.serialize_none(),
    }
}

/// One interpretation of a word: lemma, provenance flags and forms.
#[derive(Debug, Clone, Serialize)]
pub struct LemmaForms {
    #[serde(skip)]
    pub(crate) lemma: Option<Lemma>,
    #[serde(skip)]
    pub(crate) capability: Option<Arc<dyn LanguageCapability>>,
    #[serde(skip)]
    pub(crate) decimator: Option<Arc<FormDecimator>>,

    pub(crate) form: String,
    pub(crate) normalized_form: String,
    pub(crate) form_type: FormType,
    #[serde(rename = "lemma")]
    pub(crate) lemma_text: String,
    pub(crate) language: Language,

    pub(crate) exact_lemma: LllLevel,
    pub(crate) best: bool,
    pub(crate) quality: Quality,
    pub(crate) stop_word: bool,
    pub(crate) stickiness: StickySide,
    /// Built from another entry rather than straight from an analysis.
    pub(crate) overridden: bool,

    pub(crate) stem_grammar: GramBitSet,
    pub(crate) flex_grammars: Vec<GramBitSet>,

    #[serde(serialize_with = "serialize_forms")]
    pub(crate) forms: Option<Arc<FormMap>>,
}

impl LemmaForms {
    /// An entry without a lemma snapshot: foundling quality, not exact,
    /// general form type and an empty form map.
    pub fn plain(form: &str, lemma_text: &str, language: Language) -> Self {
        let form = normalize_form(form, language);
        LemmaForms {
            lemma: None,
            capability: None,
            decimator: None,
            normalized_form: normalize_form(&form, language),
            form,
            form_type: FormType::General,
            lemma_text: lemma_text.to_string(),
            language,
            exact_lemma: LllLevel::No,
            best: false,
            quality: Quality::FOUNDLING,
            stop_word: false,
            stickiness: StickySide::None,
            overridden: false,
            stem_grammar: GramBitSet::empty(),
            flex_grammars: Vec::new(),
            forms: Some(Arc::new(FormMap::new())),
        }
    }

    /// Marks the entry as an exact lemma (and best) or not.
    pub fn with_exact(mut self, is_exact: bool) -> Self {
        self.exact_lemma = if is_exact { LllLevel::Lll } else { LllLevel::No };
        self.best = is_exact;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_form_type(mut self, form_type: FormType) -> Self {
        self.form_type = form_type;
        self
    }

    pub fn with_stem_grammar(mut self, stem: GramBitSet) -> Self {
        self.stem_grammar = stem;
        self
    }

    /// An entry built from an analysis. Forms are generated now when
    /// `generate` is set, otherwise on first use.
    pub fn from_lemma(
        lemma: &Lemma,
        capability: Arc<dyn LanguageCapability>,
        form_type: FormType,
        generate: bool,
        decimator: Option<Arc<FormDecimator>>,
    ) -> Self {
        let exact_lemma = capability.looks_like_lemma(lemma);
        let mut lemma_forms = LemmaForms {
            lemma: Some(lemma.clone()),
            form: capability.to_lower(lemma.initial_form()),
            normalized_form: lemma.normalized_form().to_string(),
            form_type,
            lemma_text: lemma.text().to_string(),
            language: lemma.language(),
            exact_lemma,
            best: exact_lemma != LllLevel::No,
            quality: lemma.quality(),
            stop_word: false,
            stickiness: StickySide::None,
            overridden: false,
            stem_grammar: lemma.stem_gram_set(),
            flex_grammars: lemma.flex_gram_sets(),
            forms: None,
            capability: Some(capability),
            decimator,
        };
        if generate {
            lemma_forms.generate_forms();
        }
        lemma_forms
    }

    /// One surface form of `source` promoted to an entry of its own, whose
    /// lemma is the form itself.
    pub fn from_form_entry(form: &str, weight: &FormWeight, source: &LemmaForms) -> Self {
        let exact_lemma = if source.best && weight.is_exact {
            LllLevel::Lll
        } else {
            LllLevel::No
        };
        let mut forms = FormMap::new();
        forms.insert(form.to_string(), weight.clone());
        LemmaForms {
            lemma: None,
            capability: source.capability.clone(),
            decimator: None,
            form: form.to_string(),
            normalized_form: form.to_string(),
            form_type: source.form_type,
            lemma_text: form.to_string(),
            language: source.language,
            exact_lemma,
            best: exact_lemma != LllLevel::No,
            quality: source.quality,
            stop_word: source.stop_word,
            stickiness: source.stickiness,
            overridden: true,
            stem_grammar: GramBitSet::empty(),
            flex_grammars: Vec::new(),
            forms: Some(Arc::new(forms)),
        }
    }

    /// A language-neutral entry whose only form is `text` itself.
    pub fn make_exact_default(text: &str) -> Self {
        let mut lemma_forms = LemmaForms::plain(text, text, Language::Unknown);
        lemma_forms.add_form_merge(text, FormWeight::exact());
        lemma_forms
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn normalized_form(&self) -> &str {
        &self.normalized_form
    }

    pub fn form_type(&self) -> FormType {
        self.form_type
    }

    pub fn lemma_text(&self) -> &str {
        &self.lemma_text
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn language_version(&self) -> i32 {
        self.lemma.as_ref().map_or(-1, Lemma::language_version)
    }

    /// The analysis this entry was built from, if any.
    pub fn original_lemma(&self) -> Option<&Lemma> {
        self.lemma.as_ref()
    }

    pub fn decimator(&self) -> Option<&Arc<FormDecimator>> {
        self.decimator.as_ref()
    }

    pub fn exact_lemma(&self) -> LllLevel {
        self.exact_lemma
    }

    pub fn is_exact_lemma(&self) -> bool {
        self.exact_lemma != LllLevel::No
    }

    pub fn is_best(&self) -> bool {
        self.best
    }

    pub fn set_best(&mut self, best: bool) {
        self.best = best;
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn is_bastard(&self, quality: Quality) -> bool {
        self.quality.intersects(quality)
    }

    pub fn is_bad_request(&self) -> bool {
        self.lemma
            .as_ref()
            .is_some_and(|lemma| lemma.quality().contains(Quality::BAD_REQUEST))
    }

    /// A guessed analysis whose text is also a dictionary lemma of its
    /// language.
    pub fn is_intrusive_bastard(&self, use_fix_list: bool) -> bool {
        let (Some(lemma), Some(capability)) = (&self.lemma, &self.capability) else {
            return false;
        };
        if !lemma.is_bastard() || lemma.language() == Language::Unknown {
            return false;
        }
        let opt = RecognizeOptions::default()
            .with_accept(Accept::DICTIONARY)
            .with_use_fix_list(use_fix_list);
        capability
            .recognize(lemma.text(), &opt)
            .iter()
            .any(|found| found.text() == lemma.text())
    }

    pub fn is_stop_word(&self) -> bool {
        self.stop_word
    }

    pub fn stickiness(&self) -> StickySide {
        self.stickiness
    }

    /// Clearing the stop-word flag also clears the stickiness.
    pub fn set_stop_word(&mut self, stop_word: bool, stickiness: StickySide) {
        self.stop_word = stop_word;
        self.stickiness = if stop_word { stickiness } else { StickySide::None };
    }

    pub fn stem_grammar(&self) -> GramBitSet {
        self.stem_grammar
    }

    pub fn flex_grammars(&self) -> &[GramBitSet] {
        &self.flex_grammars
    }

    pub fn has_whole_stem_gram(&self, grams: &GramBitSet) -> bool {
        self.stem_grammar.has_all(grams)
    }

    pub fn has_whole_flex_gram(&self, grams: &GramBitSet) -> bool {
        self.flex_grammars.iter().any(|flex| flex.has_all(grams))
    }

    /// Every grammeme of `grams` is in the stem or, for the rest, in one flex.
    pub fn has_whole_gram(&self, grams: &GramBitSet) -> bool {
        let rest = *grams - self.stem_grammar;
        rest.is_empty() || self.has_whole_flex_gram(&rest)
    }

    pub fn has_any_stem_gram(&self, grams: &GramBitSet) -> bool {
        self.stem_grammar.has_any(grams)
    }

    pub fn has_any_flex_gram(&self, grams: &GramBitSet) -> bool {
        self.flex_grammars.iter().any(|flex| flex.has_any(grams))
    }

    pub fn has_any_gram(&self, grams: &GramBitSet) -> bool {
        self.has_any_stem_gram(grams) || self.has_any_flex_gram(grams)
    }

    pub fn has_stem_gram(&self, gram: Grammeme) -> bool {
        self.stem_grammar.contains(gram)
    }

    pub fn has_flex_gram(&self, gram: Grammeme) -> bool {
        self.flex_grammars.iter().any(|flex| flex.contains(gram))
    }

    pub fn has_gram(&self, gram: Grammeme) -> bool {
        self.has_stem_gram(gram) || self.has_flex_gram(gram)
    }

    /// False once the entry was marked as a distortion of the real word.
    pub fn has_normal_form(&self) -> bool {
        !self.stem_grammar.contains(Grammeme::Distort)
    }

    pub fn set_distortion(&mut self) {
        self.stem_grammar.insert(Grammeme::Distort);
    }

    pub fn forms_generated(&self) -> bool {
        self.forms.is_some()
    }

    /// The form map, `None` until generated.
    pub fn forms(&self) -> Option<&FormMap> {
        self.forms.as_deref()
    }

    /// Mutable form map, generating it first when needed. Clones sharing
    /// the map are unaffected by writes through the result.
    pub fn obtain_forms(&mut self) -> &mut FormMap {
        if self.forms.is_none() {
            self.generate_forms();
        }
        Arc::make_mut(self.forms.get_or_insert_with(Default::default))
    }

    pub fn clear_forms(&mut self) {
        self.forms = Some(Arc::new(FormMap::new()));
    }

    /// Drops the form map; it is regenerated on the next
    /// [`obtain_forms`](Self::obtain_forms).
    pub fn discard_forms(&mut self) {
        self.forms = None;
    }

    pub fn num_forms(&self) -> usize {
        debug_assert!(self.forms_generated(), "forms of '{}' not generated", self.lemma_text);
        self.forms.as_ref().map_or(0, |forms| forms.len())
    }

    pub fn has_form(&self, form: &str) -> bool {
        self.forms.as_ref().is_some_and(|forms| forms.contains_key(form))
    }

    /// Whether the analyzed form itself is among the forms.
    pub fn has_exact_form(&self) -> bool {
        self.has_form(&self.normalized_form)
    }

    /// Weight of `form`, 0 when it is not a form of this entry.
    pub fn form_distance(&self, form: &str) -> u32 {
        self.forms
            .as_ref()
            .and_then(|forms| forms.get(form))
            .map_or(0, |weight| weight.weight)
    }

    /// Adds `form`, merging with an existing record.
    pub fn add_form_merge(&mut self, form: &str, weight: FormWeight) -> &mut FormWeight {
        let forms = Arc::make_mut(self.forms.get_or_insert_with(Default::default));
        forms
            .entry(form.to_string())
            .and_modify(|w| w.merge(&weight))
            .or_insert(weight)
    }

    /// Moves the entry to another form type, restricting or regenerating
    /// its forms.
    pub fn set_form_type(&mut self, form_type: FormType) -> SetFormTypeResult {
        if form_type == FormType::WeirdExactWord && self.form_type == FormType::ExactWord {
            return SetFormTypeResult::Failed;
        }
        if form_type == self.form_type {
            return SetFormTypeResult::Ok;
        }
        let narrowing = form_type.is_exact_word()
            || (form_type == FormType::ExactLemma && self.form_type == FormType::General);
        if narrowing {
            self.form_type = form_type;
            let Some(forms) = &self.forms else {
                return SetFormTypeResult::Ok;
            };
            let was_empty = forms.is_empty();
            if self.lemma.is_some() {
                self.restrict_by_lemma();
            } else {
                self.restrict_no_lemma();
            }
            if !was_empty && self.forms.as_ref().is_some_and(|forms| forms.is_empty()) {
                return SetFormTypeResult::MustBeDeleted;
            }
        } else {
            if self.lemma.is_none() {
                return SetFormTypeResult::Failed;
            }
            self.form_type = form_type;
            if self.forms.as_ref().is_some_and(|forms| !forms.is_empty()) {
                self.generate_forms();
            }
        }
        SetFormTypeResult::Ok
    }

    fn generate_forms(&mut self) {
        let forms = Arc::make_mut(self.forms.get_or_insert_with(Default::default));
        let (Some(lemma), Some(capability)) = (&self.lemma, &self.capability) else {
            return;
        };

        let grams = reading_grams(self.stem_grammar, &self.flex_grammars);
        insert_form(
            forms,
            capability.normalize(&self.form, NormalizeMode::Lower),
            FormWeight::exact(),
            &grams,
        );
        insert_form(forms, self.normalized_form.clone(), FormWeight::exact(), &grams);
        insert_form(forms, capability.convert(&self.normalized_form), FormWeight::exact(), &grams);
        if !self.form_type.is_exact_word() {
            insert_form(
                forms,
                capability.normalize(&self.form, NormalizeMode::Converted),
                FormWeight::inexact(),
                &grams,
            );
        }

        let mut filter: Option<Box<dyn GrammarFilter>> = None;
        if self.form_type == FormType::ExactLemma {
            filter = capability.lemma_like_filter(lemma);
            if filter.is_none() {
                return;
            }
        }
        if let Some(decimator) = self.decimator.as_deref() {
            if decimator.good_features(self.language).is_some()
                && decimator.is_applicable(lemma, capability.forms_count(lemma))
            {
                filter = Some(Box::new(DecimatorFilter::new(decimator, self.language, filter)));
            }
        }
        if self.form_type.is_exact_word() {
            return;
        }

        let stem = lemma.stem_gram_set();
        for kit in capability.generate_forms(lemma, filter.as_deref()) {
            let grams = reading_grams(stem, &kit.flex_grammars);
            insert_form(
                forms,
                kit.text(),
                FormWeight::inexact().with_weight(kit.weight),
                &grams,
            );
        }
    }

    /// Keeps the exact forms, plus for an exact lemma the lemma-like ones.
    fn restrict_by_lemma(&mut self) {
        let mut keep: BTreeSet<String> = BTreeSet::new();
        if !self.form_type.is_exact_word() {
            if let (Some(lemma), Some(capability)) = (&self.lemma, &self.capability) {
                keep.insert(capability.normalize(&self.form, NormalizeMode::Converted));
                if let Some(filter) = capability.lemma_like_filter(lemma) {
                    keep.extend(
                        capability
                            .generate_forms(lemma, Some(filter.as_ref()))
                            .map(|kit| kit.text()),
                    );
                }
            }
        }
        if let Some(forms) = self.forms.as_mut() {
            Arc::make_mut(forms).retain(|form, weight| weight.is_exact || keep.contains(form));
        }
    }

    fn restrict_no_lemma(&mut self) {
        let exact_only = self.form_type.is_exact_word()
            || (self.form_type == FormType::ExactLemma && self.is_exact_lemma());
        if !exact_only {
            return;
        }
        if let Some(forms) = self.forms.as_mut() {
            Arc::make_mut(forms).retain(|_, weight| weight.is_exact);
        }
    }
}
