//! Post-processing of a [`WordInstance`]'s lemma lists.
//!
//! [`WordInstanceUpdate`] borrows an instance mutably and offers the steps a
//! query or indexing pipeline applies after analysis: choosing the best
//! languages, dropping or flattening entries, repairing exact-lemma entries
//! and replacing fix-list placeholders by the dictionary analyses they stand
//! for.

use std::collections::BTreeSet;
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use crate::analysis::options::{Accept, AcceptLevel, AnalyzeOptions, MultitokenSplit, SuffixPolicy};
use crate::analysis::{MultiToken, SubToken, analyze_word};
use crate::error::Result;
use crate::language::alphabet;
use crate::language::{LangMask, Language};
use crate::lemma::{LllLevel, MAX_WORD_LEN, Quality};
use crate::lemma_forms::{FormType, FormWeight, LemmaForms, normalize_form};
use crate::word_instance::{LanguageContext, WordInstance};

/// Coarse rank used when choosing the best languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    None,
    Foundling,
    Bastard,
    Good,
}

impl Rank {
    fn of(quality: Quality) -> Rank {
        if quality.intersects(Quality::BASTARD | Quality::SOB) {
            Rank::Bastard
        } else if quality.intersects(Quality::FOUNDLING) {
            Rank::Foundling
        } else {
            Rank::Good
        }
    }
}

fn cut_word(text: &str) -> String {
    text.chars().take(MAX_WORD_LEN).collect()
}

fn normalize_unicode(text: &str) -> String {
    text.nfc().collect()
}

fn forms_len(lemma: &LemmaForms) -> usize {
    lemma.forms().map_or(0, |forms| forms.len())
}

fn selected(lemma: &LemmaForms, languages: LangMask, bastards_only: bool, bastard: Quality) -> bool {
    languages.contains(lemma.language()) && (!bastards_only || lemma.quality().intersects(bastard))
}

/// Replaces the selected entries of `lemmas` by one entry per form, then
/// orders the list by lemma text.
fn flatten_lemmas(lemmas: &mut Vec<LemmaForms>, languages: LangMask, bastards_only: bool) {
    let bastard = Quality::BASTARD | Quality::SOB;
    let num_forms: usize = lemmas
        .iter()
        .filter(|lm| selected(lm, languages, bastards_only, bastard))
        .map(forms_len)
        .sum();
    if num_forms == 0 {
        return;
    }

    let mut flattened = Vec::with_capacity(num_forms);
    for lm in lemmas.iter().rev() {
        if !selected(lm, languages, bastards_only, bastard) {
            continue;
        }
        for (form, weight) in lm.forms().into_iter().flatten() {
            flattened.push(LemmaForms::from_form_entry(form, weight, lm));
        }
    }

    let mut result: Vec<LemmaForms> = lemmas
        .drain(..)
        .filter(|lm| !selected(lm, languages, bastards_only, bastard))
        .collect();
    result.extend(flattened);
    result.sort_by(|a, b| a.lemma_text().cmp(b.lemma_text()));
    *lemmas = result;
}

/// Collapses the selected entries of each language into one entry whose
/// lemma is the word itself.
fn shrink_lemmas(lemmas: &mut Vec<LemmaForms>, form: &str, languages: LangMask, bastards_only: bool) {
    let normalized = normalize_form(form, Language::Unknown);
    let mut shrunk: Vec<LemmaForms> = Vec::new();
    for i in (0..lemmas.len()).rev() {
        let lm = &lemmas[i];
        if !selected(lm, languages, bastards_only, Quality::BASTARD)
            || lm.quality().intersects(Quality::AUTOMORPHOLOGY)
        {
            continue;
        }
        let lm = lemmas.remove(i);
        let language = lm.language();
        let target = match shrunk.iter().position(|s| s.language() == language) {
            Some(pos) => {
                let target = &mut shrunk[pos];
                target.set_best(target.is_best() || lm.is_best());
                if !target.is_stop_word() {
                    target.set_stop_word(lm.is_stop_word(), lm.stickiness());
                }
                target
            }
            None => {
                let mut entry = LemmaForms::plain(form, &normalized, language)
                    .with_exact(lm.is_best())
                    .with_quality(lm.quality())
                    .with_form_type(lm.form_type());
                entry.set_stop_word(lm.is_stop_word(), lm.stickiness());
                shrunk.push(entry);
                let last = shrunk.len() - 1;
                &mut shrunk[last]
            }
        };
        target.add_form_merge(&normalize_form(form, language), FormWeight::exact());
        target.add_form_merge(&normalize_form(lm.form(), language), FormWeight::exact());
    }
    lemmas.extend(shrunk);
}

/// Adds a single-form entry unless the list already has `lemma` in
/// `language`.
fn insert_form(lemmas: &mut Vec<LemmaForms>, form: &str, lemma: &str, language: Language) {
    if lemmas
        .iter()
        .any(|lm| lm.lemma_text() == lemma && lm.language() == language)
    {
        return;
    }
    let form = cut_word(form);
    let mut entry = LemmaForms::plain(&form, lemma, language);
    entry.add_form_merge(&form, FormWeight::exact());
    lemmas.push(entry);
}

/// Removes from `languages` those of `lemmas`; true once nothing is left.
fn subtract_languages(languages: &mut LangMask, lemmas: &[LemmaForms]) -> bool {
    for lm in lemmas {
        if languages.is_empty() {
            break;
        }
        languages.remove(lm.language());
    }
    languages.is_empty()
}

/// Dictionary analyses of the forms of a fix-list entry, merged by lemma.
fn real_nodes_of(context: &LanguageContext, orig: &LemmaForms, result: &mut Vec<LemmaForms>) {
    let language = orig.language();
    if !context.registry().contains(language) {
        if let Some(lemma) = orig.original_lemma() {
            result.push(LemmaForms::from_lemma(
                lemma,
                Arc::clone(context.registry().get(language)),
                FormType::General,
                true,
                None,
            ));
        }
        return;
    }

    let capability = context.registry().base(language);
    let analyze = AnalyzeOptions::new(
        "",
        SuffixPolicy::Only,
        MultitokenSplit::SplitAllPossible,
        AcceptLevel::Foundling,
    )
    .with_use_fix_list(false);
    let opt = analyze.recognize_options(language, Accept::NATIVE);

    for (form, weight) in orig.forms().into_iter().flatten() {
        for lemma in capability.recognize(form, &opt) {
            let pos = result
                .iter()
                .position(|lm| lm.lemma_text() == lemma.text() && lm.language() == language);
            let node = match pos {
                Some(pos) => &mut result[pos],
                None => {
                    let mut node = LemmaForms::plain(orig.form(), lemma.text(), language)
                        .with_exact(capability.looks_like_lemma(&lemma) != LllLevel::No)
                        .with_quality(Quality::DICTIONARY)
                        .with_form_type(orig.form_type());
                    node.overridden = true;
                    result.push(node);
                    let last = result.len() - 1;
                    &mut result[last]
                }
            };
            node.add_form_merge(form, weight.clone());
            if orig.is_stop_word() {
                node.set_stop_word(true, orig.stickiness());
            }
        }
    }
}

/// Real nodes of the fix-list analyses of `form` in `language`, with the
/// total number of forms of those analyses.
pub fn generate_real_nodes(
    context: &LanguageContext,
    language: Language,
    form: &str,
) -> (Vec<LemmaForms>, usize) {
    let mut word = WordInstance::new();
    if let Err(e) = word.init(form, context, FormType::General, true, true) {
        warn!("cannot analyze fix-list form '{form}': {e}");
        return (Vec::new(), 0);
    }
    let mut result = Vec::new();
    let mut forms_count = 0;
    for lf in word.lemmas().iter().rev() {
        if !lf.quality().intersects(Quality::FIX) || lf.language() != language {
            continue;
        }
        forms_count += forms_len(lf);
        real_nodes_of(context, lf, &mut result);
    }
    (result, forms_count)
}

/// Mutating view over a [`WordInstance`].
///
/// # Examples
///
/// ```
/// use polylemma::language::{LangMask, Language};
/// use polylemma::lemma_forms::{FormWeight, LemmaForms};
/// use polylemma::word_instance::{WordInstance, WordInstanceUpdate};
///
/// let mut word = WordInstance::new();
/// let mut entry = LemmaForms::plain("dogs", "dog", Language::English);
/// entry.add_form_merge("dogs", FormWeight::exact());
/// word.add_lemma_forms(entry);
/// word.add_plain_lemma("dogs", Language::German, false);
///
/// let left = WordInstanceUpdate::new(&mut word).filter_lemmas(LangMask::single(Language::German));
/// assert_eq!(left, LangMask::single(Language::English));
/// assert_eq!(word.num_lemmas(), 1);
/// ```
#[derive(Debug)]
pub struct WordInstanceUpdate<'a> {
    wi: &'a mut WordInstance,
}

impl<'a> WordInstanceUpdate<'a> {
    pub fn new(wi: &'a mut WordInstance) -> Self {
        WordInstanceUpdate { wi }
    }

    /// Languages whose entries are all outranked by a best entry.
    ///
    /// With `remove_bad`, non-best entries of a language that has a best
    /// entry move to the redundant list. Languages of `preferable` are
    /// ranked against the best entry of those languages only.
    pub fn select_best(&mut self, remove_bad: bool, preferable: LangMask) -> LangMask {
        let mut best = Rank::None;
        let mut preferred_best = Rank::None;
        let mut has_best = [false; Language::ALL.len()];

        for lemma in &self.wi.lemmas {
            if !lemma.is_best() {
                continue;
            }
            let rank = Rank::of(lemma.quality());
            best = best.max(rank);
            if preferable.contains(lemma.language()) {
                preferred_best = preferred_best.max(rank);
            }
            has_best[usize::from(lemma.language().id())] = true;
        }

        let mut to_kill = LangMask::empty();
        let mut to_keep = LangMask::empty();
        for i in (0..self.wi.lemmas.len()).rev() {
            let lemma = &self.wi.lemmas[i];
            let rank = Rank::of(lemma.quality());
            let language = lemma.language();
            let language_has_best = has_best[usize::from(language.id())];
            if remove_bad && !lemma.is_best() && language_has_best {
                self.wi.redund_lemma(i);
            }

            let bar = if preferable.contains(language) {
                preferred_best
            } else {
                best
            };
            if (!language_has_best && rank <= bar) || rank < bar {
                to_kill.insert(language);
            } else {
                to_keep.insert(language);
            }
        }
        to_kill & !to_keep
    }

    /// Moves the entries of `languages` to the redundant list and returns
    /// the languages left.
    pub fn filter_lemmas(&mut self, languages: LangMask) -> LangMask {
        self.wi.lang_mask &= !languages;
        for i in (0..self.wi.lemmas.len()).rev() {
            if languages.contains(self.wi.lemmas[i].language()) {
                self.wi.redund_lemma(i);
            }
        }
        self.wi.lang_mask
    }

    /// Turns every form of the selected entries into an entry of its own.
    pub fn flatten(&mut self, languages: LangMask, bastards_only: bool) {
        flatten_lemmas(&mut self.wi.lemmas, languages, bastards_only);
        flatten_lemmas(&mut self.wi.redundant_lemmas, languages, bastards_only);
    }

    /// Collapses the selected entries of each language into one entry whose
    /// lemma is the word itself.
    pub fn shrink(&mut self, languages: LangMask, bastards_only: bool) {
        let form = cut_word(&self.wi.normalized_form);
        shrink_lemmas(&mut self.wi.lemmas, &form, languages, bastards_only);
        shrink_lemmas(&mut self.wi.redundant_lemmas, &form, languages, bastards_only);
    }

    /// Exact-lemma entries that do not look like a lemma become exact-word
    /// entries. A language left without a lemma-like entry gets a
    /// foundling one built from the word; with `remove_odd`, languages that
    /// have one lose their other entries.
    pub fn repair_lll(&mut self, remove_odd: bool) {
        let mut to_add: BTreeSet<Language> = BTreeSet::new();
        let mut exact: BTreeSet<Language> = BTreeSet::new();
        let mut to_sanitize: BTreeSet<Language> = BTreeSet::new();

        for i in (0..self.wi.lemmas.len()).rev() {
            let lemma = &self.wi.lemmas[i];
            let language = lemma.language();
            if lemma.is_exact_lemma() {
                exact.insert(language);
                continue;
            }
            if lemma.form_type() != FormType::ExactLemma {
                continue;
            }
            to_sanitize.insert(language);
            to_add.insert(language);
            self.wi.set_form_type_or_erase(i, FormType::ExactWord);
        }

        to_sanitize.retain(|language| exact.contains(language));
        if remove_odd && !to_sanitize.is_empty() {
            self.wi
                .lemmas
                .retain(|lm| lm.is_exact_lemma() || !to_sanitize.contains(&lm.language()));
        }

        for language in to_add.difference(&exact) {
            let entry = LemmaForms::plain(&self.wi.form, &self.wi.normalized_form, *language)
                .with_exact(false)
                .with_quality(Quality::FOUNDLING)
                .with_form_type(FormType::ExactLemma);
            self.wi.lemmas.push(entry);
        }
    }

    /// Moves bad-request entries to the redundant list, except the
    /// lemma-like ones of a language that has nothing better.
    pub fn remove_bad_request(&mut self) {
        let mut bad_best = LangMask::empty();
        let mut good_best = LangMask::empty();
        for lemma in self.wi.lemmas.iter().filter(|lm| lm.is_exact_lemma()) {
            if lemma.is_bad_request() {
                bad_best.insert(lemma.language());
            } else {
                good_best.insert(lemma.language());
            }
        }
        bad_best &= !good_best;

        for i in (0..self.wi.lemmas.len()).rev() {
            let lemma = &self.wi.lemmas[i];
            let spared = lemma.is_exact_lemma() && bad_best.contains(lemma.language());
            if lemma.is_bad_request() && !spared {
                self.wi.redund_lemma(i);
            }
        }
    }

    /// Restricts every entry of a language with an intrusive bastard to
    /// the word as written.
    pub fn shrink_intrusive_bastards(&mut self, use_fix_list: bool) {
        let intrusive: LangMask = self
            .wi
            .lemmas
            .iter()
            .filter(|lm| lm.is_intrusive_bastard(use_fix_list))
            .map(LemmaForms::language)
            .collect();
        if intrusive.is_empty() {
            return;
        }
        for i in (0..self.wi.lemmas.len()).rev() {
            if intrusive.contains(self.wi.lemmas[i].language()) {
                self.wi.set_form_type_or_erase(i, FormType::WeirdExactWord);
            }
        }
    }

    /// Rebuilds the redundant list as single-form entries: one for the
    /// lemma and one for the form itself, skipping what the principal
    /// entries already cover.
    pub fn update_redundant(&mut self) {
        let principal = &self.wi.lemmas;
        let mut rebuilt: Vec<LemmaForms> = Vec::new();
        let mut insert = |form: &str, lemma: &str, language: Language| {
            if rebuilt.iter().any(|lm| lm.lemma_text() == lemma) {
                return;
            }
            if principal
                .iter()
                .any(|lm| lm.lemma_text() == lemma && lm.has_form(form))
            {
                return;
            }
            let mut entry = LemmaForms::plain(form, lemma, language);
            entry.add_form_merge(form, FormWeight::exact());
            rebuilt.push(entry);
        };
        for redundant in &self.wi.redundant_lemmas {
            let form = cut_word(redundant.normalized_form());
            let lemma = cut_word(redundant.lemma_text());
            insert(&form, &lemma, redundant.language());
            insert(&form, &form, redundant.language());
        }
        self.wi.redundant_lemmas = rebuilt;
    }

    /// Appends the redundant entries to the principal ones.
    pub fn inject_redundant(&mut self) {
        let redundant = std::mem::take(&mut self.wi.redundant_lemmas);
        self.wi.lemmas.extend(redundant);
    }

    /// Adds a language-neutral entry for the word to the redundant list,
    /// plus whole-word dictionary analyses in the languages of its alphabet
    /// that no entry covers yet.
    pub fn add_default_lemma(&mut self, context: &LanguageContext) -> Result<()> {
        if self.wi.lemmas.is_empty() && self.wi.redundant_lemmas.is_empty() {
            return Ok(());
        }
        let form = self.wi.normalized_form.clone();
        let unicode = normalize_unicode(&form);
        insert_form(
            &mut self.wi.redundant_lemmas,
            &unicode,
            &cut_word(&unicode),
            Language::Unknown,
        );

        let mut languages = alphabet::classify_language(&form, false) & context.lang_mask();
        if subtract_languages(&mut languages, &self.wi.lemmas)
            || subtract_languages(&mut languages, &self.wi.redundant_lemmas)
            || form.is_empty()
        {
            return Ok(());
        }

        let mut opt = AnalyzeOptions::indexer()
            .with_suffix(SuffixPolicy::Only)
            .with_multitoken_split(MultitokenSplit::Wholly)
            .with_return_foundling_anyway(false)
            .with_reset_lemma_to_form(false)
            .with_use_fix_list(false);
        opt.accept_foundling = LangMask::empty();

        let token = MultiToken::new(form.as_str(), vec![SubToken::new(0, form.chars().count())])?;
        let lemmas = analyze_word(context.registry(), &token, languages, &[], &opt)?;
        debug!("default lemma of '{}': {} analyses in {}", form, lemmas.len(), languages);
        for lemma in &lemmas {
            insert_form(&mut self.wi.redundant_lemmas, &form, lemma.text(), lemma.language());
        }
        Ok(())
    }

    /// Replaces fix-list entries by the dictionary analyses of their forms,
    /// taken from the fix list's cache when it matches.
    pub fn spread_fix_list(&mut self, context: &LanguageContext) {
        let mut total_forms: AHashMap<Language, usize> = AHashMap::new();
        for lemma in self.wi.lemmas.iter().filter(|lm| lm.quality().intersects(Quality::FIX)) {
            *total_forms.entry(lemma.language()).or_default() += forms_len(lemma);
        }

        let mut processed = LangMask::empty();
        for i in (0..self.wi.lemmas.len()).rev() {
            if !self.wi.lemmas[i].quality().intersects(Quality::FIX) {
                continue;
            }
            let language = self.wi.lemmas[i].language();
            if !processed.contains(language) {
                let base = self.wi.lemmas.len();
                let cached = context.registry().fix_list().and_then(|fix_list| {
                    fix_list.get_real_nodes(
                        language,
                        &self.wi.form,
                        total_forms.get(&language).copied().unwrap_or(0),
                    )
                });
                let nodes = match cached {
                    Some(nodes) => {
                        processed.insert(language);
                        nodes
                    }
                    // A miss regenerates this entry's nodes only and leaves the
                    // cache alone; it is filled by `MorphFixList::init_real_nodes`.
                    None => {
                        let mut generated = Vec::new();
                        real_nodes_of(context, &self.wi.lemmas[i], &mut generated);
                        generated
                    }
                };
                self.wi.lemmas.extend(nodes);

                let orig = &self.wi.lemmas[i];
                let (exact, form_type, stop_word) =
                    (orig.is_exact_lemma(), orig.form_type(), orig.is_stop_word());
                for node in &mut self.wi.lemmas[base..] {
                    node.best &= exact;
                    node.exact_lemma = if node.best { LllLevel::Lll } else { LllLevel::No };
                    node.form_type = form_type;
                    node.stop_word = stop_word;
                }
            }
            self.wi.lemmas.remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageRegistry;
    use crate::language::fix_list::MorphFixList;
    use crate::language::lexicon::LexiconLanguage;
    use crate::lemma::{Lemma, LemmaSetter};

    fn english() -> LexiconLanguage {
        LexiconLanguage::from_json_str(
            r#"{"language": "eng", "entries": [
                {"lemma": "cat", "grammar": ["S"], "forms": [
                    {"text": "cat", "grammar": [["sg"]]},
                    {"text": "cats", "grammar": [["pl"]]}
                ]},
                {"lemma": "walk", "grammar": ["V"], "forms": [
                    {"text": "walk", "grammar": [["inf"]]},
                    {"text": "walked", "grammar": [["praet"]]}
                ]},
                {"lemma": "talk", "grammar": ["V"]},
                {"lemma": "datum", "grammar": ["S"], "forms": [
                    {"text": "datum", "grammar": [["sg"]]},
                    {"text": "data", "grammar": [["pl"]]}
                ]}
            ]}"#,
        )
        .unwrap()
    }

    fn context() -> LanguageContext {
        let mut registry = LanguageRegistry::new();
        registry.register(Arc::new(english()));
        LanguageContext::new(Arc::new(registry))
    }

    fn fix_context() -> (LanguageContext, Arc<MorphFixList>) {
        let fix_list = Arc::new(
            MorphFixList::from_json_str(
                r#"[{"language": "eng", "entries": [{"lemma": "data", "grammar": ["S", "pl"]}]}]"#,
            )
            .unwrap(),
        );
        let mut registry = LanguageRegistry::new();
        registry.register(Arc::new(english()));
        registry.set_fix_list(Arc::clone(&fix_list));
        (LanguageContext::new(Arc::new(registry)), fix_list)
    }

    fn analyzed(word: &str) -> WordInstance {
        let mut wi = WordInstance::new();
        wi.init(word, &context(), FormType::General, true, true).unwrap();
        wi
    }

    fn exact_entry(form: &str, lemma: &str, language: Language) -> LemmaForms {
        let mut entry = LemmaForms::plain(form, lemma, language);
        entry.add_form_merge(form, FormWeight::exact());
        entry
    }

    fn lemma_texts(lemmas: &[LemmaForms]) -> Vec<&str> {
        lemmas.iter().map(LemmaForms::lemma_text).collect()
    }

    #[test]
    fn test_select_best() {
        let mut wi = WordInstance::new();
        wi.add_lemma_forms(
            LemmaForms::plain("cat", "cat", Language::English)
                .with_exact(true)
                .with_quality(Quality::DICTIONARY),
        );
        wi.add_lemma_forms(LemmaForms::plain("cat", "cet", Language::English).with_quality(Quality::BASTARD));
        wi.add_lemma_forms(LemmaForms::plain("cat", "cat", Language::Russian));

        let killed = WordInstanceUpdate::new(&mut wi).select_best(true, LangMask::empty());
        assert_eq!(killed, LangMask::single(Language::Russian));
        assert_eq!(wi.num_lemmas(), 2);
        assert!(wi.lemmas().iter().all(|lm| lm.lemma_text() == "cat"));
    }

    #[test]
    fn test_select_best_preferable_language() {
        let mut wi = WordInstance::new();
        wi.add_lemma_forms(
            LemmaForms::plain("kot", "kot", Language::Russian)
                .with_exact(true)
                .with_quality(Quality::BASTARD),
        );
        wi.add_lemma_forms(
            LemmaForms::plain("kot", "kot", Language::English)
                .with_exact(true)
                .with_quality(Quality::DICTIONARY),
        );

        let killed = WordInstanceUpdate::new(&mut wi).select_best(false, LangMask::empty());
        assert_eq!(killed, LangMask::single(Language::Russian));

        let killed =
            WordInstanceUpdate::new(&mut wi).select_best(false, LangMask::single(Language::Russian));
        assert!(killed.is_empty());
    }

    #[test]
    fn test_filter_lemmas() {
        let mut wi = WordInstance::new();
        wi.add_lemma_forms(exact_entry("dogs", "dog", Language::English));
        wi.add_lemma_forms(exact_entry("dogs", "dogs", Language::German));

        let left = WordInstanceUpdate::new(&mut wi).filter_lemmas(LangMask::single(Language::German));
        assert_eq!(left, LangMask::single(Language::English));
        assert_eq!(lemma_texts(wi.lemmas()), vec!["dog"]);
        assert_eq!(wi.redundant_lemmas().len(), 1);
        assert_eq!(wi.redundant_lemmas()[0].form_type(), FormType::ExactWord);
    }

    #[test]
    fn test_flatten() {
        let mut wi = analyzed("cats");
        WordInstanceUpdate::new(&mut wi).flatten(LangMask::single(Language::English), false);

        assert_eq!(lemma_texts(wi.lemmas()), vec!["cat", "cats"]);
        assert!(wi.lemmas().iter().all(LemmaForms::is_overridden));
        assert!(wi.lemmas()[1].has_form("cats"));

        let mut wi = analyzed("cats");
        WordInstanceUpdate::new(&mut wi).flatten(LangMask::single(Language::English), true);
        assert_eq!(lemma_texts(wi.lemmas()), vec!["cat"]);
        assert!(!wi.lemmas()[0].is_overridden());
    }

    #[test]
    fn test_shrink() {
        let mut wi = analyzed("Cats");
        WordInstanceUpdate::new(&mut wi).shrink(LangMask::single(Language::English), false);

        assert_eq!(wi.num_lemmas(), 1);
        let entry = &wi.lemmas()[0];
        assert_eq!(entry.lemma_text(), "cats");
        assert_eq!(entry.language(), Language::English);
        assert_eq!(entry.num_forms(), 1);
        assert!(entry.has_form("cats"));
    }

    #[test]
    fn test_repair_lll_adds_foundling() {
        let mut wi = WordInstance::new();
        wi.add_lemma_forms(exact_entry("x", "y", Language::English).with_form_type(FormType::ExactLemma));

        WordInstanceUpdate::new(&mut wi).repair_lll(false);
        assert_eq!(wi.num_lemmas(), 2);
        assert_eq!(wi.lemmas()[0].form_type(), FormType::ExactWord);
        let added = &wi.lemmas()[1];
        assert_eq!(added.lemma_text(), "x");
        assert_eq!(added.form_type(), FormType::ExactLemma);
        assert_eq!(added.quality(), Quality::FOUNDLING);
    }

    #[test]
    fn test_repair_lll_removes_odd() {
        let mut wi = WordInstance::new();
        wi.add_lemma_forms(exact_entry("x", "a", Language::English).with_form_type(FormType::ExactLemma));
        wi.add_lemma_forms(exact_entry("x", "b", Language::English).with_exact(true));
        wi.add_lemma_forms(exact_entry("x", "c", Language::English));
        wi.add_lemma_forms(exact_entry("x", "d", Language::German));

        WordInstanceUpdate::new(&mut wi).repair_lll(true);
        assert_eq!(lemma_texts(wi.lemmas()), vec!["b", "d"]);
    }

    #[test]
    fn test_remove_bad_request() {
        let english: Arc<dyn crate::language::LanguageCapability> = Arc::new(english());
        let mut lemma = Lemma::new(Language::English);
        {
            let mut setter = LemmaSetter::new(&mut lemma);
            setter.set_text("qwe");
            setter.set_initial_form("qwe");
            setter.set_normalized_form("qwe");
            setter.set_quality(Quality::BAD_REQUEST);
        }
        let mut bad = LemmaForms::from_lemma(&lemma, Arc::clone(&english), FormType::General, true, None);
        bad.exact_lemma = LllLevel::No;
        bad.best = false;

        let mut wi = WordInstance::new();
        wi.add_lemma_forms(bad.clone());
        wi.add_lemma_forms(exact_entry("qwe", "qwe", Language::English));
        WordInstanceUpdate::new(&mut wi).remove_bad_request();
        assert_eq!(wi.num_lemmas(), 1);
        assert!(!wi.lemmas()[0].is_bad_request());
        assert_eq!(wi.redundant_lemmas().len(), 1);

        bad.exact_lemma = LllLevel::Lll;
        let mut wi = WordInstance::new();
        wi.add_lemma_forms(bad);
        WordInstanceUpdate::new(&mut wi).remove_bad_request();
        assert_eq!(wi.num_lemmas(), 1);
    }

    #[test]
    fn test_shrink_intrusive_bastards() {
        let mut wi = analyzed("talked");
        assert!(wi.lemmas()[0].is_intrusive_bastard(true));

        WordInstanceUpdate::new(&mut wi).shrink_intrusive_bastards(true);
        assert_eq!(wi.num_lemmas(), 1);
        let entry = &wi.lemmas()[0];
        assert_eq!(entry.form_type(), FormType::WeirdExactWord);
        assert!(entry.has_form("talked"));
        assert!(!entry.has_form("talk"));
    }

    #[test]
    fn test_update_and_inject_redundant() {
        let mut wi = WordInstance::new();
        wi.add_lemma_forms(exact_entry("dogs", "dog", Language::English));
        let mut update = WordInstanceUpdate::new(&mut wi);
        update.filter_lemmas(LangMask::single(Language::English));
        update.update_redundant();
        update.inject_redundant();

        assert_eq!(lemma_texts(wi.lemmas()), vec!["dog", "dogs"]);
        assert!(wi.lemmas().iter().all(|lm| lm.has_form("dogs")));
        assert!(wi.redundant_lemmas().is_empty());
    }

    #[test]
    fn test_add_default_lemma() {
        let context = context();
        let mut wi = WordInstance::new();
        WordInstanceUpdate::new(&mut wi).add_default_lemma(&context).unwrap();
        assert!(wi.redundant_lemmas().is_empty());

        let mut wi = analyzed("cats");
        WordInstanceUpdate::new(&mut wi).add_default_lemma(&context).unwrap();
        assert_eq!(wi.redundant_lemmas().len(), 1);
        let entry = &wi.redundant_lemmas()[0];
        assert_eq!(entry.language(), Language::Unknown);
        assert_eq!(entry.lemma_text(), "cats");
        assert!(entry.has_form("cats"));
    }

    #[test]
    fn test_generate_real_nodes() {
        let (context, _) = fix_context();
        let (nodes, forms_count) = generate_real_nodes(&context, Language::English, "data");
        assert_eq!(forms_count, 1);
        assert_eq!(lemma_texts(&nodes), vec!["datum"]);
        assert!(nodes[0].is_overridden());
        assert!(nodes[0].has_form("data"));

        let (nodes, forms_count) = generate_real_nodes(&context, Language::English, "cats");
        assert!(nodes.is_empty());
        assert_eq!(forms_count, 0);
    }

    #[test]
    fn test_spread_fix_list() {
        let (context, fix_list) = fix_context();
        let mut wi = WordInstance::new();
        wi.init("data", &context, FormType::General, true, true).unwrap();
        assert!(wi.lemmas()[0].quality().contains(Quality::FIX));

        WordInstanceUpdate::new(&mut wi).spread_fix_list(&context);
        assert_eq!(lemma_texts(wi.lemmas()), vec!["datum"]);
        assert_eq!(wi.lemmas()[0].form_type(), FormType::General);
        assert_eq!(fix_list.real_nodes_len(), 0);

        fix_list.init_real_nodes(&context);
        assert!(fix_list.real_nodes_len() > 0);
        let mut wi = WordInstance::new();
        wi.init("data", &context, FormType::General, true, true).unwrap();
        WordInstanceUpdate::new(&mut wi).spread_fix_list(&context);
        assert_eq!(lemma_texts(wi.lemmas()), vec!["datum"]);
    }
}
