//! Paradigm decimation for agglutinative languages.
//!
//! A Turkish or Kazakh noun has hundreds of forms, most of them never seen in
//! text. The decimator keeps, per language, a set of "good" feature
//! combinations and a form-count limit. Once a paradigm reaches the limit,
//! only forms carrying a good combination, or close to the analyzed form,
//! survive.
//!
//! Data format:
//! ```text
//! # comment
//! [tur]
//! MaxForms=100
//! S,nom,sg
//! S,acc,pl
//! ```
//!
//! A malformed file leaves the decimator empty and reports the problem
//! through [`FormDecimator::last_error`]; an empty decimator passes
//! everything through.
//!
//! # Examples
//!
//! ```
//! use polylemma::paradigm::FormDecimator;
//!
//! let mut decimator = FormDecimator::new();
//! assert!(decimator.load_str("[tur]\nMaxForms=10\nS,nom,sg\n"));
//! assert!(!decimator.is_empty());
//!
//! assert!(!decimator.load_str("S,nom,sg\n"));
//! assert!(decimator.is_empty());
//! assert!(decimator.last_error().is_some());
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use ahash::{AHashMap, AHashSet};
use log::{info, warn};
use regex::Regex;

use crate::error::{PolylemmaError, Result};
use crate::grammar::{GramBitSet, Grammeme, GrammarBunch};
use crate::language::Language;
use crate::lemma::Lemma;
use crate::lemma_forms::LemmaForms;
use crate::paradigm::filter::GrammarFilter;
use crate::paradigm::wordform::WordformKit;

static BUILTIN: LazyLock<FormDecimator> = LazyLock::new(|| {
    let mut decimator = FormDecimator::new();
    decimator.load_str(include_str!("../../resources/decimator.txt"));
    decimator
});

const STRONG_PARTS: [Grammeme; 6] = [
    Grammeme::Particle,
    Grammeme::Postposition,
    Grammeme::Conjunction,
    Grammeme::Numeral,
    Grammeme::SubstPronoun,
    Grammeme::AdvPronoun,
];

const NOMINAL_PARTS: [Grammeme; 5] = [
    Grammeme::Adverb,
    Grammeme::Substantive,
    Grammeme::Adjective,
    Grammeme::AdjNumeral,
    Grammeme::AdjPronoun,
];

/// Suffix turning a verbal noun into its verb (`alma` -> `almak`).
const VERB_SUFFIX: char = 'k';

#[derive(Debug, Clone, Default)]
pub struct FormDecimator {
    good_features: AHashMap<Language, GrammarBunch>,
    form_limits: AHashMap<Language, usize>,
    last_error: Option<String>,
}

impl FormDecimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The decimator built from the bundled data.
    pub fn builtin() -> &'static FormDecimator {
        &BUILTIN
    }

    /// Load a decimator file.
    ///
    /// Unlike [`load_file`](Self::load_file), a parse failure is returned
    /// as an error instead of being recorded.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PolylemmaError::config(format!(
                "Failed to read decimator file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut decimator = FormDecimator::new();
        if !decimator.load_str(&content) {
            return Err(PolylemmaError::parse(format!(
                "Failed to parse decimator file '{}': {}",
                path.display(),
                decimator.last_error.unwrap_or_default()
            )));
        }
        Ok(decimator)
    }

    /// Replace the tables with the content of a file. Returns `false` and
    /// records the error when the file cannot be read or parsed.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let loaded = self.load_str(&content);
                if loaded {
                    info!(
                        "loaded decimator from '{}' for {} languages",
                        path.display(),
                        self.good_features.len()
                    );
                }
                loaded
            }
            Err(e) => {
                self.clear();
                let message = format!("Failed to read decimator file '{}': {}", path.display(), e);
                warn!("{message}");
                self.last_error = Some(message);
                false
            }
        }
    }

    /// Replace the tables with parsed `data`.
    pub fn load_str(&mut self, data: &str) -> bool {
        self.clear();
        match parse(data) {
            Ok((good_features, form_limits)) => {
                self.good_features = good_features;
                self.form_limits = form_limits;
                true
            }
            Err(message) => {
                warn!("decimator data rejected: {message}");
                self.last_error = Some(message);
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.good_features.clear();
        self.form_limits.clear();
        self.last_error = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.good_features.is_empty()
    }

    /// Languages with a good-feature table.
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.good_features.keys().copied().collect();
        languages.sort();
        languages
    }

    pub fn good_features(&self, language: Language) -> Option<&GrammarBunch> {
        self.good_features.get(&language)
    }

    pub fn form_limit(&self, language: Language) -> Option<usize> {
        self.form_limits.get(&language).copied()
    }

    /// Whether a paradigm of `forms_count` forms of `lemma` gets decimated.
    pub fn is_applicable(&self, lemma: &Lemma, forms_count: usize) -> bool {
        self.check_language(lemma.language()) && self.exceeds_limit(lemma.language(), forms_count)
    }

    fn check_language(&self, language: Language) -> bool {
        language.is_agglutinative() && self.good_features.contains_key(&language)
    }

    fn exceeds_limit(&self, language: Language, count: usize) -> bool {
        self.form_limits
            .get(&language)
            .is_none_or(|limit| count >= *limit)
    }

    /// A feature survives when it is good, or differs from one of the exact
    /// features by fewer than three grammemes, none of them the
    /// derived-adjective marker.
    pub fn is_preserved_feature(
        feature: &GramBitSet,
        good: &GrammarBunch,
        exact: &GrammarBunch,
    ) -> bool {
        good.contains(feature)
            || exact.iter().any(|e| {
                let diff = (*feature - *e) | (*e - *feature);
                diff.len() < 3 && !diff.contains(Grammeme::DerivedAdjective)
            })
    }

    /// Drops unlikely analyses of agglutinative words.
    ///
    /// Function words win outright. Otherwise short nominals that prefix a
    /// longer nominal are dropped, and verbs are kept only when they derive
    /// from a kept nominal. Returns whether anything was removed.
    pub fn decimate_lemmas(&self, lemmas: &mut Vec<Lemma>) -> bool {
        let mut strong: AHashSet<String> = AHashSet::new();
        let mut nominals: AHashSet<String> = AHashSet::new();
        let mut weak_nominals: AHashSet<String> = AHashSet::new();
        let mut verbs: AHashSet<String> = AHashSet::new();

        for lemma in lemmas.iter() {
            if !lemma.language().is_agglutinative() {
                continue;
            }
            let Some(pos) = lemma.stem_grammar().first() else {
                continue;
            };
            let text = lemma.text().to_string();
            if STRONG_PARTS.contains(pos) {
                strong.insert(text);
            } else if *pos == Grammeme::Verb {
                verbs.insert(text);
            } else if NOMINAL_PARTS.contains(pos) {
                let weak = !lemma.flex_grammars().is_empty()
                    && lemma
                        .flex_grammars()
                        .iter()
                        .all(|flex| flex.iter().any(|g| g.is_weak_nominal_feature()));
                if weak {
                    weak_nominals.insert(text);
                } else {
                    nominals.insert(text);
                }
            }
        }

        if !strong.is_empty() {
            nominals.clear();
            verbs.clear();
        } else {
            if nominals.is_empty() && !weak_nominals.is_empty() {
                std::mem::swap(&mut nominals, &mut weak_nominals);
            }
            if !nominals.is_empty() {
                let sorted: BTreeSet<String> = nominals.iter().cloned().collect();
                let sorted: Vec<&String> = sorted.iter().collect();
                for pair in sorted.windows(2) {
                    let (short, long) = (pair[0], pair[1]);
                    let short_len = short.chars().count();
                    if long.starts_with(short.as_str())
                        && short_len <= 3
                        && short_len < long.chars().count()
                    {
                        nominals.remove(short);
                    }
                }
                let mut kept_verbs = AHashSet::new();
                for nominal in &nominals {
                    let mut verb = nominal.clone();
                    verb.push(VERB_SUFFIX);
                    if verbs.contains(&verb) {
                        kept_verbs.insert(verb);
                    }
                }
                verbs = kept_verbs;
            }
        }

        let before = lemmas.len();
        lemmas.retain(|lemma| {
            if !lemma.language().is_agglutinative() {
                return true;
            }
            let Some(pos) = lemma.stem_grammar().first() else {
                return true;
            };
            let text = lemma.text();
            !((*pos == Grammeme::Verb && !verbs.contains(text))
                || (NOMINAL_PARTS.contains(pos) && !nominals.contains(text)))
        });
        debug_assert!(before == 0 || !lemmas.is_empty(), "decimation removed every lemma");
        lemmas.len() != before
    }

    /// Drops the rare forms of an oversized paradigm. Returns whether
    /// anything was removed.
    pub fn decimate_forms(&self, lemma_forms: &mut LemmaForms) -> bool {
        let language = lemma_forms.language();
        if !self.check_language(language) {
            return false;
        }
        let Some(good) = self.good_features.get(&language) else {
            return false;
        };
        let forms = lemma_forms.obtain_forms();
        if !self.exceeds_limit(language, forms.len()) {
            return false;
        }

        let exact: GrammarBunch = forms
            .values()
            .filter(|weight| weight.is_exact)
            .flat_map(|weight| weight.grams.iter().copied())
            .collect();
        let before = forms.len();
        forms.retain(|_, weight| {
            weight
                .grams
                .iter()
                .any(|feature| Self::is_preserved_feature(feature, good, &exact))
        });
        forms.len() != before
    }

    /// Same as [`decimate_forms`](Self::decimate_forms), over raw generated
    /// wordforms of `lemma`.
    pub fn decimate_wordforms(&self, lemma: &Lemma, forms: &mut Vec<WordformKit>) -> bool {
        let language = lemma.language();
        if !self.check_language(language) || !self.exceeds_limit(language, forms.len()) {
            return false;
        }
        let Some(good) = self.good_features.get(&language) else {
            return false;
        };
        let stem = lemma.stem_gram_set();
        let features = |kit: &WordformKit| -> Vec<GramBitSet> {
            if kit.flex_grammars.is_empty() {
                vec![stem]
            } else {
                kit.flex_grammars.iter().map(|flex| stem | *flex).collect()
            }
        };
        let exact: GrammarBunch = forms
            .iter()
            .filter(|kit| kit.text() == lemma.normalized_form())
            .flat_map(&features)
            .collect();
        let before = forms.len();
        forms.retain(|kit| {
            features(kit)
                .iter()
                .any(|feature| Self::is_preserved_feature(feature, good, &exact))
        });
        forms.len() != before
    }
}

type Tables = (AHashMap<Language, GrammarBunch>, AHashMap<Language, usize>);

fn parse(data: &str) -> std::result::Result<Tables, String> {
    let mut good_features: AHashMap<Language, GrammarBunch> = AHashMap::new();
    let mut form_limits = AHashMap::new();
    let mut section: Option<Language> = None;
    let header = Regex::new(r"^\[\s*([A-Za-z-]+)\s*\]$").map_err(|e| e.to_string())?;
    let max_forms = Regex::new(r"^MaxForms\s*=\s*(\S+)$").map_err(|e| e.to_string())?;

    for (number, line) in data.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let number = number + 1;
        if let Some(caps) = header.captures(line) {
            let language: Language = caps[1]
                .parse()
                .map_err(|e| format!("line {number}: {e}"))?;
            good_features.entry(language).or_default();
            section = Some(language);
            continue;
        }
        let Some(language) = section else {
            return Err(format!("line {number}: data before any [language] section"));
        };
        if let Some(caps) = max_forms.captures(line) {
            let limit: usize = caps[1]
                .parse()
                .map_err(|e| format!("line {number}: bad MaxForms value '{}': {e}", &caps[1]))?;
            form_limits.insert(language, limit);
            continue;
        }
        let feature: GramBitSet = line.parse().map_err(|e| format!("line {number}: {e}"))?;
        good_features.entry(language).or_default().insert(feature);
    }
    Ok((good_features, form_limits))
}

/// Applies the decimation test while a paradigm is generated, after an
/// optional inner filter.
#[derive(Debug, Clone)]
pub struct DecimatorFilter {
    inner: Option<Box<dyn GrammarFilter>>,
    good: GrammarBunch,
    exact: GrammarBunch,
    stem: GramBitSet,
}

impl DecimatorFilter {
    pub fn new(
        decimator: &FormDecimator,
        language: Language,
        inner: Option<Box<dyn GrammarFilter>>,
    ) -> Self {
        DecimatorFilter {
            inner,
            good: decimator
                .good_features(language)
                .cloned()
                .unwrap_or_default(),
            exact: GrammarBunch::new(),
            stem: GramBitSet::empty(),
        }
    }
}

impl GrammarFilter for DecimatorFilter {
    fn set_lemma(&mut self, lemma: &Lemma) {
        if let Some(inner) = self.inner.as_mut() {
            inner.set_lemma(lemma);
        }
        self.stem = lemma.stem_gram_set();
        let flex = lemma.flex_gram_sets();
        self.exact = if flex.is_empty() {
            GrammarBunch::from([self.stem])
        } else {
            flex.iter().map(|f| self.stem | *f).collect()
        };
    }

    fn is_proper_stem(&self) -> bool {
        self.inner.as_ref().is_none_or(|inner| inner.is_proper_stem())
    }

    fn check_flex(&self, flex: &GramBitSet) -> bool {
        if let Some(inner) = &self.inner {
            if !inner.check_flex(flex) {
                return false;
            }
        }
        FormDecimator::is_preserved_feature(&(self.stem | *flex), &self.good, &self.exact)
    }

    fn clone_box(&self) -> Box<dyn GrammarFilter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemma::LemmaSetter;
    use crate::lemma_forms::FormWeight;
    use crate::paradigm::filter::ClueFilter;

    const DATA: &str = "# test data\n[tur]\nMaxForms=2\nS,nom,sg\n\n[rus]\nS,nom,sg\n";

    fn bunch(features: &[&str]) -> GrammarBunch {
        features.iter().map(|f| f.parse().unwrap()).collect()
    }

    fn turkish(text: &str, stem: Vec<Grammeme>, flex: &[Vec<Grammeme>]) -> Lemma {
        let mut lemma = Lemma::new(Language::Turkish);
        let mut setter = LemmaSetter::new(&mut lemma);
        setter.set_text(text);
        setter.set_stem_grammar(stem);
        for grammar in flex {
            setter.add_flex_grammar(grammar.clone());
        }
        lemma
    }

    #[test]
    fn test_parse() {
        let mut decimator = FormDecimator::new();
        assert!(decimator.load_str(DATA));
        assert_eq!(decimator.languages(), vec![Language::Russian, Language::Turkish]);
        assert_eq!(decimator.form_limit(Language::Turkish), Some(2));
        assert_eq!(decimator.form_limit(Language::Russian), None);
        assert!(decimator.last_error().is_none());
    }

    #[test]
    fn test_parse_errors_leave_it_empty() {
        let mut decimator = FormDecimator::new();
        assert!(decimator.load_str(DATA));
        assert!(!decimator.load_str("[tur]\nS,bogus\n"));
        assert!(decimator.is_empty());
        assert!(decimator.last_error().unwrap().contains("line 2"));

        assert!(!decimator.load_str("[tur]\nMaxForms=many\n"));
        assert!(!decimator.load_str("[xx]\n"));
        assert!(!decimator.load_file("/nonexistent/decimator.txt"));
        assert!(decimator.last_error().unwrap().contains("/nonexistent/decimator.txt"));
        assert!(FormDecimator::from_file("/nonexistent/decimator.txt").is_err());
    }

    #[test]
    fn test_preserved_feature() {
        let good = bunch(&["nom,sg"]);
        let exact = bunch(&["gen,pl"]);
        assert!(FormDecimator::is_preserved_feature(&"nom,sg".parse().unwrap(), &good, &exact));
        // ins,pl differs from gen,pl by two grammemes
        assert!(FormDecimator::is_preserved_feature(&"ins,pl".parse().unwrap(), &good, &exact));
        assert!(!FormDecimator::is_preserved_feature(&"ins,sg".parse().unwrap(), &good, &exact));
        assert!(!FormDecimator::is_preserved_feature(
            &"gen,pl,derivadj".parse().unwrap(),
            &good,
            &exact
        ));
    }

    #[test]
    fn test_applicability() {
        let mut decimator = FormDecimator::new();
        decimator.load_str(DATA);
        let lemma = turkish("ev", vec![Grammeme::Substantive], &[]);
        assert!(!decimator.is_applicable(&lemma, 1));
        assert!(decimator.is_applicable(&lemma, 2));

        let mut russian = Lemma::new(Language::Russian);
        LemmaSetter::new(&mut russian).set_text("дом");
        assert!(!decimator.is_applicable(&russian, 100));
    }

    #[test]
    fn test_strong_words_win() {
        let mut lemmas = vec![
            turkish("ama", vec![Grammeme::Conjunction], &[]),
            turkish("am", vec![Grammeme::Substantive], &[vec![Grammeme::Dative]]),
            turkish("amak", vec![Grammeme::Verb], &[]),
        ];
        assert!(FormDecimator::new().decimate_lemmas(&mut lemmas));
        assert_eq!(lemmas.len(), 1);
        assert_eq!(lemmas[0].text(), "ama");
    }

    #[test]
    fn test_short_prefix_nominals_and_verbs() {
        let mut lemmas = vec![
            turkish("al", vec![Grammeme::Substantive], &[vec![Grammeme::Nominative]]),
            turkish("alma", vec![Grammeme::Substantive], &[vec![Grammeme::Nominative]]),
            turkish("almak", vec![Grammeme::Verb], &[vec![Grammeme::Infinitive]]),
            turkish("olmak", vec![Grammeme::Verb], &[vec![Grammeme::Infinitive]]),
        ];
        assert!(FormDecimator::new().decimate_lemmas(&mut lemmas));
        let texts: Vec<&str> = lemmas.iter().map(Lemma::text).collect();
        assert_eq!(texts, vec!["alma", "almak"]);

        assert!(!FormDecimator::new().decimate_lemmas(&mut lemmas));
    }

    #[test]
    fn test_weak_nominals_give_way() {
        let mut lemmas = vec![
            turkish("evim", vec![Grammeme::Substantive], &[vec![Grammeme::Possessive1]]),
            turkish("ev", vec![Grammeme::Substantive], &[vec![Grammeme::Nominative]]),
        ];
        assert!(FormDecimator::new().decimate_lemmas(&mut lemmas));
        assert_eq!(lemmas.len(), 1);
        assert_eq!(lemmas[0].text(), "ev");
    }

    #[test]
    fn test_third_person_possessive_is_not_weak() {
        let mut lemmas = vec![
            turkish(
                "evi",
                vec![Grammeme::Substantive],
                &[vec![Grammeme::Nominative, Grammeme::Possessive3]],
            ),
            turkish("ev", vec![Grammeme::Substantive], &[vec![Grammeme::Accusative]]),
        ];
        assert!(FormDecimator::new().decimate_lemmas(&mut lemmas));
        let texts: Vec<&str> = lemmas.iter().map(Lemma::text).collect();
        assert_eq!(texts, vec!["evi"]);
    }

    #[test]
    fn test_postpositions_are_strong() {
        let mut lemmas = vec![
            turkish("göre", vec![Grammeme::Postposition], &[]),
            turkish("gör", vec![Grammeme::Substantive], &[vec![Grammeme::Dative]]),
            turkish("görmek", vec![Grammeme::Verb], &[vec![Grammeme::Infinitive]]),
        ];
        assert!(FormDecimator::new().decimate_lemmas(&mut lemmas));
        let texts: Vec<&str> = lemmas.iter().map(Lemma::text).collect();
        assert_eq!(texts, vec!["göre"]);
    }

    #[test]
    fn test_decimate_forms_over_limit() {
        let mut decimator = FormDecimator::new();
        assert!(decimator.load_str("[tur]\nMaxForms=4\nS,nom,sg\n"));

        let grams = |text: &str| GrammarBunch::from([text.parse::<GramBitSet>().unwrap()]);
        let mut entry = LemmaForms::plain("evler", "ev", Language::Turkish);
        entry.add_form_merge("ev", FormWeight::inexact().with_grams(grams("S,nom,sg")));
        entry.add_form_merge("evler", FormWeight::exact().with_grams(grams("S,nom,pl")));
        entry.add_form_merge("evleri", FormWeight::inexact().with_grams(grams("S,acc,pl")));

        // under the limit nothing is touched
        let mut small = LemmaForms::plain("evler", "ev", Language::Turkish);
        small.add_form_merge("evler", FormWeight::exact().with_grams(grams("S,nom,pl")));
        small.add_form_merge("evimde", FormWeight::inexact().with_grams(grams("S,loc,sg,poss1")));
        assert!(!decimator.decimate_forms(&mut small));
        assert!(small.has_form("evimde"));

        entry.add_form_merge("evlerde", FormWeight::inexact().with_grams(grams("S,loc,pl")));
        entry.add_form_merge("evimde", FormWeight::inexact().with_grams(grams("S,loc,sg,poss1")));
        entry.add_form_merge(
            "evlerimizden",
            FormWeight::inexact().with_grams(grams("S,abl,pl,poss1")),
        );
        assert_eq!(entry.num_forms(), 6);

        assert!(decimator.decimate_forms(&mut entry));
        let forms: Vec<&str> = entry.forms().unwrap().keys().map(String::as_str).collect();
        assert_eq!(forms, vec!["ev", "evler", "evlerde", "evleri"]);
        assert!(!entry.has_form("evimde"));
        assert!(!entry.has_form("evlerimizden"));

        // what is left is all preserved
        assert!(!decimator.decimate_forms(&mut entry));
        assert_eq!(entry.num_forms(), 4);
    }

    #[test]
    fn test_decimate_wordforms_is_idempotent() {
        let mut decimator = FormDecimator::new();
        decimator.load_str(DATA);
        let mut lemma = turkish("ev", vec![Grammeme::Substantive], &[]);
        LemmaSetter::new(&mut lemma).set_normalized_form("ev");

        let kit = |stem: &str, flexion: &str, grams: &str| {
            WordformKit::new(stem, flexion, grams.parse::<GramBitSet>().unwrap())
        };
        let mut forms = vec![
            kit("ev", "", "nom,sg"),
            kit("ev", "ler", "nom,pl"),
            kit("ev", "lerimizden", "abl,pl,poss1"),
        ];
        assert!(decimator.decimate_wordforms(&lemma, &mut forms));
        let texts: Vec<String> = forms.iter().map(WordformKit::text).collect();
        assert_eq!(texts, vec!["ev", "evler"]);
        assert!(!decimator.decimate_wordforms(&lemma, &mut forms));
    }

    #[test]
    fn test_filter_chains_inner() {
        let mut decimator = FormDecimator::new();
        decimator.load_str(DATA);
        let lemma = turkish("ev", vec![Grammeme::Substantive], &[vec![Grammeme::Nominative, Grammeme::Singular]]);

        let mut filter = DecimatorFilter::new(&decimator, Language::Turkish, None);
        filter.set_lemma(&lemma);
        assert!(filter.is_proper_stem());
        assert!(filter.check_flex(&"nom,sg".parse().unwrap()));
        assert!(filter.check_flex(&"acc,sg".parse().unwrap()));
        assert!(!filter.check_flex(&"abl,pl,poss1".parse().unwrap()));

        let inner = ClueFilter::parse("acc").unwrap().unwrap();
        let mut filter = DecimatorFilter::new(&decimator, Language::Turkish, Some(Box::new(inner)));
        filter.set_lemma(&lemma);
        assert!(!filter.check_flex(&"nom,sg".parse().unwrap()));
        assert!(filter.check_flex(&"acc,sg".parse().unwrap()));
    }

    #[test]
    fn test_builtin() {
        let decimator = FormDecimator::builtin();
        assert!(decimator.last_error().is_none());
        assert!(decimator.good_features(Language::Turkish).is_some());
    }
}
