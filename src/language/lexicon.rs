//! A language capability backed by a JSON lexicon.
//!
//! The lexicon lists headwords with their stem grammar and inflected forms.
//! Besides exact lookup it guesses analyses of unknown words by analogy with
//! the endings of known paradigms ("bastards"), transliterates Latin input
//! through a character table, and keeps words such as `isn't` together
//! through non-breaking rules.
//!
//! Example format:
//! ```json
//! {
//!   "language": "rus",
//!   "conversions": {"ё": "е"},
//!   "slavic_lemma_rules": true,
//!   "entries": [
//!     {
//!       "lemma": "мама",
//!       "grammar": ["S", "f", "anim"],
//!       "forms": [
//!         {"text": "мама", "grammar": [["nom", "sg"]]},
//!         {"text": "мамы", "grammar": [["gen", "sg"], ["nom", "pl"]]}
//!       ]
//!     }
//!   ],
//!   "transliteration": {"m": "м", "a": "а"}
//! }
//! ```
//!
//! # Examples
//!
//! ```
//! use polylemma::analysis::options::RecognizeOptions;
//! use polylemma::language::LanguageCapability;
//! use polylemma::language::lexicon::LexiconLanguage;
//! use polylemma::lemma::Quality;
//!
//! let english = LexiconLanguage::from_json_str(r#"{
//!     "language": "eng",
//!     "entries": [{
//!         "lemma": "walk",
//!         "grammar": ["V"],
//!         "forms": [
//!             {"text": "walk", "grammar": [["inf"]]},
//!             {"text": "walked", "grammar": [["praet"]]}
//!         ]
//!     }]
//! }"#).unwrap();
//!
//! let lemmas = english.recognize("Walked", &RecognizeOptions::default());
//! assert_eq!(lemmas[0].text(), "walk");
//!
//! // "talked" is unknown, but inflects like "walked"
//! let lemmas = english.recognize("talked", &RecognizeOptions::default());
//! assert_eq!(lemmas[0].text(), "talk");
//! assert!(lemmas[0].quality().contains(Quality::BASTARD));
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use ahash::AHashMap;
use log::info;
use serde::{Deserialize, Serialize};

use crate::analysis::options::{Accept, RecognizeOptions, TranslitOptions};
use crate::error::{PolylemmaError, Result};
use crate::grammar::Grammeme;
use crate::language::Language;
use crate::language::alphabet;
use crate::language::capability::{LanguageCapability, NormalizeMode};
use crate::lemma::{Lemma, LemmaSetter, LllLevel, Quality, default_looks_like_lemma};
use crate::paradigm::wordform::{WordformKit, default_wordforms};

/// Shortest stem a guessed analysis may have.
const MIN_BASTARD_STEM: usize = 2;
/// Shortest ending shared with a model form for a guess to count.
const MIN_BASTARD_MATCH: usize = 1;

fn unversioned() -> i32 {
    -1
}

/// Serialized form of a lexicon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconDocument {
    pub language: Language,

    #[serde(default = "unversioned")]
    pub version: i32,

    /// Character conversions applied after lower-casing (e.g. `ё` -> `е`).
    #[serde(default)]
    pub conversions: BTreeMap<String, String>,

    /// Apply nominative/infinitive lemma-likeness rules.
    #[serde(default)]
    pub slavic_lemma_rules: bool,

    #[serde(default)]
    pub entries: Vec<EntryDocument>,

    /// Gaps that never separate words.
    #[serde(default)]
    pub non_breaking: Vec<NonBreakingRule>,

    /// Latin sequence -> native text.
    #[serde(default)]
    pub transliteration: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryDocument {
    pub lemma: String,

    /// Stem grammar, part of speech first.
    #[serde(default)]
    pub grammar: Vec<Grammeme>,

    /// Inflection class shared by entries that inflect alike.
    #[serde(default)]
    pub paradigm: Option<u32>,

    /// Fast-dictionary entry.
    #[serde(default)]
    pub sob: bool,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(default)]
    pub version: Option<i32>,

    #[serde(default)]
    pub forms: Vec<FormDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDocument {
    pub text: String,

    /// One flex grammar per reading of the form.
    #[serde(default)]
    pub grammar: Vec<Vec<Grammeme>>,
}

/// An apostrophe gap before `next` is not a word break, optionally only
/// after one of `previous`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NonBreakingRule {
    pub next: String,

    #[serde(default)]
    pub previous: Vec<String>,
}

#[derive(Debug, Clone)]
struct Form {
    text: String,
    flexion: String,
    grammar: Vec<Vec<Grammeme>>,
}

#[derive(Debug, Clone)]
struct Entry {
    lemma: String,
    lemma_flexion: String,
    grammar: Vec<Grammeme>,
    paradigm: u32,
    sob: bool,
    deprecated: bool,
    version: i32,
    forms: Vec<Form>,
}

/// A lexicon-backed [`LanguageCapability`].
#[derive(Debug, Clone)]
pub struct LexiconLanguage {
    language: Language,
    version: i32,
    conversions: AHashMap<char, String>,
    slavic_lemma_rules: bool,
    entries: Vec<Entry>,
    /// Converted form text -> (entry index, form index).
    index: AHashMap<String, Vec<(usize, usize)>>,
    non_breaking: Vec<NonBreakingRule>,
    transliteration: Vec<(Vec<char>, String)>,
}

impl LexiconLanguage {
    /// An empty lexicon for `language`.
    pub fn new(language: Language) -> Self {
        LexiconLanguage {
            language,
            version: -1,
            conversions: AHashMap::new(),
            slavic_lemma_rules: false,
            entries: Vec::new(),
            index: AHashMap::new(),
            non_breaking: Vec::new(),
            transliteration: Vec::new(),
        }
    }

    /// Load a lexicon from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PolylemmaError::config(format!(
                "Failed to read lexicon file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let document: LexiconDocument = serde_json::from_str(&content).map_err(|e| {
            PolylemmaError::parse(format!(
                "Failed to parse lexicon JSON from '{}': {}",
                path.display(),
                e
            ))
        })?;
        let lexicon = Self::from_document(document)?;
        info!(
            "loaded {} lexicon from '{}': {} entries",
            lexicon.language,
            path.display(),
            lexicon.entries.len()
        );
        Ok(lexicon)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: LexiconDocument = serde_json::from_str(json)
            .map_err(|e| PolylemmaError::parse(format!("Failed to parse lexicon JSON: {e}")))?;
        Self::from_document(document)
    }

    pub fn from_document(document: LexiconDocument) -> Result<Self> {
        if document.language == Language::Unknown {
            return Err(PolylemmaError::config("a lexicon needs a known language"));
        }
        let mut lexicon = LexiconLanguage::new(document.language);
        lexicon.version = document.version;
        lexicon.slavic_lemma_rules = document.slavic_lemma_rules;
        for (from, to) in document.conversions {
            let mut chars = from.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    lexicon.conversions.insert(c, to);
                }
                _ => {
                    return Err(PolylemmaError::parse(format!(
                        "conversion source '{from}' must be a single character"
                    )));
                }
            }
        }
        lexicon.non_breaking = document
            .non_breaking
            .into_iter()
            .map(|rule| NonBreakingRule {
                next: rule.next.to_lowercase(),
                previous: rule.previous.iter().map(|p| p.to_lowercase()).collect(),
            })
            .collect();
        let mut transliteration: Vec<(Vec<char>, String)> = document
            .transliteration
            .into_iter()
            .map(|(latin, native)| (latin.to_lowercase().chars().collect(), native))
            .collect();
        transliteration.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        lexicon.transliteration = transliteration;

        for entry in document.entries {
            lexicon.add_entry(entry)?;
        }
        Ok(lexicon)
    }

    fn add_entry(&mut self, document: EntryDocument) -> Result<()> {
        let lemma = self.normalize(&document.lemma, NormalizeMode::Converted);
        if lemma.is_empty() {
            return Err(PolylemmaError::parse("lexicon entry with an empty lemma"));
        }
        let mut forms: Vec<(String, Vec<Vec<Grammeme>>)> = document
            .forms
            .into_iter()
            .map(|form| (self.normalize(&form.text, NormalizeMode::Converted), form.grammar))
            .collect();
        if forms.is_empty() {
            forms.push((lemma.clone(), Vec::new()));
        }

        let stem = forms
            .iter()
            .fold(lemma.clone(), |stem, (text, _)| common_prefix(&stem, text));
        let stem_len = stem.chars().count();
        let flexion_of = |text: &str| text.chars().skip(stem_len).collect::<String>();

        let index = self.entries.len();
        let entry = Entry {
            lemma_flexion: flexion_of(&lemma),
            lemma,
            grammar: document.grammar,
            paradigm: document.paradigm.unwrap_or(0x8000_0000 | index as u32),
            sob: document.sob,
            deprecated: document.deprecated,
            version: document.version.unwrap_or(self.version),
            forms: forms
                .into_iter()
                .map(|(text, grammar)| Form {
                    flexion: flexion_of(&text),
                    text,
                    grammar,
                })
                .collect(),
        };
        for (form_index, form) in entry.forms.iter().enumerate() {
            self.index
                .entry(form.text.clone())
                .or_default()
                .push((index, form_index));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every distinct (converted) form text, in entry order.
    pub fn form_texts(&self) -> Vec<String> {
        let mut seen = ahash::AHashSet::new();
        self.entries
            .iter()
            .flat_map(|entry| entry.forms.iter())
            .filter(|form| seen.insert(form.text.as_str()))
            .map(|form| form.text.clone())
            .collect()
    }

    /// Whether `text` is the headword of a (non-deprecated) entry.
    pub fn is_lemma(&self, text: &str) -> bool {
        let converted = self.normalize(text, NormalizeMode::Converted);
        self.index.get(&converted).is_some_and(|hits| {
            hits.iter()
                .any(|(i, _)| self.entries[*i].lemma == converted && !self.entries[*i].deprecated)
        })
    }

    fn lemma_from_entry(&self, index: usize, text: &str, grammar: &[Vec<Grammeme>]) -> Lemma {
        let entry = &self.entries[index];
        let mut lemma = Lemma::new(self.language);
        let mut setter = LemmaSetter::new(&mut lemma);
        setter.set_text(text);
        setter.set_stem_grammar(entry.grammar.clone());
        for flex in grammar {
            setter.add_flex_grammar(flex.clone());
        }
        setter.set_paradigm_id(entry.paradigm);
        setter.set_language_version(entry.version);
        lemma
    }

    fn dictionary_lookup(&self, word: &str, opt: &RecognizeOptions) -> Vec<Lemma> {
        let Some(hits) = self.index.get(word) else {
            return Vec::new();
        };
        let mut lemmas: Vec<Lemma> = Vec::new();
        for &(entry_index, form_index) in hits {
            let entry = &self.entries[entry_index];
            if entry.deprecated && !opt.allow_deprecated {
                continue;
            }
            let (needed, quality) = if entry.sob {
                (Accept::SOB, Quality::SOB)
            } else {
                (Accept::DICTIONARY, Quality::DICTIONARY)
            };
            if !opt.accept.contains(needed) {
                continue;
            }
            let form = &entry.forms[form_index];
            let mut lemma = self.lemma_from_entry(entry_index, &entry.lemma, &form.grammar);
            LemmaSetter::new(&mut lemma).set_quality(quality);
            merge_similar(&mut lemmas, lemma);
        }
        lemmas
    }

    /// Analyses of an unknown word by analogy with the endings of known forms.
    fn guess_bastards(&self, word: &str, opt: &RecognizeOptions) -> Vec<Lemma> {
        let word_len = word.chars().count();
        let mut best = MIN_BASTARD_MATCH;
        let mut lemmas: Vec<Lemma> = Vec::new();

        for (entry_index, entry) in self.entries.iter().enumerate() {
            if entry.deprecated && !opt.allow_deprecated {
                continue;
            }
            for form in &entry.forms {
                let flexion_len = form.flexion.chars().count();
                if form.flexion.is_empty()
                    || form.text == word
                    || !word.ends_with(&form.flexion)
                    || word_len < flexion_len + MIN_BASTARD_STEM
                {
                    continue;
                }
                let score = common_suffix_len(word, &form.text);
                if score < best {
                    continue;
                }
                if score > best {
                    best = score;
                    lemmas.clear();
                }
                let stem: String = word.chars().take(word_len - flexion_len).collect();
                let text = format!("{stem}{}", entry.lemma_flexion);
                let mut lemma = self.lemma_from_entry(entry_index, &text, &form.grammar);
                let mut setter = LemmaSetter::new(&mut lemma);
                setter.set_quality(Quality::BASTARD);
                setter.set_depth(score as u32);
                merge_similar(&mut lemmas, lemma);
            }
        }

        if lemmas.is_empty() && opt.generate_quasi_bastards && word_len >= MIN_BASTARD_STEM {
            let mut lemma = Lemma::new(self.language);
            let mut setter = LemmaSetter::new(&mut lemma);
            setter.set_text(word);
            setter.set_stem_grammar(vec![Grammeme::Substantive]);
            setter.set_quality(Quality::BASTARD);
            lemmas.push(lemma);
        }
        lemmas
    }

    /// Greedy longest-match transliteration; `None` if a character has no
    /// mapping.
    pub fn transliterate(&self, text: &str) -> Option<String> {
        if self.transliteration.is_empty() {
            return None;
        }
        let chars: Vec<char> = alphabet::to_lower(text, Language::Unknown).chars().collect();
        let mut result = String::new();
        let mut pos = 0;
        while pos < chars.len() {
            let (latin, native) = self
                .transliteration
                .iter()
                .find(|(latin, _)| chars[pos..].starts_with(latin))?;
            result.push_str(native);
            pos += latin.len();
        }
        Some(result)
    }

    /// Entry that generated `lemma`, together with the lemma's stem.
    fn model_entry(&self, lemma: &Lemma, base: &str) -> Option<(&Entry, String)> {
        let candidates: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|entry| {
                entry.paradigm == lemma.paradigm_id() && entry.grammar == lemma.stem_grammar()
            })
            .collect();
        let model = candidates
            .iter()
            .find(|entry| entry.lemma == base)
            .or_else(|| {
                candidates
                    .iter()
                    .find(|entry| base.ends_with(&entry.lemma_flexion))
            })
            .copied()?;
        let keep = base.chars().count() - model.lemma_flexion.chars().count();
        Some((model, base.chars().take(keep).collect()))
    }
}

impl LanguageCapability for LexiconLanguage {
    fn language(&self) -> Language {
        self.language
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn lookup(&self, converted: &str, opt: &RecognizeOptions) -> Vec<Lemma> {
        let lemmas = self.dictionary_lookup(converted, opt);
        if !lemmas.is_empty() || !opt.accept.contains(Accept::BASTARD) {
            return lemmas;
        }
        self.guess_bastards(converted, opt)
    }

    fn recognize_as_transliteration(
        &self,
        text: &str,
        max_lemmas: usize,
        opt: &TranslitOptions,
    ) -> Vec<Lemma> {
        let Some(native) = self.transliterate(text) else {
            return Vec::new();
        };
        let mut accept = Accept::DICTIONARY;
        for tier in [Accept::SOB, Accept::BASTARD] {
            if !opt.exact_forms.contains(tier) {
                accept |= tier;
            }
        }
        let recognize = RecognizeOptions {
            max_lemmas,
            accept,
            required_grammar: opt.required_grammar.clone(),
            ..Default::default()
        };
        let mut lemmas = self.recognize(&native, &recognize);
        for lemma in &mut lemmas {
            let mut setter = LemmaSetter::new(lemma);
            setter.add_quality(Quality::TRANSLIT);
            setter.set_initial_form(text);
        }
        lemmas
    }

    fn convert(&self, text: &str) -> String {
        if self.conversions.is_empty() {
            return text.to_string();
        }
        let mut converted = String::with_capacity(text.len());
        for c in text.chars() {
            match self.conversions.get(&c) {
                Some(to) => converted.push_str(to),
                None => converted.push(c),
            }
        }
        converted
    }

    fn wordforms<'a>(&'a self, lemma: &Lemma) -> Box<dyn Iterator<Item = WordformKit> + 'a> {
        let suffix = lemma.suffix().to_string();
        let base: String = lemma
            .text()
            .chars()
            .take(lemma.text().chars().count() - lemma.suffix_len())
            .collect();
        let Some((model, stem)) = self.model_entry(lemma, &base) else {
            return Box::new(default_wordforms(lemma).into_iter());
        };
        Box::new(model.forms.iter().flat_map(move |form| {
            let readings: Vec<Vec<Grammeme>> = if form.grammar.is_empty() {
                vec![Vec::new()]
            } else {
                form.grammar.clone()
            };
            let stem = stem.clone();
            let suffix = suffix.clone();
            readings.into_iter().map(move |grammar| WordformKit {
                stem_base: stem.clone(),
                flexion: form.flexion.clone(),
                postfix: suffix.clone(),
                flex_grammars: vec![grammar.iter().copied().collect()],
                ..Default::default()
            })
        }))
    }

    fn can_break(
        &self,
        text: &str,
        pos1: usize,
        len1: usize,
        pos2: usize,
        len2: usize,
        _is_foreign: bool,
    ) -> bool {
        if self.non_breaking.is_empty() || len1 == 0 || pos1 + len1 + 1 != pos2 {
            return true;
        }
        let chars: Vec<char> = text.chars().collect();
        if !matches!(chars.get(pos1 + len1), Some('\'' | '\u{2019}')) {
            return true;
        }
        let slice = |pos: usize, len: usize| -> String {
            chars
                .iter()
                .skip(pos)
                .take(len)
                .map(|c| alphabet::lower_char(*c, self.language))
                .collect()
        };
        let previous = slice(pos1, len1);
        let next = slice(pos2, len2);
        !self.non_breaking.iter().any(|rule| {
            rule.next == next && (rule.previous.is_empty() || rule.previous.contains(&previous))
        })
    }

    fn looks_like_lemma(&self, lemma: &Lemma) -> LllLevel {
        let level = default_looks_like_lemma(lemma);
        if !self.slavic_lemma_rules
            || lemma
                .quality()
                .intersects(Quality::FOUNDLING | Quality::OVERRODE)
        {
            return level;
        }
        let mut slavic = LllLevel::No;
        if lemma.has_flex_gram(Grammeme::Nominative) || lemma.has_flex_gram(Grammeme::Infinitive) {
            slavic = LllLevel::Lll;
        }
        if lemma.has_stem_gram(Grammeme::Substantive)
            && (lemma.has_stem_gram(Grammeme::Singular) || lemma.has_stem_gram(Grammeme::Plural))
        {
            slavic = LllLevel::Tantum;
        }
        level.max(slavic)
    }
}

/// Adds `lemma` unless a similar one is present, in which case its flex
/// grammars are merged in.
fn merge_similar(lemmas: &mut Vec<Lemma>, lemma: Lemma) {
    match lemmas.iter_mut().find(|known| known.similar(&lemma)) {
        Some(known) => {
            let mut setter = LemmaSetter::new(known);
            for flex in lemma.flex_grammars() {
                setter.add_flex_grammar(flex.clone());
            }
        }
        None => lemmas.push(lemma),
    }
}

fn common_prefix(a: &str, b: &str) -> String {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect()
}

fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUSSIAN: &str = r#"{
        "language": "rus",
        "conversions": {"ё": "е"},
        "slavic_lemma_rules": true,
        "entries": [
            {
                "lemma": "мама",
                "grammar": ["S", "f", "anim"],
                "forms": [
                    {"text": "мама", "grammar": [["nom", "sg"]]},
                    {"text": "мамы", "grammar": [["gen", "sg"], ["nom", "pl"]]},
                    {"text": "маме", "grammar": [["dat", "sg"]]}
                ]
            },
            {
                "lemma": "ёлка",
                "grammar": ["S", "f", "inan"],
                "forms": [
                    {"text": "ёлка", "grammar": [["nom", "sg"]]},
                    {"text": "ёлки", "grammar": [["gen", "sg"]]}
                ]
            },
            {"lemma": "и", "grammar": ["CONJ"], "sob": true},
            {"lemma": "ножницы", "grammar": ["S", "pl", "inan"]},
            {"lemma": "старый", "grammar": ["A"], "deprecated": true, "version": 1}
        ],
        "transliteration": {"m": "м", "a": "а", "sh": "ш", "e": "е"}
    }"#;

    fn russian() -> LexiconLanguage {
        LexiconLanguage::from_json_str(RUSSIAN).unwrap()
    }

    #[test]
    fn test_dictionary_lookup() {
        let rus = russian();
        let lemmas = rus.recognize("Мамы", &RecognizeOptions::default());
        assert_eq!(lemmas.len(), 1);
        assert_eq!(lemmas[0].text(), "мама");
        assert_eq!(lemmas[0].flex_grammars().len(), 2);
        assert_eq!(lemmas[0].normalized_form(), "мамы");
        assert_eq!(lemmas[0].initial_form(), "Мамы");
        assert_eq!(lemmas[0].quality(), Quality::DICTIONARY);
    }

    #[test]
    fn test_conversion() {
        let rus = russian();
        let lemmas = rus.recognize("ёлки", &RecognizeOptions::default());
        assert_eq!(lemmas[0].text(), "елка");
        assert_eq!(lemmas[0].normalized_form(), "ёлки");
    }

    #[test]
    fn test_sob_needs_acceptance() {
        let rus = russian();
        let lemmas = rus.recognize("и", &RecognizeOptions::default());
        assert_eq!(lemmas[0].quality(), Quality::SOB);

        let opt = RecognizeOptions::default().with_accept(Accept::DICTIONARY);
        assert!(rus.recognize("и", &opt).is_empty());
    }

    #[test]
    fn test_bastards_by_analogy() {
        let rus = russian();
        let lemmas = rus.recognize("папы", &RecognizeOptions::default());
        assert_eq!(lemmas.len(), 1);
        assert_eq!(lemmas[0].text(), "папа");
        assert!(lemmas[0].quality().contains(Quality::BASTARD));
        assert_eq!(lemmas[0].depth(), 1);

        let opt = RecognizeOptions::default().with_accept(Accept::DICTIONARY | Accept::FOUNDLING);
        let lemmas = rus.recognize("папы", &opt);
        assert_eq!(lemmas[0].quality(), Quality::FOUNDLING);
        assert_eq!(lemmas[0].text(), "папы");
    }

    #[test]
    fn test_deprecated_entries() {
        let rus = russian();
        let lemmas = rus.recognize("старый", &RecognizeOptions::default().with_accept(Accept::DICTIONARY));
        assert!(lemmas.is_empty());

        let opt = RecognizeOptions::default()
            .with_accept(Accept::DICTIONARY)
            .with_allow_deprecated(true);
        let lemmas = rus.recognize("старый", &opt);
        assert_eq!(lemmas.len(), 1);
        assert_eq!(lemmas[0].language_version(), 1);
    }

    #[test]
    fn test_required_grammar() {
        let rus = russian();
        let opt = RecognizeOptions::default()
            .with_accept(Accept::DICTIONARY)
            .with_required_grammar("S,pl");
        let lemmas = rus.recognize("мамы", &opt);
        assert_eq!(lemmas[0].flex_grammars(), &[vec![Grammeme::Nominative, Grammeme::Plural]]);

        let opt = opt.with_required_grammar("V");
        assert!(rus.recognize("мамы", &opt).is_empty());
    }

    #[test]
    fn test_paradigm_generation() {
        let rus = russian();
        let lemma = &rus.recognize("маме", &RecognizeOptions::default())[0];
        let forms: Vec<String> = rus.generate_forms(lemma, None).map(|k| k.text()).collect();
        assert_eq!(forms, vec!["мама", "мамы", "маме"]);
        assert_eq!(rus.forms_count(lemma), 3);

        let bastard = &rus.recognize("папе", &RecognizeOptions::default())[0];
        let forms: Vec<String> = rus.generate_forms(bastard, None).map(|k| k.text()).collect();
        assert_eq!(forms, vec!["папа", "папы", "папе"]);
    }

    #[test]
    fn test_looks_like_lemma() {
        let rus = russian();
        let lemma = &rus.recognize("мама", &RecognizeOptions::default())[0];
        assert_eq!(rus.looks_like_lemma(lemma), LllLevel::SameText);

        let lemma = &rus.recognize("мамы", &RecognizeOptions::default())[0];
        assert_eq!(rus.looks_like_lemma(lemma), LllLevel::Lll);

        let lemma = &rus.recognize("ножницы", &RecognizeOptions::default())[0];
        assert_eq!(rus.looks_like_lemma(lemma), LllLevel::Tantum);
    }

    #[test]
    fn test_transliteration() {
        let rus = russian();
        assert_eq!(rus.transliterate("Mame").as_deref(), Some("маме"));
        assert_eq!(rus.transliterate("xyz"), None);

        let opt = TranslitOptions {
            exact_forms: Accept::BASTARD,
            ..Default::default()
        };
        let lemmas = rus.recognize_as_transliteration("mame", 4, &opt);
        assert_eq!(lemmas.len(), 1);
        assert_eq!(lemmas[0].text(), "мама");
        assert!(lemmas[0].quality().contains(Quality::TRANSLIT));
        assert_eq!(lemmas[0].initial_form(), "mame");
    }

    #[test]
    fn test_can_break() {
        let english = LexiconLanguage::from_json_str(
            r#"{"language": "eng",
                "non_breaking": [{"next": "s"}, {"next": "t", "previous": ["isn", "don"]}]}"#,
        )
        .unwrap();
        assert!(!english.can_break("isn't", 0, 3, 4, 1, false));
        assert!(!english.can_break("John's", 0, 4, 5, 1, false));
        assert!(english.can_break("cant't", 0, 4, 5, 1, false));
        assert!(english.can_break("rock-n", 0, 4, 5, 1, false));
        assert!(english.can_break("o'neil", 0, 1, 2, 4, false));
    }

    #[test]
    fn test_load_errors() {
        let err = LexiconLanguage::load_from_file("/nonexistent/lexicon.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lexicon.json"));
        assert!(LexiconLanguage::from_json_str(r#"{"language": "unk"}"#).is_err());
        assert!(
            LexiconLanguage::from_json_str(r#"{"language": "rus", "conversions": {"ab": "c"}}"#)
                .is_err()
        );
    }
}
