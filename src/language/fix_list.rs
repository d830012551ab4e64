//! Administrative overrides of dictionary analyses.
//!
//! A [`MorphFixList`] holds, per language, a small lexicon whose analyses
//! replace the regular dictionary's for the forms it lists. Its results carry
//! [`Quality::FIX`]. Since fix-list lemmas are placeholders, the list also
//! caches the "real" dictionary analyses of their surface forms, keyed by
//! form and checked against the paradigm size they were computed for.
//!
//! The list is an ordinary value: load it, wrap it in an `Arc` and install it
//! with [`LanguageRegistry::set_fix_list`](crate::language::LanguageRegistry::set_fix_list).

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use log::info;
use parking_lot::RwLock;

use crate::analysis::options::{Accept, RecognizeOptions, TranslitOptions};
use crate::error::{PolylemmaError, Result};
use crate::grammar::Grammeme;
use crate::language::Language;
use crate::language::capability::{LanguageCapability, NormalizeMode};
use crate::language::lexicon::{LexiconDocument, LexiconLanguage};
use crate::lemma::{Lemma, LemmaSetter, LllLevel, Quality};
use crate::lemma_forms::LemmaForms;
use crate::paradigm::wordform::WordformKit;
use crate::word_instance::LanguageContext;
use crate::word_instance::update::generate_real_nodes;

/// Cached dictionary analyses of one fix-list form.
#[derive(Debug, Clone)]
pub struct RealNodes {
    /// Paradigm size of the fix-list lemma the nodes were computed for.
    pub forms_count: usize,
    pub lemmas: Vec<LemmaForms>,
}

#[derive(Default)]
pub struct MorphFixList {
    languages: AHashMap<Language, LexiconLanguage>,
    real_nodes: RwLock<AHashMap<(Language, String), RealNodes>>,
}

impl fmt::Debug for MorphFixList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let languages: Vec<Language> = self.languages.keys().copied().collect();
        f.debug_struct("MorphFixList")
            .field("languages", &languages)
            .field("real_nodes", &self.real_nodes.read().len())
            .finish()
    }
}

impl MorphFixList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fix list: a JSON array of lexicon documents.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PolylemmaError::config(format!(
                "Failed to read fix list file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let fix_list = Self::from_json_str(&content).map_err(|e| {
            PolylemmaError::parse(format!(
                "Failed to load fix list from '{}': {}",
                path.display(),
                e
            ))
        })?;
        info!(
            "loaded fix list from '{}' for {} languages",
            path.display(),
            fix_list.languages.len()
        );
        Ok(fix_list)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let documents: Vec<LexiconDocument> = serde_json::from_str(json)?;
        let mut fix_list = MorphFixList::new();
        for document in documents {
            fix_list.add_language(LexiconLanguage::from_document(document)?);
        }
        Ok(fix_list)
    }

    pub fn add_language(&mut self, lexicon: LexiconLanguage) {
        self.languages.insert(lexicon.language(), lexicon);
        self.real_nodes.write().clear();
    }

    pub fn has_language(&self, language: Language) -> bool {
        self.languages.contains_key(&language)
    }

    pub fn language(&self, language: Language) -> Option<&LexiconLanguage> {
        self.languages.get(&language)
    }

    /// Fix-list analyses of a converted form.
    pub fn lookup(&self, language: Language, converted: &str, opt: &RecognizeOptions) -> Vec<Lemma> {
        let Some(lexicon) = self.languages.get(&language) else {
            return Vec::new();
        };
        let opt = RecognizeOptions {
            accept: Accept::DICTIONARY,
            ..opt.clone()
        };
        let mut lemmas = lexicon.lookup(converted, &opt);
        for lemma in &mut lemmas {
            LemmaSetter::new(lemma).add_quality(Quality::FIX);
        }
        lemmas
    }

    /// Cached real nodes, valid only for the paradigm size they were built for.
    pub fn get_real_nodes(
        &self,
        language: Language,
        form: &str,
        forms_count: usize,
    ) -> Option<Vec<LemmaForms>> {
        let cache = self.real_nodes.read();
        cache
            .get(&(language, form.to_string()))
            .filter(|nodes| nodes.forms_count == forms_count)
            .map(|nodes| nodes.lemmas.clone())
    }

    pub fn set_real_nodes(&self, language: Language, form: &str, nodes: RealNodes) {
        self.real_nodes
            .write()
            .insert((language, form.to_string()), nodes);
    }

    pub fn real_nodes_len(&self) -> usize {
        self.real_nodes.read().len()
    }

    pub fn clear_real_nodes(&self) {
        self.real_nodes.write().clear();
    }

    /// Computes the real nodes of every fix-list form up front.
    pub fn init_real_nodes(&self, context: &LanguageContext) {
        let mut count = 0;
        for (language, lexicon) in &self.languages {
            for form in lexicon.form_texts() {
                let (lemmas, forms_count) = generate_real_nodes(context, *language, &form);
                self.set_real_nodes(*language, &form, RealNodes { forms_count, lemmas });
                count += 1;
            }
        }
        info!("initialized real nodes for {count} fix-list forms");
    }
}

/// A language whose lookups consult the fix list first.
#[derive(Debug, Clone)]
pub struct FixListLanguage {
    base: Arc<dyn LanguageCapability>,
    fix_list: Arc<MorphFixList>,
}

impl FixListLanguage {
    pub fn new(base: Arc<dyn LanguageCapability>, fix_list: Arc<MorphFixList>) -> Self {
        FixListLanguage { base, fix_list }
    }
}

impl LanguageCapability for FixListLanguage {
    fn language(&self) -> Language {
        self.base.language()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn version(&self) -> i32 {
        self.base.version()
    }

    /// Fix-list results replace the base dictionary unless one of them is
    /// marked reserved, which defers to the base.
    fn lookup(&self, converted: &str, opt: &RecognizeOptions) -> Vec<Lemma> {
        if opt.use_fix_list && opt.accept.contains(Accept::DICTIONARY) {
            let fixed = self.fix_list.lookup(self.language(), converted, opt);
            if !fixed.is_empty() && !fixed.iter().any(|l| l.has_stem_gram(Grammeme::Reserved)) {
                return fixed;
            }
        }
        self.base.lookup(converted, opt)
    }

    fn recognize_as_transliteration(
        &self,
        text: &str,
        max_lemmas: usize,
        opt: &TranslitOptions,
    ) -> Vec<Lemma> {
        self.base.recognize_as_transliteration(text, max_lemmas, opt)
    }

    fn is_valid_word(&self, text: &str) -> bool {
        self.base.is_valid_word(text)
    }

    fn to_lower(&self, text: &str) -> String {
        self.base.to_lower(text)
    }

    fn convert(&self, text: &str) -> String {
        self.base.convert(text)
    }

    fn normalize(&self, text: &str, mode: NormalizeMode) -> String {
        self.base.normalize(text, mode)
    }

    fn wordforms<'a>(&'a self, lemma: &Lemma) -> Box<dyn Iterator<Item = WordformKit> + 'a> {
        match self.fix_list.language(self.language()) {
            Some(fixes) if lemma.quality().contains(Quality::FIX) => fixes.wordforms(lemma),
            _ => self.base.wordforms(lemma),
        }
    }

    fn can_break(
        &self,
        text: &str,
        pos1: usize,
        len1: usize,
        pos2: usize,
        len2: usize,
        is_foreign: bool,
    ) -> bool {
        self.base.can_break(text, pos1, len1, pos2, len2, is_foreign)
    }

    fn looks_like_lemma(&self, lemma: &Lemma) -> LllLevel {
        self.base.looks_like_lemma(lemma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageRegistry;

    const FIXES: &str = r#"[
        {"language": "eng", "entries": [
            {"lemma": "data", "grammar": ["S", "pl"]},
            {"lemma": "media", "grammar": ["S", "reserved"]}
        ]}
    ]"#;

    fn base() -> Arc<dyn LanguageCapability> {
        Arc::new(
            LexiconLanguage::from_json_str(
                r#"{"language": "eng", "entries": [
                    {"lemma": "datum", "grammar": ["S"], "forms": [
                        {"text": "datum", "grammar": [["sg"]]},
                        {"text": "data", "grammar": [["pl"]]}
                    ]},
                    {"lemma": "medium", "grammar": ["S"], "forms": [
                        {"text": "medium", "grammar": [["sg"]]},
                        {"text": "media", "grammar": [["pl"]]}
                    ]}
                ]}"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_fix_list_replaces_base() {
        let language = FixListLanguage::new(base(), Arc::new(MorphFixList::from_json_str(FIXES).unwrap()));
        let lemmas = language.recognize("data", &RecognizeOptions::default());
        assert_eq!(lemmas.len(), 1);
        assert_eq!(lemmas[0].text(), "data");
        assert!(lemmas[0].quality().contains(Quality::FIX));

        let opt = RecognizeOptions::default().with_use_fix_list(false);
        let lemmas = language.recognize("data", &opt);
        assert_eq!(lemmas[0].text(), "datum");
    }

    #[test]
    fn test_reserved_defers_to_base() {
        let language = FixListLanguage::new(base(), Arc::new(MorphFixList::from_json_str(FIXES).unwrap()));
        let lemmas = language.recognize("media", &RecognizeOptions::default());
        assert_eq!(lemmas[0].text(), "medium");
    }

    #[test]
    fn test_real_nodes_cache() {
        let mut registry = LanguageRegistry::new();
        registry.register(base());
        let fix_list = Arc::new(MorphFixList::from_json_str(FIXES).unwrap());
        registry.set_fix_list(Arc::clone(&fix_list));
        let context = LanguageContext::new(Arc::new(registry));

        assert_eq!(fix_list.real_nodes_len(), 0);
        fix_list.init_real_nodes(&context);
        assert_eq!(fix_list.real_nodes_len(), 2);

        let nodes = fix_list.get_real_nodes(Language::English, "data", 1).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].lemma_text(), "datum");
        assert!(fix_list.get_real_nodes(Language::English, "data", 5).is_none());

        fix_list.clear_real_nodes();
        assert!(fix_list.get_real_nodes(Language::English, "data", 1).is_none());
    }

    #[test]
    fn test_load_error_names_path() {
        let err = MorphFixList::load_from_file("/nonexistent/fixes.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fixes.json"));
    }
}
