//! Registry of language capabilities.
//!
//! Languages are looked up by id; anything not registered resolves to the
//! [`UnknownLanguage`] fallback. When a [`MorphFixList`] is installed, every
//! language it has overrides for is resolved through a wrapper that consults
//! the fix list first.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use polylemma::language::lexicon::LexiconLanguage;
//! use polylemma::language::{Language, LanguageRegistry};
//!
//! let mut registry = LanguageRegistry::new();
//! registry.register(Arc::new(LexiconLanguage::new(Language::German)));
//!
//! assert!(registry.contains(Language::German));
//! assert_eq!(registry.get(Language::French).language(), Language::Unknown);
//! ```

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

use crate::language::capability::LanguageCapability;
use crate::language::fix_list::{FixListLanguage, MorphFixList};
use crate::language::unknown::UnknownLanguage;
use crate::language::{LangMask, Language};

#[derive(Clone)]
pub struct LanguageRegistry {
    /// Capability returned for unregistered languages.
    unknown: Arc<dyn LanguageCapability>,

    /// Registered capabilities by language.
    languages: AHashMap<Language, Arc<dyn LanguageCapability>>,

    fix_list: Option<Arc<MorphFixList>>,

    /// Capabilities as handed out: wrapped by the fix list where it applies.
    resolved: AHashMap<Language, Arc<dyn LanguageCapability>>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageRegistry")
            .field("languages", &self.languages())
            .field("fix_list", &self.fix_list.is_some())
            .finish()
    }
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self {
            unknown: Arc::new(UnknownLanguage::new()),
            languages: AHashMap::new(),
            fix_list: None,
            resolved: AHashMap::new(),
        }
    }

    /// Register a capability, replacing any previous one for its language.
    pub fn register(&mut self, capability: Arc<dyn LanguageCapability>) {
        let language = capability.language();
        self.languages.insert(language, capability);
        self.resolve(language);
    }

    /// Install (or replace) the morph fix list.
    pub fn set_fix_list(&mut self, fix_list: Arc<MorphFixList>) {
        self.fix_list = Some(fix_list);
        let languages: Vec<Language> = self.languages.keys().copied().collect();
        for language in languages {
            self.resolve(language);
        }
    }

    pub fn fix_list(&self) -> Option<&Arc<MorphFixList>> {
        self.fix_list.as_ref()
    }

    fn resolve(&mut self, language: Language) {
        let Some(base) = self.languages.get(&language) else {
            return;
        };
        let capability: Arc<dyn LanguageCapability> = match &self.fix_list {
            Some(fix_list) if fix_list.has_language(language) => Arc::new(FixListLanguage::new(
                Arc::clone(base),
                Arc::clone(fix_list),
            )),
            _ => Arc::clone(base),
        };
        self.resolved.insert(language, capability);
    }

    pub fn contains(&self, language: Language) -> bool {
        self.languages.contains_key(&language)
    }

    /// Capability for `language`, or the unknown-language fallback.
    pub fn get(&self, language: Language) -> &Arc<dyn LanguageCapability> {
        self.resolved.get(&language).unwrap_or(&self.unknown)
    }

    /// Capability without the fix-list wrapper.
    pub fn base(&self, language: Language) -> &Arc<dyn LanguageCapability> {
        self.languages.get(&language).unwrap_or(&self.unknown)
    }

    pub fn unknown(&self) -> &Arc<dyn LanguageCapability> {
        &self.unknown
    }

    /// Every registered language.
    pub fn languages(&self) -> LangMask {
        self.languages.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::options::RecognizeOptions;
    use crate::language::lexicon::LexiconLanguage;
    use crate::lemma::Quality;

    fn english() -> Arc<dyn LanguageCapability> {
        Arc::new(
            LexiconLanguage::from_json_str(
                r#"{"language": "eng", "entries": [{"lemma": "cat", "grammar": ["S"]}]}"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_fallback_to_unknown() {
        let registry = LanguageRegistry::new();
        assert!(!registry.contains(Language::English));
        assert_eq!(registry.get(Language::English).language(), Language::Unknown);
        assert!(registry.languages().is_empty());
    }

    #[test]
    fn test_fix_list_wraps_languages() {
        let mut registry = LanguageRegistry::new();
        registry.register(english());

        let fix_list = MorphFixList::from_json_str(
            r#"[{"language": "eng", "entries": [{"lemma": "cats", "grammar": ["S", "pl"]}]}]"#,
        )
        .unwrap();
        registry.set_fix_list(Arc::new(fix_list));

        let lemmas = registry
            .get(Language::English)
            .recognize("cats", &RecognizeOptions::default());
        assert_eq!(lemmas.len(), 1);
        assert_eq!(lemmas[0].text(), "cats");
        assert!(lemmas[0].quality().contains(Quality::FIX));

        let lemmas = registry
            .base(Language::English)
            .recognize("cats", &RecognizeOptions::default());
        assert!(lemmas.iter().all(|l| !l.quality().contains(Quality::FIX)));
    }
}
