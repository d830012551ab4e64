//! Read-only configuration shared by word instances.

use std::sync::Arc;

use crate::language::{LangMask, Language, LanguageRegistry};
use crate::paradigm::decimator::FormDecimator;
use crate::word_instance::stop_words::StopWords;

/// Languages, priorities, stop words and decimator used to build
/// [`WordInstance`](crate::word_instance::WordInstance)s.
///
/// Built once and shared; cloning is cheap.
#[derive(Debug, Clone)]
pub struct LanguageContext {
    registry: Arc<LanguageRegistry>,
    lang_mask: LangMask,
    priority: Vec<Language>,
    disabled_languages: LangMask,
    translit_languages: LangMask,
    stop_words: Arc<StopWords>,
    decimator: Arc<FormDecimator>,
    allow_deprecated: bool,
}

impl LanguageContext {
    /// Every registered language, no priorities, no stop words and an
    /// empty decimator.
    pub fn new(registry: Arc<LanguageRegistry>) -> Self {
        LanguageContext {
            lang_mask: registry.languages(),
            registry,
            priority: Vec::new(),
            disabled_languages: LangMask::empty(),
            translit_languages: LangMask::empty(),
            stop_words: Arc::new(StopWords::new()),
            decimator: Arc::new(FormDecimator::new()),
            allow_deprecated: true,
        }
    }

    pub fn with_lang_mask(mut self, mask: LangMask) -> Self {
        self.lang_mask = mask;
        self
    }

    /// Languages analyzed first, in order.
    pub fn with_priority(mut self, priority: Vec<Language>) -> Self {
        self.priority = priority;
        self
    }

    /// Languages whose analyses are demoted to foundlings.
    pub fn with_disabled_languages(mut self, mask: LangMask) -> Self {
        self.disabled_languages = mask;
        self
    }

    pub fn with_translit_languages(mut self, mask: LangMask) -> Self {
        self.translit_languages = mask;
        self
    }

    pub fn with_stop_words(mut self, stop_words: Arc<StopWords>) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn with_decimator(mut self, decimator: Arc<FormDecimator>) -> Self {
        self.decimator = decimator;
        self
    }

    pub fn with_allow_deprecated(mut self, allow: bool) -> Self {
        self.allow_deprecated = allow;
        self
    }

    pub fn registry(&self) -> &Arc<LanguageRegistry> {
        &self.registry
    }

    pub fn lang_mask(&self) -> LangMask {
        self.lang_mask
    }

    pub fn priority(&self) -> &[Language] {
        &self.priority
    }

    pub fn disabled_languages(&self) -> LangMask {
        self.disabled_languages
    }

    pub fn translit_languages(&self) -> LangMask {
        self.translit_languages
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    pub fn decimator(&self) -> &Arc<FormDecimator> {
        &self.decimator
    }

    pub fn allow_deprecated(&self) -> bool {
        self.allow_deprecated
    }
}
