//! The fallback capability for words of no known language.

use crate::analysis::options::RecognizeOptions;
use crate::language::Language;
use crate::language::capability::LanguageCapability;
use crate::lemma::Lemma;

/// Recognizes nothing; [`recognize`](LanguageCapability::recognize) turns
/// every non-empty word into a foundling when foundlings are accepted.
#[derive(Debug, Clone, Default)]
pub struct UnknownLanguage;

impl UnknownLanguage {
    pub fn new() -> Self {
        UnknownLanguage
    }
}

impl LanguageCapability for UnknownLanguage {
    fn language(&self) -> Language {
        Language::Unknown
    }

    fn lookup(&self, _converted: &str, _opt: &RecognizeOptions) -> Vec<Lemma> {
        Vec::new()
    }

    fn is_valid_word(&self, text: &str) -> bool {
        !text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::options::Accept;
    use crate::lemma::Quality;

    #[test]
    fn test_unknown_yields_foundlings() {
        let unknown = UnknownLanguage::new();
        let lemmas = unknown.recognize("Xyzzy", &RecognizeOptions::default());
        assert_eq!(lemmas.len(), 1);
        assert_eq!(lemmas[0].text(), "xyzzy");
        assert_eq!(lemmas[0].initial_form(), "Xyzzy");
        assert_eq!(lemmas[0].quality(), Quality::FOUNDLING);
        assert_eq!(lemmas[0].language(), Language::Unknown);

        let opt = RecognizeOptions::default().with_accept(Accept::DICTIONARY);
        assert!(unknown.recognize("Xyzzy", &opt).is_empty());
        assert!(unknown.recognize("", &RecognizeOptions::default()).is_empty());
    }
}
