//! Word instances built over the bundled lexicon, stop words and fix list.

use std::path::PathBuf;
use std::sync::Arc;

use polylemma::error::Result;
use polylemma::language::fix_list::MorphFixList;
use polylemma::language::lexicon::LexiconLanguage;
use polylemma::language::{LangMask, Language, LanguageRegistry};
use polylemma::lemma::Quality;
use polylemma::lemma_forms::{FormType, LemmaForms};
use polylemma::paradigm::FormDecimator;
use polylemma::word_instance::{LanguageContext, StickySide, StopWords, WordInstance, WordInstanceUpdate};

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("resources")
        .join(name)
}

fn context(with_fix_list: bool) -> Result<LanguageContext> {
    let mut registry = LanguageRegistry::new();
    registry.register(Arc::new(LexiconLanguage::load_from_file(
        resource("lexicons").join("eng.json"),
    )?));
    if with_fix_list {
        registry.set_fix_list(Arc::new(MorphFixList::load_from_file(resource("fix_list.json"))?));
    }
    let stop_words = StopWords::load_from_file(resource("stop_words.txt"))?;
    Ok(LanguageContext::new(Arc::new(registry)).with_stop_words(Arc::new(stop_words)))
}

fn instance(word: &str, context: &LanguageContext, generate: bool) -> Result<WordInstance> {
    let mut wi = WordInstance::new();
    wi.init(word, context, FormType::General, generate, true)?;
    Ok(wi)
}

fn lemma_texts(wi: &WordInstance) -> Vec<&str> {
    wi.lemmas().iter().map(LemmaForms::lemma_text).collect()
}

#[test]
fn test_instance_collects_lemmas_and_forms() -> Result<()> {
    let context = context(false)?;
    let wi = instance("Cats", &context, true)?;

    assert_eq!(wi.form(), "cats");
    assert!(wi.has_lemma("cat"));
    assert!(wi.lang_mask().contains(Language::English));
    assert!(wi.forms_generated());
    assert!(wi.has_form_generated("cat"));
    assert!(wi.has_form_generated("cats"));
    assert!(!wi.is_stop_word());
    Ok(())
}

#[test]
fn test_stop_word_stickiness() -> Result<()> {
    let context = context(false)?;

    let wi = instance("The", &context, false)?;
    assert_eq!(wi.stop_word(), Some(StickySide::Right));

    let wi = instance("of", &context, false)?;
    assert_eq!(wi.stop_word(), Some(StickySide::Both));
    Ok(())
}

#[test]
fn test_disabled_language_demotes_lemmas() -> Result<()> {
    let context = context(false)?.with_disabled_languages(LangMask::single(Language::English));
    let wi = instance("dogs", &context, false)?;

    assert!(!wi.lemmas().is_empty());
    for lemma in wi.lemmas() {
        assert!(lemma.quality().contains(Quality::DISABLED), "{lemma:?}");
    }
    Ok(())
}

#[test]
fn test_bastard_then_shrink() -> Result<()> {
    let context = context(false)?;
    let mut wi = instance("talked", &context, false)?;
    assert!(wi.is_bastard(Quality::BASTARD, LangMask::single(Language::English)));

    WordInstanceUpdate::new(&mut wi).shrink(LangMask::single(Language::English), true);
    assert_eq!(lemma_texts(&wi), vec!["talked"]);
    Ok(())
}

#[test]
fn test_fix_list_spreads_to_dictionary_analyses() -> Result<()> {
    let context = context(true)?;
    let mut wi = instance("data", &context, true)?;
    assert!(wi.lemmas()[0].quality().contains(Quality::FIX));

    WordInstanceUpdate::new(&mut wi).spread_fix_list(&context);
    assert_eq!(lemma_texts(&wi), vec!["datum"]);
    Ok(())
}

#[test]
fn test_filter_then_inject_redundant() -> Result<()> {
    let context = context(false)?;
    let mut wi = instance("walked", &context, true)?;

    let mut update = WordInstanceUpdate::new(&mut wi);
    let left = update.filter_lemmas(LangMask::single(Language::English));
    assert!(!left.contains(Language::English));
    update.inject_redundant();

    assert!(wi.redundant_lemmas().is_empty());
    assert!(wi.has_lemma("walk"));
    Ok(())
}

#[test]
fn test_bundled_decimator_file() -> Result<()> {
    let decimator = FormDecimator::from_file(resource("decimator.txt"))?;
    assert_eq!(decimator.languages(), vec![Language::Turkish, Language::Kazakh]);
    assert_eq!(decimator.form_limit(Language::Turkish), Some(64));
    assert!(decimator.good_features(Language::English).is_none());

    let context = context(false)?.with_decimator(Arc::new(decimator));
    let mut wi = instance("walked", &context, false)?;
    wi.generate_all_forms(Some(context.decimator()));
    assert!(wi.has_form_generated("walking"));
    Ok(())
}
