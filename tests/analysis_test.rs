//! End-to-end analysis against the bundled sample lexicons.

use std::path::PathBuf;
use std::sync::Arc;

use polylemma::analysis::{AcceptLevel, AnalyzeOptions, MultiToken, MultitokenSplit, analyze_word};
use polylemma::error::Result;
use polylemma::language::lexicon::LexiconLanguage;
use polylemma::language::{LangMask, Language, LanguageRegistry};
use polylemma::lemma::{CharCategory, Lemma, Quality};

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("resources")
        .join(name)
}

fn registry() -> Result<LanguageRegistry> {
    let mut registry = LanguageRegistry::new();
    for file in ["eng.json", "rus.json", "tur.json"] {
        let lexicon = LexiconLanguage::load_from_file(resource("lexicons").join(file))?;
        registry.register(Arc::new(lexicon));
    }
    Ok(registry)
}

fn find<'a>(lemmas: &'a [Lemma], text: &str, language: Language) -> Option<&'a Lemma> {
    lemmas
        .iter()
        .find(|lemma| lemma.text() == text && lemma.language() == language)
}

#[test]
fn test_sample_lexicons_register() -> Result<()> {
    let registry = registry()?;
    let expected: LangMask = [Language::English, Language::Russian, Language::Turkish]
        .into_iter()
        .collect();
    assert_eq!(registry.languages(), expected);
    Ok(())
}

#[test]
fn test_english_dictionary_lemma() -> Result<()> {
    let registry = registry()?;
    let lemmas = analyze_word(
        &registry,
        &MultiToken::from_text("Cats"),
        LangMask::all(),
        &[],
        &AnalyzeOptions::default(),
    )?;

    let cat = find(&lemmas, "cat", Language::English).expect("cat analysis");
    assert_eq!(cat.quality(), Quality::DICTIONARY);
    assert_eq!(cat.initial_form(), "Cats");
    assert!(cat.case_flags().contains(CharCategory::TITLECASE));
    Ok(())
}

#[test]
fn test_russian_conversion() -> Result<()> {
    let registry = registry()?;
    let lemmas = analyze_word(
        &registry,
        &MultiToken::from_text("Ёлки"),
        LangMask::single(Language::Russian),
        &[],
        &AnalyzeOptions::default().with_accept_level(AcceptLevel::Dictionary),
    )?;

    let tree = find(&lemmas, "елка", Language::Russian).expect("converted lemma");
    assert_eq!(tree.normalized_form(), "ёлки");
    Ok(())
}

#[test]
fn test_turkish_dotless_i() -> Result<()> {
    let registry = registry()?;
    let lemmas = analyze_word(
        &registry,
        &MultiToken::from_text("IŞIKLAR"),
        LangMask::single(Language::Turkish),
        &[],
        &AnalyzeOptions::default().with_accept_level(AcceptLevel::Dictionary),
    )?;

    assert!(find(&lemmas, "ışık", Language::Turkish).is_some(), "{lemmas:?}");
    Ok(())
}

#[test]
fn test_script_selects_language() -> Result<()> {
    let registry = registry()?;
    let lemmas = analyze_word(
        &registry,
        &MultiToken::from_text("мама"),
        LangMask::all(),
        &[],
        &AnalyzeOptions::default(),
    )?;

    assert!(find(&lemmas, "мама", Language::Russian).is_some());
    assert!(lemmas.iter().all(|lemma| lemma.language() != Language::English));
    Ok(())
}

#[test]
fn test_unknown_word_falls_back_to_foundling() -> Result<()> {
    let registry = registry()?;
    let opt = AnalyzeOptions::default().with_accept_level(AcceptLevel::Dictionary);
    let lemmas = analyze_word(
        &registry,
        &MultiToken::from_text("zzxq"),
        LangMask::single(Language::English),
        &[],
        &opt,
    )?;

    assert_eq!(lemmas.len(), 1);
    assert_eq!(lemmas[0].language(), Language::Unknown);
    assert!(lemmas[0].quality().contains(Quality::FOUNDLING));
    Ok(())
}

#[test]
fn test_compound_parts() -> Result<()> {
    let registry = registry()?;
    let opt = AnalyzeOptions::default()
        .with_accept_level(AcceptLevel::Dictionary)
        .with_multitoken_split(MultitokenSplit::SplitAllPossible);
    let lemmas = analyze_word(
        &registry,
        &MultiToken::from_text("cat-dog"),
        LangMask::single(Language::English),
        &[],
        &opt,
    )?;

    let cat = find(&lemmas, "cat", Language::English).expect("first part");
    let dog = find(&lemmas, "dog", Language::English).expect("second part");
    assert_eq!((cat.token_pos(), cat.token_span()), (0, 1));
    assert_eq!((dog.token_pos(), dog.token_span()), (1, 1));
    Ok(())
}

#[test]
fn test_options_file() -> Result<()> {
    let opt = AnalyzeOptions::load_from_file(resource("options.json"))?;
    assert_eq!(opt.max_tokens_in_compound, 2);
    assert_eq!(opt.multitoken_split, MultitokenSplit::SplitAllPossible);
    assert!(opt.return_foundling_anyway);
    assert_eq!(opt.accept_translit, LangMask::single(Language::Russian));

    let err = AnalyzeOptions::load_from_file(resource("missing.json")).unwrap_err();
    assert!(err.to_string().contains("missing.json"));
    Ok(())
}
