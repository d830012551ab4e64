//! Command implementations for the polylemma CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::analysis::{AnalyzeOptions, MultiToken, analyze_word};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{PolylemmaError, Result};
use crate::language::LanguageRegistry;
use crate::language::fix_list::MorphFixList;
use crate::language::lexicon::LexiconLanguage;
use crate::paradigm::FormDecimator;
use crate::word_instance::{LanguageContext, StopWords, WordInstance, WordInstanceUpdate};

/// Execute a CLI command.
pub fn execute_command(args: PolylemmaArgs) -> Result<()> {
    match &args.command {
        Command::Analyze(analyze_args) => analyze_words(analyze_args.clone(), &args),
        Command::Instance(instance_args) => build_instances(instance_args.clone(), &args),
        Command::Decimate(decimate_args) => check_decimator(decimate_args.clone(), &args),
    }
}

/// Words from the command line followed by the words of `input`.
fn collect_words(words: Vec<String>, input: Option<&Path>) -> Result<Vec<String>> {
    let mut all = words;
    if let Some(path) = input {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PolylemmaError::config(format!(
                "Failed to read input file '{}': {}",
                path.display(),
                e
            ))
        })?;
        all.extend(content.split_whitespace().map(str::to_string));
    }
    if all.is_empty() {
        return Err(PolylemmaError::invalid_argument(
            "no words given; pass them as arguments or with --input",
        ));
    }
    Ok(all)
}

/// Registry with one lexicon language per file and the optional fix list.
fn build_registry(lexicons: &[PathBuf], fix_list: Option<&Path>) -> Result<LanguageRegistry> {
    let mut registry = LanguageRegistry::new();
    for path in lexicons {
        let lexicon = LexiconLanguage::load_from_file(path)?;
        registry.register(Arc::new(lexicon));
    }
    if let Some(path) = fix_list {
        registry.set_fix_list(Arc::new(MorphFixList::load_from_file(path)?));
    }
    if registry.languages().is_empty() {
        info!("no lexicon given; every word will be a foundling");
    }
    Ok(registry)
}

fn build_options(args: &OptionsArgs) -> Result<AnalyzeOptions> {
    let mut options = match &args.options_file {
        Some(path) => AnalyzeOptions::load_from_file(path)?,
        None => match args.preset {
            Preset::Default => AnalyzeOptions::default(),
            Preset::Indexer => AnalyzeOptions::indexer(),
            Preset::LemmatizeAll => AnalyzeOptions::lemmatize_all(),
            Preset::Test => AnalyzeOptions::test_preset(),
        },
    };

    if let Some(grammar) = &args.grammar {
        options = options.with_required_grammar(grammar.as_str());
    }
    if let Some(suffix) = args.suffix {
        options = options.with_suffix(suffix.into());
    }
    if let Some(split) = args.split {
        options = options.with_multitoken_split(split.into());
    }
    if let Some(accept) = args.accept {
        options = options.with_accept_level(accept.into());
    }
    if let Some(translit) = args.translit {
        options = options.with_accept_translit(translit);
    }
    if args.no_fix_list {
        options = options.with_use_fix_list(false);
    }
    if args.allow_deprecated {
        options = options.with_allow_deprecated(true);
    }
    Ok(options)
}

/// Analyze words and print their raw lemmas.
fn analyze_words(args: AnalyzeArgs, cli_args: &PolylemmaArgs) -> Result<()> {
    let words = collect_words(args.words, args.input.as_deref())?;
    let registry = build_registry(&args.language.lexicons, args.language.fix_list.as_deref())?;
    let options = build_options(&args.options)?;
    debug!("analyzer options: {options:?}");

    let mut result = AnalysisResult {
        words: Vec::with_capacity(words.len()),
        total_lemmas: 0,
    };
    for word in words {
        let token = MultiToken::from_text(&word);
        let lemmas = analyze_word(
            &registry,
            &token,
            args.language.languages,
            &args.language.priority,
            &options,
        )?;
        debug!("'{}': {} lemmas", word, lemmas.len());
        result.total_lemmas += lemmas.len();
        result.words.push(WordAnalysis {
            word,
            lemmas: lemmas.iter().map(LemmaReport::from).collect(),
        });
    }

    output_result("Analysis", &result, cli_args)
}

fn build_context(args: &InstanceArgs) -> Result<LanguageContext> {
    let registry = build_registry(&args.language.lexicons, args.language.fix_list.as_deref())?;
    let mut context = LanguageContext::new(Arc::new(registry))
        .with_lang_mask(args.language.languages)
        .with_priority(args.language.priority.clone())
        .with_disabled_languages(args.disabled.unwrap_or_default())
        .with_translit_languages(args.translit.unwrap_or_default())
        .with_allow_deprecated(args.allow_deprecated);
    if let Some(path) = &args.stop_words {
        context = context.with_stop_words(Arc::new(StopWords::load_from_file(path)?));
    }
    if let Some(path) = &args.decimator {
        context = context.with_decimator(Arc::new(FormDecimator::from_file(path)?));
    }
    Ok(context)
}

fn apply_update(
    update: &mut WordInstanceUpdate<'_>,
    step: UpdateStep,
    args: &InstanceArgs,
    context: &LanguageContext,
) -> Result<()> {
    match step {
        UpdateStep::SelectBest => {
            update.select_best(true, args.prefer.unwrap_or_default());
        }
        UpdateStep::Filter => {
            update.filter_lemmas(args.target);
        }
        UpdateStep::Flatten => update.flatten(args.target, args.bastards_only),
        UpdateStep::Shrink => update.shrink(args.target, args.bastards_only),
        UpdateStep::RepairLll => update.repair_lll(true),
        UpdateStep::RemoveBadRequest => update.remove_bad_request(),
        UpdateStep::ShrinkIntrusiveBastards => update.shrink_intrusive_bastards(!args.no_fix_list),
        UpdateStep::DefaultLemma => update.add_default_lemma(context)?,
        UpdateStep::SpreadFixList => update.spread_fix_list(context),
        UpdateStep::UpdateRedundant => update.update_redundant(),
        UpdateStep::InjectRedundant => update.inject_redundant(),
    }
    Ok(())
}

/// Build a word instance per word and run the requested update passes.
fn build_instances(args: InstanceArgs, cli_args: &PolylemmaArgs) -> Result<()> {
    let words = collect_words(args.words.clone(), args.input.as_deref())?;
    let context = build_context(&args)?;
    let use_fix_list = !args.no_fix_list;

    let mut result = InstanceResult {
        instances: Vec::with_capacity(words.len()),
    };
    for word in &words {
        let mut wi = WordInstance::new();
        wi.init(
            word,
            &context,
            args.form_type.into(),
            args.generate,
            use_fix_list,
        )?;

        let mut update = WordInstanceUpdate::new(&mut wi);
        for step in &args.updates {
            debug!("'{word}': {step:?}");
            apply_update(&mut update, *step, &args, &context)?;
        }
        if args.generate {
            wi.generate_all_forms(Some(context.decimator()));
        }
        result.instances.push(InstanceReport::from(&wi));
    }

    output_result("Word instances", &result, cli_args)
}

/// Load a decimator file and report its tables.
fn check_decimator(args: DecimateArgs, cli_args: &PolylemmaArgs) -> Result<()> {
    let mut decimator = FormDecimator::new();
    let loaded = decimator.load_file(&args.file);

    let languages = decimator
        .languages()
        .into_iter()
        .filter(|language| args.language.is_none_or(|wanted| wanted == *language))
        .map(|language| DecimatorLanguage {
            language,
            max_forms: decimator.form_limit(language),
            good_features: decimator
                .good_features(language)
                .map(|bunch| bunch.iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
        })
        .collect();

    let report = DecimatorReport {
        path: args.file.display().to_string(),
        loaded,
        error: decimator.last_error().map(str::to_string),
        languages,
    };
    output_result("Decimator check", &report, cli_args)?;

    if loaded {
        Ok(())
    } else {
        Err(PolylemmaError::parse(format!(
            "decimator file '{}' rejected",
            args.file.display()
        )))
    }
}
