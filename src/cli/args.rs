//! Command line argument parsing for the polylemma CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::{AcceptLevel, MultitokenSplit, SuffixPolicy};
use crate::language::{LangMask, Language};
use crate::lemma_forms::FormType;

/// Polylemma - multi-language morphological analysis
#[derive(Parser, Debug, Clone)]
#[command(name = "polylemma")]
#[command(about = "Lemmatize words in several languages at once")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Polylemma Contributors")]
#[command(long_about = None)]
pub struct PolylemmaArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl PolylemmaArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the raw lemmas of each word
    Analyze(AnalyzeArgs),

    /// Build word instances and run update passes on them
    Instance(InstanceArgs),

    /// Check a decimator data file
    Decimate(DecimateArgs),
}

/// Dictionaries and language selection shared by the analyzing commands.
#[derive(Args, Debug, Clone)]
pub struct LanguageArgs {
    /// Lexicon file (JSON); repeat for several languages
    #[arg(short = 'l', long = "lexicon", value_name = "LEXICON_FILE")]
    pub lexicons: Vec<PathBuf>,

    /// Morph fix-list file (JSON)
    #[arg(long, value_name = "FIX_LIST_FILE")]
    pub fix_list: Option<PathBuf>,

    /// Languages to analyze, comma separated codes or "all"
    #[arg(long, default_value = "all")]
    pub languages: LangMask,

    /// Languages tried first, in order
    #[arg(long, value_delimiter = ',')]
    pub priority: Vec<Language>,
}

/// Analyzer options assembled from a preset, a file and single flags.
#[derive(Args, Debug, Clone)]
pub struct OptionsArgs {
    /// Starting option set
    #[arg(long, default_value = "default")]
    pub preset: Preset,

    /// Option file (JSON); replaces the preset
    #[arg(long = "options", value_name = "OPTIONS_FILE")]
    pub options_file: Option<PathBuf>,

    /// Required grammar, e.g. "S,nom|V,inf"
    #[arg(short, long)]
    pub grammar: Option<String>,

    /// Suffix policy
    #[arg(long)]
    pub suffix: Option<SuffixArg>,

    /// Multitoken split mode
    #[arg(long)]
    pub split: Option<SplitArg>,

    /// Weakest analysis quality accepted
    #[arg(long)]
    pub accept: Option<AcceptArg>,

    /// Languages analyzed through transliteration
    #[arg(long)]
    pub translit: Option<LangMask>,

    /// Do not consult the morph fix list
    #[arg(long)]
    pub no_fix_list: bool,

    /// Return deprecated dictionary entries
    #[arg(long)]
    pub allow_deprecated: bool,
}

/// Arguments for analyzing words
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Words to analyze
    #[arg(value_name = "WORD")]
    pub words: Vec<String>,

    /// Read words from a file, whitespace separated
    #[arg(short, long, value_name = "INPUT_FILE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub language: LanguageArgs,

    #[command(flatten)]
    pub options: OptionsArgs,
}

/// Arguments for building word instances
#[derive(Parser, Debug, Clone)]
pub struct InstanceArgs {
    /// Words to build instances for
    #[arg(value_name = "WORD")]
    pub words: Vec<String>,

    /// Read words from a file, whitespace separated
    #[arg(short, long, value_name = "INPUT_FILE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub language: LanguageArgs,

    /// Stop-word file
    #[arg(long, value_name = "STOP_WORDS_FILE")]
    pub stop_words: Option<PathBuf>,

    /// Decimator data file
    #[arg(long, value_name = "DECIMATOR_FILE")]
    pub decimator: Option<PathBuf>,

    /// Languages whose analyses are demoted to foundlings
    #[arg(long)]
    pub disabled: Option<LangMask>,

    /// Languages analyzed through transliteration
    #[arg(long)]
    pub translit: Option<LangMask>,

    /// Return deprecated dictionary entries
    #[arg(long)]
    pub allow_deprecated: bool,

    /// Form type of the instance
    #[arg(long, default_value = "general")]
    pub form_type: FormTypeArg,

    /// Generate paradigms for every lemma
    #[arg(long)]
    pub generate: bool,

    /// Do not consult the morph fix list
    #[arg(long)]
    pub no_fix_list: bool,

    /// Update passes, applied in order
    #[arg(short, long = "update", value_delimiter = ',')]
    pub updates: Vec<UpdateStep>,

    /// Languages preferred by select-best
    #[arg(long)]
    pub prefer: Option<LangMask>,

    /// Languages handled by filter, flatten and shrink
    #[arg(long, default_value = "all")]
    pub target: LangMask,

    /// Restrict flatten and shrink to bastards
    #[arg(long)]
    pub bastards_only: bool,
}

/// Arguments for checking a decimator file
#[derive(Parser, Debug, Clone)]
pub struct DecimateArgs {
    /// Decimator data file
    #[arg(value_name = "DECIMATOR_FILE")]
    pub file: PathBuf,

    /// Show only this language
    #[arg(long)]
    pub language: Option<Language>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Named option presets
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Default,
    Indexer,
    LemmatizeAll,
    Test,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixArg {
    No,
    Only,
    Both,
}

impl From<SuffixArg> for SuffixPolicy {
    fn from(arg: SuffixArg) -> Self {
        match arg {
            SuffixArg::No => SuffixPolicy::No,
            SuffixArg::Only => SuffixPolicy::Only,
            SuffixArg::Both => SuffixPolicy::Both,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitArg {
    SplitAll,
    SplitAllPossible,
    Wholly,
}

impl From<SplitArg> for MultitokenSplit {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::SplitAll => MultitokenSplit::SplitAll,
            SplitArg::SplitAllPossible => MultitokenSplit::SplitAllPossible,
            SplitArg::Wholly => MultitokenSplit::Wholly,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptArg {
    Dictionary,
    Sob,
    Bastard,
    Foundling,
}

impl From<AcceptArg> for AcceptLevel {
    fn from(arg: AcceptArg) -> Self {
        match arg {
            AcceptArg::Dictionary => AcceptLevel::Dictionary,
            AcceptArg::Sob => AcceptLevel::Sob,
            AcceptArg::Bastard => AcceptLevel::Bastard,
            AcceptArg::Foundling => AcceptLevel::Foundling,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTypeArg {
    General,
    ExactWord,
    ExactLemma,
}

impl From<FormTypeArg> for FormType {
    fn from(arg: FormTypeArg) -> Self {
        match arg {
            FormTypeArg::General => FormType::General,
            FormTypeArg::ExactWord => FormType::ExactWord,
            FormTypeArg::ExactLemma => FormType::ExactLemma,
        }
    }
}

/// Word-instance update passes
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    SelectBest,
    Filter,
    Flatten,
    Shrink,
    RepairLll,
    RemoveBadRequest,
    ShrinkIntrusiveBastards,
    DefaultLemma,
    SpreadFixList,
    UpdateRedundant,
    InjectRedundant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        let args = PolylemmaArgs::try_parse_from(["polylemma", "analyze", "cat"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = PolylemmaArgs::try_parse_from(["polylemma", "-vv", "analyze", "cat"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args =
            PolylemmaArgs::try_parse_from(["polylemma", "--quiet", "-v", "analyze", "cat"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            PolylemmaArgs::try_parse_from(["polylemma", "--format", "json", "analyze", "cat"])
                .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);

        assert!(
            PolylemmaArgs::try_parse_from(["polylemma", "--format", "yaml", "analyze", "cat"])
                .is_err()
        );
    }

    #[test]
    fn test_analyze_arguments() {
        let args = PolylemmaArgs::try_parse_from([
            "polylemma",
            "analyze",
            "cats",
            "dogs",
            "--lexicon",
            "eng.json",
            "-l",
            "rus.json",
            "--languages",
            "eng,rus",
            "--priority",
            "rus,eng",
            "--preset",
            "lemmatize-all",
            "--split",
            "wholly",
            "--accept",
            "bastard",
            "--no-fix-list",
        ])
        .unwrap();

        let Command::Analyze(analyze) = args.command else {
            panic!("Expected Analyze command");
        };
        assert_eq!(analyze.words, vec!["cats", "dogs"]);
        assert_eq!(analyze.language.lexicons.len(), 2);
        assert!(analyze.language.languages.contains(Language::Russian));
        assert!(!analyze.language.languages.contains(Language::Turkish));
        assert_eq!(
            analyze.language.priority,
            vec![Language::Russian, Language::English]
        );
        assert_eq!(analyze.options.preset, Preset::LemmatizeAll);
        assert_eq!(analyze.options.split, Some(SplitArg::Wholly));
        assert_eq!(analyze.options.accept, Some(AcceptArg::Bastard));
        assert!(analyze.options.no_fix_list);
    }

    #[test]
    fn test_bad_language_rejected() {
        assert!(
            PolylemmaArgs::try_parse_from(["polylemma", "analyze", "cat", "--languages", "xx"])
                .is_err()
        );
    }

    #[test]
    fn test_instance_updates_keep_order() {
        let args = PolylemmaArgs::try_parse_from([
            "polylemma",
            "instance",
            "walked",
            "--update",
            "shrink,select-best",
            "-u",
            "inject-redundant",
            "--form-type",
            "exact-word",
        ])
        .unwrap();

        let Command::Instance(instance) = args.command else {
            panic!("Expected Instance command");
        };
        assert_eq!(
            instance.updates,
            vec![
                UpdateStep::Shrink,
                UpdateStep::SelectBest,
                UpdateStep::InjectRedundant
            ]
        );
        assert_eq!(instance.form_type, FormTypeArg::ExactWord);
        assert!(instance.prefer.is_none());
        assert_eq!(instance.target, LangMask::all());
    }

    #[test]
    fn test_decimate_arguments() {
        let args = PolylemmaArgs::try_parse_from([
            "polylemma",
            "decimate",
            "resources/decimator.txt",
            "--language",
            "tur",
        ])
        .unwrap();

        let Command::Decimate(decimate) = args.command else {
            panic!("Expected Decimate command");
        };
        assert_eq!(decimate.file, PathBuf::from("resources/decimator.txt"));
        assert_eq!(decimate.language, Some(Language::Turkish));
    }
}
