//! Word analysis: from a raw multitoken to the lemmas of every language.
//!
//! The pipeline classifies the subtokens by alphabet and case
//! ([`classifier`]), splits the multitoken into candidate words per
//! language ([`segmenter`]), and asks each language for analyses while a
//! coverage table ([`coverage`]) arbitrates which quality tiers are still
//! wanted ([`word_analyzer`]).

pub mod classifier;
pub mod coverage;
pub mod multitoken;
pub mod options;
pub mod segmenter;
pub mod word_analyzer;

pub use classifier::ClassifiedMultiToken;
pub use multitoken::{MAX_SUBTOKENS, MultiToken, SubToken};
pub use options::{
    Accept, AcceptLevel, AnalyzeMode, AnalyzeOptions, MultitokenSplit, RecognizeOptions,
    SuffixPolicy, TranslitOptions,
};
pub use word_analyzer::{analyze_classified, analyze_word};
