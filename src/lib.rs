//! # Polylemma
//!
//! A multi-language morphological analyzer for Rust.
//!
//! ## Features
//!
//! - Multitoken classification and compound splitting
//! - Multi-language lemma arbitration with primary-language precedence
//! - Pluggable per-language capabilities behind a registry
//! - Lazy paradigm generation with decimation for agglutinative languages
//! - Word instances aggregating every candidate lemma of a surface word
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use polylemma::analysis::{analyze_word, AnalyzeOptions, MultiToken};
//! use polylemma::language::lexicon::LexiconLanguage;
//! use polylemma::language::{LangMask, Language, LanguageRegistry};
//!
//! let english = LexiconLanguage::from_json_str(
//!     r#"{"language": "eng", "entries": [{"lemma": "europa", "grammar": ["S", "geo"]}]}"#,
//! )
//! .unwrap();
//!
//! let mut registry = LanguageRegistry::new();
//! registry.register(Arc::new(english));
//!
//! let token = MultiToken::from_text("europa");
//! let lemmas = analyze_word(
//!     &registry,
//!     &token,
//!     LangMask::single(Language::English),
//!     &[],
//!     &AnalyzeOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(lemmas[0].text(), "europa");
//! ```

/// Bit-flag plumbing shared by the small flag newtypes of the crate.
macro_rules! impl_flag_ops {
    ($name:ident) => {
        impl $name {
            pub const fn bits(self) -> u32 {
                self.0
            }

            pub const fn from_bits(bits: u32) -> Self {
                $name(bits)
            }

            pub const fn contains(self, other: $name) -> bool {
                self.0 & other.0 == other.0
            }

            pub const fn intersects(self, other: $name) -> bool {
                self.0 & other.0 != 0
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub fn insert(&mut self, other: $name) {
                self.0 |= other.0;
            }

            pub fn remove(&mut self, other: $name) {
                self.0 &= !other.0;
            }
        }

        impl std::ops::BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: $name) {
                self.0 |= rhs.0;
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = $name;

            fn bitand(self, rhs: $name) -> $name {
                $name(self.0 & rhs.0)
            }
        }

        impl std::ops::BitAndAssign for $name {
            fn bitand_assign(&mut self, rhs: $name) {
                self.0 &= rhs.0;
            }
        }

        impl std::ops::Not for $name {
            type Output = $name;

            fn not(self) -> $name {
                $name(!self.0)
            }
        }
    };
}

pub mod analysis;
pub mod cli;
pub mod error;
pub mod grammar;
pub mod language;
pub mod lemma;
pub mod lemma_forms;
pub mod paradigm;
pub mod word_instance;

pub mod prelude {
    pub use crate::analysis::{AnalyzeOptions, MultiToken, analyze_word};
    pub use crate::error::{PolylemmaError, Result};
    pub use crate::grammar::{GramBitSet, Grammeme};
    pub use crate::language::{LangMask, Language, LanguageCapability, LanguageRegistry};
    pub use crate::lemma::{Lemma, Quality};
    pub use crate::lemma_forms::LemmaForms;
    pub use crate::word_instance::{LanguageContext, WordInstance};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
