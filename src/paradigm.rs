//! Paradigms: the inflected forms of a lemma.
//!
//! Language capabilities produce raw [`wordform::WordformKit`] entries;
//! [`generator::FormGenerator`] filters and coalesces them lazily, and
//! [`decimator::FormDecimator`] prunes oversized paradigms of agglutinative
//! languages down to their frequent forms.

pub mod decimator;
pub mod filter;
pub mod generator;
pub mod wordform;

pub use decimator::{DecimatorFilter, FormDecimator};
pub use filter::{ClueFilter, GrammarFilter, LemmaLikeFilter, PassAll};
pub use generator::FormGenerator;
pub use wordform::WordformKit;
