//! Decomposed inflected forms.

use serde::Serialize;

use crate::grammar::{GramBitSet, GrammarBunch};
use crate::lemma::Lemma;

/// One inflected form, split into the parts its paradigm builds it from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WordformKit {
    pub prefix: String,
    pub stem_base: String,
    pub stem_flexion: String,
    pub flexion: String,
    pub postfix: String,
    /// Flex grammars of every reading sharing these parts.
    pub flex_grammars: Vec<GramBitSet>,
    /// Lower is more frequent.
    pub weight: u32,
}

impl WordformKit {
    pub fn new(stem: impl Into<String>, flexion: impl Into<String>, flex: GramBitSet) -> Self {
        WordformKit {
            stem_base: stem.into(),
            flexion: flexion.into(),
            flex_grammars: vec![flex],
            ..Default::default()
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Surface text of the form.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(
            self.prefix.len()
                + self.stem_base.len()
                + self.stem_flexion.len()
                + self.flexion.len()
                + self.postfix.len(),
        );
        text.push_str(&self.prefix);
        text.push_str(&self.stem_base);
        text.push_str(&self.stem_flexion);
        text.push_str(&self.flexion);
        text.push_str(&self.postfix);
        text
    }

    pub fn has_same_parts(&self, other: &WordformKit) -> bool {
        self.prefix == other.prefix
            && self.stem_base == other.stem_base
            && self.stem_flexion == other.stem_flexion
            && self.flexion == other.flexion
            && self.postfix == other.postfix
    }

    pub fn grammar_bunch(&self) -> GrammarBunch {
        self.flex_grammars.iter().copied().collect()
    }
}

/// The paradigm of a lemma without generation data: the lemma text itself,
/// followed by the analyzed surface form when it differs.
pub fn default_wordforms(lemma: &Lemma) -> Vec<WordformKit> {
    let flex = lemma
        .flex_gram_sets()
        .into_iter()
        .next()
        .unwrap_or_default();
    let mut forms = vec![WordformKit::new(lemma.text(), "", flex)];
    let original = lemma.normalized_form();
    if !original.is_empty() && original != lemma.text() {
        forms.push(WordformKit::new(original, "", flex));
    }
    forms
}
