//! Lazy paradigm generation.

use std::iter::Peekable;

use crate::paradigm::filter::{GrammarFilter, PassAll};
use crate::paradigm::wordform::WordformKit;
use crate::lemma::Lemma;

/// Boxed source of raw wordforms produced by a language capability.
pub type WordformSource<'a> = Box<dyn Iterator<Item = WordformKit> + 'a>;

/// Forward-only sequence of the inflected forms of one lemma.
///
/// Entries rejected by the filter are skipped; consecutive entries built from
/// the same parts are merged into one form carrying all their flex grammars.
pub struct FormGenerator<'a> {
    source: Option<Peekable<WordformSource<'a>>>,
    filter: Box<dyn GrammarFilter>,
}

impl<'a> FormGenerator<'a> {
    pub fn new(source: WordformSource<'a>, lemma: &Lemma, filter: Option<&dyn GrammarFilter>) -> Self {
        let mut filter = match filter {
            Some(filter) => filter.clone_box(),
            None => Box::new(PassAll),
        };
        filter.set_lemma(lemma);
        let source = filter.is_proper_stem().then(|| source.peekable());
        FormGenerator { source, filter }
    }

    /// A generator that yields nothing.
    pub fn empty() -> Self {
        FormGenerator {
            source: None,
            filter: Box::new(PassAll),
        }
    }

    /// Keeps the flex grammars that pass; `None` when none does.
    fn accept(&self, mut kit: WordformKit) -> Option<WordformKit> {
        if kit.flex_grammars.is_empty() {
            return self.filter.check_flex(&Default::default()).then_some(kit);
        }
        kit.flex_grammars.retain(|flex| self.filter.check_flex(flex));
        (!kit.flex_grammars.is_empty()).then_some(kit)
    }
}

impl Iterator for FormGenerator<'_> {
    type Item = WordformKit;

    fn next(&mut self) -> Option<WordformKit> {
        let mut current = loop {
            let raw = self.source.as_mut()?.next()?;
            if let Some(kit) = self.accept(raw) {
                break kit;
            }
        };
        loop {
            let Some(source) = self.source.as_mut() else {
                break;
            };
            match source.peek() {
                Some(next) if next.has_same_parts(&current) => {}
                _ => break,
            }
            let Some(next) = source.next() else {
                break;
            };
            if let Some(next) = self.accept(next) {
                for flex in next.flex_grammars {
                    if !current.flex_grammars.contains(&flex) {
                        current.flex_grammars.push(flex);
                    }
                }
                current.weight = current.weight.min(next.weight);
            }
        }
        Some(current)
    }
}
