//! Grammar filters applied during recognition and paradigm generation.
//!
//! A filter is first bound to a lemma with [`GrammarFilter::set_lemma`], then
//! asked whether the stem fits at all and which flex grammars pass.

use std::fmt;

use crate::error::Result;
use crate::grammar::{GramBitSet, Grammeme, GrammemeClass, parse_grammemes};
use crate::lemma::{Lemma, LllLevel};

pub trait GrammarFilter: Send + Sync + fmt::Debug {
    /// Binds the filter to the lemma whose forms are about to be checked.
    fn set_lemma(&mut self, lemma: &Lemma);

    /// Whether any form of the bound lemma can pass.
    fn is_proper_stem(&self) -> bool;

    fn check_flex(&self, flex: &GramBitSet) -> bool;

    fn clone_box(&self) -> Box<dyn GrammarFilter>;
}

impl Clone for Box<dyn GrammarFilter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Lets everything through.
#[derive(Debug, Clone, Default)]
pub struct PassAll;

impl GrammarFilter for PassAll {
    fn set_lemma(&mut self, _lemma: &Lemma) {}

    fn is_proper_stem(&self) -> bool {
        true
    }

    fn check_flex(&self, _flex: &GramBitSet) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn GrammarFilter> {
        Box::new(self.clone())
    }
}

/// Required-grammar filter built from a clue such as `S,nom|V,inf`.
///
/// Each `|`-separated alternative lists grammemes that must all hold. A
/// grammeme already present in the stem is satisfied; one whose class is
/// occupied by a different stem grammeme rules the alternative out; the
/// rest must be found in a flex grammar.
#[derive(Debug, Clone, Default)]
pub struct ClueFilter {
    alternatives: Vec<Vec<Grammeme>>,
    needed_flex: Vec<GramBitSet>,
}

impl ClueFilter {
    /// Parses a clue. An empty clue yields `None`.
    pub fn parse(clue: &str) -> Result<Option<ClueFilter>> {
        let mut alternatives = Vec::new();
        for part in clue.split('|') {
            let grams = parse_grammemes(part)?;
            if !grams.is_empty() {
                alternatives.push(grams);
            }
        }
        if alternatives.is_empty() {
            return Ok(None);
        }
        Ok(Some(ClueFilter {
            alternatives,
            needed_flex: Vec::new(),
        }))
    }

    /// Flex grammars of `lemma` that pass, or `None` when the lemma does
    /// not pass at all.
    pub fn restrict(&mut self, lemma: &Lemma) -> Option<Vec<Vec<Grammeme>>> {
        self.set_lemma(lemma);
        if !self.is_proper_stem() {
            return None;
        }
        if lemma.flex_grammars().is_empty() {
            return self
                .check_flex(&GramBitSet::empty())
                .then(Vec::new);
        }
        let kept: Vec<Vec<Grammeme>> = lemma
            .flex_grammars()
            .iter()
            .zip(lemma.flex_gram_sets())
            .filter(|(_, set)| self.check_flex(set))
            .map(|(flex, _)| flex.clone())
            .collect();
        (!kept.is_empty()).then_some(kept)
    }
}

impl GrammarFilter for ClueFilter {
    fn set_lemma(&mut self, lemma: &Lemma) {
        let stem = lemma.stem_grammar();
        self.needed_flex = self
            .alternatives
            .iter()
            .filter_map(|alternative| {
                let mut needed = GramBitSet::empty();
                for gram in alternative {
                    if stem.contains(gram) {
                        continue;
                    }
                    let class = gram.class();
                    if class != GrammemeClass::None && stem.iter().any(|s| s.class() == class) {
                        return None;
                    }
                    needed.insert(*gram);
                }
                Some(needed)
            })
            .collect();
    }

    fn is_proper_stem(&self) -> bool {
        !self.needed_flex.is_empty()
    }

    fn check_flex(&self, flex: &GramBitSet) -> bool {
        self.needed_flex.iter().any(|needed| flex.has_all(needed))
    }

    fn clone_box(&self) -> Box<dyn GrammarFilter> {
        Box::new(self.clone())
    }
}

/// Keeps the forms of a lemma that could themselves be cited as the lemma:
/// infinitives, nominatives and forms carrying no case, mood or tense.
///
/// Plural forms pass only for pluralia tantum ([`LllLevel::Tantum`]).
#[derive(Debug, Clone)]
pub struct LemmaLikeFilter {
    level: LllLevel,
    stem: GramBitSet,
}

impl LemmaLikeFilter {
    pub fn new(level: LllLevel) -> Self {
        LemmaLikeFilter {
            level,
            stem: GramBitSet::empty(),
        }
    }
}

impl GrammarFilter for LemmaLikeFilter {
    fn set_lemma(&mut self, lemma: &Lemma) {
        self.stem = lemma.stem_gram_set();
    }

    fn is_proper_stem(&self) -> bool {
        self.level != LllLevel::No
    }

    fn check_flex(&self, flex: &GramBitSet) -> bool {
        if flex.contains(Grammeme::Infinitive) {
            return true;
        }
        if flex.contains(Grammeme::Plural) && self.level != LllLevel::Tantum {
            return false;
        }
        if flex.contains(Grammeme::Comparative) || flex.contains(Grammeme::Superlative) {
            return false;
        }
        let all = *flex | self.stem;
        flex.contains(Grammeme::Nominative)
            || !all.iter().any(|g| {
                matches!(
                    g.class(),
                    GrammemeClass::Case | GrammemeClass::Mood | GrammemeClass::Tense
                )
            })
    }

    fn clone_box(&self) -> Box<dyn GrammarFilter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::lemma::LemmaSetter;

    fn noun() -> Lemma {
        let mut lemma = Lemma::new(Language::Russian);
        let mut setter = LemmaSetter::new(&mut lemma);
        setter.set_text("мама");
        setter.set_stem_grammar(vec![Grammeme::Substantive, Grammeme::Feminine]);
        setter.add_flex_grammar(vec![Grammeme::Nominative, Grammeme::Singular]);
        setter.add_flex_grammar(vec![Grammeme::Genitive, Grammeme::Plural]);
        lemma
    }

    #[test]
    fn test_empty_clue() {
        assert!(ClueFilter::parse("").unwrap().is_none());
        assert!(ClueFilter::parse(" | ").unwrap().is_none());
        assert!(ClueFilter::parse("S,bogus").is_err());
    }

    #[test]
    fn test_stem_conflict_rules_out_alternative() {
        let mut filter = ClueFilter::parse("V,inf").unwrap().unwrap();
        filter.set_lemma(&noun());
        assert!(!filter.is_proper_stem());

        let mut filter = ClueFilter::parse("V,inf|S,gen").unwrap().unwrap();
        filter.set_lemma(&noun());
        assert!(filter.is_proper_stem());
        assert!(filter.check_flex(&"gen,pl".parse().unwrap()));
        assert!(!filter.check_flex(&"nom,sg".parse().unwrap()));
    }

    #[test]
    fn test_restrict() {
        let mut filter = ClueFilter::parse("S,pl").unwrap().unwrap();
        let kept = filter.restrict(&noun()).unwrap();
        assert_eq!(kept, vec![vec![Grammeme::Genitive, Grammeme::Plural]]);

        let mut filter = ClueFilter::parse("S,m").unwrap().unwrap();
        assert!(filter.restrict(&noun()).is_none());
    }

    #[test]
    fn test_lemma_like_filter() {
        let mut filter = LemmaLikeFilter::new(LllLevel::Lll);
        filter.set_lemma(&noun());
        assert!(filter.is_proper_stem());
        assert!(filter.check_flex(&"nom,sg".parse().unwrap()));
        assert!(!filter.check_flex(&"gen,sg".parse().unwrap()));
        assert!(!filter.check_flex(&"nom,pl".parse().unwrap()));

        let mut tantum = LemmaLikeFilter::new(LllLevel::Tantum);
        tantum.set_lemma(&noun());
        assert!(tantum.check_flex(&"nom,pl".parse().unwrap()));

        assert!(!LemmaLikeFilter::new(LllLevel::No).is_proper_stem());
    }

    #[test]
    fn test_pass_all() {
        let mut filter = PassAll;
        filter.set_lemma(&noun());
        assert!(filter.is_proper_stem());
        assert!(filter.check_flex(&GramBitSet::empty()));
    }
}
