//! Per-position coverage quality of one analysis call.
//!
//! Every subtoken position remembers the best quality any lemma covering it
//! has reached so far. Lemmas found while analyzing a priority language
//! carry the [`CoverageLevel::PRIMARY`] bit, which ranks them above any
//! secondary lemma. The table decides which quality tiers a later language
//! may still contribute for a chunk.

use std::fmt;

use crate::analysis::options::{Accept, AnalyzeOptions};
use crate::analysis::segmenter::Chunk;
use crate::language::Language;
use crate::lemma::{Lemma, Quality};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CoverageLevel(u16);

impl CoverageLevel {
    pub const NONE: CoverageLevel = CoverageLevel(0);
    pub const FOUNDLING: CoverageLevel = CoverageLevel(1);
    pub const BASTARD: CoverageLevel = CoverageLevel(2);
    pub const REGULAR: CoverageLevel = CoverageLevel(3);
    pub const PRIMARY: CoverageLevel = CoverageLevel(0x8000);
    pub const PRIMARY_FOUNDLING: CoverageLevel = CoverageLevel(0x8000 | 1);
    pub const PRIMARY_BASTARD: CoverageLevel = CoverageLevel(0x8000 | 2);
    pub const PRIMARY_REGULAR: CoverageLevel = CoverageLevel(0x8000 | 3);

    pub fn is_primary(self) -> bool {
        self.0 & Self::PRIMARY.0 != 0
    }
}

impl fmt::Debug for CoverageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.0 & 0x7FFF {
            0 => "none",
            1 => "foundling",
            2 => "bastard",
            _ => "regular",
        };
        if self.is_primary() {
            write!(f, "primary-{base}")
        } else {
            f.write_str(base)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Coverage<'o> {
    cells: Vec<CoverageLevel>,
    opt: &'o AnalyzeOptions,
    primary: bool,
}

impl<'o> Coverage<'o> {
    pub fn new(num_tokens: usize, opt: &'o AnalyzeOptions) -> Self {
        Coverage {
            cells: vec![CoverageLevel::NONE; num_tokens],
            opt,
            primary: false,
        }
    }

    /// Marks subsequent records as coming from a priority language.
    pub fn set_primary(&mut self, primary: bool) {
        self.primary = primary;
    }

    pub fn clear(&mut self) {
        self.cells.fill(CoverageLevel::NONE);
    }

    pub fn level(&self, index: usize) -> CoverageLevel {
        self.cells[index]
    }

    pub fn is_covered(&self, index: usize) -> bool {
        self.cells[index] > CoverageLevel::NONE
    }

    pub fn any_covered(&self) -> bool {
        self.cells.iter().any(|cell| *cell > CoverageLevel::NONE)
    }

    /// Raises every position the lemma spans to its quality.
    pub fn record(&mut self, lemma: &Lemma) {
        let quality = self.lemma_level(lemma);
        let begin = lemma.token_pos();
        let end = (begin + lemma.token_span()).min(self.cells.len());
        debug_assert!(begin < self.cells.len(), "lemma outside the multitoken");
        for cell in self.cells.iter_mut().take(end).skip(begin) {
            *cell = (*cell).max(quality);
        }
    }

    /// Lowest level over `begin..end`.
    pub fn min_level(&self, begin: usize, end: usize) -> CoverageLevel {
        self.cells[begin..end]
            .iter()
            .copied()
            .fold(CoverageLevel::PRIMARY_REGULAR, CoverageLevel::min)
    }

    /// Quality tiers `language` may still contribute for `chunk`.
    pub fn accept_mode(&self, language: Language, foreign: bool, chunk: &Chunk) -> Accept {
        let min = self.min_level(chunk.begin, chunk.end);
        if min >= CoverageLevel::PRIMARY_REGULAR {
            return Accept::NONE;
        }
        if foreign {
            return self.foreign_accept(language);
        }
        self.native_accept(language, min, chunk.multitoken)
    }

    /// Whether a lemma must be replaced by its surface form because its tier
    /// was only produced to have something to reset.
    pub fn should_reset(&self, lemma: &Lemma) -> bool {
        let language = lemma.language();
        if !self.reset_forced(language) {
            return false;
        }
        let quality = lemma.quality();
        if quality.intersects(Quality::FROM_ENGLISH | Quality::TO_ENGLISH) {
            return false;
        }
        if quality.contains(Quality::FOUNDLING) {
            false
        } else if quality.contains(Quality::SOB) {
            !self.opt.accept_sob.contains(language)
        } else if quality.contains(Quality::BASTARD) {
            !self.opt.accept_bastard.contains(language)
        } else {
            !self.opt.accept_dictionary.contains(language)
        }
    }

    fn lemma_level(&self, lemma: &Lemma) -> CoverageLevel {
        let quality = lemma.quality();
        let mut level = if quality.contains(Quality::FOUNDLING) {
            CoverageLevel::FOUNDLING
        } else if lemma.is_bastard() {
            CoverageLevel::BASTARD
        } else {
            CoverageLevel::REGULAR
        };
        if self.primary {
            level = CoverageLevel(level.0 | CoverageLevel::PRIMARY.0);
        }
        level
    }

    fn native_accept(&self, language: Language, min: CoverageLevel, multitoken: bool) -> Accept {
        let opt = self.opt;
        let anyway = self.reset_forced(language);
        let mut accept = Accept::NONE;

        if opt.accept_dictionary.contains(language) || anyway {
            accept |= Accept::DICTIONARY;
        }
        // heuristic tiers only for single words
        if multitoken {
            return accept;
        }
        if min < CoverageLevel::PRIMARY_BASTARD {
            if opt.accept_sob.contains(language) || anyway {
                accept |= Accept::SOB;
            }
            if opt.accept_bastard.contains(language) || anyway {
                accept |= Accept::BASTARD;
            }
        }
        if (min < CoverageLevel::PRIMARY_FOUNDLING && opt.accept_foundling.contains(language))
            || language == Language::Unknown
        {
            accept |= Accept::FOUNDLING;
        }
        accept
    }

    fn foreign_accept(&self, language: Language) -> Accept {
        let mut accept = Accept::NONE;
        if self.opt.accept_from_english.contains(language) {
            accept |= Accept::FROM_ENGLISH;
        }
        if self.opt.accept_translit.contains(language) {
            accept |= Accept::TRANSLIT;
        }
        accept
    }

    fn reset_forced(&self, language: Language) -> bool {
        self.opt.reset_lemma_to_form && self.opt.accept_foundling.contains(language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::options::AcceptLevel;
    use crate::language::LangMask;
    use crate::lemma::LemmaSetter;

    fn lemma(pos: usize, span: usize, quality: Quality) -> Lemma {
        let mut lemma = Lemma::new(Language::English);
        let mut setter = LemmaSetter::new(&mut lemma);
        setter.set_text("word");
        setter.set_token(pos, span);
        setter.set_quality(quality);
        lemma
    }

    #[test]
    fn test_record_is_monotonic() {
        let opt = AnalyzeOptions::default();
        let mut coverage = Coverage::new(3, &opt);
        coverage.record(&lemma(0, 2, Quality::BASTARD));
        assert_eq!(coverage.level(0), CoverageLevel::BASTARD);
        assert_eq!(coverage.level(1), CoverageLevel::BASTARD);
        assert!(!coverage.is_covered(2));

        coverage.record(&lemma(1, 1, Quality::FOUNDLING));
        assert_eq!(coverage.level(1), CoverageLevel::BASTARD);
        coverage.record(&lemma(1, 1, Quality::DICTIONARY));
        assert_eq!(coverage.level(1), CoverageLevel::REGULAR);
        assert_eq!(coverage.min_level(0, 2), CoverageLevel::BASTARD);
    }

    #[test]
    fn test_primary_dominance() {
        let opt = AnalyzeOptions::default();
        let mut coverage = Coverage::new(1, &opt);
        coverage.set_primary(true);
        coverage.record(&lemma(0, 1, Quality::FOUNDLING));
        coverage.set_primary(false);
        coverage.record(&lemma(0, 1, Quality::DICTIONARY));
        assert_eq!(coverage.level(0), CoverageLevel::PRIMARY_FOUNDLING);

        // a primary foundling still leaves room for secondary bastards
        let accept = coverage.accept_mode(Language::Russian, false, &Chunk::single(0));
        assert!(accept.contains(Accept::DICTIONARY | Accept::SOB | Accept::BASTARD));
        assert!(!accept.contains(Accept::FOUNDLING));
    }

    #[test]
    fn test_primary_regular_refuses_everything() {
        let opt = AnalyzeOptions::default().with_accept_translit(LangMask::all());
        let mut coverage = Coverage::new(1, &opt);
        coverage.set_primary(true);
        coverage.record(&lemma(0, 1, Quality::DICTIONARY));
        let chunk = Chunk::single(0);
        assert!(coverage.accept_mode(Language::English, false, &chunk).is_empty());
        assert!(coverage.accept_mode(Language::Unknown, false, &chunk).is_empty());
        assert!(coverage.accept_mode(Language::English, true, &chunk).is_empty());
    }

    #[test]
    fn test_primary_bastard_blocks_heuristics() {
        let opt = AnalyzeOptions::default();
        let mut coverage = Coverage::new(1, &opt);
        coverage.set_primary(true);
        coverage.record(&lemma(0, 1, Quality::BASTARD));
        let accept = coverage.accept_mode(Language::German, false, &Chunk::single(0));
        assert_eq!(accept, Accept::DICTIONARY);
    }

    #[test]
    fn test_multitoken_chunks_accept_dictionary_only() {
        let opt = AnalyzeOptions::default();
        let coverage = Coverage::new(2, &opt);
        let accept = coverage.accept_mode(Language::English, false, &Chunk::new(0, 2, true));
        assert_eq!(accept, Accept::DICTIONARY);
        let accept = coverage.accept_mode(Language::English, false, &Chunk::new(0, 2, false));
        assert_eq!(accept, Accept::NATIVE);
    }

    #[test]
    fn test_foreign_accept() {
        let opt = AnalyzeOptions::default()
            .with_accept_translit(LangMask::single(Language::Russian));
        let coverage = Coverage::new(1, &opt);
        let chunk = Chunk::single(0);
        assert_eq!(coverage.accept_mode(Language::Russian, true, &chunk), Accept::TRANSLIT);
        assert!(coverage.accept_mode(Language::English, true, &chunk).is_empty());
    }

    #[test]
    fn test_should_reset() {
        let mut opt = AnalyzeOptions::default()
            .with_accept_level(AcceptLevel::Dictionary)
            .with_reset_lemma_to_form(true);
        opt.accept_foundling = LangMask::all();
        let coverage = Coverage::new(1, &opt);

        assert!(coverage.should_reset(&lemma(0, 1, Quality::BASTARD)));
        assert!(coverage.should_reset(&lemma(0, 1, Quality::SOB)));
        assert!(!coverage.should_reset(&lemma(0, 1, Quality::DICTIONARY)));
        assert!(!coverage.should_reset(&lemma(0, 1, Quality::FOUNDLING)));
        assert!(!coverage.should_reset(&lemma(0, 1, Quality::BASTARD | Quality::FROM_ENGLISH)));

        // without foundling acceptance nothing is forced
        let coverage_opt = AnalyzeOptions::default()
            .with_accept_level(AcceptLevel::Dictionary)
            .with_reset_lemma_to_form(true);
        let coverage = Coverage::new(1, &coverage_opt);
        assert!(!coverage.should_reset(&lemma(0, 1, Quality::BASTARD)));
    }
}
