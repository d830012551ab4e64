//! Compound splitting: which gaps separate words, and which subtoken spans
//! are analyzed as one word.

use crate::analysis::classifier::ClassifiedMultiToken;
use crate::analysis::options::MultitokenSplit;
use crate::language::Language;
use crate::language::capability::LanguageCapability;

/// A contiguous subtoken range `begin..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub begin: usize,
    pub end: usize,
    /// The range glues more than one separator segment.
    pub multitoken: bool,
}

impl Chunk {
    pub fn new(begin: usize, end: usize, multitoken: bool) -> Self {
        Chunk {
            begin,
            end,
            multitoken,
        }
    }

    /// A single subtoken.
    pub fn single(index: usize) -> Self {
        Chunk::new(index, index + 1, false)
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// Word separators of a classified multitoken for one language.
pub struct Segmenter<'t> {
    token: &'t ClassifiedMultiToken<'t>,
    language: Language,
    split: MultitokenSplit,
    separators: Vec<usize>,
}

impl<'t> Segmenter<'t> {
    pub fn new(
        token: &'t ClassifiedMultiToken<'t>,
        capability: &dyn LanguageCapability,
        language: Language,
        foreign: bool,
        split: MultitokenSplit,
    ) -> Self {
        let n = token.num_tokens();
        let text = token.projection(language);
        let mut separators = vec![0];
        if split != MultitokenSplit::Wholly {
            for i in 1..n {
                let previous = token.subtoken(i - 1);
                let next = token.subtoken(i);
                if split == MultitokenSplit::SplitAll
                    || !check_language(token, language, i - 1)
                    || !check_language(token, language, i)
                    || capability.can_break(text, previous.pos, previous.len, next.pos, next.len, foreign)
                {
                    separators.push(i);
                }
            }
        }
        separators.push(n);

        Segmenter {
            token,
            language,
            split,
            separators,
        }
    }

    /// Separator positions, from `0` to the number of subtokens.
    pub fn separators(&self) -> &[usize] {
        &self.separators
    }

    /// Candidate chunks of at most `max_tokens` separator segments.
    ///
    /// Each call enumerates from scratch. Under [`MultitokenSplit::SplitAll`]
    /// every chunk is a single subtoken.
    pub fn chunks(&self, max_tokens: usize) -> Chunks<'_, 't> {
        let max_tokens = match self.split {
            MultitokenSplit::SplitAll => 1,
            _ => max_tokens.max(1),
        };
        Chunks {
            segmenter: self,
            max_tokens,
            first: 0,
            num: 0,
        }
    }

    fn check_alpha(&self, index: usize) -> bool {
        self.token.token_languages(index).contains(self.language)
    }
}

fn check_language(token: &ClassifiedMultiToken<'_>, language: Language, index: usize) -> bool {
    language == Language::Unknown || token.token_languages(index).contains(language)
}

/// Iterator over the chunks of a [`Segmenter`].
///
/// For each start separator the chunk grows one segment at a time while
/// both its first and last subtokens belong to the language; a failing
/// subtoken moves on to the next start.
pub struct Chunks<'s, 't> {
    segmenter: &'s Segmenter<'t>,
    max_tokens: usize,
    first: usize,
    num: usize,
}

impl Chunks<'_, '_> {
    fn begin(&self) -> usize {
        self.segmenter.separators[self.first]
    }

    fn end(&self) -> usize {
        self.segmenter.separators[self.first + self.num]
    }

    fn advance(&mut self) -> bool {
        let count = self.segmenter.separators.len();
        while self.first + 1 < count {
            if self.segmenter.check_alpha(self.begin()) {
                self.num += 1;
                if self.num <= self.max_tokens
                    && self.first + self.num < count
                    && self.segmenter.check_alpha(self.end() - 1)
                {
                    return true;
                }
            }
            self.num = 0;
            self.first += 1;
        }
        false
    }
}

impl Iterator for Chunks<'_, '_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if !self.advance() {
            return None;
        }
        Some(Chunk::new(self.begin(), self.end(), self.num > 1))
    }
}
