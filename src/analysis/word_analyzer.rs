//! Multi-language analysis of one multitoken.
//!
//! Priority languages are analyzed first and mark their coverage as
//! primary; the remaining languages of the mask follow. Positions nothing
//! covers get unknown-language foundlings. When transliteration is
//! accepted for some language, a second run reads the word through the
//! secondary alphabets and asks the languages for transliterated analyses.

use std::sync::Arc;

use log::{debug, warn};

use crate::analysis::classifier::ClassifiedMultiToken;
use crate::analysis::coverage::Coverage;
use crate::analysis::multitoken::MultiToken;
use crate::analysis::options::{
    Accept, AnalyzeMode, AnalyzeOptions, MultitokenSplit, RecognizeOptions, SuffixPolicy,
};
use crate::analysis::segmenter::{Chunk, Segmenter};
use crate::error::{PolylemmaError, Result};
use crate::language::capability::LanguageCapability;
use crate::language::{LangMask, Language, LanguageRegistry};
use crate::lemma::{CharCategory, Lemma, LemmaSetter};

/// All lemmas of `token` in the languages of `langmask`.
///
/// `priority` lists languages analyzed first, in order; only those in
/// `langmask` are used. An empty token yields no lemmas.
pub fn analyze_word(
    registry: &LanguageRegistry,
    token: &MultiToken,
    langmask: LangMask,
    priority: &[Language],
    opt: &AnalyzeOptions,
) -> Result<Vec<Lemma>> {
    let mut out = Vec::new();
    if token.is_empty() {
        return Ok(out);
    }
    let classified = ClassifiedMultiToken::new(token, true);
    analyze_classified(registry, &classified, langmask, priority, opt, AnalyzeMode::Normal, &mut out)?;

    if opt.accept_translit.any() {
        let secondary = ClassifiedMultiToken::new(token, false);
        analyze_classified(registry, &secondary, langmask, priority, opt, AnalyzeMode::Translit, &mut out)?;
    }
    Ok(out)
}

/// One analyzer run in the given mode, appending to `out`.
///
/// [`AnalyzeMode::Translate`] is not supported and fails.
pub fn analyze_classified(
    registry: &LanguageRegistry,
    token: &ClassifiedMultiToken<'_>,
    langmask: LangMask,
    priority: &[Language],
    opt: &AnalyzeOptions,
    mode: AnalyzeMode,
    out: &mut Vec<Lemma>,
) -> Result<usize> {
    if mode == AnalyzeMode::Translate {
        return Err(PolylemmaError::unsupported_mode(
            "translation is not supported by the analyzer",
        ));
    }
    let before = out.len();
    WordAnalyzer {
        registry,
        token,
        opt,
        langmask,
        priority,
        mode,
        coverage: Coverage::new(token.num_tokens(), opt),
        out: &mut *out,
    }
    .run()?;
    Ok(out.len() - before)
}

struct WordAnalyzer<'a, 't> {
    registry: &'a LanguageRegistry,
    token: &'a ClassifiedMultiToken<'t>,
    opt: &'a AnalyzeOptions,
    langmask: LangMask,
    priority: &'a [Language],
    mode: AnalyzeMode,
    coverage: Coverage<'a>,
    out: &'a mut Vec<Lemma>,
}

impl WordAnalyzer<'_, '_> {
    fn foreign(&self) -> bool {
        self.mode != AnalyzeMode::Normal
    }

    fn run(&mut self) -> Result<()> {
        if self.token.num_tokens() == 0 || self.token.original().char_len() == 0 {
            return Ok(());
        }
        let mut remaining = self.langmask;

        self.coverage.set_primary(true);
        for &language in self.priority {
            if self.langmask.contains(language) {
                self.analyze_as_language(language, &mut remaining)?;
            }
        }

        self.coverage.set_primary(false);
        let secondary: Vec<Language> = remaining.iter().collect();
        for language in secondary {
            self.analyze_as_language(language, &mut remaining)?;
        }

        if !self.foreign() {
            let count = self.add_foundlings(Language::Unknown, true)?;
            debug!("added {count} fallback foundlings");
        }
        Ok(())
    }

    fn analyze_as_language(&mut self, language: Language, remaining: &mut LangMask) -> Result<()> {
        if self.registry.contains(language) {
            if self.foreign() || remaining.contains(language) {
                let count = self.analyze_known_language(language)?;
                debug!("{:?} pass produced {count} lemmas in {language}", self.mode);
            }
        } else if self.opt.return_foundling_anyway && !self.foreign() {
            self.add_foundlings(language, false)?;
        }
        remaining.remove(language);
        Ok(())
    }

    fn analyze_known_language(&mut self, language: Language) -> Result<usize> {
        let capability = Arc::clone(self.registry.get(language));
        let start = self.out.len();

        let chunks: Vec<Chunk> = {
            let segmenter = Segmenter::new(
                self.token,
                capability.as_ref(),
                language,
                self.foreign(),
                self.opt.multitoken_split,
            );
            segmenter.chunks(self.opt.max_tokens_in_compound).collect()
        };
        for chunk in chunks {
            let accept = self.coverage.accept_mode(language, self.foreign(), &chunk);
            if accept.is_empty() {
                continue;
            }
            self.analyze_chunk(capability.as_ref(), language, accept, chunk)?;
        }

        for lemma in &self.out[start..] {
            self.coverage.record(lemma);
        }
        for lemma in &mut self.out[start..] {
            if self.coverage.should_reset(lemma) {
                LemmaSetter::new(lemma).reset_to_form();
            }
        }

        let n = self.token.num_tokens();
        if self.opt.analyze_whole_multitoken && n > 1 {
            let accept = Accept::DICTIONARY | Accept::BASTARD;
            self.analyze_chunk(capability.as_ref(), language, accept, Chunk::new(0, n, true))?;
        }
        Ok(self.out.len() - start)
    }

    /// Unknown-language foundlings tagged with `language`: one for the
    /// whole word under [`MultitokenSplit::Wholly`], otherwise one per
    /// position.
    fn add_foundlings(&mut self, language: Language, uncovered_only: bool) -> Result<usize> {
        let unknown = Arc::clone(self.registry.unknown());
        let start = self.out.len();
        let n = self.token.num_tokens();

        if self.opt.multitoken_split == MultitokenSplit::Wholly {
            if !uncovered_only || !self.coverage.any_covered() {
                self.analyze_chunk(unknown.as_ref(), language, Accept::FOUNDLING, Chunk::new(0, n, false))?;
            }
        } else {
            for i in 0..n {
                if !uncovered_only || !self.coverage.is_covered(i) {
                    self.analyze_chunk(unknown.as_ref(), language, Accept::FOUNDLING, Chunk::single(i))?;
                }
            }
        }

        for lemma in &mut self.out[start..] {
            LemmaSetter::new(lemma).set_language(language);
            self.coverage.record(lemma);
        }
        Ok(self.out.len() - start)
    }

    /// Analyzes the text of `chunk` as seen by `projection` and appends the
    /// results with their span, case and suffix metadata.
    fn analyze_chunk(
        &mut self,
        capability: &dyn LanguageCapability,
        projection: Language,
        accept: Accept,
        chunk: Chunk,
    ) -> Result<usize> {
        let form = self.token.span_text(projection, chunk.begin, chunk.end);
        let lemmas = match self.mode {
            AnalyzeMode::Normal => {
                let opt: RecognizeOptions = self.opt.recognize_options(capability.language(), accept);
                capability.recognize(&form, &opt)
            }
            AnalyzeMode::Translit if accept.contains(Accept::TRANSLIT) => {
                let opt = self.opt.translit_options(capability.language());
                capability.recognize_as_transliteration(&form, self.opt.max_translit_lemmas, &opt)
            }
            AnalyzeMode::Translit => Vec::new(),
            AnalyzeMode::Translate => {
                return Err(PolylemmaError::unsupported_mode(
                    "translation is not supported by the analyzer",
                ));
            }
        };
        if lemmas.is_empty() {
            return Ok(0);
        }

        let initial = self.token.original_span_text(chunk.begin, chunk.end);
        let mut case = self.token.case_flags(chunk.begin, chunk.end);
        if chunk.multitoken {
            case |= CharCategory::COMPOUND;
        }
        let start = self.out.len();
        for mut lemma in lemmas {
            let mut setter = LemmaSetter::new(&mut lemma);
            setter.set_token(chunk.begin, chunk.len());
            setter.set_case_flags(case);
            setter.set_initial_form(&initial);
            self.out.push(lemma);
        }
        self.add_suffix(projection, chunk, start);
        Ok(self.out.len() - start)
    }

    fn add_suffix(&mut self, projection: Language, chunk: Chunk, start: usize) {
        if chunk.end != self.token.num_tokens() || self.opt.suffix == SuffixPolicy::No {
            return;
        }
        let suffix = self.token.suffix(projection, chunk.begin, chunk.end);
        if suffix.is_empty() {
            return;
        }
        let end = self.out.len();
        for i in start..end {
            match self.opt.suffix {
                SuffixPolicy::Both => {
                    let mut copy = self.out[i].clone();
                    if LemmaSetter::new(&mut copy).add_suffix(&suffix) {
                        self.out.push(copy);
                    } else {
                        warn!("dropping suffixed copy of '{}': '{}' does not fit", self.out[i].text(), suffix);
                    }
                }
                SuffixPolicy::Only => {
                    LemmaSetter::new(&mut self.out[i]).add_suffix(&suffix);
                }
                SuffixPolicy::No => {}
            }
        }
    }
}
