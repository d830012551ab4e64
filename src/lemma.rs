//! The `Lemma` value produced by language capabilities.
//!
//! A lemma is built by a recognizer and then adjusted by the word analyzer
//! (token span, case flags, suffix) through a [`LemmaSetter`]. Once handed to
//! a word instance it is only read.
//!
//! # Examples
//!
//! ```
//! use polylemma::grammar::Grammeme;
//! use polylemma::language::Language;
//! use polylemma::lemma::{Lemma, LemmaSetter, Quality};
//!
//! let mut lemma = Lemma::new(Language::English);
//! {
//!     let mut setter = LemmaSetter::new(&mut lemma);
//!     setter.set_text("europa");
//!     setter.set_normalized_form("europa");
//!     setter.set_initial_form("Europa");
//!     setter.set_stem_grammar(vec![Grammeme::Substantive, Grammeme::Geo]);
//!     assert!(setter.add_suffix("+"));
//! }
//!
//! assert_eq!(lemma.text(), "europa+");
//! assert_eq!(lemma.suffix(), "+");
//! assert_eq!(lemma.quality(), Quality::DICTIONARY);
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

use crate::grammar::{GramBitSet, Grammeme, part_of_speech};
use crate::language::Language;

pub use crate::language::alphabet::CharCategory;

/// Maximum number of flex grammars one lemma can carry.
pub const MAX_GRAM_PER_WORD: usize = 36;
/// Maximum number of lemmas a recognizer returns for one form.
pub const MAX_LEMMAS: usize = 28;
/// Capacity, in characters, of word-sized buffers (text, normalized form).
pub const MAX_WORD_LEN: usize = 255;
/// Capacity, in characters, of the initial-form buffer.
pub const MAX_INITIAL_LEN: usize = 2 * (MAX_WORD_LEN + 1) - 1;

/// Quality and provenance bits of a lemma.
///
/// The tier is dictionary when none of `BASTARD`, `SOB` or `FOUNDLING` is set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Quality(u32);

impl_flag_ops!(Quality);

impl Quality {
    pub const DICTIONARY: Quality = Quality(0);
    pub const BASTARD: Quality = Quality(0x0000_0001);
    pub const SOB: Quality = Quality(0x0000_0002);
    pub const PREFIXOID: Quality = Quality(0x0000_0004);
    pub const FOUNDLING: Quality = Quality(0x0000_0008);
    pub const BAD_REQUEST: Quality = Quality(0x0000_0010);
    pub const FROM_ENGLISH: Quality = Quality(0x0001_0000);
    pub const TO_ENGLISH: Quality = Quality(0x0002_0000);
    pub const TRANSLIT: Quality = Quality(0x0004_0000);
    pub const OVERRODE: Quality = Quality(0x0010_0000);
    pub const FIX: Quality = Quality(0x0020_0000);
    pub const DISABLED: Quality = Quality(0x0040_0000);
    pub const AUTOMORPHOLOGY: Quality = Quality(0x0080_0000);

    /// Any heuristic tier.
    pub const ANY_BASTARD: Quality = Quality(0x0000_0001 | 0x0000_0002 | 0x0000_0008);
    /// Results of a foreign (translation or transliteration) pass.
    pub const ANY_FOREIGN: Quality = Quality(0x0001_0000 | 0x0002_0000 | 0x0004_0000);

    const NAMES: [(Quality, &'static str); 12] = [
        (Quality::BASTARD, "bastard"),
        (Quality::SOB, "sob"),
        (Quality::PREFIXOID, "prefixoid"),
        (Quality::FOUNDLING, "foundling"),
        (Quality::BAD_REQUEST, "bad-request"),
        (Quality::FROM_ENGLISH, "from-english"),
        (Quality::TO_ENGLISH, "to-english"),
        (Quality::TRANSLIT, "translit"),
        (Quality::OVERRODE, "overrode"),
        (Quality::FIX, "fix"),
        (Quality::DISABLED, "disabled"),
        (Quality::AUTOMORPHOLOGY, "automorphology"),
    ];

    pub fn is_bastard(self) -> bool {
        self.intersects(Quality::ANY_BASTARD)
    }

    pub fn is_foreign(self) -> bool {
        self.intersects(Quality::ANY_FOREIGN)
    }

    /// Names of the set bits; a plain dictionary lemma reports `dictionary`.
    pub fn names(self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if !self.is_bastard() {
            names.insert(0, "dictionary");
        }
        names
    }
}

impl fmt::Debug for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quality({})", self.names().join("|"))
    }
}

impl Serialize for Quality {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// How much a lemma looks like a dictionary headword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LllLevel {
    #[default]
    No = 0,
    Lll = 1,
    SameText = 2,
    Tantum = 3,
}

/// An owned string with a character capacity.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct CappedText {
    text: String,
    len: usize,
    max_len: usize,
}

impl CappedText {
    pub fn new(max_len: usize) -> Self {
        CappedText {
            text: String::new(),
            len: 0,
            max_len,
        }
    }

    /// Replaces the content, truncating to capacity. Returns `false` when
    /// something was cut.
    pub fn set_capped(&mut self, text: &str) -> bool {
        self.text.clear();
        self.len = 0;
        for c in text.chars().take(self.max_len) {
            self.text.push(c);
            self.len += 1;
        }
        self.len == text.chars().count()
    }

    /// Appends `tail` only if the result still fits.
    pub fn try_append(&mut self, tail: &str) -> bool {
        let extra = tail.chars().count();
        if self.len + extra > self.max_len {
            return false;
        }
        self.text.push_str(tail);
        self.len += extra;
        true
    }

    /// Drops the last `count` characters.
    pub fn truncate_chars(&mut self, count: usize) {
        let keep = self.len.saturating_sub(count);
        if let Some((idx, _)) = self.text.char_indices().nth(keep) {
            self.text.truncate(idx);
        }
        self.len = keep;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl fmt::Debug for CappedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.text, f)
    }
}

impl Serialize for CappedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// One analysis of a word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lemma {
    text: CappedText,
    suffix_len: usize,
    language: Language,
    language_version: i32,
    quality: Quality,
    depth: u32,
    stem_grammar: Vec<Grammeme>,
    flex_grammars: Vec<Vec<Grammeme>>,
    add_grammar: Vec<Grammeme>,
    initial_form: CappedText,
    normalized_form: CappedText,
    converted_len: usize,
    case_flags: CharCategory,
    token_pos: usize,
    token_span: usize,
    paradigm_id: u32,
}

impl Lemma {
    pub fn new(language: Language) -> Self {
        Lemma {
            text: CappedText::new(MAX_WORD_LEN),
            suffix_len: 0,
            language,
            language_version: -1,
            quality: Quality::DICTIONARY,
            depth: 0,
            stem_grammar: Vec::new(),
            flex_grammars: Vec::new(),
            add_grammar: Vec::new(),
            initial_form: CappedText::new(MAX_INITIAL_LEN),
            normalized_form: CappedText::new(MAX_WORD_LEN),
            converted_len: 0,
            case_flags: CharCategory::EMPTY,
            token_pos: 0,
            token_span: 1,
            paradigm_id: 0,
        }
    }

    /// A foundling carrying `text` verbatim.
    pub fn foundling(language: Language, text: &str) -> Self {
        let mut lemma = Lemma::new(language);
        let mut setter = LemmaSetter::new(&mut lemma);
        setter.set_text(text);
        setter.set_normalized_form(text);
        setter.set_initial_form(text);
        setter.set_converted_len(text.chars().count());
        setter.set_quality(Quality::FOUNDLING);
        lemma
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Literal suffix appended by the analyzer, if any.
    pub fn suffix(&self) -> &str {
        let text = self.text.as_str();
        let start = self.text.len() - self.suffix_len;
        match text.char_indices().nth(start) {
            Some((idx, _)) => &text[idx..],
            None => "",
        }
    }

    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn language_version(&self) -> i32 {
        self.language_version
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn stem_grammar(&self) -> &[Grammeme] {
        &self.stem_grammar
    }

    pub fn flex_grammars(&self) -> &[Vec<Grammeme>] {
        &self.flex_grammars
    }

    pub fn add_grammar(&self) -> &[Grammeme] {
        &self.add_grammar
    }

    pub fn initial_form(&self) -> &str {
        self.initial_form.as_str()
    }

    pub fn normalized_form(&self) -> &str {
        self.normalized_form.as_str()
    }

    pub fn converted_len(&self) -> usize {
        self.converted_len
    }

    pub fn case_flags(&self) -> CharCategory {
        self.case_flags
    }

    pub fn token_pos(&self) -> usize {
        self.token_pos
    }

    pub fn token_span(&self) -> usize {
        self.token_span
    }

    pub fn paradigm_id(&self) -> u32 {
        self.paradigm_id
    }

    pub fn part_of_speech(&self) -> Option<Grammeme> {
        part_of_speech(&self.stem_grammar)
    }

    pub fn is_bastard(&self) -> bool {
        self.quality.is_bastard()
    }

    pub fn stem_gram_set(&self) -> GramBitSet {
        GramBitSet::from_grams(&self.stem_grammar)
    }

    /// Flex grammars with the additional grammar folded in.
    pub fn flex_gram_sets(&self) -> Vec<GramBitSet> {
        let add = GramBitSet::from_grams(&self.add_grammar) - self.stem_gram_set();
        self.flex_grammars
            .iter()
            .map(|flex| GramBitSet::from_grams(flex) | add)
            .collect()
    }

    pub fn has_stem_gram(&self, gram: Grammeme) -> bool {
        self.stem_grammar.contains(&gram)
    }

    pub fn has_flex_gram(&self, gram: Grammeme) -> bool {
        self.flex_grammars.iter().any(|flex| flex.contains(&gram))
    }

    /// Same headword: text, stem grammar and paradigm.
    pub fn similar(&self, other: &Lemma) -> bool {
        self.text == other.text
            && self.stem_grammar == other.stem_grammar
            && self.paradigm_id == other.paradigm_id
    }
}

/// Write access to a lemma under construction.
pub struct LemmaSetter<'a> {
    lemma: &'a mut Lemma,
}

impl<'a> LemmaSetter<'a> {
    pub fn new(lemma: &'a mut Lemma) -> Self {
        LemmaSetter { lemma }
    }

    pub fn set_text(&mut self, text: &str) -> bool {
        self.lemma.suffix_len = 0;
        self.lemma.text.set_capped(text)
    }

    pub fn set_language(&mut self, language: Language) {
        self.lemma.language = language;
    }

    pub fn set_language_version(&mut self, version: i32) {
        self.lemma.language_version = version;
    }

    pub fn set_quality(&mut self, quality: Quality) {
        self.lemma.quality = quality;
    }

    pub fn add_quality(&mut self, quality: Quality) {
        self.lemma.quality |= quality;
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.lemma.depth = depth;
    }

    pub fn set_stem_grammar(&mut self, grammar: Vec<Grammeme>) {
        self.lemma.stem_grammar = grammar;
    }

    pub fn set_add_grammar(&mut self, grammar: Vec<Grammeme>) {
        self.lemma.add_grammar = grammar;
    }

    /// Adds one flex grammar; fails once the lemma holds the maximum.
    pub fn add_flex_grammar(&mut self, grammar: Vec<Grammeme>) -> bool {
        if self.lemma.flex_grammars.len() >= MAX_GRAM_PER_WORD {
            return false;
        }
        self.lemma.flex_grammars.push(grammar);
        true
    }

    pub fn clear_flex_grammars(&mut self) {
        self.lemma.flex_grammars.clear();
    }

    pub fn set_initial_form(&mut self, form: &str) -> bool {
        self.lemma.initial_form.set_capped(form)
    }

    pub fn set_normalized_form(&mut self, form: &str) -> bool {
        self.lemma.normalized_form.set_capped(form)
    }

    pub fn set_converted_len(&mut self, len: usize) {
        self.lemma.converted_len = len;
    }

    pub fn set_case_flags(&mut self, flags: CharCategory) {
        self.lemma.case_flags = flags;
    }

    pub fn set_token(&mut self, pos: usize, span: usize) {
        self.lemma.token_pos = pos;
        self.lemma.token_span = span;
    }

    pub fn set_paradigm_id(&mut self, id: u32) {
        self.lemma.paradigm_id = id;
    }

    /// Appends a literal suffix to the text, initial and normalized forms.
    ///
    /// A previously added suffix is removed first. Returns `false`, leaving
    /// the lemma without suffix, when any of the three forms would overflow.
    pub fn add_suffix(&mut self, suffix: &str) -> bool {
        let previous = self.lemma.suffix_len;
        if previous > 0 {
            self.lemma.text.truncate_chars(previous);
            self.lemma.initial_form.truncate_chars(previous);
            self.lemma.normalized_form.truncate_chars(previous);
            self.lemma.suffix_len = 0;
        }
        let extra = suffix.chars().count();
        if extra == 0 {
            return true;
        }
        let fits = |field: &CappedText| field.len() + extra <= field.max_len();
        if !fits(&self.lemma.text)
            || !fits(&self.lemma.initial_form)
            || !fits(&self.lemma.normalized_form)
        {
            return false;
        }
        self.lemma.text.try_append(suffix);
        self.lemma.initial_form.try_append(suffix);
        self.lemma.normalized_form.try_append(suffix);
        self.lemma.suffix_len = extra;
        true
    }

    /// Replaces the lemma text by the normalized surface form.
    pub fn reset_to_form(&mut self) {
        let form = if self.lemma.normalized_form.is_empty() {
            self.lemma.initial_form.as_str().to_string()
        } else {
            self.lemma.normalized_form.as_str().to_string()
        };
        if form != self.lemma.text.as_str() {
            self.lemma.quality |= Quality::OVERRODE;
            self.lemma.text.set_capped(&form);
        }
    }
}

/// Headword likeness shared by every language.
///
/// Foundlings and overridden lemmas never look like a lemma; otherwise
/// nouns, verbs, adjectives and adverbs whose text equals the normalized
/// form are [`LllLevel::SameText`].
pub fn default_looks_like_lemma(lemma: &Lemma) -> LllLevel {
    if lemma
        .quality()
        .intersects(Quality::FOUNDLING | Quality::OVERRODE)
    {
        return LllLevel::No;
    }
    let content_word = matches!(
        lemma.stem_grammar().first(),
        Some(Grammeme::Substantive | Grammeme::Verb | Grammeme::Adjective | Grammeme::Adverb)
    );
    if content_word && lemma.text() == lemma.normalized_form() {
        LllLevel::SameText
    } else {
        LllLevel::No
    }
}
