//! Grammemes and grammeme sets.
//!
//! A [`Grammeme`] is one grammatical feature (part of speech, case, number,
//! ...). Stem grammar is a short list whose first element is the part of
//! speech; a flex grammar is the list contributed by one inflection.
//! [`GramBitSet`] packs a list into a bit set so that whole feature
//! combinations can be compared, hashed and ordered cheaply.
//!
//! # Examples
//!
//! ```
//! use polylemma::grammar::{GramBitSet, Grammeme};
//!
//! let nom_sg: GramBitSet = "nom,sg".parse().unwrap();
//! let ins_pl: GramBitSet = "ins pl".parse().unwrap();
//!
//! assert!(nom_sg.contains(Grammeme::Nominative));
//! assert_eq!(nom_sg.distance(&ins_pl), 4);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PolylemmaError, Result};

/// Family a grammeme belongs to. Grammemes of one class exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammemeClass {
    None,
    PartOfSpeech,
    Case,
    Number,
    Gender,
    Person,
    Tense,
    Mood,
    Aspect,
    Voice,
    Animacy,
    Degree,
    Possession,
    Predication,
}

macro_rules! grammemes {
    ($($variant:ident => $name:literal, $class:ident;)*) => {
        /// A single grammatical feature.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Grammeme {
            $($variant,)*
        }

        impl Grammeme {
            pub const ALL: &'static [Grammeme] = &[$(Grammeme::$variant,)*];

            /// Short name used in data files.
            pub fn name(self) -> &'static str {
                match self {
                    $(Grammeme::$variant => $name,)*
                }
            }

            pub fn class(self) -> GrammemeClass {
                match self {
                    $(Grammeme::$variant => GrammemeClass::$class,)*
                }
            }
        }
    };
}

grammemes! {
    Substantive => "S", PartOfSpeech;
    Adjective => "A", PartOfSpeech;
    Verb => "V", PartOfSpeech;
    Adverb => "ADV", PartOfSpeech;
    Preposition => "PR", PartOfSpeech;
    Postposition => "POSTP", PartOfSpeech;
    Conjunction => "CONJ", PartOfSpeech;
    Particle => "PART", PartOfSpeech;
    Interjection => "INTJ", PartOfSpeech;
    Numeral => "NUM", PartOfSpeech;
    SubstPronoun => "SPRO", PartOfSpeech;
    AdjPronoun => "APRO", PartOfSpeech;
    AdvPronoun => "ADVPRO", PartOfSpeech;
    AdjNumeral => "ANUM", PartOfSpeech;
    Composite => "COM", PartOfSpeech;
    Nominative => "nom", Case;
    Genitive => "gen", Case;
    Dative => "dat", Case;
    Accusative => "acc", Case;
    Instrumental => "ins", Case;
    Ablative => "abl", Case;
    Locative => "loc", Case;
    Vocative => "voc", Case;
    Singular => "sg", Number;
    Plural => "pl", Number;
    Masculine => "m", Gender;
    Feminine => "f", Gender;
    Neuter => "n", Gender;
    MasFem => "mf", Gender;
    Person1 => "1p", Person;
    Person2 => "2p", Person;
    Person3 => "3p", Person;
    Present => "praes", Tense;
    Past => "praet", Tense;
    Future => "fut", Tense;
    Infinitive => "inf", Mood;
    Indicative => "indic", Mood;
    Imperative => "imper", Mood;
    Participle => "partcp", Mood;
    Gerund => "ger", Mood;
    Conditional => "cond", Mood;
    Perfective => "pf", Aspect;
    Imperfective => "ipf", Aspect;
    Active => "act", Voice;
    Passive => "pass", Voice;
    Animated => "anim", Animacy;
    Inanimated => "inan", Animacy;
    Comparative => "comp", Degree;
    Superlative => "supr", Degree;
    Possessive => "poss", Possession;
    Possessive1 => "poss1", Possession;
    Possessive2 => "poss2", Possession;
    Possessive3 => "poss3", Possession;
    Predicative => "predic", Predication;
    Predicative1 => "predic1", Predication;
    Predicative2 => "predic2", Predication;
    Predicative3 => "predic3", Predication;
    DerivedAdjective => "derivadj", None;
    Distort => "distort", None;
    Reserved => "reserved", None;
    Geo => "geo", None;
    PersonName => "persn", None;
    FamilyName => "famn", None;
    Abbreviation => "abbr", None;
    Obscene => "obsc", None;
    Rare => "rare", None;
}

impl Grammeme {
    pub fn is_part_of_speech(self) -> bool {
        self.class() == GrammemeClass::PartOfSpeech
    }

    /// First and second person markers (personal, possessive and
    /// predicative): inflection that still leaves a noun a noun in
    /// agglutinative languages. Third person markers are not weak.
    pub fn is_weak_nominal_feature(self) -> bool {
        matches!(
            self,
            Grammeme::Person1
                | Grammeme::Person2
                | Grammeme::Possessive1
                | Grammeme::Possessive2
                | Grammeme::Predicative1
                | Grammeme::Predicative2
        )
    }
}

impl fmt::Display for Grammeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Grammeme {
    type Err = PolylemmaError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Grammeme::ALL
            .iter()
            .copied()
            .find(|g| g.name() == s)
            .ok_or_else(|| PolylemmaError::parse(format!("unknown grammeme '{s}'")))
    }
}

impl Serialize for Grammeme {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Grammeme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a grammeme list separated by commas, `=` or whitespace.
pub fn parse_grammemes(text: &str) -> Result<Vec<Grammeme>> {
    text.split(|c: char| c == ',' || c == '=' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

/// Part of speech of a stem grammar (its first part-of-speech grammeme).
pub fn part_of_speech(stem: &[Grammeme]) -> Option<Grammeme> {
    stem.iter().copied().find(|g| g.is_part_of_speech())
}

/// A set of grammemes packed into bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GramBitSet(u128);

impl GramBitSet {
    pub const fn empty() -> Self {
        GramBitSet(0)
    }

    pub fn from_grams(grams: &[Grammeme]) -> Self {
        grams.iter().copied().collect()
    }

    pub fn insert(&mut self, gram: Grammeme) {
        self.0 |= 1u128 << gram as u8;
    }

    pub fn contains(&self, gram: Grammeme) -> bool {
        self.0 & (1u128 << gram as u8) != 0
    }

    pub fn has_all(&self, other: &GramBitSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn has_any(&self, other: &GramBitSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Number of grammemes present in exactly one of the two sets.
    pub fn distance(&self, other: &GramBitSet) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    pub fn iter(&self) -> impl Iterator<Item = Grammeme> + '_ {
        Grammeme::ALL.iter().copied().filter(|g| self.contains(*g))
    }
}

impl fmt::Debug for GramBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GramBitSet({self})")
    }
}

impl fmt::Display for GramBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Grammeme::name).collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for GramBitSet {
    type Err = PolylemmaError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(GramBitSet::from_grams(&parse_grammemes(s)?))
    }
}

impl FromIterator<Grammeme> for GramBitSet {
    fn from_iter<I: IntoIterator<Item = Grammeme>>(iter: I) -> Self {
        let mut set = GramBitSet::empty();
        for gram in iter {
            set.insert(gram);
        }
        set
    }
}

impl From<Grammeme> for GramBitSet {
    fn from(gram: Grammeme) -> Self {
        GramBitSet::from_grams(&[gram])
    }
}

impl BitOr for GramBitSet {
    type Output = GramBitSet;

    fn bitor(self, rhs: GramBitSet) -> GramBitSet {
        GramBitSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for GramBitSet {
    fn bitor_assign(&mut self, rhs: GramBitSet) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for GramBitSet {
    type Output = GramBitSet;

    fn bitand(self, rhs: GramBitSet) -> GramBitSet {
        GramBitSet(self.0 & rhs.0)
    }
}

impl Sub for GramBitSet {
    type Output = GramBitSet;

    fn sub(self, rhs: GramBitSet) -> GramBitSet {
        GramBitSet(self.0 & !rhs.0)
    }
}

impl Serialize for GramBitSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for GramBitSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let grams = Vec::<Grammeme>::deserialize(deserializer)?;
        Ok(grams.into_iter().collect())
    }
}

/// An ordered set of feature combinations, e.g. every reading of one form.
pub type GrammarBunch = BTreeSet<GramBitSet>;
