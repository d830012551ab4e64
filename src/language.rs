//! Languages, language masks and the per-language capability layer.
//!
//! A [`Language`] is a small closed enumeration of the languages the lemmer
//! knows how to classify. [`LangMask`] is a bit set over them; the unknown
//! language is deliberately not representable in a mask, so that
//! `mask.contains(Language::Unknown)` is always `false`.

pub mod alphabet;
pub mod capability;
pub mod fix_list;
pub mod lexicon;
pub mod registry;
pub mod unknown;

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PolylemmaError, Result};

pub use capability::{LanguageCapability, NormalizeMode};
pub use registry::LanguageRegistry;

/// Language identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "unk")]
    Unknown = 0,
    #[serde(rename = "rus")]
    Russian = 1,
    #[serde(rename = "eng")]
    English = 2,
    #[serde(rename = "ukr")]
    Ukrainian = 3,
    #[serde(rename = "ger")]
    German = 4,
    #[serde(rename = "fre")]
    French = 5,
    #[serde(rename = "spa")]
    Spanish = 6,
    #[serde(rename = "ita")]
    Italian = 7,
    #[serde(rename = "pol")]
    Polish = 8,
    #[serde(rename = "cze")]
    Czech = 9,
    #[serde(rename = "tur")]
    Turkish = 10,
    #[serde(rename = "kaz")]
    Kazakh = 11,
    #[serde(rename = "bel")]
    Belarusian = 12,
}

impl Language {
    /// Every language, in id order.
    pub const ALL: [Language; 13] = [
        Language::Unknown,
        Language::Russian,
        Language::English,
        Language::Ukrainian,
        Language::German,
        Language::French,
        Language::Spanish,
        Language::Italian,
        Language::Polish,
        Language::Czech,
        Language::Turkish,
        Language::Kazakh,
        Language::Belarusian,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Language> {
        Self::ALL.get(id as usize).copied()
    }

    /// Three-letter code used in data files and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Language::Unknown => "unk",
            Language::Russian => "rus",
            Language::English => "eng",
            Language::Ukrainian => "ukr",
            Language::German => "ger",
            Language::French => "fre",
            Language::Spanish => "spa",
            Language::Italian => "ita",
            Language::Polish => "pol",
            Language::Czech => "cze",
            Language::Turkish => "tur",
            Language::Kazakh => "kaz",
            Language::Belarusian => "bel",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Unknown => "Unknown",
            Language::Russian => "Russian",
            Language::English => "English",
            Language::Ukrainian => "Ukrainian",
            Language::German => "German",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::Italian => "Italian",
            Language::Polish => "Polish",
            Language::Czech => "Czech",
            Language::Turkish => "Turkish",
            Language::Kazakh => "Kazakh",
            Language::Belarusian => "Belarusian",
        }
    }

    /// Agglutinative languages subject to lemma and paradigm decimation.
    pub fn is_agglutinative(self) -> bool {
        matches!(self, Language::Turkish | Language::Kazakh)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = PolylemmaError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.code() == lowered || lang.name().eq_ignore_ascii_case(&lowered))
            .ok_or_else(|| PolylemmaError::parse(format!("unknown language '{s}'")))
    }
}

/// A set of languages.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LangMask(u32);

impl LangMask {
    const FULL: u32 = ((1u32 << Language::ALL.len()) - 1) & !1;

    pub const fn empty() -> Self {
        LangMask(0)
    }

    /// Every representable language (the unknown language is never included).
    pub const fn all() -> Self {
        LangMask(Self::FULL)
    }

    pub fn single(lang: Language) -> Self {
        let mut mask = LangMask::empty();
        mask.insert(lang);
        mask
    }

    pub fn contains(&self, lang: Language) -> bool {
        lang != Language::Unknown && self.0 & (1 << lang.id()) != 0
    }

    pub fn insert(&mut self, lang: Language) {
        if lang != Language::Unknown {
            self.0 |= 1 << lang.id();
        }
    }

    pub fn remove(&mut self, lang: Language) {
        self.0 &= !(1 << lang.id());
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn any(&self) -> bool {
        !self.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Languages in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Language> + '_ {
        Language::ALL.iter().copied().filter(|lang| self.contains(*lang))
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LangMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for LangMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.iter().map(Language::code).collect();
        f.write_str(&codes.join(","))
    }
}

impl FromStr for LangMask {
    type Err = PolylemmaError;

    /// Parses a comma-separated list of codes; `all` selects every language.
    fn from_str(s: &str) -> Result<Self> {
        let mut mask = LangMask::empty();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part.eq_ignore_ascii_case("all") {
                mask |= LangMask::all();
            } else {
                mask.insert(part.parse()?);
            }
        }
        Ok(mask)
    }
}

impl FromIterator<Language> for LangMask {
    fn from_iter<I: IntoIterator<Item = Language>>(iter: I) -> Self {
        let mut mask = LangMask::empty();
        for lang in iter {
            mask.insert(lang);
        }
        mask
    }
}

impl From<Language> for LangMask {
    fn from(lang: Language) -> Self {
        LangMask::single(lang)
    }
}

impl BitOr for LangMask {
    type Output = LangMask;

    fn bitor(self, rhs: LangMask) -> LangMask {
        LangMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for LangMask {
    fn bitor_assign(&mut self, rhs: LangMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for LangMask {
    type Output = LangMask;

    fn bitand(self, rhs: LangMask) -> LangMask {
        LangMask(self.0 & rhs.0)
    }
}

impl BitAndAssign for LangMask {
    fn bitand_assign(&mut self, rhs: LangMask) {
        self.0 &= rhs.0;
    }
}

impl Not for LangMask {
    type Output = LangMask;

    fn not(self) -> LangMask {
        LangMask(!self.0 & Self::FULL)
    }
}

impl Serialize for LangMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for LangMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let languages = Vec::<Language>::deserialize(deserializer)?;
        Ok(languages.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
            assert_eq!(Language::from_id(lang.id()), Some(lang));
        }
        assert_eq!("Turkish".parse::<Language>().unwrap(), Language::Turkish);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_mask_never_holds_unknown() {
        let mut mask = LangMask::all();
        assert!(!mask.contains(Language::Unknown));
        mask.insert(Language::Unknown);
        assert_eq!(mask, LangMask::all());
        assert_eq!(mask.len(), Language::ALL.len() - 1);
    }

    #[test]
    fn test_mask_operations() {
        let mask: LangMask = "rus, eng,tur".parse().unwrap();
        assert_eq!(mask.len(), 3);
        assert!(mask.contains(Language::English));

        let order: Vec<Language> = mask.iter().collect();
        assert_eq!(order, vec![Language::Russian, Language::English, Language::Turkish]);

        let inverse = !mask;
        assert!(!inverse.contains(Language::Russian));
        assert!(inverse.contains(Language::German));
        assert!((mask & inverse).is_empty());
        assert_eq!(mask | inverse, LangMask::all());
        assert_eq!(mask.to_string(), "rus,eng,tur");
    }

    #[test]
    fn test_mask_serde() {
        let mask = LangMask::single(Language::Kazakh) | LangMask::single(Language::Turkish);
        let json = serde_json::to_string(&mask).unwrap();
        assert_eq!(json, r#"["tur","kaz"]"#);
        let back: LangMask = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mask);
    }
}
