//! Alphabet tables and character classification.
//!
//! Every supported language has a primary alphabet and a looser secondary
//! one. Cyrillic languages accept Latin letters in their secondary alphabet
//! (so that transliterated words can be classified for them) and Turkish
//! additionally accepts `q`, `w` and `x`.
//!
//! Lower-casing here is always one character to one character, so the
//! generic and the Turkish projection of a text keep identical offsets.
//!
//! # Examples
//!
//! ```
//! use polylemma::language::alphabet::{classify_language, to_lower};
//! use polylemma::language::Language;
//!
//! let mask = classify_language("straße", true);
//! assert!(mask.contains(Language::German));
//! assert!(!mask.contains(Language::English));
//!
//! assert_eq!(to_lower("KIŞI", Language::Turkish), "kışı");
//! assert_eq!(to_lower("KIŞI", Language::English), "kişi");
//! ```

use std::fmt;
use std::sync::LazyLock;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::language::{LangMask, Language};

const LATIN: &str = "abcdefghijklmnopqrstuvwxyz";
const CYRILLIC: &str = "абвгдежзийклмнопрстуфхцчшщъыьэюя";

/// Letters a language adds to (or removes from) its base script.
struct AlphabetDef {
    language: Language,
    base: &'static str,
    without: &'static str,
    extra: &'static str,
    secondary_extra: &'static str,
}

const ALPHABETS: &[AlphabetDef] = &[
    AlphabetDef {
        language: Language::English,
        base: LATIN,
        without: "",
        extra: "",
        secondary_extra: "",
    },
    AlphabetDef {
        language: Language::German,
        base: LATIN,
        without: "",
        extra: "äöüß",
        secondary_extra: "",
    },
    AlphabetDef {
        language: Language::French,
        base: LATIN,
        without: "",
        extra: "àâæçéèêëîïôœùûüÿ",
        secondary_extra: "",
    },
    AlphabetDef {
        language: Language::Spanish,
        base: LATIN,
        without: "",
        extra: "áéíñóúü",
        secondary_extra: "",
    },
    AlphabetDef {
        language: Language::Italian,
        base: LATIN,
        without: "",
        extra: "àèéìíîòóùú",
        secondary_extra: "",
    },
    AlphabetDef {
        language: Language::Polish,
        base: LATIN,
        without: "",
        extra: "ąćęłńóśźż",
        secondary_extra: "",
    },
    AlphabetDef {
        language: Language::Czech,
        base: LATIN,
        without: "",
        extra: "áčďéěíňóřšťúůýž",
        secondary_extra: "",
    },
    AlphabetDef {
        language: Language::Turkish,
        base: LATIN,
        without: "qwx",
        extra: "çğıöşüâîû",
        secondary_extra: "qwx",
    },
    AlphabetDef {
        language: Language::Russian,
        base: CYRILLIC,
        without: "",
        extra: "ё",
        secondary_extra: LATIN,
    },
    AlphabetDef {
        language: Language::Ukrainian,
        base: CYRILLIC,
        without: "ъыэ",
        extra: "єіїґ",
        secondary_extra: LATIN,
    },
    AlphabetDef {
        language: Language::Belarusian,
        base: CYRILLIC,
        without: "ищъ",
        extra: "ёіў",
        secondary_extra: LATIN,
    },
    AlphabetDef {
        language: Language::Kazakh,
        base: CYRILLIC,
        without: "",
        extra: "ёәғқңөұүһі",
        secondary_extra: LATIN,
    },
];

/// Lower-case letter -> (primary mask, secondary mask).
static LETTER_MASKS: LazyLock<AHashMap<char, (LangMask, LangMask)>> = LazyLock::new(|| {
    let mut table: AHashMap<char, (LangMask, LangMask)> = AHashMap::new();
    for spec in ALPHABETS {
        let primary = spec
            .base
            .chars()
            .filter(|c| !spec.without.contains(*c))
            .chain(spec.extra.chars())
            .filter(|c| c.is_alphabetic());
        for c in primary {
            let entry = table.entry(c).or_default();
            entry.0.insert(spec.language);
            entry.1.insert(spec.language);
        }
        for c in spec.secondary_extra.chars() {
            table.entry(c).or_default().1.insert(spec.language);
        }
    }
    table
});

/// Latin and Cyrillic letters that carry a diacritic mark of their own.
const DIACRITIC_LETTERS: &str = "àáâãäåçèéêëìíîïñòóôõöùúûüýÿāăąćĉċčďđēĕėęěĝğġģĥħĩīĭįĵķĺļľŀńņňōŏőŕŗřśŝşšţťŧũūŭůűųŵŷźżžǎǐǒǔǧǩǫǰșțёйїў";

/// Writing system of a character, used to detect mixed-script tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Cyrillic,
    Greek,
    Digit,
    Other,
}

pub fn script_of(c: char) -> Script {
    match c {
        '0'..='9' => Script::Digit,
        'a'..='z' | 'A'..='Z' | '\u{00C0}'..='\u{024F}' => Script::Latin,
        '\u{0400}'..='\u{052F}' => Script::Cyrillic,
        '\u{0370}'..='\u{03FF}' => Script::Greek,
        _ if c.is_numeric() => Script::Digit,
        _ => Script::Other,
    }
}

/// Lower-cases one character, keeping it one character wide.
///
/// Turkish maps `I` to dotless `ı` and `İ` to `i`.
pub fn lower_char(c: char, language: Language) -> char {
    match (c, language) {
        ('I', Language::Turkish) => 'ı',
        ('İ', _) => 'i',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

/// Lower-cases a text character by character.
pub fn to_lower(text: &str, language: Language) -> String {
    text.chars().map(|c| lower_char(c, language)).collect()
}

pub fn is_combining(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}' | '\u{0483}'..='\u{0489}')
}

/// Whether a character is a letter with a built-in diacritic.
pub fn has_diacritic(c: char) -> bool {
    DIACRITIC_LETTERS.contains(lower_char(c, Language::Unknown))
}

/// Languages whose alphabet contains `c`.
///
/// Digits belong to every language; letters outside all alphabets belong to
/// none. `primary = false` consults the secondary alphabets.
pub fn char_languages(c: char, primary: bool) -> LangMask {
    if c.is_numeric() {
        return LangMask::all();
    }
    let lowered = lower_char(c, Language::Unknown);
    match LETTER_MASKS.get(&lowered) {
        Some((primary_mask, secondary_mask)) => {
            if primary {
                *primary_mask
            } else {
                *secondary_mask
            }
        }
        None => LangMask::empty(),
    }
}

/// Intersection of the alphabet masks of every character in `text`.
///
/// Characters that are not alphanumeric are ignored; a text without any
/// classified character yields an empty mask.
pub fn classify_language(text: &str, primary: bool) -> LangMask {
    let mut result: Option<LangMask> = None;
    for c in text.chars() {
        if is_combining(c) || !c.is_alphanumeric() {
            continue;
        }
        let mask = char_languages(c, primary);
        result = Some(result.map_or(mask, |acc| acc & mask));
    }
    result.unwrap_or_default()
}

/// Character-category bits describing case and composition of a token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharCategory(u32);

impl_flag_ops!(CharCategory);

impl CharCategory {
    pub const EMPTY: CharCategory = CharCategory(0);
    pub const ALPHA: CharCategory = CharCategory(0x0001);
    pub const NMTOKEN: CharCategory = CharCategory(0x0002);
    pub const NUMBER: CharCategory = CharCategory(0x0004);
    pub const NUTOKEN: CharCategory = CharCategory(0x0008);
    pub const ASCII: CharCategory = CharCategory(0x0010);
    pub const NONASCII: CharCategory = CharCategory(0x0020);
    pub const TITLECASE: CharCategory = CharCategory(0x0040);
    pub const UPPERCASE: CharCategory = CharCategory(0x0080);
    pub const LOWERCASE: CharCategory = CharCategory(0x0100);
    pub const MIXEDCASE: CharCategory = CharCategory(0x0200);
    pub const COMPOUND: CharCategory = CharCategory(0x0400);
    pub const HAS_DIACRITIC: CharCategory = CharCategory(0x0800);
    pub const DIFFERENT_ALPHABET: CharCategory = CharCategory(0x1000);

    const NAMES: [(CharCategory, &'static str); 13] = [
        (CharCategory::ALPHA, "alpha"),
        (CharCategory::NMTOKEN, "nmtoken"),
        (CharCategory::NUMBER, "number"),
        (CharCategory::NUTOKEN, "nutoken"),
        (CharCategory::ASCII, "ascii"),
        (CharCategory::NONASCII, "nonascii"),
        (CharCategory::TITLECASE, "title"),
        (CharCategory::UPPERCASE, "upper"),
        (CharCategory::LOWERCASE, "lower"),
        (CharCategory::MIXEDCASE, "mixed"),
        (CharCategory::COMPOUND, "compound"),
        (CharCategory::HAS_DIACRITIC, "diacritic"),
        (CharCategory::DIFFERENT_ALPHABET, "different-alphabet"),
    ];

    const CASE_BITS: CharCategory = CharCategory(0x0040 | 0x0080 | 0x0100);

    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Merges the categories of consecutive subtokens into one.
    ///
    /// Case bits are intersected, except that a lower-case continuation keeps
    /// a title-case start. Diacritic and mixed-alphabet bits are OR-ed. A
    /// merge left without any case bit is mixed case.
    pub fn merge<I: IntoIterator<Item = CharCategory>>(categories: I) -> CharCategory {
        let mut iter = categories.into_iter();
        let Some(first) = iter.next() else {
            return CharCategory::EMPTY;
        };
        let sticky = CharCategory::HAS_DIACRITIC | CharCategory::DIFFERENT_ALPHABET;
        let mut merged = first;
        for next in iter {
            let carried = (merged | next) & sticky;
            if next.contains(CharCategory::LOWERCASE) {
                merged &= next | CharCategory::TITLECASE;
            } else {
                merged &= next;
            }
            merged |= carried;
        }
        if !merged.intersects(Self::CASE_BITS) {
            merged.insert(CharCategory::MIXEDCASE);
        }
        merged
    }
}

impl fmt::Debug for CharCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharCategory({})", self.names().join("|"))
    }
}

/// Classifies the case and composition of one token.
pub fn classify_case(text: &str) -> CharCategory {
    if text.is_empty() {
        return CharCategory::EMPTY;
    }
    let mut cc = CharCategory::from_bits(0x1FFF)
        & !(CharCategory::COMPOUND | CharCategory::DIFFERENT_ALPHABET | CharCategory::HAS_DIACRITIC);
    let mut script: Option<Script> = None;
    let mut first = true;

    for c in text.chars() {
        if is_combining(c) {
            cc.insert(CharCategory::HAS_DIACRITIC);
            continue;
        }
        if c.is_ascii() {
            cc.remove(CharCategory::NONASCII);
        } else {
            cc.remove(CharCategory::ASCII);
        }

        if c.is_lowercase() {
            cc.remove(CharCategory::UPPERCASE | CharCategory::NUMBER);
            if first {
                cc.remove(CharCategory::TITLECASE | CharCategory::NUTOKEN);
            }
        } else if c.is_uppercase() {
            cc.remove(CharCategory::LOWERCASE | CharCategory::NUMBER);
            if first {
                cc.remove(CharCategory::NUTOKEN);
            } else {
                cc.remove(CharCategory::TITLECASE);
            }
        } else if c.is_numeric() {
            cc.remove(CharCategory::ALPHA | CharCategory::LOWERCASE);
            if first {
                cc.remove(CharCategory::NMTOKEN);
            } else {
                cc.remove(CharCategory::TITLECASE);
            }
        } else if c.is_alphabetic() {
            cc.remove(
                CharCategory::NUMBER
                    | CharCategory::LOWERCASE
                    | CharCategory::UPPERCASE
                    | CharCategory::MIXEDCASE,
            );
            if first {
                cc.remove(CharCategory::NUTOKEN | CharCategory::TITLECASE);
            }
        } else {
            cc.remove(
                CharCategory::ALPHA
                    | CharCategory::NUMBER
                    | CharCategory::NUTOKEN
                    | CharCategory::NMTOKEN
                    | CharCategory::LOWERCASE,
            );
            if first {
                cc.remove(CharCategory::TITLECASE);
            }
        }

        if c.is_alphabetic() {
            let current = script_of(c);
            match script {
                Some(previous) if previous != current => {
                    cc.insert(CharCategory::DIFFERENT_ALPHABET)
                }
                _ => script = Some(current),
            }
        }
        if has_diacritic(c) {
            cc.insert(CharCategory::HAS_DIACRITIC);
        }
        first = false;
    }

    if cc.intersects(CharCategory::CASE_BITS) {
        cc.remove(CharCategory::MIXEDCASE);
    }
    cc
}
