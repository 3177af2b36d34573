//! Character predicates for the Sanskrit / Latin-or-digit split
//!
//! OCR output for these editions mixes Devanagari content with Latin
//! running heads, folio numbers and transliteration. Everything here works
//! on single `char`s so the filters stay allocation free.

use serde::{Deserialize, Serialize};

/// Devanagari numerals ० through ९
pub const DEVANAGARI_NUMERALS: [char; 10] = ['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'];

/// Double danda, the verse terminator of classical editions
pub const DOUBLE_DANDA: char = '॥';

/// Script of a single token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Script {
    /// Contains a Latin letter or an ASCII digit
    English,
    /// Anything else with content (assumed Devanagari)
    Sanskrit,
    /// Empty token
    #[default]
    Other,
}

impl Script {
    /// Classify a raw token
    pub fn of(raw: &str) -> Self {
        if raw.is_empty() {
            Script::Other
        } else if contains_latin(raw) || contains_digit(raw) {
            Script::English
        } else {
            Script::Sanskrit
        }
    }

    /// Upper-case tag used in text output
    pub fn tag(&self) -> &'static str {
        match self {
            Script::English => "ENGLISH",
            Script::Sanskrit => "SANSKRIT",
            Script::Other => "OTHER",
        }
    }
}

/// Latin letter, including the accented ranges used by IAST
pub fn is_latin_letter(c: char) -> bool {
    if c.is_ascii_alphabetic() {
        return true;
    }
    c.is_alphabetic()
        && matches!(c,
            '\u{00C0}'..='\u{024F}'   // Latin-1 Supplement, Extended-A/B
            | '\u{1E00}'..='\u{1EFF}' // Latin Extended Additional
        )
}

/// ASCII decimal digit. Devanagari numerals are content, not noise.
pub fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn contains_latin(text: &str) -> bool {
    text.chars().any(is_latin_letter)
}

pub fn contains_digit(text: &str) -> bool {
    text.chars().any(is_decimal_digit)
}
