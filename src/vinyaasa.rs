//! Vinyaasa: phonetic decomposition of Devanagari tokens
//!
//! # Overview
//!
//! A token such as `राम` is split into its sound units
//! `र् आ म् अ`: every consonant is written with a virama and followed by
//! the vowel it carries (the inherent `अ` unless a vowel sign or virama
//! says otherwise).
//!
//! The reconstruction core only depends on the [`PhoneticDecomposer`]
//! trait. [`AksharaDecomposer`] is the built-in implementation; callers
//! with a richer analyser can plug their own in.
//!
//! # Example
//!
//! ```
//! use bhashya_reader::{AksharaDecomposer, PhoneticDecomposer};
//!
//! let segments = AksharaDecomposer.decompose("राम").unwrap();
//! assert_eq!(segments, vec!["र्", "आ", "म्", "अ"]);
//! ```

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

const VIRAMA: char = '\u{094D}';
const NUKTA: char = '\u{093C}';
const INHERENT_VOWEL: &str = "अ";

/// Decomposition error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VinyaasaError {
    #[error("Empty token")]
    Empty,

    #[error("Unsupported character {ch:?} in token {token:?}")]
    UnsupportedCharacter { token: String, ch: char },

    #[error("Sign {ch:?} without a preceding consonant in token {token:?}")]
    DanglingSign { token: String, ch: char },
}

pub type Result<T> = std::result::Result<T, VinyaasaError>;

/// Phonetic decomposition collaborator
pub trait PhoneticDecomposer {
    /// Split a single token into ordered phonetic segments
    fn decompose(&self, token: &str) -> Result<Vec<String>>;
}

/// Rule-based decomposer for Devanagari
#[derive(Debug, Clone, Copy, Default)]
pub struct AksharaDecomposer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sound {
    Consonant,
    Nukta,
    VowelSign(char),
    Virama,
    /// Independent vowels, anusvara, visarga, candrabindu, avagraha, om
    Standalone,
    Joiner,
    Unsupported,
}

fn sound_of(c: char) -> Sound {
    match c {
        '\u{0915}'..='\u{0939}' | '\u{0958}'..='\u{095F}' => Sound::Consonant,
        NUKTA => Sound::Nukta,
        VIRAMA => Sound::Virama,
        '\u{0901}'..='\u{0903}' | '\u{0904}'..='\u{0914}' | '\u{093D}' | '\u{0950}'
        | '\u{0960}' | '\u{0961}' => Sound::Standalone,
        '\u{200C}' | '\u{200D}' => Sound::Joiner,
        _ => match independent_vowel(c) {
            Some(v) => Sound::VowelSign(v),
            None => Sound::Unsupported,
        },
    }
}

/// Independent vowel for a dependent vowel sign
fn independent_vowel(sign: char) -> Option<char> {
    let vowel = match sign {
        'ा' => 'आ',
        'ि' => 'इ',
        'ी' => 'ई',
        'ु' => 'उ',
        'ू' => 'ऊ',
        'ृ' => 'ऋ',
        'ॄ' => 'ॠ',
        'ॢ' => 'ऌ',
        'ॣ' => 'ॡ',
        'ॅ' => 'ऍ',
        'ॆ' => 'ऎ',
        'े' => 'ए',
        'ै' => 'ऐ',
        'ॉ' => 'ऑ',
        'ॊ' => 'ऒ',
        'ो' => 'ओ',
        'ौ' => 'औ',
        _ => return None,
    };
    Some(vowel)
}

/// Emit a pending consonant with its inherent vowel
fn flush(pending: &mut Option<String>, out: &mut Vec<String>) {
    if let Some(mut consonant) = pending.take() {
        consonant.push(VIRAMA);
        out.push(consonant);
        out.push(INHERENT_VOWEL.to_string());
    }
}

impl AksharaDecomposer {
    fn decompose_cluster(token: &str, cluster: &str, out: &mut Vec<String>) -> Result<()> {
        // Consonant (with nukta) still waiting to learn its vowel
        let mut pending: Option<String> = None;

        let dangling = |ch: char| VinyaasaError::DanglingSign {
            token: token.to_string(),
            ch,
        };

        for ch in cluster.chars() {
            match sound_of(ch) {
                Sound::Consonant => {
                    flush(&mut pending, out);
                    pending = Some(ch.to_string());
                }
                Sound::Nukta => pending.as_mut().ok_or_else(|| dangling(ch))?.push(ch),
                Sound::VowelSign(vowel) => {
                    let mut consonant = pending.take().ok_or_else(|| dangling(ch))?;
                    consonant.push(VIRAMA);
                    out.push(consonant);
                    out.push(vowel.to_string());
                }
                Sound::Virama => {
                    let mut consonant = pending.take().ok_or_else(|| dangling(ch))?;
                    consonant.push(VIRAMA);
                    out.push(consonant);
                }
                Sound::Standalone => {
                    flush(&mut pending, out);
                    out.push(ch.to_string());
                }
                Sound::Joiner => {}
                Sound::Unsupported => {
                    return Err(VinyaasaError::UnsupportedCharacter {
                        token: token.to_string(),
                        ch,
                    })
                }
            }
        }

        flush(&mut pending, out);
        Ok(())
    }
}

impl PhoneticDecomposer for AksharaDecomposer {
    fn decompose(&self, token: &str) -> Result<Vec<String>> {
        if token.is_empty() {
            return Err(VinyaasaError::Empty);
        }

        let mut segments = Vec::with_capacity(token.chars().count() * 2);
        for cluster in token.graphemes(true) {
            Self::decompose_cluster(token, cluster, &mut segments)?;
        }
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decompose(token: &str) -> Vec<String> {
        AksharaDecomposer.decompose(token).unwrap()
    }

    #[test]
    fn test_inherent_and_long_vowels() {
        assert_eq!(decompose("राम"), vec!["र्", "आ", "म्", "अ"]);
        assert_eq!(decompose("गीता"), vec!["ग्", "ई", "त्", "आ"]);
    }

    #[test]
    fn test_conjunct() {
        assert_eq!(decompose("क्ष"), vec!["क्", "ष्", "अ"]);
        assert_eq!(decompose("धर्म"), vec!["ध्", "अ", "र्", "म्", "अ"]);
    }

    #[test]
    fn test_final_virama() {
        assert_eq!(decompose("भाष्यम्"), vec!["भ्", "आ", "ष्", "य्", "अ", "म्"]);
    }

    #[test]
    fn test_visarga_and_anusvara() {
        assert_eq!(decompose("रामः"), vec!["र्", "आ", "म्", "अ", "ः"]);
        assert_eq!(decompose("अंश"), vec!["अ", "ं", "श्", "अ"]);
        assert_eq!(decompose("कां"), vec!["क्", "आ", "ं"]);
    }

    #[test]
    fn test_independent_vowel_and_avagraha() {
        assert_eq!(decompose("इति"), vec!["इ", "त्", "इ"]);
        assert_eq!(decompose("ऽपि"), vec!["ऽ", "प्", "इ"]);
    }

    #[test]
    fn test_nukta_stays_on_consonant() {
        assert_eq!(
            decompose("\u{0915}\u{093C}"),
            vec!["\u{0915}\u{093C}\u{094D}", "अ"]
        );
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(AksharaDecomposer.decompose(""), Err(VinyaasaError::Empty));
    }

    #[test]
    fn test_unsupported_characters() {
        for token in ["॥", "१।", "abc", "राम,"] {
            let result = AksharaDecomposer.decompose(token);
            assert!(
                matches!(result, Err(VinyaasaError::UnsupportedCharacter { .. })),
                "{token}: {result:?}"
            );
        }
    }

    #[test]
    fn test_dangling_sign() {
        let result = AksharaDecomposer.decompose("ा");
        assert!(matches!(result, Err(VinyaasaError::DanglingSign { ch: 'ा', .. })));
    }
}
