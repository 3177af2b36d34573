//! Noise line filtering
//!
//! Separates content ("effective") lines from running heads, folio
//! numbers, chapter titles and Latin-script artifacts.

use serde::{Deserialize, Serialize};

use super::script::{contains_digit, contains_latin};
use super::types::Line;

/// Default maximum average token height of a content line (pixels)
pub const DEFAULT_NOISE_HEIGHT_THRESHOLD: f64 = 50.0;

/// Why a line was treated as noise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseReason {
    /// Taller than body type, usually a heading
    TooTall,
    LatinText,
    Digits,
    /// Contains a configured title phrase
    TitlePhrase,
}

/// Options for noise filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Lines with a larger average height are excluded. Calibrated for
    /// the reference scan resolution; rescale for other DPIs.
    pub noise_height_threshold: f64,

    /// Known title and heading phrases, matched as substrings
    pub title_phrases: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            noise_height_threshold: DEFAULT_NOISE_HEIGHT_THRESHOLD,
            title_phrases: Vec::new(),
        }
    }
}

impl FilterOptions {
    pub fn builder() -> FilterOptionsBuilder {
        FilterOptionsBuilder::default()
    }
}

/// Builder for FilterOptions
#[derive(Debug, Default)]
pub struct FilterOptionsBuilder {
    options: FilterOptions,
}

impl FilterOptionsBuilder {
    #[must_use]
    pub fn noise_height_threshold(mut self, threshold: f64) -> Self {
        self.options.noise_height_threshold = threshold;
        self
    }

    /// Add one title phrase
    #[must_use]
    pub fn title_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.options.title_phrases.push(phrase.into());
        self
    }

    #[must_use]
    pub fn title_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.title_phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn build(self) -> FilterOptions {
        self.options
    }
}

/// Predicate pipeline deciding which lines carry content
#[derive(Debug, Clone, Default)]
pub struct LineFilter {
    options: FilterOptions,
}

impl LineFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FilterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// First rule that excludes the line, if any
    pub fn noise_reason(&self, line: &Line) -> Option<NoiseReason> {
        if line.average_height() > self.options.noise_height_threshold {
            return Some(NoiseReason::TooTall);
        }

        let text = line.text();
        if contains_latin(&text) {
            Some(NoiseReason::LatinText)
        } else if contains_digit(&text) {
            Some(NoiseReason::Digits)
        } else if self
            .options
            .title_phrases
            .iter()
            .any(|phrase| !phrase.trim().is_empty() && text.contains(phrase.as_str()))
        {
            Some(NoiseReason::TitlePhrase)
        } else {
            None
        }
    }

    pub fn is_effective(&self, line: &Line) -> bool {
        self.noise_reason(line).is_none()
    }

    /// Effective lines, in input order
    pub fn effective_lines(&self, lines: &[Line]) -> Vec<Line> {
        lines
            .iter()
            .filter(|line| self.is_effective(line))
            .cloned()
            .collect()
    }

    /// Positions of the effective lines within `lines`
    pub fn effective_indices(&self, lines: &[Line]) -> Vec<usize> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.is_effective(line))
            .map(|(i, _)| i)
            .collect()
    }
}
