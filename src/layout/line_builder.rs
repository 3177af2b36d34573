//! Line reconstruction
//!
//! Clusters tokens into lines with a single scan over the OCR scan order.
//! A token opens a new line when its anchor is further from the current
//! line's reference height than `threshold_factor` times its own height,
//! so the gap adapts to heading and body type sizes.

use serde::{Deserialize, Serialize};

use super::types::{LayoutError, Line, Result, Token};

/// Default fraction of a token's height tolerated as vertical drift
pub const DEFAULT_THRESHOLD_FACTOR: f64 = 0.5;

/// Options for line building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineBuilderOptions {
    /// Vertical drift allowed within a line, relative to token height
    pub threshold_factor: f64,

    /// Always start a new line when the page changes. When disabled the
    /// scan runs across the whole book and may join lines of adjacent
    /// pages that happen to sit at the same height.
    pub reset_at_page_boundary: bool,
}

impl Default for LineBuilderOptions {
    fn default() -> Self {
        Self {
            threshold_factor: DEFAULT_THRESHOLD_FACTOR,
            reset_at_page_boundary: true,
        }
    }
}

impl LineBuilderOptions {
    pub fn builder() -> LineBuilderOptionsBuilder {
        LineBuilderOptionsBuilder::default()
    }

    /// Book-wide scan without page resets
    pub fn continuous() -> Self {
        Self {
            reset_at_page_boundary: false,
            ..Default::default()
        }
    }
}

/// Builder for LineBuilderOptions
#[derive(Debug, Default)]
pub struct LineBuilderOptionsBuilder {
    options: LineBuilderOptions,
}

impl LineBuilderOptionsBuilder {
    #[must_use]
    pub fn threshold_factor(mut self, factor: f64) -> Self {
        self.options.threshold_factor = factor;
        self
    }

    #[must_use]
    pub fn reset_at_page_boundary(mut self, reset: bool) -> Self {
        self.options.reset_at_page_boundary = reset;
        self
    }

    #[must_use]
    pub fn build(self) -> LineBuilderOptions {
        self.options
    }
}

/// Clusters scan-ordered tokens into lines
#[derive(Debug, Clone, Default)]
pub struct LineBuilder {
    options: LineBuilderOptions,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LineBuilderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LineBuilderOptions {
        &self.options
    }

    /// Whether `token` starts a new line given the current line's state
    fn starts_new_line(&self, token: &Token, reference_y: i32, page: i32) -> bool {
        if self.options.reset_at_page_boundary && token.page() != page {
            return true;
        }
        let drift = f64::from(token.location().y.abs_diff(reference_y));
        // Exactly at the threshold stays on the current line
        drift > self.options.threshold_factor * f64::from(token.size())
    }

    /// Build lines from tokens in scan order
    ///
    /// Every token gets the 1-based number of the line it lands in. Line
    /// numbers run across the whole input, not per page.
    pub fn build_lines(&self, tokens: Vec<Token>) -> Result<Vec<Line>> {
        let first = tokens.first().ok_or(LayoutError::EmptyTokens)?;
        let mut reference_y = first.location().y;
        let mut page = first.page();

        let mut lines = Vec::new();
        let mut current: Vec<Token> = Vec::new();
        let mut number = 1;

        for mut token in tokens {
            if !current.is_empty() && self.starts_new_line(&token, reference_y, page) {
                lines.push(Line::new(number, std::mem::take(&mut current))?);
                number += 1;
                reference_y = token.location().y;
                page = token.page();
            }
            token.assign_line(number);
            current.push(token);
        }
        lines.push(Line::new(number, current)?);

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{RawFragment, TextBox};
    use crate::vinyaasa::AksharaDecomposer;

    fn token(text: &str, page: i32, x: i32, y: i32, size: i32) -> Token {
        let f = RawFragment::new("b", page, text, TextBox::from_rect(x, y, 40, size));
        Token::new(f, &AksharaDecomposer).unwrap()
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    #[test]
    fn test_line_builder_options_default() {
        let opts = LineBuilderOptions::default();
        assert_eq!(opts.threshold_factor, 0.5);
        assert!(opts.reset_at_page_boundary);
        assert!(!LineBuilderOptions::continuous().reset_at_page_boundary);
    }

    #[test]
    fn test_line_builder_options_builder() {
        let opts = LineBuilderOptions::builder()
            .threshold_factor(0.8)
            .reset_at_page_boundary(false)
            .build();
        assert_eq!(opts.threshold_factor, 0.8);
        assert!(!opts.reset_at_page_boundary);
    }

    #[test]
    fn test_empty_tokens_rejected() {
        let result = LineBuilder::new().build_lines(Vec::new());
        assert_eq!(result, Err(LayoutError::EmptyTokens));
    }

    #[test]
    fn test_splits_on_vertical_gap() {
        let tokens = vec![
            token("रामः", 1, 0, 100, 20),
            token("वनं", 1, 50, 102, 20),
            token("गच्छति", 1, 0, 180, 20),
        ];
        let lines = LineBuilder::new().build_lines(tokens).unwrap();
        assert_eq!(texts(&lines), vec!["रामः वनं", "गच्छति"]);
        assert_eq!(lines[0].number(), 1);
        assert_eq!(lines[1].number(), 2);
    }

    #[test]
    fn test_tokens_carry_line_numbers() {
        let tokens = vec![
            token("अ", 1, 0, 100, 20),
            token("आ", 1, 50, 102, 20),
            token("इ", 1, 0, 180, 20),
            token("ई", 1, 0, 260, 20),
            token("उ", 1, 50, 265, 20),
        ];
        let lines = LineBuilder::new().build_lines(tokens).unwrap();
        for (i, line) in lines.iter().enumerate() {
            for t in line.tokens() {
                assert_eq!(t.line(), Ok(i + 1));
            }
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        // Drift of exactly half the height stays on the line
        let tokens = vec![token("अ", 1, 0, 100, 20), token("आ", 1, 50, 110, 20)];
        assert_eq!(LineBuilder::new().build_lines(tokens).unwrap().len(), 1);

        let tokens = vec![token("अ", 1, 0, 100, 20), token("आ", 1, 50, 111, 20)];
        assert_eq!(LineBuilder::new().build_lines(tokens).unwrap().len(), 2);
    }

    #[test]
    fn test_reference_is_first_token_of_line() {
        // Small steps that would chain together stay anchored to the line start
        let tokens = vec![
            token("अ", 1, 0, 100, 20),
            token("आ", 1, 40, 108, 20),
            token("इ", 1, 80, 116, 20),
        ];
        let lines = LineBuilder::new().build_lines(tokens).unwrap();
        assert_eq!(texts(&lines), vec!["अ आ", "इ"]);
    }

    #[test]
    fn test_threshold_adapts_to_token_size() {
        // A 30px drift separates body type but not 80px heading type
        let tokens = vec![token("अ", 1, 0, 100, 80), token("आ", 1, 90, 130, 80)];
        assert_eq!(LineBuilder::new().build_lines(tokens).unwrap().len(), 1);

        let tokens = vec![token("अ", 1, 0, 100, 20), token("आ", 1, 90, 130, 20)];
        assert_eq!(LineBuilder::new().build_lines(tokens).unwrap().len(), 2);
    }

    #[test]
    fn test_extreme_coordinates_split_without_overflow() {
        let tokens = vec![
            token("अ", 1, 0, i32::MIN, 20),
            token("आ", 1, 50, i32::MAX - 20, 20),
        ];
        let lines = LineBuilder::new().build_lines(tokens).unwrap();
        assert_eq!(texts(&lines), vec!["अ", "आ"]);
    }

    #[test]
    fn test_custom_threshold_factor() {
        let builder = LineBuilder::with_options(
            LineBuilderOptions::builder().threshold_factor(2.0).build(),
        );
        let tokens = vec![token("अ", 1, 0, 100, 20), token("आ", 1, 50, 130, 20)];
        assert_eq!(builder.build_lines(tokens).unwrap().len(), 1);
    }

    #[test]
    fn test_page_boundary_resets_line() {
        let make = || vec![token("अ", 1, 0, 900, 20), token("आ", 2, 0, 902, 20)];

        let lines = LineBuilder::new().build_lines(make()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].page(), 1);
        assert_eq!(lines[1].page(), 2);
    }

    #[test]
    fn test_continuous_scan_joins_across_pages() {
        let tokens = vec![token("अ", 1, 0, 900, 20), token("आ", 2, 0, 902, 20)];
        let builder = LineBuilder::with_options(LineBuilderOptions::continuous());
        let lines = builder.build_lines(tokens).unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_line_numbers_continue_across_pages() {
        let tokens = vec![
            token("अ", 1, 0, 100, 20),
            token("आ", 1, 0, 200, 20),
            token("इ", 2, 0, 100, 20),
        ];
        let lines = LineBuilder::new().build_lines(tokens).unwrap();
        let numbers: Vec<_> = lines.iter().map(Line::number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_line_count_matches_boundaries() {
        let ys = [100, 101, 99, 160, 161, 230, 300, 302, 304];
        let tokens: Vec<_> = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| token("क", 1, i as i32 * 30, y, 20))
            .collect();

        // Count reference jumps the same way the scan does
        let mut boundaries = 0;
        let mut reference = ys[0];
        for &y in &ys[1..] {
            if (y - reference).abs() > 10 {
                boundaries += 1;
                reference = y;
            }
        }

        let lines = LineBuilder::new().build_lines(tokens).unwrap();
        assert_eq!(lines.len(), boundaries + 1);
        let total: usize = lines.iter().map(Line::len).sum();
        assert_eq!(total, ys.len());
    }

    #[test]
    fn test_line_text_round_trip() {
        let words = ["धर्मक्षेत्रे", "कुरुक्षेत्रे", "समवेता", "युयुत्सवः"];
        let tokens: Vec<_> = words
            .iter()
            .enumerate()
            .map(|(i, w)| token(w, 1, i as i32 * 100, 50, 24))
            .collect();
        let lines = LineBuilder::new().build_lines(tokens).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), words.join(" "));
    }
}
