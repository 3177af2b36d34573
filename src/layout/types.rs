//! Common types for the layout module

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::filter::LineFilter;
use super::script::Script;
use crate::vinyaasa::PhoneticDecomposer;

// ============================================================
// Constants
// ============================================================

/// Page number carried by fragments that belong to no page
pub const NO_PAGE: i32 = -1;

// ============================================================
// Error Types
// ============================================================

/// Layout reconstruction error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Fragment {text:?} holds {count} tokens, expected exactly one")]
    MultiToken { text: String, count: usize },

    #[error("No tokens to build lines from")]
    EmptyTokens,

    #[error("Token {raw:?} has not been assigned to a line")]
    LineNotAssigned { raw: String },

    #[error("A line needs at least one token")]
    EmptyLine,
}

pub type Result<T> = std::result::Result<T, LayoutError>;

// ============================================================
// Geometry
// ============================================================

/// Pixel coordinate on a page image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Quadrilateral reported by OCR around a piece of text
///
/// Treated as axis-aligned: width is measured along the top edge and
/// height along the left edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBox {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
}

impl TextBox {
    /// Create a box from its four corners
    pub fn new(top_left: Point, top_right: Point, bottom_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// Create an axis-aligned box
    pub fn from_rect(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            top_left: Point::new(x, y),
            top_right: Point::new(x + width, y),
            bottom_left: Point::new(x, y + height),
            bottom_right: Point::new(x + width, y + height),
        }
    }

    pub fn width(&self) -> u32 {
        self.top_right.x.abs_diff(self.top_left.x)
    }

    pub fn height(&self) -> u32 {
        self.bottom_left.y.abs_diff(self.top_left.y)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Reference point used for line clustering
    pub fn anchor(&self) -> Point {
        self.top_left
    }
}

// ============================================================
// OCR Fragments
// ============================================================

/// One text string reported by OCR, tagged with its book and page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment {
    pub book: String,
    /// 1-based page number, or [`NO_PAGE`]
    pub page: i32,
    pub text: String,
    pub bbox: TextBox,
}

impl RawFragment {
    pub fn new(book: impl Into<String>, page: i32, text: impl Into<String>, bbox: TextBox) -> Self {
        Self {
            book: book.into(),
            page,
            text: text.into(),
            bbox,
        }
    }

    /// Space-delimited tokens. Consecutive spaces yield empty tokens.
    pub fn tokens(&self) -> Vec<&str> {
        self.text.split(' ').collect()
    }

    pub fn token_count(&self) -> usize {
        self.text.split(' ').count()
    }

    pub fn has_page(&self) -> bool {
        self.page >= 1
    }
}

// ============================================================
// Tokens
// ============================================================

/// A single-token fragment enriched with script and phonetic data
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    fragment: RawFragment,
    script: Script,
    phonetic_segments: Option<Vec<String>>,
    line: Option<usize>,
}

impl Token {
    /// Build a token from a fragment holding exactly one token
    ///
    /// Sanskrit tokens are decomposed with `decomposer`; when decomposition
    /// fails the raw string becomes the only segment.
    pub fn new(fragment: RawFragment, decomposer: &dyn PhoneticDecomposer) -> Result<Self> {
        let count = fragment.token_count();
        if count > 1 {
            return Err(LayoutError::MultiToken {
                text: fragment.text,
                count,
            });
        }

        let script = Script::of(&fragment.text);
        let phonetic_segments = match script {
            Script::Sanskrit => Some(match decomposer.decompose(&fragment.text) {
                Ok(segments) => segments,
                Err(e) => {
                    debug!(token = %fragment.text, error = %e, "decomposition fell back to raw token");
                    vec![fragment.text.clone()]
                }
            }),
            Script::English | Script::Other => None,
        };

        Ok(Self {
            fragment,
            script,
            phonetic_segments,
            line: None,
        })
    }

    pub fn raw(&self) -> &str {
        &self.fragment.text
    }

    pub fn book(&self) -> &str {
        &self.fragment.book
    }

    pub fn page(&self) -> i32 {
        self.fragment.page
    }

    pub fn bbox(&self) -> &TextBox {
        &self.fragment.bbox
    }

    pub fn script(&self) -> Script {
        self.script
    }

    /// Phonetic segments, present only for Sanskrit tokens
    pub fn phonetic_segments(&self) -> Option<&[String]> {
        self.phonetic_segments.as_deref()
    }

    /// Text height, the token's font size proxy
    pub fn size(&self) -> u32 {
        self.fragment.bbox.height()
    }

    pub fn location(&self) -> Point {
        self.fragment.bbox.anchor()
    }

    /// 1-based line number assigned by the line builder
    pub fn line(&self) -> Result<usize> {
        self.line.ok_or_else(|| LayoutError::LineNotAssigned {
            raw: self.fragment.text.clone(),
        })
    }

    pub(crate) fn assign_line(&mut self, line: usize) {
        self.line = Some(line);
    }
}

/// Turn fragments into tokens, keeping only single-token fragments
pub fn tokens_from_fragments<I>(fragments: I, decomposer: &dyn PhoneticDecomposer) -> Vec<Token>
where
    I: IntoIterator<Item = RawFragment>,
{
    fragments
        .into_iter()
        .filter(|f| f.token_count() == 1)
        .filter_map(|f| Token::new(f, decomposer).ok())
        .collect()
}

// ============================================================
// Lines
// ============================================================

/// Semantic role of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    /// Root verse
    Moola,
    /// Prose commentary
    Bhaashya,
    #[default]
    Other,
}

impl Classification {
    pub fn tag(&self) -> &'static str {
        match self {
            Classification::Moola => "MOOLA",
            Classification::Bhaashya => "BHAASHYA",
            Classification::Other => "OTHER",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Tokens sharing a vertical band on one page
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    number: usize,
    page: i32,
    tokens: Vec<Token>,
    classification: Classification,
}

impl Line {
    /// Create a line; `number` is its 1-based position in the book
    ///
    /// The line belongs to the page of its first token. Only a scan
    /// without page resets produces lines whose tokens span two pages.
    pub fn new(number: usize, tokens: Vec<Token>) -> Result<Self> {
        let page = tokens.first().ok_or(LayoutError::EmptyLine)?.page();

        Ok(Self {
            number,
            page,
            tokens,
            classification: Classification::Other,
        })
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn page(&self) -> i32 {
        self.page
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token texts joined by single spaces
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(Token::raw)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn average_height(&self) -> f64 {
        let total: u64 = self.tokens.iter().map(|t| u64::from(t.size())).sum();
        total as f64 / self.tokens.len() as f64
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Set the role once. Returns false when the line already has a role.
    pub(crate) fn mark(&mut self, classification: Classification) -> bool {
        if self.classification != Classification::Other || classification == Classification::Other {
            return false;
        }
        self.classification = classification;
        true
    }
}

// ============================================================
// Pages
// ============================================================

/// Lines of one page slot with height statistics over the effective lines
///
/// Statistics are computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    slot: i32,
    page_num: Option<i32>,
    height: Option<f64>,
    lines: Vec<Line>,
    effective: Vec<usize>,
}

impl Page {
    /// Build the page for `slot` from its lines
    pub fn new(slot: i32, lines: Vec<Line>, filter: &LineFilter) -> Self {
        let effective: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| filter.is_effective(line))
            .map(|(i, _)| i)
            .collect();

        let (page_num, height) = if effective.is_empty() {
            (None, None)
        } else {
            let total: f64 = effective.iter().map(|&i| lines[i].average_height()).sum();
            (Some(lines[0].page()), Some(total / effective.len() as f64))
        };

        Self {
            slot,
            page_num,
            height,
            lines,
            effective,
        }
    }

    /// Page number the page was bucketed under, even when it has no content
    pub fn slot(&self) -> i32 {
        self.slot
    }

    /// Page number, or `None` when the page has no effective lines
    pub fn page_num(&self) -> Option<i32> {
        self.page_num
    }

    /// Mean height of the effective lines
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn has_content(&self) -> bool {
        self.page_num.is_some()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn effective_lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.effective.iter().map(|&i| &self.lines[i])
    }

    pub fn effective_count(&self) -> usize {
        self.effective.len()
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vinyaasa::{AksharaDecomposer, VinyaasaError};

    struct FailingDecomposer;

    impl PhoneticDecomposer for FailingDecomposer {
        fn decompose(&self, _token: &str) -> crate::vinyaasa::Result<Vec<String>> {
            Err(VinyaasaError::Empty)
        }
    }

    fn fragment(text: &str) -> RawFragment {
        RawFragment::new("book", 1, text, TextBox::from_rect(10, 20, 40, 18))
    }

    fn token(text: &str, page: i32, y: i32, size: i32) -> Token {
        let f = RawFragment::new("book", page, text, TextBox::from_rect(0, y, 30, size));
        Token::new(f, &AksharaDecomposer).unwrap()
    }

    #[test]
    fn test_text_box_geometry() {
        let bbox = TextBox::new(
            Point::new(10, 20),
            Point::new(110, 21),
            Point::new(11, 70),
            Point::new(111, 71),
        );
        assert_eq!(bbox.width(), 100);
        assert_eq!(bbox.height(), 50);
        assert_eq!(bbox.area(), 5000);
        assert_eq!(bbox.anchor(), Point::new(10, 20));
    }

    #[test]
    fn test_text_box_mirrored_corners() {
        let bbox = TextBox::new(
            Point::new(110, 70),
            Point::new(10, 70),
            Point::new(110, 20),
            Point::new(10, 20),
        );
        assert_eq!(bbox.width(), 100);
        assert_eq!(bbox.height(), 50);
    }

    #[test]
    fn test_text_box_extreme_vertices() {
        let bbox = TextBox::new(
            Point::new(i32::MIN, i32::MIN),
            Point::new(i32::MAX, i32::MIN),
            Point::new(i32::MIN, 1),
            Point::new(i32::MAX, 1),
        );
        assert_eq!(bbox.width(), u32::MAX);
        assert_eq!(bbox.height(), 1u32 << 31 | 1);
        assert_eq!(bbox.area(), u64::from(u32::MAX) * ((1u64 << 31) + 1));
    }

    #[test]
    fn test_fragment_tokens() {
        let f = fragment("two words");
        assert_eq!(f.tokens(), vec!["two", "words"]);
        assert_eq!(f.token_count(), 2);

        let f = fragment("a  b");
        assert_eq!(f.tokens(), vec!["a", "", "b"]);
        assert_eq!(f.token_count(), 3);

        assert_eq!(fragment("").token_count(), 1);
    }

    #[test]
    fn test_fragment_page_sentinel() {
        let mut f = fragment("x");
        assert!(f.has_page());
        f.page = NO_PAGE;
        assert!(!f.has_page());
    }

    #[test]
    fn test_token_rejects_multi_token_fragment() {
        let result = Token::new(fragment("two words"), &AksharaDecomposer);
        assert_eq!(
            result,
            Err(LayoutError::MultiToken {
                text: "two words".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn test_english_token_skips_decomposition() {
        let t = Token::new(fragment("xyz"), &AksharaDecomposer).unwrap();
        assert_eq!(t.script(), Script::English);
        assert!(t.phonetic_segments().is_none());
    }

    #[test]
    fn test_sanskrit_token_is_decomposed() {
        let t = Token::new(fragment("राम"), &AksharaDecomposer).unwrap();
        assert_eq!(t.script(), Script::Sanskrit);
        let segments = t.phonetic_segments().unwrap();
        assert_eq!(segments, ["र्", "आ", "म्", "अ"]);
    }

    #[test]
    fn test_decomposition_failure_falls_back_to_raw() {
        let t = Token::new(fragment("राम"), &FailingDecomposer).unwrap();
        assert_eq!(t.phonetic_segments().unwrap(), ["राम"]);

        let t = Token::new(fragment("॥"), &AksharaDecomposer).unwrap();
        assert_eq!(t.phonetic_segments().unwrap(), ["॥"]);
    }

    #[test]
    fn test_token_geometry() {
        let t = Token::new(fragment("राम"), &AksharaDecomposer).unwrap();
        assert_eq!(t.size(), 18);
        assert_eq!(t.location(), Point::new(10, 20));
        assert_eq!(t.page(), 1);
        assert_eq!(t.book(), "book");
    }

    #[test]
    fn test_token_line_before_assignment() {
        let mut t = Token::new(fragment("राम"), &AksharaDecomposer).unwrap();
        assert!(matches!(t.line(), Err(LayoutError::LineNotAssigned { .. })));
        t.assign_line(3);
        assert_eq!(t.line(), Ok(3));
    }

    #[test]
    fn test_tokens_from_fragments_keeps_single_tokens() {
        let fragments = vec![
            fragment("रामः वनं गच्छति"),
            fragment("रामः"),
            fragment("वनं"),
            fragment("Page 42"),
        ];
        let tokens = tokens_from_fragments(fragments, &AksharaDecomposer);
        let raws: Vec<_> = tokens.iter().map(Token::raw).collect();
        assert_eq!(raws, vec!["रामः", "वनं"]);
    }

    #[test]
    fn test_line_text_and_height() {
        let line = Line::new(
            1,
            vec![token("रामः", 1, 100, 20), token("वनं", 1, 101, 30), token("गच्छति", 1, 99, 25)],
        )
        .unwrap();
        assert_eq!(line.text(), "रामः वनं गच्छति");
        assert_eq!(line.average_height(), 25.0);
        assert_eq!(line.page(), 1);
        assert_eq!(line.len(), 3);
        assert_eq!(line.classification(), Classification::Other);
    }

    #[test]
    fn test_empty_line_rejected() {
        assert_eq!(Line::new(1, Vec::new()), Err(LayoutError::EmptyLine));
    }

    #[test]
    fn test_line_mark_is_monotonic() {
        let mut line = Line::new(1, vec![token("रामः", 1, 100, 20)]).unwrap();
        assert!(!line.mark(Classification::Other));
        assert!(line.mark(Classification::Bhaashya));
        assert!(!line.mark(Classification::Moola));
        assert_eq!(line.classification(), Classification::Bhaashya);
    }

    #[test]
    fn test_classification_tags() {
        assert_eq!(Classification::Moola.to_string(), "MOOLA");
        assert_eq!(Classification::Bhaashya.to_string(), "BHAASHYA");
        assert_eq!(Classification::default(), Classification::Other);
    }

    #[test]
    fn test_page_statistics() {
        let filter = LineFilter::new();
        let lines = vec![
            Line::new(1, vec![token("Chapter", 2, 10, 40)]).unwrap(),
            Line::new(2, vec![token("रामः", 2, 100, 20)]).unwrap(),
            Line::new(3, vec![token("वनं", 2, 140, 30)]).unwrap(),
        ];
        let page = Page::new(2, lines, &filter);
        assert_eq!(page.slot(), 2);
        assert_eq!(page.page_num(), Some(2));
        assert_eq!(page.height(), Some(25.0));
        assert_eq!(page.effective_count(), 2);
        assert_eq!(page.lines().len(), 3);
        let texts: Vec<_> = page.effective_lines().map(Line::text).collect();
        assert_eq!(texts, vec!["रामः", "वनं"]);
    }

    #[test]
    fn test_page_without_effective_lines() {
        let filter = LineFilter::new();
        let noise = vec![Line::new(1, vec![token("42", 5, 10, 20)]).unwrap()];
        let page = Page::new(5, noise, &filter);
        assert_eq!(page.page_num(), None);
        assert_eq!(page.height(), None);
        assert!(!page.has_content());
        assert_eq!(page.slot(), 5);

        let empty = Page::new(6, Vec::new(), &filter);
        assert_eq!(empty.page_num(), None);
        assert_eq!(empty.lines().len(), 0);
    }
}
