//! Layout reconstruction module
//!
//! Rebuilds words, lines and pages of a scanned commentarial edition from
//! unordered OCR fragments and tags root verse and commentary lines.
//!
//! # Stages
//!
//! - Fragments to tokens ([`tokens_from_fragments`]), keeping single-token fragments
//! - Tokens to lines by vertical proximity ([`LineBuilder`])
//! - Noise filtering of titles, folio numbers and Latin artifacts ([`LineFilter`])
//! - Lines to pages with height statistics ([`PageBuilder`])
//! - MOOLA / BHAASHYA tagging ([`Classifier`])
//!
//! # Example
//!
//! ```rust
//! use bhashya_reader::{
//!     AksharaDecomposer, Classification, Classifier, LineBuilder, LineFilter, RawFragment,
//!     TextBox, tokens_from_fragments,
//! };
//!
//! let fragments = vec![
//!     RawFragment::new("gita", 1, "रामः", TextBox::from_rect(0, 100, 60, 20)),
//!     RawFragment::new("gita", 1, "१।", TextBox::from_rect(70, 101, 20, 20)),
//!     RawFragment::new("gita", 1, "॥", TextBox::from_rect(95, 100, 10, 20)),
//!     RawFragment::new("gita", 1, "अथ", TextBox::from_rect(0, 140, 40, 20)),
//! ];
//!
//! let tokens = tokens_from_fragments(fragments, &AksharaDecomposer);
//! let mut lines = LineBuilder::new().build_lines(tokens).unwrap();
//! Classifier::new().classify_effective(&mut lines, &LineFilter::new());
//!
//! assert_eq!(lines[0].classification(), Classification::Moola);
//! assert_eq!(lines[1].classification(), Classification::Bhaashya);
//! ```

mod classify;
mod filter;
mod line_builder;
mod page_builder;
pub mod script;
mod types;

// Re-export public API
pub use classify::{Classifier, ClassifierOptions, ClassifierOptionsBuilder};
pub use filter::{
    FilterOptions, FilterOptionsBuilder, LineFilter, NoiseReason, DEFAULT_NOISE_HEIGHT_THRESHOLD,
};
pub use line_builder::{
    LineBuilder, LineBuilderOptions, LineBuilderOptionsBuilder, DEFAULT_THRESHOLD_FACTOR,
};
pub use page_builder::PageBuilder;
pub use script::Script;
pub use types::{
    tokens_from_fragments, Classification, LayoutError, Line, Page, Point, RawFragment, Result,
    TextBox, Token, NO_PAGE,
};
