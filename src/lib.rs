//! bhashya-reader - Layout reconstruction for scanned Sanskrit commentaries
//!
//! Turns per-page OCR annotations of a scanned commentarial edition into
//! lines and pages, drops noise such as folio numbers and running titles,
//! and tags each line as root verse (MOOLA), commentary (BHAASHYA) or
//! other.
//!
//! # Modules
//!
//! - [`layout`]: tokens, lines, noise filtering, classification, pages
//! - [`vinyaasa`]: phonetic decomposition of Devanagari tokens
//! - [`ocr`]: loading OCR annotation files of a book
//! - [`export`]: tagged, page report and JSON output
//! - [`pipeline`]: end-to-end processing of a book
//! - [`config`]: TOML configuration and command-line overrides
//!
//! # Example
//!
//! ```rust
//! use bhashya_reader::{BookPipeline, PipelineConfig, RawFragment, TextBox};
//!
//! let fragments = vec![
//!     RawFragment::new("gita", 1, "धर्मक्षेत्रे", TextBox::from_rect(0, 100, 80, 24)),
//!     RawFragment::new("gita", 1, "१", TextBox::from_rect(90, 101, 20, 24)),
//!     RawFragment::new("gita", 1, "॥", TextBox::from_rect(115, 100, 10, 24)),
//!     RawFragment::new("gita", 1, "अथ", TextBox::from_rect(0, 150, 40, 20)),
//! ];
//!
//! let pipeline = BookPipeline::new(PipelineConfig::default());
//! let book = pipeline.process_fragments("gita", fragments).unwrap();
//! assert_eq!(book.lines.len(), 2);
//! assert_eq!(book.pages.len(), 1);
//! ```

pub mod cli;
pub mod config;
pub mod export;
pub mod layout;
pub mod ocr;
pub mod pipeline;
pub mod progress;
pub mod vinyaasa;

// CLI
pub use cli::{exit_codes, Cli, Commands, ReconstructArgs};

// Config
pub use config::{CliOverrides, Config, ConfigError, OutputConfig, PipelineConfig};

// Export
pub use export::{BookWriter, ExportError, OutputFormat};

// Layout
pub use layout::{
    tokens_from_fragments, Classification, Classifier, ClassifierOptions, FilterOptions,
    LayoutError, Line, LineBuilder, LineBuilderOptions, LineFilter, NoiseReason, Page,
    PageBuilder, Point, RawFragment, Script, TextBox, Token,
};

// OCR
pub use ocr::{AnnotationLoader, OcrError};

// Pipeline
pub use pipeline::{
    BookPipeline, BookResult, BookSummary, PipelineError, ProgressCallback, SilentProgress,
};

// Progress
pub use progress::{OutputMode, ProcessingStage, ProgressTracker};

// Vinyaasa
pub use vinyaasa::{AksharaDecomposer, PhoneticDecomposer, VinyaasaError};
