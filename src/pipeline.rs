//! Book reconstruction pipeline
//!
//! Runs the stages of the layout module over one book:
//!
//! ```text
//! fragments -> tokens -> lines -> effective lines -> classified lines
//!                                                  -> pages
//! ```
//!
//! and writes the result in the configured output format.

use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::export::{BookWriter, ExportError};
use crate::layout::{
    tokens_from_fragments, Classification, Classifier, LayoutError, Line, LineBuilder, LineFilter,
    Page, PageBuilder, RawFragment,
};
use crate::ocr::{AnnotationLoader, OcrError};
use crate::progress::ProcessingStage;
use crate::vinyaasa::{AksharaDecomposer, PhoneticDecomposer};

// ============================================================
// Error Types
// ============================================================

/// Pipeline error types
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Book {0} has no single-token fragments")]
    EmptyBook(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

// ============================================================
// Progress Reporting
// ============================================================

/// Receives progress notifications while a book is processed
pub trait ProgressCallback {
    fn on_step_start(&self, _stage: ProcessingStage) {}
    fn on_step_complete(&self, _stage: ProcessingStage, _message: &str) {}
    fn on_debug(&self, _message: &str) {}
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {}

// ============================================================
// Results
// ============================================================

/// Reconstructed book
#[derive(Debug, Clone)]
pub struct BookResult {
    pub book: String,
    pub fragment_count: usize,
    pub token_count: usize,
    /// All lines in scan order, classified where effective
    pub lines: Vec<Line>,
    pub pages: Vec<Page>,
    pub effective_count: usize,
}

impl BookResult {
    pub fn count(&self, classification: Classification) -> usize {
        self.lines
            .iter()
            .filter(|l| l.classification() == classification)
            .count()
    }
}

/// What processing one book directory produced
#[derive(Debug, Clone)]
pub struct BookSummary {
    pub book: String,
    pub fragments: usize,
    pub tokens: usize,
    pub lines: usize,
    pub effective_lines: usize,
    pub pages: usize,
    pub moola: usize,
    pub bhaashya: usize,
    pub output_path: std::path::PathBuf,
    pub elapsed_seconds: f64,
}

// ============================================================
// Pipeline
// ============================================================

/// Reconstructs books with one configuration
pub struct BookPipeline {
    config: PipelineConfig,
    decomposer: Box<dyn PhoneticDecomposer + Send + Sync>,
    line_builder: LineBuilder,
    filter: LineFilter,
    classifier: Classifier,
    writer: BookWriter,
}

impl BookPipeline {
    /// Pipeline with the built-in Devanagari decomposer
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_decomposer(config, AksharaDecomposer)
    }

    pub fn with_decomposer<D>(config: PipelineConfig, decomposer: D) -> Self
    where
        D: PhoneticDecomposer + Send + Sync + 'static,
    {
        Self {
            line_builder: LineBuilder::with_options(config.lines.clone()),
            filter: LineFilter::with_options(config.filter.clone()),
            classifier: Classifier::with_options(config.classifier.clone()),
            writer: BookWriter::new(config.format),
            decomposer: Box::new(decomposer),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn filter(&self) -> &LineFilter {
        &self.filter
    }

    /// Reconstruct a book from its fragments in scan order
    pub fn process_fragments(&self, book: &str, fragments: Vec<RawFragment>) -> Result<BookResult> {
        self.run(book, fragments, &SilentProgress)
    }

    fn run(
        &self,
        book: &str,
        fragments: Vec<RawFragment>,
        progress: &dyn ProgressCallback,
    ) -> Result<BookResult> {
        let fragment_count = fragments.len();

        progress.on_step_start(ProcessingStage::Tokenizing);
        let tokens = tokens_from_fragments(fragments, &*self.decomposer);
        let token_count = tokens.len();
        if tokens.is_empty() {
            return Err(PipelineError::EmptyBook(book.to_string()));
        }
        debug!(book, fragments = fragment_count, tokens = token_count, "tokenized");

        progress.on_step_start(ProcessingStage::BuildingLines);
        let mut lines = self.line_builder.build_lines(tokens)?;
        debug!(book, lines = lines.len(), "built lines");

        progress.on_step_start(ProcessingStage::Filtering);
        let effective_count = self.filter.effective_indices(&lines).len();
        debug!(
            book,
            effective = effective_count,
            noise = lines.len() - effective_count,
            "filtered lines"
        );

        progress.on_step_start(ProcessingStage::Classifying);
        self.classifier.classify_effective(&mut lines, &self.filter);

        progress.on_step_start(ProcessingStage::BuildingPages);
        let pages = PageBuilder::new(self.filter.clone()).build_pages(&lines);
        debug!(book, pages = pages.len(), "built pages");

        Ok(BookResult {
            book: book.to_string(),
            fragment_count,
            token_count,
            lines,
            pages,
            effective_count,
        })
    }

    /// Load, reconstruct and write one book directory
    pub fn process_book_dir(
        &self,
        book_dir: &Path,
        output_dir: &Path,
        progress: &dyn ProgressCallback,
    ) -> Result<BookSummary> {
        let start = Instant::now();
        let book = AnnotationLoader::book_id(book_dir);
        info!(book = %book, "processing book");

        progress.on_step_start(ProcessingStage::Loading);
        let fragments = AnnotationLoader::load_book(book_dir)?;
        progress.on_debug(&format!("{} fragments", fragments.len()));

        let result = self.run(&book, fragments, progress)?;
        progress.on_step_complete(
            ProcessingStage::Classifying,
            &format!(
                "{} moola, {} bhaashya",
                result.count(Classification::Moola),
                result.count(Classification::Bhaashya)
            ),
        );

        progress.on_step_start(ProcessingStage::Writing);
        let output_path = self.writer.write_to_dir(
            &result.book,
            output_dir,
            &result.lines,
            &result.pages,
        )?;

        let summary = BookSummary {
            fragments: result.fragment_count,
            tokens: result.token_count,
            lines: result.lines.len(),
            effective_lines: result.effective_count,
            pages: result.pages.len(),
            moola: result.count(Classification::Moola),
            bhaashya: result.count(Classification::Bhaashya),
            book: result.book,
            output_path,
            elapsed_seconds: start.elapsed().as_secs_f64(),
        };
        info!(
            book = %summary.book,
            lines = summary.lines,
            pages = summary.pages,
            output = %summary.output_path.display(),
            "book complete"
        );
        Ok(summary)
    }

    /// Output file a book directory would be written to
    pub fn output_path(&self, book_dir: &Path, output_dir: &Path) -> std::path::PathBuf {
        self.writer
            .output_path(&AnnotationLoader::book_id(book_dir), output_dir)
    }
}
