//! Book output writers
//!
//! Three formats are supported:
//!
//! - `tagged`: `{MOOLA|BHAASHYA|OTHER}\t{text}` for every line, noise included
//! - `pages`: a `{page_num}\t{height}` header per page followed by
//!   `{line_height}\t{text}` rows, pages separated by a row of `=`
//! - `json`: pages with their effective lines as a JSON array

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::layout::{Classification, Line, Page};

/// Width of the separator row between pages
pub const PAGE_SEPARATOR_WIDTH: usize = 40;

/// Printed in place of a page number or height a page does not have
pub const SENTINEL: i32 = -1;

/// Export error types
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Output format of a reconstructed book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Classification tag and text per line
    #[default]
    Tagged,
    /// Page headers with line heights
    Pages,
    /// Structured JSON
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tagged => "tsv",
            OutputFormat::Pages => "txt",
            OutputFormat::Json => "json",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Tagged => "tagged",
            OutputFormat::Pages => "pages",
            OutputFormat::Json => "json",
        }
    }
}

// ============================================================
// JSON records
// ============================================================

#[derive(Debug, Serialize)]
struct LineRecord<'a> {
    number: usize,
    classification: Classification,
    height: f64,
    text: String,
    tokens: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct PageRecord<'a> {
    slot: i32,
    page_num: Option<i32>,
    height: Option<f64>,
    lines: Vec<LineRecord<'a>>,
}

impl<'a> LineRecord<'a> {
    fn from_line(line: &'a Line) -> Self {
        Self {
            number: line.number(),
            classification: line.classification(),
            height: line.average_height(),
            text: line.text(),
            tokens: line.tokens().iter().map(|t| t.raw()).collect(),
        }
    }
}

impl<'a> PageRecord<'a> {
    fn from_page(page: &'a Page) -> Self {
        Self {
            slot: page.slot(),
            page_num: page.page_num(),
            height: page.height(),
            lines: page.effective_lines().map(LineRecord::from_line).collect(),
        }
    }
}

// ============================================================
// Writers
// ============================================================

/// Write `{tag}\t{text}` rows
pub fn write_tagged<'a, W, I>(out: &mut W, lines: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Line>,
{
    for line in lines {
        writeln!(out, "{}\t{}", line.classification().tag(), line.text())?;
    }
    Ok(())
}

/// Write page headers with their effective lines
pub fn write_page_report<W: Write>(out: &mut W, pages: &[Page]) -> Result<()> {
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            writeln!(out, "{}", "=".repeat(PAGE_SEPARATOR_WIDTH))?;
        }

        let page_num = page.page_num().unwrap_or(SENTINEL);
        match page.height() {
            Some(height) => writeln!(out, "{}\t{}", page_num, height)?,
            None => writeln!(out, "{}\t{}", page_num, SENTINEL)?,
        }

        for line in page.effective_lines() {
            writeln!(out, "{}\t{}", line.average_height(), line.text())?;
        }
    }
    Ok(())
}

/// Write pages as a pretty-printed JSON array
pub fn write_json<W: Write>(out: &mut W, pages: &[Page]) -> Result<()> {
    let records: Vec<PageRecord<'_>> = pages.iter().map(PageRecord::from_page).collect();
    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)?;
    Ok(())
}

/// Writes a reconstructed book in one format
#[derive(Debug, Clone, Copy, Default)]
pub struct BookWriter {
    format: OutputFormat,
}

impl BookWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Output file of `book` inside `output_dir`
    pub fn output_path(&self, book: &str, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.{}", book, self.format.extension()))
    }

    /// Write the book to `out`
    pub fn write<W: Write>(
        &self,
        out: &mut W,
        lines: &[Line],
        pages: &[Page],
    ) -> Result<()> {
        match self.format {
            OutputFormat::Tagged => write_tagged(out, lines),
            OutputFormat::Pages => write_page_report(out, pages),
            OutputFormat::Json => write_json(out, pages),
        }
    }

    /// Write the book to its file in `output_dir`
    pub fn write_to_dir(
        &self,
        book: &str,
        output_dir: &Path,
        lines: &[Line],
        pages: &[Page],
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;
        let path = self.output_path(book, output_dir);
        let mut out = BufWriter::new(File::create(&path)?);
        self.write(&mut out, lines, pages)?;
        out.flush()?;
        Ok(path)
    }
}
