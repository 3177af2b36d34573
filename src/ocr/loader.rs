//! OCR annotation loading
//!
//! A book is a directory of per-page annotation files named after the
//! rasterized page images: `{prefix}_{zero-padded index}.json`.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::types::{AnnotationFile, OcrError, Result, TextAnnotation};
use crate::layout::RawFragment;

/// Default file name prefix of rasterized pages
pub const DEFAULT_PAGE_PREFIX: &str = "page";

/// Extension of annotation files
pub const ANNOTATION_EXTENSION: &str = "json";

/// Page numbers may run at most this far past the number of page files
/// of a book; anything beyond is a stray file, not a page
pub const MAX_MISSING_PAGES: usize = 1000;

/// Annotation file of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub path: PathBuf,
    pub page: i32,
}

/// Loads OCR annotations of books from disk
pub struct AnnotationLoader;

impl AnnotationLoader {
    /// File stem of page `index` in a book of `total` pages
    /// (`page_007` for page 7 of 120)
    pub fn page_file_stem(prefix: &str, index: usize, total: usize) -> String {
        let width = total.max(1).to_string().len();
        format!("{}_{:0width$}", prefix, index, width = width)
    }

    /// Annotation file name of page `index` (`page_007.json`)
    pub fn page_file_name(prefix: &str, index: usize, total: usize) -> String {
        format!(
            "{}.{}",
            Self::page_file_stem(prefix, index, total),
            ANNOTATION_EXTENSION
        )
    }

    /// Page number encoded after the last `_` of the file stem
    pub fn parse_page_number(path: &Path) -> Option<i32> {
        let stem = path.file_stem()?.to_str()?;
        let (_, digits) = stem.rsplit_once('_')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Book identifier of a book directory
    pub fn book_id(dir: &Path) -> String {
        dir.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string())
    }

    fn is_annotation_file(path: &Path) -> bool {
        path.is_file() && path.extension().is_some_and(|ext| ext == ANNOTATION_EXTENSION)
    }

    /// Annotation files of a book, ordered by page number
    pub fn list_page_files(dir: &Path) -> Result<Vec<PageFile>> {
        if !dir.is_dir() {
            return Err(OcrError::BookNotFound(dir.to_path_buf()));
        }

        let mut pages = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !Self::is_annotation_file(&path) {
                continue;
            }
            match Self::parse_page_number(&path) {
                Some(page) => pages.push(PageFile { path, page }),
                None => warn!(path = %path.display(), "skipping annotation file without page number"),
            }
        }

        let limit = i32::try_from(pages.len() + MAX_MISSING_PAGES).unwrap_or(i32::MAX);
        pages.retain(|pf| {
            let plausible = pf.page <= limit;
            if !plausible {
                warn!(
                    path = %pf.path.display(),
                    page = pf.page,
                    limit,
                    "skipping annotation file with implausible page number"
                );
            }
            plausible
        });

        pages.sort_by(|a, b| a.page.cmp(&b.page).then_with(|| a.path.cmp(&b.path)));
        Ok(pages)
    }

    /// Whether `dir` directly holds page annotation files
    pub fn is_book_dir(dir: &Path) -> bool {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries.filter_map(|e| e.ok()).any(|e| {
                    let path = e.path();
                    Self::is_annotation_file(&path) && Self::parse_page_number(&path).is_some()
                })
            })
            .unwrap_or(false)
    }

    /// Book directories under `input`: `input` itself when it is a book,
    /// otherwise its book subdirectories in name order
    pub fn list_book_dirs(input: &Path) -> Result<Vec<PathBuf>> {
        if !input.is_dir() {
            return Err(OcrError::BookNotFound(input.to_path_buf()));
        }
        if Self::is_book_dir(input) {
            return Ok(vec![input.to_path_buf()]);
        }

        let mut books = Vec::new();
        for entry in std::fs::read_dir(input)? {
            let path = entry?.path();
            if path.is_dir() && Self::is_book_dir(&path) {
                books.push(path);
            }
        }
        books.sort();
        Ok(books)
    }

    /// Parse the contents of an annotation file
    pub fn parse_annotations(json: &str) -> Result<Vec<TextAnnotation>> {
        let file: AnnotationFile = serde_json::from_str(json)?;
        Ok(file.into_annotations())
    }

    /// Fragments of one page in annotation order
    pub fn load_page(path: &Path, book: &str, page: i32) -> Result<Vec<RawFragment>> {
        let json = std::fs::read_to_string(path)?;
        let annotations = Self::parse_annotations(&json)?;

        annotations
            .into_iter()
            .map(|annotation| -> Result<RawFragment> {
                let bbox = annotation.bounding_poly.to_text_box().ok_or_else(|| {
                    OcrError::InvalidPolygon {
                        path: path.to_path_buf(),
                        vertices: annotation.bounding_poly.vertices.len(),
                    }
                })?;
                Ok(RawFragment::new(book, page, annotation.description, bbox))
            })
            .collect()
    }

    /// All fragments of a book in scan order: by page, then annotation order
    ///
    /// Pages are read in parallel.
    pub fn load_book(dir: &Path) -> Result<Vec<RawFragment>> {
        let book = Self::book_id(dir);
        let page_files = Self::list_page_files(dir)?;

        let pages: Vec<Vec<RawFragment>> = page_files
            .par_iter()
            .map(|pf| Self::load_page(&pf.path, &book, pf.page))
            .collect::<Result<Vec<_>>>()?;

        let fragments: Vec<RawFragment> = pages.into_iter().flatten().collect();
        debug!(book = %book, pages = page_files.len(), fragments = fragments.len(), "loaded annotations");
        Ok(fragments)
    }
}
