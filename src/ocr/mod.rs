//! OCR ingestion module
//!
//! Reads the annotations an OCR engine produced for each rasterized page
//! and turns them into [`RawFragment`](crate::layout::RawFragment)s.
//!
//! # Layout on disk
//!
//! ```text
//! ocr/
//!   gita/
//!     page_001.json
//!     page_002.json
//! ```
//!
//! Each file is either a bare list of annotations or an engine response
//! with a `textAnnotations` list. Annotations carry a `description` and a
//! four-vertex `boundingPoly`.

mod loader;
mod types;

// Re-export public API
pub use loader::{AnnotationLoader, PageFile, ANNOTATION_EXTENSION, DEFAULT_PAGE_PREFIX};
pub use types::{AnnotationFile, BoundingPoly, OcrError, Result, TextAnnotation, Vertex};
