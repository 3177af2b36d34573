//! Common types for the ocr module

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::layout::{Point, TextBox};

// ============================================================
// Error Types
// ============================================================

/// OCR ingestion error types
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Book directory not found: {0}")]
    BookNotFound(PathBuf),

    #[error("Bounding polygon in {path} has {vertices} vertices, expected 4")]
    InvalidPolygon { path: PathBuf, vertices: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OcrError>;

// ============================================================
// Annotation Wire Format
// ============================================================

/// Polygon corner. Missing coordinates mean 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

impl From<Vertex> for Point {
    fn from(v: Vertex) -> Self {
        Point::new(v.x, v.y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingPoly {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

impl BoundingPoly {
    /// Convert a clockwise polygon (top-left, top-right, bottom-right,
    /// bottom-left) into a text box
    pub fn to_text_box(&self) -> Option<TextBox> {
        match self.vertices.as_slice() {
            &[tl, tr, br, bl] => Some(TextBox::new(tl.into(), tr.into(), bl.into(), br.into())),
            _ => None,
        }
    }
}

/// One text annotation as reported by the OCR engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    pub description: String,
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Contents of a page annotation file: a bare annotation list or a full
/// engine response
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnnotationFile {
    Bare(Vec<TextAnnotation>),
    Response {
        #[serde(rename = "textAnnotations", default)]
        text_annotations: Vec<TextAnnotation>,
    },
}

impl AnnotationFile {
    pub fn into_annotations(self) -> Vec<TextAnnotation> {
        match self {
            AnnotationFile::Bare(annotations) => annotations,
            AnnotationFile::Response { text_annotations } => text_annotations,
        }
    }
}
