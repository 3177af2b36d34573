//! Export module
//!
//! Persists reconstructed books as line-oriented text or JSON.

mod writer;

// Re-export public API
pub use writer::{
    write_json, write_page_report, write_tagged, BookWriter, ExportError, OutputFormat, Result,
    PAGE_SEPARATOR_WIDTH, SENTINEL,
};
