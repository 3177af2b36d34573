//! Page grouping
//!
//! Buckets lines by page number and produces one [`Page`] per slot from
//! page 1 up to the highest page seen. Slots without content are kept so
//! page positions stay aligned with the scanned book.

use std::collections::BTreeMap;
use tracing::warn;

use super::filter::LineFilter;
use super::types::{Line, Page};

/// Groups lines into pages
#[derive(Debug, Clone, Default)]
pub struct PageBuilder {
    filter: LineFilter,
}

impl PageBuilder {
    pub fn new(filter: LineFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &LineFilter {
        &self.filter
    }

    /// Build pages `1..=max_page`. Lines keep their relative input order
    /// within each page; lines without a page number are dropped.
    pub fn build_pages(&self, lines: &[Line]) -> Vec<Page> {
        let mut buckets: BTreeMap<i32, Vec<Line>> = BTreeMap::new();
        for line in lines {
            if line.page() < 1 {
                warn!(line = line.number(), page = line.page(), "dropping line without a page");
                continue;
            }
            buckets.entry(line.page()).or_default().push(line.clone());
        }

        let max_page = match buckets.keys().next_back() {
            Some(&max) => max,
            None => return Vec::new(),
        };

        (1..=max_page)
            .map(|slot| {
                let bucket = buckets.remove(&slot).unwrap_or_default();
                Page::new(slot, bucket, &self.filter)
            })
            .collect()
    }
}
