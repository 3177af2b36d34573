//! Root verse / commentary classification
//!
//! Commentarial editions close a root verse with a verse number followed
//! by a double danda (`... १७ ॥`) and start the commentary on the next
//! line. The classifier slides a two-line window over the lines: a line
//! whose last token is the terminator and whose second-to-last token starts
//! with a numeral becomes MOOLA, and the line after it becomes BHAASHYA.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use super::filter::LineFilter;
use super::script::{DEVANAGARI_NUMERALS, DOUBLE_DANDA};
use super::types::{Classification, Line};

/// Options for classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Token that closes a verse
    pub verse_terminator: char,

    /// Characters a verse number may start with
    pub numeral_glyphs: BTreeSet<char>,

    /// Only tag the following line as commentary when it is on the same page
    pub page_aware_lookahead: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            verse_terminator: DOUBLE_DANDA,
            numeral_glyphs: DEVANAGARI_NUMERALS.into_iter().collect(),
            page_aware_lookahead: true,
        }
    }
}

impl ClassifierOptions {
    pub fn builder() -> ClassifierOptionsBuilder {
        ClassifierOptionsBuilder::default()
    }
}

/// Builder for ClassifierOptions
#[derive(Debug, Default)]
pub struct ClassifierOptionsBuilder {
    options: ClassifierOptions,
}

impl ClassifierOptionsBuilder {
    #[must_use]
    pub fn verse_terminator(mut self, terminator: char) -> Self {
        self.options.verse_terminator = terminator;
        self
    }

    #[must_use]
    pub fn numeral_glyphs(mut self, glyphs: impl IntoIterator<Item = char>) -> Self {
        self.options.numeral_glyphs = glyphs.into_iter().collect();
        self
    }

    #[must_use]
    pub fn page_aware_lookahead(mut self, aware: bool) -> Self {
        self.options.page_aware_lookahead = aware;
        self
    }

    #[must_use]
    pub fn build(self) -> ClassifierOptions {
        self.options
    }
}

/// Sequential MOOLA / BHAASHYA classifier
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    options: ClassifierOptions,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ClassifierOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    fn is_terminator(&self, raw: &str) -> bool {
        let mut chars = raw.chars();
        chars.next() == Some(self.options.verse_terminator) && chars.next().is_none()
    }

    fn starts_with_numeral(&self, raw: &str) -> bool {
        raw.chars()
            .next()
            .is_some_and(|c| self.options.numeral_glyphs.contains(&c))
    }

    /// Whether the line closes a verse. Lines under two tokens never do.
    pub fn is_verse_end(&self, line: &Line) -> bool {
        match line.tokens() {
            [.., number, last] => self.is_terminator(last.raw()) && self.starts_with_numeral(number.raw()),
            _ => false,
        }
    }

    /// Role of every line in `lines`, starting from their current roles
    ///
    /// Lines that already carry a role keep it and are not inspected.
    pub fn roles(&self, lines: &[&Line]) -> Vec<Classification> {
        let mut roles: Vec<Classification> = lines.iter().map(|l| l.classification()).collect();

        for i in 0..lines.len() {
            if roles[i] != Classification::Other || !self.is_verse_end(lines[i]) {
                continue;
            }
            roles[i] = Classification::Moola;

            match lines.get(i + 1) {
                None => debug!(line = lines[i].number(), "verse end on last line, no commentary follows"),
                Some(next) if self.options.page_aware_lookahead && next.page() != lines[i].page() => {
                    debug!(
                        line = lines[i].number(),
                        next_page = next.page(),
                        "verse end at page foot, commentary not tagged across pages"
                    );
                }
                Some(_) => {
                    if roles[i + 1] == Classification::Other {
                        roles[i + 1] = Classification::Bhaashya;
                    }
                }
            }
        }

        roles
    }

    /// Classify lines in place and return them
    pub fn classify<'a>(&self, lines: &'a mut [Line]) -> &'a mut [Line] {
        let roles = {
            let refs: Vec<&Line> = lines.iter().collect();
            self.roles(&refs)
        };
        for (line, role) in lines.iter_mut().zip(roles) {
            line.mark(role);
        }
        lines
    }

    /// Classify only the lines `filter` keeps, with the window sliding over
    /// that subset. Noise lines keep their role.
    pub fn classify_effective(&self, lines: &mut [Line], filter: &LineFilter) {
        let indices = filter.effective_indices(lines);
        let roles = {
            let refs: Vec<&Line> = indices.iter().map(|&i| &lines[i]).collect();
            self.roles(&refs)
        };
        for (i, role) in indices.into_iter().zip(roles) {
            lines[i].mark(role);
        }
    }
}
