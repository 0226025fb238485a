//! Source lines with their origin.

use std::fmt;
use std::sync::Arc;

/// Where a line came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// File path or other label.
    pub file: Arc<str>,
    /// 1-based line number within `file`.
    pub line: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One line of text plus its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub location: Location,
    pub text: String,
}

impl SourceLine {
    /// Create a line.
    pub fn new(file: Arc<str>, line: usize, text: impl Into<String>) -> Self {
        Self {
            location: Location { file, line },
            text: text.into(),
        }
    }

    /// Split `text` into numbered lines labelled `label`.
    pub fn split(label: &str, text: &str) -> Vec<SourceLine> {
        let file: Arc<str> = Arc::from(label);
        text.lines()
            .enumerate()
            .map(|(i, line)| SourceLine::new(Arc::clone(&file), i + 1, line))
            .collect()
    }
}
