//! Load provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One file read during a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path as it was opened
    pub path: String,

    /// SHA-256 of the raw file bytes
    pub digest: String,

    /// Number of lines in the file
    pub lines: usize,

    /// Include depth (0 for the top file)
    pub depth: usize,
}

/// Files that went into a loaded tree, in read order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub loaded_at: DateTime<Utc>,
    pub sources: Vec<SourceFile>,
}

impl LoadReport {
    pub fn new(sources: Vec<SourceFile>) -> Self {
        Self {
            loaded_at: Utc::now(),
            sources,
        }
    }

    /// Total lines read across all files.
    pub fn total_lines(&self) -> usize {
        self.sources.iter().map(|source| source.lines).sum()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary, one file per line, indented by include depth.
    pub fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Loaded {} file(s), {} line(s)",
            self.sources.len(),
            self.total_lines()
        )];
        for source in &self.sources {
            lines.push(format!(
                "  {}{} ({} lines, sha256:{})",
                "  ".repeat(source.depth),
                source.path,
                source.lines,
                source.digest
            ));
        }
        lines.join("\n")
    }
}
