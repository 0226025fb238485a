//! `#include` expansion
//!
//! An include line is replaced by the lines of the named file, resolved
//! relative to the including file. Included lines are shifted right by as
//! many columns as the directive is indented, so an include placed under a
//! node nests the included nodes under it. The shift reuses whichever
//! character a line is already indented with, so a tab-indented file can sit
//! under a space-indented directive. Lines keep their original file and line
//! number.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use bramble_text::{strip_comment, SourceLine};

use super::{LoadError, SourceFile};
use crate::config::LoaderOptions;

const INCLUDE: &str = "#include";

/// Recognize an include directive.
///
/// Returns `None` for ordinary lines, the quoted target for a well-formed
/// directive, and a message for a malformed one. A trailing comment is
/// ignored.
pub fn parse_include(text: &str) -> Option<Result<&str, String>> {
    let rest = strip_comment(text).trim_start().strip_prefix(INCLUDE)?;
    let target = rest
        .trim()
        .strip_prefix('"')
        .and_then(|quoted| quoted.strip_suffix('"'));

    Some(match target {
        Some(target) if !target.is_empty() => Ok(target),
        _ => Err(format!("expected {} \"path\"", INCLUDE)),
    })
}

pub(super) struct Expander<'a> {
    options: &'a LoaderOptions,
    /// Canonical paths of the files currently being expanded.
    stack: Vec<PathBuf>,
    sources: Vec<SourceFile>,
}

impl<'a> Expander<'a> {
    pub(super) fn new(options: &'a LoaderOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Expand `path` and everything it includes.
    pub(super) fn expand_root(&mut self, path: &Path) -> Result<Vec<SourceLine>, LoadError> {
        let mut out = Vec::new();
        let canonical = canonicalize(path)?;
        self.expand(path, canonical, 0, 0, &mut out)?;
        Ok(out)
    }

    pub(super) fn into_sources(self) -> Vec<SourceFile> {
        self.sources
    }

    fn expand(
        &mut self,
        path: &Path,
        canonical: PathBuf,
        indent: usize,
        depth: usize,
        out: &mut Vec<SourceLine>,
    ) -> Result<(), LoadError> {
        let bytes = fs::read(&canonical).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let digest = hex::encode(Sha256::digest(&bytes));
        let text = String::from_utf8(bytes).map_err(|source| LoadError::Encoding {
            path: path.to_path_buf(),
            source,
        })?;

        let lines = SourceLine::split(&path.to_string_lossy(), &text);
        tracing::debug!(path = %path.display(), depth, lines = lines.len(), "read source file");
        self.sources.push(SourceFile {
            path: path.display().to_string(),
            digest,
            lines: lines.len(),
            depth,
        });

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        self.stack.push(canonical);

        for line in lines {
            let directive = parse_include(&line.text).map(|parsed| parsed.map(str::to_string));
            let target = match directive {
                None => {
                    out.push(shift(line, indent));
                    continue;
                }
                Some(Err(message)) => {
                    return Err(LoadError::Directive {
                        location: line.location,
                        message,
                    });
                }
                Some(Ok(target)) => target,
            };

            if depth + 1 > self.options.max_include_depth {
                return Err(LoadError::IncludeDepth {
                    location: line.location,
                    limit: self.options.max_include_depth,
                });
            }

            let target_path = dir.join(&target);
            let target_canonical = canonicalize(&target_path)?;
            if self.stack.contains(&target_canonical) {
                return Err(LoadError::IncludeCycle {
                    location: line.location,
                    path: target_path,
                });
            }

            tracing::debug!(from = %line.location, target = %target_path.display(), "expanding include");
            let nested = indent + indent_width(&line.text);
            self.expand(&target_path, target_canonical, nested, depth + 1, out)?;
        }

        self.stack.pop();
        Ok(())
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, LoadError> {
    fs::canonicalize(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Leading columns, one per space or tab.
fn indent_width(text: &str) -> usize {
    text.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

fn shift(line: SourceLine, columns: usize) -> SourceLine {
    if columns == 0 {
        return line;
    }
    let fill = if line.text.starts_with('\t') { "\t" } else { " " };
    SourceLine {
        text: format!("{}{}", fill.repeat(columns), line.text),
        location: line.location,
    }
}
