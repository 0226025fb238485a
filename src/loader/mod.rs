//! Property file loading
//!
//! Reads a file, expands `#include` directives, and runs the text pipeline
//! over the result. Every file read is recorded with its digest.

mod include;
mod report;

pub use include::parse_include;
pub use report::{LoadReport, SourceFile};

use std::io;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use bramble_bag::PropertyBag;
use bramble_text::{Location, TextError};

use crate::config::LoaderOptions;
use include::Expander;

/// A loaded property tree and how it was assembled.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub root: PropertyBag,
    pub report: LoadReport,
}

/// Load errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid UTF-8: {source}")]
    Encoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("{location}: malformed include: {message}")]
    Directive { location: Location, message: String },

    #[error("{location}: include cycle through {path}")]
    IncludeCycle { location: Location, path: PathBuf },

    #[error("{location}: includes nested deeper than {limit}")]
    IncludeDepth { location: Location, limit: usize },

    #[error(transparent)]
    Text(#[from] TextError),
}

/// Load the property file at `path`.
pub fn load_file(path: &Path, options: &LoaderOptions) -> Result<Loaded, LoadError> {
    let mut expander = Expander::new(options);
    let lines = expander.expand_root(path)?;
    let root = bramble_text::parse_lines(lines, &options.root_name)?;

    let report = LoadReport::new(expander.into_sources());
    tracing::info!(
        path = %path.display(),
        files = report.sources.len(),
        children = root.len(),
        "loaded property file"
    );

    Ok(Loaded { root, report })
}

/// Parse in-memory text labelled `label`. Include directives are rejected.
pub fn load_str(label: &str, text: &str, options: &LoaderOptions) -> Result<PropertyBag, LoadError> {
    Ok(bramble_text::parse_str(label, text, &options.root_name)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_str() {
        let options = LoaderOptions {
            root_name: "game".to_string(),
            ..Default::default()
        };
        let root = load_str("inline", "a = 1\nb :: a\n", &options).unwrap();
        assert_eq!(root.name(), "game");
        assert_eq!(root.len(), 2);
        assert_eq!(root.get("a").unwrap().as_int(), Ok(1));
    }

    #[test]
    fn test_load_str_rejects_include() {
        let err = load_str("inline", "#include \"x.txt\"\n", &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Text(TextError::Syntax { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("/nonexistent/x.txt"), &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
