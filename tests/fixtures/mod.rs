//! Test fixtures for property file loading
//!
//! The bestiary fixture exercises includes (top level and nested under a
//! node), comments, multiple bases and overrides of inherited children.

use std::path::{Path, PathBuf};

/// Path to the bestiary entry file
pub fn bestiary_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/bestiary/bestiary.txt")
}

/// Path to a file under the bestiary fixture
pub fn bestiary_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/bestiary")
        .join(name)
}
