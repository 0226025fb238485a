//! Built-in loader defaults (layer 1)

use serde::{Deserialize, Serialize};

/// Settings that control how property files are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderOptions {
    /// How many `#include` levels may nest below the top file (default: 16)
    pub max_include_depth: usize,

    /// Name of the synthetic bag holding the top-level nodes (default: "root")
    pub root_name: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_include_depth: 16,
            root_name: "root".to_string(),
        }
    }
}

impl LoaderOptions {
    /// Convert to a JSON value for layering.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "max_include_depth": self.max_include_depth,
            "root_name": self.root_name,
        })
    }
}
