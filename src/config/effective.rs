//! Effective loader configuration with provenance
//!
//! Records the merged options together with every file that contributed to
//! them, so a load can be reproduced.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use super::defaults::LoaderOptions;

/// Upper bound for `max_include_depth`.
const MAX_INCLUDE_DEPTH_LIMIT: usize = 256;

/// Origin of a configuration layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Project,
    Cli,
}

/// A contributing config layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 of the raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged loader options plus the layers they came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub options: LoaderOptions,

    /// Contributing layers, lowest precedence first
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Merge defaults, the host and project files (skipped when missing) and
    /// CLI overrides, then validate.
    pub fn build(
        host_config_path: Option<&Path>,
        project_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![LoaderOptions::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        for (origin, path) in [
            (ConfigOrigin::Host, host_config_path),
            (ConfigOrigin::Project, project_config_path),
        ] {
            let Some(path) = path.filter(|p| p.exists()) else {
                continue;
            };
            let (value, digest) = Self::load_toml_file(path)?;
            tracing::debug!(path = %path.display(), ?origin, "loaded config layer");
            layers.push(value);
            sources.push(ConfigSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers, &sources)?;
        let options: LoaderOptions = serde_json::from_value(merged)
            .map_err(|e| ConfigError::ParseError(format!("invalid settings: {}", e)))?;
        Self::validate(&options)?;

        Ok(Self { options, sources })
    }

    /// Read a TOML file, returning it as JSON plus the digest of its bytes
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let digest = hex::encode(Sha256::digest(&bytes));

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        // toml::Value serializes straight into the JSON data model
        let table: toml::Table = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
        let value = serde_json::to_value(table)
            .map_err(|e| ConfigError::ParseError(format!("TOML conversion error: {}", e)))?;

        Ok((value, digest))
    }

    fn validate(options: &LoaderOptions) -> Result<(), ConfigError> {
        if options.max_include_depth == 0 || options.max_include_depth > MAX_INCLUDE_DEPTH_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "max_include_depth must be in [1, {}]",
                MAX_INCLUDE_DEPTH_LIMIT
            )));
        }

        let name = &options.root_name;
        if name.is_empty() || name.contains(|c: char| c == '.' || c == '=' || c.is_whitespace()) {
            return Err(ConfigError::ValidationError(
                "root_name must be non-empty and contain no '.', '=' or whitespace".to_string(),
            ));
        }

        Ok(())
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Lay layers over each other, lowest precedence first.
///
/// Loader options are one flat table, so a key in a higher layer replaces the
/// same key below it outright. A layer that is not a table is an error.
fn merge_layers(layers: Vec<Value>, sources: &[ConfigSource]) -> Result<Value, ConfigError> {
    let mut merged = Map::new();
    for (layer, source) in layers.into_iter().zip(sources) {
        let Value::Object(table) = layer else {
            return Err(ConfigError::ParseError(format!(
                "{:?} config layer is not a table",
                source.origin
            )));
        };
        merged.extend(table);
    }
    Ok(Value::Object(merged))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "{}", contents).unwrap();
        temp
    }

    #[test]
    fn test_build_with_defaults_only() {
        let config = EffectiveConfig::build(None, None, None).unwrap();

        assert_eq!(config.options, LoaderOptions::default());
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Builtin);
    }

    #[test]
    fn test_layers_in_precedence_order() {
        let host = toml_file("max_include_depth = 4\nroot_name = \"host\"\n");
        let project = toml_file("root_name = \"project\"\n");
        let cli = serde_json::json!({"max_include_depth": 2});

        let config =
            EffectiveConfig::build(Some(host.path()), Some(project.path()), Some(cli)).unwrap();

        assert_eq!(config.options.max_include_depth, 2);
        assert_eq!(config.options.root_name, "project");
        let origins: Vec<_> = config.sources.iter().map(|s| s.origin.clone()).collect();
        assert_eq!(
            origins,
            vec![
                ConfigOrigin::Builtin,
                ConfigOrigin::Host,
                ConfigOrigin::Project,
                ConfigOrigin::Cli
            ]
        );
    }

    #[test]
    fn test_untouched_keys_survive_higher_layers() {
        let host = toml_file("max_include_depth = 4\n");
        let cli = serde_json::json!({"root_name": "game"});

        let config = EffectiveConfig::build(Some(host.path()), None, Some(cli)).unwrap();
        assert_eq!(config.options.max_include_depth, 4);
        assert_eq!(config.options.root_name, "game");
    }

    #[test]
    fn test_non_table_cli_layer_rejected() {
        let err = EffectiveConfig::build(None, None, Some(serde_json::json!(4))).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains("Cli config layer is not a table"));
    }

    #[test]
    fn test_file_digest_recorded() {
        let host = toml_file("max_include_depth = 4\n");
        let config = EffectiveConfig::build(Some(host.path()), None, None).unwrap();

        let digest = config.sources[1].digest.as_deref().unwrap();
        assert_eq!(digest, hex::encode(Sha256::digest(b"max_include_depth = 4\n")));
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_missing_file_skipped() {
        let config =
            EffectiveConfig::build(Some(Path::new("/nonexistent/bramble.toml")), None, None)
                .unwrap();
        assert_eq!(config.sources.len(), 1);
    }

    #[test]
    fn test_validation_include_depth() {
        for depth in [0, 257] {
            let cli = serde_json::json!({"max_include_depth": depth});
            let err = EffectiveConfig::build(None, None, Some(cli)).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)));
            assert!(err.to_string().contains("max_include_depth"));
        }
    }

    #[test]
    fn test_validation_root_name() {
        for name in ["", "a.b", "a b", "a=b"] {
            let cli = serde_json::json!({"root_name": name});
            let err = EffectiveConfig::build(None, None, Some(cli)).unwrap_err();
            assert!(err.to_string().contains("root_name"), "accepted {:?}", name);
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        let project = toml_file("max_include_dept = 4\n");
        let err = EffectiveConfig::build(None, Some(project.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let host = toml_file("max_include_depth = \n");
        let err = EffectiveConfig::build(Some(host.path()), None, None).unwrap_err();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_to_json() {
        let config = EffectiveConfig::build(None, None, None).unwrap();
        let json: Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(json["options"]["root_name"], "root");
        assert_eq!(json["sources"][0]["origin"], "builtin");
        assert!(json["sources"][0].get("path").is_none());
    }
}
