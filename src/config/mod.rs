//! Loader configuration
//!
//! Settings for reading property files are merged from four layers, lowest
//! precedence first:
//! 1. Built-in defaults
//! 2. Host/user config (`--config`)
//! 3. Project config (`bramble.toml`, or `--project-config`)
//! 4. CLI flags

mod defaults;
mod effective;

pub use defaults::LoaderOptions;
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
