//! Bramble - indented property trees with multiple-base inheritance
//!
//! Property files are plain text, one node per line, nested by indentation.
//! A node may inherit children from any number of earlier nodes; the
//! effective children of a node are resolved on every read with
//! "later base wins, local child wins" semantics.

pub mod config;
pub mod loader;

pub use bramble_bag::{flatten, BagError, Flattened, PropertyBag, Snapshot};
pub use bramble_text::{Location, TextError};
pub use config::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, LoaderOptions};
pub use loader::{load_file, load_str, LoadError, LoadReport, Loaded, SourceFile};
