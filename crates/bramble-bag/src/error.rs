//! Property bag error types.

use std::num::ParseIntError;

/// Errors raised while building or reading property bags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BagError {
    /// A required constructor argument was absent.
    #[error("invalid argument: {0} must not be empty")]
    InvalidArgument(&'static str),

    /// Two direct children of the same bag share a name.
    #[error("duplicate key \"{name}\" in \"{parent}\"")]
    DuplicateKey { parent: String, name: String },

    /// A present value is not a valid integer literal.
    #[error("\"{name}\" has non-integer value \"{value}\": {source}")]
    ParseInt {
        name: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}
