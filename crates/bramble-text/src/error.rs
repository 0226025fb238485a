//! Text pipeline errors.

use bramble_bag::BagError;

use crate::Location;

/// Errors raised while turning text into a property bag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// A line is not a valid declaration.
    #[error("{location}: {message}")]
    Syntax { location: Location, message: String },

    /// A line's indentation does not line up with its siblings.
    #[error("{location}: inconsistent indentation: {message}")]
    Indentation { location: Location, message: String },

    /// A base reference names no completed node in scope.
    #[error("{location}: unknown base \"{base}\"")]
    UnknownBase { location: Location, base: String },

    /// The declaration was rejected by the bag itself.
    #[error("{location}: {source}")]
    Bag {
        location: Location,
        #[source]
        source: BagError,
    },

    /// The synthetic root could not be created.
    #[error("invalid root: {0}")]
    InvalidRoot(#[source] BagError),
}

impl TextError {
    /// Location of the offending line, if the error has one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            TextError::Syntax { location, .. }
            | TextError::Indentation { location, .. }
            | TextError::UnknownBase { location, .. }
            | TextError::Bag { location, .. } => Some(location),
            TextError::InvalidRoot(_) => None,
        }
    }
}
