//! Indentation-based text format for property bags.
//!
//! Text is reduced in stages: comments are stripped, blank lines dropped,
//! the remaining lines are nested by indentation, and the resulting tree is
//! turned into a [`PropertyBag`] whose base references are resolved against
//! nodes that are already complete.
//!
//! ```text
//! // comment
//! creature
//!     health = 10
//! goblin :: creature
//!     health = 4
//! ```
//!
//! File inclusion is not handled here; a loader expands `#include` lines
//! before handing the text over.

mod builder;
mod error;
mod filter;
mod line;
mod tree;

pub use builder::{build, parse_declaration, Declaration};
pub use error::TextError;
pub use filter::{strip_comment, strip_comments, strip_empty_lines};
pub use line::{Location, SourceLine};
pub use tree::{IndentationTree, TreeNode};

use bramble_bag::PropertyBag;

/// Run the full pipeline over already-split lines.
pub fn parse_lines<I>(lines: I, root_name: &str) -> Result<PropertyBag, TextError>
where
    I: IntoIterator<Item = SourceLine>,
{
    let lines = strip_empty_lines(strip_comments(lines));
    let tree = IndentationTree::parse(lines)?;
    build(&tree, root_name)
}

/// Parse in-memory text; `label` names the source in error locations.
pub fn parse_str(label: &str, text: &str, root_name: &str) -> Result<PropertyBag, TextError> {
    parse_lines(SourceLine::split(label, text), root_name)
}
