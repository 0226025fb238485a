//! Hierarchical property bags with multiple-base inheritance.
//!
//! A [`PropertyBag`] is a named value that owns an ordered set of uniquely
//! named children and may inherit children from any number of base bags.
//! Reading a bag always goes through its *effective* child set: every base's
//! effective children in base order, with the bag's own children layered on
//! top. Later bases override earlier ones and local children override all
//! bases.

mod bag;
mod error;
mod resolve;
mod snapshot;

pub use bag::PropertyBag;
pub use error::BagError;
pub use resolve::{flatten, Flattened, IntoIter};
pub use snapshot::Snapshot;
