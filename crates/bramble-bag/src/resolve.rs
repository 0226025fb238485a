//! Effective child resolution.
//!
//! Flattening walks the bases in declaration order, folding each base's own
//! effective children into the result, then folds in the bag's direct
//! children. A name that is already present is removed before the new entry
//! is inserted, so an override both replaces the value and moves to the end
//! of the iteration order.

use std::collections::HashMap;
use std::sync::Arc;

use crate::PropertyBag;

/// The effective (flattened) child set of a bag.
///
/// Holds at most one entry per name. Entries borrow from the bag tree they
/// were computed from and are discarded with the set.
#[derive(Debug, Clone, Default)]
pub struct Flattened<'a> {
    /// Insertion-ordered slots; overridden entries leave a `None` behind.
    slots: Vec<Option<&'a Arc<PropertyBag>>>,
    /// Name to live slot.
    index: HashMap<&'a str, usize>,
}

impl<'a> Flattened<'a> {
    /// Insert `bag`, displacing any entry with the same name.
    fn put(&mut self, bag: &'a Arc<PropertyBag>) {
        if let Some(slot) = self.index.remove(bag.name()) {
            self.slots[slot] = None;
        }
        self.index.insert(bag.name(), self.slots.len());
        self.slots.push(Some(bag));
    }

    /// Number of effective children.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if there are no effective children.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// True if an effective child named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The effective child named `name`.
    pub fn get(&self, name: &str) -> Option<&'a Arc<PropertyBag>> {
        self.index.get(name).and_then(|&slot| self.slots[slot])
    }

    /// Effective children in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Arc<PropertyBag>> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Effective child names in resolution order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.iter().map(|bag| bag.name())
    }
}

impl<'a> IntoIterator for Flattened<'a> {
    type Item = &'a Arc<PropertyBag>;
    type IntoIter = IntoIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_iter(),
        }
    }
}

/// Owning iterator over a [`Flattened`] set.
#[derive(Debug)]
pub struct IntoIter<'a> {
    slots: std::vec::IntoIter<Option<&'a Arc<PropertyBag>>>,
}

impl<'a> Iterator for IntoIter<'a> {
    type Item = &'a Arc<PropertyBag>;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| slot)
    }
}

/// Compute the effective child set of `bag`.
///
/// Recurses through every base, so the cost is proportional to the size of
/// the whole base graph below `bag`. Nothing is cached between calls.
pub fn flatten(bag: &PropertyBag) -> Flattened<'_> {
    let mut properties = Flattened::default();

    for base in bag.bases() {
        for child in flatten(base) {
            properties.put(child);
        }
    }

    for child in bag.children() {
        properties.put(child);
    }

    tracing::trace!(bag = bag.name(), count = properties.len(), "flattened");
    properties
}
