//! The property bag node.

use std::str::FromStr;
use std::sync::Arc;

use crate::resolve::{self, Flattened, IntoIter};
use crate::{BagError, Snapshot};

/// A named value with uniquely named children and zero or more bases.
///
/// Name and value never change after construction. Children can only be
/// appended. Bases and children are held as `Arc`, so a bag that has been
/// attached anywhere is frozen; a base graph can therefore never contain a
/// cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyBag {
    name: String,
    value: String,
    bases: Vec<Arc<PropertyBag>>,
    /// Direct children in insertion order, unique by name.
    children: Vec<Arc<PropertyBag>>,
}

impl PropertyBag {
    /// Create a bag with an empty value and no bases.
    pub fn new(name: impl Into<String>) -> Result<Self, BagError> {
        Self::with_value_and_bases(name, String::new(), Vec::new())
    }

    /// Create a bag with a value and no bases.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Result<Self, BagError> {
        Self::with_value_and_bases(name, value, Vec::new())
    }

    /// Create a bag with an empty value that inherits from `bases`.
    pub fn with_bases<I>(name: impl Into<String>, bases: I) -> Result<Self, BagError>
    where
        I: IntoIterator<Item = Arc<PropertyBag>>,
    {
        Self::with_value_and_bases(name, String::new(), bases)
    }

    /// Create a bag with a value that inherits from `bases`.
    ///
    /// Bases are consulted in declaration order when flattening, so a later
    /// base overrides an earlier one. An empty `bases` means no inheritance.
    pub fn with_value_and_bases<I>(
        name: impl Into<String>,
        value: impl Into<String>,
        bases: I,
    ) -> Result<Self, BagError>
    where
        I: IntoIterator<Item = Arc<PropertyBag>>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(BagError::InvalidArgument("name"));
        }

        Ok(Self {
            name,
            value: value.into(),
            bases: bases.into_iter().collect(),
            children: Vec::new(),
        })
    }

    /// The bag's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bag's own value; empty for pure containers.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Bases in declaration order.
    pub fn bases(&self) -> &[Arc<PropertyBag>] {
        &self.bases
    }

    /// Direct children in insertion order, without anything inherited.
    pub fn children(&self) -> &[Arc<PropertyBag>] {
        &self.children
    }

    /// The direct child named `name`, ignoring bases.
    pub fn child(&self, name: &str) -> Option<&Arc<PropertyBag>> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Append a direct child.
    ///
    /// Fails with [`BagError::DuplicateKey`] if a direct child with the same
    /// name already exists. Names inherited from bases do not collide.
    pub fn append(&mut self, child: impl Into<Arc<PropertyBag>>) -> Result<(), BagError> {
        let child = child.into();
        if self.child(&child.name).is_some() {
            return Err(BagError::DuplicateKey {
                parent: self.name.clone(),
                name: child.name.clone(),
            });
        }

        self.children.push(child);
        Ok(())
    }

    /// Look up the effective child named `name`.
    ///
    /// Direct children are checked first, then the bases from last to first;
    /// the first base whose effective set contains `name` answers. This never
    /// builds this bag's own effective set, but always agrees with it.
    pub fn get(&self, name: &str) -> Option<&Arc<PropertyBag>> {
        if let Some(child) = self.child(name) {
            return Some(child);
        }

        self.bases
            .iter()
            .rev()
            .find(|base| base.contains(name))
            .and_then(|base| base.get(name))
    }

    /// Look up a dotted path such as `"monster.attack.damage"`.
    ///
    /// Each segment is resolved with [`get`](Self::get) on the previous one,
    /// so inherited children are visible at every level.
    pub fn get_path(&self, path: &str) -> Option<&Arc<PropertyBag>> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// True if the effective child set contains `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.flatten().contains(name)
    }

    /// Size of the effective child set.
    pub fn len(&self) -> usize {
        self.flatten().len()
    }

    /// True if the effective child set is empty.
    pub fn is_empty(&self) -> bool {
        self.flatten().is_empty()
    }

    /// Compute the effective child set.
    pub fn flatten(&self) -> Flattened<'_> {
        resolve::flatten(self)
    }

    /// Iterate the effective children, recomputed on every call.
    pub fn iter(&self) -> IntoIter<'_> {
        self.flatten().into_iter()
    }

    /// Parse the value as a base-10 `i32`.
    pub fn as_int(&self) -> Result<i32, BagError> {
        self.parse::<i32>().map_err(|source| BagError::ParseInt {
            name: self.name.clone(),
            value: self.value.clone(),
            source,
        })
    }

    /// Parse the value, ignoring surrounding whitespace.
    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        self.value.trim().parse()
    }

    /// The value of child `name`, or `default` if it is absent.
    pub fn get_str_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.get(name) {
            Some(found) => found.value(),
            None => default,
        }
    }

    /// The integer value of child `name`, or `default` if it is absent.
    ///
    /// A present but non-numeric value is an error, not a default.
    pub fn get_int_or(&self, name: &str, default: i32) -> Result<i32, BagError> {
        match self.get(name) {
            Some(found) => found.as_int(),
            None => Ok(default),
        }
    }

    /// The value of child `name` passed through `converter`, or `default`.
    pub fn get_with<T, F>(&self, name: &str, converter: F, default: T) -> T
    where
        F: FnOnce(&str) -> T,
    {
        match self.get(name) {
            Some(found) => converter(found.value()),
            None => default,
        }
    }

    /// Capture the effective tree below this bag.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}

impl<'a> IntoIterator for &'a PropertyBag {
    type Item = &'a Arc<PropertyBag>;
    type IntoIter = IntoIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, value: &str) -> PropertyBag {
        PropertyBag::with_value(name, value).unwrap()
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_new_rejects_empty_name() {
        assert_eq!(PropertyBag::new(""), Err(BagError::InvalidArgument("name")));
        assert_eq!(
            PropertyBag::with_value("", "bar"),
            Err(BagError::InvalidArgument("name"))
        );
        assert_eq!(
            PropertyBag::with_bases("", [Arc::new(PropertyBag::new("base").unwrap())]),
            Err(BagError::InvalidArgument("name"))
        );
        assert_eq!(
            PropertyBag::with_value_and_bases("", "bar", Vec::new()),
            Err(BagError::InvalidArgument("name"))
        );
    }

    #[test]
    fn test_with_value_and_bases() {
        let base = Arc::new(PropertyBag::new("base").unwrap());
        let prop = PropertyBag::with_value_and_bases("foo", "bar", [base]).unwrap();

        assert_eq!(prop.name(), "foo");
        assert_eq!(prop.value(), "bar");
        assert_eq!(prop.bases().len(), 1);
        assert_eq!(prop.len(), 0);
    }

    #[test]
    fn test_with_bases_accepts_no_bases() {
        let prop = PropertyBag::with_bases("foo", None::<Arc<PropertyBag>>).unwrap();
        assert!(prop.bases().is_empty());

        let prop = PropertyBag::with_bases("foo", Vec::new()).unwrap();
        assert_eq!(prop.value(), "");
        assert!(prop.is_empty());
    }

    #[test]
    fn test_new_has_empty_value() {
        let prop = PropertyBag::new("foo").unwrap();
        assert_eq!(prop.name(), "foo");
        assert_eq!(prop.value(), "");
        assert_eq!(prop.len(), 0);
    }

    // =========================================================================
    // Children
    // =========================================================================

    #[test]
    fn test_append() {
        let mut prop = PropertyBag::with_value("foo", "bar").unwrap();
        assert_eq!(prop.len(), 0);

        prop.append(leaf("item", "value")).unwrap();

        assert_eq!(prop.len(), 1);
        assert_eq!(prop.get("item").unwrap().name(), "item");
        assert_eq!(prop.get("item").unwrap().value(), "value");
    }

    #[test]
    fn test_append_rejects_duplicate_direct_child() {
        let mut prop = PropertyBag::new("foo").unwrap();
        prop.append(leaf("item", "1")).unwrap();

        let err = prop.append(leaf("item", "2")).unwrap_err();
        assert_eq!(
            err,
            BagError::DuplicateKey {
                parent: "foo".to_string(),
                name: "item".to_string(),
            }
        );
        assert_eq!(prop.get("item").unwrap().value(), "1");
    }

    #[test]
    fn test_append_may_shadow_inherited_name() {
        let mut base = PropertyBag::new("base").unwrap();
        base.append(leaf("item", "base")).unwrap();
        let mut prop = PropertyBag::with_bases("foo", [Arc::new(base)]).unwrap();

        assert!(prop.append(leaf("item", "local")).is_ok());
        assert_eq!(prop.get("item").unwrap().value(), "local");
    }

    #[test]
    fn test_get_returns_same_instance() {
        let mut prop = PropertyBag::new("foo").unwrap();
        let found = Arc::new(leaf("found", "value"));
        prop.append(Arc::clone(&found)).unwrap();

        assert!(Arc::ptr_eq(prop.get("found").unwrap(), &found));
        assert!(prop.get("not found").is_none());
    }

    // =========================================================================
    // Inheritance
    // =========================================================================

    #[test]
    fn test_inherit_values_from_bases() {
        let mut base1 = PropertyBag::new("base1").unwrap();
        base1.append(leaf("from base 1", "value 1")).unwrap();
        let mut base2 = PropertyBag::new("base2").unwrap();
        base2.append(leaf("from base 2", "value 2")).unwrap();

        let mut derived =
            PropertyBag::with_bases("derived", [Arc::new(base1), Arc::new(base2)]).unwrap();
        derived.append(leaf("from derived", "value")).unwrap();

        assert_eq!(derived.len(), 3);
        assert_eq!(derived.get("from base 1").unwrap().value(), "value 1");
        assert_eq!(derived.get("from base 2").unwrap().value(), "value 2");
        assert_eq!(derived.get("from derived").unwrap().value(), "value");
    }

    #[test]
    fn test_override_across_bases() {
        let mut base1 = PropertyBag::new("base1").unwrap();
        base1.append(leaf("from base", "value 1")).unwrap();
        let mut base2 = PropertyBag::new("base2").unwrap();
        base2.append(leaf("from base", "value 2")).unwrap();

        let derived =
            PropertyBag::with_bases("derived", [Arc::new(base1), Arc::new(base2)]).unwrap();

        assert_eq!(derived.len(), 1);
        assert_eq!(derived.get("from base").unwrap().value(), "value 2");
    }

    #[test]
    fn test_override_value_from_base() {
        let mut base = PropertyBag::new("base").unwrap();
        base.append(leaf("from base", "value")).unwrap();
        base.append(leaf("override", "base value")).unwrap();

        let mut derived = PropertyBag::with_bases("derived", [Arc::new(base)]).unwrap();
        derived.append(leaf("from derived", "value")).unwrap();
        derived.append(leaf("override", "derived value")).unwrap();

        assert_eq!(derived.len(), 3);
        assert_eq!(derived.get("from base").unwrap().value(), "value");
        assert_eq!(derived.get("override").unwrap().value(), "derived value");
    }

    #[test]
    fn test_transitive_inheritance() {
        let mut grandparent = PropertyBag::new("grandparent").unwrap();
        grandparent.append(leaf("g", "1")).unwrap();
        let mut parent = PropertyBag::with_bases("parent", [Arc::new(grandparent)]).unwrap();
        parent.append(leaf("p", "2")).unwrap();
        let mut child = PropertyBag::with_bases("child", [Arc::new(parent)]).unwrap();
        child.append(leaf("c", "3")).unwrap();

        assert_eq!(child.len(), 3);
        assert_eq!(child.get("g").unwrap().value(), "1");
        assert_eq!(child.get("p").unwrap().value(), "2");
        assert_eq!(child.get("c").unwrap().value(), "3");
    }

    #[test]
    fn test_iteration_is_repeatable() {
        let mut base = PropertyBag::new("base").unwrap();
        base.append(leaf("a", "1")).unwrap();
        base.append(leaf("b", "1")).unwrap();
        let mut derived = PropertyBag::with_bases("derived", [Arc::new(base)]).unwrap();
        derived.append(leaf("a", "2")).unwrap();

        let first: Vec<_> = derived.iter().map(|c| (c.name(), c.value())).collect();
        let second: Vec<_> = (&derived).into_iter().map(|c| (c.name(), c.value())).collect();
        assert_eq!(first, vec![("b", "1"), ("a", "2")]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_iteration_sees_later_appends() {
        let mut prop = PropertyBag::new("foo").unwrap();
        assert_eq!(prop.iter().count(), 0);
        prop.append(leaf("a", "1")).unwrap();
        assert_eq!(prop.iter().count(), 1);
    }

    #[test]
    fn test_get_path() {
        let mut attack = PropertyBag::new("attack").unwrap();
        attack.append(leaf("damage", "3")).unwrap();
        let mut base = PropertyBag::new("base").unwrap();
        base.append(attack).unwrap();
        let goblin = PropertyBag::with_bases("goblin", [Arc::new(base)]).unwrap();
        let mut root = PropertyBag::new("root").unwrap();
        root.append(goblin).unwrap();

        assert_eq!(root.get_path("goblin.attack.damage").unwrap().value(), "3");
        assert!(root.get_path("goblin.attack.range").is_none());
        assert!(root.get_path("goblin..damage").is_none());
        assert!(root.get_path("").is_none());
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[test]
    fn test_as_int() {
        assert_eq!(leaf("n", "123").as_int(), Ok(123));
        assert_eq!(leaf("n", " -7 ").as_int(), Ok(-7));
        assert!(matches!(
            leaf("n", "12x").as_int(),
            Err(BagError::ParseInt { ref name, ref value, .. }) if name == "n" && value == "12x"
        ));
        assert!(leaf("n", "").as_int().is_err());
    }

    #[test]
    fn test_parse_generic() {
        assert_eq!(leaf("n", "2.5").parse::<f64>(), Ok(2.5));
        assert_eq!(leaf("n", "true").parse::<bool>(), Ok(true));
    }

    #[test]
    fn test_get_str_or() {
        let mut prop = PropertyBag::with_value("foo", "bar").unwrap();
        prop.append(leaf("name", "value")).unwrap();

        assert_eq!(prop.get_str_or("name", "default"), "value");
        assert_eq!(prop.get_str_or("not name", "default"), "default");
    }

    #[test]
    fn test_get_int_or() {
        let mut prop = PropertyBag::with_value("foo", "bar").unwrap();
        prop.append(leaf("name", "123")).unwrap();
        prop.append(leaf("word", "abc")).unwrap();

        assert_eq!(prop.get_int_or("name", 666), Ok(123));
        assert_eq!(prop.get_int_or("not name", 666), Ok(666));
        assert!(matches!(
            prop.get_int_or("word", 666),
            Err(BagError::ParseInt { .. })
        ));
    }

    #[test]
    fn test_get_with() {
        let mut prop = PropertyBag::with_value("foo", "bar").unwrap();
        prop.append(leaf("name", "value")).unwrap();

        assert_eq!(
            prop.get_with("name", |v| format!("{} (added)", v), "default".to_string()),
            "value (added)"
        );
        assert_eq!(
            prop.get_with("not name", |v| format!("{} (added)", v), "default".to_string()),
            "default"
        );
    }
}
