//! Turn an indentation tree into property bags.
//!
//! Each node line is a declaration:
//!
//! ```text
//! name
//! name = value
//! name :: Base1, Base2
//! name :: Base1, Base2 = value
//! ```
//!
//! Base references resolve against nodes that are already complete: earlier
//! siblings first, then earlier siblings of each enclosing node, outward.
//! A node can never name itself or one of its ancestors, so the resulting
//! base graph is acyclic. A dotted reference (`monsters.orc`) resolves its
//! first segment that way and the rest through effective lookup.

use std::sync::Arc;

use bramble_bag::PropertyBag;

use crate::{IndentationTree, TextError, TreeNode};

const INCLUDE: &str = "#include";

/// A single parsed declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub name: &'a str,
    pub bases: Vec<&'a str>,
    pub value: Option<&'a str>,
}

/// Parse one trimmed declaration line.
pub fn parse_declaration(text: &str) -> Result<Declaration<'_>, String> {
    if text.starts_with(INCLUDE) {
        return Err("include directives must be expanded by a file loader".to_string());
    }

    let (head, value) = match text.split_once('=') {
        Some((head, value)) => (head, Some(value.trim())),
        None => (text, None),
    };

    let (name, bases) = match head.split_once("::") {
        Some((name, bases)) => {
            let bases: Vec<&str> = bases.split(',').map(str::trim).collect();
            if bases.iter().any(|base| base.is_empty()) {
                return Err("empty base name".to_string());
            }
            (name.trim(), bases)
        }
        None => (head.trim(), Vec::new()),
    };

    if name.is_empty() {
        return Err("missing name".to_string());
    }

    Ok(Declaration { name, bases, value })
}

/// Build a bag named `root_name` whose children are the tree's top-level
/// nodes.
pub fn build(tree: &IndentationTree, root_name: &str) -> Result<PropertyBag, TextError> {
    let mut root = PropertyBag::new(root_name).map_err(TextError::InvalidRoot)?;
    append_nodes(&mut root, &tree.roots, None)?;

    tracing::debug!(root = root_name, nodes = tree.len(), "built property tree");
    Ok(root)
}

/// Completed nodes visible to a declaration, innermost level first.
struct Scope<'a> {
    level: &'a PropertyBag,
    outer: Option<&'a Scope<'a>>,
}

impl Scope<'_> {
    fn resolve(&self, reference: &str) -> Option<Arc<PropertyBag>> {
        let mut segments = reference.split('.');
        let first = segments.next()?;

        let mut scope = Some(self);
        let mut found = None;
        while let Some(current) = scope {
            if let Some(bag) = current.level.get(first) {
                found = Some(bag);
                break;
            }
            scope = current.outer;
        }

        let mut found = found?;
        for segment in segments {
            found = found.get(segment)?;
        }
        Some(Arc::clone(found))
    }
}

fn append_nodes(
    parent: &mut PropertyBag,
    nodes: &[TreeNode],
    outer: Option<&Scope<'_>>,
) -> Result<(), TextError> {
    for node in nodes {
        let child = {
            let scope = Scope {
                level: &*parent,
                outer,
            };
            build_node(node, &scope)?
        };

        parent.append(child).map_err(|source| TextError::Bag {
            location: node.line.location.clone(),
            source,
        })?;
    }
    Ok(())
}

fn build_node(node: &TreeNode, scope: &Scope<'_>) -> Result<PropertyBag, TextError> {
    let location = &node.line.location;
    let declaration = parse_declaration(&node.line.text).map_err(|message| TextError::Syntax {
        location: location.clone(),
        message,
    })?;

    let mut bases = Vec::with_capacity(declaration.bases.len());
    for reference in &declaration.bases {
        let base = scope
            .resolve(reference)
            .ok_or_else(|| TextError::UnknownBase {
                location: location.clone(),
                base: reference.to_string(),
            })?;
        tracing::trace!(name = declaration.name, base = *reference, "resolved base");
        bases.push(base);
    }

    let mut bag = PropertyBag::with_value_and_bases(
        declaration.name,
        declaration.value.unwrap_or_default(),
        bases,
    )
    .map_err(|source| TextError::Bag {
        location: location.clone(),
        source,
    })?;

    append_nodes(&mut bag, &node.children, Some(scope))?;
    Ok(bag)
}
