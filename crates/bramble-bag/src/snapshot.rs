//! Serializable view of an effective tree.

use serde::{Deserialize, Serialize};

use crate::PropertyBag;

/// A bag and its effective descendants, frozen at capture time.
///
/// Children are the effective children in resolution order, so inherited
/// entries appear alongside local ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Bag name.
    pub name: String,

    /// Bag value (empty for containers).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,

    /// Effective children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Snapshot>,
}

impl Snapshot {
    /// Capture the effective tree below `bag`.
    pub fn capture(bag: &PropertyBag) -> Self {
        Self {
            name: bag.name().to_string(),
            value: bag.value().to_string(),
            children: bag.iter().map(|child| Self::capture(child)).collect(),
        }
    }

    /// Number of nodes below this one.
    pub fn descendants(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendants())
            .sum()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// One line per descendant that has a value or no children, as
    /// `dotted.path = value`.
    pub fn to_human(&self) -> String {
        let mut lines = Vec::new();
        for child in &self.children {
            child.push_lines(&child.name, &mut lines);
        }
        lines.join("\n")
    }

    fn push_lines(&self, path: &str, lines: &mut Vec<String>) {
        if !self.value.is_empty() {
            lines.push(format!("{} = {}", path, self.value));
        } else if self.children.is_empty() {
            lines.push(path.to_string());
        }

        for child in &self.children {
            child.push_lines(&format!("{}.{}", path, child.name), lines);
        }
    }
}
