//! Indentation tree.
//!
//! A line indented deeper than the line above it becomes that line's child.
//! All children of one parent (and all top-level lines) must start at the
//! same column.

use crate::{Location, SourceLine, TextError};

/// A line and the lines nested under it. `line.text` is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub line: SourceLine,
    pub children: Vec<TreeNode>,
}

/// Top-level nodes of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentationTree {
    pub roots: Vec<TreeNode>,
}

/// A node whose children are still being collected.
struct Open {
    indent: usize,
    child_indent: Option<usize>,
    node: TreeNode,
}

impl IndentationTree {
    /// Nest `lines` by indentation. Lines must not be blank.
    pub fn parse<I>(lines: I) -> Result<Self, TextError>
    where
        I: IntoIterator<Item = SourceLine>,
    {
        let mut roots = Vec::new();
        let mut root_indent = None;
        let mut stack: Vec<Open> = Vec::new();

        for line in lines {
            let indent = measure_indent(&line)?;

            while let Some(open) = stack.pop() {
                if open.indent < indent {
                    stack.push(open);
                    break;
                }
                attach(&mut stack, &mut roots, open.node);
            }

            let expected = match stack.last_mut() {
                Some(parent) => &mut parent.child_indent,
                None => &mut root_indent,
            };
            match *expected {
                Some(column) if column != indent => {
                    return Err(TextError::Indentation {
                        location: line.location,
                        message: format!("expected column {}, found {}", column, indent),
                    });
                }
                Some(_) => {}
                None => *expected = Some(indent),
            }

            let text = line.text.trim().to_string();
            stack.push(Open {
                indent,
                child_indent: None,
                node: TreeNode {
                    line: SourceLine {
                        location: line.location,
                        text,
                    },
                    children: Vec::new(),
                },
            });
        }

        while let Some(open) = stack.pop() {
            attach(&mut stack, &mut roots, open.node);
        }

        Ok(Self { roots })
    }

    /// Total number of nodes in the tree.
    pub fn len(&self) -> usize {
        fn count(nodes: &[TreeNode]) -> usize {
            nodes.iter().map(|node| 1 + count(&node.children)).sum()
        }
        count(&self.roots)
    }

    /// True if the document had no lines.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

fn attach(stack: &mut [Open], roots: &mut Vec<TreeNode>, node: TreeNode) {
    match stack.last_mut() {
        Some(parent) => parent.node.children.push(node),
        None => roots.push(node),
    }
}

/// Width of the leading whitespace. Tabs and spaces count one column each
/// but may not be mixed on one line; any other whitespace is rejected.
fn measure_indent(line: &SourceLine) -> Result<usize, TextError> {
    let leading: Vec<char> = line
        .text
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();

    if leading.iter().any(|c| *c != ' ' && *c != '\t') {
        return Err(indentation(
            &line.location,
            "only spaces and tabs may indent a line",
        ));
    }
    if leading.contains(&' ') && leading.contains(&'\t') {
        return Err(indentation(&line.location, "tabs and spaces mixed"));
    }
    Ok(leading.len())
}

fn indentation(location: &Location, message: &str) -> TextError {
    TextError::Indentation {
        location: location.clone(),
        message: message.to_string(),
    }
}
