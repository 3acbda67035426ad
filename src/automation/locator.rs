use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::types::{ElementInfo, Node, Window};

/// Attribute a `find` query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Text,
    ContentDescription,
    ResourceId,
}

impl Criterion {
    fn field<'a>(&self, node: &'a Node) -> Option<&'a str> {
        match self {
            Self::Text => node.text.as_deref(),
            Self::ContentDescription => node.content_description.as_deref(),
            Self::ResourceId => node.resource_id.as_deref(),
        }
    }
}

/// Exact matches are case-sensitive equality; otherwise case-insensitive substring
fn matches(candidate: &str, value: &str, value_lower: &str, exact: bool) -> bool {
    if exact {
        candidate == value
    } else {
        candidate.to_lowercase().contains(value_lower)
    }
}

/// All nodes matching `criterion`, windows in the order given, pre-order within each.
/// An empty `value` matches nothing.
pub fn find(windows: &[Window], criterion: Criterion, value: &str, exact: bool) -> Vec<ElementInfo> {
    if value.is_empty() {
        return Vec::new();
    }

    let value_lower = value.to_lowercase();
    let mut found = Vec::new();

    for window in windows {
        walk(&window.tree, &mut |node| {
            if criterion
                .field(node)
                .is_some_and(|field| matches(field, value, &value_lower, exact))
            {
                found.push(ElementInfo::from_node(node, window.info.window_id));
            }
            true
        });
    }

    found
}

/// First node with `id`, searching windows in order
pub fn find_by_id(windows: &[Window], id: &str) -> Option<(Arc<Node>, i32)> {
    for window in windows {
        let mut hit = None;
        walk_arc(&window.tree, &mut |node| {
            if node.id == id {
                hit = Some(Arc::clone(node));
                return false;
            }
            true
        });
        if let Some(node) = hit {
            return Some((node, window.info.window_id));
        }
    }
    None
}

/// Depth-first pre-order; the visitor returns false to stop
fn walk(root: &Node, visit: &mut impl FnMut(&Node) -> bool) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !visit(node) {
            return;
        }
        stack.extend(node.children.iter().rev().map(|c| c.as_ref()));
    }
}

fn walk_arc(root: &Arc<Node>, visit: &mut impl FnMut(&Arc<Node>) -> bool) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !visit(node) {
            return;
        }
        stack.extend(node.children.iter().rev());
    }
}
