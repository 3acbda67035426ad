//! Snapshot builder
//!
//! Walks each platform window's native tree exactly once and materializes an
//! immutable [`Node`] tree with deterministic identifiers. Platform handles
//! never escape this module: every child handle is dropped (released) as soon
//! as its subtree has been converted.

use chrono::Utc;
use std::sync::Arc;

use super::platform::{NativeNode, PlatformWindow};
use super::types::{Node, NodeAttributes, NodeId, ScreenInfo, Snapshot, Window};

/// 32-bit polynomial string hash (`h = h * 31 + unit`) over UTF-16 code units.
///
/// Implemented explicitly so ids stay identical across processes and with any
/// other implementation of the same algorithm.
pub fn string_hash(key: &str) -> u32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32)) as u32
}

/// Composite key for a node: `resourceId|className|L,T,R,B|depth|sibling|parentId`
pub fn stable_key(attrs: &NodeAttributes, depth: usize, sibling_index: usize, parent_id: &str) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}",
        attrs.resource_id.as_deref().unwrap_or(""),
        attrs.class_name.as_deref().unwrap_or(""),
        attrs.bounds.to_compact(),
        depth,
        sibling_index,
        parent_id
    )
}

/// `node_<lowercase hex>` id for a node at the given tree position
pub fn stable_id(attrs: &NodeAttributes, depth: usize, sibling_index: usize, parent_id: &str) -> NodeId {
    format!(
        "node_{:x}",
        string_hash(&stable_key(attrs, depth, sibling_index, parent_id))
    )
}

/// Convert one native subtree. The caller keeps ownership of `handle`.
pub fn build_tree(handle: &dyn NativeNode, depth: usize, sibling_index: usize, parent_id: &str) -> Arc<Node> {
    let attrs = handle.attributes();
    let id = stable_id(&attrs, depth, sibling_index, parent_id);

    let count = handle.child_count();
    let mut children = Vec::with_capacity(count);
    for index in 0..count {
        // Unavailable slots are skipped; later siblings keep their raw index
        let Some(child) = handle.child(index) else {
            continue;
        };
        children.push(build_tree(child.as_ref(), depth + 1, index, &id));
        drop(child);
    }

    Arc::new(Node::from_attributes(id, attrs, children))
}

/// Build a snapshot from the adapter's windows.
///
/// Windows without a root are skipped here; reporting them is the caller's job.
/// Root handles are borrowed, never released.
pub fn build_snapshot(windows: &[PlatformWindow], screen: ScreenInfo) -> Snapshot {
    let windows = windows
        .iter()
        .filter_map(|window| {
            let root = window.root.as_deref()?;
            Some(Window {
                info: window.info.clone(),
                tree: build_tree(root, 0, 0, ""),
            })
        })
        .collect::<Vec<_>>();

    let snapshot = Snapshot {
        snapshot_id: uuid::Uuid::new_v4().to_string(),
        captured_at: Utc::now(),
        windows,
        screen,
    };

    tracing::debug!(
        "Built snapshot {}: {} windows, {} nodes",
        snapshot.snapshot_id,
        snapshot.windows.len(),
        snapshot.node_count()
    );

    snapshot
}
