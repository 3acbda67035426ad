use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::{Node, NodeId, Snapshot};

/// A node resolved by id, with the window it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    pub node: Arc<Node>,
    pub window_id: i32,
    pub package_name: Option<String>,
}

/// Immutable id index for one snapshot
#[derive(Debug, Default)]
pub struct CacheIndex {
    pub generation: u64,
    pub snapshot_id: Option<String>,
    nodes: HashMap<NodeId, ResolvedNode>,
}

impl CacheIndex {
    fn from_snapshot(snapshot: &Snapshot, generation: u64) -> Self {
        let mut nodes = HashMap::with_capacity(snapshot.node_count());
        let mut collisions = 0usize;

        for window in &snapshot.windows {
            let mut stack = vec![Arc::clone(&window.tree)];
            while let Some(node) = stack.pop() {
                // Reverse push keeps pre-order, so the first occurrence wins on collisions
                stack.extend(node.children.iter().rev().cloned());
                if nodes.contains_key(&node.id) {
                    collisions += 1;
                    continue;
                }
                nodes.insert(
                    node.id.clone(),
                    ResolvedNode {
                        window_id: window.info.window_id,
                        package_name: window.info.package_name.clone(),
                        node,
                    },
                );
            }
        }

        if collisions > 0 {
            tracing::debug!(
                "Snapshot {} has {} id collisions; keeping first occurrence",
                snapshot.snapshot_id,
                collisions
            );
        }

        Self {
            generation,
            snapshot_id: Some(snapshot.snapshot_id.clone()),
            nodes,
        }
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Id lookup for the most recent snapshot.
///
/// Replaced wholesale on every `populate`; read-only otherwise. Readers clone
/// the current `Arc<CacheIndex>` and never observe a partially built map.
#[derive(Debug, Default)]
pub struct NodeCache {
    current: RwLock<Arc<CacheIndex>>,
    generation: AtomicU64,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `snapshot` and publish it, replacing the previous index.
    ///
    /// The index is built before the write lock is taken; the lock only covers
    /// the pointer swap. A populate that finishes after a newer one is dropped.
    pub async fn populate(&self, snapshot: &Snapshot) -> Arc<CacheIndex> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let index = Arc::new(CacheIndex::from_snapshot(snapshot, generation));

        let mut current = self.current.write().await;
        if current.generation < generation {
            *current = Arc::clone(&index);
        }
        drop(current);

        tracing::debug!(
            "Node cache generation {} holds {} nodes",
            index.generation,
            index.len()
        );
        index
    }

    pub async fn lookup(&self, id: &str) -> Option<ResolvedNode> {
        self.current().await.get(id).cloned()
    }

    /// The currently published index
    pub async fn current(&self) -> Arc<CacheIndex> {
        Arc::clone(&*self.current.read().await)
    }

    pub async fn generation(&self) -> u64 {
        self.current.read().await.generation
    }
}
