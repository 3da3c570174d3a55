//! Path lookup against the parent-linked tree.

use crate::path;

use super::{ConfigTree, NodeId, NodeKind};

impl ConfigTree {
    /// Resolve the node addressed by `node_path`, starting from `start`.
    ///
    /// Absolute paths first walk the parent chain to the root of `start`'s
    /// subtree and descend from there. Relative paths consume segments
    /// against the current node; the segment `..` ascends to the parent.
    /// Only `Object` members are addressable; lookup returns `None` as soon
    /// as any segment misses.
    #[must_use]
    pub fn node_at_path(&self, start: NodeId, node_path: &str) -> Option<NodeId> {
        let node_path = path::clean(node_path);
        let mut current = if path::is_absolute(node_path) {
            self.subtree_root(start)
        } else {
            start
        };
        if node_path == path::ROOT_PATH {
            return Some(current);
        }
        for segment in node_path.trim_start_matches('/').split('/') {
            current = match segment {
                "" => return None,
                ".." => self.parent(current)?,
                name => self.member(current, name)?,
            };
        }
        Some(current)
    }

    /// The root of the subtree containing `id` (the highest reachable
    /// ancestor, which is not necessarily the tree's designated root).
    #[must_use]
    pub fn subtree_root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// The canonical absolute path of a node, climbing parent edges and
    /// recording container labels (member names, or element indexes for
    /// array slots). A root is `/`.
    ///
    /// This is a diagnostic helper: if a parent edge is inconsistent with
    /// the parent's containers, the climb stops there.
    #[must_use]
    pub fn absolute_node_path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let label = match self.kind(parent) {
                NodeKind::Object(members) => members
                    .iter()
                    .find(|&(_, &child)| child == current)
                    .map(|(name, _)| name.clone()),
                NodeKind::Array(elements) | NodeKind::DerivedArray(elements) => elements
                    .iter()
                    .position(|&element| element == current)
                    .map(|index| index.to_string()),
                _ => None,
            };
            let Some(label) = label else { break };
            segments.push(label);
            current = parent;
        }
        if segments.is_empty() {
            return path::ROOT_PATH.to_owned();
        }
        let mut out = String::new();
        for segment in segments.iter().rev() {
            out.push('/');
            out.push_str(segment);
        }
        out
    }
}
