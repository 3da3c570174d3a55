//! Shared fixtures for node tree tests along with focused submodules.

use serde_json::json;

use super::{ConfigTree, NodeId, NodeKind};


/// Build `{"a": 1, "b": {"c": "x"}}` and return the tree with the ids of
/// `b` and `c`.
pub(super) fn sample_tree() -> (ConfigTree, NodeId, NodeId) {
    let mut tree = ConfigTree::new();
    let root = tree.root();
    let a = tree.alloc(NodeKind::Value(json!(1)));
    tree.set_member(root, "a", a);
    let b = tree.alloc(NodeKind::Object(indexmap::IndexMap::new()));
    tree.set_member(root, "b", b);
    let c = tree.alloc(NodeKind::Value(json!("x")));
    tree.set_member(b, "c", c);
    (tree, b, c)
}
