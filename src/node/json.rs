//! Projection of resolved subtrees back to JSON values.

use serde_json::{Map, Value};

use super::{ConfigTree, NodeId, NodeKind};

impl ConfigTree {
    /// Project the subtree rooted at `id` to a `serde_json::Value`.
    ///
    /// Returns `None` if the subtree still contains reference or derived
    /// kinds. Object member order is preserved.
    #[must_use]
    pub fn to_json(&self, id: NodeId) -> Option<Value> {
        match self.kind(id) {
            NodeKind::Null => Some(Value::Null),
            NodeKind::Value(value) => Some(value.clone()),
            NodeKind::Array(elements) => elements
                .iter()
                .map(|&element| self.to_json(element))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            NodeKind::Object(members) => {
                let mut map = Map::new();
                for (name, &child) in members {
                    map.insert(name.clone(), self.to_json(child)?);
                }
                Some(Value::Object(map))
            }
            NodeKind::Reference(_) | NodeKind::DerivedArray(_) | NodeKind::DerivedObject { .. } => {
                None
            }
        }
    }
}
