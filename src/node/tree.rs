//! Arena storage and mutation of the node tree.

use indexmap::IndexMap;
use serde_json::Value;

use super::NodeKind;

/// Handle of a node inside a [`ConfigTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct NodeEntry {
    kind: NodeKind,
    parent: Option<NodeId>,
}

/// An arena-backed configuration tree with a designated root.
///
/// Nodes replaced during resolution leave unreachable arena entries behind;
/// those are garbage scoped to one load and are dropped with the tree.
#[derive(Debug)]
pub struct ConfigTree {
    nodes: Vec<NodeEntry>,
    root: NodeId,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigTree {
    /// Create a tree whose root is an empty Object.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.alloc(NodeKind::Object(IndexMap::new()));
        tree
    }

    /// The root node of this tree.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.nodes[id.index()].parent = None;
        self.root = id;
    }

    /// Allocate a detached node of the given kind.
    ///
    /// Any child ids inside `kind` must already belong to this tree.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or_else(|_| {
            panic!("configuration tree exceeds {} nodes", u32::MAX)
        }));
        self.nodes.push(NodeEntry { kind, parent: None });
        id
    }

    /// The kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    /// The parent of a node, or `None` for roots.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Returns true when the node has no parent.
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        self.parent(id).is_none()
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.index()].parent = parent;
    }

    /// The scalar payload of a `Value` node.
    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<&Value> {
        match self.kind(id) {
            NodeKind::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The members of an `Object` node, in insertion order.
    #[must_use]
    pub fn members(&self, id: NodeId) -> Option<&IndexMap<String, NodeId>> {
        match self.kind(id) {
            NodeKind::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Member names of an `Object` node in insertion order; empty for other
    /// kinds.
    pub fn member_names(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.members(id)
            .into_iter()
            .flat_map(IndexMap::keys)
            .map(String::as_str)
    }

    /// Look up an `Object` member by name.
    #[must_use]
    pub fn member(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.members(id)?.get(name).copied()
    }

    /// The elements of an `Array` or `DerivedArray` node.
    #[must_use]
    pub fn elements(&self, id: NodeId) -> Option<&[NodeId]> {
        match self.kind(id) {
            NodeKind::Array(elements) | NodeKind::DerivedArray(elements) => Some(elements),
            _ => None,
        }
    }

    /// Set a member on an `Object` node, taking ownership of `child` and
    /// re-homing its parent edge.
    ///
    /// Setting an existing name overwrites the value in place and preserves
    /// the member's position; a new name appends.
    ///
    /// # Panics
    ///
    /// Panics when `object` is not an `Object` node.
    pub fn set_member(&mut self, object: NodeId, name: &str, child: NodeId) {
        self.nodes[child.index()].parent = Some(object);
        match &mut self.nodes[object.index()].kind {
            NodeKind::Object(members) => {
                members.insert(name.to_owned(), child);
            }
            other => panic!("set_member on a {} node", other.type_name()),
        }
    }

    /// Append an element to an `Array` or `DerivedArray` node, taking
    /// ownership of `child` and re-homing its parent edge.
    ///
    /// # Panics
    ///
    /// Panics when `array` is not an `Array` or `DerivedArray` node.
    pub fn push_element(&mut self, array: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(array);
        match &mut self.nodes[array.index()].kind {
            NodeKind::Array(elements) | NodeKind::DerivedArray(elements) => {
                elements.push(child);
            }
            other => panic!("push_element on a {} node", other.type_name()),
        }
    }

    /// Deep-copy the subtree rooted at `src` into this tree.
    ///
    /// The copy's root is detached (no parent); descendants' parents are the
    /// copied ancestors. Derived-object override nodes stay detached, as
    /// they are in the source.
    pub fn clone_subtree(&mut self, src: NodeId) -> NodeId {
        self.clone_subtree_under(src, None)
    }

    pub(crate) fn clone_subtree_under(&mut self, src: NodeId, parent: Option<NodeId>) -> NodeId {
        let kind = self.kind(src).clone();
        let id = self.alloc(NodeKind::Null);
        self.nodes[id.index()].parent = parent;
        let cloned_kind = match kind {
            NodeKind::Null => NodeKind::Null,
            NodeKind::Value(value) => NodeKind::Value(value),
            NodeKind::Reference(path) => NodeKind::Reference(path),
            NodeKind::Array(elements) => NodeKind::Array(
                elements
                    .into_iter()
                    .map(|e| self.clone_subtree_under(e, Some(id)))
                    .collect(),
            ),
            NodeKind::DerivedArray(elements) => NodeKind::DerivedArray(
                elements
                    .into_iter()
                    .map(|e| self.clone_subtree_under(e, Some(id)))
                    .collect(),
            ),
            NodeKind::Object(members) => NodeKind::Object(
                members
                    .into_iter()
                    .map(|(name, child)| (name, self.clone_subtree_under(child, Some(id))))
                    .collect(),
            ),
            NodeKind::DerivedObject { bases, overrides } => NodeKind::DerivedObject {
                bases,
                overrides: self.clone_subtree_under(overrides, None),
            },
        };
        self.nodes[id.index()].kind = cloned_kind;
        id
    }

    /// Deep-copy a subtree from another tree into this one, returning the
    /// detached copy's root.
    pub fn import(&mut self, source: &ConfigTree, src: NodeId) -> NodeId {
        self.import_under(source, src, None)
    }

    fn import_under(&mut self, source: &ConfigTree, src: NodeId, parent: Option<NodeId>) -> NodeId {
        let id = self.alloc(NodeKind::Null);
        self.nodes[id.index()].parent = parent;
        let kind = match source.kind(src) {
            NodeKind::Null => NodeKind::Null,
            NodeKind::Value(value) => NodeKind::Value(value.clone()),
            NodeKind::Reference(path) => NodeKind::Reference(path.clone()),
            NodeKind::Array(elements) => NodeKind::Array(
                elements
                    .clone()
                    .into_iter()
                    .map(|e| self.import_under(source, e, Some(id)))
                    .collect(),
            ),
            NodeKind::DerivedArray(elements) => NodeKind::DerivedArray(
                elements
                    .clone()
                    .into_iter()
                    .map(|e| self.import_under(source, e, Some(id)))
                    .collect(),
            ),
            NodeKind::Object(members) => NodeKind::Object(
                members
                    .clone()
                    .into_iter()
                    .map(|(name, child)| (name, self.import_under(source, child, Some(id))))
                    .collect(),
            ),
            NodeKind::DerivedObject { bases, overrides } => NodeKind::DerivedObject {
                bases: bases.clone(),
                overrides: self.import_under(source, *overrides, None),
            },
        };
        self.nodes[id.index()].kind = kind;
        id
    }

    /// Move `src`'s kind into `dst`, re-homing `src`'s direct children to
    /// `dst`.
    ///
    /// This is the in-place replacement primitive of the resolver: `dst`
    /// keeps its id, parent edge, and position in its parent container,
    /// while `src` becomes an orphaned `Null` entry.
    pub(crate) fn replace_kind(&mut self, dst: NodeId, src: NodeId) {
        let kind = std::mem::replace(&mut self.nodes[src.index()].kind, NodeKind::Null);
        match &kind {
            NodeKind::Array(elements) | NodeKind::DerivedArray(elements) => {
                for &element in elements {
                    self.nodes[element.index()].parent = Some(dst);
                }
            }
            NodeKind::Object(members) => {
                let children: Vec<NodeId> = members.values().copied().collect();
                for child in children {
                    self.nodes[child.index()].parent = Some(dst);
                }
            }
            // Override nodes stay detached; scalar kinds have no children.
            NodeKind::Null
            | NodeKind::Value(_)
            | NodeKind::Reference(_)
            | NodeKind::DerivedObject { .. } => {}
        }
        self.nodes[dst.index()].kind = kind;
    }
}
