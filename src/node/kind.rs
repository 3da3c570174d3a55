//! The tagged node variant.

use indexmap::IndexMap;
use serde_json::Value;

use super::NodeId;

/// The kind of a configuration node, together with its per-kind payload.
///
/// `Reference`, `DerivedArray`, and `DerivedObject` only exist before
/// resolution; a fully resolved tree contains the first four kinds only.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The unit value.
    Null,
    /// An opaque scalar payload. The loader never inspects it beyond
    /// round-tripping; a `#`-decorated member stores its whole JSON value
    /// here, structure included.
    Value(Value),
    /// An ordered sequence of child nodes.
    Array(Vec<NodeId>),
    /// A name-to-child mapping iterated in insertion order.
    Object(IndexMap<String, NodeId>),
    /// An unresolved path to another node in the same tree.
    Reference(String),
    /// An array whose elements are resolved individually before the node is
    /// rewritten as a plain `Array`.
    DerivedArray(Vec<NodeId>),
    /// Prototype-style inheritance: one or more base paths merged
    /// left-to-right, then overridden by `overrides` (an Object or Null
    /// node).
    DerivedObject {
        /// Paths of the base objects, merged in order.
        bases: Vec<String>,
        /// The per-instance override node.
        overrides: NodeId,
    },
}

impl NodeKind {
    /// Human-readable kind label used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Value(_) => "Value",
            Self::Array(_) => "Array",
            Self::Object(_) => "Object",
            Self::Reference(_) => "NodeReference",
            Self::DerivedArray(_) => "DerivedArray",
            Self::DerivedObject { .. } => "DerivedObject",
        }
    }

    /// Returns true for `Object` nodes.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns true for `Null` nodes.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
