//! Fixed-point resolution of references and derived nodes.
//!
//! Resolution runs the tree through repeated passes. Each pass expands what
//! it can: references whose targets exist are replaced in place by clones of
//! those targets, derived arrays whose elements are all resolved become
//! plain arrays, and derived objects whose bases are available collapse to
//! merged objects. Forward references simply stay unresolved until a later
//! pass; a pass that ends with everything expanded terminates the loop, and
//! a configurable cycle cap turns non-convergence (reference cycles) into an
//! error.

use std::num::NonZeroU32;

use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::merge::apply_object;
use crate::node::{ConfigTree, NodeId, NodeKind};

/// Cycle cap applied when the caller does not configure one.
pub const DEFAULT_MAX_CYCLES: NonZeroU32 = match NonZeroU32::new(100) {
    Some(cycles) => cycles,
    None => unreachable!(),
};

/// Outcome of one resolution pass over a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// The subtree contains only plain kinds.
    Resolved,
    /// At least one reference or derived kind remains; another pass may
    /// make progress.
    Unresolved,
}

/// Resolve the tree to a fixed point, mutating it in place.
///
/// # Errors
///
/// Returns [`ConfigError::Resolution`] on structural failures (a reference
/// kind without a parent, a base that is not an Object) and
/// [`ConfigError::Unresolved`] when `max_cycles` passes complete without
/// convergence.
pub fn resolve_references(tree: &mut ConfigTree, max_cycles: NonZeroU32) -> ConfigResult<()> {
    for cycle in 1..=max_cycles.get() {
        match resolve_node(tree, tree.root())? {
            Resolution::Resolved => {
                debug!(cycles = cycle, "reference resolution converged");
                return Ok(());
            }
            Resolution::Unresolved => {}
        }
    }
    warn!(
        cycles = max_cycles.get(),
        "reference resolution did not converge"
    );
    Err(ConfigError::Unresolved {
        cycles: max_cycles.get(),
    })
}

/// Returns true when the subtree contains only Null, Value, Array, and
/// Object nodes.
#[must_use]
pub fn is_fully_resolved(tree: &ConfigTree, id: NodeId) -> bool {
    match tree.kind(id) {
        NodeKind::Null | NodeKind::Value(_) => true,
        NodeKind::Array(elements) => elements.iter().all(|&e| is_fully_resolved(tree, e)),
        NodeKind::Object(members) => members.values().all(|&m| is_fully_resolved(tree, m)),
        NodeKind::Reference(_) | NodeKind::DerivedArray(_) | NodeKind::DerivedObject { .. } => {
            false
        }
    }
}

fn resolve_node(tree: &mut ConfigTree, id: NodeId) -> ConfigResult<Resolution> {
    match tree.kind(id) {
        NodeKind::Null | NodeKind::Value(_) => Ok(Resolution::Resolved),
        NodeKind::Array(_) | NodeKind::Object(_) => resolve_children(tree, id),
        NodeKind::Reference(reference) => {
            let reference = reference.clone();
            resolve_reference(tree, id, &reference)
        }
        NodeKind::DerivedArray(elements) => {
            let elements = elements.clone();
            resolve_derived_array(tree, id, &elements)
        }
        NodeKind::DerivedObject { bases, overrides } => {
            let bases = bases.clone();
            let overrides = *overrides;
            resolve_derived_object(tree, id, &bases, overrides)
        }
    }
}

fn resolve_children(tree: &mut ConfigTree, id: NodeId) -> ConfigResult<Resolution> {
    let children: Vec<NodeId> = match tree.kind(id) {
        NodeKind::Array(elements) => elements.clone(),
        NodeKind::Object(members) => members.values().copied().collect(),
        _ => Vec::new(),
    };
    let mut result = Resolution::Resolved;
    for child in children {
        if resolve_node(tree, child)? == Resolution::Unresolved {
            result = Resolution::Unresolved;
        }
    }
    Ok(result)
}

/// Replace a reference node in place with a clone of its target, if the
/// target can be looked up from the reference's parent.
fn resolve_reference(
    tree: &mut ConfigTree,
    id: NodeId,
    reference: &str,
) -> ConfigResult<Resolution> {
    let Some(parent) = tree.parent(id) else {
        return Err(ConfigError::resolution(
            tree.absolute_node_path(id),
            "reference node has no parent",
        ));
    };
    let Some(target) = tree.node_at_path(parent, reference) else {
        // The target may appear once a sibling resolves; try again next pass.
        return Ok(Resolution::Unresolved);
    };
    let cloned = tree.clone_subtree(target);
    tree.replace_kind(id, cloned);
    Ok(if is_fully_resolved(tree, id) {
        Resolution::Resolved
    } else {
        Resolution::Unresolved
    })
}

fn resolve_derived_array(
    tree: &mut ConfigTree,
    id: NodeId,
    elements: &[NodeId],
) -> ConfigResult<Resolution> {
    if tree.parent(id).is_none() {
        return Err(ConfigError::resolution(
            tree.absolute_node_path(id),
            "derived array node has no parent",
        ));
    }
    let mut result = Resolution::Resolved;
    for &element in elements {
        if tree.is_root(element) {
            tree.set_parent(element, Some(id));
        }
        if resolve_node(tree, element)? == Resolution::Unresolved {
            result = Resolution::Unresolved;
        }
    }
    if result == Resolution::Unresolved {
        return Ok(Resolution::Unresolved);
    }
    // All elements resolved: the node becomes a plain Array of them.
    *tree.kind_mut(id) = NodeKind::Array(elements.to_vec());
    Ok(Resolution::Resolved)
}

fn resolve_derived_object(
    tree: &mut ConfigTree,
    id: NodeId,
    bases: &[String],
    overrides: NodeId,
) -> ConfigResult<Resolution> {
    let Some(parent) = tree.parent(id) else {
        return Err(ConfigError::resolution(
            tree.absolute_node_path(id),
            "derived object node has no parent",
        ));
    };

    // Accumulate the bases left to right; later bases override earlier ones.
    let accumulator = tree.alloc(NodeKind::Object(indexmap::IndexMap::new()));
    tree.set_parent(accumulator, Some(parent));
    for base in bases {
        let Some(base_node) = tree.node_at_path(parent, base) else {
            return Ok(Resolution::Unresolved);
        };
        if !is_fully_resolved(tree, base_node) {
            return Ok(Resolution::Unresolved);
        }
        apply_object(tree, accumulator, base_node).map_err(|err| {
            ConfigError::resolution(
                tree.absolute_node_path(id),
                format!("failed to apply base '{base}' to the derived object: {err}"),
            )
        })?;
    }

    // The override may itself contain references; resolve it against the
    // derived object's parent before applying it.
    if !is_fully_resolved(tree, overrides) {
        tree.set_parent(overrides, Some(parent));
        match resolve_node(tree, overrides)? {
            Resolution::Resolved => {}
            Resolution::Unresolved => return Ok(Resolution::Unresolved),
        }
    }
    if tree.kind(overrides).is_object() {
        apply_object(tree, accumulator, overrides).map_err(|err| {
            ConfigError::resolution(
                tree.absolute_node_path(id),
                format!("failed to apply the override to the derived object: {err}"),
            )
        })?;
    }

    tree.replace_kind(id, accumulator);
    Ok(Resolution::Resolved)
}
