//! The deep-merge ("apply") operator.
//!
//! `apply_object` overlays one Object node onto another: members present
//! only in the source are cloned in, members that are Objects on both sides
//! merge recursively, and everything else is replaced wholesale by a clone
//! of the source member. The source wins on every conflict; there are no
//! policy knobs.

use crate::error::{ConfigError, ConfigResult};
use crate::node::{ConfigTree, NodeId};

/// Overlay the Object at `src` onto the Object at `dst`, in place.
///
/// Both ids must address `Object` nodes in `tree`; the two subtrees must be
/// disjoint. Source members are visited in insertion order. Re-applying an
/// existing member name keeps that member's position in `dst`; arrays and
/// scalars (and unresolved kinds) replace the destination member wholesale.
///
/// # Errors
///
/// Returns [`ConfigError::Resolution`] when either side is not an `Object`
/// node; this is the operator's only failure mode.
pub fn apply_object(tree: &mut ConfigTree, dst: NodeId, src: NodeId) -> ConfigResult<()> {
    if !tree.kind(dst).is_object() || !tree.kind(src).is_object() {
        return Err(ConfigError::resolution(
            tree.absolute_node_path(dst),
            format!(
                "apply requires Object nodes on both sides (destination is {}, source is {})",
                tree.kind(dst).type_name(),
                tree.kind(src).type_name()
            ),
        ));
    }
    let src_members: Vec<(String, NodeId)> = tree
        .members(src)
        .map(|members| {
            members
                .iter()
                .map(|(name, &child)| (name.clone(), child))
                .collect()
        })
        .unwrap_or_default();
    for (name, src_child) in src_members {
        match tree.member(dst, &name) {
            Some(dst_child)
                if tree.kind(dst_child).is_object() && tree.kind(src_child).is_object() =>
            {
                apply_object(tree, dst_child, src_child)?;
            }
            _ => {
                let cloned = tree.clone_subtree(src_child);
                tree.set_member(dst, &name, cloned);
            }
        }
    }
    Ok(())
}
