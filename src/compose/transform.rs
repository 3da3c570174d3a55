//! Source/destination transformation of a resolved tree.

use indexmap::IndexMap;

use crate::error::{ConfigError, ConfigResult};
use crate::node::{ConfigTree, NodeKind};
use crate::path;

/// Extract the subtree at `source` and re-parent it under `destination`.
///
/// With both paths at the root this is the identity. Otherwise the source
/// subtree is copied out and, unless the destination is the root, wrapped
/// in a chain of Objects named by the destination's segments.
pub(super) fn transform(
    tree: ConfigTree,
    source: &str,
    destination: &str,
) -> ConfigResult<ConfigTree> {
    let source = path::clean(source);
    let destination = path::clean(destination);
    if source == path::ROOT_PATH && destination == path::ROOT_PATH {
        return Ok(tree);
    }

    let Some(sub) = tree.node_at_path(tree.root(), source) else {
        return Err(ConfigError::resolution(
            source,
            "source node not found in the resolved configuration",
        ));
    };

    let mut out = ConfigTree::new();
    let extracted = out.import(&tree, sub);
    if destination == path::ROOT_PATH {
        out.set_root(extracted);
        return Ok(out);
    }

    let names: Vec<&str> = destination.trim_start_matches('/').split('/').collect();
    let mut current = out.root();
    for (position, name) in names.iter().enumerate() {
        debug_assert!(path::validate_name(name), "destination was validated on entry");
        if position + 1 == names.len() {
            out.set_member(current, name, extracted);
        } else {
            let next = out.alloc(NodeKind::Object(IndexMap::new()));
            out.set_member(current, name, next);
            current = next;
        }
    }
    Ok(out)
}
