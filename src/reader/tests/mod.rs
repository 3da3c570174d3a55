//! Shared helpers for reader tests along with focused submodules.

use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::node::{ConfigTree, NodeId};

pub(super) mod derived_tests;

/// Read a JSON object literal at the root path, returning the tree and the
/// Object node.
pub(super) fn read_literal(value: Value) -> Result<(ConfigTree, NodeId)> {
    let mut tree = ConfigTree::new();
    let members = value
        .as_object()
        .ok_or_else(|| anyhow!("test literal must be a JSON object"))?;
    let node = super::read_object(&mut tree, members, "/")
        .map_err(|err| anyhow!(err.to_string()))?;
    Ok((tree, node))
}

/// Expect `read_object` on the literal to fail, returning the error text.
pub(super) fn read_literal_err(value: Value) -> Result<String> {
    let mut tree = ConfigTree::new();
    let members = value
        .as_object()
        .ok_or_else(|| anyhow!("test literal must be a JSON object"))?;
    match super::read_object(&mut tree, members, "/") {
        Ok(_) => Err(anyhow!("expected the reader to reject {members:?}")),
        Err(err) => Ok(err.to_string()),
    }
}
