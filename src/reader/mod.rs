//! Conversion of parsed JSON documents into unresolved node trees.
//!
//! The reader walks a `serde_json::Value` and produces nodes, carrying a
//! current node path for diagnostics and reference validation. The first
//! character of an object key may be a decorator: `#` stores the raw JSON
//! value as an opaque `Value` node, `&` marks one of the reference kinds
//! (string: node reference, array: derived array, object: derived object).

use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::node::{ConfigTree, NodeId, NodeKind};
use crate::path;

mod derived;

use derived::read_reference_kind;

/// Read a JSON value into a detached node.
///
/// `current_path` is the node path the value will live at; it only feeds
/// diagnostics and reference validation.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPath`] for malformed member names and
/// references, and [`ConfigError::Schema`] for structural violations such
/// as duplicate members or malformed reference literals.
pub fn read_value(tree: &mut ConfigTree, value: &Value, current_path: &str) -> ConfigResult<NodeId> {
    match value {
        Value::Null => Ok(tree.alloc(NodeKind::Null)),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Ok(tree.alloc(NodeKind::Value(value.clone())))
        }
        Value::Array(elements) => read_array(tree, elements, current_path),
        Value::Object(members) => read_object(tree, members, current_path),
    }
}

/// Read a JSON object into a detached `Object` node, applying decorator
/// rules to each member key.
///
/// # Errors
///
/// As [`read_value`]; duplicate member names (after decorator stripping)
/// are a hard error.
pub fn read_object(
    tree: &mut ConfigTree,
    members: &Map<String, Value>,
    current_path: &str,
) -> ConfigResult<NodeId> {
    let object = tree.alloc(NodeKind::Object(indexmap::IndexMap::new()));
    for (raw_name, value) in members {
        let (decorator, name) = split_decorator(raw_name);
        if !path::validate_name(name) {
            return Err(ConfigError::invalid_path(
                name,
                format!("invalid member name in object at '{current_path}'"),
            ));
        }
        if tree.member(object, name).is_some() {
            return Err(ConfigError::schema(
                current_path,
                format!("object already contains a member named '{name}'"),
            ));
        }
        let member_path = path::append(current_path, name);
        let node = read_decorated(tree, decorator, value, &member_path)?;
        tree.set_member(object, name, node);
    }
    Ok(object)
}

fn read_array(tree: &mut ConfigTree, elements: &[Value], current_path: &str) -> ConfigResult<NodeId> {
    let array = tree.alloc(NodeKind::Array(Vec::new()));
    for (index, element) in elements.iter().enumerate() {
        let element_path = path::append_index(current_path, index);
        let node = read_value(tree, element, &element_path)?;
        tree.push_element(array, node);
    }
    Ok(array)
}

/// Read a member value under its (already stripped) decorator.
fn read_decorated(
    tree: &mut ConfigTree,
    decorator: Option<char>,
    value: &Value,
    current_path: &str,
) -> ConfigResult<NodeId> {
    match decorator {
        // Explicit Value node, even for JSON arrays and objects.
        Some('#') => Ok(tree.alloc(NodeKind::Value(value.clone()))),
        Some('&') => read_reference_kind(tree, value, current_path),
        _ => read_value(tree, value, current_path),
    }
}

fn split_decorator(raw_name: &str) -> (Option<char>, &str) {
    match raw_name.chars().next() {
        Some(decorator @ ('#' | '&')) => (Some(decorator), &raw_name[1..]),
        _ => (None, raw_name),
    }
}

#[cfg(test)]
mod tests;
