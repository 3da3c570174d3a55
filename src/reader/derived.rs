//! Reading of the reference kinds behind the `&` decorator.

use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::node::{ConfigTree, NodeId, NodeKind};
use crate::path;

use super::{read_object, split_decorator};

/// Key naming each element of a derived-array literal.
const ELEMENT_KEY: &str = "element";
/// Key naming the base list of a derived-object literal.
const BASE_KEY: &str = "base";
/// Key naming the override object of a derived-object literal.
const CONFIG_KEY: &str = "config";

/// Dispatch an `&`-decorated member to the matching reference kind.
pub(super) fn read_reference_kind(
    tree: &mut ConfigTree,
    value: &Value,
    current_path: &str,
) -> ConfigResult<NodeId> {
    match value {
        Value::String(reference) => read_reference(tree, reference, current_path),
        Value::Array(elements) => read_derived_array(tree, elements, current_path),
        Value::Object(members) => read_derived_object(tree, members, current_path),
        _ => Err(ConfigError::schema(
            current_path,
            "a reference member must be a string, array, or object",
        )),
    }
}

fn read_reference(
    tree: &mut ConfigTree,
    reference: &str,
    current_path: &str,
) -> ConfigResult<NodeId> {
    if !path::validate_reference(reference, current_path) {
        return Err(ConfigError::invalid_path(
            reference,
            format!("invalid node reference at '{current_path}'"),
        ));
    }
    Ok(tree.alloc(NodeKind::Reference(reference.to_owned())))
}

fn read_derived_array(
    tree: &mut ConfigTree,
    elements: &[Value],
    current_path: &str,
) -> ConfigResult<NodeId> {
    let array = tree.alloc(NodeKind::DerivedArray(Vec::new()));
    for element in elements {
        let Some(members) = element.as_object() else {
            return Err(ConfigError::schema(
                current_path,
                "each derived array item must be a JSON object",
            ));
        };
        if members.len() != 1 {
            return Err(ConfigError::schema(
                current_path,
                format!("each derived array item must have exactly one '{ELEMENT_KEY}' member"),
            ));
        }
        for (raw_name, value) in members {
            let (decorator, name) = split_decorator(raw_name);
            if name != ELEMENT_KEY {
                return Err(ConfigError::schema(
                    current_path,
                    format!("unexpected derived array item member '{name}'"),
                ));
            }
            let node = super::read_decorated(tree, decorator, value, current_path)?;
            tree.push_element(array, node);
        }
    }
    Ok(array)
}

fn read_derived_object(
    tree: &mut ConfigTree,
    members: &Map<String, Value>,
    current_path: &str,
) -> ConfigResult<NodeId> {
    let bases = match members.get(BASE_KEY) {
        None => {
            return Err(ConfigError::schema(
                current_path,
                format!("a derived object requires a '{BASE_KEY}' member"),
            ));
        }
        Some(Value::String(base)) => vec![base.clone()],
        Some(Value::Array(items)) => {
            let mut bases = Vec::with_capacity(items.len());
            for item in items {
                let Some(base) = item.as_str() else {
                    return Err(ConfigError::schema(
                        current_path,
                        format!("every '{BASE_KEY}' entry must be a string"),
                    ));
                };
                bases.push(base.to_owned());
            }
            if bases.is_empty() {
                return Err(ConfigError::schema(
                    current_path,
                    format!("the '{BASE_KEY}' member must not be empty"),
                ));
            }
            bases
        }
        Some(_) => {
            return Err(ConfigError::schema(
                current_path,
                format!("the '{BASE_KEY}' member must be a string or an array of strings"),
            ));
        }
    };

    let overrides = match members.get(CONFIG_KEY) {
        None | Some(Value::Null) => tree.alloc(NodeKind::Null),
        Some(Value::Object(config)) => read_object(tree, config, current_path)?,
        Some(_) => {
            return Err(ConfigError::schema(
                current_path,
                format!("the '{CONFIG_KEY}' member must be an object or null"),
            ));
        }
    };

    Ok(tree.alloc(NodeKind::DerivedObject { bases, overrides }))
}
