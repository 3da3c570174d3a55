//! Parsing of the `includes` member of a configuration document.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::path;
use crate::registry::CONFIG_READER_TYPE;

/// One entry of a document's `includes` array.
#[derive(Debug)]
pub(super) struct IncludeDirective {
    /// File to include, possibly relative to the including document.
    pub file_path: String,
    /// Node path selecting the subtree to take from the included document.
    pub source_node: String,
    /// Node path the taken subtree is stored under.
    pub destination_node: String,
}

/// Parse and validate the `includes` member of `document`.
///
/// A missing or null member yields no directives. Include order is
/// preserved; later includes override earlier ones when the aggregate is
/// built.
pub(super) fn parse_includes(
    document: &Map<String, Value>,
    file: &Path,
) -> ConfigResult<Vec<IncludeDirective>> {
    let entries = match document.get("includes") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(ConfigError::schema(
                file.display().to_string(),
                "the 'includes' member must be an array",
            ));
        }
    };
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_directive(entry, index, file))
        .collect()
}

fn parse_directive(entry: &Value, index: usize, file: &Path) -> ConfigResult<IncludeDirective> {
    let at = || format!("include [{index}] in '{}'", file.display());
    let Some(members) = entry.as_object() else {
        return Err(ConfigError::schema(at(), "an include must be a JSON object"));
    };

    let type_name = match members.get("type") {
        None | Some(Value::Null) => CONFIG_READER_TYPE,
        Some(Value::String(type_name)) => type_name,
        Some(_) => {
            return Err(ConfigError::schema(at(), "the 'type' member must be a string"));
        }
    };
    if type_name != CONFIG_READER_TYPE {
        return Err(ConfigError::schema(
            at(),
            format!("unsupported include type '{type_name}'"),
        ));
    }

    let file_path = match members.get("file_path") {
        Some(Value::String(file_path)) => file_path.clone(),
        Some(_) => {
            return Err(ConfigError::schema(
                at(),
                "the 'file_path' member must be a string",
            ));
        }
        None => {
            return Err(ConfigError::schema(at(), "the 'file_path' member is missing"));
        }
    };

    let source_node = optional_node_path(members, "source_node", &at)?;
    let destination_node = optional_node_path(members, "destination_node", &at)?;

    Ok(IncludeDirective {
        file_path,
        source_node,
        destination_node,
    })
}

fn optional_node_path(
    members: &Map<String, Value>,
    key: &str,
    at: &impl Fn() -> String,
) -> ConfigResult<String> {
    match members.get(key) {
        None => Ok(path::ROOT_PATH.to_owned()),
        Some(Value::String(node_path)) => Ok(node_path.clone()),
        Some(_) => Err(ConfigError::schema(
            at(),
            format!("the '{key}' member must be a string"),
        )),
    }
}
