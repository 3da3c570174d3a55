//! Loading entry point for configuration files.

use std::collections::HashSet;
use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::apply_object;
use crate::node::ConfigTree;
use crate::path;
use crate::reader;
use crate::resolver::{DEFAULT_MAX_CYCLES, resolve_references};

use super::includes::parse_includes;
use super::transform::transform;

/// Reads a configuration document, composes its includes, resolves all
/// references, and transforms the result by source and destination node
/// paths.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use conforge::ConfigReader;
///
/// # fn run() -> conforge::ConfigResult<()> {
/// let reader = ConfigReader::new();
/// let tree = reader.read(Path::new("app.json"), Path::new("."), "/", "/")?;
/// let port = tree.node_at_path(tree.root(), "/server/port");
/// # let _ = port;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigReader {
    max_cycles: NonZeroU32,
}

impl Default for ConfigReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigReader {
    /// Create a reader with the default resolution cycle cap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }

    /// The maximum number of resolution cycles per document.
    #[must_use]
    pub fn max_cycles(&self) -> NonZeroU32 {
        self.max_cycles
    }

    /// Set the maximum number of resolution cycles per document.
    pub fn set_max_cycles(&mut self, max_cycles: NonZeroU32) {
        self.max_cycles = max_cycles;
    }

    /// Read the configuration document at `file_path`.
    ///
    /// Relative paths resolve against `working_dir`. After include
    /// composition and reference resolution, the subtree at `source` is
    /// extracted and re-parented under `destination` (both must be valid
    /// absolute node paths; `/` means the whole tree and the root
    /// respectively).
    ///
    /// # Errors
    ///
    /// Any failure — unreadable or unparseable file, malformed document,
    /// include cycle, unresolved or structurally invalid references — is
    /// fatal to the whole read; no partial tree is returned.
    pub fn read(
        &self,
        file_path: &Path,
        working_dir: &Path,
        source: &str,
        destination: &str,
    ) -> ConfigResult<ConfigTree> {
        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        self.read_inner(
            file_path,
            working_dir,
            source,
            destination,
            &mut visited,
            &mut stack,
        )
    }

    fn read_inner(
        &self,
        file_path: &Path,
        working_dir: &Path,
        source: &str,
        destination: &str,
        visited: &mut HashSet<PathBuf>,
        stack: &mut Vec<PathBuf>,
    ) -> ConfigResult<ConfigTree> {
        validate_transform_path(source, "source")?;
        validate_transform_path(destination, "destination")?;

        let absolute = if file_path.is_absolute() {
            file_path.to_path_buf()
        } else {
            working_dir.join(file_path)
        };
        let canonical = fs::canonicalize(&absolute).map_err(|source| ConfigError::Io {
            path: absolute.clone(),
            source,
        })?;

        with_include_guard(&canonical, visited, stack, |visited, stack| {
            self.read_document(&canonical, source, destination, visited, stack)
        })
    }

    fn read_document(
        &self,
        canonical: &Path,
        source: &str,
        destination: &str,
        visited: &mut HashSet<PathBuf>,
        stack: &mut Vec<PathBuf>,
    ) -> ConfigResult<ConfigTree> {
        debug!(path = %canonical.display(), source, destination, "reading configuration file");
        let text = fs::read_to_string(canonical).map_err(|source| ConfigError::Io {
            path: canonical.to_path_buf(),
            source,
        })?;
        let document: Value =
            serde_json::from_str(&text).map_err(|err| parse_error(canonical, &text, &err))?;
        let Some(members) = document.as_object() else {
            return Err(ConfigError::schema(
                canonical.display().to_string(),
                "the top-level JSON value must be an object",
            ));
        };

        // Compose the includes into an aggregate; later includes win.
        let mut tree = ConfigTree::new();
        let aggregate = tree.root();
        let directives = parse_includes(members, canonical)?;
        let include_dir = canonical
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        for (index, directive) in directives.iter().enumerate() {
            debug!(index, file = %directive.file_path, "loading include");
            let included = self.read_inner(
                Path::new(&directive.file_path),
                &include_dir,
                &directive.source_node,
                &directive.destination_node,
                visited,
                stack,
            )?;
            let grafted = tree.import(&included, included.root());
            apply_object(&mut tree, aggregate, grafted).map_err(|err| {
                ConfigError::resolution(
                    path::ROOT_PATH,
                    format!("failed to apply include '{}': {err}", directive.file_path),
                )
            })?;
        }

        // The document's own config overrides everything it includes.
        match members.get("config") {
            None | Some(Value::Null) => {}
            Some(Value::Object(config)) => {
                let config_node = reader::read_object(&mut tree, config, path::ROOT_PATH)?;
                apply_object(&mut tree, aggregate, config_node)?;
            }
            Some(_) => {
                return Err(ConfigError::schema(
                    canonical.display().to_string(),
                    "the 'config' member must be an object or null",
                ));
            }
        }

        resolve_references(&mut tree, self.max_cycles)?;

        transform(tree, source, destination)
    }
}

/// Run `operation` with `canonical` marked active, failing on re-entry.
///
/// Re-entering an active file means the include chain loops; the error
/// names the chain from the first visit back to the repeated file.
fn with_include_guard<T>(
    canonical: &Path,
    visited: &mut HashSet<PathBuf>,
    stack: &mut Vec<PathBuf>,
    operation: impl FnOnce(&mut HashSet<PathBuf>, &mut Vec<PathBuf>) -> ConfigResult<T>,
) -> ConfigResult<T> {
    if !visited.insert(canonical.to_path_buf()) {
        let mut cycle: Vec<String> = stack.iter().map(|p| p.display().to_string()).collect();
        cycle.push(canonical.display().to_string());
        return Err(ConfigError::CyclicInclude {
            cycle: cycle.join(" -> "),
        });
    }
    stack.push(canonical.to_path_buf());
    let result = operation(visited, stack);
    visited.remove(canonical);
    stack.pop();
    result
}

fn validate_transform_path(node_path: &str, role: &str) -> ConfigResult<()> {
    if !path::is_absolute(node_path) || !path::validate_path(node_path) {
        return Err(ConfigError::invalid_path(
            node_path,
            format!("the {role} node path must be a valid absolute node path"),
        ));
    }
    Ok(())
}

/// Build a parse error carrying the document text around the failure.
fn parse_error(file: &Path, text: &str, err: &serde_json::Error) -> ConfigError {
    const CONTEXT_LEN: usize = 20;
    let line = err.line();
    let column = err.column();
    let mut offset = 0;
    for (index, line_text) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            offset += column.saturating_sub(1);
            break;
        }
        offset += line_text.len();
    }
    let mut boundary = offset.min(text.len());
    while !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    let context_before: String = text[..boundary]
        .chars()
        .rev()
        .take(CONTEXT_LEN)
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    let context_at: String = text[boundary..].chars().take(CONTEXT_LEN).collect();
    ConfigError::Parse {
        path: file.to_path_buf(),
        line,
        column,
        context_before,
        context_at,
        message: err.to_string(),
    }
}
