//! Dispatch of configuration readers by type string.
//!
//! The registry is an explicit value handed to callers, never hidden
//! process state: construct it once at startup, register any additional
//! readers, and pass it to the code that loads configuration.

use std::collections::HashMap;
use std::path::Path;

use crate::compose::ConfigReader;
use crate::error::{ConfigError, ConfigResult};
use crate::node::ConfigTree;

/// Type string of the built-in JSON configuration reader.
pub const CONFIG_READER_TYPE: &str = "CppConfigFramework";

/// One read request routed through the registry.
#[derive(Debug, Clone, Copy)]
pub struct ReadRequest<'a> {
    /// Configuration file to load.
    pub file_path: &'a Path,
    /// Directory that relative file paths resolve against.
    pub working_dir: &'a Path,
    /// Node path selecting the subtree to extract from the document.
    pub source_node: &'a str,
    /// Node path the extracted subtree is re-parented under.
    pub destination_node: &'a str,
}

/// A reader capable of producing a resolved configuration tree.
pub trait TreeReader {
    /// Load and resolve the configuration described by `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the document cannot be loaded,
    /// composed, or resolved.
    fn read(&self, request: &ReadRequest<'_>) -> ConfigResult<ConfigTree>;
}

impl TreeReader for ConfigReader {
    fn read(&self, request: &ReadRequest<'_>) -> ConfigResult<ConfigTree> {
        ConfigReader::read(
            self,
            request.file_path,
            request.working_dir,
            request.source_node,
            request.destination_node,
        )
    }
}

/// Maps configuration type strings to readers.
pub struct ReaderRegistry {
    readers: HashMap<String, Box<dyn TreeReader>>,
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderRegistry {
    /// Create a registry with the built-in reader registered under
    /// [`CONFIG_READER_TYPE`].
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            readers: HashMap::new(),
        };
        registry.register(CONFIG_READER_TYPE, Box::new(ConfigReader::new()));
        registry
    }

    /// Register a reader for a type string, replacing any previous one.
    ///
    /// Returns false (and registers nothing) for an empty type string.
    pub fn register(&mut self, type_name: &str, reader: Box<dyn TreeReader>) -> bool {
        if type_name.is_empty() {
            return false;
        }
        self.readers.insert(type_name.to_owned(), reader);
        true
    }

    /// Dispatch a read to the reader registered for `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownReaderType`] when no reader is
    /// registered for the type, or whatever error the dispatched reader
    /// produces.
    pub fn read_config(
        &self,
        type_name: &str,
        request: &ReadRequest<'_>,
    ) -> ConfigResult<ConfigTree> {
        let Some(reader) = self.readers.get(type_name) else {
            return Err(ConfigError::UnknownReaderType {
                type_name: type_name.to_owned(),
            });
        };
        reader.read(request)
    }
}
