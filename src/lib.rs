//! Core crate for the `conforge` configuration framework.
//!
//! `conforge` loads hierarchical JSON configuration documents, composes
//! them through file includes and sub-tree relocation, and resolves two
//! in-document abstractions into a fully materialized tree:
//!
//! - **node references** (`"&name": "/path/to/node"`) — symlinks into the
//!   same tree, replaced by deep copies of their targets;
//! - **derived objects** (`"&name": {"base": ..., "config": ...}`) —
//!   prototype-style inheritance, expanded by merging the base objects left
//!   to right and applying the per-instance override.
//!
//! Resolution is a fixed-point loop: forward references are retried across
//! passes, and reference cycles are reported as errors once the configured
//! cycle cap is reached. A resolved tree contains only Null, Value, Array,
//! and Object nodes and is traversed through [`ConfigTree`].

mod compose;
mod error;
mod merge;
mod node;
pub mod path;
mod reader;
mod registry;
mod resolver;

pub use compose::ConfigReader;
pub use error::{ConfigError, ConfigResult};
pub use merge::apply_object;
pub use node::{ConfigTree, NodeId, NodeKind};
pub use reader::{read_object, read_value};
pub use registry::{CONFIG_READER_TYPE, ReadRequest, ReaderRegistry, TreeReader};
pub use resolver::{DEFAULT_MAX_CYCLES, is_fully_resolved, resolve_references};
