//! Primary error enum for configuration loading flows.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading and resolving configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Node path or member name syntax violation.
    #[error("invalid node path '{path}': {reason}")]
    InvalidPath {
        /// Offending path or name.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// Configuration file is missing or unreadable.
    #[error("failed to read configuration file '{path}': {source}")]
    Io {
        /// File that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file contents are not valid JSON.
    #[error(
        "failed to parse '{path}' at line {line}, column {column}: {message} \
         (context before: '{context_before}', at: '{context_at}')"
    )]
    Parse {
        /// File that failed to parse.
        path: std::path::PathBuf,
        /// 1-based line of the parse failure.
        line: usize,
        /// 1-based column of the parse failure.
        column: usize,
        /// Document text immediately before the failure offset.
        context_before: String,
        /// Document text at the failure offset.
        context_at: String,
        /// Parser diagnostic.
        message: String,
    },

    /// Document structure violates the configuration format.
    #[error("schema error at {at}: {message}")]
    Schema {
        /// Node path or file location the violation was detected at.
        at: String,
        /// Description of the violation.
        message: String,
    },

    /// Structural failure while resolving references.
    #[error("resolution error at {at}: {message}")]
    Resolution {
        /// Absolute node path of the failing node.
        at: String,
        /// Description of the failure.
        message: String,
    },

    /// References remained unresolved after the configured cycle limit.
    #[error("failed to fully resolve references after {cycles} cycles")]
    Unresolved {
        /// Number of resolution cycles that ran.
        cycles: u32,
    },

    /// Cycle detected while processing file includes.
    #[error("cyclic include detected: {cycle}")]
    CyclicInclude {
        /// Chain of configuration files participating in the cycle.
        cycle: String,
    },

    /// No reader is registered for the requested configuration type.
    #[error("unsupported configuration type '{type_name}'")]
    UnknownReaderType {
        /// The type string that failed to dispatch.
        type_name: String,
    },
}
