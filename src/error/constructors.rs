//! Constructors shared by the modules that raise `ConfigError`.

use super::ConfigError;

impl ConfigError {
    /// Construct an [`ConfigError::InvalidPath`] for a path or name.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Construct a [`ConfigError::Schema`] anchored at a node path or file
    /// location.
    #[must_use]
    pub fn schema(at: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            at: at.into(),
            message: message.into(),
        }
    }

    /// Construct a [`ConfigError::Resolution`] anchored at a node path.
    #[must_use]
    pub fn resolution(at: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            at: at.into(),
            message: message.into(),
        }
    }
}
