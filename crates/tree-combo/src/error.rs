//! Error types for tree-combo.
//!
//! Widget operations never fail; invalid indices and missing models degrade
//! to empty values. Only loading and saving configuration can go wrong.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for fallible tree-combo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by tree-combo.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading a configuration file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration document is not valid TOML for [`TreeComboConfig`](crate::config::TreeComboConfig).
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configuration could not be written as TOML.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

static_assertions::assert_impl_all!(Error: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = Error::Io {
            path: PathBuf::from("/missing/combo.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let message = err.to_string();
        assert!(message.contains("/missing/combo.toml"));
        assert!(message.contains("not found"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
