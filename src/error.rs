//! Error types for manifest reconciliation operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or reconciling manifests.
#[derive(Error, Debug)]
pub enum Error {
    /// The local project manifest could not be read.
    #[error("failed to read manifest at {path}: {source}")]
    ManifestRead {
        /// Path of the manifest that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The local project manifest was not valid JSON.
    #[error("failed to parse manifest at {path}: {message}")]
    ManifestParse {
        /// Path of the manifest that could not be parsed.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// IO error.
    ///
    /// Not produced by the crate's own reader, which wraps IO failures in
    /// [`Error::ManifestRead`]; provided so external [`ManifestReader`]
    /// implementations can use `?` on filesystem calls.
    ///
    /// [`ManifestReader`]: crate::service::ManifestReader
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a manifest read error.
    pub fn manifest_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ManifestRead {
            path: path.into(),
            source,
        }
    }

    /// Create a manifest parse error.
    pub fn manifest_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ManifestParse {
            path: path.into(),
            message: message.into(),
        }
    }

}
