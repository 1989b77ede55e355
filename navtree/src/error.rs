//! Error types for navigation construction and loading.

use std::path::PathBuf;

/// Errors raised while building or loading a navigation tree.
///
/// Selection never produces an error: a request that cannot be matched
/// simply leaves items unselected.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Two items in the same container share a key.
    #[error("duplicate navigation key `{key}` at level {level}")]
    DuplicateKey { key: String, level: usize },

    /// The `method` of an item is not a known HTTP verb.
    #[error("invalid http method: {0:?}")]
    InvalidMethod(String),

    /// The file extension does not map to a supported format.
    #[error("unsupported file extension: {0:?}")]
    UnsupportedFormat(String),

    /// Reading a navigation or config file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NavError>;
