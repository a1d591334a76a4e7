//! Transformer error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering, building or running transformers
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Invalid transformer '{name}': {reason}")]
    InvalidTransform { name: String, reason: String },

    #[error("Invalid plugin path {0:?}: expected an existing directory")]
    InvalidPath(PathBuf),

    #[error("Duplicate transformer '{name}' defined in {first:?} and {second:?}")]
    DuplicateTransforms {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Unknown transformer: {0}")]
    UnknownTransformer(String),

    #[error("Invalid options for transform kind '{kind}': {reason}")]
    InvalidOptions { kind: String, reason: String },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid plugin manifest {path:?}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported data in {path:?}: {reason}")]
    UnsupportedData { path: PathBuf, reason: String },
}

impl TransformError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransformError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn unsupported(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        TransformError::UnsupportedData {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_options(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        TransformError::InvalidOptions {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for transformer operations
pub type TransformResult<T> = Result<T, TransformError>;
