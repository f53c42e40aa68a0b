//! Error types for fl-core

use thiserror::Error;

/// Core error type for Flowline
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Artifact file not found
    #[error("[C001] Artifact not found: {path}")]
    ArtifactNotFound { path: String },

    /// C002: Failed to read an artifact file
    #[error("[C002] Failed to read '{path}': {source}")]
    ArtifactRead {
        path: String,
        source: std::io::Error,
    },

    /// C003: Failed to parse an artifact file
    #[error("[C003] Failed to parse '{path}': {source}")]
    ArtifactParse {
        path: String,
        source: serde_json::Error,
    },

    /// C004: IO error
    #[error("[C004] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
