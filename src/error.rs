//! Error types for the release tools

use std::path::PathBuf;

use thiserror::Error;

/// Result type for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Release tooling errors
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing [{table}] in {path}")]
    MissingTable { table: String, path: PathBuf },

    #[error("Expected a JSON object at the top level of {0}")]
    NotAnObject(PathBuf),

    #[error("{path} at {commit} is not valid UTF-8")]
    InvalidUtf8 { commit: String, path: String },

    #[error("No git repository found at or above {0}")]
    NotARepository(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml_edit::TomlError),

    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}
