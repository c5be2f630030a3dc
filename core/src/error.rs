use std::path::PathBuf;

/// Errors surfaced by the record store, input validation and persistence.
#[derive(Debug, thiserror::Error)]
pub enum SolarError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Entry {index} is out of range (store holds {len} entries)")]
    Index { index: usize, len: usize },

    #[error("Malformed week label: {0}")]
    Format(String),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SolarError>;
