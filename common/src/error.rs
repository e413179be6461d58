use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinError;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read course document {path}: {source}")]
    DocumentRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Embedding error: {0}")]
    Embedding(String),
    #[error("Generation error: {0}")]
    Generation(String),
    #[error("No persisted index at {0}")]
    IndexNotFound(PathBuf),
    #[error("Persisted index unreadable: {0}")]
    IndexCorrupt(String),
    #[error("Course not found: {0}")]
    CourseNotFound(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Task join error: {0}")]
    Join(#[from] JoinError),
}
