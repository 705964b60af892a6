//! Error types for the UML model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Duplicate model element id: {0}")]
    DuplicateId(String),

    #[error("Model file not found: {0}")]
    ModelNotFound(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
