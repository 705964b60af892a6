//! Error types for code generation

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Output for {classifier} cancelled by overwrite policy")]
    OutputCancelled { classifier: String },

    #[error("Could not create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown target language: {0}")]
    UnknownLanguage(String),

    #[error("Classifier not found: {0}")]
    ClassifierNotFound(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Model error: {0}")]
    Model(#[from] umbrello_model::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
