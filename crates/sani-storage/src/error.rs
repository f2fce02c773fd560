//! Error types for sani-storage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<StorageError> for sani_core::Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => sani_core::Error::Io(e),
            StorageError::InvalidFilename(name) => sani_core::Error::InvalidFilename(name),
            StorageError::NotFound(name) => sani_core::Error::NotFound(name),
            StorageError::Serialization(e) => sani_core::Error::Serialization(e),
            StorageError::Other(e) => sani_core::Error::Other(e),
        }
    }
}
