use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

use super::constant::{DUPLICATE_KEY_CODE, INDEX_KEY_SPECS_CONFLICT_CODE, INDEX_OPTIONS_CONFLICT_CODE};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Index conflicts with an existing definition: {0}")]
    IndexConflict(String),

    #[error("Failed to serialize document: {0}")]
    FailedToSerializeDocument(String),

    #[error("Unreadable index catalog entry: {0}")]
    InvalidCatalogEntry(String),
}

impl DatabaseError {
    /// Maps server errors with a known meaning to a dedicated variant, everything else stays a `MongoError`.
    pub fn classify(err: mongodb::error::Error) -> Self {
        match server_error_code(&err) {
            Some(DUPLICATE_KEY_CODE) => Self::DuplicateKey(err.to_string()),
            Some(INDEX_OPTIONS_CONFLICT_CODE | INDEX_KEY_SPECS_CONFLICT_CODE) => Self::IndexConflict(err.to_string()),
            _ => Self::MongoError(err),
        }
    }
}

/// Extracts the server error code from command and single write failures.
pub fn server_error_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command_error) => Some(command_error.code),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        _ => None,
    }
}
