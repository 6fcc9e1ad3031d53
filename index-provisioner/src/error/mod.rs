use thiserror::Error;

use crate::core::client::database::DatabaseError;

/// Result type for provisioner operations
pub type ProvisionerResult<T> = Result<T, ProvisionerError>;

/// Error types for the provisioner
#[derive(Error, Debug)]
pub enum ProvisionerError {
    #[error("Database error: {0}")]
    DatabaseCoreError(#[from] DatabaseError),

    /// Setup Command error
    #[error("Setup Command Error: {0}")]
    SetupCommandError(String),

    /// Database error
    #[error("Database Invalid URI error: {0}")]
    DatabaseInvalidURIError(String),

    /// The live index catalog does not match the manifest
    #[error("Index verification failed: {0}")]
    VerificationFailed(String),
}
