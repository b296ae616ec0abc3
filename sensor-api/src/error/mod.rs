use thiserror::Error;

use crate::core::client::database::DatabaseError;

/// Result type for sensor api bootstrap operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Error types raised while configuring, starting or stopping the service
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    DatabaseCoreError(#[from] DatabaseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),

    #[error("Server task failed: {0}")]
    ServerTaskError(#[from] tokio::task::JoinError),

    #[error("Shutdown error: {0}")]
    ShutdownError(#[from] anyhow::Error),
}
