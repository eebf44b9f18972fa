use thiserror::Error;

/// Application-wide error types for the republisher.
#[derive(Error, Debug)]
pub enum AppError {
    /// A run was requested while another one is active and `force` was not set.
    #[error("Republishing process is already running")]
    AlreadyRunning,

    /// HTTP request failed (non-success status or malformed response).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Caller supplied unusable input (e.g. an empty id list).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}
