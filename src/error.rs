//! Error types for the Labloan client

use thiserror::Error;

/// Main client error type
///
/// Network failures and backend-reported errors are kept apart so callers
/// can offer a retry for the former and show the backend's message for the
/// latter.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message suitable for direct display to the user.
    ///
    /// Backend-provided messages are shown verbatim; transport failures
    /// collapse to a generic retryable string.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api { message, .. } => message.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Network(_) => {
                "Request failed. Check your connection and try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
