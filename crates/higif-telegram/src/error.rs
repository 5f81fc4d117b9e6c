//! Error types for Telegram API operations.

use thiserror::Error;

/// Result type for Telegram API operations.
pub type TelegramResult<T> = Result<T, TelegramError>;

/// Errors that can occur talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram API error {error_code:?}: {description}")]
    Api {
        description: String,
        error_code: Option<i64>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Response marked ok but carried no result")]
    EmptyResult,

    #[error("getFile response carried no file path")]
    MissingFilePath,
}

impl TelegramError {
    /// Create an API error from the response envelope.
    pub fn api(description: impl Into<String>, error_code: Option<i64>) -> Self {
        Self::Api {
            description: description.into(),
            error_code,
        }
    }
}
