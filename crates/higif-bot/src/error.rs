//! Bot error types.

use thiserror::Error;

use higif_media::MediaError;
use higif_telegram::TelegramError;

pub type BotResult<T> = Result<T, BotError>;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No active session")]
    SessionMissing,

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Chat-facing description of the failure.
    ///
    /// Every handler converts errors into one of these replies; internal
    /// detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            BotError::SessionMissing => "Use /start first to tell me the name.".to_string(),
            BotError::Media(MediaError::SourceNotFound(_)) => {
                "That video is missing on the server.".to_string()
            }
            BotError::Media(MediaError::TranscodeFailed { .. }) => {
                "Couldn't generate a GIF from that video. Try another one.".to_string()
            }
            _ => "Something went wrong. Use /start to try again.".to_string(),
        }
    }
}
