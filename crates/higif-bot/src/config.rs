//! Bot configuration.

use std::path::PathBuf;

use crate::error::{BotError, BotResult};

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API token
    pub token: String,
    /// Chat that receives inline uploads to obtain reusable file ids.
    /// Inline mode is disabled when unset.
    pub inline_storage_chat_id: Option<i64>,
    /// Directory of background videos
    pub videos_dir: PathBuf,
    /// Overlay font file
    pub font_file: PathBuf,
    /// Long-poll hold time in seconds
    pub poll_timeout_secs: u64,
    /// Inline cache capacity (entries)
    pub inline_cache_capacity: usize,
}

impl BotConfig {
    /// Create config from environment variables.
    ///
    /// A missing `TELEGRAM_TOKEN` is the only fatal condition.
    pub fn from_env() -> BotResult<Self> {
        let token = std::env::var("TELEGRAM_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BotError::config("TELEGRAM_TOKEN env var not set"))?;

        let inline_storage_chat_id = std::env::var("INLINE_STORAGE_CHAT_ID")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|id| *id != 0);

        Ok(Self {
            token,
            inline_storage_chat_id,
            videos_dir: std::env::var("HIGIF_VIDEOS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("base_videos")),
            font_file: std::env::var("HIGIF_FONT_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("fonts/font.ttf")),
            poll_timeout_secs: std::env::var("HIGIF_POLL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50),
            inline_cache_capacity: std::env::var("HIGIF_INLINE_CACHE_CAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(256),
        })
    }
}
