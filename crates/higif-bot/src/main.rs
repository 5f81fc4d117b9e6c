//! higif bot binary.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use higif_bot::{BotConfig, Dispatcher};
use higif_media::{check_ffmpeg, GifGenerator, VideoLibrary};
use higif_telegram::{TelegramClient, TelegramConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("higif=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }

    info!("Starting higif-bot");

    let config = match BotConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if check_ffmpeg().is_err() {
        warn!("FFmpeg not found in PATH; generation will fail until it is installed");
    }

    let library = VideoLibrary::new(&config.videos_dir);
    if let Err(e) = library.ensure_exists().await {
        error!("Failed to create videos directory: {}", e);
        std::process::exit(1);
    }
    if let Some(fonts_dir) = config.font_file.parent() {
        if let Err(e) = tokio::fs::create_dir_all(fonts_dir).await {
            warn!("Failed to create fonts directory: {}", e);
        }
    }

    let api = match TelegramClient::new(TelegramConfig::new(&config.token)) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to create Telegram client: {}", e);
            std::process::exit(1);
        }
    };

    let renderer = Arc::new(GifGenerator::new(&config.font_file));

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&api),
        renderer,
        library,
        config.inline_storage_chat_id,
        config.inline_cache_capacity,
    ));

    if config.inline_storage_chat_id.is_none() {
        info!("Inline mode disabled (INLINE_STORAGE_CHAT_ID not set)");
    }

    info!("Bot is running");

    // Long-poll loop: one spawned task per update so a slow generation
    // never stalls delivery of other users' events.
    let mut offset: Option<i64> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            result = api.get_updates(offset, config.poll_timeout_secs) => match result {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        let dispatcher = Arc::clone(&dispatcher);
                        tokio::spawn(async move {
                            dispatcher.handle_update(update).await;
                        });
                    }
                }
                Err(e) => {
                    warn!("getUpdates failed: {}", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    info!("Shutdown complete");
}
