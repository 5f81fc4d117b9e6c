//! Minimal Telegram Bot API client for higif.
//!
//! Covers exactly the surface the bot consumes: long-polled updates,
//! text/animation sending, message editing, callback and inline query
//! answering, and file download. Requests go straight to the Bot API
//! over reqwest; responses use the standard `ok`/`result` envelope.

pub mod client;
pub mod error;
pub mod types;

pub use client::{TelegramClient, TelegramConfig};
pub use error::{TelegramError, TelegramResult};
pub use types::{
    Animation, CallbackQuery, Chat, Document, File, InlineKeyboardButton, InlineKeyboardMarkup,
    InlineQuery, InlineQueryResultCachedGif, Message, Update, User, Video,
};
