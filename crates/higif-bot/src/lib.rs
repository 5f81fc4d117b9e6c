//! Telegram bot that renders personalized greeting GIFs.
//!
//! Wires the conversation state machine, the media pipeline and the
//! inline cache behind a long-polling dispatcher. The chat platform and
//! the generator are consumed through the `ChatApi` and `Renderer`
//! seams so the dispatch logic is testable without network or FFmpeg.

pub mod api;
pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod greet;
pub mod inline;
pub mod render;
pub mod session;

pub use api::ChatApi;
pub use cache::InlineCache;
pub use config::BotConfig;
pub use dispatcher::Dispatcher;
pub use error::{BotError, BotResult};
pub use render::Renderer;
pub use session::{Session, SessionStore};
