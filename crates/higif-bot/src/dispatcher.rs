//! Update dispatch and the conversation state machine.
//!
//! One `handle_update` call fully handles one inbound event. The polling
//! loop spawns a task per update; per-user ordering comes from the
//! session slot mutex, which each message handler holds for the whole
//! handling, generation included.

use std::sync::Arc;

use tracing::{debug, warn};

use higif_media::{MediaError, TempArtifact, VideoLibrary};
use higif_telegram::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update,
};
use higif_models::SourceSelection;

use crate::api::ChatApi;
use crate::cache::InlineCache;
use crate::error::{BotError, BotResult};
use crate::render::Renderer;
use crate::session::{Session, SessionStore};
use crate::{greet, inline};

/// Callback data prefix for library selections.
const LIBRARY_CALLBACK_PREFIX: &str = "base:";

/// Event dispatcher. One per process, shared across update tasks.
pub struct Dispatcher<A, R> {
    api: Arc<A>,
    renderer: Arc<R>,
    library: VideoLibrary,
    sessions: SessionStore,
    cache: InlineCache,
    inline_storage_chat_id: Option<i64>,
}

impl<A: ChatApi, R: Renderer> Dispatcher<A, R> {
    pub fn new(
        api: Arc<A>,
        renderer: Arc<R>,
        library: VideoLibrary,
        inline_storage_chat_id: Option<i64>,
        inline_cache_capacity: usize,
    ) -> Self {
        Self {
            api,
            renderer,
            library,
            sessions: SessionStore::new(),
            cache: InlineCache::new(inline_cache_capacity),
            inline_storage_chat_id,
        }
    }

    /// Session store (exposed for tests and diagnostics).
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Inline cache (exposed for tests and diagnostics).
    pub fn cache(&self) -> &InlineCache {
        &self.cache
    }

    /// Handle one inbound update. Never panics or propagates errors.
    pub async fn handle_update(&self, update: Update) {
        if let Some(query) = &update.inline_query {
            inline::handle(
                self.api.as_ref(),
                self.renderer.as_ref(),
                &self.cache,
                &self.library,
                self.inline_storage_chat_id,
                query,
            )
            .await;
        } else if let Some(callback) = &update.callback_query {
            self.handle_callback(callback).await;
        } else if let Some(message) = &update.message {
            self.handle_message(message).await;
        }
    }

    async fn handle_message(&self, message: &Message) {
        let Some(user) = &message.from else { return };
        if user.is_bot {
            return;
        }
        let chat_id = message.chat.id;

        let outcome = match message.text.as_deref() {
            Some(text) => match command_of(text) {
                Some("/start") => self.cmd_start(user.id, chat_id).await,
                Some("/default") => self.cmd_default(user.id, chat_id).await,
                Some("/cancel") => self.cmd_cancel(user.id, chat_id).await,
                // Unknown commands belong to other collaborators.
                Some(_) => Ok(()),
                None => self.on_text(user.id, chat_id, text).await,
            },
            None if message.has_attachment() => self.on_media(user.id, chat_id, message).await,
            None => Ok(()),
        };

        if let Err(e) = outcome {
            warn!(user_id = user.id, error = %e, "Message handling failed");
            self.end_session(user.id).await;
            if let Err(e) = self.api.send_message(chat_id, &e.user_message(), None).await {
                warn!(chat_id, error = %e, "Failed to send error reply");
            }
        }

        self.sessions.release(user.id);
    }

    async fn handle_callback(&self, callback: &CallbackQuery) {
        if let Err(e) = self.api.answer_callback_query(&callback.id).await {
            debug!(callback_id = %callback.id, error = %e, "Failed to ack callback");
        }

        let Some(filename) = callback
            .data
            .as_deref()
            .and_then(|d| d.strip_prefix(LIBRARY_CALLBACK_PREFIX))
        else {
            return;
        };
        let Some(origin) = &callback.message else {
            return;
        };
        let (chat_id, message_id) = (origin.chat.id, origin.message_id);
        let user_id = callback.from.id;

        let outcome = self
            .on_library_choice(user_id, chat_id, message_id, filename)
            .await;

        if let Err(e) = outcome {
            warn!(user_id, error = %e, "Library selection failed");
            self.end_session(user_id).await;
            if let Err(e) = self
                .api
                .edit_message_text(chat_id, message_id, &e.user_message())
                .await
            {
                warn!(chat_id, error = %e, "Failed to edit error reply");
            }
        }

        self.sessions.release(user_id);
    }

    /// `/start`: open (or restart) a session and ask for the name.
    async fn cmd_start(&self, user_id: i64, chat_id: i64) -> BotResult<()> {
        let slot = self.sessions.slot(user_id);
        let mut session = slot.lock().await;
        *session = Some(Session::AwaitingName);

        self.api
            .send_message(
                chat_id,
                "Hey 👋\nWho do you want to say hi to?\n\nSend me their name:",
                None,
            )
            .await?;
        Ok(())
    }

    /// `/cancel`: discard the session, if any.
    async fn cmd_cancel(&self, user_id: i64, chat_id: i64) -> BotResult<()> {
        let slot = self.sessions.slot(user_id);
        let mut session = slot.lock().await;
        if session.take().is_none() {
            return Ok(());
        }

        self.api
            .send_message(
                chat_id,
                "Cancelled. Use /start whenever you're ready again.",
                None,
            )
            .await?;
        Ok(())
    }

    /// Plain text: only meaningful while a name is awaited.
    async fn on_text(&self, user_id: i64, chat_id: i64, text: &str) -> BotResult<()> {
        let slot = self.sessions.slot(user_id);
        let mut session = slot.lock().await;

        match session.as_ref() {
            Some(Session::AwaitingName) => {}
            // No conversation, or already waiting for a source: not ours.
            None | Some(Session::AwaitingSource { .. }) => return Ok(()),
        }

        let name = text.trim();
        if name.is_empty() {
            self.api
                .send_message(chat_id, "Send a real name, not an empty message 😅", None)
                .await?;
            return Ok(());
        }

        *session = Some(Session::AwaitingSource {
            name: name.to_string(),
        });

        let videos = self.library.list().await?;
        if videos.is_empty() {
            self.api
                .send_message(
                    chat_id,
                    &format!(
                        "Nice. I'll say hi to {}.\n\nNow send me a video to use as background, \
                         or send /default to use the default cat.",
                        name
                    ),
                    None,
                )
                .await?;
        } else {
            let buttons = videos
                .iter()
                .map(|filename| {
                    let label = filename
                        .rsplit_once('.')
                        .map(|(stem, _)| stem)
                        .unwrap_or(filename);
                    InlineKeyboardButton::callback(
                        label,
                        format!("{}{}", LIBRARY_CALLBACK_PREFIX, filename),
                    )
                })
                .collect();

            self.api
                .send_message(
                    chat_id,
                    &format!(
                        "Nice. I'll say hi to {}.\n\nNow either:\n\
                         • Send me a video (MP4/GIF) to use as background\n\
                         • Or tap one of my cats below\n\
                         • Or send /default to use the default cat",
                        name
                    ),
                    Some(InlineKeyboardMarkup::from_column(buttons)),
                )
                .await?;
        }

        Ok(())
    }

    /// `/default`: generate over the default background.
    async fn cmd_default(&self, user_id: i64, chat_id: i64) -> BotResult<()> {
        let slot = self.sessions.slot(user_id);
        let mut session = slot.lock().await;

        let name = match session.take() {
            Some(Session::AwaitingSource { name }) => name,
            // No name collected yet: same as no session at all.
            Some(Session::AwaitingName) | None => return Err(BotError::SessionMissing),
        };

        let source = match self.library.resolve(&SourceSelection::Default).await {
            Ok(path) => path,
            Err(MediaError::SourceNotFound(_)) => {
                self.api
                    .send_message(
                        chat_id,
                        "default.mp4 is missing in base_videos/. Add it and try again.",
                        None,
                    )
                    .await?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.api
            .send_message(chat_id, "Using the default cat… 🐱", None)
            .await?;

        greet::deliver(
            self.api.as_ref(),
            self.renderer.as_ref(),
            chat_id,
            &name,
            &source,
        )
        .await
    }

    /// A video-like upload while a source is awaited.
    async fn on_media(&self, user_id: i64, chat_id: i64, message: &Message) -> BotResult<()> {
        let slot = self.sessions.slot(user_id);
        let mut session = slot.lock().await;

        let name = match session.as_ref() {
            Some(Session::AwaitingSource { name }) => name.clone(),
            // A stray upload while the name is awaited is not ours.
            Some(Session::AwaitingName) => return Ok(()),
            None => return Err(BotError::SessionMissing),
        };

        let Some(file_id) = message.video_file_id() else {
            // Unsupported attachment: re-prompt, keep the session.
            self.api
                .send_message(chat_id, "Send a valid video or use /default.", None)
                .await?;
            return Ok(());
        };

        *session = None;

        // Materialize the upload; its own guard removes it after handling.
        let upload = TempArtifact::allocate(".mp4")?;
        self.api.download_file(file_id, upload.path()).await?;

        self.api
            .send_message(chat_id, "Got your video. Generating your GIF… 🎬", None)
            .await?;

        let source = self
            .library
            .resolve(&SourceSelection::Upload(upload.path().to_path_buf()))
            .await?;

        greet::deliver(
            self.api.as_ref(),
            self.renderer.as_ref(),
            chat_id,
            &name,
            &source,
        )
        .await
    }

    /// A `base:<filename>` keyboard selection while a source is awaited.
    async fn on_library_choice(
        &self,
        user_id: i64,
        chat_id: i64,
        message_id: i64,
        filename: &str,
    ) -> BotResult<()> {
        let slot = self.sessions.slot(user_id);
        let mut session = slot.lock().await;

        let name = match session.take() {
            Some(Session::AwaitingSource { name }) => name,
            Some(Session::AwaitingName) | None => return Err(BotError::SessionMissing),
        };

        let source = self
            .library
            .resolve(&SourceSelection::Library(filename.to_string()))
            .await?;

        self.api
            .edit_message_text(
                chat_id,
                message_id,
                &format!("Nice choice. Generating your GIF with {}… 🎬", filename),
            )
            .await?;

        greet::deliver(
            self.api.as_ref(),
            self.renderer.as_ref(),
            chat_id,
            &name,
            &source,
        )
        .await
    }

    async fn end_session(&self, user_id: i64) {
        let slot = self.sessions.slot(user_id);
        *slot.lock().await = None;
    }
}

/// First whitespace-separated token if the text is a command.
fn command_of(text: &str) -> Option<&str> {
    let first = text.trim().split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    // Commands may arrive as "/start@botname" in group chats.
    Some(first.split('@').next().unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_of() {
        assert_eq!(command_of("/start"), Some("/start"));
        assert_eq!(command_of("  /cancel  "), Some("/cancel"));
        assert_eq!(command_of("/start@higif_bot"), Some("/start"));
        assert_eq!(command_of("/default extra words"), Some("/default"));
        assert_eq!(command_of("Ana"), None);
        assert_eq!(command_of(""), None);
    }
}
