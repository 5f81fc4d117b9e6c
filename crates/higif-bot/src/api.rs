//! Chat platform seam.

use std::path::Path;

use async_trait::async_trait;

use higif_telegram::{
    InlineKeyboardMarkup, InlineQueryResultCachedGif, Message, TelegramClient, TelegramResult,
};

/// The outbound chat operations the bot consumes.
///
/// Implemented by [`TelegramClient`]; tests substitute a recording fake.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> TelegramResult<Message>;

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> TelegramResult<()>;

    async fn answer_callback_query(&self, callback_query_id: &str) -> TelegramResult<()>;

    /// Upload an animation; the returned message carries its `file_id`.
    async fn send_animation(
        &self,
        chat_id: i64,
        path: &Path,
        caption: Option<&str>,
    ) -> TelegramResult<Message>;

    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: Vec<InlineQueryResultCachedGif>,
        cache_time: u32,
    ) -> TelegramResult<()>;

    async fn download_file(&self, file_id: &str, dest: &Path) -> TelegramResult<()>;
}

#[async_trait]
impl ChatApi for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> TelegramResult<Message> {
        TelegramClient::send_message(self, chat_id, text, reply_markup.as_ref()).await
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> TelegramResult<()> {
        TelegramClient::edit_message_text(self, chat_id, message_id, text).await?;
        Ok(())
    }

    async fn answer_callback_query(&self, callback_query_id: &str) -> TelegramResult<()> {
        TelegramClient::answer_callback_query(self, callback_query_id).await?;
        Ok(())
    }

    async fn send_animation(
        &self,
        chat_id: i64,
        path: &Path,
        caption: Option<&str>,
    ) -> TelegramResult<Message> {
        TelegramClient::send_animation(self, chat_id, path, caption).await
    }

    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: Vec<InlineQueryResultCachedGif>,
        cache_time: u32,
    ) -> TelegramResult<()> {
        TelegramClient::answer_inline_query(self, inline_query_id, &results, cache_time).await?;
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> TelegramResult<()> {
        TelegramClient::download_file(self, file_id, dest).await
    }
}
