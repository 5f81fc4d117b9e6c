//! Telegram Bot API object models (simplified to the fields higif uses).

use serde::{Deserialize, Serialize};

/// Standard Bot API response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

/// An incoming update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
    pub inline_query: Option<InlineQuery>,
}

/// A chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub video: Option<Video>,
    pub animation: Option<Animation>,
    pub document: Option<Document>,
}

impl Message {
    /// File id of the first video-like attachment, if any.
    ///
    /// Documents count only when their MIME type is a video type.
    pub fn video_file_id(&self) -> Option<&str> {
        if let Some(video) = &self.video {
            return Some(&video.file_id);
        }
        if let Some(animation) = &self.animation {
            return Some(&animation.file_id);
        }
        if let Some(document) = &self.document {
            if document
                .mime_type
                .as_deref()
                .is_some_and(|m| m.contains("video"))
            {
                return Some(&document.file_id);
            }
        }
        None
    }

    /// Whether the message carries any attachment at all.
    pub fn has_attachment(&self) -> bool {
        self.video.is_some() || self.animation.is_some() || self.document.is_some()
    }
}

/// A chat.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A Telegram user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
}

/// A video attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub file_id: String,
    pub mime_type: Option<String>,
}

/// An animation (GIF) attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct Animation {
    pub file_id: String,
    pub mime_type: Option<String>,
}

/// A document attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

/// A callback query from an inline keyboard button.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

/// An inline query.
#[derive(Debug, Clone, Deserialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    pub query: String,
}

/// A downloadable file handle from `getFile`.
#[derive(Debug, Clone, Deserialize)]
pub struct File {
    pub file_id: String,
    pub file_path: Option<String>,
}

/// Inline keyboard markup for outbound messages.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// One button per row.
    pub fn from_column(buttons: Vec<InlineKeyboardButton>) -> Self {
        Self {
            inline_keyboard: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }
}

/// A single inline keyboard button carrying callback data.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: data.into(),
        }
    }
}

/// An inline query result reusing an already-uploaded GIF.
#[derive(Debug, Clone, Serialize)]
pub struct InlineQueryResultCachedGif {
    #[serde(rename = "type")]
    pub result_type: &'static str,
    pub id: String,
    pub gif_file_id: String,
    pub title: Option<String>,
    pub caption: Option<String>,
}

impl InlineQueryResultCachedGif {
    pub fn new(id: impl Into<String>, gif_file_id: impl Into<String>) -> Self {
        Self {
            result_type: "gif",
            id: id.into(),
            gif_file_id: gif_file_id.into(),
            title: None,
            caption: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_with_text_message() {
        let update: Update = serde_json::from_value(serde_json::json!({
            "update_id": 10,
            "message": {
                "message_id": 1,
                "chat": {"id": 42, "type": "private"},
                "from": {"id": 7, "is_bot": false, "first_name": "Ana"},
                "text": "hello"
            }
        }))
        .unwrap();

        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("hello"));
        assert!(message.video_file_id().is_none());
    }

    #[test]
    fn test_video_file_id_prefers_video_over_document() {
        let message: Message = serde_json::from_value(serde_json::json!({
            "message_id": 1,
            "chat": {"id": 42},
            "video": {"file_id": "vid-1", "mime_type": "video/mp4"},
            "document": {"file_id": "doc-1", "mime_type": "video/quicktime"}
        }))
        .unwrap();

        assert_eq!(message.video_file_id(), Some("vid-1"));
    }

    #[test]
    fn test_non_video_document_is_not_a_source() {
        let message: Message = serde_json::from_value(serde_json::json!({
            "message_id": 1,
            "chat": {"id": 42},
            "document": {"file_id": "doc-1", "mime_type": "application/pdf"}
        }))
        .unwrap();

        assert!(message.has_attachment());
        assert!(message.video_file_id().is_none());
    }

    #[test]
    fn test_cached_gif_result_serialization() {
        let result = InlineQueryResultCachedGif::new("hi-Ana", "file-123")
            .with_title("Hi Ana")
            .with_caption("Here's a hi for Ana");

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["type"], "gif");
        assert_eq!(value["gif_file_id"], "file-123");
        assert_eq!(value["title"], "Hi Ana");
    }
}
