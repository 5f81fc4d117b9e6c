//! Telegram Bot API client.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{TelegramError, TelegramResult};
use crate::types::{ApiResponse, File, InlineKeyboardMarkup, InlineQueryResultCachedGif, Message, Update};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token
    pub token: String,
    /// API base URL (overridable for tests)
    pub api_base: String,
    /// Request timeout for regular calls
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl TelegramConfig {
    /// Create a config for the public Bot API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: "https://api.telegram.org".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Point the client at a different base URL (wiremock in tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }
}

/// Telegram Bot API client.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    method_base: String,
    file_base: String,
}

impl TelegramClient {
    /// Create a new client.
    pub fn new(config: TelegramConfig) -> TelegramResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("higif/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let method_base = format!("{}/bot{}", config.api_base, config.token);
        let file_base = format!("{}/file/bot{}", config.api_base, config.token);

        Ok(Self {
            http,
            method_base,
            file_base,
        })
    }

    /// POST a JSON-bodied method call and unwrap the response envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
    ) -> TelegramResult<T> {
        let url = format!("{}/{}", self.method_base, method);
        debug!(method, "Calling Bot API");

        let response = self.http.post(&url).json(payload).send().await?;
        Self::unwrap_envelope(response.json().await?)
    }

    fn unwrap_envelope<T>(envelope: ApiResponse<T>) -> TelegramResult<T> {
        if !envelope.ok {
            return Err(TelegramError::api(
                envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
                envelope.error_code,
            ));
        }
        envelope.result.ok_or(TelegramError::EmptyResult)
    }

    /// Long-poll for updates.
    ///
    /// `timeout_secs` is the server-side hold; the HTTP request timeout
    /// is extended past it so the poll is not cut short.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> TelegramResult<Vec<Update>> {
        let url = format!("{}/getUpdates", self.method_base);
        let payload = serde_json::json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query", "inline_query"],
        });

        let response = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(timeout_secs + 10))
            .json(&payload)
            .send()
            .await?;

        Self::unwrap_envelope(response.json().await?)
    }

    /// Send a text message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> TelegramResult<Message> {
        self.call(
            "sendMessage",
            &serde_json::json!({
                "chat_id": chat_id,
                "text": text,
                "reply_markup": reply_markup,
            }),
        )
        .await
    }

    /// Edit the text of a previously sent message.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> TelegramResult<Message> {
        self.call(
            "editMessageText",
            &serde_json::json!({
                "chat_id": chat_id,
                "message_id": message_id,
                "text": text,
            }),
        )
        .await
    }

    /// Acknowledge a callback query (stops the button spinner).
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> TelegramResult<bool> {
        self.call(
            "answerCallbackQuery",
            &serde_json::json!({ "callback_query_id": callback_query_id }),
        )
        .await
    }

    /// Upload and send an animation from a local file.
    ///
    /// The returned message carries the platform's `file_id` for the
    /// uploaded animation, reusable without re-uploading.
    pub async fn send_animation(
        &self,
        chat_id: i64,
        path: &Path,
        caption: Option<&str>,
    ) -> TelegramResult<Message> {
        let url = format!("{}/sendAnimation", self.method_base);
        let bytes = tokio::fs::read(path).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "animation.gif".to_string());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/gif")
            .map_err(TelegramError::Network)?;

        let mut form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("animation", part);
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }

        debug!(chat_id, path = %path.display(), "Uploading animation");

        let response = self.http.post(&url).multipart(form).send().await?;
        Self::unwrap_envelope(response.json().await?)
    }

    /// Answer an inline query with cached GIF results.
    pub async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: &[InlineQueryResultCachedGif],
        cache_time: u32,
    ) -> TelegramResult<bool> {
        self.call(
            "answerInlineQuery",
            &serde_json::json!({
                "inline_query_id": inline_query_id,
                "results": results,
                "cache_time": cache_time,
            }),
        )
        .await
    }

    /// Download a file by `file_id` to a local destination.
    pub async fn download_file(&self, file_id: &str, dest: &Path) -> TelegramResult<()> {
        let file: File = self
            .call("getFile", &serde_json::json!({ "file_id": file_id }))
            .await?;

        let file_path = file.file_path.ok_or(TelegramError::MissingFilePath)?;
        let url = format!("{}/{}", self.file_base, file_path);

        let response = self.http.get(&url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;

        debug!(file_id, dest = %dest.display(), size = bytes.len(), "Downloaded file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> TelegramClient {
        let config = TelegramConfig::new("TEST_TOKEN").with_api_base(server.uri());
        TelegramClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_send_message_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST_TOKEN/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 42,
                "text": "hello"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {"message_id": 5, "chat": {"id": 42}}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let message = client.send_message(42, "hello", None).await.unwrap();
        assert_eq!(message.message_id, 5);
    }

    #[tokio::test]
    async fn test_api_error_is_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST_TOKEN/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.send_message(42, "hello", None).await.unwrap_err();
        match err {
            TelegramError::Api {
                description,
                error_code,
            } => {
                assert!(description.contains("chat not found"));
                assert_eq!(error_code, Some(400));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_get_updates_passes_offset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST_TOKEN/getUpdates"))
            .and(body_partial_json(serde_json::json!({ "offset": 11 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [{"update_id": 11}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let updates = client.get_updates(Some(11), 0).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 11);
    }

    #[tokio::test]
    async fn test_download_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST_TOKEN/getFile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {"file_id": "abc", "file_path": "videos/file_1.mp4"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/file/botTEST_TOKEN/videos/file_1.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"videobytes".to_vec()))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("source.mp4");

        client.download_file("abc", &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"videobytes");
    }
}
