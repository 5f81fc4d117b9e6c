//! Inline query flow.
//!
//! Inline requests always render over the default background video; the
//! resulting upload's `file_id` is cached by name so repeated queries
//! skip the transcode entirely.

use tracing::{debug, warn};

use higif_media::VideoLibrary;
use higif_models::{SourceSelection, Variant};
use higif_telegram::{InlineQuery, InlineQueryResultCachedGif, TelegramError};

use crate::api::ChatApi;
use crate::cache::InlineCache;
use crate::error::{BotError, BotResult};
use crate::render::Renderer;

/// Handle one inline query end to end. Never propagates errors; the
/// worst outcome is an empty answer.
pub async fn handle<A: ChatApi + ?Sized, R: Renderer + ?Sized>(
    api: &A,
    renderer: &R,
    cache: &InlineCache,
    library: &VideoLibrary,
    storage_chat_id: Option<i64>,
    query: &InlineQuery,
) {
    let Some(storage_chat_id) = storage_chat_id else {
        debug!("Inline mode disabled (no storage chat configured)");
        answer_empty(api, &query.id).await;
        return;
    };

    let name = query.query.trim();
    if name.is_empty() {
        return;
    }

    match resolve_file_id(api, renderer, cache, library, storage_chat_id, name).await {
        Ok(file_id) => {
            let result = InlineQueryResultCachedGif::new(format!("hi-{}", name), file_id)
                .with_title(format!("Hi {}", name))
                .with_caption(format!("Here's a hi for {} ✨", name));

            if let Err(e) = api.answer_inline_query(&query.id, vec![result], 0).await {
                warn!(query_id = %query.id, error = %e, "Failed to answer inline query");
            }
        }
        Err(e) => {
            warn!(name, error = %e, "Inline generation failed");
            answer_empty(api, &query.id).await;
        }
    }
}

/// Cached file id for a name, generating and uploading on a miss.
async fn resolve_file_id<A: ChatApi + ?Sized, R: Renderer + ?Sized>(
    api: &A,
    renderer: &R,
    cache: &InlineCache,
    library: &VideoLibrary,
    storage_chat_id: i64,
    name: &str,
) -> BotResult<String> {
    let source = library.resolve(&SourceSelection::Default).await?;

    cache
        .get_or_insert_with(name, || async {
            let artifact = renderer.generate(name, &source, Variant::Inline).await?;

            let message = api
                .send_animation(
                    storage_chat_id,
                    artifact.path(),
                    Some(&format!("Hi {}", name)),
                )
                .await?;

            // Artifact drops here; only the platform reference survives.
            message
                .animation
                .map(|a| a.file_id)
                .ok_or(BotError::Telegram(TelegramError::EmptyResult))
        })
        .await
}

async fn answer_empty<A: ChatApi + ?Sized>(api: &A, query_id: &str) {
    if let Err(e) = api.answer_inline_query(query_id, Vec::new(), 1).await {
        warn!(query_id, error = %e, "Failed to send empty inline answer");
    }
}
