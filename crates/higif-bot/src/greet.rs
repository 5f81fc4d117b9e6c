//! Standard delivery flow.

use std::path::Path;

use tracing::warn;

use higif_models::Variant;

use crate::api::ChatApi;
use crate::error::BotResult;
use crate::render::Renderer;

/// Generate a standard-variant GIF and deliver it to the chat.
///
/// The artifact guard drops when this returns, deleting the file on the
/// success path and on every failure path, including a delivery failure
/// after a successful transcode.
pub async fn deliver<A: ChatApi + ?Sized, R: Renderer + ?Sized>(
    api: &A,
    renderer: &R,
    chat_id: i64,
    name: &str,
    source: &Path,
) -> BotResult<()> {
    let artifact = renderer.generate(name, source, Variant::Standard).await?;

    api.send_animation(
        chat_id,
        artifact.path(),
        Some(&format!("Here's a hi for {} ✨", name)),
    )
    .await?;

    if let Err(e) = api
        .send_message(chat_id, "Done. Just forward this GIF to them. 😉", None)
        .await
    {
        // The GIF itself went out; the follow-up is cosmetic.
        warn!(chat_id, error = %e, "Failed to send delivery follow-up");
    }

    Ok(())
}
