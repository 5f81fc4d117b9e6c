//! Generation pipeline seam.

use std::path::Path;

use async_trait::async_trait;

use higif_media::{GifGenerator, MediaResult, TempArtifact};
use higif_models::Variant;

/// The generation operation the dispatcher consumes.
///
/// Implemented by [`GifGenerator`]; tests substitute a fake that writes
/// a stub artifact.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn generate(
        &self,
        name: &str,
        source: &Path,
        variant: Variant,
    ) -> MediaResult<TempArtifact>;
}

#[async_trait]
impl Renderer for GifGenerator {
    async fn generate(
        &self,
        name: &str,
        source: &Path,
        variant: Variant,
    ) -> MediaResult<TempArtifact> {
        GifGenerator::generate(self, name, source, variant).await
    }
}
