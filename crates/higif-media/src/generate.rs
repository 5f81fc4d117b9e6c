//! Greeting GIF generation pipeline.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use higif_models::Variant;

use crate::artifact::TempArtifact;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::build_variant_filter;
use crate::metrics::record_generation;

/// Greeting GIF generator.
///
/// One `generate` call runs exactly one FFmpeg invocation; callers that
/// want deduplication (inline mode) layer it on top.
#[derive(Debug, Clone)]
pub struct GifGenerator {
    font_file: PathBuf,
    runner: FfmpegRunner,
}

impl GifGenerator {
    /// Create a generator using the given overlay font.
    pub fn new(font_file: impl AsRef<Path>) -> Self {
        Self {
            font_file: font_file.as_ref().to_path_buf(),
            runner: FfmpegRunner::new(),
        }
    }

    /// Cap each FFmpeg run at the given number of seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.runner = self.runner.clone().with_timeout(secs);
        self
    }

    /// Render a "Hi {name}" GIF over the source video.
    ///
    /// Returns a [`TempArtifact`] whose file is deleted when dropped; on
    /// failure any partial output is removed before the error is
    /// reported.
    pub async fn generate(
        &self,
        name: &str,
        source: &Path,
        variant: Variant,
    ) -> MediaResult<TempArtifact> {
        if !source.exists() {
            return Err(MediaError::SourceNotFound(source.to_path_buf()));
        }

        let artifact = TempArtifact::allocate(".gif")?;
        let filter = build_variant_filter(&self.font_file, name, variant);

        let mut cmd = FfmpegCommand::new(source, artifact.path())
            .video_filter(filter)
            .frame_rate(variant.fps())
            .loop_forever();

        if let Some(duration) = variant.input_duration_secs() {
            cmd = cmd.input_duration(duration);
        }

        debug!(variant = %variant, source = %source.display(), "Generating greeting GIF");

        let result = self.run_and_verify(&cmd, &artifact).await;
        record_generation(variant, result.is_ok());

        // On error the artifact guard drops here, removing partial output.
        result?;

        info!(
            variant = %variant,
            output = %artifact.path().display(),
            size = artifact.len().unwrap_or(0),
            "Generated greeting GIF"
        );

        Ok(artifact)
    }

    async fn run_and_verify(&self, cmd: &FfmpegCommand, artifact: &TempArtifact) -> MediaResult<()> {
        self.runner.run(cmd).await?;

        // FFmpeg can exit zero without producing usable output.
        if artifact.is_empty() {
            return Err(MediaError::transcode_failed(
                "FFmpeg completed but produced no output",
                None,
                None,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_source_fails_without_spawning() {
        let generator = GifGenerator::new("fonts/font.ttf");
        let err = generator
            .generate("Ana", Path::new("/nonexistent/clip.mp4"), Variant::Standard)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::SourceNotFound(_)));
    }
}
