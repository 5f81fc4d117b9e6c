//! Temp artifact lifecycle.
//!
//! A generated GIF lives only long enough to be delivered or uploaded;
//! the guard deletes it on drop, on every exit path. Cleanup is
//! best-effort and never surfaces an error.

use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::MediaResult;

/// RAII guard over a generated (or about to be generated) temp file.
///
/// The path is allocated before FFmpeg runs so a failed transcode's
/// partial output is removed along with the guard.
#[derive(Debug)]
pub struct TempArtifact {
    file: NamedTempFile,
}

impl TempArtifact {
    /// Allocate a fresh temp file with the given suffix (e.g. ".gif").
    pub fn allocate(suffix: &str) -> MediaResult<Self> {
        let file = tempfile::Builder::new()
            .prefix("higif-")
            .suffix(suffix)
            .tempfile()?;
        Ok(Self { file })
    }

    /// Path of the artifact.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Size of the artifact in bytes.
    pub fn len(&self) -> MediaResult<u64> {
        Ok(std::fs::metadata(self.path())?.len())
    }

    /// Whether the artifact is empty (or missing).
    pub fn is_empty(&self) -> bool {
        self.len().map(|len| len == 0).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_artifact_deleted_on_drop() {
        let artifact = TempArtifact::allocate(".gif").unwrap();
        let path: PathBuf = artifact.path().to_path_buf();
        assert!(path.exists());

        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn test_artifact_empty_until_written() {
        let artifact = TempArtifact::allocate(".gif").unwrap();
        assert!(artifact.is_empty());

        std::fs::write(artifact.path(), b"GIF89a").unwrap();
        assert!(!artifact.is_empty());
        assert_eq!(artifact.len().unwrap(), 6);
    }

    #[test]
    fn test_artifact_suffix() {
        let artifact = TempArtifact::allocate(".gif").unwrap();
        assert_eq!(
            artifact.path().extension().and_then(|e| e.to_str()),
            Some("gif")
        );
    }
}
