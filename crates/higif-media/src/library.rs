//! Background video library and source resolution.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use higif_models::SourceSelection;

use crate::error::{MediaError, MediaResult};

/// Filename of the default background asset.
pub const DEFAULT_VIDEO: &str = "default.mp4";

/// Extensions recognized as background videos.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv"];

/// Directory of named background videos.
#[derive(Debug, Clone)]
pub struct VideoLibrary {
    dir: PathBuf,
}

impl VideoLibrary {
    /// Create a library over the given directory.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Library directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the library directory if missing.
    pub async fn ensure_exists(&self) -> MediaResult<()> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Path of the default background asset.
    pub fn default_path(&self) -> PathBuf {
        self.dir.join(DEFAULT_VIDEO)
    }

    /// List selectable library videos, sorted by filename.
    ///
    /// The default asset is not offered as a named option.
    pub async fn list(&self) -> MediaResult<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name == DEFAULT_VIDEO {
                continue;
            }
            let is_video = Path::new(&name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false);
            if is_video {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    /// Resolve a source selection to a validated filesystem path.
    pub async fn resolve(&self, selection: &SourceSelection) -> MediaResult<PathBuf> {
        let path = match selection {
            SourceSelection::Default => self.default_path(),
            SourceSelection::Library(filename) => {
                // Selections arrive as callback data; refuse anything
                // that could escape the library directory.
                if !is_plain_filename(filename) {
                    return Err(MediaError::SourceNotFound(self.dir.join(filename)));
                }
                self.dir.join(filename)
            }
            SourceSelection::Upload(path) => path.clone(),
        };

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(MediaError::SourceNotFound(path));
        }

        debug!(kind = selection.kind(), path = %path.display(), "Resolved source video");
        Ok(path)
    }
}

/// A single path component with no traversal.
fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn library_with(files: &[&str]) -> (TempDir, VideoLibrary) {
        let dir = TempDir::new().unwrap();
        for file in files {
            fs::write(dir.path().join(file), b"video").await.unwrap();
        }
        let library = VideoLibrary::new(dir.path());
        (dir, library)
    }

    #[tokio::test]
    async fn test_list_excludes_default_and_non_videos() {
        let (_dir, library) =
            library_with(&["cat.mp4", "dog.mov", "default.mp4", "notes.txt"]).await;

        let names = library.list().await.unwrap();
        assert_eq!(names, vec!["cat.mp4", "dog.mov"]);
    }

    #[tokio::test]
    async fn test_resolve_default() {
        let (_dir, library) = library_with(&["default.mp4"]).await;
        let path = library.resolve(&SourceSelection::Default).await.unwrap();
        assert_eq!(path, library.default_path());
    }

    #[tokio::test]
    async fn test_resolve_missing_default() {
        let (_dir, library) = library_with(&[]).await;
        let err = library.resolve(&SourceSelection::Default).await.unwrap_err();
        assert!(matches!(err, MediaError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_missing_library_file() {
        let (_dir, library) = library_with(&["cat.mp4"]).await;
        let err = library
            .resolve(&SourceSelection::Library("gone.mp4".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let (_dir, library) = library_with(&["cat.mp4"]).await;
        let err = library
            .resolve(&SourceSelection::Library("../cat.mp4".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_upload_path() {
        let (dir, library) = library_with(&[]).await;
        let upload = dir.path().join("upload.mp4");
        fs::write(&upload, b"video").await.unwrap();

        let path = library
            .resolve(&SourceSelection::Upload(upload.clone()))
            .await
            .unwrap();
        assert_eq!(path, upload);
    }
}
