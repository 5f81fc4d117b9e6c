//! Background video source selection.

use std::path::PathBuf;

/// Where the background video for one generation comes from.
///
/// Exists only for the duration of handling a single event; uploads are
/// materialized to a temp path by the Telegram file download before a
/// selection is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    /// The well-known default asset in the video library.
    Default,
    /// A named file from the video library, matched by exact filename.
    Library(String),
    /// A user upload, already downloaded to a local path.
    Upload(PathBuf),
}

impl SourceSelection {
    /// Short description for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceSelection::Default => "default",
            SourceSelection::Library(_) => "library",
            SourceSelection::Upload(_) => "upload",
        }
    }
}
