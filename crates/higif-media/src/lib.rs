//! FFmpeg CLI wrapper for greeting GIF generation.
//!
//! Provides the media generation pipeline of the higif bot:
//! - FFmpeg command builder and runner (`command`)
//! - Crop/scale/pad/drawtext filter graph construction (`filters`)
//! - Temp artifact lifecycle with guaranteed cleanup (`artifact`)
//! - Background video library and source resolution (`library`)
//! - The public `GifGenerator` entry point (`generate`)

pub mod artifact;
pub mod command;
pub mod error;
pub mod filters;
pub mod generate;
pub mod library;
pub mod metrics;

pub use artifact::TempArtifact;
pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use generate::GifGenerator;
pub use library::{VideoLibrary, DEFAULT_VIDEO};
