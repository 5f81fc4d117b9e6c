//! Shared data models for the higif bot.
//!
//! This crate provides the types passed between the media pipeline and
//! the bot dispatcher:
//! - Generation variants (standard delivery vs. inline preview)
//! - Source selection (default asset, library file, user upload)
//! - Text overlay constants

pub mod overlay;
pub mod source;
pub mod variant;

// Re-export common types
pub use source::SourceSelection;
pub use variant::{Variant, VariantParseError};
