//! Generation variant definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Generation preset for a greeting GIF.
///
/// The two variants differ in geometry, frame rate, overlay placement
/// and input duration; the filter graphs themselves live in the media
/// crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Full-size GIF for direct chat delivery (512x512, full source length).
    Standard,
    /// Compact preview for inline queries (256x256, first 3 seconds).
    Inline,
}

impl Variant {
    /// Output square edge in pixels.
    pub fn size(&self) -> u32 {
        match self {
            Variant::Standard => 512,
            Variant::Inline => 256,
        }
    }

    /// Output frame rate.
    pub fn fps(&self) -> u32 {
        match self {
            Variant::Standard => 15,
            Variant::Inline => 10,
        }
    }

    /// Bottom margin of the text overlay in pixels.
    pub fn text_bottom_margin(&self) -> u32 {
        match self {
            Variant::Standard => 40,
            Variant::Inline => 30,
        }
    }

    /// Cap on the input duration in seconds, if any.
    ///
    /// Standard renders the full source; inline previews are truncated
    /// to keep generation fast enough for inline answering.
    pub fn input_duration_secs(&self) -> Option<f64> {
        match self {
            Variant::Standard => None,
            Variant::Inline => Some(3.0),
        }
    }

    /// Variant name as used in logs and metric labels.
    pub fn as_label(&self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Inline => "inline",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for Variant {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Variant::Standard),
            "inline" => Ok(Variant::Inline),
            _ => Err(VariantParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown variant: {0}")]
pub struct VariantParseError(String);
