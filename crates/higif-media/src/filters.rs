//! FFmpeg filter graph construction.
//!
//! Both variants share the same drawtext overlay (fixed font, white fill,
//! black outline, horizontally centered) and differ in geometry, margin
//! and frame rate.

use std::path::Path;

use higif_models::overlay::{greeting_text, BORDER_COLOR, BORDER_WIDTH, FONT_SIZE, TEXT_COLOR};
use higif_models::Variant;

/// Build the drawtext overlay for already-sanitized text.
///
/// The text is spliced between single quotes; `greeting_text` strips
/// quotes from the name beforehand. Backslashes and colons in a name are
/// not escaped and can still corrupt the argument.
pub fn drawtext_filter(font_file: &Path, text: &str, bottom_margin: u32) -> String {
    format!(
        "drawtext=fontfile='{}':text='{}':fontcolor={}:fontsize={}:borderw={}:bordercolor={}:x=(w-text_w)/2:y=h-text_h-{}",
        font_file.display(),
        text,
        TEXT_COLOR,
        FONT_SIZE,
        BORDER_WIDTH,
        BORDER_COLOR,
        bottom_margin,
    )
}

/// Square-crop to the minimum input dimension, then scale.
fn standard_geometry(size: u32) -> String {
    format!("crop=min(iw\\,ih):min(iw\\,ih),scale={}:{}", size, size)
}

/// Scale to fit inside the square, pad the remainder with centered placement.
fn inline_geometry(size: u32) -> String {
    format!(
        "scale={s}:{s}:force_original_aspect_ratio=decrease,pad={s}:{s}:({s}-iw)/2:({s}-ih)/2",
        s = size
    )
}

/// Build the full video filter for a variant.
pub fn build_variant_filter(font_file: &Path, name: &str, variant: Variant) -> String {
    let text = greeting_text(name);
    let drawtext = drawtext_filter(font_file, &text, variant.text_bottom_margin());

    let geometry = match variant {
        Variant::Standard => standard_geometry(variant.size()),
        Variant::Inline => inline_geometry(variant.size()),
    };

    format!("{},{}", geometry, drawtext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn font() -> PathBuf {
        PathBuf::from("fonts/font.ttf")
    }

    #[test]
    fn test_standard_filter_geometry() {
        let filter = build_variant_filter(&font(), "Ana", Variant::Standard);
        assert!(filter.starts_with("crop=min(iw\\,ih):min(iw\\,ih),scale=512:512,"));
        assert!(filter.contains("text='Hi Ana'"));
        assert!(filter.contains("y=h-text_h-40"));
    }

    #[test]
    fn test_inline_filter_geometry() {
        let filter = build_variant_filter(&font(), "Ana", Variant::Inline);
        assert!(filter.contains("scale=256:256:force_original_aspect_ratio=decrease"));
        assert!(filter.contains("pad=256:256:(256-iw)/2:(256-ih)/2"));
        assert!(filter.contains("y=h-text_h-30"));
    }

    #[test]
    fn test_quotes_stripped_from_name() {
        let filter = build_variant_filter(&font(), "O'Brien", Variant::Standard);
        assert!(filter.contains("text='Hi OBrien'"));
    }

    #[test]
    fn test_drawtext_constants() {
        let drawtext = drawtext_filter(&font(), "Hi Ana", 40);
        assert!(drawtext.contains("fontcolor=white"));
        assert!(drawtext.contains("fontsize=48"));
        assert!(drawtext.contains("borderw=3:bordercolor=black"));
        assert!(drawtext.contains("x=(w-text_w)/2"));
    }
}
