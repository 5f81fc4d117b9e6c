//! Text overlay constants shared by both variants.

/// Overlay fill color.
pub const TEXT_COLOR: &str = "white";

/// Overlay outline color.
pub const BORDER_COLOR: &str = "black";

/// Overlay outline width in pixels.
pub const BORDER_WIDTH: u32 = 3;

/// Overlay font size.
pub const FONT_SIZE: u32 = 48;

/// Build the overlay text for a name.
///
/// Single quotes are stripped because the text is spliced into a quoted
/// drawtext argument; other drawtext-special characters are passed
/// through unchanged.
pub fn greeting_text(name: &str) -> String {
    format!("Hi {}", name).replace('\'', "")
}
