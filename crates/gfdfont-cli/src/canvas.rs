use anyhow::{bail, Context, Result};
use gfdfont::{Point, TextRenderer};
use image::{Rgba, RgbaImage};

/// Parse `RRGGBB` or `RRGGBBAA`, with an optional leading `#`.
pub fn parse_color(s: &str) -> Result<Rgba<u8>> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        bail!("color '{s}' must be RRGGBB or RRGGBBAA");
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).with_context(|| format!("invalid color '{s}'"))
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xFF };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// Turn typed `\n` escapes and plain newlines into the CRLF breaks the renderer splits on.
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\\n", "\n")
        .replace("\r\n", "\n")
        .replace('\n', "\r\n")
}

/// Render `text` onto a background-filled canvas sized to fit it.
pub fn render_to_image(
    renderer: &TextRenderer,
    text: &str,
    color: Rgba<u8>,
    background: Rgba<u8>,
) -> RgbaImage {
    let size = renderer.measure(text);
    let width = size.width.max(1) as u32;
    let height = size.height.max(1) as u32;
    log::debug!("canvas {width}x{height} for {} code points", text.chars().count());
    let mut canvas = RgbaImage::from_pixel(width, height, background);
    renderer.draw(&mut canvas, text, Point::new(0, 0), color);
    canvas
}
