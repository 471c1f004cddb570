//! gfdfont: GFD bitmap font toolkit.
//! Features: version sniffing, versioned table parsing, atlas based text measurement and drawing.

mod error;
pub mod glyph;
pub mod identify;
mod options;
pub mod reader;
pub mod render;
mod table;
pub use error::{FontError, Result};
pub use glyph::{unpack_pair, CharSize, GlyphEntry, GlyphRect};
pub use identify::{identify, identify_bytes, Ident};
pub use options::RendererOptions;
pub use render::{recolor, Placement, Point, Size, TextRenderer};
pub use table::{FontHeader, FontTable, HeaderA, HeaderB};

// Test utilities
pub mod test_support;

use image::RgbaImage;

/// Anything glyph bitmaps can be composited onto.
pub trait Surface {
    /// Blend `glyph` over the surface with its top-left corner at `(x, y)`.
    /// Parts falling outside the surface are clipped.
    fn composite(&mut self, glyph: &RgbaImage, x: i64, y: i64);
}

impl Surface for RgbaImage {
    fn composite(&mut self, glyph: &RgbaImage, x: i64, y: i64) {
        image::imageops::overlay(self, glyph, x, y);
    }
}
