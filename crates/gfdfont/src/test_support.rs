//! Test support utilities for gfdfont.
//!
//! This module provides helper types and functions that are useful for testing
//! font parsing and rendering, but are not part of the public API.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::{
    identify::{VERSION_A, VERSION_B},
    CharSize, GlyphEntry, GlyphRect, Ident, RendererOptions, Surface,
};

/// Inverse of [`crate::unpack_pair`]: big-endian ordered field from two 12-bit halves.
pub fn pack_pair(high: u16, low: u16) -> [u8; 3] {
    let value = (u32::from(high & 0xFFF) << 12) | u32::from(low & 0xFFF);
    let [_, a, b, c] = value.to_be_bytes();
    [a, b, c]
}

/// Packed pair in the byte order GFD files store it.
fn stored_pair(high: u16, low: u16) -> [u8; 3] {
    let [a, b, c] = pack_pair(high, low);
    [c, b, a]
}

/// Convenience constructor for a glyph entry without corrections.
pub fn glyph(
    ch: char,
    texture_index: u8,
    rect: (u16, u16, u16, u16),
    advance_width: u16,
) -> GlyphEntry {
    let (x, y, width, height) = rect;
    GlyphEntry {
        character: u32::from(ch),
        texture_index,
        glyph_rect: GlyphRect {
            x,
            y,
            width,
            height,
        },
        advance_width,
        char_size: None,
        x_correction: 0,
        y_correction: 0,
    }
}

/// Encodes GFD fixtures byte for byte.
#[derive(Clone, Debug)]
pub struct GfdBuilder {
    version: u32,
    magic: [u8; 4],
    font_size: i32,
    texture_count: i32,
    floats: Vec<f32>,
    name: String,
    name_len: Option<i32>,
    terminate_name: bool,
    baseline: f32,
    descent_line: f32,
    max_char_size: (f32, f32),
    glyphs: Vec<GlyphEntry>,
}

impl GfdBuilder {
    pub fn new(ident: Ident, font_size: i32) -> Self {
        let version = match ident {
            Ident::VersionB => VERSION_B,
            _ => VERSION_A,
        };
        Self {
            version,
            magic: *b"GFD\0",
            font_size,
            texture_count: 1,
            floats: Vec::new(),
            name: "TEST".into(),
            name_len: None,
            terminate_name: true,
            baseline: 0.0,
            descent_line: 0.0,
            max_char_size: (0.0, 0.0),
            glyphs: Vec::new(),
        }
    }

    pub fn version_a(font_size: i32) -> Self {
        Self::new(Ident::VersionA, font_size)
    }

    pub fn version_b(font_size: i32) -> Self {
        Self::new(Ident::VersionB, font_size)
    }

    /// Override the raw version field (the record layout stays as built).
    pub fn raw_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn texture_count(mut self, count: i32) -> Self {
        self.texture_count = count;
        self
    }

    pub fn floats(mut self, floats: Vec<f32>) -> Self {
        self.floats = floats;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Write `len` into the name length field instead of the real length.
    pub fn declared_name_len(mut self, len: i32) -> Self {
        self.name_len = Some(len);
        self
    }

    /// Leave the NUL terminator off the name.
    pub fn unterminated_name(mut self) -> Self {
        self.terminate_name = false;
        self
    }

    pub fn lines(mut self, baseline: f32, descent_line: f32) -> Self {
        self.baseline = baseline;
        self.descent_line = descent_line;
        self
    }

    pub fn max_char_size(mut self, width: f32, height: f32) -> Self {
        self.max_char_size = (width, height);
        self
    }

    pub fn glyph(mut self, entry: GlyphEntry) -> Self {
        self.glyphs.push(entry);
        self
    }

    fn is_b(&self) -> bool {
        self.version == VERSION_B
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(self.magic);
        out.extend(self.version.to_le_bytes());
        for _ in 0..3 {
            out.extend(0i32.to_le_bytes());
        }
        out.extend(self.font_size.to_le_bytes());
        out.extend(self.texture_count.to_le_bytes());
        out.extend((self.glyphs.len() as i32).to_le_bytes());
        if self.is_b() {
            out.extend(0i32.to_le_bytes());
        }
        out.extend((self.floats.len() as i32).to_le_bytes());
        if self.is_b() {
            out.extend(self.max_char_size.0.to_le_bytes());
            out.extend(self.max_char_size.1.to_le_bytes());
        }
        out.extend(self.baseline.to_le_bytes());
        out.extend(self.descent_line.to_le_bytes());

        for f in &self.floats {
            out.extend(f.to_le_bytes());
        }

        let name_len = self.name_len.unwrap_or(self.name.len() as i32);
        out.extend(name_len.to_le_bytes());
        out.extend(self.name.chars().map(|c| c as u8));
        if self.terminate_name {
            out.push(0);
        }

        for g in &self.glyphs {
            if self.is_b() {
                append_entry_b(&mut out, g);
            } else {
                append_entry_a(&mut out, g);
            }
        }
        out
    }

    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_bytes())
    }
}

fn append_entry_a(out: &mut Vec<u8>, g: &GlyphEntry) {
    let r = g.glyph_rect;
    out.extend(g.character.to_le_bytes());
    out.push(g.texture_index);
    out.extend(stored_pair(r.y, r.x));
    out.push(0);
    out.extend(stored_pair(r.height, r.width));
    out.push(g.advance_width as u8);
    out.push(g.x_correction);
    out.push(g.y_correction);
    out.push(0);
}

fn append_entry_b(out: &mut Vec<u8>, g: &GlyphEntry) {
    let r = g.glyph_rect;
    let size = g.char_size.unwrap_or(CharSize {
        width: g.advance_width,
        height: r.height,
    });
    out.extend(g.character.to_le_bytes());
    out.push(g.texture_index);
    out.extend(stored_pair(r.y, r.x));
    out.extend(stored_pair(r.height, r.width));
    out.push(0);
    out.extend(stored_pair(size.height, size.width));
    out.push(0);
    out.push(g.x_correction);
    out.push(g.y_correction);
    out.extend(0i16.to_le_bytes());
}

/// An atlas filled with a single color.
pub fn solid_atlas(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// An atlas whose pixel alpha encodes its position, so crops are recognizable.
pub fn gradient_atlas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([255, 255, 255, ((x * 7 + y * 13) % 256) as u8])
    })
}

/// Save `atlas` as PNG where `options` expects texture `index`.
pub fn write_atlas(
    options: &RendererOptions,
    index: usize,
    atlas: &RgbaImage,
) -> image::ImageResult<()> {
    atlas.save(options.texture_path(index))
}

/// A surface that records every composite call instead of blending.
#[derive(Default)]
pub struct RecordingSurface {
    pub draws: Vec<(i64, i64, RgbaImage)>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for RecordingSurface {
    fn composite(&mut self, glyph: &RgbaImage, x: i64, y: i64) {
        self.draws.push((x, y, glyph.clone()));
    }
}
