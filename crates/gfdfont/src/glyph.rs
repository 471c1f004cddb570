use std::io::Read;

use crate::{
    error::Result,
    reader::{BinaryReader, Record},
};

/// Split a big-endian ordered 24-bit field into its `(high, low)` 12-bit halves.
///
/// `[0x12, 0x34, 0x56]` yields `(0x123, 0x456)`.
pub fn unpack_pair(field: [u8; 3]) -> (u16, u16) {
    let value = field.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b)) & 0x00FF_FFFF;
    ((value >> 12) as u16, (value & 0xFFF) as u16)
}

/// GFD files store packed pairs least significant byte first.
fn unpack_stored(stored: [u8; 3]) -> (u16, u16) {
    let [a, b, c] = stored;
    unpack_pair([c, b, a])
}

/// Location of a glyph inside its texture atlas, in atlas pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl GlyphRect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharSize {
    pub width: u16,
    pub height: u16,
}

/// One character of a font table, independent of the file version it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphEntry {
    pub character: u32,
    pub texture_index: u8,
    pub glyph_rect: GlyphRect,
    /// Horizontal advance in the font's native units.
    pub advance_width: u16,
    /// Logical cell size, only carried by version B tables.
    pub char_size: Option<CharSize>,
    pub x_correction: u8,
    pub y_correction: u8,
}

impl GlyphEntry {
    /// Blank glyphs only move the cursor.
    pub fn is_blank(&self) -> bool {
        self.glyph_rect.is_empty()
    }

    pub fn as_char(&self) -> Option<char> {
        char::from_u32(self.character)
    }
}

/// Version A glyph record (16 bytes).
#[derive(Clone, Debug)]
pub(crate) struct EntryV1 {
    character: u32,
    texture_index: u8,
    position: (u16, u16),
    size: (u16, u16),
    char_width: u8,
}

impl Record for EntryV1 {
    const SIZE: usize = 16;

    fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let character = reader.read_u32()?;
        let texture_index = reader.read_u8()?;
        let position = unpack_stored(reader.read_array()?);
        let _reserved = reader.read_u8()?;
        let size = unpack_stored(reader.read_array()?);
        let char_width = reader.read_u8()?;
        // legacy correction bytes + padding; never applied for this version
        let _unused: [u8; 3] = reader.read_array()?;
        Ok(Self {
            character,
            texture_index,
            position,
            size,
            char_width,
        })
    }
}

impl From<EntryV1> for GlyphEntry {
    fn from(e: EntryV1) -> Self {
        GlyphEntry {
            character: e.character,
            texture_index: e.texture_index,
            glyph_rect: GlyphRect {
                x: e.position.1,
                y: e.position.0,
                width: e.size.1,
                height: e.size.0,
            },
            advance_width: u16::from(e.char_width),
            char_size: None,
            x_correction: 0,
            y_correction: 0,
        }
    }
}

/// Version B glyph record (20 bytes, ending in a 2-byte marker).
#[derive(Clone, Debug)]
pub(crate) struct EntryV2 {
    character: u32,
    texture_index: u8,
    position: (u16, u16),
    size: (u16, u16),
    char_size: (u16, u16),
    x_correction: u8,
    y_correction: u8,
}

impl Record for EntryV2 {
    const SIZE: usize = 20;

    fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let character = reader.read_u32()?;
        let texture_index = reader.read_u8()?;
        let position = unpack_stored(reader.read_array()?);
        let size = unpack_stored(reader.read_array()?);
        let _reserved0 = reader.read_u8()?;
        let char_size = unpack_stored(reader.read_array()?);
        let _reserved1 = reader.read_u8()?;
        let x_correction = reader.read_u8()?;
        let y_correction = reader.read_u8()?;
        let _end_mark = reader.read_i16()?;
        Ok(Self {
            character,
            texture_index,
            position,
            size,
            char_size,
            x_correction,
            y_correction,
        })
    }
}

impl From<EntryV2> for GlyphEntry {
    fn from(e: EntryV2) -> Self {
        GlyphEntry {
            character: e.character,
            texture_index: e.texture_index,
            glyph_rect: GlyphRect {
                x: e.position.1,
                y: e.position.0,
                width: e.size.1,
                height: e.size.0,
            },
            advance_width: e.char_size.1,
            char_size: Some(CharSize {
                width: e.char_size.1,
                height: e.char_size.0,
            }),
            x_correction: e.x_correction,
            y_correction: e.y_correction,
        }
    }
}
