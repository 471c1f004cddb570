use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use crate::{
    error::{FontError, Result},
    glyph::{EntryV1, EntryV2, GlyphEntry},
    identify::{identify, identify_bytes, Ident, TAG_LEN},
    reader::{BinaryReader, Record},
};

/// Version A header (44 bytes, tag included).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderA {
    pub magic: [u8; 4],
    pub version: u32,
    pub reserved: [i32; 3],
    pub font_size: i32,
    pub texture_count: i32,
    pub char_count: i32,
    pub f_count: i32,
    pub baseline: f32,
    pub descent_line: f32,
}

/// Version B header (52 bytes, tag included).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderB {
    pub magic: [u8; 4],
    pub version: u32,
    pub reserved: [i32; 4],
    pub font_size: i32,
    pub texture_count: i32,
    pub char_count: i32,
    pub f_count: i32,
    pub max_char_width: f32,
    pub max_char_height: f32,
    pub baseline: f32,
    pub descent_line: f32,
}

fn read_tag<R: Read>(reader: &mut BinaryReader<R>) -> Result<([u8; 4], u32)> {
    Ok((reader.read_array()?, reader.read_u32()?))
}

impl Record for HeaderA {
    const SIZE: usize = TAG_LEN + 36;

    fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let (magic, version) = read_tag(reader)?;
        Ok(Self {
            magic,
            version,
            reserved: [reader.read_i32()?, reader.read_i32()?, reader.read_i32()?],
            font_size: reader.read_i32()?,
            texture_count: reader.read_i32()?,
            char_count: reader.read_i32()?,
            f_count: reader.read_i32()?,
            baseline: reader.read_f32()?,
            descent_line: reader.read_f32()?,
        })
    }
}

impl Record for HeaderB {
    const SIZE: usize = TAG_LEN + 44;

    fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let (magic, version) = read_tag(reader)?;
        let r0 = reader.read_i32()?;
        let r1 = reader.read_i32()?;
        let r2 = reader.read_i32()?;
        let font_size = reader.read_i32()?;
        let texture_count = reader.read_i32()?;
        let char_count = reader.read_i32()?;
        let r3 = reader.read_i32()?;
        Ok(Self {
            magic,
            version,
            reserved: [r0, r1, r2, r3],
            font_size,
            texture_count,
            char_count,
            f_count: reader.read_i32()?,
            max_char_width: reader.read_f32()?,
            max_char_height: reader.read_f32()?,
            baseline: reader.read_f32()?,
            descent_line: reader.read_f32()?,
        })
    }
}

/// Decoded header, tagged by the file version it was read from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontHeader {
    A(HeaderA),
    B(HeaderB),
}

/// Count fields every header schema exposes to the shared parse loop.
trait HeaderRecord: Record + Into<FontHeader> {
    fn font_size(&self) -> i32;
    fn texture_count(&self) -> i32;
    fn char_count(&self) -> i32;
    fn f_count(&self) -> i32;
}

impl HeaderRecord for HeaderA {
    fn font_size(&self) -> i32 {
        self.font_size
    }
    fn texture_count(&self) -> i32 {
        self.texture_count
    }
    fn char_count(&self) -> i32 {
        self.char_count
    }
    fn f_count(&self) -> i32 {
        self.f_count
    }
}

impl HeaderRecord for HeaderB {
    fn font_size(&self) -> i32 {
        self.font_size
    }
    fn texture_count(&self) -> i32 {
        self.texture_count
    }
    fn char_count(&self) -> i32 {
        self.char_count
    }
    fn f_count(&self) -> i32 {
        self.f_count
    }
}

impl From<HeaderA> for FontHeader {
    fn from(h: HeaderA) -> Self {
        FontHeader::A(h)
    }
}

impl From<HeaderB> for FontHeader {
    fn from(h: HeaderB) -> Self {
        FontHeader::B(h)
    }
}

impl FontHeader {
    pub fn ident(&self) -> Ident {
        match self {
            FontHeader::A(_) => Ident::VersionA,
            FontHeader::B(_) => Ident::VersionB,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            FontHeader::A(h) => h.version,
            FontHeader::B(h) => h.version,
        }
    }

    pub fn font_size(&self) -> i32 {
        match self {
            FontHeader::A(h) => h.font_size,
            FontHeader::B(h) => h.font_size,
        }
    }

    pub fn texture_count(&self) -> i32 {
        match self {
            FontHeader::A(h) => h.texture_count,
            FontHeader::B(h) => h.texture_count,
        }
    }

    pub fn char_count(&self) -> i32 {
        match self {
            FontHeader::A(h) => h.char_count,
            FontHeader::B(h) => h.char_count,
        }
    }

    pub fn baseline(&self) -> f32 {
        match self {
            FontHeader::A(h) => h.baseline,
            FontHeader::B(h) => h.baseline,
        }
    }

    pub fn descent_line(&self) -> f32 {
        match self {
            FontHeader::A(h) => h.descent_line,
            FontHeader::B(h) => h.descent_line,
        }
    }

    /// Maximum glyph cell, only recorded by version B.
    pub fn max_char_size(&self) -> Option<(f32, f32)> {
        match self {
            FontHeader::A(_) => None,
            FontHeader::B(h) => Some((h.max_char_width, h.max_char_height)),
        }
    }
}

/// A fully decoded GFD font table.
///
/// Immutable once built. Lookups by code point go through an index built at
/// construction; when the file lists a code point more than once the first
/// entry wins.
#[derive(Clone, Debug)]
pub struct FontTable {
    header: FontHeader,
    floats: Vec<f32>,
    name: String,
    glyphs: Vec<GlyphEntry>,
    index: HashMap<u32, usize>,
}

fn count(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| FontError::MalformedData(format!("negative {what}: {value}")))
}

/// Shared decode sequence for both file versions.
fn parse<H, E, R>(reader: &mut BinaryReader<R>) -> Result<FontTable>
where
    H: HeaderRecord,
    E: Record + Into<GlyphEntry>,
    R: Read,
{
    let header: H = reader.read_struct()?;
    if header.font_size() <= 0 {
        return Err(FontError::MalformedData(format!(
            "font size must be positive, got {}",
            header.font_size()
        )));
    }
    count(header.texture_count(), "texture count")?;
    let f_count = count(header.f_count(), "float count")?;
    let char_count = count(header.char_count(), "character count")?;
    log::debug!("gfd header: {f_count} floats, {char_count} characters");

    let floats = reader.read_multiple::<f32>(f_count)?;

    // The declared length is informational; the name ends at its NUL.
    let name_len = count(reader.read_i32()?, "name length")?;
    let name = reader.read_cstring_ascii(name_len.saturating_add(1))?;

    let glyphs = reader
        .read_multiple::<E>(char_count)?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(FontTable::new(header.into(), floats, name, glyphs))
}

impl FontTable {
    pub fn new(
        header: FontHeader,
        floats: Vec<f32>,
        name: String,
        glyphs: Vec<GlyphEntry>,
    ) -> Self {
        let mut index = HashMap::with_capacity(glyphs.len());
        for (i, g) in glyphs.iter().enumerate() {
            index.entry(g.character).or_insert(i);
        }
        Self {
            header,
            floats,
            name,
            glyphs,
            index,
        }
    }

    /// Load and decode a GFD file, dispatching on its version tag.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match identify(path) {
            Ident::NotFound => Err(FontError::FileNotFound(path.to_path_buf())),
            Ident::NotSupported => Err(FontError::UnsupportedVersion(path.display().to_string())),
            ident => {
                let file = BufReader::new(File::open(path)?);
                let table = Self::read_as(ident, file)?;
                log::info!(
                    "loaded gfd font '{}' ({ident}, size {}, {} glyphs, {} textures)",
                    table.name,
                    table.font_size(),
                    table.glyph_count(),
                    table.texture_count()
                );
                Ok(table)
            }
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read(bytes)
    }

    /// Decode a GFD stream positioned at its first byte.
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let mut buf = Vec::new();
        let mut reader = reader;
        reader.read_to_end(&mut buf)?;
        let ident = identify_bytes(&buf);
        if !ident.is_supported() {
            let Some(tag) = buf.get(4..TAG_LEN) else {
                return Err(FontError::UnexpectedEof {
                    offset: buf.len() as u64,
                });
            };
            let version = u32::from_le_bytes([tag[0], tag[1], tag[2], tag[3]]);
            return Err(FontError::UnsupportedVersion(format!("{version:#010x}")));
        }
        Self::read_as(ident, buf.as_slice())
    }

    fn read_as<R: Read>(ident: Ident, inner: R) -> Result<Self> {
        let mut reader = BinaryReader::new(inner);
        match ident {
            Ident::VersionA => parse::<HeaderA, EntryV1, _>(&mut reader),
            Ident::VersionB => parse::<HeaderB, EntryV2, _>(&mut reader),
            Ident::NotFound | Ident::NotSupported => Err(FontError::MalformedData(format!(
                "cannot parse a {ident} table"
            ))),
        }
    }

    pub fn header(&self) -> &FontHeader {
        &self.header
    }

    pub fn version(&self) -> Ident {
        self.header.ident()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Native font size the glyph metrics were authored at.
    pub fn font_size(&self) -> i32 {
        self.header.font_size()
    }

    /// Number of texture atlases the table declares.
    pub fn texture_count(&self) -> usize {
        usize::try_from(self.header.texture_count()).unwrap_or(0)
    }

    pub fn baseline(&self) -> f32 {
        self.header.baseline()
    }

    pub fn descent_line(&self) -> f32 {
        self.header.descent_line()
    }

    pub fn max_char_size(&self) -> Option<(f32, f32)> {
        self.header.max_char_size()
    }

    /// Auxiliary floats that trail the header.
    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    pub fn glyphs(&self) -> &[GlyphEntry] {
        &self.glyphs
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// First entry for `code_point`, in file order.
    pub fn glyph(&self, code_point: u32) -> Option<&GlyphEntry> {
        self.index.get(&code_point).map(|&i| &self.glyphs[i])
    }

    pub fn has_char(&self, ch: char) -> bool {
        self.index.contains_key(&u32::from(ch))
    }

    /// Iterate over the entries that map to a valid `char`, in file order.
    pub fn iter_glyphs(&self) -> impl Iterator<Item = (char, &GlyphEntry)> {
        self.glyphs
            .iter()
            .filter_map(|g| g.as_char().map(|ch| (ch, g)))
    }
}
