//! Atlas based text measurement and compositing.
use std::path::{Path, PathBuf};

use image::{
    imageops::{self, FilterType},
    GenericImageView, ImageBuffer, Rgba, RgbaImage,
};

use crate::{
    error::{FontError, Result},
    glyph::{GlyphEntry, GlyphRect},
    options::RendererOptions,
    table::FontTable,
    Surface,
};

/// Advance, in native units, for code points the table doesn't define.
pub const FALLBACK_ADVANCE: i32 = 16;
/// Extra native units added after every glyph.
pub const GLYPH_SPACING: i32 = 1;
/// Lines are split on this exact sequence only.
pub const LINE_BREAK: &str = "\r\n";

pub const WHITE: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Where one code point of a laid out string ends up.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement<'a> {
    pub ch: char,
    /// Zero based line index.
    pub line: usize,
    /// Cursor position before this glyph.
    pub cursor: Point,
    /// Pixels the cursor moves after this glyph.
    pub advance: i32,
    /// The entry to composite; `None` for unknown code points and blank glyphs.
    pub glyph: Option<&'a GlyphEntry>,
}

impl Placement<'_> {
    /// Top-left corner the glyph bitmap is composited at.
    pub fn draw_position(&self) -> Point {
        match self.glyph {
            Some(g) => Point::new(
                self.cursor.x.saturating_add(i32::from(g.x_correction)),
                self.cursor.y.saturating_add(i32::from(g.y_correction)),
            ),
            None => self.cursor,
        }
    }
}

/// Draws text with a GFD font table and its texture atlases.
#[derive(Debug)]
pub struct TextRenderer {
    table: FontTable,
    atlases: Vec<RgbaImage>,
    nominal_size: f32,
    font_size: f32,
    line_height: i32,
}

impl TextRenderer {
    pub fn new(
        gfd_path: impl AsRef<Path>,
        texture_prefix: &str,
        texture_suffix: &str,
        font_size: f32,
        line_height: i32,
    ) -> Result<Self> {
        let options =
            RendererOptions::new(texture_prefix, texture_suffix, font_size, line_height);
        Self::from_options(gfd_path, &options)
    }

    /// Load the font table at `gfd_path` and every atlas it declares.
    pub fn from_options(gfd_path: impl AsRef<Path>, options: &RendererOptions) -> Result<Self> {
        let table = FontTable::load(gfd_path)?;

        let paths: Vec<PathBuf> = (0..table.texture_count())
            .map(|i| options.texture_path(i))
            .collect();
        // every atlas must exist before any is decoded
        for (index, path) in paths.iter().enumerate() {
            if !path.is_file() {
                return Err(FontError::MissingTexture {
                    index,
                    path: path.clone(),
                });
            }
        }
        let atlases = paths
            .iter()
            .map(|p| load_atlas(p))
            .collect::<Result<Vec<_>>>()?;

        Self::from_parts(table, atlases, options.font_size, options.line_height)
    }

    /// Build a renderer from an already decoded table and atlas list.
    ///
    /// Fails if a drawable glyph points at an atlas that isn't in `atlases`.
    pub fn from_parts(
        table: FontTable,
        atlases: Vec<RgbaImage>,
        font_size: f32,
        line_height: i32,
    ) -> Result<Self> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(FontError::InvalidFontSize(font_size));
        }
        if table.font_size() <= 0 {
            return Err(FontError::MalformedData(format!(
                "font size must be positive, got {}",
                table.font_size()
            )));
        }
        if let Some(g) = table
            .glyphs()
            .iter()
            .find(|g| !g.is_blank() && usize::from(g.texture_index) >= atlases.len())
        {
            return Err(FontError::MalformedData(format!(
                "glyph {:#x} uses texture {} but only {} atlases are loaded",
                g.character,
                g.texture_index,
                atlases.len()
            )));
        }
        Ok(Self {
            nominal_size: table.font_size() as f32,
            table,
            atlases,
            font_size,
            line_height,
        })
    }

    pub fn table(&self) -> &FontTable {
        &self.table
    }

    pub fn atlas(&self, index: usize) -> Option<&RgbaImage> {
        self.atlases.get(index)
    }

    /// Size the glyph metrics were authored at.
    pub fn nominal_size(&self) -> f32 {
        self.nominal_size
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    /// Convert native units to pixels, truncating toward zero.
    fn scale(&self, units: i32) -> i32 {
        (units as f32 / self.nominal_size * self.font_size) as i32
    }

    fn advance_for(&self, entry: Option<&GlyphEntry>) -> i32 {
        let units = entry.map_or(FALLBACK_ADVANCE, |g| i32::from(g.advance_width));
        self.scale(units + GLYPH_SPACING)
    }

    /// Pixel advance of a single code point as [`Self::measure`] counts it.
    pub fn advance(&self, ch: char) -> i32 {
        self.advance_for(self.table.glyph(u32::from(ch)))
    }

    /// Pixel advance of a single code point as [`Self::draw`] moves the cursor.
    ///
    /// Blank glyphs take the fallback advance here, not their own width.
    pub fn draw_advance(&self, ch: char) -> i32 {
        let entry = self.table.glyph(u32::from(ch)).filter(|g| !g.is_blank());
        self.advance_for(entry)
    }

    /// Bounding size of `text`: the widest line, and one scaled line height per line.
    pub fn measure(&self, text: &str) -> Size {
        let line_advance = self.scale(self.line_height);
        text.split(LINE_BREAK)
            .fold(Size::default(), |mut size, line| {
                let width = line
                    .chars()
                    .fold(0i32, |w, ch| w.saturating_add(self.advance(ch)));
                size.width = size.width.max(width);
                size.height = size.height.saturating_add(line_advance);
                size
            })
    }

    /// Cursor positions `draw` uses for every code point of `text`.
    ///
    /// Lines advance by the unscaled line height here, unlike [`Self::measure`],
    /// and blank glyphs advance like unknown code points.
    pub fn layout(&self, text: &str, origin: Point) -> Vec<Placement<'_>> {
        let mut placements = Vec::with_capacity(text.len());
        let mut y = origin.y;
        for (line, s) in text.split(LINE_BREAK).enumerate() {
            let mut x = origin.x;
            for ch in s.chars() {
                let entry = self.table.glyph(u32::from(ch)).filter(|g| !g.is_blank());
                let advance = self.advance_for(entry);
                placements.push(Placement {
                    ch,
                    line,
                    cursor: Point::new(x, y),
                    advance,
                    glyph: entry,
                });
                x = x.saturating_add(advance);
            }
            y = y.saturating_add(self.line_height);
        }
        placements
    }

    pub fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        origin: Point,
        color: Rgba<u8>,
    ) {
        for placement in self.layout(text, origin) {
            let Some(entry) = placement.glyph else {
                continue;
            };
            let Some(bitmap) = self.render_glyph(entry, color) else {
                continue;
            };
            let at = placement.draw_position();
            surface.composite(&bitmap, i64::from(at.x), i64::from(at.y));
        }
    }

    /// Cut a glyph out of its atlas, scaled to the requested size and tinted.
    ///
    /// Returns `None` for blank glyphs and for rectangles entirely outside the atlas.
    pub fn render_glyph(&self, entry: &GlyphEntry, color: Rgba<u8>) -> Option<RgbaImage> {
        if entry.is_blank() {
            return None;
        }
        let atlas = self.atlases.get(usize::from(entry.texture_index))?;
        let mut bitmap = crop_glyph(atlas, entry.glyph_rect)?;
        if self.font_size != self.nominal_size {
            bitmap = self.resize(&bitmap);
        }
        if color != WHITE {
            bitmap = recolor(&bitmap, color);
        }
        Some(bitmap)
    }

    fn resize(&self, bitmap: &RgbaImage) -> RgbaImage {
        let scaled = |dim: u32| {
            let v = f64::from(dim) / f64::from(self.nominal_size) * f64::from(self.font_size);
            if v < 1.0 { 1 } else { v as u32 }
        };
        let (w, h) = (scaled(bitmap.width()), scaled(bitmap.height()));
        imageops::resize(bitmap, w, h, FilterType::CatmullRom)
    }
}

fn load_atlas(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| FontError::TextureDecode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    log::info!(
        "loaded atlas {}x{} from {}",
        rgba.width(),
        rgba.height(),
        path.display()
    );
    Ok(rgba)
}

fn crop_glyph(atlas: &RgbaImage, rect: GlyphRect) -> Option<RgbaImage> {
    let (x, y) = (u32::from(rect.x), u32::from(rect.y));
    let (w, h) = (u32::from(rect.width), u32::from(rect.height));
    if x + w > atlas.width() || y + h > atlas.height() {
        log::warn!(
            "glyph rect {rect:?} exceeds atlas {}x{}, clamping",
            atlas.width(),
            atlas.height()
        );
    }
    let view = imageops::crop_imm(atlas, x, y, w, h);
    if view.width() == 0 || view.height() == 0 {
        return None;
    }
    Some(view.to_image())
}

/// Replace the color channels of every pixel, keeping each pixel's alpha.
pub fn recolor(bitmap: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let [r, g, b, _] = color.0;
    ImageBuffer::from_fn(bitmap.width(), bitmap.height(), |x, y| {
        Rgba([r, g, b, bitmap.get_pixel(x, y)[3]])
    })
}
