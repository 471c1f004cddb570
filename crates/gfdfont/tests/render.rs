use gfdfont::{
    recolor,
    render::{FALLBACK_ADVANCE, GLYPH_SPACING, WHITE},
    test_support::{glyph, gradient_atlas, solid_atlas, GfdBuilder, RecordingSurface},
    FontError, FontHeader, FontTable, GlyphEntry, HeaderA, Point, Size, TextRenderer,
};
use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;

const RED: Rgba<u8> = Rgba([0xFF, 0x00, 0x00, 0xFF]);

fn table(builder: GfdBuilder) -> FontTable {
    FontTable::from_bytes(&builder.to_bytes()).unwrap()
}

fn sample_font(nominal: i32) -> GfdBuilder {
    GfdBuilder::version_a(nominal)
        .glyph(glyph('A', 0, (0, 0, 8, 10), 9))
        .glyph(glyph('B', 0, (8, 0, 12, 10), 14))
        .glyph(glyph('C', 0, (20, 0, 6, 10), 5))
        .glyph(glyph(' ', 0, (0, 0, 0, 10), 5))
}

fn renderer(builder: GfdBuilder, requested: f32, line_height: i32) -> TextRenderer {
    TextRenderer::from_parts(table(builder), vec![gradient_atlas(64, 32)], requested, line_height)
        .unwrap()
}

#[test]
fn measure_at_nominal_size() {
    let r = renderer(sample_font(16), 16.0, 18);
    // (9 + 1) + (14 + 1) + (5 + 1)
    assert_eq!(r.measure("ABC"), Size { width: 31, height: 18 });
    assert_eq!(r.measure(""), Size { width: 0, height: 18 });
}

#[test]
fn measure_truncates_per_glyph() {
    let r = renderer(sample_font(16), 24.0, 18);
    // A: 10 * 1.5 = 15, B: 15 * 1.5 = 22.5 -> 22, C: 6 * 1.5 = 9
    assert_eq!(r.measure("ABC").width, 15 + 22 + 9);
    assert_eq!(r.measure("BB").width, 44);
}

#[test]
fn measure_width_scales_with_requested_size() {
    let text = "ABCA B";
    let base = renderer(sample_font(20), 20.0, 18).measure(text).width;
    let glyphs = text.chars().count() as f32;
    for requested in [10.0f32, 20.0, 30.0, 40.0, 55.0] {
        let width = renderer(sample_font(20), requested, 18).measure(text).width as f32;
        let exact = base as f32 * requested / 20.0;
        assert!(width <= exact, "{requested}: {width} > {exact}");
        assert!(exact - width <= glyphs, "{requested}: {width} vs {exact}");
    }
}

#[test]
fn measure_multiline_uses_widest_line_and_scaled_height() {
    let r = renderer(sample_font(16), 24.0, 18);
    let size = r.measure("AB\r\nC");
    assert_eq!(size.width, 15 + 22);
    assert_eq!(size.height, 2 * 27);
}

#[test]
fn measure_only_splits_on_crlf() {
    let r = renderer(sample_font(16), 16.0, 18);
    assert_eq!(r.measure("A\nB").height, 18);
    assert_eq!(r.measure("A\rB").height, 18);
    assert_eq!(r.measure("A\r\n").height, 36);
    assert_eq!(r.measure("\r\n\r\n").height, 54);
}

#[test]
fn fallback_glyph_advances_and_draws_nothing() {
    let r = renderer(sample_font(12), 18.0, 18);
    let expected = ((16 + 1) as f32 / 12.0 * 18.0) as i32;
    assert_eq!(expected, 25);
    assert_eq!(r.advance('?'), expected);
    assert_eq!(r.measure("?").width, expected);

    let placements = r.layout("?A", Point::new(3, 4));
    assert_eq!(placements[0].glyph, None);
    assert_eq!(placements[0].advance, expected);
    assert_eq!(placements[1].cursor, Point::new(3 + expected, 4));

    let mut surface = RecordingSurface::new();
    r.draw(&mut surface, "???", Point::new(0, 0), WHITE);
    assert!(surface.draws.is_empty());
}

#[test]
fn zero_area_glyph_measures_own_width_but_draws_fallback() {
    let r = renderer(sample_font(16), 16.0, 18);
    assert_eq!(r.advance(' '), 5 + GLYPH_SPACING);
    assert_eq!(r.measure(" A").width, 6 + 10);
    assert_eq!(r.draw_advance(' '), FALLBACK_ADVANCE + GLYPH_SPACING);
    assert_eq!(r.draw_advance('A'), r.advance('A'));

    let placements = r.layout(" A", Point::new(0, 0));
    assert_eq!(placements[0].glyph, None);
    assert_eq!(placements[0].advance, 17);
    assert_eq!(placements[1].cursor.x, 17);

    let mut surface = RecordingSurface::new();
    r.draw(&mut surface, " A", Point::new(0, 0), WHITE);
    assert_eq!(surface.draws.len(), 1);
    assert_eq!((surface.draws[0].0, surface.draws[0].1), (17, 0));
}

#[test]
fn huge_requested_size_saturates_instead_of_overflowing() {
    let r = renderer(sample_font(16), 1.0e9, 18);
    let size = r.measure("???\r\n???");
    assert_eq!(size.width, i32::MAX);
    assert_eq!(size.height, i32::MAX);

    let placements = r.layout("????", Point::new(0, 0));
    assert_eq!(placements[3].cursor.x, i32::MAX);
    let mut surface = RecordingSurface::new();
    r.draw(&mut surface, "????", Point::new(0, 0), WHITE);
    assert!(surface.draws.is_empty());
}

#[test]
fn layout_resets_x_and_advances_unscaled_line_height() {
    let r = renderer(sample_font(16), 24.0, 18);
    let origin = Point::new(5, 7);
    let placements = r.layout("AB\r\nC", origin);
    assert_eq!(placements.len(), 3);
    assert_eq!(placements[0].cursor, origin);
    assert_eq!(placements[1].cursor, Point::new(5 + 15, 7));
    assert_eq!(placements[2].line, 1);
    assert_eq!(placements[2].cursor, Point::new(5, 7 + 18));
    // measurement scales the same line height
    assert_eq!(r.measure("AB\r\nC").height, 54);
}

#[test]
fn draw_composites_cropped_glyph() {
    let atlas = gradient_atlas(64, 32);
    let r = TextRenderer::from_parts(table(sample_font(16)), vec![atlas.clone()], 16.0, 18)
        .unwrap();
    let mut surface = RecordingSurface::new();
    r.draw(&mut surface, "AB", Point::new(10, 20), WHITE);

    assert_eq!(surface.draws.len(), 2);
    let (x, y, a) = &surface.draws[0];
    assert_eq!((*x, *y), (10, 20));
    assert_eq!(a.dimensions(), (8, 10));
    assert_eq!(a.get_pixel(3, 4), atlas.get_pixel(3, 4));

    let (x, y, b) = &surface.draws[1];
    assert_eq!((*x, *y), (20, 20));
    assert_eq!(b.dimensions(), (12, 10));
    assert_eq!(b.get_pixel(0, 0), atlas.get_pixel(8, 0));
}

#[test]
fn draw_scales_glyph_bitmaps() {
    let r = renderer(sample_font(10), 20.0, 18);
    let mut surface = RecordingSurface::new();
    r.draw(&mut surface, "A", Point::new(0, 0), WHITE);
    assert_eq!(surface.draws[0].2.dimensions(), (16, 20));
}

#[test]
fn tiny_scale_clamps_bitmap_to_one_pixel() {
    let r = renderer(sample_font(100), 5.0, 18);
    let mut surface = RecordingSurface::new();
    r.draw(&mut surface, "C", Point::new(0, 0), WHITE);
    assert_eq!(surface.draws[0].2.dimensions(), (1, 1));
}

#[test]
fn recolor_replaces_rgb_and_keeps_alpha() {
    let atlas = gradient_atlas(64, 32);
    let r = TextRenderer::from_parts(table(sample_font(16)), vec![atlas.clone()], 16.0, 18)
        .unwrap();
    let mut surface = RecordingSurface::new();
    r.draw(&mut surface, "B", Point::new(0, 0), RED);

    let (_, _, bitmap) = &surface.draws[0];
    for (x, y, p) in bitmap.enumerate_pixels() {
        let source = atlas.get_pixel(8 + x, y);
        assert_eq!(*p, Rgba([0xFF, 0x00, 0x00, source[3]]), "pixel {x},{y}");
    }
}

#[test]
fn recolor_is_pure() {
    let src = RgbaImage::from_fn(3, 2, |x, y| Rgba([10, 20, 30, (x * 40 + y) as u8]));
    let out = recolor(&src, Rgba([1, 2, 3, 0]));
    assert_eq!(src.get_pixel(2, 1), &Rgba([10, 20, 30, 81]));
    assert_eq!(out.get_pixel(2, 1), &Rgba([1, 2, 3, 81]));
    assert_eq!(out.dimensions(), src.dimensions());
}

#[test]
fn version_b_corrections_offset_the_bitmap_only() {
    let entry = GlyphEntry {
        x_correction: 2,
        y_correction: 3,
        ..glyph('A', 0, (0, 0, 4, 4), 6)
    };
    let builder = GfdBuilder::version_b(16).glyph(entry);
    let r = renderer(builder, 16.0, 18);
    let mut surface = RecordingSurface::new();
    r.draw(&mut surface, "AA", Point::new(10, 10), WHITE);
    assert_eq!(surface.draws[0].0, 12);
    assert_eq!(surface.draws[0].1, 13);
    assert_eq!(surface.draws[1].0, 12 + 7);
}

#[test]
fn draw_blends_onto_rgba_surface() {
    let atlas = solid_atlas(16, 16, Rgba([255, 255, 255, 255]));
    let builder = GfdBuilder::version_a(16).glyph(glyph('X', 0, (0, 0, 2, 2), 2));
    let r = TextRenderer::from_parts(table(builder), vec![atlas], 16.0, 18).unwrap();
    let mut surface = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
    r.draw(&mut surface, "X", Point::new(1, 1), Rgba([0, 255, 0, 255]));
    assert_eq!(surface.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    assert_eq!(surface.get_pixel(1, 1), &Rgba([0, 255, 0, 255]));
    assert_eq!(surface.get_pixel(2, 2), &Rgba([0, 255, 0, 255]));
    assert_eq!(surface.get_pixel(3, 3), &Rgba([0, 0, 0, 255]));
}

#[test]
fn draw_clips_at_surface_edges() {
    let atlas = solid_atlas(16, 16, Rgba([255, 255, 255, 255]));
    let builder = GfdBuilder::version_a(16).glyph(glyph('X', 0, (0, 0, 4, 4), 4));
    let r = TextRenderer::from_parts(table(builder), vec![atlas], 16.0, 18).unwrap();
    let mut surface = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    r.draw(&mut surface, "X", Point::new(-2, 2), WHITE);
    assert_eq!(surface.get_pixel(0, 3), &Rgba([255, 255, 255, 255]));
    assert_eq!(surface.get_pixel(2, 3), &Rgba([0, 0, 0, 255]));
}

#[test]
fn missing_atlas_for_glyph_is_rejected() {
    let builder = GfdBuilder::version_a(16)
        .texture_count(2)
        .glyph(glyph('A', 1, (0, 0, 4, 4), 4));
    let err = TextRenderer::from_parts(table(builder), vec![gradient_atlas(8, 8)], 16.0, 18)
        .err()
        .unwrap();
    assert!(matches!(err, FontError::MalformedData(_)), "{err}");
}

#[test]
fn blank_glyph_may_reference_any_texture() {
    let builder = GfdBuilder::version_a(16).glyph(glyph(' ', 9, (0, 0, 0, 0), 4));
    assert!(TextRenderer::from_parts(table(builder), Vec::new(), 16.0, 18).is_ok());
}

#[test]
fn non_positive_nominal_size_is_rejected() {
    for nominal in [0, -4] {
        let header = FontHeader::A(HeaderA {
            magic: *b"GFD\0",
            version: 0x0001_0C06,
            reserved: [0; 3],
            font_size: nominal,
            texture_count: 1,
            char_count: 1,
            f_count: 0,
            baseline: 0.0,
            descent_line: 0.0,
        });
        let table = FontTable::new(
            header,
            Vec::new(),
            "Zero".into(),
            vec![glyph('A', 0, (0, 0, 4, 4), 5)],
        );
        let err = TextRenderer::from_parts(table, vec![gradient_atlas(8, 8)], 16.0, 18)
            .err()
            .unwrap();
        assert!(matches!(err, FontError::MalformedData(_)), "{nominal}: {err}");
    }
}

#[test]
fn invalid_requested_size_is_rejected() {
    for size in [0.0, -3.0, f32::NAN, f32::INFINITY] {
        assert!(matches!(
            TextRenderer::from_parts(table(sample_font(16)), vec![gradient_atlas(64, 32)], size, 18),
            Err(FontError::InvalidFontSize(_))
        ));
    }
}
