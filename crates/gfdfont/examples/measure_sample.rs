use gfdfont::{
    test_support::{glyph, gradient_atlas, GfdBuilder},
    FontTable, Point, TextRenderer,
};

fn main() {
    // A tiny in-memory version A font with three glyphs and a blank space.
    let bytes = GfdBuilder::version_a(16)
        .name("Sample")
        .glyph(glyph('H', 0, (0, 0, 10, 14), 10))
        .glyph(glyph('i', 0, (10, 0, 4, 14), 4))
        .glyph(glyph(' ', 0, (0, 0, 0, 0), 6))
        .to_bytes();
    let table = FontTable::from_bytes(&bytes).unwrap();
    println!("Font '{}' ({}), {} glyphs", table.name(), table.version(), table.glyph_count());

    for size in [8.0, 16.0, 24.0, 32.0] {
        let renderer = TextRenderer::from_parts(table.clone(), vec![gradient_atlas(32, 32)], size, 18).unwrap();
        let measured = renderer.measure("Hi Hi\r\nHi?");
        println!("size {size:>4}: {}x{}", measured.width, measured.height);
        for p in renderer.layout("Hi?", Point::new(0, 0)) {
            let drawn = if p.glyph.is_some() { "drawn" } else { "skipped" };
            println!("    {:?} at {:?} advance {} ({drawn})", p.ch, p.cursor, p.advance);
        }
    }
}
