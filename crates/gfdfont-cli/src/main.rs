use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gfdfont::{identify, FontTable, RendererOptions, TextRenderer};
use std::path::PathBuf;

use crate::canvas::{normalize_line_breaks, parse_color, render_to_image};
mod canvas;

#[derive(Parser)]
#[command(name = "gfdfont", about = "GFD bitmap font toolkit CLI")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Args)]
struct AtlasArgs {
    /// Texture path prefix, the atlas index and suffix are appended
    #[arg(long)]
    textures: Option<String>,
    #[arg(long)]
    suffix: Option<String>,
    /// Requested display size
    #[arg(long)]
    size: Option<f32>,
    #[arg(long)]
    line_height: Option<i32>,
}

impl AtlasArgs {
    fn options(self) -> RendererOptions {
        let defaults = RendererOptions::default();
        RendererOptions {
            texture_prefix: self.textures.unwrap_or(defaults.texture_prefix),
            texture_suffix: self.suffix.unwrap_or(defaults.texture_suffix),
            font_size: self.size.unwrap_or(defaults.font_size),
            line_height: self.line_height.unwrap_or(defaults.line_height),
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Report the GFD version of a file
    Identify {
        #[arg(short, long)]
        font: PathBuf,
    },
    /// Inspect font metadata
    Inspect {
        #[arg(short, long)]
        font: PathBuf,
    },
    /// Print the pixel size of rendered text
    Measure {
        #[arg(short, long)]
        font: PathBuf,
        #[command(flatten)]
        atlas: AtlasArgs,
        #[arg(short, long)]
        text: String,
    },
    /// Render text into a PNG
    Render {
        #[arg(short, long)]
        font: PathBuf,
        #[command(flatten)]
        atlas: AtlasArgs,
        #[arg(short, long)]
        text: String,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "ffffff")]
        color: String,
        #[arg(long, default_value = "000000")]
        background: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Cmd::Identify { font } => {
            println!("{}", identify(&font));
        }
        Cmd::Inspect { font } => {
            let table = FontTable::load(&font)
                .with_context(|| format!("failed to load {}", font.display()))?;
            println!("GFD font: {} ({})", table.name(), table.version());
            println!("  Nominal size: {}", table.font_size());
            println!("  Textures: {}", table.texture_count());
            println!("  Defined characters: {}", table.glyph_count());
            println!(
                "  Baseline: {} Descent: {}",
                table.baseline(),
                table.descent_line()
            );
            if let Some((w, h)) = table.max_char_size() {
                println!("  Max character size: {w}x{h}");
            }
        }
        Cmd::Measure { font, atlas, text } => {
            let renderer = TextRenderer::from_options(&font, &atlas.options())?;
            let size = renderer.measure(&normalize_line_breaks(&text));
            println!("{}x{}", size.width, size.height);
        }
        Cmd::Render {
            font,
            atlas,
            text,
            output,
            color,
            background,
        } => {
            let renderer = TextRenderer::from_options(&font, &atlas.options())?;
            let image = render_to_image(
                &renderer,
                &normalize_line_breaks(&text),
                parse_color(&color)?,
                parse_color(&background)?,
            );
            image
                .save(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            eprintln!(
                "Rendered {}x{} -> {}",
                image.width(),
                image.height(),
                output.display()
            );
        }
    }
    Ok(())
}
