use crate::contents_json::{write_contents_json, ContentsFile};
use crate::enhance;
use crate::label::{self, LabelFont};
use crate::render::{self, FLATTEN_BACKGROUND, LABEL_SIZE};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgb, RgbImage,
};
use log::info;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

pub const BASE_FILENAME: &str = "AppIcon-1024.png";
pub const DARK_FILENAME: &str = "AppIcon-Dark-1024.png";
pub const TINTED_FILENAME: &str = "AppIcon-Tinted-1024.png";

/// Brightness factor for the dark appearance
pub const DARK_FACTOR: f32 = 0.85;
/// Color factor for the tinted appearance
pub const TINTED_FACTOR: f32 = 1.3;

// Define Args struct for library compilation
#[derive(Debug, Clone)]
pub struct Args {
    /// Existing asset catalog set directory to write into
    pub output: PathBuf,
    /// Flatten background as a CSS color
    pub background: String,
    /// Extra fonts probed before the system list
    pub fonts: Vec<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            output: PathBuf::from("AppIcon.appiconset"),
            background: "#0f1218".to_string(),
            fonts: Vec::new(),
        }
    }
}

/// The base icon and its appearance variants
pub struct IconSet {
    pub base: RgbImage,
    pub dark: RgbImage,
    pub tinted: RgbImage,
}

impl IconSet {
    /// Derive the dark and tinted variants from `base`
    pub fn from_base(base: RgbImage) -> Self {
        let dark = enhance::brightness(&base, DARK_FACTOR);
        let tinted = enhance::saturation(&base, TINTED_FACTOR);
        Self { base, dark, tinted }
    }
}

pub fn generate_app_icon(args: Args) -> Result<()> {
    println!("Generating app icon...");

    let candidates = font_candidates(&args.fonts);
    let font = label::resolve_font(&candidates, LABEL_SIZE);
    info!("label font: {}", font.describe());

    let background = parse_background(&args.background);
    let icons = render_icon_set(&font, background);

    // The output directory must already exist; it is not created here.
    write_icon_set(&icons, &args.output)?;

    write_contents_json(&args.output, &ContentsFile::default())?;
    println!("  ✓ Generated Contents.json");

    println!("✓ App icon generated: {} (light / dark / tinted)", args.output.display());
    Ok(())
}

/// User fonts first, then the system list
pub fn font_candidates(user_fonts: &[PathBuf]) -> Vec<PathBuf> {
    user_fonts
        .iter()
        .cloned()
        .chain(label::SYSTEM_FONT_PATHS.iter().map(PathBuf::from))
        .collect()
}

/// Render the base icon and derive its variants
pub fn render_icon_set(font: &LabelFont, background: Rgb<u8>) -> IconSet {
    info!("rendering {}x{} base icon", render::SIZE, render::SIZE);
    let base = render::create_icon(font, background);
    info!("deriving dark and tinted variants");
    IconSet::from_base(base)
}

/// Save the three PNGs into `out_dir`, overwriting existing files
pub fn write_icon_set(icons: &IconSet, out_dir: &Path) -> Result<()> {
    let outputs = [
        (BASE_FILENAME, &icons.base, ""),
        (DARK_FILENAME, &icons.dark, " (Dark)"),
        (TINTED_FILENAME, &icons.tinted, " (Tinted)"),
    ];

    for (filename, image, suffix) in outputs {
        let path = out_dir.join(filename);
        save_png(image, &path)?;
        println!(
            "  ✓ Generated {}x{}{suffix} → {}",
            image.width(),
            image.height(),
            path.display()
        );
    }

    Ok(())
}

/// Parse a CSS color, falling back to the default flatten background
pub fn parse_background(color: &str) -> Rgb<u8> {
    css_color::Srgb::from_str(color)
        .map(|color| {
            Rgb([
                (color.red * 255.).round() as u8,
                (color.green * 255.).round() as u8,
                (color.blue * 255.).round() as u8,
            ])
        })
        .unwrap_or(FLATTEN_BACKGROUND)
}

fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(image.as_raw(), &mut out_file, image.width(), image.height())
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}

// Encode opaque RGB data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgb8)?;
    Ok(())
}
