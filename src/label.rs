//! Text rendering for the icon label.
//!
//! Fonts are resolved by probing a list of TrueType/OpenType files in order.
//! When none of them loads, a built-in 5x7 bitmap face is used instead so
//! the label step can never fail.

use crate::canvas::blend_pixel;
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use log::{debug, warn};
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

/// System font locations probed after any user-supplied fonts.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/SFCompact.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/HelveticaNeue.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
];

/// A font ready to draw at a fixed pixel size
pub enum LabelFont {
    /// An outline font loaded from disk
    Outline {
        font: Font<'static>,
        scale: Scale,
        source: PathBuf,
    },
    /// The built-in bitmap face; each glyph dot is `dot` pixels square
    Builtin { dot: i32 },
}

impl LabelFont {
    pub fn builtin(size: f32) -> Self {
        LabelFont::Builtin {
            dot: ((size / BUILTIN_CELL_HEIGHT as f32).round() as i32).max(1),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, LabelFont::Builtin { .. })
    }

    /// Human-readable origin of the face, for progress output
    pub fn describe(&self) -> String {
        match self {
            LabelFont::Outline { source, .. } => source.display().to_string(),
            LabelFont::Builtin { .. } => "built-in bitmap font".to_string(),
        }
    }

    /// Horizontal extent `(min_x, max_x)` of the inked pixels when `text` is
    /// drawn with its pen at x = 0. Returns `None` for blank text.
    pub fn ink_span(&self, text: &str) -> Option<(i32, i32)> {
        match self {
            LabelFont::Outline { font, scale, .. } => font
                .layout(text, *scale, point(0.0, 0.0))
                .filter_map(|glyph| glyph.pixel_bounding_box())
                .fold(None, |span, bb| match span {
                    None => Some((bb.min.x, bb.max.x)),
                    Some((lo, hi)) => Some((lo.min(bb.min.x), hi.max(bb.max.x))),
                }),
            LabelFont::Builtin { dot } => {
                let mut span = None;
                for (i, ch) in text.chars().enumerate() {
                    let rows = builtin_glyph(ch);
                    let mask = rows.iter().fold(0u8, |acc, row| acc | row);
                    if mask == 0 {
                        continue;
                    }
                    let first = (0..5).find(|col| mask & (0x10 >> col) != 0).unwrap_or(0);
                    let last = (0..5).rev().find(|col| mask & (0x10 >> col) != 0).unwrap_or(4);
                    let origin = i as i32 * BUILTIN_ADVANCE * dot;
                    let lo = origin + first * dot;
                    let hi = origin + (last + 1) * dot;
                    span = Some(match span {
                        None => (lo, hi),
                        Some((a, b)) => (lo.min(a), hi.max(b)),
                    });
                }
                span
            }
        }
    }

    pub fn text_width(&self, text: &str) -> i32 {
        self.ink_span(text).map(|(lo, hi)| hi - lo).unwrap_or(0)
    }

    /// Draw `text` with the top of its line box at `(x, y)`, compositing
    /// the glyph coverage over `img`.
    pub fn draw_text(&self, img: &mut RgbaImage, (x, y): (i32, i32), text: &str, color: Rgba<u8>) {
        match self {
            LabelFont::Outline { font, scale, .. } => {
                let ascent = font.v_metrics(*scale).ascent;
                for glyph in font.layout(text, *scale, point(x as f32, y as f32 + ascent)) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        let alpha = (color[3] as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
                        let px = Rgba([color[0], color[1], color[2], alpha]);
                        blend_pixel(img, bb.min.x + gx as i32, bb.min.y + gy as i32, px);
                    });
                }
            }
            LabelFont::Builtin { dot } => {
                for (i, ch) in text.chars().enumerate() {
                    let origin = x + i as i32 * BUILTIN_ADVANCE * dot;
                    for (row, bits) in builtin_glyph(ch).iter().enumerate() {
                        for col in 0..5 {
                            if bits & (0x10 >> col) == 0 {
                                continue;
                            }
                            let px0 = origin + col * dot;
                            let py0 = y + row as i32 * dot;
                            for py in py0..py0 + dot {
                                for px in px0..px0 + dot {
                                    blend_pixel(img, px, py, color);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Returns the first candidate that exists and parses as a font, or the
/// built-in face when none does.
pub fn resolve_font<P: AsRef<Path>>(candidates: &[P], size: f32) -> LabelFont {
    for candidate in candidates {
        let path = candidate.as_ref();
        if !path.exists() {
            debug!("font candidate {} not found", path.display());
            continue;
        }

        match load_font(path) {
            Ok(font) => {
                debug!("using font {}", path.display());
                let scale = em_scale(&font, size);
                return LabelFont::Outline {
                    font,
                    scale,
                    source: path.to_path_buf(),
                };
            }
            Err(err) => debug!("skipping font {}: {err:#}", path.display()),
        }
    }

    warn!("no usable font found, falling back to the built-in face");
    LabelFont::builtin(size)
}

fn load_font(path: &Path) -> Result<Font<'static>> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    // Collections (.ttc) resolve to their first face.
    Font::try_from_vec_and_index(data, 0).context("Not a TrueType/OpenType font")
}

/// rusttype scales by line height; convert so `size` is the em size.
fn em_scale(font: &Font<'_>, size: f32) -> Scale {
    let vm = font.v_metrics_unscaled();
    let units_per_em = font.units_per_em() as f32;
    let line_height = vm.ascent - vm.descent;
    if units_per_em <= 0.0 || line_height <= 0.0 {
        return Scale::uniform(size);
    }
    Scale::uniform(size * line_height / units_per_em)
}

const BUILTIN_CELL_HEIGHT: i32 = 10;
const BUILTIN_ADVANCE: i32 = 6;

/// 5x7 glyph rows, most significant of the low five bits is the left column.
fn builtin_glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}
