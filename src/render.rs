//! The drawing steps that build the icon, in pipeline order.
//!
//! Every step mutates the same RGBA working raster. The raster is square,
//! `SIZE` pixels per side, and is flattened onto an opaque background at
//! the end.

use crate::canvas::{fill_rounded_rect, paint_ellipse, put_pixel};
use crate::label::LabelFont;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::f64::consts::PI;

pub const SIZE: u32 = 1024;

const SIZE_I: i32 = SIZE as i32;

/// Base gold used by the ring, the glyph, the label and the dots.
pub const GOLD: [u8; 3] = [212, 175, 55];

pub const GRADIENT_TOP: [u8; 3] = [15, 18, 24];
pub const GRADIENT_BOTTOM: [u8; 3] = [25, 30, 40];

/// Background the working raster is flattened onto.
pub const FLATTEN_BACKGROUND: Rgb<u8> = Rgb([15, 18, 24]);

pub const GLOW_CENTER: (i32, i32) = (SIZE_I / 2, SIZE_I / 2 - 30);
pub const GLOW_RADIUS: i32 = 350;
const GLOW_MAX_ALPHA: f64 = 40.0;
const GLOW_DAMPING: f64 = 0.5;

pub const RING_CENTER: (i32, i32) = (SIZE_I / 2, SIZE_I / 2 - 20);
pub const RING_INNER: i32 = 270;
pub const RING_OUTER: i32 = 310;
pub const RING_EDGE: i32 = 5;
pub const RING_ALPHA_BAND: u8 = 255;
pub const RING_ALPHA_EDGE: u8 = 180;

pub const GLYPH_CENTER: (i32, i32) = (SIZE_I / 2, SIZE_I / 2 - 20);
const BAR_WIDTH: i32 = 240;
const BAR_HEIGHT: i32 = 32;
const BAR_GAP: i32 = 14;
const BAR_TOP_OFFSET: i32 = 140;
const BAR_RADIUS: i32 = 16;
const STEM_WIDTH: i32 = 44;
const STEM_OVERLAP: i32 = 10;
const STEM_BOTTOM_OFFSET: i32 = 200;
const STEM_RADIUS: i32 = 12;

pub const LABEL_TEXT: &str = "USDT";
pub const LABEL_SIZE: f32 = 72.0;
pub const LABEL_BOTTOM_OFFSET: i32 = 180;
const LABEL_SHADOW_OFFSET: i32 = 2;
const LABEL_SHADOW: Rgba<u8> = Rgba([0, 0, 0, 120]);

const DOT_ALPHA: u8 = 60;
/// `(x, y, radius)` of each decoration dot.
pub const DOTS: [(i32, i32, i32); 6] = [
    (80, 80, 8),
    (SIZE_I - 80, 80, 8),
    (80, SIZE_I - 80, 8),
    (SIZE_I - 80, SIZE_I - 80, 8),
    (50, SIZE_I / 2, 5),
    (SIZE_I - 50, SIZE_I / 2, 5),
];

fn gold(alpha: u8) -> Rgba<u8> {
    Rgba([GOLD[0], GOLD[1], GOLD[2], alpha])
}

/// Allocates the transparent working raster.
pub fn new_canvas() -> RgbaImage {
    RgbaImage::new(SIZE, SIZE)
}

/// Paints every row with an opaque color interpolated from top to bottom.
pub fn draw_background(img: &mut RgbaImage) {
    let height = img.height();
    for y in 0..height {
        let ratio = y as f64 / height as f64;
        let mut color = [0u8; 4];
        for c in 0..3 {
            let start = GRADIENT_TOP[c] as f64;
            let delta = GRADIENT_BOTTOM[c] as f64 - start;
            color[c] = (start + ratio * delta) as u8;
        }
        color[3] = 255;

        for x in 0..img.width() {
            img.put_pixel(x, y, Rgba(color));
        }
    }
}

/// Paints concentric discs from the outside in. Each disc replaces the
/// pixels under it, so a pixel keeps the translucent color of the smallest
/// disc covering it and the haze only shows once flattened.
pub fn draw_glow(img: &mut RgbaImage) {
    let (cx, cy) = GLOW_CENTER;
    for radius in (1..=GLOW_RADIUS).rev() {
        paint_ellipse(img, cx, cy, radius, glow_color(radius));
    }
}

/// Color and alpha of the glow disc at `radius`.
pub fn glow_color(radius: i32) -> Rgba<u8> {
    let ratio = radius as f64 / GLOW_RADIUS as f64;
    let alpha = (GLOW_MAX_ALPHA * (1.0 - ratio)) as u8;
    let fade = 1.0 - ratio * GLOW_DAMPING;
    Rgba([
        (GOLD[0] as f64 * fade) as u8,
        (GOLD[1] as f64 * fade) as u8,
        (GOLD[2] as f64 * fade) as u8,
        alpha,
    ])
}

/// Sweeps the annulus one degree at a time, writing pixels directly.
///
/// Iteration is angle-major, radius-minor; where samples land on the same
/// pixel the last write wins, so the order is part of the output.
pub fn draw_ring(img: &mut RgbaImage) {
    let (cx, cy) = RING_CENTER;
    for degrees in 0..360 {
        let angle = (degrees as f64).to_radians();
        let color = ring_color(angle);
        for r in RING_INNER..RING_OUTER {
            let x = (cx as f64 + r as f64 * angle.cos()) as i32;
            let y = (cy as f64 + r as f64 * angle.sin()) as i32;
            put_pixel(img, x, y, Rgba([color[0], color[1], color[2], ring_alpha(r)]));
        }
    }
}

/// Gold modulated by `0.85 + 0.15 * sin(2θ + π/4)`.
pub fn ring_color(angle: f64) -> [u8; 3] {
    let brightness = 0.85 + 0.15 * (angle * 2.0 + PI / 4.0).sin();
    [
        (GOLD[0] as f64 * brightness) as u8,
        (GOLD[1] as f64 * brightness) as u8,
        (GOLD[2] as f64 * brightness) as u8,
    ]
}

/// Opaque inside the band, translucent within `RING_EDGE` of either boundary.
pub fn ring_alpha(r: i32) -> u8 {
    if RING_INNER + RING_EDGE < r && r < RING_OUTER - RING_EDGE {
        RING_ALPHA_BAND
    } else {
        RING_ALPHA_EDGE
    }
}

/// Two stacked bars and a stem forming the tether sign.
pub fn draw_glyph(img: &mut RgbaImage) {
    let (cx, cy) = GLYPH_CENTER;
    let fill = gold(255);

    let bar_y1 = cy - BAR_TOP_OFFSET;
    fill_rounded_rect(
        img,
        (cx - BAR_WIDTH / 2, bar_y1),
        (cx + BAR_WIDTH / 2, bar_y1 + BAR_HEIGHT),
        BAR_RADIUS,
        fill,
    );

    let bar_y2 = bar_y1 + BAR_HEIGHT + BAR_GAP;
    fill_rounded_rect(
        img,
        (cx - BAR_WIDTH / 2, bar_y2),
        (cx + BAR_WIDTH / 2, bar_y2 + BAR_HEIGHT),
        BAR_RADIUS,
        fill,
    );

    let stem_top = bar_y2 + BAR_HEIGHT - STEM_OVERLAP;
    let stem_bottom = cy + STEM_BOTTOM_OFFSET;
    fill_rounded_rect(
        img,
        (cx - STEM_WIDTH / 2, stem_top),
        (cx + STEM_WIDTH / 2, stem_bottom),
        STEM_RADIUS,
        fill,
    );
}

/// Where the label pen starts: horizontally centered on the ink, a fixed
/// distance above the bottom edge.
pub fn label_origin(font: &LabelFont) -> (i32, i32) {
    let width = font.text_width(LABEL_TEXT);
    ((SIZE_I - width) / 2, SIZE_I - LABEL_BOTTOM_OFFSET)
}

/// Draws the label twice: a translucent black shadow, then the gold text.
pub fn draw_label(img: &mut RgbaImage, font: &LabelFont) {
    let (x, y) = label_origin(font);
    font.draw_text(
        img,
        (x + LABEL_SHADOW_OFFSET, y + LABEL_SHADOW_OFFSET),
        LABEL_TEXT,
        LABEL_SHADOW,
    );
    font.draw_text(img, (x, y), LABEL_TEXT, gold(255));
}

pub fn draw_decorations(img: &mut RgbaImage) {
    for (x, y, r) in DOTS {
        paint_ellipse(img, x, y, r, gold(DOT_ALPHA));
    }
}

/// Composites the working raster onto an opaque `background`, using its
/// alpha channel as the mask.
pub fn flatten(img: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let src = img.get_pixel(x, y);
        let a = src[3] as u32;
        let mut out = [0u8; 3];
        for c in 0..3 {
            out[c] = div255(src[c] as u32 * a + background[c] as u32 * (255 - a));
        }
        Rgb(out)
    })
}

/// Rounded division by 255 for products of two 8-bit values.
fn div255(v: u32) -> u8 {
    let t = v + 128;
    ((t + (t >> 8)) >> 8) as u8
}

/// Runs every drawing step in order and returns the flattened icon.
pub fn create_icon(font: &LabelFont, background: Rgb<u8>) -> RgbImage {
    let mut img = new_canvas();
    draw_background(&mut img);
    draw_glow(&mut img);
    draw_ring(&mut img);
    draw_glyph(&mut img);
    draw_label(&mut img, font);
    draw_decorations(&mut img);
    flatten(&img, background)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_runs_top_to_bottom() {
        let mut img = new_canvas();
        draw_background(&mut img);

        assert_eq!(*img.get_pixel(0, 0), Rgba([15, 18, 24, 255]));
        assert_eq!(*img.get_pixel(SIZE - 1, 0), Rgba([15, 18, 24, 255]));
        assert_eq!(*img.get_pixel(0, SIZE - 1), Rgba([24, 29, 39, 255]));
        assert_eq!(*img.get_pixel(7, 512), Rgba([20, 24, 32, 255]));
        assert!(img.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn glow_fades_outward() {
        assert_eq!(glow_color(GLOW_RADIUS)[3], 0);
        assert_eq!(glow_color(GLOW_RADIUS), Rgba([106, 87, 27, 0]));
        assert!(glow_color(1)[3] > glow_color(175)[3]);
        assert!(glow_color(1)[0] > glow_color(175)[0]);
    }

    #[test]
    fn glow_keeps_innermost_disc() {
        let mut img = new_canvas();
        draw_background(&mut img);
        draw_glow(&mut img);
        let (cx, cy) = GLOW_CENTER;
        let center = *img.get_pixel(cx as u32, cy as u32);
        let rim = *img.get_pixel((cx + 300) as u32, cy as u32);

        assert_eq!(center, glow_color(1));
        assert_eq!(rim, glow_color(300));
        assert!(center[3] > rim[3]);
        // outside the glow the gradient is untouched
        assert_eq!(img.get_pixel((cx + 351) as u32, cy as u32)[3], 255);
    }

    #[test]
    fn flattened_glow_stays_a_faint_haze() {
        let mut img = new_canvas();
        draw_background(&mut img);
        draw_glow(&mut img);
        let flat = flatten(&img, FLATTEN_BACKGROUND);
        let (cx, cy) = GLOW_CENTER;

        let center = flat.get_pixel(cx as u32, cy as u32);
        assert_eq!(*center, Rgb([45, 42, 29]));
        for dx in [-62, 62, 150] {
            let px = flat.get_pixel((cx + dx) as u32, cy as u32);
            assert!(px[0] < 60, "glow at {dx} too bright: {px:?}");
        }
    }

    #[test]
    fn ring_alpha_is_lower_near_edges() {
        let mid = (RING_INNER + RING_OUTER) / 2;
        for r in RING_INNER..=RING_INNER + RING_EDGE {
            assert!(ring_alpha(r) < ring_alpha(mid));
        }
        for r in RING_OUTER - RING_EDGE..RING_OUTER {
            assert!(ring_alpha(r) < ring_alpha(mid));
        }
        assert_eq!(ring_alpha(RING_INNER + RING_EDGE + 1), RING_ALPHA_BAND);
    }

    #[test]
    fn ring_pixels_follow_the_band_alpha() {
        let mut img = new_canvas();
        draw_ring(&mut img);

        // straight down from the center at 90°
        let (cx, cy) = RING_CENTER;
        let edge = img.get_pixel(cx as u32, (cy + RING_INNER + 1) as u32);
        let mid = img.get_pixel(cx as u32, (cy + (RING_INNER + RING_OUTER) / 2) as u32);
        assert_eq!(edge[3], RING_ALPHA_EDGE);
        assert_eq!(mid[3], RING_ALPHA_BAND);
        assert!(edge[3] < mid[3]);

        // nothing lands inside the hole
        assert_eq!(img.get_pixel(cx as u32, cy as u32)[3], 0);
    }

    #[test]
    fn ring_brightness_peaks_at_eighth_turn() {
        let peak = ring_color(PI / 8.0);
        assert_eq!(peak, GOLD);
        let trough = ring_color(5.0 * PI / 8.0);
        assert_eq!(trough, [148, 122, 38]);
    }

    #[test]
    fn glyph_fills_bars_and_stem() {
        let mut img = new_canvas();
        draw_glyph(&mut img);
        let (cx, cy) = GLYPH_CENTER;

        // first bar, second bar, the gap between them, and the stem
        assert_eq!(*img.get_pixel(cx as u32, (cy - 140 + 16) as u32), gold(255));
        assert_eq!(*img.get_pixel(cx as u32, (cy - 94 + 16) as u32), gold(255));
        assert_eq!(img.get_pixel((cx - 100) as u32, (cy - 100) as u32)[3], 0);
        assert_eq!(*img.get_pixel(cx as u32, (cy + 150) as u32), gold(255));
        // stem is narrower than the bars
        assert_eq!(img.get_pixel((cx - 40) as u32, (cy + 150) as u32)[3], 0);
    }

    #[test]
    fn decorations_are_faint_gold() {
        let mut img = new_canvas();
        draw_background(&mut img);
        draw_decorations(&mut img);
        for (x, y, _) in DOTS {
            assert_eq!(*img.get_pixel(x as u32, y as u32), gold(DOT_ALPHA));
        }
        assert_eq!(img.get_pixel(200, 200)[3], 255);
    }

    #[test]
    fn flatten_uses_alpha_as_mask() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([200, 100, 50, 0]));
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        img.put_pixel(2, 0, Rgba([255, 255, 255, 128]));

        let flat = flatten(&img, Rgb([10, 20, 30]));
        assert_eq!(*flat.get_pixel(0, 0), Rgb([10, 20, 30]));
        assert_eq!(*flat.get_pixel(1, 0), Rgb([200, 100, 50]));
        assert_eq!(*flat.get_pixel(2, 0), Rgb([133, 138, 143]));
    }

    #[test]
    fn label_shadow_sits_under_and_behind_the_text() {
        let mut img = new_canvas();
        draw_background(&mut img);
        let font = LabelFont::Builtin { dot: 7 };
        let (x, y) = label_origin(&font);
        let gradient = *img.get_pixel(0, (y + 7) as u32);
        let upper_gradient = *img.get_pixel(0, (y + 2) as u32);
        draw_label(&mut img, &font);

        // 'T' is the fourth glyph; its bar is row 0, its stem column 2
        let t_left = x + 3 * 6 * 7;
        let bar_end = t_left + 5 * 7 - 1;

        // inside the bar: gold is drawn over its own shadow
        assert_eq!(*img.get_pixel((t_left + 30) as u32, (y + 4) as u32), gold(255));

        // one row below the bar, right of the stem: only the shadow lands here
        let shadow_only = *img.get_pixel((t_left + 30) as u32, (y + 7) as u32);
        assert!(shadow_only[0] < gradient[0]);
        assert!(shadow_only[2] < gradient[2]);
        assert_eq!(shadow_only[3], 255);

        // the shadow extends two pixels past the bar's right end
        let past_end = *img.get_pixel((bar_end + 2) as u32, (y + 2) as u32);
        assert!(past_end[0] < upper_gradient[0]);
        assert_eq!(
            *img.get_pixel((bar_end + 3) as u32, (y + 2) as u32),
            upper_gradient
        );
    }

    #[test]
    fn label_is_centered() {
        let font = LabelFont::Builtin { dot: 7 };
        let (x, y) = label_origin(&font);
        let width = font.text_width(LABEL_TEXT);
        assert_eq!(x, (SIZE_I - width) / 2);
        assert_eq!(y, SIZE_I - LABEL_BOTTOM_OFFSET);
    }
}
