//! Raster primitives over an RGBA working buffer.
//!
//! Coordinates are signed so shapes may extend past the canvas edges;
//! anything outside the buffer is clipped silently.

use image::{Rgba, RgbaImage};

/// Returns true when `(x, y)` addresses a pixel inside `img`.
pub fn in_bounds(img: &RgbaImage, x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height()
}

/// Overwrite a pixel, all four channels included.
pub fn put_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if in_bounds(img, x, y) {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Composite `color` over the pixel at `(x, y)` (source-over).
pub fn blend_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if !in_bounds(img, x, y) || color[3] == 0 {
        return;
    }

    let dst = img.get_pixel_mut(x as u32, y as u32);
    *dst = source_over(*dst, color);
}

fn source_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let value = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        out[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

/// Fill a circle of `radius` around `(cx, cy)`, replacing every covered
/// pixel outright, alpha included. The bounding box is
/// `[cx - radius, cx + radius]` inclusive on both axes.
pub fn paint_ellipse(img: &mut RgbaImage, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
    if radius < 0 {
        return;
    }

    let r2 = (radius as i64) * (radius as i64);
    let (x0, x1) = clip_span(cx - radius, cx + radius, img.width());
    let (y0, y1) = clip_span(cy - radius, cy + radius, img.height());

    for y in y0..=y1 {
        let dy = (y - cy) as i64;
        for x in x0..=x1 {
            let dx = (x - cx) as i64;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Fill the inclusive rectangle `[x0, y0] - [x1, y1]` with corners rounded
/// to `radius`.
pub fn fill_rounded_rect(
    img: &mut RgbaImage,
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
    radius: i32,
    color: Rgba<u8>,
) {
    if x1 < x0 || y1 < y0 {
        return;
    }

    // A radius larger than half the short side collapses into a capsule.
    let radius = radius.max(0).min((x1 - x0) / 2).min((y1 - y0) / 2);
    let r2 = (radius as i64) * (radius as i64);

    let (cx0, cx1) = clip_span(x0, x1, img.width());
    let (cy0, cy1) = clip_span(y0, y1, img.height());

    for y in cy0..=cy1 {
        let ny = y.clamp(y0 + radius, y1 - radius);
        for x in cx0..=cx1 {
            let nx = x.clamp(x0 + radius, x1 - radius);
            let dx = (x - nx) as i64;
            let dy = (y - ny) as i64;
            if dx * dx + dy * dy <= r2 {
                blend_pixel(img, x, y, color);
            }
        }
    }
}

fn clip_span(lo: i32, hi: i32, len: u32) -> (i32, i32) {
    (lo.max(0), hi.min(len as i32 - 1))
}
