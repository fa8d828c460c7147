//! Brightness and color enhancement of opaque RGB images.
//!
//! Both operations interpolate between the source and a "degenerate"
//! version of it: `out = degenerate + factor * (pixel - degenerate)`.
//! A factor of 1.0 returns the source unchanged.

use image::{Rgb, RgbImage};

/// Scale every channel toward black. Factors below 1.0 darken.
pub fn brightness(img: &RgbImage, factor: f32) -> RgbImage {
    map_pixels(img, |px| {
        Rgb([
            mix(0, px[0], factor),
            mix(0, px[1], factor),
            mix(0, px[2], factor),
        ])
    })
}

/// Push each pixel away from its own gray level. Factors above 1.0 saturate.
pub fn saturation(img: &RgbImage, factor: f32) -> RgbImage {
    map_pixels(img, |px| {
        let gray = luma(px);
        Rgb([
            mix(gray, px[0], factor),
            mix(gray, px[1], factor),
            mix(gray, px[2], factor),
        ])
    })
}

/// ITU-R 601-2 luma.
pub fn luma(px: &Rgb<u8>) -> u8 {
    let weighted = px[0] as u32 * 299 + px[1] as u32 * 587 + px[2] as u32 * 114;
    ((weighted + 500) / 1000) as u8
}

fn mix(degenerate: u8, value: u8, factor: f32) -> u8 {
    let out = degenerate as f32 + factor * (value as f32 - degenerate as f32);
    out.clamp(0.0, 255.0) as u8
}

fn map_pixels<F>(img: &RgbImage, f: F) -> RgbImage
where
    F: Fn(&Rgb<u8>) -> Rgb<u8>,
{
    RgbImage::from_fn(img.width(), img.height(), |x, y| f(img.get_pixel(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(px: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(1, 1, Rgb(px))
    }

    #[test]
    fn brightness_scales_channels_down() {
        let out = brightness(&single([212, 175, 55]), 0.85);
        assert_eq!(*out.get_pixel(0, 0), Rgb([180, 148, 46]));
    }

    #[test]
    fn brightness_never_exceeds_source() {
        let img = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 255]));
        let dark = brightness(&img, 0.85);
        for (a, b) in img.pixels().zip(dark.pixels()) {
            assert!(b[0] <= a[0] && b[1] <= a[1] && b[2] <= a[2]);
        }
    }

    #[test]
    fn saturation_leaves_grays_alone() {
        let out = saturation(&single([90, 90, 90]), 1.3);
        assert_eq!(*out.get_pixel(0, 0), Rgb([90, 90, 90]));
    }

    #[test]
    fn saturation_spreads_channels_around_luma() {
        let px = Rgb([212, 175, 55]);
        let gray = luma(&px);
        let out = saturation(&single(px.0), 1.3);
        let out = out.get_pixel(0, 0);

        assert!(out[0] > px[0]);
        assert!(out[2] < px[2]);
        assert!(gray > 55 && gray < 212);
    }

    #[test]
    fn saturation_clamps() {
        let out = saturation(&single([255, 0, 0]), 3.0);
        assert_eq!(*out.get_pixel(0, 0), Rgb([255, 0, 0]));
    }

    #[test]
    fn factor_one_is_identity() {
        let img = single([17, 200, 99]);
        assert_eq!(brightness(&img, 1.0), img);
        assert_eq!(saturation(&img, 1.0), img);
    }
}
