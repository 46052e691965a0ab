//! Image asset pipeline: decode -> resize -> repack.
//!
//! Resizing is done in linear light with premultiplied alpha, so
//! downscaled edges do not darken and transparent texels do not bleed their
//! (meaningless) color into opaque neighbours.

use std::path::Path;

use arcade_core::ArcadeError;
use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage, RgbaImage};

use crate::pixels::PixelBuffer;

/// Decode any supported image file to 8-bit RGBA.
pub fn decode(path: &Path) -> Result<RgbaImage, ArcadeError> {
    let image = image::open(path).map_err(|e| ArcadeError::asset(path, e))?;
    Ok(image.into_rgba8())
}

/// Gamma-aware resample to `width` x `height`. Both must be non-zero.
pub fn resize(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    let linear = to_linear_premultiplied(src);
    let resized = imageops::resize(&linear, width, height, FilterType::CatmullRom);
    to_srgb_straight(&resized)
}

pub fn repack(image: &RgbaImage) -> PixelBuffer {
    PixelBuffer::from_rgba(image)
}

/// Full pipeline used by image sprites. Intermediate images are dropped on
/// every exit path.
pub fn load_pixels(path: &Path, width: u32, height: u32) -> Result<PixelBuffer, ArcadeError> {
    if width == 0 || height == 0 {
        return Err(ArcadeError::asset(
            path,
            format!("target size {width}x{height} is empty"),
        ));
    }
    let decoded = decode(path)?;
    let resized = resize(&decoded, width, height);
    log::trace!(
        "Loaded '{}' {}x{} -> {}x{}",
        path.display(),
        decoded.width(),
        decoded.height(),
        width,
        height
    );
    Ok(repack(&resized))
}

fn srgb_to_linear_lut() -> [f32; 256] {
    let mut lut = [0.0; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        let c = i as f32 / 255.0;
        *v = if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        };
    }
    lut
}

fn linear_to_srgb(l: f32) -> u8 {
    let l = l.clamp(0.0, 1.0);
    let s = if l <= 0.003_130_8 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0).round().clamp(0.0, 255.0) as u8
}

fn to_linear_premultiplied(src: &RgbaImage) -> Rgba32FImage {
    let lut = srgb_to_linear_lut();
    Rgba32FImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let a = a as f32 / 255.0;
        Rgba([
            lut[r as usize] * a,
            lut[g as usize] * a,
            lut[b as usize] * a,
            a,
        ])
    })
}

fn to_srgb_straight(src: &Rgba32FImage) -> RgbaImage {
    RgbaImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let a = a.clamp(0.0, 1.0);
        let a8 = (a * 255.0).round() as u8;
        if a8 == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let inv = 1.0 / a;
        Rgba([
            linear_to_srgb(r * inv),
            linear_to_srgb(g * inv),
            linear_to_srgb(b * inv),
            a8,
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str, ext: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "arcade_loader_test_{}_{}_{}.{}",
            name_hint,
            std::process::id(),
            nanos,
            ext
        ))
    }

    #[test]
    fn decode_missing_file_is_asset_error() {
        let err = decode(Path::new("/no/such/sprite.png")).expect_err("should fail");
        assert!(matches!(err, ArcadeError::AssetLoad { .. }));
    }

    #[test]
    fn decode_corrupt_file_is_asset_error() {
        let path = temp_file_path("corrupt", "png");
        fs::write(&path, b"definitely not a png").expect("write temp file");
        let err = decode(&path).expect_err("corrupt file should fail");
        assert!(matches!(err, ArcadeError::AssetLoad { .. }));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn same_size_resize_is_exact() {
        let src = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 40, y as u8 * 90, 7, 255]));
        assert_eq!(resize(&src, 3, 2), src);
    }

    #[test]
    fn solid_color_survives_resize() {
        let src = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 255]));
        let out = resize(&src, 3, 5);
        assert_eq!(out.dimensions(), (3, 5));
        for p in out.pixels() {
            assert!((p[0] as i32 - 200).abs() <= 1);
            assert!((p[1] as i32 - 100).abs() <= 1);
            assert!((p[2] as i32 - 50).abs() <= 1);
            assert_eq!(p[3], 255);
        }
    }

    #[test]
    fn fully_transparent_stays_transparent() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 0]));
        let out = resize(&src, 2, 2);
        assert!(out.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn downscale_averages_in_linear_light() {
        // Black/white checkerboard: a gamma-naive average gives ~128, a
        // linear-light average gives ~188.
        let src = RgbaImage::from_fn(16, 16, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        let out = resize(&src, 1, 1);
        let v = out.get_pixel(0, 0)[0];
        assert!(v > 160, "expected linear-light average, got {v}");
    }

    #[test]
    fn load_pixels_resizes_and_repacks() {
        let path = temp_file_path("load", "png");
        RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 255]))
            .save(&path)
            .expect("write fixture");

        let pixels = load_pixels(&path, 4, 6).expect("should load");
        assert_eq!((pixels.width(), pixels.height()), (4, 6));
        assert!(pixels.data().iter().all(|&p| p == 0xFF00_FF00));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_pixels_rejects_empty_target() {
        let err = load_pixels(Path::new("whatever.png"), 0, 10).expect_err("should fail");
        assert!(err.to_string().contains("empty"));
    }
}
