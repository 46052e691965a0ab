//! Flip and rotate image files into fresh temporary PNGs.
//!
//! Meant for startup: derive mirrored or turned art once from a single
//! source. Each call persists a new file under the OS temp dir and hands the
//! path to the caller, who owns it (and its cleanup) from then on.

use std::path::{Path, PathBuf};

use arcade_core::ArcadeError;
use image::{imageops, ImageFormat, RgbaImage};

const FLIP_PREFIX: &str = "arcade_flip_";
const ROTATE_PREFIX: &str = "arcade_rotate_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    /// Mirror left-right.
    Horizontal,
    /// Mirror top-bottom.
    Vertical,
}

/// Clockwise quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Identity,
    Cw90,
    Cw180,
    Cw270,
}

impl TryFrom<i32> for Rotation {
    type Error = ArcadeError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Self::Identity),
            90 => Ok(Self::Cw90),
            180 => Ok(Self::Cw180),
            270 => Ok(Self::Cw270),
            other => Err(ArcadeError::transform(
                "",
                format!("rotation must be 0, 90, 180 or 270 degrees, got {other}"),
            )),
        }
    }
}

pub fn flip_image(path: &Path, axis: FlipAxis) -> Result<PathBuf, ArcadeError> {
    let source = open(path)?;
    let flipped = match axis {
        FlipAxis::Horizontal => imageops::flip_horizontal(&source),
        FlipAxis::Vertical => imageops::flip_vertical(&source),
    };
    persist(path, &flipped, FLIP_PREFIX)
}

pub fn rotate_image(path: &Path, degrees: i32) -> Result<PathBuf, ArcadeError> {
    let rotation = Rotation::try_from(degrees).map_err(|e| match e {
        ArcadeError::Transform { reason, .. } => ArcadeError::transform(path, reason),
        other => other,
    })?;
    let source = open(path)?;
    let rotated = match rotation {
        Rotation::Identity => source,
        Rotation::Cw90 => imageops::rotate90(&source),
        Rotation::Cw180 => imageops::rotate180(&source),
        Rotation::Cw270 => imageops::rotate270(&source),
    };
    persist(path, &rotated, ROTATE_PREFIX)
}

fn open(path: &Path) -> Result<RgbaImage, ArcadeError> {
    image::open(path)
        .map(|img| img.into_rgba8())
        .map_err(|e| ArcadeError::transform(path, format!("decode: {e}")))
}

fn persist(source: &Path, image: &RgbaImage, prefix: &str) -> Result<PathBuf, ArcadeError> {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(".png")
        .tempfile()
        .map_err(|e| ArcadeError::transform(source, format!("create temp file: {e}")))?;
    // The temp file is removed on drop until `keep` succeeds.
    image
        .write_to(file.as_file_mut(), ImageFormat::Png)
        .map_err(|e| ArcadeError::transform(source, format!("encode: {e}")))?;
    let (_, out) = file
        .keep()
        .map_err(|e| ArcadeError::transform(source, format!("persist temp file: {e}")))?;
    log::debug!("Wrote '{}' from '{}'", out.display(), source.display());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "arcade_transform_test_{}_{}_{}.png",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    /// 3x2 image with every pixel distinct and some transparency.
    fn fixture(name_hint: &str) -> (PathBuf, RgbaImage) {
        let image = RgbaImage::from_fn(3, 2, |x, y| {
            let a = if (x + y) % 2 == 0 { 255 } else { 0 };
            Rgba([(x * 80) as u8, (y * 120) as u8, (x + y * 3) as u8 * 20, a])
        });
        let path = temp_file_path(name_hint);
        image.save(&path).expect("write fixture");
        (path, image)
    }

    fn read(path: &Path) -> RgbaImage {
        image::open(path).expect("read back").into_rgba8()
    }

    fn cleanup<P: AsRef<Path>>(paths: &[P]) {
        for p in paths {
            let _ = fs::remove_file(p);
        }
    }

    #[test]
    fn rotate_180_twice_is_identity() {
        let (src, original) = fixture("rot180");
        let once = rotate_image(&src, 180).expect("rotate");
        let twice = rotate_image(&once, 180).expect("rotate");
        assert_ne!(read(&once), original);
        assert_eq!(read(&twice), original);
        cleanup(&[&src, &once, &twice]);
    }

    #[test]
    fn rotate_90_swaps_dimensions_and_four_turns_is_identity() {
        let (src, original) = fixture("rot90");
        let mut paths = vec![src.clone()];
        for _ in 0..4 {
            let last = paths.last().cloned().expect("path");
            paths.push(rotate_image(&last, 90).expect("rotate"));
        }
        assert_eq!(read(&paths[1]).dimensions(), (2, 3));
        assert_eq!(read(&paths[4]), original);
        cleanup(&paths);
    }

    #[test]
    fn rotate_90_is_clockwise() {
        let (src, original) = fixture("cw");
        let out = rotate_image(&src, 90).expect("rotate");
        let rotated = read(&out);
        // Clockwise: the source's bottom-left lands at the top-left.
        assert_eq!(rotated.get_pixel(0, 0), original.get_pixel(0, 1));
        cleanup(&[&src, &out]);
    }

    #[test]
    fn flip_twice_is_identity_on_each_axis() {
        for axis in [FlipAxis::Horizontal, FlipAxis::Vertical] {
            let (src, original) = fixture("flip");
            let once = flip_image(&src, axis).expect("flip");
            let twice = flip_image(&once, axis).expect("flip");
            assert_ne!(read(&once), original);
            assert_eq!(read(&twice), original);
            cleanup(&[&src, &once, &twice]);
        }
    }

    #[test]
    fn output_names_carry_prefix_and_png_suffix() {
        let (src, _) = fixture("names");
        let flipped = flip_image(&src, FlipAxis::Horizontal).expect("flip");
        let rotated = rotate_image(&src, 0).expect("rotate");
        let name = |p: &Path| p.file_name().and_then(|n| n.to_str()).unwrap_or("").to_string();
        assert!(name(&flipped).starts_with("arcade_flip_"));
        assert!(name(&rotated).starts_with("arcade_rotate_"));
        assert!(name(&flipped).ends_with(".png"));
        cleanup(&[&src, &flipped, &rotated]);
    }

    #[test]
    fn bad_inputs_are_transform_errors() {
        let (src, _) = fixture("bad");
        assert!(matches!(
            rotate_image(&src, 45),
            Err(ArcadeError::Transform { .. })
        ));
        assert!(matches!(
            flip_image(Path::new("/no/such/file.png"), FlipAxis::Vertical),
            Err(ArcadeError::Transform { .. })
        ));
        cleanup(&[&src]);
    }
}
