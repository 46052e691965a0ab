//! Multi-frame image sprite with a fixed advance cadence.
//!
//! Cadence is counted in `advance` calls, not time: with `interval = 5` the
//! displayed frame changes on every fifth call regardless of frame rate.
//! Movement is integrated on the displayed frame only and then replicated,
//! so whichever frame becomes current next starts from the same pose.

use std::path::Path;

use arcade_core::ArcadeError;
use glam::Vec2;

use crate::sprite::{Body, ImageSprite};

#[derive(Debug, Clone, Default)]
pub struct AnimatedSprite {
    frames: Vec<ImageSprite>,
    current: usize,
    interval: u32,
    counter: u32,
}

impl AnimatedSprite {
    /// Load every path at one pose. Any failure drops the frames loaded so
    /// far and returns the error; no partial animation is ever built.
    pub fn load<P: AsRef<Path>>(
        position: Vec2,
        size: Vec2,
        paths: &[P],
        interval: u32,
    ) -> Result<Self, ArcadeError> {
        let frames = paths
            .iter()
            .map(|p| ImageSprite::load(position, size, p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_frames(frames, interval)
    }

    /// Build from already-loaded frames. Frames must be non-empty, loaded
    /// and share one image size.
    pub fn from_frames(frames: Vec<ImageSprite>, interval: u32) -> Result<Self, ArcadeError> {
        let Some(first) = frames.first() else {
            return Err(ArcadeError::asset("", "animation has no frames"));
        };
        let dims = first.image_size();
        if frames.iter().any(|f| !f.is_loaded() || f.image_size() != dims) {
            return Err(ArcadeError::asset(
                "",
                "animation frames must all be loaded and share one size",
            ));
        }
        let pose = first.body;
        let mut frames = frames;
        for frame in &mut frames {
            frame.body = Body {
                active: true,
                ..pose
            };
        }
        Ok(Self {
            frames,
            current: 0,
            interval,
            counter: 0,
        })
    }

    /// The zero-frame sentinel returned when loading fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Mirrors the first frame's flag: an empty or released animation is
    /// inactive.
    pub fn is_active(&self) -> bool {
        self.frames.first().is_some_and(|f| f.body.active)
    }

    pub fn current_frame(&self) -> Option<&ImageSprite> {
        self.frames.get(self.current)
    }

    pub fn current_frame_mut(&mut self) -> Option<&mut ImageSprite> {
        self.frames.get_mut(self.current)
    }

    pub fn body(&self) -> Option<&Body> {
        self.current_frame().map(|f| &f.body)
    }

    /// Integrate the displayed frame, replicate its motion to all frames,
    /// then step the cadence counter.
    pub fn advance(&mut self, gravity: f32, window_height: f32) {
        if !self.is_active() {
            return;
        }
        let Some(current) = self.frames.get_mut(self.current) else {
            return;
        };
        current.advance(gravity, window_height);
        let (position, velocity) = (current.body.position, current.body.velocity);
        for frame in &mut self.frames {
            frame.body.position = position;
            frame.body.velocity = velocity;
        }

        self.counter += 1;
        if self.counter >= self.interval {
            self.current = (self.current + 1) % self.frames.len();
            self.counter = 0;
        }
    }

    /// Free every frame; the animation becomes the empty sentinel.
    pub fn release(&mut self) {
        self.frames.clear();
        self.current = 0;
        self.counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::PixelBuffer;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "arcade_anim_test_{}_{}_{}.png",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn frames(n: usize) -> Vec<ImageSprite> {
        (0..n)
            .map(|i| {
                ImageSprite::from_pixels(Vec2::new(10.0, 20.0), PixelBuffer::filled(4, 4, i as u32))
            })
            .collect()
    }

    #[test]
    fn interval_calls_step_one_frame() {
        let mut anim = AnimatedSprite::from_frames(frames(3), 5).expect("frames");
        for _ in 0..4 {
            anim.advance(0.0, 600.0);
        }
        assert_eq!(anim.current_index(), 0);
        anim.advance(0.0, 600.0);
        assert_eq!(anim.current_index(), 1);
    }

    #[test]
    fn full_cycle_returns_to_start() {
        let mut anim = AnimatedSprite::from_frames(frames(3), 4).expect("frames");
        for _ in 0..(4 * 3) {
            anim.advance(0.0, 600.0);
        }
        assert_eq!(anim.current_index(), 0);
    }

    #[test]
    fn motion_is_replicated_to_every_frame() {
        let mut anim = AnimatedSprite::from_frames(frames(3), 1).expect("frames");
        if let Some(f) = anim.current_frame_mut() {
            f.body.velocity = Vec2::new(2.0, 0.0);
        }
        anim.advance(0.5, 600.0);
        // Index moved to frame 1, which must carry frame 0's result.
        assert_eq!(anim.current_index(), 1);
        let body = anim.body().copied().expect("frame");
        assert_eq!(body.position, Vec2::new(12.0, 20.5));
        assert_eq!(body.velocity, Vec2::new(2.0, 0.5));
    }

    #[test]
    fn mismatched_frame_sizes_are_rejected() {
        let mut f = frames(2);
        f.push(ImageSprite::from_pixels(Vec2::ZERO, PixelBuffer::filled(5, 4, 0)));
        assert!(AnimatedSprite::from_frames(f, 3).is_err());
        assert!(AnimatedSprite::from_frames(Vec::new(), 3).is_err());
    }

    #[test]
    fn one_bad_path_fails_the_whole_animation() {
        let good: Vec<PathBuf> = (0..3)
            .map(|i| {
                let path = temp_file_path(&format!("frame{i}"));
                RgbaImage::from_pixel(8, 8, Rgba([i * 60, 0, 0, 255]))
                    .save(&path)
                    .expect("write fixture");
                path
            })
            .collect();
        for bad_at in [0, 1, 3] {
            let mut paths = good.clone();
            paths.insert(bad_at, PathBuf::from("/no/such/frame.png"));

            let result = AnimatedSprite::load(Vec2::ZERO, Vec2::splat(8.0), &paths, 5);
            assert!(
                matches!(result, Err(ArcadeError::AssetLoad { .. })),
                "bad frame at {bad_at}"
            );
            let anim = result.unwrap_or_default();
            assert_eq!(anim.frame_count(), 0);
            assert!(!anim.is_active());
        }

        let ok = AnimatedSprite::load(Vec2::ZERO, Vec2::splat(8.0), &good, 5).expect("all valid");
        assert_eq!(ok.frame_count(), 3);
        assert!(ok.is_active());

        for p in good {
            let _ = fs::remove_file(p);
        }
    }

    #[test]
    fn released_animation_ignores_advance() {
        let mut anim = AnimatedSprite::from_frames(frames(2), 1).expect("frames");
        anim.release();
        anim.advance(1.0, 600.0);
        assert_eq!(anim.frame_count(), 0);
        assert!(anim.current_frame().is_none());
    }
}
