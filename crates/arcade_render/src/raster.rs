//! Software rasterizer.
//!
//! Pixels are packed `u32`. Flat fills and the background are 0x00RRGGBB;
//! image texels keep their alpha byte, which only ever means "skip" (0) or
//! "copy" (anything else). There is no partial blending.
//!
//! Positions are truncated toward zero before rasterizing, and every write
//! is clipped to the destination per pixel.

use arcade_core::ArcadeError;

use crate::pixels::{alpha, PixelBuffer};
use crate::sprite::SpriteRef;

/// Mutable view over a row-major pixel slice.
pub struct Canvas<'a> {
    width: u32,
    height: u32,
    pixels: &'a mut [u32],
}

impl<'a> Canvas<'a> {
    /// `None` if `pixels` is not exactly `width * height` long.
    pub fn new(width: u32, height: u32, pixels: &'a mut [u32]) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Write one pixel; out-of-bounds coordinates are ignored.
    pub fn put(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.pixels[y as usize * self.width as usize + x as usize] = color;
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32) {
        let (x0, y0) = (x as i64, y as i64);
        let (x1, y1) = (x0.saturating_add(w as i64), y0.saturating_add(h as i64));

        let cx0 = x0.max(0);
        let cy0 = y0.max(0);
        let cx1 = x1.min(self.width as i64);
        let cy1 = y1.min(self.height as i64);
        if cx0 >= cx1 || cy0 >= cy1 {
            return;
        }
        let stride = self.width as usize;
        for row in cy0 as usize..cy1 as usize {
            let start = row * stride;
            self.pixels[start + cx0 as usize..start + cx1 as usize].fill(color);
        }
    }

    /// Copy `image` with its top-left at (x, y), bounded by both the image
    /// and the `w` x `h` sprite box. Texels with alpha 0 are skipped.
    pub fn blit(&mut self, x: f32, y: f32, w: f32, h: f32, image: &PixelBuffer) {
        let (x0, y0) = (x as i64, y as i64);
        let (iw, ih) = (image.width() as i64, image.height() as i64);
        let cols = (w as i64).min(iw);
        let rows = (h as i64).min(ih);
        let (dw, dh) = (self.width as i64, self.height as i64);
        let src = image.data();

        for sy in 0..rows {
            let dy = y0 + sy;
            if dy < 0 {
                continue;
            }
            if dy >= dh {
                break;
            }
            for sx in 0..cols {
                let dx = x0 + sx;
                if dx < 0 {
                    continue;
                }
                if dx >= dw {
                    break;
                }
                let texel = src[(sy * iw + sx) as usize];
                if alpha(texel) != 0 {
                    self.pixels[(dy * dw + dx) as usize] = texel;
                }
            }
        }
    }

    /// Paint one sprite. Inactive sprites and unloaded images draw nothing.
    pub fn paint(&mut self, sprite: SpriteRef<'_>) {
        let body = sprite.body();
        if !body.active {
            return;
        }
        let (p, s) = (body.position, body.size);
        match sprite {
            SpriteRef::Flat(flat) => self.fill_rect(p.x, p.y, s.x, s.y, flat.color),
            SpriteRef::Image(image) => {
                if let Some(pixels) = image.pixels() {
                    self.blit(p.x, p.y, s.x, s.y, pixels);
                }
            }
        }
    }
}

/// Back buffer for composing, front buffer for what was last presented.
///
/// Overlays such as text are drawn into the front buffer after `publish`,
/// so they sit above every sprite and vanish on the next compose.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    bg_color: u32,
    back: Vec<u32>,
    front: Vec<u32>,
}

impl FrameBuffer {
    /// Both buffers start filled with `bg_color`. Allocation failure is an
    /// init error rather than an abort.
    pub fn new(width: u32, height: u32, bg_color: u32) -> Result<Self, ArcadeError> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| ArcadeError::Init(format!("frame {width}x{height} is too large")))?;
        let back = allocate(len, bg_color)?;
        let front = allocate(len, bg_color)?;
        log::debug!("Frame buffers allocated: {width}x{height}");
        Ok(Self {
            width,
            height,
            bg_color,
            back,
            front,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bg_color(&self) -> u32 {
        self.bg_color
    }

    pub fn back(&self) -> &[u32] {
        &self.back
    }

    pub fn front(&self) -> &[u32] {
        &self.front
    }

    pub fn back_canvas(&mut self) -> Canvas<'_> {
        Canvas {
            width: self.width,
            height: self.height,
            pixels: &mut self.back,
        }
    }

    pub fn front_canvas(&mut self) -> Canvas<'_> {
        Canvas {
            width: self.width,
            height: self.height,
            pixels: &mut self.front,
        }
    }

    pub fn clear(&mut self) {
        self.back.fill(self.bg_color);
    }

    pub fn paint(&mut self, sprite: SpriteRef<'_>) {
        self.back_canvas().paint(sprite);
    }

    /// Clear, then paint in order (first is furthest back).
    pub fn compose<'s>(&mut self, sprites: impl IntoIterator<Item = SpriteRef<'s>>) {
        self.clear();
        let mut canvas = self.back_canvas();
        for sprite in sprites {
            canvas.paint(sprite);
        }
    }

    /// Copy the composed frame to the front buffer and return it.
    pub fn publish(&mut self) -> &[u32] {
        self.front.copy_from_slice(&self.back);
        &self.front
    }
}

fn allocate(len: usize, fill: u32) -> Result<Vec<u32>, ArcadeError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|e| ArcadeError::Init(format!("cannot allocate pixel buffer: {e}")))?;
    pixels.resize(len, fill);
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{FlatSprite, ImageSprite};
    use glam::Vec2;

    fn frame(w: u32, h: u32) -> FrameBuffer {
        FrameBuffer::new(w, h, 0x000010).expect("alloc")
    }

    fn at(frame: &FrameBuffer, x: u32, y: u32) -> u32 {
        frame.back()[(y * frame.width() + x) as usize]
    }

    #[test]
    fn new_frame_is_background() {
        let f = frame(4, 3);
        assert!(f.back().iter().all(|&p| p == 0x000010));
        assert!(f.front().iter().all(|&p| p == 0x000010));
    }

    #[test]
    fn flat_fill_truncates_and_clips() {
        let mut f = frame(4, 4);
        let s = FlatSprite::new(Vec2::new(-1.5, 2.9), Vec2::new(3.0, 5.0), 0xFF0000);
        f.paint((&s).into());
        // x in [-1, 2), y in [2, 7) clipped to [0, 2) x [2, 4)
        assert_eq!(at(&f, 0, 2), 0xFF0000);
        assert_eq!(at(&f, 1, 3), 0xFF0000);
        assert_eq!(at(&f, 2, 2), 0x000010);
        assert_eq!(at(&f, 0, 1), 0x000010);
    }

    #[test]
    fn fully_offscreen_sprite_draws_nothing() {
        let mut f = frame(4, 4);
        let s = FlatSprite::new(Vec2::new(100.0, -50.0), Vec2::splat(10.0), 0xFF0000);
        f.paint((&s).into());
        assert!(f.back().iter().all(|&p| p == 0x000010));
    }

    #[test]
    fn blit_skips_transparent_texels() {
        let mut f = frame(3, 1);
        let texels = vec![0xFF11_2233, 0x00FF_FFFF, 0x01AB_CDEF];
        let image = PixelBuffer::new(3, 1, texels).expect("len");
        let s = ImageSprite::from_pixels(Vec2::ZERO, image);
        f.paint((&s).into());
        assert_eq!(f.back(), &[0xFF11_2233, 0x000010, 0x01AB_CDEF]);
    }

    #[test]
    fn blit_clipped_on_the_left_keeps_texel_alignment() {
        let mut f = frame(2, 1);
        let texels = vec![0xFF00_0001, 0xFF00_0002, 0xFF00_0003];
        let image = PixelBuffer::new(3, 1, texels).expect("len");
        let s = ImageSprite::from_pixels(Vec2::new(-1.0, 0.0), image);
        f.paint((&s).into());
        assert_eq!(f.back(), &[0xFF00_0002, 0xFF00_0003]);
    }

    /// 3x3 opaque image whose texel value encodes its (x, y).
    fn grid_image() -> PixelBuffer {
        let texels = (0..9u32).map(|i| 0xFF00_0000 | ((i / 3) << 8) | (i % 3)).collect();
        PixelBuffer::new(3, 3, texels).expect("len")
    }

    #[test]
    fn blit_clipped_on_the_right_and_bottom() {
        let mut f = frame(3, 3);
        let s = ImageSprite::from_pixels(Vec2::new(1.0, 1.0), grid_image());
        f.paint((&s).into());
        assert_eq!(at(&f, 0, 0), 0x000010);
        assert_eq!(at(&f, 1, 1), 0xFF00_0000);
        assert_eq!(at(&f, 2, 1), 0xFF00_0001);
        assert_eq!(at(&f, 1, 2), 0xFF00_0100);
        assert_eq!(at(&f, 2, 2), 0xFF00_0101);
        assert_eq!(at(&f, 0, 2), 0x000010);
        assert_eq!(at(&f, 2, 0), 0x000010);
    }

    #[test]
    fn sprite_box_smaller_than_image_crops_from_top_left() {
        let mut f = frame(4, 4);
        let mut s = ImageSprite::from_pixels(Vec2::ZERO, grid_image());
        s.body.size = Vec2::new(2.0, 1.0);
        f.paint((&s).into());
        assert_eq!(at(&f, 0, 0), 0xFF00_0000);
        assert_eq!(at(&f, 1, 0), 0xFF00_0001);
        assert_eq!(at(&f, 2, 0), 0x000010);
        assert_eq!(at(&f, 0, 1), 0x000010);
    }

    #[test]
    fn inactive_and_released_sprites_are_not_painted() {
        let mut f = frame(2, 2);
        let mut flat = FlatSprite::new(Vec2::ZERO, Vec2::splat(2.0), 0xFFFFFF);
        flat.body.active = false;
        let pixels = PixelBuffer::filled(2, 2, 0xFFFF_FFFF);
        let mut image = ImageSprite::from_pixels(Vec2::ZERO, pixels);
        image.release();
        image.body.active = true;
        f.compose([SpriteRef::from(&flat), SpriteRef::from(&image)]);
        assert!(f.back().iter().all(|&p| p == 0x000010));
    }

    #[test]
    fn compose_paints_back_to_front_and_publish_copies() {
        let mut f = frame(2, 1);
        let under = FlatSprite::new(Vec2::ZERO, Vec2::new(2.0, 1.0), 0x0000FF);
        let over = FlatSprite::new(Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), 0x00FF00);
        f.compose([SpriteRef::from(&under), SpriteRef::from(&over)]);
        assert_eq!(f.back(), &[0x0000FF, 0x00FF00]);
        assert_eq!(f.front(), &[0x000010, 0x000010]);
        assert_eq!(f.publish(), &[0x0000FF, 0x00FF00]);

        f.compose(std::iter::empty::<SpriteRef>());
        assert_eq!(f.back(), &[0x000010, 0x000010]);
    }

    #[test]
    fn canvas_rejects_wrong_length() {
        let mut pixels = vec![0u32; 5];
        assert!(Canvas::new(2, 2, &mut pixels).is_none());
        assert!(Canvas::new(5, 1, &mut pixels).is_some());
    }
}
