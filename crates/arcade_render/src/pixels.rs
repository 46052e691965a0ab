//! Packed 0xAARRGGBB pixel storage.

use image::RgbaImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u32>,
}

impl PixelBuffer {
    /// Wrap `data`; `None` if its length is not `width * height`.
    pub fn new(width: u32, height: u32, data: Vec<u32>) -> Option<Self> {
        (data.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: u32, height: u32, pixel: u32) -> Self {
        Self {
            width,
            height,
            data: vec![pixel; width as usize * height as usize],
        }
    }

    /// Repack byte-order RGBA into 0xAARRGGBB.
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let data = image
            .pixels()
            .map(|p| pack_argb(p[0], p[1], p[2], p[3]))
            .collect();
        Self {
            width: image.width(),
            height: image.height(),
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get((y * self.width + x) as usize).copied()
    }
}

pub fn pack_argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

pub fn alpha(pixel: u32) -> u8 {
    (pixel >> 24) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_length() {
        assert!(PixelBuffer::new(2, 2, vec![0; 3]).is_none());
        assert!(PixelBuffer::new(2, 2, vec![0; 4]).is_some());
    }

    #[test]
    fn pack_puts_alpha_in_high_byte() {
        let px = pack_argb(0x11, 0x22, 0x33, 0x80);
        assert_eq!(px, 0x8011_2233);
        assert_eq!(alpha(px), 0x80);
    }

    #[test]
    fn from_rgba_repacks_each_pixel() {
        let image = RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 1, 2, 3, 0]).unwrap();
        let buf = PixelBuffer::from_rgba(&image);
        assert_eq!(buf.data(), &[0xFFFF_0000, 0x0001_0203]);
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let buf = PixelBuffer::new(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(buf.pixel(1, 0), Some(2));
        assert_eq!(buf.pixel(0, 1), Some(3));
        assert_eq!(buf.pixel(2, 0), None);
    }
}
