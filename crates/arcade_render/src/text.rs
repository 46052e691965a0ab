//! 8x8 bitmap font text, scaled by an integer factor.
//!
//! `y` is the top edge of the glyph cell. Glyphs outside basic Latin draw as
//! an outlined box. Background pixels are left untouched.

use arcade_core::ArcadeError;
use font8x8::{UnicodeFonts, BASIC_FONTS};

use crate::raster::Canvas;

const GLYPH_SIZE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    scale: u32,
}

impl BitmapFont {
    pub fn new(scale: u32) -> Result<Self, ArcadeError> {
        if scale == 0 {
            return Err(ArcadeError::Init("font scale must be at least 1".to_string()));
        }
        Ok(Self { scale })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn advance(&self) -> u32 {
        GLYPH_SIZE * self.scale
    }

    pub fn text_width(&self, text: &str) -> u32 {
        (text.chars().count() as u32).saturating_mul(self.advance())
    }

    /// Left edge that centers `text` across `surface_width`. Negative when
    /// the text is wider than the surface.
    pub fn centered_x(&self, text: &str, surface_width: u32) -> f32 {
        (surface_width as f32 - self.text_width(text) as f32) / 2.0
    }

    pub fn draw(&self, canvas: &mut Canvas<'_>, text: &str, x: f32, y: f32, color: u32) {
        let (mut pen_x, pen_y) = (x as i64, y as i64);
        for c in text.chars() {
            if c != ' ' {
                match BASIC_FONTS.get(c) {
                    Some(rows) => self.draw_glyph(canvas, &rows, pen_x, pen_y, color),
                    None => self.draw_box(canvas, pen_x, pen_y, color),
                }
            }
            pen_x += self.advance() as i64;
        }
    }

    fn draw_glyph(&self, canvas: &mut Canvas<'_>, rows: &[u8; 8], x: i64, y: i64, color: u32) {
        let s = self.scale as i64;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_SIZE as i64 {
                // Bit 0 is the leftmost column.
                if bits & (1 << col) == 0 {
                    continue;
                }
                self.put_cell(canvas, x + col * s, y + row as i64 * s, color);
            }
        }
    }

    fn draw_box(&self, canvas: &mut Canvas<'_>, x: i64, y: i64, color: u32) {
        let s = self.scale as i64;
        let last = GLYPH_SIZE as i64 - 1;
        for i in 0..GLYPH_SIZE as i64 {
            self.put_cell(canvas, x + i * s, y, color);
            self.put_cell(canvas, x + i * s, y + last * s, color);
            self.put_cell(canvas, x, y + i * s, color);
            self.put_cell(canvas, x + last * s, y + i * s, color);
        }
    }

    fn put_cell(&self, canvas: &mut Canvas<'_>, x: i64, y: i64, color: u32) {
        let s = self.scale as i64;
        for dy in 0..s {
            for dx in 0..s {
                canvas.put(x + dx, y + dy, color);
            }
        }
    }
}

/// Even on/off duty cycle: visible for `interval` frames, hidden for the
/// next `interval`. An interval of 0 is always visible.
pub fn blink_visible(frame: u64, interval: u32) -> bool {
    if interval == 0 {
        return true;
    }
    let interval = interval as u64;
    frame % (2 * interval) < interval
}
