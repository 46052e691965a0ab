//! Flat-color and image sprites, and the closed sum types the renderer and
//! the collision engine dispatch on.

use std::path::Path;
use std::rc::Rc;

use arcade_core::ArcadeError;
use glam::Vec2;

use crate::loader;
use crate::physics;
use crate::pixels::PixelBuffer;

/// Pose and motion shared by every sprite kind. Position is the top-left
/// corner in pixels, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub active: bool,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            active: true,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    /// Integrate one step unless inactive.
    pub fn advance(&mut self, gravity: f32, window_height: f32) {
        if self.active {
            physics::integrate(self, gravity, window_height);
        }
    }
}

/// Solid rectangle. Owns nothing on the heap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatSprite {
    pub body: Body,
    /// 0xRRGGBB
    pub color: u32,
}

impl FlatSprite {
    pub fn new(position: Vec2, size: Vec2, color: u32) -> Self {
        Self {
            body: Body::new(position, size),
            color,
        }
    }

    pub fn advance(&mut self, gravity: f32, window_height: f32) {
        self.body.advance(gravity, window_height);
    }
}

/// Sprite backed by a decoded, resized ARGB pixel buffer.
///
/// A failed load yields the empty sentinel: no pixels and `active == false`.
/// Clones share the pixel buffer; it is freed when the last holder lets go.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSprite {
    pub body: Body,
    pixels: Option<Rc<PixelBuffer>>,
}

impl ImageSprite {
    /// Decode `path` and resample it to `size` (rounded down to whole pixels).
    pub fn load(position: Vec2, size: Vec2, path: &Path) -> Result<Self, ArcadeError> {
        let (w, h) = (size.x.max(0.0) as u32, size.y.max(0.0) as u32);
        let pixels = loader::load_pixels(path, w, h)?;
        Ok(Self::from_pixels(position, pixels))
    }

    /// Wrap already-decoded pixels; the sprite takes the buffer's size.
    pub fn from_pixels(position: Vec2, pixels: PixelBuffer) -> Self {
        let size = Vec2::new(pixels.width() as f32, pixels.height() as f32);
        Self {
            body: Body::new(position, size),
            pixels: Some(Rc::new(pixels)),
        }
    }

    pub fn empty() -> Self {
        Self {
            body: Body {
                position: Vec2::ZERO,
                size: Vec2::ZERO,
                velocity: Vec2::ZERO,
                active: false,
            },
            pixels: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.pixels.is_some()
    }

    pub fn pixels(&self) -> Option<&PixelBuffer> {
        self.pixels.as_deref()
    }

    /// Dimensions of the pixel buffer, (0, 0) once released.
    pub fn image_size(&self) -> (u32, u32) {
        self.pixels
            .as_ref()
            .map_or((0, 0), |p| (p.width(), p.height()))
    }

    /// Drop the pixel buffer and deactivate. Safe to call repeatedly.
    pub fn release(&mut self) {
        self.pixels = None;
        self.body.active = false;
    }

    pub fn advance(&mut self, gravity: f32, window_height: f32) {
        self.body.advance(gravity, window_height);
    }
}

impl Default for ImageSprite {
    fn default() -> Self {
        Self::empty()
    }
}

/// Owned sprite of either kind, as stored in a `SpriteGroup`.
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    Flat(FlatSprite),
    Image(ImageSprite),
}

impl Sprite {
    pub fn body(&self) -> &Body {
        match self {
            Self::Flat(s) => &s.body,
            Self::Image(s) => &s.body,
        }
    }

    pub fn view(&self) -> SpriteRef<'_> {
        match self {
            Self::Flat(s) => SpriteRef::Flat(s),
            Self::Image(s) => SpriteRef::Image(s),
        }
    }
}

impl From<FlatSprite> for Sprite {
    fn from(sprite: FlatSprite) -> Self {
        Self::Flat(sprite)
    }
}

impl From<ImageSprite> for Sprite {
    fn from(sprite: ImageSprite) -> Self {
        Self::Image(sprite)
    }
}

/// Borrowed sprite of either kind.
#[derive(Debug, Clone, Copy)]
pub enum SpriteRef<'a> {
    Flat(&'a FlatSprite),
    Image(&'a ImageSprite),
}

impl<'a> SpriteRef<'a> {
    pub fn body(&self) -> &'a Body {
        match *self {
            Self::Flat(s) => &s.body,
            Self::Image(s) => &s.body,
        }
    }

    pub fn snapshot(self) -> Sprite {
        match self {
            Self::Flat(s) => Sprite::Flat(*s),
            Self::Image(s) => Sprite::Image(s.clone()),
        }
    }
}

impl<'a> From<&'a FlatSprite> for SpriteRef<'a> {
    fn from(sprite: &'a FlatSprite) -> Self {
        Self::Flat(sprite)
    }
}

impl<'a> From<&'a ImageSprite> for SpriteRef<'a> {
    fn from(sprite: &'a ImageSprite) -> Self {
        Self::Image(sprite)
    }
}

impl<'a> From<&'a Sprite> for SpriteRef<'a> {
    fn from(sprite: &'a Sprite) -> Self {
        sprite.view()
    }
}
