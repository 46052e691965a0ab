//! Software rendering: sprites, collision, sprite groups, the pixel
//! rasterizer, bitmap text and image asset utilities.

pub mod animation;
pub mod collision;
pub mod group;
pub mod loader;
pub mod physics;
pub mod pixels;
pub mod raster;
pub mod sprite;
pub mod text;
pub mod transform;

pub use animation::AnimatedSprite;
pub use collision::{overlaps, Aabb, Collider};
pub use group::SpriteGroup;
pub use pixels::PixelBuffer;
pub use raster::{Canvas, FrameBuffer};
pub use sprite::{Body, FlatSprite, ImageSprite, Sprite, SpriteRef};
pub use text::BitmapFont;
pub use transform::{flip_image, rotate_image, FlipAxis, Rotation};
