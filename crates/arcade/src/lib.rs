//! Minimal 2D arcade toolkit: a window, a software-rendered sprite scene,
//! keyboard state, frame timing, bitmap text and fire-and-forget sound.
//!
//! ```no_run
//! use arcade::{Arcade, ArcadeConfig, FlatSprite, Key, Vec2};
//!
//! let mut arcade: Arcade = Arcade::init(ArcadeConfig::new(800, 600, "Demo", 0x000000))?;
//! let mut player = FlatSprite::new(Vec2::new(380.0, 500.0), Vec2::splat(40.0), 0xFF0000);
//! let mut group = arcade.new_group(8);
//! while arcade.running() && arcade.tick() {
//!     if arcade.held(Key::Left) {
//!         player.body.position.x -= 4.0;
//!     }
//!     group.clear();
//!     group.add(&player);
//!     arcade.render_group(&group);
//!     arcade.pace();
//! }
//! arcade.shutdown();
//! # Ok::<(), arcade::ArcadeError>(())
//! ```

mod context;

pub use context::Arcade;

pub use arcade_core::{
    load_config_from_path, ArcadeConfig, ArcadeError, Clock, DeltaClock, InputState, Key,
    ManualClock,
};
pub use arcade_platform::{DefaultSurface, HeadlessSurface, Surface, SurfaceEvent};
#[cfg(feature = "windowed")]
pub use arcade_platform::WindowSurface;
pub use arcade_render::{
    overlaps, Aabb, AnimatedSprite, Body, Collider, FlatSprite, FlipAxis, ImageSprite,
    PixelBuffer, Rotation, Sprite, SpriteGroup, SpriteRef,
};
pub use glam::Vec2;
