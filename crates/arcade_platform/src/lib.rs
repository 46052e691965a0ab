pub mod audio;
pub mod surface;

#[cfg(feature = "windowed")]
pub mod keymap;
#[cfg(feature = "windowed")]
pub mod window;

pub use audio::AudioTrigger;
pub use surface::{HeadlessSurface, Surface, SurfaceEvent};
#[cfg(feature = "windowed")]
pub use window::WindowSurface;

/// The surface linked for this build: a real OS window when the `windowed`
/// feature is on, an in-memory surface otherwise.
#[cfg(feature = "windowed")]
pub type DefaultSurface = WindowSurface;
#[cfg(not(feature = "windowed"))]
pub type DefaultSurface = HeadlessSurface;
