pub mod config;
pub mod error;
pub mod input;
pub mod time;

pub use config::{load_config_from_path, ArcadeConfig};
pub use error::ArcadeError;
pub use input::{InputState, Key};
pub use time::{Clock, DeltaClock, ManualClock, MonotonicClock, WallClock};
