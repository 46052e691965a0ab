//! Window and loop configuration, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ArcadeError;
use crate::time::DEFAULT_MAX_DELTA;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Background color, 0xRRGGBB.
    pub bg_color: u32,
    /// End-of-tick pacing sleep used by `Arcade::pace`. 0 disables it.
    pub frame_pacing_ms: u64,
    pub max_delta_seconds: f32,
    /// Integer scale applied to the 8x8 bitmap font.
    pub font_scale: u32,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            title: "Arcade".to_string(),
            width: 800,
            height: 600,
            bg_color: 0x000000,
            frame_pacing_ms: 16,
            max_delta_seconds: DEFAULT_MAX_DELTA,
            font_scale: 2,
        }
    }
}

impl ArcadeConfig {
    pub fn new(width: u32, height: u32, title: &str, bg_color: u32) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
            bg_color,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ArcadeError> {
        if self.width == 0 || self.height == 0 {
            return Err(ArcadeError::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.bg_color > 0xFF_FFFF {
            return Err(ArcadeError::Config(format!(
                "bg_color {:#x} is not a 0xRRGGBB value",
                self.bg_color
            )));
        }
        if !(self.max_delta_seconds > 0.0) {
            return Err(ArcadeError::Config(
                "max_delta_seconds must be > 0".to_string(),
            ));
        }
        if self.font_scale == 0 {
            return Err(ArcadeError::Config("font_scale must be >= 1".to_string()));
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ArcadeConfig, ArcadeError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        ArcadeError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let config: ArcadeConfig = serde_json::from_str(&raw).map_err(|e| {
        ArcadeError::Config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}
