//! Failure taxonomy shared by every arcade crate.
//!
//! Internal code propagates these with `?`. The context's boundary methods
//! turn them into sentinels (empty sprite, `None` path, `Err` status) after
//! logging, so game code never has to unwind.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ArcadeError {
    /// An OS resource (window, surface, pixel buffer, font) could not be created.
    #[error("init failed: {0}")]
    Init(String),

    #[error("failed to load asset '{}': {reason}", path.display())]
    AssetLoad { path: PathBuf, reason: String },

    #[error("image transform failed for '{}': {reason}", path.display())]
    Transform { path: PathBuf, reason: String },

    #[error("audio: {0}")]
    Audio(String),

    #[error("config: {0}")]
    Config(String),

    #[error("present failed: {0}")]
    Present(String),
}

impl ArcadeError {
    pub fn asset(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn transform(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Transform {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_error_mentions_path() {
        let err = ArcadeError::asset("art/bird.png", "no such file");
        let msg = err.to_string();
        assert!(msg.contains("art/bird.png"));
        assert!(msg.contains("no such file"));
    }
}
