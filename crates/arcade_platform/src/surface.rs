//! The capability the portable core needs from a backend: open, pump
//! events, present a packed pixel frame.

use std::collections::VecDeque;

use arcade_core::{ArcadeConfig, ArcadeError, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    KeyDown(Key),
    KeyUp(Key),
    CloseRequested,
}

pub trait Surface {
    /// Create the OS resources for a `config.width` x `config.height` window.
    fn open(config: &ArcadeConfig) -> Result<Self, ArcadeError>
    where
        Self: Sized;

    fn size(&self) -> (u32, u32);

    /// Drain every pending OS event into `events` without blocking.
    fn poll_events(&mut self, events: &mut Vec<SurfaceEvent>);

    /// Copy a full `width * height` frame of 0xAARRGGBB pixels to the
    /// visible surface. The alpha byte is ignored.
    fn present(&mut self, frame: &[u32]) -> Result<(), ArcadeError>;
}

/// In-memory surface with scripted events. Used for tests and for builds
/// without a windowing backend.
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    scripted: VecDeque<SurfaceEvent>,
    presented: Vec<u32>,
    present_count: usize,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scripted: VecDeque::new(),
            presented: Vec::new(),
            present_count: 0,
        }
    }

    /// Queue an event for the next `poll_events`.
    pub fn push_event(&mut self, event: SurfaceEvent) {
        self.scripted.push_back(event);
    }

    /// The most recently presented frame (alpha byte cleared).
    pub fn last_frame(&self) -> &[u32] {
        &self.presented
    }

    pub fn present_count(&self) -> usize {
        self.present_count
    }
}

impl Surface for HeadlessSurface {
    fn open(config: &ArcadeConfig) -> Result<Self, ArcadeError> {
        if config.width == 0 || config.height == 0 {
            return Err(ArcadeError::Init(format!(
                "cannot open {}x{} surface",
                config.width, config.height
            )));
        }
        Ok(Self::new(config.width, config.height))
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn poll_events(&mut self, events: &mut Vec<SurfaceEvent>) {
        events.extend(self.scripted.drain(..));
    }

    fn present(&mut self, frame: &[u32]) -> Result<(), ArcadeError> {
        let expected = self.width as usize * self.height as usize;
        if frame.len() != expected {
            return Err(ArcadeError::Present(format!(
                "frame has {} pixels, surface needs {}",
                frame.len(),
                expected
            )));
        }
        self.presented.clear();
        self.presented
            .extend(frame.iter().map(|px| px & 0x00FF_FFFF));
        self.present_count += 1;
        Ok(())
    }
}
