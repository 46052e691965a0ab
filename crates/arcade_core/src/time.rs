//! Frame delta timing.
//!
//! `DeltaClock::delta_seconds` returns the seconds elapsed since its previous
//! call: 0 on the first call, and always clamped to `[0, max_delta]` so a
//! stall (window drag, debugger break) cannot launch sprites through walls.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const FPS_SAMPLE_COUNT: usize = 60;

/// Default upper bound for one frame's delta, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// A source of "now" in seconds. `None` means the reading failed.
pub trait Clock {
    fn now_seconds(&mut self) -> Option<f64>;
}

/// Monotonic clock backed by `Instant`.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_seconds(&mut self) -> Option<f64> {
        Some(self.origin.elapsed().as_secs_f64())
    }
}

/// Wall-clock fallback. Subject to system clock adjustments; a backwards
/// jump shows up as a zero delta after clamping.
pub struct WallClock;

impl Clock for WallClock {
    fn now_seconds(&mut self) -> Option<f64> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs_f64())
    }
}

/// Hand-driven clock for deterministic loops and tests. Clones share the
/// same reading.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }
}

impl Clock for ManualClock {
    fn now_seconds(&mut self) -> Option<f64> {
        Some(self.now.get())
    }
}

pub struct DeltaClock {
    clock: Box<dyn Clock>,
    on_wall_clock: bool,
    last: Option<f64>,
    max_delta: f32,

    fps_samples: [f32; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    smoothed_fps: f32,
    smoothed_frame_time_ms: f32,
}

impl DeltaClock {
    pub fn new(max_delta: f32) -> Self {
        Self::with_clock(Box::new(MonotonicClock::new()), max_delta)
    }

    /// Wall-clock variant for targets without a usable monotonic source.
    pub fn wall_clock(max_delta: f32) -> Self {
        log::warn!("Monotonic clock unavailable, falling back to wall-clock timing");
        let mut delta = Self::with_clock(Box::new(WallClock), max_delta);
        delta.on_wall_clock = true;
        delta
    }

    pub fn with_clock(clock: Box<dyn Clock>, max_delta: f32) -> Self {
        Self {
            clock,
            on_wall_clock: false,
            last: None,
            max_delta: max_delta.max(0.0),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn delta_seconds(&mut self) -> f32 {
        let Some(now) = self.clock.now_seconds() else {
            // Restart the baseline on the fallback source.
            self.last = None;
            if !self.on_wall_clock {
                log::warn!("Clock read failed, falling back to wall-clock timing");
                self.clock = Box::new(WallClock);
                self.on_wall_clock = true;
            }
            return 0.0;
        };

        let Some(prev) = self.last.replace(now) else {
            return 0.0;
        };

        let raw = (now - prev) as f32;
        if raw > self.max_delta {
            log::debug!(
                "Frame took {:.1}ms, clamping delta to {:.1}ms",
                raw * 1000.0,
                self.max_delta * 1000.0
            );
        }
        let dt = raw.clamp(0.0, self.max_delta);
        self.record_sample(dt);
        dt
    }

    pub fn is_wall_clock(&self) -> bool {
        self.on_wall_clock
    }

    pub fn smoothed_fps(&self) -> f32 {
        self.smoothed_fps
    }

    pub fn smoothed_frame_time_ms(&self) -> f32 {
        self.smoothed_frame_time_ms
    }

    fn record_sample(&mut self, dt: f32) {
        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt = self.fps_samples.iter().sum::<f32>() / FPS_SAMPLE_COUNT as f32;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }
}

impl Default for DeltaClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}
