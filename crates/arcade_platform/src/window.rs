//! winit + softbuffer window backend.
//!
//! The event loop runs in pump mode: `poll_events` drains whatever the OS
//! has queued and returns immediately, so the caller keeps ownership of the
//! main loop. The window itself can only be created from inside the loop
//! (`resumed`), so `open` pumps until it appears or creation fails.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Duration;

use arcade_core::{ArcadeConfig, ArcadeError, Key};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key as LogicalKey, KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::keymap;
use crate::surface::{Surface, SurfaceEvent};

const OPEN_PUMP_LIMIT: usize = 64;

type SoftSurface = softbuffer::Surface<Rc<Window>, Rc<Window>>;
type SoftContext = softbuffer::Context<Rc<Window>>;

pub struct WindowSurface {
    // Dropped before the event loop that owns the display connection.
    handler: PumpHandler,
    event_loop: EventLoop<()>,
}

struct PumpHandler {
    attributes: WindowAttributes,
    frame_size: (u32, u32),
    buffer_size: (u32, u32),

    // Field order is drop order: surface, context, then window, the reverse
    // of acquisition.
    surface: Option<SoftSurface>,
    context: Option<SoftContext>,
    window: Option<Rc<Window>>,

    open_error: Option<ArcadeError>,
    pending: Vec<SurfaceEvent>,
    /// Symbol each physical key reported on press, so the release clears
    /// the same symbol even if modifiers changed in between.
    pressed_as: HashMap<KeyCode, Key>,
}

impl PumpHandler {
    fn new(attributes: WindowAttributes, frame_size: (u32, u32)) -> Self {
        Self {
            attributes,
            frame_size,
            buffer_size: frame_size,
            surface: None,
            context: None,
            window: None,
            open_error: None,
            pending: Vec::new(),
            pressed_as: HashMap::new(),
        }
    }

    fn acquire(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ArcadeError> {
        let window = event_loop
            .create_window(self.attributes.clone())
            .map_err(|e| ArcadeError::Init(format!("cannot create window: {e}")))?;
        let window = Rc::new(window);

        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| ArcadeError::Init(format!("cannot open display context: {e}")))?;
        let mut surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| ArcadeError::Init(format!("cannot create pixel surface: {e}")))?;

        let inner = window.inner_size();
        let buffer_size = if inner.width == 0 || inner.height == 0 {
            self.frame_size
        } else {
            (inner.width, inner.height)
        };
        let (w, h) = non_zero(buffer_size)?;
        surface
            .resize(w, h)
            .map_err(|e| ArcadeError::Init(format!("cannot size pixel surface: {e}")))?;

        self.buffer_size = buffer_size;
        self.surface = Some(surface);
        self.context = Some(context);
        self.window = Some(window);
        Ok(())
    }

    fn release_all_keys(&mut self) {
        let mut released: Vec<Key> = Vec::with_capacity(self.pressed_as.len());
        for (_, key) in self.pressed_as.drain() {
            if !released.contains(&key) {
                released.push(key);
            }
        }
        self.pending.extend(released.into_iter().map(SurfaceEvent::KeyUp));
    }

    /// Turn one keyboard event into key-table events. Several physical keys
    /// can share a symbol (both Shifts, a digit and its numpad twin); the
    /// symbol goes down with the first of them and up with the last.
    fn translate(
        &mut self,
        code: KeyCode,
        state: ElementState,
        repeat: bool,
        logical: &LogicalKey,
    ) {
        match state {
            ElementState::Pressed => {
                if repeat || self.pressed_as.contains_key(&code) {
                    return;
                }
                let Some(key) = keymap::resolve_press(code, logical) else {
                    return;
                };
                let already_down = self.is_held(key);
                self.pressed_as.insert(code, key);
                if !already_down {
                    self.pending.push(SurfaceEvent::KeyDown(key));
                }
            }
            ElementState::Released => {
                let key = self
                    .pressed_as
                    .remove(&code)
                    .or_else(|| keymap::map_physical(code));
                if let Some(key) = key {
                    if !self.is_held(key) {
                        self.pending.push(SurfaceEvent::KeyUp(key));
                    }
                }
            }
        }
    }

    fn is_held(&self, key: Key) -> bool {
        self.pressed_as.values().any(|&k| k == key)
    }
}

impl ApplicationHandler for PumpHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.open_error.is_some() {
            return;
        }
        if let Err(err) = self.acquire(event_loop) {
            log::error!("{err}");
            self.open_error = Some(err);
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.pending.push(SurfaceEvent::CloseRequested);
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(surface) = self.surface.as_mut() {
                    if let (Some(w), Some(h)) =
                        (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                    {
                        match surface.resize(w, h) {
                            Ok(()) => self.buffer_size = (size.width, size.height),
                            Err(e) => log::warn!("Surface resize failed: {e}"),
                        }
                    }
                }
            }

            WindowEvent::Focused(false) => self.release_all_keys(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.translate(code, event.state, event.repeat, &event.logical_key);
                }
            }

            _ => {}
        }
    }
}

impl Surface for WindowSurface {
    fn open(config: &ArcadeConfig) -> Result<Self, ArcadeError> {
        let event_loop = EventLoop::new()
            .map_err(|e| ArcadeError::Init(format!("cannot create event loop: {e}")))?;
        let attributes = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(false);

        let mut surface = Self {
            handler: PumpHandler::new(attributes, (config.width, config.height)),
            event_loop,
        };

        for _ in 0..OPEN_PUMP_LIMIT {
            let status = surface
                .event_loop
                .pump_app_events(Some(Duration::ZERO), &mut surface.handler);
            if let Some(err) = surface.handler.open_error.take() {
                return Err(err);
            }
            if surface.handler.window.is_some() {
                log::info!(
                    "Window created: {}x{} '{}'",
                    config.width,
                    config.height,
                    config.title
                );
                return Ok(surface);
            }
            if let PumpStatus::Exit(code) = status {
                return Err(ArcadeError::Init(format!(
                    "event loop exited during startup (code {code})"
                )));
            }
        }
        Err(ArcadeError::Init(
            "window was not created by the event loop".to_string(),
        ))
    }

    fn size(&self) -> (u32, u32) {
        self.handler.frame_size
    }

    fn poll_events(&mut self, events: &mut Vec<SurfaceEvent>) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);
        events.append(&mut self.handler.pending);
        if let PumpStatus::Exit(_) = status {
            events.push(SurfaceEvent::CloseRequested);
        }
    }

    fn present(&mut self, frame: &[u32]) -> Result<(), ArcadeError> {
        let (fw, fh) = (
            self.handler.frame_size.0 as usize,
            self.handler.frame_size.1 as usize,
        );
        if frame.len() != fw * fh {
            return Err(ArcadeError::Present(format!(
                "frame has {} pixels, surface needs {}",
                frame.len(),
                fw * fh
            )));
        }
        let (bw, bh) = (
            self.handler.buffer_size.0 as usize,
            self.handler.buffer_size.1 as usize,
        );
        let window = self
            .handler
            .window
            .as_ref()
            .ok_or_else(|| ArcadeError::Present("window is closed".to_string()))?;
        let surface = self
            .handler
            .surface
            .as_mut()
            .ok_or_else(|| ArcadeError::Present("pixel surface is gone".to_string()))?;

        let mut buffer = surface
            .buffer_mut()
            .map_err(|e| ArcadeError::Present(e.to_string()))?;
        if (bw, bh) != (fw, fh) {
            buffer.fill(0);
        }

        // softbuffer wants 0RGB: the top byte must be zero.
        let cols = fw.min(bw);
        for y in 0..fh.min(bh) {
            let src = &frame[y * fw..y * fw + cols];
            let dst = &mut buffer[y * bw..y * bw + cols];
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s & 0x00FF_FFFF;
            }
        }

        window.pre_present_notify();
        buffer
            .present()
            .map_err(|e| ArcadeError::Present(e.to_string()))
    }
}

fn non_zero((w, h): (u32, u32)) -> Result<(NonZeroU32, NonZeroU32), ArcadeError> {
    match (NonZeroU32::new(w), NonZeroU32::new(h)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(ArcadeError::Init(format!("invalid surface size {w}x{h}"))),
    }
}
