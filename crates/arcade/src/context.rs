//! The arcade context: one window, its frame buffers, input, timing and
//! audio, owned by the caller and threaded through the game loop.
//!
//! A tick looks like:
//!
//!   1. `tick()` -- pump OS events into the key tables, bump the frame counter
//!   2. `delta_seconds()` / `held()` / `pressed_once()` -- update game state
//!   3. `render_group()` -- clear, paint, present
//!   4. `draw_text*()` -- overlay straight onto the presented frame
//!   5. `pace()` -- optional end-of-tick sleep
//!
//! Fallible asset and audio calls log and hand back sentinels (empty sprite,
//! `None` path, `Err` status) so a missing file never unwinds the loop.

use std::path::{Path, PathBuf};
use std::time::Duration;

use arcade_core::{ArcadeConfig, ArcadeError, Clock, DeltaClock, InputState, Key};
use arcade_platform::{AudioTrigger, DefaultSurface, Surface, SurfaceEvent};
use arcade_render::text::blink_visible;
use arcade_render::{
    AnimatedSprite, BitmapFont, FlipAxis, FrameBuffer, ImageSprite, SpriteGroup, SpriteRef,
};
use glam::Vec2;

pub struct Arcade<S: Surface = DefaultSurface> {
    // Field order is drop order. Everything acquired after the surface is
    // declared before it, so teardown runs in reverse acquisition order.
    audio: AudioTrigger,
    clock: DeltaClock,
    input: InputState,
    font: BitmapFont,
    frame: FrameBuffer,
    events: Vec<SurfaceEvent>,
    config: ArcadeConfig,
    running: bool,
    frame_counter: u64,
    surface: S,
}

impl<S: Surface> Arcade<S> {
    /// Open the surface, then allocate the frame buffers, then the font. A
    /// failing step drops whatever was already acquired.
    pub fn init(config: ArcadeConfig) -> Result<Self, ArcadeError> {
        config.validate().inspect_err(|e| log::error!("{e}"))?;
        let surface = S::open(&config).inspect_err(|e| log::error!("{e}"))?;
        Self::with_surface(config, surface)
    }

    /// Build around an already-open surface. The surface must match the
    /// configured size; every present would fail otherwise.
    pub fn with_surface(config: ArcadeConfig, surface: S) -> Result<Self, ArcadeError> {
        config.validate().inspect_err(|e| log::error!("{e}"))?;
        let (w, h) = surface.size();
        if (w, h) != (config.width, config.height) {
            let err = ArcadeError::Init(format!(
                "surface is {w}x{h} but config asks for {}x{}",
                config.width, config.height
            ));
            log::error!("{err}");
            return Err(err);
        }
        let frame = FrameBuffer::new(config.width, config.height, config.bg_color)
            .inspect_err(|e| log::error!("{e}"))?;
        let font = BitmapFont::new(config.font_scale).inspect_err(|e| log::error!("{e}"))?;

        log::info!(
            "Arcade ready: {}x{} '{}' bg={:#08x}",
            config.width,
            config.height,
            config.title,
            config.bg_color
        );
        Ok(Self {
            audio: AudioTrigger::new(),
            clock: DeltaClock::new(config.max_delta_seconds),
            input: InputState::new(),
            font,
            frame,
            events: Vec::new(),
            running: true,
            frame_counter: 0,
            surface,
            config,
        })
    }

    /// Swap the time source, e.g. for a `ManualClock` in deterministic runs.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = DeltaClock::with_clock(clock, self.config.max_delta_seconds);
        self
    }

    /// Stop any sounds still playing and release every OS resource.
    pub fn shutdown(mut self) {
        if let Err(e) = self.audio.stop() {
            log::warn!("{e}");
        }
        log::info!("Arcade shut down after {} frames", self.frame_counter);
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Pump pending OS events into the key tables. Returns false once the
    /// window has been asked to close, which also clears the running flag.
    pub fn tick(&mut self) -> bool {
        self.surface.poll_events(&mut self.events);
        let mut keep_going = true;
        for event in self.events.drain(..) {
            match event {
                SurfaceEvent::KeyDown(key) => self.input.key_down(key),
                SurfaceEvent::KeyUp(key) => self.input.key_up(key),
                SurfaceEvent::CloseRequested => {
                    self.running = false;
                    keep_going = false;
                }
            }
        }
        self.frame_counter += 1;
        keep_going
    }

    pub fn delta_seconds(&mut self) -> f32 {
        self.clock.delta_seconds()
    }

    pub fn smoothed_fps(&self) -> f32 {
        self.clock.smoothed_fps()
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn held(&self, key: Key) -> bool {
        self.input.is_held(key)
    }

    /// True only on the tick a key goes down. The query consumes the edge:
    /// ask once per key per tick.
    pub fn pressed_once(&mut self, key: Key) -> bool {
        self.input.pressed_once(key)
    }

    /// Forget every key, e.g. between game states so a held key does not
    /// leak into the next screen.
    pub fn clear_keys(&mut self) {
        self.input.clear_all();
    }

    pub fn load_image_sprite(
        &self,
        position: Vec2,
        size: Vec2,
        path: impl AsRef<Path>,
    ) -> ImageSprite {
        ImageSprite::load(position, size, path.as_ref()).unwrap_or_else(|e| {
            log::error!("{e}");
            ImageSprite::empty()
        })
    }

    /// All frames or nothing: on any failure the result has zero frames.
    pub fn load_animated_sprite<P: AsRef<Path>>(
        &self,
        position: Vec2,
        size: Vec2,
        paths: &[P],
        interval: u32,
    ) -> AnimatedSprite {
        AnimatedSprite::load(position, size, paths, interval).unwrap_or_else(|e| {
            log::error!("Animated sprite not created: {e}");
            AnimatedSprite::empty()
        })
    }

    pub fn release_image_sprite(&self, sprite: &mut ImageSprite) {
        sprite.release();
    }

    pub fn release_animated_sprite(&self, anim: &mut AnimatedSprite) {
        anim.release();
    }

    /// Write a mirrored copy of `path` to a new temp PNG owned by the caller.
    pub fn flip_image(&self, path: impl AsRef<Path>, axis: FlipAxis) -> Option<PathBuf> {
        arcade_render::flip_image(path.as_ref(), axis)
            .inspect_err(|e| log::error!("{e}"))
            .ok()
    }

    /// Write a copy of `path` turned clockwise by 0, 90, 180 or 270 degrees.
    pub fn rotate_image(&self, path: impl AsRef<Path>, degrees: i32) -> Option<PathBuf> {
        arcade_render::rotate_image(path.as_ref(), degrees)
            .inspect_err(|e| log::error!("{e}"))
            .ok()
    }

    pub fn new_group(&self, capacity: usize) -> SpriteGroup {
        SpriteGroup::new(capacity)
    }

    /// Clear to the background, paint `sprites` back to front, present.
    pub fn render_scene(&mut self, sprites: &[SpriteRef<'_>]) {
        self.frame.compose(sprites.iter().copied());
        self.present_composed();
    }

    pub fn render_group(&mut self, group: &SpriteGroup) {
        self.frame.compose(group.iter());
        self.present_composed();
    }

    /// Draw on top of the last presented frame. `y` is the top of the text.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, color: u32) {
        let mut canvas = self.frame.front_canvas();
        self.font.draw(&mut canvas, text, x, y, color);
        if let Err(e) = self.surface.present(self.frame.front()) {
            log::warn!("{e}");
        }
    }

    pub fn draw_text_centered(&mut self, text: &str, y: f32, color: u32) {
        let x = self.font.centered_x(text, self.config.width);
        self.draw_text(text, x, y, color);
    }

    /// Centered text shown for `interval` frames, hidden for the next
    /// `interval`, driven by the tick counter.
    pub fn draw_text_centered_blink(&mut self, text: &str, y: f32, color: u32, interval: u32) {
        if blink_visible(self.frame_counter, interval) {
            self.draw_text_centered(text, y, color);
        }
    }

    pub fn text_width(&self, text: &str) -> u32 {
        self.font.text_width(text)
    }

    pub fn play_sound(&mut self, path: impl AsRef<Path>) -> Result<(), ArcadeError> {
        self.audio
            .play(path.as_ref())
            .inspect_err(|e| log::warn!("{e}"))
    }

    pub fn stop_sound(&mut self) -> Result<(), ArcadeError> {
        self.audio.stop().inspect_err(|e| log::warn!("{e}"))
    }

    /// Block the calling thread. The loop does nothing else meanwhile.
    pub fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// End-of-tick sleep of `frame_pacing_ms`; no-op when that is 0.
    pub fn pace(&self) {
        if self.config.frame_pacing_ms > 0 {
            self.sleep(Duration::from_millis(self.config.frame_pacing_ms));
        }
    }

    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// The composed frame, without text overlays.
    pub fn back_buffer(&self) -> &[u32] {
        self.frame.back()
    }

    /// What was last handed to the surface, text included.
    pub fn front_buffer(&self) -> &[u32] {
        self.frame.front()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn present_composed(&mut self) {
        let frame = self.frame.publish();
        if let Err(e) = self.surface.present(frame) {
            log::warn!("{e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::ManualClock;
    use arcade_platform::HeadlessSurface;
    use arcade_render::FlatSprite;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    const BG: u32 = 0x10_2030;

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "arcade_context_test_{}_{}_{}.png",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn arcade(w: u32, h: u32) -> Arcade<HeadlessSurface> {
        let config = ArcadeConfig {
            font_scale: 1,
            frame_pacing_ms: 0,
            ..ArcadeConfig::new(w, h, "test", BG)
        };
        Arcade::init(config).expect("headless init")
    }

    #[test]
    fn init_rejects_invalid_config() {
        let result = Arcade::<HeadlessSurface>::init(ArcadeConfig::new(0, 10, "bad", 0));
        assert!(matches!(result, Err(ArcadeError::Config(_))));
        let result = Arcade::<HeadlessSurface>::init(ArcadeConfig {
            font_scale: 0,
            ..ArcadeConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn with_surface_rejects_mismatched_size() {
        let config = ArcadeConfig::new(8, 8, "test", BG);
        let result = Arcade::with_surface(config.clone(), HeadlessSurface::new(4, 4));
        assert!(matches!(result, Err(ArcadeError::Init(_))));

        let mut a = Arcade::with_surface(config, HeadlessSurface::new(8, 8)).expect("same size");
        a.render_scene(&[]);
        assert_eq!(a.surface().present_count(), 1);
    }

    #[test]
    fn tick_feeds_key_tables_and_counts_frames() {
        let mut a = arcade(8, 8);
        a.surface_mut().push_event(SurfaceEvent::KeyDown(Key::Space));
        assert!(a.tick());
        assert_eq!(a.frame_counter(), 1);
        assert!(a.held(Key::Space));
        assert!(a.pressed_once(Key::Space));
        assert!(!a.pressed_once(Key::Space));

        for _ in 0..5 {
            a.tick();
            assert!(a.held(Key::Space));
            assert!(!a.pressed_once(Key::Space));
        }

        a.surface_mut().push_event(SurfaceEvent::KeyUp(Key::Space));
        a.tick();
        assert!(!a.held(Key::Space));
        assert!(!a.pressed_once(Key::Space));
        a.surface_mut().push_event(SurfaceEvent::KeyDown(Key::Space));
        a.tick();
        assert!(a.pressed_once(Key::Space));
    }

    #[test]
    fn clear_keys_drops_held_state() {
        let mut a = arcade(8, 8);
        a.surface_mut().push_event(SurfaceEvent::KeyDown(Key::Left));
        a.tick();
        a.clear_keys();
        assert!(!a.held(Key::Left));
        assert!(!a.pressed_once(Key::Left));
    }

    #[test]
    fn close_request_stops_the_loop() {
        let mut a = arcade(8, 8);
        assert!(a.running());
        a.surface_mut().push_event(SurfaceEvent::CloseRequested);
        assert!(!a.tick());
        assert!(!a.running());
    }

    #[test]
    fn render_group_clears_paints_and_presents() {
        let mut a = arcade(4, 2);
        let sprite = FlatSprite::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0), 0xFF00FF);
        let mut group = a.new_group(4);
        group.add(&sprite);
        a.render_group(&group);

        let frame = a.surface().last_frame();
        assert_eq!(frame, &[BG, 0xFF00FF, 0xFF00FF, BG, BG, BG, BG, BG]);
        assert_eq!(a.surface().present_count(), 1);

        group.clear();
        a.render_group(&group);
        assert!(a.surface().last_frame().iter().all(|&p| p == BG));
        assert_eq!(a.surface().present_count(), 2);
    }

    #[test]
    fn render_scene_takes_mixed_kinds() {
        let mut a = arcade(2, 1);
        let flat = FlatSprite::new(Vec2::ZERO, Vec2::ONE, 0x00_00FF);
        let image = ImageSprite::from_pixels(
            Vec2::new(1.0, 0.0),
            arcade_render::PixelBuffer::filled(1, 1, 0xFFAB_CDEF),
        );
        a.render_scene(&[SpriteRef::from(&flat), SpriteRef::from(&image)]);
        assert_eq!(a.surface().last_frame(), &[0x00_00FF, 0xAB_CDEF]);
    }

    #[test]
    fn text_overlays_presented_frame_only() {
        let mut a = arcade(16, 8);
        a.render_scene(&[]);
        a.draw_text("H", 0.0, 0.0, 0xFFFFFF);

        assert!(a.surface().last_frame().iter().any(|&p| p == 0xFFFFFF));
        assert!(a.back_buffer().iter().all(|&p| p == BG));
        assert_eq!(a.surface().present_count(), 2);

        a.render_scene(&[]);
        assert!(a.surface().last_frame().iter().all(|&p| p == BG));
    }

    #[test]
    fn blinking_text_follows_frame_counter() {
        let mut a = arcade(16, 8);
        a.render_scene(&[]);
        let before = a.surface().present_count();

        // frame 0: visible
        a.draw_text_centered_blink("X", 0.0, 0xFFFFFF, 2);
        assert_eq!(a.surface().present_count(), before + 1);

        a.tick();
        a.tick();
        // frame 2: hidden
        a.draw_text_centered_blink("X", 0.0, 0xFFFFFF, 2);
        assert_eq!(a.surface().present_count(), before + 1);
    }

    #[test]
    fn failed_loads_return_sentinels() {
        let a = arcade(8, 8);
        let sprite = a.load_image_sprite(Vec2::ZERO, Vec2::splat(4.0), "/no/such/sprite.png");
        assert!(!sprite.is_loaded());
        assert!(!sprite.body.active);

        let paths = ["/no/a.png", "/no/b.png"];
        let anim = a.load_animated_sprite(Vec2::ZERO, Vec2::splat(4.0), &paths, 3);
        assert_eq!(anim.frame_count(), 0);

        assert!(a.flip_image("/no/such/sprite.png", FlipAxis::Horizontal).is_none());
        assert!(a.rotate_image("/no/such/sprite.png", 90).is_none());
    }

    #[test]
    fn loaded_sprite_renders_and_releases() {
        let path = temp_file_path("sprite");
        RgbaImage::from_pixel(6, 6, Rgba([255, 0, 0, 255]))
            .save(&path)
            .expect("write fixture");

        let mut a = arcade(4, 4);
        let mut sprite = a.load_image_sprite(Vec2::ZERO, Vec2::splat(2.0), &path);
        assert!(sprite.is_loaded());
        a.render_scene(&[SpriteRef::from(&sprite)]);
        assert_eq!(a.surface().last_frame()[0], 0xFF_0000);
        assert_eq!(a.surface().last_frame()[2], BG);

        a.release_image_sprite(&mut sprite);
        a.render_scene(&[SpriteRef::from(&sprite)]);
        assert_eq!(a.surface().last_frame()[0], BG);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn delta_uses_injected_clock() {
        let clock = ManualClock::new();
        let mut a = arcade(8, 8).with_clock(Box::new(clock.clone()));
        assert_eq!(a.delta_seconds(), 0.0);
        clock.advance(0.02);
        assert!((a.delta_seconds() - 0.02).abs() < 1e-5);
        clock.advance(10.0);
        assert_eq!(a.delta_seconds(), 0.1);
    }

    #[test]
    fn missing_sound_is_an_audio_error() {
        let mut a = arcade(8, 8);
        assert!(matches!(
            a.play_sound("/no/such/sound.wav"),
            Err(ArcadeError::Audio(_))
        ));
        a.stop_sound().expect("nothing to stop");
        a.shutdown();
    }
}
