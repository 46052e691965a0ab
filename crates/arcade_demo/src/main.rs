//! Paddle-and-bricks demo. Exercises the toolkit end to end: held and
//! edge-triggered keys, delta timing, flat sprites in a group, AABB tests
//! with per-axis resolution at the call site, and text overlays.
//!
//! Usage: `arcade_demo [config.json]`

use std::env;
use std::path::Path;

use arcade::{
    load_config_from_path, overlaps, Arcade, ArcadeConfig, FlatSprite, Key, SpriteGroup, Vec2,
};

const PADDLE_SIZE: Vec2 = Vec2::new(96.0, 14.0);
const PADDLE_SPEED: f32 = 480.0;
const BALL_SIZE: f32 = 10.0;
const BALL_SPEED: f32 = 320.0;
// Caps the speed gained from repeated paddle hits.
const MAX_BALL_SPEED: f32 = 900.0;
const BRICK_ROWS: usize = 5;
const BRICK_COLS: usize = 10;
const BRICK_HEIGHT: f32 = 18.0;
const BRICK_GAP: f32 = 4.0;
const BRICK_TOP: f32 = 60.0;
const BRICK_COLORS: [u32; BRICK_ROWS] = [0xE74C3C, 0xE67E22, 0xF1C40F, 0x2ECC71, 0x3498DB];
const STARTING_LIVES: u32 = 3;
const BLINK_FRAMES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Title,
    Playing,
    Won,
    Lost,
}

struct Game {
    width: f32,
    height: f32,
    paddle: FlatSprite,
    ball: FlatSprite,
    bricks: Vec<FlatSprite>,
    score: u32,
    lives: u32,
}

impl Game {
    fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as f32, height as f32);
        let mut game = Self {
            width,
            height,
            paddle: FlatSprite::new(Vec2::ZERO, PADDLE_SIZE, 0xECF0F1),
            ball: FlatSprite::new(Vec2::ZERO, Vec2::splat(BALL_SIZE), 0xFFFFFF),
            bricks: Vec::with_capacity(BRICK_ROWS * BRICK_COLS),
            score: 0,
            lives: STARTING_LIVES,
        };
        game.build_bricks();
        game.serve();
        game
    }

    fn build_bricks(&mut self) {
        let brick_w = (self.width - BRICK_GAP * (BRICK_COLS as f32 + 1.0)) / BRICK_COLS as f32;
        self.bricks.clear();
        for (row, color) in BRICK_COLORS.iter().enumerate() {
            for col in 0..BRICK_COLS {
                let x = BRICK_GAP + col as f32 * (brick_w + BRICK_GAP);
                let y = BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP);
                self.bricks.push(FlatSprite::new(
                    Vec2::new(x, y),
                    Vec2::new(brick_w, BRICK_HEIGHT),
                    *color,
                ));
            }
        }
    }

    fn serve(&mut self) {
        self.paddle.body.position = Vec2::new(
            (self.width - PADDLE_SIZE.x) / 2.0,
            self.height - PADDLE_SIZE.y - 24.0,
        );
        self.ball.body.position = Vec2::new(
            (self.width - BALL_SIZE) / 2.0,
            self.paddle.body.position.y - BALL_SIZE - 4.0,
        );
        self.ball.body.velocity = Vec2::new(BALL_SPEED * 0.6, -BALL_SPEED);
    }

    fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.body.active).count()
    }

    fn update(&mut self, arcade: &Arcade, dt: f32) -> Option<Phase> {
        let mut dx = 0.0;
        if arcade.held(Key::Left) || arcade.held(Key::A) {
            dx -= PADDLE_SPEED * dt;
        }
        if arcade.held(Key::Right) || arcade.held(Key::D) {
            dx += PADDLE_SPEED * dt;
        }
        let paddle = &mut self.paddle.body;
        paddle.position.x = (paddle.position.x + dx).clamp(0.0, self.width - paddle.size.x);

        self.step_ball_x(dt);
        self.step_ball_y(dt);

        if self.ball.body.position.y > self.height {
            self.lives = self.lives.saturating_sub(1);
            log::info!("Ball lost, {} lives left", self.lives);
            if self.lives == 0 {
                return Some(Phase::Lost);
            }
            self.serve();
        }
        if self.bricks_left() == 0 {
            return Some(Phase::Won);
        }
        None
    }

    fn step_ball_x(&mut self, dt: f32) {
        let ball = &mut self.ball.body;
        let before = ball.position.x;
        ball.position.x += ball.velocity.x * dt;

        if ball.position.x < 0.0 || ball.right() > self.width {
            ball.position.x = before;
            ball.velocity.x = -ball.velocity.x;
            return;
        }
        if self.hit_brick() {
            self.ball.body.position.x = before;
            self.ball.body.velocity.x = -self.ball.body.velocity.x;
        }
    }

    fn step_ball_y(&mut self, dt: f32) {
        let ball = &mut self.ball.body;
        let before = ball.position.y;
        ball.position.y += ball.velocity.y * dt;

        if ball.position.y < 0.0 {
            ball.position.y = 0.0;
            ball.velocity.y = ball.velocity.y.abs();
            return;
        }
        if self.hit_brick() {
            self.ball.body.position.y = before;
            self.ball.body.velocity.y = -self.ball.body.velocity.y;
            return;
        }
        if self.ball.body.velocity.y > 0.0 && overlaps(&self.ball, &self.paddle) {
            let paddle = self.paddle.body;
            let ball = &mut self.ball.body;
            ball.position.y = paddle.position.y - ball.size.y;
            // Off-center hits steer the ball.
            let offset = (ball.position.x + ball.size.x / 2.0)
                - (paddle.position.x + paddle.size.x / 2.0);
            ball.velocity.x += offset * 4.0;
            ball.velocity.y = -ball.velocity.y.abs() * 1.03;
            ball.velocity = ball.velocity.clamp_length_max(MAX_BALL_SPEED);
        }
    }

    /// Deactivate the first brick the ball overlaps and score it.
    fn hit_brick(&mut self) -> bool {
        let ball = self.ball;
        let Some(brick) = self.bricks.iter_mut().find(|b| overlaps(&ball, &**b)) else {
            return false;
        };
        brick.body.active = false;
        self.score += 10;
        true
    }

    fn fill_group(&self, group: &mut SpriteGroup) {
        group.clear();
        for brick in &self.bricks {
            group.add(brick);
        }
        group.add(&self.paddle);
        group.add(&self.ball);
    }
}

fn load_config() -> ArcadeConfig {
    let Some(path) = env::args().nth(1) else {
        return ArcadeConfig {
            title: "Arcade Bricks".to_string(),
            bg_color: 0x1B2631,
            ..ArcadeConfig::default()
        };
    };
    match load_config_from_path(Path::new(&path)) {
        Ok(config) => {
            log::info!("Loaded config from {path}");
            config
        }
        Err(err) => {
            log::error!("{err}; falling back to defaults");
            ArcadeConfig::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Arcade demo starting...");

    let config = load_config();
    let mut arcade: Arcade = match Arcade::init(config) {
        Ok(arcade) => arcade,
        Err(err) => {
            log::error!("Startup failed: {err}");
            std::process::exit(1);
        }
    };

    let mut game = Game::new(arcade.width(), arcade.height());
    let mut group = arcade.new_group(BRICK_ROWS * BRICK_COLS + 2);
    let mut phase = Phase::Title;
    let center_y = arcade.height() as f32 / 2.0;

    while arcade.running() && arcade.tick() {
        let dt = arcade.delta_seconds();
        if arcade.pressed_once(Key::Escape) {
            arcade.set_running(false);
        }
        let start = arcade.pressed_once(Key::Space);

        match phase {
            Phase::Title | Phase::Won | Phase::Lost => {
                if start {
                    if phase != Phase::Title {
                        game = Game::new(arcade.width(), arcade.height());
                    }
                    arcade.clear_keys();
                    phase = Phase::Playing;
                }
            }
            Phase::Playing => {
                if let Some(next) = game.update(&arcade, dt) {
                    log::info!("{next:?} with score {}", game.score);
                    arcade.clear_keys();
                    phase = next;
                }
            }
        }

        game.fill_group(&mut group);
        arcade.render_group(&group);

        let hud = format!("SCORE {:05}  LIVES {}", game.score, game.lives);
        arcade.draw_text(&hud, 8.0, 8.0, 0xFFFFFF);
        match phase {
            Phase::Title => {
                arcade.draw_text_centered("BRICKS", center_y - 40.0, 0xF1C40F);
                arcade.draw_text_centered_blink("PRESS SPACE", center_y, 0xFFFFFF, BLINK_FRAMES);
            }
            Phase::Won => {
                arcade.draw_text_centered("YOU WIN", center_y - 40.0, 0x2ECC71);
                arcade.draw_text_centered_blink("PRESS SPACE", center_y, 0xFFFFFF, BLINK_FRAMES);
            }
            Phase::Lost => {
                arcade.draw_text_centered("GAME OVER", center_y - 40.0, 0xE74C3C);
                arcade.draw_text_centered_blink("PRESS SPACE", center_y, 0xFFFFFF, BLINK_FRAMES);
            }
            Phase::Playing => {}
        }

        arcade.pace();
    }

    log::info!("Average {:.1} fps", arcade.smoothed_fps());
    arcade.shutdown();
}
