//! Obstacle runner: jump over enemies and pipes until the goal flag arrives
//!
//! Hitting anything restarts the run from zero distance. There are no lives;
//! the only terminal state is the win.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::game::{GameKind, Hud, MiniGame};
use super::input::{InputEvent, InputSource};
use super::session::{GameSession, OnComplete};
use crate::canvas_size;
use crate::renderer::shapes::sprite_or_fill;
use crate::renderer::{Painter, Sprite};
use crate::settings::MarioTuning;

const PLAYER_SIZE: f32 = 30.0;
/// Obstacles are pruned once their left edge passes this x
const PRUNE_X: f32 = -50.0;
/// Flag and castle become visible this far ahead of the target
const FLAG_LOOKAHEAD: f32 = 600.0;

const SKY: &str = "#5c94fc";
const CLOUD: &str = "#ffffff";
const GROUND: &str = "#c84c0c";
const BRICK: &str = "#d06020";
const PLAYER_FALLBACK: &str = "#ff0000";
const FLAG_POLE: &str = "#00ff00";
const FLAG: &str = "#ff0000";
const CASTLE: &str = "#a04000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Ground-hugging walker (the common kind)
    Enemy,
    /// Taller, raised pipe
    Pipe,
}

impl ObstacleKind {
    fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Enemy => Vec2::new(30.0, 30.0),
            ObstacleKind::Pipe => Vec2::new(40.0, 50.0),
        }
    }

    fn sprite(&self) -> Sprite {
        match self {
            ObstacleKind::Enemy => Sprite::Enemy,
            ObstacleKind::Pipe => Sprite::Pipe,
        }
    }

    fn fallback_color(&self) -> &'static str {
        match self {
            ObstacleKind::Enemy => "#a04000",
            ObstacleKind::Pipe => "#00bb00",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
}

impl Obstacle {
    pub fn hitbox(&self) -> Rect {
        self.rect.inset(5.0, 5.0, 5.0, 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub rect: Rect,
    /// Pixels per tick, negative is up
    pub vy: f32,
    pub on_ground: bool,
}

impl Player {
    pub fn hitbox(&self) -> Rect {
        self.rect.inset(8.0, 5.0, 8.0, 0.0)
    }
}

pub struct Mario {
    pub player: Player,
    /// Distance run since the last reset
    pub distance: f32,
    pub obstacles: Vec<Obstacle>,
    /// Parallax offset for clouds
    pub bg_offset: f32,
    /// Distance at which the last obstacle spawned
    pub last_spawn_at: f32,
    tuning: MarioTuning,
    bounds: Vec2,
    rng: Pcg32,
    session: GameSession,
}

impl Mario {
    pub fn new(tuning: MarioTuning, seed: u64) -> Self {
        let player = Player {
            rect: Rect::new(tuning.player_x, tuning.ground_y, PLAYER_SIZE, PLAYER_SIZE),
            vy: 0.0,
            on_ground: true,
        };
        let last_spawn_at = -tuning.spawn_spacing;
        Self {
            player,
            distance: 0.0,
            obstacles: Vec::new(),
            bg_offset: 0.0,
            last_spawn_at,
            tuning,
            bounds: canvas_size(),
            rng: Pcg32::seed_from_u64(seed),
            session: GameSession::new(),
        }
    }

    /// Distance at which the run is won
    pub fn finish_distance(&self) -> f32 {
        self.tuning.target_distance + self.tuning.win_margin
    }

    /// Top of the ground strip both the player and obstacles stand on
    fn floor_y(&self) -> f32 {
        self.tuning.ground_y + PLAYER_SIZE
    }

    pub fn jump(&mut self) {
        if self.player.on_ground {
            self.player.vy = -self.tuning.jump_impulse;
            self.player.on_ground = false;
        }
    }

    /// Collision: progress is lost, the player keeps running
    pub fn reset_run(&mut self) {
        self.distance = 0.0;
        self.obstacles.clear();
        self.last_spawn_at = -self.tuning.spawn_spacing;
    }

    fn maybe_spawn(&mut self) {
        if self.distance - self.last_spawn_at < self.tuning.spawn_spacing {
            return;
        }
        if self.rng.random::<f32>() >= self.tuning.spawn_chance {
            return;
        }
        self.last_spawn_at = self.distance;

        let kind = if self.rng.random::<f32>() < self.tuning.pipe_chance {
            ObstacleKind::Pipe
        } else {
            ObstacleKind::Enemy
        };
        let size = kind.size();
        self.obstacles.push(Obstacle {
            kind,
            rect: Rect::new(self.bounds.x, self.floor_y() - size.y, size.x, size.y),
        });
    }

    fn step_player(&mut self) {
        let ground = self.tuning.ground_y;
        let player = &mut self.player;
        player.vy += self.tuning.gravity;
        player.rect.y += player.vy;
        if player.rect.y >= ground {
            player.rect.y = ground;
            player.vy = 0.0;
            player.on_ground = true;
        }
    }

    /// Screen x of the goal flag
    fn flag_x(&self) -> f32 {
        self.tuning.target_distance - self.distance + self.tuning.win_margin + self.tuning.player_x
    }

    pub fn progress_percent(&self) -> u32 {
        let pct = (self.distance / self.tuning.target_distance * 100.0).floor();
        pct.clamp(0.0, 100.0) as u32
    }
}

impl MiniGame for Mario {
    fn kind(&self) -> GameKind {
        GameKind::Mario
    }

    fn init(&mut self) {
        self.reset_run();
        self.bg_offset = 0.0;
        self.player.rect.y = self.tuning.ground_y;
        self.player.vy = 0.0;
        self.player.on_ground = true;
    }

    fn start(&mut self, on_complete: OnComplete) {
        self.init();
        self.session.begin(on_complete);
        log::info!("Runner started (target {})", self.tuning.target_distance);
    }

    fn stop(&mut self) {
        if self.session.end() {
            log::info!("Runner stopped at distance {:.0}", self.distance);
        }
    }

    fn update(&mut self, dt_ms: f64) {
        if !self.session.is_active() {
            return;
        }
        self.session.advance(dt_ms);

        self.step_player();

        let speed = self.tuning.speed;
        self.distance += speed;
        self.bg_offset += speed * 0.5;

        self.maybe_spawn();
        for obstacle in &mut self.obstacles {
            obstacle.rect.x -= speed;
        }

        let hitbox = self.player.hitbox();
        if self.obstacles.iter().any(|o| hitbox.intersects(&o.hitbox())) {
            log::debug!("Runner collided at distance {:.0}, restarting", self.distance);
            self.reset_run();
        } else {
            self.obstacles.retain(|o| o.rect.x >= PRUNE_X);
        }

        if self.distance >= self.finish_distance() {
            log::info!("Runner won");
            self.session.win();
        }
    }

    fn draw(&self, painter: &mut dyn Painter) {
        let w = self.bounds.x;
        painter.clear(SKY);

        // Clouds
        let drift = self.bg_offset % 700.0;
        painter.set_alpha(0.8);
        painter.fill_circle(Vec2::new(100.0 - drift, 100.0), 30.0, CLOUD);
        painter.fill_circle(Vec2::new(400.0 - drift, 150.0), 40.0, CLOUD);
        painter.set_alpha(1.0);

        // Ground with scrolling bricks
        let floor = self.floor_y();
        painter.fill_rect(Rect::new(0.0, floor, w, self.bounds.y - floor), GROUND);
        let shift = self.distance % 20.0;
        let mut x = 0.0;
        while x < w {
            painter.fill_rect(Rect::new(x - shift, floor, 18.0, 18.0), BRICK);
            x += 20.0;
        }

        sprite_or_fill(painter, Sprite::Player, self.player.rect, PLAYER_FALLBACK);

        for obstacle in &self.obstacles {
            sprite_or_fill(
                painter,
                obstacle.kind.sprite(),
                obstacle.rect,
                obstacle.kind.fallback_color(),
            );
        }

        if self.tuning.target_distance - self.distance < FLAG_LOOKAHEAD {
            let fx = self.flag_x();
            painter.fill_rect(Rect::new(fx, 150.0, 5.0, 180.0), FLAG_POLE);
            painter.fill_polygon(
                &[
                    Vec2::new(fx + 5.0, 150.0),
                    Vec2::new(fx + 40.0, 170.0),
                    Vec2::new(fx + 5.0, 190.0),
                ],
                FLAG,
            );
            painter.fill_rect(Rect::new(fx + 50.0, 250.0, 80.0, 80.0), CASTLE);
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        if !self.session.is_active() {
            return;
        }
        match event {
            InputEvent::Jump | InputEvent::PointerDown(_) => self.jump(),
            _ => {}
        }
    }

    fn is_active(&self) -> bool {
        self.session.is_active()
    }

    fn hud(&self) -> Hud {
        Hud {
            title: "SUPER MARIO RUN 🍄",
            instruction: "Jump over obstacles! Reach the castle.",
            status: format!("Progress: {}%", self.progress_percent()),
            accent: Some("#ff0000"),
        }
    }

    fn bindings(&self) -> &'static [InputSource] {
        &[
            InputSource::KeySpace,
            InputSource::MouseDown,
            InputSource::TouchStart,
        ]
    }
}
