//! Basket: hold to charge, release to launch, sink the ball
//!
//! The power meter runs as a triangle wave between 0 and 100 while the
//! pointer is held. Release timing picks the launch speed; the angle is fixed.

use glam::Vec2;

use super::collision::Rect;
use super::game::{GameKind, Hud, MiniGame};
use super::input::{InputEvent, InputSource};
use super::session::{GameSession, OnComplete};
use crate::canvas_size;
use crate::renderer::{Painter, Stroke, palette};
use crate::settings::BasketTuning;

pub const MAX_POWER: f32 = 100.0;

const BALL_COLOR: &str = "#f97316";
const BALL_OUTLINE: &str = "#000000";
const POLE_COLOR: &str = "#cbd5e1";
const NET_COLOR: &str = "#ffffff";
const GUIDE_COLOR: &str = "rgba(255, 255, 255, 0.2)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hoop {
    pub pos: Vec2,
    pub radius: f32,
}

pub struct Basket {
    pub ball: Ball,
    pub hoop: Hoop,
    /// Current meter value, always within [0, MAX_POWER]
    pub power: f32,
    /// +1 while rising, -1 while falling
    pub power_direction: f32,
    pub charging: bool,
    pub flying: bool,
    pub shots: u32,
    tuning: BasketTuning,
    bounds: Vec2,
    session: GameSession,
}

impl Basket {
    pub fn new(tuning: BasketTuning) -> Self {
        let ball = Ball {
            pos: Vec2::from(tuning.ball_start),
            vel: Vec2::ZERO,
            radius: tuning.ball_radius,
        };
        let hoop = Hoop {
            pos: Vec2::from(tuning.hoop),
            radius: tuning.hoop_radius,
        };
        Self {
            ball,
            hoop,
            power: 0.0,
            power_direction: 1.0,
            charging: false,
            flying: false,
            shots: 0,
            tuning,
            bounds: canvas_size(),
            session: GameSession::new(),
        }
    }

    /// Put the ball back on the launch spot, ready to charge
    pub fn reset_ball(&mut self) {
        self.ball.pos = Vec2::from(self.tuning.ball_start);
        self.ball.vel = Vec2::ZERO;
        self.flying = false;
        self.charging = false;
        self.power = 0.0;
    }

    /// Launch speed for a captured power value
    pub fn launch_speed(&self, power: f32) -> f32 {
        self.tuning.base_speed + power / self.tuning.power_divisor
    }

    /// Launch velocity for a captured power value (y up is negative)
    pub fn launch_velocity(&self, power: f32) -> Vec2 {
        let angle = -self.tuning.launch_angle_deg.to_radians();
        Vec2::new(angle.cos(), angle.sin()) * self.launch_speed(power)
    }

    fn step_power(&mut self) {
        self.power = (self.power + self.tuning.power_step * self.power_direction)
            .clamp(0.0, MAX_POWER);
        if self.power >= MAX_POWER || self.power <= 0.0 {
            self.power_direction = -self.power_direction;
        }
    }

    fn shoot(&mut self) {
        self.flying = true;
        self.shots += 1;
        self.ball.vel = self.launch_velocity(self.power);
        log::debug!("Basket shot {} at power {:.0}", self.shots, self.power);
    }

    fn step_flight(&mut self) {
        self.ball.vel.y += self.tuning.gravity;
        self.ball.pos += self.ball.vel;

        if self.ball.pos.y > self.bounds.y || self.ball.pos.x > self.bounds.x {
            self.reset_ball();
            return;
        }

        // Only a falling ball scores, never one rising through the rim
        let near_hoop = self.ball.pos.distance(self.hoop.pos) < self.tuning.score_radius;
        if near_hoop && self.ball.vel.y > 0.0 {
            log::info!("Basket won after {} shots", self.shots);
            self.session.win();
        }
    }

    fn power_color(&self) -> &'static str {
        if self.power > 80.0 {
            palette::RED
        } else if self.power > 50.0 {
            palette::AMBER
        } else {
            palette::GREEN
        }
    }
}

impl MiniGame for Basket {
    fn kind(&self) -> GameKind {
        GameKind::Basket
    }

    fn init(&mut self) {
        self.reset_ball();
        self.power_direction = 1.0;
        self.shots = 0;
    }

    fn start(&mut self, on_complete: OnComplete) {
        self.init();
        self.session.begin(on_complete);
        log::info!("Basket started");
    }

    fn stop(&mut self) {
        if self.session.end() {
            log::info!("Basket stopped after {} shots", self.shots);
        }
        self.charging = false;
    }

    fn update(&mut self, dt_ms: f64) {
        if !self.session.is_active() {
            return;
        }
        self.session.advance(dt_ms);

        if self.charging {
            self.step_power();
        }
        if self.flying {
            self.step_flight();
        }
    }

    fn draw(&self, painter: &mut dyn Painter) {
        painter.clear(palette::BACKDROP);

        // Floor and backboard pole
        painter.fill_rect(Rect::new(0.0, 350.0, self.bounds.x, 50.0), palette::PANEL);
        painter.fill_rect(Rect::new(550.0, 150.0, 10.0, 200.0), POLE_COLOR);

        // Rim and net
        let h = self.hoop.pos;
        let r = self.hoop.radius;
        painter.fill_rect(Rect::new(h.x - r, h.y, r * 2.0, 5.0), palette::RED);
        painter.polyline(
            &[
                Vec2::new(h.x - r, h.y + 5.0),
                Vec2::new(h.x, h.y + 40.0),
                Vec2::new(h.x + r, h.y + 5.0),
            ],
            Stroke::solid(NET_COLOR, 1.0),
        );

        painter.fill_circle(self.ball.pos, self.ball.radius, BALL_COLOR);
        painter.stroke_circle(
            self.ball.pos,
            self.ball.radius,
            Stroke::solid(BALL_OUTLINE, 1.0),
        );

        if self.charging || !self.flying {
            painter.fill_rect(Rect::new(50.0, 50.0, 20.0, MAX_POWER), palette::PANEL);
            painter.fill_rect(
                Rect::new(50.0, 50.0 + MAX_POWER - self.power, 20.0, self.power),
                self.power_color(),
            );
            painter.text("POWER", Vec2::new(40.0, 165.0), "12px Arial", palette::WHITE);
        }

        if !self.flying {
            painter.line(
                self.ball.pos,
                self.ball.pos + Vec2::new(30.0, -50.0),
                Stroke::solid(GUIDE_COLOR, 1.0).dashed(5.0, 5.0),
            );
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        if !self.session.is_active() {
            return;
        }
        match event {
            InputEvent::PointerDown(_) if !self.flying => {
                self.charging = true;
                self.power = 0.0;
                self.power_direction = 1.0;
            }
            InputEvent::PointerUp(_) if self.charging => {
                self.charging = false;
                self.shoot();
            }
            _ => {}
        }
    }

    fn is_active(&self) -> bool {
        self.session.is_active()
    }

    fn hud(&self) -> Hud {
        Hud {
            title: "PROJECT LAUNCH 🏀",
            instruction: "Hold mouse to charge. Release to shoot!",
            status: format!("Shots: {}", self.shots),
            accent: Some(BALL_COLOR),
        }
    }

    fn bindings(&self) -> &'static [InputSource] {
        &[
            InputSource::MouseDown,
            InputSource::MouseUp,
            InputSource::TouchStart,
            InputSource::TouchEnd,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandBuffer, DrawCommand};
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn started() -> (Basket, Rc<Cell<u32>>) {
        let wins = Rc::new(Cell::new(0));
        let w = wins.clone();
        let mut game = Basket::new(BasketTuning::default());
        game.start(Box::new(move || w.set(w.get() + 1)));
        (game, wins)
    }

    fn press(game: &mut Basket) {
        game.handle_input(InputEvent::PointerDown(Vec2::ZERO));
    }

    fn release(game: &mut Basket) {
        game.handle_input(InputEvent::PointerUp(None));
    }

    #[test]
    fn test_power_triangle_wave() {
        let (mut game, _) = started();
        press(&mut game);
        assert!(game.charging);

        for _ in 0..50 {
            game.update(16.0);
        }
        assert_eq!(game.power, 100.0);
        assert_eq!(game.power_direction, -1.0);

        game.update(16.0);
        assert_eq!(game.power, 98.0);

        for _ in 0..49 {
            game.update(16.0);
        }
        assert_eq!(game.power, 0.0);
        assert_eq!(game.power_direction, 1.0);
    }

    #[test]
    fn test_release_launches_at_fixed_angle() {
        let (mut game, _) = started();
        press(&mut game);
        for _ in 0..20 {
            game.update(16.0);
        }
        let power = game.power;
        assert_eq!(power, 40.0);

        release(&mut game);
        assert!(game.flying);
        assert!(!game.charging);
        assert_eq!(game.shots, 1);

        let v = game.ball.vel;
        assert!((v.length() - (10.0 + power / 5.0)).abs() < 1e-4);
        let angle = v.y.atan2(v.x).to_degrees();
        assert!((angle - (-60.0)).abs() < 1e-3);
    }

    #[test]
    fn test_no_charge_while_flying() {
        let (mut game, _) = started();
        press(&mut game);
        release(&mut game);
        game.update(16.0);

        press(&mut game);
        assert!(!game.charging);
        release(&mut game);
        assert_eq!(game.shots, 1);
    }

    #[test]
    fn test_release_without_press_does_nothing() {
        let (mut game, _) = started();
        release(&mut game);
        assert!(!game.flying);
        assert_eq!(game.shots, 0);
    }

    #[test]
    fn test_leaving_bounds_resets_ball() {
        let (mut game, wins) = started();
        press(&mut game);
        release(&mut game);

        let mut ticks = 0;
        while game.flying && ticks < 1000 {
            game.update(16.0);
            ticks += 1;
        }
        assert!(!game.flying);
        assert_eq!(game.ball.pos, Vec2::new(100.0, 300.0));
        assert_eq!(game.ball.vel, Vec2::ZERO);
        assert_eq!(wins.get(), 0);

        // Charging works again
        press(&mut game);
        assert!(game.charging);
    }

    #[test]
    fn test_scores_only_while_falling() {
        let (mut game, wins) = started();
        game.flying = true;

        // Rising through the hoop
        game.ball.pos = Vec2::new(500.0, 160.0);
        game.ball.vel = Vec2::new(0.0, -5.0);
        game.update(16.0);
        assert_eq!(wins.get(), 0);

        // Falling into it
        game.ball.pos = Vec2::new(500.0, 140.0);
        game.ball.vel = Vec2::new(0.0, 2.0);
        game.update(16.0);
        assert_eq!(wins.get(), 1);
        assert!(!game.is_active());

        game.update(16.0);
        assert_eq!(wins.get(), 1);
    }

    #[test]
    fn test_stop_ignores_input() {
        let (mut game, _) = started();
        game.stop();
        game.stop();
        press(&mut game);
        assert!(!game.charging);
        game.update(16.0);
        assert_eq!(game.power, 0.0);
    }

    #[test]
    fn test_full_power_shot_leaves_right_edge() {
        let (mut game, wins) = started();
        press(&mut game);
        for _ in 0..50 {
            game.update(16.0);
        }
        assert_eq!(game.power, MAX_POWER);
        release(&mut game);
        let vx = game.ball.vel.x;

        let mut last = game.ball.pos;
        let mut ticks = 0;
        while game.flying && ticks < 1000 {
            last = game.ball.pos;
            game.update(16.0);
            ticks += 1;
        }

        // Exits sideways while still above the canvas, far from the bottom
        assert!(last.x + vx > 600.0);
        assert!(last.y < 0.0);
        assert!(!game.flying);
        assert_eq!(game.ball.pos, Vec2::new(100.0, 300.0));
        assert_eq!(game.ball.vel, Vec2::ZERO);
        assert_eq!(wins.get(), 0);

        press(&mut game);
        assert!(game.charging);
    }

    #[test]
    fn test_timed_release_sinks_the_ball() {
        let (mut game, wins) = started();
        press(&mut game);
        for _ in 0..18 {
            game.update(16.0);
        }
        assert_eq!(game.power, 36.0);
        release(&mut game);

        let mut ticks = 0;
        while game.is_active() && ticks < 500 {
            game.update(16.0);
            ticks += 1;
        }
        assert_eq!(wins.get(), 1);
        assert!(!game.is_active());
        assert_eq!(game.shots, 1);
    }

    #[test]
    fn test_ball_has_outline() {
        let (game, _) = started();
        let mut buf = CommandBuffer::new();
        game.draw(&mut buf);

        let outlined = buf.commands.iter().any(|c| {
            matches!(
                c,
                DrawCommand::StrokeCircle { center, radius, color }
                    if *center == game.ball.pos && *radius == 15.0 && color == BALL_OUTLINE
            )
        });
        assert!(outlined);
    }

    proptest! {
        #[test]
        fn prop_power_stays_in_range(ticks in 0usize..500) {
            let (mut game, _) = started();
            press(&mut game);
            let mut last_dir = game.power_direction;
            for _ in 0..ticks {
                game.update(16.0);
                prop_assert!((0.0..=MAX_POWER).contains(&game.power));
                if game.power_direction != last_dir {
                    prop_assert!(game.power == 0.0 || game.power == MAX_POWER);
                }
                last_dir = game.power_direction;
            }
        }

        #[test]
        fn prop_launch_speed_is_linear(power in 0.0f32..=100.0) {
            let game = Basket::new(BasketTuning::default());
            let v = game.launch_velocity(power);
            prop_assert!((v.length() - (10.0 + power / 5.0)).abs() < 1e-3);
            prop_assert!(v.x > 0.0 && v.y < 0.0);
        }
    }
}
