//! Wire fix: drag each wire from its left terminal to the matching right one

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::within_radius;
use super::game::{GameKind, Hud, MiniGame};
use super::input::{InputEvent, InputSource};
use super::session::{GameSession, OnComplete};
use super::timer::Timers;
use crate::canvas_size;
use crate::renderer::shapes::{GridLines, grid, pin};
use crate::renderer::{Painter, Stroke, palette};
use crate::settings::WireTuning;

const WIRE_COLORS: [&str; 4] = [palette::RED, palette::BLUE, palette::GREEN, palette::AMBER];
const GRID_COLOR: &str = "rgba(56, 189, 248, 0.05)";
const WIRE_SHADOW: &str = "rgba(0, 0, 0, 0.5)";
const WIRE_HIGHLIGHT: &str = "rgba(255, 255, 255, 0.4)";

/// One wire: fixed terminals plus the draggable free end
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub color: &'static str,
    pub left: Vec2,
    pub right: Vec2,
    /// Free end; rests on `left` until connected
    pub current: Vec2,
    pub connected: bool,
}

/// Spark emitted on a successful connection (visual only)
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: &'static str,
    /// 1.0 at birth, removed at or below zero
    pub life: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WireTimer {
    Win,
}

pub struct WireFix {
    pub wires: Vec<Wire>,
    pub particles: Vec<Particle>,
    /// Index of the wire being dragged
    pub dragging: Option<usize>,
    tuning: WireTuning,
    rng: Pcg32,
    session: GameSession,
    timers: Timers<WireTimer>,
    win_scheduled: bool,
}

impl WireFix {
    pub fn new(tuning: WireTuning, seed: u64) -> Self {
        Self {
            wires: Vec::new(),
            particles: Vec::new(),
            dragging: None,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            session: GameSession::new(),
            timers: Timers::new(),
            win_scheduled: false,
        }
    }

    pub fn snap_radius(&self) -> f32 {
        self.tuning.snap_radius
    }

    pub fn win_pending(&self) -> bool {
        self.win_scheduled && !self.timers.is_empty()
    }

    /// Fixed left column, right column shuffled
    fn setup_wires(&mut self) {
        let left_ys = self.tuning.terminal_ys;
        let mut right_ys = left_ys;
        right_ys.shuffle(&mut self.rng);

        self.wires = left_ys
            .iter()
            .zip(right_ys.iter())
            .zip(WIRE_COLORS.iter())
            .map(|((&ly, &ry), &color)| {
                let left = Vec2::new(self.tuning.left_x, ly);
                Wire {
                    color,
                    left,
                    right: Vec2::new(self.tuning.right_x, ry),
                    current: left,
                    connected: false,
                }
            })
            .collect();
    }

    fn spawn_particles(&mut self, at: Vec2, color: &'static str) {
        let speed = self.tuning.particle_speed;
        for _ in 0..self.tuning.burst_size {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 2.0 * speed,
                (self.rng.random::<f32>() - 0.5) * 2.0 * speed,
            );
            self.particles.push(Particle {
                pos: at,
                vel,
                color,
                life: 1.0,
            });
        }
    }

    fn on_down(&mut self, pos: Vec2) {
        let snap = self.tuning.snap_radius;
        self.dragging = self
            .wires
            .iter()
            .position(|w| !w.connected && within_radius(pos, w.left, snap));
    }

    fn on_move(&mut self, pos: Vec2) {
        let snap = self.tuning.snap_radius;
        if let Some(wire) = self.dragging.and_then(|i| self.wires.get_mut(i)) {
            // Magnet: show the end seated while it hovers the right terminal
            wire.current = if within_radius(pos, wire.right, snap) {
                wire.right
            } else {
                pos
            };
        }
    }

    fn on_up(&mut self) {
        let Some(index) = self.dragging.take() else {
            return;
        };
        let snap = self.tuning.snap_radius;
        let wire = &mut self.wires[index];

        if !within_radius(wire.current, wire.right, snap) {
            wire.current = wire.left;
            log::debug!("Wire {} dropped short, snapping back", index);
            return;
        }

        wire.connected = true;
        wire.current = wire.right;
        let (at, color) = (wire.right, wire.color);
        self.spawn_particles(at, color);
        log::debug!("Wire {} connected", index);

        if !self.win_scheduled && self.wires.iter().all(|w| w.connected) {
            self.win_scheduled = true;
            self.timers.schedule(self.tuning.win_delay_ms, WireTimer::Win);
        }
    }
}

impl MiniGame for WireFix {
    fn kind(&self) -> GameKind {
        GameKind::Wire
    }

    fn init(&mut self) {
        self.particles.clear();
        self.dragging = None;
        self.win_scheduled = false;
        self.timers.cancel_all();
        self.setup_wires();
    }

    fn start(&mut self, on_complete: OnComplete) {
        self.init();
        self.session.begin(on_complete);
        log::info!("Wire fix started");
    }

    fn stop(&mut self) {
        if self.session.end() {
            log::info!("Wire fix stopped");
        }
        self.dragging = None;
        self.timers.cancel_all();
    }

    fn update(&mut self, dt_ms: f64) {
        if !self.session.is_active() {
            return;
        }
        self.session.advance(dt_ms);

        let decay = self.tuning.particle_decay;
        for p in &mut self.particles {
            p.pos += p.vel;
            p.life -= decay;
        }
        self.particles.retain(|p| p.life > 0.0);

        for action in self.timers.advance(dt_ms) {
            match action {
                WireTimer::Win => {
                    log::info!("Wire fix won");
                    self.session.win();
                }
            }
        }
    }

    fn draw(&self, painter: &mut dyn Painter) {
        let bounds = canvas_size();
        painter.clear(palette::BACKDROP);
        grid(
            painter,
            bounds,
            20.0,
            GridLines::Vertical,
            Stroke::solid(GRID_COLOR, 2.0),
        );

        for wire in &self.wires {
            painter.line(wire.left, wire.current, Stroke::solid(WIRE_SHADOW, 14.0).round());

            painter.set_glow(if wire.connected { 15.0 } else { 5.0 }, wire.color);
            painter.line(wire.left, wire.current, Stroke::solid(wire.color, 8.0).round());
            painter.set_glow(0.0, wire.color);
            painter.line(wire.left, wire.current, Stroke::solid(WIRE_HIGHLIGHT, 2.0).round());

            pin(painter, wire.left, wire.color);
            pin(painter, wire.right, wire.color);
        }

        for p in &self.particles {
            painter.set_alpha(p.life);
            painter.fill_circle(p.pos, 3.0, p.color);
        }
        painter.set_alpha(1.0);
    }

    fn handle_input(&mut self, event: InputEvent) {
        if !self.session.is_active() {
            return;
        }
        match event {
            InputEvent::PointerDown(pos) => self.on_down(pos),
            InputEvent::PointerMove(pos) => self.on_move(pos),
            InputEvent::PointerUp(_) => self.on_up(),
            InputEvent::Jump => {}
        }
    }

    fn is_active(&self) -> bool {
        self.session.is_active()
    }

    fn hud(&self) -> Hud {
        Hud {
            title: "CIRCUIT BREAKER ⚡",
            instruction: "Connect matching terminals to restore power.",
            status: String::new(),
            accent: Some("#eab308"),
        }
    }

    fn bindings(&self) -> &'static [InputSource] {
        &[
            InputSource::MouseDown,
            InputSource::MouseMove,
            InputSource::MouseUp,
            InputSource::TouchStart,
            InputSource::TouchMove,
            InputSource::TouchEnd,
        ]
    }
}
