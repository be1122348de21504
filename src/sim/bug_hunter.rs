//! Bug hunter: click the drifting bugs before the system lets you in

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Rect, bounce_in_bounds, within_radius};
use super::game::{GameKind, Hud, MiniGame};
use super::input::{InputEvent, InputSource};
use super::session::{GameSession, OnComplete};
use super::timer::Timers;
use crate::canvas_size;
use crate::renderer::shapes::{GridLines, grid};
use crate::renderer::{Painter, Stroke, palette};
use crate::settings::BugTuning;

const BUG_OUTLINE: &str = "#7f1d1d";
const GRID_COLOR: &str = "rgba(56, 189, 248, 0.1)";
const CLICK_COLOR: &str = "rgba(255, 255, 255, 0.8)";
/// How long the click marker stays visible (ms)
const CLICK_FLASH_MS: f64 = 100.0;

/// A bug (square, drifting at constant velocity)
#[derive(Debug, Clone, PartialEq)]
pub struct Bug {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Pixels per tick
    pub vel: Vec2,
}

impl Bug {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BugTimer {
    Spawn,
}

pub struct BugHunter {
    /// Live bugs, oldest first
    pub bugs: Vec<Bug>,
    pub score: u32,
    /// Last click position and remaining display time
    pub click_flash: Option<(Vec2, f64)>,
    tuning: BugTuning,
    bounds: Vec2,
    rng: Pcg32,
    session: GameSession,
    timers: Timers<BugTimer>,
}

impl BugHunter {
    pub fn new(tuning: BugTuning, seed: u64) -> Self {
        Self {
            bugs: Vec::new(),
            score: 0,
            click_flash: None,
            tuning,
            bounds: canvas_size(),
            rng: Pcg32::seed_from_u64(seed),
            session: GameSession::new(),
            timers: Timers::new(),
        }
    }

    pub fn target_score(&self) -> u32 {
        self.tuning.target_score
    }

    /// Bug spawns still waiting on their delay
    pub fn pending_spawns(&self) -> usize {
        self.timers.len()
    }

    /// Add a bug at a random spot fully inside the canvas
    pub fn spawn_bug(&mut self) {
        let size = self.tuning.min_size
            + self.rng.random::<f32>() * (self.tuning.max_size - self.tuning.min_size);
        let pos = Vec2::new(
            self.rng.random::<f32>() * (self.bounds.x - size).max(0.0),
            self.rng.random::<f32>() * (self.bounds.y - size).max(0.0),
        );
        let max_speed = self.tuning.max_speed;
        let vel = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * 2.0 * max_speed,
            (self.rng.random::<f32>() - 0.5) * 2.0 * max_speed,
        );
        self.bugs.push(Bug { pos, size, vel });
    }

    /// Hit-test newest first; at most one bug dies per click
    fn on_click(&mut self, pos: Vec2) {
        self.click_flash = Some((pos, CLICK_FLASH_MS));

        let tolerance = self.tuning.hit_tolerance;
        let hit = self
            .bugs
            .iter()
            .rposition(|bug| within_radius(pos, bug.center(), bug.size / 2.0 + tolerance));

        let Some(index) = hit else {
            log::debug!("Bug hunter: miss at ({:.0}, {:.0})", pos.x, pos.y);
            return;
        };

        self.bugs.remove(index);
        self.score += 1;

        if self.score >= self.tuning.target_score {
            log::info!("Bug hunter won ({} bugs)", self.score);
            self.timers.cancel_all();
            self.session.win();
            return;
        }

        if self.bugs.len() < self.tuning.min_supply {
            self.spawn_bug();
        }
        self.timers
            .schedule(self.tuning.respawn_delay_ms, BugTimer::Spawn);
    }
}

impl MiniGame for BugHunter {
    fn kind(&self) -> GameKind {
        GameKind::Bug
    }

    fn init(&mut self) {
        self.score = 0;
        self.bugs.clear();
        self.click_flash = None;
        self.timers.cancel_all();
    }

    fn start(&mut self, on_complete: OnComplete) {
        self.init();
        self.session.begin(on_complete);
        for _ in 0..self.tuning.initial_bugs {
            self.spawn_bug();
        }
        log::info!("Bug hunter started with {} bugs", self.bugs.len());
    }

    fn stop(&mut self) {
        if self.session.end() {
            log::info!("Bug hunter stopped at {}/{}", self.score, self.tuning.target_score);
        }
        self.timers.cancel_all();
    }

    fn update(&mut self, dt_ms: f64) {
        if !self.session.is_active() {
            return;
        }
        self.session.advance(dt_ms);

        let bounds = self.bounds;
        for bug in &mut self.bugs {
            bug.pos += bug.vel;
            bug.vel = bounce_in_bounds(&bug.rect(), bug.vel, bounds);
        }

        if let Some((_, remaining)) = &mut self.click_flash {
            *remaining -= dt_ms;
            if *remaining <= 0.0 {
                self.click_flash = None;
            }
        }

        for action in self.timers.advance(dt_ms) {
            match action {
                BugTimer::Spawn => self.spawn_bug(),
            }
        }
    }

    fn draw(&self, painter: &mut dyn Painter) {
        painter.clear(palette::BACKDROP);
        grid(
            painter,
            self.bounds,
            40.0,
            GridLines::Both,
            Stroke::solid(GRID_COLOR, 1.0),
        );

        for bug in &self.bugs {
            painter.fill_rect(bug.rect(), palette::RED);
            painter.stroke_rect(bug.rect(), Stroke::solid(BUG_OUTLINE, 2.0));
        }

        if let Some((pos, _)) = self.click_flash {
            painter.fill_circle(pos, 5.0, CLICK_COLOR);
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        if !self.session.is_active() {
            return;
        }
        if let InputEvent::PointerDown(pos) = event {
            self.on_click(pos);
        }
    }

    fn is_active(&self) -> bool {
        self.session.is_active()
    }

    fn hud(&self) -> Hud {
        Hud {
            title: "SYSTEM LOCKED 🔒",
            instruction: "Debug the code! Destroy bugs.",
            status: format!("Bugs Fixed: {}/{}", self.score, self.tuning.target_score),
            accent: None,
        }
    }

    fn bindings(&self) -> &'static [InputSource] {
        &[InputSource::MouseDown, InputSource::TouchStart]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn started(seed: u64) -> (BugHunter, Rc<Cell<u32>>) {
        let wins = Rc::new(Cell::new(0));
        let w = wins.clone();
        let mut game = BugHunter::new(BugTuning::default(), seed);
        game.start(Box::new(move || w.set(w.get() + 1)));
        (game, wins)
    }

    /// Three stationary, well separated bugs
    fn spread() -> Vec<Bug> {
        [100.0, 250.0, 400.0]
            .iter()
            .map(|&x| Bug {
                pos: Vec2::new(x, 150.0),
                size: 40.0,
                vel: Vec2::ZERO,
            })
            .collect()
    }

    fn click(game: &mut BugHunter, pos: Vec2) {
        game.handle_input(InputEvent::PointerDown(pos));
    }

    #[test]
    fn test_start_spawns_initial_bugs() {
        let (game, _) = started(1);
        assert!(game.is_active());
        assert_eq!(game.bugs.len(), 3);
        assert_eq!(game.score, 0);
        for bug in &game.bugs {
            assert!(bug.size >= 30.0 && bug.size < 50.0);
            assert!(bug.pos.x >= 0.0 && bug.rect().right() <= 600.0);
            assert!(bug.pos.y >= 0.0 && bug.rect().bottom() <= 400.0);
        }
    }

    #[test]
    fn test_hit_removes_one_bug() {
        let (mut game, _) = started(2);
        game.bugs = spread();
        let target = game.bugs[1].clone();

        click(&mut game, target.center());
        assert_eq!(game.score, 1);
        assert_eq!(game.bugs.len(), 2);
        assert!(!game.bugs.contains(&target));
    }

    #[test]
    fn test_tolerance_extends_past_the_box() {
        let (mut game, _) = started(3);
        game.bugs = vec![Bug {
            pos: Vec2::new(100.0, 100.0),
            size: 40.0,
            vel: Vec2::ZERO,
        }];
        // 29px right of center: outside the box, inside size/2 + 10
        click(&mut game, Vec2::new(149.0, 120.0));
        assert_eq!(game.score, 1);
    }

    #[test]
    fn test_miss_changes_nothing() {
        let (mut game, _) = started(4);
        game.bugs = vec![Bug {
            pos: Vec2::new(100.0, 100.0),
            size: 40.0,
            vel: Vec2::ZERO,
        }];
        click(&mut game, Vec2::new(500.0, 350.0));
        assert_eq!(game.score, 0);
        assert_eq!(game.bugs.len(), 1);
        assert!(game.click_flash.is_some());
    }

    #[test]
    fn test_overlapping_bugs_lose_newest_only() {
        let (mut game, _) = started(5);
        let older = Bug {
            pos: Vec2::new(100.0, 100.0),
            size: 40.0,
            vel: Vec2::ZERO,
        };
        let newer = Bug {
            pos: Vec2::new(105.0, 105.0),
            size: 40.0,
            vel: Vec2::ONE,
        };
        game.bugs = vec![older.clone(), newer.clone()];

        click(&mut game, Vec2::new(122.0, 122.0));
        assert_eq!(game.score, 1);
        assert_eq!(game.bugs[0], older);
        assert!(!game.bugs.contains(&newer));
        // One left is below the minimum supply, so a fresh bug arrives at once
        assert_eq!(game.bugs.len(), 2);
    }

    #[test]
    fn test_supply_replenishes() {
        let (mut game, _) = started(6);
        game.bugs = spread();
        // 3 → 2: no immediate spawn, one delayed
        let c = game.bugs[0].center();
        click(&mut game, c);
        assert_eq!(game.bugs.len(), 2);
        assert_eq!(game.pending_spawns(), 1);

        game.update(150.0);
        assert_eq!(game.bugs.len(), 2);
        game.update(60.0);
        assert_eq!(game.bugs.len(), 3);

        // Down to one bug: the hit spawns immediately as well
        game.bugs.truncate(1);
        let c = game.bugs[0].center();
        click(&mut game, c);
        assert_eq!(game.bugs.len(), 1);
        game.update(250.0);
        assert_eq!(game.bugs.len(), 2);
    }

    #[test]
    fn test_five_hits_win_once() {
        let (mut game, wins) = started(7);
        let mut clicks = 0;
        while game.is_active() && clicks < 20 {
            let c = game.bugs.last().expect("supply never runs dry").center();
            click(&mut game, c);
            clicks += 1;
            game.update(250.0);
        }

        assert_eq!(clicks, 5);
        assert_eq!(game.score, 5);
        assert_eq!(wins.get(), 1);
        assert!(!game.is_active());
        assert_eq!(game.pending_spawns(), 0);

        // Nothing reacts after the win
        let before = game.bugs.clone();
        if let Some(bug) = before.first() {
            click(&mut game, bug.center());
        }
        game.update(1000.0);
        assert_eq!(game.bugs, before);
        assert_eq!(wins.get(), 1);
    }

    #[test]
    fn test_stop_detaches_input_and_timers() {
        let (mut game, wins) = started(8);
        let c = game.bugs[0].center();
        click(&mut game, c);
        assert_eq!(game.pending_spawns(), 1);

        game.stop();
        game.stop();
        assert_eq!(game.pending_spawns(), 0);

        let snapshot = game.bugs.clone();
        let c = snapshot[0].center();
        click(&mut game, c);
        game.update(500.0);
        assert_eq!(game.bugs, snapshot);
        assert_eq!(game.score, 1);
        assert_eq!(wins.get(), 0);
    }

    #[test]
    fn test_bugs_bounce_off_walls() {
        let (mut game, _) = started(9);
        game.bugs = vec![Bug {
            pos: Vec2::new(568.0, 100.0),
            size: 30.0,
            vel: Vec2::new(2.0, 1.0),
        }];
        game.update(16.0);
        assert_eq!(game.bugs[0].pos, Vec2::new(570.0, 101.0));
        assert_eq!(game.bugs[0].vel, Vec2::new(-2.0, 1.0));
    }

    #[test]
    fn test_restart_resets_state() {
        let (mut game, _) = started(10);
        let c = game.bugs[0].center();
        click(&mut game, c);
        game.stop();

        game.start(Box::new(|| {}));
        assert_eq!(game.score, 0);
        assert_eq!(game.bugs.len(), 3);
        assert_eq!(game.hud().status, "Bugs Fixed: 0/5");
    }

    proptest! {
        #[test]
        fn prop_click_near_bug_removes_exactly_one(
            seed in 0u64..1000,
            pick in 0usize..3,
            angle in 0.0f32..std::f32::consts::TAU,
            frac in 0.0f32..0.99,
        ) {
            let (mut game, _) = started(seed);
            let bug = game.bugs[pick].clone();
            let reach = (bug.size / 2.0 + 10.0) * frac;
            let pos = bug.center() + Vec2::new(angle.cos(), angle.sin()) * reach;

            click(&mut game, pos);
            prop_assert_eq!(game.score, 1);
            prop_assert_eq!(game.bugs.len(), 2);
        }
    }
}
