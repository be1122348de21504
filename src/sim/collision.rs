//! Collision helpers shared by the simulations
//!
//! Everything here works in logical canvas space (y grows downward).

use glam::Vec2;

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Shrink by the given margins. Margins are not clamped, so an over-inset
    /// rect ends up with negative size and never intersects anything.
    pub fn inset(&self, left: f32, top: f32, right: f32, bottom: f32) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            w: self.w - left - right,
            h: self.h - top - bottom,
        }
    }

    /// Strict overlap test (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        other.x < self.right()
            && other.right() > self.x
            && other.y < self.bottom()
            && other.bottom() > self.y
    }
}

/// Point-in-circle test with a strict boundary
#[inline]
pub fn within_radius(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Elastic bounce of a box against the edges of `bounds`
///
/// Flips each velocity component whose axis touches an edge. The position is
/// left alone; a box that overshot keeps moving back in on the next tick.
pub fn bounce_in_bounds(rect: &Rect, velocity: Vec2, bounds: Vec2) -> Vec2 {
    let mut vel = velocity;
    if rect.x <= 0.0 || rect.right() >= bounds.x {
        vel = reflect_velocity(vel, Vec2::X);
    }
    if rect.y <= 0.0 || rect.bottom() >= bounds.y {
        vel = reflect_velocity(vel, Vec2::Y);
    }
    vel
}
