//! Collision detection for one-sided platforms and round bodies
//!
//! Platforms only block from above. A fighter can jump up through a
//! platform and lands on it when its feet cross the top surface downward
//! within one tick (swept test against the previous position).

use glam::Vec2;

use crate::consts::LANDING_TOLERANCE;
use crate::tuning::Platform;

/// Whether a body of half-width `half_w` centred at `x` overlaps a platform horizontally
#[inline]
pub fn overlaps_horizontally(x: f32, half_w: f32, platform: &Platform) -> bool {
    x + half_w > platform.x && x - half_w < platform.x + platform.w
}

/// Swept landing test for a single platform
///
/// Lands when the previous feet were at or above the top (with tolerance),
/// the current feet are at or below it, and the body is not rising.
pub fn crosses_top(prev: Vec2, pos: Vec2, vel_y: f32, half_w: f32, platform: &Platform) -> bool {
    if !overlaps_horizontally(pos.x, half_w, platform) {
        return false;
    }
    let was_above = prev.y <= platform.y + LANDING_TOLERANCE;
    let is_below = pos.y >= platform.y;
    let is_falling = vel_y >= 0.0;
    was_above && is_below && is_falling
}

/// Swept landing test against every platform
///
/// Platforms are checked in order; after a snap, later platforms are tested
/// against the snapped position. Returns the surface the feet rest on (last
/// platform hit wins).
pub fn land_on_platforms(
    prev: Vec2,
    pos: &mut Vec2,
    vel: &mut Vec2,
    half_w: f32,
    platforms: &[Platform],
) -> Option<f32> {
    let mut surface = None;
    for platform in platforms {
        if crosses_top(prev, *pos, vel.y, half_w, platform) {
            pos.y = platform.y;
            vel.y = 0.0;
            surface = Some(platform.y);
        }
    }
    surface
}

/// Whether a point is strictly inside any platform
pub fn point_in_platforms(point: Vec2, platforms: &[Platform]) -> bool {
    platforms.iter().any(|p| p.contains(point))
}

/// Debris bounce check: inside a platform's horizontal span and within the top 20 px
pub fn debris_floor(point: Vec2, platforms: &[Platform]) -> Option<f32> {
    platforms
        .iter()
        .filter(|p| point.x > p.x && point.x < p.x + p.w && point.y >= p.y && point.y <= p.y + 20.0)
        .map(|p| p.y)
        .last()
}

/// Circle-vs-point proximity
#[inline]
pub fn circle_touches_point(center: Vec2, radius: f32, point: Vec2) -> bool {
    (point - center).length() < radius
}
