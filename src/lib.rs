//! Neon Duel - A 2-player arena duel with card drafts between rounds
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, hazards, round flow)
//! - `tuning`: Data-driven catalogs (weapons, cards, maps)
//! - `settings`: Player-facing options and match rules

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Logical canvas size in pixels
    pub const CANVAS_WIDTH: f32 = 1200.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.8;
    /// Horizontal velocity multiplier per tick
    pub const FRICTION: f32 = 0.82;
    /// Vertical velocity multiplier per tick
    pub const AIR_RESISTANCE: f32 = 0.96;
    /// Maximum falling speed
    pub const TERMINAL_VELOCITY: f32 = 20.0;

    /// Platform landing tolerance above the surface
    pub const LANDING_TOLERANCE: f32 = 5.0;
    /// Distance below the canvas where the void kills
    pub const VOID_MARGIN: f32 = 100.0;

    /// Vertical velocity is pinned during the first ticks of a round
    pub const SPAWN_LOCK_TICKS: u32 = 30;
    /// Void death and round-end checks are disabled until this tick
    pub const ROUND_GRACE_TICKS: u32 = 60;
    /// Ticks a dead player animates before the round may end
    pub const DEATH_TIMER_TICKS: u32 = 60;
    /// Delay between the last kill and the round-over event (500 ms)
    pub const ROUND_OVER_DELAY_TICKS: u32 = 30;

    /// Ticks without attacking before the combo resets (1000 ms)
    pub const COMBO_TIMEOUT_TICKS: u64 = 60;
    /// `attack_frame` value at which the swing connects
    pub const ATTACK_ACTIVE_FRAME: u32 = 10;
    /// Maximum vertical distance for a melee hit
    pub const MELEE_VERTICAL_REACH: f32 = 80.0;

    /// Default score needed to win the match
    pub const WIN_SCORE: u32 = 10;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Sign of `x` as -1, 0 or +1 (zero stays zero, unlike `f32::signum`)
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Manhattan distance between two points
#[inline]
pub fn manhattan(a: Vec2, b: Vec2) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
