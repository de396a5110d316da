//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick = 1/60 s, all timers count ticks)
//! - Seeded RNG only
//! - Stable iteration order (players sorted by id)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod combat;
pub mod hazards;
pub mod input;
pub mod particles;
pub mod physics;
pub mod player;
pub mod round;
pub mod state;
pub mod tick;

pub use collision::land_on_platforms;
pub use combat::StrikeOutcome;
pub use input::{InputLatch, PlayerInput, TickInput};
pub use player::{Facing, Modifiers, PlayerEntity, StatusEffect, StatusKind};
pub use round::MatchError;
pub use state::{
    Arena, Camera, Feedback, GameEvent, GamePhase, GameState, Particle, ParticleKind, Projectile, Snapshot,
    TutorialProgress,
};
pub use tick::tick;
