//! Data-driven game balance
//!
//! Static catalogs the simulation consumes at round start:
//! - `weapons`: starting loadouts
//! - `cards`: upgrades drafted between rounds
//! - `maps`: arena layouts, elements and hazards

pub mod cards;
pub mod maps;
pub mod weapons;

pub use cards::{Card, CardId, Rarity};
pub use maps::{MapData, MapElement, MapElementKind, Platform, RotatingHazard, Theme};
pub use weapons::{WeaponId, WeaponKind, WeaponStats};

use thiserror::Error;

/// Errors raised while loading tuning data from JSON
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("map catalog is empty")]
    EmptyMapCatalog,
    #[error("map `{id}` has a platform with non-positive size")]
    DegeneratePlatform { id: String },
}
