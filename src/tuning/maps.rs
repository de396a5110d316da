//! Arena layouts
//!
//! Platforms are axis-aligned rectangles collidable from above only. Spawn
//! points are explicit per player so both fighters always start on solid
//! ground.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::TuningError;

/// Visual theme (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Cyber,
    Magma,
    Sky,
    Factory,
}

/// A one-sided platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Platform {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict interior test (edges are not inside)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.w && p.y > self.y && p.y < self.y + self.h
    }
}

/// Map element behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapElementKind {
    /// Launches falling players upward with `-power`
    JumpPad,
    /// Pushes players along `direction * power` every tick
    Fan { direction: Vec2 },
}

/// A force zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapElement {
    #[serde(flatten)]
    pub kind: MapElementKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub power: f32,
}

impl MapElement {
    /// Strict interior test (edges are not inside)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.w && p.y > self.y && p.y < self.y + self.h
    }
}

/// A pendulum ball orbiting a pivot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotatingHazard {
    pub pivot: Vec2,
    /// Arm length
    pub length: f32,
    /// Radians per tick
    pub speed: f32,
    /// Current angle (radians)
    pub angle: f32,
    /// Ball radius
    pub size: f32,
}

impl RotatingHazard {
    /// Current ball centre
    pub fn ball_pos(&self) -> Vec2 {
        self.pivot + crate::polar_to_cartesian(self.length, self.angle)
    }
}

/// Immutable per-round terrain (hazard angles advance on the arena's copy)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub id: String,
    pub name: String,
    pub theme: Theme,
    pub platforms: Vec<Platform>,
    /// Player 1 and player 2 spawns
    pub spawn_points: [Vec2; 2],
    /// Lava line; crossing it burns
    #[serde(default)]
    pub hazard_y: Option<f32>,
    #[serde(default)]
    pub elements: Vec<MapElement>,
    #[serde(default)]
    pub hazards: Vec<RotatingHazard>,
}

impl MapData {
    /// Parse a single map from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let map: MapData = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), TuningError> {
        if self.platforms.iter().any(|p| p.w <= 0.0 || p.h <= 0.0) {
            return Err(TuningError::DegeneratePlatform {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Parse a whole map catalog from JSON
pub fn catalog_from_json(json: &str) -> Result<Vec<MapData>, TuningError> {
    let maps: Vec<MapData> = serde_json::from_str(json)?;
    if maps.is_empty() {
        return Err(TuningError::EmptyMapCatalog);
    }
    for map in &maps {
        map.validate()?;
    }
    Ok(maps)
}

/// Built-in versus maps
pub fn catalog() -> Vec<MapData> {
    vec![
        MapData {
            id: "cyber_arena".into(),
            name: "Neon Arena".into(),
            theme: Theme::Cyber,
            spawn_points: [Vec2::new(200.0, 500.0), Vec2::new(1000.0, 500.0)],
            platforms: vec![
                Platform::new(100.0, 600.0, 1000.0, 50.0), // Main floor
                Platform::new(300.0, 450.0, 200.0, 20.0),
                Platform::new(700.0, 450.0, 200.0, 20.0),
                Platform::new(500.0, 250.0, 200.0, 20.0),
            ],
            hazard_y: None,
            elements: vec![MapElement {
                kind: MapElementKind::JumpPad,
                x: 550.0,
                y: 590.0,
                w: 100.0,
                h: 10.0,
                power: 25.0,
            }],
            hazards: Vec::new(),
        },
        MapData {
            id: "magma_chamber".into(),
            name: "Magma Core".into(),
            theme: Theme::Magma,
            spawn_points: [Vec2::new(150.0, 400.0), Vec2::new(950.0, 400.0)],
            platforms: vec![
                Platform::new(50.0, 500.0, 300.0, 40.0),
                Platform::new(850.0, 500.0, 300.0, 40.0),
                Platform::new(450.0, 600.0, 300.0, 20.0),
                Platform::new(500.0, 200.0, 200.0, 20.0),
            ],
            hazard_y: Some(720.0),
            elements: Vec::new(),
            hazards: vec![RotatingHazard {
                pivot: Vec2::new(600.0, 400.0),
                length: 150.0,
                speed: 0.05,
                angle: 0.0,
                size: 30.0,
            }],
        },
        MapData {
            id: "sky_sanctuary".into(),
            name: "Sky Sanctuary".into(),
            theme: Theme::Sky,
            spawn_points: [Vec2::new(150.0, 400.0), Vec2::new(1000.0, 400.0)],
            platforms: vec![
                Platform::new(400.0, 700.0, 400.0, 40.0),
                Platform::new(100.0, 500.0, 150.0, 20.0),
                Platform::new(950.0, 500.0, 150.0, 20.0),
                Platform::new(300.0, 350.0, 100.0, 20.0),
                Platform::new(800.0, 350.0, 100.0, 20.0),
                Platform::new(500.0, 150.0, 200.0, 20.0),
            ],
            hazard_y: None,
            elements: vec![
                MapElement {
                    kind: MapElementKind::Fan {
                        direction: Vec2::new(0.0, -1.0),
                    },
                    x: 100.0,
                    y: 600.0,
                    w: 100.0,
                    h: 200.0,
                    power: 1.5,
                },
                MapElement {
                    kind: MapElementKind::Fan {
                        direction: Vec2::new(0.0, -1.0),
                    },
                    x: 1000.0,
                    y: 600.0,
                    w: 100.0,
                    h: 200.0,
                    power: 1.5,
                },
            ],
            hazards: Vec::new(),
        },
        MapData {
            id: "factory_forge".into(),
            name: "Hazard Factory".into(),
            theme: Theme::Factory,
            spawn_points: [Vec2::new(100.0, 250.0), Vec2::new(1100.0, 250.0)],
            platforms: vec![
                Platform::new(0.0, 300.0, 250.0, 20.0),
                Platform::new(950.0, 300.0, 250.0, 20.0),
                Platform::new(300.0, 500.0, 600.0, 20.0), // Conveyor
                Platform::new(100.0, 700.0, 300.0, 20.0),
                Platform::new(800.0, 700.0, 300.0, 20.0),
            ],
            hazard_y: None,
            elements: vec![MapElement {
                kind: MapElementKind::Fan {
                    direction: Vec2::new(1.0, 0.0),
                },
                x: 300.0,
                y: 490.0,
                w: 600.0,
                h: 10.0,
                power: 2.0,
            }],
            hazards: vec![
                RotatingHazard {
                    pivot: Vec2::new(600.0, 510.0),
                    length: 120.0,
                    speed: 0.08,
                    angle: 0.0,
                    size: 25.0,
                },
                RotatingHazard {
                    pivot: Vec2::new(600.0, 510.0),
                    length: 120.0,
                    speed: 0.08,
                    angle: 3.14,
                    size: 25.0,
                },
            ],
        },
    ]
}

/// Training map used by the tutorial
pub fn tutorial() -> MapData {
    MapData {
        id: "tutorial".into(),
        name: "Training Simulation".into(),
        theme: Theme::Cyber,
        spawn_points: [Vec2::new(200.0, 500.0), Vec2::new(600.0, 300.0)],
        platforms: vec![
            Platform::new(100.0, 600.0, 1000.0, 50.0),
            Platform::new(500.0, 400.0, 200.0, 20.0),
        ],
        hazard_y: None,
        elements: Vec::new(),
        hazards: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_round_trip() {
        let maps = catalog();
        let json = serde_json::to_string(&maps).unwrap();
        let parsed = catalog_from_json(&json).unwrap();
        assert_eq!(parsed, maps);
    }

    #[test]
    fn test_reparsed_maps_land_identically() {
        use crate::sim::collision::land_on_platforms;

        let half_w = 20.0;
        let mut landings = 0;
        for map in catalog() {
            let parsed = MapData::from_json(&map.to_json().unwrap()).unwrap();
            for platform in &map.platforms {
                // Edge overlap on both sides, the middle, and the 5 px tolerance band
                let xs = [
                    platform.x - half_w,
                    platform.x - half_w + 1.0,
                    platform.x + platform.w / 2.0,
                    platform.x + platform.w + half_w - 1.0,
                    platform.x + platform.w + half_w,
                ];
                for x in xs {
                    for prev_y in [platform.y - 10.0, platform.y + 5.0, platform.y + 5.1] {
                        let prev = Vec2::new(x, prev_y);
                        let start = Vec2::new(x, platform.y + 6.0);
                        let (mut pos_a, mut vel_a) = (start, Vec2::new(0.0, 6.0));
                        let (mut pos_b, mut vel_b) = (start, Vec2::new(0.0, 6.0));
                        let a = land_on_platforms(prev, &mut pos_a, &mut vel_a, half_w, &map.platforms);
                        let b = land_on_platforms(prev, &mut pos_b, &mut vel_b, half_w, &parsed.platforms);
                        assert_eq!(a, b, "{} at ({}, {})", map.id, x, prev_y);
                        assert_eq!(pos_a, pos_b);
                        assert_eq!(vel_a, vel_b);
                        landings += usize::from(a.is_some());
                    }
                }
            }
        }
        assert!(landings > 0);
    }

    #[test]
    fn test_fan_direction_survives_json() {
        let sky = catalog().remove(2);
        let parsed = MapData::from_json(&sky.to_json().unwrap()).unwrap();
        assert_eq!(
            parsed.elements[0].kind,
            MapElementKind::Fan {
                direction: Vec2::new(0.0, -1.0)
            }
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "id": "bare",
            "name": "Bare",
            "theme": "cyber",
            "platforms": [{"x": 0.0, "y": 600.0, "w": 1200.0, "h": 40.0}],
            "spawn_points": [[200.0, 500.0], [1000.0, 500.0]]
        }"#;
        let map = MapData::from_json(json).unwrap();
        assert!(map.hazard_y.is_none());
        assert!(map.elements.is_empty());
        assert!(map.hazards.is_empty());
    }

    #[test]
    fn test_rejects_degenerate_platform() {
        let mut map = tutorial();
        map.platforms[0].w = 0.0;
        let json = serde_json::to_string(&map).unwrap();
        assert!(matches!(
            MapData::from_json(&json),
            Err(TuningError::DegeneratePlatform { .. })
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            catalog_from_json("[]"),
            Err(TuningError::EmptyMapCatalog)
        ));
    }

    #[test]
    fn test_hazard_ball_position() {
        let hazard = catalog()[1].hazards[0];
        let ball = hazard.ball_pos();
        assert!((ball.x - 750.0).abs() < 0.001);
        assert!((ball.y - 400.0).abs() < 0.001);
    }
}
