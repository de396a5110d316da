//! Particle spawning and lifecycle
//!
//! Particles are cosmetic except for black holes, which pull living
//! fighters toward their centre.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::collision::debris_floor;
use super::player::{Facing, PlayerEntity};
use super::state::{Feedback, Particle, ParticleKind};
use crate::consts::*;
use crate::tuning::Platform;

/// Black hole lifetime (3 seconds)
pub const BLACK_HOLE_LIFE: f32 = 180.0;
/// Black hole pull reach
pub const BLACK_HOLE_RADIUS: f32 = 300.0;
/// Fraction of the displacement added to velocity each tick
pub const BLACK_HOLE_PULL: f32 = 0.05;

const WHITE: u32 = 0xffffff;

/// Optional overrides for `burst`
#[derive(Debug, Clone, Default)]
pub struct BurstOptions {
    pub speed: Option<f32>,
    pub size: Option<f32>,
    pub text: Option<String>,
}

impl BurstOptions {
    pub fn speed(speed: f32) -> Self {
        Self {
            speed: Some(speed),
            ..Default::default()
        }
    }
}

/// Swing arc variant by combo index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashStyle {
    Down,
    Up,
    Heavy,
}

impl SlashStyle {
    pub fn for_combo(combo: u8) -> Self {
        match combo {
            1 => SlashStyle::Up,
            2 => SlashStyle::Heavy,
            _ => SlashStyle::Down,
        }
    }

    fn rotation(self, facing: Facing) -> f32 {
        let right = facing == Facing::Right;
        match (self, right) {
            (SlashStyle::Down, true) => 0.0,
            (SlashStyle::Down, false) => PI,
            (SlashStyle::Up, true) => -0.5,
            (SlashStyle::Up, false) => PI + 0.5,
            (SlashStyle::Heavy, true) => 0.2,
            (SlashStyle::Heavy, false) => PI - 0.2,
        }
    }
}

/// Scatter `count` particles around `pos`
pub fn burst(fx: &mut Feedback, pos: Vec2, count: usize, color: u32, kind: ParticleKind, opts: BurstOptions) {
    let speed = opts.speed.unwrap_or(10.0);
    for _ in 0..count {
        let vel = Vec2::new(
            (fx.rng.random::<f32>() - 0.5) * speed,
            (fx.rng.random::<f32>() - 0.5) * speed,
        );
        let life = 20.0 + fx.rng.random::<f32>() * 20.0;
        let size = match opts.size {
            Some(size) => size,
            None => fx.rng.random::<f32>() * 4.0 + 2.0,
        };
        fx.push_particle(Particle {
            pos,
            vel,
            life,
            max_life: 40.0,
            color,
            size,
            kind,
            rotation: 0.0,
            text: opts.text.clone(),
        });
    }
}

/// Death explosion: debris, a white flash and a shockwave ring
pub fn explosion(fx: &mut Feedback, pos: Vec2, color: u32) {
    for _ in 0..30 {
        let angle = fx.rng.random::<f32>() * TAU;
        let speed = fx.rng.random::<f32>() * 10.0 + 5.0;
        let life = 60.0 + fx.rng.random::<f32>() * 20.0;
        let size = fx.rng.random::<f32>() * 8.0 + 4.0;
        fx.push_particle(Particle {
            pos,
            vel: Vec2::new(angle.cos() * speed, angle.sin() * speed),
            life,
            max_life: 80.0,
            color,
            size,
            kind: ParticleKind::Debris,
            rotation: 0.0,
            text: None,
        });
    }
    burst(
        fx,
        pos,
        20,
        WHITE,
        ParticleKind::Spark,
        BurstOptions {
            speed: Some(15.0),
            size: Some(3.0),
            text: None,
        },
    );
    burst(
        fx,
        pos,
        1,
        WHITE,
        ParticleKind::Ring,
        BurstOptions {
            size: Some(10.0),
            ..Default::default()
        },
    );
}

/// Weapon arc in front of the attacker
pub fn slash(fx: &mut Feedback, pos: Vec2, facing: Facing, color: u32, style: SlashStyle) {
    fx.push_particle(Particle {
        pos,
        vel: Vec2::new(facing.sign() * 2.0, 0.0),
        life: 12.0,
        max_life: 12.0,
        color,
        size: 100.0,
        kind: ParticleKind::Slash,
        rotation: style.rotation(facing),
        text: None,
    });
}

/// Gravity well (lives 3 seconds, grows while alive)
pub fn black_hole(fx: &mut Feedback, pos: Vec2) {
    fx.push_particle(Particle {
        pos,
        vel: Vec2::ZERO,
        life: BLACK_HOLE_LIFE,
        max_life: BLACK_HOLE_LIFE,
        color: 0x000000,
        size: 5.0,
        kind: ParticleKind::BlackHole,
        rotation: 0.0,
        text: None,
    });
}

/// Expanding ring under an air jump
pub fn jump_ring(fx: &mut Feedback, pos: Vec2) {
    fx.push_particle(Particle {
        pos,
        vel: Vec2::ZERO,
        life: 15.0,
        max_life: 15.0,
        color: WHITE,
        size: 10.0,
        kind: ParticleKind::Ring,
        rotation: 0.0,
        text: None,
    });
}

/// Intro rain (never expires, wraps at the bottom)
pub fn spawn_rain(fx: &mut Feedback, count: usize) {
    for _ in 0..count {
        let pos = Vec2::new(
            fx.rng.random::<f32>() * CANVAS_WIDTH,
            fx.rng.random::<f32>() * CANVAS_HEIGHT,
        );
        let speed = 15.0 + fx.rng.random::<f32>() * 10.0;
        let len = 10.0 + fx.rng.random::<f32>() * 20.0;
        fx.push_particle(Particle {
            pos,
            vel: Vec2::new(0.0, speed),
            life: 1.0,
            max_life: 1.0,
            color: 0x64748b,
            size: len,
            kind: ParticleKind::Rain,
            rotation: 0.0,
            text: None,
        });
    }
}

/// Advance every particle one tick and drop expired ones
///
/// Black holes pull living players within `BLACK_HOLE_RADIUS`.
pub fn update(fx: &mut Feedback, players: &mut [PlayerEntity], platforms: &[Platform]) {
    let Feedback { particles, rng, .. } = fx;
    for p in particles.iter_mut() {
        if p.kind != ParticleKind::Rain {
            p.life -= 1.0;
        }
        match p.kind {
            ParticleKind::BlackHole => {
                p.size += 0.5;
                for player in players.iter_mut().filter(|pl| pl.is_alive()) {
                    let delta = p.pos - player.pos;
                    if delta.length() < BLACK_HOLE_RADIUS {
                        player.vel += delta * BLACK_HOLE_PULL;
                    }
                }
            }
            ParticleKind::Ring => p.size += 5.0,
            ParticleKind::Debris => {
                p.pos += p.vel;
                p.vel.y += GRAVITY;
                p.rotation += 0.1;
                if let Some(floor_y) = debris_floor(p.pos, platforms) {
                    p.vel.y *= -0.5;
                    p.vel.x *= 0.8;
                    p.pos.y = floor_y;
                }
            }
            ParticleKind::Text | ParticleKind::Slash => {}
            ParticleKind::Rain => {
                p.pos.y += p.vel.y;
                if p.pos.y > CANVAS_HEIGHT {
                    p.pos.y = -p.size;
                    p.pos.x = rng.random::<f32>() * CANVAS_WIDTH;
                }
            }
            ParticleKind::Spark | ParticleKind::Blood | ParticleKind::Dust => {
                p.pos += p.vel;
                p.vel.y += 0.2;
            }
        }
    }
    particles.retain(|p| p.life > 0.0);
}
