//! Map hazards and card passives that run on a timer

use glam::Vec2;

use super::collision::circle_touches_point;
use super::particles::{self, BurstOptions};
use super::player::{Modifiers, PlayerEntity};
use super::state::{Feedback, GameEvent, ParticleKind};
use crate::manhattan;
use crate::tuning::RotatingHazard;

/// Rotating ball contact damage
pub const HAZARD_DAMAGE: f32 = 20.0;
/// Launch speed away from the ball
pub const HAZARD_LAUNCH: f32 = 20.0;
pub const HAZARD_STUN: u32 = 20;
pub const HAZARD_INVINCIBILITY: u32 = 30;

/// Aura fires every half second
pub const AURA_PERIOD: u32 = 30;
pub const AURA_RANGE: f32 = 200.0;
pub const AURA_DAMAGE: f32 = 2.0;
/// Vampire drains itself once a second
pub const VAMPIRE_PERIOD: u32 = 60;
pub const VAMPIRE_DRAIN: f32 = 1.0;

/// Spin every rotating hazard and knock back anyone touching its ball
pub fn update_rotating(hazards: &mut [RotatingHazard], players: &mut [PlayerEntity], fx: &mut Feedback) {
    for hazard in hazards.iter_mut() {
        hazard.angle += hazard.speed;
        let ball = hazard.ball_pos();

        for p in players.iter_mut().filter(|p| p.is_alive() && p.invincible == 0) {
            if !circle_touches_point(ball, hazard.size + p.half_extents.x, p.body_point()) {
                continue;
            }
            let delta = p.body_point() - ball;
            let angle = delta.y.atan2(delta.x);
            p.take_damage(HAZARD_DAMAGE);
            p.vel = Vec2::new(angle.cos(), angle.sin()) * HAZARD_LAUNCH;
            p.hit_stun = HAZARD_STUN;
            p.invincible = HAZARD_INVINCIBILITY;
            fx.shake(15.0);
            particles::burst(fx, p.pos, 20, p.color, ParticleKind::Blood, BurstOptions::default());
            log::debug!("Player {} clipped a rotating hazard", p.id);
            fx.emit(GameEvent::HazardHit { player: p.id });
        }
    }
}

/// Card passives for a free fighter: vampire self-drain, aura damage
pub fn apply_passives(p: &mut PlayerEntity, opponent: &mut PlayerEntity, round_ticks: u32, fx: &mut Feedback) {
    if p.has(Modifiers::VAMPIRE) && round_ticks % VAMPIRE_PERIOD == 0 && p.hp > 1.0 {
        p.take_damage(VAMPIRE_DRAIN);
    }

    if p.has(Modifiers::AURA)
        && round_ticks % AURA_PERIOD == 0
        && opponent.is_alive()
        && manhattan(p.pos, opponent.pos) < AURA_RANGE
    {
        opponent.take_damage(AURA_DAMAGE);
        particles::burst(
            fx,
            opponent.body_point(),
            3,
            opponent.color,
            ParticleKind::Blood,
            BurstOptions::speed(2.0),
        );
    }
}
