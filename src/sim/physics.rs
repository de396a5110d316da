//! Fighter kinematics
//!
//! Integration order for a free (not stunned, not dead) fighter:
//! steer, map elements, jump/attack (combat), integrate, then collide.

use glam::Vec2;

use super::collision::land_on_platforms;
use super::input::PlayerInput;
use super::particles::{self, BurstOptions};
use super::player::{Facing, PlayerEntity};
use super::state::{Feedback, GameEvent, ParticleKind};
use crate::consts::*;
use crate::tuning::{MapData, MapElement, MapElementKind};

/// Damage dealt by the lava line
pub const LAVA_DAMAGE: f32 = 20.0;
/// Upward launch when touching lava
pub const LAVA_LAUNCH: f32 = 20.0;

/// Horizontal steering from held directions
pub fn steer(p: &mut PlayerEntity, input: &PlayerInput) {
    let accel = p.move_accel();
    if input.left {
        p.vel.x -= accel;
        p.facing = Facing::Left;
    }
    if input.right {
        p.vel.x += accel;
        p.facing = Facing::Right;
    }
}

/// Jump pads and fans acting on the body point
pub fn apply_elements(p: &mut PlayerEntity, elements: &[MapElement], fx: &mut Feedback) {
    let body = p.body_point();
    for el in elements.iter().filter(|el| el.contains(body)) {
        match el.kind {
            MapElementKind::JumpPad => {
                // Only while falling, so the pad cannot retrigger on the way up
                if p.vel.y > 0.0 {
                    p.vel.y = -el.power;
                    p.refill_jumps();
                    particles::burst(fx, p.pos, 15, 0x00ffff, ParticleKind::Ring, BurstOptions::default());
                }
            }
            MapElementKind::Fan { direction } => {
                p.vel += direction * el.power;
            }
        }
    }
}

/// Friction, gravity (or the spawn pin), air resistance, terminal speed, then move
pub fn integrate(p: &mut PlayerEntity, round_ticks: u32) {
    p.vel.x *= FRICTION;

    if round_ticks < SPAWN_LOCK_TICKS {
        // Slight push down to trigger landing without accelerating through floors
        p.vel.y = 1.0;
    } else {
        p.vel.y += GRAVITY;
    }

    p.vel.y *= AIR_RESISTANCE;
    p.vel.y = p.vel.y.min(TERMINAL_VELOCITY);
    p.pos += p.vel;

    p.squash += (Vec2::ONE - p.squash) * 0.1;
    p.rotation *= 0.8;
}

/// Hit-stunned fighters skip input and only drift
pub fn stunned_step(p: &mut PlayerEntity) {
    p.hit_stun -= 1;
    p.squash = Vec2::new(0.8, 1.2);
    // Getting hit during windup cancels the swing
    if p.attack_frame > ATTACK_ACTIVE_FRAME {
        p.attack_frame = 0;
    } else {
        p.attack_frame = p.attack_frame.saturating_sub(1);
    }
    p.vel.x *= FRICTION;
    p.vel.y += GRAVITY;
    p.pos += p.vel;
}

/// Dead fighters ragdoll under gravity until the death timer runs out
pub fn ragdoll(p: &mut PlayerEntity) {
    if p.death_timer == 0 {
        return;
    }
    p.death_timer -= 1;
    p.vel.y += GRAVITY;
    p.pos += p.vel;
}

/// Whether a fighter at `pos_y` has fallen into the void this tick
pub fn in_void(pos_y: f32, round_ticks: u32) -> bool {
    round_ticks >= ROUND_GRACE_TICKS && pos_y >= CANVAS_HEIGHT + VOID_MARGIN
}

/// Platform landing, lava line and void checks
pub fn collide(p: &mut PlayerEntity, map: &MapData, fx: &mut Feedback, round_ticks: u32) {
    p.grounded = false;

    if land_on_platforms(p.prev_pos, &mut p.pos, &mut p.vel, p.half_extents.x, &map.platforms).is_some() {
        p.grounded = true;
        p.refill_jumps();
        p.rotation = 0.0;
    }

    if p.is_dead {
        return;
    }

    if map.hazard_y.is_some_and(|hazard_y| p.pos.y >= hazard_y) {
        // Lava ignores invincibility
        p.vel.y = -LAVA_LAUNCH;
        p.take_damage(LAVA_DAMAGE);
        p.hit_stun = 20;
        particles::burst(fx, p.pos, 10, 0xf59e0b, ParticleKind::Spark, BurstOptions::default());
        fx.shake(10.0);
        fx.emit(GameEvent::LavaBurn { player: p.id });
    }

    if in_void(p.pos.y, round_ticks) {
        p.hp = 0.0;
        let death_pos = Vec2::new(p.pos.x, CANVAS_HEIGHT - 50.0);
        p.death_pos = Some(death_pos);
        particles::explosion(fx, death_pos, p.color);
        log::debug!("Player {} fell into the void", p.id);
    }
}
