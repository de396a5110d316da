//! Combat resolution
//!
//! A swing is driven by `attack_frame`: it starts at `windup + 10`, counts
//! down once per tick, and connects on the tick it reaches 10. Hit
//! arbitration, projectile firing and the combo advance all happen on that
//! tick.

use glam::Vec2;
use rand::Rng;

use super::collision::point_in_platforms;
use super::input::{InputLatch, PlayerInput};
use super::particles::{self, BurstOptions, SlashStyle};
use super::player::{AttackPhase, Modifiers, PlayerEntity, pair_mut};
use super::state::{Arena, Feedback, GameEvent, ParticleKind, Projectile};
use crate::consts::*;
use crate::sign;
use crate::tuning::Platform;

/// Forward lunge when a swing connects
pub const LUNGE: f32 = 10.0;
/// Push applied to both fighters on a parry
pub const PARRY_PUSH: f32 = 5.0;
/// Phase Shift teleport distance
pub const PHASE_BLINK: f32 = 150.0;
/// Freeze duration (2 seconds)
pub const FREEZE_TICKS: u32 = 120;
/// Chance a Singularity Edge hit spawns a black hole
pub const BLACK_HOLE_CHANCE: f64 = 0.25;
/// Rocket Boots blast reach, damage and lift
pub const ROCKET_RADIUS: f32 = 150.0;
pub const ROCKET_DAMAGE: f32 = 10.0;
pub const ROCKET_LIFT: f32 = 10.0;

/// Projectile tuning
pub const PROJECTILE_SPEED: f32 = 15.0;
pub const PROJECTILE_RADIUS: f32 = 5.0;
pub const PROJECTILE_DAMAGE: f32 = 5.0;
pub const PROJECTILE_LIFE: u32 = 60;
pub const SHOTGUN_PELLETS: usize = 5;
/// Homing acceleration per tick
pub const HOMING_ACCEL: f32 = 1.5;

const WHITE: u32 = 0xffffff;

/// What a connecting swing did to the opponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrikeOutcome {
    /// Opponent out of reach, behind, or dead
    Whiff,
    /// Blocked while facing the attacker
    Parried,
    /// Opponent was invincible
    Shrugged,
    Hit { damage: f32 },
}

/// Cooldown and invincibility recovery for a free fighter
pub fn recover(p: &mut PlayerEntity) {
    p.block_cooldown = p.block_cooldown.saturating_sub(1);
    p.attack_cooldown = p.attack_cooldown.saturating_sub(1);
    p.invincible = p.invincible.saturating_sub(1);
}

/// Blocking is a gate: held and off cooldown
pub fn update_block(p: &mut PlayerEntity, input: &PlayerInput) {
    p.blocking = input.block && p.block_cooldown == 0;
}

/// Edge-triggered jump (ground or air); Rocket Boots blast a nearby opponent
///
/// Returns true if a jump happened.
pub fn try_jump(
    p: &mut PlayerEntity,
    opponent: &mut PlayerEntity,
    input: &PlayerInput,
    latch: &mut InputLatch,
    fx: &mut Feedback,
) -> bool {
    if !latch.jump_ready(input) || p.jumps_left == 0 {
        return false;
    }

    let air = !p.grounded && p.jumps_left < p.max_jumps;
    p.vel.y = -p.jump_force;
    p.jumps_left -= 1;
    latch.consume_jump();
    p.squash = Vec2::new(0.7, 1.3);

    if air {
        particles::jump_ring(fx, p.pos);
        p.rotation = std::f32::consts::TAU * p.facing.sign();
    } else {
        particles::burst(fx, p.pos, 10, WHITE, ParticleKind::Dust, BurstOptions::default());
    }
    fx.emit(GameEvent::Jumped { player: p.id, air });

    if p.has(Modifiers::ROCKET_JUMP) {
        particles::burst(fx, p.pos, 20, 0xf97316, ParticleKind::Spark, BurstOptions::default());
        if opponent.is_alive() && p.pos.distance(opponent.pos) < ROCKET_RADIUS {
            opponent.vel.y -= ROCKET_LIFT;
            opponent.take_damage(ROCKET_DAMAGE);
            particles::burst(
                fx,
                opponent.body_point(),
                5,
                opponent.color,
                ParticleKind::Blood,
                BurstOptions::default(),
            );
        }
    }
    true
}

/// Start a swing if the attack press is fresh and the fighter is free to swing
///
/// Returns true if a swing started.
pub fn try_start_attack(
    p: &mut PlayerEntity,
    input: &PlayerInput,
    latch: &mut InputLatch,
    clock: u64,
    fx: &mut Feedback,
) -> bool {
    if !latch.attack_ready(input) || p.attack_cooldown != 0 || p.blocking || p.is_dead {
        return false;
    }

    if p
        .last_attack_tick
        .is_some_and(|last| clock.saturating_sub(last) > COMBO_TIMEOUT_TICKS)
    {
        p.combo_count = 0;
    }

    p.attack_frame = p.weapon.windup + ATTACK_ACTIVE_FRAME;
    p.last_attack_tick = Some(clock);
    p.attack_cooldown = p.weapon.cooldown;
    latch.consume_attack();

    let slash_pos = p.pos + Vec2::new(p.facing.sign() * 40.0, -40.0);
    particles::slash(fx, slash_pos, p.facing, p.color, SlashStyle::for_combo(p.combo_count));
    fx.emit(GameEvent::AttackStarted {
        player: p.id,
        combo: p.combo_count,
    });
    true
}

/// Count the swing down one tick; true when it reaches the active frame
pub fn advance_attack(p: &mut PlayerEntity) -> bool {
    if p.attack_frame == 0 {
        return false;
    }
    p.attack_frame -= 1;
    p.attack_phase() == AttackPhase::Active
}

/// Opponent is alive, within range, on the facing side and roughly level
pub fn in_reach(attacker: &PlayerEntity, victim: &PlayerEntity) -> bool {
    if !victim.is_alive() {
        return false;
    }
    let delta = victim.pos - attacker.pos;
    delta.length() < attacker.weapon.range
        && sign(delta.x) == attacker.facing.sign()
        && delta.y.abs() < MELEE_VERTICAL_REACH
}

/// Arbitrate a connecting swing: parry, hit, or nothing
pub fn resolve_strike(attacker: &mut PlayerEntity, victim: &mut PlayerEntity, fx: &mut Feedback) -> StrikeOutcome {
    if !in_reach(attacker, victim) {
        return StrikeOutcome::Whiff;
    }

    let facing = attacker.facing.sign();

    if victim.blocking && victim.facing != attacker.facing {
        let spark_pos = victim.pos + Vec2::new(victim.facing.sign() * 20.0, -40.0);
        particles::burst(fx, spark_pos, 15, WHITE, ParticleKind::Spark, BurstOptions::default());
        victim.vel.x += facing * PARRY_PUSH;
        attacker.vel.x -= facing * PARRY_PUSH;
        fx.shake(5.0);
        fx.hit_stop(3);
        if victim.has(Modifiers::PHASE_BLOCK) {
            victim.pos.x += victim.facing.sign() * PHASE_BLINK;
            victim.attack_cooldown = 0;
        }
        log::debug!("Player {} parried player {}", victim.id, attacker.id);
        fx.emit(GameEvent::Parried {
            attacker: attacker.id,
            blocker: victim.id,
        });
        return StrikeOutcome::Parried;
    }

    if victim.invincible > 0 {
        return StrikeOutcome::Shrugged;
    }

    let combo = attacker.combo_count;
    let mut damage = attacker.weapon.damage;
    if combo == 2 {
        damage *= 1.5;
    }
    if attacker.has(Modifiers::VAMPIRE) {
        attacker.heal(damage * 0.5);
    }

    victim.take_damage(damage);
    victim.vel.x = facing * (attacker.weapon.knockback + f32::from(combo) * 5.0);
    victim.vel.y = -5.0;
    victim.hit_stun = 15;

    let body = victim.body_point();
    particles::burst(fx, body, 20, victim.color, ParticleKind::Blood, BurstOptions::default());
    particles::burst(
        fx,
        body,
        1,
        WHITE,
        ParticleKind::Text,
        BurstOptions {
            text: Some(format!("{}", damage.floor())),
            ..Default::default()
        },
    );
    fx.shake(10.0 + f32::from(combo) * 5.0);
    fx.hit_stop(6 + u32::from(combo));

    if attacker.has(Modifiers::FREEZE) {
        victim.freeze(FREEZE_TICKS);
        particles::burst(fx, body, 10, 0x38bdf8, ParticleKind::Spark, BurstOptions::default());
    }
    if attacker.has(Modifiers::BLACK_HOLE) && fx.rng.random_bool(BLACK_HOLE_CHANCE) {
        let pos = victim.pos - Vec2::new(0.0, 50.0);
        particles::black_hole(fx, pos);
        fx.emit(GameEvent::BlackHoleSpawned { pos });
    }

    log::debug!(
        "Player {} hit player {} for {} (combo {}), hp {}",
        attacker.id,
        victim.id,
        damage,
        combo,
        victim.hp
    );
    fx.emit(GameEvent::Hit {
        attacker: attacker.id,
        victim: victim.id,
        damage,
        combo,
    });
    StrikeOutcome::Hit { damage }
}

/// Fire the projectile modifiers of the player at `idx`
pub fn fire_projectiles(arena: &mut Arena, idx: usize) {
    let Some(p) = arena.players.get(idx) else {
        return;
    };
    if !p.has(Modifiers::PROJECTILE_ATTACK) {
        return;
    }
    let count = if p.has(Modifiers::SHOTGUN) { SHOTGUN_PELLETS } else { 1 };
    let owner = p.id;
    let facing = p.facing.sign();
    let origin = p.pos + Vec2::new(facing * 40.0, -40.0);
    let color = p.color;
    let homing = p.has(Modifiers::HOMING);

    for _ in 0..count {
        let spread = if count > 1 {
            arena.fx.rng.random::<f32>() - 0.5
        } else {
            0.0
        };
        let id = arena.next_entity_id();
        arena.projectiles.push(Projectile {
            id,
            owner,
            pos: origin,
            vel: Vec2::new(facing * PROJECTILE_SPEED, spread * 5.0),
            radius: PROJECTILE_RADIUS,
            damage: PROJECTILE_DAMAGE,
            color,
            life: PROJECTILE_LIFE,
            blockable: true,
            homing,
        });
    }
}

/// The active instant of the swing of the player at `idx`
///
/// Reach is judged from where the fighter stood during the windup; the lunge
/// only kicks in afterwards.
pub fn connect(arena: &mut Arena, idx: usize) -> StrikeOutcome {
    let outcome = match pair_mut(&mut arena.players, idx) {
        Some((attacker, victim)) => resolve_strike(attacker, victim, &mut arena.fx),
        None => StrikeOutcome::Whiff,
    };
    fire_projectiles(arena, idx);
    if let Some(p) = arena.players.get_mut(idx) {
        p.combo_count = (p.combo_count + 1) % 3;
        p.vel.x += p.facing.sign() * LUNGE;
    }
    outcome
}

/// Steer a homing projectile toward the first living opponent
fn home_in(proj: &mut Projectile, players: &[PlayerEntity]) {
    let Some(target) = players.iter().find(|p| p.id != proj.owner && p.is_alive()) else {
        return;
    };
    let dir = (target.pos - proj.pos).normalize_or_zero();
    proj.vel += dir * HOMING_ACCEL;
    let speed = proj.vel.length();
    if speed > PROJECTILE_SPEED {
        proj.vel = proj.vel / speed * PROJECTILE_SPEED;
    }
}

/// Move projectiles, resolve hits, drop spent ones
pub fn update_projectiles(
    projectiles: &mut Vec<Projectile>,
    players: &mut [PlayerEntity],
    platforms: &[Platform],
    fx: &mut Feedback,
) {
    for proj in projectiles.iter_mut() {
        if proj.homing {
            home_in(proj, players);
        }
        proj.pos += proj.vel;
        proj.life = proj.life.saturating_sub(1);

        let hit_map = point_in_platforms(proj.pos, platforms);

        let mut hit_player = false;
        for p in players.iter_mut().filter(|p| p.id != proj.owner && p.is_alive()) {
            let target = Vec2::new(p.pos.x, p.pos.y - 50.0);
            if target.distance(proj.pos) >= p.width() + proj.radius {
                continue;
            }
            hit_player = true;

            let dir = if proj.vel.x > 0.0 { 1.0 } else { -1.0 };
            if proj.blockable && p.blocking && p.facing.sign() != sign(proj.vel.x) {
                particles::burst(fx, proj.pos, 10, WHITE, ParticleKind::Spark, BurstOptions::default());
                fx.emit(GameEvent::ProjectileBlocked {
                    owner: proj.owner,
                    blocker: p.id,
                });
            } else {
                p.take_damage(proj.damage);
                p.vel.x += dir * 5.0;
                p.hit_stun = 10;
                particles::burst(fx, proj.pos, 15, p.color, ParticleKind::Blood, BurstOptions::default());
                fx.hit_stop(5);
                fx.shake(5.0);
                log::debug!("Projectile from player {} hit player {}", proj.owner, p.id);
                fx.emit(GameEvent::ProjectileHit {
                    owner: proj.owner,
                    victim: p.id,
                    damage: proj.damage,
                });
            }
        }

        if hit_map || hit_player {
            proj.life = 0;
        }
    }
    projectiles.retain(|p| p.life > 0);
}
