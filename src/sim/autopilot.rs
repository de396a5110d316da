//! Demo-mode bot
//!
//! Produces held inputs from the arena alone, so a headless match can run
//! without a human. Deterministic: the only "randomness" is an oscillation
//! on the tick clock.

use super::collision::overlaps_horizontally;
use super::combat::in_reach;
use super::input::PlayerInput;
use super::player::{AttackPhase, Facing, PlayerEntity};
use super::state::Arena;
use crate::tuning::Platform;

/// How close the bot tries to stand, as a fraction of its weapon range
const PREFERRED_REACH: f32 = 0.6;
/// Lava clearance before the bot jumps out
const LAVA_MARGIN: f32 = 80.0;

/// Inputs for player `id` this tick
pub fn drive(arena: &Arena, id: u8) -> PlayerInput {
    let Some(me) = arena.player(id) else {
        return PlayerInput::default();
    };
    if me.is_dead || me.hit_stun > 0 {
        return PlayerInput::default();
    }

    let mut input = PlayerInput::default();
    // Alternate ticks so edge-triggered buttons get released
    let pulse = arena.clock % 2 == 0;

    // Falling with nothing underneath: steer back over the nearest platform
    if !has_ground_below(me, &arena.map.platforms) {
        if let Some(target_x) = nearest_platform_x(me, &arena.map.platforms) {
            input.left = target_x < me.pos.x;
            input.right = target_x > me.pos.x;
        }
        input.jump = pulse && me.vel.y > 0.0 && me.jumps_left > 0;
        return input;
    }

    if arena.map.hazard_y.is_some_and(|hazard_y| me.pos.y > hazard_y - LAVA_MARGIN) {
        input.jump = pulse;
    }

    let Some(foe) = arena.players.iter().find(|p| p.id != id && p.is_alive()) else {
        return input;
    };

    let dx = foe.pos.x - me.pos.x;
    let toward = if dx < 0.0 { Facing::Left } else { Facing::Right };

    if dx.abs() > me.weapon.range * PREFERRED_REACH {
        input.left = toward == Facing::Left;
        input.right = toward == Facing::Right;
    } else if me.facing != toward {
        // Turn around without closing in
        input.left = toward == Facing::Left;
        input.right = toward == Facing::Right;
    }

    // Chase upward
    if foe.pos.y < me.pos.y - 60.0 && me.grounded {
        input.jump = pulse;
    }

    let threatened = foe.attack_phase() == AttackPhase::Windup && in_reach(foe, me);
    let wobble = (arena.clock as f32 * 0.05).sin() + (arena.clock as f32 * 0.031).sin() * 0.5;
    if threatened && wobble > 0.2 && me.block_cooldown == 0 {
        input.block = true;
        input.left = toward == Facing::Left;
        input.right = toward == Facing::Right;
        return input;
    }

    input.attack = me.attack_frame == 0 && me.attack_cooldown == 0 && in_reach(me, foe);
    input
}

fn has_ground_below(p: &PlayerEntity, platforms: &[Platform]) -> bool {
    platforms
        .iter()
        .any(|pl| pl.y >= p.pos.y - 5.0 && overlaps_horizontally(p.pos.x, p.half_extents.x, pl))
}

fn nearest_platform_x(p: &PlayerEntity, platforms: &[Platform]) -> Option<f32> {
    platforms
        .iter()
        .map(|pl| pl.x + pl.w / 2.0)
        .min_by(|a, b| {
            (a - p.pos.x)
                .abs()
                .partial_cmp(&(b - p.pos.x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::tuning::{WeaponId, maps};

    fn arena_with(p1: Vec2, p2: Vec2) -> Arena {
        let katana = WeaponId::Katana.stats();
        let mut arena = Arena::new(1, 100);
        arena.reset(
            maps::tutorial(),
            vec![PlayerEntity::new(1, p1, &katana), PlayerEntity::new(2, p2, &katana)],
        );
        arena
    }

    #[test]
    fn test_approaches_distant_foe() {
        let arena = arena_with(Vec2::new(200.0, 600.0), Vec2::new(900.0, 600.0));
        let input = drive(&arena, 1);
        assert!(input.right);
        assert!(!input.left);
        assert!(!input.attack);
        let input = drive(&arena, 2);
        assert!(input.left);
    }

    #[test]
    fn test_attacks_in_reach() {
        let arena = arena_with(Vec2::new(400.0, 600.0), Vec2::new(450.0, 600.0));
        let input = drive(&arena, 1);
        assert!(input.attack);
        assert!(!input.right);
    }

    #[test]
    fn test_recovers_toward_platform() {
        let mut arena = arena_with(Vec2::new(50.0, 700.0), Vec2::new(900.0, 600.0));
        arena.players[0].vel.y = 5.0;
        let input = drive(&arena, 1);
        assert!(input.right);
        assert!(input.jump);
    }

    #[test]
    fn test_idle_when_stunned_or_missing() {
        let mut arena = arena_with(Vec2::new(400.0, 600.0), Vec2::new(450.0, 600.0));
        arena.players[0].hit_stun = 3;
        assert!(!drive(&arena, 1).any());
        assert!(!drive(&arena, 9).any());
    }
}
