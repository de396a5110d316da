//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::input::{PlayerInput, TickInput};
use super::player::{AttackPhase, PlayerEntity, pair_mut};
use super::state::{Feedback, GameEvent, GamePhase, GameState, INTRO_DURATION_TICKS, TutorialProgress};
use super::{autopilot, combat, hazards, particles, physics};

/// Rounds this young with a missing fighter are rebuilt
const SPAWN_RACE_TICKS: u32 = 10;

/// Advance the game state by one fixed timestep (1/60 s)
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Intro => {
            tick_intro(state, input);
            return;
        }
        GamePhase::Menu | GamePhase::WeaponSelect => return,
        GamePhase::Tutorial | GamePhase::Playing | GamePhase::CardSelect | GamePhase::GameOver => {}
    }

    // Only live phases read controls; the arena keeps animating behind menus
    let live = matches!(state.phase, GamePhase::Playing | GamePhase::Tutorial);
    let mut input = if live { input.clone() } else { TickInput::default() };
    if live {
        for (slot, enabled) in input.autopilot.into_iter().enumerate() {
            if enabled {
                input.players[slot] = autopilot::drive(&state.arena, slot as u8 + 1);
            }
        }
    }
    let input = &input;

    state.advance_round_over();

    let arena = &mut state.arena;
    arena.clock += 1;
    arena.round_ticks += 1;

    if arena.players.len() < 2 {
        if arena.round_ticks < SPAWN_RACE_TICKS {
            log::warn!("Round started with {} fighters, rebuilding", arena.players.len());
            state.start_round();
        }
        return;
    }

    // Hit-stop freezes everything but the shake
    if arena.fx.hit_stop > 0 {
        arena.fx.hit_stop -= 1;
        arena.fx.shake *= 0.9;
        return;
    }

    arena.camera.follow(&arena.players);

    arena.fx.shake *= 0.9;
    if arena.fx.shake.abs() < 0.5 {
        arena.fx.shake = 0.0;
    }

    hazards::update_rotating(&mut arena.map.hazards, &mut arena.players, &mut arena.fx);
    combat::update_projectiles(
        &mut arena.projectiles,
        &mut arena.players,
        &arena.map.platforms,
        &mut arena.fx,
    );
    particles::update(&mut arena.fx, &mut arena.players, &arena.map.platforms);

    for idx in 0..state.arena.players.len() {
        update_player(state, idx, input);
    }

    match state.phase {
        GamePhase::Tutorial => revive_tutorial(state),
        GamePhase::Playing => state.check_round_end(),
        _ => {}
    }
}

fn tick_intro(state: &mut GameState, input: &TickInput) {
    state.intro_ticks += 1;
    particles::update(&mut state.arena.fx, &mut [], &[]);
    if state.intro_ticks > INTRO_DURATION_TICKS || input.any_key {
        if let Err(err) = state.skip_intro() {
            log::warn!("Intro skip failed: {}", err);
        }
    }
}

/// One fighter's tick: death, stun or free movement, then collision
fn update_player(state: &mut GameState, idx: usize, input: &TickInput) {
    let phase = state.phase;
    let GameState {
        arena,
        latches,
        tutorial,
        ..
    } = state;
    let round_ticks = arena.round_ticks;
    let clock = arena.clock;

    let strike_now;
    let stunned;
    {
        let Some((p, opponent)) = pair_mut(&mut arena.players, idx) else {
            return;
        };
        let fx = &mut arena.fx;

        if p.hp <= 0.0 && !p.is_dead {
            die(p, fx);
        }
        if p.is_dead {
            physics::ragdoll(p);
            return;
        }

        p.prev_pos = p.pos;
        p.tick_status();

        let pin = input.for_player(p.id);
        let Some(latch) = latches.get_mut(idx) else {
            return;
        };

        stunned = p.hit_stun > 0;
        if stunned {
            physics::stunned_step(p);
            strike_now = false;
        } else {
            combat::recover(p);
            hazards::apply_passives(p, opponent, round_ticks, fx);

            if phase == GamePhase::Tutorial && p.id == 1 {
                track_tutorial(tutorial, &pin, fx);
            }

            physics::steer(p, &pin);
            physics::apply_elements(p, &arena.map.elements, fx);
            combat::try_jump(p, opponent, &pin, latch, fx);
            combat::update_block(p, &pin);

            let reached = combat::advance_attack(p);
            let started = combat::try_start_attack(p, &pin, latch, clock, fx);
            strike_now = reached || (started && p.attack_phase() == AttackPhase::Active);
            latch.release(&pin);
        }
    }

    if strike_now {
        combat::connect(arena, idx);
    }

    let Some(p) = arena.players.get_mut(idx) else {
        return;
    };
    if !stunned {
        physics::integrate(p, round_ticks);
    }
    physics::collide(p, &arena.map, &mut arena.fx, round_ticks);
}

fn die(p: &mut PlayerEntity, fx: &mut Feedback) {
    p.mark_dead();
    let pos = p.death_pos.unwrap_or(p.pos);
    particles::explosion(fx, p.pos - Vec2::new(0.0, 30.0), p.color);
    fx.shake(30.0);
    fx.hit_stop(10);
    log::info!("Player {} died at ({:.0}, {:.0})", p.id, pos.x, pos.y);
    fx.emit(GameEvent::PlayerDied { player: p.id, pos });
}

/// Move, then jump, then attack; each step only counts once the previous is done
fn track_tutorial(progress: &mut TutorialProgress, pin: &PlayerInput, fx: &mut Feedback) {
    let before = progress.step();
    if (pin.left || pin.right) && !progress.moved {
        progress.moved = true;
    }
    if pin.jump && progress.moved && !progress.jumped {
        progress.jumped = true;
    }
    if pin.attack && progress.jumped && !progress.attacked {
        progress.attacked = true;
    }
    let step = progress.step();
    if step != before {
        log::info!("Tutorial step {}", step);
        fx.emit(GameEvent::TutorialStep { step });
    }
}

/// The dummy comes back immediately; player 1 after the death animation
fn revive_tutorial(state: &mut GameState) {
    state.revive_dummy();
    let spawn = state.arena.map.spawn_points[0];
    if let Some(p1) = state.arena.player_mut(1) {
        if p1.is_dead && p1.death_timer == 0 {
            p1.respawn_at(spawn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::RAIN_DROPS;
    use crate::tuning::{CardId, WeaponId, maps};
    use proptest::prelude::*;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.skip_intro().unwrap();
        state.start_match().unwrap();
        state.confirm_weapons(WeaponId::Katana, WeaponId::Katana).unwrap();
        state
    }

    /// Both fighters on the training floor, past spawn protection
    fn face_off(state: &mut GameState, x1: f32, x2: f32) {
        state.arena.map = maps::tutorial();
        state.arena.round_ticks = 100;
        for (p, x) in state.arena.players.iter_mut().zip([x1, x2]) {
            p.pos = Vec2::new(x, 600.0);
            p.prev_pos = p.pos;
            p.invincible = 0;
        }
    }

    fn press(p1: PlayerInput) -> TickInput {
        TickInput {
            players: [p1, PlayerInput::default()],
            ..Default::default()
        }
    }

    fn attack() -> PlayerInput {
        PlayerInput {
            attack: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_intro_times_out() {
        let mut state = GameState::new(1);
        for _ in 0..INTRO_DURATION_TICKS {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.arena.fx.particles.len(), RAIN_DROPS);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.arena.fx.particles.is_empty());
    }

    #[test]
    fn test_any_key_skips_intro() {
        let mut state = GameState::new(1);
        tick(
            &mut state,
            &TickInput {
                any_key: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut state = GameState::new(1);
        state.skip_intro().unwrap();
        let clock = state.arena.clock;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.arena.clock, clock);
    }

    #[test]
    fn test_windup_then_hit() {
        let mut state = playing(3);
        face_off(&mut state, 400.0, 450.0);

        // Swing starts on tick 1, connects 5 ticks later (katana windup 5)
        for _ in 0..5 {
            tick(&mut state, &press(attack()));
            assert_eq!(state.arena.players[1].hp, 100.0);
        }
        tick(&mut state, &press(attack()));
        assert_eq!(state.arena.players[1].hp, 85.0);
        assert_eq!(state.arena.fx.hit_stop, 6);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Hit { attacker: 1, victim: 2, combo: 0, .. }))
        );
        assert_eq!(state.arena.players[0].combo_count, 1);
    }

    #[test]
    fn test_point_blank_swing_connects() {
        for gap in [10.0, 20.0] {
            let mut state = playing(3);
            face_off(&mut state, 400.0, 400.0 + gap);
            assert!(combat::in_reach(&state.arena.players[0], &state.arena.players[1]));
            for _ in 0..6 {
                tick(&mut state, &press(attack()));
            }
            assert_eq!(state.arena.players[1].hp, 85.0, "gap {}", gap);
        }
    }

    #[test]
    fn test_held_attack_swings_once() {
        let mut state = playing(3);
        face_off(&mut state, 200.0, 900.0);
        for _ in 0..40 {
            tick(&mut state, &press(attack()));
        }
        let swings = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::AttackStarted { player: 1, .. }))
            .count();
        assert_eq!(swings, 1);
    }

    #[test]
    fn test_parry_on_tick() {
        let mut state = playing(3);
        face_off(&mut state, 400.0, 450.0);
        let guard = PlayerInput {
            block: true,
            ..Default::default()
        };
        for _ in 0..6 {
            tick(
                &mut state,
                &TickInput {
                    players: [attack(), guard],
                    ..Default::default()
                },
            );
        }
        assert_eq!(state.arena.players[1].hp, 100.0);
        assert_eq!(state.arena.fx.hit_stop, 3);
        assert!(state.drain_events().contains(&GameEvent::Parried {
            attacker: 1,
            blocker: 2
        }));
    }

    #[test]
    fn test_hit_stop_freezes_world() {
        let mut state = playing(3);
        face_off(&mut state, 400.0, 800.0);
        state.arena.players[0].vel.x = 10.0;
        state.arena.fx.hit_stop = 2;
        let before = state.arena.players[0].pos;
        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.arena.players[0].pos, before);
        tick(&mut state, &TickInput::default());
        assert_ne!(state.arena.players[0].pos, before);
    }

    #[test]
    fn test_death_feedback() {
        let mut state = playing(3);
        face_off(&mut state, 400.0, 800.0);
        state.arena.players[1].hp = 0.0;
        tick(&mut state, &TickInput::default());
        let dead = &state.arena.players[1];
        assert!(dead.is_dead);
        // The ragdoll starts on the same tick
        assert_eq!(dead.death_timer, DEATH_TIMER_TICKS - 1);
        assert_eq!(state.arena.fx.hit_stop, 10);
        assert_eq!(state.arena.fx.shake, 30.0);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerDied { player: 2, .. }))
        );
    }

    #[test]
    fn test_kill_to_card_select() {
        let mut state = playing(3);
        face_off(&mut state, 400.0, 800.0);
        state.arena.players[1].hp = 0.0;

        let mut ticks = 0;
        while state.phase == GamePhase::Playing && ticks < 500 {
            tick(&mut state, &TickInput::default());
            ticks += 1;
        }
        assert_eq!(state.phase, GamePhase::CardSelect);
        assert_eq!(state.scores, [1, 0]);
        // 10 hit-stop + 60 death animation + 30 round-over delay
        assert!(ticks >= 100);

        // The arena keeps animating without input while the loser picks
        let clock = state.arena.clock;
        tick(&mut state, &press(attack()));
        assert_eq!(state.arena.clock, clock + 1);

        let pick = state.card_offer[0];
        state.select_card(pick).unwrap();
        assert_eq!(state.round, 2);
        assert_eq!(state.arena.alive_count(), 2);
    }

    #[test]
    fn test_spawn_race_rebuilds_round() {
        let mut state = playing(3);
        state.arena.players.clear();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.arena.players.len(), 2);
    }

    #[test]
    fn test_tutorial_progress_in_order() {
        let mut state = GameState::new(2);
        state.skip_intro().unwrap();
        state.start_tutorial().unwrap();

        // Attacking first does not count
        tick(&mut state, &press(attack()));
        assert_eq!(state.tutorial.step(), 0);

        tick(
            &mut state,
            &press(PlayerInput {
                right: true,
                ..Default::default()
            }),
        );
        assert!(state.tutorial.moved);
        tick(
            &mut state,
            &press(PlayerInput {
                jump: true,
                ..Default::default()
            }),
        );
        assert!(state.tutorial.jumped);
        tick(&mut state, &TickInput::default());
        for _ in 0..20 {
            tick(&mut state, &press(attack()));
        }
        assert!(state.tutorial.is_complete());
        let steps: Vec<u8> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::TutorialStep { step } => Some(step),
                _ => None,
            })
            .collect();
        assert_eq!(steps, vec![1, 2, 3]);
        state.finish_tutorial().unwrap();
    }

    #[test]
    fn test_tutorial_dummy_never_stays_dead() {
        let mut state = GameState::new(2);
        state.skip_intro().unwrap();
        state.start_tutorial().unwrap();
        state.arena.players[1].hp = 0.0;
        tick(&mut state, &TickInput::default());
        assert!(state.arena.players[1].is_alive());
        assert_eq!(state.arena.players[1].hp, 100.0);
        assert_eq!(state.scores, [0, 0]);
    }

    #[test]
    fn test_vampire_drain_once_per_second() {
        let mut state = playing(3);
        face_off(&mut state, 200.0, 900.0);
        CardId::VampireLord.apply(&mut state.arena.players[0]);
        state.arena.round_ticks = 0;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.arena.players[0].hp, 98.0);
    }

    #[test]
    fn test_determinism() {
        let run = |seed: u64| {
            let mut state = playing(seed);
            let input = TickInput {
                autopilot: [true, true],
                ..Default::default()
            };
            for _ in 0..3000 {
                tick(&mut state, &input);
                if state.phase == GamePhase::CardSelect {
                    let pick = state.card_offer[0];
                    state.select_card(pick).unwrap();
                }
            }
            serde_json::to_string(&state.snapshot()).unwrap()
        };
        assert_eq!(run(42), run(42));
    }

    fn decode(bits: u8) -> PlayerInput {
        PlayerInput {
            left: bits & 1 != 0,
            right: bits & 2 != 0,
            jump: bits & 4 != 0,
            attack: bits & 8 != 0,
            block: bits & 16 != 0,
        }
    }

    proptest! {
        #[test]
        fn prop_hp_and_jumps_stay_in_bounds(
            seed in any::<u64>(),
            script in proptest::collection::vec((0u8..32, 0u8..32), 1..400),
            card in 0usize..10,
        ) {
            let mut state = playing(seed);
            state.cards[0].push(CardId::ALL[card]);
            state.cards[1].push(CardId::ALL[(card + 3) % 10]);
            state.start_round();
            for (a, b) in script {
                tick(&mut state, &TickInput {
                    players: [decode(a), decode(b)],
                    ..Default::default()
                });
                for p in &state.arena.players {
                    prop_assert!(p.hp >= 0.0 && p.hp <= p.max_hp);
                    prop_assert!(p.jumps_left <= p.max_jumps);
                }
            }
        }
    }
}
