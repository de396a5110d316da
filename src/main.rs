//! Neon Duel entry point
//!
//! Headless native runner: both fighters are driven by the autopilot and the
//! match plays out in the log.
//!
//! Usage: `neon-duel [seed] [p1-weapon] [p2-weapon] [quality]`

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use neon_duel::settings::{QualityPreset, Settings};
use neon_duel::consts::TICKS_PER_SECOND;
use neon_duel::sim::{GameEvent, GamePhase, GameState, MatchError, TickInput, tick};
use neon_duel::tuning::WeaponId;

/// Give up after ten simulated minutes
const TICK_BUDGET: u64 = 10 * 60 * TICKS_PER_SECOND as u64;

fn parse_weapon(arg: Option<String>) -> WeaponId {
    let Some(name) = arg else {
        return WeaponId::default();
    };
    WeaponId::ALL
        .into_iter()
        .find(|w| format!("{:?}", w).eq_ignore_ascii_case(&name) || w.stats().name.eq_ignore_ascii_case(&name))
        .unwrap_or_else(|| {
            log::warn!("Unknown weapon {:?}, using the default", name);
            WeaponId::default()
        })
}

/// Settings file, with the quality preset overridden from the command line
fn load_settings(quality: Option<String>) -> Settings {
    let mut settings = Settings::load();
    if let Some(name) = quality {
        match QualityPreset::from_str(&name) {
            Some(preset) => settings.quality = preset,
            None => log::warn!("Unknown quality {:?}, keeping {}", name, settings.quality.as_str()),
        }
    }
    log::info!("Quality {}, {} particles max", settings.quality.as_str(), settings.max_particles());
    settings
}

fn run(seed: u64, loadout: [WeaponId; 2], settings: Settings) -> Result<(), MatchError> {
    let mut state = GameState::with_settings(seed, settings);
    // Card picks come from their own stream so they do not disturb the arena RNG
    let mut picker = Pcg32::seed_from_u64(seed ^ 0x5eed);

    state.skip_intro()?;
    state.start_match()?;
    state.confirm_weapons(loadout[0], loadout[1])?;

    let input = TickInput {
        autopilot: [true, true],
        ..Default::default()
    };

    let mut ticks = 0;
    while state.phase != GamePhase::GameOver && ticks < TICK_BUDGET {
        tick(&mut state, &input);
        ticks += 1;

        for event in state.drain_events() {
            match event {
                GameEvent::RoundOver { winner, loser } => {
                    log::info!("Player {} beat player {}", winner, loser);
                }
                GameEvent::RoundDraw => log::info!("Draw, replaying"),
                GameEvent::MatchOver { winner } => log::info!("Player {} takes the match", winner),
                _ => {}
            }
        }

        if state.phase == GamePhase::CardSelect {
            let idx = picker.random_range(0..state.card_offer.len());
            let card = state.card_offer[idx];
            state.select_card(card)?;
        }
    }

    let seconds = ticks / u64::from(TICKS_PER_SECOND);
    match state.winner_id {
        Some(winner) => println!(
            "Player {} wins {} - {} after {} rounds ({}s simulated)",
            winner, state.scores[0], state.scores[1], state.round, seconds
        ),
        None => println!(
            "No winner after {}s: {} - {}",
            seconds, state.scores[0], state.scores[1]
        ),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Neon Duel (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let loadout = [parse_weapon(args.next()), parse_weapon(args.next())];
    let settings = load_settings(args.next());
    log::info!("Seed {} with {:?}", seed, loadout);

    if let Err(err) = run(seed, loadout, settings) {
        log::error!("Match aborted: {}", err);
        std::process::exit(1);
    }
}
