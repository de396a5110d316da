//! Round and match flow
//!
//! Phase transitions driven by the outside world (menu choices, weapon and
//! card picks) plus the round bookkeeping the tick loop runs: scheduling a
//! round-over after a kill, scoring, and the card draft.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use super::player::PlayerEntity;
use super::state::{CARD_OFFER_SIZE, GameEvent, GamePhase, GameState, PendingRoundOver, TutorialProgress};
use crate::consts::*;
use crate::tuning::{CardId, MapData, TuningError, WeaponId, maps};

/// Where the tutorial dummy comes back
pub const DUMMY_RESPAWN: Vec2 = Vec2::new(600.0, 300.0);

/// Misuse of the match API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("cannot {action} during {phase:?}")]
    WrongPhase { action: &'static str, phase: GamePhase },
    #[error("card {0:?} was not offered")]
    CardNotOffered(CardId),
    #[error("no player lost the last round")]
    NoLoser,
    #[error("tutorial is not complete")]
    TutorialIncomplete,
}

impl GameState {
    fn expect_phase(&self, phase: GamePhase, action: &'static str) -> Result<(), MatchError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(MatchError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.arena.fx.emit(GameEvent::PhaseChanged { from, to });
    }

    /// Leave the intro for the title screen
    pub fn skip_intro(&mut self) -> Result<(), MatchError> {
        self.expect_phase(GamePhase::Intro, "skip the intro")?;
        self.arena.fx.particles.clear();
        self.set_phase(GamePhase::Menu);
        Ok(())
    }

    /// Title screen → weapon select
    pub fn start_match(&mut self) -> Result<(), MatchError> {
        self.expect_phase(GamePhase::Menu, "start a match")?;
        self.set_phase(GamePhase::WeaponSelect);
        Ok(())
    }

    /// Title screen → practice arena
    pub fn start_tutorial(&mut self) -> Result<(), MatchError> {
        self.expect_phase(GamePhase::Menu, "start the tutorial")?;
        self.tutorial = TutorialProgress::default();
        self.set_phase(GamePhase::Tutorial);
        self.start_round();
        Ok(())
    }

    /// Back to the title screen once every tutorial step is done
    pub fn finish_tutorial(&mut self) -> Result<(), MatchError> {
        self.expect_phase(GamePhase::Tutorial, "finish the tutorial")?;
        if !self.tutorial.is_complete() {
            return Err(MatchError::TutorialIncomplete);
        }
        self.set_phase(GamePhase::Menu);
        Ok(())
    }

    /// Lock in starting weapons and start round 1 from a clean scoreboard
    pub fn confirm_weapons(&mut self, p1: WeaponId, p2: WeaponId) -> Result<(), MatchError> {
        self.expect_phase(GamePhase::WeaponSelect, "confirm weapons")?;
        self.loadout = [p1, p2];
        self.scores = [0, 0];
        self.round = 1;
        self.cards = [Vec::new(), Vec::new()];
        self.card_offer.clear();
        self.winner_id = None;
        self.last_loser_id = None;
        log::info!("Match started: {:?} vs {:?}", p1, p2);
        self.set_phase(GamePhase::Playing);
        self.start_round();
        Ok(())
    }

    /// The last loser drafts one of the offered cards; the next round starts
    pub fn select_card(&mut self, card: CardId) -> Result<(), MatchError> {
        self.expect_phase(GamePhase::CardSelect, "select a card")?;
        if !self.card_offer.contains(&card) {
            return Err(MatchError::CardNotOffered(card));
        }
        let slot = match self.last_loser_id {
            Some(id @ 1..=2) => usize::from(id - 1),
            _ => return Err(MatchError::NoLoser),
        };

        log::info!("Player {} drafted {}", slot + 1, card.card().name);
        self.cards[slot].push(card);
        self.card_offer.clear();
        self.round += 1;
        self.set_phase(GamePhase::Playing);
        self.start_round();
        Ok(())
    }

    /// Match over → weapon select
    pub fn play_again(&mut self) -> Result<(), MatchError> {
        self.expect_phase(GamePhase::GameOver, "play again")?;
        self.set_phase(GamePhase::WeaponSelect);
        Ok(())
    }

    /// Replace the versus map pool with maps parsed from JSON
    pub fn load_maps(&mut self, json: &str) -> Result<(), TuningError> {
        self.map_pool = maps::catalog_from_json(json)?;
        log::info!("Loaded {} maps", self.map_pool.len());
        Ok(())
    }

    fn pick_map(&mut self) -> MapData {
        if self.phase == GamePhase::Tutorial {
            return maps::tutorial();
        }
        if self.map_pool.is_empty() {
            log::warn!("Map pool is empty, restoring the built-in catalog");
            self.map_pool = maps::catalog();
        }
        let idx = self.arena.fx.rng.random_range(0..self.map_pool.len());
        self.map_pool[idx].clone()
    }

    /// Fresh map and fighters; drafted cards are reapplied in versus rounds
    pub fn start_round(&mut self) {
        let map = self.pick_map();

        let mut players: Vec<PlayerEntity> = (0..2)
            .map(|slot| {
                let id = slot as u8 + 1;
                PlayerEntity::new(id, map.spawn_points[slot], &self.loadout[slot].stats())
            })
            .collect();

        if self.phase == GamePhase::Playing {
            for (player, cards) in players.iter_mut().zip(&self.cards) {
                for card in cards {
                    card.apply(player);
                }
            }
        }
        for player in &mut players {
            player.refill();
        }

        log::info!("Round {} on {}", self.round, map.name);
        let name = map.name.clone();
        self.arena.reset(map, players);
        self.arena.fx.emit(GameEvent::RoundStarted {
            round: self.round,
            map: name,
        });
    }

    /// Schedule a round-over once the death animation has finished
    ///
    /// A double knock-out replays the round without scoring.
    pub fn check_round_end(&mut self) {
        let arena = &self.arena;
        if self.phase != GamePhase::Playing || arena.round_ticks < ROUND_GRACE_TICKS || arena.round_ending {
            return;
        }
        if arena.players.iter().any(|p| p.is_dead && p.death_timer > 0) {
            return;
        }

        let alive: Vec<u8> = arena.players.iter().filter(|p| p.is_alive()).map(|p| p.id).collect();
        match alive.as_slice() {
            &[winner] => {
                let Some(loser) = arena.players.iter().find(|p| p.id != winner).map(|p| p.id) else {
                    return;
                };
                let generation = arena.generation;
                self.arena.round_ending = true;
                self.arena.pending_round_over = Some(PendingRoundOver {
                    winner,
                    loser,
                    remaining: ROUND_OVER_DELAY_TICKS,
                    generation,
                });
            }
            [] => {
                log::info!("Double knock-out, replaying round {}", self.round);
                self.arena.fx.emit(GameEvent::RoundDraw);
                self.start_round();
            }
            _ => {}
        }
    }

    /// Count the scheduled round-over down; fires once when it reaches zero
    pub fn advance_round_over(&mut self) {
        let Some(mut pending) = self.arena.pending_round_over.take() else {
            return;
        };
        if pending.generation != self.arena.generation || self.phase != GamePhase::Playing {
            log::warn!("Dropping stale round-over from generation {}", pending.generation);
            return;
        }
        pending.remaining = pending.remaining.saturating_sub(1);
        if pending.remaining > 0 {
            self.arena.pending_round_over = Some(pending);
            return;
        }
        self.finish_round(pending.winner, pending.loser);
    }

    /// Score the round and move to the draft or end the match
    fn finish_round(&mut self, winner: u8, loser: u8) {
        let Some(score) = self.scores.get_mut(usize::from(winner.saturating_sub(1))) else {
            return;
        };
        *score += 1;
        let score = *score;
        log::info!(
            "Round {} to player {} ({} - {})",
            self.round,
            winner,
            self.scores[0],
            self.scores[1]
        );
        self.arena.fx.emit(GameEvent::RoundOver { winner, loser });

        if score >= self.settings.win_score {
            self.winner_id = Some(winner);
            log::info!("Player {} wins the match", winner);
            self.arena.fx.emit(GameEvent::MatchOver { winner });
            self.set_phase(GamePhase::GameOver);
        } else {
            self.last_loser_id = Some(loser);
            self.offer_cards();
            self.set_phase(GamePhase::CardSelect);
        }
    }

    /// Deal distinct random cards to the loser
    fn offer_cards(&mut self) {
        let mut deck = CardId::ALL.to_vec();
        deck.shuffle(&mut self.arena.fx.rng);
        deck.truncate(CARD_OFFER_SIZE);
        self.card_offer = deck;
    }

    /// Revive the practice dummy in place
    pub fn revive_dummy(&mut self) {
        if let Some(dummy) = self.arena.player_mut(2) {
            if dummy.hp <= 0.0 || dummy.is_dead {
                dummy.respawn_at(DUMMY_RESPAWN);
            }
        }
    }
}
