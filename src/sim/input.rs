//! Per-tick input intent
//!
//! The presentation layer maps its own key bindings onto `PlayerInput`.
//! Edge-triggered actions go through `InputLatch` so a held key fires once.

use serde::{Deserialize, Serialize};

/// Actions currently held by one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
    pub block: bool,
}

impl PlayerInput {
    pub fn any(&self) -> bool {
        self.left || self.right || self.jump || self.attack || self.block
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Player 1 and player 2
    pub players: [PlayerInput; 2],
    /// Any key pressed this tick (skips the intro)
    pub any_key: bool,
    /// Demo mode per slot: the bot drives that player
    pub autopilot: [bool; 2],
}

impl TickInput {
    /// Input for a player id (1 or 2)
    pub fn for_player(&self, id: u8) -> PlayerInput {
        match id {
            1 => self.players[0],
            2 => self.players[1],
            _ => PlayerInput::default(),
        }
    }
}

/// Consumed-press bookkeeping for one player slot
///
/// A lock engages when the action actually fires and releases once the
/// button is let go, so a held button never repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputLatch {
    jump_locked: bool,
    attack_locked: bool,
}

impl InputLatch {
    /// Jump may fire this tick
    pub fn jump_ready(&self, input: &PlayerInput) -> bool {
        input.jump && !self.jump_locked
    }

    /// Attack may fire this tick
    pub fn attack_ready(&self, input: &PlayerInput) -> bool {
        input.attack && !self.attack_locked
    }

    pub fn consume_jump(&mut self) {
        self.jump_locked = true;
    }

    pub fn consume_attack(&mut self) {
        self.attack_locked = true;
    }

    /// Release locks for buttons no longer held
    pub fn release(&mut self, input: &PlayerInput) {
        if !input.jump {
            self.jump_locked = false;
        }
        if !input.attack {
            self.attack_locked = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_jump_fires_once() {
        let mut latch = InputLatch::default();
        let held = PlayerInput {
            jump: true,
            ..Default::default()
        };
        assert!(latch.jump_ready(&held));
        latch.consume_jump();
        latch.release(&held);
        assert!(!latch.jump_ready(&held));

        latch.release(&PlayerInput::default());
        assert!(latch.jump_ready(&held));
    }

    #[test]
    fn test_unconsumed_attack_stays_ready() {
        // Holding attack through a cooldown fires as soon as the swing is allowed
        let mut latch = InputLatch::default();
        let held = PlayerInput {
            attack: true,
            ..Default::default()
        };
        latch.release(&held);
        assert!(latch.attack_ready(&held));
    }

    #[test]
    fn test_for_player_maps_slots() {
        let input = TickInput {
            players: [
                PlayerInput {
                    left: true,
                    ..Default::default()
                },
                PlayerInput {
                    right: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert!(input.for_player(1).left);
        assert!(input.for_player(2).right);
        assert!(!input.for_player(3).any());
    }
}
