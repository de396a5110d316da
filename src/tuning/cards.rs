//! Card catalog
//!
//! Each card is a pure mutation of a freshly spawned fighter. Cards stack
//! across rounds and are reapplied in pick order every round.

use serde::{Deserialize, Serialize};

use crate::sim::player::{Modifiers, PlayerEntity};

const COLOR_COMMON: u32 = 0xe5e7eb;
const COLOR_RARE: u32 = 0x22d3ee;
const COLOR_LEGENDARY: u32 = 0xfacc15;

/// Card rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

impl Rarity {
    pub fn color(self) -> u32 {
        match self {
            Rarity::Common => COLOR_COMMON,
            Rarity::Rare => COLOR_RARE,
            Rarity::Legendary => COLOR_LEGENDARY,
        }
    }
}

/// Catalog identifier for a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardId {
    BlackHoleBlade,
    RocketBoots,
    ShotgunBlast,
    GlassTitan,
    IceAspect,
    PhaseShield,
    HomingMissiles,
    VampireLord,
    CurseAura,
    TripleJump,
}

impl CardId {
    pub const ALL: [CardId; 10] = [
        CardId::BlackHoleBlade,
        CardId::RocketBoots,
        CardId::ShotgunBlast,
        CardId::GlassTitan,
        CardId::IceAspect,
        CardId::PhaseShield,
        CardId::HomingMissiles,
        CardId::VampireLord,
        CardId::CurseAura,
        CardId::TripleJump,
    ];

    /// Catalog entry for this card
    pub fn card(self) -> &'static Card {
        // ALL and CARDS share ordering
        &CARDS[self as usize]
    }

    /// Apply this card to a player
    pub fn apply(self, player: &mut PlayerEntity) {
        (self.card().apply)(player);
    }
}

/// An upgrade drafted by the loser of a round
#[derive(Debug)]
pub struct Card {
    pub id: CardId,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub apply: fn(&mut PlayerEntity),
}

impl Card {
    pub fn color(&self) -> u32 {
        self.rarity.color()
    }
}

fn apply_black_hole(p: &mut PlayerEntity) {
    p.modifiers |= Modifiers::BLACK_HOLE;
}

fn apply_rocket_boots(p: &mut PlayerEntity) {
    p.modifiers |= Modifiers::ROCKET_JUMP;
    p.jump_force *= 1.2;
}

fn apply_shotgun(p: &mut PlayerEntity) {
    p.modifiers |= Modifiers::PROJECTILE_ATTACK | Modifiers::SHOTGUN;
}

fn apply_glass_titan(p: &mut PlayerEntity) {
    p.weapon.damage *= 5.0;
    p.weapon.range *= 1.5;
    p.half_extents *= 1.5;
    p.max_hp = (p.max_hp * 0.1).floor();
    p.hp = p.hp.min(p.max_hp);
}

fn apply_freeze(p: &mut PlayerEntity) {
    p.modifiers |= Modifiers::FREEZE;
}

fn apply_phase_block(p: &mut PlayerEntity) {
    p.modifiers |= Modifiers::PHASE_BLOCK;
}

fn apply_homing(p: &mut PlayerEntity) {
    p.modifiers |= Modifiers::PROJECTILE_ATTACK | Modifiers::HOMING;
}

fn apply_vampire(p: &mut PlayerEntity) {
    p.modifiers |= Modifiers::VAMPIRE;
}

fn apply_aura(p: &mut PlayerEntity) {
    p.modifiers |= Modifiers::AURA;
}

fn apply_triple_jump(p: &mut PlayerEntity) {
    p.max_jumps += 1;
    p.jumps_left = (p.jumps_left + 1).min(p.max_jumps);
}

static CARDS: [Card; 10] = [
    Card {
        id: CardId::BlackHoleBlade,
        name: "Singularity Edge",
        description: "Attacks have a 25% chance to spawn a Black Hole that sucks enemies in.",
        rarity: Rarity::Legendary,
        apply: apply_black_hole,
    },
    Card {
        id: CardId::RocketBoots,
        name: "Rocket Boots",
        description: "Jumping creates an explosion at your feet. Deals damage and jumps higher.",
        rarity: Rarity::Rare,
        apply: apply_rocket_boots,
    },
    Card {
        id: CardId::ShotgunBlast,
        name: "Buckshot",
        description: "Attacks fire 5 inaccurate projectiles instead of 1.",
        rarity: Rarity::Rare,
        apply: apply_shotgun,
    },
    Card {
        id: CardId::GlassTitan,
        name: "Glass Titan",
        description: "+400% Damage, +100% Size, but you have 10% HP.",
        rarity: Rarity::Legendary,
        apply: apply_glass_titan,
    },
    Card {
        id: CardId::IceAspect,
        name: "Permafrost",
        description: "Attacks freeze enemies, slowing them by 60% for 2s.",
        rarity: Rarity::Rare,
        apply: apply_freeze,
    },
    Card {
        id: CardId::PhaseShield,
        name: "Phase Shift",
        description: "Parrying teleports you through the attacker and resets your attack.",
        rarity: Rarity::Rare,
        apply: apply_phase_block,
    },
    Card {
        id: CardId::HomingMissiles,
        name: "Smart Bullets",
        description: "Your projectiles chase the enemy.",
        rarity: Rarity::Legendary,
        apply: apply_homing,
    },
    Card {
        id: CardId::VampireLord,
        name: "Blood Lord",
        description: "Lifesteal 50%. HP drains slowly over time.",
        rarity: Rarity::Legendary,
        apply: apply_vampire,
    },
    Card {
        id: CardId::CurseAura,
        name: "Thorns Aura",
        description: "Enemies take damage when they are near you.",
        rarity: Rarity::Common,
        apply: apply_aura,
    },
    Card {
        id: CardId::TripleJump,
        name: "Aerial Ace",
        description: "+1 Jump.",
        rarity: Rarity::Common,
        apply: apply_triple_jump,
    },
];

/// All cards in catalog order
pub fn catalog() -> &'static [Card] {
    &CARDS
}
