//! Game state and core simulation types
//!
//! `GameState` owns the match (phase, scores, drafted cards) and the
//! `Arena` the current round is fought in.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::InputLatch;
use super::player::PlayerEntity;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::{CardId, MapData, WeaponId, maps};

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Story crawl, any key skips
    Intro,
    /// Title screen
    Menu,
    /// Non-scoring practice against a dummy
    Tutorial,
    /// Both players pick a starting weapon
    WeaponSelect,
    /// Active round
    Playing,
    /// Loser of the last round drafts a card
    CardSelect,
    /// Match decided
    GameOver,
}

/// Things that happened during a tick, for audio/UI/logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    RoundStarted { round: u32, map: String },
    AttackStarted { player: u8, combo: u8 },
    Hit { attacker: u8, victim: u8, damage: f32, combo: u8 },
    Parried { attacker: u8, blocker: u8 },
    ProjectileHit { owner: u8, victim: u8, damage: f32 },
    ProjectileBlocked { owner: u8, blocker: u8 },
    HazardHit { player: u8 },
    LavaBurn { player: u8 },
    Jumped { player: u8, air: bool },
    BlackHoleSpawned { pos: Vec2 },
    PlayerDied { player: u8, pos: Vec2 },
    /// Emitted once per scored round
    RoundOver { winner: u8, loser: u8 },
    /// Double knock-out, round replays without scoring
    RoundDraw,
    MatchOver { winner: u8 },
    TutorialStep { step: u8 },
}

/// A bullet fired by the projectile modifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: u8,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub color: u32,
    /// Ticks remaining
    pub life: u32,
    pub blockable: bool,
    pub homing: bool,
}

/// Particle behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    Spark,
    Blood,
    Dust,
    Text,
    Ring,
    Slash,
    /// Cosmetic in name only: pulls nearby players
    BlackHole,
    Debris,
    Rain,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: f32,
    pub max_life: f32,
    pub color: u32,
    pub size: f32,
    pub kind: ParticleKind,
    pub rotation: f32,
    pub text: Option<String>,
}

impl Particle {
    /// 1.0 when fresh, 0.0 when expired
    pub fn life_fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Cosmetic particle budget before the quality cap kicks in
pub const MAX_PARTICLES: usize = 2000;

/// Feedback sink shared by all per-tick systems
///
/// Holds particles, screen shake, hit-stop, the event queue and the arena RNG.
#[derive(Debug, Clone)]
pub struct Feedback {
    pub particles: Vec<Particle>,
    pub shake: f32,
    /// Ticks the simulation stays frozen
    pub hit_stop: u32,
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    pub max_particles: usize,
}

impl Feedback {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            particles: Vec::new(),
            shake: 0.0,
            hit_stop: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            max_particles,
        }
    }

    /// Add a particle; cosmetic ones are dropped once the cap is reached
    pub fn push_particle(&mut self, particle: Particle) {
        if particle.kind != ParticleKind::BlackHole && self.particles.len() >= self.max_particles {
            return;
        }
        self.particles.push(particle);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn shake(&mut self, amount: f32) {
        self.shake = amount;
    }

    pub fn hit_stop(&mut self, ticks: u32) {
        self.hit_stop = ticks;
    }
}

/// Smoothed camera target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Ease toward the two fighters, or lock onto a death position
    pub fn follow(&mut self, players: &[PlayerEntity]) {
        let [p1, p2] = players else {
            return;
        };

        let mut target = (p1.pos + p2.pos) / 2.0;
        let mut zoom_dist = (p1.pos.x - p2.pos.x).abs() + 400.0;

        let death = [p1, p2]
            .into_iter()
            .find(|p| p.is_dead && p.death_pos.is_some())
            .and_then(|p| p.death_pos);
        if let Some(pos) = death {
            target = pos;
            zoom_dist = 400.0;
        }

        let target_zoom = (CANVAS_WIDTH / zoom_dist).clamp(0.6, 1.5);
        self.center += (target - self.center) * 0.1;
        self.zoom += (target_zoom - self.zoom) * 0.05;
    }
}

/// Round-over scheduled after the last kill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRoundOver {
    pub winner: u8,
    pub loser: u8,
    pub remaining: u32,
    /// Round the kill happened in; stale timers are dropped
    pub generation: u32,
}

/// Runtime state of the round being fought
#[derive(Debug, Clone)]
pub struct Arena {
    /// Round copy of the map (hazard angles advance)
    pub map: MapData,
    /// Sorted by id
    pub players: Vec<PlayerEntity>,
    pub projectiles: Vec<Projectile>,
    pub fx: Feedback,
    pub camera: Camera,
    /// Ticks since the round started
    pub round_ticks: u32,
    /// Monotonic tick clock, survives round resets
    pub clock: u64,
    /// Bumped on every reset
    pub generation: u32,
    /// A round-over has been scheduled
    pub round_ending: bool,
    pub pending_round_over: Option<PendingRoundOver>,
    next_id: u32,
}

impl Arena {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            map: maps::tutorial(),
            players: Vec::new(),
            projectiles: Vec::new(),
            fx: Feedback::new(seed, max_particles),
            camera: Camera::default(),
            round_ticks: 0,
            clock: 0,
            generation: 0,
            round_ending: false,
            pending_round_over: None,
            next_id: 1,
        }
    }

    /// Clear the round and place new fighters; RNG and clock carry over
    pub fn reset(&mut self, map: MapData, players: Vec<PlayerEntity>) {
        self.map = map;
        self.players = players;
        self.projectiles.clear();
        self.fx.particles.clear();
        self.fx.shake = 0.0;
        self.fx.hit_stop = 0;
        self.round_ticks = 0;
        self.round_ending = false;
        self.pending_round_over = None;
        self.generation = self.generation.wrapping_add(1);
        self.normalize_order();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self, id: u8) -> Option<&PlayerEntity> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: u8) -> Option<&mut PlayerEntity> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    /// Ensure players are sorted by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.players.sort_by_key(|p| p.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}

/// Tutorial checklist for player 1 (move, then jump, then attack)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialProgress {
    pub moved: bool,
    pub jumped: bool,
    pub attacked: bool,
}

impl TutorialProgress {
    /// 0..=3, 3 means complete
    pub fn step(&self) -> u8 {
        u8::from(self.moved) + u8::from(self.jumped) + u8::from(self.attacked)
    }

    pub fn is_complete(&self) -> bool {
        self.attacked
    }
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub phase: GamePhase,
    /// 1-based round number
    pub round: u32,
    pub scores: [u32; 2],
    pub winner_id: Option<u8>,
    pub last_loser_id: Option<u8>,
    /// Starting weapons for player 1 and 2
    pub loadout: [WeaponId; 2],
    /// Cards drafted so far, in pick order
    pub cards: [Vec<CardId>; 2],
    /// Cards offered to the last loser
    pub card_offer: Vec<CardId>,
    pub intro_ticks: u32,
    pub tutorial: TutorialProgress,
    pub arena: Arena,
    /// Edge-trigger bookkeeping per player slot
    pub latches: [InputLatch; 2],
    /// Versus maps to draw from
    pub map_pool: Vec<MapData>,
}

/// Intro length before it falls through to the menu
pub const INTRO_DURATION_TICKS: u32 = 700;
/// Number of intro rain drops
pub const RAIN_DROPS: usize = 100;
/// Cards offered to the loser
pub const CARD_OFFER_SIZE: usize = 3;

impl GameState {
    /// Create a new game with the given seed and default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        let mut state = Self {
            seed,
            arena: Arena::new(seed, settings.max_particles()),
            settings,
            phase: GamePhase::Intro,
            round: 1,
            scores: [0, 0],
            winner_id: None,
            last_loser_id: None,
            loadout: [WeaponId::Katana, WeaponId::Katana],
            cards: [Vec::new(), Vec::new()],
            card_offer: Vec::new(),
            intro_ticks: 0,
            tutorial: TutorialProgress::default(),
            latches: [InputLatch::default(); 2],
            map_pool: maps::catalog(),
        };
        super::particles::spawn_rain(&mut state.arena.fx, RAIN_DROPS);
        state
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.arena.fx.events)
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        let shake = if self.settings.effective_screen_shake() {
            self.arena.fx.shake
        } else {
            0.0
        };
        Snapshot {
            phase: self.phase,
            round: self.round,
            scores: self.scores,
            winner_id: self.winner_id,
            map: &self.arena.map,
            players: &self.arena.players,
            projectiles: &self.arena.projectiles,
            particles: &self.arena.fx.particles,
            camera: self.arena.camera,
            shake,
            hit_stop: self.arena.fx.hit_stop,
            tutorial: self.tutorial,
            card_offer: &self.card_offer,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub round: u32,
    pub scores: [u32; 2],
    pub winner_id: Option<u8>,
    pub map: &'a MapData,
    pub players: &'a [PlayerEntity],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
    pub camera: Camera,
    pub shake: f32,
    pub hit_stop: u32,
    pub tutorial: TutorialProgress,
    pub card_offer: &'a [CardId],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::WeaponId;

    fn fighter(id: u8, x: f32) -> PlayerEntity {
        PlayerEntity::new(id, Vec2::new(x, 600.0), &WeaponId::Katana.stats())
    }

    #[test]
    fn test_new_game_starts_in_intro_with_rain() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.round, 1);
        assert_eq!(state.arena.fx.particles.len(), RAIN_DROPS);
        assert!(
            state
                .arena
                .fx
                .particles
                .iter()
                .all(|p| p.kind == ParticleKind::Rain)
        );
    }

    #[test]
    fn test_particle_cap_spares_black_holes() {
        let mut fx = Feedback::new(1, 1);
        let spark = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 10.0,
            max_life: 10.0,
            color: 0xffffff,
            size: 2.0,
            kind: ParticleKind::Spark,
            rotation: 0.0,
            text: None,
        };
        fx.push_particle(spark.clone());
        fx.push_particle(spark.clone());
        assert_eq!(fx.particles.len(), 1);
        fx.push_particle(Particle {
            kind: ParticleKind::BlackHole,
            ..spark
        });
        assert_eq!(fx.particles.len(), 2);
    }

    #[test]
    fn test_camera_eases_toward_midpoint() {
        let mut camera = Camera::default();
        let players = vec![fighter(1, 200.0), fighter(2, 1000.0)];
        camera.follow(&players);
        assert!((camera.center.x - 60.0).abs() < 0.001);
        assert!((camera.center.y - 60.0).abs() < 0.001);
        // 1200 / (800 + 400) = 1.0, already there
        assert!((camera.zoom - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_camera_locks_on_death() {
        let mut camera = Camera::default();
        let mut players = vec![fighter(1, 200.0), fighter(2, 1000.0)];
        players[1].mark_dead();
        camera.follow(&players);
        assert!((camera.center.x - 100.0).abs() < 0.001);
        // Zoom heads toward 1.5
        assert!(camera.zoom > 1.0);
    }

    #[test]
    fn test_reset_bumps_generation_and_clears() {
        let mut arena = Arena::new(3, 100);
        arena.fx.shake = 12.0;
        arena.round_ticks = 99;
        arena.clock = 500;
        arena.reset(maps::tutorial(), vec![fighter(2, 600.0), fighter(1, 200.0)]);
        assert_eq!(arena.generation, 1);
        assert_eq!(arena.round_ticks, 0);
        assert_eq!(arena.clock, 500);
        assert_eq!(arena.fx.shake, 0.0);
        assert_eq!(arena.players[0].id, 1);
    }

    #[test]
    fn test_tutorial_steps() {
        let mut progress = TutorialProgress::default();
        assert_eq!(progress.step(), 0);
        progress.moved = true;
        progress.jumped = true;
        assert_eq!(progress.step(), 2);
        assert!(!progress.is_complete());
        progress.attacked = true;
        assert!(progress.is_complete());
    }
}
