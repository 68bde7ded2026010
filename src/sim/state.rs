//! Game state and core simulation types
//!
//! Everything a run owns lives in [`GameState`]; restarting a run means
//! building a fresh one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::{DoubleTap, StepSfx};
use super::power::{PowerMeter, SlideMode};
use crate::consts::*;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Spawning, movement and collisions all run
    Active,
    /// Simulation frozen; only restart or exit are accepted
    Ended,
}

/// Horizontal direction of a key, pointer half or facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1.0 for left, 1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
        }
    }
}

/// Player animation state (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anim {
    #[default]
    Idle,
    Walk,
    Jump,
}

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Jump,
    Steps,
    Slide,
    Pickup,
    Dead,
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    Normal,
    Slide,
}

/// Continuous visual feedback toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    /// Meter icon pulses while the meter is full
    MeterPulse(bool),
    /// Player tint during slide mode
    SlideTint(bool),
    /// Particle trail behind the player during slide mode
    SlideTrail(bool),
}

/// Why an entity left the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DespawnReason {
    Collected,
    HitGround,
    Offscreen,
}

/// Kind tag without per-kind data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityTag {
    Hazard,
    Coin,
    Pickup,
}

/// Gameplay effects produced by a tick, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Cue(Cue),
    Track(Track),
    Visual(Visual),
    Jumped,
    Spawned { id: u32, tag: EntityTag },
    Despawned { id: u32, reason: DespawnReason },
    CoinCollected { total: u32 },
    PowerChanged { count: u8 },
    SlideStarted { until_ms: f64 },
    SlideEnded { forced: bool },
    RunEnded { final_score: u64 },
}

/// Swim state carried by a fish pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Swim {
    /// Signed cruising speed (direction included)
    pub base_speed: f32,
    /// Time into the looping swim animation
    pub cycle_ms: f32,
    /// Frame shown last tick, for edge detection
    pub last_frame: u32,
    /// Time into the current pulse, `None` when no pulse is running
    pub pulse_ms: Option<f32>,
}

impl Swim {
    pub fn new(base_speed: f32) -> Self {
        Self {
            base_speed,
            cycle_ms: 0.0,
            last_frame: 0,
            pulse_ms: None,
        }
    }

    #[inline]
    pub fn pulse_active(&self) -> bool {
        self.pulse_ms.is_some()
    }
}

/// Entity kinds with their kind-specific data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Falling obstacle; `skin` picks one of the block sprites
    Hazard { skin: u8 },
    Coin,
    Pickup(Swim),
}

impl EntityKind {
    pub fn tag(&self) -> EntityTag {
        match self {
            EntityKind::Hazard { .. } => EntityTag::Hazard,
            EntityKind::Coin => EntityTag::Coin,
            EntityKind::Pickup(_) => EntityTag::Pickup,
        }
    }
}

/// A kinematic entity in the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Center of the hitbox
    pub pos: Vec2,
    pub vel: Vec2,
    /// Half extents of the hitbox (coins use `x` as a radius)
    pub half_size: Vec2,
}

impl Entity {
    pub fn tag(&self) -> EntityTag {
        self.kind.tag()
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half_size.y
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center of the hitbox
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_size: Vec2,
    /// Vertical contact with the ground, recomputed each tick
    pub grounded: bool,
    /// Current horizontal speed (scaled during slide mode)
    pub move_speed: f32,
    /// Current jump impulse (scaled during slide mode)
    pub jump_velocity: f32,
    pub facing: Direction,
    pub anim: Anim,
    /// Held pointer direction (touch play), 0 when released
    pub pointer_dir: f32,
    pub taps: DoubleTap,
    pub step_sfx: StepSfx,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(GAME_WIDTH / 2.0, GROUND_TOP_Y - PLAYER_DROP_HEIGHT),
            vel: Vec2::ZERO,
            half_size: Vec2::new(PLAYER_HALF_WIDTH, PLAYER_HALF_HEIGHT),
            grounded: false,
            move_speed: PLAYER_SPEED,
            jump_velocity: JUMP_VELOCITY,
            facing: Direction::Right,
            anim: Anim::Idle,
            pointer_dir: 0.0,
            taps: DoubleTap::default(),
            step_sfx: StepSfx::default(),
        }
    }
}

impl Player {
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half_size.y
    }

    /// Whether the hitbox rests on the ground plane
    pub fn touching_ground(&self) -> bool {
        self.bottom() >= GROUND_TOP_Y - 0.5
    }
}

/// Counters, timestamps and flags for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Elapsed-time origin
    pub start_ms: f64,
    /// Last hazard/coin spawn
    pub last_spawn_ms: f64,
    /// Last fish spawn
    pub last_fish_spawn_ms: f64,
    /// Rolled wait before the next fish spawn
    pub fish_interval_ms: f64,
    pub coins: u32,
    /// Last computed score
    pub score: u64,
    /// Terminal flag; never cleared within a run
    pub ended: bool,
}

impl RunState {
    pub fn new(start_ms: f64, fish_interval_ms: f64) -> Self {
        Self {
            start_ms,
            last_spawn_ms: start_ms,
            last_fish_spawn_ms: start_ms,
            fish_interval_ms,
            coins: 0,
            score: 0,
            ended: false,
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock
    pub now_ms: f64,
    pub run: RunState,
    pub player: Player,
    pub power: PowerMeter,
    pub slide: SlideMode,
    /// Hazards, coins and fish (sorted by id)
    pub entities: Vec<Entity>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let fish_interval_ms = super::spawner::roll_fish_interval(&mut rng);
        Self {
            seed,
            rng,
            time_ticks: 0,
            now_ms: 0.0,
            run: RunState::new(0.0, fish_interval_ms),
            player: Player::default(),
            power: PowerMeter::default(),
            slide: SlideMode::default(),
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> GamePhase {
        if self.run.ended {
            GamePhase::Ended
        } else {
            GamePhase::Active
        }
    }

    /// Seconds since the run started (never negative)
    pub fn elapsed_secs(&self) -> f64 {
        crate::ms_to_secs(self.now_ms - self.run.start_ms)
    }

    pub fn count(&self, tag: EntityTag) -> usize {
        self.entities.iter().filter(|e| e.tag() == tag).count()
    }

    /// Remove an entity by id, reporting whether it was still present
    pub fn despawn(&mut self, id: u32, reason: DespawnReason, events: &mut Vec<GameEvent>) -> bool {
        match self.entities.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entities.remove(index);
                events.push(GameEvent::Despawned { id, reason });
                true
            }
            None => false,
        }
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_is_active_and_empty() {
        let state = GameState::new(7);
        assert_eq!(state.phase(), GamePhase::Active);
        assert!(state.entities.is_empty());
        assert_eq!(state.run.coins, 0);
        assert_eq!(state.power.count(), 0);
        assert!(!state.slide.active);
        assert_eq!(state.player.move_speed, PLAYER_SPEED);
        assert_eq!(state.player.jump_velocity, JUMP_VELOCITY);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_despawn_is_idempotent() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            kind: EntityKind::Coin,
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            half_size: Vec2::splat(COIN_RADIUS),
        });

        let mut events = Vec::new();
        assert!(state.despawn(id, DespawnReason::Collected, &mut events));
        assert!(!state.despawn(id, DespawnReason::Collected, &mut events));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(42);
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed, 42);
        assert_eq!(restored.run.fish_interval_ms, state.run.fish_interval_ms);
    }
}
