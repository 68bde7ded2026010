//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clock advanced only by the tick's `dt`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or audio dependencies; effects are returned as events

pub mod collision;
pub mod player;
pub mod power;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Contact, end_run, find_contacts};
pub use power::{PowerMeter, PowerStage, SlideMode};
pub use state::{
    Anim, Cue, DespawnReason, Direction, Entity, EntityKind, EntityTag, GameEvent, GamePhase,
    GameState, Player, RunState, Swim, Track, Visual,
};
pub use tick::{Key, KeyDown, PointerEvent, TickInput, tick};
