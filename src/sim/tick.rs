//! Fixed timestep simulation tick
//!
//! Core game loop that advances the run deterministically. Per tick:
//! slide timeout, gestures, grounded recompute, movement integration,
//! collision resolution, spawning, off-screen sweep, score.

use serde::{Deserialize, Serialize};

use super::state::{Direction, EntityKind, GameEvent, GameState};
use super::{collision, player, power, score, spawner};
use crate::consts::*;

/// Keys the gesture detector cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    KeyA,
    KeyD,
    Space,
    Other,
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::ArrowLeft | Key::KeyA => Some(Direction::Left),
            Key::ArrowRight | Key::KeyD => Some(Direction::Right),
            Key::Space | Key::Other => None,
        }
    }
}

/// Discrete key-down event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDown {
    pub key: Key,
    /// OS autorepeat; ignored by the gesture detector
    pub repeat: bool,
}

impl KeyDown {
    pub fn press(key: Key) -> Self {
        Self { key, repeat: false }
    }
}

/// Touch/mouse press state change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Pressed at a screen x position; left half steers left
    Down { x: f32 },
    Up,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held direction keys
    pub left: bool,
    pub right: bool,
    /// Jump pressed this tick (edge)
    pub jump: bool,
    /// Key-downs since the last tick
    pub key_downs: Vec<KeyDown>,
    pub pointer: Option<PointerEvent>,
    /// Input-agnostic slide request (same rules as a double tap)
    pub activate: bool,
}

impl TickInput {
    /// Drop the one-shot parts, keeping held state
    pub fn clear_one_shots(&mut self) {
        self.jump = false;
        self.key_downs.clear();
        self.pointer = None;
        self.activate = false;
    }

    /// Fold a newer frame's input into this one
    pub fn merge(&mut self, newer: &TickInput) {
        self.left = newer.left;
        self.right = newer.right;
        self.jump |= newer.jump;
        self.key_downs.extend_from_slice(&newer.key_downs);
        if newer.pointer.is_some() {
            self.pointer = newer.pointer;
        }
        self.activate |= newer.activate;
    }
}

/// Advance the game state by one timestep, returning what happened
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Frozen until restart
    if state.run.ended {
        return events;
    }

    state.time_ticks += 1;
    state.now_ms += dt as f64 * 1000.0;

    power::update(state, &mut events);
    apply_discrete_input(state, input, &mut events);

    state.player.grounded = state.player.touching_ground();
    player::control(state, input.left, input.right, input.jump, &mut events);

    integrate(state, dt);

    let contacts = collision::find_contacts(state, dt);
    collision::resolve(state, &contacts, &mut events);
    if state.run.ended {
        return events;
    }

    spawner::update(state, &mut events);
    spawner::sweep(state, &mut events);
    score::update(state);

    log::trace!(
        "tick {} t={:.0}ms entities={} score={}",
        state.time_ticks,
        state.now_ms,
        state.entities.len(),
        state.run.score
    );

    state.normalize_order();
    events
}

/// Pointer presses, gesture taps and the direct activate action
fn apply_discrete_input(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    match input.pointer {
        Some(PointerEvent::Down { x }) => {
            state.player.pointer_dir = if x < GAME_WIDTH / 2.0 { -1.0 } else { 1.0 };
        }
        Some(PointerEvent::Up) => state.player.pointer_dir = 0.0,
        None => {}
    }

    for key_down in &input.key_downs {
        if key_down.repeat {
            continue;
        }
        if let Some(dir) = key_down.key.direction() {
            player::handle_tap(state, dir, events);
        }
    }

    if input.activate {
        power::try_activate(state, events);
    }
}

/// Move the player and every entity by one timestep
fn integrate(state: &mut GameState, dt: f32) {
    player::integrate(state, dt);
    player::resolve_ground(state);

    let dt_ms = dt * 1000.0;
    for entity in &mut state.entities {
        if let EntityKind::Pickup(swim) = &mut entity.kind {
            spawner::update_swim(swim, &mut entity.vel, dt_ms);
        }
        entity.pos += entity.vel * dt;
    }
}
