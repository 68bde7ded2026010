//! Player controller
//!
//! Resolves held input into horizontal velocity, handles jumping, the
//! double-tap slide gesture and the periodic footstep/slide sounds.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::power;
use super::state::{Anim, Cue, Direction, GameEvent, GameState};
use crate::consts::*;

/// Double-tap detector: remembers the last key-down per direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DoubleTap {
    last_ms: [Option<f64>; 2],
}

impl DoubleTap {
    /// Register a key-down. Returns true when it completes a double tap,
    /// which consumes the stored timestamp.
    pub fn register(&mut self, dir: Direction, now_ms: f64) -> bool {
        let slot = &mut self.last_ms[dir.index()];
        match *slot {
            Some(prev) if now_ms - prev <= DOUBLE_TAP_WINDOW_MS => {
                *slot = None;
                true
            }
            _ => {
                *slot = Some(now_ms);
                false
            }
        }
    }

    pub fn last(&self, dir: Direction) -> Option<f64> {
        self.last_ms[dir.index()]
    }
}

/// Cooldowns for the movement sounds (`None` = ready to play)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepSfx {
    next_step_ms: Option<f64>,
    next_slide_ms: Option<f64>,
}

impl StepSfx {
    pub fn reset_slide(&mut self) {
        self.next_slide_ms = None;
    }

    pub fn reset(&mut self) {
        self.next_step_ms = None;
        self.next_slide_ms = None;
    }
}

/// A discrete directional key-down arrived
pub fn handle_tap(state: &mut GameState, dir: Direction, events: &mut Vec<GameEvent>) {
    let now = state.now_ms;
    if state.player.taps.register(dir, now) {
        log::debug!("Double tap {:?} at {:.0}ms", dir, now);
        power::try_activate(state, events);
    }
}

/// Net horizontal direction: held keys win over the pointer, left over right
pub fn resolve_direction(held_left: bool, held_right: bool, pointer_dir: f32) -> f32 {
    if held_left {
        -1.0
    } else if held_right {
        1.0
    } else {
        pointer_dir
    }
}

/// Apply input to the player's velocity. Expects `grounded` to be fresh.
pub fn control(
    state: &mut GameState,
    held_left: bool,
    held_right: bool,
    jump: bool,
    events: &mut Vec<GameEvent>,
) {
    let player = &mut state.player;
    let direction = resolve_direction(held_left, held_right, player.pointer_dir);

    if player.grounded && jump {
        player.vel.y = player.jump_velocity;
        events.push(GameEvent::Cue(Cue::Jump));
        events.push(GameEvent::Jumped);
    }

    player.vel.x = direction * player.move_speed;

    let grounded = player.grounded;
    update_step_sfx(state, grounded, events);

    let player = &mut state.player;
    if !grounded {
        player.anim = Anim::Jump;
    } else if direction == 0.0 {
        player.anim = Anim::Idle;
    } else {
        player.facing = if direction < 0.0 {
            Direction::Left
        } else {
            Direction::Right
        };
        player.anim = Anim::Walk;
    }
}

/// Footsteps, or slide whooshes during slide mode, while grounded and moving
fn update_step_sfx(state: &mut GameState, grounded: bool, events: &mut Vec<GameEvent>) {
    let now = state.now_ms;
    let moving = state.player.vel.x.abs() > MOVING_EPSILON;
    let sliding = state.slide.active;
    let sfx = &mut state.player.step_sfx;

    if !grounded || !moving {
        sfx.reset();
        return;
    }

    let (slot, cue, min_ms, max_ms) = if sliding {
        sfx.next_step_ms = None;
        (&mut sfx.next_slide_ms, Cue::Slide, SLIDE_SFX_MIN_MS, SLIDE_SFX_MAX_MS)
    } else {
        sfx.next_slide_ms = None;
        (&mut sfx.next_step_ms, Cue::Steps, STEP_SFX_MIN_MS, STEP_SFX_MAX_MS)
    };

    if slot.is_none_or(|next| now >= next) {
        events.push(GameEvent::Cue(cue));
        let wait = state.rng.random_range(min_ms..=max_ms);
        *slot = Some(now + wait as f64);
    }
}

/// Integrate gravity and velocity, then clamp to the horizontal play area
pub fn integrate(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    player.vel.y += PLAYER_GRAVITY * dt;
    player.pos += player.vel * dt;

    let half_w = player.half_size.x;
    player.pos.x = player.pos.x.clamp(half_w, GAME_WIDTH - half_w);
}

/// Rest the player on the ground plane
pub fn resolve_ground(state: &mut GameState) {
    let player = &mut state.player;
    if player.bottom() >= GROUND_TOP_Y && player.vel.y >= 0.0 {
        player.pos.y = GROUND_TOP_Y - player.half_size.y;
        player.vel.y = 0.0;
    }
}

/// Stop the player dead (game over)
pub fn freeze(state: &mut GameState) {
    state.player.vel = Vec2::ZERO;
    state.player.pointer_dir = 0.0;
}
