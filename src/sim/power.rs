//! Power meter and slide mode
//!
//! Fish fill the meter; a full meter plus a double-tap spends it on a
//! timed slide. Stages run `Idle -> Ready -> Active -> Idle(0)`.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, Track, Visual};
use crate::consts::*;

/// Accumulated fish, clamped to [0, MAX_POWER]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerMeter {
    count: u8,
}

impl PowerMeter {
    #[inline]
    pub fn count(&self) -> u8 {
        self.count
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count >= MAX_POWER
    }

    /// Fill fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        let progress = crate::clamp01(self.count as f32 / MAX_POWER as f32);
        debug_assert!((0.0..=1.0).contains(&progress));
        progress
    }

    /// Set the count, clamping into range. Returns true if it changed.
    pub fn set(&mut self, count: u8) -> bool {
        let clamped = count.min(MAX_POWER);
        let changed = clamped != self.count;
        self.count = clamped;
        debug_assert!(self.count <= MAX_POWER);
        changed
    }
}

/// Timed slide period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideMode {
    pub active: bool,
    /// Absolute clock time at which the slide ends
    pub end_ms: f64,
}

/// Derived stage of the meter/slide machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerStage {
    Idle { count: u8 },
    Ready,
    Active { end_ms: f64 },
}

pub fn stage(state: &GameState) -> PowerStage {
    if state.slide.active {
        PowerStage::Active {
            end_ms: state.slide.end_ms,
        }
    } else if state.power.is_full() {
        PowerStage::Ready
    } else {
        PowerStage::Idle {
            count: state.power.count(),
        }
    }
}

/// Update the meter, toggling the full-meter pulse on the Ready edge
fn set_power(state: &mut GameState, count: u8, events: &mut Vec<GameEvent>) {
    let was_full = state.power.is_full();
    if !state.power.set(count) {
        return;
    }
    events.push(GameEvent::PowerChanged {
        count: state.power.count(),
    });
    let full = state.power.is_full();
    if full != was_full {
        events.push(GameEvent::Visual(Visual::MeterPulse(full)));
    }
}

/// A fish was collected. The meter stays at 0 while a slide runs.
pub fn add_power(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.slide.active {
        return;
    }
    let next = state.power.count().saturating_add(1);
    set_power(state, next, events);
    if state.power.is_full() {
        log::debug!("Power meter full");
    }
}

/// Spend a full meter on slide mode. No-op unless Ready.
pub fn try_activate(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if state.slide.active || !state.power.is_full() {
        return false;
    }
    activate(state, events);
    true
}

fn activate(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let end_ms = state.now_ms + SLIDE_DURATION_MS;
    state.slide = SlideMode {
        active: true,
        end_ms,
    };
    state.player.move_speed = PLAYER_SPEED * SLIDE_SPEED_MULTIPLIER;
    state.player.jump_velocity = JUMP_VELOCITY * SLIDE_JUMP_MULTIPLIER;
    set_power(state, 0, events);

    events.push(GameEvent::SlideStarted { until_ms: end_ms });
    events.push(GameEvent::Visual(Visual::SlideTint(true)));
    events.push(GameEvent::Visual(Visual::SlideTrail(true)));
    events.push(GameEvent::Track(Track::Slide));
    log::info!("Slide mode on until {:.0}ms", end_ms);
}

/// End the slide once its time is up
pub fn update(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.slide.active && state.now_ms >= state.slide.end_ms {
        deactivate(state, false, events);
        events.push(GameEvent::Track(Track::Normal));
        log::info!("Slide mode off at {:.0}ms", state.now_ms);
    }
}

/// Game over: drop the slide immediately, leaving the track alone
pub fn force_deactivate(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.slide.active {
        deactivate(state, true, events);
    }
}

fn deactivate(state: &mut GameState, forced: bool, events: &mut Vec<GameEvent>) {
    state.slide.active = false;
    state.player.move_speed = PLAYER_SPEED;
    state.player.jump_velocity = JUMP_VELOCITY;
    state.player.step_sfx.reset_slide();

    events.push(GameEvent::SlideEnded { forced });
    events.push(GameEvent::Visual(Visual::SlideTint(false)));
    events.push(GameEvent::Visual(Visual::SlideTrail(false)));
}
