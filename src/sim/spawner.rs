//! Spawning, fish swim pulses and the off-screen sweep
//!
//! Hazards and coins fall from above on a cadence that tightens with time;
//! fish swim in from either edge on an independent randomized cadence.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{DespawnReason, Entity, EntityKind, EntityTag, GameEvent, GameState, Swim};
use crate::consts::*;

/// Hazard/coin spawn interval for the given elapsed time (ms, floored)
pub fn spawn_interval_ms(elapsed_secs: f64) -> f64 {
    (BASE_SPAWN_INTERVAL_MS - elapsed_secs * SPAWN_RAMP_MS_PER_SEC).max(MIN_SPAWN_INTERVAL_MS)
}

/// Hazard fall speed for the given elapsed time. Deliberately uncapped.
pub fn fall_speed(elapsed_secs: f64) -> f32 {
    BASE_FALL_SPEED + elapsed_secs as f32 * FALL_SPEED_INCREASE
}

/// Roll the wait before the next fish spawn
pub fn roll_fish_interval(rng: &mut Pcg32) -> f64 {
    let variance = rng.random_range(-FISH_SPAWN_VARIANCE_MS..=FISH_SPAWN_VARIANCE_MS);
    FISH_SPAWN_INTERVAL_MS + variance as f64
}

/// Decide this tick's spawns
pub fn update(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let elapsed = state.elapsed_secs();
    let now = state.now_ms;

    if now - state.run.last_spawn_ms >= spawn_interval_ms(elapsed) {
        state.run.last_spawn_ms = now;
        spawn_falling(state, elapsed, events);
    }

    if !state.slide.active && now - state.run.last_fish_spawn_ms >= state.run.fish_interval_ms {
        state.run.last_fish_spawn_ms = now;
        state.run.fish_interval_ms = roll_fish_interval(&mut state.rng);
        spawn_fish(state, events);
    }
}

/// Spawn a coin or a hazard just above the top edge
fn spawn_falling(state: &mut GameState, elapsed_secs: f64, events: &mut Vec<GameEvent>) {
    let speed = fall_speed(elapsed_secs);
    let is_coin = state.rng.random_bool(COIN_CHANCE);
    let x = state
        .rng
        .random_range(SPAWN_INSET_X..=GAME_WIDTH as i32 - SPAWN_INSET_X) as f32;

    let (kind, vel, half_size) = if is_coin {
        (
            EntityKind::Coin,
            Vec2::new(0.0, speed * COIN_FALL_FACTOR),
            Vec2::splat(COIN_RADIUS),
        )
    } else {
        let skin = state.rng.random_range(0..HAZARD_SKINS);
        (
            EntityKind::Hazard { skin },
            Vec2::new(0.0, speed),
            Vec2::splat(HAZARD_HALF_SIZE),
        )
    };

    let id = state.next_entity_id();
    let tag = kind.tag();
    state.entities.push(Entity {
        id,
        kind,
        pos: Vec2::new(x, SPAWN_Y),
        vel,
        half_size,
    });
    events.push(GameEvent::Spawned { id, tag });
    log::trace!("Spawned {:?} #{} at x={} falling {:.0}px/s", tag, id, x, vel.y);
}

/// Spawn a fish at one edge, swimming toward the other
fn spawn_fish(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let x = if direction > 0.0 {
        -FISH_SPAWN_MARGIN
    } else {
        GAME_WIDTH + FISH_SPAWN_MARGIN
    };
    let height = state.rng.random_range(FISH_MIN_HEIGHT..=FISH_MAX_HEIGHT) as f32;
    let speed = state.rng.random_range(FISH_MIN_SPEED..=FISH_MAX_SPEED) as f32 * direction;

    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        kind: EntityKind::Pickup(Swim::new(speed)),
        pos: Vec2::new(x, GROUND_TOP_Y - height),
        vel: Vec2::new(speed, 0.0),
        half_size: Vec2::new(FISH_HALF_WIDTH, FISH_HALF_HEIGHT),
    });
    events.push(GameEvent::Spawned {
        id,
        tag: EntityTag::Pickup,
    });
    log::debug!("Fish #{} from x={} at {:.0}px/s", id, x, speed);
}

/// Advance a fish's swim cycle and its speed pulse
pub fn update_swim(swim: &mut Swim, vel: &mut Vec2, dt_ms: f32) {
    // Ease a running pulse back toward cruising speed
    if let Some(elapsed) = swim.pulse_ms.as_mut() {
        *elapsed += dt_ms;
        if *elapsed >= FISH_PULSE_DURATION_MS {
            vel.x = swim.base_speed;
            swim.pulse_ms = None;
        } else {
            let t = *elapsed / FISH_PULSE_DURATION_MS;
            let eased = (t * std::f32::consts::FRAC_PI_2).sin();
            let peak = swim.base_speed * FISH_PULSE_MULTIPLIER;
            vel.x = peak + (swim.base_speed - peak) * eased;
        }
    }

    swim.cycle_ms += dt_ms;
    let frame = (swim.cycle_ms / FISH_SWIM_FRAME_MS) as u32 % FISH_SWIM_FRAMES;
    if frame == FISH_PULSE_FRAME && swim.last_frame != FISH_PULSE_FRAME {
        trigger_pulse(swim, vel);
    }
    swim.last_frame = frame;
}

/// Kick a fish to pulse speed. No-op while a pulse is running.
pub fn trigger_pulse(swim: &mut Swim, vel: &mut Vec2) {
    if swim.pulse_active() {
        return;
    }
    vel.x = swim.base_speed * FISH_PULSE_MULTIPLIER;
    swim.pulse_ms = Some(0.0);
}

/// Whether an entity has left the play area for good
pub fn is_offscreen(entity: &Entity) -> bool {
    match entity.kind {
        EntityKind::Hazard { .. } | EntityKind::Coin => {
            entity.pos.y > GAME_HEIGHT + OFFSCREEN_MARGIN_Y
        }
        EntityKind::Pickup(_) => {
            entity.pos.x < -FISH_SPAWN_MARGIN * 2.0
                || entity.pos.x > GAME_WIDTH + FISH_SPAWN_MARGIN * 2.0
        }
    }
}

/// Destroy everything that left the play area
pub fn sweep(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.entities.retain(|entity| {
        if is_offscreen(entity) {
            events.push(GameEvent::Despawned {
                id: entity.id,
                reason: DespawnReason::Offscreen,
            });
            false
        } else {
            true
        }
    });
}
