//! Fish Dash - An endless runner/dodger arcade loop
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, power meter, score)
//! - `session`: Run lifecycle host (fixed timestep, restart/exit, audio forwarding)
//! - `audio`: Fire-and-forget cue and background track boundary
//! - `hud`: Snapshot of gameplay values for the presentation layer
//! - `settings`: Audio preferences

pub mod audio;
pub mod hud;
pub mod session;
pub mod settings;
pub mod sim;

pub use hud::{HudSnapshot, RenderFrame, build_render_frame};
pub use session::{Command, Session, Transition};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area (logical pixels, y grows downward)
    pub const GAME_WIDTH: f32 = 480.0;
    pub const GAME_HEIGHT: f32 = 800.0;
    /// Top surface of the ground plane
    pub const GROUND_TOP_Y: f32 = 694.0;

    /// Player hitbox and movement
    pub const PLAYER_HALF_WIDTH: f32 = 24.0;
    pub const PLAYER_HALF_HEIGHT: f32 = 36.0;
    pub const PLAYER_SPEED: f32 = 360.0;
    /// Upward impulse (negative = up)
    pub const JUMP_VELOCITY: f32 = -520.0;
    pub const PLAYER_GRAVITY: f32 = 900.0;
    /// Player spawns this far above the ground and drops in
    pub const PLAYER_DROP_HEIGHT: f32 = 80.0;
    /// Horizontal speed below which the player counts as standing still
    pub const MOVING_EPSILON: f32 = 0.1;

    /// Hazard/coin cadence (ms) and difficulty ramp
    pub const BASE_SPAWN_INTERVAL_MS: f64 = 900.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 320.0;
    /// Interval shrink per elapsed second (ms/s)
    pub const SPAWN_RAMP_MS_PER_SEC: f64 = 12.0;
    pub const BASE_FALL_SPEED: f32 = 180.0;
    /// Fall speed gain per elapsed second (uncapped)
    pub const FALL_SPEED_INCREASE: f32 = 12.0;
    pub const COIN_CHANCE: f64 = 0.22;
    pub const COIN_FALL_FACTOR: f32 = 0.9;
    /// Horizontal inset for falling spawns
    pub const SPAWN_INSET_X: i32 = 40;
    pub const SPAWN_Y: f32 = -30.0;
    /// Falling entities are swept once this far below the bottom edge
    pub const OFFSCREEN_MARGIN_Y: f32 = 60.0;

    /// Falling entity sizes
    pub const HAZARD_HALF_SIZE: f32 = 26.0;
    pub const COIN_RADIUS: f32 = 18.0;
    pub const HAZARD_SKINS: u8 = 2;

    /// Fish (power pickup) spawning
    pub const FISH_SPAWN_INTERVAL_MS: f64 = 2600.0;
    pub const FISH_SPAWN_VARIANCE_MS: i32 = 900;
    pub const FISH_SPAWN_MARGIN: f32 = 40.0;
    pub const FISH_MIN_SPEED: i32 = 120;
    pub const FISH_MAX_SPEED: i32 = 180;
    /// Band above the ground line where fish swim
    pub const FISH_MIN_HEIGHT: i32 = 60;
    pub const FISH_MAX_HEIGHT: i32 = 160;
    pub const FISH_HALF_WIDTH: f32 = 24.0;
    pub const FISH_HALF_HEIGHT: f32 = 16.0;

    /// Fish swim cycle: 3 frames at 10 fps, pulse fires on entering the last frame
    pub const FISH_SWIM_FRAME_MS: f32 = 100.0;
    pub const FISH_SWIM_FRAMES: u32 = 3;
    pub const FISH_PULSE_FRAME: u32 = 2;
    pub const FISH_PULSE_MULTIPLIER: f32 = 1.12;
    pub const FISH_PULSE_DURATION_MS: f32 = 220.0;

    /// Power meter capacity
    pub const MAX_POWER: u8 = 4;

    /// Slide mode tuning
    pub const SLIDE_DURATION_MS: f64 = 3000.0;
    pub const SLIDE_SPEED_MULTIPLIER: f32 = 2.4;
    pub const SLIDE_JUMP_MULTIPLIER: f32 = 1.3;

    /// Double-tap gesture window (inclusive)
    pub const DOUBLE_TAP_WINDOW_MS: f64 = 220.0;

    /// Movement sound cooldowns (ms, inclusive ranges)
    pub const STEP_SFX_MIN_MS: u32 = 140;
    pub const STEP_SFX_MAX_MS: u32 = 180;
    pub const SLIDE_SFX_MIN_MS: u32 = 120;
    pub const SLIDE_SFX_MAX_MS: u32 = 180;

    /// Scoring
    pub const SCORE_PER_SECOND: f64 = 10.0;
    pub const SCORE_PER_COIN: f64 = 50.0;
}

/// Clamp a value to [0, 1]
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Convert a millisecond span to seconds, clamped to >= 0
#[inline]
pub fn ms_to_secs(ms: f64) -> f64 {
    (ms / 1000.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(3.0), 1.0);
    }

    #[test]
    fn test_ms_to_secs_never_negative() {
        assert_eq!(ms_to_secs(1500.0), 1.5);
        assert_eq!(ms_to_secs(-20.0), 0.0);
    }
}
