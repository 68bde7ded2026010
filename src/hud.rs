//! Presentation snapshot
//!
//! Copies what the HUD and sprite layer need out of [`GameState`] so the
//! presentation side never reaches into simulation internals.

use serde::Serialize;

use crate::consts::MAX_POWER;
use crate::sim::{Anim, Direction, EntityKind, EntityTag, GamePhase, GameState};

/// HUD values for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub elapsed_secs: f64,
    pub coins: u32,
    pub power_count: u8,
    pub power_max: u8,
    /// Meter fill in [0, 1]
    pub power_progress: f32,
    pub power_full: bool,
    pub slide_active: bool,
    /// Time left in slide mode, 0 when inactive
    pub slide_remaining_ms: f64,
    pub ended: bool,
    /// Set once the run has ended
    pub final_score: Option<u64>,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let ended = state.phase() == GamePhase::Ended;
        let slide_remaining_ms = if state.slide.active {
            (state.slide.end_ms - state.now_ms).max(0.0)
        } else {
            0.0
        };
        Self {
            score: state.run.score,
            elapsed_secs: state.elapsed_secs(),
            coins: state.run.coins,
            power_count: state.power.count(),
            power_max: MAX_POWER,
            power_progress: state.power.progress(),
            power_full: state.power.is_full(),
            slide_active: state.slide.active,
            slide_remaining_ms,
            ended,
            final_score: ended.then_some(state.run.score),
        }
    }

    /// "12.3s" style elapsed time
    pub fn time_label(&self) -> String {
        format!("{:.1}s", self.elapsed_secs)
    }

    /// "3/4" style meter label
    pub fn power_label(&self) -> String {
        format!("{}/{}", self.power_count, self.power_max)
    }
}

/// Player sprite state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSprite {
    pub x: f32,
    pub y: f32,
    pub anim: Anim,
    /// Mirror the sprite horizontally
    pub flip_x: bool,
    pub tinted: bool,
}

/// One entity to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySprite {
    pub id: u32,
    pub tag: EntityTag,
    pub x: f32,
    pub y: f32,
    /// Hazard block variant (0 for other kinds)
    pub skin: u8,
    /// Fish face their swim direction
    pub flip_x: bool,
}

/// Everything the presentation layer draws for a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub hud: HudSnapshot,
    pub player: PlayerSprite,
    pub entities: Vec<EntitySprite>,
}

pub fn build_render_frame(state: &GameState) -> RenderFrame {
    let player = PlayerSprite {
        x: state.player.pos.x,
        y: state.player.pos.y,
        anim: state.player.anim,
        flip_x: state.player.facing == Direction::Left,
        tinted: state.slide.active,
    };

    let entities = state
        .entities
        .iter()
        .map(|e| {
            let (skin, flip_x) = match e.kind {
                EntityKind::Hazard { skin } => (skin, false),
                EntityKind::Coin => (0, false),
                EntityKind::Pickup(swim) => (0, swim.base_speed > 0.0),
            };
            EntitySprite {
                id: e.id,
                tag: e.tag(),
                x: e.pos.x,
                y: e.pos.y,
                skin,
                flip_x,
            }
        })
        .collect();

    RenderFrame {
        hud: HudSnapshot::from_state(state),
        player,
        entities,
    }
}
