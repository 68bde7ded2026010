//! Collision detection and resolution
//!
//! Overlaps are queried explicitly each tick into a list of [`Contact`]s,
//! then resolved in a fixed priority order: ground, hazards, coins, fish.

use glam::Vec2;

use super::state::{Cue, DespawnReason, Entity, EntityKind, GameEvent, GameState};
use super::{player, power, score};
use crate::consts::*;

/// A single overlap found this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Falling entity reached the ground plane
    Ground(u32),
    /// Player touched a hazard (fatal)
    Hazard(u32),
    Coin(u32),
    Pickup(u32),
}

impl Contact {
    fn priority(&self) -> u8 {
        match self {
            Contact::Ground(_) => 0,
            Contact::Hazard(_) => 1,
            Contact::Coin(_) => 2,
            Contact::Pickup(_) => 3,
        }
    }
}

/// Overlap test between two axis-aligned boxes given by center and half extents
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> bool {
    let delta = (a_pos - b_pos).abs();
    let reach = a_half + b_half;
    delta.x < reach.x && delta.y < reach.y
}

/// Overlap test between a circle and an axis-aligned box
#[inline]
pub fn circle_aabb_overlap(center: Vec2, radius: f32, box_pos: Vec2, box_half: Vec2) -> bool {
    let closest = center.clamp(box_pos - box_half, box_pos + box_half);
    center.distance_squared(closest) < radius * radius
}

/// Point on a falling entity's path this tick closest to `target_y`
fn swept_pos(entity: &Entity, target_y: f32, dt: f32) -> Vec2 {
    let start_y = entity.pos.y - entity.vel.y * dt;
    let (lo, hi) = if start_y <= entity.pos.y {
        (start_y, entity.pos.y)
    } else {
        (entity.pos.y, start_y)
    };
    Vec2::new(entity.pos.x, target_y.clamp(lo, hi))
}

/// Collect this tick's contacts, ordered for resolution.
///
/// Hazards and coins are tested along the whole distance they fell during
/// `dt`, so fast falls cannot skip past the player. Touching the player
/// wins over touching the ground.
pub fn find_contacts(state: &GameState, dt: f32) -> Vec<Contact> {
    let player = &state.player;
    let mut contacts = Vec::new();

    for entity in &state.entities {
        let landed = entity.bottom() >= GROUND_TOP_Y;
        let contact = match entity.kind {
            EntityKind::Hazard { .. } => {
                let at = swept_pos(entity, player.pos.y, dt);
                if aabb_overlap(player.pos, player.half_size, at, entity.half_size) {
                    Some(Contact::Hazard(entity.id))
                } else {
                    landed.then_some(Contact::Ground(entity.id))
                }
            }
            EntityKind::Coin => {
                let at = swept_pos(entity, player.pos.y, dt);
                if circle_aabb_overlap(at, entity.half_size.x, player.pos, player.half_size) {
                    Some(Contact::Coin(entity.id))
                } else {
                    landed.then_some(Contact::Ground(entity.id))
                }
            }
            EntityKind::Pickup(_) => {
                aabb_overlap(player.pos, player.half_size, entity.pos, entity.half_size)
                    .then_some(Contact::Pickup(entity.id))
            }
        };
        contacts.extend(contact);
    }

    contacts.sort_by_key(Contact::priority);
    contacts
}

/// Apply contacts to the game state. Stops at the first fatal hit.
pub fn resolve(state: &mut GameState, contacts: &[Contact], events: &mut Vec<GameEvent>) {
    for contact in contacts {
        if state.run.ended {
            return;
        }
        match *contact {
            Contact::Ground(id) => {
                state.despawn(id, DespawnReason::HitGround, events);
            }
            Contact::Hazard(id) => {
                log::info!("Hit hazard #{}", id);
                end_run(state, events);
            }
            Contact::Coin(id) => {
                if state.despawn(id, DespawnReason::Collected, events) {
                    state.run.coins += 1;
                    events.push(GameEvent::CoinCollected {
                        total: state.run.coins,
                    });
                    events.push(GameEvent::Cue(Cue::Pickup));
                    log::debug!("Coin #{} collected ({} total)", id, state.run.coins);
                }
            }
            Contact::Pickup(id) => {
                if state.despawn(id, DespawnReason::Collected, events) {
                    power::add_power(state, events);
                    events.push(GameEvent::Cue(Cue::Pickup));
                    log::debug!("Fish #{} collected ({}/{})", id, state.power.count(), MAX_POWER);
                }
            }
        }
    }
}

/// Terminal transition. Safe to call any number of times.
pub fn end_run(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.run.ended {
        return;
    }
    state.run.ended = true;

    power::force_deactivate(state, events);
    player::freeze(state);
    for entity in &mut state.entities {
        entity.vel = Vec2::ZERO;
        if let EntityKind::Pickup(swim) = &mut entity.kind {
            swim.pulse_ms = None;
        }
    }

    let final_score = score::update(state);
    events.push(GameEvent::Cue(Cue::Dead));
    events.push(GameEvent::RunEnded { final_score });
    log::info!(
        "Game over at {:.1}s: score {} ({} coins)",
        state.elapsed_secs(),
        final_score,
        state.run.coins
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EntityTag, GamePhase, Swim};

    fn spawn(state: &mut GameState, kind: EntityKind, pos: Vec2, half: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            kind,
            pos,
            vel: Vec2::new(0.0, 200.0),
            half_size: half,
        });
        id
    }

    fn on_player(state: &GameState) -> Vec2 {
        state.player.pos
    }

    #[test]
    fn test_aabb_overlap() {
        let half = Vec2::splat(10.0);
        assert!(aabb_overlap(Vec2::ZERO, half, Vec2::new(19.0, 0.0), half));
        assert!(!aabb_overlap(Vec2::ZERO, half, Vec2::new(20.0, 0.0), half));
        assert!(!aabb_overlap(Vec2::ZERO, half, Vec2::new(5.0, 25.0), half));
    }

    #[test]
    fn test_circle_aabb_overlap() {
        let half = Vec2::splat(10.0);
        assert!(circle_aabb_overlap(Vec2::new(15.0, 0.0), 6.0, Vec2::ZERO, half));
        // Corner gap: inside the box's reach on both axes but outside the radius
        assert!(!circle_aabb_overlap(Vec2::new(15.0, 15.0), 6.0, Vec2::ZERO, half));
    }

    #[test]
    fn test_coin_collected_once() {
        let mut state = GameState::new(1);
        let pos = on_player(&state);
        let id = spawn(&mut state, EntityKind::Coin, pos, Vec2::splat(COIN_RADIUS));

        let contacts = find_contacts(&state, SIM_DT);
        assert_eq!(contacts, vec![Contact::Coin(id)]);

        let mut events = Vec::new();
        resolve(&mut state, &contacts, &mut events);
        resolve(&mut state, &contacts, &mut events);
        assert_eq!(state.run.coins, 1);
        assert_eq!(state.count(EntityTag::Coin), 0);
        assert!(events.contains(&GameEvent::Cue(Cue::Pickup)));
    }

    #[test]
    fn test_fish_fills_meter() {
        let mut state = GameState::new(1);
        let pos = on_player(&state);
        spawn(&mut state, EntityKind::Pickup(Swim::new(150.0)), pos, Vec2::splat(16.0));

        let contacts = find_contacts(&state, SIM_DT);
        let mut events = Vec::new();
        resolve(&mut state, &contacts, &mut events);
        assert_eq!(state.power.count(), 1);
        assert_eq!(state.count(EntityTag::Pickup), 0);
    }

    #[test]
    fn test_falling_entities_destroyed_on_ground() {
        let mut state = GameState::new(1);
        let far = Vec2::new(20.0, GROUND_TOP_Y - 5.0);
        spawn(&mut state, EntityKind::Hazard { skin: 1 }, far, Vec2::splat(HAZARD_HALF_SIZE));
        spawn(&mut state, EntityKind::Coin, far, Vec2::splat(COIN_RADIUS));

        let contacts = find_contacts(&state, SIM_DT);
        assert!(contacts.iter().all(|c| matches!(c, Contact::Ground(_))));
        let mut events = Vec::new();
        resolve(&mut state, &contacts, &mut events);
        assert!(state.entities.is_empty());
        assert_eq!(state.run.coins, 0);
        assert_eq!(state.phase(), GamePhase::Active);
    }

    #[test]
    fn test_hazard_ends_run_and_freezes() {
        let mut state = GameState::new(1);
        state.now_ms = 2500.0;
        state.player.vel = Vec2::new(360.0, -100.0);
        let pos = on_player(&state);
        spawn(&mut state, EntityKind::Hazard { skin: 0 }, pos, Vec2::splat(HAZARD_HALF_SIZE));
        spawn(&mut state, EntityKind::Coin, Vec2::new(300.0, 100.0), Vec2::splat(COIN_RADIUS));

        let contacts = find_contacts(&state, SIM_DT);
        let mut events = Vec::new();
        resolve(&mut state, &contacts, &mut events);

        assert_eq!(state.phase(), GamePhase::Ended);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(state.entities.iter().all(|e| e.vel == Vec2::ZERO));
        assert_eq!(state.run.score, 25);
        assert!(events.contains(&GameEvent::Cue(Cue::Dead)));
        assert!(events.contains(&GameEvent::RunEnded { final_score: 25 }));
    }

    #[test]
    fn test_hazard_beats_coin_in_same_tick() {
        let mut state = GameState::new(1);
        let pos = on_player(&state);
        spawn(&mut state, EntityKind::Coin, pos, Vec2::splat(COIN_RADIUS));
        spawn(&mut state, EntityKind::Hazard { skin: 0 }, pos, Vec2::splat(HAZARD_HALF_SIZE));

        let contacts = find_contacts(&state, SIM_DT);
        let mut events = Vec::new();
        resolve(&mut state, &contacts, &mut events);
        assert!(state.run.ended);
        assert_eq!(state.run.coins, 0);
    }

    #[test]
    fn test_fast_hazard_hit_between_ticks() {
        let mut state = GameState::new(1);
        state.player.pos.y = GROUND_TOP_Y - PLAYER_HALF_HEIGHT;
        let x = state.player.pos.x;
        // Above the player last tick, past it and into the ground now
        let half = Vec2::splat(HAZARD_HALF_SIZE);
        let id = spawn(&mut state, EntityKind::Hazard { skin: 0 }, Vec2::new(x, 730.0), half);
        state.entities[0].vel = Vec2::new(0.0, 150.0 / SIM_DT);

        assert!(!aabb_overlap(state.player.pos, state.player.half_size, Vec2::new(x, 730.0), half));
        assert!(!aabb_overlap(state.player.pos, state.player.half_size, Vec2::new(x, 580.0), half));
        assert_eq!(find_contacts(&state, SIM_DT), vec![Contact::Hazard(id)]);
    }

    #[test]
    fn test_player_contact_beats_ground() {
        let mut state = GameState::new(1);
        state.player.pos.y = GROUND_TOP_Y - PLAYER_HALF_HEIGHT;
        let landed = Vec2::new(state.player.pos.x, GROUND_TOP_Y - HAZARD_HALF_SIZE);
        let hazard = spawn(
            &mut state,
            EntityKind::Hazard { skin: 0 },
            landed,
            Vec2::splat(HAZARD_HALF_SIZE),
        );
        let beside = Vec2::new(state.player.pos.x + 30.0, GROUND_TOP_Y - COIN_RADIUS);
        let coin = spawn(&mut state, EntityKind::Coin, beside, Vec2::splat(COIN_RADIUS));

        let contacts = find_contacts(&state, SIM_DT);
        assert_eq!(contacts, vec![Contact::Hazard(hazard), Contact::Coin(coin)]);

        let mut events = Vec::new();
        resolve(&mut state, &contacts, &mut events);
        assert!(state.run.ended);
    }

    #[test]
    fn test_end_run_is_idempotent() {
        let mut state = GameState::new(1);
        state.now_ms = 1000.0;
        let mut events = Vec::new();
        end_run(&mut state, &mut events);
        let first = events.clone();
        let snapshot = serde_json::to_string(&state).unwrap();

        let mut again = Vec::new();
        end_run(&mut state, &mut again);
        state.now_ms = 5000.0;
        end_run(&mut state, &mut again);
        assert!(again.is_empty());
        assert_eq!(first.iter().filter(|e| matches!(e, GameEvent::RunEnded { .. })).count(), 1);

        state.now_ms = 1000.0;
        assert_eq!(serde_json::to_string(&state).unwrap(), snapshot);
    }
}
