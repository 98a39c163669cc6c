//! Per-frame simulation tick
//!
//! The whole simulation advances inside one synchronous callback per
//! rendered frame: player, floats, projectile physics, bot AI, hazards,
//! and expiry pruning, in that order. Nothing here suspends; collaborator
//! I/O happens outside and never blocks a tick.

use glam::{Vec2, Vec3};

use super::npc;
use super::physics::{self, Catchability, StepOutcome};
use super::state::{CollectibleKind, GamePhase, GameState};
use super::{bots, throws};
use crate::consts::*;
use crate::{clamp_to_street, lerp};

/// Input commands for a single tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement on the street plane (x, z); magnitude is ignored
    /// beyond normalization
    pub move_dir: Option<Vec2>,
    /// Deliberate catch action (button/tap) for items in range
    pub catch: bool,
    /// Idle/demo mode - AI chases landings instead of the player input
    pub idle_mode: bool,
}

/// Advance the game by one frame of `dt` seconds.
///
/// `dt` is the elapsed wall delta from the render loop, clamped against
/// pathological gaps. Outside the playing phase only the clock advances.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.clock_ms += f64::from(dt) * 1000.0;

    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        input.move_dir = autopilot_dir(state);
    }
    let input = &input;

    update_player(state, input, dt);
    if state.phase != GamePhase::Playing {
        return; // inactivity ended the run this frame
    }

    throws::update_floats(state, dt);
    if state.phase != GamePhase::Playing {
        return; // run over by a float
    }

    update_collectibles(state, input, dt);
    if state.phase != GamePhase::Playing {
        return; // that catch won the level
    }

    bots::update_bots(state, dt);
    npc::update_npcs(state, dt);
    npc::update_obstacles(state);
    prune_expired(state);
}

/// Move the player, smooth the heading, and watch for inactivity.
fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let now = state.clock_ms;

    if let Some(dir) = input.move_dir
        && dir.length_squared() > f32::EPSILON
    {
        let dir = dir.normalize();
        let speed = PLAYER_BASE_SPEED * state.move_speed_multiplier();
        let step = Vec3::new(dir.x, 0.0, dir.y) * speed * dt;
        state.player.pos = clamp_to_street(state.player.pos + step);
        let want = dir.x.atan2(dir.y);
        state.player.heading = lerp(state.player.heading, want, 3.0 * dt);
        state.player.last_move_ms = Some(now);
    }

    // Only armed once the player has moved at least once
    if let Some(last_move) = state.player.last_move_ms
        && now - last_move >= state.tuning.inactivity_timeout_ms
    {
        state.end_game_due_to_inactivity();
    }
}

/// Physics pass: attraction, integration, expiry, despawn, and catch
/// detection. Mutation requests are collected per item and applied
/// through the store afterwards.
fn update_collectibles(state: &mut GameState, input: &TickInput, dt: f32) {
    let now = state.clock_ms;
    let player_pos = state.player.pos;
    let helpers = state.helper_bot_count();

    let mut removals: Vec<u32> = Vec::new();
    let mut misses: u32 = 0;
    let mut caught: Vec<(u32, CollectibleKind)> = Vec::new();

    for c in state.collectibles.iter_mut() {
        physics::apply_attraction(c, player_pos, helpers, dt);
        match physics::step_collectible(c, dt, now, &state.tuning) {
            StepOutcome::Expired => {
                if c.kind.is_regular() {
                    misses += 1;
                }
                removals.push(c.id);
            }
            StepOutcome::OutOfBounds => removals.push(c.id),
            StepOutcome::Airborne | StepOutcome::Grounded => {
                match physics::catchability(c, player_pos, now, &state.tuning) {
                    Catchability::Auto => caught.push((c.id, c.kind)),
                    Catchability::InRange if input.catch => caught.push((c.id, c.kind)),
                    _ => {}
                }
            }
        }
    }

    for id in removals {
        let _ = state.remove_collectible(id);
    }
    for _ in 0..misses {
        state.increment_misses();
    }
    for (id, kind) in caught {
        // Remove first: a catch that ends the level must not leave the
        // item behind for the next frame
        if state.remove_collectible(id) {
            state.apply_catch(kind);
        }
    }
}

/// Drop expired timed records: power-ups, helper bots, visual effects.
fn prune_expired(state: &mut GameState) {
    let now = state.clock_ms;
    state.active_power_ups.retain(|p| p.expires_ms > now);
    state.helper_bots.retain(|h| h.expires_ms > now);
    state.effects.retain(|e| e.expires_ms > now);
}

/// Demo-mode steering: walk toward the nearest landing spot (or grounded
/// item), like an impatient spectator.
fn autopilot_dir(state: &GameState) -> Option<Vec2> {
    let player = state.player.pos;
    let target = state
        .collectibles
        .iter()
        .map(|c| {
            if c.grounded_at_ms.is_some() {
                c.pos
            } else {
                physics::predict_landing(c.pos, c.vel)
            }
        })
        .map(clamp_to_street)
        .min_by(|a, b| {
            a.distance(player)
                .partial_cmp(&b.distance(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let offset = Vec2::new(target.x - player.x, target.z - player.z);
    if offset.length() < 0.2 {
        return None;
    }
    Some(offset.normalize())
}
