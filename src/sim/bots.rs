//! Competitor bot AI
//!
//! Each bot runs the same per-tick policy: re-validate the claimed target
//! through the registry, otherwise scan for a new one, move, catch, or
//! wander. Candidate scoring mixes distance with a deterministic per-pair
//! preference hash so a bot keeps "liking" the same item across ties
//! instead of flip-flopping with its rivals.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{BotScore, GameState};
use crate::{clamp_to_street, consts::*, lerp};

/// Items above this height are not worth chasing yet
const TARGET_MAX_HEIGHT: f32 = 1.5;
/// Bots grab an item inside this range when it is low enough
const BOT_CATCH_RADIUS: f32 = 0.8;
const BOT_CATCH_MAX_HEIGHT: f32 = 1.0;
/// Per-tick chance of taking a wander step with no target
const WANDER_CHANCE: f32 = 0.01;
/// Heading smoothing rate (exponential, per second)
const TURN_RATE: f32 = 5.0;

struct RosterEntry {
    name: &'static str,
    color: &'static str,
    persona: &'static str,
    start_x: f32,
    start_z: f32,
}

/// The full cast of competitors. Levels reveal a prefix of this list.
const ROSTER: [RosterEntry; 6] = [
    RosterEntry {
        name: "Rosie",
        color: "#ff4444",
        persona: "camps the landing spots",
        start_x: -5.5,
        start_z: -13.0,
    },
    RosterEntry {
        name: "Gumbo",
        color: "#44ff44",
        persona: "never met a cup he didn't want",
        start_x: 5.0,
        start_z: -10.0,
    },
    RosterEntry {
        name: "Blue",
        color: "#4444ff",
        persona: "slow starter, strong finisher",
        start_x: -2.0,
        start_z: -7.0,
    },
    RosterEntry {
        name: "Sunny",
        color: "#ffff44",
        persona: "darts straight at anything shiny",
        start_x: 3.0,
        start_z: -12.0,
    },
    RosterEntry {
        name: "Orchid",
        color: "#ff44ff",
        persona: "shadows the player",
        start_x: -4.0,
        start_z: -9.0,
    },
    RosterEntry {
        name: "Cyan",
        color: "#44ffff",
        persona: "works the far curb",
        start_x: 1.0,
        start_z: -8.0,
    },
];

pub fn roster_len() -> usize {
    ROSTER.len()
}

/// Scoreboard entries for the whole roster (catches at zero).
pub fn roster_scores() -> Vec<BotScore> {
    ROSTER
        .iter()
        .enumerate()
        .map(|(i, e)| BotScore {
            id: i as u32,
            name: e.name.to_string(),
            color: e.color.to_string(),
            catches: 0,
            persona: Some(e.persona.to_string()),
        })
        .collect()
}

/// A competitor on the street.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorBot {
    /// Roster index; doubles as the claim holder id
    pub id: u32,
    pub pos: Vec3,
    /// Rolled once at spawn, never re-rolled
    pub speed: f32,
    /// Facing angle (radians), smoothed toward travel direction
    pub heading: f32,
    /// Cached target collectible id — a weak reference, re-validated
    /// against the claim registry every tick
    pub target: Option<u32>,
}

/// Spawn the bots revealed at this level, with per-bot speeds rolled once
/// from the seeded RNG.
pub fn spawn_active(level: u32, rng: &mut Pcg32) -> Vec<CompetitorBot> {
    let count = super::difficulty::active_bot_count(level, ROSTER.len());
    ROSTER
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, e)| CompetitorBot {
            id: i as u32,
            pos: Vec3::new(e.start_x, 0.5, e.start_z),
            speed: rng.random_range(2.0..3.5),
            heading: 0.0,
            target: None,
        })
        .collect()
}

/// Deterministic per-pair preference in 0..10. A plain djb2 over the bot
/// name mixed with the collectible id: stable across ticks, different
/// across bots, so contested ties settle consistently.
pub fn pair_preference(bot_id: u32, collectible_id: u32) -> u32 {
    let name = ROSTER[bot_id as usize % ROSTER.len()].name;
    let mut hash: u32 = 5381;
    for b in name.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(b as u32);
    }
    hash = hash.wrapping_mul(33).wrapping_add(collectible_id);
    hash % 10
}

/// One AI pass over every bot. Runs inside the tick; catches are
/// collected first and applied through the store afterwards so the
/// collectible list stays stable while bots are deciding.
pub fn update_bots(state: &mut GameState, dt: f32) {
    let now = state.clock_ms;
    let mut caught: Vec<(u32, u32)> = Vec::new();

    {
        let GameState {
            bots,
            collectibles,
            claims,
            rng,
            ..
        } = state;

        for bot in bots.iter_mut() {
            // 1. Re-validate the cached target. Missing item, item too
            //    high, or claim no longer ours all mean "target lost".
            if let Some(target_id) = bot.target {
                let item_ok = collectibles
                    .iter()
                    .find(|c| c.id == target_id)
                    .is_some_and(|c| c.pos.y < TARGET_MAX_HEIGHT);
                let claim_ok = claims.held_by(target_id, bot.id);
                if !item_ok || !claim_ok {
                    if claim_ok {
                        claims.release(target_id);
                    }
                    bot.target = None;
                }
            }

            // 2. Scan for a new target, skipping rivals' fresh claims.
            if bot.target.is_none() {
                let mut best: Option<(f32, u32)> = None;
                for c in collectibles.iter() {
                    if c.pos.y >= TARGET_MAX_HEIGHT {
                        continue;
                    }
                    if let Some(claim) = claims.get(c.id)
                        && claim.bot_id != bot.id
                        && !claims.is_stale(claim, now)
                    {
                        continue;
                    }
                    let score =
                        (20.0 - bot.pos.distance(c.pos)) + pair_preference(bot.id, c.id) as f32;
                    if best.is_none_or(|(s, _)| score > s) {
                        best = Some((score, c.id));
                    }
                }
                // A denied claim is routine: wander and rescan next tick.
                if let Some((_, id)) = best
                    && claims.claim(id, bot.id, now)
                {
                    bot.target = Some(id);
                }
            }

            // 3/4. Pursue and catch, or wander.
            if let Some(target_id) = bot.target {
                let Some(item) = collectibles.iter().find(|c| c.id == target_id) else {
                    continue; // validated above; unreachable in practice
                };
                let offset = item.pos - bot.pos;
                let dist = offset.length();
                if dist > f32::EPSILON {
                    let dir = offset / dist;
                    bot.pos += dir * bot.speed * dt;
                    bot.pos = clamp_to_street(bot.pos);
                    let want = dir.x.atan2(dir.z);
                    bot.heading = lerp(bot.heading, want, TURN_RATE * dt);
                }
                if dist < BOT_CATCH_RADIUS && item.pos.y < BOT_CATCH_MAX_HEIGHT {
                    caught.push((bot.id, target_id));
                    bot.target = None;
                }
            } else if rng.random::<f32>() < WANDER_CHANCE {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let step = Vec3::new(angle.cos(), 0.0, angle.sin()) * bot.speed * 0.3 * dt;
                bot.pos = clamp_to_street(bot.pos + step);
            }
        }
    }

    // Removing the collectible vacates its claim as a side effect.
    for (bot_id, collectible_id) in caught {
        if state.remove_collectible(collectible_id) {
            state.add_bot_catch(bot_id);
        }
    }
}
