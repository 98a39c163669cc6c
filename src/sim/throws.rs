//! Parade floats and the throw generator
//!
//! Floats ride the lane, wrap behind the start, and roll a throw whenever
//! their interval timer fires inside the active band. A throw picks an
//! item kind, a trajectory (targeted at the player or zone-biased random),
//! and occasionally fires a small cluster.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty;
use super::state::{CollectibleKind, GameState};
use crate::consts::*;

/// A parade vehicle that periodically throws collectibles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParadeFloat {
    pub id: u32,
    /// -1 or 1: which side of the street the float rides
    pub lane: i8,
    pub z: f32,
    pub last_throw_ms: f64,
}

impl ParadeFloat {
    pub fn x(&self) -> f32 {
        self.lane as f32 * FLOAT_LANE_X
    }

    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x(), 1.0, self.z)
    }

    /// Only floats inside the band in front of the crowd throw.
    pub fn in_throw_band(&self) -> bool {
        self.z > -THROW_BAND_Z && self.z < THROW_BAND_Z
    }
}

/// One decided throw: a kind shared by the whole cluster, plus per-item
/// release kinematics.
#[derive(Debug, Clone)]
pub struct ThrowDecision {
    pub kind: CollectibleKind,
    pub items: Vec<(Vec3, Vec3)>,
}

/// Line the parade up behind the street start.
pub fn spawn_parade(count: usize, now_ms: f64) -> Vec<ParadeFloat> {
    (0..count)
        .map(|i| ParadeFloat {
            id: i as u32,
            lane: 1,
            z: FLOAT_SPAWN_Z - i as f32 * FLOAT_SPACING_Z,
            last_throw_ms: now_ms,
        })
        .collect()
}

/// Roll what a float throws this time.
pub fn roll_throw(rng: &mut Pcg32, float_pos: Vec3, lane: i8, player_pos: Vec3) -> ThrowDecision {
    let kind = roll_kind(rng);

    let (dir, force) = if rng.random::<f32>() < 0.3 {
        // Targeted throw: straight at where the player stands now
        let mut dir = (player_pos - float_pos).normalize_or_zero();
        dir.y = rng.random_range(0.5..0.8);
        (dir.normalize_or_zero(), rng.random_range(9.0..11.0))
    } else {
        roll_random_trajectory(rng, lane)
    };

    let count = roll_cluster_size(rng.random::<f32>());
    let items = (0..count)
        .map(|_| {
            // Independent jitter so a cluster fans out instead of stacking
            let jitter_pos = Vec3::new(
                rng.random_range(-0.3..0.3),
                rng.random_range(-0.1..0.1),
                rng.random_range(-0.3..0.3),
            );
            let jitter_vel = Vec3::new(
                rng.random_range(-0.4..0.4),
                rng.random_range(-0.2..0.2),
                rng.random_range(-0.4..0.4),
            );
            (float_pos + jitter_pos, dir * force + jitter_vel)
        })
        .collect();

    ThrowDecision { kind, items }
}

/// 2% king cake, 6% power-ups split evenly, the rest plain throws.
fn roll_kind(rng: &mut Pcg32) -> CollectibleKind {
    let special = rng.random::<f32>();
    if special < 0.02 {
        CollectibleKind::KingCake
    } else if special < 0.08 {
        if rng.random::<f32>() < 0.5 {
            CollectibleKind::SpeedBoost
        } else {
            CollectibleKind::DoublePoints
        }
    } else {
        match rng.random_range(0..3) {
            0 => CollectibleKind::Beads,
            1 => CollectibleKind::Doubloon,
            _ => CollectibleKind::Cup,
        }
    }
}

/// Untargeted throws pick an arc/force tier, then a depth zone: past the
/// center into the obstacle-dense back (25%), the catchable middle
/// (50%), or short toward the curb (25%).
fn roll_random_trajectory(rng: &mut Pcg32, lane: i8) -> (Vec3, f32) {
    let tier = rng.random::<f32>();
    let (arc, force) = if tier < 0.3 {
        // Easy: low arc, moderate speed
        (rng.random_range(0.35..0.5), rng.random_range(7.0..8.5))
    } else if tier < 0.7 {
        // Medium
        (rng.random_range(0.5..0.7), rng.random_range(8.5..10.5))
    } else {
        // Hard: high arc or very fast
        (rng.random_range(0.7..1.0), rng.random_range(10.0..12.5))
    };

    let x_dir = -(lane as f32) * rng.random_range(0.6..1.2);
    let zone = rng.random::<f32>();
    let z_dir = if zone < 0.25 {
        // Deep into the far zone, among the obstacles
        -rng.random_range(1.0..1.4)
    } else if zone < 0.75 {
        // The catchable middle of the street
        -rng.random_range(0.5..1.0)
    } else {
        // Short or overshooting the curb
        rng.random_range(-0.2..0.3)
    };

    (Vec3::new(x_dir, arc, z_dir).normalize_or_zero(), force)
}

/// Cluster size from one roll: under 8% throws 3, under 28% throws 2.
pub fn roll_cluster_size(roll: f32) -> usize {
    if roll < 0.08 {
        3
    } else if roll < 0.28 {
        2
    } else {
        1
    }
}

/// One float pass: advance the parade, wrap finished floats, and fire
/// throws whose timers lapsed inside the band. The player being run over
/// by a float is also detected here.
pub fn update_floats(state: &mut GameState, dt: f32) {
    let speed = difficulty::float_speed(state.level);
    let interval = difficulty::throw_interval_ms(state.level);
    let now = state.clock_ms;
    let player_pos = state.player.pos;

    let mut thrown: Vec<ThrowDecision> = Vec::new();
    let mut ran_over_player = false;

    {
        let GameState { floats, rng, .. } = state;
        for float in floats.iter_mut() {
            float.z += speed * dt;
            if float.z > FLOAT_WRAP_Z {
                float.z = FLOAT_SPAWN_Z;
                float.last_throw_ms = now;
                continue;
            }

            if float.in_throw_band() && now - float.last_throw_ms > interval {
                float.last_throw_ms = now;
                thrown.push(roll_throw(rng, float.pos(), float.lane, player_pos));
            }

            if (player_pos.x - float.x()).abs() < FLOAT_HALF_WIDTH
                && (player_pos.z - float.z).abs() < FLOAT_HALF_LENGTH
            {
                ran_over_player = true;
            }
        }
    }

    for decision in thrown {
        for (pos, vel) in decision.items {
            let _ = state.add_collectible(decision.kind, pos, vel);
        }
        log::debug!("float threw {}", decision.kind.as_str());
    }

    if ran_over_player {
        state.eliminate_player();
    }
}
