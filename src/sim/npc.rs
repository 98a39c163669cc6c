//! Street hazards: aggressive NPCs and obstacles
//!
//! NPCs patrol the street until the player bumps one, then chase for a
//! fixed window. Obstacles just sit there; walking into either breaks
//! the catch streak.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::{clamp_to_street, consts::*};

/// Patrol pace, slower than the competitor bots
const PATROL_SPEED: f32 = 2.0;
/// Chase pace, still slower than the player's base speed
const CHASE_SPEED: f32 = 3.5;
/// Contact distance for both bump directions
const NPC_HIT_RADIUS: f32 = 1.2;
/// Cooldown between NPC contact events
const NPC_HIT_COOLDOWN_MS: f64 = 1000.0;
/// Player-obstacle contact distance
const OBSTACLE_HIT_RADIUS: f32 = 0.8;

/// A hazard that flips between wandering and chasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggressiveNpc {
    pub id: u32,
    pub pos: Vec3,
    /// `Some(t)` while chasing, until simulation time `t`. Encodes the
    /// one-mode-at-a-time invariant.
    pub chase_until_ms: Option<f64>,
    /// Patrol direction along x (+1 or -1)
    pub patrol_dir: f32,
    /// Earliest simulation time the next contact may register
    pub next_hit_ok_ms: f64,
}

impl AggressiveNpc {
    pub fn is_chasing(&self) -> bool {
        self.chase_until_ms.is_some()
    }
}

/// What an obstacle looks like on the street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Trash,
    Barrier,
}

/// A stationary street hazard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec3,
    /// Earliest simulation time the next combo-breaking hit may register
    pub next_hit_ok_ms: f64,
}

/// Scatter NPCs over the street.
pub fn spawn_npcs(count: usize, rng: &mut Pcg32) -> Vec<AggressiveNpc> {
    (0..count)
        .map(|i| AggressiveNpc {
            id: i as u32,
            pos: Vec3::new(
                rng.random_range(-STREET_HALF_WIDTH..STREET_HALF_WIDTH),
                0.5,
                rng.random_range(-STREET_HALF_LENGTH..STREET_HALF_LENGTH),
            ),
            chase_until_ms: None,
            patrol_dir: if rng.random::<bool>() { 1.0 } else { -1.0 },
            next_hit_ok_ms: 0.0,
        })
        .collect()
}

/// Scatter obstacles over the street, mixing the two kinds.
pub fn spawn_obstacles(count: usize, rng: &mut Pcg32) -> Vec<Obstacle> {
    (0..count)
        .map(|i| Obstacle {
            id: i as u32,
            kind: if rng.random::<bool>() {
                ObstacleKind::Trash
            } else {
                ObstacleKind::Barrier
            },
            pos: Vec3::new(
                rng.random_range(-STREET_HALF_WIDTH..STREET_HALF_WIDTH),
                0.5,
                rng.random_range(-STREET_HALF_LENGTH..STREET_HALF_LENGTH),
            ),
            next_hit_ok_ms: 0.0,
        })
        .collect()
}

/// One hazard pass: move NPCs, expire chases, and register contacts
/// through the store's action methods.
pub fn update_npcs(state: &mut GameState, dt: f32) {
    let now = state.clock_ms;
    let player_pos = state.player.pos;

    // Contact events collected first, then applied through the store
    let mut bumped_by_player: Vec<u32> = Vec::new();
    let mut caught_player: Vec<u32> = Vec::new();

    for npc in &mut state.npcs {
        // Deterministic chase timeout
        if let Some(until) = npc.chase_until_ms
            && now >= until
        {
            npc.chase_until_ms = None;
        }

        let dist = npc.pos.distance(player_pos);

        if npc.is_chasing() {
            let offset = player_pos - npc.pos;
            let flat = Vec3::new(offset.x, 0.0, offset.z);
            if flat.length() > f32::EPSILON {
                npc.pos += flat.normalize() * CHASE_SPEED * dt;
                npc.pos = clamp_to_street(npc.pos);
            }
            if dist < NPC_HIT_RADIUS && now >= npc.next_hit_ok_ms {
                npc.next_hit_ok_ms = now + NPC_HIT_COOLDOWN_MS;
                caught_player.push(npc.id);
            }
        } else {
            // Patrol back and forth across the street
            npc.pos.x += npc.patrol_dir * PATROL_SPEED * dt;
            if npc.pos.x.abs() > STREET_HALF_WIDTH {
                npc.patrol_dir = -npc.patrol_dir;
                npc.pos.x = npc.pos.x.clamp(-STREET_HALF_WIDTH, STREET_HALF_WIDTH);
            }
            if dist < NPC_HIT_RADIUS && now >= npc.next_hit_ok_ms {
                npc.next_hit_ok_ms = now + NPC_HIT_COOLDOWN_MS;
                bumped_by_player.push(npc.id);
            }
        }
    }

    for id in bumped_by_player {
        state.hit_aggressive_npc(id);
    }
    for id in caught_player {
        state.npc_hit_player(id);
    }
}

/// One obstacle pass: player contact breaks the streak, rate-limited
/// per obstacle.
pub fn update_obstacles(state: &mut GameState) {
    let now = state.clock_ms;
    let player_pos = state.player.pos;
    let mut hit = false;

    for obstacle in &mut state.obstacles {
        if obstacle.pos.distance(player_pos) < OBSTACLE_HIT_RADIUS && now >= obstacle.next_hit_ok_ms
        {
            obstacle.next_hit_ok_ms = now + state.tuning.obstacle_hit_cooldown_ms;
            hit = true;
        }
    }

    if hit {
        state.register_obstacle_hit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn playing_state() -> GameState {
        let mut state = GameState::new(11);
        state.start_game();
        state
    }

    #[test]
    fn test_spawn_positions_inside_street() {
        let mut rng = Pcg32::seed_from_u64(5);
        for npc in spawn_npcs(8, &mut rng) {
            assert!(npc.pos.x.abs() <= STREET_HALF_WIDTH);
            assert!(npc.pos.z.abs() <= STREET_HALF_LENGTH);
            assert!(!npc.is_chasing());
        }
        for ob in spawn_obstacles(8, &mut rng) {
            assert!(ob.pos.x.abs() <= STREET_HALF_WIDTH);
            assert!(ob.pos.z.abs() <= STREET_HALF_LENGTH);
        }
    }

    #[test]
    fn test_patrol_bounces_at_curb() {
        let mut state = playing_state();
        state.npcs = vec![AggressiveNpc {
            id: 0,
            pos: Vec3::new(STREET_HALF_WIDTH - 0.01, 0.5, 10.0),
            chase_until_ms: None,
            patrol_dir: 1.0,
            next_hit_ok_ms: 0.0,
        }];
        update_npcs(&mut state, 0.1);
        assert_eq!(state.npcs[0].patrol_dir, -1.0);
        assert!(state.npcs[0].pos.x <= STREET_HALF_WIDTH);
    }

    #[test]
    fn test_bump_starts_chase_and_breaks_combo() {
        let mut state = playing_state();
        state.combo = 3;
        state.npcs = vec![AggressiveNpc {
            id: 0,
            pos: state.player.pos + Vec3::new(0.5, 0.0, 0.0),
            chase_until_ms: None,
            patrol_dir: 1.0,
            next_hit_ok_ms: 0.0,
        }];
        update_npcs(&mut state, 1.0 / 60.0);
        assert!(state.npcs[0].is_chasing());
        assert_eq!(state.combo, 0);
    }

    #[test]
    fn test_chase_times_out_deterministically() {
        let mut state = playing_state();
        state.npcs = vec![AggressiveNpc {
            id: 0,
            pos: Vec3::new(5.0, 0.5, 5.0),
            chase_until_ms: Some(2000.0),
            patrol_dir: 1.0,
            next_hit_ok_ms: 0.0,
        }];
        state.clock_ms = 1999.0;
        update_npcs(&mut state, 1.0 / 60.0);
        assert!(state.npcs[0].is_chasing());
        state.clock_ms = 2000.0;
        update_npcs(&mut state, 1.0 / 60.0);
        assert!(!state.npcs[0].is_chasing());
    }

    #[test]
    fn test_chasing_npc_catches_player() {
        let mut state = playing_state();
        state.score = 2;
        state.npcs = vec![AggressiveNpc {
            id: 0,
            pos: state.player.pos + Vec3::new(0.3, 0.0, 0.0),
            chase_until_ms: Some(f64::MAX),
            patrol_dir: 1.0,
            next_hit_ok_ms: 0.0,
        }];
        update_npcs(&mut state, 1.0 / 60.0);
        assert_eq!(state.score, 1);
        assert!(!state.npcs[0].is_chasing());
    }

    #[test]
    fn test_obstacle_hit_cooldown() {
        let mut state = playing_state();
        state.obstacles = vec![Obstacle {
            id: 0,
            kind: ObstacleKind::Trash,
            pos: state.player.pos,
            next_hit_ok_ms: 0.0,
        }];
        state.combo = 2;
        update_obstacles(&mut state);
        assert_eq!(state.combo, 0);

        // Streak rebuilt immediately; inside the cooldown nothing breaks
        state.combo = 2;
        state.clock_ms += 500.0;
        update_obstacles(&mut state);
        assert_eq!(state.combo, 2);

        state.clock_ms += 600.0;
        update_obstacles(&mut state);
        assert_eq!(state.combo, 0);
    }
}
