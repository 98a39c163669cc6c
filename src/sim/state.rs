//! Game state and core simulation types
//!
//! The session store is the single mutable aggregate: collectibles, bots,
//! hazards, floats, and the scoring machine all live here, mutated through
//! a fixed set of action methods. Other passes read snapshots and submit
//! granular mutations; nothing holds a reference across ticks.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bots::{self, CompetitorBot};
use super::claims::{Claim, ClaimRegistry};
use super::difficulty;
use super::npc::{self, AggressiveNpc, Obstacle};
use super::throws::{self, ParadeFloat};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title/tutorial screen, simulation idle
    Tutorial,
    /// Active gameplay
    Playing,
    /// Run ended (see [`EndReason`] for which way)
    Won,
}

/// How a run reached the terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Target score reached
    Completed,
    /// Run over by parade float
    Eliminated,
    /// No movement input for the inactivity window
    Inactivity,
}

/// Everything a float can throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Beads,
    Doubloon,
    Cup,
    KingCake,
    SpeedBoost,
    DoublePoints,
}

impl CollectibleKind {
    /// The three kinds a player color is drawn from.
    pub const COLOR_KINDS: [CollectibleKind; 3] = [
        CollectibleKind::Beads,
        CollectibleKind::Doubloon,
        CollectibleKind::Cup,
    ];

    /// Regular collectibles count as a miss when they rot on the ground.
    pub fn is_regular(self) -> bool {
        !matches!(
            self,
            CollectibleKind::SpeedBoost | CollectibleKind::DoublePoints
        )
    }

    /// The power-up this kind activates, if it is one.
    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            CollectibleKind::SpeedBoost => Some(PowerUpKind::SpeedBoost),
            CollectibleKind::DoublePoints => Some(PowerUpKind::DoublePoints),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CollectibleKind::Beads => "beads",
            CollectibleKind::Doubloon => "doubloon",
            CollectibleKind::Cup => "cup",
            CollectibleKind::KingCake => "king_cake",
            CollectibleKind::SpeedBoost => "speed_boost",
            CollectibleKind::DoublePoints => "double_points",
        }
    }
}

/// Timed multiplier effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
    DoublePoints,
}

/// An active power-up effect. Re-catching the same kind refreshes the
/// expiry; effects never stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub expires_ms: f64,
}

/// An in-flight or grounded pickup item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec3,
    pub vel: Vec3,
    pub active: bool,
    /// Simulation time of first ground contact; cleared when airborne
    pub grounded_at_ms: Option<f64>,
}

/// Scoreboard entry for one competitor bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotScore {
    pub id: u32,
    pub name: String,
    pub color: String,
    pub catches: u32,
    pub persona: Option<String>,
}

/// A player-owned assistant that pulls nearby collectibles inward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HelperBot {
    pub expires_ms: f64,
}

/// Transient visual records (catch bursts, click markers) modeled as
/// entities with an expiry instead of delayed callbacks, so all cleanup
/// stays inside the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    CatchBurst,
    ClickMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransientEffect {
    pub kind: EffectKind,
    pub pos: Vec3,
    pub expires_ms: f64,
}

/// Cosmetic skins purchasable with coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerSkin {
    #[default]
    Default,
    Golden,
    Rainbow,
    Ghost,
    King,
    Jester,
}

impl PlayerSkin {
    pub fn price(self) -> u32 {
        match self {
            PlayerSkin::Default => 0,
            PlayerSkin::Golden => 100,
            PlayerSkin::Rainbow => 150,
            PlayerSkin::Ghost => 200,
            PlayerSkin::King => 250,
            PlayerSkin::Jester => 200,
        }
    }
}

/// The player's kinematic state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Vec3,
    /// Facing angle (radians), smoothed toward travel direction
    pub heading: f32,
    /// Simulation time of the most recent movement input; `None` until
    /// the player has moved at least once
    pub last_move_ms: Option<f64>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            // Starts behind the center line, out of the parade lane
            pos: Vec3::new(0.0, 0.5, -8.0),
            heading: 0.0,
            last_move_ms: None,
        }
    }
}

/// Complete session state (serializable aggregate root)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance parameters (see [`Tuning`])
    pub tuning: Tuning,
    /// Simulation clock, accumulated from frame deltas (ms)
    pub clock_ms: f64,
    pub phase: GamePhase,
    /// Set when entering the terminal phase
    pub end_reason: Option<EndReason>,
    pub score: u32,
    pub target_score: u32,
    pub level: u32,
    pub combo: u32,
    pub max_combo: u32,
    /// Simulation time of the last successful catch; `None` when there
    /// is no live streak (start of level, broken by an obstacle)
    pub last_catch_ms: Option<f64>,
    pub total_catches: u32,
    /// Regular throws lost to the ground timeout
    pub missed_throws: u32,
    /// Currency earned from catches
    pub coins: u32,
    /// Catching this kind scores triple
    pub player_color: CollectibleKind,
    pub player: PlayerState,
    pub collectibles: Vec<Collectible>,
    pub claims: ClaimRegistry,
    pub active_power_ups: Vec<PowerUp>,
    pub bot_scores: Vec<BotScore>,
    pub bots: Vec<CompetitorBot>,
    pub npcs: Vec<AggressiveNpc>,
    pub obstacles: Vec<Obstacle>,
    pub floats: Vec<ParadeFloat>,
    pub helper_bots: Vec<HelperBot>,
    pub effects: Vec<TransientEffect>,
    pub skin: PlayerSkin,
    pub unlocked_skins: Vec<PlayerSkin>,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session in the tutorial phase.
    pub fn new(seed: u64) -> Self {
        let tuning = Tuning::default();
        Self {
            seed,
            claims: ClaimRegistry::new(tuning.claim_stale_ms),
            tuning,
            clock_ms: 0.0,
            phase: GamePhase::Tutorial,
            end_reason: None,
            score: 0,
            target_score: difficulty::target_score(1),
            level: 1,
            combo: 0,
            max_combo: 0,
            last_catch_ms: None,
            total_catches: 0,
            missed_throws: 0,
            coins: 0,
            player_color: CollectibleKind::Beads,
            player: PlayerState::default(),
            collectibles: Vec::new(),
            active_power_ups: Vec::new(),
            bot_scores: Vec::new(),
            bots: Vec::new(),
            npcs: Vec::new(),
            obstacles: Vec::new(),
            floats: Vec::new(),
            helper_bots: Vec::new(),
            effects: Vec::new(),
            skin: PlayerSkin::Default,
            unlocked_skins: vec![PlayerSkin::Default],
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // === Lifecycle actions ===

    /// Leave the tutorial: roll the player color, seat the roster, and
    /// populate the street for the current level.
    pub fn start_game(&mut self) {
        if self.phase != GamePhase::Tutorial {
            return;
        }
        self.roll_player_color();
        self.bot_scores = bots::roster_scores();
        self.populate_level();
        self.phase = GamePhase::Playing;
        log::info!(
            "game started: color={}, level={}, target={}",
            self.player_color.as_str(),
            self.level,
            self.target_score
        );
    }

    /// Tear the session down to the tutorial screen. Coins and unlocked
    /// skins survive; everything transient is dropped atomically so no
    /// claim or collectible bleeds into the next run.
    pub fn reset_game(&mut self) {
        self.phase = GamePhase::Tutorial;
        self.end_reason = None;
        self.score = 0;
        self.level = 1;
        self.target_score = difficulty::target_score(1);
        self.combo = 0;
        self.max_combo = 0;
        self.last_catch_ms = None;
        self.total_catches = 0;
        self.missed_throws = 0;
        self.player = PlayerState::default();
        self.roll_player_color();
        self.clear_transient();
        self.bot_scores.clear();
        self.bots.clear();
        self.npcs.clear();
        self.obstacles.clear();
        self.floats.clear();
        self.helper_bots.clear();
        self.active_power_ups.clear();
        log::info!("game reset");
    }

    /// Advance to the next level: strictly increasing level, recomputed
    /// target, cleared street.
    pub fn next_level(&mut self) {
        if self.phase == GamePhase::Tutorial {
            return;
        }
        self.level += 1;
        self.target_score = difficulty::target_score(self.level);
        self.score = 0;
        self.combo = 0;
        self.last_catch_ms = None;
        self.end_reason = None;
        self.clear_transient();
        // Scoreboard restarts each level
        for entry in &mut self.bot_scores {
            entry.catches = 0;
        }
        self.populate_level();
        self.phase = GamePhase::Playing;
        log::info!(
            "level {}: target={}, obstacles={}, npcs={}",
            self.level,
            self.target_score,
            difficulty::obstacle_count(self.level),
            difficulty::npc_count(self.level)
        );
    }

    /// Run over by a parade float.
    pub fn eliminate_player(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::Won;
        self.end_reason = Some(EndReason::Eliminated);
        log::info!("player eliminated by float");
    }

    /// 30 s (tunable) without movement input ends the run.
    pub fn end_game_due_to_inactivity(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::Won;
        self.end_reason = Some(EndReason::Inactivity);
        log::info!("game ended due to inactivity");
    }

    // === Scoring ===

    /// Register a player catch: combo bookkeeping, color-match bonus,
    /// double-points multiplier, coin reward, and the win transition —
    /// all in one update so no observer sees score past target while
    /// still playing.
    pub fn add_catch(&mut self, kind: Option<CollectibleKind>, bypass_multiplier: bool) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let now = self.clock_ms;
        let in_window = self
            .last_catch_ms
            .is_some_and(|last| now - last < self.tuning.combo_window_ms);
        self.combo = if in_window { self.combo + 1 } else { 1 };
        self.max_combo = self.max_combo.max(self.combo);
        self.last_catch_ms = Some(now);

        let color_match = kind == Some(self.player_color);
        let mut points: u32 = if color_match { 3 } else { 1 };
        if !bypass_multiplier && self.has_active_power_up(PowerUpKind::DoublePoints) {
            points *= 2;
        }
        self.score += points;
        self.total_catches += 1;

        // 1 coin per catch, plus a streak bonus from combo 3 up
        let coin_reward = if self.combo >= 3 { 1 + self.combo / 3 } else { 1 };
        self.coins += coin_reward;

        log::debug!(
            "catch: +{} = {}/{}, combo {}x{}",
            points,
            self.score,
            self.target_score,
            self.combo,
            if color_match { " (color match)" } else { "" }
        );

        if self.score >= self.target_score {
            self.phase = GamePhase::Won;
            self.end_reason = Some(EndReason::Completed);
            log::info!("level {} cleared with {} catches", self.level, self.total_catches);
        }
    }

    /// Full catch dispatch for an item the player grabbed: power-ups
    /// activate instead of scoring, king cake pays a flat 5 points past
    /// every multiplier, everything else goes through [`add_catch`].
    ///
    /// [`add_catch`]: GameState::add_catch
    pub fn apply_catch(&mut self, kind: CollectibleKind) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if let Some(power_up) = kind.power_up() {
            self.activate_power_up(power_up);
        } else if kind == CollectibleKind::KingCake {
            for _ in 0..5 {
                self.add_catch(None, true);
            }
        } else {
            self.add_catch(Some(kind), false);
        }
        let pos = self.player.pos;
        self.push_effect(EffectKind::CatchBurst, pos);
    }

    /// A regular throw rotted on the ground. Every third miss the bots
    /// take pity and gift a point — never the winning one.
    pub fn increment_misses(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.missed_throws += 1;
        if self.missed_throws >= 3 {
            self.missed_throws = 0;
            self.score = (self.score + 1).min(self.target_score.saturating_sub(1));
            log::debug!("bot gift: three misses converted to a point");
        }
    }

    /// Obstacle contact breaks the streak without touching the score.
    pub fn register_obstacle_hit(&mut self) {
        if self.phase != GamePhase::Playing || self.combo == 0 {
            return;
        }
        self.combo = 0;
        self.last_catch_ms = None;
        log::debug!("obstacle hit, combo broken");
    }

    // === Collectibles ===

    /// Spawn a collectible and return its id.
    pub fn add_collectible(&mut self, kind: CollectibleKind, pos: Vec3, vel: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.collectibles.push(Collectible {
            id,
            kind,
            pos,
            vel,
            active: true,
            grounded_at_ms: None,
        });
        id
    }

    /// Overwrite a collectible's kinematic state (no-op if removed).
    pub fn update_collectible(&mut self, id: u32, pos: Vec3, vel: Vec3) {
        if let Some(c) = self.collectibles.iter_mut().find(|c| c.id == id) {
            c.pos = pos;
            c.vel = vel;
        }
    }

    /// Remove a collectible and drop any claim on it. Once removed there
    /// is no resurrection: later updates for the id are ignored.
    pub fn remove_collectible(&mut self, id: u32) -> bool {
        let before = self.collectibles.len();
        self.collectibles.retain(|c| c.id != id);
        self.claims.release(id);
        self.collectibles.len() != before
    }

    // === Claims (delegated; the registry is the source of truth) ===

    pub fn claim_collectible(&mut self, collectible_id: u32, bot_id: u32) -> bool {
        let now = self.clock_ms;
        self.claims.claim(collectible_id, bot_id, now)
    }

    pub fn release_collectible_claim(&mut self, collectible_id: u32) {
        self.claims.release(collectible_id);
    }

    pub fn get_collectible_claim(&self, collectible_id: u32) -> Option<&Claim> {
        self.claims.get(collectible_id)
    }

    // === Bots ===

    /// Credit a competitor bot with a catch.
    pub fn add_bot_catch(&mut self, bot_id: u32) {
        if let Some(entry) = self.bot_scores.iter_mut().find(|b| b.id == bot_id) {
            entry.catches += 1;
            log::debug!("{} caught one ({} total)", entry.name, entry.catches);
        }
    }

    // === Power-ups and helpers ===

    /// Activate (or refresh — never stack) a timed power-up.
    pub fn activate_power_up(&mut self, kind: PowerUpKind) {
        let expires_ms = self.clock_ms + self.tuning.power_up_ms;
        self.active_power_ups.retain(|p| p.kind != kind);
        self.active_power_ups.push(PowerUp { kind, expires_ms });
        log::debug!("power-up {:?} active until {:.0}ms", kind, expires_ms);
    }

    pub fn has_active_power_up(&self, kind: PowerUpKind) -> bool {
        self.active_power_ups
            .iter()
            .any(|p| p.kind == kind && p.expires_ms > self.clock_ms)
    }

    /// Movement boost while the speed power-up runs.
    pub fn move_speed_multiplier(&self) -> f32 {
        if self.has_active_power_up(PowerUpKind::SpeedBoost) {
            1.5
        } else {
            1.0
        }
    }

    /// Spawn a helper bot for `duration_ms`. Helpers widen and
    /// strengthen the attraction field around the player.
    pub fn spawn_helper_bot(&mut self, duration_ms: f64) {
        let expires_ms = self.clock_ms + duration_ms;
        self.helper_bots.push(HelperBot { expires_ms });
    }

    /// Live helper bots (expired ones are pruned each tick but the count
    /// query filters anyway so mid-tick reads stay honest).
    pub fn helper_bot_count(&self) -> usize {
        self.helper_bots
            .iter()
            .filter(|h| h.expires_ms > self.clock_ms)
            .count()
    }

    // === Cosmetics and currency ===

    pub fn add_coins(&mut self, amount: u32) {
        self.coins += amount;
    }

    /// Buy and equip a skin. Fails (returns false) when already owned or
    /// unaffordable.
    pub fn purchase_skin(&mut self, skin: PlayerSkin) -> bool {
        if self.unlocked_skins.contains(&skin) {
            return false;
        }
        let price = skin.price();
        if self.coins < price {
            return false;
        }
        self.coins -= price;
        self.unlocked_skins.push(skin);
        self.skin = skin;
        true
    }

    /// Equip an owned skin.
    pub fn set_skin(&mut self, skin: PlayerSkin) -> bool {
        if !self.unlocked_skins.contains(&skin) {
            return false;
        }
        self.skin = skin;
        true
    }

    // === Hazards ===

    /// Player bumped a wandering NPC: it chases for a fixed window and
    /// the streak breaks.
    pub fn hit_aggressive_npc(&mut self, npc_id: u32) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let chase_until = self.clock_ms + self.tuning.npc_chase_ms;
        if let Some(n) = self.npcs.iter_mut().find(|n| n.id == npc_id)
            && !n.is_chasing()
        {
            n.chase_until_ms = Some(chase_until);
            self.combo = 0;
            log::debug!("NPC {} provoked, chasing", npc_id);
        }
    }

    /// A chasing NPC caught the player: one point gone, chase over.
    pub fn npc_hit_player(&mut self, npc_id: u32) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if let Some(n) = self.npcs.iter_mut().find(|n| n.id == npc_id) {
            n.chase_until_ms = None;
            self.score = self.score.saturating_sub(1);
            log::debug!("NPC {} caught the player, -1 point", npc_id);
        }
    }

    // === Effects ===

    /// Record a transient effect; pruned once its expiry passes.
    pub fn push_effect(&mut self, kind: EffectKind, pos: Vec3) {
        let expires_ms = self.clock_ms + self.tuning.effect_ttl_ms;
        self.effects.push(TransientEffect {
            kind,
            pos,
            expires_ms,
        });
    }

    /// Drop a click marker where the player tapped to move.
    pub fn add_click_marker(&mut self, pos: Vec3) {
        self.push_effect(EffectKind::ClickMarker, pos);
    }

    // === Derived queries ===

    pub fn float_speed(&self) -> f32 {
        difficulty::float_speed(self.level)
    }

    pub fn throw_interval_ms(&self) -> f64 {
        difficulty::throw_interval_ms(self.level)
    }

    pub fn obstacle_count(&self, level: u32) -> usize {
        difficulty::obstacle_count(level)
    }

    // === Internals ===

    fn roll_player_color(&mut self) {
        let idx = self.rng.random_range(0..CollectibleKind::COLOR_KINDS.len());
        self.player_color = CollectibleKind::COLOR_KINDS[idx];
    }

    /// Atomically drop everything scoped to the current street: items,
    /// claims, effects, and each bot's cached target.
    fn clear_transient(&mut self) {
        self.collectibles.clear();
        self.claims.clear();
        self.effects.clear();
        for bot in &mut self.bots {
            bot.target = None;
        }
    }

    /// Spawn bots, NPCs, obstacles, and the parade for the current level.
    fn populate_level(&mut self) {
        let level = self.level;
        let clock = self.clock_ms;
        self.bots = bots::spawn_active(level, &mut self.rng);
        self.npcs = npc::spawn_npcs(difficulty::npc_count(level), &mut self.rng);
        self.obstacles = npc::spawn_obstacles(difficulty::obstacle_count(level), &mut self.rng);
        self.floats = throws::spawn_parade(difficulty::float_count(level), clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state() -> GameState {
        let mut state = GameState::new(42);
        state.start_game();
        state
    }

    #[test]
    fn test_start_game_populates_street() {
        let state = playing_state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.bot_scores.len(), bots::roster_len());
        assert_eq!(state.bots.len(), 2); // level 1 reveals two competitors
        assert!(state.npcs.is_empty()); // tutorial level has no NPCs
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.floats.len(), 10);
        assert!(CollectibleKind::COLOR_KINDS.contains(&state.player_color));
    }

    #[test]
    fn test_start_game_only_from_tutorial() {
        let mut state = playing_state();
        state.score = 3;
        state.start_game();
        assert_eq!(state.score, 3); // untouched, call was a no-op
    }

    #[test]
    fn test_combo_continuity() {
        let mut state = playing_state();
        state.clock_ms = 0.0;
        state.add_catch(None, false);
        assert_eq!(state.combo, 1);
        state.clock_ms = 1000.0;
        state.add_catch(None, false);
        assert_eq!(state.combo, 2);
        state.clock_ms = 2500.0;
        state.add_catch(None, false);
        assert_eq!(state.combo, 3);
        // Window elapsed: streak restarts
        state.clock_ms = 6000.0;
        state.add_catch(None, false);
        assert_eq!(state.combo, 1);
        assert_eq!(state.max_combo, 3);
    }

    #[test]
    fn test_win_boundary_exact() {
        let mut state = playing_state();
        state.score = state.target_score - 1;
        state.add_catch(None, false);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.end_reason, Some(EndReason::Completed));
        assert_eq!(state.score, state.target_score);
        // Terminal phase: further catches are no-ops
        let score = state.score;
        state.add_catch(None, false);
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_color_match_triples() {
        let mut state = playing_state();
        state.player_color = CollectibleKind::Cup;
        state.add_catch(Some(CollectibleKind::Cup), false);
        assert_eq!(state.score, 3);
        state.add_catch(Some(CollectibleKind::Beads), false);
        assert_eq!(state.score, 4);
    }

    #[test]
    fn test_double_points_multiplier_and_bypass() {
        let mut state = playing_state();
        state.player_color = CollectibleKind::Cup;
        state.activate_power_up(PowerUpKind::DoublePoints);
        state.add_catch(Some(CollectibleKind::Beads), false);
        assert_eq!(state.score, 2);
        state.add_catch(Some(CollectibleKind::Beads), true);
        assert_eq!(state.score, 3); // bypass ignores the multiplier
        // Color match and double points compound
        state.add_catch(Some(CollectibleKind::Cup), false);
        assert_eq!(state.score, 9);
    }

    #[test]
    fn test_king_cake_flat_five() {
        let mut state = playing_state();
        state.player_color = CollectibleKind::Cup;
        state.activate_power_up(PowerUpKind::DoublePoints);
        state.apply_catch(CollectibleKind::KingCake);
        // Five bypassing increments, no color/multiplier interaction
        assert_eq!(state.score, 5);
        assert_eq!(state.total_catches, 5);
    }

    #[test]
    fn test_power_up_refreshes_not_stacks() {
        let mut state = playing_state();
        state.clock_ms = 1000.0;
        state.activate_power_up(PowerUpKind::SpeedBoost);
        state.clock_ms = 5000.0;
        state.activate_power_up(PowerUpKind::SpeedBoost);
        assert_eq!(state.active_power_ups.len(), 1);
        assert_eq!(state.active_power_ups[0].expires_ms, 13_000.0);
        assert!(state.has_active_power_up(PowerUpKind::SpeedBoost));
        state.clock_ms = 13_500.0;
        assert!(!state.has_active_power_up(PowerUpKind::SpeedBoost));
    }

    #[test]
    fn test_move_speed_multiplier() {
        let mut state = playing_state();
        assert_eq!(state.move_speed_multiplier(), 1.0);
        state.activate_power_up(PowerUpKind::SpeedBoost);
        assert_eq!(state.move_speed_multiplier(), 1.5);
    }

    #[test]
    fn test_obstacle_hit_breaks_combo_only() {
        let mut state = playing_state();
        state.add_catch(None, false);
        let score = state.score;
        state.register_obstacle_hit();
        assert_eq!(state.combo, 0);
        assert_eq!(state.last_catch_ms, None);
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_bot_gift_every_third_miss() {
        let mut state = playing_state();
        state.increment_misses();
        state.increment_misses();
        assert_eq!(state.score, 0);
        assert_eq!(state.missed_throws, 2);
        state.increment_misses();
        assert_eq!(state.score, 1);
        assert_eq!(state.missed_throws, 0);
    }

    #[test]
    fn test_bot_gift_never_wins() {
        let mut state = playing_state();
        state.score = state.target_score - 1;
        state.missed_throws = 2;
        state.increment_misses();
        assert_eq!(state.score, state.target_score - 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_remove_collectible_drops_claim() {
        let mut state = playing_state();
        let id = state.add_collectible(CollectibleKind::Beads, Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO);
        assert!(state.claim_collectible(id, 0));
        assert!(state.remove_collectible(id));
        assert!(state.get_collectible_claim(id).is_none());
        // Second removal reports nothing removed
        assert!(!state.remove_collectible(id));
    }

    #[test]
    fn test_next_level_resets_street_and_scoreboard() {
        let mut state = playing_state();
        let _ = state.add_collectible(CollectibleKind::Beads, Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO);
        state.add_bot_catch(0);
        state.score = state.target_score;
        state.phase = GamePhase::Won;

        state.next_level();
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.target_score, difficulty::target_score(2));
        assert!(state.collectibles.is_empty());
        assert!(state.claims.is_empty());
        assert!(state.bot_scores.iter().all(|b| b.catches == 0));
        assert_eq!(state.floats.len(), 20);
    }

    #[test]
    fn test_reset_keeps_wallet_and_skins() {
        let mut state = playing_state();
        state.coins = 500;
        assert!(state.purchase_skin(PlayerSkin::Golden));
        let _ = state.add_collectible(CollectibleKind::Cup, Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO);
        state.reset_game();
        assert_eq!(state.phase, GamePhase::Tutorial);
        assert_eq!(state.level, 1);
        assert!(state.collectibles.is_empty());
        assert!(state.claims.is_empty());
        assert!(state.bots.is_empty());
        assert_eq!(state.coins, 400);
        assert!(state.unlocked_skins.contains(&PlayerSkin::Golden));
        assert_eq!(state.skin, PlayerSkin::Golden);
    }

    #[test]
    fn test_purchase_skin_rules() {
        let mut state = playing_state();
        state.coins = 120;
        assert!(state.purchase_skin(PlayerSkin::Golden)); // costs 100
        assert_eq!(state.coins, 20);
        assert_eq!(state.skin, PlayerSkin::Golden);
        assert!(!state.purchase_skin(PlayerSkin::Golden)); // already owned
        assert!(!state.purchase_skin(PlayerSkin::King)); // can't afford
        assert_eq!(state.coins, 20);
        assert!(state.set_skin(PlayerSkin::Default));
        assert!(!state.set_skin(PlayerSkin::Jester)); // not owned
    }

    #[test]
    fn test_npc_chase_round_trip() {
        let mut state = playing_state();
        state.level = 2;
        state.npcs = npc::spawn_npcs(1, &mut state.rng);
        let npc_id = state.npcs[0].id;
        state.combo = 4;

        state.hit_aggressive_npc(npc_id);
        assert!(state.npcs[0].is_chasing());
        assert_eq!(state.combo, 0);

        state.score = 3;
        state.npc_hit_player(npc_id);
        assert!(!state.npcs[0].is_chasing());
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_terminal_actions_only_while_playing() {
        let mut state = GameState::new(1);
        // Tutorial: nothing to end
        state.eliminate_player();
        assert_eq!(state.phase, GamePhase::Tutorial);
        state.start_game();
        state.end_game_due_to_inactivity();
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.end_reason, Some(EndReason::Inactivity));
        // Already terminal: elimination doesn't overwrite the reason
        state.eliminate_player();
        assert_eq!(state.end_reason, Some(EndReason::Inactivity));
    }

    #[test]
    fn test_helper_bots_expire() {
        let mut state = playing_state();
        state.clock_ms = 1000.0;
        state.spawn_helper_bot(10_000.0);
        state.spawn_helper_bot(2000.0);
        assert_eq!(state.helper_bot_count(), 2);
        state.clock_ms = 4000.0;
        assert_eq!(state.helper_bot_count(), 1);
    }

    #[test]
    fn test_state_serializes_round_trip() {
        let mut state = playing_state();
        let _ = state.add_collectible(CollectibleKind::Doubloon, Vec3::new(1.0, 2.0, 3.0), Vec3::Y);
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.phase, state.phase);
        assert_eq!(back.collectibles, state.collectibles);
        assert_eq!(back.level, state.level);
    }
}
