//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! synchronous:
//! - One tick per rendered frame, fed the elapsed delta
//! - Seeded RNG only
//! - Every pass completes inside the tick; no suspension points
//! - No rendering, audio, or network dependencies

pub mod bots;
pub mod claims;
pub mod difficulty;
pub mod npc;
pub mod physics;
pub mod state;
pub mod throws;
pub mod tick;

pub use bots::CompetitorBot;
pub use claims::{Claim, ClaimRegistry};
pub use npc::{AggressiveNpc, Obstacle, ObstacleKind};
pub use physics::{Catchability, StepOutcome, predict_landing};
pub use state::{
    BotScore, Collectible, CollectibleKind, EffectKind, EndReason, GamePhase, GameState,
    HelperBot, PlayerSkin, PlayerState, PowerUp, PowerUpKind, TransientEffect,
};
pub use throws::ParadeFloat;
pub use tick::{TickInput, tick};
