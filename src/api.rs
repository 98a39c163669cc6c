//! Boundary shapes for the persistence collaborators
//!
//! The HTTP layer itself lives outside this crate; these are the payloads
//! it exchanges, plus the fire-and-forget seam the game pushes scores
//! through. Nothing here may block or fail into a simulation tick: sink
//! errors are logged at this boundary and swallowed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// `POST /api/leaderboard/submit` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitScore {
    pub name: String,
    pub score: u32,
}

/// One row of the remote leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    /// Unix timestamp (ms) the score was submitted
    pub ts: f64,
}

/// `GET /api/leaderboard?top=N` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub ok: bool,
    pub scores: Vec<LeaderboardEntry>,
}

/// `POST /api/session/save` request body / `GET /api/session/:id` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: String,
    /// Unix timestamp (ms) the snapshot was taken
    pub saved_at_ms: f64,
    pub state: GameState,
}

/// `GET /api/health` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: f64,
    pub env: String,
}

/// Why a submission could not be delivered.
#[derive(Debug)]
pub enum SinkError {
    /// Transport failed (network down, endpoint gone)
    Transport(String),
    /// Payload could not be encoded
    Encoding(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Transport(msg) => write!(f, "transport error: {}", msg),
            SinkError::Encoding(msg) => write!(f, "encoding error: {}", msg),
        }
    }
}

impl std::error::Error for SinkError {}

/// Where finished-run scores get pushed. Implementations deliver
/// best-effort; the caller treats every submission as fire-and-forget.
pub trait ScoreSink {
    fn submit(&mut self, score: &SubmitScore) -> Result<(), SinkError>;
}

/// Sink that drops everything (offline play, tests).
#[derive(Debug, Default)]
pub struct NullSink;

impl ScoreSink for NullSink {
    fn submit(&mut self, _score: &SubmitScore) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Push a finished run at a sink, absorbing failure. This is the only
/// call site shape the game loop is allowed to use: errors stop here.
pub fn submit_score_fire_and_forget(sink: &mut dyn ScoreSink, score: SubmitScore) {
    if let Err(e) = sink.submit(&score) {
        log::warn!("leaderboard submit failed (ignored): {}", e);
    }
}
