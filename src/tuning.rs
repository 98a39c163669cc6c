//! Data-driven game balance
//!
//! Timing windows and behavioral knobs that were tuned by playtest rather
//! than derived from any invariant. They ship with defaults but can be
//! overridden from JSON by the embedding shell.

use serde::{Deserialize, Serialize};

/// Tunable balance parameters, all durations in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tuning {
    /// Rolling window for consecutive-catch combos
    pub combo_window_ms: f64,
    /// How long a just-landed item stays catchable off the ground
    pub ground_grace_ms: f64,
    /// How long a landed item may sit uncaught before it expires
    pub ground_timeout_ms: f64,
    /// No movement input for this long ends the session
    pub inactivity_timeout_ms: f64,
    /// Duration of a caught power-up effect
    pub power_up_ms: f64,
    /// How long an aggressive NPC chases after being bumped
    pub npc_chase_ms: f64,
    /// Claim age beyond which any bot may pre-empt it
    pub claim_stale_ms: f64,
    /// Lifetime of transient visual effect records
    pub effect_ttl_ms: f64,
    /// Per-obstacle cooldown between combo-breaking hits
    pub obstacle_hit_cooldown_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            combo_window_ms: 3000.0,
            ground_grace_ms: 1000.0,
            ground_timeout_ms: 5000.0,
            inactivity_timeout_ms: 30_000.0,
            power_up_ms: 8000.0,
            npc_chase_ms: 5000.0,
            claim_stale_ms: 2000.0,
            effect_ttl_ms: 1100.0,
            obstacle_hit_cooldown_ms: 1000.0,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON; missing fields keep their defaults,
    /// malformed input falls back to the defaults entirely.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("bad tuning override, using defaults: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_balance() {
        let t = Tuning::default();
        assert_eq!(t.combo_window_ms, 3000.0);
        assert_eq!(t.ground_grace_ms, 1000.0);
        assert_eq!(t.ground_timeout_ms, 5000.0);
        assert_eq!(t.inactivity_timeout_ms, 30_000.0);
        assert_eq!(t.claim_stale_ms, 2000.0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let t = Tuning::from_json(r#"{"combo_window_ms": 4500.0}"#);
        assert_eq!(t.combo_window_ms, 4500.0);
        assert_eq!(t.ground_timeout_ms, 5000.0);
    }

    #[test]
    fn test_malformed_override_falls_back() {
        let t = Tuning::from_json("not json");
        assert_eq!(t, Tuning::default());
    }
}
