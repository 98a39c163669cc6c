//! Claim arbitration between competitor bots
//!
//! A shared lease table keeping two bots from chasing the same collectible.
//! The registry is the single source of truth: bots cache only the id of
//! the item they believe they hold and must re-validate through [`get`]
//! every tick. Contested claims resolve last-writer-wins within a tick;
//! iteration order deciding the winner is accepted, not a bug.
//!
//! [`get`]: ClaimRegistry::get

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A lease held by one bot over one collectible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Roster index of the holding bot
    pub bot_id: u32,
    /// Simulation time the claim was taken (or last refreshed)
    pub claimed_at_ms: f64,
}

/// Lease table keyed by collectible id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRegistry {
    claims: HashMap<u32, Claim>,
    /// Claims older than this may be pre-empted by any bot
    stale_after_ms: f64,
}

impl ClaimRegistry {
    pub fn new(stale_after_ms: f64) -> Self {
        Self {
            claims: HashMap::new(),
            stale_after_ms,
        }
    }

    /// Try to take (or refresh) a claim. Succeeds when the item is
    /// unclaimed, the existing claim is stale, or the existing claim
    /// already belongs to `bot_id`. A `false` return is routine: the
    /// caller must pick another target.
    pub fn claim(&mut self, collectible_id: u32, bot_id: u32, now_ms: f64) -> bool {
        if let Some(existing) = self.claims.get(&collectible_id)
            && existing.bot_id != bot_id
            && !self.is_stale(existing, now_ms)
        {
            return false;
        }
        let _ = self.claims.insert(
            collectible_id,
            Claim {
                bot_id,
                claimed_at_ms: now_ms,
            },
        );
        true
    }

    /// Drop the claim on a collectible, if any.
    pub fn release(&mut self, collectible_id: u32) {
        let _ = self.claims.remove(&collectible_id);
    }

    /// Current claim for a collectible. Callers judge staleness with
    /// [`is_stale`]; a stale claim is still reported until overwritten.
    ///
    /// [`is_stale`]: ClaimRegistry::is_stale
    pub fn get(&self, collectible_id: u32) -> Option<&Claim> {
        self.claims.get(&collectible_id)
    }

    /// Whether a claim has aged past the pre-emption threshold.
    pub fn is_stale(&self, claim: &Claim, now_ms: f64) -> bool {
        now_ms - claim.claimed_at_ms >= self.stale_after_ms
    }

    /// Whether `bot_id` holds a live claim on the collectible.
    pub fn held_by(&self, collectible_id: u32, bot_id: u32) -> bool {
        self.claims
            .get(&collectible_id)
            .is_some_and(|c| c.bot_id == bot_id)
    }

    /// Clear every claim. Level transitions and resets call this so no
    /// lease outlives the collectibles it referred to.
    pub fn clear(&mut self) {
        self.claims.clear();
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl Default for ClaimRegistry {
    fn default() -> Self {
        Self::new(crate::tuning::Tuning::default().claim_stale_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT_A: u32 = 0;
    const BOT_B: u32 = 1;

    #[test]
    fn test_claim_exclusivity() {
        let mut reg = ClaimRegistry::new(2000.0);
        assert!(reg.claim(7, BOT_A, 1000.0));
        // Second bot inside the staleness window: denied, holder unchanged
        assert!(!reg.claim(7, BOT_B, 1500.0));
        assert_eq!(reg.get(7).unwrap().bot_id, BOT_A);
    }

    #[test]
    fn test_stale_claim_reclaimed() {
        let mut reg = ClaimRegistry::new(2000.0);
        assert!(reg.claim(7, BOT_A, 1000.0));
        // Exactly at the threshold the claim is up for grabs
        assert!(reg.claim(7, BOT_B, 3000.0));
        assert_eq!(reg.get(7).unwrap().bot_id, BOT_B);
    }

    #[test]
    fn test_reclaim_by_holder_refreshes() {
        let mut reg = ClaimRegistry::new(2000.0);
        assert!(reg.claim(7, BOT_A, 1000.0));
        assert!(reg.claim(7, BOT_A, 2500.0));
        let claim = *reg.get(7).unwrap();
        assert_eq!(claim.claimed_at_ms, 2500.0);
        // Refresh restarted the staleness window
        assert!(!reg.claim(7, BOT_B, 3500.0));
    }

    #[test]
    fn test_release_frees_target() {
        let mut reg = ClaimRegistry::new(2000.0);
        assert!(reg.claim(7, BOT_A, 1000.0));
        reg.release(7);
        assert!(reg.get(7).is_none());
        assert!(reg.claim(7, BOT_B, 1001.0));
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut reg = ClaimRegistry::new(2000.0);
        assert!(reg.claim(1, BOT_A, 0.0));
        assert!(reg.claim(2, BOT_B, 0.0));
        reg.clear();
        assert!(reg.is_empty());
    }

    #[test]
    fn test_held_by() {
        let mut reg = ClaimRegistry::new(2000.0);
        assert!(reg.claim(3, BOT_A, 0.0));
        assert!(reg.held_by(3, BOT_A));
        assert!(!reg.held_by(3, BOT_B));
        assert!(!reg.held_by(4, BOT_A));
    }
}
