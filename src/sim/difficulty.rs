//! Level progression curves
//!
//! Pure functions from the current level to gameplay parameters. Every
//! curve is monotonic in level, so a later level is never easier.

/// Parade float speed in units/s.
pub fn float_speed(level: u32) -> f32 {
    2.0 + level.saturating_sub(1) as f32 * 0.3
}

/// Milliseconds between throws for each float, floored at 1.5 s.
pub fn throw_interval_ms(level: u32) -> f64 {
    (3000.0 - level.saturating_sub(1) as f64 * 200.0).max(1500.0)
}

/// Catches-worth of points needed to clear the level.
pub fn target_score(level: u32) -> u32 {
    5 + level.saturating_sub(1) * 2
}

/// Street obstacles: sparse while the player is learning, then one more
/// every other level.
pub fn obstacle_count(level: u32) -> usize {
    match level {
        0 | 1 => 1,
        2 | 3 => 2,
        l => 2 + ((l - 3) / 2) as usize,
    }
}

/// Competitor bots revealed from the roster at this level.
pub fn active_bot_count(level: u32, roster_size: usize) -> usize {
    let n = match level {
        0 | 1 | 2 => 2,
        3 => 3,
        4 => 4,
        5 => 5,
        _ => 6,
    };
    n.min(roster_size)
}

/// Aggressive NPCs on the street: none in the tutorial level, a gentle
/// introduction through level 3, then ramping.
pub fn npc_count(level: u32) -> usize {
    match level {
        0 | 1 => 0,
        2 | 3 => 1,
        l => ((l - 2) / 2 + 1) as usize,
    }
}

/// Floats in the parade for this level.
pub fn float_count(level: u32) -> usize {
    (level.max(1) * 10) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_speed_curve() {
        assert_eq!(float_speed(1), 2.0);
        assert!((float_speed(4) - 2.9).abs() < 1e-6);
        assert!((float_speed(11) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_throw_interval_floor() {
        assert_eq!(throw_interval_ms(1), 3000.0);
        assert_eq!(throw_interval_ms(5), 2200.0);
        // Hits the floor at level 8-and-a-half and stays there
        assert_eq!(throw_interval_ms(9), 1500.0);
        assert_eq!(throw_interval_ms(50), 1500.0);
    }

    #[test]
    fn test_target_score_curve() {
        assert_eq!(target_score(1), 5);
        assert_eq!(target_score(2), 7);
        assert_eq!(target_score(10), 23);
    }

    #[test]
    fn test_counts_monotonic() {
        for level in 1..40 {
            assert!(obstacle_count(level + 1) >= obstacle_count(level));
            assert!(npc_count(level + 1) >= npc_count(level));
            assert!(active_bot_count(level + 1, 6) >= active_bot_count(level, 6));
            assert!(float_speed(level + 1) >= float_speed(level));
            assert!(throw_interval_ms(level + 1) <= throw_interval_ms(level));
        }
    }

    #[test]
    fn test_bot_count_respects_roster() {
        assert_eq!(active_bot_count(1, 6), 2);
        assert_eq!(active_bot_count(4, 6), 4);
        assert_eq!(active_bot_count(9, 6), 6);
        assert_eq!(active_bot_count(9, 4), 4);
    }

    #[test]
    fn test_npc_count_tutorial_is_safe() {
        assert_eq!(npc_count(1), 0);
        assert_eq!(npc_count(2), 1);
        assert_eq!(npc_count(3), 1);
        assert_eq!(npc_count(4), 2);
        assert_eq!(npc_count(6), 3);
    }
}
