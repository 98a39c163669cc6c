//! Projectile physics for thrown collectibles
//!
//! Semi-implicit Euler integration with a damped ground bounce, a
//! helper-bot attraction field, catch classification, and the advisory
//! landing prediction used by the trajectory hint.

use glam::Vec3;

use super::state::Collectible;
use crate::consts::*;
use crate::tuning::Tuning;

/// What a physics step concluded about one collectible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still flying
    Airborne,
    /// Resting (or skidding) on the ground
    Grounded,
    /// Sat on the ground past the residency timeout
    Expired,
    /// Left the playable volume
    OutOfBounds,
}

/// Catch classification for one collectible relative to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catchability {
    /// Too far, too high, or the ground grace window has lapsed
    No,
    /// Close enough to catch with a deliberate action
    InRange,
    /// So close the catch happens automatically this tick
    Auto,
}

/// Advance one collectible by `dt` seconds.
///
/// Integration is semi-implicit Euler: gravity into velocity first, then
/// velocity into position, which keeps the bounce stable at large frame
/// deltas.
pub fn step_collectible(c: &mut Collectible, dt: f32, now_ms: f64, tuning: &Tuning) -> StepOutcome {
    c.vel.y += GRAVITY * dt;
    c.pos += c.vel * dt;

    if c.pos.y <= GROUND_Y {
        c.pos.y = GROUND_Y;

        if c.grounded_at_ms.is_none() {
            c.grounded_at_ms = Some(now_ms);
        }
        if let Some(grounded_at) = c.grounded_at_ms
            && now_ms - grounded_at > tuning.ground_timeout_ms
        {
            return StepOutcome::Expired;
        }

        if c.vel.y.abs() > BOUNCE_MIN_SPEED {
            c.vel.y = -c.vel.y * BOUNCE_RETENTION;
        } else {
            c.vel.y = 0.0;
        }
        c.vel.x *= GROUND_FRICTION;
        c.vel.z *= GROUND_FRICTION;
    } else {
        c.grounded_at_ms = None;
    }

    if c.pos.y < DESPAWN_MIN_Y || c.pos.x.abs() > DESPAWN_MAX_X || c.pos.z.abs() > DESPAWN_MAX_Z {
        return StepOutcome::OutOfBounds;
    }

    if c.grounded_at_ms.is_some() {
        StepOutcome::Grounded
    } else {
        StepOutcome::Airborne
    }
}

/// Helper-bot attraction: items near the player drift toward them.
///
/// Each helper widens the radius and strengthens the pull; the resulting
/// speed is capped so attracted items stay catchable rather than whipping
/// past the player.
pub fn apply_attraction(c: &mut Collectible, player_pos: Vec3, helper_bots: usize, dt: f32) {
    if helper_bots == 0 {
        return;
    }
    let radius = 6.0 + helper_bots as f32 * 2.0;
    let offset = player_pos - c.pos;
    let dist = offset.length();
    if dist <= f32::EPSILON || dist >= radius {
        return;
    }
    let strength = 4.0 * helper_bots as f32 * (1.0 - dist / radius);
    c.vel += offset / dist * strength * dt;

    let speed = c.vel.length();
    if speed > ATTRACTION_MAX_SPEED {
        c.vel = c.vel / speed * ATTRACTION_MAX_SPEED;
    }
}

/// Classify how catchable a collectible is right now.
///
/// Catchable means inside [`CATCH_RADIUS`] and either airborne at grab
/// height or recently landed (the ground grace window). Inside
/// [`AUTO_CATCH_RADIUS`] the catch is immediate and deterministic.
pub fn catchability(
    c: &Collectible,
    player_pos: Vec3,
    now_ms: f64,
    tuning: &Tuning,
) -> Catchability {
    let dist = c.pos.distance(player_pos);
    if dist >= CATCH_RADIUS {
        return Catchability::No;
    }

    let airborne_window = c.grounded_at_ms.is_none()
        && c.pos.y >= MIN_CATCH_HEIGHT
        && c.pos.y < MAX_CATCH_HEIGHT;
    let ground_grace = c
        .grounded_at_ms
        .is_some_and(|t| now_ms - t <= tuning.ground_grace_ms);

    if !(airborne_window || ground_grace) {
        return Catchability::No;
    }

    if dist < AUTO_CATCH_RADIUS {
        Catchability::Auto
    } else {
        Catchability::InRange
    }
}

/// Predict where a throw lands, from its release position and velocity.
///
/// Solves `0.5*g*t² + vy*t + (y0 - ground) = 0` for the positive root and
/// projects x/z at that time. Advisory only (trajectory display); with no
/// real positive root the current position is the safe fallback.
pub fn predict_landing(pos: Vec3, vel: Vec3) -> Vec3 {
    let a = 0.5 * GRAVITY;
    let b = vel.y;
    let c = pos.y - GROUND_Y;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec3::new(pos.x, GROUND_Y, pos.z);
    }

    let sqrt_d = discriminant.sqrt();
    let t = ((-b + sqrt_d) / (2.0 * a)).max((-b - sqrt_d) / (2.0 * a));
    if t <= 0.0 {
        return Vec3::new(pos.x, GROUND_Y, pos.z);
    }

    Vec3::new(pos.x + vel.x * t, GROUND_Y, pos.z + vel.z * t)
}
