//! Parade Catch - a 3D parade-street catching game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (projectile physics, claim arbitration,
//!   bot AI, game state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `highscores`: Local leaderboard
//! - `api`: Boundary shapes for the leaderboard/session collaborators
//!
//! Rendering, audio, and the HTTP layer live outside this crate; they drive
//! the simulation through [`sim::tick`] and the action methods on
//! [`sim::GameState`].

pub mod api;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{CameraMode, Settings};
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Gravity on airborne collectibles (units/s², negative is down)
    pub const GRAVITY: f32 = -15.0;
    /// Resting height of a grounded collectible
    pub const GROUND_Y: f32 = 0.3;
    /// Fraction of vertical speed retained across a bounce
    pub const BOUNCE_RETENTION: f32 = 0.4;
    /// Below this |vel.y| a landing item settles instead of bouncing
    pub const BOUNCE_MIN_SPEED: f32 = 0.5;
    /// Horizontal friction factor applied per tick while grounded
    pub const GROUND_FRICTION: f32 = 0.9;

    /// Items inside this radius of the player can be caught
    pub const CATCH_RADIUS: f32 = 2.0;
    /// Inside this radius a catchable item is caught automatically
    pub const AUTO_CATCH_RADIUS: f32 = 0.8;
    /// Airborne catch window: [MIN_CATCH_HEIGHT, MAX_CATCH_HEIGHT)
    pub const MIN_CATCH_HEIGHT: f32 = 0.5;
    pub const MAX_CATCH_HEIGHT: f32 = 2.0;

    /// Street bounds; the player, bots, and NPCs never leave them
    pub const STREET_HALF_WIDTH: f32 = 6.5;
    pub const STREET_HALF_LENGTH: f32 = 15.0;

    /// Collectible despawn bounds (out of the playable volume)
    pub const DESPAWN_MIN_Y: f32 = -5.0;
    pub const DESPAWN_MAX_X: f32 = 20.0;
    pub const DESPAWN_MAX_Z: f32 = 25.0;

    /// Floats ride the parade lane at this x offset
    pub const FLOAT_LANE_X: f32 = 5.0;
    /// Floats wrap from past the street back behind the start
    pub const FLOAT_WRAP_Z: f32 = 20.0;
    pub const FLOAT_SPAWN_Z: f32 = -30.0;
    /// Spacing between consecutive floats in the parade
    pub const FLOAT_SPACING_Z: f32 = 10.0;
    /// Floats only throw while -THROW_BAND_Z < z < THROW_BAND_Z
    pub const THROW_BAND_Z: f32 = 10.0;
    /// Float collision box half extents (player elimination check)
    pub const FLOAT_HALF_WIDTH: f32 = 2.5;
    pub const FLOAT_HALF_LENGTH: f32 = 3.0;

    /// Base player movement speed (units/s)
    pub const PLAYER_BASE_SPEED: f32 = 5.0;
    /// Speed cap for items under helper-bot attraction
    pub const ATTRACTION_MAX_SPEED: f32 = 8.0;

    /// Largest frame delta fed to the simulation (spiral-of-death guard)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Fixed frame delta the headless demo driver ticks at
    pub const SIM_DEMO_DT: f32 = 1.0 / 60.0;
}

/// Clamp a point to the street bounds (y untouched).
#[inline]
pub fn clamp_to_street(pos: Vec3) -> Vec3 {
    Vec3::new(
        pos.x.clamp(-consts::STREET_HALF_WIDTH, consts::STREET_HALF_WIDTH),
        pos.y,
        pos.z.clamp(-consts::STREET_HALF_LENGTH, consts::STREET_HALF_LENGTH),
    )
}

/// Linear interpolation.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Initialize logging on the web target (console + panic hook).
#[cfg(target_arch = "wasm32")]
pub fn init_wasm_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
