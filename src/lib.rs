//! Koro Stage - control core of a plane-anchored AR ball game
//!
//! Core modules:
//! - `sim`: Phase state machine, contact resolution, spawn timers, HUD projection
//! - `platform`: AR tracking / plane detection adapters and the event queue
//! - `world`: Scene mutator boundary and an in-memory entity table
//! - `settings`: Timing and spawn tuning
//! - `highscores`: Finished runs recorded during a session

pub mod error;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod world;

pub use error::{SettingsError, WorldError};
pub use highscores::HighScores;
pub use platform::{Event, EventQueue, EventSender};
pub use settings::Settings;
pub use sim::{GameEvent, GameSession, Phase, PhaseKind, Transition};
pub use world::{HudSink, SceneGraph, World};

/// Game configuration constants
pub mod consts {
    /// Host frame step used by the headless driver (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Delay after start before the start banner is cleared
    pub const BANNER_DELAY_SECS: f64 = 1.0;
    /// Further delay after the banner clears before obstacles start spawning
    pub const SPAWN_DELAY_SECS: f64 = 1.0;
    /// Interval between obstacle spawns
    pub const SPAWN_INTERVAL_SECS: f64 = 1.5;
    /// Obstacles spawn at a lateral offset in [-LATERAL_RANGE, LATERAL_RANGE] stage units
    pub const LATERAL_RANGE: f32 = 2.0;

    /// Physics tag of the goal body at the far end of the stage
    pub const GOAL_TAG: &str = "goal";
    /// Physics tag of the hazard marker (ends the run on contact)
    pub const HAZARD_TAG: &str = "ng";
    /// Obstacles are tagged `ball1`, `ball2`, ...
    pub const OBSTACLE_TAG_PREFIX: &str = "ball";
    /// Name of the anchor node obstacles are attached under
    pub const SPAWN_ANCHOR_NAME: &str = "spawn";

    /// Error message used when the AR session is interrupted
    pub const INTERRUPTED_MESSAGE: &str = "interrupted";
    /// Error message used when tracking reports not available
    pub const NOT_AVAILABLE_MESSAGE: &str = "tracking not available";

    /// Finished runs kept in the session records
    pub const MAX_RECORDS: usize = 10;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU itself
    if wrapped >= PI { -PI } else { wrapped }
}
