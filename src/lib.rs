//! Raining Knives - dodge the knives falling out of a drifting cloud
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, entities, collisions, scoring)
//! - `settings`: Difficulty preset, seed and task cadences
//! - `highscores`: Leaderboard of finished runs
//!
//! Rendering, audio, persistence and the window shell live outside this crate and
//! talk to it through [`sim::Session`] and [`sim::GameEvent`].

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use settings::{Difficulty, Settings, Timings};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Scene dimensions
    pub const SCENE_WIDTH: f32 = 908.0;
    pub const SCENE_HEIGHT: f32 = 510.0;
    /// Hazards at or below this y leave the scene on their next fall step
    pub const FLOOR_Y: f32 = 500.0;

    /// Player defaults (16px sprite drawn at 4x)
    pub const PLAYER_START_X: f32 = 450.0;
    pub const PLAYER_START_Y: f32 = 450.0;
    pub const PLAYER_SIZE: f32 = 64.0;
    pub const PLAYER_STEP: f32 = 20.0;
    /// Exclusive horizontal limits for the player's x after a step
    pub const PLAYER_X_MIN: f32 = -30.0;
    pub const PLAYER_X_MAX: f32 = 825.0;
    /// Idle/run sheets both have 4 frames
    pub const PLAYER_FRAMES: u8 = 4;

    /// Cloud defaults
    pub const CLOUD_WIDTH: f32 = 300.0;
    pub const CLOUD_HEIGHT: f32 = 100.0;
    pub const CLOUD_Y: f32 = -20.0;
    /// Initial x is drawn from [0, CLOUD_START_RANGE)
    pub const CLOUD_START_RANGE: u32 = 650;
    pub const CLOUD_START_SPEED: f32 = 1.0;
    /// Bounce thresholds
    pub const CLOUD_X_MIN: f32 = 20.0;
    pub const CLOUD_X_MAX: f32 = 650.0;

    /// Hazard defaults
    pub const HAZARD_SIZE: f32 = 30.0;
    pub const HAZARD_SPAWN_Y: f32 = 0.0;
    /// Height of the point probed against the cloud when spawning
    pub const SPAWN_PROBE_Y: f32 = 50.0;

    /// Scoreboard
    pub const START_LIVES: u8 = 3;

    /// Escalation step: speed += speed * ESCALATION_RATE
    pub const ESCALATION_RATE: f32 = 0.25;

    /// Reference cadences
    pub const HAZARD_FALL_PERIOD: Duration = Duration::from_millis(16);
    pub const COLLISION_PERIOD: Duration = Duration::from_millis(15);
    pub const SPAWN_PERIOD: Duration = Duration::from_millis(100);
    pub const SCORE_PERIOD: Duration = Duration::from_millis(1000);
    pub const HAZARD_ESCALATION_PERIOD: Duration = Duration::from_millis(10_000);
    pub const CLOUD_ESCALATION_PERIOD: Duration = Duration::from_millis(15_000);
    pub const CLOUD_MOVE_PERIOD: Duration = Duration::from_millis(20);
    pub const ANIMATION_PERIOD: Duration = Duration::from_millis(150);
}
