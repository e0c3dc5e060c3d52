//! Game settings and preferences
//!
//! Chosen once before a session starts. The shell may keep them as JSON; the crate only
//! parses and validates them.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::DifficultyConfig;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Speed table for this preset
    pub fn config(&self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig::new(2.0, 5.5, 4.5),
            Difficulty::Medium => DifficultyConfig::new(4.0, 9.5, 6.5),
            Difficulty::Hard => DifficultyConfig::new(7.0, 14.5, 8.5),
        }
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(Error::UnknownDifficulty(s.to_string())),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Periods of every scheduled task, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub hazard_fall_ms: u64,
    pub collision_ms: u64,
    pub spawn_ms: u64,
    pub score_ms: u64,
    pub hazard_escalation_ms: u64,
    pub cloud_escalation_ms: u64,
    pub cloud_move_ms: u64,
    /// Player sprite frame advance (presentation only)
    pub animation_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        let ms = |d: Duration| d.as_millis() as u64;
        Self {
            hazard_fall_ms: ms(HAZARD_FALL_PERIOD),
            collision_ms: ms(COLLISION_PERIOD),
            spawn_ms: ms(SPAWN_PERIOD),
            score_ms: ms(SCORE_PERIOD),
            hazard_escalation_ms: ms(HAZARD_ESCALATION_PERIOD),
            cloud_escalation_ms: ms(CLOUD_ESCALATION_PERIOD),
            cloud_move_ms: ms(CLOUD_MOVE_PERIOD),
            animation_ms: ms(ANIMATION_PERIOD),
        }
    }
}

impl Timings {
    /// (task name, period) pairs in registration order
    pub fn periods(&self) -> [(&'static str, Duration); 8] {
        [
            ("hazard_fall", Duration::from_millis(self.hazard_fall_ms)),
            ("collision", Duration::from_millis(self.collision_ms)),
            ("spawn", Duration::from_millis(self.spawn_ms)),
            ("score", Duration::from_millis(self.score_ms)),
            ("hazard_escalation", Duration::from_millis(self.hazard_escalation_ms)),
            ("cloud_escalation", Duration::from_millis(self.cloud_escalation_ms)),
            ("cloud_move", Duration::from_millis(self.cloud_move_ms)),
            ("animation", Duration::from_millis(self.animation_ms)),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        match self.periods().into_iter().find(|(_, period)| period.is_zero()) {
            Some((task, _)) => Err(Error::ZeroPeriod { task }),
            None => Ok(()),
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preset
    pub difficulty: Difficulty,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Task cadences
    pub timings: Timings,
}

impl Settings {
    /// Create settings for a preset with reference cadences
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate settings JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.timings.validate()
    }

    /// Seed to use for this session
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
