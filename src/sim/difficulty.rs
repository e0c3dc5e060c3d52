//! Difficulty table and speed escalation
//!
//! Both hazard and cloud speed grow by 25% per escalation tick while they are below their
//! cap. The cap gates whether a step is taken, it does not clamp the result, so the last
//! step may land above the cap.

use serde::{Deserialize, Serialize};

use crate::consts::ESCALATION_RATE;

/// Speed table chosen at session start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub initial_hazard_speed: f32,
    pub max_hazard_speed: f32,
    pub max_cloud_speed: f32,
}

impl DifficultyConfig {
    pub const fn new(
        initial_hazard_speed: f32,
        max_hazard_speed: f32,
        max_cloud_speed: f32,
    ) -> Self {
        Self {
            initial_hazard_speed,
            max_hazard_speed,
            max_cloud_speed,
        }
    }
}

/// Next speed after one escalation tick, or `None` once the cap is reached
#[inline]
pub fn escalate(speed: f32, max: f32) -> Option<f32> {
    (speed < max).then(|| speed + speed * ESCALATION_RATE)
}

/// Hazard speed handed to newly spawned hazards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardSpeed {
    current: f32,
    max: f32,
}

impl HazardSpeed {
    pub fn new(config: &DifficultyConfig) -> Self {
        Self {
            current: config.initial_hazard_speed,
            max: config.max_hazard_speed,
        }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Apply one escalation tick; returns the new speed if it changed
    pub fn escalate(&mut self) -> Option<f32> {
        let next = escalate(self.current, self.max)?;
        self.current = next;
        Some(next)
    }
}
