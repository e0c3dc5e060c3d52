//! Events emitted for the presentation and persistence layers
//!
//! The world buffers events in emission order; the shell drains them after each
//! `Session::advance`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EntitySpawned {
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
    },
    EntityRemoved {
        id: EntityId,
    },
    ScoreChanged {
        score: u64,
    },
    LivesChanged {
        lives: u8,
    },
    /// Transient hit feedback (red flash, hit sound)
    PlayerHit,
    /// Fired once, on the hit that takes the last life
    PlayerDied,
    /// Fired once, right after `PlayerDied`
    GameOver {
        final_score: u64,
    },
    CloudSpeedChanged {
        speed: f32,
    },
    HazardSpeedChanged {
        speed: f32,
    },
}
