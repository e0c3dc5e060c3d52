//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulated time only, driven by the cooperative scheduler
//! - Injected RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod aabb;
pub mod collision;
pub mod difficulty;
pub mod events;
pub mod registry;
pub mod scheduler;
pub mod scoreboard;
pub mod spawn;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{Collision, Contact, classify, detect};
pub use difficulty::{DifficultyConfig, HazardSpeed, escalate};
pub use events::GameEvent;
pub use registry::Registry;
pub use scheduler::{Cancellations, Scheduler, Settle, TaskHandle};
pub use scoreboard::{GamePhase, HitOutcome, Scoreboard};
pub use spawn::{SpawnController, spawn_at};
pub use state::{Body, Cloud, Entity, EntityId, EntityKind, Facing, Hazard, Heading, Player};
pub use tick::{PlayerCommand, Session, TaskKind, TickInput, World, autopilot};
