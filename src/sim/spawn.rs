//! Hazard spawning
//!
//! Every spawn tick draws a random x across the scene and probes `(x, 50)` against the
//! cloud's box. Hazards only appear under the cloud; a miss is simply skipped, never
//! retried early.

use glam::Vec2;
use rand::{Rng, RngCore};

use super::aabb::Aabb;
use super::registry::Registry;
use super::state::{Body, EntityId, Hazard};
use crate::consts::*;

pub struct SpawnController {
    rng: Box<dyn RngCore>,
}

impl std::fmt::Debug for SpawnController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnController").finish_non_exhaustive()
    }
}

impl SpawnController {
    pub fn new(rng: Box<dyn RngCore>) -> Self {
        Self { rng }
    }

    /// Uniform spawn x in [1, SCENE_WIDTH - 1]
    pub fn draw_x(&mut self) -> f32 {
        self.rng.random_range(1..=(SCENE_WIDTH as u32 - 1)) as f32
    }

    /// One spawn tick: draw an x and try it
    pub fn attempt(&mut self, registry: &mut Registry, cloud: &Aabb, fall_speed: f32) -> Option<EntityId> {
        let x = self.draw_x();
        spawn_at(registry, cloud, x, fall_speed)
    }
}

/// Spawn a hazard at `x` if the probe point lies inside the cloud
pub fn spawn_at(registry: &mut Registry, cloud: &Aabb, x: f32, fall_speed: f32) -> Option<EntityId> {
    if !cloud.contains(Vec2::new(x, SPAWN_PROBE_Y)) {
        return None;
    }
    let id = registry.spawn(
        Body::Hazard(Hazard::new(fall_speed)),
        Vec2::new(x, HAZARD_SPAWN_Y),
        Vec2::splat(HAZARD_SIZE),
    );
    Some(id)
}
