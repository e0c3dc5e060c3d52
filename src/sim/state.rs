//! Entity records
//!
//! Entities are plain data owned by the [`Registry`](super::Registry). Behavior that
//! only touches one entity lives here; anything that needs the whole world lives in
//! `tick`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::*;

/// Stable entity identifier. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity discriminator used for collision classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Hazard,
    Cloud,
}

/// Horizontal direction of a command or a bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }
}

/// Player facing and motion, drives sprite selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    IdleLeft,
    #[default]
    IdleRight,
    MovingLeft,
    MovingRight,
}

impl Facing {
    pub fn moving(heading: Heading) -> Self {
        match heading {
            Heading::Left => Facing::MovingLeft,
            Heading::Right => Facing::MovingRight,
        }
    }

    pub fn idle(heading: Heading) -> Self {
        match heading {
            Heading::Left => Facing::IdleLeft,
            Heading::Right => Facing::IdleRight,
        }
    }
}

/// The player-controlled sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub facing: Facing,
    /// Animation frame (0-3), presentation only
    pub frame_index: u8,
    /// Cleared on death; disables movement
    pub enabled: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            facing: Facing::IdleRight,
            frame_index: 0,
            enabled: true,
        }
    }
}

impl Player {
    /// Next x after a step, or `None` if the step would leave the play area
    pub fn step_target(x: f32, heading: Heading) -> Option<f32> {
        let target = x + heading.sign() * PLAYER_STEP;
        let inside = match heading {
            Heading::Left => target > PLAYER_X_MIN,
            Heading::Right => target < PLAYER_X_MAX,
        };
        inside.then_some(target)
    }

    /// Key released: fall back to idle if still moving that way
    pub fn stop(&mut self, heading: Heading) -> bool {
        if self.facing == Facing::moving(heading) {
            self.facing = Facing::idle(heading);
            self.frame_index = 1;
            true
        } else {
            false
        }
    }

    pub fn advance_frame(&mut self) {
        self.frame_index = (self.frame_index + 1) % PLAYER_FRAMES;
    }
}

/// A falling knife
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    /// Fixed at spawn time from the current hazard speed
    pub fall_speed: f32,
    pub collided: bool,
}

impl Hazard {
    pub fn new(fall_speed: f32) -> Self {
        Self {
            fall_speed,
            collided: false,
        }
    }
}

/// The rain cloud hazards fall from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub heading: Heading,
    pub speed: f32,
}

impl Cloud {
    /// Random starting x and heading, reference start speed
    pub fn random_start(rng: &mut impl Rng) -> (Self, Vec2) {
        let x = rng.random_range(0..CLOUD_START_RANGE) as f32;
        let heading = if rng.random_bool(0.5) {
            Heading::Right
        } else {
            Heading::Left
        };
        let cloud = Self {
            heading,
            speed: CLOUD_START_SPEED,
        };
        (cloud, Vec2::new(x, CLOUD_Y))
    }

    /// Bounce if past a threshold, then return the horizontal delta for this step
    pub fn bounce_and_step(&mut self, x: f32) -> f32 {
        if x < CLOUD_X_MIN {
            self.heading = Heading::Right;
        } else if x > CLOUD_X_MAX {
            self.heading = Heading::Left;
        }
        self.speed * self.heading.sign()
    }
}

/// Kind-specific entity data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Body {
    Player(Player),
    Hazard(Hazard),
    Cloud(Cloud),
}

impl Body {
    pub fn kind(&self) -> EntityKind {
        match self {
            Body::Player(_) => EntityKind::Player,
            Body::Hazard(_) => EntityKind::Hazard,
            Body::Cloud(_) => EntityKind::Cloud,
        }
    }
}

/// A live or pending-removal entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Top-left corner in scene coordinates
    pub pos: Vec2,
    pub size: Vec2,
    pub body: Body,
    pub(super) alive: bool,
}

impl Entity {
    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.body.kind()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.body {
            Body::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_hazard(&self) -> Option<&Hazard> {
        match &self.body {
            Body::Hazard(hazard) => Some(hazard),
            _ => None,
        }
    }

    pub fn as_cloud(&self) -> Option<&Cloud> {
        match &self.body {
            Body::Cloud(cloud) => Some(cloud),
            _ => None,
        }
    }
}
