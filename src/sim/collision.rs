//! Hazard collision classification
//!
//! Each collision tick walks the live hazards in id order. A hazard's box is tested
//! against every other live entity; the cloud is ignored, touching the player costs a
//! life, touching another hazard just destroys this one. A hazard that has already
//! collided this pass is skipped, both as the subject and as a candidate, so no pair is
//! counted twice.
//!
//! When a hazard touches the player and another hazard in the same pass, the player
//! contact wins.

use std::collections::BTreeSet;

use super::aabb::Aabb;
use super::registry::Registry;
use super::state::{Entity, EntityId, EntityKind};

/// What a hazard ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Player(EntityId),
    Hazard(EntityId),
}

/// A hazard that collided this pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub hazard: EntityId,
    pub contact: Contact,
}

impl Collision {
    pub fn costs_life(&self) -> bool {
        matches!(self.contact, Contact::Player(_))
    }
}

/// Classify the overlaps of one hazard box against candidate entities
pub fn classify<'a>(hazard: &Aabb, candidates: impl IntoIterator<Item = &'a Entity>) -> Option<Contact> {
    let mut first_hazard = None;
    for other in candidates {
        if !other.bounds().overlaps(hazard) {
            continue;
        }
        match other.kind() {
            EntityKind::Player => return Some(Contact::Player(other.id)),
            EntityKind::Hazard => {
                first_hazard.get_or_insert(Contact::Hazard(other.id));
            }
            EntityKind::Cloud => {}
        }
    }
    first_hazard
}

/// Find every hazard that collides this pass, in hazard id order
pub fn detect(registry: &Registry) -> Vec<Collision> {
    let mut spent: BTreeSet<EntityId> = BTreeSet::new();
    let mut collisions = Vec::new();

    for hazard in registry.iter_alive(Some(EntityKind::Hazard)) {
        if hazard.as_hazard().is_some_and(|h| h.collided) || spent.contains(&hazard.id) {
            continue;
        }

        let bounds = hazard.bounds();
        let candidates = registry.iter_alive(None).filter(|other| {
            other.id != hazard.id
                && !spent.contains(&other.id)
                && !other.as_hazard().is_some_and(|h| h.collided)
        });

        if let Some(contact) = classify(&bounds, candidates) {
            spent.insert(hazard.id);
            collisions.push(Collision {
                hazard: hazard.id,
                contact,
            });
        }
    }

    collisions
}
