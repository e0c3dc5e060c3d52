//! Entity registry
//!
//! Owns every entity, indexed by id. Removal is two-phase: `mark_removed` only clears the
//! alive flag, `purge_removed` drops the record once the current task has finished. Dead
//! entities are invisible to lookups and iteration, so nothing mutates or matches them
//! between the two phases.

use std::collections::BTreeMap;

use glam::Vec2;

use super::state::{Body, Entity, EntityId, EntityKind};

#[derive(Debug, Clone)]
pub struct Registry {
    /// Ordered by id for deterministic iteration
    entities: BTreeMap<EntityId, Entity>,
    /// Marked this task, not yet purged
    pending: Vec<EntityId>,
    next_id: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert a new entity and return its id
    pub fn spawn(&mut self, body: Body, pos: Vec2, size: Vec2) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                id,
                pos,
                size,
                body,
                alive: true,
            },
        );
        log::trace!("spawned {:?} {}", self.entities[&id].kind(), id);
        id
    }

    /// Flip `alive` to false. Returns `false` if the id is unknown or already marked.
    pub fn mark_removed(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) if entity.alive => {
                entity.alive = false;
                self.pending.push(id);
                true
            }
            _ => false,
        }
    }

    /// Drop every marked entity, returning the purged ids in marking order
    pub fn purge_removed(&mut self) -> Vec<EntityId> {
        let purged = std::mem::take(&mut self.pending);
        for id in &purged {
            self.entities.remove(id);
        }
        purged
    }

    /// Live entity by id
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id).filter(|e| e.alive)
    }

    /// Mutable live entity by id; dead entities are never handed out
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id).filter(|e| e.alive)
    }

    /// Live entities in id order, optionally filtered by kind
    pub fn iter_alive(&self, kind: Option<EntityKind>) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .values()
            .filter(move |e| e.alive && kind.is_none_or(|k| e.kind() == k))
    }

    /// Ids of live entities of a kind, for tasks that mutate while walking
    pub fn alive_ids(&self, kind: EntityKind) -> Vec<EntityId> {
        self.iter_alive(Some(kind)).map(|e| e.id).collect()
    }

    pub fn count_alive(&self, kind: EntityKind) -> usize {
        self.iter_alive(Some(kind)).count()
    }

    /// Whether an id still has a record (alive or awaiting purge)
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Hazard;

    fn hazard(registry: &mut Registry, x: f32) -> EntityId {
        registry.spawn(Body::Hazard(Hazard::new(2.0)), Vec2::new(x, 0.0), Vec2::splat(30.0))
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut registry = Registry::new();
        let a = hazard(&mut registry, 0.0);
        let b = hazard(&mut registry, 10.0);
        assert!(a < b);

        registry.mark_removed(a);
        registry.purge_removed();
        let c = hazard(&mut registry, 20.0);
        assert!(c > b, "ids are never reused");
    }

    #[test]
    fn test_two_phase_removal() {
        let mut registry = Registry::new();
        let id = hazard(&mut registry, 0.0);

        assert!(registry.mark_removed(id));
        // Marked: hidden from lookups but still owned
        assert!(registry.get(id).is_none());
        assert!(registry.get_mut(id).is_none());
        assert!(registry.contains(id));
        assert_eq!(registry.count_alive(EntityKind::Hazard), 0);

        assert_eq!(registry.purge_removed(), vec![id]);
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_mark_removed_once() {
        let mut registry = Registry::new();
        let id = hazard(&mut registry, 0.0);
        assert!(registry.mark_removed(id));
        assert!(!registry.mark_removed(id));
        assert_eq!(registry.purge_removed(), vec![id]);

        // Purged ids are no-ops
        assert!(!registry.mark_removed(id));
        assert!(registry.purge_removed().is_empty());
    }

    #[test]
    fn test_iter_alive_filters_kind() {
        let mut registry = Registry::new();
        let player = registry.spawn(
            Body::Player(Default::default()),
            Vec2::new(450.0, 450.0),
            Vec2::splat(64.0),
        );
        let h = hazard(&mut registry, 0.0);

        let all: Vec<_> = registry.iter_alive(None).map(|e| e.id).collect();
        assert_eq!(all, vec![player, h]);
        assert_eq!(registry.alive_ids(EntityKind::Hazard), vec![h]);
        assert!(registry.alive_ids(EntityKind::Cloud).is_empty());
    }
}
