//! Entity ids with generational indices
//!
//! Players and bullets are referred to by `Entity` rather than by pointer.
//! Cameras hold these ids to follow players; a freed slot bumps its
//! generation, so an id kept by a camera after the player is gone simply
//! stops resolving instead of matching whatever reuses the slot.

use serde::{Serialize, Deserialize};

/// Slot index plus the generation it was handed out with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Only the allocator mints ids.
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot in component storage
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// "No entity" (e.g. an unassigned bullet owner)
    pub const NULL: Entity = Entity { index: u32::MAX, generation: 0 };

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

/// Hands out entity ids and recycles freed slots.
pub struct EntityAllocator {
    generations: Vec<u32>,
    /// LIFO free list
    free_indices: Vec<u32>,
    alive_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free_indices: Vec::new(),
            alive_count: 0,
        }
    }

    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // Generation was already bumped when the slot was freed
            Entity::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            Entity::new(index, 0)
        }
    }

    /// Returns false if the entity was already dead.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.generations[entity.index as usize] += 1;
        self.free_indices.push(entity.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        let idx = entity.index as usize;
        idx < self.generations.len() && self.generations[idx] == entity.generation
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut alloc = EntityAllocator::new();

        let player = alloc.allocate();
        let bullet = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);

        assert!(alloc.free(bullet));
        assert!(!alloc.free(bullet));
        assert_eq!(alloc.alive_count(), 1);
        assert!(alloc.is_alive(player));
        assert!(!alloc.is_alive(bullet));
    }

    #[test]
    fn test_stale_id_does_not_match_reused_slot() {
        let mut alloc = EntityAllocator::new();

        let first = alloc.allocate();
        alloc.free(first);
        let second = alloc.allocate();

        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert!(!alloc.is_alive(first));
        assert!(alloc.is_alive(second));
    }

    #[test]
    fn test_null_entity() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_alive(Entity::NULL));
        assert!(Entity::default().is_null());
    }
}
