//! Sparse component storage
//!
//! `ComponentStorage<T>` maps entity slots to data. A round has a handful of
//! players and at most a few hundred bullets, so a flat `Vec<Option<T>>`
//! indexed by slot is all the world needs.

use super::entity::Entity;

pub struct ComponentStorage<T> {
    /// Indexed by `entity.index()`
    data: Vec<Option<T>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Replaces any existing component.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let idx = entity.index() as usize;
        if idx >= self.data.len() {
            self.data.resize_with(idx + 1, || None);
        }
        self.data[idx] = Some(component);
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.data.get_mut(entity.index() as usize).and_then(Option::take)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.data.get(entity.index() as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.data.get_mut(entity.index() as usize).and_then(Option::as_mut)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// (slot, component) pairs in slot order. Liveness is the caller's job.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_ref().map(|c| (idx as u32, c)))
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|opt| opt.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        let entity = Entity::new(5, 0);

        storage.insert(entity, 42);
        assert_eq!(storage.get(entity), Some(&42));
        *storage.get_mut(entity).unwrap() += 1;
        assert_eq!(storage.remove(entity), Some(43));
        assert!(!storage.contains(entity));
        assert_eq!(storage.remove(Entity::new(99, 0)), None);
    }

    #[test]
    fn test_sparse_slots_and_iteration_order() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        storage.insert(Entity::new(5, 0), "five");
        storage.insert(Entity::new(0, 0), "zero");
        storage.insert(Entity::new(2, 0), "two");

        assert!(!storage.contains(Entity::new(1, 0)));
        let items: Vec<_> = storage.iter().collect();
        assert_eq!(items, vec![(0, &"zero"), (2, &"two"), (5, &"five")]);
        assert_eq!(storage.count(), 3);
    }
}
