//! Game World
//!
//! Owns every live player and bullet, keyed by generational `Entity` ids.
//! Cameras hold ids, never references, and resolve them each frame through
//! `rect_of`. Despawns are deferred so bullets can be retired while the
//! world is being iterated.

use super::bullet::Bullet;
use super::component::ComponentStorage;
use super::entity::{Entity, EntityAllocator};
use super::player::Player;
use crate::rasterizer::Rect;

pub struct World {
    /// Entity allocator for creating/destroying entities
    entities: EntityAllocator,

    /// Entities queued for despawn at end of frame
    despawn_queue: Vec<Entity>,

    /// Spawn order, which is also camera tracking order
    player_ids: Vec<Entity>,
    bullet_ids: Vec<Entity>,

    pub players: ComponentStorage<Player>,
    pub bullets: ComponentStorage<Bullet>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            despawn_queue: Vec::new(),
            player_ids: Vec::new(),
            bullet_ids: Vec::new(),
            players: ComponentStorage::new(),
            bullets: ComponentStorage::new(),
        }
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    pub fn spawn_player(&mut self, player: Player) -> Entity {
        let entity = self.entities.allocate();
        self.players.insert(entity, player);
        self.player_ids.push(entity);
        entity
    }

    pub fn spawn_bullet(&mut self, bullet: Bullet) -> Entity {
        let entity = self.entities.allocate();
        self.bullets.insert(entity, bullet);
        self.bullet_ids.push(entity);
        entity
    }

    /// Queue an entity for despawn at end of frame.
    pub fn despawn(&mut self, entity: Entity) {
        if self.is_alive(entity) && !self.despawn_queue.contains(&entity) {
            self.despawn_queue.push(entity);
        }
    }

    /// Remove an entity and its components now.
    /// Prefer `despawn()` while iterating.
    pub fn despawn_immediate(&mut self, entity: Entity) -> bool {
        if !self.entities.free(entity) {
            return false; // Already dead
        }
        self.players.remove(entity);
        self.bullets.remove(entity);
        self.player_ids.retain(|&e| e != entity);
        self.bullet_ids.retain(|&e| e != entity);
        true
    }

    /// Process all queued despawns. Returns how many entities were removed.
    pub fn flush_despawns(&mut self) -> usize {
        let queue = std::mem::take(&mut self.despawn_queue);
        let mut removed = 0;
        for entity in queue {
            if self.despawn_immediate(entity) {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "despawned");
        }
        removed
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    pub fn player_entities(&self) -> &[Entity] {
        &self.player_ids
    }

    pub fn bullet_entities(&self) -> &[Entity] {
        &self.bullet_ids
    }

    pub fn player_count(&self) -> usize {
        self.player_ids.len()
    }

    pub fn bullet_count(&self) -> usize {
        self.bullet_ids.len()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Storage is indexed by slot only, so stale ids are rejected here.
    pub fn player(&self, entity: Entity) -> Option<&Player> {
        if !self.is_alive(entity) {
            return None;
        }
        self.players.get(entity)
    }

    pub fn player_mut(&mut self, entity: Entity) -> Option<&mut Player> {
        if !self.is_alive(entity) {
            return None;
        }
        self.players.get_mut(entity)
    }

    pub fn bullet(&self, entity: Entity) -> Option<&Bullet> {
        if !self.is_alive(entity) {
            return None;
        }
        self.bullets.get(entity)
    }

    /// World rectangle of a live player or bullet (camera target resolver)
    pub fn rect_of(&self, entity: Entity) -> Option<Rect> {
        if let Some(player) = self.player(entity) {
            return Some(player.rect());
        }
        self.bullet(entity).map(|b| b.body.rect())
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Move and age every bullet; queue the finished ones for despawn.
    pub fn update_bullets(&mut self, dt: f32, solids: &[Rect]) {
        for &id in &self.bullet_ids {
            if let Some(bullet) = self.bullets.get_mut(id) {
                if bullet.update(dt, solids) {
                    self.despawn_queue.push(id);
                }
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
