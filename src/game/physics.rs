//! Collision-resolved movement against solid rectangles
//!
//! Movement is resolved one axis at a time, x first. Each axis sweeps the
//! sprite's rect from where it was to where it wants to be; any solid
//! touched by that sweep clamps the moving edge to the solid's facing edge
//! (its left edge when moving right, and so on). That covers solids crossed
//! on the way and solids the rect already overlapped, so fast movers stop at
//! walls and embedded ones are pushed out.

use crate::rasterizer::{Rect, Vec2};
use super::sprite::Sprite;

/// Which sides touched a solid during the last move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub bottom: bool,
    pub top: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionFlags {
    pub fn any(&self) -> bool {
        self.bottom || self.top || self.left || self.right
    }
}

/// A sprite that moves through the level
#[derive(Debug, Clone)]
pub struct Body {
    pub sprite: Sprite,
    /// Recomputed by every `move_and_collide`
    pub collisions: CollisionFlags,
}

impl Body {
    pub fn new(sprite: Sprite) -> Self {
        Self { sprite, collisions: CollisionFlags::default() }
    }

    pub fn rect(&self) -> Rect {
        self.sprite.rect()
    }

    /// Move by `movement * dt`, stopping at solids. Solids are checked in
    /// list order.
    pub fn move_and_collide(&mut self, movement: Vec2, solids: &[Rect], dt: f32) -> CollisionFlags {
        let mut flags = CollisionFlags::default();
        let mut rect = self.sprite.rect();

        // X axis
        let dx = movement.x * dt;
        if dx != 0.0 {
            let start = rect;
            rect.x += dx;
            let swept = start.union(&rect);
            for solid in solids {
                if !swept.intersects(solid) {
                    continue;
                }
                if dx > 0.0 {
                    rect.set_right(rect.right().min(solid.left()));
                    flags.right = true;
                } else {
                    rect.set_left(rect.left().max(solid.right()));
                    flags.left = true;
                }
            }
            self.sprite.position.x = rect.x;
        }

        // Y axis, from the resolved x
        let dy = movement.y * dt;
        if dy != 0.0 {
            let start = rect;
            rect.y += dy;
            let swept = start.union(&rect);
            for solid in solids {
                if !swept.intersects(solid) {
                    continue;
                }
                if dy > 0.0 {
                    rect.set_bottom(rect.bottom().min(solid.top()));
                    flags.bottom = true;
                } else {
                    rect.set_top(rect.top().max(solid.bottom()));
                    flags.top = true;
                }
            }
            self.sprite.position.y = rect.y;
        }

        self.collisions = flags;
        flags
    }
}
