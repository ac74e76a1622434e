//! Projectiles

use crate::asset::{AssetTable, Clip, Tag};
use crate::config::BulletTuning;
use crate::error::Result;
use crate::rasterizer::{direction_from_angle, Rect, Vec2};
use super::physics::Body;
use super::sprite::Sprite;
use super::timer::Timer;

#[derive(Debug, Clone)]
pub struct Bullet {
    pub body: Body,
    /// Degrees, fixed at spawn
    pub heading: f32,
    /// Fixed at spawn
    velocity: Vec2,
    lifetime: Timer,
    despawn_on_contact: bool,
}

impl Bullet {
    /// Spawn centred on `center`, travelling along `heading`.
    pub fn spawn(tuning: &BulletTuning, center: Vec2, heading: f32, assets: &AssetTable) -> Result<Self> {
        let mut sprite = Sprite::new(Tag::Bullet, Clip::Idle, center, tuning.layer, true, assets)?;
        let half = Vec2::new(sprite.size.0 as f32, sprite.size.1 as f32) * 0.5;
        sprite.position = center - half;
        sprite.rotation = heading;

        Ok(Self {
            body: Body::new(sprite),
            heading,
            velocity: direction_from_angle(heading) * tuning.speed,
            lifetime: Timer::with_remaining(tuning.lifetime),
            despawn_on_contact: tuning.despawn_on_contact,
        })
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Move and age. Returns true when the bullet should be removed.
    pub fn update(&mut self, dt: f32, solids: &[Rect]) -> bool {
        let hit = self.body.move_and_collide(self.velocity, solids, dt).any();
        self.body.sprite.animate(dt);
        let expired = self.lifetime.step_and_is_elapsed(dt);
        expired || (self.despawn_on_contact && hit)
    }
}
