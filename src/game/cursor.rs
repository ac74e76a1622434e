//! Aiming cursor
//!
//! Lives in the foreground camera (1:1 with the display, never scrolled).
//! `location` is the same point expressed in world-camera screen pixels,
//! which is what weapons aim at.

use crate::asset::{AssetTable, Clip, Tag};
use crate::error::Result;
use crate::input::Aim;
use crate::rasterizer::{CameraView, Vec2};
use super::sprite::Sprite;

/// Drawn above everything else in the foreground
pub const CURSOR_LAYER: i32 = 100;

#[derive(Debug, Clone)]
pub struct Cursor {
    pub sprite: Sprite,
    /// Physical pixels
    transform: Vec2,
    /// World-camera screen pixels (transform / world scale)
    pub location: Vec2,
}

impl Cursor {
    pub fn new(start: Vec2, assets: &AssetTable) -> Result<Self> {
        let sprite = Sprite::new(Tag::Cursor, Clip::Idle, start, CURSOR_LAYER, false, assets)?;
        let mut cursor = Self { sprite, transform: start, location: start };
        cursor.place(1.0);
        Ok(cursor)
    }

    pub fn transform(&self) -> Vec2 {
        self.transform
    }

    /// Follow the device's aim. A pointer sets the position; a stick moves it
    /// by `stick * speed * dt`. Clamped to the display.
    pub fn update(&mut self, aim: Aim, world: &CameraView, speed: f32, dt: f32) {
        let target = match aim {
            Aim::Pointer(p) => p,
            Aim::Stick(stick) => self.transform + stick * (speed * dt),
        };
        self.transform = target.clamp(Vec2::ZERO, world.resolution);
        self.place(world.scale);
    }

    fn place(&mut self, world_scale: f32) {
        self.location = self.transform / world_scale;
        let half = Vec2::new(self.sprite.size.0 as f32, self.sprite.size.1 as f32) * 0.5;
        self.sprite.position = (self.transform - half).trunc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> CameraView {
        CameraView { scroll: Vec2::new(40.0, 0.0), scale: 4.0, resolution: Vec2::new(1280.0, 720.0) }
    }

    #[test]
    fn test_pointer_sets_location_in_world_pixels() {
        let assets = AssetTable::placeholder();
        let mut cursor = Cursor::new(Vec2::ZERO, &assets).unwrap();
        cursor.update(Aim::Pointer(Vec2::new(400.0, 200.0)), &view(), 900.0, 0.016);
        assert_eq!(cursor.transform(), Vec2::new(400.0, 200.0));
        assert_eq!(cursor.location, Vec2::new(100.0, 50.0));
        // Sprite centered on the pointer (7x7 placeholder)
        assert_eq!(cursor.sprite.position, Vec2::new(396.0, 196.0));
        assert!(!cursor.sprite.scroll);
    }

    #[test]
    fn test_stick_moves_and_clamps() {
        let assets = AssetTable::placeholder();
        let mut cursor = Cursor::new(Vec2::new(640.0, 360.0), &assets).unwrap();
        cursor.update(Aim::Stick(Vec2::new(1.0, 0.0)), &view(), 100.0, 0.5);
        assert_eq!(cursor.transform(), Vec2::new(690.0, 360.0));

        cursor.update(Aim::Stick(Vec2::new(0.0, -1.0)), &view(), 10_000.0, 1.0);
        assert_eq!(cursor.transform(), Vec2::new(690.0, 0.0));
    }
}
