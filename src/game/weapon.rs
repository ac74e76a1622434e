//! Weapons: aiming, render pose, fire control
//!
//! A weapon hangs off its holder by a pivot (a pixel in its frame). Aiming
//! sets the rotation toward the cursor and flips the sprite when the cursor
//! is on the left, so the gun never renders upside down. The pose (rotated
//! image plus where to blit it so the pivot stays put) is computed from the
//! current state without side effects, then applied to the sprite.
//!
//! Fire control:
//! - `Ready -> Cooling -> Ready` after every shot
//! - `Ready <-> Reloading`, refilling the magazine on completion
//! - No shot while reloading, cooling down, or empty

use std::sync::Arc;

use crate::asset::{AssetTable, Clip, Tag};
use crate::config::{BulletTuning, WeaponTuning};
use crate::error::Result;
use crate::rasterizer::{angle_between, Image, Vec2};
use super::bullet::Bullet;
use super::sprite::Sprite;
use super::timer::Timer;

/// Where and what to draw this frame
#[derive(Debug, Clone)]
pub struct WeaponPose {
    pub image: Arc<Image>,
    pub top_left: Vec2,
}

#[derive(Debug, Clone)]
pub struct Weapon {
    pub sprite: Sprite,
    /// World position of the pivot (the holder's center)
    pub transform: Vec2,
    pivot: Vec2,
    muzzle: Vec2,

    magazine: u32,
    max_magazine: u32,
    reload_time: f32,
    reload: Timer,
    reloading: bool,
    cooldown_time: f32,
    cooldown: Timer,

    pub automatic: bool,
    /// Set by the holder when the shoot input fires this frame
    pub triggered: bool,
    aim_offset: f32,
    /// Extra render rotation while reloading
    spin: f32,

    bullet: BulletTuning,
}

impl Weapon {
    pub fn new(tuning: &WeaponTuning, bullet: &BulletTuning, transform: Vec2, assets: &AssetTable) -> Result<Self> {
        let sprite = Sprite::new(Tag::Weapon, Clip::Idle, transform, tuning.layer, true, assets)?;
        Ok(Self {
            sprite,
            transform,
            pivot: tuning.pivot,
            muzzle: tuning.muzzle,
            magazine: tuning.magazine,
            max_magazine: tuning.magazine,
            reload_time: tuning.reload_time,
            reload: Timer::elapsed(),
            reloading: false,
            cooldown_time: tuning.cooldown,
            cooldown: Timer::elapsed(),
            automatic: tuning.automatic,
            triggered: false,
            aim_offset: tuning.aim_offset,
            spin: 0.0,
            bullet: *bullet,
        })
    }

    pub fn magazine(&self) -> u32 {
        self.magazine
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    pub fn rotation(&self) -> f32 {
        self.sprite.rotation
    }

    // =========================================================================
    // Aiming
    // =========================================================================

    /// Attach to the holder
    pub fn follow(&mut self, holder_center: Vec2) {
        self.transform = holder_center;
    }

    /// Point at the cursor. `cursor` and the weapon's on-screen position are
    /// both in world-camera screen pixels.
    pub fn aim_at(&mut self, cursor: Vec2, scroll: Vec2) {
        let on_screen = self.transform - scroll;
        self.sprite.flip = cursor.x <= on_screen.x;
        self.sprite.rotation = angle_between(on_screen, cursor) + self.aim_offset;
    }

    /// World position of the barrel tip
    pub fn muzzle_position(&self) -> Vec2 {
        let arm = self.muzzle - self.pivot;
        if self.sprite.flip {
            self.transform + arm.mirror_x().rotate(180.0 - self.sprite.rotation)
        } else {
            self.transform + arm.rotate(-self.sprite.rotation)
        }
    }

    /// Angle the frame is actually drawn at. A flipped frame already
    /// points left, so it turns 180 degrees less.
    fn render_angle(&self) -> f32 {
        let base = if self.sprite.flip { self.sprite.rotation - 180.0 } else { self.sprite.rotation };
        base + self.spin
    }

    // =========================================================================
    // Render pose
    // =========================================================================

    pub fn compute_render_pose(&self) -> WeaponPose {
        let frame = self.sprite.current_frame();
        let (w, h) = (frame.width as f32, frame.height as f32);
        let (image, pivot) = if self.sprite.flip {
            (frame.flipped(), Vec2::new(w - self.pivot.x, self.pivot.y))
        } else {
            ((**frame).clone(), self.pivot)
        };

        let angle = self.render_angle();
        let rotated = image.rotated(angle);

        // Keep the pivot pixel on `transform` after rotating about the center
        let offset = pivot - Vec2::new(w * 0.5, h * 0.5);
        let center = self.transform - offset.rotate(-angle);
        let top_left = center - Vec2::new(rotated.width as f32 * 0.5, rotated.height as f32 * 0.5);

        WeaponPose { image: Arc::new(rotated), top_left }
    }

    pub fn apply_render_pose(&mut self, pose: WeaponPose) {
        self.sprite.position = pose.top_left;
        self.sprite.set_posed_image(pose.image);
    }

    // =========================================================================
    // Fire control
    // =========================================================================

    /// Advance cooldown, reload and animation.
    pub fn update(&mut self, dt: f32) {
        self.cooldown.step_and_is_elapsed(dt);
        if self.reloading {
            self.spin += 360.0 * dt / self.reload_time;
            if self.reload.step_and_is_elapsed(dt) {
                self.reloading = false;
                self.magazine = self.max_magazine;
                self.spin = 0.0;
                tracing::debug!(magazine = self.magazine, "reloaded");
            }
        }
        self.sprite.animate(dt);
    }

    pub fn can_shoot(&self) -> bool {
        !self.reloading && !self.cooldown.is_running() && self.magazine > 0
    }

    /// Fire one bullet from the muzzle if allowed. A blocked shot is `None`.
    pub fn shoot(&mut self, assets: &AssetTable) -> Result<Option<Bullet>> {
        if !self.can_shoot() {
            return Ok(None);
        }
        let bullet = Bullet::spawn(&self.bullet, self.muzzle_position(), self.sprite.rotation, assets)?;
        self.magazine -= 1;
        self.cooldown.reset(self.cooldown_time);
        tracing::debug!(magazine = self.magazine, heading = self.sprite.rotation, "fired");
        Ok(Some(bullet))
    }

    /// Start reloading unless already reloading.
    pub fn reload(&mut self) {
        if self.reloading {
            return;
        }
        self.reloading = true;
        self.reload.reset(self.reload_time);
        tracing::debug!(time = self.reload_time, "reloading");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Animation, AnimationKey};
    use crate::rasterizer::Color;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    fn assets() -> AssetTable {
        // 10x4 gun, barrel tip marked red at (9, 1)
        let mut frame = Image::new_filled(10, 4, Color::WHITE);
        frame.set_pixel(9, 1, Color::RED);
        let mut table = AssetTable::placeholder();
        table.insert(AnimationKey::new(Tag::Weapon, Clip::Idle), Animation::still(Arc::new(frame)));
        table
    }

    fn weapon(magazine: u32) -> Weapon {
        let tuning = WeaponTuning {
            pivot: Vec2::new(2.0, 2.0),
            muzzle: Vec2::new(10.0, 1.0),
            magazine,
            reload_time: 1.0,
            cooldown: 0.2,
            automatic: false,
            aim_offset: 0.0,
            layer: 2,
        };
        Weapon::new(&tuning, &BulletTuning::default(), Vec2::new(100.0, 100.0), &assets()).unwrap()
    }

    #[test]
    fn test_aim_flips_on_left() {
        let mut w = weapon(3);
        let scroll = Vec2::new(50.0, 50.0);
        w.aim_at(Vec2::new(80.0, 50.0), scroll);
        assert!(!w.sprite.flip);
        assert!((w.rotation() - 0.0).abs() < 1e-4);

        w.aim_at(Vec2::new(20.0, 50.0), scroll);
        assert!(w.sprite.flip);
        assert!((w.rotation().abs() - 180.0).abs() < 1e-4);

        // Straight above counts as left
        w.aim_at(Vec2::new(50.0, 0.0), scroll);
        assert!(w.sprite.flip);
    }

    #[test]
    fn test_muzzle_follows_rotation() {
        let mut w = weapon(3);
        // Aim straight right: muzzle is simply offset by muzzle - pivot
        w.aim_at(Vec2::new(200.0, 100.0), Vec2::ZERO);
        assert!(approx(w.muzzle_position(), Vec2::new(108.0, 99.0)));

        // Aim straight up: the barrel points to -y
        w.sprite.flip = false;
        w.sprite.rotation = 90.0;
        assert!(approx(w.muzzle_position(), Vec2::new(99.0, 92.0)));
    }

    #[test]
    fn test_muzzle_mirrors_when_flipped() {
        let mut w = weapon(3);
        w.aim_at(Vec2::new(0.0, 100.0), Vec2::ZERO);
        assert!(w.sprite.flip);
        // Pointing left, the barrel sits left of the pivot at the same height
        assert!(approx(w.muzzle_position(), Vec2::new(92.0, 99.0)));
    }

    #[test]
    fn test_pose_keeps_pivot_on_transform() {
        let mut w = weapon(3);
        w.aim_at(Vec2::new(200.0, 100.0), Vec2::ZERO);
        let pose = w.compute_render_pose();
        assert_eq!((pose.image.width, pose.image.height), (10, 4));
        assert!(approx(pose.top_left, Vec2::new(98.0, 98.0)));

        // Quarter turn counter-clockwise: the barrel tip ends up at the top
        w.sprite.rotation = 90.0;
        let pose = w.compute_render_pose();
        assert_eq!((pose.image.width, pose.image.height), (4, 10));
        assert_eq!(pose.image.get_pixel(1, 0), Color::RED);
        // Pivot (2, 2) maps to image (2, 8) in the rotated frame
        assert!(approx(pose.top_left, Vec2::new(98.0, 92.0)));
    }

    #[test]
    fn test_flipped_pose_is_mirrored_not_upside_down() {
        let mut w = weapon(3);
        w.aim_at(Vec2::new(0.0, 100.0), Vec2::ZERO);
        let pose = w.compute_render_pose();
        assert_eq!((pose.image.width, pose.image.height), (10, 4));
        // Red tip at the left, same row
        assert_eq!(pose.image.get_pixel(0, 1), Color::RED);
        // Mirrored pivot (8, 2) lands on the transform
        assert!(approx(pose.top_left, Vec2::new(92.0, 98.0)));
    }

    #[test]
    fn test_apply_pose_moves_sprite() {
        let mut w = weapon(3);
        w.aim_at(Vec2::new(200.0, 100.0), Vec2::ZERO);
        let pose = w.compute_render_pose();
        let top_left = pose.top_left;
        w.apply_render_pose(pose);
        assert_eq!(w.sprite.position, top_left);
        assert_eq!(w.sprite.rendered_image().width, 10);
    }

    #[test]
    fn test_empty_magazine_blocks_fire() {
        let assets = assets();
        let mut w = weapon(1);
        assert!(w.shoot(&assets).unwrap().is_some());
        assert_eq!(w.magazine(), 0);

        w.update(1.0); // cooldown over
        assert!(!w.can_shoot());
        assert!(w.shoot(&assets).unwrap().is_none());
    }

    #[test]
    fn test_cooldown_blocks_fire() {
        let assets = assets();
        let mut w = weapon(5);
        assert!(w.shoot(&assets).unwrap().is_some());
        assert!(w.shoot(&assets).unwrap().is_none());
        w.update(0.1);
        assert!(w.shoot(&assets).unwrap().is_none());
        w.update(0.11);
        assert!(w.shoot(&assets).unwrap().is_some());
        assert_eq!(w.magazine(), 3);
    }

    #[test]
    fn test_reload_refills_and_spins() {
        let assets = assets();
        let mut w = weapon(2);
        w.shoot(&assets).unwrap();
        w.update(0.5);
        w.shoot(&assets).unwrap();
        assert_eq!(w.magazine(), 0);

        w.reload();
        assert!(w.is_reloading());
        assert!(w.shoot(&assets).unwrap().is_none());

        w.update(0.5);
        assert!((w.spin() - 180.0).abs() < 1e-3);
        // Calling again mid-reload does not restart the timer
        w.reload();
        w.update(0.5);
        assert!(!w.is_reloading());
        assert_eq!(w.magazine(), 2);
        assert_eq!(w.spin(), 0.0);
        assert!(w.can_shoot());
    }

    #[test]
    fn test_bullet_spawns_at_muzzle() {
        let assets = assets();
        let mut w = weapon(3);
        w.aim_at(Vec2::new(200.0, 100.0), Vec2::ZERO);
        let bullet = w.shoot(&assets).unwrap().unwrap();
        let center = bullet.body.sprite.center();
        assert!(approx(center, w.muzzle_position()));
        assert_eq!(bullet.heading, w.rotation());
    }
}
