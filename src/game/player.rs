//! Players
//!
//! Each player is driven by one input device and owns its cursor and weapon.
//! Per frame, in order: read input, move, pick the animation clip, update
//! the cursor, then the weapon (follow, aim, tick, maybe fire, pose).

use crate::asset::{AssetTable, Clip, Facing, Tag};
use crate::config::{BulletTuning, PlayerTuning, WeaponTuning};
use crate::error::Result;
use crate::input::{Action, InputDevice};
use crate::rasterizer::{Camera, CameraView, Rect, Vec2};
use super::bullet::Bullet;
use super::cursor::Cursor;
use super::physics::Body;
use super::sprite::Sprite;
use super::timer::Timer;
use super::weapon::Weapon;

/// Which move directions are active this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Directions {
    fn from_intent(v: Vec2) -> Self {
        Self { left: v.x < 0.0, right: v.x > 0.0, up: v.y < 0.0, down: v.y > 0.0 }
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Shared per-frame inputs to `Player::update`
pub struct FrameContext<'a> {
    pub dt: f32,
    pub solids: &'a [Rect],
    /// World camera as of the start of the frame
    pub view: CameraView,
    pub cursor_speed: f32,
    pub assets: &'a AssetTable,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: usize,
    pub body: Body,
    /// Index into the input device list
    pub device: usize,
    pub cursor: Cursor,
    pub weapon: Weapon,
    pub directions: Directions,

    tuning: PlayerTuning,
    /// Velocity requested this frame (world units per second)
    intent: Vec2,
    last_facing: Facing,

    dashing: bool,
    dash: Timer,
    dash_cooldown: Timer,
}

impl Player {
    pub fn new(
        id: usize,
        device: usize,
        spawn: Vec2,
        tuning: &PlayerTuning,
        weapon: &WeaponTuning,
        bullet: &BulletTuning,
        assets: &AssetTable,
    ) -> Result<Self> {
        let last_facing = Facing::Down;
        let sprite = Sprite::new(Tag::Player, Clip::Face(last_facing), spawn, tuning.layer, true, assets)?;
        let center = sprite.center();
        Ok(Self {
            id,
            body: Body::new(sprite),
            device,
            cursor: Cursor::new(Vec2::ZERO, assets)?,
            weapon: Weapon::new(weapon, bullet, center, assets)?,
            directions: Directions::default(),
            tuning: *tuning,
            intent: Vec2::ZERO,
            last_facing,
            dashing: false,
            dash: Timer::elapsed(),
            dash_cooldown: Timer::elapsed(),
        })
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn intent(&self) -> Vec2 {
        self.intent
    }

    pub fn last_facing(&self) -> Facing {
        self.last_facing
    }

    pub fn is_dashing(&self) -> bool {
        self.dashing
    }

    /// Run one frame. Returns the bullet fired this frame, if any.
    pub fn update(&mut self, device: &InputDevice, ctx: &FrameContext) -> Result<Option<Bullet>> {
        let raw = device.movement_intent();
        self.directions = Directions::from_intent(raw);

        if device.action_pressed(Action::Dash) {
            self.try_dash(raw);
        }
        if device.action_pressed(Action::Reload) {
            self.weapon.reload();
        }
        self.weapon.triggered = if self.weapon.automatic {
            device.action_down(Action::Shoot)
        } else {
            device.action_pressed(Action::Shoot)
        };

        // Move
        let speed = if self.dashing { self.tuning.speed * self.tuning.dash_multiplier } else { self.tuning.speed };
        self.intent = raw.normalize() * speed;
        self.body.move_and_collide(self.intent, ctx.solids, ctx.dt);

        // Animation clip
        let clip = match Facing::from_vector(raw) {
            Some(facing) => {
                self.last_facing = facing;
                Clip::Run(facing)
            }
            None => Clip::Face(self.last_facing),
        };
        self.body.sprite.set_action(clip, ctx.assets)?;

        // Cursor, then weapon
        self.cursor.update(device.aim(), &ctx.view, ctx.cursor_speed, ctx.dt);
        let fired = self.update_weapon(ctx)?;

        self.tick_dash(ctx.dt);
        self.body.sprite.animate(ctx.dt);
        Ok(fired)
    }

    fn update_weapon(&mut self, ctx: &FrameContext) -> Result<Option<Bullet>> {
        self.weapon.follow(self.body.sprite.center());
        self.weapon.aim_at(self.cursor.location, ctx.view.scroll);
        self.weapon.update(ctx.dt);

        let fired = if self.weapon.triggered { self.weapon.shoot(ctx.assets)? } else { None };

        let pose = self.weapon.compute_render_pose();
        self.weapon.apply_render_pose(pose);
        Ok(fired)
    }

    fn try_dash(&mut self, raw: Vec2) {
        if raw.is_zero() || self.dashing || self.dash_cooldown.is_running() {
            return;
        }
        self.dashing = true;
        self.dash.reset(self.tuning.dash_time);
        tracing::debug!(player = self.id, "dash");
    }

    fn tick_dash(&mut self, dt: f32) {
        if self.dashing {
            if self.dash.step_and_is_elapsed(dt) {
                self.dashing = false;
                self.dash_cooldown.reset(self.tuning.dash_cooldown);
            }
        } else {
            self.dash_cooldown.step_and_is_elapsed(dt);
        }
    }

    /// Queue this player's sprites for the frame
    pub fn submit(&self, world: &mut Camera, foreground: &mut Camera) {
        world.submit(&self.body.sprite);
        world.submit(&self.weapon.sprite);
        foreground.submit(&self.cursor.sprite);
    }
}
