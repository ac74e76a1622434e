//! Sprite - the base renderable/movable object
//!
//! Position is the world-space top-left. The drawn image is always the
//! current animation frame flipped (if `flip`) and then rotated about its
//! center by `rotation` degrees, so a rotated sprite's image is larger than
//! `size` and is placed by whoever rotates it (see the weapon pose).

use std::sync::Arc;

use crate::asset::{Animation, AnimationKey, AssetTable, Clip, Tag};
use crate::error::Result;
use crate::rasterizer::{angle_between, direction_from_angle, Image, Rect, Vec2};

#[derive(Debug, Clone)]
pub struct Sprite {
    pub tag: Tag,
    clip: Clip,
    pub position: Vec2,
    pub size: (u32, u32),
    /// Degrees, counter-clockwise on screen
    pub rotation: f32,
    /// Horizontal mirror
    pub flip: bool,
    /// Draw order key, lower first
    pub layer: i32,
    /// World-space (shifted by camera scroll) or screen-space
    pub scroll: bool,
    animation: Animation,
    /// Pre-composed image that replaces flip + rotation for this frame
    posed: Option<Arc<Image>>,
}

impl Sprite {
    /// Size comes from the clip's first frame.
    pub fn new(tag: Tag, clip: Clip, position: Vec2, layer: i32, scroll: bool, assets: &AssetTable) -> Result<Self> {
        let animation = assets.instance(AnimationKey::new(tag, clip))?;
        let (w, h) = animation.frame_size();
        Ok(Self {
            tag,
            clip,
            position,
            size: (w as u32, h as u32),
            rotation: 0.0,
            flip: false,
            layer,
            scroll,
            animation,
            posed: None,
        })
    }

    pub fn clip(&self) -> Clip {
        self.clip
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Switch clips. Restarting the same clip is a no-op.
    pub fn set_action(&mut self, clip: Clip, assets: &AssetTable) -> Result<()> {
        if clip == self.clip {
            return Ok(());
        }
        self.animation = assets.instance(AnimationKey::new(self.tag, clip))?;
        self.clip = clip;
        Ok(())
    }

    pub fn animate(&mut self, dt: f32) {
        self.animation.advance(dt);
    }

    pub fn current_frame(&self) -> &Arc<Image> {
        self.animation.current_frame()
    }

    /// rotate(flip(current frame)), or the posed image when one is set
    pub fn rendered_image(&self) -> Arc<Image> {
        if let Some(posed) = &self.posed {
            return posed.clone();
        }
        let frame = self.animation.current_frame();
        let rotated = self.rotation.rem_euclid(360.0) != 0.0;
        match (self.flip, rotated) {
            (false, false) => frame.clone(),
            (true, false) => Arc::new(frame.flipped()),
            (false, true) => Arc::new(frame.rotated(self.rotation)),
            (true, true) => Arc::new(frame.flipped().rotated(self.rotation)),
        }
    }

    pub fn set_posed_image(&mut self, image: Arc<Image>) {
        self.posed = Some(image);
    }

    pub fn rect(&self) -> Rect {
        Rect::from_position_size(self.position, self.size.0 as f32, self.size.1 as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Angle in degrees from this sprite (on screen, after `scroll`) to `point`,
    /// plus `offset`. Measured from the center when `centered`.
    pub fn angle_to(&self, point: Vec2, scroll: Vec2, offset: f32, centered: bool) -> f32 {
        let mut from = self.position - scroll;
        if centered {
            from += Vec2::new(self.size.0 as f32 * 0.5, self.size.1 as f32 * 0.5);
        }
        angle_between(from, point) + offset
    }

    /// Unit vector along `rotation`
    pub fn direction_vector(&self) -> Vec2 {
        direction_from_angle(self.rotation)
    }
}
