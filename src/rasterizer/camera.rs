//! 2D Camera
//!
//! A camera owns an offscreen surface at a virtual resolution
//! (physical resolution divided by its scale), a scroll position, zoom state
//! and two per-frame queues: sprites submitted for this frame and deferred
//! primitive draw commands. Both queues are emptied by `draw`, so everything
//! visible has to be re-submitted every frame.
//!
//! Following:
//! - Single target: pan toward the target's center (plus an offset)
//! - Multiple targets: pan toward the center of their padded bounding box.
//!   While the box is wider or taller than the physical resolution the camera
//!   zooms toward the scale that fits it; otherwise it eases back to the base
//!   scale.
//!
//! Panning moves `1 / pan_strength` of the remaining distance per call and
//! is not scaled by frame time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::constants::{FOLLOW_MARGIN, LINE_MARKER_RADIUS, PAN_STRENGTH};
use super::math::{Rect, Vec2};
use super::render::Framebuffer;
use super::types::{Color, Image};
use crate::error::{Error, Result};
use crate::game::sprite::Sprite;
use crate::game::Entity;

/// How a single followed target is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FollowMode {
    /// Pan toward the target center plus the follow offset
    #[default]
    Smooth,
    /// Pan toward the raw target center, ignoring the offset
    Instant,
}

/// Camera tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Base upscale factor (physical pixels per virtual pixel)
    pub scale: f32,
    /// Zoom may move the scale this far either side of `scale`
    pub scale_range: f32,
    /// Fraction of the remaining zoom distance covered per `zoom` call, in (0, 1]
    pub zoom_speed: f32,
    /// Inverse smoothing factor for panning (1 = snap)
    pub pan_strength: f32,
    /// Padding around the multi-target bounding box
    pub follow_margin: f32,
    pub follow_mode: FollowMode,
}

impl CameraSettings {
    /// Unscrolled, unzoomable 1:1 camera (foreground/UI)
    pub fn fixed() -> Self {
        Self {
            scale: 1.0,
            scale_range: 0.0,
            zoom_speed: 1.0,
            pan_strength: 1.0,
            follow_margin: 0.0,
            follow_mode: FollowMode::Instant,
        }
    }

    pub fn min_scale(&self) -> f32 {
        self.scale - self.scale_range
    }

    pub fn max_scale(&self) -> f32 {
        self.scale + self.scale_range
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.scale > 0.0) {
            return Err(Error::config(format!("camera scale must be positive, got {}", self.scale)));
        }
        if !(self.scale_range >= 0.0) || !(self.min_scale() > 0.0) {
            return Err(Error::config(format!(
                "camera scale range {} must keep the minimum scale above zero",
                self.scale_range
            )));
        }
        if !(self.zoom_speed > 0.0 && self.zoom_speed <= 1.0) {
            return Err(Error::config(format!(
                "camera zoom speed must be in (0, 1], got {}",
                self.zoom_speed
            )));
        }
        if !(self.pan_strength > 0.0) {
            return Err(Error::config(format!(
                "camera pan strength must be positive, got {}",
                self.pan_strength
            )));
        }
        if !(self.follow_margin >= 0.0) {
            return Err(Error::config("camera follow margin must not be negative"));
        }
        Ok(())
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            scale: super::constants::WORLD_SCALE,
            scale_range: 0.5,
            zoom_speed: 0.1,
            pan_strength: PAN_STRENGTH,
            follow_margin: FOLLOW_MARGIN,
            follow_mode: FollowMode::Smooth,
        }
    }
}

/// A sprite queued for this frame
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub image: Arc<Image>,
    pub position: Vec2,
    pub layer: i32,
    /// World-space (shifted by scroll) or screen-space
    pub scroll: bool,
}

/// Deferred primitive, drawn after sprites in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Line with small markers on both endpoints
    Line { from: Vec2, to: Vec2, color: Color },
    /// Filled rectangle
    Rect { rect: Rect, color: Color },
}

/// Read-only snapshot of the camera that gameplay code needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// Truncated scroll
    pub scroll: Vec2,
    pub scale: f32,
    /// Physical resolution in pixels
    pub resolution: Vec2,
}

/// Draw order for a queue: indices sorted by layer, stable for equal layers
pub fn draw_order(items: &[DrawItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| items[i].layer);
    order
}

fn virtual_size(resolution: (usize, usize), scale: f32) -> (usize, usize) {
    let w = (resolution.0 as f32 / scale).round().max(1.0) as usize;
    let h = (resolution.1 as f32 / scale).round().max(1.0) as usize;
    (w, h)
}

/// Layered 2D camera
pub struct Camera {
    resolution: (usize, usize),
    settings: CameraSettings,

    // Zoom
    scale: f32,
    desired_scale: f32,

    // Scroll (world-space top-left), truncated when blitting
    true_scroll: Vec2,

    // Following
    target: Option<Entity>,
    targets: Vec<Entity>,
    offset: Vec2,

    surface: Framebuffer,
    queue: Vec<DrawItem>,
    commands: Vec<DrawCommand>,
}

impl Camera {
    /// Create a camera for a physical `resolution`.
    pub fn new(resolution: (usize, usize), settings: CameraSettings) -> Result<Self> {
        if resolution.0 == 0 || resolution.1 == 0 {
            return Err(Error::config(format!(
                "camera resolution must be non-zero, got {}x{}",
                resolution.0, resolution.1
            )));
        }
        settings.validate()?;
        let (w, h) = virtual_size(resolution, settings.scale);
        Ok(Self {
            resolution,
            settings,
            scale: settings.scale,
            desired_scale: settings.scale,
            true_scroll: Vec2::ZERO,
            target: None,
            targets: Vec::new(),
            offset: Vec2::ZERO,
            surface: Framebuffer::new(w, h),
            queue: Vec::new(),
            commands: Vec::new(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn desired_scale(&self) -> f32 {
        self.desired_scale
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Scroll truncated to whole pixels
    pub fn scroll(&self) -> Vec2 {
        self.true_scroll.trunc()
    }

    pub fn true_scroll(&self) -> Vec2 {
        self.true_scroll
    }

    pub fn set_scroll(&mut self, scroll: Vec2) {
        self.true_scroll = scroll;
    }

    /// Size of the virtual surface
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.surface.width as f32, self.surface.height as f32)
    }

    pub fn surface(&self) -> &Framebuffer {
        &self.surface
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            scroll: self.scroll(),
            scale: self.scale,
            resolution: Vec2::new(self.resolution.0 as f32, self.resolution.1 as f32),
        }
    }

    /// Number of sprites queued for the next draw
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Change the physical resolution, keeping the current zoom
    pub fn resize(&mut self, resolution: (usize, usize)) -> Result<()> {
        if resolution.0 == 0 || resolution.1 == 0 {
            return Err(Error::config("camera resolution must be non-zero"));
        }
        self.resolution = resolution;
        let (w, h) = virtual_size(resolution, self.scale);
        self.surface.resize(w, h);
        Ok(())
    }

    // =========================================================================
    // Following
    // =========================================================================

    /// Follow a single target
    pub fn track(&mut self, target: Entity, offset: Vec2) {
        self.target = Some(target);
        self.offset = offset;
    }

    /// Follow several targets at once. Takes precedence over `track`.
    pub fn track_many(&mut self, targets: &[Entity], offset: Vec2) {
        self.targets = targets.to_vec();
        self.offset = offset;
    }

    pub fn untrack(&mut self) {
        self.target = None;
        self.targets.clear();
    }

    /// Once per frame, before drawing. `resolve` returns the current rect of
    /// a tracked entity, or `None` if it no longer exists.
    pub fn update(&mut self, resolve: impl Fn(Entity) -> Option<Rect>) {
        if !self.targets.is_empty() {
            self.follow_many(&resolve);
        } else if let Some(target) = self.target {
            if let Some(rect) = resolve(target) {
                let offset = match self.settings.follow_mode {
                    FollowMode::Smooth => self.offset,
                    FollowMode::Instant => Vec2::ZERO,
                };
                self.pan_toward(rect.center() + offset);
            }
        }
    }

    fn follow_many(&mut self, resolve: &impl Fn(Entity) -> Option<Rect>) {
        let Some(bounds) = self
            .targets
            .iter()
            .filter_map(|&t| resolve(t))
            .reduce(|a, b| a.union(&b))
        else {
            return;
        };
        let bounds = bounds.inflate(self.settings.follow_margin);

        // Scale that fits the box, per axis
        let required = Vec2::new(
            self.resolution.0 as f32 / bounds.w.max(f32::EPSILON),
            self.resolution.1 as f32 / bounds.h.max(f32::EPSILON),
        );
        let fit = required.x.min(required.y);

        // extent < extent / required means required < 1: the box overflows
        let overflows = bounds.w < bounds.w / required.x || bounds.h < bounds.h / required.y;
        let goal = if overflows { fit } else { self.settings.scale };
        self.zoom(goal - self.desired_scale);

        self.pan_toward(bounds.center() + self.offset);
    }

    fn pan_toward(&mut self, center: Vec2) {
        let half = self.screen_size() * 0.5;
        let strength = self.settings.pan_strength;
        self.true_scroll.x += ((center.x - self.true_scroll.x) - half.x) / strength;
        self.true_scroll.y += ((center.y - self.true_scroll.y) - half.y) / strength;
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    /// Nudge the desired scale by `delta`, then ease toward it.
    pub fn zoom(&mut self, delta: f32) {
        let (min, max) = (self.settings.min_scale(), self.settings.max_scale());
        self.desired_scale = (self.desired_scale + delta).clamp(min, max);
        self.scale += (self.desired_scale - self.scale) * self.settings.zoom_speed;
        self.scale = self.scale.clamp(min, max);

        let (w, h) = virtual_size(self.resolution, self.scale);
        self.surface.resize(w, h);
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Queue a sprite for this frame
    pub fn submit(&mut self, sprite: &Sprite) {
        self.queue.push(DrawItem {
            image: sprite.rendered_image(),
            position: sprite.position,
            layer: sprite.layer,
            scroll: sprite.scroll,
        });
    }

    /// Queue an already-composed image
    pub fn submit_image(&mut self, image: Arc<Image>, position: Vec2, layer: i32, scroll: bool) {
        self.queue.push(DrawItem { image, position, layer, scroll });
    }

    pub fn queue_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    pub fn queue_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    /// Rasterize everything queued this frame, then empty the queues.
    /// Returns the number of sprites drawn.
    pub fn draw(&mut self, fill: Option<Color>) -> usize {
        match fill {
            Some(color) => self.surface.clear(color),
            None => self.surface.clear_transparent(),
        }

        let scroll = self.scroll();
        for i in draw_order(&self.queue) {
            let item = &self.queue[i];
            let at = if item.scroll { item.position - scroll } else { item.position };
            self.surface.blit(&item.image, at.x.floor() as i32, at.y.floor() as i32);
        }

        for command in &self.commands {
            match *command {
                DrawCommand::Line { from, to, color } => {
                    let a = from - scroll;
                    let b = to - scroll;
                    let (ax, ay) = (a.x.floor() as i32, a.y.floor() as i32);
                    let (bx, by) = (b.x.floor() as i32, b.y.floor() as i32);
                    self.surface.draw_line(ax, ay, bx, by, color);
                    self.surface.draw_circle(ax, ay, LINE_MARKER_RADIUS, color);
                    self.surface.draw_circle(bx, by, LINE_MARKER_RADIUS, color);
                }
                DrawCommand::Rect { rect, color } => {
                    let at = rect.position() - scroll;
                    self.surface.draw_filled_rect(
                        at.x.floor() as i32,
                        at.y.floor() as i32,
                        rect.w.round() as i32,
                        rect.h.round() as i32,
                        color,
                    );
                }
            }
        }

        let drawn = self.queue.len();
        self.queue.clear();
        self.commands.clear();
        drawn
    }
}
