//! Rasterizer constants
//!
//! Default display resolution and camera tuning constants.

/// Default physical width when the config does not pin one
pub const WIDTH: usize = 1280;

/// Default physical height when the config does not pin one
pub const HEIGHT: usize = 720;

/// Default integer upscale of the world camera (320x180 virtual)
pub const WORLD_SCALE: f32 = 4.0;

/// Padding around the multi-target bounding box, in world units
pub const FOLLOW_MARGIN: f32 = 100.0;

/// Default inverse smoothing factor for camera panning
pub const PAN_STRENGTH: f32 = 20.0;

/// Size of the squares drawn at line endpoints
pub const LINE_MARKER_RADIUS: i32 = 1;
