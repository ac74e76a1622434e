//! Software 2D rasterizer
//!
//! Sprites are composed on CPU-side RGBA surfaces at a low virtual
//! resolution, then upscaled with nearest-neighbour sampling for crisp
//! pixel art.
//!
//! # Module Organization
//!
//! - `types` - Color, Image (sprite frames, flip and rotation)
//! - `math` - Vec2, Rect, angle and rotation helpers
//! - `render` - Framebuffer and raster operations
//! - `camera` - Scrolling/zooming camera with a layered draw queue
//! - `window` - World + foreground cameras composed into the display
//! - `constants` - Default resolution and camera tuning

pub mod camera;
pub mod constants;
pub mod math;
pub mod render;
pub mod types;
pub mod window;

// =============================================================================
// Convenience re-exports for commonly used items
// =============================================================================

pub use camera::{Camera, CameraSettings, CameraView};
pub use math::{angle_between, direction_from_angle, Rect, Vec2};
pub use render::Framebuffer;
pub use types::{Color, Image};
pub use window::{letterbox, screen_to_display, DisplaySink, Window};
