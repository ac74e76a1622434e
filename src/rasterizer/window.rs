//! Window: world and foreground cameras composed into the display
//!
//! The world camera renders at a reduced virtual resolution and is stretched
//! to the physical resolution. The foreground camera is fixed at 1:1 and is
//! composited on top (cursor, overlays).

use super::camera::{Camera, CameraSettings};
use super::math::{Rect, Vec2};
use super::render::Framebuffer;
use super::types::Color;
use crate::error::Result;
use crate::game::Entity;

/// Where a `display`-sized frame lands in a `screen`-sized window: scaled
/// to fit without distortion, centred on the free axis.
pub fn letterbox(display: Vec2, screen: Vec2) -> Rect {
    let display_aspect = display.x / display.y;
    let screen_aspect = screen.x / screen.y;
    if display_aspect > screen_aspect {
        let h = screen.x / display_aspect;
        Rect::new(0.0, (screen.y - h) * 0.5, screen.x, h)
    } else {
        let w = screen.y * display_aspect;
        Rect::new((screen.x - w) * 0.5, 0.0, w, screen.y)
    }
}

/// Window pixel to display pixel (inverse of `letterbox`)
pub fn screen_to_display(point: Vec2, display: Vec2, screen: Vec2) -> Vec2 {
    let area = letterbox(display, screen);
    if !(area.w > 0.0 && area.h > 0.0) {
        return point;
    }
    Vec2::new(
        (point.x - area.x) * display.x / area.w,
        (point.y - area.y) * display.y / area.h,
    )
}

/// Destination for the final composited frame
pub trait DisplaySink {
    fn present(&mut self, frame: &Framebuffer);
}

pub struct Window {
    world: Camera,
    foreground: Camera,
    display: Framebuffer,
}

impl Window {
    pub fn new(resolution: (usize, usize), world: CameraSettings) -> Result<Self> {
        Ok(Self {
            world: Camera::new(resolution, world)?,
            foreground: Camera::new(resolution, CameraSettings::fixed())?,
            display: Framebuffer::new(resolution.0, resolution.1),
        })
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.display.width, self.display.height)
    }

    pub fn world(&self) -> &Camera {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut Camera {
        &mut self.world
    }

    pub fn foreground(&self) -> &Camera {
        &self.foreground
    }

    pub fn foreground_mut(&mut self) -> &mut Camera {
        &mut self.foreground
    }

    /// Both cameras at once, for submitting a frame's sprites
    pub fn cameras_mut(&mut self) -> (&mut Camera, &mut Camera) {
        (&mut self.world, &mut self.foreground)
    }

    /// Follow targets with the world camera. The foreground never scrolls.
    pub fn update(&mut self, resolve: impl Fn(Entity) -> Option<Rect>) {
        self.world.update(&resolve);
        self.foreground.update(&resolve);
    }

    pub fn draw_world(&mut self, fill: Color) -> usize {
        self.world.draw(Some(fill))
    }

    pub fn draw_foreground(&mut self) -> usize {
        self.foreground.draw(None)
    }

    /// Upscale the world surface and composite the foreground over it
    pub fn present(&mut self) -> &Framebuffer {
        self.display.blit_scaled(self.world.surface());
        self.display.composite(self.foreground.surface());
        &self.display
    }

    pub fn present_to(&mut self, sink: &mut impl DisplaySink) {
        let frame = self.present();
        sink.present(frame);
    }

    pub fn resize(&mut self, resolution: (usize, usize)) -> Result<()> {
        self.world.resize(resolution)?;
        self.foreground.resize(resolution)?;
        self.display.resize(resolution.0, resolution.1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::types::Image;
    use std::sync::Arc;

    struct Capture {
        frames: usize,
        size: (usize, usize),
    }

    impl DisplaySink for Capture {
        fn present(&mut self, frame: &Framebuffer) {
            self.frames += 1;
            self.size = (frame.width, frame.height);
        }
    }

    fn window() -> Window {
        Window::new((8, 4), CameraSettings { scale: 2.0, ..CameraSettings::default() }).unwrap()
    }

    #[test]
    fn test_letterbox() {
        // Wider frame: bars top and bottom
        let area = letterbox(Vec2::new(200.0, 100.0), Vec2::new(200.0, 200.0));
        assert_eq!(area, Rect::new(0.0, 50.0, 200.0, 100.0));
        // Taller frame: bars left and right
        let area = letterbox(Vec2::new(100.0, 200.0), Vec2::new(200.0, 200.0));
        assert_eq!(area, Rect::new(50.0, 0.0, 100.0, 200.0));
    }

    #[test]
    fn test_screen_to_display_undoes_letterbox() {
        let display = Vec2::new(320.0, 180.0);
        let screen = Vec2::new(640.0, 480.0);
        // 640x360 frame starting 60px down
        assert_eq!(screen_to_display(Vec2::new(0.0, 60.0), display, screen), Vec2::ZERO);
        assert_eq!(screen_to_display(Vec2::new(320.0, 240.0), display, screen), Vec2::new(160.0, 90.0));
    }

    #[test]
    fn test_foreground_is_fixed_scale() {
        let mut win = window();
        win.foreground_mut().zoom(10.0);
        assert_eq!(win.foreground().scale(), 1.0);
        assert_eq!(win.foreground().screen_size(), Vec2::new(8.0, 4.0));
        assert_eq!(win.world().screen_size(), Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_present_upscales_world_and_overlays_foreground() {
        let mut win = window();
        win.world_mut()
            .submit_image(Arc::new(Image::new_filled(1, 1, Color::RED)), Vec2::ZERO, 0, true);
        win.foreground_mut()
            .submit_image(Arc::new(Image::new_filled(1, 1, Color::WHITE)), Vec2::new(7.0, 3.0), 0, false);
        win.draw_world(Color::BLACK);
        win.draw_foreground();

        let frame = win.present();
        // One world pixel covers 2x2 display pixels
        assert_eq!(frame.get_pixel(0, 0), Color::RED);
        assert_eq!(frame.get_pixel(1, 1), Color::RED);
        assert_eq!(frame.get_pixel(2, 0), Color::BLACK);
        assert_eq!(frame.get_pixel(7, 3), Color::WHITE);
    }

    #[test]
    fn test_present_to_sink() {
        let mut win = window();
        let mut sink = Capture { frames: 0, size: (0, 0) };
        win.present_to(&mut sink);
        assert_eq!(sink.frames, 1);
        assert_eq!(sink.size, (8, 4));
    }

    #[test]
    fn test_resize_rebuilds_surfaces() {
        let mut win = window();
        win.resize((16, 8)).unwrap();
        assert_eq!(win.resolution(), (16, 8));
        assert_eq!(win.world().screen_size(), Vec2::new(8.0, 4.0));
        assert_eq!(win.foreground().screen_size(), Vec2::new(16.0, 8.0));
    }
}
