//! Presentation
//!
//! Uploads the composited framebuffer to a texture and draws it to the
//! macroquad window, letterboxed to keep the aspect ratio.

use macroquad::prelude::*;
use crate::rasterizer::{letterbox, DisplaySink, Framebuffer, Vec2};

const LETTERBOX: Color = Color::new(10.0 / 255.0, 10.0 / 255.0, 12.0 / 255.0, 1.0);

/// Draws frames to the macroquad screen
#[derive(Default)]
pub struct ScreenSink {
    pub paused: bool,
}

impl DisplaySink for ScreenSink {
    fn present(&mut self, frame: &Framebuffer) {
        if frame.width == 0 || frame.height == 0 {
            return;
        }
        let texture = Texture2D::from_rgba8(frame.width as u16, frame.height as u16, &frame.pixels);
        texture.set_filter(FilterMode::Nearest);

        let area = letterbox(
            Vec2::new(frame.width as f32, frame.height as f32),
            Vec2::new(screen_width(), screen_height()),
        );
        clear_background(LETTERBOX);
        draw_texture_ex(
            &texture,
            area.x,
            area.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(area.w, area.h)),
                ..Default::default()
            },
        );

        if self.paused {
            let label = "PAUSED";
            let size = 32.0;
            let dims = measure_text(label, None, size as u16, 1.0);
            draw_text(
                label,
                (screen_width() - dims.width) * 0.5,
                (screen_height() + dims.height) * 0.5,
                size,
                WHITE,
            );
        }
    }
}
