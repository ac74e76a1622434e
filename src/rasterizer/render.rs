//! Framebuffer and 2D raster operations

use super::types::{Color, Image};

/// RGBA pixel surface. Cameras draw into one at their virtual resolution and
/// the window composites them into another at the physical resolution.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    /// Reallocate on size change. Previous contents are discarded; every
    /// surface is repainted each frame anyway.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Clear framebuffer with transparent black (for alpha compositing)
    pub fn clear_transparent(&mut self) {
        self.pixels.fill(0);
    }

    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            Color::from_bytes([
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ])
        } else {
            Color::TRANSPARENT
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Source-over blend a pixel onto the surface
    #[inline]
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: Color) {
        if color.a == 0 || x >= self.width || y >= self.height {
            return;
        }
        if color.a == 255 {
            self.set_pixel(x, y, color);
            return;
        }
        let back = self.get_pixel(x, y);
        self.set_pixel(x, y, color.over(back));
    }

    /// Blit an image with its top-left at (x, y), clipped to the surface
    pub fn blit(&mut self, image: &Image, x: i32, y: i32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + image.width as i32).min(self.width as i32);
        let y1 = (y + image.height as i32).min(self.height as i32);
        for py in y0..y1 {
            let sy = (py - y) as usize;
            for px in x0..x1 {
                let sx = (px - x) as usize;
                self.blend_pixel(px as usize, py as usize, image.pixels[sy * image.width + sx]);
            }
        }
    }

    /// Nearest-neighbour copy of `src` stretched over this whole surface
    pub fn blit_scaled(&mut self, src: &Framebuffer) {
        if src.width == 0 || src.height == 0 {
            return;
        }
        for y in 0..self.height {
            let sy = (y * src.height / self.height).min(src.height - 1);
            for x in 0..self.width {
                let sx = (x * src.width / self.width).min(src.width - 1);
                let s = (sy * src.width + sx) * 4;
                let d = (y * self.width + x) * 4;
                self.pixels[d..d + 4].copy_from_slice(&src.pixels[s..s + 4]);
            }
        }
    }

    /// Alpha-composite `src` 1:1 onto this surface at the origin
    pub fn composite(&mut self, src: &Framebuffer) {
        let w = self.width.min(src.width);
        let h = self.height.min(src.height);
        for y in 0..h {
            for x in 0..w {
                self.blend_pixel(x, y, src.get_pixel(x, y));
            }
        }
    }

    /// Draw a filled circle at (cx, cy) with given radius and color
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let r_sq = radius * radius;
        for y in (cy - radius).max(0)..=(cy + radius).min(self.height as i32 - 1) {
            for x in (cx - radius).max(0)..=(cx + radius).min(self.width as i32 - 1) {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.blend_pixel(x as usize, y as usize, color);
                }
            }
        }
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
                self.blend_pixel(x as usize, y as usize, color);
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Fill the half-open pixel rect [x, x + w) x [y, y + h)
    pub fn draw_filled_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let min_x = x.max(0);
        let min_y = y.max(0);
        let max_x = (x + w).min(self.width as i32);
        let max_y = (y + h).min(self.height as i32);

        for py in min_y..max_y {
            for px in min_x..max_x {
                self.blend_pixel(px as usize, py as usize, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blit_clips_and_skips_transparent() {
        let mut fb = Framebuffer::new(4, 4);
        fb.clear(Color::BLACK);
        let mut img = Image::new_filled(3, 3, Color::RED);
        img.set_pixel(1, 1, Color::TRANSPARENT);

        fb.blit(&img, -1, -1);
        assert_eq!(fb.get_pixel(0, 0), Color::BLACK); // hole at image (1, 1)
        assert_eq!(fb.get_pixel(1, 0), Color::RED);
        assert_eq!(fb.get_pixel(2, 2), Color::BLACK);
    }

    #[test]
    fn test_blit_scaled_nearest() {
        let mut src = Framebuffer::new(2, 1);
        src.set_pixel(0, 0, Color::RED);
        src.set_pixel(1, 0, Color::BLUE);
        let mut dst = Framebuffer::new(4, 2);
        dst.blit_scaled(&src);
        assert_eq!(dst.get_pixel(1, 1), Color::RED);
        assert_eq!(dst.get_pixel(2, 0), Color::BLUE);
    }

    #[test]
    fn test_composite_keeps_background_under_transparency() {
        let mut back = Framebuffer::new(2, 1);
        back.clear(Color::BLUE);
        let mut front = Framebuffer::new(2, 1);
        front.set_pixel(1, 0, Color::RED);
        back.composite(&front);
        assert_eq!(back.get_pixel(0, 0), Color::BLUE);
        assert_eq!(back.get_pixel(1, 0), Color::RED);
    }

    #[test]
    fn test_draw_line_endpoints() {
        let mut fb = Framebuffer::new(8, 8);
        fb.draw_line(1, 1, 6, 4, Color::WHITE);
        assert_eq!(fb.get_pixel(1, 1), Color::WHITE);
        assert_eq!(fb.get_pixel(6, 4), Color::WHITE);
    }

    #[test]
    fn test_filled_rect_is_half_open() {
        let mut fb = Framebuffer::new(8, 8);
        fb.draw_filled_rect(2, 2, 3, 3, Color::GREEN);
        assert_eq!(fb.get_pixel(2, 2), Color::GREEN);
        assert_eq!(fb.get_pixel(4, 4), Color::GREEN);
        assert_eq!(fb.get_pixel(5, 5), Color::TRANSPARENT);
    }
}
