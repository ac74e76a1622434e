//! Core raster types: colors and sprite images

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// Color
// =============================================================================

/// 8-bit RGBA color. Alpha 0 is fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Multiply RGB by `intensity` (0.0-1.0)
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Source-over composite of `self` on top of `back`
    pub fn over(self, back: Color) -> Color {
        match self.a {
            0 => back,
            255 => self,
            a => {
                let fa = a as u32;
                let ba = back.a as u32 * (255 - fa) / 255;
                let out_a = fa + ba;
                if out_a == 0 {
                    return Color::TRANSPARENT;
                }
                let mix = |f: u8, b: u8| ((f as u32 * fa + b as u32 * ba) / out_a) as u8;
                Color {
                    r: mix(self.r, back.r),
                    g: mix(self.g, back.g),
                    b: mix(self.b, back.b),
                    a: out_a.min(255) as u8,
                }
            }
        }
    }

    /// Convert to [u8; 4] for the framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self { r: bytes[0], g: bytes[1], b: bytes[2], a: bytes[3] }
    }
}

// =============================================================================
// Image
// =============================================================================

/// A decoded sprite frame. Shared read-only between animation copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Image {
    /// Fully transparent image
    pub fn new(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, Color::TRANSPARENT)
    }

    pub fn new_filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
            name: String::new(),
        }
    }

    /// Load from a PNG file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::from_dynamic(img, name))
    }

    fn from_dynamic(img: image::DynamicImage, name: String) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
            .collect();
        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::TRANSPARENT
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Horizontal mirror
    pub fn flipped(&self) -> Image {
        let mut out = Image::new(self.width, self.height);
        out.name = self.name.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                out.pixels[y * self.width + x] = self.pixels[y * self.width + (self.width - 1 - x)];
            }
        }
        out
    }

    /// Size of the bounding box after rotating by `degrees`
    pub fn rotated_size(width: usize, height: usize, degrees: f32) -> (usize, usize) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (width as f32, height as f32);
        // Shave float noise so exact quarter turns keep their size
        let nw = ((w * cos).abs() + (h * sin).abs() - 1e-3).ceil().max(0.0);
        let nh = ((w * sin).abs() + (h * cos).abs() - 1e-3).ceil().max(0.0);
        (nw as usize, nh as usize)
    }

    /// Rotate counter-clockwise (as seen on screen) about the image center.
    /// The result is the full rotated bounding box; uncovered pixels are
    /// transparent. Nearest-neighbour sampling keeps pixel art crisp.
    pub fn rotated(&self, degrees: f32) -> Image {
        if degrees.rem_euclid(360.0) == 0.0 {
            return self.clone();
        }
        let (nw, nh) = Self::rotated_size(self.width, self.height, degrees);
        let mut out = Image::new(nw, nh);
        out.name = self.name.clone();

        let (sin, cos) = degrees.to_radians().sin_cos();
        let (scx, scy) = (self.width as f32 * 0.5, self.height as f32 * 0.5);
        let (dcx, dcy) = (nw as f32 * 0.5, nh as f32 * 0.5);

        for dy in 0..nh {
            for dx in 0..nw {
                let u = dx as f32 + 0.5 - dcx;
                let v = dy as f32 + 0.5 - dcy;
                // Inverse mapping of a screen-space counter-clockwise turn
                let sx = u * cos - v * sin + scx;
                let sy = u * sin + v * cos + scy;
                if sx < 0.0 || sy < 0.0 {
                    continue;
                }
                let (ix, iy) = (sx as usize, sy as usize);
                if ix < self.width && iy < self.height {
                    out.pixels[dy * nw + dx] = self.pixels[iy * self.width + ix];
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_image() -> Image {
        // 4x2 image with a red pixel in the top-right corner
        let mut img = Image::new_filled(4, 2, Color::WHITE);
        img.set_pixel(3, 0, Color::RED);
        img
    }

    #[test]
    fn test_flip_mirrors_columns() {
        let flipped = marker_image().flipped();
        assert_eq!(flipped.get_pixel(0, 0), Color::RED);
        assert_eq!(flipped.get_pixel(3, 0), Color::WHITE);
    }

    #[test]
    fn test_quarter_turn_swaps_dimensions() {
        let rotated = marker_image().rotated(90.0);
        assert_eq!((rotated.width, rotated.height), (2, 4));
        // Top-right corner turns counter-clockwise into the top-left
        assert_eq!(rotated.get_pixel(0, 0), Color::RED);
    }

    #[test]
    fn test_rotated_bounding_box_grows() {
        let (w, h) = Image::rotated_size(10, 10, 45.0);
        assert_eq!((w, h), (15, 15));
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let img = marker_image();
        assert_eq!(img.rotated(0.0), img);
        assert_eq!(img.rotated(360.0), img);
    }

    #[test]
    fn test_color_over() {
        assert_eq!(Color::RED.over(Color::BLUE), Color::RED);
        assert_eq!(Color::TRANSPARENT.over(Color::BLUE), Color::BLUE);
        let half = Color::rgba(255, 0, 0, 128).over(Color::rgba(0, 0, 255, 255));
        assert_eq!(half.a, 255);
        assert!(half.r > 100 && half.b > 100);
    }
}
