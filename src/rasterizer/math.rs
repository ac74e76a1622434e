//! 2D vector and rectangle math
//!
//! Screen convention throughout: +x right, +y down. Angles are in degrees and
//! positive angles turn counter-clockwise as seen on screen, so helpers that
//! go between angles and screen vectors invert y.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// 2D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalize(self) -> Vec2 {
        let l = self.len();
        if l == 0.0 {
            return Vec2::ZERO;
        }
        Vec2 {
            x: self.x / l,
            y: self.y / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }

    /// Rotate by `degrees` using the math-convention formula
    /// (`x cos - y sin`, `x sin + y cos`). On a y-down screen a positive
    /// angle therefore turns clockwise; pass `-angle` to follow sprite rotation.
    pub fn rotate(self, degrees: f32) -> Vec2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vec2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Mirror across the vertical axis (negate x).
    pub fn mirror_x(self) -> Vec2 {
        Vec2 { x: -self.x, y: self.y }
    }

    /// Truncate both components toward zero.
    pub fn trunc(self) -> Vec2 {
        Vec2 { x: self.x.trunc(), y: self.y.trunc() }
    }

    /// Component-wise clamp.
    pub fn clamp(self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2 {
            x: self.x.clamp(min.x, max.x),
            y: self.y.clamp(min.y, max.y),
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 { x: self.x + other.x, y: self.y + other.y }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 { x: self.x - other.x, y: self.y - other.y }
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Vec2) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        self.scale(s)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, s: f32) -> Vec2 {
        Vec2 { x: self.x / s, y: self.y / s }
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2 { x: -self.x, y: -self.y }
    }
}

/// Signed angle in degrees from `from` to `to`, screen convention
/// (counter-clockwise positive, y inverted).
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (-(to.y - from.y)).atan2(to.x - from.x).to_degrees()
}

/// Unit vector pointing along `degrees`, screen convention.
pub fn direction_from_angle(degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(cos, -sin)
}

/// Axis-aligned rectangle in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_position_size(position: Vec2, w: f32, h: f32) -> Self {
        Self::new(position.x, position.y, w, h)
    }

    /// Build the smallest rect containing both corners.
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn set_left(&mut self, v: f32) {
        self.x = v;
    }

    pub fn set_top(&mut self, v: f32) {
        self.y = v;
    }

    /// Move so the right edge sits at `v`.
    pub fn set_right(&mut self, v: f32) {
        self.x = v - self.w;
    }

    /// Move so the bottom edge sits at `v`.
    pub fn set_bottom(&mut self, v: f32) {
        self.y = v - self.h;
    }

    /// Strict overlap test: rects that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let min = Vec2::new(self.x.min(other.x), self.y.min(other.y));
        let max = Vec2::new(self.right().max(other.right()), self.bottom().max(other.bottom()));
        Rect::from_corners(min, max)
    }

    /// Grow by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_normalize_unit_is_stable() {
        let v = Vec2::new(0.6, -0.8);
        assert!(approx(v.normalize(), v));
        assert!(approx(v.normalize().normalize(), v));
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = Vec2::new(1.0, 0.0).rotate(90.0);
        assert!(approx(v, Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_angle_between_screen_convention() {
        let origin = Vec2::ZERO;
        assert!((angle_between(origin, Vec2::new(10.0, 0.0)) - 0.0).abs() < 1e-4);
        // Up on screen is negative y and a positive angle
        assert!((angle_between(origin, Vec2::new(0.0, -10.0)) - 90.0).abs() < 1e-4);
        assert!((angle_between(origin, Vec2::new(-10.0, 0.0)).abs() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_direction_from_angle_matches_angle_between() {
        for deg in [0.0f32, 30.0, 90.0, 135.0, -45.0] {
            let dir = direction_from_angle(deg);
            let back = angle_between(Vec2::ZERO, dir);
            assert!((back - deg).abs() < 1e-3, "{} vs {}", back, deg);
            assert!((dir.len() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rect_intersects_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_rect_edge_setters() {
        let mut r = Rect::new(0.0, 0.0, 10.0, 4.0);
        r.set_right(15.0);
        assert_eq!(r.x, 5.0);
        r.set_bottom(20.0);
        assert_eq!(r.y, 16.0);
        assert_eq!(r.right(), 15.0);
        assert_eq!(r.bottom(), 20.0);
    }

    #[test]
    fn test_rect_union_and_inflate() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 5.0, 20.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 25.0, 25.0));
        assert_eq!(u.inflate(100.0), Rect::new(-100.0, -100.0, 225.0, 225.0));
    }
}
