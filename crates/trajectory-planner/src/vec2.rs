use core::fmt;
use core::ops::{Add, AddAssign, Mul, Sub};
use serde::{Deserialize, Serialize};

/// 2D vector in the robot frame: x is the forward axis, y the lateral axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const UNIT_X: Vec2 = Vec2 { x: 1.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction. A zero vector stays zero.
    pub fn normalized(&self) -> Vec2 {
        let n = self.norm();
        if n == 0.0 {
            return *self;
        }
        Vec2::new(self.x / n, self.y / n)
    }

    /// Rotate counter-clockwise by `degrees` (right-handed convention).
    pub fn rotated_deg(&self, degrees: f64) -> Vec2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vec2::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y)
    }

    pub fn distance(&self, other: Vec2) -> f64 {
        (*self - other).norm()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_normalized_zero_guard() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalized();
        assert!((n.x - 0.6).abs() < EPS && (n.y - 0.8).abs() < EPS);
    }

    #[test]
    fn test_rotation_is_counter_clockwise() {
        let left = Vec2::UNIT_X.rotated_deg(90.0);
        assert!(left.x.abs() < EPS && (left.y - 1.0).abs() < EPS);
        let right = Vec2::UNIT_X.rotated_deg(-90.0);
        assert!(right.x.abs() < EPS && (right.y + 1.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let v = Vec2::new(0.5, 2.0);
        assert!((v.rotated_deg(37.0).norm() - v.norm()).abs() < EPS);
    }
}
