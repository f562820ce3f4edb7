use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Immutable 2D vector. Every operation returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.squared_length().sqrt()
    }

    /// Squared euclidean length, also used as the projection denominator.
    #[must_use]
    pub fn squared_length(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Rescales to `target_length`. A zero vector stays zero.
    #[must_use]
    pub fn normalize(self, target_length: f64) -> Self {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return Self::ZERO;
        }
        self.scale(target_length / length)
    }

    #[must_use]
    pub fn rotate_90_ccw(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Component of `self` along `axis`.
    ///
    /// A zero-length axis divides by 1 instead, which yields a zero vector.
    #[must_use]
    pub fn project_onto(self, axis: Self) -> Self {
        let mut denominator = axis.squared_length();
        if denominator == 0.0 {
            denominator = 1.0;
        }
        axis.scale(axis.dot(self) / denominator)
    }

    /// Tangent estimate at a polyline corner formed by `prev -> self -> next`.
    #[must_use]
    pub fn corner_tangent(self, prev: Self, next: Self) -> Self {
        ((prev - self) + (next - self)).rotate_90_ccw()
    }

    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::Vec2;

    #[test]
    fn normalize_guards_zero_length() {
        assert_eq!(Vec2::ZERO.normalize(3.0), Vec2::ZERO);
        let unit = Vec2::new(3.0, 4.0).normalize(10.0);
        assert!((unit.x - 6.0).abs() <= 1e-12);
        assert!((unit.y - 8.0).abs() <= 1e-12);
    }

    #[test]
    fn projection_onto_zero_axis_is_zero() {
        let projected = Vec2::new(2.0, 5.0).project_onto(Vec2::ZERO);
        assert_eq!(projected, Vec2::ZERO);
        assert!(projected.is_finite());
    }

    #[test]
    fn projection_keeps_axis_component() {
        let projected = Vec2::new(2.0, 5.0).project_onto(Vec2::new(4.0, 0.0));
        assert!((projected.x - 2.0).abs() <= 1e-12);
        assert_eq!(projected.y, 0.0);
    }

    #[test]
    fn corner_tangent_is_horizontal_at_symmetric_peak() {
        let peak = Vec2::new(1.0, 1.0);
        let tangent = peak.corner_tangent(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        assert_eq!(tangent.y, 0.0);
        assert!(tangent.x > 0.0);
    }

    #[test]
    fn rotation_and_negation() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(v.rotate_90_ccw(), Vec2::new(-2.0, 1.0));
        assert_eq!(-v, Vec2::new(-1.0, -2.0));
        assert_eq!(v - v, Vec2::ZERO);
    }
}
