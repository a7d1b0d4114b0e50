//! Plain 3-component float vector.
//!
//! No invariants beyond IEEE-754 semantics. Positions are integrated with
//! `+=` once per tick and are never clamped.

use core::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Linear interpolation `a + (b - a) * k`.
///
/// `k` is not clamped; callers pass fractions in `[0, 1]`. Rounds twice
/// (product, then sum); a fused multiply-add would shift run checksums.
#[allow(clippy::suboptimal_flops)]
pub const fn lerp(a: f32, b: f32, k: f32) -> f32 {
    a + (b - a) * k
}

/// A 3-component `f32` vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vector3 {
    /// The zero vector. Particles spawn here.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a vector from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Componentwise interpolation between `min` and `max` using one shared
    /// fraction for all three components.
    ///
    /// A single `k` puts every result on the segment from `min` to `max`,
    /// not anywhere inside the box they span.
    pub const fn lerp(min: Self, max: Self, k: f32) -> Self {
        Self {
            x: lerp(min.x, max.x, k),
            y: lerp(min.y, max.y, k),
            z: lerp(min.z, max.z, k),
        }
    }

    /// Whether all three components are finite.
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Whether every component of `self` is `<=` the matching one in `other`.
    pub fn le_componentwise(self, other: Self) -> bool {
        self.x <= other.x && self.y <= other.y && self.z <= other.z
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(-1.0, 1.0, 0.0), -1.0);
        assert_eq!(lerp(-1.0, 1.0, 1.0), 1.0);
        assert_eq!(lerp(-1.0, 1.0, 0.5), 0.0);
    }

    #[test]
    #[allow(clippy::suboptimal_flops)]
    fn lerp_rounds_product_before_sum() {
        // A fused multiply-add gives 0.460_000_01 here.
        let (a, b, k) = (0.1_f32, 0.7_f32, 0.6_f32);
        let product = (b - a) * k;
        assert_eq!(lerp(a, b, k), a + product);
        assert_ne!(lerp(a, b, k), (b - a).mul_add(k, a));
    }

    #[test]
    fn vector_lerp_shares_one_fraction() {
        let min = Vector3::new(-1.0, 0.0, 10.0);
        let max = Vector3::new(1.0, 4.0, 20.0);
        let v = Vector3::lerp(min, max, 0.25);
        assert_eq!(v, Vector3::new(-0.5, 1.0, 12.5));
    }

    #[test]
    fn add_assign_integrates_in_place() {
        let mut pos = Vector3::ZERO;
        let vel = Vector3::new(0.5, -1.0, 2.0);
        pos += vel;
        pos += vel;
        assert_eq!(pos, Vector3::new(1.0, -2.0, 4.0));
        assert_eq!(pos, vel * 2.0);
        assert_eq!(pos - vel, vel);
        assert_eq!(vel + vel, pos);
    }

    #[test]
    fn componentwise_ordering() {
        let lo = Vector3::new(-1.0, -1.0, -1.0);
        let hi = Vector3::new(1.0, 1.0, 1.0);
        assert!(lo.le_componentwise(hi));
        assert!(!hi.le_componentwise(lo));
        assert!(!Vector3::new(2.0, 0.0, 0.0).le_componentwise(hi));
    }

    #[test]
    fn non_finite_detected() {
        assert!(Vector3::ZERO.is_finite());
        assert!(!Vector3::new(f32::NAN, 0.0, 0.0).is_finite());
        assert!(!Vector3::new(0.0, 0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn serde_roundtrip() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let json = serde_json::to_string(&v).ok();
        assert_eq!(json.as_deref(), Some(r#"{"x":1.0,"y":2.0,"z":3.0}"#));
    }
}
