//! Math types shared between client and server.
//!
//! Only what world components need: a 3-component float vector used for
//! positions, Euler rotations and per-axis scale.

use bytemuck::{Pod, Zeroable};

/// 3D vector of `f32`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// All zeros.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// All ones. Identity for per-axis scale.
    pub const ONE: Self = Self::splat(1.0);

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with every component set to `v`.
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_add_assign() {
        let mut a = Vec3::new(1.0, 2.0, 3.0);
        a += Vec3::ONE;
        assert_eq!(a, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(a + Vec3::splat(-2.0), Vec3::new(0.0, 1.0, 2.0));
    }

    #[test]
    fn test_vec3_is_tightly_packed() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(bytemuck::bytes_of(&v).len(), 12);
    }
}
