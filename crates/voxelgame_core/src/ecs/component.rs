//! # Component System
//!
//! Components are pure data containers with no behavior.
//! Every component type needs a default value: entity creation materializes
//! one default component per bit of the entity's signature.

use bytemuck::{Pod, Zeroable};
use voxelgame_shared::Vec3;

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Default`: entity creation fills every declared component with it
/// - `Send`: a coordinator may live on the server thread
/// - `'static`: component arrays are keyed by `TypeId`
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default)]
/// struct Health(u32);
///
/// impl Component for Health {}
/// ```
pub trait Component: Default + Send + 'static {}

/// World-space position. Every world object has one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(transparent)]
pub struct Position3D(pub Vec3);

impl Component for Position3D {}

impl Position3D {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Moves the position by `delta`.
    #[inline]
    pub fn translate(&mut self, delta: Vec3) {
        self.0 += delta;
    }
}

/// Rotation and scale of a world object.
///
/// Not every object has one. The default value is all zeros, use
/// [`Transform3D::identity`] for an unrotated, unscaled object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform3D {
    /// Euler angles in radians.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Component for Transform3D {}

impl Transform3D {
    /// Creates a new transform.
    #[inline]
    #[must_use]
    pub const fn new(rotation: Vec3, scale: Vec3) -> Self {
        Self { rotation, scale }
    }

    /// No rotation, unit scale.
    #[inline]
    #[must_use]
    pub const fn identity() -> Self {
        Self::new(Vec3::ZERO, Vec3::ONE)
    }
}
