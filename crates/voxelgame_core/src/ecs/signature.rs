//! # Component Signatures
//!
//! A signature is a 16-bit set: bit *i* means "has component type *i*".
//! Component types get their bit at registration time.
//!
//! The empty signature marks a slot with no live entity. No live entity
//! ever has an empty signature.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use voxelgame_shared::COMPONENT_TYPE_MAX;

/// Bit position of a registered component type (0-15).
pub type ComponentType = u16;

/// Set of component types, one bit per type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u16);

impl Signature {
    /// No bits set. Sentinel for "entity does not exist".
    pub const EMPTY: Self = Self(0);

    /// Creates a signature from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Returns a copy with the bit of `ty` set.
    ///
    /// # Panics
    ///
    /// Panics if `ty` is not below [`COMPONENT_TYPE_MAX`].
    #[inline]
    #[must_use]
    pub const fn with(self, ty: ComponentType) -> Self {
        assert!((ty as usize) < COMPONENT_TYPE_MAX, "component type out of range");
        Self(self.0 | (1 << ty))
    }

    /// Returns a copy with the bit of `ty` cleared.
    ///
    /// # Panics
    ///
    /// Panics if `ty` is not below [`COMPONENT_TYPE_MAX`].
    #[inline]
    #[must_use]
    pub const fn without(self, ty: ComponentType) -> Self {
        assert!((ty as usize) < COMPONENT_TYPE_MAX, "component type out of range");
        Self(self.0 & !(1 << ty))
    }

    /// Sets the bit of `ty`.
    #[inline]
    pub fn set(&mut self, ty: ComponentType) {
        *self = self.with(ty);
    }

    /// Clears the bit of `ty`.
    #[inline]
    pub fn reset(&mut self, ty: ComponentType) {
        *self = self.without(ty);
    }

    /// Checks whether the bit of `ty` is set.
    #[inline]
    #[must_use]
    pub const fn test(self, ty: ComponentType) -> bool {
        (ty as usize) < COMPONENT_TYPE_MAX && self.0 & (1 << ty) != 0
    }

    /// Checks whether no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set bits.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Checks whether every bit of `required` is also set here.
    ///
    /// This is the routing test for systems: `(self & required) == required`.
    /// Every signature contains [`Signature::EMPTY`].
    #[inline]
    #[must_use]
    pub const fn contains(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// Iterates the set component types in ascending bit order.
    pub fn iter(self) -> impl Iterator<Item = ComponentType> {
        (0..COMPONENT_TYPE_MAX as ComponentType).filter(move |&ty| self.test(ty))
    }
}

impl BitOr for Signature {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Signature {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Signature {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl FromIterator<ComponentType> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_reset() {
        let mut sig = Signature::EMPTY;
        assert!(sig.is_empty());

        sig.set(3);
        assert!(sig.test(3));
        assert!(!sig.test(2));
        assert_eq!(sig.count(), 1);

        sig.reset(3);
        assert!(sig.is_empty());
    }

    #[test]
    fn test_contains_is_subset_test() {
        let a = Signature::EMPTY.with(0);
        let ab = a.with(1);

        assert!(ab.contains(a));
        assert!(!a.contains(ab));
        assert!(a.contains(Signature::EMPTY));
        assert_eq!(ab & a, a);
        assert_eq!(a | Signature::EMPTY.with(1), ab);
    }

    #[test]
    fn test_iter_ascending() {
        let sig: Signature = [5, 0, 15].into_iter().collect();
        assert_eq!(sig.iter().collect::<Vec<_>>(), vec![0, 5, 15]);
        assert_eq!(sig.bits(), 0b1000_0000_0010_0001);
    }

    #[test]
    fn test_out_of_range_bit_is_never_set() {
        assert!(!Signature::from_bits(u16::MAX).test(16));
    }

    #[test]
    #[should_panic(expected = "component type out of range")]
    fn test_with_rejects_out_of_range_bit() {
        let _ = Signature::EMPTY.with(16);
    }

    #[test]
    fn test_display_is_binary() {
        assert_eq!(Signature::EMPTY.with(1).to_string(), "0000000000000010");
    }
}
