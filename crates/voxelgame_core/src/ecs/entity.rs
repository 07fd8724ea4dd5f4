//! # Entity Management
//!
//! Entities are plain integer handles. `0` is the null entity.
//!
//! An [`EntityManager`] owns a fixed block of IDs starting at an offset, so
//! two managers configured with disjoint ranges (local and shared) never hand
//! out the same ID. Signatures are stored in a flat array indexed by
//! `entity - range_start`.

use std::collections::VecDeque;
use std::fmt;

use voxelgame_shared::ENTITY_MAX;

use super::signature::Signature;
use crate::error::{EcsError, EcsResult};

/// Handle identifying one game object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Null/invalid entity.
    pub const NULL: Self = Self(0);

    /// Wraps a raw ID.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw ID.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Checks if this is the null entity.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates entity IDs from `[range_start, range_start + capacity)`.
///
/// IDs are handed out FIFO: destroyed IDs go to the back of the queue, so
/// reuse is spread over the whole range and an ID is not recycled while
/// older free IDs are still waiting.
///
/// # Example
///
/// ```rust
/// use voxelgame_core::{EntityManager, Signature};
///
/// let mut entities = EntityManager::new(1, 4_000_000);
/// let sig = Signature::EMPTY.with(0);
///
/// let e = entities.create_entity(sig).unwrap();
/// assert_eq!(e.raw(), 1);
/// assert_eq!(entities.signature(e), sig);
/// ```
pub struct EntityManager {
    /// Free IDs, front is handed out next.
    available: VecDeque<Entity>,
    /// Signature per ID, empty when the ID is free.
    signatures: Box<[Signature]>,
    /// First ID of the range.
    range_start: u32,
    /// Number of live entities.
    active: usize,
}

impl EntityManager {
    /// Creates a manager for [`ENTITY_MAX`] IDs starting at `range_start`.
    ///
    /// # Panics
    ///
    /// See [`EntityManager::with_capacity`].
    #[must_use]
    pub fn new(range_start: u32, range_stop: u32) -> Self {
        Self::with_capacity(range_start, range_stop, ENTITY_MAX)
    }

    /// Creates a manager for `capacity` IDs starting at `range_start`.
    ///
    /// `range_stop` is only checked: the block must end before it.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero, if `range_start` is the null ID, or if
    /// `range_start + capacity` is not below `range_stop`.
    #[must_use]
    pub fn with_capacity(range_start: u32, range_stop: u32, capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(range_start > 0, "ID 0 is reserved for the null entity");
        assert!(
            u64::from(range_start) + (capacity as u64) < u64::from(range_stop),
            "ID range [{range_start}, {range_stop}) cannot hold {capacity} entities"
        );

        // Range check above keeps every ID inside u32.
        let available = (0..capacity)
            .map(|offset| Entity(range_start + offset as u32))
            .collect();

        Self {
            available,
            signatures: vec![Signature::EMPTY; capacity].into_boxed_slice(),
            range_start,
            active: 0,
        }
    }

    /// Allocates an ID and stores `signature` for it.
    ///
    /// # Errors
    ///
    /// [`EcsError::EmptySignature`] if `signature` is empty,
    /// [`EcsError::EntityCapacityReached`] if every ID is in use. Nothing is
    /// consumed on failure.
    pub fn create_entity(&mut self, signature: Signature) -> EcsResult<Entity> {
        if signature.is_empty() {
            return Err(EcsError::EmptySignature);
        }

        let Some(entity) = self.available.pop_front() else {
            return Err(EcsError::EntityCapacityReached {
                capacity: self.capacity(),
            });
        };

        let index = self.index_of(entity);
        self.signatures[index] = signature;
        self.active += 1;

        Ok(entity)
    }

    /// Frees `entity` and clears its signature.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityNotAlive`] if the stored signature is empty.
    ///
    /// # Panics
    ///
    /// Panics if `entity` lies outside this manager's range.
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        let index = self.index_of(entity);

        if self.signatures[index].is_empty() {
            return Err(EcsError::EntityNotAlive(entity));
        }

        self.signatures[index] = Signature::EMPTY;
        self.available.push_back(entity);
        self.active -= 1;

        // Catch double frees and other queue corruption
        debug_assert_eq!(self.available.len() + self.active, self.capacity());

        Ok(())
    }

    /// Replaces the signature of a live entity.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityNotAlive`] if the entity has no signature,
    /// [`EcsError::EmptySignature`] if `signature` is empty.
    ///
    /// # Panics
    ///
    /// Panics if `entity` lies outside this manager's range.
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> EcsResult<()> {
        let index = self.index_of(entity);

        if self.signatures[index].is_empty() {
            return Err(EcsError::EntityNotAlive(entity));
        }
        if signature.is_empty() {
            return Err(EcsError::EmptySignature);
        }

        self.signatures[index] = signature;
        Ok(())
    }

    /// Returns the stored signature, empty if the entity is not alive.
    ///
    /// # Panics
    ///
    /// Panics if `entity` lies outside this manager's range.
    #[inline]
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.signatures[self.index_of(entity)]
    }

    /// Checks whether `entity` lies in this manager's range.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        entity.0 >= self.range_start && ((entity.0 - self.range_start) as usize) < self.capacity()
    }

    /// Checks whether `entity` is in range and alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.contains(entity) && !self.signature(entity).is_empty()
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active
    }

    /// Number of IDs still free.
    #[inline]
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Number of IDs this manager owns.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.signatures.len()
    }

    /// First ID of the range.
    #[inline]
    #[must_use]
    pub const fn range_start(&self) -> u32 {
        self.range_start
    }

    fn index_of(&self, entity: Entity) -> usize {
        assert!(
            self.contains(entity),
            "{entity} is outside the ID range starting at {}",
            self.range_start
        );
        (entity.0 - self.range_start) as usize
    }
}
