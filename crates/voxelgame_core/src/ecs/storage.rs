//! # Component Storage
//!
//! Dense, pre-allocated storage for one component type.
//!
//! The storage uses a packed array strategy:
//! - Memory for the full capacity is reserved at creation
//! - Live components occupy slots `0..len` with no gaps
//! - Removal moves the last component into the freed slot
//! - Iteration is cache-friendly (contiguous memory)

use std::any::{type_name, Any};
use std::collections::HashMap;

use voxelgame_shared::ENTITY_MAX;

use super::component::Component;
use super::entity::Entity;
use crate::error::{EcsError, EcsResult};

/// Packed storage for a single component type.
///
/// Two maps tie slots to entities: `entity -> slot` for lookups and
/// `slot -> entity` for repointing the component moved on removal. Both
/// always hold exactly `len` entries.
///
/// # Example
///
/// ```rust
/// use voxelgame_core::{ComponentArray, Entity, Position3D};
///
/// let mut positions: ComponentArray<Position3D> = ComponentArray::with_capacity(8);
/// let e = Entity::from_raw(1);
///
/// positions.insert(e, Position3D::new(1.0, 2.0, 3.0)).unwrap();
/// assert_eq!(positions.get(e), Some(&Position3D::new(1.0, 2.0, 3.0)));
/// ```
pub struct ComponentArray<C: Component> {
    /// Packed components, slot `i` belongs to `index_to_entity[i]`.
    data: Vec<C>,
    /// Entity -> slot.
    entity_to_index: HashMap<Entity, usize>,
    /// Slot -> entity.
    index_to_entity: Vec<Entity>,
    /// Maximum number of components.
    capacity: usize,
}

impl<C: Component> ComponentArray<C> {
    /// Creates an empty array that holds up to `capacity` components.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            data: Vec::with_capacity(capacity),
            entity_to_index: HashMap::with_capacity(capacity),
            index_to_entity: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a component for `entity` at slot `len`.
    ///
    /// # Errors
    ///
    /// [`EcsError::ComponentAlreadyPresent`] if the entity already has one,
    /// [`EcsError::ComponentArrayFull`] if every slot is taken.
    pub fn insert(&mut self, entity: Entity, component: C) -> EcsResult<()> {
        if self.entity_to_index.contains_key(&entity) {
            return Err(EcsError::ComponentAlreadyPresent {
                entity,
                name: type_name::<C>(),
            });
        }
        if self.data.len() == self.capacity {
            return Err(EcsError::ComponentArrayFull {
                name: type_name::<C>(),
                capacity: self.capacity,
            });
        }

        let index = self.data.len();
        self.data.push(component);
        self.index_to_entity.push(entity);
        self.entity_to_index.insert(entity, index);

        Ok(())
    }

    /// Removes and returns the component of `entity`.
    ///
    /// The last component moves into the freed slot, so slot order is not
    /// stable across removals.
    pub fn remove(&mut self, entity: Entity) -> Option<C> {
        let index = self.entity_to_index.remove(&entity)?;

        let component = self.data.swap_remove(index);
        self.index_to_entity.swap_remove(index);

        // Repoint the entity whose component filled the hole
        if let Some(&moved) = self.index_to_entity.get(index) {
            self.entity_to_index.insert(moved, index);
        }

        Some(component)
    }

    /// Gets the component of `entity`.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        let &index = self.entity_to_index.get(&entity)?;
        self.data.get(index)
    }

    /// Gets the component of `entity` mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        let &index = self.entity_to_index.get(&entity)?;
        self.data.get_mut(index)
    }

    /// Checks whether `entity` has a component here.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    /// Number of stored components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks whether no component is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maximum number of components.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Packed components in slot order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.data
    }

    /// Packed components in slot order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.data
    }

    /// Owners of the components in slot order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.index_to_entity
    }

    /// Iterates components with their owners.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.index_to_entity.iter().copied().zip(self.data.iter())
    }

    /// Iterates components mutably with their owners.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.index_to_entity.iter().copied().zip(self.data.iter_mut())
    }
}

impl<C: Component> Default for ComponentArray<C> {
    fn default() -> Self {
        Self::with_capacity(ENTITY_MAX)
    }
}

/// Type-erased view of a [`ComponentArray`].
///
/// The component manager keeps one array per registered type behind this
/// trait and only needs the operations that do not mention `C`. Typed
/// access goes through [`ErasedComponentArray::as_any`].
pub trait ErasedComponentArray: Any + Send {
    /// Inserts a default-constructed component for `entity`.
    ///
    /// # Errors
    ///
    /// Same as [`ComponentArray::insert`].
    fn insert_default(&mut self, entity: Entity) -> EcsResult<()>;

    /// Drops the component of `entity`. Returns `false` if there was none.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Checks whether `entity` has a component here.
    fn contains(&self, entity: Entity) -> bool;

    /// Number of stored components.
    fn len(&self) -> usize;

    /// Checks whether no component is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name of the stored component.
    fn component_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete array.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete array.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedComponentArray for ComponentArray<C> {
    fn insert_default(&mut self, entity: Entity) -> EcsResult<()> {
        self.insert(entity, C::default())
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        ComponentArray::contains(self, entity)
    }

    fn len(&self) -> usize {
        ComponentArray::len(self)
    }

    fn component_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
