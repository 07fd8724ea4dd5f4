//! # Component Manager
//!
//! Owns one [`ComponentArray`] per registered component type and maps Rust
//! types to signature bits.
//!
//! Arrays are stored type-erased in registration order, so the bit of a
//! type doubles as the index of its array.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use tracing::debug;
use voxelgame_shared::{COMPONENT_TYPE_MAX, ENTITY_MAX};

use super::component::Component;
use super::entity::Entity;
use super::signature::{ComponentType, Signature};
use super::storage::{ComponentArray, ErasedComponentArray};
use crate::error::{EcsError, EcsResult};

/// Registry and owner of all component arrays of one coordinator.
pub struct ComponentManager {
    /// Arrays indexed by component type.
    arrays: Vec<Box<dyn ErasedComponentArray>>,
    /// Rust type -> component type.
    type_ids: HashMap<TypeId, ComponentType>,
    /// Capacity given to every new array.
    capacity: usize,
}

impl ComponentManager {
    /// Creates a manager whose arrays hold [`ENTITY_MAX`] components.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(ENTITY_MAX)
    }

    /// Creates a manager whose arrays hold `capacity` components.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            arrays: Vec::with_capacity(COMPONENT_TYPE_MAX),
            type_ids: HashMap::with_capacity(COMPONENT_TYPE_MAX),
            capacity,
        }
    }

    /// Registers `C` and assigns it the next free bit.
    ///
    /// # Errors
    ///
    /// [`EcsError::ComponentAlreadyRegistered`] on a second registration,
    /// [`EcsError::ComponentTypeLimitReached`] once every bit is taken.
    pub fn register_component<C: Component>(&mut self) -> EcsResult<ComponentType> {
        let name = type_name::<C>();

        if self.type_ids.contains_key(&TypeId::of::<C>()) {
            return Err(EcsError::ComponentAlreadyRegistered { name });
        }
        if self.arrays.len() >= COMPONENT_TYPE_MAX {
            return Err(EcsError::ComponentTypeLimitReached {
                max: COMPONENT_TYPE_MAX,
            });
        }

        // Bounded by COMPONENT_TYPE_MAX above
        let ty = self.arrays.len() as ComponentType;
        self.arrays
            .push(Box::new(ComponentArray::<C>::with_capacity(self.capacity)));
        self.type_ids.insert(TypeId::of::<C>(), ty);

        debug!(component = name, bit = ty, "registered component type");
        Ok(ty)
    }

    /// Returns the bit assigned to `C`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    #[must_use]
    pub fn component_type_id<C: Component>(&self) -> ComponentType {
        match self.try_component_type_id::<C>() {
            Some(ty) => ty,
            None => panic!("component type {} is not registered", type_name::<C>()),
        }
    }

    /// Returns the bit assigned to `C`, if registered.
    #[inline]
    #[must_use]
    pub fn try_component_type_id<C: Component>(&self) -> Option<ComponentType> {
        self.type_ids.get(&TypeId::of::<C>()).copied()
    }

    /// Reverse lookup: type name of the component assigned to `ty`.
    #[must_use]
    pub fn component_type_name(&self, ty: ComponentType) -> Option<&'static str> {
        self.arrays
            .get(usize::from(ty))
            .map(|array| array.component_name())
    }

    /// Single-bit signature of `C`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    #[must_use]
    pub fn signature_of<C: Component>(&self) -> Signature {
        Signature::EMPTY.with(self.component_type_id::<C>())
    }

    /// Checks whether `C` is registered.
    #[inline]
    #[must_use]
    pub fn is_registered<C: Component>(&self) -> bool {
        self.type_ids.contains_key(&TypeId::of::<C>())
    }

    /// Signature with the bit of every registered type set.
    #[must_use]
    pub fn registered_signature(&self) -> Signature {
        (0..self.arrays.len() as ComponentType).collect()
    }

    /// Adds `component` to `entity`.
    ///
    /// # Errors
    ///
    /// Same as [`ComponentArray::insert`].
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<()> {
        self.component_array_mut::<C>().insert(entity, component)
    }

    /// Removes and returns the `C` of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Option<C> {
        self.component_array_mut::<C>().remove(entity)
    }

    /// Gets the `C` of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered or the entity has no `C`.
    #[must_use]
    pub fn get_component<C: Component>(&self, entity: Entity) -> &C {
        match self.component_array::<C>().get(entity) {
            Some(component) => component,
            None => panic!("{entity} has no {} component", type_name::<C>()),
        }
    }

    /// Gets the `C` of `entity` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered or the entity has no `C`.
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        match self.component_array_mut::<C>().get_mut(entity) {
            Some(component) => component,
            None => panic!("{entity} has no {} component", type_name::<C>()),
        }
    }

    /// Gets the `C` of `entity`, if `C` is registered and present.
    #[must_use]
    pub fn try_get_component<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.try_component_array::<C>()?.get(entity)
    }

    /// Gets the `C` of `entity` mutably, if `C` is registered and present.
    pub fn try_get_component_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.try_component_array_mut::<C>()?.get_mut(entity)
    }

    /// Checks whether `entity` has a `C`.
    #[must_use]
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        self.try_component_array::<C>()
            .is_some_and(|array| array.contains(entity))
    }

    /// Typed array of `C`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    #[must_use]
    pub fn component_array<C: Component>(&self) -> &ComponentArray<C> {
        match self.try_component_array::<C>() {
            Some(array) => array,
            None => panic!("component type {} is not registered", type_name::<C>()),
        }
    }

    /// Typed array of `C`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    pub fn component_array_mut<C: Component>(&mut self) -> &mut ComponentArray<C> {
        match self.try_component_array_mut::<C>() {
            Some(array) => array,
            None => panic!("component type {} is not registered", type_name::<C>()),
        }
    }

    /// Typed array of `C`, if registered.
    #[must_use]
    pub fn try_component_array<C: Component>(&self) -> Option<&ComponentArray<C>> {
        let ty = self.try_component_type_id::<C>()?;
        self.arrays[usize::from(ty)].as_any().downcast_ref()
    }

    /// Typed array of `C` mutably, if registered.
    pub fn try_component_array_mut<C: Component>(&mut self) -> Option<&mut ComponentArray<C>> {
        let ty = self.try_component_type_id::<C>()?;
        self.arrays[usize::from(ty)].as_any_mut().downcast_mut()
    }

    /// Inserts a default component for every bit of `signature`.
    ///
    /// Either every component is inserted or none: on failure the ones
    /// already inserted by this call are removed again.
    ///
    /// # Errors
    ///
    /// The first insertion error.
    ///
    /// # Panics
    ///
    /// Panics if `signature` has a bit with no registered type.
    pub fn add_default_components(&mut self, signature: Signature, entity: Entity) -> EcsResult<()> {
        self.assert_registered(signature);

        let mut inserted = Signature::EMPTY;
        for ty in signature.iter() {
            if let Err(err) = self.arrays[usize::from(ty)].insert_default(entity) {
                self.remove_all_components(inserted, entity);
                return Err(err);
            }
            inserted.set(ty);
        }

        Ok(())
    }

    /// Removes the component of every bit of `signature` from `entity`.
    ///
    /// Bits the entity holds no component for are skipped.
    ///
    /// # Panics
    ///
    /// Panics if `signature` has a bit with no registered type.
    pub fn remove_all_components(&mut self, signature: Signature, entity: Entity) {
        self.assert_registered(signature);

        for ty in signature.iter() {
            self.arrays[usize::from(ty)].remove_entity(entity);
        }
    }

    /// Removes `entity` from every registered array, whatever its signature.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for array in &mut self.arrays {
            array.remove_entity(entity);
        }
    }

    /// Number of components stored for type `ty`.
    #[must_use]
    pub fn array_len(&self, ty: ComponentType) -> Option<usize> {
        self.arrays.get(usize::from(ty)).map(|array| array.len())
    }

    fn assert_registered(&self, signature: Signature) {
        assert!(
            self.registered_signature().contains(signature),
            "signature {signature} has bits with no registered component type"
        );
    }
}

impl Default for ComponentManager {
    fn default() -> Self {
        Self::new()
    }
}
