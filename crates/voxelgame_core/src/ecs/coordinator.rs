//! # ECS Coordinator
//!
//! Single entry point over one entity, component and system manager.
//!
//! The coordinator keeps the three in step: an entity's stored signature,
//! the components it holds and the systems it is routed into always agree.

use std::any::type_name;
use std::collections::BTreeSet;

use tracing::error;

use super::component::Component;
use super::component_manager::ComponentManager;
use super::entity::{Entity, EntityManager};
use super::signature::{ComponentType, Signature};
use super::system::{System, SystemManager};
use crate::error::{EcsError, EcsResult};

/// Owns the entity, component and system managers of one world.
///
/// # Example
///
/// ```rust
/// use voxelgame_core::{Coordinator, Position3D, Signature};
///
/// let mut ecs = Coordinator::new(1, 4_000_000);
/// let ty = ecs.register_component::<Position3D>().unwrap();
///
/// let e = ecs.create_entity(Signature::EMPTY.with(ty));
/// assert!(!e.is_null());
/// assert_eq!(ecs.get_component::<Position3D>(e), &Position3D::default());
/// ```
pub struct Coordinator {
    entities: EntityManager,
    components: ComponentManager,
    systems: SystemManager,
    shut_down: bool,
}

impl Coordinator {
    /// Creates a coordinator allocating IDs from `range_start` on.
    ///
    /// # Panics
    ///
    /// See [`EntityManager::new`].
    #[must_use]
    pub fn new(range_start: u32, range_stop: u32) -> Self {
        Self::from_parts(EntityManager::new(range_start, range_stop), ComponentManager::new())
    }

    /// Creates a coordinator for `capacity` entities.
    ///
    /// # Panics
    ///
    /// See [`EntityManager::with_capacity`].
    #[must_use]
    pub fn with_capacity(range_start: u32, range_stop: u32, capacity: usize) -> Self {
        Self::from_parts(
            EntityManager::with_capacity(range_start, range_stop, capacity),
            ComponentManager::with_capacity(capacity),
        )
    }

    fn from_parts(entities: EntityManager, components: ComponentManager) -> Self {
        Self {
            entities,
            components,
            systems: SystemManager::new(),
            shut_down: false,
        }
    }

    // ---------------------------------------------------------------------
    // Entities
    // ---------------------------------------------------------------------

    /// Creates an entity holding a default component per bit of `signature`.
    ///
    /// Failures are logged and yield [`Entity::NULL`].
    ///
    /// # Panics
    ///
    /// Panics if `signature` has a bit with no registered component type.
    pub fn create_entity(&mut self, signature: Signature) -> Entity {
        match self.try_create_entity(signature) {
            Ok(entity) => entity,
            Err(err) => {
                error!(%signature, error = %err, "failed to create entity");
                Entity::NULL
            }
        }
    }

    /// Creates an entity holding a default component per bit of `signature`
    /// and routes it into every matching system.
    ///
    /// Nothing changes on failure: no ID stays allocated, no component
    /// stays inserted and no system sees the entity.
    ///
    /// # Errors
    ///
    /// Allocation errors of [`EntityManager::create_entity`] and insertion
    /// errors of [`ComponentManager::add_default_components`].
    ///
    /// # Panics
    ///
    /// Panics if `signature` has a bit with no registered component type.
    pub fn try_create_entity(&mut self, signature: Signature) -> EcsResult<Entity> {
        assert!(
            self.components.registered_signature().contains(signature),
            "signature {signature} has bits with no registered component type"
        );

        let entity = self.entities.create_entity(signature)?;

        if let Err(err) = self.components.add_default_components(signature, entity) {
            // Components were rolled back by the manager, give the ID back
            self.entities.destroy_entity(entity)?;
            return Err(err);
        }

        self.systems.add_entity_to_systems(signature, entity);
        Ok(entity)
    }

    /// Destroys `entity`: frees its ID, drops its components and removes it
    /// from every system.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityNotAlive`] if the entity does not exist.
    ///
    /// # Panics
    ///
    /// Panics if `entity` lies outside this coordinator's ID range.
    pub fn remove_entity(&mut self, entity: Entity) -> EcsResult<()> {
        let signature = self.entities.signature(entity);

        self.entities.destroy_entity(entity)?;
        self.components.remove_all_components(signature, entity);
        self.systems.remove_entity_from_all(signature, entity);

        Ok(())
    }

    /// Stored signature of `entity`, empty if it does not exist.
    ///
    /// # Panics
    ///
    /// Panics if `entity` lies outside this coordinator's ID range.
    #[inline]
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.entities.signature(entity)
    }

    /// Checks whether `entity` is in range and alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.active_count()
    }

    /// The entity manager.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    /// Registers component type `C`.
    ///
    /// # Errors
    ///
    /// See [`ComponentManager::register_component`].
    pub fn register_component<C: Component>(&mut self) -> EcsResult<ComponentType> {
        self.components.register_component::<C>()
    }

    /// Bit assigned to `C`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    #[must_use]
    pub fn component_type_id<C: Component>(&self) -> ComponentType {
        self.components.component_type_id::<C>()
    }

    /// Bit assigned to `C`, if registered.
    #[must_use]
    pub fn try_component_type_id<C: Component>(&self) -> Option<ComponentType> {
        self.components.try_component_type_id::<C>()
    }

    /// Type name of the component assigned to `ty`.
    #[must_use]
    pub fn component_type_name(&self, ty: ComponentType) -> Option<&'static str> {
        self.components.component_type_name(ty)
    }

    /// Single-bit signature of `C`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered.
    #[must_use]
    pub fn signature_of<C: Component>(&self) -> Signature {
        self.components.signature_of::<C>()
    }

    /// Adds `component` to a live entity and re-routes it.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityNotAlive`] if the entity does not exist, insertion
    /// errors of [`ComponentManager::add_component`].
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered or `entity` is out of range.
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<()> {
        let signature = self.live_signature(entity)?;
        let ty = self.components.component_type_id::<C>();

        self.components.add_component(entity, component)?;

        let new_signature = signature.with(ty);
        self.entities.set_signature(entity, new_signature)?;
        self.systems.entity_signature_changed(entity, new_signature);

        Ok(())
    }

    /// Removes and returns the `C` of a live entity and re-routes it.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityNotAlive`] if the entity does not exist,
    /// [`EcsError::ComponentMissing`] if it holds no `C`,
    /// [`EcsError::EmptySignature`] if `C` is its last component.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered or `entity` is out of range.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> EcsResult<C> {
        let signature = self.live_signature(entity)?;
        let ty = self.components.component_type_id::<C>();

        if !signature.test(ty) {
            return Err(EcsError::ComponentMissing {
                entity,
                name: type_name::<C>(),
            });
        }
        let new_signature = signature.without(ty);
        if new_signature.is_empty() {
            return Err(EcsError::EmptySignature);
        }

        let component = self
            .components
            .remove_component::<C>(entity)
            .ok_or(EcsError::ComponentMissing {
                entity,
                name: type_name::<C>(),
            })?;
        self.entities.set_signature(entity, new_signature)?;
        self.systems.entity_signature_changed(entity, new_signature);

        Ok(component)
    }

    /// Gets the `C` of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered or the entity has no `C`.
    #[must_use]
    pub fn get_component<C: Component>(&self, entity: Entity) -> &C {
        self.components.get_component(entity)
    }

    /// Gets the `C` of `entity` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not registered or the entity has no `C`.
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        self.components.get_component_mut(entity)
    }

    /// Gets the `C` of `entity`, if present.
    #[must_use]
    pub fn try_get_component<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.components.try_get_component(entity)
    }

    /// Gets the `C` of `entity` mutably, if present.
    pub fn try_get_component_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.components.try_get_component_mut(entity)
    }

    /// The component manager.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &ComponentManager {
        &self.components
    }

    /// The component manager, mutably.
    ///
    /// Writes through here bypass signature bookkeeping. Use it for
    /// component values, not for adding or removing components.
    #[inline]
    pub fn components_mut(&mut self) -> &mut ComponentManager {
        &mut self.components
    }

    // ---------------------------------------------------------------------
    // Systems
    // ---------------------------------------------------------------------

    /// Constructs and registers system `S` requiring `signature`.
    ///
    /// Entities created before the registration are not routed into it.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::register_system_with`].
    pub fn register_system<S: System + Default>(&mut self, signature: Signature) -> EcsResult<&mut S> {
        self.systems.register_system::<S>(signature)
    }

    /// Registers a pre-built system requiring `signature`.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::register_system_with`].
    pub fn register_system_with<S: System>(&mut self, system: S, signature: Signature) -> EcsResult<&mut S> {
        self.systems.register_system_with(system, signature)
    }

    /// The registered `S`.
    #[must_use]
    pub fn system<S: System>(&self) -> Option<&S> {
        self.systems.system::<S>()
    }

    /// The registered `S`, mutably.
    pub fn system_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems.system_mut::<S>()
    }

    /// Entities routed into `S`.
    #[must_use]
    pub fn system_entities<S: System>(&self) -> Option<&BTreeSet<Entity>> {
        self.systems.system_entities::<S>()
    }

    /// The system manager.
    #[inline]
    #[must_use]
    pub fn systems(&self) -> &SystemManager {
        &self.systems
    }

    /// Runs the load pass of every system.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::on_load`].
    pub fn on_load(&mut self) -> EcsResult<()> {
        self.systems.on_load(&mut self.components)
    }

    /// Runs every system once.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::update`].
    pub fn update(&mut self, delta_t: f32) -> EcsResult<()> {
        self.systems.update(&mut self.components, delta_t)
    }

    /// Runs system `S` once.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::update_system`].
    pub fn update_system<S: System>(&mut self, delta_t: f32) -> EcsResult<()> {
        self.systems.update_system::<S>(&mut self.components, delta_t)
    }

    /// Shuts every system down. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if !self.shut_down {
            self.systems.shutdown();
            self.shut_down = true;
        }
    }

    /// Checks whether [`Coordinator::shutdown`] ran.
    #[inline]
    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    fn live_signature(&self, entity: Entity) -> EcsResult<Signature> {
        let signature = self.entities.signature(entity);
        if signature.is_empty() {
            return Err(EcsError::EntityNotAlive(entity));
        }
        Ok(signature)
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}
