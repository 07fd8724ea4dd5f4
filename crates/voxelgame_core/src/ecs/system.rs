//! # Systems
//!
//! A system declares the components it needs as a required [`Signature`].
//! The [`SystemManager`] tracks, per system, the set of entities whose
//! signature contains the required one and hands that set to the system on
//! every load and update.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};

use tracing::{debug, error};

use super::component_manager::ComponentManager;
use super::entity::Entity;
use super::signature::Signature;
use crate::error::{EcsError, EcsResult};

/// Upcast to [`Any`], implemented for every `'static` type.
pub trait AsAny: Any {
    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// What a system gets to see while it runs.
pub struct SystemContext<'a> {
    /// Entities matching the system's signature, in ID order.
    pub entities: &'a BTreeSet<Entity>,
    /// Component storage of the owning coordinator.
    pub components: &'a mut ComponentManager,
}

/// Behavior run over a signature-filtered set of entities.
///
/// Returning `false` from a lifecycle hook reports a fatal failure; the
/// manager turns it into an [`EcsError`] naming the system.
///
/// # Example
///
/// ```rust
/// use voxelgame_core::{Position3D, System, SystemContext};
///
/// #[derive(Default)]
/// struct Gravity;
///
/// impl System for Gravity {
///     fn update(&mut self, ctx: SystemContext<'_>, delta_t: f32) -> bool {
///         for &entity in ctx.entities {
///             ctx.components.get_component_mut::<Position3D>(entity).0.y -= 9.81 * delta_t;
///         }
///         true
///     }
/// }
/// ```
pub trait System: AsAny + Send {
    /// Called once at registration. The system is not registered if this
    /// returns `false`.
    fn initialize(&mut self) -> bool {
        true
    }

    /// Called once when the owning coordinator shuts down.
    fn shutdown(&mut self) {}

    /// Called once after the initial entities exist.
    fn on_load(&mut self, ctx: SystemContext<'_>) -> bool {
        let _ = ctx;
        true
    }

    /// Called once per frame or tick.
    fn update(&mut self, ctx: SystemContext<'_>, delta_t: f32) -> bool;

    /// Name used in logs and errors.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

fn downcast_ref<'a, S: System>(system: &'a (dyn System + 'static)) -> Option<&'a S> {
    system.as_any().downcast_ref()
}

fn downcast_mut<'a, S: System>(system: &'a mut (dyn System + 'static)) -> Option<&'a mut S> {
    system.as_any_mut().downcast_mut()
}

/// One registered system and its bookkeeping.
struct SystemEntry {
    signature: Signature,
    entities: BTreeSet<Entity>,
    system: Box<dyn System>,
    name: &'static str,
}

impl SystemEntry {
    fn context<'a>(
        &'a mut self,
        components: &'a mut ComponentManager,
    ) -> (&'a mut (dyn System + 'static), SystemContext<'a>) {
        let ctx = SystemContext {
            entities: &self.entities,
            components,
        };
        (self.system.as_mut(), ctx)
    }
}

/// Owns all systems of one coordinator and routes entities into them.
///
/// Systems run, and receive routing events, in registration order.
#[derive(Default)]
pub struct SystemManager {
    entries: Vec<SystemEntry>,
    /// System type -> index into `entries`.
    type_ids: HashMap<TypeId, usize>,
}

impl SystemManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs `S` with `Default` and registers it.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::register_system_with`].
    pub fn register_system<S: System + Default>(&mut self, signature: Signature) -> EcsResult<&mut S> {
        self.register_system_with(S::default(), signature)
    }

    /// Registers a pre-built system requiring `signature`.
    ///
    /// Runs [`System::initialize`] first and returns the stored instance.
    ///
    /// # Errors
    ///
    /// [`EcsError::SystemAlreadyRegistered`] if an `S` is registered,
    /// [`EcsError::SystemInitFailed`] if `initialize` returns `false`.
    pub fn register_system_with<S: System>(
        &mut self,
        mut system: S,
        signature: Signature,
    ) -> EcsResult<&mut S> {
        let name = system.name();

        if self.type_ids.contains_key(&TypeId::of::<S>()) {
            return Err(EcsError::SystemAlreadyRegistered { name });
        }
        if !system.initialize() {
            error!(system = name, "system failed to initialize");
            return Err(EcsError::SystemInitFailed { name });
        }

        let index = self.entries.len();
        self.entries.push(SystemEntry {
            signature,
            entities: BTreeSet::new(),
            system: Box::new(system),
            name,
        });
        self.type_ids.insert(TypeId::of::<S>(), index);

        debug!(system = name, %signature, "registered system");

        downcast_mut(self.entries[index].system.as_mut())
            .ok_or(EcsError::SystemNotRegistered { name })
    }

    /// The registered `S`.
    #[must_use]
    pub fn system<S: System>(&self) -> Option<&S> {
        let entry = self.entry::<S>()?;
        downcast_ref(entry.system.as_ref())
    }

    /// The registered `S`, mutably.
    pub fn system_mut<S: System>(&mut self) -> Option<&mut S> {
        let &index = self.type_ids.get(&TypeId::of::<S>())?;
        downcast_mut(self.entries[index].system.as_mut())
    }

    /// Entities currently routed into `S`.
    #[must_use]
    pub fn system_entities<S: System>(&self) -> Option<&BTreeSet<Entity>> {
        self.entry::<S>().map(|entry| &entry.entities)
    }

    /// Required signature of `S`.
    #[must_use]
    pub fn system_signature<S: System>(&self) -> Option<Signature> {
        self.entry::<S>().map(|entry| entry.signature)
    }

    /// Number of registered systems.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether no system is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the registered systems in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Adds `entity` to every system whose required signature is contained
    /// in `entity_signature`.
    pub fn add_entity_to_systems(&mut self, entity_signature: Signature, entity: Entity) {
        for entry in &mut self.entries {
            if entity_signature.contains(entry.signature) {
                entry.entities.insert(entity);
            }
        }
    }

    /// Removes `entity` from every system whose required signature is
    /// contained in `entity_signature`.
    pub fn remove_entity_from_all(&mut self, entity_signature: Signature, entity: Entity) {
        for entry in &mut self.entries {
            if entity_signature.contains(entry.signature) {
                entry.entities.remove(&entity);
            }
        }
    }

    /// Re-routes `entity` after its signature became `new_signature`.
    pub fn entity_signature_changed(&mut self, entity: Entity, new_signature: Signature) {
        for entry in &mut self.entries {
            if new_signature.contains(entry.signature) {
                entry.entities.insert(entity);
            } else {
                entry.entities.remove(&entity);
            }
        }
    }

    /// Runs [`System::on_load`] on every system.
    ///
    /// # Errors
    ///
    /// [`EcsError::SystemLoadFailed`] for the first system that fails.
    /// Later systems are not run.
    pub fn on_load(&mut self, components: &mut ComponentManager) -> EcsResult<()> {
        for entry in &mut self.entries {
            let name = entry.name;
            let (system, ctx) = entry.context(components);
            if !system.on_load(ctx) {
                error!(system = name, "system failed to load");
                return Err(EcsError::SystemLoadFailed { name });
            }
        }
        Ok(())
    }

    /// Runs [`System::update`] on every system.
    ///
    /// # Errors
    ///
    /// [`EcsError::SystemUpdateFailed`] for the first system that fails.
    /// Later systems are not run.
    pub fn update(&mut self, components: &mut ComponentManager, delta_t: f32) -> EcsResult<()> {
        for entry in &mut self.entries {
            Self::update_entry(entry, components, delta_t)?;
        }
        Ok(())
    }

    /// Runs [`System::update`] on `S` only.
    ///
    /// # Errors
    ///
    /// [`EcsError::SystemNotRegistered`] if there is no `S`,
    /// [`EcsError::SystemUpdateFailed`] if it fails.
    pub fn update_system<S: System>(
        &mut self,
        components: &mut ComponentManager,
        delta_t: f32,
    ) -> EcsResult<()> {
        let Some(&index) = self.type_ids.get(&TypeId::of::<S>()) else {
            return Err(EcsError::SystemNotRegistered {
                name: type_name::<S>(),
            });
        };
        Self::update_entry(&mut self.entries[index], components, delta_t)
    }

    /// Runs [`System::shutdown`] on every system.
    pub fn shutdown(&mut self) {
        for entry in &mut self.entries {
            entry.system.shutdown();
            debug!(system = entry.name, "system shut down");
        }
    }

    fn update_entry(
        entry: &mut SystemEntry,
        components: &mut ComponentManager,
        delta_t: f32,
    ) -> EcsResult<()> {
        let name = entry.name;
        let (system, ctx) = entry.context(components);
        if system.update(ctx, delta_t) {
            Ok(())
        } else {
            error!(system = name, "system failed to update");
            Err(EcsError::SystemUpdateFailed { name })
        }
    }

    fn entry<S: System>(&self) -> Option<&SystemEntry> {
        let &index = self.type_ids.get(&TypeId::of::<S>())?;
        self.entries.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        updates: u32,
        loads: u32,
        seen: usize,
        shut_down: bool,
    }

    impl System for Counter {
        fn on_load(&mut self, ctx: SystemContext<'_>) -> bool {
            self.loads += 1;
            self.seen = ctx.entities.len();
            true
        }

        fn update(&mut self, ctx: SystemContext<'_>, _delta_t: f32) -> bool {
            self.updates += 1;
            self.seen = ctx.entities.len();
            true
        }

        fn shutdown(&mut self) {
            self.shut_down = true;
        }
    }

    #[derive(Default)]
    struct Failing;

    impl System for Failing {
        fn update(&mut self, _ctx: SystemContext<'_>, _delta_t: f32) -> bool {
            false
        }
    }

    struct Refuses;

    impl System for Refuses {
        fn initialize(&mut self) -> bool {
            false
        }

        fn update(&mut self, _ctx: SystemContext<'_>, _delta_t: f32) -> bool {
            true
        }
    }

    fn sig(bits: u16) -> Signature {
        Signature::from_bits(bits)
    }

    fn e(raw: u32) -> Entity {
        Entity::from_raw(raw)
    }

    #[test]
    fn test_register_returns_instance() {
        let mut systems = SystemManager::new();
        systems.register_system::<Counter>(sig(0b1)).unwrap().updates = 7;

        assert_eq!(systems.system::<Counter>().unwrap().updates, 7);
        assert_eq!(systems.system_signature::<Counter>(), Some(sig(0b1)));
        assert_eq!(systems.len(), 1);
        assert!(systems.names().all(|name| name.ends_with("Counter")));
    }

    #[test]
    fn test_lookup_by_type() {
        let mut systems = SystemManager::new();
        systems.register_system::<Failing>(sig(0b1)).unwrap();
        systems.register_system::<Counter>(sig(0b10)).unwrap();

        systems.system_mut::<Counter>().unwrap().loads = 3;
        assert_eq!(systems.system::<Counter>().unwrap().loads, 3);
        assert!(systems.system::<Failing>().is_some());
        assert!(systems.system_mut::<Refuses>().is_none());
    }

    #[test]
    fn test_double_registration_fails() {
        let mut systems = SystemManager::new();
        systems.register_system::<Counter>(sig(0b1)).unwrap();

        assert!(matches!(
            systems.register_system::<Counter>(sig(0b10)),
            Err(EcsError::SystemAlreadyRegistered { .. })
        ));
        assert_eq!(systems.system_signature::<Counter>(), Some(sig(0b1)));
    }

    #[test]
    fn test_failed_initialize_is_not_registered() {
        let mut systems = SystemManager::new();

        assert!(matches!(
            systems.register_system_with(Refuses, sig(0b1)),
            Err(EcsError::SystemInitFailed { .. })
        ));
        assert!(systems.is_empty());
        assert!(systems.system::<Refuses>().is_none());
    }

    #[test]
    fn test_routing_by_subset() {
        let mut systems = SystemManager::new();
        systems.register_system::<Counter>(sig(0b11)).unwrap();

        systems.add_entity_to_systems(sig(0b01), e(1));
        systems.add_entity_to_systems(sig(0b11), e(2));
        systems.add_entity_to_systems(sig(0b111), e(3));

        let routed: Vec<_> = systems.system_entities::<Counter>().unwrap().iter().copied().collect();
        assert_eq!(routed, vec![e(2), e(3)]);

        systems.remove_entity_from_all(sig(0b11), e(2));
        assert!(!systems.system_entities::<Counter>().unwrap().contains(&e(2)));
    }

    #[test]
    fn test_signature_change_reroutes() {
        let mut systems = SystemManager::new();
        systems.register_system::<Counter>(sig(0b11)).unwrap();

        systems.add_entity_to_systems(sig(0b01), e(1));
        systems.entity_signature_changed(e(1), sig(0b11));
        assert!(systems.system_entities::<Counter>().unwrap().contains(&e(1)));

        systems.entity_signature_changed(e(1), sig(0b10));
        assert!(systems.system_entities::<Counter>().unwrap().is_empty());
    }

    #[test]
    fn test_update_and_load_see_routed_entities() {
        let mut systems = SystemManager::new();
        let mut components = ComponentManager::with_capacity(4);
        systems.register_system::<Counter>(sig(0b1)).unwrap();
        systems.add_entity_to_systems(sig(0b1), e(1));
        systems.add_entity_to_systems(sig(0b1), e(2));

        systems.on_load(&mut components).unwrap();
        systems.update(&mut components, 0.016).unwrap();
        systems.update_system::<Counter>(&mut components, 0.016).unwrap();

        let counter = systems.system::<Counter>().unwrap();
        assert_eq!(counter.loads, 1);
        assert_eq!(counter.updates, 2);
        assert_eq!(counter.seen, 2);
    }

    #[test]
    fn test_failed_update_names_system() {
        let mut systems = SystemManager::new();
        let mut components = ComponentManager::with_capacity(4);
        systems.register_system::<Counter>(sig(0b1)).unwrap();
        systems.register_system::<Failing>(sig(0b1)).unwrap();

        let err = systems.update(&mut components, 0.016).unwrap_err();
        assert!(matches!(err, EcsError::SystemUpdateFailed { name } if name.ends_with("Failing")));

        // Systems before the failing one still ran
        assert_eq!(systems.system::<Counter>().unwrap().updates, 1);
    }

    #[test]
    fn test_update_unregistered_system() {
        let mut systems = SystemManager::new();
        let mut components = ComponentManager::with_capacity(4);

        assert!(matches!(
            systems.update_system::<Counter>(&mut components, 0.016),
            Err(EcsError::SystemNotRegistered { .. })
        ));
    }

    #[test]
    fn test_shutdown_reaches_every_system() {
        let mut systems = SystemManager::new();
        systems.register_system::<Counter>(sig(0b1)).unwrap();
        systems.shutdown();
        assert!(systems.system::<Counter>().unwrap().shut_down);
    }
}
