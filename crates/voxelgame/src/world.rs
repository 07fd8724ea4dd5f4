//! # Server World
//!
//! The authoritative world owned by the server thread. Its entities use the
//! shared ID range, so they never collide with client-local entities.

use tracing::info;
use voxelgame_core::{ComponentType, Coordinator, Entity, Position3D, Signature, Transform3D};
use voxelgame_shared::{SHARED_ID_RANGE_START, SHARED_ID_RANGE_STOP};

use crate::error::EngineResult;

/// Server-side world.
pub struct World {
    ecs: Coordinator,
    /// Bit of [`Position3D`], forced onto every entity.
    position: ComponentType,
}

impl World {
    /// Creates the world and registers the world components.
    ///
    /// # Errors
    ///
    /// Component registration errors.
    pub fn create() -> EngineResult<Self> {
        info!("creating world");

        let mut ecs = Coordinator::new(SHARED_ID_RANGE_START, SHARED_ID_RANGE_STOP);
        let position = ecs.register_component::<Position3D>()?;
        ecs.register_component::<Transform3D>()?;

        Ok(Self { ecs, position })
    }

    /// Creates a world object. Every world object has a position, so the
    /// [`Position3D`] bit is added to `signature`.
    ///
    /// Returns [`Entity::NULL`] on failure.
    pub fn create_entity(&mut self, signature: Signature) -> Entity {
        self.ecs.create_entity(signature.with(self.position))
    }

    /// Destroys a world object.
    ///
    /// # Errors
    ///
    /// [`voxelgame_core::EcsError::EntityNotAlive`] if it does not exist.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not in the shared ID range.
    pub fn destroy_entity(&mut self, entity: Entity) -> EngineResult<()> {
        self.ecs.remove_entity(entity)?;
        Ok(())
    }

    /// Runs every world system once.
    ///
    /// # Errors
    ///
    /// The first failing system.
    pub fn update(&mut self, delta_t: f32) -> EngineResult<()> {
        self.ecs.update(delta_t)?;
        Ok(())
    }

    /// Number of live world objects.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.ecs.entity_count()
    }

    /// The world's ECS.
    #[must_use]
    pub fn coordinator(&self) -> &Coordinator {
        &self.ecs
    }

    /// The world's ECS, mutably.
    pub fn coordinator_mut(&mut self) -> &mut Coordinator {
        &mut self.ecs
    }

    /// Tears the world down.
    pub fn destroy(self) {
        drop(self);
    }
}

impl Drop for World {
    fn drop(&mut self) {
        info!(entities = self.ecs.entity_count(), "cleaning up world");
        self.ecs.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_use_shared_range_and_have_position() {
        let mut world = World::create().unwrap();
        let transform = world.coordinator().signature_of::<Transform3D>();

        let e = world.create_entity(transform);

        assert_eq!(e.raw(), SHARED_ID_RANGE_START);
        let sig = world.coordinator().signature(e);
        assert!(sig.contains(transform));
        assert!(sig.contains(world.coordinator().signature_of::<Position3D>()));
    }

    #[test]
    fn test_empty_signature_still_gets_position() {
        let mut world = World::create().unwrap();
        let e = world.create_entity(Signature::EMPTY);

        assert!(!e.is_null());
        assert_eq!(
            world.coordinator().get_component::<Position3D>(e),
            &Position3D::default()
        );
    }

    #[test]
    fn test_destroy_entity() {
        let mut world = World::create().unwrap();
        let e = world.create_entity(Signature::EMPTY);

        world.destroy_entity(e).unwrap();
        assert_eq!(world.entity_count(), 0);
        assert!(world.destroy_entity(e).is_err());
    }

    #[test]
    fn test_update_without_systems() {
        let mut world = World::create().unwrap();
        world.update(0.05).unwrap();
        world.destroy();
    }
}
