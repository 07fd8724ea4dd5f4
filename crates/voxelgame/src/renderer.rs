//! # World Renderer
//!
//! Client-side view of the world. Entities created here are local to the
//! client and use the local ID range.
//!
//! The [`RenderSystem`] turns every entity with a position into a
//! [`RenderInstance`]. The instance list is kept CPU-side and exposed as raw
//! bytes ready for upload; GPU submission happens elsewhere.

use bytemuck::{Pod, Zeroable};
use tracing::{debug, info};
use voxelgame_core::{
    ComponentType, Coordinator, Entity, Position3D, Signature, System, SystemContext, Transform3D,
};
use voxelgame_shared::{Vec3, ENTITY_MAX, LOCAL_ID_RANGE_START, SHARED_ID_RANGE_START};

use crate::error::EngineResult;

/// Per-entity data consumed by the draw call.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// World-space position.
    pub position: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

/// Builds the instance list from every entity with a [`Position3D`].
///
/// The list is rebuilt on load and on [`WorldRenderer::render`]; a plain
/// update pass leaves it alone. Entities without a [`Transform3D`] are drawn
/// at unit scale.
#[derive(Default)]
pub struct RenderSystem {
    instances: Vec<RenderInstance>,
    /// Instance list rebuilds since load.
    rebuilds: u64,
    /// Set by [`WorldRenderer::render`], consumed by the next update.
    render_requested: bool,
}

impl RenderSystem {
    /// Instances of the last rebuild, in entity ID order.
    #[must_use]
    pub fn instances(&self) -> &[RenderInstance] {
        &self.instances
    }

    /// Raw bytes of [`RenderSystem::instances`].
    #[must_use]
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Number of rebuilds so far.
    #[must_use]
    pub const fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    fn rebuild(&mut self, ctx: &SystemContext<'_>) {
        self.instances.clear();
        self.instances.extend(ctx.entities.iter().map(|&entity| RenderInstance {
            position: ctx.components.get_component::<Position3D>(entity).0,
            scale: ctx
                .components
                .try_get_component::<Transform3D>(entity)
                .map_or(Vec3::ONE, |transform| transform.scale),
        }));
        self.rebuilds += 1;
    }
}

impl System for RenderSystem {
    fn initialize(&mut self) -> bool {
        self.instances.reserve(ENTITY_MAX);
        true
    }

    fn shutdown(&mut self) {
        self.instances = Vec::new();
    }

    fn on_load(&mut self, ctx: SystemContext<'_>) -> bool {
        self.rebuild(&ctx);
        debug!(instances = self.instances.len(), "render system loaded");
        true
    }

    fn update(&mut self, ctx: SystemContext<'_>, _delta_t: f32) -> bool {
        if std::mem::take(&mut self.render_requested) {
            self.rebuild(&ctx);
        }
        true
    }
}

/// Client-side world renderer.
pub struct WorldRenderer {
    ecs: Coordinator,
    /// Bit of [`Position3D`], forced onto every entity.
    position: ComponentType,
}

impl WorldRenderer {
    /// Creates the renderer ECS and registers components and the render
    /// system.
    ///
    /// # Errors
    ///
    /// Component or system registration errors.
    pub fn initialize() -> EngineResult<Self> {
        info!("initializing world renderer");

        let mut ecs = Coordinator::new(LOCAL_ID_RANGE_START, SHARED_ID_RANGE_START);
        let position = ecs.register_component::<Position3D>()?;
        ecs.register_component::<Transform3D>()?;
        ecs.register_system::<RenderSystem>(Signature::EMPTY.with(position))?;

        Ok(Self { ecs, position })
    }

    /// Creates a client-local object with a [`Position3D`] plus the
    /// components of `signature`.
    ///
    /// Returns [`Entity::NULL`] on failure.
    pub fn create_client_entity(&mut self, signature: Signature) -> Entity {
        self.ecs.create_entity(signature.with(self.position))
    }

    /// Destroys a client-local object.
    ///
    /// # Errors
    ///
    /// [`voxelgame_core::EcsError::EntityNotAlive`] if it does not exist.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not in the local ID range.
    pub fn destroy_client_entity(&mut self, entity: Entity) -> EngineResult<()> {
        self.ecs.remove_entity(entity)?;
        Ok(())
    }

    /// Runs the load pass of every system.
    ///
    /// # Errors
    ///
    /// The first failing system.
    pub fn on_load(&mut self) -> EngineResult<()> {
        self.ecs.on_load()?;
        Ok(())
    }

    /// Runs every system once.
    ///
    /// # Errors
    ///
    /// The first failing system.
    pub fn update(&mut self, delta_t: f32) -> EngineResult<()> {
        self.ecs.update(delta_t)?;
        Ok(())
    }

    /// Rebuilds the instance list from the current entities.
    ///
    /// # Errors
    ///
    /// The render system failed.
    pub fn render(&mut self) -> EngineResult<()> {
        if let Some(system) = self.ecs.system_mut::<RenderSystem>() {
            system.render_requested = true;
        }
        self.ecs.update_system::<RenderSystem>(0.0)?;
        Ok(())
    }

    /// The render system.
    #[must_use]
    pub fn render_system(&self) -> Option<&RenderSystem> {
        self.ecs.system::<RenderSystem>()
    }

    /// The renderer's ECS.
    #[must_use]
    pub fn coordinator(&self) -> &Coordinator {
        &self.ecs
    }

    /// The renderer's ECS, mutably.
    pub fn coordinator_mut(&mut self) -> &mut Coordinator {
        &mut self.ecs
    }

    /// Tears the renderer down.
    pub fn destroy(self) {
        drop(self);
    }
}

impl Drop for WorldRenderer {
    fn drop(&mut self) {
        info!("destroying world renderer");
        self.ecs.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_entities_use_local_range() {
        let mut renderer = WorldRenderer::initialize().unwrap();
        let e = renderer.create_client_entity(Signature::EMPTY);
        assert_eq!(e.raw(), LOCAL_ID_RANGE_START);
    }

    #[test]
    fn test_render_builds_instances() {
        let mut renderer = WorldRenderer::initialize().unwrap();
        let transform = renderer.coordinator().signature_of::<Transform3D>();

        let plain = renderer.create_client_entity(Signature::EMPTY);
        let scaled = renderer.create_client_entity(transform);

        let ecs = renderer.coordinator_mut();
        ecs.get_component_mut::<Position3D>(plain).0 = Vec3::new(1.0, 2.0, 3.0);
        ecs.get_component_mut::<Transform3D>(scaled).scale = Vec3::splat(2.0);

        renderer.render().unwrap();

        let system = renderer.render_system().unwrap();
        assert_eq!(
            system.instances(),
            &[
                RenderInstance {
                    position: Vec3::new(1.0, 2.0, 3.0),
                    scale: Vec3::ONE,
                },
                RenderInstance {
                    position: Vec3::ZERO,
                    scale: Vec3::splat(2.0),
                },
            ]
        );
        assert_eq!(
            system.instance_bytes().len(),
            2 * std::mem::size_of::<RenderInstance>()
        );
    }

    #[test]
    fn test_destroyed_entity_leaves_instance_list() {
        let mut renderer = WorldRenderer::initialize().unwrap();
        let e = renderer.create_client_entity(Signature::EMPTY);
        renderer.on_load().unwrap();
        assert_eq!(renderer.render_system().unwrap().instances().len(), 1);

        renderer.destroy_client_entity(e).unwrap();
        renderer.render().unwrap();
        assert!(renderer.render_system().unwrap().instances().is_empty());
        assert_eq!(renderer.render_system().unwrap().rebuilds(), 2);
    }

    #[test]
    fn test_one_rebuild_per_frame() {
        let mut renderer = WorldRenderer::initialize().unwrap();
        renderer.create_client_entity(Signature::EMPTY);
        renderer.on_load().unwrap();

        for _ in 0..3 {
            renderer.update(0.016).unwrap();
            renderer.render().unwrap();
        }
        assert_eq!(renderer.render_system().unwrap().rebuilds(), 4);

        // Update alone does not touch the instance list
        renderer.create_client_entity(Signature::EMPTY);
        renderer.update(0.016).unwrap();
        let system = renderer.render_system().unwrap();
        assert_eq!(system.rebuilds(), 4);
        assert_eq!(system.instances().len(), 1);
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), 24);
    }
}
