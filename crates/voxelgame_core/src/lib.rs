//! # VoxelGame Core Engine
//!
//! Entity Component System (ECS) shared by the client world renderer and
//! the server world.
//!
//! ## Architecture Rules
//!
//! 1. **Fixed capacity** - ID queues and component arrays are sized up front
//! 2. **Dense storage** - Components of one type are packed with no gaps
//! 3. **Disjoint ID ranges** - Local and shared entities never share an ID
//!
//! ## Example
//!
//! ```rust
//! use voxelgame_core::{Coordinator, Position3D, Signature};
//! use voxelgame_shared::{LOCAL_ID_RANGE_START, SHARED_ID_RANGE_START};
//!
//! let mut ecs = Coordinator::new(LOCAL_ID_RANGE_START, SHARED_ID_RANGE_START);
//! let position = ecs.register_component::<Position3D>().unwrap();
//!
//! let entity = ecs.create_entity(Signature::EMPTY.with(position));
//! assert_eq!(entity.raw(), LOCAL_ID_RANGE_START);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;

pub use ecs::{
    AsAny, Component, ComponentArray, ComponentManager, ComponentType, Coordinator, Entity,
    EntityManager, ErasedComponentArray, Position3D, Signature, System, SystemContext,
    SystemManager, Transform3D,
};
pub use error::{EcsError, EcsResult};
