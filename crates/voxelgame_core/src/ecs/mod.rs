//! # Entity Component System
//!
//! Signature-routed ECS over fixed-capacity storage.
//!
//! ## Design Philosophy
//!
//! - Entity IDs come from a fixed, offsettable range, recycled FIFO
//! - Each component type is packed into its own dense array
//! - A 16-bit signature per entity says which arrays hold its data
//! - Systems see exactly the entities whose signature covers theirs

mod component;
mod component_manager;
mod coordinator;
mod entity;
mod signature;
mod storage;
mod system;

pub use component::{Component, Position3D, Transform3D};
pub use component_manager::ComponentManager;
pub use coordinator::Coordinator;
pub use entity::{Entity, EntityManager};
pub use signature::{ComponentType, Signature};
pub use storage::{ComponentArray, ErasedComponentArray};
pub use system::{AsAny, System, SystemContext, SystemManager};
