//! # VoxelGame Shared
//!
//! Definitions that both the client and the server must agree on.
//!
//! ## Contents
//!
//! - [`constants`]: ECS capacities and the entity ID ranges. Changing any of
//!   them changes which IDs the client and the server hand out, so both sides
//!   must be rebuilt together.
//! - [`math`]: the small vector type used by world components.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    COMPONENT_TYPE_MAX, ENTITY_MAX, GAME_TITLE, LOCAL_ID_RANGE_START, SERVER_JOIN_TIMEOUT_MS,
    SHARED_ID_RANGE_START, SHARED_ID_RANGE_STOP,
};
pub use math::Vec3;
