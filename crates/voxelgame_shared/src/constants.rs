//! # Engine Constants
//!
//! Compile-time limits of the ECS and the static entity ID ranges.
//!
//! **CRITICAL:** the ID ranges are part of the client/server contract.
//! Shared entities must carry the same ID on every participant, so a client
//! built with different ranges than the server cannot talk about the same
//! world objects.

// =============================================================================
// GAME
// =============================================================================

/// Window title and log banner.
pub const GAME_TITLE: &str = "VoxelGame";

// =============================================================================
// ECS CAPACITIES
// =============================================================================

/// Maximum number of live entities in one coordinator.
///
/// Applies to each ID range separately.
pub const ENTITY_MAX: usize = 1024;

/// Maximum number of component types one component manager can register.
///
/// Equal to the width of a signature in bits.
pub const COMPONENT_TYPE_MAX: usize = 16;

// =============================================================================
// ENTITY ID RANGES
// =============================================================================
//
// Entity IDs fall into two groups:
// - Shared: known to the server and every client, identical everywhere.
// - Local: meaningful only on the side that created them, never sent anywhere.
//
// The gap between the two starts is far larger than ENTITY_MAX so the ranges
// never overlap.

/// First local entity ID. `0` is reserved as the null entity.
pub const LOCAL_ID_RANGE_START: u32 = 1;

/// First shared entity ID. Local IDs run up to this value, exclusive.
pub const SHARED_ID_RANGE_START: u32 = 4_000_000;

/// End of the shared range, exclusive. Kept below `u32::MAX`.
pub const SHARED_ID_RANGE_STOP: u32 = 4_294_967_290;

// =============================================================================
// THREADING
// =============================================================================

/// How long shutdown waits for the server thread before detaching it, in ms.
pub const SERVER_JOIN_TIMEOUT_MS: u64 = 5000;
