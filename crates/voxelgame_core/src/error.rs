//! # ECS Error Types
//!
//! Recoverable failures of the ECS core: capacity exhaustion and operations
//! on state that does not allow them. Precondition violations (an ID outside
//! a manager's range, an unregistered component type) are not represented
//! here; they panic.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors that can occur in the ECS core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// An entity must carry at least one component bit.
    #[error("empty signature: an entity needs at least one component")]
    EmptySignature,

    /// Every ID of the manager's range is in use.
    #[error("entity capacity reached: all {capacity} IDs are in use")]
    EntityCapacityReached {
        /// Number of IDs the manager owns.
        capacity: usize,
    },

    /// The entity has an empty stored signature, so it does not exist.
    #[error("{0} does not exist")]
    EntityNotAlive(Entity),

    /// The component type was registered before.
    #[error("component type already registered: {name}")]
    ComponentAlreadyRegistered {
        /// Type name of the component.
        name: &'static str,
    },

    /// All signature bits are taken.
    #[error("component type limit reached: {max} types registered")]
    ComponentTypeLimitReached {
        /// Maximum number of component types.
        max: usize,
    },

    /// The dense array of a component type has no free slot.
    #[error("component array full: {name} holds {capacity} components")]
    ComponentArrayFull {
        /// Type name of the component.
        name: &'static str,
        /// Capacity of the array.
        capacity: usize,
    },

    /// The entity already holds a component of this type.
    #[error("{entity} already has a {name} component")]
    ComponentAlreadyPresent {
        /// The entity.
        entity: Entity,
        /// Type name of the component.
        name: &'static str,
    },

    /// The entity holds no component of this type.
    #[error("{entity} has no {name} component")]
    ComponentMissing {
        /// The entity.
        entity: Entity,
        /// Type name of the component.
        name: &'static str,
    },

    /// The system type was registered before.
    #[error("system already registered: {name}")]
    SystemAlreadyRegistered {
        /// Name of the system.
        name: &'static str,
    },

    /// No system of this type is registered.
    #[error("system not registered: {name}")]
    SystemNotRegistered {
        /// Name of the system.
        name: &'static str,
    },

    /// `System::initialize` reported failure.
    #[error("system failed to initialize: {name}")]
    SystemInitFailed {
        /// Name of the system.
        name: &'static str,
    },

    /// `System::on_load` reported failure.
    #[error("system failed to load: {name}")]
    SystemLoadFailed {
        /// Name of the system.
        name: &'static str,
    },

    /// `System::update` reported failure.
    #[error("system failed to update: {name}")]
    SystemUpdateFailed {
        /// Name of the system.
        name: &'static str,
    },
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_subject() {
        let err = EcsError::EntityNotAlive(Entity::from_raw(7));
        assert_eq!(err.to_string(), "Entity(7) does not exist");

        let err = EcsError::EntityCapacityReached { capacity: 4 };
        assert!(err.to_string().contains('4'));
    }
}
