//! # SharedModule
//!
//! Shared types used by the logic-brick runtime and by scene implementations.
//! This module contains ids, math types, attribute values, lifecycle enums,
//! the error taxonomy and the serializable brick definitions.

// Export module structure
pub mod types;
pub mod error;
pub mod property;
pub mod object;
pub mod constants;
pub mod lifecycle;
pub mod definition;

// Re-export commonly used items for convenience
pub use types::*;
pub use error::LogicError;
pub use property::{AttributeType, AttributeValue};
pub use object::{LogicUnitId, ObjectId, RelinkMap};
pub use lifecycle::{ActuatorState, ObjectLifecycleState, TriggerState};
