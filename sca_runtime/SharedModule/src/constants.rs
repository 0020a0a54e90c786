//! # Shared Constants
//!
//! Constants used across the logic runtime.

/// Version of the logic-brick runtime
pub const SCA_RUNTIME_VERSION: &str = "0.1.0";

/// Object system constants
pub mod object {
    /// First id handed out to scene objects; lower values are reserved
    pub const FIRST_OBJECT_ID: u64 = 1;

    /// Reference count held by the scene itself for every live object
    pub const SCENE_REFERENCE: u32 = 1;
}

/// Add-object actuator constants
pub mod add_object {
    /// Most objects a single add-object actuator is registered with at once
    /// (template + last created)
    pub const MAX_REGISTRATIONS: usize = 2;

    /// Smallest allowed spawn delay
    pub const MIN_SPAWN_DELAY: f32 = 0.0;

    /// Largest allowed spawn delay
    pub const MAX_SPAWN_DELAY: f32 = f32::MAX;
}

/// Scripting attribute names
pub mod attributes {
    pub const OBJECT: &str = "object";
    pub const OBJECT_LAST_CREATED: &str = "objectLastCreated";
    pub const TIME: &str = "time";
    pub const LINEAR_VELOCITY: &str = "linearVelocity";
    pub const ANGULAR_VELOCITY: &str = "angularVelocity";
    pub const LINEAR_VELOCITY_LOCAL: &str = "linearVelocityLocal";
    pub const ANGULAR_VELOCITY_LOCAL: &str = "angularVelocityLocal";
    pub const INSTANT_ADD_OBJECT: &str = "instantAddObject";

    pub const CONSTRAINT: &str = "constraint";
    pub const VALUE: &str = "value";
}
