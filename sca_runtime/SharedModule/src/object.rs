//! # Shared Object System
//!
//! Identifiers for scene objects and logic units, plus the mapping type used
//! when a batch of objects is duplicated.

use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use std::fmt;

/// Unique identifier for scene objects
pub type ObjectId = u64;

/// Old-object to new-object mapping produced by a batch duplication
pub type RelinkMap = HashMap<ObjectId, ObjectId>;

/// Unique identifier for a logic brick (sensor or actuator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicUnitId(pub u64);

impl fmt::Display for LogicUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "brick#{}", self.0)
    }
}

/// Per-actuator-type tag, used for logging and script type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorType {
    AddObject,
}

/// Per-sensor-type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorType {
    Armature,
}

/// Snapshot of a scene object, used for debugging and logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDescription {
    /// Object ID
    pub object_id: ObjectId,

    /// Object name
    pub name: String,

    /// Placement parent (if any)
    pub parent: Option<ObjectId>,

    /// Current lifecycle state
    pub state: crate::lifecycle::ObjectLifecycleState,

    /// Number of logic units registered on this object
    pub registered_actuators: usize,
}
