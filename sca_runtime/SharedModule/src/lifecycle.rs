//! # Object Lifecycle Types
//!
//! State enums for scene objects and the trigger events delivered to logic bricks.

use serde::{Serialize, Deserialize};

/// The current state of a scene object in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObjectLifecycleState {
    /// Object was spawned with a delay and is not yet active; holds the remaining frames
    PendingSpawn(f32),

    /// Object is active and valid
    Active,

    /// Object is being torn down; registered logic units are being unlinked
    PendingKill,
}

impl ObjectLifecycleState {
    pub fn is_active(&self) -> bool {
        matches!(self, ObjectLifecycleState::Active)
    }
}

/// Polarity of an event delivered to an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerState {
    /// The monitored condition holds
    Positive,

    /// The monitored condition no longer holds
    Negative,
}

impl From<bool> for TriggerState {
    fn from(positive: bool) -> Self {
        if positive {
            TriggerState::Positive
        } else {
            TriggerState::Negative
        }
    }
}

/// Activation state of an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorState {
    /// No pending events
    Idle,

    /// Events are pending and the actuator is scheduled for update this frame
    Active,
}
