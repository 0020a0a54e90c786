//! # Scene Collaborator
//!
//! The interface logic bricks use to reach the scene: object creation,
//! velocity assignment, registration-set maintenance and object lookup.
//! `SceneGraph` is the in-memory implementation used by the frame driver.

use sca_shared::object::{LogicUnitId, ObjectId};
use sca_shared::types::{LogicResult, Vector3};
use serde::{Serialize, Deserialize};

pub mod graph;

pub use graph::{GameObject, SceneGraph};

/// Current state of a pose constraint, as read by the armature sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintState {
    /// Constraint is switched on
    pub enabled: bool,

    /// Residual linear error of the solved constraint
    pub lin_error: f32,

    /// Residual rotation error of the solved constraint
    pub rot_error: f32,
}

impl Default for ConstraintState {
    fn default() -> Self {
        Self { enabled: true, lin_error: 0.0, rot_error: 0.0 }
    }
}

/// Scene operations consumed by logic bricks.
///
/// Every object a brick references weakly must have that brick in its
/// registration set, so that destroying the object can notify it first.
pub trait LogicScene {
    /// Create a clone of `template` placed relative to `parent`, becoming active
    /// after `delay` frames. The returned id carries a strong reference that the
    /// caller must give back with [`LogicScene::release_object`].
    fn add_replica_object(&mut self, template: ObjectId, parent: ObjectId, delay: f32) -> LogicResult<ObjectId>;

    /// Drop a strong reference obtained from `add_replica_object`
    fn release_object(&mut self, object: ObjectId);

    fn set_linear_velocity(&mut self, object: ObjectId, velocity: Vector3, local: bool);

    fn set_angular_velocity(&mut self, object: ObjectId, velocity: Vector3, local: bool);

    /// Settle the interaction of the two velocities into the final kinematic state
    fn resolve_combined_velocities(
        &mut self,
        object: ObjectId,
        linear: Vector3,
        angular: Vector3,
        linear_local: bool,
        angular_local: bool,
    );

    /// Add `actuator` to the registration set of `object`
    fn register_actuator(&mut self, object: ObjectId, actuator: LogicUnitId);

    /// Remove `actuator` from the registration set of `object`
    fn unregister_actuator(&mut self, object: ObjectId, actuator: LogicUnitId);

    fn object_exists(&self, object: ObjectId) -> bool;

    fn find_object(&self, name: &str) -> Option<ObjectId>;

    /// True if `object` carries a pose (armature)
    fn is_armature(&self, object: ObjectId) -> bool;

    /// Look up a constraint on a pose channel of an armature object
    fn constraint_state(&self, object: ObjectId, channel: &str, constraint: &str) -> Option<ConstraintState>;
}
