//! # Scene Graph
//!
//! In-memory scene used by the logic manager. Owns every object's lifetime,
//! the per-object registration sets, and the strong reference counts handed
//! out by `add_replica_object`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, trace, warn};
use sca_shared::constants::object::{FIRST_OBJECT_ID, SCENE_REFERENCE};
use sca_shared::error::LogicError;
use sca_shared::lifecycle::ObjectLifecycleState;
use sca_shared::object::{LogicUnitId, ObjectDescription, ObjectId};
use sca_shared::types::{LogicResult, Quat, Transform, Vector3};

use super::{ConstraintState, LogicScene};

/// A scene object as seen by the logic runtime
#[derive(Debug, Clone)]
pub struct GameObject {
    /// Unique object ID
    pub id: ObjectId,

    /// Object name (not necessarily unique; clones share the template's name)
    pub name: String,

    /// Object this one was placed relative to when spawned
    pub parent: Option<ObjectId>,

    /// World placement
    pub transform: Transform,

    /// Current lifecycle state
    pub state: ObjectLifecycleState,

    /// Scene reference plus any outstanding strong handles
    pub ref_count: u32,

    /// World-frame linear velocity
    pub linear_velocity: Vector3,

    /// World-frame angular velocity
    pub angular_velocity: Vector3,

    /// Logic units holding a weak reference to this object
    pub registered_actuators: BTreeSet<LogicUnitId>,

    /// Whether the object carries a pose
    pub is_armature: bool,

    /// Pose constraints keyed by (channel, constraint)
    pub constraints: HashMap<(String, String), ConstraintState>,

    /// Object this one was copied from, if it is a replica
    pub replica_of: Option<ObjectId>,
}

impl GameObject {
    fn new(id: ObjectId, name: &str, transform: Transform) -> Self {
        Self {
            id,
            name: name.to_string(),
            parent: None,
            transform,
            state: ObjectLifecycleState::Active,
            ref_count: SCENE_REFERENCE,
            linear_velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            registered_actuators: BTreeSet::new(),
            is_armature: false,
            constraints: HashMap::new(),
            replica_of: None,
        }
    }

    /// Copy placement, kinematics and pose but none of the registrations
    fn replica(&self, id: ObjectId) -> Self {
        Self {
            id,
            name: self.name.clone(),
            parent: self.parent,
            transform: self.transform,
            state: self.state,
            ref_count: SCENE_REFERENCE,
            linear_velocity: self.linear_velocity,
            angular_velocity: self.angular_velocity,
            registered_actuators: BTreeSet::new(),
            is_armature: self.is_armature,
            constraints: self.constraints.clone(),
            replica_of: Some(self.id),
        }
    }

    fn to_world(&self, v: Vector3, local: bool) -> Vector3 {
        if local {
            self.transform.rotation.rotate_vector(v)
        } else {
            v
        }
    }
}

/// Scene object arena
#[derive(Debug)]
pub struct SceneGraph {
    objects: BTreeMap<ObjectId, GameObject>,
    next_id: ObjectId,

    /// (template, clone) pairs whose logic bricks still need replicating
    pending_logic_replicas: Vec<(ObjectId, ObjectId)>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: FIRST_OBJECT_ID,
            pending_logic_replicas: Vec::new(),
        }
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a plain object to the scene
    pub fn add_object(&mut self, name: &str, transform: Transform) -> ObjectId {
        let id = self.allocate_id();
        self.objects.insert(id, GameObject::new(id, name, transform));
        debug!("Added object '{}' with ID {}", name, id);
        id
    }

    /// Add an object that carries a pose
    pub fn add_armature(&mut self, name: &str, transform: Transform) -> ObjectId {
        let id = self.add_object(name, transform);
        if let Some(object) = self.objects.get_mut(&id) {
            object.is_armature = true;
        }
        id
    }

    /// Set or replace a pose constraint on an armature object
    pub fn set_constraint(
        &mut self,
        object_id: ObjectId,
        channel: &str,
        constraint: &str,
        state: ConstraintState,
    ) -> LogicResult<()> {
        let object = self.objects.get_mut(&object_id)
            .ok_or(LogicError::ObjectNotFound(object_id))?;
        if !object.is_armature {
            return Err(LogicError::Config(format!("object {} is not an armature", object_id)));
        }
        object.constraints.insert((channel.to_string(), constraint.to_string()), state);
        Ok(())
    }

    /// Remove a pose constraint; returns whether it existed
    pub fn remove_constraint(&mut self, object_id: ObjectId, channel: &str, constraint: &str) -> bool {
        self.objects.get_mut(&object_id)
            .map(|o| o.constraints.remove(&(channel.to_string(), constraint.to_string())).is_some())
            .unwrap_or(false)
    }

    pub fn set_orientation(&mut self, object_id: ObjectId, rotation: Quat) -> LogicResult<()> {
        let object = self.objects.get_mut(&object_id)
            .ok_or(LogicError::ObjectNotFound(object_id))?;
        object.transform.rotation = rotation;
        Ok(())
    }

    pub fn get_object(&self, object_id: ObjectId) -> Option<&GameObject> {
        self.objects.get(&object_id)
    }

    pub fn get_object_mut(&mut self, object_id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(&object_id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Logic units currently registered on an object
    pub fn registered_actuators(&self, object_id: ObjectId) -> Vec<LogicUnitId> {
        self.objects.get(&object_id)
            .map(|o| o.registered_actuators.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether `actuator` is in the registration set of `object_id`
    pub fn is_registered(&self, object_id: ObjectId, actuator: LogicUnitId) -> bool {
        self.objects.get(&object_id)
            .map(|o| o.registered_actuators.contains(&actuator))
            .unwrap_or(false)
    }

    /// Number of objects `actuator` is registered with
    pub fn registration_count(&self, actuator: LogicUnitId) -> usize {
        self.objects.values()
            .filter(|o| o.registered_actuators.contains(&actuator))
            .count()
    }

    pub fn describe(&self, object_id: ObjectId) -> Option<ObjectDescription> {
        self.objects.get(&object_id).map(|o| ObjectDescription {
            object_id: o.id,
            name: o.name.clone(),
            parent: o.parent,
            state: o.state,
            registered_actuators: o.registered_actuators.len(),
        })
    }

    /// Start tearing an object down: mark it pending kill and hand back its
    /// registration set so every referencing unit can be unlinked.
    pub fn begin_destroy(&mut self, object_id: ObjectId) -> LogicResult<Vec<LogicUnitId>> {
        let object = self.objects.get_mut(&object_id)
            .ok_or(LogicError::ObjectNotFound(object_id))?;
        object.state = ObjectLifecycleState::PendingKill;
        let registered = std::mem::take(&mut object.registered_actuators);
        Ok(registered.into_iter().collect())
    }

    /// Remove an object from the scene. Callers unlink registered units first.
    pub fn remove_object(&mut self, object_id: ObjectId) -> LogicResult<GameObject> {
        let object = self.objects.remove(&object_id)
            .ok_or(LogicError::ObjectNotFound(object_id))?;

        if !object.registered_actuators.is_empty() {
            warn!(
                "Object {} removed with {} registered logic units still attached",
                object_id,
                object.registered_actuators.len()
            );
        }
        if object.ref_count > SCENE_REFERENCE {
            warn!("Object {} removed with {} outstanding strong handles", object_id, object.ref_count - SCENE_REFERENCE);
        }

        self.pending_logic_replicas.retain(|&(template, clone)| template != object_id && clone != object_id);
        for child in self.objects.values_mut().filter(|o| o.parent == Some(object_id)) {
            child.parent = None;
        }

        debug!("Removed object {} ('{}') from scene", object_id, object.name);
        Ok(object)
    }

    /// Copy an object without its registrations or logic
    pub fn duplicate_object(&mut self, object_id: ObjectId) -> LogicResult<ObjectId> {
        let source = self.objects.get(&object_id)
            .ok_or(LogicError::ObjectNotFound(object_id))?;
        let new_id = self.next_id;
        let replica = source.replica(new_id);
        self.next_id += 1;
        self.objects.insert(new_id, replica);
        debug!("Duplicated object {} as {}", object_id, new_id);
        Ok(new_id)
    }

    /// Count down spawn delays; objects reaching zero become active
    pub fn advance_frame(&mut self) {
        for object in self.objects.values_mut() {
            if let ObjectLifecycleState::PendingSpawn(remaining) = object.state {
                let remaining = remaining - 1.0;
                if remaining <= 0.0 {
                    object.state = ObjectLifecycleState::Active;
                    trace!("Object {} became active", object.id);
                } else {
                    object.state = ObjectLifecycleState::PendingSpawn(remaining);
                }
            }
        }
    }

    /// Drain clones whose template logic has not been replicated yet
    pub fn take_pending_logic_replicas(&mut self) -> Vec<(ObjectId, ObjectId)> {
        std::mem::take(&mut self.pending_logic_replicas)
    }
}

impl LogicScene for SceneGraph {
    fn add_replica_object(&mut self, template: ObjectId, parent: ObjectId, delay: f32) -> LogicResult<ObjectId> {
        let placement = self.objects.get(&parent)
            .ok_or(LogicError::ObjectNotFound(parent))?
            .transform;
        let source = self.objects.get(&template)
            .ok_or(LogicError::ReplicationFailed(template))?;

        let id = self.next_id;
        let mut replica = source.replica(id);
        replica.parent = Some(parent);
        replica.transform.location = placement.location;
        replica.transform.rotation = placement.rotation;
        replica.linear_velocity = Vector3::zero();
        replica.angular_velocity = Vector3::zero();
        replica.state = if delay > 0.0 {
            ObjectLifecycleState::PendingSpawn(delay)
        } else {
            ObjectLifecycleState::Active
        };
        // strong handle for the caller
        replica.ref_count = SCENE_REFERENCE + 1;

        self.next_id += 1;
        self.objects.insert(id, replica);
        self.pending_logic_replicas.push((template, id));

        debug!("Spawned replica {} of template {} under {} (delay {})", id, template, parent, delay);
        Ok(id)
    }

    fn release_object(&mut self, object: ObjectId) {
        match self.objects.get_mut(&object) {
            Some(o) if o.ref_count > SCENE_REFERENCE => o.ref_count -= 1,
            Some(_) => warn!("Release of object {} without an outstanding handle", object),
            None => warn!("Release of unknown object {}", object),
        }
    }

    fn set_linear_velocity(&mut self, object: ObjectId, velocity: Vector3, local: bool) {
        if let Some(o) = self.objects.get_mut(&object) {
            o.linear_velocity = o.to_world(velocity, local);
        } else {
            warn!("Linear velocity set on unknown object {}", object);
        }
    }

    fn set_angular_velocity(&mut self, object: ObjectId, velocity: Vector3, local: bool) {
        if let Some(o) = self.objects.get_mut(&object) {
            o.angular_velocity = o.to_world(velocity, local);
        } else {
            warn!("Angular velocity set on unknown object {}", object);
        }
    }

    fn resolve_combined_velocities(
        &mut self,
        object: ObjectId,
        linear: Vector3,
        angular: Vector3,
        linear_local: bool,
        angular_local: bool,
    ) {
        if let Some(o) = self.objects.get_mut(&object) {
            // both vectors end up in world frame regardless of how each was given
            o.linear_velocity = o.to_world(linear, linear_local);
            o.angular_velocity = o.to_world(angular, angular_local);
            trace!(
                "Resolved velocities of {}: linear {:?}, angular {:?}",
                object, o.linear_velocity, o.angular_velocity
            );
        }
    }

    fn register_actuator(&mut self, object: ObjectId, actuator: LogicUnitId) {
        match self.objects.get_mut(&object) {
            Some(o) => {
                o.registered_actuators.insert(actuator);
                trace!("Registered {} on object {}", actuator, object);
            }
            None => warn!("Cannot register {} on unknown object {}", actuator, object),
        }
    }

    fn unregister_actuator(&mut self, object: ObjectId, actuator: LogicUnitId) {
        if let Some(o) = self.objects.get_mut(&object) {
            if o.registered_actuators.remove(&actuator) {
                trace!("Unregistered {} from object {}", actuator, object);
            }
        }
    }

    fn object_exists(&self, object: ObjectId) -> bool {
        self.objects.get(&object)
            .map(|o| o.state != ObjectLifecycleState::PendingKill)
            .unwrap_or(false)
    }

    fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.objects.values()
            .find(|o| o.name == name && o.state != ObjectLifecycleState::PendingKill)
            .map(|o| o.id)
    }

    fn is_armature(&self, object: ObjectId) -> bool {
        self.objects.get(&object).map(|o| o.is_armature).unwrap_or(false)
    }

    fn constraint_state(&self, object: ObjectId, channel: &str, constraint: &str) -> Option<ConstraintState> {
        self.objects.get(&object)
            .and_then(|o| o.constraints.get(&(channel.to_string(), constraint.to_string())))
            .copied()
    }
}
