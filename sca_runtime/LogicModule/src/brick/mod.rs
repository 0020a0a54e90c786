//! # Logic Brick Base Contract
//!
//! Shared lifecycle for every sensor and actuator: identity, owner, the
//! replica flag, and the hooks the manager drives when objects are destroyed,
//! duplicated or reparented.
//!
//! Weak references to scene objects are plain ids backed by the scene's
//! registration sets. A brick that stores an id other than its owner must
//! register with that object, answer `unlink_object` for it, and unregister in
//! `release`.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use sca_shared::object::{LogicUnitId, ObjectId, RelinkMap};

use crate::scene::LogicScene;

static NEXT_LOGIC_UNIT_ID: AtomicU64 = AtomicU64::new(1);

/// Hand out a process-wide unique brick id
pub fn next_logic_unit_id() -> LogicUnitId {
    LogicUnitId(NEXT_LOGIC_UNIT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Identity and ownership common to all bricks
#[derive(Debug, Clone, PartialEq)]
pub struct BrickState {
    id: LogicUnitId,
    name: String,
    parent: Option<ObjectId>,
    is_replica: bool,
}

impl BrickState {
    pub fn new(name: &str, parent: ObjectId) -> Self {
        Self {
            id: next_logic_unit_id(),
            name: name.to_string(),
            parent: Some(parent),
            is_replica: false,
        }
    }

    /// Field copy bound to a new owner under a fresh id
    pub fn replica_for(&self, parent: ObjectId) -> Self {
        Self {
            id: next_logic_unit_id(),
            name: self.name.clone(),
            parent: Some(parent),
            is_replica: true,
        }
    }

    pub fn id(&self) -> LogicUnitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: ObjectId) {
        self.parent = Some(parent);
    }

    pub fn is_replica(&self) -> bool {
        self.is_replica
    }

    pub fn mark_replica(&mut self) {
        self.is_replica = true;
    }
}

/// Lifecycle contract shared by sensors and actuators
pub trait LogicBrick: Any {
    fn brick(&self) -> &BrickState;

    fn brick_mut(&mut self) -> &mut BrickState;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn id(&self) -> LogicUnitId {
        self.brick().id()
    }

    fn name(&self) -> &str {
        self.brick().name()
    }

    fn parent(&self) -> Option<ObjectId> {
        self.brick().parent()
    }

    fn is_replica(&self) -> bool {
        self.brick().is_replica()
    }

    /// Second half of replication: restore registrations the field copy could
    /// not carry and reset transient state
    fn process_replica(&mut self, _scene: &mut dyn LogicScene) {
        self.brick_mut().mark_replica();
    }

    /// `candidate` is about to be destroyed. Clear every weak reference to it
    /// and report whether any was held.
    fn unlink_object(&mut self, _candidate: ObjectId) -> bool {
        false
    }

    /// Retarget weak references after a batch duplication
    fn relink(&mut self, _map: &RelinkMap, _scene: &mut dyn LogicScene) {}

    /// Move the brick to another owner
    fn reparent(&mut self, parent: ObjectId, _scene: &dyn LogicScene) {
        self.brick_mut().set_parent(parent);
    }

    /// Drop every registration before the brick is destroyed
    fn release(&mut self, _scene: &mut dyn LogicScene) {}
}
