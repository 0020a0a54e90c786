//! # Armature Sensor
//!
//! Watches one constraint on a pose channel of the owning armature and fires
//! when the tested condition flips.

use std::any::Any;

use log::{debug, trace};
use sca_shared::definition::{ArmatureDefinition, ArmatureTest};
use sca_shared::object::{ObjectId, SensorType};

use super::{Sensor, SensorState};
use crate::brick::{BrickState, LogicBrick};
use crate::scene::{ConstraintState, LogicScene};

#[derive(Debug, Clone)]
pub struct ArmatureSensor {
    brick: BrickState,
    sensor: SensorState,
    pose_channel: String,
    constraint_name: String,
    test: ArmatureTest,
    value: f32,
    constraint_found: bool,
    result: bool,
    last_result: bool,
}

impl ArmatureSensor {
    pub fn new(
        name: &str,
        parent: ObjectId,
        pose_channel: &str,
        constraint_name: &str,
        test: ArmatureTest,
        value: f32,
        sensor: SensorState,
    ) -> Self {
        Self {
            brick: BrickState::new(name, parent),
            sensor,
            pose_channel: pose_channel.to_string(),
            constraint_name: constraint_name.to_string(),
            test,
            value,
            constraint_found: false,
            result: false,
            last_result: false,
        }
    }

    pub fn from_definition(def: &ArmatureDefinition, parent: ObjectId) -> Self {
        Self::new(
            &def.name,
            parent,
            &def.pose_channel,
            &def.constraint,
            def.test,
            def.value,
            SensorState::new(def.invert, def.level),
        )
    }

    pub fn pose_channel(&self) -> &str {
        &self.pose_channel
    }

    pub fn constraint_name(&self) -> &str {
        &self.constraint_name
    }

    pub fn test(&self) -> ArmatureTest {
        self.test
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    /// Whether the watched constraint was resolved on the owner
    pub fn has_constraint(&self) -> bool {
        self.constraint_found
    }

    /// Resolve the watched constraint on the current owner
    pub fn find_constraint(&mut self, scene: &dyn LogicScene) {
        self.constraint_found = match self.parent() {
            Some(owner) if scene.is_armature(owner) => scene
                .constraint_state(owner, &self.pose_channel, &self.constraint_name)
                .is_some(),
            _ => false,
        };
        if !self.constraint_found {
            debug!(
                "{} found no constraint '{}' on channel '{}'",
                self.id(), self.constraint_name, self.pose_channel
            );
        }
    }

    fn test_constraint(&self, state: &ConstraintState) -> bool {
        match self.test {
            ArmatureTest::StateChanged => state.enabled,
            ArmatureTest::LinErrorBelow => state.lin_error < self.value,
            ArmatureTest::LinErrorAbove => state.lin_error > self.value,
            ArmatureTest::RotErrorBelow => state.rot_error < self.value,
            ArmatureTest::RotErrorAbove => state.rot_error > self.value,
        }
    }
}

impl LogicBrick for ArmatureSensor {
    fn brick(&self) -> &BrickState {
        &self.brick
    }

    fn brick_mut(&mut self) -> &mut BrickState {
        &mut self.brick
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn process_replica(&mut self, _scene: &mut dyn LogicScene) {
        self.brick.mark_replica();
        // the copy watches its own owner's pose
        self.constraint_found = false;
    }

    fn reparent(&mut self, parent: ObjectId, scene: &dyn LogicScene) {
        self.brick.set_parent(parent);
        self.find_constraint(scene);
    }
}

impl Sensor for ArmatureSensor {
    fn sensor_type(&self) -> SensorType {
        SensorType::Armature
    }

    fn sensor_state(&self) -> &SensorState {
        &self.sensor
    }

    fn sensor_state_mut(&mut self) -> &mut SensorState {
        &mut self.sensor
    }

    fn init(&mut self, scene: &dyn LogicScene) {
        self.last_result = self.sensor.invert;
        self.result = false;
        self.sensor.reset = true;
        self.find_constraint(scene);
    }

    fn evaluate(&mut self, scene: &dyn LogicScene) -> bool {
        let reset = self.sensor.take_reset();

        if !self.constraint_found {
            return false;
        }
        let state = self.parent()
            .and_then(|owner| scene.constraint_state(owner, &self.pose_channel, &self.constraint_name));
        let Some(state) = state else {
            // constraint went away since it was resolved
            self.constraint_found = false;
            return false;
        };

        self.result = self.test_constraint(&state);
        if self.result != self.last_result {
            self.last_result = self.result;
            trace!("{} changed to {}", self.id(), self.result);
            return true;
        }
        reset
    }

    fn is_positive_trigger(&self) -> bool {
        self.result != self.sensor.invert
    }

    fn replicate(&self, parent: ObjectId) -> Box<dyn Sensor> {
        let mut replica = self.clone();
        replica.brick = self.brick.replica_for(parent);
        Box::new(replica)
    }
}
