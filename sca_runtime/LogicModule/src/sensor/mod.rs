//! # Sensors
//!
//! Sensors evaluate a condition once per frame. `evaluate` reports whether the
//! sensor fires this frame (an edge on its cached result, or a level reset),
//! and `is_positive_trigger` gives the polarity delivered to linked actuators.

use sca_shared::object::{ObjectId, SensorType};

use crate::brick::LogicBrick;
use crate::scene::LogicScene;

pub mod armature;

pub use armature::ArmatureSensor;

/// Flags shared by every sensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorState {
    /// Report the opposite polarity
    pub invert: bool,

    /// Fire once after (re)initialisation even without a change
    pub level: bool,

    /// Set by `init`, consumed by the next evaluation
    pub reset: bool,
}

impl SensorState {
    pub fn new(invert: bool, level: bool) -> Self {
        Self { invert, level, reset: false }
    }

    /// Consume the reset flag; true if a level sensor should fire for it
    pub fn take_reset(&mut self) -> bool {
        let fire = self.reset && self.level;
        self.reset = false;
        fire
    }
}

pub trait Sensor: LogicBrick {
    fn sensor_type(&self) -> SensorType;

    fn sensor_state(&self) -> &SensorState;

    fn sensor_state_mut(&mut self) -> &mut SensorState;

    /// Reset cached results; called once the sensor is attached to a scene
    fn init(&mut self, scene: &dyn LogicScene);

    /// True if the sensor fires this frame
    fn evaluate(&mut self, scene: &dyn LogicScene) -> bool;

    /// Polarity of the trigger, inversion applied
    fn is_positive_trigger(&self) -> bool;

    /// Shallow field copy bound to `parent`
    fn replicate(&self, parent: ObjectId) -> Box<dyn Sensor>;
}
