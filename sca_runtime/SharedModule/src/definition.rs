//! # Logic Brick Definitions
//!
//! Design-time descriptions of sensors and actuators, instantiated onto scene
//! objects by the logic manager. Objects are referred to by name; names that
//! do not resolve leave the brick inert rather than failing the whole load.

use serde::{Serialize, Deserialize};

/// Actuator definitions, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActuatorDefinition {
    AddObject(AddObjectDefinition),
}

impl ActuatorDefinition {
    pub fn name(&self) -> &str {
        match self {
            ActuatorDefinition::AddObject(def) => &def.name,
        }
    }
}

/// Add-object actuator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddObjectDefinition {
    /// Brick name, unique per object
    pub name: String,

    /// Name of the object to clone
    #[serde(default)]
    pub template: Option<String>,

    /// Frames before the clone becomes active
    #[serde(default)]
    pub time: f32,

    #[serde(default)]
    pub linear_velocity: [f32; 3],

    #[serde(default)]
    pub linear_velocity_local: bool,

    #[serde(default)]
    pub angular_velocity: [f32; 3],

    #[serde(default)]
    pub angular_velocity_local: bool,
}

/// Sensor definitions, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SensorDefinition {
    Armature(ArmatureDefinition),
}

impl SensorDefinition {
    pub fn name(&self) -> &str {
        match self {
            SensorDefinition::Armature(def) => &def.name,
        }
    }
}

/// Condition tested by the armature sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmatureTest {
    /// Constraint enabled flag
    StateChanged,
    /// Linear error below `value`
    LinErrorBelow,
    /// Linear error above `value`
    LinErrorAbove,
    /// Rotation error below `value`
    RotErrorBelow,
    /// Rotation error above `value`
    RotErrorAbove,
}

/// Armature constraint sensor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmatureDefinition {
    pub name: String,
    pub pose_channel: String,
    pub constraint: String,
    pub test: ArmatureTest,

    #[serde(default)]
    pub value: f32,

    /// Invert the trigger polarity
    #[serde(default)]
    pub invert: bool,

    /// Fire once on reset even if the result did not change
    #[serde(default)]
    pub level: bool,
}

/// Sensor to actuator connection, by brick name on the same object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDefinition {
    pub sensor: String,
    pub actuator: String,
}

/// All logic bricks attached to one scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLogicDefinition {
    /// Name of the owning object
    pub object: String,

    #[serde(default)]
    pub sensors: Vec<SensorDefinition>,

    #[serde(default)]
    pub actuators: Vec<ActuatorDefinition>,

    #[serde(default)]
    pub links: Vec<LinkDefinition>,
}
