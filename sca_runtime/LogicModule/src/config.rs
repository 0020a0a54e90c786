//! # Logic Configuration
//!
//! JSON description of the logic bricks attached to scene objects. Loaded
//! once, validated, then handed to `LogicManager::instantiate`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;
use sca_shared::constants::add_object::{MAX_SPAWN_DELAY, MIN_SPAWN_DELAY};
use sca_shared::definition::{ActuatorDefinition, ObjectLogicDefinition};
use sca_shared::error::LogicError;
use sca_shared::types::LogicResult;
use serde::{Serialize, Deserialize};

/// Logic bricks for a whole scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicConfig {
    #[serde(default)]
    pub objects: Vec<ObjectLogicDefinition>,
}

impl LogicConfig {
    /// Parse and validate a configuration document
    pub fn from_json_str(json: &str) -> LogicResult<Self> {
        let config: LogicConfig = serde_json::from_str(json)
            .map_err(|e| LogicError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> LogicResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| LogicError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded logic configuration for {} objects from {}", config.objects.len(), path.display());
        Ok(config)
    }

    /// Brick names must be unique per object, spawn delays must be in range
    /// and links must name existing bricks
    pub fn validate(&self) -> LogicResult<()> {
        for object in &self.objects {
            let mut sensors = HashSet::new();
            for sensor in &object.sensors {
                if !sensors.insert(sensor.name()) {
                    return Err(LogicError::Config(format!(
                        "duplicate sensor '{}' on object '{}'", sensor.name(), object.object
                    )));
                }
            }

            let mut actuators = HashSet::new();
            for actuator in &object.actuators {
                if !actuators.insert(actuator.name()) {
                    return Err(LogicError::Config(format!(
                        "duplicate actuator '{}' on object '{}'", actuator.name(), object.object
                    )));
                }
                match actuator {
                    ActuatorDefinition::AddObject(add) => {
                        if !(MIN_SPAWN_DELAY..=MAX_SPAWN_DELAY).contains(&add.time) {
                            return Err(LogicError::Config(format!(
                                "actuator '{}' on object '{}' has time {} outside [{}, {}]",
                                add.name, object.object, add.time, MIN_SPAWN_DELAY, MAX_SPAWN_DELAY
                            )));
                        }
                    }
                }
            }

            for link in &object.links {
                if !sensors.contains(link.sensor.as_str()) {
                    return Err(LogicError::Config(format!(
                        "link on object '{}' names unknown sensor '{}'", object.object, link.sensor
                    )));
                }
                if !actuators.contains(link.actuator.as_str()) {
                    return Err(LogicError::Config(format!(
                        "link on object '{}' names unknown actuator '{}'", object.object, link.actuator
                    )));
                }
            }
        }
        Ok(())
    }
}
