//! # SCA Logic Module
//!
//! Sensor/actuator logic-brick runtime. Bricks are attached to scene objects,
//! hold weak references to other objects through the scene's registration
//! sets, and are driven frame by frame by the logic manager.
//!
//! The system is organized into several sub-modules:
//! - `brick`: identity and lifecycle contract shared by all bricks
//! - `scene`: the scene collaborator trait and the in-memory scene graph
//! - `actuator`: actuator update protocol and the add-object actuator
//! - `sensor`: sensor evaluation protocol and the armature sensor
//! - `manager`: brick arena, frame pass, destruction and duplication
//! - `script`: attribute tables exposed to an embedded scripting layer
//! - `config`: JSON logic-brick definitions

// Module declarations
pub mod brick;       // Logic unit base contract
pub mod scene;       // Scene collaborator
pub mod actuator;    // Actuators
pub mod sensor;      // Sensors
pub mod manager;     // Frame driver
pub mod script;      // Scripting bindings
pub mod config;      // Brick definitions

use log::info;
use sca_shared::constants::SCA_RUNTIME_VERSION;

// Re-export commonly used items
pub use actuator::{Actuator, AddObjectActuator, AddObjectSettings};
pub use brick::LogicBrick;
pub use config::LogicConfig;
pub use manager::LogicManager;
pub use scene::{LogicScene, SceneGraph};
pub use script::ScriptExposed;
pub use sensor::{ArmatureSensor, Sensor};

/// Initialize the logic module
pub fn init() {
    info!("Initializing SCA logic runtime v{}", SCA_RUNTIME_VERSION);
}

/// Build a manager for `scene` from a JSON configuration document
pub fn load_logic(json: &str, scene: &mut SceneGraph) -> sca_shared::LogicResult<LogicManager> {
    let config = LogicConfig::from_json_str(json)?;
    let mut manager = LogicManager::new();
    manager.instantiate(&config, scene)?;
    Ok(manager)
}
