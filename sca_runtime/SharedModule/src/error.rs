//! # Error Types
//!
//! Recoverable failures surfaced by the logic runtime. None of these escape the
//! per-frame update path; they are returned from scene setup, configuration
//! loading and the scripting binding boundary.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::object::{LogicUnitId, ObjectId};
use crate::property::AttributeType;

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum LogicError {
    /// Object id does not name a live scene object
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    /// No object with this name exists in the scene
    #[error("no object named '{0}'")]
    ObjectNameNotFound(String),

    /// Logic unit id does not name a registered brick
    #[error("logic brick {0} not found")]
    BrickNotFound(LogicUnitId),

    /// Attribute lookup failed
    #[error("{type_name} has no attribute '{name}'")]
    UnknownAttribute { type_name: String, name: String },

    /// Method lookup failed
    #[error("{type_name} has no method '{name}'")]
    UnknownMethod { type_name: String, name: String },

    /// Attribute exists but has no setter
    #[error("attribute '{0}' is read-only")]
    ReadOnlyAttribute(String),

    /// Assigned value has the wrong kind for the attribute
    #[error("{context}: expected {expected:?}, got {actual:?}")]
    InvalidAttributeValue {
        context: String,
        expected: AttributeType,
        actual: AttributeType,
    },

    /// Numeric assignment outside the attribute's allowed range
    #[error("{context}: value {value} out of range [{min}, {max}]")]
    ValueOutOfRange {
        context: String,
        value: f32,
        min: f32,
        max: f32,
    },

    /// Scene refused to create a replica of the template
    #[error("scene could not replicate template object {0}")]
    ReplicationFailed(ObjectId),

    /// Malformed or inconsistent logic configuration
    #[error("invalid logic configuration: {0}")]
    Config(String),

    /// JSON encode/decode failure at the binding boundary
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LogicError {
    fn from(err: serde_json::Error) -> Self {
        LogicError::Serialization(err.to_string())
    }
}
