//! # Shared Attribute Values
//!
//! Dynamically typed values passed across the scripting binding boundary.
//! Logic bricks expose their configuration as named attributes holding these.

use serde::{Serialize, Deserialize};
use crate::types::Vector3;
use crate::object::ObjectId;

/// The kinds of values an attribute can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    None,
    Bool,
    Int32,
    Float,
    String,
    Vector,
    ObjectReference,
}

/// Represents the value of an attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    // Primitive values
    Bool(bool),
    Int32(i32),
    Float(f32),
    String(String),

    // Structured values
    Vector(Vector3),

    // Reference values
    ObjectReference(ObjectId),

    // Null value
    None,
}

impl AttributeValue {
    /// Get the type of this attribute value
    pub fn get_type(&self) -> AttributeType {
        match self {
            Self::Bool(_) => AttributeType::Bool,
            Self::Int32(_) => AttributeType::Int32,
            Self::Float(_) => AttributeType::Float,
            Self::String(_) => AttributeType::String,
            Self::Vector(_) => AttributeType::Vector,
            Self::ObjectReference(_) => AttributeType::ObjectReference,
            Self::None => AttributeType::None,
        }
    }

    /// Numeric view of the value; integers widen to float
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int32(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vector3> {
        match self {
            Self::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// Wrap an optional object reference, mapping absence to `None`
    pub fn from_object(object: Option<ObjectId>) -> Self {
        match object {
            Some(id) => Self::ObjectReference(id),
            None => Self::None,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int32(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(s) => write!(f, "{}", s),
            Self::Vector(v) => write!(f, "(X={},Y={},Z={})", v.x, v.y, v.z),
            Self::ObjectReference(id) => write!(f, "Object:{}", id),
            Self::None => write!(f, "None"),
        }
    }
}
