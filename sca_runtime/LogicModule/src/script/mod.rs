//! # Script Bindings
//!
//! Capability tables mapping attribute and method names to typed accessors on
//! a logic brick. An embedding scripting layer only ever sees
//! `AttributeValue`s; every assignment is validated here, and a rejected one
//! leaves the brick untouched.

use std::collections::HashMap;

use log::trace;
use sca_shared::error::LogicError;
use sca_shared::object::ObjectId;
use sca_shared::property::{AttributeType, AttributeValue};
use sca_shared::types::{LogicResult, Vector3};

use crate::scene::LogicScene;

pub mod add_object;
pub mod armature;

/// Attribute read accessor
pub type Getter<T> = fn(&T) -> AttributeValue;

/// Attribute write accessor; must leave `T` unchanged on error
pub type Setter<T> = fn(&mut T, AttributeValue, &mut dyn LogicScene) -> LogicResult<()>;

/// Script-callable method
pub type Method<T> = fn(&mut T, &mut dyn LogicScene) -> LogicResult<AttributeValue>;

pub struct AttributeDef<T> {
    pub name: &'static str,
    pub value_type: AttributeType,
    pub getter: Getter<T>,
    pub setter: Option<Setter<T>>,
}

pub struct MethodDef<T> {
    pub name: &'static str,
    pub call: Method<T>,
}

/// Attribute and method table for one brick type
pub struct AttributeTable<T> {
    type_name: &'static str,
    attributes: HashMap<&'static str, AttributeDef<T>>,
    methods: HashMap<&'static str, MethodDef<T>>,
}

impl<T> AttributeTable<T> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            attributes: HashMap::new(),
            methods: HashMap::new(),
        }
    }

    /// Read/write attribute
    pub fn read_write(mut self, name: &'static str, value_type: AttributeType, getter: Getter<T>, setter: Setter<T>) -> Self {
        self.attributes.insert(name, AttributeDef { name, value_type, getter, setter: Some(setter) });
        self
    }

    /// Read-only attribute
    pub fn read_only(mut self, name: &'static str, value_type: AttributeType, getter: Getter<T>) -> Self {
        self.attributes.insert(name, AttributeDef { name, value_type, getter, setter: None });
        self
    }

    pub fn method(mut self, name: &'static str, call: Method<T>) -> Self {
        self.methods.insert(name, MethodDef { name, call });
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Attribute names in sorted order
    pub fn attribute_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.attributes.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn method_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.methods.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn is_read_only(&self, name: &str) -> Option<bool> {
        self.attributes.get(name).map(|def| def.setter.is_none())
    }

    fn attribute(&self, name: &str) -> LogicResult<&AttributeDef<T>> {
        self.attributes.get(name).ok_or_else(|| LogicError::UnknownAttribute {
            type_name: self.type_name.to_string(),
            name: name.to_string(),
        })
    }

    pub fn get(&self, target: &T, name: &str) -> LogicResult<AttributeValue> {
        let def = self.attribute(name)?;
        Ok((def.getter)(target))
    }

    pub fn set(&self, target: &mut T, name: &str, value: AttributeValue, scene: &mut dyn LogicScene) -> LogicResult<()> {
        let def = self.attribute(name)?;
        let setter = def.setter.ok_or_else(|| LogicError::ReadOnlyAttribute(def.name.to_string()))?;
        trace!("{}.{} = {}", self.type_name, def.name, value);
        setter(target, value, scene)
    }

    pub fn call(&self, target: &mut T, name: &str, scene: &mut dyn LogicScene) -> LogicResult<AttributeValue> {
        let def = self.methods.get(name).ok_or_else(|| LogicError::UnknownMethod {
            type_name: self.type_name.to_string(),
            name: name.to_string(),
        })?;
        (def.call)(target, scene)
    }

    /// Read an attribute as a JSON-encoded `AttributeValue`
    pub fn get_json(&self, target: &T, name: &str) -> LogicResult<String> {
        let value = self.get(target, name)?;
        Ok(serde_json::to_string(&value)?)
    }

    /// Assign an attribute from a JSON-encoded `AttributeValue`
    pub fn set_json(&self, target: &mut T, name: &str, json: &str, scene: &mut dyn LogicScene) -> LogicResult<()> {
        let value: AttributeValue = serde_json::from_str(json)?;
        self.set(target, name, value, scene)
    }
}

/// Brick types reachable from scripts
pub trait ScriptExposed: Sized + 'static {
    fn attribute_table() -> &'static AttributeTable<Self>;
}

pub fn get_attribute<T: ScriptExposed>(target: &T, name: &str) -> LogicResult<AttributeValue> {
    T::attribute_table().get(target, name)
}

pub fn set_attribute<T: ScriptExposed>(
    target: &mut T,
    name: &str,
    value: AttributeValue,
    scene: &mut dyn LogicScene,
) -> LogicResult<()> {
    T::attribute_table().set(target, name, value, scene)
}

pub fn call_method<T: ScriptExposed>(target: &mut T, name: &str, scene: &mut dyn LogicScene) -> LogicResult<AttributeValue> {
    T::attribute_table().call(target, name, scene)
}

pub fn get_attribute_json<T: ScriptExposed>(target: &T, name: &str) -> LogicResult<String> {
    T::attribute_table().get_json(target, name)
}

pub fn set_attribute_json<T: ScriptExposed>(
    target: &mut T,
    name: &str,
    json: &str,
    scene: &mut dyn LogicScene,
) -> LogicResult<()> {
    T::attribute_table().set_json(target, name, json, scene)
}

fn type_mismatch(context: &str, expected: AttributeType, value: &AttributeValue) -> LogicError {
    LogicError::InvalidAttributeValue {
        context: context.to_string(),
        expected,
        actual: value.get_type(),
    }
}

/// Accept a float (or integer) within `[min, max]`
pub fn expect_float(context: &str, value: &AttributeValue, min: f32, max: f32) -> LogicResult<f32> {
    let v = value.as_float().ok_or_else(|| type_mismatch(context, AttributeType::Float, value))?;
    if !(min..=max).contains(&v) {
        return Err(LogicError::ValueOutOfRange { context: context.to_string(), value: v, min, max });
    }
    Ok(v)
}

/// Accept a vector with finite components
pub fn expect_vector(context: &str, value: &AttributeValue) -> LogicResult<Vector3> {
    let v = value.as_vector().ok_or_else(|| type_mismatch(context, AttributeType::Vector, value))?;
    if !v.is_finite() {
        let bad = v.to_array().into_iter().find(|c| !c.is_finite()).unwrap_or(f32::NAN);
        return Err(LogicError::ValueOutOfRange { context: context.to_string(), value: bad, min: f32::MIN, max: f32::MAX });
    }
    Ok(v)
}

pub fn expect_bool(context: &str, value: &AttributeValue) -> LogicResult<bool> {
    value.as_bool().ok_or_else(|| type_mismatch(context, AttributeType::Bool, value))
}

/// Resolve an object given by reference or by name. `None` is accepted only
/// when `none_ok` is set.
pub fn expect_object(
    context: &str,
    value: &AttributeValue,
    scene: &dyn LogicScene,
    none_ok: bool,
) -> LogicResult<Option<ObjectId>> {
    match value {
        AttributeValue::None if none_ok => Ok(None),
        AttributeValue::ObjectReference(id) => {
            if scene.object_exists(*id) {
                Ok(Some(*id))
            } else {
                Err(LogicError::ObjectNotFound(*id))
            }
        }
        AttributeValue::String(name) => scene
            .find_object(name)
            .map(Some)
            .ok_or_else(|| LogicError::ObjectNameNotFound(name.clone())),
        other => Err(type_mismatch(context, AttributeType::ObjectReference, other)),
    }
}
