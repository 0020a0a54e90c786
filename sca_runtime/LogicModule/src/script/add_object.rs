//! Script attributes of the add-object actuator.

use once_cell::sync::Lazy;
use sca_shared::constants::add_object::{MAX_SPAWN_DELAY, MIN_SPAWN_DELAY};
use sca_shared::constants::attributes;
use sca_shared::property::{AttributeType, AttributeValue};

use super::{expect_bool, expect_float, expect_object, expect_vector, AttributeTable, ScriptExposed};
use crate::actuator::AddObjectActuator;

static ADD_OBJECT_TABLE: Lazy<AttributeTable<AddObjectActuator>> = Lazy::new(|| {
    AttributeTable::<AddObjectActuator>::new("AddObjectActuator")
        .read_write(
            attributes::OBJECT,
            AttributeType::ObjectReference,
            |a| AttributeValue::from_object(a.template_object()),
            |a, value, scene| {
                let template = expect_object(attributes::OBJECT, &value, &*scene, true)?;
                a.set_template_object(template, scene);
                Ok(())
            },
        )
        .read_only(
            attributes::OBJECT_LAST_CREATED,
            AttributeType::ObjectReference,
            |a| AttributeValue::from_object(a.last_created_object()),
        )
        .read_write(
            attributes::TIME,
            AttributeType::Float,
            |a| AttributeValue::Float(a.spawn_delay()),
            |a, value, _| {
                let delay = expect_float(attributes::TIME, &value, MIN_SPAWN_DELAY, MAX_SPAWN_DELAY)?;
                a.set_spawn_delay(delay)
            },
        )
        .read_write(
            attributes::LINEAR_VELOCITY,
            AttributeType::Vector,
            |a| AttributeValue::Vector(a.linear_velocity()),
            |a, value, _| {
                let v = expect_vector(attributes::LINEAR_VELOCITY, &value)?;
                a.set_linear_velocity(v);
                Ok(())
            },
        )
        .read_write(
            attributes::ANGULAR_VELOCITY,
            AttributeType::Vector,
            |a| AttributeValue::Vector(a.angular_velocity()),
            |a, value, _| {
                let v = expect_vector(attributes::ANGULAR_VELOCITY, &value)?;
                a.set_angular_velocity(v);
                Ok(())
            },
        )
        .read_write(
            attributes::LINEAR_VELOCITY_LOCAL,
            AttributeType::Bool,
            |a| AttributeValue::Bool(a.linear_velocity_is_local()),
            |a, value, _| {
                a.set_linear_velocity_is_local(expect_bool(attributes::LINEAR_VELOCITY_LOCAL, &value)?);
                Ok(())
            },
        )
        .read_write(
            attributes::ANGULAR_VELOCITY_LOCAL,
            AttributeType::Bool,
            |a| AttributeValue::Bool(a.angular_velocity_is_local()),
            |a, value, _| {
                a.set_angular_velocity_is_local(expect_bool(attributes::ANGULAR_VELOCITY_LOCAL, &value)?);
                Ok(())
            },
        )
        .method(attributes::INSTANT_ADD_OBJECT, |a, scene| {
            a.instant_add_object(scene);
            Ok(AttributeValue::None)
        })
});

impl ScriptExposed for AddObjectActuator {
    fn attribute_table() -> &'static AttributeTable<Self> {
        &ADD_OBJECT_TABLE
    }
}
