//! Script attributes of the armature sensor.

use once_cell::sync::Lazy;
use sca_shared::constants::attributes;
use sca_shared::property::{AttributeType, AttributeValue};

use super::{expect_float, AttributeTable, ScriptExposed};
use crate::sensor::ArmatureSensor;

static ARMATURE_TABLE: Lazy<AttributeTable<ArmatureSensor>> = Lazy::new(|| {
    AttributeTable::<ArmatureSensor>::new("ArmatureSensor")
        .read_only(attributes::CONSTRAINT, AttributeType::String, |s| {
            if s.has_constraint() {
                AttributeValue::String(format!("{}:{}", s.pose_channel(), s.constraint_name()))
            } else {
                AttributeValue::None
            }
        })
        .read_write(
            attributes::VALUE,
            AttributeType::Float,
            |s| AttributeValue::Float(s.value()),
            |s, value, _| {
                s.set_value(expect_float(attributes::VALUE, &value, f32::MIN, f32::MAX)?);
                Ok(())
            },
        )
});

impl ScriptExposed for ArmatureSensor {
    fn attribute_table() -> &'static AttributeTable<Self> {
        &ARMATURE_TABLE
    }
}
