//! # Logic Manager
//!
//! Owns every sensor and actuator in the scene, the sensor to actuator links,
//! and the set of actuators scheduled for update. Drives the per-frame logic
//! pass and the object-level protocols that touch bricks: destruction with
//! unlinking, batch duplication with relinking, and logic inheritance for
//! clones spawned during the frame or from a script call.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, info, trace, warn};
use sca_shared::definition::{ActuatorDefinition, SensorDefinition};
use sca_shared::error::LogicError;
use sca_shared::lifecycle::{ActuatorState, TriggerState};
use sca_shared::object::{LogicUnitId, ObjectId, RelinkMap};
use sca_shared::property::AttributeValue;
use sca_shared::types::LogicResult;

use crate::actuator::{Actuator, AddObjectActuator, AddObjectSettings};
use crate::brick::LogicBrick;
use crate::config::LogicConfig;
use crate::scene::{LogicScene, SceneGraph};
use crate::script::{self, ScriptExposed};
use crate::sensor::{ArmatureSensor, Sensor};

/// Brick arena and frame driver
#[derive(Default)]
pub struct LogicManager {
    actuators: BTreeMap<LogicUnitId, Box<dyn Actuator>>,
    sensors: BTreeMap<LogicUnitId, Box<dyn Sensor>>,

    /// Sensor -> linked actuators
    links: BTreeMap<LogicUnitId, Vec<LogicUnitId>>,

    /// Actuators holding events, updated next frame
    active: BTreeSet<LogicUnitId>,

    frame: u64,
}

impl LogicManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames processed so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn brick_count(&self) -> usize {
        self.actuators.len() + self.sensors.len()
    }

    pub fn add_actuator(&mut self, actuator: Box<dyn Actuator>) -> LogicUnitId {
        let id = actuator.id();
        debug!("Added {:?} actuator '{}' as {}", actuator.actuator_type(), actuator.name(), id);
        self.actuators.insert(id, actuator);
        id
    }

    /// Add a sensor and initialise it against the scene
    pub fn add_sensor(&mut self, mut sensor: Box<dyn Sensor>, scene: &dyn LogicScene) -> LogicUnitId {
        sensor.init(scene);
        let id = sensor.id();
        debug!("Added {:?} sensor '{}' as {}", sensor.sensor_type(), sensor.name(), id);
        self.sensors.insert(id, sensor);
        id
    }

    pub fn link(&mut self, sensor: LogicUnitId, actuator: LogicUnitId) -> LogicResult<()> {
        if !self.sensors.contains_key(&sensor) {
            return Err(LogicError::BrickNotFound(sensor));
        }
        if !self.actuators.contains_key(&actuator) {
            return Err(LogicError::BrickNotFound(actuator));
        }
        let targets = self.links.entry(sensor).or_default();
        if !targets.contains(&actuator) {
            targets.push(actuator);
        }
        Ok(())
    }

    /// Actuators a sensor delivers its events to
    pub fn linked_actuators(&self, sensor: LogicUnitId) -> &[LogicUnitId] {
        self.links.get(&sensor).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn actuator(&self, id: LogicUnitId) -> Option<&dyn Actuator> {
        self.actuators.get(&id).map(|a| a.as_ref())
    }

    pub fn actuator_mut(&mut self, id: LogicUnitId) -> Option<&mut (dyn Actuator + 'static)> {
        self.actuators.get_mut(&id).map(|a| a.as_mut())
    }

    /// Typed view of an actuator, e.g. for script attribute access
    pub fn actuator_as<T: Actuator>(&self, id: LogicUnitId) -> Option<&T> {
        self.actuators.get(&id)?.as_any().downcast_ref::<T>()
    }

    pub fn actuator_as_mut<T: Actuator>(&mut self, id: LogicUnitId) -> Option<&mut T> {
        self.actuators.get_mut(&id)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn sensor(&self, id: LogicUnitId) -> Option<&dyn Sensor> {
        self.sensors.get(&id).map(|s| s.as_ref())
    }

    pub fn sensor_as<T: Sensor>(&self, id: LogicUnitId) -> Option<&T> {
        self.sensors.get(&id)?.as_any().downcast_ref::<T>()
    }

    pub fn sensor_as_mut<T: Sensor>(&mut self, id: LogicUnitId) -> Option<&mut T> {
        self.sensors.get_mut(&id)?.as_any_mut().downcast_mut::<T>()
    }

    /// Every sensor and actuator owned by `object`, sensors first
    pub fn bricks_of(&self, object: ObjectId) -> Vec<LogicUnitId> {
        let sensors = self.sensors.values()
            .filter(|s| s.parent() == Some(object))
            .map(|s| s.id());
        let actuators = self.actuators.values()
            .filter(|a| a.parent() == Some(object))
            .map(|a| a.id());
        sensors.chain(actuators).collect()
    }

    pub fn actuator_state(&self, id: LogicUnitId) -> Option<ActuatorState> {
        if !self.actuators.contains_key(&id) {
            return None;
        }
        Some(if self.active.contains(&id) { ActuatorState::Active } else { ActuatorState::Idle })
    }

    /// Deliver an event to an actuator and schedule it
    pub fn trigger(&mut self, id: LogicUnitId, trigger: TriggerState) -> LogicResult<()> {
        let actuator = self.actuators.get_mut(&id).ok_or(LogicError::BrickNotFound(id))?;
        actuator.add_event(trigger);
        self.active.insert(id);
        Ok(())
    }

    /// Run one logic frame: sensors, event delivery, actuator updates
    pub fn process_frame(&mut self, scene: &mut SceneGraph) {
        self.frame += 1;
        scene.advance_frame();
        // clones added between frames, e.g. by a script
        self.replicate_spawned_logic(scene);

        let mut fired = Vec::new();
        for (id, sensor) in self.sensors.iter_mut() {
            let owner_active = sensor.parent()
                .and_then(|owner| scene.get_object(owner))
                .map(|o| o.state.is_active())
                .unwrap_or(false);
            if !owner_active {
                continue;
            }
            if sensor.evaluate(&*scene) {
                fired.push((*id, TriggerState::from(sensor.is_positive_trigger())));
            }
        }

        for (sensor, trigger) in fired {
            let targets = self.links.get(&sensor).cloned().unwrap_or_default();
            for target in targets {
                if let Some(actuator) = self.actuators.get_mut(&target) {
                    actuator.add_event(trigger);
                    self.active.insert(target);
                }
            }
        }

        let scheduled: Vec<LogicUnitId> = self.active.iter().copied().collect();
        for id in scheduled {
            let keep = match self.actuators.get_mut(&id) {
                Some(actuator) => actuator.update(scene),
                None => false,
            };
            if !keep {
                self.active.remove(&id);
            }
            self.replicate_spawned_logic(scene);
        }

        trace!("Frame {} processed, {} actuators still active", self.frame, self.active.len());
    }

    /// Call a script method on an actuator. Clones it spawns inherit their
    /// template's logic before this returns.
    pub fn call_actuator_method<T: Actuator + ScriptExposed>(
        &mut self,
        id: LogicUnitId,
        name: &str,
        scene: &mut SceneGraph,
    ) -> LogicResult<AttributeValue> {
        let actuator = self.actuator_as_mut::<T>(id).ok_or(LogicError::BrickNotFound(id))?;
        let result = script::call_method(actuator, name, scene);
        self.replicate_spawned_logic(scene);
        result
    }

    /// Give clones spawned since the last call a copy of their template's logic
    fn replicate_spawned_logic(&mut self, scene: &mut SceneGraph) {
        for (template, clone) in scene.take_pending_logic_replicas() {
            let bricks = self.replicate_object_logic(template, clone, scene);
            if bricks.is_empty() {
                continue;
            }
            self.copy_links(&bricks);

            let map: RelinkMap = [(template, clone)].into_iter().collect();
            self.relink_bricks(bricks.values().copied(), &map, scene);
            debug!("Clone {} inherited {} logic bricks from {}", clone, bricks.len(), template);
        }
    }

    /// Copy every brick of `source` onto `target`. Returns old -> new brick ids.
    fn replicate_object_logic(
        &mut self,
        source: ObjectId,
        target: ObjectId,
        scene: &mut SceneGraph,
    ) -> HashMap<LogicUnitId, LogicUnitId> {
        let mut bricks = HashMap::new();

        let actuators: Vec<Box<dyn Actuator>> = self.actuators.values()
            .filter(|a| a.parent() == Some(source))
            .map(|a| {
                let replica = a.replicate(target);
                bricks.insert(a.id(), replica.id());
                replica
            })
            .collect();
        for mut replica in actuators {
            replica.process_replica(scene);
            self.actuators.insert(replica.id(), replica);
        }

        let sensors: Vec<Box<dyn Sensor>> = self.sensors.values()
            .filter(|s| s.parent() == Some(source))
            .map(|s| {
                let replica = s.replicate(target);
                bricks.insert(s.id(), replica.id());
                replica
            })
            .collect();
        for mut replica in sensors {
            replica.process_replica(scene);
            replica.init(&*scene);
            self.sensors.insert(replica.id(), replica);
        }

        bricks
    }

    /// Duplicate links whose sensor and actuator were both copied
    fn copy_links(&mut self, bricks: &HashMap<LogicUnitId, LogicUnitId>) {
        let mut copied = Vec::new();
        for (sensor, targets) in &self.links {
            let Some(&new_sensor) = bricks.get(sensor) else {
                continue;
            };
            for target in targets {
                if let Some(&new_target) = bricks.get(target) {
                    copied.push((new_sensor, new_target));
                }
            }
        }
        for (sensor, actuator) in copied {
            self.links.entry(sensor).or_default().push(actuator);
        }
    }

    fn relink_bricks(
        &mut self,
        bricks: impl Iterator<Item = LogicUnitId>,
        map: &RelinkMap,
        scene: &mut SceneGraph,
    ) {
        for id in bricks {
            if let Some(actuator) = self.actuators.get_mut(&id) {
                actuator.relink(map, scene);
            } else if let Some(sensor) = self.sensors.get_mut(&id) {
                sensor.relink(map, scene);
            }
        }
    }

    /// Release a brick's registrations and drop it with its links
    pub fn remove_brick(&mut self, id: LogicUnitId, scene: &mut dyn LogicScene) -> LogicResult<()> {
        if let Some(mut actuator) = self.actuators.remove(&id) {
            actuator.release(scene);
            self.active.remove(&id);
            for targets in self.links.values_mut() {
                targets.retain(|t| *t != id);
            }
        } else if let Some(mut sensor) = self.sensors.remove(&id) {
            sensor.release(scene);
            self.links.remove(&id);
        } else {
            return Err(LogicError::BrickNotFound(id));
        }
        trace!("Removed brick {}", id);
        Ok(())
    }

    /// Move a brick to another owner
    pub fn reparent_brick(&mut self, id: LogicUnitId, parent: ObjectId, scene: &SceneGraph) -> LogicResult<()> {
        if !scene.object_exists(parent) {
            return Err(LogicError::ObjectNotFound(parent));
        }
        if let Some(actuator) = self.actuators.get_mut(&id) {
            actuator.reparent(parent, scene);
        } else if let Some(sensor) = self.sensors.get_mut(&id) {
            sensor.reparent(parent, scene);
        } else {
            return Err(LogicError::BrickNotFound(id));
        }
        Ok(())
    }

    /// Destroy an object: unlink every unit referencing it, drop the bricks it
    /// owns, then remove it from the scene
    pub fn destroy_object(&mut self, scene: &mut SceneGraph, object: ObjectId) -> LogicResult<()> {
        if let Some(description) = scene.describe(object) {
            debug!("Destroying {:?}", description);
        }
        let registered = scene.begin_destroy(object)?;

        for unit in &registered {
            let unlinked = if let Some(actuator) = self.actuators.get_mut(unit) {
                actuator.unlink_object(object)
            } else if let Some(sensor) = self.sensors.get_mut(unit) {
                sensor.unlink_object(object)
            } else {
                false
            };
            if !unlinked {
                warn!("{} was registered on object {} but held no reference to it", unit, object);
            }
        }

        let owned = self.bricks_of(object);
        for id in &owned {
            self.remove_brick(*id, scene)?;
        }

        scene.remove_object(object)?;
        info!(
            "Destroyed object {}: unlinked {} units, removed {} bricks",
            object, registered.len(), owned.len()
        );
        Ok(())
    }

    /// Duplicate a batch of objects together with their logic. References
    /// between members of the batch are retargeted to the copies.
    pub fn duplicate_objects(&mut self, scene: &mut SceneGraph, objects: &[ObjectId]) -> LogicResult<RelinkMap> {
        if let Some(missing) = objects.iter().find(|id| !scene.object_exists(**id)) {
            return Err(LogicError::ObjectNotFound(*missing));
        }

        let mut map = RelinkMap::new();
        for &object in objects {
            if map.contains_key(&object) {
                continue;
            }
            map.insert(object, scene.duplicate_object(object)?);
        }

        // placement parents inside the batch follow the copies too
        for &copy in map.values() {
            if let Some(obj) = scene.get_object_mut(copy) {
                if let Some(new_parent) = obj.parent.and_then(|p| map.get(&p)) {
                    obj.parent = Some(*new_parent);
                }
            }
        }

        let mut bricks = HashMap::new();
        for (&source, &target) in &map {
            bricks.extend(self.replicate_object_logic(source, target, scene));
        }
        self.copy_links(&bricks);
        self.relink_bricks(bricks.values().copied(), &map, scene);

        info!("Duplicated {} objects with {} logic bricks", map.len(), bricks.len());
        Ok(map)
    }

    /// Build the bricks described by `config`. Unresolved templates leave the
    /// actuator inert; an unknown owning object is an error.
    pub fn instantiate(&mut self, config: &LogicConfig, scene: &mut SceneGraph) -> LogicResult<Vec<LogicUnitId>> {
        config.validate()?;
        let mut created = Vec::new();

        for def in &config.objects {
            let owner = scene.find_object(&def.object)
                .ok_or_else(|| LogicError::ObjectNameNotFound(def.object.clone()))?;
            let mut sensors = HashMap::new();
            let mut actuators = HashMap::new();

            for sensor in &def.sensors {
                let id = match sensor {
                    SensorDefinition::Armature(arm) => {
                        self.add_sensor(Box::new(ArmatureSensor::from_definition(arm, owner)), &*scene)
                    }
                };
                sensors.insert(sensor.name(), id);
                created.push(id);
            }

            for actuator in &def.actuators {
                let id = match actuator {
                    ActuatorDefinition::AddObject(add) => {
                        let template = add.template.as_deref().and_then(|name| {
                            let found = scene.find_object(name);
                            if found.is_none() {
                                warn!("Template '{}' for actuator '{}' not found, actuator is inert", name, add.name);
                            }
                            found
                        });
                        let settings = AddObjectSettings::from_definition(add, template);
                        let brick = AddObjectActuator::new(&add.name, owner, settings, scene);
                        self.add_actuator(Box::new(brick))
                    }
                };
                actuators.insert(actuator.name(), id);
                created.push(id);
            }

            for link in &def.links {
                let sensor = sensors.get(link.sensor.as_str())
                    .ok_or_else(|| LogicError::Config(format!("unknown sensor '{}'", link.sensor)))?;
                let actuator = actuators.get(link.actuator.as_str())
                    .ok_or_else(|| LogicError::Config(format!("unknown actuator '{}'", link.actuator)))?;
                self.link(*sensor, *actuator)?;
            }
        }

        info!("Instantiated {} logic bricks for {} objects", created.len(), config.objects.len());
        Ok(created)
    }
}
