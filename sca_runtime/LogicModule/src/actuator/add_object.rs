//! # Add-Object Actuator
//!
//! Spawns a clone of a template object when triggered, placed at the owning
//! object and given an initial linear and angular velocity.
//!
//! The actuator never owns the objects it points at. Both the template and the
//! most recent clone are weak references backed by registration: the scene
//! calls `unlink_object` before either is destroyed.

use std::any::Any;

use log::{debug, trace, warn};
use sca_shared::constants::add_object::{MAX_SPAWN_DELAY, MIN_SPAWN_DELAY};
use sca_shared::definition::AddObjectDefinition;
use sca_shared::error::LogicError;
use sca_shared::object::{ActuatorType, ObjectId, RelinkMap};
use sca_shared::types::{LogicResult, Vector3};

use super::{Actuator, ActuatorEvents};
use crate::brick::{BrickState, LogicBrick};
use crate::scene::LogicScene;

/// Construction parameters for an add-object actuator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AddObjectSettings {
    /// Object to clone; `None` makes the actuator inert
    pub template_object: Option<ObjectId>,

    /// Frames before the clone becomes active
    pub spawn_delay: f32,

    pub linear_velocity: Vector3,
    pub linear_velocity_is_local: bool,

    pub angular_velocity: Vector3,
    pub angular_velocity_is_local: bool,
}

impl AddObjectSettings {
    /// Settings from a validated design-time definition, with the template
    /// already resolved
    pub fn from_definition(def: &AddObjectDefinition, template_object: Option<ObjectId>) -> Self {
        Self {
            template_object,
            spawn_delay: def.time,
            linear_velocity: Vector3::from_array(def.linear_velocity),
            linear_velocity_is_local: def.linear_velocity_local,
            angular_velocity: Vector3::from_array(def.angular_velocity),
            angular_velocity_is_local: def.angular_velocity_local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddObjectActuator {
    brick: BrickState,
    events: ActuatorEvents,
    template_object: Option<ObjectId>,
    last_created_object: Option<ObjectId>,
    spawn_delay: f32,
    linear_velocity: Vector3,
    angular_velocity: Vector3,
    linear_velocity_is_local: bool,
    angular_velocity_is_local: bool,
}

impl AddObjectActuator {
    /// Create the actuator on `parent` and register it with its template
    pub fn new(name: &str, parent: ObjectId, settings: AddObjectSettings, scene: &mut dyn LogicScene) -> Self {
        let actuator = Self {
            brick: BrickState::new(name, parent),
            events: ActuatorEvents::default(),
            template_object: settings.template_object,
            last_created_object: None,
            spawn_delay: settings.spawn_delay.max(MIN_SPAWN_DELAY),
            linear_velocity: settings.linear_velocity,
            angular_velocity: settings.angular_velocity,
            linear_velocity_is_local: settings.linear_velocity_is_local,
            angular_velocity_is_local: settings.angular_velocity_is_local,
        };

        if let Some(template) = actuator.template_object {
            scene.register_actuator(template, actuator.id());
        }
        actuator
    }

    pub fn template_object(&self) -> Option<ObjectId> {
        self.template_object
    }

    pub fn last_created_object(&self) -> Option<ObjectId> {
        self.last_created_object
    }

    pub fn spawn_delay(&self) -> f32 {
        self.spawn_delay
    }

    pub fn linear_velocity(&self) -> Vector3 {
        self.linear_velocity
    }

    pub fn angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    pub fn linear_velocity_is_local(&self) -> bool {
        self.linear_velocity_is_local
    }

    pub fn angular_velocity_is_local(&self) -> bool {
        self.angular_velocity_is_local
    }

    /// Objects this actuator is currently registered with
    pub fn registrations(&self) -> Vec<ObjectId> {
        let mut objects: Vec<ObjectId> = self.template_object.into_iter()
            .chain(self.last_created_object)
            .collect();
        objects.dedup();
        objects
    }

    fn references(&self, object: ObjectId) -> bool {
        self.template_object == Some(object) || self.last_created_object == Some(object)
    }

    /// Drop the registration on `object` unless another field still points at it
    fn release_reference(&self, object: ObjectId, scene: &mut dyn LogicScene) {
        if !self.references(object) {
            scene.unregister_actuator(object, self.id());
        }
    }

    /// Point the actuator at a new template, moving the registration
    pub fn set_template_object(&mut self, template: Option<ObjectId>, scene: &mut dyn LogicScene) {
        if let Some(old) = self.template_object.take() {
            self.release_reference(old, scene);
        }
        self.template_object = template;
        if let Some(new) = template {
            scene.register_actuator(new, self.id());
        }
    }

    pub fn set_spawn_delay(&mut self, delay: f32) -> LogicResult<()> {
        if !(MIN_SPAWN_DELAY..=MAX_SPAWN_DELAY).contains(&delay) {
            return Err(LogicError::ValueOutOfRange {
                context: format!("{}.time", self.name()),
                value: delay,
                min: MIN_SPAWN_DELAY,
                max: MAX_SPAWN_DELAY,
            });
        }
        self.spawn_delay = delay;
        Ok(())
    }

    pub fn set_linear_velocity(&mut self, velocity: Vector3) {
        self.linear_velocity = velocity;
    }

    pub fn set_angular_velocity(&mut self, velocity: Vector3) {
        self.angular_velocity = velocity;
    }

    pub fn set_linear_velocity_is_local(&mut self, local: bool) {
        self.linear_velocity_is_local = local;
    }

    pub fn set_angular_velocity_is_local(&mut self, local: bool) {
        self.angular_velocity_is_local = local;
    }

    /// Spawn one clone of the template now. Silently does nothing without a template.
    pub fn instant_add_object(&mut self, scene: &mut dyn LogicScene) {
        let Some(template) = self.template_object else {
            trace!("{} has no template object, nothing to add", self.id());
            return;
        };
        let Some(parent) = self.parent() else {
            warn!("{} has lost its owner, cannot add object", self.id());
            return;
        };

        let replica = match scene.add_replica_object(template, parent, self.spawn_delay) {
            Ok(replica) => replica,
            Err(err) => {
                warn!("{} failed to add object: {}", self.id(), err);
                return;
            }
        };

        scene.set_linear_velocity(replica, self.linear_velocity, self.linear_velocity_is_local);
        scene.set_angular_velocity(replica, self.angular_velocity, self.angular_velocity_is_local);
        scene.resolve_combined_velocities(
            replica,
            self.linear_velocity,
            self.angular_velocity,
            self.linear_velocity_is_local,
            self.angular_velocity_is_local,
        );

        // track the clone by registration only, never by ownership
        if let Some(previous) = self.last_created_object.take() {
            self.release_reference(previous, scene);
        }
        self.last_created_object = Some(replica);
        scene.register_actuator(replica, self.id());

        scene.release_object(replica);

        debug!("{} added object {} from template {}", self.id(), replica, template);
    }
}

impl LogicBrick for AddObjectActuator {
    fn brick(&self) -> &BrickState {
        &self.brick
    }

    fn brick_mut(&mut self) -> &mut BrickState {
        &mut self.brick
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn process_replica(&mut self, scene: &mut dyn LogicScene) {
        self.brick.mark_replica();
        self.events.remove_all();
        self.last_created_object = None;
        if let Some(template) = self.template_object {
            scene.register_actuator(template, self.id());
        }
    }

    fn unlink_object(&mut self, candidate: ObjectId) -> bool {
        let mut unlinked = false;
        if self.template_object == Some(candidate) {
            self.template_object = None;
            unlinked = true;
        }
        if self.last_created_object == Some(candidate) {
            self.last_created_object = None;
            unlinked = true;
        }
        if unlinked {
            debug!("{} unlinked from destroyed object {}", self.id(), candidate);
        }
        unlinked
    }

    fn relink(&mut self, map: &RelinkMap, scene: &mut dyn LogicScene) {
        // only the template follows a duplication, never the last clone
        let Some(old) = self.template_object else {
            return;
        };
        let Some(&new) = map.get(&old) else {
            return;
        };
        self.template_object = None;
        self.release_reference(old, scene);
        self.template_object = Some(new);
        scene.register_actuator(new, self.id());
        trace!("{} relinked template {} -> {}", self.id(), old, new);
    }

    fn release(&mut self, scene: &mut dyn LogicScene) {
        let id = self.id();
        for object in self.registrations() {
            scene.unregister_actuator(object, id);
        }
        self.template_object = None;
        self.last_created_object = None;
    }
}

impl Actuator for AddObjectActuator {
    fn actuator_type(&self) -> ActuatorType {
        ActuatorType::AddObject
    }

    fn events(&self) -> &ActuatorEvents {
        &self.events
    }

    fn events_mut(&mut self) -> &mut ActuatorEvents {
        &mut self.events
    }

    fn update(&mut self, scene: &mut dyn LogicScene) -> bool {
        let negative = self.events.is_negative_event();
        let collapsed = self.events.remove_all();

        if negative {
            return false;
        }

        if collapsed > 1 {
            trace!("{} collapsing {} events into one spawn", self.id(), collapsed);
        }
        self.instant_add_object(scene);

        false
    }

    fn replicate(&self, parent: ObjectId) -> Box<dyn Actuator> {
        let mut replica = self.clone();
        replica.brick = self.brick.replica_for(parent);
        Box::new(replica)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scene::ConstraintState;
    use sca_shared::lifecycle::TriggerState;
    use sca_shared::object::LogicUnitId;
    use std::collections::{BTreeMap, BTreeSet, HashMap};

    /// Scene double that records every collaborator call
    #[derive(Default)]
    pub(crate) struct RecordingScene {
        pub objects: BTreeSet<ObjectId>,
        pub names: HashMap<String, ObjectId>,
        pub registrations: BTreeMap<ObjectId, BTreeSet<LogicUnitId>>,
        pub clones: Vec<(ObjectId, ObjectId, f32)>,
        pub linear: Vec<(ObjectId, Vector3, bool)>,
        pub angular: Vec<(ObjectId, Vector3, bool)>,
        pub resolved: Vec<ObjectId>,
        pub released: Vec<ObjectId>,
        next_id: ObjectId,
    }

    impl RecordingScene {
        pub fn new() -> Self {
            Self { next_id: 100, ..Default::default() }
        }

        pub fn add(&mut self, name: &str, id: ObjectId) -> ObjectId {
            self.objects.insert(id);
            self.names.insert(name.to_string(), id);
            id
        }

        pub fn registered(&self, object: ObjectId, actuator: LogicUnitId) -> bool {
            self.registrations.get(&object).map(|s| s.contains(&actuator)).unwrap_or(false)
        }

        pub fn registration_count(&self, actuator: LogicUnitId) -> usize {
            self.registrations.values().filter(|s| s.contains(&actuator)).count()
        }
    }

    impl LogicScene for RecordingScene {
        fn add_replica_object(&mut self, template: ObjectId, parent: ObjectId, delay: f32) -> LogicResult<ObjectId> {
            if !self.objects.contains(&template) {
                return Err(LogicError::ReplicationFailed(template));
            }
            let id = self.next_id;
            self.next_id += 1;
            self.objects.insert(id);
            self.clones.push((template, parent, delay));
            Ok(id)
        }

        fn release_object(&mut self, object: ObjectId) {
            self.released.push(object);
        }

        fn set_linear_velocity(&mut self, object: ObjectId, velocity: Vector3, local: bool) {
            self.linear.push((object, velocity, local));
        }

        fn set_angular_velocity(&mut self, object: ObjectId, velocity: Vector3, local: bool) {
            self.angular.push((object, velocity, local));
        }

        fn resolve_combined_velocities(&mut self, object: ObjectId, _: Vector3, _: Vector3, _: bool, _: bool) {
            self.resolved.push(object);
        }

        fn register_actuator(&mut self, object: ObjectId, actuator: LogicUnitId) {
            self.registrations.entry(object).or_default().insert(actuator);
        }

        fn unregister_actuator(&mut self, object: ObjectId, actuator: LogicUnitId) {
            if let Some(set) = self.registrations.get_mut(&object) {
                set.remove(&actuator);
            }
        }

        fn object_exists(&self, object: ObjectId) -> bool {
            self.objects.contains(&object)
        }

        fn find_object(&self, name: &str) -> Option<ObjectId> {
            self.names.get(name).copied()
        }

        fn is_armature(&self, _object: ObjectId) -> bool {
            false
        }

        fn constraint_state(&self, _: ObjectId, _: &str, _: &str) -> Option<ConstraintState> {
            None
        }
    }

    const OWNER: ObjectId = 1;
    const TEMPLATE: ObjectId = 2;

    fn setup(settings: AddObjectSettings) -> (RecordingScene, AddObjectActuator) {
        let mut scene = RecordingScene::new();
        scene.add("Owner", OWNER);
        scene.add("Template", TEMPLATE);
        let actuator = AddObjectActuator::new("spawn", OWNER, settings, &mut scene);
        (scene, actuator)
    }

    fn with_template() -> AddObjectSettings {
        AddObjectSettings {
            template_object: Some(TEMPLATE),
            linear_velocity: Vector3::new(1.0, 0.0, 0.0),
            ..Default::default()
        }
    }

    fn fire(actuator: &mut AddObjectActuator, scene: &mut RecordingScene, trigger: TriggerState) -> bool {
        actuator.add_event(trigger);
        actuator.update(scene)
    }

    #[test]
    fn registers_with_template_on_construction() {
        let (scene, actuator) = setup(with_template());
        assert!(scene.registered(TEMPLATE, actuator.id()));
        assert_eq!(actuator.last_created_object(), None);
    }

    #[test]
    fn positive_trigger_spawns_once_and_tracks_clone() {
        let (mut scene, mut actuator) = setup(with_template());

        let keep = fire(&mut actuator, &mut scene, TriggerState::Positive);
        assert!(!keep);
        assert_eq!(scene.clones, vec![(TEMPLATE, OWNER, 0.0)]);

        let clone = actuator.last_created_object().unwrap();
        assert_eq!(scene.linear, vec![(clone, Vector3::new(1.0, 0.0, 0.0), false)]);
        assert_eq!(scene.angular, vec![(clone, Vector3::zero(), false)]);
        assert_eq!(scene.resolved, vec![clone]);
        assert!(scene.registered(clone, actuator.id()));
        assert_eq!(scene.released, vec![clone]);
    }

    #[test]
    fn second_spawn_moves_registration_to_new_clone() {
        let (mut scene, mut actuator) = setup(with_template());

        fire(&mut actuator, &mut scene, TriggerState::Positive);
        let first = actuator.last_created_object().unwrap();
        fire(&mut actuator, &mut scene, TriggerState::Positive);
        let second = actuator.last_created_object().unwrap();

        assert_ne!(first, second);
        assert_eq!(scene.clones.len(), 2);
        assert!(!scene.registered(first, actuator.id()));
        assert!(scene.registered(second, actuator.id()));
        assert!(scene.registered(TEMPLATE, actuator.id()));
    }

    #[test]
    fn registrations_never_exceed_two() {
        let (mut scene, mut actuator) = setup(with_template());
        for _ in 0..5 {
            fire(&mut actuator, &mut scene, TriggerState::Positive);
            assert!(scene.registration_count(actuator.id()) <= 2);
            assert_eq!(actuator.registrations().len(), 2);
        }
    }

    #[test]
    fn burst_of_events_collapses_to_single_spawn() {
        let (mut scene, mut actuator) = setup(with_template());
        actuator.add_event(TriggerState::Positive);
        actuator.add_event(TriggerState::Positive);
        actuator.add_event(TriggerState::Negative);
        actuator.update(&mut scene);
        assert_eq!(scene.clones.len(), 1);
        assert!(!actuator.events().has_events());
    }

    #[test]
    fn negative_trigger_changes_nothing() {
        let (mut scene, mut actuator) = setup(with_template());
        fire(&mut actuator, &mut scene, TriggerState::Positive);
        let last = actuator.last_created_object();

        for _ in 0..3 {
            let keep = fire(&mut actuator, &mut scene, TriggerState::Negative);
            assert!(!keep);
        }

        assert_eq!(scene.clones.len(), 1);
        assert_eq!(actuator.template_object(), Some(TEMPLATE));
        assert_eq!(actuator.last_created_object(), last);
        assert_eq!(actuator.linear_velocity(), Vector3::new(1.0, 0.0, 0.0));
        assert!(!actuator.events().has_events());
    }

    #[test]
    fn missing_template_is_inert() {
        let (mut scene, mut actuator) = setup(AddObjectSettings::default());
        let keep = fire(&mut actuator, &mut scene, TriggerState::Positive);
        assert!(!keep);
        assert!(scene.clones.is_empty());
        assert_eq!(actuator.last_created_object(), None);
    }

    #[test]
    fn scene_refusal_leaves_state_unchanged() {
        let (mut scene, mut actuator) = setup(with_template());
        scene.objects.remove(&TEMPLATE);
        fire(&mut actuator, &mut scene, TriggerState::Positive);
        assert_eq!(actuator.last_created_object(), None);
        assert!(scene.released.is_empty());
    }

    #[test]
    fn unlink_clears_template_and_reports_it() {
        let (_scene, mut actuator) = setup(with_template());
        assert!(actuator.unlink_object(TEMPLATE));
        assert_eq!(actuator.template_object(), None);
        assert!(!actuator.unlink_object(TEMPLATE));
        assert!(!actuator.unlink_object(55));
    }

    #[test]
    fn unlink_checks_last_created_too() {
        let (mut scene, mut actuator) = setup(with_template());
        fire(&mut actuator, &mut scene, TriggerState::Positive);
        let clone = actuator.last_created_object().unwrap();

        assert!(!actuator.unlink_object(999));
        assert_eq!(actuator.last_created_object(), Some(clone));
        assert!(actuator.unlink_object(clone));
        assert_eq!(actuator.last_created_object(), None);
        assert_eq!(actuator.template_object(), Some(TEMPLATE));
    }

    #[test]
    fn replica_is_isolated_from_original() {
        let (mut scene, mut original) = setup(with_template());
        fire(&mut original, &mut scene, TriggerState::Positive);
        let spawned = original.last_created_object().unwrap();

        scene.add("Copy", 3);
        let mut replica = original.replicate(3);
        replica.process_replica(&mut scene);
        let replica_id = replica.id();
        let replica = replica.as_any().downcast_ref::<AddObjectActuator>().unwrap().clone();

        assert_ne!(replica_id, original.id());
        assert!(replica.is_replica());
        assert_eq!(replica.parent(), Some(3));
        assert_eq!(replica.last_created_object(), None);
        assert_eq!(replica.template_object(), Some(TEMPLATE));
        assert!(scene.registered(TEMPLATE, replica_id));

        let mut replica = replica;
        replica.release(&mut scene);
        assert!(!scene.registered(TEMPLATE, replica_id));
        assert!(scene.registered(TEMPLATE, original.id()));
        assert!(scene.registered(spawned, original.id()));
    }

    #[test]
    fn relink_moves_template_registration() {
        let (mut scene, mut actuator) = setup(with_template());
        scene.add("TemplateCopy", 20);

        actuator.relink(&RelinkMap::new(), &mut scene);
        assert_eq!(actuator.template_object(), Some(TEMPLATE));

        let unrelated: RelinkMap = [(77, 78)].into_iter().collect();
        actuator.relink(&unrelated, &mut scene);
        assert_eq!(actuator.template_object(), Some(TEMPLATE));
        assert!(scene.registered(TEMPLATE, actuator.id()));

        let map: RelinkMap = [(TEMPLATE, 20)].into_iter().collect();
        actuator.relink(&map, &mut scene);
        assert_eq!(actuator.template_object(), Some(20));
        assert!(!scene.registered(TEMPLATE, actuator.id()));
        assert!(scene.registered(20, actuator.id()));
    }

    #[test]
    fn relink_ignores_last_created_object() {
        let (mut scene, mut actuator) = setup(with_template());
        fire(&mut actuator, &mut scene, TriggerState::Positive);
        let clone = actuator.last_created_object().unwrap();

        let map: RelinkMap = [(clone, 500)].into_iter().collect();
        actuator.relink(&map, &mut scene);
        assert_eq!(actuator.last_created_object(), Some(clone));
        assert!(scene.registered(clone, actuator.id()));
    }

    #[test]
    fn template_equal_to_last_clone_keeps_single_registration() {
        let (mut scene, mut actuator) = setup(with_template());
        fire(&mut actuator, &mut scene, TriggerState::Positive);
        let clone = actuator.last_created_object().unwrap();

        // template now points at the clone itself
        actuator.set_template_object(Some(clone), &mut scene);
        assert!(!scene.registered(TEMPLATE, actuator.id()));
        fire(&mut actuator, &mut scene, TriggerState::Positive);

        assert_ne!(actuator.last_created_object(), Some(clone));
        assert!(scene.registered(clone, actuator.id()), "template registration must survive");
    }

    #[test]
    fn release_unregisters_everything() {
        let (mut scene, mut actuator) = setup(with_template());
        fire(&mut actuator, &mut scene, TriggerState::Positive);
        actuator.release(&mut scene);
        assert_eq!(scene.registration_count(actuator.id()), 0);
        assert!(actuator.registrations().is_empty());
    }

    #[test]
    fn spawn_delay_is_range_checked() {
        let (mut scene, mut actuator) = setup(with_template());
        assert!(actuator.set_spawn_delay(-1.0).is_err());
        assert_eq!(actuator.spawn_delay(), 0.0);
        actuator.set_spawn_delay(3.0).unwrap();
        fire(&mut actuator, &mut scene, TriggerState::Positive);
        assert_eq!(scene.clones[0].2, 3.0);
    }

    #[test]
    fn local_flags_are_passed_through() {
        let settings = AddObjectSettings {
            angular_velocity: Vector3::new(0.0, 0.0, 2.0),
            angular_velocity_is_local: true,
            ..with_template()
        };
        let (mut scene, mut actuator) = setup(settings);
        fire(&mut actuator, &mut scene, TriggerState::Positive);
        assert!(!scene.linear[0].2);
        assert!(scene.angular[0].2);
        assert_eq!(scene.angular[0].1, Vector3::new(0.0, 0.0, 2.0));
    }
}
