use std::f32::consts::FRAC_PI_2;

use sca_logic::script::{call_method, get_attribute_json, set_attribute};
use sca_logic::{load_logic, AddObjectActuator, LogicBrick, LogicScene, SceneGraph};
use sca_shared::constants::attributes;
use sca_shared::lifecycle::TriggerState;
use sca_shared::property::AttributeValue;
use sca_shared::types::{Quat, Transform, Vector3};

const LAUNCHER: &str = r#"{ "objects": [{
    "object": "Launcher",
    "actuators": [{
        "type": "AddObject",
        "name": "fire",
        "template": "Bullet",
        "linear_velocity": [1.0, 0.0, 0.0]
    }]
}]}"#;

fn close(a: Vector3, b: Vector3) -> bool {
    (a - b).length() < 1e-5
}

fn launcher_scene() -> SceneGraph {
    let mut scene = SceneGraph::new();
    scene.add_object("Launcher", Transform::identity());
    scene.add_object("Bullet", Transform::identity());
    scene
}

#[test]
fn two_spawns_move_the_clone_registration() {
    let mut scene = launcher_scene();
    let mut manager = load_logic(LAUNCHER, &mut scene).unwrap();
    let launcher = scene.find_object("Launcher").unwrap();
    let bullet = scene.find_object("Bullet").unwrap();
    let fire = manager.bricks_of(launcher)[0];

    manager.trigger(fire, TriggerState::Positive).unwrap();
    manager.process_frame(&mut scene);

    let first = manager.actuator_as::<AddObjectActuator>(fire).unwrap().last_created_object().unwrap();
    let clone = scene.get_object(first).unwrap();
    assert_eq!(clone.replica_of, Some(bullet));
    assert_eq!(clone.parent, Some(launcher));
    assert!(close(clone.linear_velocity, Vector3::new(1.0, 0.0, 0.0)));
    assert!(close(clone.angular_velocity, Vector3::zero()));
    assert!(scene.is_registered(first, fire));

    manager.trigger(fire, TriggerState::Positive).unwrap();
    manager.process_frame(&mut scene);

    let second = manager.actuator_as::<AddObjectActuator>(fire).unwrap().last_created_object().unwrap();
    assert_ne!(first, second);
    assert!(!scene.is_registered(first, fire));
    assert!(scene.is_registered(second, fire));
    assert!(scene.is_registered(bullet, fire));
    assert_eq!(scene.registration_count(fire), 2);
    assert_eq!(scene.len(), 4);
}

#[test]
fn local_velocity_follows_owner_orientation() {
    let mut scene = launcher_scene();
    let launcher = scene.find_object("Launcher").unwrap();
    scene.set_orientation(launcher, Quat::from_axis_angle(Vector3::new(0.0, 0.0, 1.0), FRAC_PI_2)).unwrap();

    let mut manager = load_logic(LAUNCHER, &mut scene).unwrap();
    let fire = manager.bricks_of(launcher)[0];
    set_attribute(
        manager.actuator_as_mut::<AddObjectActuator>(fire).unwrap(),
        attributes::LINEAR_VELOCITY_LOCAL,
        AttributeValue::Bool(true),
        &mut scene,
    )
    .unwrap();

    manager.trigger(fire, TriggerState::Positive).unwrap();
    manager.process_frame(&mut scene);

    let clone = manager.actuator_as::<AddObjectActuator>(fire).unwrap().last_created_object().unwrap();
    assert!(close(scene.get_object(clone).unwrap().linear_velocity, Vector3::new(0.0, 1.0, 0.0)));
}

#[test]
fn script_spawn_then_destroy_template() {
    let mut scene = launcher_scene();
    let mut manager = load_logic(LAUNCHER, &mut scene).unwrap();
    let launcher = scene.find_object("Launcher").unwrap();
    let bullet = scene.find_object("Bullet").unwrap();
    let fire = manager.bricks_of(launcher)[0];

    let actuator = manager.actuator_as_mut::<AddObjectActuator>(fire).unwrap();
    call_method(actuator, attributes::INSTANT_ADD_OBJECT, &mut scene).unwrap();
    let clone = actuator.last_created_object().unwrap();
    assert_eq!(
        get_attribute_json(&*actuator, attributes::OBJECT_LAST_CREATED).unwrap(),
        format!(r#"{{"ObjectReference":{}}}"#, clone)
    );

    manager.destroy_object(&mut scene, bullet).unwrap();
    let actuator = manager.actuator_as::<AddObjectActuator>(fire).unwrap();
    assert_eq!(actuator.template_object(), None);
    assert_eq!(actuator.last_created_object(), Some(clone));

    // a template-less actuator stays inert
    manager.trigger(fire, TriggerState::Positive).unwrap();
    manager.process_frame(&mut scene);
    assert_eq!(scene.len(), 2);
    assert!(!scene.object_exists(bullet));
}

#[test]
fn duplicated_batch_spawns_from_duplicated_template() {
    let mut scene = launcher_scene();
    let mut manager = load_logic(LAUNCHER, &mut scene).unwrap();
    let launcher = scene.find_object("Launcher").unwrap();
    let bullet = scene.find_object("Bullet").unwrap();

    let map = manager.duplicate_objects(&mut scene, &[launcher, bullet]).unwrap();
    let copy = manager.bricks_of(map[&launcher])[0];
    assert!(manager.actuator(copy).unwrap().is_replica());

    manager.trigger(copy, TriggerState::Positive).unwrap();
    manager.process_frame(&mut scene);

    let spawned = manager.actuator_as::<AddObjectActuator>(copy).unwrap().last_created_object().unwrap();
    assert_eq!(scene.get_object(spawned).unwrap().replica_of, Some(map[&bullet]));
    assert_eq!(scene.get_object(spawned).unwrap().parent, Some(map[&launcher]));
}

#[test]
fn scripted_clone_carries_template_logic() {
    let json = r#"{ "objects": [
        { "object": "Launcher", "actuators": [{ "type": "AddObject", "name": "fire", "template": "Bullet" }] },
        { "object": "Bullet", "actuators": [{ "type": "AddObject", "name": "trail", "template": "Spark" }] }
    ]}"#;
    let mut scene = launcher_scene();
    let spark = scene.add_object("Spark", Transform::identity());
    let mut manager = load_logic(json, &mut scene).unwrap();
    let launcher = scene.find_object("Launcher").unwrap();
    let fire = manager.bricks_of(launcher)[0];

    let actuator = manager.actuator_as_mut::<AddObjectActuator>(fire).unwrap();
    call_method(actuator, attributes::INSTANT_ADD_OBJECT, &mut scene).unwrap();
    let clone = actuator.last_created_object().unwrap();
    manager.process_frame(&mut scene);

    let inherited = manager.bricks_of(clone);
    assert_eq!(inherited.len(), 1);
    let trail = manager.actuator_as::<AddObjectActuator>(inherited[0]).unwrap();
    assert_eq!(trail.name(), "trail");
    assert_eq!(trail.template_object(), Some(spark));

    // the inherited actuator spawns from its own template
    manager.trigger(inherited[0], TriggerState::Positive).unwrap();
    manager.process_frame(&mut scene);
    let spawned = manager.actuator_as::<AddObjectActuator>(inherited[0]).unwrap().last_created_object().unwrap();
    assert_eq!(scene.get_object(spawned).unwrap().replica_of, Some(spark));
    assert_eq!(scene.get_object(spawned).unwrap().parent, Some(clone));
}
