//! # Actuator Update Protocol
//!
//! Actuators collect trigger events during the sensor pass and are updated
//! once per frame while they hold events. `update` consumes every pending
//! event before acting and returns whether the actuator wants to stay
//! scheduled for the next frame.

use sca_shared::lifecycle::TriggerState;
use sca_shared::object::{ActuatorType, ObjectId};

use crate::brick::LogicBrick;
use crate::scene::LogicScene;

pub mod add_object;

pub use add_object::{AddObjectActuator, AddObjectSettings};

/// Events received since the last update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorEvents {
    positive: u32,
    negative: u32,
}

impl ActuatorEvents {
    pub fn add(&mut self, trigger: TriggerState) {
        match trigger {
            TriggerState::Positive => self.positive += 1,
            TriggerState::Negative => self.negative += 1,
        }
    }

    /// Only negative events are pending; any positive event wins
    pub fn is_negative_event(&self) -> bool {
        self.positive == 0 && self.negative > 0
    }

    pub fn has_events(&self) -> bool {
        self.positive + self.negative > 0
    }

    pub fn pending(&self) -> u32 {
        self.positive + self.negative
    }

    /// Clear everything, returning how many events were dropped
    pub fn remove_all(&mut self) -> u32 {
        let count = self.pending();
        *self = ActuatorEvents::default();
        count
    }
}

pub trait Actuator: LogicBrick {
    fn actuator_type(&self) -> ActuatorType;

    fn events(&self) -> &ActuatorEvents;

    fn events_mut(&mut self) -> &mut ActuatorEvents;

    fn add_event(&mut self, trigger: TriggerState) {
        self.events_mut().add(trigger);
    }

    /// Act on pending events. Returns true to stay scheduled next frame.
    fn update(&mut self, scene: &mut dyn LogicScene) -> bool;

    /// Shallow field copy bound to `parent`; the copy must go through
    /// `process_replica` before use
    fn replicate(&self, parent: ObjectId) -> Box<dyn Actuator>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_event_wins_over_negative() {
        let mut events = ActuatorEvents::default();
        events.add(TriggerState::Negative);
        assert!(events.is_negative_event());
        events.add(TriggerState::Positive);
        assert!(!events.is_negative_event());
        assert_eq!(events.pending(), 2);
    }

    #[test]
    fn no_events_is_not_negative() {
        let events = ActuatorEvents::default();
        assert!(!events.is_negative_event());
        assert!(!events.has_events());
    }

    #[test]
    fn remove_all_reports_dropped_count() {
        let mut events = ActuatorEvents::default();
        events.add(TriggerState::Positive);
        events.add(TriggerState::Positive);
        events.add(TriggerState::Negative);
        assert_eq!(events.remove_all(), 3);
        assert!(!events.has_events());
    }
}
