use crate::core::BodyHandle;
use crate::math::Vector2;
use std::collections::VecDeque;

/// An overlap detected during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The body whose scan found the overlap
    pub body_a: BodyHandle,

    /// The candidate it overlapped
    pub body_b: BodyHandle,

    /// Contact point on `body_a`'s circumference
    pub contact_point: Vector2,

    /// Whether the pair went through impulse resolution (false if either is a trigger)
    pub resolved: bool,

    /// Tick id of the step that produced the event
    pub tick: u8,
}

impl CollisionEvent {
    /// Returns whether `body` is one of the two participants
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// Returns the participant that is not `body`, if `body` takes part at all
    pub fn other(&self, body: BodyHandle) -> Option<BodyHandle> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// Types of body events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEventType {
    /// A body has been added to the world
    Added,

    /// A body has been removed from the world
    Removed,
}

/// An event related to a single body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyEvent {
    pub event_type: BodyEventType,
    pub body: BodyHandle,
}

/// Collision events of the latest step plus queued body events.
///
/// Collision events are kept in detection order, so a pair normally shows up
/// twice: once from each body's scan. Body additions and removals queue up
/// across steps until they are drained or cleared.
#[derive(Debug, Default)]
pub struct EventQueue {
    collision_events: Vec<CollisionEvent>,
    body_events: VecDeque<BodyEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_collision_event(&mut self, event: CollisionEvent) {
        self.collision_events.push(event);
    }

    pub fn add_body_event(&mut self, event: BodyEvent) {
        self.body_events.push_back(event);
    }

    /// Pops the oldest body event
    pub fn next_body_event(&mut self) -> Option<BodyEvent> {
        self.body_events.pop_front()
    }

    pub fn has_collision_events(&self) -> bool {
        !self.collision_events.is_empty()
    }

    pub fn has_body_events(&self) -> bool {
        !self.body_events.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.collision_events.is_empty() && self.body_events.is_empty()
    }

    /// Number of overlaps recorded in the latest step
    pub fn collision_count(&self) -> usize {
        self.collision_events.len()
    }

    pub fn clear(&mut self) {
        self.collision_events.clear();
        self.body_events.clear();
    }

    /// Drops the collision events, keeping queued body events
    pub fn clear_collision_events(&mut self) {
        self.collision_events.clear();
    }

    /// Iterates over collision events in detection order
    pub fn collision_events(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.collision_events.iter()
    }

    /// Takes every collision event out of the queue
    pub fn drain_collision_events(&mut self) -> impl Iterator<Item = CollisionEvent> + '_ {
        self.collision_events.drain(..)
    }

    /// Gets all collision events involving a specific body
    pub fn get_collision_events_for_body(&self, body: BodyHandle) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.involves(body))
            .collect()
    }

    /// Overlaps that skipped resolution because a trigger was involved
    pub fn get_trigger_events(&self) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| !e.resolved)
            .collect()
    }

    /// Contact point found when `a` scanned `b`, if that happened this step
    pub fn get_contact(&self, a: BodyHandle, b: BodyHandle) -> Option<Vector2> {
        self.collision_events
            .iter()
            .find(|e| e.body_a == a && e.body_b == b)
            .map(|e| e.contact_point)
    }

    /// Gets all body events of a specific type
    pub fn get_body_events_of_type(&self, event_type: BodyEventType) -> Vec<&BodyEvent> {
        self.body_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }
}
