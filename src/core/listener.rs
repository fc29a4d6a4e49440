use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage};
use crate::math::Vector2;

/// Receives overlaps synchronously while a step runs.
///
/// `bodies` is the world's live body set. A listener may inspect, mutate or
/// remove bodies through it; the step skips any handle that stops resolving,
/// and every add or remove shows up as a body event.
pub trait CollisionListener {
    fn on_collision(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
        contact_point: Vector2,
    );
}

impl<F> CollisionListener for F
where
    F: FnMut(&mut BodyStorage<RigidBody>, BodyHandle, BodyHandle, Vector2),
{
    fn on_collision(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
        contact_point: Vector2,
    ) {
        self(bodies, body_a, body_b, contact_point)
    }
}

/// Identifies a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(pub(crate) u32);

/// Listeners in registration order
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: Vec<(ListenerHandle, Box<dyn CollisionListener>)>,
    next_id: u32,
}

impl ListenerRegistry {
    pub fn register(&mut self, listener: Box<dyn CollisionListener>) -> ListenerHandle {
        let handle = ListenerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((handle, listener));
        handle
    }

    pub fn deregister(&mut self, handle: ListenerHandle) -> bool {
        match self.listeners.iter().position(|(h, _)| *h == handle) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn notify(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
        contact_point: Vector2,
    ) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_collision(bodies, body_a, body_b, contact_point);
        }
    }
}
