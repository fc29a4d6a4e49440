pub mod world;
pub mod config;
pub mod storage;
pub mod events;
pub mod listener;
pub mod stepper;

pub use self::world::PhysicsWorld;
pub use self::config::WorldConfig;
pub use self::storage::{BodyStorage, Storage};
pub use self::events::{EventQueue, CollisionEvent, BodyEvent, BodyEventType};
pub use self::listener::{CollisionListener, ListenerHandle};
pub use self::stepper::FixedStepper;

/// A unique identifier for a body in the physics world.
///
/// Handles stay valid until the body is removed. A removed body's slot may
/// be reused, but with a new generation, so old handles never alias it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl BodyHandle {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index of the handle
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}
