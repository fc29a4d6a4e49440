mod rigid_body;
mod body_desc;

pub use self::rigid_body::{RigidBody, RigidBodyHandle};
pub use self::body_desc::BodyDesc;
pub use self::body_flags::BodyFlags;

/// Linear drag sentinel meaning "use the world's drag instead of a per-body value"
pub const USE_WORLD_DRAG: f32 = -1.0;

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling the behavior of rigid bodies
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub struct BodyFlags: u32 {
            /// Body is a trigger volume (reports overlaps, never responds to them)
            const TRIGGER = 0x01;

            /// Body overlapped at least one other body during the last step
            const COLLIDING = 0x02;
        }
    }
}
