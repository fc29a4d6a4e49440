#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// The layer a body collides on.
///
/// Two bodies only interact when they share a layer. Negative layers are
/// kept out of the broad phase entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct CollisionLayer(pub i32);

impl CollisionLayer {
    /// Layer for bodies that never take part in collision detection
    pub const IGNORED: Self = Self(-1);

    /// Layer bodies are placed on unless told otherwise
    pub const DEFAULT: Self = Self(0);

    /// Returns whether bodies on this layer are excluded from the broad phase
    #[inline]
    pub fn is_ignored(self) -> bool {
        self.0 < 0
    }

    /// Returns whether a body on this layer can touch a body on `other`
    #[inline]
    pub fn interacts_with(self, other: Self) -> bool {
        self == other
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for CollisionLayer {
    fn from(layer: i32) -> Self {
        Self(layer)
    }
}
