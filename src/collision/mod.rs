mod broad_phase;
mod contact_solver;
mod collision_filter;

pub use self::broad_phase::{SpatialIndex, SpatialHashGrid, BruteForceIndex};
pub use self::contact_solver::ContactSolver;
pub use self::collision_filter::CollisionLayer;
