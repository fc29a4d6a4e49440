mod vector;
mod aabb;

pub use vector::Vector2;
pub use aabb::Aabb;

/// Threshold below which masses, forces and velocity components are treated as zero
pub const EPSILON: f32 = 1.0e-6;

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() < EPSILON
}
