use crate::bodies::RigidBody;
use crate::math::EPSILON;

/// Impulse-based contact response with linear positional correction.
///
/// A single solver pass is run for every overlapping pair the narrow phase
/// reports; there is no iteration and no persistent contact state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSolver {
    /// Coefficient of restitution applied to approaching pairs
    pub restitution: f32,

    /// Penetration left uncorrected to avoid jitter
    pub slop: f32,

    /// Fraction of the remaining penetration removed per pass
    pub correction_percent: f32,
}

impl ContactSolver {
    pub fn new(restitution: f32, slop: f32, correction_percent: f32) -> Self {
        Self {
            restitution,
            slop,
            correction_percent,
        }
    }

    /// Resolves one overlapping pair.
    ///
    /// Applies an impulse along the contact normal when the bodies are not
    /// separating faster than `EPSILON`, then pushes them apart in proportion
    /// to their inverse masses. Returns the impulse scalar, or `None` when
    /// no impulse was applied. Two static bodies are left untouched.
    pub fn resolve(&self, body_a: &mut RigidBody, body_b: &mut RigidBody) -> Option<f32> {
        let inv_mass_a = body_a.get_inverse_mass();
        let inv_mass_b = body_b.get_inverse_mass();
        let inv_mass_sum = inv_mass_a + inv_mass_b;

        if inv_mass_sum == 0.0 {
            return None;
        }

        let position_delta = body_b.get_position() - body_a.get_position();
        let normal = position_delta.normalize();

        let relative_velocity = body_b.get_velocity() - body_a.get_velocity();
        let velocity_along_normal = relative_velocity.dot(&normal);

        let mut applied = None;

        // Also resolves pairs separating by less than EPSILON.
        if velocity_along_normal < EPSILON {
            let impulse_scalar = -(1.0 + self.restitution) * velocity_along_normal / inv_mass_sum;
            let impulse = normal * impulse_scalar;

            *body_a.velocity_mut() -= impulse * inv_mass_a;
            *body_b.velocity_mut() += impulse * inv_mass_b;

            applied = Some(impulse_scalar);
        }

        let penetration = body_a.get_radius() + body_b.get_radius() - position_delta.length();
        let correction = (penetration - self.slop).max(0.0) / inv_mass_sum * self.correction_percent;
        let correction = normal * correction;

        *body_a.position_mut() -= correction * inv_mass_a;
        *body_b.position_mut() += correction * inv_mass_b;

        applied
    }
}

impl Default for ContactSolver {
    fn default() -> Self {
        Self {
            restitution: 0.4,
            slop: 0.01,
            correction_percent: 0.2,
        }
    }
}
