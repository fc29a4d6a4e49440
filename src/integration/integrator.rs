use crate::bodies::RigidBody;
use crate::math::Vector2;

/// World state an integrator needs for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContext {
    /// Constant gravity acceleration
    pub gravity: Vector2,

    /// Simulated seconds for this step
    pub fixed_step: f32,

    /// World drag already scaled by the fixed step
    pub instant_drag: f32,
}

/// Trait for numerical integration algorithms
pub trait Integrator {
    /// Advances one body by a single fixed step
    fn integrate(&mut self, body: &mut RigidBody, ctx: &StepContext);

    /// Returns the name of the integrator
    fn name(&self) -> &str;
}
