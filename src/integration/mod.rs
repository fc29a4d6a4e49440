mod integrator;
mod damped_euler;

pub use self::integrator::{Integrator, StepContext};
pub use self::damped_euler::DampedEulerIntegrator;
