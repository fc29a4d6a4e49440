use crate::bodies::RigidBody;
use crate::integration::{Integrator, StepContext};
use crate::math::EPSILON;

/// Semi-implicit Euler with per-step drag.
///
/// Accumulated force (plus gravity times mass) is added to the velocity as
/// `force / mass` without scaling by the step, so a force applied once acts
/// as a per-step impulse. Each axis is only touched when its contribution
/// exceeds `EPSILON`. After moving, the speed is reduced by the drag amount,
/// never below zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct DampedEulerIntegrator;

impl DampedEulerIntegrator {
    pub fn new() -> Self {
        Self
    }
}

impl Integrator for DampedEulerIntegrator {
    fn integrate(&mut self, body: &mut RigidBody, ctx: &StepContext) {
        let mass = body.get_mass();
        if mass < EPSILON {
            return;
        }

        let mut force = body.get_force();
        if ctx.gravity.x.abs() > EPSILON {
            force.x += ctx.gravity.x * mass;
        }
        if ctx.gravity.y.abs() > EPSILON {
            force.y += ctx.gravity.y * mass;
        }

        let mut velocity = body.get_velocity();
        if force.x.abs() > EPSILON {
            velocity.x += force.x / mass;
        }
        if force.y.abs() > EPSILON {
            velocity.y += force.y / mass;
        }

        let max_speed = body.get_max_speed();
        if max_speed > EPSILON {
            let speed_squared = velocity.length_squared();
            if speed_squared > body.get_max_speed_squared() {
                velocity *= max_speed / speed_squared.sqrt();
            }
        }

        let mut position = body.get_position();
        let mut has_velocity = false;
        if velocity.x.abs() > EPSILON {
            position.x += velocity.x * ctx.fixed_step;
            has_velocity = true;
        }
        if velocity.y.abs() > EPSILON {
            position.y += velocity.y * ctx.fixed_step;
            has_velocity = true;
        }

        if has_velocity {
            let body_drag = body.get_linear_drag();
            let drag = if body_drag < 0.0 {
                ctx.instant_drag
            } else {
                body_drag * ctx.fixed_step
            };
            velocity.scale_toward_zero(drag);
        }

        body.set_position(position);
        body.set_velocity(velocity);
        body.clear_force();
    }

    fn name(&self) -> &str {
        "DampedEuler"
    }
}
