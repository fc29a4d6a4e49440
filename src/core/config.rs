use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Configuration parameters for a physics world
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct WorldConfig {
    /// Simulated seconds advanced by every step
    pub fixed_step: f32,

    /// World drag coefficient, applied as `linear_drag * fixed_step` per step
    pub linear_drag: f32,

    /// Half-extent of the square world; bodies are kept inside `[-size, size]`
    pub size: f32,

    /// Constant gravity acceleration
    pub gravity: Vector2,

    /// Cell size of the default spatial hash grid
    pub cell_size: f32,

    /// Upper bound on fixed steps run by a single `advance` call
    pub max_steps_per_advance: u32,
}

impl WorldConfig {
    pub fn with_fixed_step(mut self, fixed_step: f32) -> Self {
        self.fixed_step = fixed_step;
        self
    }

    pub fn with_linear_drag(mut self, linear_drag: f32) -> Self {
        self.linear_drag = linear_drag;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_gravity(mut self, gravity: Vector2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_max_steps_per_advance(mut self, max_steps: u32) -> Self {
        self.max_steps_per_advance = max_steps;
        self
    }

    /// Per-step drag derived from the coefficient and the fixed step
    pub fn instant_drag(&self) -> f32 {
        self.linear_drag * self.fixed_step
    }

    /// Checks the configuration for values the simulation cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.fixed_step.is_finite() || self.fixed_step <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "fixed step must be finite and positive, got {}",
                self.fixed_step
            )));
        }

        if !self.linear_drag.is_finite() || self.linear_drag < 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "linear drag must be finite and non-negative, got {}",
                self.linear_drag
            )));
        }

        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "world size must be finite and positive, got {}",
                self.size
            )));
        }

        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }

        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "cell size must be finite and positive, got {}",
                self.cell_size
            )));
        }

        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fixed_step: 0.03,
            linear_drag: 10.0,
            size: 100.0,
            gravity: Vector2::zero(),
            cell_size: 8.0,
            max_steps_per_advance: 5,
        }
    }
}
