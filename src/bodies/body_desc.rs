use std::any::Any;
use std::fmt;

use crate::bodies::USE_WORLD_DRAG;
use crate::collision::CollisionLayer;
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Construction options for a body.
///
/// Every field has a default, so the usual pattern is
/// `BodyDesc::default().with_position(..).with_radius(..)`.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyDesc {
    /// Mass of the body; zero makes the body static
    pub mass: f32,

    /// Radius of the circle
    pub radius: f32,

    /// Initial position
    pub position: Vector2,

    /// Initial velocity
    pub velocity: Vector2,

    /// Speed limit, zero for unlimited
    pub max_speed: f32,

    /// Per-body drag, or `USE_WORLD_DRAG`
    pub linear_drag: f32,

    /// Collision layer
    pub collision_layer: CollisionLayer,

    /// Whether the body only reports overlaps
    pub is_trigger: bool,

    /// Opaque payload carried along with the body
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub custom_data: Option<Box<dyn Any>>,
}

impl BodyDesc {
    /// Creates a description with default values (unit mass, unit radius, at the origin)
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a description for an immovable body
    pub fn fixed(position: Vector2, radius: f32) -> Self {
        Self::default().with_mass(0.0).with_position(position).with_radius(radius)
    }

    /// Creates a description for a trigger volume
    pub fn trigger(position: Vector2, radius: f32) -> Self {
        Self::default().with_trigger(true).with_position(position).with_radius(radius)
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_position(mut self, position: Vector2) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_linear_drag(mut self, linear_drag: f32) -> Self {
        self.linear_drag = linear_drag;
        self
    }

    pub fn with_collision_layer(mut self, layer: impl Into<CollisionLayer>) -> Self {
        self.collision_layer = layer.into();
        self
    }

    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    pub fn with_custom_data<T: Any>(mut self, data: T) -> Self {
        self.custom_data = Some(Box::new(data));
        self
    }

    /// Checks that the description produces a well-behaved body.
    ///
    /// Mass must be finite and non-negative (zero is a static body), the
    /// radius finite and strictly positive, and the kinematic state finite.
    /// Drag may be any finite value: negatives fall back to the world's drag.
    pub fn validate(&self) -> Result<()> {
        if !self.mass.is_finite() || self.mass < 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "body mass must be finite and non-negative, got {}",
                self.mass
            )));
        }

        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "body radius must be finite and positive, got {}",
                self.radius
            )));
        }

        if !self.position.is_finite() || !self.velocity.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "body position {} and velocity {} must be finite",
                self.position, self.velocity
            )));
        }

        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "max speed must be finite and non-negative, got {}",
                self.max_speed
            )));
        }

        if !self.linear_drag.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "linear drag must be finite, got {}",
                self.linear_drag
            )));
        }

        Ok(())
    }
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius: 1.0,
            position: Vector2::zero(),
            velocity: Vector2::zero(),
            max_speed: 0.0,
            linear_drag: USE_WORLD_DRAG,
            collision_layer: CollisionLayer::DEFAULT,
            is_trigger: false,
            custom_data: None,
        }
    }
}

impl fmt::Debug for BodyDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyDesc")
            .field("mass", &self.mass)
            .field("radius", &self.radius)
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("max_speed", &self.max_speed)
            .field("linear_drag", &self.linear_drag)
            .field("collision_layer", &self.collision_layer)
            .field("is_trigger", &self.is_trigger)
            .field("custom_data", &self.custom_data.is_some())
            .finish()
    }
}
