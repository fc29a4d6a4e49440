use std::any::Any;
use std::fmt;

use crate::bodies::{BodyDesc, BodyFlags, USE_WORLD_DRAG};
use crate::collision::CollisionLayer;
use crate::core::BodyHandle;
use crate::math::{Aabb, Vector2, EPSILON};
use crate::Result;

/// Type alias for a handle to a rigid body
pub type RigidBodyHandle = BodyHandle;

/// A circular point-mass body
pub struct RigidBody {
    /// The body's position in world space
    position: Vector2,

    /// The body's linear velocity
    velocity: Vector2,

    /// Force accumulated since the last integration
    force: Vector2,

    /// The body's mass
    mass: f32,

    /// Inverse of the body's mass, zero for static bodies
    inv_mass: f32,

    /// Radius of the circle
    radius: f32,

    /// Speed limit, zero for unlimited
    max_speed: f32,

    /// Cached square of `max_speed`
    max_speed_squared: f32,

    /// Per-body drag, negative to use the world's drag
    linear_drag: f32,

    /// Layer the body collides on
    collision_layer: CollisionLayer,

    /// The body's flags
    flags: BodyFlags,

    /// Contact point of the latest overlap test run from this body
    contact_point: Vector2,

    /// Opaque user payload
    custom_data: Option<Box<dyn Any>>,
}

impl RigidBody {
    /// Creates a body from a validated description
    pub fn new(desc: BodyDesc) -> Result<Self> {
        desc.validate()?;

        let mut flags = BodyFlags::empty();
        flags.set(BodyFlags::TRIGGER, desc.is_trigger);

        let mut body = Self {
            position: desc.position,
            velocity: desc.velocity,
            force: Vector2::zero(),
            mass: 0.0,
            inv_mass: 0.0,
            radius: desc.radius,
            max_speed: 0.0,
            max_speed_squared: 0.0,
            linear_drag: desc.linear_drag,
            collision_layer: desc.collision_layer,
            flags,
            contact_point: Vector2::zero(),
            custom_data: desc.custom_data,
        };

        body.set_mass(desc.mass);
        body.set_max_speed(desc.max_speed);

        Ok(body)
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector2 {
        self.position
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Returns a mutable reference to the body's position
    pub fn position_mut(&mut self) -> &mut Vector2 {
        &mut self.position
    }

    /// Returns the body's linear velocity
    pub fn get_velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Sets the body's linear velocity
    pub fn set_velocity(&mut self, velocity: Vector2) {
        self.velocity = velocity;
    }

    /// Returns a mutable reference to the body's linear velocity
    pub fn velocity_mut(&mut self) -> &mut Vector2 {
        &mut self.velocity
    }

    /// Returns the force accumulated since the last step
    pub fn get_force(&self) -> Vector2 {
        self.force
    }

    /// Adds a force to the accumulator; it is consumed by the next step
    pub fn apply_force(&mut self, force: Vector2) {
        self.force += force;
    }

    /// Discards any accumulated force
    pub fn clear_force(&mut self) {
        self.force = Vector2::zero();
    }

    /// Returns the body's mass
    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    /// Sets the body's mass (and inverse mass).
    ///
    /// A mass of zero or less leaves the body static with `inv_mass == 0`.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inv_mass = if mass > EPSILON { 1.0 / mass } else { 0.0 };
    }

    /// Returns the body's inverse mass
    pub fn get_inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Returns whether the body is immovable
    pub fn is_static(&self) -> bool {
        self.mass < EPSILON
    }

    pub fn get_radius(&self) -> f32 {
        self.radius
    }

    /// Sets the radius. Not validated: a non-positive radius makes overlap tests meaningless.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    /// Returns the speed limit, zero meaning unlimited
    pub fn get_max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn get_max_speed_squared(&self) -> f32 {
        self.max_speed_squared
    }

    /// Sets the speed limit, zero for unlimited
    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed;
        self.max_speed_squared = max_speed * max_speed;
    }

    /// Returns the per-body drag, negative when the world's drag applies
    pub fn get_linear_drag(&self) -> f32 {
        self.linear_drag
    }

    pub fn set_linear_drag(&mut self, drag: f32) {
        self.linear_drag = drag;
    }

    /// Makes the body follow the world's drag again
    pub fn use_world_drag(&mut self) {
        self.linear_drag = USE_WORLD_DRAG;
    }

    pub fn get_collision_layer(&self) -> CollisionLayer {
        self.collision_layer
    }

    pub fn set_collision_layer(&mut self, layer: impl Into<CollisionLayer>) {
        self.collision_layer = layer.into();
    }

    /// Returns whether the body is a trigger
    pub fn is_trigger(&self) -> bool {
        self.flags.contains(BodyFlags::TRIGGER)
    }

    /// Sets whether the body is a trigger
    pub fn set_trigger(&mut self, is_trigger: bool) {
        self.flags.set(BodyFlags::TRIGGER, is_trigger);
    }

    /// Returns whether the body overlapped anything during the last step
    pub fn collides(&self) -> bool {
        self.flags.contains(BodyFlags::COLLIDING)
    }

    pub fn set_collides(&mut self, collides: bool) {
        self.flags.set(BodyFlags::COLLIDING, collides);
    }

    pub fn get_flags(&self) -> BodyFlags {
        self.flags
    }

    /// Returns the contact point computed by the latest `check_collision` call
    pub fn get_contact_point(&self) -> Vector2 {
        self.contact_point
    }

    /// Returns the custom data if it is of type `T`
    pub fn custom_data<T: Any>(&self) -> Option<&T> {
        self.custom_data.as_ref().and_then(|data| data.downcast_ref::<T>())
    }

    /// Returns the custom data mutably if it is of type `T`
    pub fn custom_data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom_data.as_mut().and_then(|data| data.downcast_mut::<T>())
    }

    pub fn set_custom_data<T: Any>(&mut self, data: T) {
        self.custom_data = Some(Box::new(data));
    }

    /// Removes and returns the custom data
    pub fn take_custom_data(&mut self) -> Option<Box<dyn Any>> {
        self.custom_data.take()
    }

    /// Returns the bounding square of the circle
    pub fn get_rect(&self) -> Aabb {
        Aabb::from_circle(self.position, self.radius)
    }

    /// Tests this body against `other` and records the contact point on `self`.
    ///
    /// Bodies on different layers never collide. Otherwise the bounding
    /// squares are compared first, then the exact circle distance. On overlap
    /// the contact point is the point of this body's circumference facing
    /// `other`; on rejection it is reset to zero.
    pub fn check_collision(&mut self, other: &RigidBody) -> bool {
        if !self.collision_layer.interacts_with(other.collision_layer) {
            return false;
        }

        if !self.get_rect().intersects(&other.get_rect()) {
            self.contact_point = Vector2::zero();
            return false;
        }

        let sum_of_radii = self.radius + other.radius;
        let mut delta = self.position - other.position;

        if delta.length_squared() < sum_of_radii * sum_of_radii {
            delta.normalize_mut();
            self.contact_point = self.position - delta * self.radius;
            return true;
        }

        self.contact_point = Vector2::zero();
        false
    }
}

impl fmt::Debug for RigidBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigidBody")
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("force", &self.force)
            .field("mass", &self.mass)
            .field("radius", &self.radius)
            .field("max_speed", &self.max_speed)
            .field("linear_drag", &self.linear_drag)
            .field("collision_layer", &self.collision_layer)
            .field("flags", &self.flags)
            .field("contact_point", &self.contact_point)
            .finish_non_exhaustive()
    }
}
