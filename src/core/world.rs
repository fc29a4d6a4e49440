use crate::bodies::{BodyDesc, RigidBody};
use crate::collision::{ContactSolver, SpatialHashGrid, SpatialIndex};
use crate::core::events::CollisionEvent;
use crate::core::listener::ListenerRegistry;
use crate::core::{
    BodyHandle, BodyStorage, CollisionListener, EventQueue, FixedStepper, ListenerHandle,
    Storage, WorldConfig,
};
use crate::integration::{DampedEulerIntegrator, Integrator, StepContext};
use crate::math::Vector2;
use crate::Result;

/// Velocity factor kept after bouncing off the world boundary
const BOUNDARY_RESTITUTION: f32 = 0.5;

/// The physics world: owns every body and advances them in fixed steps
pub struct PhysicsWorld {
    /// All bodies, in registration order
    bodies: BodyStorage<RigidBody>,

    /// Configuration for the simulation
    config: WorldConfig,

    /// `config.linear_drag * config.fixed_step`, kept in sync by the setters
    instant_drag: f32,

    /// Broad phase, rebuilt every step
    spatial_index: Box<dyn SpatialIndex<BodyHandle>>,

    /// Integration pass
    integrator: Box<dyn Integrator>,

    /// Contact response for non-trigger pairs
    solver: ContactSolver,

    /// Collision listeners, notified in registration order
    listeners: ListenerRegistry,

    /// Collision events of the last step and undrained body events
    events: EventQueue,

    /// Step counter, wraps from 255 to 0
    tick_id: u8,

    /// The total elapsed simulation time
    time: f32,

    /// Wall-clock to fixed-step conversion for `advance`
    stepper: FixedStepper,
}

impl PhysicsWorld {
    /// Creates a new physics world with default settings
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// Creates a new physics world with the given configuration
    pub fn with_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        log::debug!(
            "creating physics world: size {}, fixed step {}s, drag {}, gravity {}",
            config.size,
            config.fixed_step,
            config.linear_drag,
            config.gravity
        );

        let mut bodies = BodyStorage::new();
        bodies.record_changes();

        Self {
            bodies,
            instant_drag: config.instant_drag(),
            spatial_index: Box::new(SpatialHashGrid::new(config.cell_size)),
            integrator: Box::new(DampedEulerIntegrator::new()),
            solver: ContactSolver::default(),
            listeners: ListenerRegistry::default(),
            events: EventQueue::new(),
            tick_id: 0,
            time: 0.0,
            stepper: FixedStepper::new(config.fixed_step, config.max_steps_per_advance),
            config,
        }
    }

    /// Replaces the broad phase
    pub fn with_spatial_index(mut self, index: Box<dyn SpatialIndex<BodyHandle>>) -> Self {
        self.spatial_index = index;
        self
    }

    /// Replaces the integration pass
    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        log::debug!("using integrator {}", integrator.name());
        self.integrator = integrator;
        self
    }

    /// Replaces the contact solver parameters
    pub fn with_contact_solver(mut self, solver: ContactSolver) -> Self {
        self.solver = solver;
        self
    }

    pub fn get_contact_solver(&self) -> &ContactSolver {
        &self.solver
    }

    /// Returns a reference to the world configuration
    pub fn get_config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Returns the step counter (0..=255, wrapping)
    pub fn get_tick_id(&self) -> u8 {
        self.tick_id
    }

    /// Gets the current gravity
    pub fn get_gravity(&self) -> Vector2 {
        self.config.gravity
    }

    /// Sets the gravity for the simulation
    pub fn set_gravity(&mut self, gravity: Vector2) {
        log::debug!("gravity set to {}", gravity);
        self.config.gravity = gravity;
    }

    /// Returns the half-extent of the world
    pub fn get_world_size(&self) -> f32 {
        self.config.size
    }

    pub fn set_world_size(&mut self, size: f32) -> Result<()> {
        self.config.with_size(size).validate()?;
        self.config.size = size;
        Ok(())
    }

    pub fn get_fixed_step(&self) -> f32 {
        self.config.fixed_step
    }

    /// Sets the step length and recomputes the instant drag
    pub fn set_fixed_step(&mut self, fixed_step: f32) -> Result<()> {
        self.config.with_fixed_step(fixed_step).validate()?;
        self.config.fixed_step = fixed_step;
        self.stepper.set_fixed_step(fixed_step);
        self.update_instant_drag();
        Ok(())
    }

    pub fn get_linear_drag(&self) -> f32 {
        self.config.linear_drag
    }

    /// Sets the world drag coefficient and recomputes the instant drag
    pub fn set_linear_drag(&mut self, drag: f32) -> Result<()> {
        self.config.with_linear_drag(drag).validate()?;
        self.config.linear_drag = drag;
        self.update_instant_drag();
        Ok(())
    }

    /// Returns the drag applied per step to bodies without their own drag
    pub fn get_instant_drag(&self) -> f32 {
        self.instant_drag
    }

    fn update_instant_drag(&mut self) {
        self.instant_drag = self.config.instant_drag();
        log::debug!("instant drag is now {}", self.instant_drag);
    }

    /// Registers a collision listener; it is called after already registered ones
    pub fn register_listener<L>(&mut self, listener: L) -> ListenerHandle
    where
        L: CollisionListener + 'static,
    {
        let handle = self.listeners.register(Box::new(listener));
        log::debug!("registered collision listener {:?}", handle);
        handle
    }

    /// Removes a listener, returning false if it was not registered
    pub fn deregister_listener(&mut self, handle: ListenerHandle) -> bool {
        let removed = self.listeners.deregister(handle);
        log::debug!("deregister collision listener {:?}: {}", handle, removed);
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Validates `desc`, creates the body and appends it to the world
    pub fn create_body(&mut self, desc: BodyDesc) -> Result<BodyHandle> {
        let body = RigidBody::new(desc).map_err(|err| {
            log::warn!("rejected body description: {}", err);
            err
        })?;
        Ok(self.add_body(body))
    }

    /// Adds an already constructed body and returns its handle
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = self.bodies.add(body);
        log::debug!("added body {:?}", handle);
        self.sync_body_events();
        handle
    }

    /// Removes a body, returning false if the handle is not live
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        if self.bodies.remove(handle).is_none() {
            return false;
        }

        log::debug!("removed body {:?}", handle);
        self.sync_body_events();
        true
    }

    /// Removes every body; all outstanding handles become stale
    pub fn remove_all_bodies(&mut self) {
        log::debug!("removing all {} bodies", self.bodies.len());
        self.bodies.clear();
        self.sync_body_events();
    }

    /// Gets a reference to a rigid body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a rigid body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies.get_body_mut(handle)
    }

    /// Adds a force to a body's accumulator
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vector2) -> Result<()> {
        self.bodies.get_body_mut(handle)?.apply_force(force);
        Ok(())
    }

    /// Returns the body set, iterable in registration order
    pub fn bodies(&self) -> &BodyStorage<RigidBody> {
        &self.bodies
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the event queue.
    ///
    /// Collision events cover only the last step; each step discards the
    /// previous step's. Body `Added`/`Removed` events, including removals
    /// made by listeners mid-step, stay queued until drained with
    /// `EventQueue::next_body_event` or cleared.
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Feeds wall-clock time to the fixed-step accumulator and runs the due steps.
    ///
    /// Returns the number of steps run. Only the last step's collision
    /// events remain in the event queue afterwards.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let steps = self.stepper.accumulate(elapsed);
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    /// Fraction of a step waiting in the accumulator
    pub fn interpolation_alpha(&self) -> f32 {
        self.stepper.alpha()
    }

    /// Runs exactly one fixed step
    pub fn step(&mut self) {
        self.events.clear_collision_events();

        self.integrate_bodies();
        self.build_spatial_index();
        let (tested, contacts) = self.detect_collisions();
        self.clamp_to_world();

        self.tick_id = self.tick_id.wrapping_add(1);
        self.time += self.config.fixed_step;

        log::trace!(
            "tick {}: {} bodies, {} candidate pairs, {} contacts",
            self.tick_id,
            self.bodies.len(),
            tested,
            contacts
        );
    }

    fn integrate_bodies(&mut self) {
        let ctx = StepContext {
            gravity: self.config.gravity,
            fixed_step: self.config.fixed_step,
            instant_drag: self.instant_drag,
        };

        for (_, body) in self.bodies.iter_mut() {
            body.set_collides(false);
            self.integrator.integrate(body, &ctx);
        }
    }

    fn build_spatial_index(&mut self) {
        self.spatial_index.clear();
        for (handle, body) in self.bodies.iter() {
            if !body.get_collision_layer().is_ignored() {
                self.spatial_index.insert(handle, &body.get_rect());
            }
        }
    }

    /// Narrow phase, resolution and notification.
    ///
    /// Bodies are scanned in reverse registration order. Listeners may remove
    /// bodies, so every handle is re-resolved before use and stale ones are
    /// skipped. Returns the number of candidate pairs tested and overlaps found.
    fn detect_collisions(&mut self) -> (usize, usize) {
        let mut tested = 0;
        let mut contacts = 0;

        let handles = self.bodies.handles();
        for &handle in handles.iter().rev() {
            let rect = match self.bodies.get(handle) {
                Some(body) if !body.get_collision_layer().is_ignored() => body.get_rect(),
                _ => continue,
            };

            for other in self.spatial_index.retrieve(&rect) {
                if other == handle {
                    continue;
                }

                if !self.bodies.contains(handle) {
                    break;
                }

                let (body, other_body) = match self.bodies.get_pair_mut(handle, other) {
                    Some(pair) => pair,
                    None => continue,
                };

                tested += 1;
                if !body.check_collision(other_body) {
                    continue;
                }
                contacts += 1;

                body.set_collides(true);
                other_body.set_collides(true);

                let contact_point = body.get_contact_point();
                let resolved = !body.is_trigger() && !other_body.is_trigger();
                if resolved {
                    self.solver.resolve(body, other_body);
                }

                self.events.add_collision_event(CollisionEvent {
                    body_a: handle,
                    body_b: other,
                    contact_point,
                    resolved,
                    tick: self.tick_id,
                });

                self.listeners.notify(&mut self.bodies, handle, other, contact_point);
                self.sync_body_events();
            }
        }

        (tested, contacts)
    }

    /// Moves adds and removes logged by the body set into the event queue
    fn sync_body_events(&mut self) {
        for event in self.bodies.take_changes() {
            self.events.add_body_event(event);
        }
    }

    fn clamp_to_world(&mut self) {
        let size = self.config.size;
        for (_, body) in self.bodies.iter_mut() {
            if !body.is_trigger() {
                clamp_body_to_world(body, size);
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Snaps a body back inside `[-size, size]` and reflects the offending velocity axis
fn clamp_body_to_world(body: &mut RigidBody, size: f32) {
    let radius = body.get_radius();
    let mut position = body.get_position();
    let mut velocity = body.get_velocity();

    if position.x - radius < -size {
        position.x = -size + radius;
        velocity.x = velocity.x.abs() * BOUNDARY_RESTITUTION;
    }

    if position.x + radius > size {
        position.x = size - radius;
        velocity.x = -velocity.x.abs() * BOUNDARY_RESTITUTION;
    }

    if position.y - radius < -size {
        position.y = -size + radius;
        velocity.y = velocity.y.abs() * BOUNDARY_RESTITUTION;
    }

    if position.y + radius > size {
        position.y = size - radius;
        velocity.y = -velocity.y.abs() * BOUNDARY_RESTITUTION;
    }

    body.set_position(position);
    body.set_velocity(velocity);
}
