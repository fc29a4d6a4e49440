use circle_physics::collision::{BruteForceIndex, ContactSolver};
use circle_physics::core::{BodyEvent, BodyEventType, BodyStorage};
use circle_physics::error::PhysicsError;
use circle_physics::integration::{Integrator, StepContext};
use circle_physics::{
    BodyDesc, BodyHandle, PhysicsWorld, RigidBody, Storage, Vector2, WorldConfig,
};
use approx::assert_relative_eq;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Recorded = Rc<RefCell<Vec<(BodyHandle, BodyHandle, Vector2)>>>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn recording_listener(world: &mut PhysicsWorld) -> Recorded {
    let recorded: Recorded = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&recorded);
    world.register_listener(
        move |_: &mut BodyStorage<RigidBody>, a: BodyHandle, b: BodyHandle, contact: Vector2| {
            sink.borrow_mut().push((a, b, contact));
        },
    );
    recorded
}

fn world_without_drag() -> PhysicsWorld {
    PhysicsWorld::with_config(WorldConfig::default().with_linear_drag(0.0)).unwrap()
}

#[test]
fn test_world_defaults() {
    let world = PhysicsWorld::new();

    assert_eq!(world.get_fixed_step(), 0.03);
    assert_eq!(world.get_linear_drag(), 10.0);
    assert_eq!(world.get_world_size(), 100.0);
    assert_eq!(world.get_gravity(), Vector2::zero());
    assert_eq!(world.get_tick_id(), 0);
    assert_eq!(world.body_count(), 0);
    assert_relative_eq!(world.get_instant_drag(), 0.3, epsilon = 1e-5);
    assert_eq!(*world.get_contact_solver(), ContactSolver::default());
}

#[test]
fn test_invalid_config_is_rejected() {
    let zero_step = PhysicsWorld::with_config(WorldConfig::default().with_fixed_step(0.0));
    assert!(matches!(zero_step, Err(PhysicsError::InvalidParameter(_))));

    let negative_drag = PhysicsWorld::with_config(WorldConfig::default().with_linear_drag(-1.0));
    assert!(negative_drag.is_err());

    let mut world = PhysicsWorld::new();
    assert!(world.set_world_size(-5.0).is_err());
    assert_eq!(world.get_world_size(), 100.0);
    assert!(world.set_fixed_step(f32::NAN).is_err());
    assert_eq!(world.get_fixed_step(), 0.03);
}

#[test]
fn test_instant_drag_tracks_step_and_drag() {
    let mut world = PhysicsWorld::new();

    world.set_linear_drag(5.0).unwrap();
    assert_relative_eq!(world.get_instant_drag(), 0.15, epsilon = 1e-5);

    world.set_fixed_step(0.015).unwrap();
    assert_relative_eq!(world.get_instant_drag(), 0.075, epsilon = 1e-5);
}

#[test]
fn test_create_and_remove_bodies() {
    init_logging();
    let mut world = PhysicsWorld::new();

    let a = world.create_body(BodyDesc::default()).unwrap();
    let b = world.create_body(BodyDesc::default().with_position(Vector2::new(5.0, 0.0))).unwrap();
    assert_eq!(world.body_count(), 2);
    assert_eq!(world.bodies().handles(), vec![a, b]);
    assert_eq!(world.get_events().get_body_events_of_type(BodyEventType::Added).len(), 2);

    assert!(world.remove_body(a));
    assert!(!world.remove_body(a));
    assert!(world.get_body(a).is_err());
    assert_eq!(world.body_count(), 1);

    world.remove_all_bodies();
    assert_eq!(world.body_count(), 0);
    assert!(world.get_body(b).is_err());
    assert_eq!(world.get_events().get_body_events_of_type(BodyEventType::Removed).len(), 2);

    let rejected = world.create_body(BodyDesc::default().with_radius(-1.0));
    assert!(matches!(rejected, Err(PhysicsError::InvalidParameter(_))));
    assert_eq!(world.body_count(), 0);
}

#[test]
fn test_listener_registration() {
    let mut world = PhysicsWorld::new();
    let first = world.register_listener(
        |_: &mut BodyStorage<RigidBody>, _: BodyHandle, _: BodyHandle, _: Vector2| {},
    );
    let second = world.register_listener(
        |_: &mut BodyStorage<RigidBody>, _: BodyHandle, _: BodyHandle, _: Vector2| {},
    );
    assert_ne!(first, second);
    assert_eq!(world.listener_count(), 2);

    assert!(world.deregister_listener(first));
    assert!(!world.deregister_listener(first));
    assert_eq!(world.listener_count(), 1);
}

#[test]
fn test_static_body_never_moves() {
    let mut world = PhysicsWorld::with_config(
        WorldConfig::default().with_gravity(Vector2::new(0.0, -9.81)),
    )
    .unwrap();

    let start = Vector2::new(10.0, 20.0);
    let fixed = world.create_body(BodyDesc::fixed(start, 2.0)).unwrap();

    for _ in 0..50 {
        world.apply_force(fixed, Vector2::new(500.0, 500.0)).unwrap();
        world.step();
    }

    let body = world.get_body(fixed).unwrap();
    assert_eq!(body.get_position(), start);
    assert_eq!(body.get_velocity(), Vector2::zero());
}

#[test]
fn test_gravity_and_force_per_axis() {
    let mut world = world_without_drag();
    world.set_gravity(Vector2::new(0.0, -10.0));

    let handle = world.create_body(BodyDesc::default().with_mass(2.0)).unwrap();
    world.step();

    // Gravity force is mass * g; dividing by mass gives a velocity change of g per step.
    let body = world.get_body(handle).unwrap();
    assert_eq!(body.get_velocity().x, 0.0);
    assert_relative_eq!(body.get_velocity().y, -10.0, epsilon = 1e-5);
    assert_relative_eq!(body.get_position().y, -0.3, epsilon = 1e-5);
    assert_eq!(body.get_position().x, 0.0);
    assert_eq!(body.get_force(), Vector2::zero());
}

#[test]
fn test_max_speed_clamp() {
    let mut world = world_without_drag();
    let handle = world.create_body(BodyDesc::default().with_max_speed(5.0)).unwrap();

    world.apply_force(handle, Vector2::new(30.0, 40.0)).unwrap();
    world.step();

    let velocity = world.get_body(handle).unwrap().get_velocity();
    assert_relative_eq!(velocity.length(), 5.0, epsilon = 1e-5);
    assert_relative_eq!(velocity, Vector2::new(3.0, 4.0), epsilon = 1e-5);
}

#[test]
fn test_world_drag_and_body_drag() {
    let mut world = PhysicsWorld::new();

    let world_drag = world
        .create_body(BodyDesc::default().with_velocity(Vector2::new(2.0, 0.0)))
        .unwrap();
    let no_drag = world
        .create_body(
            BodyDesc::default()
                .with_position(Vector2::new(0.0, 10.0))
                .with_velocity(Vector2::new(2.0, 0.0))
                .with_linear_drag(0.0),
        )
        .unwrap();
    let own_drag = world
        .create_body(
            BodyDesc::default()
                .with_position(Vector2::new(0.0, -10.0))
                .with_velocity(Vector2::new(2.0, 0.0))
                .with_linear_drag(2.0),
        )
        .unwrap();

    world.step();

    assert_relative_eq!(world.get_body(world_drag).unwrap().get_velocity().x, 1.7, epsilon = 1e-5);
    assert_eq!(world.get_body(no_drag).unwrap().get_velocity().x, 2.0);
    assert_relative_eq!(world.get_body(own_drag).unwrap().get_velocity().x, 1.94, epsilon = 1e-5);

    // Position moves with the pre-drag velocity
    assert_relative_eq!(world.get_body(world_drag).unwrap().get_position().x, 0.06, epsilon = 1e-5);
}

#[test]
fn test_drag_stops_at_zero() {
    let mut world = PhysicsWorld::new();
    let handle = world
        .create_body(BodyDesc::default().with_velocity(Vector2::new(0.1, 0.0)))
        .unwrap();

    world.step();
    assert_eq!(world.get_body(handle).unwrap().get_velocity(), Vector2::zero());

    world.step();
    assert_relative_eq!(world.get_body(handle).unwrap().get_position().x, 0.003, epsilon = 1e-5);
}

#[test]
fn test_overlapping_bodies_are_pushed_apart() {
    init_logging();
    let mut world = PhysicsWorld::new();
    let a = world.create_body(BodyDesc::default()).unwrap();
    let b = world
        .create_body(BodyDesc::default().with_position(Vector2::new(1.0, 0.0)))
        .unwrap();

    world.step();

    let body_a = world.get_body(a).unwrap();
    let body_b = world.get_body(b).unwrap();
    assert!(body_a.collides());
    assert!(body_b.collides());

    // Both scan directions correct the pair once each.
    assert_relative_eq!(body_a.get_position().x, -0.1782, epsilon = 1e-5);
    assert_relative_eq!(body_b.get_position().x, 1.1782, epsilon = 1e-5);
    assert_eq!(body_a.get_velocity(), Vector2::zero());

    for _ in 0..100 {
        world.step();
    }

    let distance = world
        .get_body(a)
        .unwrap()
        .get_position()
        .distance(&world.get_body(b).unwrap().get_position());
    let penetration = 2.0 - distance;
    assert!(penetration > 0.0);
    assert!(penetration < 0.011, "penetration {} above slop", penetration);
}

#[test]
fn test_approaching_bodies_bounce() {
    let mut world = world_without_drag();
    let a = world
        .create_body(BodyDesc::default().with_velocity(Vector2::new(1.0, 0.0)))
        .unwrap();
    let b = world
        .create_body(
            BodyDesc::default()
                .with_position(Vector2::new(1.9, 0.0))
                .with_velocity(Vector2::new(-1.0, 0.0)),
        )
        .unwrap();

    world.step();

    let velocity_a = world.get_body(a).unwrap().get_velocity();
    let velocity_b = world.get_body(b).unwrap().get_velocity();
    assert!(velocity_a.x < 0.0);
    assert!(velocity_b.x > 0.0);

    // Equal masses: momentum is conserved.
    assert_relative_eq!(velocity_a.x + velocity_b.x, 0.0, epsilon = 1e-5);
}

#[test]
fn test_dynamic_body_against_static_body() {
    let mut world = world_without_drag();
    let wall = world.create_body(BodyDesc::fixed(Vector2::zero(), 1.0)).unwrap();
    let ball = world
        .create_body(
            BodyDesc::default()
                .with_position(Vector2::new(1.8, 0.0))
                .with_velocity(Vector2::new(-2.0, 0.0)),
        )
        .unwrap();

    world.step();

    let wall_body = world.get_body(wall).unwrap();
    assert_eq!(wall_body.get_position(), Vector2::zero());
    assert_eq!(wall_body.get_velocity(), Vector2::zero());
    assert!(wall_body.collides());
    assert!(world.get_body(ball).unwrap().get_velocity().x > 0.0);
}

#[test]
fn test_two_static_bodies_stay_finite() {
    let mut world = PhysicsWorld::new();
    let a = world.create_body(BodyDesc::fixed(Vector2::zero(), 1.0)).unwrap();
    let b = world.create_body(BodyDesc::fixed(Vector2::new(0.5, 0.0), 1.0)).unwrap();

    world.step();

    let body_a = world.get_body(a).unwrap();
    let body_b = world.get_body(b).unwrap();
    assert!(body_a.collides() && body_b.collides());
    assert_eq!(body_a.get_position(), Vector2::zero());
    assert_eq!(body_b.get_position(), Vector2::new(0.5, 0.0));
    assert!(body_a.get_velocity().is_finite());
}

#[test]
fn test_different_layers_do_not_interact() {
    let mut world = PhysicsWorld::new();
    let recorded = recording_listener(&mut world);

    let a = world.create_body(BodyDesc::default()).unwrap();
    let b = world
        .create_body(
            BodyDesc::default()
                .with_position(Vector2::new(0.5, 0.0))
                .with_collision_layer(1),
        )
        .unwrap();

    world.step();

    assert!(recorded.borrow().is_empty());
    assert!(!world.get_events().has_collision_events());
    assert!(!world.get_body(a).unwrap().collides());
    assert_eq!(world.get_body(a).unwrap().get_position(), Vector2::zero());
    assert_eq!(world.get_body(b).unwrap().get_position(), Vector2::new(0.5, 0.0));
}

#[test]
fn test_ignored_layer_is_integrated_but_never_collides() {
    let mut world = PhysicsWorld::new();
    let recorded = recording_listener(&mut world);

    let ghost = world
        .create_body(
            BodyDesc::default()
                .with_position(Vector2::new(150.0, 0.0))
                .with_collision_layer(-1),
        )
        .unwrap();
    let other_ghost = world
        .create_body(
            BodyDesc::default()
                .with_position(Vector2::new(150.0, 0.5))
                .with_collision_layer(-1),
        )
        .unwrap();

    world.step();

    assert!(recorded.borrow().is_empty());
    assert!(!world.get_body(ghost).unwrap().collides());
    // Still kept inside the world
    assert_eq!(world.get_body(ghost).unwrap().get_position().x, 99.0);
    assert_eq!(world.get_body(other_ghost).unwrap().get_position().x, 99.0);
}

#[test]
fn test_trigger_reports_without_response() {
    let mut world = PhysicsWorld::new();
    let recorded = recording_listener(&mut world);

    let trigger = world
        .create_body(BodyDesc::trigger(Vector2::new(100.5, 0.0), 1.0))
        .unwrap();
    let body = world
        .create_body(BodyDesc::default().with_position(Vector2::new(99.0, 0.0)))
        .unwrap();

    world.step();

    let calls = recorded.borrow();
    assert_eq!(calls.len(), 2);

    // Later registrations scan first.
    assert_eq!((calls[0].0, calls[0].1), (body, trigger));
    assert_relative_eq!(calls[0].2, Vector2::new(100.0, 0.0));
    assert_eq!((calls[1].0, calls[1].1), (trigger, body));
    assert_relative_eq!(calls[1].2, Vector2::new(99.5, 0.0));

    // No resolution, and the trigger is left outside the boundary.
    assert_eq!(world.get_body(trigger).unwrap().get_position(), Vector2::new(100.5, 0.0));
    assert_eq!(world.get_body(body).unwrap().get_position(), Vector2::new(99.0, 0.0));
    assert_eq!(world.get_body(body).unwrap().get_velocity(), Vector2::zero());
    assert!(world.get_body(trigger).unwrap().collides());
    assert!(world.get_body(body).unwrap().collides());

    let events = world.get_events();
    assert_eq!(events.get_trigger_events().len(), 2);
    assert_eq!(events.get_contact(body, trigger), Some(Vector2::new(100.0, 0.0)));
    assert_eq!(events.get_contact(trigger, body), Some(Vector2::new(99.5, 0.0)));
}

#[test]
fn test_boundary_clamp_reflects_velocity() {
    let mut world = world_without_drag();
    let handle = world
        .create_body(
            BodyDesc::default()
                .with_position(Vector2::new(100.5, -100.5))
                .with_velocity(Vector2::new(4.0, -6.0)),
        )
        .unwrap();

    world.step();

    let body = world.get_body(handle).unwrap();
    assert_eq!(body.get_position(), Vector2::new(99.0, -99.0));
    assert_eq!(body.get_velocity(), Vector2::new(-2.0, 3.0));
}

#[test]
fn test_boundary_clamp_of_resting_body() {
    let mut world = PhysicsWorld::new();
    let radius = 2.0;
    let handle = world
        .create_body(
            BodyDesc::default()
                .with_radius(radius)
                .with_position(Vector2::new(100.0 + radius / 2.0, 0.0)),
        )
        .unwrap();

    world.step();

    let body = world.get_body(handle).unwrap();
    assert_eq!(body.get_position().x, 100.0 - radius);
    assert!(body.get_velocity().x <= 0.0);
}

#[test]
fn test_single_force_with_drag_matches_closed_form() {
    let config = WorldConfig::default()
        .with_fixed_step(0.015)
        .with_linear_drag(5.0)
        .with_size(1000.0);
    let mut world = PhysicsWorld::with_config(config).unwrap();

    let handle = world
        .create_body(BodyDesc::default().with_mass(1.0).with_radius(1.0))
        .unwrap();
    world.apply_force(handle, Vector2::new(100.0, 0.0)).unwrap();

    for _ in 0..100 {
        world.step();
    }

    // v_k = 100 - 0.075k, x = sum of v_k * 0.015 for k in 0..100
    let expected: f32 = (0..100).map(|k| (100.0 - 0.075 * k as f32) * 0.015).sum();
    assert_relative_eq!(expected, 144.43125, epsilon = 1e-3);

    let body = world.get_body(handle).unwrap();
    assert!(body.get_position().x > 0.0);
    assert_relative_eq!(body.get_position().x, expected, epsilon = 1e-2);
    assert_eq!(body.get_position().y, 0.0);
    assert_relative_eq!(body.get_velocity().x, 92.5, epsilon = 1e-3);
}

#[test]
fn test_single_force_in_default_world_bounces_off_boundary() {
    let config = WorldConfig::default().with_fixed_step(0.015).with_linear_drag(5.0);
    let mut world = PhysicsWorld::with_config(config).unwrap();

    let handle = world.create_body(BodyDesc::default()).unwrap();
    world.apply_force(handle, Vector2::new(100.0, 0.0)).unwrap();

    for _ in 0..100 {
        world.step();
    }

    let body = world.get_body(handle).unwrap();
    assert!(body.get_position().x > 0.0);
    assert!(body.get_position().x < 99.0);
    assert!(body.get_velocity().x < 0.0);
}

#[test]
fn test_tick_id_wraps() {
    let mut world = PhysicsWorld::new();

    for _ in 0..255 {
        world.step();
    }
    assert_eq!(world.get_tick_id(), 255);

    world.step();
    assert_eq!(world.get_tick_id(), 0);
    assert_relative_eq!(world.get_time(), 256.0 * 0.03, epsilon = 1e-3);
}

#[test]
fn test_collision_events_follow_reverse_registration_order() {
    let mut world = PhysicsWorld::new();
    let a = world.create_body(BodyDesc::default()).unwrap();
    let b = world
        .create_body(BodyDesc::default().with_position(Vector2::new(1.5, 0.0)))
        .unwrap();

    world.step();

    let events: Vec<_> = world.get_events().collision_events().copied().collect();
    assert_eq!(events.len(), 2);
    assert_eq!((events[0].body_a, events[0].body_b), (b, a));
    assert_eq!((events[1].body_a, events[1].body_b), (a, b));
    assert!(events.iter().all(|event| event.resolved && event.tick == 0));
    assert_eq!(world.get_events().get_collision_events_for_body(a).len(), 2);
    assert_eq!(events[0].other(a), Some(b));
    assert!(world.get_events().get_trigger_events().is_empty());

    let drained: Vec<_> = world.get_events_mut().drain_collision_events().collect();
    assert_eq!(drained, events);
    assert_eq!(world.get_events().collision_count(), 0);

    // Events only cover the latest step
    world.remove_body(b);
    world.step();
    assert!(!world.get_events().has_collision_events());
}

#[test]
fn test_listener_can_remove_bodies_mid_step() {
    init_logging();
    let mut world = PhysicsWorld::new();

    let keeper = world.create_body(BodyDesc::default()).unwrap();
    let doomed: Vec<BodyHandle> = (0..3)
        .map(|i| {
            world
                .create_body(BodyDesc::default().with_position(Vector2::new(0.5 + i as f32 * 0.2, 0.0)))
                .unwrap()
        })
        .collect();

    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    world.register_listener(
        move |bodies: &mut BodyStorage<RigidBody>, a: BodyHandle, b: BodyHandle, _: Vector2| {
            *counter.borrow_mut() += 1;
            for handle in [a, b] {
                if handle != keeper {
                    bodies.remove(handle);
                }
            }
        },
    );

    world.step();

    assert!(*calls.borrow() > 0);
    assert_eq!(world.body_count(), 1);
    assert!(world.get_body(keeper).is_ok());
    for &handle in &doomed {
        assert!(world.get_body(handle).is_err());
    }

    let mut removed: Vec<BodyHandle> = world
        .get_events()
        .get_body_events_of_type(BodyEventType::Removed)
        .iter()
        .map(|event| event.body)
        .collect();
    removed.sort();
    let mut expected = doomed.clone();
    expected.sort();
    assert_eq!(removed, expected);
}

#[test]
fn test_listener_can_clear_the_world() {
    let mut world = PhysicsWorld::new();
    for i in 0..5 {
        world
            .create_body(BodyDesc::default().with_position(Vector2::new(i as f32 * 0.5, 0.0)))
            .unwrap();
    }

    world.register_listener(
        |bodies: &mut BodyStorage<RigidBody>, _: BodyHandle, _: BodyHandle, _: Vector2| {
            bodies.clear();
        },
    );

    world.step();
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.get_events().get_body_events_of_type(BodyEventType::Removed).len(), 5);
}

#[test]
fn test_body_events_survive_steps_until_drained() {
    let mut world = PhysicsWorld::new();
    let a = world.create_body(BodyDesc::default()).unwrap();
    let b = world
        .create_body(BodyDesc::default().with_position(Vector2::new(10.0, 0.0)))
        .unwrap();

    world.step();
    world.remove_body(a);
    world.step();

    let events = world.get_events_mut();
    assert!(!events.has_collision_events());
    assert_eq!(
        events.next_body_event(),
        Some(BodyEvent { event_type: BodyEventType::Added, body: a })
    );
    assert_eq!(
        events.next_body_event(),
        Some(BodyEvent { event_type: BodyEventType::Added, body: b })
    );
    assert_eq!(
        events.next_body_event(),
        Some(BodyEvent { event_type: BodyEventType::Removed, body: a })
    );
    assert_eq!(events.next_body_event(), None);
    assert!(events.is_empty());
}

#[test]
fn test_huge_radius_does_not_break_the_step() {
    let mut world = PhysicsWorld::new();
    let huge = world.create_body(BodyDesc::default().with_radius(1.0e11)).unwrap();
    let small = world.create_body(BodyDesc::default()).unwrap();

    world.step();

    assert_eq!(world.body_count(), 2);
    assert!(world.get_body(huge).unwrap().collides());
    assert!(world.get_body(small).unwrap().collides());
    assert!(world.get_body(huge).unwrap().get_position().is_finite());
    assert_eq!(world.get_body(small).unwrap().get_position(), Vector2::zero());
}

#[test]
fn test_custom_contact_solver() {
    let solver = ContactSolver::new(0.0, 0.01, 0.2);
    let mut world = world_without_drag().with_contact_solver(solver);
    assert_eq!(*world.get_contact_solver(), solver);

    let a = world
        .create_body(BodyDesc::default().with_velocity(Vector2::new(1.0, 0.0)))
        .unwrap();
    let b = world
        .create_body(
            BodyDesc::default()
                .with_position(Vector2::new(1.9, 0.0))
                .with_velocity(Vector2::new(-1.0, 0.0)),
        )
        .unwrap();

    world.step();

    // Perfectly inelastic: the head-on pair stops dead
    assert_relative_eq!(world.get_body(a).unwrap().get_velocity(), Vector2::zero(), epsilon = 1e-6);
    assert_relative_eq!(world.get_body(b).unwrap().get_velocity(), Vector2::zero(), epsilon = 1e-6);
}

struct FrozenIntegrator {
    calls: Rc<Cell<usize>>,
}

impl Integrator for FrozenIntegrator {
    fn integrate(&mut self, body: &mut RigidBody, _ctx: &StepContext) {
        self.calls.set(self.calls.get() + 1);
        body.clear_force();
    }

    fn name(&self) -> &str {
        "Frozen"
    }
}

#[test]
fn test_custom_integrator() {
    let calls = Rc::new(Cell::new(0));
    let mut world = PhysicsWorld::new().with_integrator(Box::new(FrozenIntegrator {
        calls: Rc::clone(&calls),
    }));

    let moving = world
        .create_body(BodyDesc::default().with_velocity(Vector2::new(5.0, 0.0)))
        .unwrap();
    world.create_body(BodyDesc::fixed(Vector2::new(20.0, 0.0), 1.0)).unwrap();

    for _ in 0..3 {
        world.step();
    }

    assert_eq!(calls.get(), 6);
    let body = world.get_body(moving).unwrap();
    assert_eq!(body.get_position(), Vector2::zero());
    assert_eq!(body.get_velocity(), Vector2::new(5.0, 0.0));
}

#[test]
fn test_listeners_are_called_in_registration_order() {
    let mut world = PhysicsWorld::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    for id in 0..3 {
        let order = Rc::clone(&order);
        world.register_listener(
            move |_: &mut BodyStorage<RigidBody>, _: BodyHandle, _: BodyHandle, _: Vector2| {
                order.borrow_mut().push(id);
            },
        );
    }

    world.create_body(BodyDesc::default()).unwrap();
    world
        .create_body(BodyDesc::default().with_position(Vector2::new(1.0, 0.0)))
        .unwrap();
    world.step();

    assert_eq!(*order.borrow(), vec![0, 1, 2, 0, 1, 2]);
}

#[test]
fn test_collides_flag_is_recomputed_each_step() {
    let mut world = PhysicsWorld::new();
    let a = world.create_body(BodyDesc::default()).unwrap();
    let b = world
        .create_body(BodyDesc::default().with_position(Vector2::new(1.0, 0.0)))
        .unwrap();

    world.step();
    assert!(world.get_body(a).unwrap().collides());

    world.get_body_mut(b).unwrap().set_position(Vector2::new(50.0, 0.0));
    world.step();
    assert!(!world.get_body(a).unwrap().collides());
    assert!(!world.get_body(b).unwrap().collides());
}

#[test]
fn test_brute_force_index_gives_identical_results() {
    fn populate(world: &mut PhysicsWorld) {
        for i in 0..40 {
            let angle = i as f32 * 0.7;
            world
                .create_body(
                    BodyDesc::default()
                        .with_position(Vector2::new(angle.cos() * 3.0, angle.sin() * 3.0))
                        .with_velocity(Vector2::new(-angle.cos(), -angle.sin()) * 20.0),
                )
                .unwrap();
        }
    }

    let mut hashed = PhysicsWorld::new();
    let mut brute = PhysicsWorld::new().with_spatial_index(Box::new(BruteForceIndex::new()));
    populate(&mut hashed);
    populate(&mut brute);

    for _ in 0..60 {
        hashed.step();
        brute.step();
    }

    for ((_, x), (_, y)) in hashed.bodies().iter().zip(brute.bodies().iter()) {
        assert_relative_eq!(x.get_position(), y.get_position(), epsilon = 1e-4);
        assert_relative_eq!(x.get_velocity(), y.get_velocity(), epsilon = 1e-4);
    }
}

#[test]
fn test_advance_runs_fixed_steps() {
    let mut world = PhysicsWorld::new();

    assert_eq!(world.advance(0.02), 0);
    assert_eq!(world.advance(0.02), 1);
    assert_eq!(world.get_tick_id(), 1);
    assert_relative_eq!(world.interpolation_alpha(), 1.0 / 3.0, epsilon = 1e-4);

    // Capped at the configured number of catch-up steps
    assert_eq!(world.advance(10.0), 5);
    assert!(world.interpolation_alpha() < 1.0);
}
