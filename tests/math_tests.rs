use circle_physics::math::{approx_zero, Aabb, Vector2};
use approx::{assert_abs_diff_eq, assert_relative_eq};

#[test]
fn test_vector2_operations() {
    let v1 = Vector2::new(1.0, 2.0);
    let v2 = Vector2::new(4.0, 6.0);

    let sum = v1 + v2;
    assert_eq!(sum, Vector2::new(5.0, 8.0));

    let diff = v2 - v1;
    assert_eq!(diff, Vector2::new(3.0, 4.0));

    assert_eq!(diff.length_squared(), 25.0);
    assert_eq!(diff.length(), 5.0);
    assert_eq!(v1.dot(&v2), 16.0);
    assert_eq!(v1.distance(&v2), 5.0);
    assert_eq!(v1.distance_squared(&v2), 25.0);
    assert_eq!(v1.scale(3.0), Vector2::new(3.0, 6.0));
    assert_eq!(-v1, Vector2::new(-1.0, -2.0));
}

#[test]
fn test_in_place_operations_chain() {
    let mut v = Vector2::new(3.0, 4.0);
    v.add_mut(Vector2::new(1.0, 1.0)).sub_mut(Vector2::new(1.0, 1.0)).scale_mut(2.0);
    assert_eq!(v, Vector2::new(6.0, 8.0));

    let original = v.copy();
    v.normalize_mut();
    assert_eq!(original, Vector2::new(6.0, 8.0));
    assert_relative_eq!(v, Vector2::new(0.6, 0.8));
}

#[test]
fn test_normalize() {
    let normalized = Vector2::new(-7.5, 2.25).normalize();
    assert_relative_eq!(normalized.length(), 1.0, epsilon = 1e-6);

    let zero = Vector2::zero().normalize();
    assert_eq!(zero, Vector2::zero());

    let mut zero = Vector2::zero();
    zero.normalize_mut();
    assert!(zero.x == 0.0 && zero.y == 0.0);
}

#[test]
fn test_scale_toward_zero() {
    let mut v = Vector2::new(3.0, 4.0);
    v.scale_toward_zero(1.0);
    assert_relative_eq!(v, Vector2::new(2.4, 3.2), epsilon = 1e-6);

    // Never overshoots past zero
    let mut v = Vector2::new(0.3, 0.4);
    v.scale_toward_zero(10.0);
    assert_eq!(v, Vector2::zero());

    // A zero amount leaves the vector bit-for-bit unchanged
    let mut v = Vector2::new(0.1, 0.7);
    v.scale_toward_zero(0.0);
    assert_eq!(v, Vector2::new(0.1, 0.7));

    // So does a zero vector, without producing NaN
    let mut v = Vector2::zero();
    v.scale_toward_zero(2.0);
    assert_eq!(v, Vector2::zero());
    assert!(v.is_finite());
}

#[test]
fn test_nalgebra_round_trip() {
    let v = Vector2::new(1.5, -2.0);
    let na_v = v.to_nalgebra();
    assert_eq!(na_v.x, 1.5);
    assert_eq!(Vector2::from_nalgebra(&na_v), v);
    assert_abs_diff_eq!(Vector2::from(na_v * 2.0), Vector2::new(3.0, -4.0));
}

#[test]
fn test_approx_helpers() {
    assert!(approx_zero(1.0e-7));
    assert!(!approx_zero(1.0e-5));
    assert!(Vector2::new(1.0e-4, 0.0).is_zero());
}

#[test]
fn test_aabb_operations() {
    let a = Aabb::from_circle(Vector2::new(0.0, 0.0), 1.0);
    assert_eq!(a.min, Vector2::new(-1.0, -1.0));
    assert_eq!(a.max, Vector2::new(1.0, 1.0));
    assert_eq!(a.width(), 2.0);
    assert_eq!(a.height(), 2.0);
    assert_eq!(a.center(), Vector2::zero());

    let touching = Aabb::from_rect(1.0, -1.0, 2.0, 2.0);
    assert!(a.intersects(&touching));
    assert!(touching.intersects(&a));

    let apart = Aabb::from_rect(1.01, -1.0, 2.0, 2.0);
    assert!(!a.intersects(&apart));

    assert!(a.contains_point(Vector2::new(0.5, -0.5)));
    assert!(!a.contains_point(Vector2::new(1.5, 0.0)));

    let merged = a.merge(&apart);
    assert_eq!(merged.min, Vector2::new(-1.0, -1.0));
    assert_relative_eq!(merged.max, Vector2::new(3.01, 1.0));
}
