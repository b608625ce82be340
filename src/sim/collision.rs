//! Circle/segment geometry shared by the trajectory predictor and the
//! projectile simulator
//!
//! Both sides must agree on the contact radius or the aim preview will
//! disagree with where the shot actually sticks.

use glam::Vec2;

use crate::consts::COLLISION_EPSILON;

/// Center distance at which a projectile touches a placed cell
#[inline]
pub fn contact_radius(cell_radius: f32, projectile_radius: f32) -> f32 {
    cell_radius + projectile_radius - COLLISION_EPSILON
}

/// Closest point to `p` on the segment `a..b`
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Fraction along `a..b` where a point moving from `a` first comes within
/// `radius` of `center`, or `None` if it never does
///
/// Returns 0.0 when `a` is already inside the circle.
pub fn segment_circle_entry(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let closest = closest_point_on_segment(a, b, center);
    if closest.distance_squared(center) >= radius * radius {
        return None;
    }

    let d = b - a;
    let f = a - center;
    let qa = d.length_squared();
    let c = f.length_squared() - radius * radius;
    if c <= 0.0 || qa < 1e-8 {
        return Some(0.0);
    }
    let qb = 2.0 * f.dot(d);
    let disc = (qb * qb - 4.0 * qa * c).max(0.0);
    let t = (-qb - disc.sqrt()) / (2.0 * qa);
    Some(t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(a, b, Vec2::new(-5.0, 3.0)), a);
        assert_eq!(closest_point_on_segment(a, b, Vec2::new(15.0, 3.0)), b);
        assert_eq!(
            closest_point_on_segment(a, b, Vec2::new(4.0, 3.0)),
            Vec2::new(4.0, 0.0)
        );
    }

    #[test]
    fn test_segment_circle_entry_head_on() {
        // Moving right along y=0 toward a circle of radius 2 centered at x=10
        let t = segment_circle_entry(Vec2::ZERO, Vec2::new(20.0, 0.0), Vec2::new(10.0, 0.0), 2.0)
            .unwrap();
        assert!((t - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_segment_circle_entry_miss() {
        let hit = segment_circle_entry(Vec2::ZERO, Vec2::new(20.0, 0.0), Vec2::new(10.0, 5.0), 2.0);
        assert!(hit.is_none());
        // Circle beyond the end of the segment
        let hit = segment_circle_entry(Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::new(10.0, 0.0), 2.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_circle_entry_starting_inside() {
        let t = segment_circle_entry(Vec2::ZERO, Vec2::new(20.0, 0.0), Vec2::new(1.0, 0.0), 2.0);
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn test_contact_radius_shrinks_by_epsilon() {
        assert!((contact_radius(16.0, 16.0) - (32.0 - COLLISION_EPSILON)).abs() < 1e-6);
    }
}
