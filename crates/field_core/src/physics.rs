//! Boundary & collision step.
//!
//! Each tick every body moves by its velocity, bounces off the spherical
//! boundary (one-sided: only while still heading outwards), and then any two
//! bodies whose centres are closer than one diameter are both removed.
//!
//! The pairwise scan is a plain O(n^2) loop; body counts stay in the low hundreds.

use bevy::math::Vec3;
use field_config::{finite_or, FieldSettings};
use std::collections::BTreeSet;

use crate::scene::Body;

/// Geometry of the containing sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub half_size: f32,
    pub sphere_radius: f32,
}

impl FieldBounds {
    pub fn new(half_size: f32, sphere_radius: f32) -> Self {
        Self {
            half_size,
            sphere_radius,
        }
    }

    /// Furthest a body centre may travel from the origin.
    pub fn boundary_radius(&self) -> f32 {
        self.half_size - self.sphere_radius
    }

    /// Centres closer than this collide.
    pub fn collision_distance(&self) -> f32 {
        self.sphere_radius * 2.0
    }
}

impl From<&FieldSettings> for FieldBounds {
    /// Non-finite sizes fall back to the defaults.
    fn from(s: &FieldSettings) -> Self {
        let d = FieldSettings::default();
        Self::new(
            finite_or(s.half_size, d.half_size),
            finite_or(s.sphere_radius, d.sphere_radius),
        )
    }
}

/// Mirror `v` about the plane with unit normal `n`.
#[inline]
pub fn reflect_about(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Outcome of one [`step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Bodies whose velocity was mirrored at the boundary this tick.
    pub reflections: usize,
    /// Removed bodies, in removal order (highest original index first).
    pub removed: Vec<Body>,
}

/// Move every body by its velocity and reflect the ones leaving the field.
/// Returns the number of reflections.
pub fn advance_bodies(bodies: &mut [Body], bounds: &FieldBounds) -> usize {
    let limit = bounds.boundary_radius();
    let mut reflections = 0;
    for body in bodies.iter_mut() {
        body.position += body.velocity;
        if body.position.length() <= limit {
            continue;
        }
        let normal = body.position.normalize_or_zero();
        // Already heading back in: leave it, otherwise it would flip every tick.
        if body.velocity.dot(normal) <= 0.0 {
            continue;
        }
        body.velocity = reflect_about(body.velocity, normal);
        body.position = normal * limit;
        reflections += 1;
    }
    reflections
}

/// Indices of every body that touches at least one other body.
pub fn find_collisions(bodies: &[Body], bounds: &FieldBounds) -> BTreeSet<usize> {
    let threshold = bounds.collision_distance();
    let mut marked = BTreeSet::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            if bodies[i].position.distance(bodies[j].position) < threshold {
                marked.insert(i);
                marked.insert(j);
            }
        }
    }
    marked
}

/// Remove the marked indices, highest first so earlier removals never shift later ones.
/// Out-of-range indices are ignored.
pub fn remove_marked(bodies: &mut Vec<Body>, marked: &BTreeSet<usize>) -> Vec<Body> {
    let mut removed = Vec::with_capacity(marked.len());
    for &idx in marked.iter().rev() {
        if idx < bodies.len() {
            removed.push(bodies.remove(idx));
        }
    }
    removed
}

/// One full physics tick: advance, reflect, detect and remove collisions.
pub fn step(bodies: &mut Vec<Body>, bounds: &FieldBounds) -> StepReport {
    let reflections = advance_bodies(bodies, bounds);
    let marked = find_collisions(bodies, bounds);
    let removed = remove_marked(bodies, &marked);
    StepReport {
        reflections,
        removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::BodyId;

    fn body(id: u64, position: Vec3, velocity: Vec3) -> Body {
        Body::new(BodyId(id), position, velocity)
    }

    fn bounds() -> FieldBounds {
        FieldBounds::new(5.0, 0.1)
    }

    #[test]
    fn free_body_moves_by_velocity() {
        let mut bodies = vec![body(0, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.01, -0.02, 0.0))];
        let report = step(&mut bodies, &bounds());
        assert_eq!(report.reflections, 0);
        assert!(bodies[0].position.abs_diff_eq(Vec3::new(1.01, 1.98, 3.0), 1e-6));
        assert_eq!(bodies[0].velocity, Vec3::new(0.01, -0.02, 0.0));
    }

    #[test]
    fn outward_body_is_reflected_onto_boundary() {
        let b = bounds();
        let p = Vec3::new(4.85, 0.3, -0.2);
        let v = Vec3::new(0.1, 0.05, 0.0);
        let mut bodies = vec![body(0, p, v)];
        let n = (p + v).normalize();
        assert!((p + v).length() > b.boundary_radius());
        assert!(v.dot(n) > 0.0);

        let reflections = advance_bodies(&mut bodies, &b);

        assert_eq!(reflections, 1);
        let expected_v = v - 2.0 * v.dot(n) * n;
        assert!(bodies[0].velocity.abs_diff_eq(expected_v, 1e-6));
        assert!((bodies[0].position.length() - b.boundary_radius()).abs() < 1e-5);
        assert!(bodies[0].velocity.dot(n) < 0.0);
    }

    #[test]
    fn inward_body_past_threshold_is_left_alone() {
        let b = bounds();
        // Outside the limit but moving back towards the origin.
        let p = Vec3::new(5.2, 0.0, 0.0);
        let v = Vec3::new(-0.05, 0.0, 0.0);
        let mut bodies = vec![body(0, p, v)];
        assert_eq!(advance_bodies(&mut bodies, &b), 0);
        assert!(bodies[0].position.abs_diff_eq(p + v, 1e-6));
        assert_eq!(bodies[0].velocity, v);
    }

    #[test]
    fn reflect_about_preserves_speed() {
        let v = Vec3::new(0.3, -0.4, 1.2);
        let n = Vec3::new(1.0, 1.0, 0.0).normalize();
        let r = reflect_about(v, n);
        assert!((r.length() - v.length()).abs() < 1e-6);
        assert!((r.dot(n) + v.dot(n)).abs() < 1e-6);
    }

    #[test]
    fn colliding_pair_removed_third_survives() {
        let mut bodies = vec![
            body(0, Vec3::new(0.0, 0.0, 0.0), Vec3::ZERO),
            body(1, Vec3::new(0.15, 0.0, 0.0), Vec3::ZERO),
            body(2, Vec3::new(2.0, 2.0, 2.0), Vec3::ZERO),
        ];
        let report = step(&mut bodies, &bounds());
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].id, BodyId(2));
        let removed: Vec<_> = report.removed.iter().map(|b| b.id).collect();
        assert_eq!(removed, vec![BodyId(1), BodyId(0)]);
    }

    #[test]
    fn exactly_one_diameter_apart_does_not_collide() {
        let bodies = vec![
            body(0, Vec3::ZERO, Vec3::ZERO),
            body(1, Vec3::new(0.25, 0.0, 0.0), Vec3::ZERO),
        ];
        let wide = FieldBounds::new(5.0, 0.125);
        assert!(find_collisions(&bodies, &wide).is_empty());
    }

    #[test]
    fn body_touching_two_others_is_removed_once() {
        let mut bodies = vec![
            body(0, Vec3::new(-0.15, 0.0, 0.0), Vec3::ZERO),
            body(1, Vec3::ZERO, Vec3::ZERO),
            body(2, Vec3::new(0.15, 0.0, 0.0), Vec3::ZERO),
            body(3, Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO),
        ];
        let marked = find_collisions(&bodies, &bounds());
        assert_eq!(marked.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        let report = step(&mut bodies, &bounds());
        assert_eq!(report.removed.len(), 3);
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].id, BodyId(3));
    }

    #[test]
    fn descending_removal_keeps_unmarked_in_order() {
        let original: Vec<Body> = (0..5)
            .map(|i| body(i, Vec3::splat(i as f32), Vec3::ZERO))
            .collect();

        let mut via_set = original.clone();
        let marked: BTreeSet<usize> = [1, 3].into_iter().collect();
        remove_marked(&mut via_set, &marked);

        let mut by_hand = original.clone();
        by_hand.remove(3);
        by_hand.remove(1);

        assert_eq!(via_set, by_hand);
        assert_eq!(via_set, vec![original[0], original[2], original[4]]);
    }

    #[test]
    fn out_of_range_marks_are_ignored() {
        let mut bodies = vec![body(0, Vec3::ZERO, Vec3::ZERO)];
        let marked: BTreeSet<usize> = [4].into_iter().collect();
        assert!(remove_marked(&mut bodies, &marked).is_empty());
        assert_eq!(bodies.len(), 1);
    }

    #[test]
    fn bodies_stay_inside_after_many_ticks() {
        let b = bounds();
        let mut bodies: Vec<Body> = (0..8)
            .map(|i| {
                let dir = Vec3::new((i as f32).cos(), (i as f32 * 0.7).sin(), 0.3).normalize();
                // Radial motion so each body bounces along one diameter.
                body(i, dir * (i as f32 * 0.5), dir * (0.05 + 0.01 * i as f32))
            })
            .collect();
        for _ in 0..2_000 {
            advance_bodies(&mut bodies, &b);
            for body in &bodies {
                assert!(body.position.length() <= b.boundary_radius() + 1e-4);
            }
        }
    }
}
