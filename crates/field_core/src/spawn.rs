use bevy::math::Vec3;
use field_config::{finite_or, FieldSettings};
use rand::Rng;
use std::f32::consts::TAU;

use crate::physics::FieldBounds;
use crate::scene::{Body, BodyId};

/// Uniform point inside a ball of `radius` around the origin.
///
/// Direction from a uniform `z` and azimuth (uniform on the sphere surface),
/// distance from the cube root of a uniform draw so volume density is constant.
pub fn sample_in_ball<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    if radius <= 0.0 {
        return Vec3::ZERO;
    }
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let phi: f32 = rng.gen_range(0.0..TAU);
    let ring = (1.0 - z * z).max(0.0).sqrt();
    let dir = Vec3::new(ring * phi.cos(), ring * phi.sin(), z);
    let r = radius * rng.gen::<f32>().cbrt();
    // Rounding can put the point a hair outside.
    (dir * r).clamp_length_max(radius)
}

/// Per-axis velocity in `[-max, max)`. Zero unless `max` is positive and finite.
pub fn sample_velocity<R: Rng + ?Sized>(rng: &mut R, max_axis_speed: f32) -> Vec3 {
    if !max_axis_speed.is_finite() || max_axis_speed <= 0.0 {
        return Vec3::ZERO;
    }
    // `gen_range` panics when the span overflows.
    let max = max_axis_speed.min(f32::MAX / 4.0);
    let range = -max..max;
    Vec3::new(
        rng.gen_range(range.clone()),
        rng.gen_range(range.clone()),
        rng.gen_range(range),
    )
}

/// Spawn `sphere_count` bodies inside the boundary with ids `0..count`.
pub fn spawn_bodies<R: Rng + ?Sized>(rng: &mut R, settings: &FieldSettings) -> Vec<Body> {
    let radius = FieldBounds::from(settings).boundary_radius().max(0.0);
    let max_speed = finite_or(
        settings.max_axis_speed,
        FieldSettings::default().max_axis_speed,
    );
    (0..settings.sphere_count)
        .map(|i| {
            let position = sample_in_ball(rng, radius);
            let velocity = sample_velocity(rng, max_speed);
            Body::new(BodyId(i as u64), position, velocity)
        })
        .collect()
}
