//! Arena containment and sampling
//!
//! The arena is a circle centered on the origin. Every mobile entity is kept
//! inside the inset collision boundary, sliding along the wall rather than
//! stopping dead when it pushes outward.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// Clamp `pos` inside the arena, `buffer` units from the collision boundary.
///
/// When a clamp happens and `vel` is supplied, the outward radial component
/// of the velocity is removed so only the tangential part survives.
/// Returns true if the position was clamped.
pub fn constrain_to_arena(pos: &mut Vec2, vel: Option<&mut Vec2>, buffer: f32) -> bool {
    let limit = ARENA_INNER_RADIUS - buffer;
    let dist = pos.length();
    if dist <= limit {
        return false;
    }

    let normal = *pos / dist;
    *pos = normal * limit;

    if let Some(vel) = vel {
        let radial = vel.dot(normal);
        *vel -= normal * radial;
    }
    true
}

/// Uniform random point within `ARENA_RADIUS - ARENA_POINT_MARGIN` of center.
///
/// The radius is sqrt-scaled so points are spread evenly by area instead of
/// clumping at the middle.
pub fn random_arena_point<R: Rng>(rng: &mut R) -> Vec2 {
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    let radius = rng.random::<f32>().sqrt() * (ARENA_RADIUS - ARENA_POINT_MARGIN);
    Vec2::new(angle.cos() * radius, angle.sin() * radius)
}

/// Where every enemy enters the arena (just inside the west wall)
pub const SPAWN_POINT: Vec2 = Vec2::new(-ARENA_RADIUS + 1.0, 0.0);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_inside_is_untouched() {
        let mut pos = Vec2::new(3.0, -4.0);
        let mut vel = Vec2::new(10.0, 2.0);
        assert!(!constrain_to_arena(&mut pos, Some(&mut vel), PLAYER_RADIUS));
        assert_eq!(pos, Vec2::new(3.0, -4.0));
        assert_eq!(vel, Vec2::new(10.0, 2.0));
    }

    #[test]
    fn test_wall_slide_keeps_tangent() {
        let mut pos = Vec2::new(40.0, 0.0);
        let mut vel = Vec2::new(5.0, 3.0);
        assert!(constrain_to_arena(&mut pos, Some(&mut vel), ENEMY_RADIUS));
        assert!((pos.x - (ARENA_INNER_RADIUS - ENEMY_RADIUS)).abs() < 1e-4);
        assert!(pos.y.abs() < 1e-6);
        // Radial (x) component removed, tangential (y) kept
        assert!(vel.x.abs() < 1e-6);
        assert!((vel.y - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_random_points_stay_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..2000 {
            let p = random_arena_point(&mut rng);
            assert!(p.length() <= ARENA_RADIUS - ARENA_POINT_MARGIN + 1e-4);
        }
    }

    #[test]
    fn test_random_points_not_center_biased() {
        // Half the area of a disc lies outside r / sqrt(2)
        let mut rng = Pcg32::seed_from_u64(99);
        let r = ARENA_RADIUS - ARENA_POINT_MARGIN;
        let n = 20_000;
        let outer = (0..n)
            .filter(|_| random_arena_point(&mut rng).length() > r / 2.0_f32.sqrt())
            .count();
        let frac = outer as f32 / n as f32;
        assert!((frac - 0.5).abs() < 0.02, "outer fraction {frac}");
    }

    proptest! {
        #[test]
        fn prop_constrained_within_limit(
            x in -200.0f32..200.0,
            y in -200.0f32..200.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            buffer in 0.0f32..3.0,
        ) {
            let mut pos = Vec2::new(x, y);
            let mut vel = Vec2::new(vx, vy);
            constrain_to_arena(&mut pos, Some(&mut vel), buffer);
            prop_assert!(pos.length() <= ARENA_INNER_RADIUS - buffer + 1e-3);
        }

        #[test]
        fn prop_clamped_velocity_has_no_radial_part(
            angle in 0.0f32..std::f32::consts::TAU,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
        ) {
            let mut pos = Vec2::new(angle.cos(), angle.sin()) * 60.0;
            let mut vel = Vec2::new(vx, vy);
            constrain_to_arena(&mut pos, Some(&mut vel), 0.0);
            let normal = pos.normalize();
            prop_assert!(vel.dot(normal).abs() < 1e-3);
        }
    }
}
