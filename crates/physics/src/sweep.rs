//! Swept sphere movement: move until the first blocking contact.

use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

/// Gap left between the swept sphere and the surface it stopped against.
const SWEEP_SKIN: f32 = 0.01;

/// Contact reported by a sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepHit {
    /// The collider that blocked the move.
    pub collider: ColliderHandle,
    /// World position of the contact point.
    pub location: Vec3,
    /// Surface normal of the blocking collider, pointing toward the sphere.
    pub normal: Vec3,
    /// Fraction of the requested move completed before contact, in `[0, 1]`.
    pub time_of_impact: f32,
}

/// Outcome of a sweep: how far the sphere actually moved and what stopped it.
#[derive(Debug, Clone, Copy)]
pub struct SweepResult {
    pub travelled: Vec3,
    pub hit: Option<SweepHit>,
}

impl SweepResult {
    fn unobstructed(delta: Vec3) -> Self {
        Self {
            travelled: delta,
            hit: None,
        }
    }
}

impl PhysicsWorld {
    /// Sweep a sphere of `radius` from `origin` by `delta`.
    ///
    /// Shapes that start overlapping but are moving apart are ignored, so a
    /// craft that just bounced off a rock can leave it.
    pub fn sweep_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        delta: Vec3,
        groups: InteractionGroups,
    ) -> SweepResult {
        let length = delta.length();
        if length <= f32::EPSILON || !length.is_finite() {
            return SweepResult::unobstructed(Vec3::ZERO);
        }

        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(origin.x, origin.y, origin.z);
        let shape_vel = vector![delta.x, delta.y, delta.z];
        let options = ShapeCastOptions {
            max_time_of_impact: 1.0,
            target_distance: 0.0,
            stop_at_penetration: false,
            compute_impact_geometry_on_penetration: true,
        };
        let filter = QueryFilter::default().groups(groups);

        let Some((collider, hit)) = self.query_pipeline.cast_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape_vel,
            &shape,
            options,
            filter,
        ) else {
            return SweepResult::unobstructed(delta);
        };

        // The ball has no rotation, so its local frame is aligned with world.
        let toi = hit.time_of_impact.clamp(0.0, 1.0);
        let stop_at = ((toi * length) - SWEEP_SKIN).max(0.0) / length;
        let travelled = delta * stop_at;

        let mut normal = -Vec3::new(hit.normal2.x, hit.normal2.y, hit.normal2.z);
        if !normal.is_finite() || normal.length_squared() < 1e-6 {
            normal = -delta / length;
        }
        let location = origin + delta * toi + Vec3::new(hit.witness2.x, hit.witness2.y, hit.witness2.z);

        log::trace!("sweep blocked by {:?} at toi {:.3}", collider, toi);

        SweepResult {
            travelled,
            hit: Some(SweepHit {
                collider,
                location,
                normal,
                time_of_impact: toi,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CollisionGroup;
    use approx::assert_abs_diff_eq;

    #[test]
    fn free_sweep_moves_full_distance() {
        let mut world = PhysicsWorld::new();
        world.add_environment_sphere(Vec3::new(0.0, 500.0, 0.0), 10.0);
        world.update_query_pipeline();

        let delta = Vec3::new(50.0, 0.0, 0.0);
        let result = world.sweep_sphere(Vec3::ZERO, 5.0, delta, CollisionGroup::craft());
        assert!(result.hit.is_none());
        assert_eq!(result.travelled, delta);
    }

    #[test]
    fn sweep_stops_at_rock_surface_with_facing_normal() {
        let mut world = PhysicsWorld::new();
        let rock = world.add_environment_sphere(Vec3::new(100.0, 0.0, 0.0), 10.0);
        world.update_query_pipeline();

        let result = world.sweep_sphere(
            Vec3::ZERO,
            5.0,
            Vec3::new(200.0, 0.0, 0.0),
            CollisionGroup::craft(),
        );
        let hit = result.hit.expect("sweep should be blocked");
        assert_eq!(hit.collider, rock);
        // Sphere centre stops 15 units before the rock centre.
        assert_abs_diff_eq!(result.travelled.x, 85.0, epsilon = 0.05);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(hit.location.x, 90.0, epsilon = 0.05);
    }

    #[test]
    fn zero_move_is_never_blocked() {
        let world = PhysicsWorld::new();
        let result = world.sweep_sphere(Vec3::ZERO, 5.0, Vec3::ZERO, CollisionGroup::craft());
        assert!(result.hit.is_none());
        assert_eq!(result.travelled, Vec3::ZERO);
    }
}
