//! Collider storage and query pipeline management with Rapier3D.

use crate::collision::CollisionGroup;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Query-only collision world. Colliders are parentless and positioned
/// directly; call [`PhysicsWorld::update_query_pipeline`] after moving them.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub island_manager: IslandManager,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Update query pipeline so sweeps and ray casts see moved colliders.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add an environment sphere (a space rock) at `position`.
    pub fn add_environment_sphere(&mut self, position: Vec3, radius: f32) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius)
            .translation(vector![position.x, position.y, position.z])
            .collision_groups(CollisionGroup::environment())
            .build();
        self.collider_set.insert(collider)
    }

    /// Teleport a collider. Returns false if the handle is stale.
    pub fn set_collider_position(&mut self, handle: ColliderHandle, position: Vec3) -> bool {
        match self.collider_set.get_mut(handle) {
            Some(collider) => {
                collider.set_translation(vector![position.x, position.y, position.z]);
                true
            }
            None => false,
        }
    }

    /// World position of a collider.
    pub fn collider_position(&self, handle: ColliderHandle) -> Option<Vec3> {
        self.collider_set.get(handle).map(|collider| {
            let t = collider.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    /// Remove a collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        if self
            .collider_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.rigid_body_set,
                false,
            )
            .is_none()
        {
            log::debug!("remove_collider: {:?} already gone", handle);
        }
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }
}
