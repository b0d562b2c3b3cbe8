//! Host services the craft calls into during a tick.
//!
//! The craft never reaches for a global world: whoever drives the tick hands
//! it implementations of these traits. All calls complete synchronously.

use engine_core::{Rotator, Transform};
use glam::Vec3;

use crate::weapons::WeaponKind;

/// Opaque id of something living in the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorHandle(pub u64);

/// A blocking contact reported after a swept move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    /// What was hit, if the host can name it.
    pub other: Option<ActorHandle>,
    pub location: Vec3,
    /// Surface normal of the thing that was hit.
    pub normal: Vec3,
    pub impulse: Vec3,
}

/// Result of moving the root with a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Root position after the move.
    pub position: Vec3,
    pub hit: Option<HitEvent>,
}

/// Moves the craft's root through the world, stopping at the first contact.
pub trait MotionService {
    /// Apply `local_offset` (in the root's frame) to `root` with a collision
    /// sweep.
    fn sweep_local_offset(&mut self, root: &Transform, local_offset: Vec3) -> MoveOutcome;
}

/// Nearest blocking point along a ray.
pub trait RaycastService {
    fn raycast(&self, start: Vec3, direction: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// What the weapon asks the host to spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: WeaponKind,
    pub location: Vec3,
    pub rotation: Rotator,
    /// Id of the craft that fired.
    pub owner: u32,
}

/// Instantiates projectiles.
pub trait SpawnService {
    /// Returns `None` if the host refused the spawn.
    fn spawn(&mut self, request: SpawnRequest) -> Option<ActorHandle>;
}

/// Free space: every move completes, nothing is ever hit.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenSpace;

impl MotionService for OpenSpace {
    fn sweep_local_offset(&mut self, root: &Transform, local_offset: Vec3) -> MoveOutcome {
        let mut moved = *root;
        moved.add_local_offset(local_offset);
        MoveOutcome {
            position: moved.position,
            hit: None,
        }
    }
}

impl RaycastService for OpenSpace {
    fn raycast(&self, _start: Vec3, _direction: Vec3, _max_distance: f32) -> Option<Vec3> {
        None
    }
}
