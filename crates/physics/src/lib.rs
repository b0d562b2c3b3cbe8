//! Collision queries using Rapier3D for SpaceRocks.
//!
//! The world is query-only: nothing here is integrated by a solver. Callers
//! move colliders explicitly and ask for sweeps and ray casts.

pub mod collision;
pub mod physics_world;
pub mod raycast;
pub mod sweep;

pub use collision::*;
pub use physics_world::*;
pub use raycast::*;
pub use sweep::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, InteractionGroups};
