//! Common ECS components used across the engine.

use glam::Vec3;

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self { linear }
    }
}

/// Lifetime component for temporary entities (projectiles, effects).
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Count down; returns true once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// Id of the craft that spawned an entity, so its own shots can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnedBy(pub u32);

/// Tag component for projectiles in flight.
#[derive(Debug, Clone, Copy, Default)]
pub struct Projectile;

/// Tag component for drifting space rocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceRock;
