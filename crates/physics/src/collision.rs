//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Space rocks and any other static scenery.
    Environment = 1 << 0,
    /// The player craft's swept shield sphere.
    Craft = 1 << 1,
    /// Projectiles in flight.
    Projectile = 1 << 2,
    /// Crosshair aim traces.
    AimTrace = 1 << 3,
}

impl CollisionGroup {
    fn bits(self) -> Group {
        Group::from_bits_retain(self as u32)
    }

    /// Groups assigned to environment colliders: hit by everything.
    pub fn environment() -> InteractionGroups {
        InteractionGroups::new(Self::Environment.bits(), Group::ALL)
    }

    /// Query groups for sweeping the craft.
    pub fn craft() -> InteractionGroups {
        InteractionGroups::new(Self::Craft.bits(), Self::Environment.bits())
    }

    /// Query groups for projectile path checks.
    pub fn projectile() -> InteractionGroups {
        InteractionGroups::new(Self::Projectile.bits(), Self::Environment.bits())
    }

    /// Query groups for the weapon aim trace.
    pub fn aim_trace() -> InteractionGroups {
        InteractionGroups::new(Self::AimTrace.bits(), Self::Environment.bits())
    }
}

/// Component linking an ECS entity to its collider.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub collider: ColliderHandle,
}

impl PhysicsBody {
    pub fn new(collider: ColliderHandle) -> Self {
        Self { collider }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn craft_queries_see_environment_only() {
        assert!(CollisionGroup::environment().test(CollisionGroup::craft()));
        assert!(CollisionGroup::environment().test(CollisionGroup::projectile()));
        assert!(!CollisionGroup::craft().test(CollisionGroup::projectile()));
    }
}
