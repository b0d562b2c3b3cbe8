//! Transform component and utilities for spatial positioning.
//!
//! Craft frame: +X forward, +Y right, +Z up. Angles on [`Rotator`] are in
//! degrees; positive pitch noses up, positive yaw turns toward +Y and
//! positive roll lifts the right wing.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Pitch/yaw/roll triple in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Convert to a quaternion (yaw applied first, then pitch, then roll).
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::ZYX,
            self.yaw.to_radians(),
            -self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }

    /// Decompose a quaternion back into pitch/yaw/roll.
    pub fn from_quat(rotation: Quat) -> Self {
        let (yaw, neg_pitch, roll) = rotation.to_euler(EulerRot::ZYX);
        Self {
            pitch: -neg_pitch.to_degrees(),
            yaw: yaw.to_degrees(),
            roll: roll.to_degrees(),
        }
    }

    /// Orientation whose forward axis points along `direction`. Roll is zero.
    /// A zero-length direction yields [`Rotator::ZERO`].
    pub fn from_direction(direction: Vec3) -> Self {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return Self::ZERO;
        }
        let horizontal = (dir.x * dir.x + dir.y * dir.y).sqrt();
        Self {
            pitch: dir.z.atan2(horizontal).to_degrees(),
            yaw: dir.y.atan2(dir.x).to_degrees(),
            roll: 0.0,
        }
    }

    /// Scale every component, e.g. angular speed times delta seconds.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            pitch: self.pitch * factor,
            yaw: self.yaw * factor,
            roll: self.roll * factor,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.pitch == 0.0 && self.yaw == 0.0 && self.roll == 0.0
    }
}

/// A rigid transform: position plus rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Get the forward direction (positive X).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the right direction (positive Y).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Get the up direction (positive Z).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn rotator(&self) -> Rotator {
        Rotator::from_quat(self.rotation)
    }

    /// Translate the transform by a world-space delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Convert a local-space offset into world space.
    pub fn local_to_world_offset(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Translate by an offset expressed in this transform's own frame.
    pub fn add_local_offset(&mut self, local: Vec3) {
        self.position += self.local_to_world_offset(local);
    }

    /// Rotate in this transform's own frame.
    pub fn add_local_rotation(&mut self, delta: Rotator) {
        if delta.is_zero() {
            return;
        }
        self.rotation = (self.rotation * delta.to_quat()).normalize();
    }

    /// Snap rotation back to identity.
    pub fn reset_rotation(&mut self) {
        self.rotation = Quat::IDENTITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_basis_is_x_forward_y_right_z_up() {
        let t = Transform::default();
        assert_eq!(t.forward(), Vec3::X);
        assert_eq!(t.right(), Vec3::Y);
        assert_eq!(t.up(), Vec3::Z);
    }

    #[test]
    fn rotator_quat_roundtrip_preserves_angles() {
        let r = Rotator::new(20.0, -35.0, 10.0);
        let back = Rotator::from_quat(r.to_quat());
        assert_abs_diff_eq!(back.pitch, 20.0, epsilon = 1e-3);
        assert_abs_diff_eq!(back.yaw, -35.0, epsilon = 1e-3);
        assert_abs_diff_eq!(back.roll, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn positive_pitch_noses_up_and_positive_yaw_turns_right() {
        let up = Transform::from_position_rotation(Vec3::ZERO, Rotator::new(90.0, 0.0, 0.0).to_quat());
        assert_abs_diff_eq!(up.forward().z, 1.0, epsilon = 1e-5);

        let right = Transform::from_position_rotation(Vec3::ZERO, Rotator::new(0.0, 90.0, 0.0).to_quat());
        assert_abs_diff_eq!(right.forward().y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn from_direction_points_forward_along_direction() {
        let dir = Vec3::new(1.0, 1.0, 1.0).normalize();
        let rot = Rotator::from_direction(dir).to_quat();
        let forward = rot * Vec3::X;
        assert_abs_diff_eq!(forward.x, dir.x, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.y, dir.y, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.z, dir.z, epsilon = 1e-5);
        assert_eq!(Rotator::from_direction(Vec3::ZERO), Rotator::ZERO);
    }

    #[test]
    fn local_offset_follows_rotation() {
        let mut t = Transform::from_position_rotation(Vec3::ZERO, Rotator::new(0.0, 90.0, 0.0).to_quat());
        t.add_local_offset(Vec3::new(10.0, 0.0, 0.0));
        assert_abs_diff_eq!(t.position.y, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(t.position.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn local_rotation_accumulates_yaw() {
        let mut t = Transform::default();
        t.add_local_rotation(Rotator::new(0.0, 30.0, 0.0));
        t.add_local_rotation(Rotator::new(0.0, 15.0, 0.0));
        assert_abs_diff_eq!(t.rotator().yaw, 45.0, epsilon = 1e-3);
        t.reset_rotation();
        assert_eq!(t.rotation, Quat::IDENTITY);
    }
}
