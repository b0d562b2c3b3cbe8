//! Six-axis craft flight model.
//!
//! Three thruster groups (forward, strafe, vertical) push on world-space axis
//! speeds according to where the craft's mesh is pointing; three rotational
//! controllers (pitch, yaw, roll) smooth angular speed toward a target.
//! Everything here is pure state update: the caller integrates the results.

use engine_core::Rotator;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Inputs with magnitude at or below this count as released.
pub const INPUT_EPSILON: f32 = 1.0e-4;

/// Handling parameters. Speeds are world units (or degrees) per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    /// How quickly axis speed changes under thrust.
    pub acceleration: f32,
    /// Angular speed commanded at full stick.
    pub turn_speed: f32,
    /// How strongly pitch and roll return to level. Zero disables levelling.
    pub return_speed: f32,
    /// Upper bound for every linear and angular speed.
    pub max_speed: f32,
    /// Lower bound for every linear and angular speed.
    pub min_speed: f32,
    /// Passive drag applied to an axis when its thruster group is idle.
    pub deceleration: f32,
    /// Exponential smoothing rate for angular speed.
    pub axis_smoothing: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            acceleration: 1000.0,
            turn_speed: 100.0,
            return_speed: 0.0,
            max_speed: 4000.0,
            min_speed: -4000.0,
            deceleration: 50.0,
            axis_smoothing: 5.0,
        }
    }
}

impl FlightTuning {
    /// Clamp into `[min_speed, max_speed]`. Never panics, even when the
    /// bounds have been edited into the wrong order; NaN maps to `min_speed`.
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        speed.max(self.min_speed).min(self.max_speed)
    }

    /// New speed for one world axis after one thruster group fires (or idles)
    /// for `dt` seconds.
    ///
    /// `axis_factor` is the component of the thruster direction along the
    /// world axis. With no input, drag of half `deceleration` pushes against
    /// the current sign, so a craft coasting through zero flips sign every
    /// tick rather than stopping. The sign bit decides, so `-0.0` (left by
    /// a bounce from rest) drifts positive.
    pub fn compute_axis_speed(
        &self,
        input: f32,
        axis_factor: f32,
        current_speed: f32,
        dt: f32,
    ) -> f32 {
        let input = finite_or_zero(input);
        let acceleration = if has_input(input) {
            input * self.acceleration * finite_or_zero(axis_factor)
        } else if current_speed.is_sign_negative() {
            0.5 * self.deceleration
        } else {
            -0.5 * self.deceleration
        };
        self.clamp_speed(current_speed + dt.max(0.0) * acceleration)
    }

    /// Target pitch rate. Stick input is inverted; without input the craft
    /// levels toward zero pitch.
    pub fn pitch_target(&self, input: f32, pitch_angle: f32) -> f32 {
        let input = finite_or_zero(input);
        if has_input(input) {
            input * self.turn_speed * -1.0
        } else {
            pitch_angle * -self.return_speed
        }
    }

    /// Target roll rate; levels toward zero roll without input.
    pub fn roll_target(&self, input: f32, roll_angle: f32) -> f32 {
        let input = finite_or_zero(input);
        if has_input(input) {
            input * self.turn_speed
        } else {
            roll_angle * -self.return_speed
        }
    }

    /// Target yaw rate. Heading never self-levels: no input means zero.
    pub fn yaw_target(&self, input: f32) -> f32 {
        let input = finite_or_zero(input);
        if has_input(input) {
            input * self.turn_speed
        } else {
            0.0
        }
    }

    /// Smooth `current` toward `target` and clamp.
    fn smooth_angular(&self, current: f32, target: f32, dt: f32) -> f32 {
        self.clamp_speed(interp_to(current, target, dt, self.axis_smoothing))
    }
}

/// Frame-rate independent approach: covers `1 - e^(-rate·dt)` of the
/// remaining distance. Never overshoots. A non-positive rate snaps to target.
pub fn interp_to(current: f32, target: f32, dt: f32, rate: f32) -> f32 {
    if rate <= 0.0 {
        return target;
    }
    let alpha = 1.0 - (-rate * dt.max(0.0)).exp();
    current + (target - current) * alpha
}

fn has_input(value: f32) -> bool {
    value.abs() > INPUT_EPSILON
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Per-tick control input, every axis in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub forward: f32,
    pub strafe: f32,
    pub vertical: f32,
}

impl From<input::FlightAxes> for ControlInput {
    fn from(axes: input::FlightAxes) -> Self {
        Self {
            pitch: axes.pitch,
            yaw: axes.yaw,
            roll: axes.roll,
            forward: axes.forward,
            strafe: axes.strafe,
            vertical: axes.vertical,
        }
    }
}

/// World-space basis of the craft's visual mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for CraftBasis {
    fn default() -> Self {
        Self {
            forward: Vec3::X,
            right: Vec3::Y,
            up: Vec3::Z,
        }
    }
}

/// Linear and angular speed state of one craft.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kinematics {
    /// World-space speed along X, Y and Z.
    pub axis_speed: Vec3,
    /// Degrees per second.
    pub pitch_speed: f32,
    pub yaw_speed: f32,
    pub roll_speed: f32,
}

impl Kinematics {
    /// Run all three thruster groups for one tick.
    ///
    /// Groups fire in the order forward, strafe, vertical, and each sees the
    /// axis speeds written by the one before it. An idle group therefore
    /// still bleeds speed through its drag term.
    pub fn apply_thrusters(
        &mut self,
        tuning: &FlightTuning,
        input: &ControlInput,
        basis: &CraftBasis,
        dt: f32,
    ) {
        self.fire_thruster_group(tuning, input.forward, basis.forward, dt);
        self.fire_thruster_group(tuning, input.strafe, basis.right, dt);
        self.fire_thruster_group(tuning, input.vertical, basis.up, dt);
    }

    fn fire_thruster_group(&mut self, tuning: &FlightTuning, input: f32, direction: Vec3, dt: f32) {
        let speed = &mut self.axis_speed;
        speed.x = tuning.compute_axis_speed(input, direction.x, speed.x, dt);
        speed.y = tuning.compute_axis_speed(input, direction.y, speed.y, dt);
        speed.z = tuning.compute_axis_speed(input, direction.z, speed.z, dt);
    }

    /// Update the three angular speeds. `mesh_angles` is the mesh's current
    /// rotation relative to the root, used for pitch/roll levelling.
    pub fn apply_rotation(
        &mut self,
        tuning: &FlightTuning,
        input: &ControlInput,
        mesh_angles: Rotator,
        dt: f32,
    ) {
        let pitch_target = tuning.pitch_target(input.pitch, mesh_angles.pitch);
        let roll_target = tuning.roll_target(input.roll, mesh_angles.roll);
        let yaw_target = tuning.yaw_target(input.yaw);

        self.pitch_speed = tuning.smooth_angular(self.pitch_speed, pitch_target, dt);
        self.roll_speed = tuning.smooth_angular(self.roll_speed, roll_target, dt);
        self.yaw_speed = tuning.smooth_angular(self.yaw_speed, yaw_target, dt);
    }

    /// Local offset covered this tick.
    pub fn translation_delta(&self, dt: f32) -> Vec3 {
        self.axis_speed * dt
    }

    /// Mesh rotation covered this tick.
    pub fn rotation_delta(&self, dt: f32) -> Rotator {
        Rotator::new(self.pitch_speed, self.yaw_speed, self.roll_speed).scaled(dt)
    }

    /// Reflect axis speeds off a surface with the given normal.
    ///
    /// Per axis the factor is `|2n| - 1`: components near 0 or ±1 keep full
    /// magnitude, components near ±0.5 kill the axis. The bounce is undamped.
    pub fn bounce(&mut self, normal: Vec3) {
        let normal = Vec3::new(
            finite_or_zero(normal.x),
            finite_or_zero(normal.y),
            finite_or_zero(normal.z),
        );
        let factor = (normal * 2.0).abs() - Vec3::ONE;
        self.axis_speed *= -factor;
    }

    pub fn speed(&self) -> f32 {
        self.axis_speed.length()
    }
}
