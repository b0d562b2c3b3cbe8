//! The player craft: a fixed root that only translates, a visual mesh that
//! carries the orientation, the flight model and an optional weapon.

use engine_core::{Rotator, TickContext, Transform};
use glam::Vec3;
use input::{Action, ActionEvent, ActionPhase};

use crate::flight::{ControlInput, CraftBasis, FlightTuning, Kinematics};
use crate::services::{HitEvent, MotionService, RaycastService, SpawnService};
use crate::weapons::{AimFrame, ShotFired, WeaponSystem, WeaponTuning};

/// Chase camera spring arm length behind the mesh.
const CHASE_ARM_LENGTH: f32 = 1000.0;
/// Camera socket height above the arm.
const CHASE_SOCKET_HEIGHT: f32 = 160.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CraftId(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    FirstPerson,
    #[default]
    ThirdPerson,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::FirstPerson => ViewMode::ThirdPerson,
            ViewMode::ThirdPerson => ViewMode::FirstPerson,
        }
    }
}

/// Discrete commands the craft reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftAction {
    ToggleView,
    ToggleLight,
    FireBegin,
    FireEnd,
    SelectWeapon(u8),
}

impl CraftAction {
    /// Map an input event to a craft command. Toggles and slot keys act on
    /// press; fire acts on both edges.
    pub fn from_event(event: ActionEvent) -> Option<Self> {
        match (event.action, event.phase) {
            (Action::PrimaryFire, ActionPhase::Pressed) => Some(CraftAction::FireBegin),
            (Action::PrimaryFire, ActionPhase::Released) => Some(CraftAction::FireEnd),
            (Action::ToggleView, ActionPhase::Pressed) => Some(CraftAction::ToggleView),
            (Action::ToggleLight, ActionPhase::Pressed) => Some(CraftAction::ToggleLight),
            (Action::SelectWeapon(slot), ActionPhase::Pressed) => Some(CraftAction::SelectWeapon(slot)),
            _ => None,
        }
    }
}

/// What happened during one craft tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub hit: Option<HitEvent>,
    pub shot: Option<ShotFired>,
}

pub struct Craft {
    pub id: CraftId,
    pub tuning: FlightTuning,
    pub kinematics: Kinematics,
    /// Collision root. Only ever translated.
    pub root: Transform,
    /// Mesh transform relative to the root. Carries all of the orientation.
    pub mesh: Transform,
    pub view: ViewMode,
    pub spotlight_on: bool,
    pub weapons: Option<WeaponSystem>,
}

impl Craft {
    /// Spawn at `location` facing `facing`, at rest, in first-person view.
    pub fn spawn(id: CraftId, tuning: FlightTuning, location: Vec3, facing: Vec3) -> Self {
        let mut craft = Self {
            id,
            tuning,
            kinematics: Kinematics::default(),
            root: Transform::from_position(location),
            mesh: Transform::from_position_rotation(Vec3::ZERO, Rotator::from_direction(facing).to_quat()),
            view: ViewMode::default(),
            spotlight_on: false,
            weapons: None,
        };
        craft.root.reset_rotation();
        craft.handle_action(CraftAction::ToggleView);
        log::info!("Craft {} spawned at {:?} ({:?})", id.0, location, craft.view);
        craft
    }

    pub fn with_weapons(mut self, weapons: WeaponSystem) -> Self {
        self.weapons = Some(weapons);
        self
    }

    /// World transform of the visual mesh.
    pub fn mesh_transform(&self) -> Transform {
        Transform::from_position_rotation(self.root.position, self.root.rotation * self.mesh.rotation)
    }

    pub fn basis(&self) -> CraftBasis {
        let mesh = self.mesh_transform();
        CraftBasis {
            forward: mesh.forward(),
            right: mesh.right(),
            up: mesh.up(),
        }
    }

    /// Mesh orientation relative to the root, in degrees.
    pub fn mesh_angles(&self) -> Rotator {
        self.mesh.rotator()
    }

    pub fn position(&self) -> Vec3 {
        self.root.position
    }

    /// Update angular speeds, then thrust along the current mesh basis.
    pub fn apply_controls(&mut self, input: &ControlInput, dt: f32) {
        let angles = self.mesh_angles();
        let basis = self.basis();
        self.kinematics.apply_rotation(&self.tuning, input, angles, dt);
        self.kinematics.apply_thrusters(&self.tuning, input, &basis, dt);
        log::trace!(
            "Craft {} axis speed {:?} pitch {:.1} yaw {:.1} roll {:.1}",
            self.id.0,
            self.kinematics.axis_speed,
            self.kinematics.pitch_speed,
            self.kinematics.yaw_speed,
            self.kinematics.roll_speed
        );
    }

    /// Rotate the mesh, then sweep the root by this tick's displacement.
    pub fn integrate(&mut self, dt: f32, motion: &mut dyn MotionService) -> Option<HitEvent> {
        self.mesh.add_local_rotation(self.kinematics.rotation_delta(dt));

        let offset = self.kinematics.translation_delta(dt);
        let outcome = motion.sweep_local_offset(&self.root, offset);
        self.root.position = outcome.position;
        outcome.hit
    }

    /// Bounce off whatever was hit and clear any rotation the root picked up.
    pub fn on_hit(&mut self, hit: &HitEvent) {
        self.kinematics.bounce(hit.normal);
        self.root.reset_rotation();
        log::debug!(
            "Craft {} hit {:?} at {:?}, normal {:?}",
            self.id.0,
            hit.other,
            hit.location,
            hit.normal
        );
    }

    pub fn handle_action(&mut self, action: CraftAction) {
        match action {
            CraftAction::ToggleView => self.view = self.view.toggled(),
            CraftAction::ToggleLight => self.spotlight_on = !self.spotlight_on,
            CraftAction::FireBegin => {
                if let Some(weapons) = self.weapons.as_mut() {
                    weapons.state.press_trigger();
                }
            }
            CraftAction::FireEnd => {
                if let Some(weapons) = self.weapons.as_mut() {
                    weapons.state.release_trigger();
                }
            }
            CraftAction::SelectWeapon(slot) => {
                if let Some(weapons) = self.weapons.as_mut() {
                    if !weapons.select_slot(usize::from(slot)) {
                        log::debug!("Weapon slot {} is empty", slot);
                    }
                }
            }
        }
    }

    /// Where the crosshair trace starts for the current view.
    pub fn aim_frame(&self, weapon_tuning: &WeaponTuning) -> AimFrame {
        let mesh = self.mesh_transform();
        let forward = mesh.forward();
        let trace_start = match self.view {
            ViewMode::FirstPerson => mesh.position + forward * weapon_tuning.centre_forward_offset,
            ViewMode::ThirdPerson => {
                mesh.position - forward * CHASE_ARM_LENGTH + mesh.up() * CHASE_SOCKET_HEIGHT
            }
        };
        AimFrame {
            origin: mesh.position,
            rotation: mesh.rotation,
            trace_start,
            trace_direction: forward,
        }
    }

    /// One simulation tick: controls, integration, bounce, weapon.
    pub fn tick(
        &mut self,
        ctx: &TickContext,
        input: &ControlInput,
        motion: &mut dyn MotionService,
        raycast: &dyn RaycastService,
        spawner: &mut dyn SpawnService,
    ) -> TickReport {
        let dt = ctx.delta_seconds;
        self.apply_controls(input, dt);

        let hit = self.integrate(dt, motion);
        if let Some(hit) = &hit {
            self.on_hit(hit);
        }

        let owner = self.id.0;
        let aim = self.weapons.as_ref().map(|weapons| self.aim_frame(&weapons.tuning));
        let shot = match (self.weapons.as_mut(), aim) {
            (Some(weapons), Some(aim)) => weapons.tick(ctx, &aim, owner, raycast, spawner),
            _ => None,
        };

        TickReport { hit, shot }
    }
}
