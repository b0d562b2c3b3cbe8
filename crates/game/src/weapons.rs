//! Primary weapon: trigger state, fire-rate cooldown, muzzle cycling and
//! the ten-slot inventory.

use engine_core::{Rotator, TickContext};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::services::{ActorHandle, RaycastService, SpawnRequest, SpawnService};

/// Number of weapon slots (keys 1..9 and 0).
pub const WEAPON_SLOTS: usize = 10;

/// Weapon types the craft can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Single bolt from the nose.
    Phaseoid,
    /// Twin wing guns, alternating left and right.
    Pulser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ammo {
    Unlimited,
    Rounds(u32),
}

impl Ammo {
    pub fn is_empty(self) -> bool {
        matches!(self, Ammo::Rounds(0))
    }

    fn consume(&mut self) {
        if let Ammo::Rounds(n) = self {
            *n = n.saturating_sub(1);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponSlot {
    pub kind: WeaponKind,
    pub ammo: Ammo,
}

/// Fixed slot inventory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponInventory {
    slots: [Option<WeaponSlot>; WEAPON_SLOTS],
}

impl WeaponInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pulser with unlimited ammo in slot 0.
    pub fn default_loadout() -> Self {
        let mut inventory = Self::new();
        inventory.add_weapon(WeaponKind::Pulser, Ammo::Unlimited);
        inventory
    }

    /// Put a weapon in the first free slot. Returns the slot, or `None` when full.
    pub fn add_weapon(&mut self, kind: WeaponKind, ammo: Ammo) -> Option<usize> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(WeaponSlot { kind, ammo });
        Some(index)
    }

    pub fn slot(&self, index: usize) -> Option<&WeaponSlot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut WeaponSlot> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.slot(index).is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerState {
    #[default]
    Idle,
    Firing,
}

/// Where a shot leaves the craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Muzzle {
    Left,
    Right,
    Centre,
}

/// Four-step fire cycle: 1 and 3 fire left, 2 and 4 fire right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireCycle(u8);

impl Default for FireCycle {
    fn default() -> Self {
        Self(1)
    }
}

impl FireCycle {
    pub fn value(self) -> u8 {
        self.0
    }

    pub fn muzzle(self) -> Muzzle {
        match self.0 {
            1 | 3 => Muzzle::Left,
            _ => Muzzle::Right,
        }
    }

    pub fn advance(&mut self) {
        self.0 = if self.0 >= 4 { 1 } else { self.0 + 1 };
    }
}

/// Mutable firing state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeaponState {
    /// Selected inventory slot.
    pub selected: usize,
    /// Simulation time of the last shot.
    pub last_fired: f32,
    pub trigger: TriggerState,
    pub cycle: FireCycle,
}

impl WeaponState {
    pub fn press_trigger(&mut self) {
        self.trigger = TriggerState::Firing;
    }

    pub fn release_trigger(&mut self) {
        self.trigger = TriggerState::Idle;
    }

    pub fn is_firing(&self) -> bool {
        self.trigger == TriggerState::Firing
    }
}

/// Fire intervals and muzzle geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    /// Seconds between phaseoid shots.
    pub phaseoid_interval: f32,
    /// Seconds between pulser shots.
    pub pulser_interval: f32,
    /// Sideways distance of the wing muzzles from the craft centre.
    pub muzzle_side_offset: f32,
    /// Forward distance of the wing muzzles.
    pub muzzle_forward_offset: f32,
    /// Forward distance of the nose muzzle.
    pub centre_forward_offset: f32,
    /// Length of the crosshair trace.
    pub trace_length: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            phaseoid_interval: 0.25,
            pulser_interval: 0.25,
            muzzle_side_offset: 105.0,
            muzzle_forward_offset: 50.0,
            centre_forward_offset: 205.0,
            trace_length: 10_000.0,
        }
    }
}

impl WeaponTuning {
    pub fn fire_interval(&self, kind: WeaponKind) -> f32 {
        match kind {
            WeaponKind::Phaseoid => self.phaseoid_interval,
            WeaponKind::Pulser => self.pulser_interval,
        }
    }
}

/// Craft pose as the weapon sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimFrame {
    /// Craft centre.
    pub origin: Vec3,
    /// World rotation of the visual mesh.
    pub rotation: Quat,
    /// Where the crosshair trace starts (nose or chase camera).
    pub trace_start: Vec3,
    pub trace_direction: Vec3,
}

impl AimFrame {
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// A shot that left the muzzle this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotFired {
    pub kind: WeaponKind,
    pub muzzle: Muzzle,
    pub location: Vec3,
    pub rotation: Rotator,
    /// True when the crosshair trace hit something and the shot was steered at it.
    pub aim_corrected: bool,
    pub handle: Option<ActorHandle>,
}

/// Optional weapon module a craft may carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponSystem {
    pub state: WeaponState,
    pub inventory: WeaponInventory,
    pub tuning: WeaponTuning,
}

impl WeaponSystem {
    pub fn new(tuning: WeaponTuning, inventory: WeaponInventory) -> Self {
        Self {
            state: WeaponState::default(),
            inventory,
            tuning,
        }
    }

    /// Switch to `slot` if it holds a weapon.
    pub fn select_slot(&mut self, slot: usize) -> bool {
        if self.inventory.is_occupied(slot) {
            self.state.selected = slot;
            true
        } else {
            false
        }
    }

    pub fn selected_weapon(&self) -> Option<&WeaponSlot> {
        self.inventory.slot(self.state.selected)
    }

    pub fn muzzle_location(&self, aim: &AimFrame, muzzle: Muzzle) -> Vec3 {
        let forward = aim.forward();
        let side = aim.right() * self.tuning.muzzle_side_offset;
        let wing_forward = forward * self.tuning.muzzle_forward_offset;
        match muzzle {
            Muzzle::Left => aim.origin - side + wing_forward,
            Muzzle::Right => aim.origin + side + wing_forward,
            Muzzle::Centre => aim.origin + forward * self.tuning.centre_forward_offset,
        }
    }

    /// Fire if the trigger is held and the cooldown has elapsed.
    ///
    /// Once the cooldown has elapsed the fire cycle advances whether or not a
    /// round was available; `last_fired` only moves when a round was spent.
    pub fn tick(
        &mut self,
        ctx: &TickContext,
        aim: &AimFrame,
        owner: u32,
        raycast: &dyn RaycastService,
        spawner: &mut dyn SpawnService,
    ) -> Option<ShotFired> {
        if !self.state.is_firing() {
            return None;
        }
        let selected = self.state.selected;
        let kind = self.inventory.slot(selected)?.kind;
        if ctx.simulation_time - self.state.last_fired < self.tuning.fire_interval(kind) {
            return None;
        }

        let muzzle = match kind {
            WeaponKind::Phaseoid => Muzzle::Centre,
            WeaponKind::Pulser => self.state.cycle.muzzle(),
        };
        let location = self.muzzle_location(aim, muzzle);
        let target = raycast.raycast(aim.trace_start, aim.trace_direction, self.tuning.trace_length);
        let (rotation, aim_corrected) = aim_rotation(aim, muzzle, location, target);

        let mut shot = None;
        if let Some(slot) = self.inventory.slot_mut(selected) {
            if !slot.ammo.is_empty() {
                slot.ammo.consume();
                let handle = spawner.spawn(SpawnRequest {
                    kind,
                    location,
                    rotation,
                    owner,
                });
                self.state.last_fired = ctx.simulation_time;
                log::debug!(
                    "{:?} fired from {:?} (cycle {}) at t={:.2}",
                    kind,
                    muzzle,
                    self.state.cycle.value(),
                    ctx.simulation_time
                );
                shot = Some(ShotFired {
                    kind,
                    muzzle,
                    location,
                    rotation,
                    aim_corrected,
                    handle,
                });
            }
        }

        self.state.cycle.advance();
        shot
    }
}

/// Wing muzzles steer at the crosshair target when the trace hit something;
/// otherwise (and always for the nose gun) the shot follows the mesh.
fn aim_rotation(aim: &AimFrame, muzzle: Muzzle, location: Vec3, target: Option<Vec3>) -> (Rotator, bool) {
    let uncorrected = Rotator::from_quat(aim.rotation);
    match (muzzle, target) {
        (Muzzle::Left | Muzzle::Right, Some(point)) => {
            let direction = point - location;
            if direction.length_squared() > 1e-6 {
                (Rotator::from_direction(direction), true)
            } else {
                (uncorrected, false)
            }
        }
        _ => (uncorrected, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[derive(Default)]
    struct RecordingSpawner {
        requests: Vec<SpawnRequest>,
    }

    impl SpawnService for RecordingSpawner {
        fn spawn(&mut self, request: SpawnRequest) -> Option<ActorHandle> {
            self.requests.push(request);
            Some(ActorHandle(self.requests.len() as u64))
        }
    }

    struct FixedTrace(Option<Vec3>);

    impl RaycastService for FixedTrace {
        fn raycast(&self, _start: Vec3, _direction: Vec3, _max_distance: f32) -> Option<Vec3> {
            self.0
        }
    }

    fn level_aim() -> AimFrame {
        AimFrame {
            origin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            trace_start: Vec3::new(205.0, 0.0, 0.0),
            trace_direction: Vec3::X,
        }
    }

    fn armed() -> WeaponSystem {
        let mut weapons = WeaponSystem::new(WeaponTuning::default(), WeaponInventory::default_loadout());
        weapons.state.press_trigger();
        weapons
    }

    #[test]
    fn cycle_wraps_after_four_and_alternates_muzzles() {
        let mut weapons = armed();
        let mut spawner = RecordingSpawner::default();
        let miss = FixedTrace(None);

        let mut cycles = Vec::new();
        let mut muzzles = Vec::new();
        for shot in 1..=6 {
            let ctx = TickContext::new(0.25, shot as f32);
            let fired = weapons
                .tick(&ctx, &level_aim(), 7, &miss, &mut spawner)
                .expect("interval elapsed, shot expected");
            muzzles.push(fired.muzzle);
            cycles.push(weapons.state.cycle.value());
        }

        assert_eq!(cycles, vec![2, 3, 4, 1, 2, 3]);
        use Muzzle::{Left as L, Right as R};
        assert_eq!(muzzles, vec![L, R, L, R, L, R]);
        assert_eq!(spawner.requests.len(), 6);
        assert!(spawner.requests.iter().all(|r| r.owner == 7));
    }

    #[test]
    fn cooldown_blocks_until_interval_elapses() {
        let mut weapons = armed();
        let mut spawner = RecordingSpawner::default();
        let miss = FixedTrace(None);

        assert!(weapons.tick(&TickContext::new(0.1, 0.1), &level_aim(), 0, &miss, &mut spawner).is_none());
        assert!(weapons.tick(&TickContext::new(0.1, 1.0), &level_aim(), 0, &miss, &mut spawner).is_some());
        assert!(weapons.tick(&TickContext::new(0.1, 1.1), &level_aim(), 0, &miss, &mut spawner).is_none());
        assert!(weapons.tick(&TickContext::new(0.15, 1.25), &level_aim(), 0, &miss, &mut spawner).is_some());
        assert_eq!(weapons.state.last_fired, 1.25);
    }

    #[test]
    fn released_trigger_never_fires() {
        let mut weapons = armed();
        weapons.state.release_trigger();
        let mut spawner = RecordingSpawner::default();
        let shot = weapons.tick(&TickContext::new(1.0, 5.0), &level_aim(), 0, &FixedTrace(None), &mut spawner);
        assert!(shot.is_none());
        assert_eq!(weapons.state.cycle.value(), 1);
    }

    #[test]
    fn trace_miss_fires_along_mesh_forward() {
        let mut weapons = armed();
        let mut spawner = RecordingSpawner::default();
        let shot = weapons
            .tick(&TickContext::new(1.0, 1.0), &level_aim(), 0, &FixedTrace(None), &mut spawner)
            .expect("shot");
        assert!(!shot.aim_corrected);
        assert_eq!(shot.location, Vec3::new(50.0, -105.0, 0.0));
        let dir = shot.rotation.to_quat() * Vec3::X;
        assert_abs_diff_eq!(dir.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn trace_hit_steers_wing_gun_at_target() {
        let mut weapons = armed();
        let mut spawner = RecordingSpawner::default();
        let target = Vec3::new(1000.0, 0.0, 0.0);
        let shot = weapons
            .tick(&TickContext::new(1.0, 1.0), &level_aim(), 0, &FixedTrace(Some(target)), &mut spawner)
            .expect("shot");
        assert!(shot.aim_corrected);

        let expected = (target - shot.location).normalize();
        let dir = shot.rotation.to_quat() * Vec3::X;
        assert_abs_diff_eq!(dir.x, expected.x, epsilon = 1e-4);
        assert_abs_diff_eq!(dir.y, expected.y, epsilon = 1e-4);
        assert_abs_diff_eq!(dir.z, expected.z, epsilon = 1e-4);
    }

    #[test]
    fn empty_magazine_still_cycles_but_does_not_spawn() {
        let mut inventory = WeaponInventory::new();
        inventory.add_weapon(WeaponKind::Pulser, Ammo::Rounds(1));
        let mut weapons = WeaponSystem::new(WeaponTuning::default(), inventory);
        weapons.state.press_trigger();
        let mut spawner = RecordingSpawner::default();
        let miss = FixedTrace(None);

        assert!(weapons.tick(&TickContext::new(1.0, 1.0), &level_aim(), 0, &miss, &mut spawner).is_some());
        assert!(weapons.tick(&TickContext::new(1.0, 2.0), &level_aim(), 0, &miss, &mut spawner).is_none());

        assert_eq!(spawner.requests.len(), 1);
        assert_eq!(weapons.state.last_fired, 1.0);
        assert_eq!(weapons.state.cycle.value(), 3);
        assert_eq!(weapons.selected_weapon().map(|s| s.ammo), Some(Ammo::Rounds(0)));
    }

    #[test]
    fn slot_selection_requires_a_weapon() {
        let mut weapons = armed();
        assert!(!weapons.select_slot(3));
        assert!(!weapons.select_slot(WEAPON_SLOTS));
        assert_eq!(weapons.state.selected, 0);

        let slot = weapons
            .inventory
            .add_weapon(WeaponKind::Phaseoid, Ammo::Unlimited)
            .expect("free slot");
        assert_eq!(slot, 1);
        assert!(weapons.select_slot(slot));

        let mut spawner = RecordingSpawner::default();
        let shot = weapons
            .tick(&TickContext::new(1.0, 1.0), &level_aim(), 0, &FixedTrace(Some(Vec3::new(500.0, 50.0, 0.0))), &mut spawner)
            .expect("shot");
        assert_eq!(shot.muzzle, Muzzle::Centre);
        assert_eq!(shot.location, Vec3::new(205.0, 0.0, 0.0));
        assert!(!shot.aim_corrected);
    }

    #[test]
    fn inventory_reports_full() {
        let mut inventory = WeaponInventory::new();
        for _ in 0..WEAPON_SLOTS {
            assert!(inventory.add_weapon(WeaponKind::Phaseoid, Ammo::Unlimited).is_some());
        }
        assert_eq!(inventory.add_weapon(WeaponKind::Pulser, Ammo::Unlimited), None);
    }
}
