//! Headless simulation: the craft flying through a field of drifting space
//! rocks, with projectiles that break them and level progression.

use std::collections::HashMap;

use engine_core::{
    Lifetime, Projectile, SpaceRock, SpawnedBy, TickContext, Time, Transform, Velocity,
};
use glam::Vec3;
use hecs::{Entity, World};
use input::{InputBindings, InputState};
use physics::{CollisionGroup, ColliderHandle, PhysicsBody, PhysicsWorld};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{GameConfig, SimSettings};
use crate::craft::{Craft, CraftAction, CraftId, TickReport};
use crate::flight::ControlInput;
use crate::level::{LevelAdvance, LevelProgression};
use crate::pilot::ScriptedPilot;
use crate::services::{
    ActorHandle, HitEvent, MotionService, MoveOutcome, RaycastService, SpawnRequest, SpawnService,
};
use crate::weapons::{WeaponInventory, WeaponKind, WeaponSystem};

/// Id of the player craft.
const PLAYER_CRAFT: CraftId = CraftId(0);

/// Running totals for a simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimStats {
    pub ticks: u64,
    pub shots_fired: u32,
    pub rocks_destroyed: u32,
    pub craft_hits: u32,
    pub levels_cleared: u32,
    /// Every level of the map has been cleared.
    pub completed: bool,
}

fn actor_handle(entity: Entity) -> ActorHandle {
    ActorHandle(entity.to_bits().get())
}

/// Sweeps the craft's collision sphere through the rock field.
struct CraftSweep<'a> {
    physics: &'a PhysicsWorld,
    rocks: &'a HashMap<ColliderHandle, Entity>,
    radius: f32,
}

impl MotionService for CraftSweep<'_> {
    fn sweep_local_offset(&mut self, root: &Transform, local_offset: Vec3) -> MoveOutcome {
        let delta = root.local_to_world_offset(local_offset);
        let result = self
            .physics
            .sweep_sphere(root.position, self.radius, delta, CollisionGroup::craft());
        MoveOutcome {
            position: root.position + result.travelled,
            hit: result.hit.map(|hit| HitEvent {
                other: self.rocks.get(&hit.collider).copied().map(actor_handle),
                location: hit.location,
                normal: hit.normal,
                // Rocks are moved kinematically; there is no solver to report an impulse.
                impulse: Vec3::ZERO,
            }),
        }
    }
}

/// Crosshair trace against the rock field.
struct AimTrace<'a> {
    physics: &'a PhysicsWorld,
}

impl RaycastService for AimTrace<'_> {
    fn raycast(&self, start: Vec3, direction: Vec3, max_distance: f32) -> Option<Vec3> {
        self.physics
            .raycast(start, direction, max_distance, CollisionGroup::aim_trace())
            .map(|hit| hit.point)
    }
}

/// Turns spawn requests into projectile entities.
struct ProjectileSpawner<'a> {
    world: &'a mut World,
    speed: f32,
    lifetime: f32,
}

impl SpawnService for ProjectileSpawner<'_> {
    fn spawn(&mut self, request: SpawnRequest) -> Option<ActorHandle> {
        let rotation = request.rotation.to_quat();
        let direction = rotation * Vec3::X;
        let entity = self.world.spawn((
            Projectile,
            request.kind,
            Transform::from_position_rotation(request.location, rotation),
            Velocity::new(direction * self.speed),
            Lifetime::new(self.lifetime),
            SpawnedBy(request.owner),
        ));
        Some(actor_handle(entity))
    }
}

pub struct Simulation {
    settings: SimSettings,
    world: World,
    physics: PhysicsWorld,
    craft: Craft,
    time: Time,
    levels: LevelProgression,
    rng: StdRng,
    rocks: HashMap<ColliderHandle, Entity>,
    stats: SimStats,
}

impl Simulation {
    pub fn new(config: GameConfig) -> Self {
        let GameConfig {
            flight,
            weapons,
            level,
            sim,
        } = config;

        let facing = sim.spawn_rotation.to_quat() * Vec3::X;
        let craft = Craft::spawn(PLAYER_CRAFT, flight, Vec3::ZERO, facing)
            .with_weapons(WeaponSystem::new(weapons, WeaponInventory::default_loadout()));

        let mut simulation = Self {
            world: World::new(),
            physics: PhysicsWorld::new(),
            craft,
            time: Time::with_fixed_rate(sim.tick_rate_hz),
            levels: LevelProgression::new(level, sim.map_name.clone()),
            rng: StdRng::seed_from_u64(sim.seed),
            rocks: HashMap::new(),
            stats: SimStats::default(),
            settings: sim,
        };
        simulation.spawn_level_rocks();
        simulation
    }

    pub fn craft(&self) -> &Craft {
        &self.craft
    }

    pub fn craft_mut(&mut self) -> &mut Craft {
        &mut self.craft
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn levels(&self) -> &LevelProgression {
        &self.levels
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.time.elapsed_seconds()
    }

    pub fn rock_count(&self) -> usize {
        self.rocks.len()
    }

    pub fn rock_entities(&self) -> Vec<Entity> {
        self.rocks.values().copied().collect()
    }

    pub fn projectile_count(&self) -> usize {
        self.world.query::<&Projectile>().iter().count()
    }

    /// Ticks needed to cover the configured duration.
    pub fn scheduled_ticks(&self) -> u64 {
        let ticks = f64::from(self.settings.duration_seconds) * self.settings.tick_rate_hz;
        ticks.ceil().max(0.0) as u64
    }

    /// Place a rock drifting with `velocity`.
    pub fn spawn_rock_at(&mut self, position: Vec3, velocity: Vec3) -> Entity {
        let radius = self.settings.rock_radius;
        let collider = self.physics.add_environment_sphere(position, radius);
        let entity = self.world.spawn((
            SpaceRock,
            Transform::from_position(position),
            Velocity::new(velocity),
            PhysicsBody::new(collider),
        ));
        self.rocks.insert(collider, entity);
        self.physics.update_query_pipeline();
        entity
    }

    /// Remove a rock and its collider. Returns false if it was already gone.
    pub fn destroy_rock(&mut self, entity: Entity) -> bool {
        let Ok(collider) = self.world.get::<&PhysicsBody>(entity).map(|body| body.collider) else {
            return false;
        };
        self.rocks.remove(&collider);
        self.physics.remove_collider(collider);
        if let Err(e) = self.world.despawn(entity) {
            log::warn!("Rock {:?} vanished before despawn: {}", entity, e);
        }
        self.stats.rocks_destroyed += 1;
        true
    }

    fn spawn_level_rocks(&mut self) {
        let count = self.levels.rock_count();
        let speed = self.levels.spawn_speed();
        let origin = self.craft.position();
        let (near, far) = (self.settings.spawn_clearance, self.settings.spawn_radius);
        for _ in 0..count {
            let direction = random_direction(&mut self.rng);
            let distance = if near < far {
                self.rng.gen_range(near..far)
            } else {
                far
            };
            let drift = random_direction(&mut self.rng) * speed;
            self.spawn_rock_at(origin + direction * distance, drift);
        }
        log::info!(
            "Level {}: spawned {} rocks drifting at {:.0}",
            self.levels.current_level(),
            count,
            speed
        );
    }

    /// Run one fixed tick with this frame's input.
    pub fn step(&mut self, input: &InputState, bindings: &InputBindings) -> TickReport {
        let ctx = self.time.tick();

        for event in input.action_events(bindings) {
            if let Some(action) = CraftAction::from_event(event) {
                self.craft.handle_action(action);
            }
        }
        let control = ControlInput::from(input.flight_axes(bindings));

        let report = {
            let mut motion = CraftSweep {
                physics: &self.physics,
                rocks: &self.rocks,
                radius: self.settings.craft_radius,
            };
            let aim = AimTrace {
                physics: &self.physics,
            };
            let mut spawner = ProjectileSpawner {
                world: &mut self.world,
                speed: self.settings.projectile_speed,
                lifetime: self.settings.projectile_lifetime,
            };
            self.craft.tick(&ctx, &control, &mut motion, &aim, &mut spawner)
        };

        self.stats.ticks += 1;
        if report.hit.is_some() {
            self.stats.craft_hits += 1;
        }
        if report.shot.is_some() {
            self.stats.shots_fired += 1;
        }

        self.drift_rocks(&ctx);
        self.advance_projectiles(&ctx);
        self.physics.update_query_pipeline();

        if self.rocks.is_empty() && !self.stats.completed {
            self.stats.levels_cleared += 1;
            match self.levels.advance() {
                LevelAdvance::Next(_) => self.spawn_level_rocks(),
                LevelAdvance::Completed => self.stats.completed = true,
            }
        }

        report
    }

    /// Drive the simulation with a scripted pilot for `ticks` ticks, stopping
    /// early once the map is completed.
    pub fn run(&mut self, pilot: &mut ScriptedPilot, bindings: &InputBindings, ticks: u64) -> SimStats {
        let mut input = InputState::new();
        for _ in 0..ticks {
            input.begin_frame();
            pilot.feed(self.time.elapsed_seconds(), &mut input);
            self.step(&input, bindings);
            if self.stats.completed {
                break;
            }
        }
        self.stats
    }

    /// Move rocks and wrap any that leave the play volume to the far side.
    fn drift_rocks(&mut self, ctx: &TickContext) {
        let limit = self.settings.spawn_radius;
        for (_, (transform, velocity, body)) in self
            .world
            .query_mut::<(&mut Transform, &Velocity, &PhysicsBody)>()
            .with::<&SpaceRock>()
        {
            transform.translate(velocity.linear * ctx.delta_seconds);
            if transform.position.length() > limit {
                transform.position = -transform.position.clamp_length_max(limit);
            }
            self.physics.set_collider_position(body.collider, transform.position);
        }
    }

    /// Move projectiles along their path, breaking the first rock each one
    /// crosses, and expire the rest.
    fn advance_projectiles(&mut self, ctx: &TickContext) {
        let dt = ctx.delta_seconds;
        let mut spent = Vec::new();
        let mut struck = Vec::new();

        for (entity, (transform, velocity, lifetime)) in self
            .world
            .query_mut::<(&mut Transform, &Velocity, &mut Lifetime)>()
            .with::<&Projectile>()
        {
            let from = transform.position;
            let to = from + velocity.linear * dt;
            if let Some(hit) = self
                .physics
                .raycast_segment(from, to, CollisionGroup::projectile())
            {
                spent.push(entity);
                if let Some(&rock) = self.rocks.get(&hit.collider) {
                    struck.push(rock);
                }
                continue;
            }
            transform.position = to;
            if lifetime.update(dt) {
                spent.push(entity);
            }
        }

        for entity in spent {
            if let Err(e) = self.world.despawn(entity) {
                log::warn!("Projectile {:?} already despawned: {}", entity, e);
            }
        }
        for rock in struck {
            if self.destroy_rock(rock) {
                log::debug!("Rock {:?} destroyed, {} left", rock, self.rocks.len());
            }
        }
    }
}

/// Uniformly distributed unit vector.
fn random_direction(rng: &mut StdRng) -> Vec3 {
    for _ in 0..16 {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let length_squared = candidate.length_squared();
        if length_squared > 1e-4 && length_squared <= 1.0 {
            return candidate / length_squared.sqrt();
        }
    }
    Vec3::X
}

/// Kind of weapon that fired a projectile, if the entity is one.
pub fn projectile_kind(world: &World, entity: Entity) -> Option<WeaponKind> {
    world.get::<&WeaponKind>(entity).ok().map(|kind| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelSettings;
    use input::{ElementState, MouseButton};

    fn config() -> GameConfig {
        GameConfig::default()
    }

    fn fire_held() -> InputState {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        input
    }

    #[test]
    fn first_level_spawns_rocks_clear_of_the_craft() {
        let sim = Simulation::new(config());
        let settings = SimSettings::default();
        assert_eq!(sim.rock_count(), 2);
        assert_eq!(sim.physics.collider_count(), 2);
        for rock in sim.rock_entities() {
            let position = sim.world().get::<&Transform>(rock).expect("rock transform").position;
            assert!(position.length() >= settings.spawn_clearance - 1e-3);
            assert!(position.length() <= settings.spawn_radius + 1e-3);
        }
    }

    #[test]
    fn same_seed_places_rocks_identically() {
        let positions = |sim: &Simulation| {
            let mut found: Vec<_> = sim
                .world()
                .query::<&Transform>()
                .with::<&SpaceRock>()
                .iter()
                .map(|(_, t)| t.position.to_array())
                .collect();
            found.sort_by(|a, b| a[0].total_cmp(&b[0]));
            found
        };
        assert_eq!(positions(&Simulation::new(config())), positions(&Simulation::new(config())));
    }

    #[test]
    fn projectile_breaks_rock_in_line_of_fire() {
        let mut sim = Simulation::new(config());
        let bindings = InputBindings::default_flight();
        let target = sim.spawn_rock_at(Vec3::new(3000.0, 0.0, 0.0), Vec3::ZERO);

        let mut input = fire_held();
        for _ in 0..60 {
            sim.step(&input, &bindings);
            input.begin_frame();
        }

        assert!(!sim.world().contains(target));
        assert!(sim.stats().shots_fired >= 1);
        assert!(sim.stats().rocks_destroyed >= 1);
    }

    #[test]
    fn projectiles_carry_owner_and_kind() {
        let mut sim = Simulation::new(config());
        let bindings = InputBindings::default_flight();
        let input = fire_held();
        let mut shot = None;
        for _ in 0..30 {
            if let Some(fired) = sim.step(&input, &bindings).shot {
                shot = Some(fired);
                break;
            }
        }
        let handle = shot.and_then(|s| s.handle).expect("a projectile was spawned");
        let entity = Entity::from_bits(handle.0).expect("valid entity bits");
        assert_eq!(projectile_kind(sim.world(), entity), Some(WeaponKind::Pulser));
        let owner = *sim.world().get::<&SpawnedBy>(entity).expect("owner tag");
        assert_eq!(owner, SpawnedBy(PLAYER_CRAFT.0));
    }

    #[test]
    fn craft_bounces_off_rock_and_keeps_root_level() {
        let mut sim = Simulation::new(config());
        let bindings = InputBindings::default_flight();
        sim.spawn_rock_at(Vec3::new(600.0, 0.0, 0.0), Vec3::ZERO);
        sim.craft_mut().kinematics.axis_speed = Vec3::new(2000.0, 0.0, 0.0);

        let input = InputState::new();
        for _ in 0..10 {
            sim.step(&input, &bindings);
        }

        assert!(sim.stats().craft_hits >= 1);
        assert!(sim.craft().kinematics.axis_speed.x < 0.0);
        assert!(sim.craft().position().x < 600.0 - 400.0 - 120.0 + 1.0);
        assert_eq!(sim.craft().root.rotation, glam::Quat::IDENTITY);
    }

    #[test]
    fn clearing_rocks_advances_level() {
        let mut sim = Simulation::new(config());
        let bindings = InputBindings::default_flight();
        for rock in sim.rock_entities() {
            assert!(sim.destroy_rock(rock));
        }
        sim.step(&InputState::new(), &bindings);

        assert_eq!(sim.levels().current_level(), 2);
        assert_eq!(sim.rock_count(), 3);
        assert_eq!(sim.stats().levels_cleared, 1);
    }

    #[test]
    fn clearing_last_level_completes_the_run() {
        let mut config = config();
        config.level = LevelSettings {
            num_levels: 1,
            ..Default::default()
        };
        let mut sim = Simulation::new(config);
        let bindings = InputBindings::default_flight();
        for rock in sim.rock_entities() {
            sim.destroy_rock(rock);
        }
        sim.step(&InputState::new(), &bindings);
        assert!(sim.stats().completed);
        assert_eq!(sim.rock_count(), 0);
    }

    #[test]
    fn rocks_wrap_inside_play_volume() {
        let mut sim = Simulation::new(config());
        let bindings = InputBindings::default_flight();
        let limit = SimSettings::default().spawn_radius;
        let rock = sim.spawn_rock_at(Vec3::new(limit - 10.0, 0.0, 0.0), Vec3::new(6000.0, 0.0, 0.0));
        sim.step(&InputState::new(), &bindings);
        let position = sim.world().get::<&Transform>(rock).expect("rock").position;
        assert!(position.x < 0.0);
        assert!(position.length() <= limit + 1e-2);
    }

    #[test]
    fn scheduled_ticks_cover_duration() {
        let mut config = config();
        config.sim.duration_seconds = 2.5;
        config.sim.tick_rate_hz = 60.0;
        assert_eq!(Simulation::new(config).scheduled_ticks(), 150);
    }
}
