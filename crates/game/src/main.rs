//! SpaceRocks - headless flight run: a scripted pilot flies the craft through
//! the rock field and the run is summarised on exit.

use anyhow::{Context, Result};
use game::{GameConfig, ScriptedPilot, Simulation};
use input::InputBindings;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => GameConfig::from_path(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => GameConfig::load(),
    };
    config.validate().context("Config rejected")?;

    println!("SpaceRocks (headless)");
    println!("  W/S thrust  A/D strafe  Space/Ctrl vertical");
    println!("  Arrows pitch/yaw  Q/E roll  LMB fire  1-0 weapon slot  V view  L light");

    log::info!(
        "Starting {} for {:.1}s at {} Hz (seed {})",
        config.sim.map_name,
        config.sim.duration_seconds,
        config.sim.tick_rate_hz,
        config.sim.seed
    );

    let bindings = InputBindings::default_flight();
    let mut pilot = ScriptedPilot::patrol(&bindings);
    let mut sim = Simulation::new(config);
    let ticks = sim.scheduled_ticks();
    let stats = sim.run(&mut pilot, &bindings, ticks);

    let craft = sim.craft();
    log::info!(
        "Finished after {} ticks ({:.2}s): level {}, {} shots, {} rocks destroyed, {} collisions{}",
        stats.ticks,
        sim.elapsed_seconds(),
        sim.levels().current_level(),
        stats.shots_fired,
        stats.rocks_destroyed,
        stats.craft_hits,
        if stats.completed { ", map complete" } else { "" }
    );
    println!(
        "Craft ended at {:.0?} moving {:.0} u/s, {} rocks and {} projectiles in flight",
        craft.position(),
        craft.kinematics.speed(),
        sim.rock_count(),
        sim.projectile_count()
    );

    Ok(())
}
