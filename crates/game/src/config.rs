//! Game configuration (flight handling, weapons, levels, simulation). Loaded
//! from config.ron at startup.

use engine_core::Rotator;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::flight::FlightTuning;
use crate::level::LevelSettings;
use crate::weapons::WeaponTuning;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Headless run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSettings {
    /// Fixed simulation rate.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f64,
    /// Seconds of simulated flight the binary runs for.
    #[serde(default = "default_duration")]
    pub duration_seconds: f32,
    /// Seed for rock placement and drift.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Radius of the craft's collision sphere.
    #[serde(default = "default_craft_radius")]
    pub craft_radius: f32,
    #[serde(default = "default_rock_radius")]
    pub rock_radius: f32,
    /// Rocks spawn within this distance of the origin.
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: f32,
    /// Rocks never spawn closer than this to the craft.
    #[serde(default = "default_spawn_clearance")]
    pub spawn_clearance: f32,
    #[serde(default = "default_projectile_speed")]
    pub projectile_speed: f32,
    /// Seconds before a projectile that hit nothing is removed.
    #[serde(default = "default_projectile_lifetime")]
    pub projectile_lifetime: f32,
    #[serde(default = "default_map_name")]
    pub map_name: String,
    /// Orientation of the player start.
    #[serde(default)]
    pub spawn_rotation: Rotator,
}

fn default_tick_rate() -> f64 {
    60.0
}
fn default_duration() -> f32 {
    30.0
}
fn default_seed() -> u64 {
    0x5eed
}
fn default_craft_radius() -> f32 {
    120.0
}
fn default_rock_radius() -> f32 {
    400.0
}
fn default_spawn_radius() -> f32 {
    20_000.0
}
fn default_spawn_clearance() -> f32 {
    4_000.0
}
fn default_projectile_speed() -> f32 {
    12_000.0
}
fn default_projectile_lifetime() -> f32 {
    2.0
}
fn default_map_name() -> String {
    "Asteroids".to_string()
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
            duration_seconds: default_duration(),
            seed: default_seed(),
            craft_radius: default_craft_radius(),
            rock_radius: default_rock_radius(),
            spawn_radius: default_spawn_radius(),
            spawn_clearance: default_spawn_clearance(),
            projectile_speed: default_projectile_speed(),
            projectile_lifetime: default_projectile_lifetime(),
            map_name: default_map_name(),
            spawn_rotation: Rotator::ZERO,
        }
    }
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub flight: FlightTuning,
    #[serde(default)]
    pub weapons: WeaponTuning,
    #[serde(default)]
    pub level: LevelSettings,
    #[serde(default)]
    pub sim: SimSettings,
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&data)
    }

    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(data)?)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let flight = &self.flight;
        let tunables = [
            ("flight.acceleration", flight.acceleration),
            ("flight.turn_speed", flight.turn_speed),
            ("flight.return_speed", flight.return_speed),
            ("flight.max_speed", flight.max_speed),
            ("flight.min_speed", flight.min_speed),
            ("flight.deceleration", flight.deceleration),
            ("flight.axis_smoothing", flight.axis_smoothing),
        ];
        if let Some((name, _)) = tunables.iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(format!("{name} must be finite")));
        }
        if flight.min_speed > flight.max_speed {
            return Err(invalid(format!(
                "flight.min_speed ({}) exceeds flight.max_speed ({})",
                flight.min_speed, flight.max_speed
            )));
        }

        let weapons = &self.weapons;
        for (name, interval) in [
            ("weapons.phaseoid_interval", weapons.phaseoid_interval),
            ("weapons.pulser_interval", weapons.pulser_interval),
        ] {
            if !(interval >= 0.0) {
                return Err(invalid(format!("{name} must be a non-negative number")));
            }
        }
        if !(weapons.trace_length > 0.0) {
            return Err(invalid("weapons.trace_length must be positive"));
        }

        if self.level.num_levels == 0 {
            return Err(invalid("level.num_levels must be at least 1"));
        }

        let sim = &self.sim;
        if !(sim.tick_rate_hz > 0.0) || !sim.tick_rate_hz.is_finite() {
            return Err(invalid("sim.tick_rate_hz must be positive"));
        }
        if !(sim.duration_seconds >= 0.0) {
            return Err(invalid("sim.duration_seconds must be non-negative"));
        }
        if !(sim.craft_radius > 0.0) || !(sim.rock_radius > 0.0) {
            return Err(invalid("sim.craft_radius and sim.rock_radius must be positive"));
        }
        if !(sim.spawn_radius > sim.spawn_clearance) {
            return Err(invalid("sim.spawn_radius must exceed sim.spawn_clearance"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.flight.acceleration, 1000.0);
        assert_eq!(config.weapons.muzzle_side_offset, 105.0);
        assert_eq!(config.level.num_levels, 10);
        assert_eq!(config.sim.tick_rate_hz, 60.0);
    }

    #[test]
    fn partial_ron_fills_in_defaults() {
        let config = GameConfig::from_ron_str(
            "(flight: (max_speed: 2500.0), sim: (seed: 7, spawn_rotation: (pitch: 0.0, yaw: 90.0, roll: 0.0)))",
        )
            .expect("valid RON");
        assert_eq!(config.flight.max_speed, 2500.0);
        assert_eq!(config.flight.min_speed, -4000.0);
        assert_eq!(config.sim.seed, 7);
        assert_eq!(config.sim.spawn_rotation, Rotator::new(0.0, 90.0, 0.0));
        assert_eq!(config.sim.map_name, "Asteroids");
        assert_eq!(config.weapons, WeaponTuning::default());
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = GameConfig::from_ron_str("(flight: (max_speed: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::from_path(Path::new("/nonexistent/spacerocks/config.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn inverted_speed_bounds_are_rejected() {
        let mut config = GameConfig::default();
        config.flight.min_speed = 100.0;
        config.flight.max_speed = -100.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn nan_tunable_and_zero_rates_are_rejected() {
        let mut config = GameConfig::default();
        config.flight.turn_speed = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.sim.tick_rate_hz = 0.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.level.num_levels = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.weapons.pulser_interval = -0.1;
        assert!(config.validate().is_err());
    }
}
