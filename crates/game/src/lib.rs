//! SpaceRocks: six-axis craft flight, weapons and a headless rock-field
//! simulation.

pub mod config;
pub mod craft;
pub mod flight;
pub mod level;
pub mod pilot;
pub mod services;
pub mod sim;
pub mod weapons;

pub use config::{ConfigError, GameConfig, SimSettings};
pub use craft::{Craft, CraftAction, CraftId, TickReport, ViewMode};
pub use flight::{ControlInput, CraftBasis, FlightTuning, Kinematics};
pub use level::{LevelAdvance, LevelProgression, LevelSettings};
pub use pilot::ScriptedPilot;
pub use sim::{SimStats, Simulation};
