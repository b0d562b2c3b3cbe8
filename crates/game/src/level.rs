//! Level progression: each level spawns more, faster space rocks.

use serde::{Deserialize, Serialize};

/// Progression parameters for one map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Number of levels per map.
    pub num_levels: u32,
    /// Rock speed at level 1.
    pub rock_start_speed: f32,
    /// Added to rock speed per level.
    pub rock_speed_increment: f32,
    /// Rocks spawned at level 1.
    pub rocks_at_start: u32,
    /// Extra rocks per level.
    pub rock_increment: u32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            num_levels: 10,
            rock_start_speed: 1000.0,
            rock_speed_increment: 100.0,
            rocks_at_start: 2,
            rock_increment: 1,
        }
    }
}

/// Result of clearing a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelAdvance {
    /// Moved on to this level.
    Next(u32),
    /// The last level was cleared.
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelProgression {
    pub settings: LevelSettings,
    pub map_name: String,
    current_level: u32,
    rock_speed: f32,
    rock_count: u32,
    completed: bool,
}

impl LevelProgression {
    pub fn new(settings: LevelSettings, map_name: impl Into<String>) -> Self {
        Self {
            settings,
            map_name: map_name.into(),
            current_level: 1,
            rock_speed: settings.rock_start_speed,
            rock_count: settings.rocks_at_start,
            completed: false,
        }
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Speed new rocks are spawned with.
    pub fn spawn_speed(&self) -> f32 {
        self.rock_speed
    }

    /// Rocks to spawn at the start of the current level.
    pub fn rock_count(&self) -> u32 {
        self.rock_count
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Move to the next level, or report that the map is done.
    pub fn advance(&mut self) -> LevelAdvance {
        if self.completed || self.current_level >= self.settings.num_levels {
            self.completed = true;
            log::info!("{}: all {} levels cleared", self.map_name, self.settings.num_levels);
            return LevelAdvance::Completed;
        }
        self.current_level += 1;
        self.rock_speed += self.settings.rock_speed_increment;
        self.rock_count = self.rock_count.saturating_add(self.settings.rock_increment);
        log::info!(
            "{}: level {} ({} rocks at {:.0})",
            self.map_name,
            self.current_level,
            self.rock_count,
            self.rock_speed
        );
        LevelAdvance::Next(self.current_level)
    }
}
