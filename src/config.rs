use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app_dirs::AppDirs;

/// Look-back range, in clicks before a phase threshold, in which the prompt may appear.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AppearWindow {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// clicks needed to get through an activity screen
    pub max_activity_clicks: u32,
    /// missed prompts per phase before burning out
    pub missed_threshold: u32,
    /// starting odds (1 in n) of the prompt appearing on a click
    pub initial_prompt_chance: u32,
    /// seconds without a work click before the secret ending
    pub secret_time_threshold: f64,
    /// seconds until the work is due
    pub due_duration: f64,
    /// seconds the end screen stays up before the game restarts
    pub reset_delay_after_game_over: f64,
    pub prompt_appear_window: AppearWindow,
    pub day_phase_thresholds: [u32; 3],
    pub work_item_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_activity_clicks: 10,
            missed_threshold: 3,
            initial_prompt_chance: 4,
            secret_time_threshold: 30.0,
            due_duration: 180.0,
            reset_delay_after_game_over: 5.0,
            prompt_appear_window: AppearWindow {
                low: 5.0,
                high: 25.0,
            },
            day_phase_thresholds: [50, 125, 175],
            work_item_count: 600,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must be a positive number of seconds, got {value}")]
    InvalidDuration { field: &'static str, value: f64 },

    #[error("prompt appear window must satisfy 0 <= low <= high, got ({low}, {high})")]
    InvalidWindow { low: f64, high: f64 },

    #[error("day phase thresholds must be positive and ascending, got {0:?}")]
    InvalidThresholds([u32; 3]),
}

impl GameConfig {
    /// Rejects configurations the session cannot run with. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_activity_clicks", self.max_activity_clicks)?;
        positive("missed_threshold", self.missed_threshold)?;
        positive("initial_prompt_chance", self.initial_prompt_chance)?;

        duration("secret_time_threshold", self.secret_time_threshold)?;
        duration("due_duration", self.due_duration)?;
        duration(
            "reset_delay_after_game_over",
            self.reset_delay_after_game_over,
        )?;

        let AppearWindow { low, high } = self.prompt_appear_window;
        if !(low.is_finite() && high.is_finite() && low >= 0.0 && low <= high) {
            return Err(ConfigError::InvalidWindow { low, high });
        }

        let t = self.day_phase_thresholds;
        if t[0] == 0 || t[0] >= t[1] || t[1] >= t[2] {
            return Err(ConfigError::InvalidThresholds(t));
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::NotPositive { field });
    }
    Ok(())
}

fn duration(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::InvalidDuration { field, value });
    }
    Ok(())
}

pub trait ConfigStore {
    fn load(&self) -> GameConfig;
    fn save(&self, cfg: &GameConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("overdue_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> GameConfig {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<GameConfig>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                    GameConfig::default()
                }
            },
            Err(_) => GameConfig::default(),
        }
    }

    fn save(&self, cfg: &GameConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
