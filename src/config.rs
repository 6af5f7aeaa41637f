//! Game configuration
//!
//! Levels and score tables come from a JSON file; each level names a layout
//! file resolved relative to the config's directory. All layouts are parsed
//! up front so a bad level aborts startup instead of a level transition.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FPS, DEFAULT_TIME_SCALE};
use crate::error::{ConfigError, LoadError};
use crate::sim::{Board, ScoreTable};

/// One level entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Layout file, relative to the config file
    pub layout: String,
    /// Time limit in seconds
    pub time: i32,
    /// Seconds between spawns
    pub spawn_interval: f32,
    #[serde(rename = "score_increase_from_hole_capture_modifier")]
    pub increase_modifier: f32,
    #[serde(rename = "score_decrease_from_wrong_hole_modifier")]
    pub decrease_modifier: f32,
    /// Colour names of the initial candidate queue, front first
    pub balls: Vec<String>,
}

/// Simulation tuning that is not part of level design
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Compresses the spawn countdown cadence; larger is faster
    pub time_scale: f32,
    /// Ticks per second the driver runs at
    pub fps: u32,
    /// Seed for ball velocities and spawner choice
    pub seed: u64,
    /// Level to begin at (0-based)
    pub start_level: usize,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
            fps: DEFAULT_FPS,
            seed: 0,
            start_level: 0,
        }
    }
}

impl SimSettings {
    /// Length of one tick in milliseconds
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.fps.max(1) as f64
    }
}

/// The whole config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub levels: Vec<LevelConfig>,
    pub score_increase_from_hole_capture: BTreeMap<String, i64>,
    pub score_decrease_from_wrong_hole: BTreeMap<String, i64>,
    #[serde(default)]
    pub settings: SimSettings,
    /// Directory layout paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl GameConfig {
    /// Parse and validate config JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json_str(&json)?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        log::info!(
            "Loaded config {} ({} levels)",
            path.display(),
            config.levels.len()
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for (i, level) in self.levels.iter().enumerate() {
            if level.spawn_interval.is_nan() || level.spawn_interval <= 0.0 {
                return Err(ConfigError::BadSpawnInterval {
                    level: i,
                    value: level.spawn_interval,
                });
            }
        }
        let time_scale = self.settings.time_scale;
        if time_scale.is_nan() || time_scale <= 0.0 {
            return Err(ConfigError::BadTimeScale(time_scale));
        }
        Ok(())
    }

    pub fn score_table(&self) -> ScoreTable {
        ScoreTable::from_named(
            &self.score_increase_from_hole_capture,
            &self.score_decrease_from_wrong_hole,
        )
    }

    /// Absolute-or-relative path of a level's layout file
    pub fn layout_path(&self, level: &LevelConfig) -> PathBuf {
        self.base_dir.join(&level.layout)
    }
}

/// A config together with every level's parsed board, index-aligned
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub config: GameConfig,
    pub boards: Vec<Board>,
}

impl Campaign {
    /// Load a config file and all the layouts it references
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let config = GameConfig::load(path)?;
        let mut layouts = Vec::with_capacity(config.levels.len());
        for level in &config.levels {
            let path = config.layout_path(level);
            let text = std::fs::read_to_string(&path)
                .map_err(|source| LoadError::LayoutIo { path, source })?;
            layouts.push(text);
        }
        let layouts: Vec<&str> = layouts.iter().map(String::as_str).collect();
        Self::from_layouts(config, &layouts)
    }

    /// Pair a config with in-memory layout text, one per level
    pub fn from_layouts(config: GameConfig, layouts: &[&str]) -> Result<Self, LoadError> {
        let mut boards = Vec::with_capacity(config.levels.len());
        for (i, level) in config.levels.iter().enumerate() {
            let text = layouts
                .get(i)
                .ok_or(LoadError::MissingLayout { level: i })?;
            let path = config.layout_path(level);
            let board = Board::parse(text).map_err(|source| LoadError::Layout { path, source })?;
            boards.push(board);
        }
        Ok(Self { config, boards })
    }
}
