//! Load-time errors
//!
//! The simulation itself never fails; everything that can go wrong happens
//! while turning config and layout text into a playable level.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while parsing a level layout
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,

    #[error("'{glyph}' at row {row}, column {col} is missing its colour character")]
    MissingColor { glyph: char, row: usize, col: usize },

    #[error("'{glyph}' at row {row}, column {col} has unknown colour '{color}'")]
    UnknownColor {
        glyph: char,
        color: char,
        row: usize,
        col: usize,
    },
}

/// Errors produced while reading or validating the game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config defines no levels")]
    NoLevels,

    #[error("level {level} has non-positive spawn_interval {value}")]
    BadSpawnInterval { level: usize, value: f32 },

    #[error("time_scale must be positive, got {0}")]
    BadTimeScale(f32),

    #[error("level index {index} out of range ({count} levels)")]
    LevelOutOfRange { index: usize, count: usize },
}

/// Anything that can stop a level from loading
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read layout {path}: {source}")]
    LayoutIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no layout supplied for level {level}")]
    MissingLayout { level: usize },

    #[error("bad layout {path}: {source}")]
    Layout {
        path: PathBuf,
        #[source]
        source: LayoutError,
    },
}
