//! Inkball - a tile-based ink-and-ball puzzle simulation
//!
//! Core modules:
//! - `sim`: Simulation core (board, balls, collisions, game state machine)
//! - `config`: JSON level/score configuration
//! - `error`: Load-time error types

pub mod config;
pub mod error;
pub mod sim;

pub use config::{GameConfig, LevelConfig, SimSettings};
pub use error::{ConfigError, LayoutError, LoadError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Edge length of one board cell in pixels
    pub const CELL_SIZE: f32 = 32.0;
    /// Height of the HUD strip above the board (board row 0 starts here)
    pub const TOP_BAR: f32 = 64.0;

    /// Ball sprite edge length; also the wall-contact extent
    pub const BALL_SIZE: f32 = 24.0;
    /// Magnitude of each velocity component for a fresh ball
    pub const BALL_SPEED: f32 = 2.0;

    /// Hole sprites span 2x2 cells, so the centre sits one cell in
    pub const HOLE_CENTER_OFFSET: f32 = 32.0;
    /// Distance from hole centre at which attraction kicks in
    pub const CAPTURE_RADIUS: f32 = 32.0;
    /// Inner radius that triggers the extra shrink and the capture test
    pub const CAPTURE_INNER_RADIUS: f32 = 15.0;
    /// Velocity impulse per pixel of offset toward the hole centre
    pub const HOLE_ATTRACTION: f32 = 0.0065;
    /// Per-tick size multiplier inside the capture radius
    pub const HOLE_SHRINK: f32 = 0.8;
    /// Additional per-tick size multiplier inside the inner radius
    pub const HOLE_INNER_SHRINK: f32 = 0.725;
    /// Size at or below which a ball counts as swallowed
    pub const CAPTURE_SIZE_EPSILON: f32 = 0.1;

    /// Candidate strip geometry (HUD pixels)
    pub const CANDIDATE_STRIP_X: f32 = 10.0;
    pub const CANDIDATE_STRIP_Y: f32 = 20.0;
    pub const CANDIDATE_FIRST_X: f32 = 40.0;

    /// Countdown timer cadence (ms of simulation clock)
    pub const TIMER_STEP_MS: f64 = 1000.0;
    /// Spawn countdown cadence before time scaling (ms)
    pub const SPAWN_STEP_MS: f64 = 100.0;
    /// Amount removed from the spawn countdown per step
    pub const SPAWN_STEP: f32 = 0.1;
    /// Post-win perimeter highlight cadence (ms)
    pub const WIN_STEP_MS: f64 = 67.0;

    /// Default frame rate the headless runner ticks at
    pub const DEFAULT_FPS: u32 = 30;
    /// Default time-scale factor
    pub const DEFAULT_TIME_SCALE: f32 = 100.0;
}

use consts::{CELL_SIZE, TOP_BAR};

/// Convert a grid cell (col, row) to the pixel position of its top-left corner
#[inline]
pub fn cell_to_pixel(col: usize, row: usize) -> Vec2 {
    Vec2::new(col as f32 * CELL_SIZE, TOP_BAR + row as f32 * CELL_SIZE)
}

/// Convert a pixel position to the nearest grid cell (col, row).
///
/// Rounds rather than floors, so a sprite belongs to whichever cell its
/// top-left corner is closest to. May be negative for positions off the board.
#[inline]
pub fn pixel_to_cell(pos: Vec2) -> (i32, i32) {
    let col = (pos.x / CELL_SIZE).round() as i32;
    let row = ((pos.y - TOP_BAR) / CELL_SIZE).round() as i32;
    (col, row)
}
