//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - Time only enters through the tick length
//! - Seeded RNG only
//! - Stable iteration order (insertion order for balls, holes and lines)

pub mod board;
pub mod collision;
pub mod color;
pub mod line;
pub mod state;
pub mod tick;

pub use board::{Board, Placement, Tile, TileKind};
pub use collision::{
    CaptureOutcome, hole_capture, line_bounce, reflect_velocity, resolve_capture, wall_bounce,
};
pub use color::{BallColor, ScoreTable};
pub use line::{Line, LineDraft, Segment};
pub use state::{
    Ball, Candidate, GamePhase, GameState, Hole, ScoreModifiers, Snapshot, Spawner, Timers,
};
pub use tick::{PointerButton, PointerEvent, TickInput, tick};
