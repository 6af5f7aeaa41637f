//! Game state and core simulation types
//!
//! Everything the renderer reads lives here: the board, entities, player
//! lines, the candidate queue and the level/score bookkeeping.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::color::{BallColor, ScoreTable};
use super::line::{Line, LineDraft};
use crate::config::{Campaign, LevelConfig, SimSettings};
use crate::consts::*;
use crate::error::ConfigError;
use crate::{cell_to_pixel, pixel_to_cell};

/// Current phase of the level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen by the player
    Paused,
    /// Board cleared; perimeter countdown running before the next level
    Won,
    /// Timer ran out with balls still in play
    Lost,
    /// Final level cleared
    Ended,
}

/// A ball in play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left corner of the sprite in pixels
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub color: BallColor,
    /// Sprite edge length; shrinks while being swallowed by a hole
    pub size: f32,
    /// Score for a correct capture, copied from the table for `color`
    pub increase_score: f32,
    /// Penalty for a wrong capture, copied from the table for `color`
    pub decrease_score: f32,
    /// Swallowed this tick; removed from play at the end of the tick
    pub consumed: bool,
}

impl Ball {
    pub fn new(pos: Vec2, color: BallColor, vel: Vec2, scores: &ScoreTable) -> Self {
        Self {
            pos,
            vel,
            color,
            size: BALL_SIZE,
            increase_score: scores.increase(color),
            decrease_score: scores.decrease(color),
            consumed: false,
        }
    }

    /// Centre of the sprite at its current size
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Grid cell the ball currently belongs to
    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        pixel_to_cell(self.pos)
    }

    /// Adopt a new colour along with its score entries
    pub fn recolor(&mut self, color: BallColor, scores: &ScoreTable) {
        self.color = color;
        self.increase_score = scores.increase(color);
        self.decrease_score = scores.decrease(color);
    }
}

/// Random diagonal velocity with each component independently +/-2
pub fn random_velocity<R: Rng>(rng: &mut R) -> Vec2 {
    let mut component = || {
        if rng.random_bool(0.5) {
            BALL_SPEED
        } else {
            -BALL_SPEED
        }
    };
    let x = component();
    let y = component();
    Vec2::new(x, y)
}

/// A capture hole (2x2 cells)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub pos: Vec2,
    pub color: BallColor,
}

impl Hole {
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(HOLE_CENTER_OFFSET)
    }
}

/// A ball entry point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub pos: Vec2,
    pub color: BallColor,
}

/// A ball waiting in the candidate strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub color: BallColor,
    /// Current x in the HUD strip; slides left toward its slot
    pub x: f32,
}

/// Resting x of candidate slot `slot`
#[inline]
pub fn candidate_slot_x(slot: usize) -> f32 {
    CANDIDATE_STRIP_X + slot as f32 * CELL_SIZE
}

/// Per-level multipliers applied when a capture is scored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreModifiers {
    pub increase: f32,
    pub decrease: f32,
}

impl From<&LevelConfig> for ScoreModifiers {
    fn from(level: &LevelConfig) -> Self {
        Self {
            increase: level.increase_modifier,
            decrease: level.decrease_modifier,
        }
    }
}

/// Last-fired timestamps of the real-time gates, on the simulation clock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    /// Milliseconds of unpaused play since the game was created
    pub clock_ms: f64,
    pub last_second_ms: f64,
    pub last_spawn_step_ms: f64,
    pub last_win_step_ms: f64,
}

impl Timers {
    /// Re-arm every gate at the current clock
    pub fn rearm(&mut self) {
        self.last_second_ms = self.clock_ms;
        self.last_spawn_step_ms = self.clock_ms;
        self.last_win_step_ms = self.clock_ms;
    }
}

/// Read-only summary for HUDs, logs and the headless runner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub level: usize,
    pub phase: GamePhase,
    pub score: f32,
    pub time_remaining: i32,
    pub spawn_countdown: f32,
    pub balls: usize,
    pub candidates: Vec<BallColor>,
    pub lines: usize,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    campaign: Campaign,
    pub(crate) scores: ScoreTable,
    pub settings: SimSettings,
    rng: Pcg32,
    /// Current level (0-based)
    pub level_index: usize,
    pub phase: GamePhase,
    pub board: Board,
    /// Balls in play, in spawn order
    pub balls: Vec<Ball>,
    /// Balls waiting to spawn (front spawns next)
    pub candidates: VecDeque<Candidate>,
    pub holes: Vec<Hole>,
    pub spawners: Vec<Spawner>,
    /// Committed player lines, oldest first
    pub lines: Vec<Line>,
    /// Line currently being drawn
    pub draft: Option<LineDraft>,
    /// Whole seconds left on the level timer
    pub time_remaining: i32,
    /// Seconds until the next spawn
    pub spawn_countdown: f32,
    pub score: f32,
    /// Steps taken by the post-win perimeter highlight
    pub win_step: usize,
    pub timers: Timers,
}

impl GameState {
    /// Create a game at `settings.start_level`
    pub fn new(campaign: Campaign, settings: SimSettings) -> Result<Self, ConfigError> {
        let time_scale = settings.time_scale;
        if time_scale.is_nan() || time_scale <= 0.0 {
            return Err(ConfigError::BadTimeScale(time_scale));
        }
        let count = campaign.config.levels.len();
        if settings.start_level >= count {
            return Err(ConfigError::LevelOutOfRange {
                index: settings.start_level,
                count,
            });
        }
        let scores = campaign.config.score_table();
        let board = campaign.boards[settings.start_level].clone();
        let mut state = Self {
            scores,
            rng: Pcg32::seed_from_u64(settings.seed),
            level_index: settings.start_level,
            phase: GamePhase::Playing,
            board,
            balls: Vec::new(),
            candidates: VecDeque::new(),
            holes: Vec::new(),
            spawners: Vec::new(),
            lines: Vec::new(),
            draft: None,
            time_remaining: 0,
            spawn_countdown: 0.0,
            score: 0.0,
            win_step: 0,
            timers: Timers::default(),
            settings,
            campaign,
        };
        state.setup_level();
        Ok(state)
    }

    /// Config for the current level
    pub fn level(&self) -> &LevelConfig {
        &self.campaign.config.levels[self.level_index]
    }

    pub fn level_count(&self) -> usize {
        self.campaign.config.levels.len()
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn modifiers(&self) -> ScoreModifiers {
        self.level().into()
    }

    /// (Re)build the current level from its config and board.
    /// Score is left alone so it carries across levels.
    pub fn setup_level(&mut self) {
        let level = self.campaign.config.levels[self.level_index].clone();
        self.board = self.campaign.boards[self.level_index].clone();

        self.balls.clear();
        for placement in self.board.balls.clone() {
            let vel = random_velocity(&mut self.rng);
            let pos = cell_to_pixel(placement.col, placement.row);
            self.balls
                .push(Ball::new(pos, placement.color, vel, &self.scores));
        }
        self.holes = self
            .board
            .holes
            .iter()
            .map(|p| Hole {
                pos: cell_to_pixel(p.col, p.row),
                color: p.color,
            })
            .collect();
        self.spawners = self
            .board
            .spawners
            .iter()
            .map(|p| Spawner {
                pos: cell_to_pixel(p.col, p.row),
                color: p.color,
            })
            .collect();
        self.candidates = level
            .balls
            .iter()
            .enumerate()
            .map(|(i, name)| Candidate {
                color: BallColor::from_name(name),
                x: CANDIDATE_FIRST_X + i as f32 * CELL_SIZE,
            })
            .collect();

        self.lines.clear();
        self.draft = None;
        self.time_remaining = level.time;
        self.spawn_countdown = level.spawn_interval;
        self.win_step = 0;
        self.phase = GamePhase::Playing;
        self.timers.rearm();

        log::info!(
            "Level {} loaded: {} balls, {} candidates, {} holes, {} spawners, {}s",
            self.level_index + 1,
            self.balls.len(),
            self.candidates.len(),
            self.holes.len(),
            self.spawners.len(),
            self.time_remaining
        );
    }

    /// Reload the current level from scratch and zero the score
    pub fn restart(&mut self) {
        log::info!("Restarting level {}", self.level_index + 1);
        self.setup_level();
        self.score = 0.0;
    }

    /// Move on after a win: next level, or end the run after the last one
    pub fn advance_level(&mut self) {
        if self.level_index + 1 < self.level_count() {
            self.level_index += 1;
            self.setup_level();
        } else {
            log::info!("All levels cleared, final score {:.1}", self.score);
            self.phase = GamePhase::Ended;
        }
    }

    /// Spawn the front candidate at a random spawner.
    ///
    /// Returns false (and changes nothing) when there is no candidate or
    /// the level has no spawners.
    pub fn spawn_ball(&mut self) -> bool {
        if self.spawners.is_empty() {
            if !self.candidates.is_empty() {
                log::warn!("Level {} has candidates but no spawners", self.level_index + 1);
            }
            return false;
        }
        let Some(candidate) = self.candidates.pop_front() else {
            return false;
        };
        let spawner = self.spawners[self.rng.random_range(0..self.spawners.len())];
        let vel = random_velocity(&mut self.rng);
        log::debug!(
            "Spawned {} ball at ({}, {})",
            candidate.color.name(),
            spawner.pos.x,
            spawner.pos.y
        );
        self.balls
            .push(Ball::new(spawner.pos, candidate.color, vel, &self.scores));
        true
    }

    /// Push a ball back onto the end of the candidate queue
    pub fn requeue(&mut self, color: BallColor) {
        let x = candidate_slot_x(self.candidates.len() + 2);
        self.candidates.push_back(Candidate { color, x });
    }

    /// The two highlighted perimeter cells of the post-win animation
    pub fn win_highlights(&self) -> Option<[(usize, usize); 2]> {
        if self.phase != GamePhase::Won {
            return None;
        }
        let ring = self.board.perimeter();
        if ring.is_empty() {
            return None;
        }
        let n = ring.len();
        Some([ring[self.win_step % n], ring[(self.win_step + n / 2) % n]])
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    pub fn is_lost(&self) -> bool {
        self.phase == GamePhase::Lost
    }

    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level: self.level_index,
            phase: self.phase,
            score: self.score,
            time_remaining: self.time_remaining,
            spawn_countdown: self.spawn_countdown,
            balls: self.balls.len(),
            candidates: self.candidates.iter().map(|c| c.color).collect(),
            lines: self.lines.len(),
        }
    }
}
