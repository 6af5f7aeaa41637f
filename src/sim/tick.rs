//! Per-frame simulation tick
//!
//! Advances the game by one frame. Everything time-based runs off the
//! simulation clock, which only moves while a level is being played or
//! counted down, so pausing freezes every timer along with the balls.

use glam::Vec2;

use super::collision::{hole_capture, line_bounce, resolve_capture, wall_bounce};
use super::line::LineDraft;
use super::state::{GamePhase, GameState, candidate_slot_x};
use crate::consts::*;

/// Which pointer button an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Draws lines
    Primary,
    /// Erases lines
    Secondary,
}

/// A pointer event delivered with a tick.
///
/// `modifier` is the erase modifier key; holding it turns a primary drag
/// into an erase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press {
        pos: Vec2,
        button: PointerButton,
        modifier: bool,
    },
    Drag {
        pos: Vec2,
        button: PointerButton,
        modifier: bool,
    },
    Release {
        button: PointerButton,
        modifier: bool,
    },
}

#[inline]
fn erases(button: PointerButton, modifier: bool) -> bool {
    button == PointerButton::Secondary || modifier
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
    /// Reload the current level and zero the score
    pub restart: bool,
    /// Pointer events since the previous tick, in order
    pub pointer: Vec<PointerEvent>,
}

/// Advance the game state by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    if input.restart {
        state.restart();
        return;
    }

    // A toggle consumes the tick
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.draft = None;
                log::debug!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed");
                return;
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Playing => {
            state.timers.clock_ms += dt_ms;
            handle_pointer(state, &input.pointer);
            update_timer(state);
            update_spawns(state);
            slide_candidates(state);
            update_balls(state);
            check_level_end(state);
        }
        GamePhase::Won => {
            state.timers.clock_ms += dt_ms;
            update_win_countdown(state);
        }
        GamePhase::Paused | GamePhase::Lost | GamePhase::Ended => {}
    }
}

fn handle_pointer(state: &mut GameState, events: &[PointerEvent]) {
    for event in events {
        match *event {
            PointerEvent::Press { pos, .. } => {
                state.draft = Some(LineDraft::start(pos));
            }
            PointerEvent::Drag {
                pos,
                button,
                modifier,
            } => {
                let Some(draft) = state.draft.as_mut() else {
                    continue;
                };
                draft.extend_to(pos);
                if erases(button, modifier) {
                    let eraser = &draft.line;
                    let before = state.lines.len();
                    state.lines.retain(|line| !line.intersects(eraser));
                    let erased = before - state.lines.len();
                    if erased > 0 {
                        log::debug!("Erased {erased} line(s)");
                    }
                }
            }
            PointerEvent::Release { button, modifier } => {
                let Some(draft) = state.draft.take() else {
                    continue;
                };
                if !erases(button, modifier) && !draft.line.is_empty() {
                    log::debug!("Committed line with {} segments", draft.line.segments.len());
                    state.lines.push(draft.line);
                }
            }
        }
    }
}

/// Level timer: one second off per second of play, at most once per tick
fn update_timer(state: &mut GameState) {
    let timers = &mut state.timers;
    if timers.clock_ms - timers.last_second_ms >= TIMER_STEP_MS {
        timers.last_second_ms = timers.clock_ms;
        state.time_remaining -= 1;
    }
}

/// Spawn countdown: runs only while candidates are waiting
fn update_spawns(state: &mut GameState) {
    if state.candidates.is_empty() {
        return;
    }
    let step_ms = SPAWN_STEP_MS / f64::from(state.settings.time_scale);
    let timers = &mut state.timers;
    if timers.clock_ms - timers.last_spawn_step_ms < step_ms {
        return;
    }
    timers.last_spawn_step_ms = timers.clock_ms;

    state.spawn_countdown -= SPAWN_STEP;
    if state.spawn_countdown <= 0.0 {
        state.spawn_countdown = state.level().spawn_interval;
        state.spawn_ball();
    }
}

/// Slide each candidate one pixel left until it reaches its slot
fn slide_candidates(state: &mut GameState) {
    for (slot, candidate) in state.candidates.iter_mut().enumerate() {
        let target = candidate_slot_x(slot);
        if candidate.x > target {
            candidate.x = (candidate.x - 1.0).max(target);
        }
    }
}

fn update_balls(state: &mut GameState) {
    let modifiers = state.modifiers();
    let mut requeued = Vec::new();

    for ball in state.balls.iter_mut() {
        wall_bounce(ball, &state.board, &state.scores);

        if let Some(hole_color) = hole_capture(ball, &state.holes) {
            let outcome = resolve_capture(ball, hole_color, &modifiers);
            state.score += outcome.delta;
            log::info!(
                "{} ball captured by {} hole ({:+.1})",
                ball.color.name(),
                hole_color.name(),
                outcome.delta
            );
            if outcome.requeue {
                requeued.push(ball.color);
            }
            continue;
        }

        line_bounce(ball, &mut state.lines);
        ball.pos += ball.vel;
    }

    state.balls.retain(|b| !b.consumed);
    for color in requeued {
        state.requeue(color);
    }
}

fn check_level_end(state: &mut GameState) {
    if state.balls.is_empty() && state.candidates.is_empty() {
        state.phase = GamePhase::Won;
        state.timers.last_win_step_ms = state.timers.clock_ms;
        log::info!(
            "Level {} cleared with {}s left, score {:.1}",
            state.level_index + 1,
            state.time_remaining,
            state.score
        );
    } else if state.time_remaining <= 0 {
        state.phase = GamePhase::Lost;
        state.draft = None;
        log::info!(
            "Level {} lost with {} ball(s) in play, score {:.1}",
            state.level_index + 1,
            state.balls.len(),
            state.score
        );
    }
}

/// Convert leftover seconds into points, one step per gate, then move on
fn update_win_countdown(state: &mut GameState) {
    if state.time_remaining > 0 {
        let timers = &mut state.timers;
        if timers.clock_ms - timers.last_win_step_ms >= WIN_STEP_MS {
            timers.last_win_step_ms = timers.clock_ms;
            state.win_step += 1;
            state.time_remaining -= 1;
            state.score += 1.0;
        }
    }
    if state.time_remaining <= 0 {
        state.advance_level();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_to_pixel;
    use crate::sim::color::BallColor;
    use crate::sim::state::Ball;
    use crate::sim::state::tests::{CONFIG, LAYOUT, state_with, test_state};
    use proptest::prelude::*;

    const FRAME_MS: f64 = 1000.0 / 30.0;

    /// Two empty levels: clearing is immediate, so only the countdown runs
    const EMPTY_CAMPAIGN: &str = r#"{
        "levels": [
            {
                "layout": "a.txt",
                "time": 3,
                "spawn_interval": 5,
                "score_increase_from_hole_capture_modifier": 1.0,
                "score_decrease_from_wrong_hole_modifier": 1.0,
                "balls": []
            },
            {
                "layout": "b.txt",
                "time": 5,
                "spawn_interval": 5,
                "score_increase_from_hole_capture_modifier": 1.0,
                "score_decrease_from_wrong_hole_modifier": 1.0,
                "balls": []
            }
        ],
        "score_increase_from_hole_capture": {},
        "score_decrease_from_wrong_hole": {}
    }"#;

    const EMPTY_BOX: &str = "XXXXX\nX   X\nX   X\nXXXXX";

    fn pause() -> TickInput {
        TickInput {
            pause: true,
            ..Default::default()
        }
    }

    fn pointer(events: Vec<PointerEvent>) -> TickInput {
        TickInput {
            pointer: events,
            ..Default::default()
        }
    }

    fn stroke(from: Vec2, to: Vec2, button: PointerButton) -> Vec<PointerEvent> {
        vec![
            PointerEvent::Press {
                pos: from,
                button,
                modifier: false,
            },
            PointerEvent::Drag {
                pos: to,
                button,
                modifier: false,
            },
            PointerEvent::Release {
                button,
                modifier: false,
            },
        ]
    }

    #[test]
    fn test_tick_pause() {
        let mut state = test_state();
        tick(&mut state, &pause(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.balls.clone();
        let time = state.time_remaining;
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), 1000.0);
        }
        assert_eq!(state.balls, frozen);
        assert_eq!(state.time_remaining, time);
        assert_eq!(state.timers.clock_ms, 0.0);

        tick(&mut state, &pause(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.balls, frozen);
    }

    #[test]
    fn test_pause_cancels_draft() {
        let mut state = test_state();
        state.draft = Some(LineDraft::start(Vec2::new(100.0, 100.0)));
        tick(&mut state, &pause(), FRAME_MS);
        assert!(state.draft.is_none());
    }

    #[test]
    fn test_timer_once_per_second() {
        let mut state = test_state();
        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.time_remaining, 120);
        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.time_remaining, 119);
        // A long frame still only takes one second off
        tick(&mut state, &TickInput::default(), 5000.0);
        assert_eq!(state.time_remaining, 118);
    }

    #[test]
    fn test_spawn_after_countdown() {
        let mut state = state_with(CONFIG, &["XXXXXX\nXS0  X\nX    X\nX    X\nXXXXXX"]);
        assert!(state.balls.is_empty());

        let mut ticks = 0;
        while state.candidates.len() == 3 && ticks < 200 {
            tick(&mut state, &TickInput::default(), FRAME_MS);
            ticks += 1;
        }
        // 10s countdown at 0.1 per step
        assert!((99..=102).contains(&ticks), "spawned after {ticks} ticks");
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].color, BallColor::Blue);
        assert_eq!(state.spawn_countdown, 10.0);
    }

    #[test]
    fn test_candidates_slide_to_slots() {
        let mut state = test_state();
        state.candidates.pop_front();
        // Second candidate has 62px to travel
        for _ in 0..70 {
            tick(&mut state, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(state.candidates[0].x, candidate_slot_x(0));
        assert_eq!(state.candidates[1].x, candidate_slot_x(1));
    }

    #[test]
    fn test_lost_when_time_runs_out() {
        let mut state = test_state();
        state.time_remaining = 1;
        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.time_remaining, 0);
        assert_eq!(state.phase, GamePhase::Lost);

        let frozen = state.balls.clone();
        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.balls, frozen);
        assert_eq!(state.phase, GamePhase::Lost);
    }

    #[test]
    fn test_won_then_countdown_into_next_level() {
        let mut state = state_with(EMPTY_CAMPAIGN, &[EMPTY_BOX, EMPTY_BOX]);
        let input = TickInput::default();

        tick(&mut state, &input, 67.0);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.win_highlights().is_some());

        // 3 seconds left, one per step
        for expected in [2, 1] {
            tick(&mut state, &input, 67.0);
            assert_eq!(state.time_remaining, expected);
        }
        tick(&mut state, &input, 67.0);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_remaining, 5);
        assert_eq!(state.score, 3.0);

        tick(&mut state, &input, 67.0);
        assert_eq!(state.phase, GamePhase::Won);
        for _ in 0..5 {
            tick(&mut state, &input, 67.0);
        }
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.score, 8.0);

        tick(&mut state, &input, 67.0);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.score, 8.0);
    }

    #[test]
    fn test_matching_capture_scores() {
        let mut state = test_state();
        let hole = state.holes[0];
        let ball = Ball::new(
            hole.pos + Vec2::splat(20.0),
            BallColor::Green,
            Vec2::ZERO,
            state.scores(),
        );
        state.balls = vec![ball];

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert!(state.balls.is_empty());
        assert_eq!(state.score, 50.0);
        assert_eq!(state.candidates.len(), 3);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_wrong_capture_requeues() {
        let mut state = test_state();
        let hole = state.holes[0];
        let ball = Ball::new(
            hole.pos + Vec2::splat(20.0),
            BallColor::Orange,
            Vec2::ZERO,
            state.scores(),
        );
        state.balls = vec![ball];

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert!(state.balls.is_empty());
        assert_eq!(state.score, -25.0);
        assert_eq!(state.candidates.len(), 4);
        assert_eq!(state.candidates.back().map(|c| c.color), Some(BallColor::Orange));
    }

    #[test]
    fn test_drawn_line_deflects_ball_and_vanishes() {
        let mut state = test_state();
        let ball = Ball::new(
            cell_to_pixel(2, 2),
            BallColor::Blue,
            Vec2::new(2.0, 0.0),
            state.scores(),
        );
        state.balls = vec![ball];

        let line = stroke(
            Vec2::new(86.0, 100.0),
            Vec2::new(86.0, 180.0),
            PointerButton::Primary,
        );
        tick(&mut state, &pointer(line), FRAME_MS);

        assert!(state.lines.is_empty());
        assert_eq!(state.balls[0].vel, Vec2::new(-2.0, 0.0));
        assert_eq!(state.balls[0].pos.x, 62.0);
    }

    #[test]
    fn test_draw_and_erase() {
        let mut state = test_state();
        state.balls.clear();

        let line = stroke(
            Vec2::new(200.0, 100.0),
            Vec2::new(200.0, 150.0),
            PointerButton::Primary,
        );
        tick(&mut state, &pointer(line), FRAME_MS);
        assert_eq!(state.lines.len(), 1);

        // A press and release without movement draws nothing
        let dot = stroke(
            Vec2::new(50.0, 50.0),
            Vec2::new(50.0, 50.0),
            PointerButton::Primary,
        );
        tick(&mut state, &pointer(dot), FRAME_MS);
        assert_eq!(state.lines.len(), 1);

        let miss = stroke(
            Vec2::new(300.0, 120.0),
            Vec2::new(350.0, 120.0),
            PointerButton::Secondary,
        );
        tick(&mut state, &pointer(miss), FRAME_MS);
        assert_eq!(state.lines.len(), 1);

        let eraser = stroke(
            Vec2::new(180.0, 120.0),
            Vec2::new(220.0, 120.0),
            PointerButton::Secondary,
        );
        tick(&mut state, &pointer(eraser), FRAME_MS);
        assert!(state.lines.is_empty());
        assert!(state.draft.is_none());
    }

    #[test]
    fn test_modifier_drag_erases() {
        let mut state = test_state();
        state.balls.clear();
        let line = stroke(
            Vec2::new(200.0, 100.0),
            Vec2::new(200.0, 150.0),
            PointerButton::Primary,
        );
        tick(&mut state, &pointer(line), FRAME_MS);

        let events = vec![
            PointerEvent::Press {
                pos: Vec2::new(180.0, 120.0),
                button: PointerButton::Primary,
                modifier: true,
            },
            PointerEvent::Drag {
                pos: Vec2::new(220.0, 120.0),
                button: PointerButton::Primary,
                modifier: true,
            },
            PointerEvent::Release {
                button: PointerButton::Primary,
                modifier: true,
            },
        ];
        tick(&mut state, &pointer(events), FRAME_MS);
        assert!(state.lines.is_empty());
    }

    #[test]
    fn test_pointer_ignored_while_paused() {
        let mut state = test_state();
        tick(&mut state, &pause(), FRAME_MS);
        let line = stroke(
            Vec2::new(200.0, 100.0),
            Vec2::new(200.0, 150.0),
            PointerButton::Primary,
        );
        tick(&mut state, &pointer(line), FRAME_MS);
        assert!(state.lines.is_empty());
        assert!(state.draft.is_none());
    }

    #[test]
    fn test_restart_input() {
        let mut state = test_state();
        state.score = 40.0;
        state.phase = GamePhase::Lost;
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = state_with(CONFIG, &[LAYOUT]);
        let mut state2 = state_with(CONFIG, &[LAYOUT]);
        for _ in 0..400 {
            tick(&mut state1, &TickInput::default(), FRAME_MS);
            tick(&mut state2, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(state1.balls, state2.balls);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.snapshot(), state2.snapshot());
    }

    proptest! {
        #[test]
        fn prop_pause_freezes_everything(
            warmup in 0usize..60,
            paused_ticks in 1usize..50,
            dt in 1.0f64..2000.0,
        ) {
            let mut state = test_state();
            for _ in 0..warmup {
                tick(&mut state, &TickInput::default(), FRAME_MS);
            }
            prop_assume!(state.phase == GamePhase::Playing);
            tick(&mut state, &pause(), FRAME_MS);

            let before = state.snapshot();
            let balls = state.balls.clone();
            for _ in 0..paused_ticks {
                tick(&mut state, &TickInput::default(), dt);
            }
            prop_assert_eq!(state.snapshot(), before);
            prop_assert_eq!(&state.balls, &balls);
        }
    }
}
