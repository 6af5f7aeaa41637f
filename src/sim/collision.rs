//! Collision detection and response
//!
//! Three independent checks run against each ball every tick:
//! grid walls, player lines, and holes. Each takes only the data it needs
//! so it can be exercised without a full game state.

use glam::Vec2;

use super::board::Board;
use super::color::{BallColor, ScoreTable};
use super::line::{Line, Segment};
use super::state::{Ball, Hole, ScoreModifiers};
use crate::consts::*;

/// Neighbour offsets (col, row) in the order they are checked:
/// up, left, right, down, then the diagonals left-down, right-down,
/// left-up, right-up.
const NEIGHBOURS: [(i32, i32); 8] = [
    (0, -1),
    (-1, 0),
    (1, 0),
    (0, 1),
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, -1),
];

/// Bounce a ball off the walls around its current cell.
///
/// All eight neighbours are tested in a fixed order and each test reads the
/// velocity as left by the previous one, so a corner can flip a component
/// twice in one tick. Colored walls repaint the ball. Neighbours off the
/// board never collide. Returns true if any wall was hit.
pub fn wall_bounce(ball: &mut Ball, board: &Board, scores: &ScoreTable) -> bool {
    let (col, row) = ball.cell();
    let mut hit = false;

    for (dc, dr) in NEIGHBOURS {
        let Some(tile) = board.get(col + dc, row + dr) else {
            continue;
        };
        if !tile.is_wall() {
            continue;
        }

        let wall = tile.pos();
        let top = ball.pos.y;
        let left = ball.pos.x;
        let bottom = top + BALL_SIZE;
        let right = left + BALL_SIZE;

        let x_contact = match dc {
            -1 => left <= wall.x + BALL_SIZE && ball.vel.x < 0.0,
            1 => right >= wall.x && ball.vel.x > 0.0,
            _ => true,
        };
        let y_contact = match dr {
            -1 => top <= wall.y + BALL_SIZE && ball.vel.y < 0.0,
            1 => bottom >= wall.y && ball.vel.y > 0.0,
            _ => true,
        };
        if !(x_contact && y_contact) {
            continue;
        }

        if dc != 0 {
            ball.vel.x = -ball.vel.x;
        }
        if dr != 0 {
            ball.vel.y = -ball.vel.y;
        }
        if let Some(color) = tile.wall_color() {
            ball.recolor(color, scores);
        }
        hit = true;
    }

    hit
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Pick the segment normal on the same side as `center`
pub fn facing_normal(segment: &Segment, center: Vec2) -> Vec2 {
    let (n1, n2) = segment.normals();
    let mid = segment.midpoint();
    if (mid + n1).distance(center) < (mid + n2).distance(center) {
        n1
    } else {
        n2
    }
}

/// Whether a point is inside the thin ellipse around a segment
/// (sum of distances to both endpoints within `tolerance` of its length)
#[inline]
fn near_segment(point: Vec2, segment: &Segment, tolerance: f32) -> bool {
    point.distance(segment.a) + point.distance(segment.b) < segment.length() + tolerance
}

/// Bounce a ball off the first player line it is about to touch.
///
/// The probe point is the ball centre one tick ahead. Lines are scanned
/// oldest first; the first hit reflects the velocity and removes that whole
/// line. Returns true on a hit.
pub fn line_bounce(ball: &mut Ball, lines: &mut Vec<Line>) -> bool {
    let center = ball.center();
    let probe = center + ball.vel;
    let tolerance = ball.size / 2.0;

    let hit = lines.iter().enumerate().find_map(|(i, line)| {
        line.segments
            .iter()
            .find(|seg| near_segment(probe, seg, tolerance))
            .map(|seg| (i, *seg))
    });

    let Some((index, segment)) = hit else {
        return false;
    };
    let normal = facing_normal(&segment, center);
    ball.vel = reflect_velocity(ball.vel, normal);
    lines.remove(index);
    true
}

/// Pull a ball toward the first hole within capture range and shrink it.
///
/// Returns the hole's colour once the ball has been swallowed, in which case
/// the ball is marked consumed and its size is zero.
pub fn hole_capture(ball: &mut Ball, holes: &[Hole]) -> Option<BallColor> {
    let center = ball.center();

    let hole = holes
        .iter()
        .find(|h| h.center().distance(center) < CAPTURE_RADIUS)?;
    let to_hole = hole.center() - center;
    let distance = to_hole.length();

    ball.vel += to_hole * HOLE_ATTRACTION;
    ball.size *= HOLE_SHRINK;

    if distance < CAPTURE_INNER_RADIUS {
        ball.size *= HOLE_INNER_SHRINK;
        if ball.size <= CAPTURE_SIZE_EPSILON || distance < 1.0 {
            ball.size = 0.0;
            ball.consumed = true;
            return Some(hole.color);
        }
    }
    None
}

/// What a capture does to the score and the candidate queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOutcome {
    /// Signed score change
    pub delta: f32,
    /// The ball goes back to the end of the candidate queue
    pub requeue: bool,
}

/// Score a ball entering a hole of `hole_color`.
///
/// Matching colours or a grey hole earn the ball's increase score. A wrong
/// hole costs the decrease score and recycles the ball, unless the ball is
/// grey, which is never penalised.
pub fn resolve_capture(ball: &Ball, hole_color: BallColor, modifiers: &ScoreModifiers) -> CaptureOutcome {
    if ball.color == hole_color || hole_color.is_universal() {
        CaptureOutcome {
            delta: ball.increase_score * modifiers.increase,
            requeue: false,
        }
    } else if !ball.color.is_universal() {
        CaptureOutcome {
            delta: -ball.decrease_score * modifiers.decrease,
            requeue: true,
        }
    } else {
        CaptureOutcome {
            delta: 0.0,
            requeue: false,
        }
    }
}
