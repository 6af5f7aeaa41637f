//! Player-drawn ink lines
//!
//! A line is an ordered list of directed segments, one per pointer drag
//! step. Lines are consumed whole by the first ball that hits them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A directed segment from `a` to `b`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    /// The two unit normals, left-hand first. Zero for a degenerate segment.
    pub fn normals(&self) -> (Vec2, Vec2) {
        let d = self.b - self.a;
        let n = Vec2::new(-d.y, d.x).normalize_or_zero();
        (n, -n)
    }

    /// Whether two segments cross (endpoints inclusive).
    ///
    /// Parallel and collinear segments never count as crossing.
    pub fn intersects(&self, other: &Segment) -> bool {
        let d1 = self.b - self.a;
        let d2 = other.b - other.a;
        let denom = d2.y * d1.x - d2.x * d1.y;
        if denom == 0.0 {
            return false;
        }
        let offset = self.a - other.a;
        let ua = (d2.x * offset.y - d2.y * offset.x) / denom;
        let ub = (d1.x * offset.y - d1.y * offset.x) / denom;
        (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
    }
}

/// A player line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub segments: Vec<Segment>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, a: Vec2, b: Vec2) {
        self.segments.push(Segment::new(a, b));
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether any segment of `self` crosses any segment of `other`
    pub fn intersects(&self, other: &Line) -> bool {
        self.segments
            .iter()
            .any(|s| other.segments.iter().any(|o| s.intersects(o)))
    }
}

/// A line being drawn, plus the last pointer position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDraft {
    pub line: Line,
    pub last: Vec2,
}

impl LineDraft {
    pub fn start(pos: Vec2) -> Self {
        Self {
            line: Line::new(),
            last: pos,
        }
    }

    /// Extend the draft with a segment from the previous pointer position.
    /// A drag that did not move adds nothing.
    pub fn extend_to(&mut self, pos: Vec2) {
        if pos == self.last {
            return;
        }
        self.line.push(self.last, pos);
        self.last = pos;
    }
}
