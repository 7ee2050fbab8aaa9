//! Bounded slice gesture path
//!
//! The path keeps only the most recent samples (oldest dropped first). Each
//! new sample yields exactly one segment to test; earlier segments were
//! already tested when they were added.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_PATH_POINTS;

/// The newest segment of the path, the only one tested per sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestSegment {
    pub start: Vec2,
    pub end: Vec2,
}

/// Result of extending the path
#[derive(Debug, Clone, Copy)]
pub struct GestureSample<'a> {
    /// Points to render; empty when there is nothing to draw
    pub path: &'a [Vec2],
    /// Segment to test against live targets this sample
    pub segment: Option<TestSegment>,
}

/// Accumulates pointer samples for one stroke at a time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceGesture {
    points: Vec<Vec2>,
    max_points: usize,
    active: bool,
}

impl Default for SliceGesture {
    fn default() -> Self {
        Self::new(MAX_PATH_POINTS)
    }
}

impl SliceGesture {
    pub fn new(max_points: usize) -> Self {
        assert!(max_points >= 2, "gesture path needs room for a segment");
        Self {
            points: Vec::with_capacity(max_points + 1),
            max_points,
            active: false,
        }
    }

    /// Start a new stroke, discarding the previous path
    pub fn begin(&mut self, point: Vec2) {
        self.points.clear();
        self.points.push(point);
        self.active = true;
    }

    /// Append a sample and return the path plus the new segment
    ///
    /// Extending an idle gesture starts a fresh stroke instead, so the first
    /// sample after a lift never forms a segment with the old path.
    pub fn extend(&mut self, point: Vec2) -> GestureSample<'_> {
        if !self.active {
            self.begin(point);
            return GestureSample {
                path: &[],
                segment: None,
            };
        }

        self.points.push(point);
        if self.points.len() > self.max_points {
            let excess = self.points.len() - self.max_points;
            self.points.drain(..excess);
        }

        GestureSample {
            path: self.renderable_path(),
            segment: self.newest_segment(),
        }
    }

    /// Lift the pointer; the path stays until the next `begin`
    pub fn end(&mut self) {
        self.active = false;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// All retained points, oldest first
    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Points worth drawing (a single point draws nothing)
    pub fn renderable_path(&self) -> &[Vec2] {
        if self.points.len() < 2 { &[] } else { &self.points[..] }
    }

    fn newest_segment(&self) -> Option<TestSegment> {
        match self.points.as_slice() {
            [.., start, end] => Some(TestSegment {
                start: *start,
                end: *end,
            }),
            _ => None,
        }
    }
}
