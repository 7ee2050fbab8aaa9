//! Session scoreboard, events and summaries

use serde::{Deserialize, Serialize};

use super::target::{TargetId, TargetKind};
use super::wave::WavePattern;

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// A hazard was sliced
    HazardSliced,
    /// The last life was lost to a dropped regular target
    LivesExhausted,
}

/// Score, lives and the terminal flag
///
/// Score only grows, lives only shrink, and `game_ended` never resets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub lives: u8,
    /// What the HUD shows; zeroed on a hazard death even with lives left
    pub displayed_lives: u8,
    pub game_ended: bool,
    pub end_cause: Option<EndCause>,
}

impl SessionState {
    pub fn new(lives: u8) -> Self {
        Self {
            score: 0,
            lives,
            displayed_lives: lives,
            game_ended: false,
            end_cause: None,
        }
    }
}

/// A target removed by a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceHit {
    pub id: TargetId,
    pub kind: TargetKind,
}

/// Notable things that happened, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    WaveTossed { index: usize, pattern: WavePattern },
    TargetSpawned { id: TargetId, kind: TargetKind },
    TargetSliced { id: TargetId, kind: TargetKind },
    TargetExited { id: TargetId, kind: TargetKind },
    LifeLost { remaining: u8 },
    GameEnded { cause: EndCause },
    SequenceExhausted,
}

/// End-of-run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub score: u64,
    pub lives: u8,
    pub game_ended: bool,
    pub end_cause: Option<EndCause>,
    pub waves_tossed: usize,
    pub targets_spawned: u32,
    pub active_targets: usize,
    /// Session clock in seconds
    pub elapsed: f64,
    pub physics_speed: f32,
}
