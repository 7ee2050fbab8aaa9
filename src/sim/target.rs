//! Falling targets and their lifecycle

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::segment_hits_circle;
use super::gesture::TestSegment;

/// Stable identifier shared with the renderer and physics delegate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What slicing a target does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// Scores a point when sliced, costs a life when dropped
    Regular,
    /// Ends the game when sliced, harmless when dropped
    Hazard,
}

/// How a spawn picks its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KindChoice {
    /// Weighted roll: one in `hazard_odds` is a hazard
    Random,
    ForceRegular,
    ForceHazard,
}

impl KindChoice {
    pub fn resolve<R: Rng + ?Sized>(self, hazard_odds: u32, rng: &mut R) -> TargetKind {
        match self {
            KindChoice::ForceRegular => TargetKind::Regular,
            KindChoice::ForceHazard => TargetKind::Hazard,
            KindChoice::Random => {
                if rng.random_range(0..hazard_odds) == 0 {
                    TargetKind::Hazard
                } else {
                    TargetKind::Regular
                }
            }
        }
    }
}

/// Lifecycle position. `Sliced` and `ExitedBounds` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetState {
    Spawned,
    Active,
    Sliced,
    ExitedBounds,
}

impl TargetState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TargetState::Sliced | TargetState::ExitedBounds)
    }
}

/// One in-flight target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub kind: TargetKind,
    /// Last position reported by the physics delegate
    pub position: Vec2,
    /// Launch velocity (physics owns the live value)
    pub velocity: Vec2,
    pub angular_velocity: f32,
    /// Session clock at spawn
    pub spawn_time: f64,
    pub state: TargetState,
}

impl Target {
    pub fn new(
        id: TargetId,
        kind: TargetKind,
        position: Vec2,
        velocity: Vec2,
        angular_velocity: f32,
        spawn_time: f64,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            velocity,
            angular_velocity,
            spawn_time,
            state: TargetState::Spawned,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == TargetState::Active
    }

    #[inline]
    pub fn is_hazard(&self) -> bool {
        self.kind == TargetKind::Hazard
    }

    /// Handed to physics; from now on the delegate drives its position
    pub fn activate(&mut self) {
        debug_assert_eq!(self.state, TargetState::Spawned, "target {} activated twice", self.id);
        self.state = TargetState::Active;
    }

    /// Accept a physics position report (ignored once terminal)
    pub fn sync_position(&mut self, position: Vec2) {
        if !self.state.is_terminal() {
            self.position = position;
        }
    }

    /// Below the exit line
    pub fn has_exited(&self, exit_y: f32) -> bool {
        self.is_alive() && self.position.y < exit_y
    }

    /// Whether a gesture segment passes through the hit circle
    pub fn is_hit_by(&self, segment: &TestSegment, hit_radius: f32) -> bool {
        self.is_alive() && segment_hits_circle(segment.start, segment.end, self.position, hit_radius)
    }

    /// Move to a terminal state; returns false if already terminal
    pub fn finish(&mut self, terminal: TargetState) -> bool {
        debug_assert!(terminal.is_terminal());
        if self.state.is_terminal() {
            return false;
        }
        self.state = terminal;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn active_target(kind: TargetKind, pos: Vec2) -> Target {
        let mut t = Target::new(TargetId(1), kind, pos, Vec2::ZERO, 0.0, 0.0);
        t.activate();
        t
    }

    #[test]
    fn test_forced_kinds_ignore_rng() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(KindChoice::ForceRegular.resolve(7, &mut rng), TargetKind::Regular);
            assert_eq!(KindChoice::ForceHazard.resolve(7, &mut rng), TargetKind::Hazard);
        }
    }

    #[test]
    fn test_random_kind_is_roughly_one_in_seven_hazard() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let hazards = (0..7000)
            .filter(|_| KindChoice::Random.resolve(7, &mut rng) == TargetKind::Hazard)
            .count();
        // Expected 1000; allow generous slack for a fixed seed
        assert!((800..1200).contains(&hazards), "hazards = {hazards}");
    }

    #[test]
    fn test_odds_of_one_always_hazard() {
        let mut rng = Pcg32::seed_from_u64(5);
        assert!((0..50).all(|_| KindChoice::Random.resolve(1, &mut rng) == TargetKind::Hazard));
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut t = Target::new(TargetId(4), TargetKind::Regular, Vec2::ZERO, Vec2::ZERO, 0.0, 1.0);
        assert_eq!(t.state, TargetState::Spawned);
        assert!(!t.is_alive());

        t.activate();
        assert!(t.is_alive());

        assert!(t.finish(TargetState::Sliced));
        assert!(!t.is_alive());
        // Second terminal transition is refused
        assert!(!t.finish(TargetState::ExitedBounds));
        assert_eq!(t.state, TargetState::Sliced);
    }

    #[test]
    fn test_position_frozen_after_terminal() {
        let mut t = active_target(TargetKind::Regular, Vec2::new(10.0, 10.0));
        t.sync_position(Vec2::new(20.0, 20.0));
        assert_eq!(t.position, Vec2::new(20.0, 20.0));
        t.finish(TargetState::ExitedBounds);
        t.sync_position(Vec2::new(30.0, 30.0));
        assert_eq!(t.position, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn test_exit_threshold() {
        let t = active_target(TargetKind::Hazard, Vec2::new(500.0, -139.0));
        assert!(!t.has_exited(-140.0));
        let t = active_target(TargetKind::Hazard, Vec2::new(500.0, -141.0));
        assert!(t.has_exited(-140.0));
    }

    #[test]
    fn test_hit_requires_alive() {
        let segment = TestSegment {
            start: Vec2::new(0.0, 100.0),
            end: Vec2::new(200.0, 100.0),
        };
        let mut t = active_target(TargetKind::Regular, Vec2::new(100.0, 120.0));
        assert!(t.is_hit_by(&segment, 64.0));
        t.finish(TargetState::Sliced);
        assert!(!t.is_hit_by(&segment, 64.0));
    }
}
