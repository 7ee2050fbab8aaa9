//! Collaborators the game core calls into
//!
//! Rendering, audio and rigid-body physics belong to the host engine. The
//! core only issues commands through these traits and reads back positions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::target::{TargetId, TargetKind};

/// Named one-shot or looping effects (sound plus particles)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// A regular target was launched
    Launch,
    /// Looping fuse cue while a hazard is in play
    HazardFuse,
    /// Gesture swoosh, variant 1..=3
    Swoosh(u8),
    /// A regular target was sliced
    Whack,
    RegularSliceBurst,
    /// A hazard was sliced
    Explosion,
    HazardSliceBurst,
    /// A regular target was dropped
    Wrong,
}

impl Effect {
    /// Asset name the host resolves
    pub fn name(&self) -> String {
        match self {
            Effect::Launch => "launch.caf".to_string(),
            Effect::HazardFuse => "sliceBombFuse.caf".to_string(),
            Effect::Swoosh(variant) => format!("swoosh{variant}.caf"),
            Effect::Whack => "whack.caf".to_string(),
            Effect::RegularSliceBurst => "sliceHitEnemy".to_string(),
            Effect::Explosion => "explosion.caf".to_string(),
            Effect::HazardSliceBurst => "sliceHitBomb".to_string(),
            Effect::Wrong => "wrong.caf".to_string(),
        }
    }
}

/// Display-side commands
pub trait Renderer {
    fn show_path(&mut self, points: &[Vec2]);
    fn remove_path(&mut self);
    /// Gesture lifted; the host animates the path away
    fn fade_path(&mut self) {}
    fn spawn_visual(&mut self, id: TargetId, kind: TargetKind, position: Vec2);
    fn remove_visual(&mut self, id: TargetId);
    fn play_effect(&mut self, effect: Effect);
    /// Stop a looping effect (only `HazardFuse` loops)
    fn stop_effect(&mut self, _effect: Effect) {}
    fn update_score_display(&mut self, score: u64);
    fn update_lives_display(&mut self, remaining: u8);
}

/// Rigid-body simulation owned by the host
pub trait PhysicsDelegate {
    fn create_body(&mut self, id: TargetId, position: Vec2, velocity: Vec2, angular_velocity: f32);
    fn remove_body(&mut self, _id: TargetId) {}
    /// Latest simulated position, `None` if the body is unknown
    fn current_position(&self, id: TargetId) -> Option<Vec2>;
    fn set_world_time_scale(&mut self, factor: f32);
    fn set_gravity(&mut self, gravity: Vec2);
}

/// Everything a session needs from its host
pub trait Host: Renderer + PhysicsDelegate {}

impl<T: Renderer + PhysicsDelegate> Host for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_names() {
        assert_eq!(Effect::Swoosh(2).name(), "swoosh2.caf");
        assert_eq!(Effect::HazardFuse.name(), "sliceBombFuse.caf");
        assert_eq!(Effect::Wrong.name(), "wrong.caf");
    }
}
