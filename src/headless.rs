//! In-memory host for the demo binary and tests
//!
//! Records every renderer command and integrates bodies as simple
//! projectiles under gravity. Good enough to drive a session end to end
//! without an engine.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PIXELS_PER_METER;
use crate::host::{Effect, PhysicsDelegate, Renderer};
use crate::sim::target::{TargetId, TargetKind};

/// A simulated projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub angular_velocity: f32,
}

#[derive(Debug, Clone)]
pub struct HeadlessHost {
    bodies: BTreeMap<TargetId, Body>,
    visuals: BTreeMap<TargetId, TargetKind>,
    gravity: Vec2,
    time_scale: f32,
    /// Currently drawn gesture path (empty when none)
    pub path: Vec<Vec2>,
    /// Set by `fade_path`, cleared when a new path is shown
    pub path_fading: bool,
    /// Every effect played, in order
    pub played: Vec<Effect>,
    /// Every looping effect stopped, in order
    pub stopped: Vec<Effect>,
    pub score_display: u64,
    pub lives_display: Option<u8>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
            visuals: BTreeMap::new(),
            gravity: Vec2::ZERO,
            time_scale: 1.0,
            path: Vec::new(),
            path_fading: false,
            played: Vec::new(),
            stopped: Vec::new(),
            score_display: 0,
            lives_display: None,
        }
    }

    /// Integrate all bodies by `dt` seconds of wall time
    pub fn step(&mut self, dt: f32) {
        let dt = dt * self.time_scale;
        if dt <= 0.0 {
            return;
        }
        let accel = self.gravity * PIXELS_PER_METER;
        for body in self.bodies.values_mut() {
            body.velocity += accel * dt;
            body.position += body.velocity * dt;
            body.rotation += body.angular_velocity * dt;
        }
    }

    /// Teleport a body (test and scripting hook)
    pub fn place(&mut self, id: TargetId, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.position = position;
        }
    }

    pub fn body(&self, id: TargetId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn played_count(&self, effect: Effect) -> usize {
        self.played.iter().filter(|e| **e == effect).count()
    }
}

impl Renderer for HeadlessHost {
    fn show_path(&mut self, points: &[Vec2]) {
        self.path.clear();
        self.path.extend_from_slice(points);
        self.path_fading = false;
    }

    fn remove_path(&mut self) {
        self.path.clear();
    }

    fn fade_path(&mut self) {
        self.path_fading = true;
    }

    fn spawn_visual(&mut self, id: TargetId, kind: TargetKind, _position: Vec2) {
        self.visuals.insert(id, kind);
    }

    fn remove_visual(&mut self, id: TargetId) {
        self.visuals.remove(&id);
    }

    fn play_effect(&mut self, effect: Effect) {
        log::trace!("effect: {}", effect.name());
        self.played.push(effect);
    }

    fn stop_effect(&mut self, effect: Effect) {
        self.stopped.push(effect);
    }

    fn update_score_display(&mut self, score: u64) {
        self.score_display = score;
    }

    fn update_lives_display(&mut self, remaining: u8) {
        self.lives_display = Some(remaining);
    }
}

impl PhysicsDelegate for HeadlessHost {
    fn create_body(&mut self, id: TargetId, position: Vec2, velocity: Vec2, angular_velocity: f32) {
        self.bodies.insert(
            id,
            Body {
                position,
                velocity,
                rotation: 0.0,
                angular_velocity,
            },
        );
    }

    fn remove_body(&mut self, id: TargetId) {
        self.bodies.remove(&id);
    }

    fn current_position(&self, id: TargetId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.position)
    }

    fn set_world_time_scale(&mut self, factor: f32) {
        self.time_scale = factor;
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_rises_then_falls() {
        let mut host = HeadlessHost::new();
        host.set_gravity(Vec2::new(0.0, -6.0));
        let id = TargetId(1);
        host.create_body(id, Vec2::new(100.0, -128.0), Vec2::new(0.0, 1000.0), 0.0);

        host.step(0.5);
        let mid = host.current_position(id).unwrap();
        assert!(mid.y > -128.0);

        for _ in 0..40 {
            host.step(0.1);
        }
        assert!(host.current_position(id).unwrap().y < -140.0);
    }

    #[test]
    fn test_zero_time_scale_freezes_bodies() {
        let mut host = HeadlessHost::new();
        host.set_gravity(Vec2::new(0.0, -6.0));
        let id = TargetId(1);
        host.create_body(id, Vec2::ZERO, Vec2::new(10.0, 10.0), 1.0);
        host.set_world_time_scale(0.0);
        host.step(1.0);
        assert_eq!(host.current_position(id), Some(Vec2::ZERO));
    }

    #[test]
    fn test_removed_body_has_no_position() {
        let mut host = HeadlessHost::new();
        let id = TargetId(9);
        host.create_body(id, Vec2::ZERO, Vec2::ZERO, 0.0);
        host.remove_body(id);
        assert_eq!(host.current_position(id), None);
        // Removing again is harmless
        host.remove_body(id);
    }
}
