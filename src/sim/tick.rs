//! Per-frame session update
//!
//! Frame order:
//! 1. advance the clock and fire due scheduled actions
//! 2. pull positions from the physics delegate
//! 3. stop the hazard fuse once no hazard is live
//! 4. remove targets below the exit line (collect, then remove), then
//!    recheck the fuse so a hazard leaving this frame silences it now
//! 5. let the sequencer queue the next wave if the board is clear

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::schedule::{ScheduledAction, ScheduledEntry};
use super::session::GameSession;
use super::state::{SessionEvent, SliceHit};
use super::target::{KindChoice, TargetId, TargetKind, TargetState};
use crate::host::{Effect, Host};

/// Pointer input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Begin(Vec2),
    Sample(Vec2),
    End,
}

impl GameSession {
    /// Route one input event; only samples can slice
    pub fn handle_input<H: Host + ?Sized>(&mut self, event: InputEvent, host: &mut H) -> Vec<SliceHit> {
        match event {
            InputEvent::Begin(point) => {
                self.gesture_begin(point, host);
                Vec::new()
            }
            InputEvent::Sample(point) => self.on_gesture_sample(point, host),
            InputEvent::End => {
                self.gesture_end(host);
                Vec::new()
            }
        }
    }

    /// Advance the session by `dt` seconds of host time
    pub fn on_tick<H: Host + ?Sized>(&mut self, dt: f32, host: &mut H) {
        self.clock += dt.max(0.0) as f64;

        for entry in self.schedule.drain_due(self.clock) {
            self.fire(entry, host);
        }

        if self.state.game_ended {
            return;
        }

        self.sync_positions(host);
        self.update_hazard_cue(host);
        self.resolve_exits(host);
        self.update_hazard_cue(host);

        if self.state.game_ended {
            return;
        }
        let active = self.active_target_count();
        self.sequencer.tick(active, self.clock, &mut self.schedule);
    }

    /// Run a scheduled action; spawns drop themselves once the game is over
    fn fire<H: Host + ?Sized>(&mut self, entry: ScheduledEntry, host: &mut H) {
        match entry.action {
            ScheduledAction::TossWave => {
                if self.state.game_ended {
                    log::debug!("Dropping queued wave: game over");
                    return;
                }
                self.toss_wave(entry.fire_at, host);
            }
            ScheduledAction::ChainSpawn { wave } => {
                if self.state.game_ended {
                    log::debug!("Dropping chain spawn from wave {wave}: game over");
                    return;
                }
                self.spawn_target(KindChoice::Random, host);
            }
            ScheduledAction::SwooshFinished => self.swoosh_active = false,
        }
    }

    /// Chain members are timed from `fired_at`, the wave's own due time
    fn toss_wave<H: Host + ?Sized>(&mut self, fired_at: f64, host: &mut H) {
        let was_exhausted = self.sequencer.is_exhausted();
        let Some(dispatch) = self.sequencer.toss_next_wave(fired_at, &mut self.schedule) else {
            if !was_exhausted && self.sequencer.is_exhausted() {
                self.events.push(SessionEvent::SequenceExhausted);
            }
            return;
        };

        host.set_world_time_scale(dispatch.physics_speed);
        self.waves_tossed += 1;
        self.events.push(SessionEvent::WaveTossed {
            index: dispatch.index,
            pattern: dispatch.pattern,
        });
        for choice in dispatch.immediate {
            self.spawn_target(*choice, host);
        }
    }

    fn sync_positions<H: Host + ?Sized>(&mut self, host: &mut H) {
        for target in &mut self.targets {
            if let Some(position) = host.current_position(target.id) {
                target.sync_position(position);
            }
        }
    }

    fn update_hazard_cue<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.hazard_cue.is_none() {
            return;
        }
        let hazard_live = self.targets.iter().any(|t| t.is_alive() && t.is_hazard());
        if !hazard_live {
            self.hazard_cue = None;
            host.stop_effect(Effect::HazardFuse);
        }
    }

    /// Dropped regular targets cost a life; dropped hazards are harmless.
    fn resolve_exits<H: Host + ?Sized>(&mut self, host: &mut H) {
        let exit_y = self.config.field.exit_y;
        let exited: Vec<TargetId> = self
            .targets
            .iter()
            .filter(|t| t.has_exited(exit_y))
            .map(|t| t.id)
            .collect();

        for id in exited {
            let Some(target) = self.remove_target(id, TargetState::ExitedBounds, host) else {
                continue;
            };
            self.events.push(SessionEvent::TargetExited {
                id,
                kind: target.kind,
            });
            match target.kind {
                TargetKind::Regular => self.subtract_life(host),
                TargetKind::Hazard => log::debug!("Hazard {id} fell out of play"),
            }
        }
    }
}
