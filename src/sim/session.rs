//! Top-level game session
//!
//! Owns the scoreboard, the live targets, the gesture and the wave
//! sequencer. Every state change goes through a method here, and every
//! side effect is a command on the [`Host`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::gesture::SliceGesture;
use super::kinematics::RandomKinematics;
use super::schedule::{Schedule, ScheduledAction};
use super::state::{EndCause, SessionEvent, SessionState, SessionSummary, SliceHit};
use super::target::{KindChoice, Target, TargetId, TargetKind, TargetState};
use super::wave::{WaveSequence, WaveSequencer};
use crate::config::SessionConfig;
use crate::consts::SWOOSH_VARIANTS;
use crate::error::ConfigError;
use crate::host::{Effect, Host};

/// PCG stream for cosmetic rolls, kept apart from spawn randomness
const FX_STREAM: u64 = 0xfe;

pub struct GameSession {
    pub(super) config: SessionConfig,
    pub(super) seed: u64,
    /// Drives kinds, spawn columns and launch params
    pub(super) rng: Pcg32,
    /// Cosmetic choices only (swoosh variant)
    pub(super) fx_rng: Pcg32,
    pub(super) kinematics: RandomKinematics,
    pub(super) sequencer: WaveSequencer,
    pub(super) schedule: Schedule,
    pub(super) gesture: SliceGesture,
    /// Live targets in spawn order
    pub(super) targets: Vec<Target>,
    pub(super) state: SessionState,
    /// Seconds since the session was created
    pub(super) clock: f64,
    pub(super) next_id: u32,
    /// Hazard whose fuse cue is currently playing
    pub(super) hazard_cue: Option<TargetId>,
    pub(super) swoosh_active: bool,
    pub(super) input_enabled: bool,
    pub(super) started: bool,
    pub(super) waves_tossed: usize,
    pub(super) events: Vec<SessionEvent>,
}

impl GameSession {
    /// Create a session; an unset seed is drawn from OS entropy
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let kinematics = RandomKinematics::new(&config.kinematics, config.field.width)?;
        let sequence = WaveSequence::generate(&mut rng, config.random_wave_count);
        log::info!(
            "New session: seed {seed}, {} waves in sequence",
            sequence.len()
        );
        let sequencer = WaveSequencer::new(sequence, &config.difficulty);

        Ok(Self {
            seed,
            rng,
            fx_rng: Pcg32::new(seed, FX_STREAM),
            kinematics,
            sequencer,
            schedule: Schedule::new(),
            gesture: SliceGesture::new(config.max_path_points),
            targets: Vec::new(),
            state: SessionState::new(config.lives),
            clock: 0.0,
            next_id: 1,
            hazard_cue: None,
            swoosh_active: false,
            input_enabled: true,
            started: false,
            waves_tossed: 0,
            events: Vec::new(),
            config,
        })
    }

    /// Configure the host world and queue the opening wave
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.started {
            return;
        }
        self.started = true;
        host.set_gravity(self.config.gravity);
        host.set_world_time_scale(self.sequencer.physics_speed());
        host.update_score_display(self.state.score);
        host.update_lives_display(self.state.displayed_lives);
        self.sequencer.prime(self.clock, &mut self.schedule);
    }

    // --- Gesture input ---

    /// Pointer down: start a new stroke
    pub fn gesture_begin<H: Host + ?Sized>(&mut self, point: Vec2, host: &mut H) {
        if !self.input_enabled {
            return;
        }
        self.gesture.begin(point);
        // One point is not a path yet
        host.remove_path();
    }

    /// Pointer moved: extend the stroke and slice whatever the new segment crosses
    ///
    /// Every target the segment crosses is resolved, in spawn order, even
    /// after a hazard ends the game. Input is disabled from the next sample on.
    pub fn on_gesture_sample<H: Host + ?Sized>(&mut self, point: Vec2, host: &mut H) -> Vec<SliceHit> {
        if !self.input_enabled {
            return Vec::new();
        }

        let sample = self.gesture.extend(point);
        let segment = sample.segment;
        if sample.path.is_empty() {
            host.remove_path();
        } else {
            host.show_path(sample.path);
        }

        if !self.swoosh_active {
            self.play_swoosh(host);
        }

        let Some(segment) = segment else {
            return Vec::new();
        };

        let radius = self.config.field.hit_radius;
        let crossed: Vec<TargetId> = self
            .targets
            .iter()
            .filter(|t| t.is_hit_by(&segment, radius))
            .map(|t| t.id)
            .collect();

        let mut hits = Vec::with_capacity(crossed.len());
        for id in crossed {
            if let Some(hit) = self.resolve_slice(id, host) {
                hits.push(hit);
            }
        }
        hits
    }

    /// Pointer up: the path stays and fades out host-side
    pub fn gesture_end<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.gesture.end();
        host.fade_path();
    }

    fn play_swoosh<H: Host + ?Sized>(&mut self, host: &mut H) {
        let variant = self.fx_rng.random_range(1..=SWOOSH_VARIANTS);
        host.play_effect(Effect::Swoosh(variant));
        self.swoosh_active = true;
        self.schedule.push(
            self.clock + self.config.swoosh_duration as f64,
            ScheduledAction::SwooshFinished,
        );
    }

    fn resolve_slice<H: Host + ?Sized>(&mut self, id: TargetId, host: &mut H) -> Option<SliceHit> {
        let target = self.remove_target(id, TargetState::Sliced, host)?;
        self.events.push(SessionEvent::TargetSliced {
            id,
            kind: target.kind,
        });

        match target.kind {
            TargetKind::Regular => {
                self.state.score += 1;
                host.update_score_display(self.state.score);
                host.play_effect(Effect::RegularSliceBurst);
                host.play_effect(Effect::Whack);
                log::debug!("Sliced {id}, score {}", self.state.score);
            }
            TargetKind::Hazard => {
                host.play_effect(Effect::HazardSliceBurst);
                host.play_effect(Effect::Explosion);
                log::info!("Hazard {id} sliced");
                self.end_game(EndCause::HazardSliced, host);
            }
        }

        Some(SliceHit {
            id,
            kind: target.kind,
        })
    }

    // --- Targets ---

    /// Spawn one target with random launch parameters
    pub fn spawn_target<H: Host + ?Sized>(&mut self, choice: KindChoice, host: &mut H) -> TargetId {
        let kind = choice.resolve(self.config.hazard_odds, &mut self.rng);
        let position = self.kinematics.spawn_position(&mut self.rng);
        let launch = self.kinematics.launch_params_for(position.x, &mut self.rng);

        let id = TargetId(self.next_id);
        self.next_id += 1;

        let mut target = Target::new(
            id,
            kind,
            position,
            launch.velocity,
            launch.angular_velocity,
            self.clock,
        );
        host.spawn_visual(id, kind, position);
        host.create_body(id, position, launch.velocity, launch.angular_velocity);
        target.activate();

        match kind {
            TargetKind::Hazard => {
                // Only the newest hazard's fuse plays
                if self.hazard_cue.is_some() {
                    host.stop_effect(Effect::HazardFuse);
                }
                host.play_effect(Effect::HazardFuse);
                self.hazard_cue = Some(id);
            }
            TargetKind::Regular => host.play_effect(Effect::Launch),
        }

        log::debug!(
            "Spawned {kind:?} {id} at ({:.0}, {:.0}) vel ({:.0}, {:.0})",
            position.x,
            position.y,
            launch.velocity.x,
            launch.velocity.y
        );
        self.targets.push(target);
        self.events.push(SessionEvent::TargetSpawned { id, kind });
        id
    }

    /// Take a target out of play; unknown or already-removed ids are a no-op
    pub(super) fn remove_target<H: Host + ?Sized>(
        &mut self,
        id: TargetId,
        terminal: TargetState,
        host: &mut H,
    ) -> Option<Target> {
        let index = self.targets.iter().position(|t| t.id == id)?;
        let mut target = self.targets.remove(index);
        target.finish(terminal);
        host.remove_visual(id);
        host.remove_body(id);
        Some(target)
    }

    // --- Lives and game over ---

    /// Lose one life; the last one ends the game
    pub fn subtract_life<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.state.game_ended {
            return;
        }
        assert!(self.state.lives > 0, "life subtracted with none remaining");

        self.state.lives -= 1;
        self.state.displayed_lives = self.state.lives;
        host.update_lives_display(self.state.displayed_lives);
        host.play_effect(Effect::Wrong);
        self.events.push(SessionEvent::LifeLost {
            remaining: self.state.lives,
        });
        log::info!("Life lost, {} remaining", self.state.lives);

        if self.state.lives == 0 {
            self.end_game(EndCause::LivesExhausted, host);
        }
    }

    /// Finish the session. Only the first call has any effect.
    pub fn end_game<H: Host + ?Sized>(&mut self, cause: EndCause, host: &mut H) {
        if self.state.game_ended {
            return;
        }
        self.state.game_ended = true;
        self.state.end_cause = Some(cause);
        self.input_enabled = false;
        self.sequencer.halt();

        host.set_world_time_scale(0.0);
        if self.hazard_cue.take().is_some() {
            host.stop_effect(Effect::HazardFuse);
        }
        if cause == EndCause::HazardSliced {
            // Death by hazard shows every life lost
            self.state.displayed_lives = 0;
            host.update_lives_display(0);
        }

        self.events.push(SessionEvent::GameEnded { cause });
        log::info!(
            "Game over ({cause:?}): score {}, {} waves",
            self.state.score,
            self.waves_tossed
        );
    }

    // --- Accessors ---

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn is_game_ended(&self) -> bool {
        self.state.game_ended
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn active_target_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_alive()).count()
    }

    pub fn gesture(&self) -> &SliceGesture {
        &self.gesture
    }

    pub fn sequencer(&self) -> &WaveSequencer {
        &self.sequencer
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn hazard_cue(&self) -> Option<TargetId> {
        self.hazard_cue
    }

    pub fn waves_tossed(&self) -> usize {
        self.waves_tossed
    }

    /// Drain events recorded since the last call
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            score: self.state.score,
            lives: self.state.lives,
            game_ended: self.state.game_ended,
            end_cause: self.state.end_cause,
            waves_tossed: self.waves_tossed,
            targets_spawned: self.next_id - 1,
            active_targets: self.active_target_count(),
            elapsed: self.clock,
            physics_speed: self.sequencer.physics_speed(),
        }
    }
}
