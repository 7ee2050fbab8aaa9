//! Wave sequencing and spawn scheduling
//!
//! A session plays through a fixed opening followed by a long run of random
//! patterns. A new wave is scheduled only once the board is clear, and every
//! wave makes the next one arrive sooner and fall faster.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::schedule::{Schedule, ScheduledAction};
use super::target::KindChoice;
use crate::config::DifficultyConfig;

/// One spawn batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePattern {
    /// One guaranteed-regular target
    SingleSafe,
    SingleRandom,
    /// Exactly one regular and one hazard
    PairOneHazard,
    PairRandom,
    TripleRandom,
    QuadRandom,
    /// Five targets, spaced `chain_interval / 5` apart
    Chain,
    /// Five targets, spaced `chain_interval / 10` apart
    FastChain,
}

/// Timing of a chain wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainShape {
    /// Total targets including the immediate one
    pub count: usize,
    pub interval_divisor: u32,
}

impl WavePattern {
    /// Hand-authored opening of every session
    pub const OPENING: [WavePattern; 7] = [
        WavePattern::SingleSafe,
        WavePattern::SingleSafe,
        WavePattern::PairOneHazard,
        WavePattern::PairOneHazard,
        WavePattern::TripleRandom,
        WavePattern::SingleRandom,
        WavePattern::Chain,
    ];

    /// Patterns eligible for the random tail
    pub const RANDOM_POOL: [WavePattern; 6] = [
        WavePattern::PairOneHazard,
        WavePattern::PairRandom,
        WavePattern::TripleRandom,
        WavePattern::QuadRandom,
        WavePattern::Chain,
        WavePattern::FastChain,
    ];

    /// Targets spawned the moment the wave is tossed
    pub fn immediate_spawns(&self) -> &'static [KindChoice] {
        use KindChoice::*;
        match self {
            WavePattern::SingleSafe => &[ForceRegular],
            WavePattern::SingleRandom => &[Random],
            WavePattern::PairOneHazard => &[ForceRegular, ForceHazard],
            WavePattern::PairRandom => &[Random, Random],
            WavePattern::TripleRandom => &[Random, Random, Random],
            WavePattern::QuadRandom => &[Random, Random, Random, Random],
            WavePattern::Chain | WavePattern::FastChain => &[Random],
        }
    }

    pub fn chain_shape(&self) -> Option<ChainShape> {
        match self {
            WavePattern::Chain => Some(ChainShape {
                count: 5,
                interval_divisor: 5,
            }),
            WavePattern::FastChain => Some(ChainShape {
                count: 5,
                interval_divisor: 10,
            }),
            _ => None,
        }
    }

    /// Total targets this pattern produces over its lifetime
    pub fn total_spawns(&self) -> usize {
        self.chain_shape()
            .map(|shape| shape.count)
            .unwrap_or_else(|| self.immediate_spawns().len())
    }
}

/// Ordered patterns for a whole session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSequence {
    patterns: Vec<WavePattern>,
}

impl WaveSequence {
    /// Opening followed by `random_count` uniform picks from the random pool
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, random_count: usize) -> Self {
        let mut patterns = Vec::with_capacity(WavePattern::OPENING.len() + random_count);
        patterns.extend_from_slice(&WavePattern::OPENING);
        for _ in 0..random_count {
            let pick = rng.random_range(0..WavePattern::RANDOM_POOL.len());
            patterns.push(WavePattern::RANDOM_POOL[pick]);
        }
        Self { patterns }
    }

    pub fn from_patterns(patterns: Vec<WavePattern>) -> Self {
        Self { patterns }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<WavePattern> {
        self.patterns.get(index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[WavePattern] {
        &self.patterns
    }
}

/// What a tossed wave asks the session to do right now
#[derive(Debug, Clone, PartialEq)]
pub struct WaveDispatch {
    /// Position of this wave in the sequence
    pub index: usize,
    pub pattern: WavePattern,
    pub immediate: &'static [KindChoice],
    /// Physics time scale to apply from this wave on
    pub physics_speed: f32,
}

/// Sequencer state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSequencer {
    sequence: WaveSequence,
    position: usize,
    popup_interval: f32,
    chain_interval: f32,
    physics_speed: f32,
    next_wave_queued: bool,
    /// Set when the game ends; tossing becomes a no-op
    halted: bool,
    exhausted: bool,
    first_wave_delay: f32,
    popup_decay: f32,
    chain_decay: f32,
    speed_growth: f32,
    min_popup_interval: Option<f32>,
    min_chain_interval: Option<f32>,
    max_physics_speed: Option<f32>,
}

impl WaveSequencer {
    pub fn new(sequence: WaveSequence, difficulty: &DifficultyConfig) -> Self {
        Self {
            sequence,
            position: 0,
            popup_interval: difficulty.popup_interval,
            chain_interval: difficulty.chain_interval,
            physics_speed: difficulty.physics_speed,
            next_wave_queued: false,
            halted: false,
            exhausted: false,
            first_wave_delay: difficulty.first_wave_delay,
            popup_decay: difficulty.popup_decay,
            chain_decay: difficulty.chain_decay,
            speed_growth: difficulty.speed_growth,
            min_popup_interval: difficulty.min_popup_interval,
            min_chain_interval: difficulty.min_chain_interval,
            max_physics_speed: difficulty.max_physics_speed,
        }
    }

    /// Queue the opening wave after the start delay
    pub fn prime(&mut self, now: f64, schedule: &mut Schedule) {
        if self.next_wave_queued || self.halted {
            return;
        }
        schedule.push(now + self.first_wave_delay as f64, ScheduledAction::TossWave);
        self.next_wave_queued = true;
    }

    /// Per-frame check: schedule the next wave once the board is clear
    ///
    /// Returns true if a wave was scheduled by this call.
    pub fn tick(&mut self, active_targets: usize, now: f64, schedule: &mut Schedule) -> bool {
        if active_targets > 0 || self.next_wave_queued || self.halted || self.exhausted {
            return false;
        }
        schedule.push(now + self.popup_interval as f64, ScheduledAction::TossWave);
        self.next_wave_queued = true;
        log::debug!(
            "Wave {} queued in {:.3}s",
            self.position,
            self.popup_interval
        );
        true
    }

    /// Fire the queued wave: escalate difficulty and dispatch the next pattern
    ///
    /// Chain members beyond the first are pushed onto `schedule`.
    pub fn toss_next_wave(&mut self, now: f64, schedule: &mut Schedule) -> Option<WaveDispatch> {
        if self.halted {
            return None;
        }

        let Some(pattern) = self.sequence.get(self.position) else {
            if !self.exhausted {
                log::warn!(
                    "Wave sequence exhausted after {} waves; no further spawns",
                    self.sequence.len()
                );
            }
            self.exhausted = true;
            self.next_wave_queued = false;
            return None;
        };

        self.escalate();

        if let Some(shape) = pattern.chain_shape() {
            let step = self.chain_interval / shape.interval_divisor as f32;
            for i in 1..shape.count {
                schedule.push(
                    now + (step * i as f32) as f64,
                    ScheduledAction::ChainSpawn {
                        wave: self.position,
                    },
                );
            }
        }

        let dispatch = WaveDispatch {
            index: self.position,
            pattern,
            immediate: pattern.immediate_spawns(),
            physics_speed: self.physics_speed,
        };
        log::info!(
            "Wave {}: {:?} (popup {:.3}s, chain {:.3}s, speed {:.3})",
            self.position,
            pattern,
            self.popup_interval,
            self.chain_interval,
            self.physics_speed
        );

        self.position += 1;
        self.next_wave_queued = false;
        Some(dispatch)
    }

    fn escalate(&mut self) {
        self.popup_interval *= self.popup_decay;
        self.chain_interval *= self.chain_decay;
        self.physics_speed *= self.speed_growth;

        if let Some(floor) = self.min_popup_interval {
            self.popup_interval = self.popup_interval.max(floor);
        }
        if let Some(floor) = self.min_chain_interval {
            self.chain_interval = self.chain_interval.max(floor);
        }
        if let Some(ceiling) = self.max_physics_speed {
            self.physics_speed = self.physics_speed.min(ceiling);
        }
    }

    /// Stop producing waves for good
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn popup_interval(&self) -> f32 {
        self.popup_interval
    }

    pub fn chain_interval(&self) -> f32 {
        self.chain_interval
    }

    pub fn physics_speed(&self) -> f32 {
        self.physics_speed
    }

    pub fn is_wave_queued(&self) -> bool {
        self.next_wave_queued
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn sequence(&self) -> &WaveSequence {
        &self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sequencer_with(patterns: Vec<WavePattern>) -> WaveSequencer {
        WaveSequencer::new(
            WaveSequence::from_patterns(patterns),
            &DifficultyConfig::default(),
        )
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= b.abs() * 1e-5
    }

    #[test]
    fn test_generated_sequence_shape() {
        let mut rng = Pcg32::seed_from_u64(42);
        let seq = WaveSequence::generate(&mut rng, 1001);
        assert_eq!(seq.len(), 7 + 1001);
        assert_eq!(&seq.patterns()[..7], &WavePattern::OPENING);
        assert!(seq.patterns()[7..]
            .iter()
            .all(|p| WavePattern::RANDOM_POOL.contains(p)));
        // Every pool member shows up in a tail this long
        for pattern in WavePattern::RANDOM_POOL {
            assert!(seq.patterns()[7..].contains(&pattern), "{pattern:?} missing");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = WaveSequence::generate(&mut Pcg32::seed_from_u64(5), 100);
        let b = WaveSequence::generate(&mut Pcg32::seed_from_u64(5), 100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_pattern_spawn_counts() {
        assert_eq!(WavePattern::SingleSafe.total_spawns(), 1);
        assert_eq!(WavePattern::PairOneHazard.total_spawns(), 2);
        assert_eq!(WavePattern::QuadRandom.total_spawns(), 4);
        assert_eq!(WavePattern::Chain.total_spawns(), 5);
        assert_eq!(WavePattern::FastChain.total_spawns(), 5);
        assert_eq!(
            WavePattern::PairOneHazard.immediate_spawns(),
            &[KindChoice::ForceRegular, KindChoice::ForceHazard]
        );
    }

    #[test]
    fn test_tick_waits_for_clear_board() {
        let mut w = sequencer_with(vec![WavePattern::SingleSafe]);
        let mut schedule = Schedule::new();
        assert!(!w.tick(2, 0.0, &mut schedule));
        assert!(schedule.is_empty());
        assert!(!w.is_wave_queued());
    }

    #[test]
    fn test_tick_does_not_double_schedule() {
        let mut w = sequencer_with(vec![WavePattern::SingleSafe]);
        let mut schedule = Schedule::new();
        assert!(w.tick(0, 0.0, &mut schedule));
        assert!(!w.tick(0, 0.1, &mut schedule));
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.entries()[0].fire_at, 0.9f32 as f64);
        assert!(w.is_wave_queued());
    }

    #[test]
    fn test_prime_uses_first_wave_delay() {
        let mut w = sequencer_with(vec![WavePattern::SingleSafe]);
        let mut schedule = Schedule::new();
        w.prime(0.0, &mut schedule);
        assert_eq!(schedule.entries()[0].fire_at, 2.0);
        assert!(w.is_wave_queued());
        // Queued: tick must not add another
        assert!(!w.tick(0, 0.0, &mut schedule));
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_toss_escalates_and_advances() {
        let mut w = sequencer_with(vec![WavePattern::SingleSafe, WavePattern::PairRandom]);
        let mut schedule = Schedule::new();
        w.tick(0, 0.0, &mut schedule);

        let dispatch = w.toss_next_wave(0.9, &mut schedule).unwrap();
        assert_eq!(dispatch.index, 0);
        assert_eq!(dispatch.pattern, WavePattern::SingleSafe);
        assert_eq!(dispatch.immediate, &[KindChoice::ForceRegular]);
        assert!(approx(w.popup_interval(), 0.9 * 0.991));
        assert!(approx(w.chain_interval(), 3.0 * 0.99));
        assert!(approx(w.physics_speed(), 0.85 * 1.02));
        assert!(approx(dispatch.physics_speed, 0.85 * 1.02));
        assert_eq!(w.position(), 1);
        assert!(!w.is_wave_queued());
    }

    #[test]
    fn test_chain_schedules_four_delayed_members() {
        let mut w = sequencer_with(vec![WavePattern::Chain]);
        let mut schedule = Schedule::new();
        let dispatch = w.toss_next_wave(10.0, &mut schedule).unwrap();
        assert_eq!(dispatch.immediate.len(), 1);
        assert_eq!(schedule.len(), 4);

        let step = (3.0f32 * 0.99) / 5.0;
        for (i, entry) in schedule.entries().iter().enumerate() {
            let expected = 10.0 + (step * (i + 1) as f32) as f64;
            assert!((entry.fire_at - expected).abs() < 1e-6);
            assert_eq!(entry.action, ScheduledAction::ChainSpawn { wave: 0 });
        }
    }

    #[test]
    fn test_fast_chain_uses_tenths() {
        let mut w = sequencer_with(vec![WavePattern::FastChain]);
        let mut schedule = Schedule::new();
        w.toss_next_wave(0.0, &mut schedule).unwrap();
        let last = schedule.entries().last().unwrap().fire_at;
        let step = (3.0f32 * 0.99) / 10.0;
        assert!((last - (step * 4.0) as f64).abs() < 1e-6);
    }

    #[test]
    fn test_exhaustion_stops_gracefully() {
        let mut w = sequencer_with(vec![WavePattern::SingleRandom]);
        let mut schedule = Schedule::new();
        assert!(w.toss_next_wave(0.0, &mut schedule).is_some());
        let speed = w.physics_speed();

        assert!(w.toss_next_wave(1.0, &mut schedule).is_none());
        assert!(w.is_exhausted());
        assert_eq!(w.physics_speed(), speed);
        // Exhausted sequencer never queues again
        assert!(!w.tick(0, 2.0, &mut schedule));
        assert!(schedule.is_empty());
        assert!(w.toss_next_wave(3.0, &mut schedule).is_none());
    }

    #[test]
    fn test_empty_sequence_is_exhausted_immediately() {
        let mut w = sequencer_with(Vec::new());
        let mut schedule = Schedule::new();
        assert!(w.toss_next_wave(0.0, &mut schedule).is_none());
        assert!(w.is_exhausted());
    }

    #[test]
    fn test_halted_toss_is_noop() {
        let mut w = sequencer_with(vec![WavePattern::Chain]);
        let mut schedule = Schedule::new();
        w.halt();
        assert!(w.toss_next_wave(0.0, &mut schedule).is_none());
        assert_eq!(w.position(), 0);
        assert_eq!(w.popup_interval(), 0.9);
        assert!(schedule.is_empty());
        assert!(!w.tick(0, 0.0, &mut schedule));
    }

    #[test]
    fn test_optional_caps_clamp_escalation() {
        let difficulty = DifficultyConfig {
            min_popup_interval: Some(0.5),
            min_chain_interval: Some(2.0),
            max_physics_speed: Some(1.0),
            ..DifficultyConfig::default()
        };
        let seq = WaveSequence::from_patterns(vec![WavePattern::SingleRandom; 200]);
        let mut w = WaveSequencer::new(seq, &difficulty);
        let mut schedule = Schedule::new();
        while w.toss_next_wave(0.0, &mut schedule).is_some() {}
        assert_eq!(w.popup_interval(), 0.5);
        assert_eq!(w.chain_interval(), 2.0);
        assert_eq!(w.physics_speed(), 1.0);
    }

    proptest! {
        #[test]
        fn prop_escalation_is_strict_and_geometric(waves in 1usize..300) {
            let mut w = sequencer_with(vec![WavePattern::PairRandom; waves]);
            let mut schedule = Schedule::new();
            for _ in 0..waves {
                let (popup, chain, speed) = (w.popup_interval(), w.chain_interval(), w.physics_speed());
                w.toss_next_wave(0.0, &mut schedule).unwrap();
                prop_assert!(w.popup_interval() < popup);
                prop_assert!(w.chain_interval() < chain);
                prop_assert!(w.physics_speed() > speed);
                prop_assert!(approx(w.popup_interval(), popup * 0.991));
                prop_assert!(approx(w.chain_interval(), chain * 0.99));
                prop_assert!(approx(w.physics_speed(), speed * 1.02));
            }
        }
    }
}
