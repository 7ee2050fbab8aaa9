//! Slice Arcade headless demo
//!
//! Runs a session against the in-memory host with a scripted auto-slicer
//! and prints a JSON summary. Pass a config file path to override tuning.

use std::collections::HashSet;
use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use slice_arcade::consts::*;
use slice_arcade::sim::{
    GameSession, InputEvent, SessionEvent, TargetId, TargetKind, segment_hits_circle,
};
use slice_arcade::{HeadlessHost, SessionConfig};

/// Wall-clock length of the demo
const DEMO_SECONDS: f32 = 120.0;
/// Chance the bot goes for any given regular target
const BOT_ACCURACY: f64 = 0.85;
/// Targets are considered once they climb above this share of the field height
const BOT_REACTION_HEIGHT: f32 = 1.0 / 3.0;

/// Demo bot: swipes through regular targets, steering clear of hazards
struct AutoSlicer {
    rng: Pcg32,
    /// Targets already swung at or deliberately ignored
    decided: HashSet<TargetId>,
}

impl AutoSlicer {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0xb07),
            decided: HashSet::new(),
        }
    }

    /// Pick at most one swipe for this frame
    fn plan(&mut self, session: &GameSession) -> Option<(Vec2, Vec2)> {
        let field = &session.config().field;
        let radius = field.hit_radius;
        let reaction_y = field.height * BOT_REACTION_HEIGHT;
        let hazards: Vec<Vec2> = session
            .targets()
            .iter()
            .filter(|t| t.is_alive() && t.kind == TargetKind::Hazard)
            .map(|t| t.position)
            .collect();

        for target in session.targets() {
            if !target.is_alive()
                || target.kind != TargetKind::Regular
                || target.position.y < reaction_y
                || self.decided.contains(&target.id)
            {
                continue;
            }
            self.decided.insert(target.id);

            if !self.rng.random_bool(BOT_ACCURACY) {
                log::debug!("Bot lets {} fall", target.id);
                continue;
            }

            // Try a few swipe angles that avoid every hazard
            for angle in [0.0f32, 0.8, -0.8, 1.57] {
                let dir = Vec2::from_angle(angle) * 90.0;
                let (from, to) = (target.position - dir, target.position + dir);
                if hazards
                    .iter()
                    .all(|h| !segment_hits_circle(from, to, *h, radius))
                {
                    return Some((from, to));
                }
            }
            log::debug!("Bot skips {}: no safe swipe", target.id);
        }
        None
    }
}

fn main() {
    env_logger::init();
    log::info!("Slice Arcade (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match SessionConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => SessionConfig::default(),
    };

    let mut session = match GameSession::new(config) {
        Ok(session) => session,
        Err(err) => {
            log::error!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    let mut host = HeadlessHost::new();
    let mut bot = AutoSlicer::new(session.seed());
    session.start(&mut host);

    let frames = (DEMO_SECONDS / SIM_DT) as u32;
    for _ in 0..frames {
        host.step(SIM_DT);
        session.on_tick(SIM_DT, &mut host);

        if let Some((from, to)) = bot.plan(&session) {
            for event in [InputEvent::Begin(from), InputEvent::Sample(to), InputEvent::End] {
                for hit in session.handle_input(event, &mut host) {
                    log::debug!("Bot sliced {:?} {}", hit.kind, hit.id);
                }
            }
        }

        for event in session.take_events() {
            match event {
                SessionEvent::WaveTossed { .. }
                | SessionEvent::LifeLost { .. }
                | SessionEvent::GameEnded { .. }
                | SessionEvent::SequenceExhausted => log::info!("{event:?}"),
                _ => log::trace!("{event:?}"),
            }
        }

        if session.is_game_ended() {
            break;
        }
    }

    let summary = session.summary();
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize summary: {err}"),
    }
}
