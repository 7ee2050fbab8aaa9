//! Slice Arcade - a wave-sequenced slicing game core
//!
//! Core modules:
//! - `sim`: Deterministic game core (wave sequencing, gesture slicing, session rules)
//! - `host`: Renderer / physics collaborator traits the core calls into
//! - `headless`: In-memory host used by the demo binary and tests
//! - `config`: Data-driven tuning loaded from JSON

pub mod config;
pub mod error;
pub mod headless;
pub mod host;
pub mod sim;

pub use config::SessionConfig;
pub use error::{ConfigError, RangeError};
pub use headless::HeadlessHost;
pub use host::{Effect, Host, PhysicsDelegate, Renderer};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Host frame step used by the headless demo (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Play surface dimensions
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 768.0;

    /// Targets launch from just below the visible area
    pub const SPAWN_Y: f32 = -128.0;
    /// Targets below this height have left play
    pub const EXIT_Y: f32 = -140.0;
    /// Inclusive spawn column range
    pub const SPAWN_X_MIN: i32 = 64;
    pub const SPAWN_X_MAX: i32 = 960;

    /// Hit circle around each target (matches the physics body radius)
    pub const TARGET_HIT_RADIUS: f32 = 64.0;

    /// Launch sampling ranges, in "units" scaled by `VELOCITY_SCALE`
    pub const FAST_LANE_SPEED: (i32, i32) = (8, 15);
    pub const SLOW_LANE_SPEED: (i32, i32) = (3, 5);
    pub const VERTICAL_SPEED: (i32, i32) = (24, 32);
    pub const VELOCITY_SCALE: f32 = 40.0;
    /// Angular velocity units, scaled by `ANGULAR_SCALE`
    pub const ANGULAR_SPEED: (i32, i32) = (-6, 6);
    pub const ANGULAR_SCALE: f32 = 0.5;

    /// Gesture path bound
    pub const MAX_PATH_POINTS: usize = 12;

    /// Lives at session start
    pub const MAX_LIVES: u8 = 3;
    /// One in `HAZARD_ODDS` random targets is a hazard
    pub const HAZARD_ODDS: u32 = 7;

    /// Wave timing defaults (seconds)
    pub const FIRST_WAVE_DELAY: f32 = 2.0;
    pub const POPUP_INTERVAL: f32 = 0.9;
    pub const CHAIN_INTERVAL: f32 = 3.0;
    /// Physics time scale at session start
    pub const PHYSICS_SPEED: f32 = 0.85;

    /// Per-wave difficulty escalation (multiplicative)
    pub const POPUP_DECAY: f32 = 0.991;
    pub const CHAIN_DECAY: f32 = 0.99;
    pub const SPEED_GROWTH: f32 = 1.02;

    /// Number of random patterns appended after the fixed opening
    pub const RANDOM_WAVE_COUNT: usize = 1001;

    /// World gravity in meters/s²
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -6.0);
    /// Host conversion between physics meters and field pixels
    pub const PIXELS_PER_METER: f32 = 150.0;

    /// How long a swoosh effect blocks the next one
    pub const SWOOSH_DURATION: f32 = 0.35;
    /// Number of swoosh variants (`swoosh1` ..= `swoosh3`)
    pub const SWOOSH_VARIANTS: u8 = 3;
}
