//! Deterministic game core
//!
//! All gameplay logic lives here. Given the same seed and the same sequence
//! of ticks and gesture samples, a session plays out identically:
//! - Seeded RNG only, injected at construction
//! - Delays are explicit schedule entries, never threads or closures
//! - Stable iteration order (targets in spawn order)
//! - No rendering or physics; those are host commands

pub mod collision;
pub mod gesture;
pub mod kinematics;
pub mod schedule;
pub mod session;
pub mod state;
pub mod target;
pub mod tick;
pub mod wave;

pub use collision::{closest_point_on_segment, segment_hits_circle};
pub use gesture::{GestureSample, SliceGesture, TestSegment};
pub use kinematics::{Lane, LaunchParams, RandomKinematics, UniformRange};
pub use schedule::{Schedule, ScheduledAction, ScheduledEntry};
pub use session::GameSession;
pub use state::{EndCause, SessionEvent, SessionState, SessionSummary, SliceHit};
pub use target::{KindChoice, Target, TargetId, TargetKind, TargetState};
pub use tick::InputEvent;
pub use wave::{ChainShape, WaveDispatch, WavePattern, WaveSequence, WaveSequencer};
