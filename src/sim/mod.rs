//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only arrives through `tick`'s elapsed milliseconds
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies; output is events + snapshots

pub mod autopilot;
pub mod bridge;
pub mod state;
pub mod stick;
pub mod tick;
pub mod timeline;
pub mod track;

pub use autopilot::Autopilot;
pub use bridge::{Bridge, Verdict, evaluate, stand_x, walk_target};
pub use state::{Camera, GameEvent, GameState, Hero, RoundPhase, SoundCue};
pub use stick::{GrowStep, Stick};
pub use tick::{TickInput, tick};
pub use timeline::Tween;
pub use track::{Platform, PlatformTrack};
