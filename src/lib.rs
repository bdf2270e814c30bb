//! Stick Bridge - a one-button reflex game
//!
//! Core modules:
//! - `sim`: Deterministic round state machine (track, stick, bridge, timing)
//! - `snapshot`: Plain data handed to whatever paints the scene
//! - `audio`: Fire-and-forget sound cues
//! - `settings`: Player preferences with load/save
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use settings::Settings;
pub use snapshot::FrameSnapshot;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Left edge of the very first platform
    pub const FIRST_PLATFORM_X: f32 = 40.0;
    /// First platform width range (inclusive)
    pub const FIRST_PLATFORM_MIN_WIDTH: u32 = 70;
    pub const FIRST_PLATFORM_MAX_WIDTH: u32 = 90;

    /// Width range for every later platform (inclusive)
    pub const MIN_PLATFORM_WIDTH: u32 = 50;
    pub const MAX_PLATFORM_WIDTH: u32 = 90;
    /// Gap between consecutive platforms (inclusive)
    pub const MIN_GAP: u32 = 60;
    pub const MAX_GAP: u32 = 160;

    /// Stick growth while held (px per ms)
    pub const GROW_RATE: f32 = 0.2;
    /// Stick stops growing and drops on its own here
    pub const MAX_STICK_LENGTH: f32 = 300.0;
    /// Drop rotation 0° -> 90°
    pub const DROP_DURATION_MS: f32 = 400.0;

    /// Hero walking speed (px per ms)
    pub const WALK_SPEED: f32 = 0.15;
    /// A short bridge leaves the hero this far before the stick tip
    pub const FAIL_WALK_SHORTFALL: f32 = 10.0;
    /// Hero stands this far in from a platform's right edge
    pub const HERO_EDGE_INSET: f32 = 10.0;

    /// Camera keeps this much of the scene left of the active platform
    pub const CAMERA_LEAD: f32 = 30.0;
    pub const PAN_DURATION_MS: f32 = 600.0;

    /// Fall after a missed bridge
    pub const FALL_DURATION_MS: f32 = 500.0;
    pub const FALL_DEPTH: f32 = 400.0;

    /// How long the "success" cue stays visible after a crossing
    pub const SUCCESS_CUE_MS: f32 = 700.0;

    /// Chance per ms of growth that a grow creak is emitted
    pub const GROW_CUE_CHANCE_PER_MS: f32 = 0.004;
    /// Footstep cadence while walking
    pub const WALK_CUE_INTERVAL_MS: f32 = 180.0;

    /// Longest frame the drivers hand to the simulation (tab switches, stalls)
    pub const MAX_FRAME_MS: f32 = 100.0;
    /// Stage transitions allowed in one tick before yielding
    pub const MAX_STAGE_STEPS: u32 = 16;
}

/// `1 - (1 - t)^3`, with `t` clamped to [0, 1]
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// `t^2`, with `t` clamped to [0, 1]
#[inline]
pub fn ease_in_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
