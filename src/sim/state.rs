//! Game state and core simulation types
//!
//! All round flags (holding, round active, animating, game over) are derived
//! from the single [`RoundPhase`] so they cannot disagree with each other.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bridge::{self, Bridge};
use super::stick::Stick;
use super::timeline::Tween;
use super::track::PlatformTrack;
use crate::tuning::Tuning;

/// Where the current round is.
///
/// `Evaluating` and `Settling` resolve instantly; every other active phase
/// waits on either the hold signal or elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for a press
    Idle,
    /// Stick grows while the input is held
    Growing,
    /// Stick rotating down onto the gap
    Dropping { tween: Tween },
    /// Judge the bridge
    Evaluating,
    /// Hero walking along the stick
    Walking {
        tween: Tween,
        from_x: f32,
        to_x: f32,
        bridge: Bridge,
        /// Walk time at which the next footstep cue fires
        next_cue_ms: f32,
    },
    /// Camera sliding to the platform just reached
    Panning { tween: Tween, from_x: f32, to_x: f32 },
    /// Score, advance, spawn, reset
    Settling,
    /// Hero and stick falling after a miss
    Falling { tween: Tween },
    /// Run over; only a restart gets out of here
    GameOver,
}

impl RoundPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::Growing => "growing",
            RoundPhase::Dropping { .. } => "dropping",
            RoundPhase::Evaluating => "evaluating",
            RoundPhase::Walking { bridge, .. } if bridge.crossed() => "walking",
            RoundPhase::Walking { .. } => "walking-to-edge",
            RoundPhase::Panning { .. } => "panning",
            RoundPhase::Settling => "settling",
            RoundPhase::Falling { .. } => "falling",
            RoundPhase::GameOver => "game-over",
        }
    }
}

/// Named sound triggers; playback is someone else's job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Grow,
    Drop,
    Success,
    Failure,
    Walk,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Grow => "grow",
            SoundCue::Drop => "drop",
            SoundCue::Success => "success",
            SoundCue::Failure => "failure",
            SoundCue::Walk => "walk",
        }
    }
}

/// Notifications emitted by the simulation, drained by the driver each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    Released { length: f32 },
    /// Stick hit its cap and dropped without a release
    MaxLengthReached,
    Dropped,
    BridgeSucceeded { end_x: f32 },
    BridgeFailed { end_x: f32 },
    WalkFinished,
    Scored { score: u32 },
    FallStarted,
    GameOver { score: u32 },
    Restarted,
    Sound(SoundCue),
}

/// Horizontal scroll applied to the whole scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset_x: f32,
}

/// The walker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    /// x = world position, y = how far it has fallen (0 when standing)
    pub pos: Vec2,
}

impl Hero {
    pub fn standing_at(x: f32) -> Self {
        Self {
            pos: Vec2::new(x, 0.0),
        }
    }
}

/// Stream offset for the cosmetic RNG so cue rolls never disturb platform layout
const CUE_RNG_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Tuning the state machine can run with; falls back to the defaults
fn checked(tuning: Tuning) -> Tuning {
    match tuning.validate() {
        Ok(()) => tuning,
        Err(e) => {
            log::warn!("Invalid tuning, using defaults: {e:#}");
            Tuning::default()
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance knobs this run was started with
    pub tuning: Tuning,
    /// Platform generation
    pub(crate) rng: Pcg32,
    /// Sound-cue rolls (tick-rate dependent, kept apart from `rng`)
    pub(crate) cue_rng: Pcg32,
    pub(crate) track: PlatformTrack,
    pub(crate) stick: Stick,
    pub(crate) camera: Camera,
    pub(crate) hero: Hero,
    pub(crate) score: u32,
    pub(crate) best_score: u32,
    pub(crate) phase: RoundPhase,
    /// Rounds started since the last restart
    pub(crate) rounds: u32,
    /// Simulation clock
    pub(crate) clock_ms: f64,
    /// Remaining time of the transient "success" cue
    pub(crate) success_cue_ms: f32,
    /// Last seen level of the hold signal (for edge detection)
    pub(crate) input_held: bool,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game with custom tuning.
    ///
    /// Invalid tuning is logged and replaced by the defaults.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = checked(tuning);
        let mut rng = Pcg32::seed_from_u64(seed);
        let track = PlatformTrack::generate(&mut rng, &tuning);
        Self::assemble(seed, tuning, rng, track)
    }

    /// Start on a known layout; later platforms are still generated
    pub fn with_track(seed: u64, tuning: Tuning, track: PlatformTrack) -> Self {
        let tuning = checked(tuning);
        let rng = Pcg32::seed_from_u64(seed);
        Self::assemble(seed, tuning, rng, track)
    }

    fn assemble(seed: u64, tuning: Tuning, rng: Pcg32, track: PlatformTrack) -> Self {
        let current = *track.current();
        let state = Self {
            seed,
            rng,
            cue_rng: Pcg32::seed_from_u64(seed ^ CUE_RNG_SALT),
            stick: Stick::new(current.right()),
            camera: Camera::default(),
            hero: Hero::standing_at(bridge::stand_x(&current, &tuning)),
            tuning,
            track,
            score: 0,
            best_score: 0,
            phase: RoundPhase::Idle,
            rounds: 0,
            clock_ms: 0.0,
            success_cue_ms: 0.0,
            input_held: false,
            events: Vec::new(),
        };
        log::info!(
            "Game ready (seed {}): start platform x={} w={}",
            seed,
            current.position_x,
            current.width
        );
        state
    }

    /// Put track, stick, camera, hero and score back to a fresh run.
    /// The RNG keeps going so each run gets a new layout.
    pub(crate) fn reset_world(&mut self) {
        self.track = PlatformTrack::generate(&mut self.rng, &self.tuning);
        let current = *self.track.current();
        self.stick = Stick::new(current.right());
        self.camera = Camera::default();
        self.hero = Hero::standing_at(bridge::stand_x(&current, &self.tuning));
        self.score = 0;
        self.rounds = 0;
        self.success_cue_ms = 0.0;
        self.phase = RoundPhase::Idle;
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// One timestamped log line per major transition
    pub(crate) fn note(&self, args: fmt::Arguments<'_>) {
        log::info!("[{:>8.0}ms] {}", self.clock_ms, args);
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn track(&self) -> &PlatformTrack {
        &self.track
    }

    pub fn stick(&self) -> &Stick {
        &self.stick
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best score this session (not persisted)
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn is_holding(&self) -> bool {
        self.phase == RoundPhase::Growing
    }

    pub fn is_round_active(&self) -> bool {
        !matches!(self.phase, RoundPhase::Idle | RoundPhase::GameOver)
    }

    pub fn is_animating(&self) -> bool {
        self.is_round_active() && !self.is_holding()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RoundPhase::GameOver
    }

    /// Whether the "success" flash is still showing
    pub fn success_cue_active(&self) -> bool {
        self.success_cue_ms > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(42);
        assert_eq!(*state.phase(), RoundPhase::Idle);
        assert_eq!(state.score(), 0);
        assert_eq!(state.track().len(), 2);
        assert!(!state.is_round_active());
        assert!(!state.is_animating());
        assert!(!state.is_game_over());
        assert_eq!(state.camera().offset_x, 0.0);
    }

    #[test]
    fn test_stick_and_hero_start_on_first_platform() {
        let state = GameState::new(5);
        let first = *state.track().current();
        assert_eq!(state.stick().pivot_x, first.right());
        assert_eq!(state.stick().length, 0.0);
        assert_eq!(state.hero().pos, Vec2::new(first.right() - 10.0, 0.0));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(1234);
        let b = GameState::new(1234);
        assert_eq!(a.track().platforms(), b.track().platforms());
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(1);
        state.emit(GameEvent::RoundStarted);
        state.emit(GameEvent::Sound(SoundCue::Drop));
        assert_eq!(state.drain_events().len(), 2);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        use crate::sim::track::Platform;
        use crate::sim::{TickInput, tick};
        use crate::tuning::SpanRange;

        let inverted = Tuning {
            gap: SpanRange::new(200, 100),
            ..Default::default()
        };
        let state = GameState::with_tuning(1, inverted);
        assert_eq!(state.tuning, Tuning::default());
        assert_eq!(state.track().len(), 2);

        let frozen = Tuning {
            walk_speed: 0.0,
            ..Default::default()
        };
        let track = PlatformTrack::from_platforms(vec![
            Platform::new(40.0, 80.0),
            Platform::new(220.0, 50.0),
        ])
        .unwrap();
        let mut state = GameState::with_track(2, frozen, track);
        assert_eq!(state.tuning.walk_speed, Tuning::default().walk_speed);

        // A short stick must still reach game over in finite time
        let hold = TickInput {
            holding: true,
            restart: false,
        };
        tick(&mut state, &hold, 0.0);
        tick(&mut state, &hold, 50.0);
        tick(&mut state, &TickInput::default(), 0.0);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), 100.0);
        }
        assert!(state.is_game_over());
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(RoundPhase::Idle.name(), "idle");
        assert_eq!(RoundPhase::GameOver.name(), "game-over");
        assert_eq!(SoundCue::Walk.as_str(), "walk");
    }
}
