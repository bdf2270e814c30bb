//! Sound cues
//!
//! Procedurally generated with the Web Audio API in the browser. Anywhere
//! audio is unavailable (native builds, blocked AudioContext) the manager
//! stays silent and the game runs exactly the same.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::{GameEvent, SoundCue};

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    available: bool,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Cues requested since creation (including silenced ones)
    cues_requested: u64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            available: ctx.is_some(),
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            cues_requested: 0,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        log::warn!("No audio backend on this platform - sound cues are silent");
        Self::silent()
    }

    /// A manager with no output at all
    pub fn silent() -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx: None,
            available: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            cues_requested: 0,
        }
    }

    /// Create and apply volume preferences
    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Whether sound can actually be heard
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn cues_requested(&self) -> u64 {
        self.cues_requested
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted || !self.available {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play every sound cue found in a batch of simulation events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::Sound(cue) = event {
                self.play(*cue);
            }
        }
    }

    /// Play a sound cue; fire-and-forget
    pub fn play(&mut self, cue: SoundCue) {
        self.cues_requested += 1;
        let vol = self.effective_volume();
        if vol <= 0.0 {
            log::trace!("cue {} (silent)", cue.as_str());
            return;
        }

        #[cfg(target_arch = "wasm32")]
        {
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                SoundCue::Grow => self.play_grow(ctx, vol),
                SoundCue::Drop => self.play_drop(ctx, vol),
                SoundCue::Success => self.play_success(ctx, vol),
                SoundCue::Failure => self.play_failure(ctx, vol),
                SoundCue::Walk => self.play_walk(ctx, vol),
            }
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Grow - short rising creak
    #[cfg(target_arch = "wasm32")]
    fn play_grow(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(330.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Drop - falling swoosh ending in a thud
    #[cfg(target_arch = "wasm32")]
    fn play_drop(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(600.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
    }

    /// Success - two-note chime
    #[cfg(target_arch = "wasm32")]
    fn play_success(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [660.0, 990.0].iter().enumerate() {
            let delay = i as f64 * 0.09;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }

    /// Failure - sad descending buzz
    #[cfg(target_arch = "wasm32")]
    fn play_failure(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.6)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.6)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.65).ok();
    }

    /// Walk - soft footstep tick
    #[cfg(target_arch = "wasm32")]
    fn play_walk(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 140.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.08, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.03)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.04).ok();
    }
}
