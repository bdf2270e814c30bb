//! Demo player
//!
//! Holds until the stick would land somewhere on the next platform, give or
//! take an aiming error, then lets go. Drives the attract mode and the native
//! headless run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameState, RoundPhase};
use super::tick::TickInput;

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    /// Max aiming error in px either side of the target platform's middle
    wobble: f32,
    /// Length to release at for the round in progress
    target_length: Option<f32>,
    /// Restart automatically after a game over
    pub auto_restart: bool,
}

impl Autopilot {
    pub fn new(seed: u64, wobble: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            wobble: wobble.max(0.0),
            target_length: None,
            auto_restart: false,
        }
    }

    /// Decide this tick's input
    pub fn input(&mut self, state: &GameState) -> TickInput {
        match state.phase() {
            RoundPhase::Idle => {
                let Some(next) = state.track().next() else {
                    return TickInput::default();
                };
                let middle = next.position_x + next.width / 2.0;
                let error = if self.wobble > 0.0 {
                    self.rng.random_range(-self.wobble..=self.wobble)
                } else {
                    0.0
                };
                let length = (middle + error - state.stick().pivot_x).max(0.0);
                log::debug!("Autopilot aiming for {:.1}px", length);
                self.target_length = Some(length);
                TickInput {
                    holding: true,
                    restart: false,
                }
            }
            RoundPhase::Growing => {
                let target = self.target_length.unwrap_or(0.0);
                TickInput {
                    holding: state.stick().length < target,
                    restart: false,
                }
            }
            RoundPhase::GameOver => TickInput {
                holding: false,
                restart: self.auto_restart,
            },
            _ => {
                self.target_length = None;
                TickInput::default()
            }
        }
    }
}
