//! Elapsed-time driven stage timer
//!
//! Every timed stage (drop, walk, pan, fall) advances one of these by the
//! wall-clock time since the previous tick. Time left over once a stage
//! completes is handed back so the next stage can consume it in the same tick,
//! which makes the outcome independent of how finely time is sliced.

use serde::{Deserialize, Serialize};

/// A fixed-duration timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    elapsed_ms: f32,
    duration_ms: f32,
}

impl Tween {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// Advance by `dt_ms`. Returns the part of `dt_ms` not needed to finish.
    pub fn advance(&mut self, dt_ms: f32) -> f32 {
        let dt_ms = dt_ms.max(0.0);
        let remaining = self.duration_ms - self.elapsed_ms;
        if dt_ms >= remaining {
            self.elapsed_ms = self.duration_ms;
            dt_ms - remaining
        } else {
            self.elapsed_ms += dt_ms;
            0.0
        }
    }

    /// Fraction complete in [0, 1]; a zero-length tween is always complete
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }
}
