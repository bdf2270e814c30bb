//! Data-driven game balance
//!
//! Every number the round state machine reads lives here so a settings file
//! can override it. Defaults come from [`crate::consts`].

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Inclusive integer range used by the platform generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanRange {
    pub min: u32,
    pub max: u32,
}

impl SpanRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the range (both ends count)
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min as f32 && value <= self.max as f32
    }
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub first_platform_x: f32,
    pub first_platform_width: SpanRange,
    pub platform_width: SpanRange,
    pub gap: SpanRange,

    /// px per ms
    pub grow_rate: f32,
    pub max_stick_length: f32,
    pub drop_duration_ms: f32,

    /// px per ms
    pub walk_speed: f32,
    pub fail_walk_shortfall: f32,
    pub hero_edge_inset: f32,

    pub camera_lead: f32,
    pub pan_duration_ms: f32,

    pub fall_duration_ms: f32,
    pub fall_depth: f32,

    pub success_cue_ms: f32,
    pub grow_cue_chance_per_ms: f32,
    pub walk_cue_interval_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            first_platform_x: FIRST_PLATFORM_X,
            first_platform_width: SpanRange::new(FIRST_PLATFORM_MIN_WIDTH, FIRST_PLATFORM_MAX_WIDTH),
            platform_width: SpanRange::new(MIN_PLATFORM_WIDTH, MAX_PLATFORM_WIDTH),
            gap: SpanRange::new(MIN_GAP, MAX_GAP),

            grow_rate: GROW_RATE,
            max_stick_length: MAX_STICK_LENGTH,
            drop_duration_ms: DROP_DURATION_MS,

            walk_speed: WALK_SPEED,
            fail_walk_shortfall: FAIL_WALK_SHORTFALL,
            hero_edge_inset: HERO_EDGE_INSET,

            camera_lead: CAMERA_LEAD,
            pan_duration_ms: PAN_DURATION_MS,

            fall_duration_ms: FALL_DURATION_MS,
            fall_depth: FALL_DEPTH,

            success_cue_ms: SUCCESS_CUE_MS,
            grow_cue_chance_per_ms: GROW_CUE_CHANCE_PER_MS,
            walk_cue_interval_ms: WALK_CUE_INTERVAL_MS,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields keep their defaults) and validate it
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("tuning is not valid JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the state machine cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, range) in [
            ("first_platform_width", self.first_platform_width),
            ("platform_width", self.platform_width),
            ("gap", self.gap),
        ] {
            if range.min > range.max {
                bail!("{name}: min {} exceeds max {}", range.min, range.max);
            }
        }
        if self.platform_width.min == 0 || self.first_platform_width.min == 0 {
            bail!("platform widths must be at least 1px");
        }

        for (name, value) in [
            ("grow_rate", self.grow_rate),
            ("max_stick_length", self.max_stick_length),
            ("walk_speed", self.walk_speed),
            ("walk_cue_interval_ms", self.walk_cue_interval_ms),
        ] {
            if !(value.is_finite() && value > 0.0) {
                bail!("{name} must be positive, got {value}");
            }
        }

        for (name, value) in [
            ("drop_duration_ms", self.drop_duration_ms),
            ("pan_duration_ms", self.pan_duration_ms),
            ("fall_duration_ms", self.fall_duration_ms),
            ("success_cue_ms", self.success_cue_ms),
            ("fall_depth", self.fall_depth),
            ("fail_walk_shortfall", self.fail_walk_shortfall),
            ("hero_edge_inset", self.hero_edge_inset),
            ("grow_cue_chance_per_ms", self.grow_cue_chance_per_ms),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                bail!("{name} must be non-negative, got {value}");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.gap, SpanRange::new(60, 160));
        assert_eq!(tuning.platform_width, SpanRange::new(50, 90));
        assert_eq!(tuning.first_platform_width, SpanRange::new(70, 90));
        assert_eq!(tuning.max_stick_length, 300.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "grow_rate": 0.5, "gap": { "min": 80, "max": 80 } }"#)
            .unwrap();
        assert_eq!(tuning.grow_rate, 0.5);
        assert_eq!(tuning.gap, SpanRange::new(80, 80));
        assert_eq!(tuning.walk_speed, WALK_SPEED);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = Tuning::from_json(r#"{ "gap": { "min": 200, "max": 100 } }"#).unwrap_err();
        assert!(err.to_string().contains("gap"));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        let tuning = Tuning {
            walk_speed: 0.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_garbage_json_rejected() {
        assert!(Tuning::from_json("not json").is_err());
    }

    #[test]
    fn test_span_contains_is_inclusive() {
        let span = SpanRange::new(60, 160);
        assert!(span.contains(60.0));
        assert!(span.contains(160.0));
        assert!(!span.contains(59.9));
        assert!(!span.contains(160.1));
    }
}
