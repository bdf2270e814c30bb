//! The stick: grows while held, rotates down when released

use serde::{Deserialize, Serialize};

use crate::{ease_in_quad, ease_out_cubic};

/// Result of one growth step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowStep {
    /// Still below the cap
    Growing,
    /// Hit the cap; `leftover_ms` is the part of the step not spent growing
    Capped { leftover_ms: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    /// Current length in px
    pub length: f32,
    /// 0 = standing upright, 90 = lying flat across the gap, 180 = hanging down
    pub angle_deg: f32,
    /// Foot of the stick (right edge of the platform it stands on)
    pub pivot_x: f32,
}

impl Stick {
    pub fn new(pivot_x: f32) -> Self {
        Self {
            length: 0.0,
            angle_deg: 0.0,
            pivot_x,
        }
    }

    /// Grow for `dt_ms` at `rate` px/ms, never past `max_length`
    pub fn grow(&mut self, dt_ms: f32, rate: f32, max_length: f32) -> GrowStep {
        let dt_ms = dt_ms.max(0.0);
        let room = (max_length - self.length).max(0.0);
        let wanted = dt_ms * rate;
        if wanted >= room {
            self.length = max_length;
            let used_ms = if rate > 0.0 { room / rate } else { dt_ms };
            GrowStep::Capped {
                leftover_ms: (dt_ms - used_ms).max(0.0),
            }
        } else {
            self.length += wanted;
            GrowStep::Growing
        }
    }

    /// Drop rotation for progress `t` in [0, 1]
    pub fn set_drop_progress(&mut self, t: f32) {
        self.angle_deg = 90.0 * ease_out_cubic(t);
    }

    /// Tip-over past horizontal while the hero falls
    pub fn set_tip_progress(&mut self, t: f32) {
        self.angle_deg = 90.0 + 90.0 * ease_in_quad(t);
    }

    /// Where the far end lands once the stick lies flat
    pub fn tip_x(&self) -> f32 {
        self.pivot_x + self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grow_linear() {
        let mut stick = Stick::new(100.0);
        assert_eq!(stick.grow(100.0, 0.2, 300.0), GrowStep::Growing);
        assert!((stick.length - 20.0).abs() < 1e-4);
        assert_eq!(stick.tip_x(), 100.0 + stick.length);
    }

    #[test]
    fn test_grow_caps_with_leftover() {
        let mut stick = Stick::new(0.0);
        stick.grow(1400.0, 0.2, 300.0);
        assert!((stick.length - 280.0).abs() < 1e-3);
        // 20px of room left = 100ms of growth, rest is leftover
        match stick.grow(250.0, 0.2, 300.0) {
            GrowStep::Capped { leftover_ms } => assert!((leftover_ms - 150.0).abs() < 1e-2),
            GrowStep::Growing => panic!("should have capped"),
        }
        assert_eq!(stick.length, 300.0);
    }

    #[test]
    fn test_exact_cap_counts_as_capped() {
        let mut stick = Stick::new(0.0);
        let step = stick.grow(1500.0, 0.2, 300.0);
        assert!(matches!(step, GrowStep::Capped { .. }));
        assert_eq!(stick.length, 300.0);
    }

    #[test]
    fn test_drop_and_tip_angles() {
        let mut stick = Stick::new(0.0);
        stick.set_drop_progress(0.0);
        assert_eq!(stick.angle_deg, 0.0);
        stick.set_drop_progress(1.0);
        assert_eq!(stick.angle_deg, 90.0);
        stick.set_tip_progress(1.0);
        assert_eq!(stick.angle_deg, 180.0);
    }

    proptest! {
        #[test]
        fn prop_growth_monotonic_and_capped(steps in prop::collection::vec(0.0f32..120.0, 1..200)) {
            let mut stick = Stick::new(50.0);
            let mut last = 0.0;
            for dt in steps {
                let step = stick.grow(dt, 0.2, 300.0);
                prop_assert!(stick.length >= last);
                prop_assert!(stick.length <= 300.0);
                last = stick.length;
                if matches!(step, GrowStep::Capped { .. }) {
                    prop_assert_eq!(stick.length, 300.0);
                    break;
                }
            }
        }
    }
}
