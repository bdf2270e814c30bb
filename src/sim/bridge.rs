//! Bridge evaluation and where the hero walks afterwards

use serde::{Deserialize, Serialize};

use super::track::Platform;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Stick tip landed on the target platform
    Crossed,
    /// Stick tip missed (short or overshot)
    Missed,
}

/// Outcome of laying a stick across a gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    pub verdict: Verdict,
    /// Where the stick tip ends up, needed by the walk either way
    pub end_x: f32,
}

impl Bridge {
    pub fn crossed(&self) -> bool {
        self.verdict == Verdict::Crossed
    }
}

/// Judge a stick of `length` pivoting at `pivot_x` against `to`.
///
/// Closed interval: a tip exactly on either edge of `to` still crosses.
pub fn evaluate(length: f32, pivot_x: f32, to: &Platform) -> Bridge {
    let end_x = pivot_x + length;
    let verdict = if end_x >= to.position_x && end_x <= to.right() {
        Verdict::Crossed
    } else {
        Verdict::Missed
    };
    Bridge { verdict, end_x }
}

/// Where the hero stands when resting on `platform`
pub fn stand_x(platform: &Platform, tuning: &Tuning) -> f32 {
    platform.right() - tuning.hero_edge_inset.min(platform.width)
}

/// Walk destination after a bridge is judged.
///
/// A miss stops just short of the stick tip even when the tip overshot the
/// target platform entirely.
pub fn walk_target(bridge: &Bridge, to: &Platform, tuning: &Tuning) -> f32 {
    match bridge.verdict {
        Verdict::Crossed => stand_x(to, tuning),
        Verdict::Missed => bridge.end_x - tuning.fail_walk_shortfall,
    }
}
