//! Platforms and the append-only track the hero travels along

use anyhow::bail;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::{SpanRange, Tuning};

/// A platform, immutable once placed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub position_x: f32,
    pub width: f32,
}

impl Platform {
    pub fn new(position_x: f32, width: f32) -> Self {
        Self { position_x, width }
    }

    /// Right edge (where a stick standing on this platform pivots)
    #[inline]
    pub fn right(&self) -> f32 {
        self.position_x + self.width
    }
}

/// Uniform integer draw from an inclusive range
fn roll<R: Rng + ?Sized>(rng: &mut R, range: SpanRange) -> f32 {
    rng.random_range(range.min..=range.max) as f32
}

/// Ordered platforms plus the index the hero currently stands on.
///
/// Platforms are only ever appended; the index only moves forward. A restart
/// replaces the whole track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TrackRecord")]
pub struct PlatformTrack {
    platforms: Vec<Platform>,
    current: usize,
}

/// Unchecked wire form of [`PlatformTrack`]
#[derive(Deserialize)]
struct TrackRecord {
    platforms: Vec<Platform>,
    current: usize,
}

impl TryFrom<TrackRecord> for PlatformTrack {
    type Error = anyhow::Error;

    fn try_from(record: TrackRecord) -> anyhow::Result<Self> {
        if record.platforms.len() < 2 {
            bail!("track needs at least 2 platforms, got {}", record.platforms.len());
        }
        if record.current + 1 >= record.platforms.len() {
            bail!(
                "current platform {} has nothing ahead of it ({} platforms)",
                record.current,
                record.platforms.len()
            );
        }
        Ok(Self {
            platforms: record.platforms,
            current: record.current,
        })
    }
}

impl PlatformTrack {
    /// Fresh two-platform track
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Self {
        let mut track = Self {
            platforms: Vec::with_capacity(16),
            current: 0,
        };
        track.spawn_initial(rng, tuning);
        track
    }

    /// Build a track from known platforms (fixed layouts, replays, tests).
    ///
    /// Returns `None` unless there are at least two platforms.
    pub fn from_platforms(platforms: Vec<Platform>) -> Option<Self> {
        if platforms.len() < 2 {
            return None;
        }
        Some(Self {
            platforms,
            current: 0,
        })
    }

    /// Clear and lay down the start platform and its first neighbour
    pub fn spawn_initial<R: Rng + ?Sized>(&mut self, rng: &mut R, tuning: &Tuning) {
        self.platforms.clear();
        self.current = 0;

        let first = Platform::new(tuning.first_platform_x, roll(rng, tuning.first_platform_width));
        self.platforms.push(first);
        self.spawn_next(rng, tuning);
    }

    /// Append one platform past the last, using the gap/width ranges
    pub fn spawn_next<R: Rng + ?Sized>(&mut self, rng: &mut R, tuning: &Tuning) {
        let last_right = self.platforms.last().map(Platform::right).unwrap_or(tuning.first_platform_x);
        let gap = roll(rng, tuning.gap);
        let width = roll(rng, tuning.platform_width);
        let platform = Platform::new(last_right + gap, width);
        log::debug!(
            "Platform #{}: x={} width={} (gap {})",
            self.platforms.len(),
            platform.position_x,
            platform.width,
            gap
        );
        self.platforms.push(platform);
    }

    /// Step onto the next platform. The caller must follow with `spawn_next`.
    pub fn advance(&mut self) {
        debug_assert!(self.current + 1 < self.platforms.len());
        self.current = (self.current + 1).min(self.platforms.len() - 1);
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Platform {
        &self.platforms[self.current]
    }

    /// The platform the next stick has to reach
    pub fn next(&self) -> Option<&Platform> {
        self.platforms.get(self.current + 1)
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}
