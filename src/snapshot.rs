//! Per-frame render data
//!
//! The simulation never touches drawing APIs; whatever paints the scene reads
//! one of these after every tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{GameState, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickView {
    pub pivot_x: f32,
    pub length: f32,
    pub angle_deg: f32,
}

/// Everything needed to draw one frame, in world coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub platforms: Vec<Platform>,
    pub current_platform: usize,
    pub stick: StickView,
    /// x = world position, y = fall offset
    pub hero: Vec2,
    pub camera_offset_x: f32,
    pub score: u32,
    pub best_score: u32,
    pub phase: &'static str,
    pub game_over: bool,
    /// Show the transient "success" flash
    pub success_cue: bool,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let stick = state.stick();
        Self {
            platforms: state.track().platforms().to_vec(),
            current_platform: state.track().current_index(),
            stick: StickView {
                pivot_x: stick.pivot_x,
                length: stick.length,
                angle_deg: stick.angle_deg,
            },
            hero: state.hero().pos,
            camera_offset_x: state.camera().offset_x,
            score: state.score(),
            best_score: state.best_score(),
            phase: state.phase().name(),
            game_over: state.is_game_over(),
            success_cue: state.success_cue_active(),
        }
    }

    /// Platforms that overlap the window `[0, view_width]` after the camera offset
    pub fn visible_platforms(&self, view_width: f32) -> impl Iterator<Item = &Platform> {
        let offset = self.camera_offset_x;
        self.platforms
            .iter()
            .filter(move |p| p.right() + offset >= 0.0 && p.position_x + offset <= view_width)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl GameState {
    /// Render data for the current frame
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }
}
