//! Floorfall - offline ball-through-floors video renderer
//!
//! Core modules:
//! - `sim`: Deterministic rigid-body world, floor registry, collisions
//! - `renderer`: CPU rasterizer producing RGB frames
//! - `timeline`: Collision-driven audio cues
//! - `media`: Video/audio export through `ffmpeg`
//! - `pipeline`: Per-frame driver tying everything together
//! - `settings`: Validated run configuration

pub mod error;
pub mod media;
pub mod pipeline;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod timeline;

pub use error::{ConfigError, ExportError, RunError};
pub use media::{ExportReport, MediaExporter, SoundBank};
pub use pipeline::{PipelineDriver, RunOutput};
pub use renderer::{Frame, FrameRenderer};
pub use settings::{AudioSettings, Settings};
pub use timeline::{Cue, EventTimeline, ScheduledClip, SoundId};

use glam::Vec2;

/// Default run parameters
pub mod consts {
    /// Output canvas
    pub const WIDTH: u32 = 1088;
    pub const HEIGHT: u32 = 1920;
    pub const FPS: u32 = 144;
    pub const DURATION_SECONDS: u32 = 10;
    pub const VIDEO_NAME: &str = "output.mp4";

    /// Gravity (pixels/s², +Y is down)
    pub const GRAVITY: f32 = 981.0;

    /// Floor stack
    pub const FLOOR_COUNT: usize = 3;
    pub const FLOOR_SPACING: f32 = 50.0;
    /// Collision half-thickness of each floor segment
    pub const FLOOR_RADIUS: f32 = 5.0;
    pub const FLOOR_STROKE: u32 = 5;
    pub const FLOOR_RESTITUTION: f32 = 1.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 25.0;
    pub const BALL_MASS: f32 = 1.0;
    pub const BALL_RESTITUTION: f32 = 0.8;
    pub const BALL_START_Y: f32 = 100.0;

    /// Audio lead so the audible onset lines up with the contact frame
    pub const AUDIO_LATENCY_OFFSET: f64 = -0.27;
    pub const DEFAULT_SOUND: &str = "hit";
}

/// Closest point to `p` on the segment `a`-`b`
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `p` to the segment `a`-`b`
#[inline]
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    (p - closest_point_on_segment(p, a, b)).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_point_interior() {
        let p = closest_point_on_segment(Vec2::new(5.0, 3.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((p - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let a = Vec2::ZERO;
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(Vec2::new(-4.0, 1.0), a, b), a);
        assert_eq!(closest_point_on_segment(Vec2::new(14.0, 1.0), a, b), b);
    }

    #[test]
    fn test_degenerate_segment() {
        let a = Vec2::new(2.0, 2.0);
        assert!((distance_to_segment(Vec2::new(5.0, 6.0), a, a) - 5.0).abs() < 1e-5);
    }
}
