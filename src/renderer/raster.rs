//! Frame renderer: world state -> pixels

use super::frame::Frame;
use super::shapes;
use crate::settings::{Rgb, Settings};
use crate::sim::{Ball, FloorRegistry, FloorSegment};

/// Draws the live floors and the ball onto a fixed-size canvas
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    width: u32,
    height: u32,
    background: Rgb,
    floor_color: Rgb,
    floor_stroke: u32,
    ball_color: Rgb,
}

impl FrameRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            background: settings.background,
            floor_color: settings.floor_color,
            floor_stroke: settings.floor_stroke,
            ball_color: settings.ball_color,
        }
    }

    /// Render the current world state
    pub fn render(&self, floors: &FloorRegistry, ball: &Ball) -> Frame {
        self.render_parts(floors.live(), ball)
    }

    /// Render from raw parts: background, then floors, then the ball on top
    pub fn render_parts(&self, floors: &[FloorSegment], ball: &Ball) -> Frame {
        let mut frame = Frame::filled(self.width, self.height, self.background);

        for floor in floors {
            shapes::line(&mut frame, floor.a, floor.b, self.floor_stroke, self.floor_color);
        }

        shapes::disk(&mut frame, ball.pixel_pos(), ball.radius, self.ball_color);

        frame
    }
}
