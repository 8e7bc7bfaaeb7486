//! Rasterization of 2D primitives into a frame
//!
//! Pixels are sampled at integer coordinates. Everything is clipped to the
//! frame bounds, so shapes may extend off-canvas.

use glam::Vec2;

use super::frame::Frame;
use crate::distance_to_segment;
use crate::settings::Rgb;

/// Draw a line of `width` pixels between `a` and `b` (rounded caps)
pub fn line(frame: &mut Frame, a: Vec2, b: Vec2, width: u32, color: Rgb) {
    if width == 0 {
        return;
    }
    let half = width as f32 / 2.0;

    let min = a.min(b) - Vec2::splat(half);
    let max = a.max(b) + Vec2::splat(half);
    let (x0, y0, x1, y1) = clip_box(frame, min, max);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Vec2::new(x as f32, y as f32);
            if distance_to_segment(p, a, b) <= half {
                frame.put(x, y, color);
            }
        }
    }
}

/// Draw a filled disk
pub fn disk(frame: &mut Frame, center: (i32, i32), radius: f32, color: Rgb) {
    if radius <= 0.0 {
        return;
    }
    let c = Vec2::new(center.0 as f32, center.1 as f32);
    let r_sq = radius * radius;
    let (x0, y0, x1, y1) = clip_box(frame, c - Vec2::splat(radius), c + Vec2::splat(radius));

    for y in y0..=y1 {
        let dy = y as f32 - c.y;
        for x in x0..=x1 {
            let dx = x as f32 - c.x;
            if dx * dx + dy * dy <= r_sq {
                frame.put(x, y, color);
            }
        }
    }
}

/// Integer bounding box clamped to the frame; empty boxes yield `x0 > x1`
fn clip_box(frame: &Frame, min: Vec2, max: Vec2) -> (i64, i64, i64, i64) {
    let w = frame.width() as i64;
    let h = frame.height() as i64;
    let x0 = (min.x.floor() as i64).max(0);
    let y0 = (min.y.floor() as i64).max(0);
    let x1 = (max.x.ceil() as i64).min(w - 1);
    let y1 = (max.y.ceil() as i64).min(h - 1);
    (x0, y0, x1, y1)
}
