//! Bodies, shapes, and shape identity

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable floor identifier (creation index, 0 = bottom-most)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FloorId(pub usize);

/// Tagged shape identity carried by every collision event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeId {
    Ball,
    Floor(FloorId),
}

/// Two shapes that stopped touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: ShapeId,
    pub b: ShapeId,
}

impl CollisionEvent {
    /// The floor involved if this is a ball/floor pair
    pub fn ball_floor(&self) -> Option<FloorId> {
        match (self.a, self.b) {
            (ShapeId::Ball, ShapeId::Floor(id)) | (ShapeId::Floor(id), ShapeId::Ball) => Some(id),
            _ => None,
        }
    }
}

/// The single dynamic body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub restitution: f32,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, mass: f32, restitution: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            mass,
            restitution,
        }
    }

    /// Position rounded to the nearest pixel
    pub fn pixel_pos(&self) -> (i32, i32) {
        (self.pos.x.round() as i32, self.pos.y.round() as i32)
    }
}

/// A static, thick line obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSegment {
    pub id: FloorId,
    pub a: Vec2,
    pub b: Vec2,
    /// Collision half-thickness
    pub radius: f32,
    pub restitution: f32,
}

impl FloorSegment {
    /// Horizontal floor spanning `[0, width]` at height `y`
    pub fn horizontal(id: FloorId, width: f32, y: f32, radius: f32, restitution: f32) -> Self {
        Self {
            id,
            a: Vec2::new(0.0, y),
            b: Vec2::new(width, y),
            radius,
            restitution,
        }
    }

    pub fn shape(&self) -> ShapeId {
        ShapeId::Floor(self.id)
    }
}
