//! Rigid-body world: one dynamic ball against a set of static floors
//!
//! `step` integrates with semi-implicit Euler (velocity first, then position),
//! resolves contacts, and returns separation events. Because `step` borrows
//! the world mutably and hands events back only after it finishes, shapes can
//! never be removed while contacts are being resolved; callers apply removals
//! between steps.

use std::collections::BTreeSet;

use glam::Vec2;

use super::body::{Ball, CollisionEvent, FloorId, FloorSegment, ShapeId};
use super::collision::{resolve_velocity, swept_contact};
use crate::distance_to_segment;

#[derive(Debug, Clone)]
pub struct RigidBodyWorld {
    gravity: Vec2,
    ball: Ball,
    /// Active floors, kept sorted by id
    floors: Vec<FloorSegment>,
    /// Floors the ball touched during the previous step
    touching: BTreeSet<FloorId>,
    steps: u64,
}

impl RigidBodyWorld {
    /// Create a world with gravity `(0, g)` (+Y is down)
    pub fn new(gravity: f32, ball: Ball) -> Self {
        Self {
            gravity: Vec2::new(0.0, gravity),
            ball,
            floors: Vec::new(),
            touching: BTreeSet::new(),
            steps: 0,
        }
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Active floors in id order
    pub fn floors(&self) -> &[FloorSegment] {
        &self.floors
    }

    pub fn contains(&self, id: FloorId) -> bool {
        self.index_of(id).is_ok()
    }

    /// Number of completed steps
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Add a floor to the active collision set
    ///
    /// Returns `false` (and changes nothing) if a floor with the same id is
    /// already active.
    pub fn add(&mut self, floor: FloorSegment) -> bool {
        match self.index_of(floor.id) {
            Ok(_) => false,
            Err(idx) => {
                self.floors.insert(idx, floor);
                true
            }
        }
    }

    /// Remove a floor from the active collision set
    pub fn remove(&mut self, id: FloorId) -> Option<FloorSegment> {
        let idx = self.index_of(id).ok()?;
        self.touching.remove(&id);
        Some(self.floors.remove(idx))
    }

    /// Advance the world by exactly `dt` seconds
    ///
    /// Returns one event per ball/floor pair that was in contact during the
    /// previous step and no longer is. Contacts are swept from the start of
    /// the step, nearest floor first, so a fast ball cannot tunnel through.
    pub fn step(&mut self, dt: f32) -> Vec<CollisionEvent> {
        let ball = &mut self.ball;
        let from = ball.pos;
        ball.vel += self.gravity * dt;
        ball.pos += ball.vel * dt;

        let mut nearest_first: Vec<&FloorSegment> = self.floors.iter().collect();
        nearest_first.sort_by(|p, q| {
            distance_to_segment(from, p.a, p.b).total_cmp(&distance_to_segment(from, q.a, q.b))
        });

        let mut now_touching = BTreeSet::new();
        for floor in nearest_first {
            let Some(contact) = swept_contact(from, ball.pos, ball.radius, floor) else {
                continue;
            };
            ball.pos += contact.normal * contact.penetration;
            ball.vel = resolve_velocity(
                ball.vel,
                contact.normal,
                ball.restitution * floor.restitution,
            );
            now_touching.insert(floor.id);
        }

        let events = self
            .touching
            .difference(&now_touching)
            .map(|&id| CollisionEvent {
                a: ShapeId::Ball,
                b: ShapeId::Floor(id),
            })
            .collect();

        self.touching = now_touching;
        self.steps += 1;
        events
    }

    fn index_of(&self, id: FloorId) -> Result<usize, usize> {
        self.floors.binary_search_by_key(&id, |f| f.id)
    }
}
