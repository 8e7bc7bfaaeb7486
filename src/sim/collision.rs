//! Collision detection and response for a circle against thick segments
//!
//! A floor is a line segment inflated by its radius (a capsule). The ball hits
//! it when the distance from the ball center to the segment is less than the
//! sum of both radii.

use glam::Vec2;

use crate::closest_point_on_segment;

use super::body::FloorSegment;

/// A detected overlap between the ball and a floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Closest point on the floor centerline
    pub point: Vec2,
    /// Unit normal pointing from the floor toward the ball center
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

/// Check collision between a circle and a floor segment
///
/// Returns `None` when the shapes do not overlap. Touching exactly at the
/// combined radius is not a contact.
pub fn circle_segment_contact(center: Vec2, radius: f32, floor: &FloorSegment) -> Option<Contact> {
    let closest = closest_point_on_segment(center, floor.a, floor.b);
    let offset = center - closest;
    let dist = offset.length();
    let reach = radius + floor.radius;

    if dist >= reach {
        return None;
    }

    let normal = if dist > 1e-6 {
        offset / dist
    } else {
        // Center on the centerline: push out along the segment's perpendicular,
        // choosing the side that points up (-Y) for horizontal floors
        let dir = (floor.b - floor.a).normalize_or_zero();
        let perp = Vec2::new(dir.y, -dir.x);
        if perp == Vec2::ZERO { Vec2::NEG_Y } else { perp }
    };

    Some(Contact {
        point: closest,
        normal,
        penetration: reach - dist,
    })
}

/// Contact for a ball that moved from `from` to `to` during one step
///
/// A fast ball can cross a floor's centerline, or clear the whole capsule,
/// within a single step. Either way the contact faces the side the ball came
/// from, so it is pushed back out above a floor it fell onto.
pub fn swept_contact(from: Vec2, to: Vec2, radius: f32, floor: &FloorSegment) -> Option<Contact> {
    let Some(contact) = circle_segment_contact(to, radius, floor) else {
        return crossing_contact(from, to, radius, floor);
    };
    if (from - contact.point).dot(contact.normal) >= 0.0 {
        return Some(contact);
    }
    let depth = (to - contact.point).length();
    Some(Contact {
        normal: -contact.normal,
        penetration: contact.penetration + 2.0 * depth,
        ..contact
    })
}

/// Motion from `from` to `to` passes through the floor centerline
fn crossing_contact(from: Vec2, to: Vec2, radius: f32, floor: &FloorSegment) -> Option<Contact> {
    let span = floor.b - floor.a;
    let dir = span.normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }

    let mut normal = Vec2::new(dir.y, -dir.x);
    let mut side_from = (from - floor.a).dot(normal);
    if side_from < 0.0 {
        normal = -normal;
        side_from = -side_from;
    }
    let side_to = (to - floor.a).dot(normal);
    if side_from <= 0.0 || side_to >= 0.0 {
        return None;
    }

    let hit = from + (to - from) * (side_from / (side_from - side_to));
    let along = (hit - floor.a).dot(dir);
    if !(0.0..=span.length()).contains(&along) {
        return None;
    }

    Some(Contact {
        point: hit,
        normal,
        penetration: radius + floor.radius - side_to,
    })
}

/// Bounce a velocity off a surface
///
/// The normal component is reflected and scaled by `restitution`; the
/// tangential component is kept. Velocities already moving away from the
/// surface are returned unchanged.
#[inline]
pub fn resolve_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        return velocity;
    }
    velocity - (1.0 + restitution) * vn * normal
}
