//! Deterministic simulation module
//!
//! All physics lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - No randomness
//! - Stable iteration order (by floor id)
//! - No rendering or media dependencies

pub mod body;
pub mod collision;
pub mod floors;
pub mod world;

pub use body::{Ball, CollisionEvent, FloorId, FloorSegment, ShapeId};
pub use collision::{Contact, circle_segment_contact, resolve_velocity, swept_contact};
pub use floors::FloorRegistry;
pub use world::RigidBodyWorld;
