//! Floor registry: the live set of breakable floors
//!
//! Each floor moves LIVE -> REMOVED exactly once, on the first separation
//! event between it and the ball. REMOVED is terminal. The registry and the
//! world's active set are always mutated together.

use super::body::{CollisionEvent, FloorId, FloorSegment};
use super::world::RigidBodyWorld;
use crate::settings::Settings;
use crate::timeline::{EventTimeline, SoundId};

#[derive(Debug, Clone, Default)]
pub struct FloorRegistry {
    /// Live floors in creation order (bottom to top)
    live: Vec<FloorSegment>,
    /// Removed floor ids, in removal order
    removed: Vec<FloorId>,
    /// Sound recorded for each removal (`None` = no cues)
    cue_sound: Option<SoundId>,
}

impl FloorRegistry {
    pub fn new(cue_sound: Option<SoundId>) -> Self {
        Self {
            live: Vec::new(),
            removed: Vec::new(),
            cue_sound,
        }
    }

    /// Create the configured floor stack and add it to the world
    ///
    /// Floor `i` sits at `height - (i + 1) * spacing`, so index 0 is the
    /// bottom-most floor and the last one is struck first by a falling ball.
    pub fn stack(settings: &Settings, world: &mut RigidBodyWorld, cue_sound: Option<SoundId>) -> Self {
        let mut registry = Self::new(cue_sound);
        for i in 0..settings.floor_count {
            registry.insert(
                world,
                FloorSegment::horizontal(
                    FloorId(i),
                    settings.width as f32,
                    settings.floor_y(i),
                    settings.floor_radius,
                    settings.floor_restitution,
                ),
            );
        }
        log::info!("Stacked {} floors", registry.live.len());
        registry
    }

    /// Add a floor to both the registry and the world
    pub fn insert(&mut self, world: &mut RigidBodyWorld, floor: FloorSegment) -> bool {
        if self.is_live(floor.id) || self.removed.contains(&floor.id) {
            return false;
        }
        if !world.add(floor.clone()) {
            return false;
        }
        self.live.push(floor);
        true
    }

    /// Handle one separation event from the world
    ///
    /// Removes the floor if the pair is ball/live-floor and records a cue for
    /// `frame_index`. Anything else, including repeat events for a floor that
    /// is already gone, is a no-op. Returns the removed floor id.
    pub fn on_separate(
        &mut self,
        event: &CollisionEvent,
        world: &mut RigidBodyWorld,
        timeline: &mut EventTimeline,
        frame_index: usize,
    ) -> Option<FloorId> {
        let id = event.ball_floor()?;
        self.remove(id, world)?;

        if let Some(sound) = &self.cue_sound {
            timeline.record(frame_index, sound.clone());
        }
        log::debug!(
            "Frame {frame_index}: floor {} removed, {} left",
            id.0,
            self.live.len()
        );
        Some(id)
    }

    /// Remove a live floor from the registry and the world (idempotent)
    pub fn remove(&mut self, id: FloorId, world: &mut RigidBodyWorld) -> Option<FloorSegment> {
        let idx = self.live.iter().position(|f| f.id == id)?;
        let floor = self.live.remove(idx);
        world.remove(id);
        self.removed.push(id);
        debug_assert!(self.is_consistent_with(world));
        Some(floor)
    }

    pub fn live(&self) -> &[FloorSegment] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn is_live(&self, id: FloorId) -> bool {
        self.live.iter().any(|f| f.id == id)
    }

    /// Floor ids in the order they were removed
    pub fn removal_order(&self) -> &[FloorId] {
        &self.removed
    }

    /// Live set equals the world's active set
    pub fn is_consistent_with(&self, world: &RigidBodyWorld) -> bool {
        self.live.len() == world.floors().len() && self.live.iter().all(|f| world.contains(f.id))
    }
}
