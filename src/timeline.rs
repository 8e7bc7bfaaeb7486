//! Collision-driven sound cues
//!
//! Cues are recorded against frame indices while the simulation runs and only
//! turned into wall-clock start times when the audio track is built.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a sound asset (resolved to a file by `SoundBank`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SoundId(pub String);

impl SoundId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SoundId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SoundId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A sound to play at the moment a frame is shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    pub frame_index: usize,
    pub sound: SoundId,
}

/// A cue converted to an absolute start time in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledClip {
    pub sound: SoundId,
    /// May be negative when the latency offset pulls an early cue before 0
    pub start_seconds: f64,
}

/// Append-only list of cues, ordered by frame index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTimeline {
    cues: Vec<Cue>,
}

impl EventTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cue; frames arrive in non-decreasing order
    pub fn record(&mut self, frame_index: usize, sound: SoundId) {
        debug_assert!(
            self.cues.last().is_none_or(|c| c.frame_index <= frame_index),
            "cues must be recorded in frame order"
        );
        log::debug!("Cue `{sound}` at frame {frame_index}");
        self.cues.push(Cue { frame_index, sound });
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Start time of each cue: `frame_index / fps + offset_seconds`
    pub fn to_audio_schedule(&self, fps: f64, offset_seconds: f64) -> Vec<ScheduledClip> {
        self.cues
            .iter()
            .map(|cue| ScheduledClip {
                sound: cue.sound.clone(),
                start_seconds: cue.frame_index as f64 / fps + offset_seconds,
            })
            .collect()
    }
}
