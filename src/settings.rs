//! Run configuration
//!
//! One validated structure built at startup and handed to the driver.
//! Loaded from JSON, with every field optional (missing fields take defaults).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// RGB color as stored in frames
pub type Rgb = [u8; 3];

/// Audio cue configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Sound id -> asset path
    pub sounds: BTreeMap<String, PathBuf>,
    /// Sound used for floor-break cues
    pub default_sound: String,
    /// Added to every cue start time (negative = play early)
    pub latency_offset_seconds: f64,
    /// Write the video without audio if a sound asset is missing
    pub fallback_to_video_only: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sounds: BTreeMap::new(),
            default_sound: DEFAULT_SOUND.to_string(),
            latency_offset_seconds: AUDIO_LATENCY_OFFSET,
            fallback_to_video_only: false,
        }
    }
}

impl AudioSettings {
    /// Audio settings with a single default sound
    pub fn with_default_sound(path: impl Into<PathBuf>) -> Self {
        let mut audio = Self::default();
        audio.sounds.insert(audio.default_sound.clone(), path.into());
        audio
    }
}

/// Full run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Output ===
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub duration_seconds: u32,
    pub output: PathBuf,

    // === World ===
    /// Downward acceleration in pixels/s²
    pub gravity: f32,

    // === Floors ===
    pub floor_count: usize,
    /// Vertical distance between stacked floors (and from the bottom edge)
    pub floor_spacing: f32,
    /// Collision half-thickness
    pub floor_radius: f32,
    /// Drawn line width in pixels
    pub floor_stroke: u32,
    pub floor_restitution: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_restitution: f32,
    /// Start position; `None` = horizontally centered at `BALL_START_Y`
    pub ball_start: Option<(f32, f32)>,
    pub ball_velocity: (f32, f32),

    // === Colors ===
    pub background: Rgb,
    pub floor_color: Rgb,
    pub ball_color: Rgb,

    // === Audio ===
    /// `None` disables cue recording entirely
    pub audio: Option<AudioSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fps: FPS,
            duration_seconds: DURATION_SECONDS,
            output: PathBuf::from(VIDEO_NAME),

            gravity: GRAVITY,

            floor_count: FLOOR_COUNT,
            floor_spacing: FLOOR_SPACING,
            floor_radius: FLOOR_RADIUS,
            floor_stroke: FLOOR_STROKE,
            floor_restitution: FLOOR_RESTITUTION,

            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            ball_restitution: BALL_RESTITUTION,
            ball_start: None,
            ball_velocity: (0.0, 0.0),

            background: [0, 0, 0],
            floor_color: [255, 255, 255],
            ball_color: [255, 0, 0],

            audio: None,
        }
    }
}

impl Settings {
    /// Total frames the run produces
    pub fn total_frames(&self) -> usize {
        self.fps as usize * self.duration_seconds as usize
    }

    /// Fixed simulation timestep
    pub fn dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Effective ball start position
    pub fn ball_start(&self) -> (f32, f32) {
        self.ball_start
            .unwrap_or(((self.width / 2) as f32, BALL_START_Y))
    }

    /// Y coordinate of floor `i` (0 = bottom-most)
    pub fn floor_y(&self, i: usize) -> f32 {
        self.height as f32 - (i + 1) as f32 * self.floor_spacing
    }

    /// Check every field before any simulation work starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::NonPositiveFps(self.fps));
        }
        if self.duration_seconds == 0 {
            return Err(ConfigError::NonPositiveDuration(self.duration_seconds));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputPath);
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidGravity(self.gravity));
        }
        for (field, value) in [
            ("ball_velocity", Some(self.ball_velocity)),
            ("ball_start", self.ball_start),
        ] {
            if let Some((x, y)) = value.filter(|(x, y)| !(x.is_finite() && y.is_finite())) {
                return Err(ConfigError::NonFiniteVector { field, x, y });
            }
        }

        for (field, value) in [
            ("ball_radius", self.ball_radius),
            ("ball_mass", self.ball_mass),
            ("floor_radius", self.floor_radius),
            ("floor_spacing", self.floor_spacing),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("ball", self.ball_restitution),
            ("floor", self.floor_restitution),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RestitutionOutOfRange { field, value });
            }
        }

        for index in 0..self.floor_count {
            let y = self.floor_y(index);
            if y < 0.0 {
                return Err(ConfigError::FloorOffCanvas { index, y });
            }
        }

        if let Some(audio) = &self.audio {
            if !audio.sounds.contains_key(&audio.default_sound) {
                return Err(ConfigError::UnregisteredDefaultSound(
                    audio.default_sound.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Load settings from a JSON file and validate them
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Pretty JSON representation
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}
