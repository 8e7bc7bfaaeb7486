//! Error types for configuration, export, and full runs using `thiserror`.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or unreadable run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("fps must be positive, got {0}")]
    NonPositiveFps(u32),

    #[error("duration must be positive, got {0}s")]
    NonPositiveDuration(u32),

    #[error("canvas must be at least 1x1, got {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} restitution must be within [0, 1], got {value}")]
    RestitutionOutOfRange { field: &'static str, value: f32 },

    #[error("gravity must be finite, got {0}")]
    InvalidGravity(f32),

    #[error("{field} must be finite, got ({x}, {y})")]
    NonFiniteVector { field: &'static str, x: f32, y: f32 },

    #[error("floor {index} at y={y} lies outside the canvas")]
    FloorOffCanvas { index: usize, y: f32 },

    #[error("output path is empty")]
    EmptyOutputPath,

    #[error("default sound `{0}` has no asset registered")]
    UnregisteredDefaultSound(String),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Failure while turning frames and cues into a video file
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export: frame sequence is empty")]
    NothingToExport,

    #[error("fps must be positive, got {0}")]
    InvalidFps(f64),

    #[error("frame {index} is {got_width}x{got_height}, expected {width}x{height}")]
    FrameSizeMismatch {
        index: usize,
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },

    #[error("no asset registered for sound `{0}`")]
    UnknownSound(String),

    #[error("asset not found for sound `{sound}`: {path}")]
    AssetNotFound { sound: String, path: PathBuf },

    #[error("could not launch ffmpeg (is it on PATH?): {0}")]
    EncoderUnavailable(#[source] std::io::Error),

    #[error("ffmpeg exited with {status}: {stderr}")]
    EncoderFailed { status: String, stderr: String },

    #[error("io error while encoding: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ExportError {
    /// Errors caused by the audio side only; the video can still be written
    pub fn is_audio_asset_error(&self) -> bool {
        matches!(
            self,
            ExportError::UnknownSound(_) | ExportError::AssetNotFound { .. }
        )
    }
}

/// Any failure across a whole run
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
