//! Media export
//!
//! Turns the finished frame sequence (and optionally the cue timeline) into a
//! single video file. All validation happens before `ffmpeg` is launched.

pub mod ffmpeg;
pub mod sounds;

use std::fmt;
use std::path::Path;

pub use ffmpeg::{AudioClip, EncodeJob, FfmpegEncoder};
pub use sounds::SoundBank;

use crate::error::ExportError;
use crate::renderer::Frame;
use crate::timeline::EventTimeline;

/// What ended up in the output file
#[derive(Debug, Clone, PartialEq)]
pub enum ExportReport {
    /// No cues were recorded, so no audio track was built
    VideoOnly,
    /// Video muxed with an audio track of `clips` cues
    WithAudio { clips: usize },
    /// Audio was requested but dropped
    AudioOmitted { reason: String },
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportReport::VideoOnly => write!(f, "video only"),
            ExportReport::WithAudio { clips } => write!(f, "video with {clips} audio cues"),
            ExportReport::AudioOmitted { reason } => write!(f, "video only (audio omitted: {reason})"),
        }
    }
}

/// Encodes frame sequences to video files
#[derive(Debug, Clone, Default)]
pub struct MediaExporter {
    encoder: FfmpegEncoder,
}

impl MediaExporter {
    pub fn new(encoder: FfmpegEncoder) -> Self {
        Self { encoder }
    }

    /// Encode `frames` at `fps` into `output` with no audio
    pub fn export(&self, frames: &[Frame], fps: f64, output: &Path) -> Result<(), ExportError> {
        let job = Self::plan_video(frames, fps, output)?;
        self.run(&job, frames)
    }

    /// Encode `frames` and mux one clip per cue
    ///
    /// Each cue starts at `frame_index / fps + offset_seconds`. With no cues
    /// this is exactly `export`.
    pub fn export_with_audio(
        &self,
        frames: &[Frame],
        cues: &EventTimeline,
        sounds: &SoundBank,
        fps: f64,
        offset_seconds: f64,
        output: &Path,
    ) -> Result<ExportReport, ExportError> {
        let job = Self::plan_with_audio(frames, cues, sounds, fps, offset_seconds, output)?;
        self.run(&job, frames)?;
        Ok(if job.clips.is_empty() {
            ExportReport::VideoOnly
        } else {
            ExportReport::WithAudio {
                clips: job.clips.len(),
            }
        })
    }

    /// Validate and build a video-only job
    pub fn plan_video(frames: &[Frame], fps: f64, output: &Path) -> Result<EncodeJob, ExportError> {
        let (width, height) = validate_frames(frames, fps)?;
        Ok(EncodeJob {
            width,
            height,
            fps,
            frame_count: frames.len(),
            clips: Vec::new(),
            output: output.to_path_buf(),
        })
    }

    /// Validate and build a job with audio; every referenced sound must exist
    pub fn plan_with_audio(
        frames: &[Frame],
        cues: &EventTimeline,
        sounds: &SoundBank,
        fps: f64,
        offset_seconds: f64,
        output: &Path,
    ) -> Result<EncodeJob, ExportError> {
        let mut job = Self::plan_video(frames, fps, output)?;
        job.clips = cues
            .to_audio_schedule(fps, offset_seconds)
            .into_iter()
            .map(|clip| {
                Ok(AudioClip {
                    path: sounds.locate(&clip.sound)?.to_path_buf(),
                    start_seconds: clip.start_seconds,
                })
            })
            .collect::<Result<_, ExportError>>()?;
        Ok(job)
    }

    fn run(&self, job: &EncodeJob, frames: &[Frame]) -> Result<(), ExportError> {
        log::info!(
            "Exporting {} frames ({}x{} @ {} fps, {} audio cues) to {}",
            job.frame_count,
            job.width,
            job.height,
            job.fps,
            job.clips.len(),
            job.output.display()
        );
        self.encoder.encode(job, frames)?;
        log::info!("Video saved as {}", job.output.display());
        Ok(())
    }
}

/// Non-empty, positive fps, uniform frame size; returns that size
fn validate_frames(frames: &[Frame], fps: f64) -> Result<(u32, u32), ExportError> {
    let first = frames.first().ok_or(ExportError::NothingToExport)?;
    if !(fps.is_finite() && fps > 0.0) {
        return Err(ExportError::InvalidFps(fps));
    }
    let (width, height) = (first.width(), first.height());
    for (index, frame) in frames.iter().enumerate() {
        if frame.width() != width || frame.height() != height {
            return Err(ExportError::FrameSizeMismatch {
                index,
                width,
                height,
                got_width: frame.width(),
                got_height: frame.height(),
            });
        }
    }
    Ok((width, height))
}
