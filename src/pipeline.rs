//! Pipeline driver: step, render, append - once per frame
//!
//! Owns the world, the floor registry, the renderer, the cue timeline, and the
//! frame sequence. Separation events returned by each step are applied to the
//! registry before the frame is rendered, so frame `n` always shows the state
//! after exactly `n + 1` steps.

use glam::Vec2;

use crate::error::{ConfigError, ExportError, RunError};
use crate::media::{ExportReport, MediaExporter, SoundBank};
use crate::renderer::{Frame, FrameRenderer};
use crate::settings::Settings;
use crate::sim::{Ball, FloorId, FloorRegistry, RigidBodyWorld};
use crate::timeline::{EventTimeline, SoundId};

pub struct PipelineDriver {
    settings: Settings,
    world: RigidBodyWorld,
    floors: FloorRegistry,
    renderer: FrameRenderer,
    timeline: EventTimeline,
    frames: Vec<Frame>,
    dt: f32,
}

impl PipelineDriver {
    /// Validate settings and build the initial world
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let (x, y) = settings.ball_start();
        let mut ball = Ball::new(
            Vec2::new(x, y),
            settings.ball_radius,
            settings.ball_mass,
            settings.ball_restitution,
        );
        ball.vel = Vec2::new(settings.ball_velocity.0, settings.ball_velocity.1);

        let mut world = RigidBodyWorld::new(settings.gravity, ball);
        let cue_sound = settings
            .audio
            .as_ref()
            .map(|audio| SoundId::from(audio.default_sound.as_str()));
        let floors = FloorRegistry::stack(&settings, &mut world, cue_sound);

        Ok(Self {
            renderer: FrameRenderer::new(&settings),
            frames: Vec::with_capacity(settings.total_frames()),
            timeline: EventTimeline::new(),
            dt: settings.dt(),
            settings,
            world,
            floors,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &RigidBodyWorld {
        &self.world
    }

    pub fn floors(&self) -> &FloorRegistry {
        &self.floors
    }

    pub fn timeline(&self) -> &EventTimeline {
        &self.timeline
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Index of the next frame to produce
    pub fn frame_index(&self) -> usize {
        self.frames.len()
    }

    pub fn is_finished(&self) -> bool {
        self.frames.len() >= self.settings.total_frames()
    }

    /// Produce exactly one frame; returns floors removed during its step
    pub fn advance(&mut self) -> Vec<FloorId> {
        let frame_index = self.frame_index();

        let events = self.world.step(self.dt);
        let removed = events
            .iter()
            .filter_map(|event| {
                self.floors
                    .on_separate(event, &mut self.world, &mut self.timeline, frame_index)
            })
            .collect();

        let frame = self.renderer.render(&self.floors, self.world.ball());
        self.frames.push(frame);
        removed
    }

    /// Run every remaining frame
    pub fn run(mut self) -> RunOutput {
        let total = self.settings.total_frames();
        log::info!(
            "Simulating {total} frames ({}x{} @ {} fps)",
            self.settings.width,
            self.settings.height,
            self.settings.fps
        );

        while !self.is_finished() {
            self.advance();
        }

        debug_assert_eq!(self.frames.len(), total);
        log::info!(
            "Simulation done: {} floors removed, {} cues",
            self.floors.removal_order().len(),
            self.timeline.len()
        );

        RunOutput {
            removal_order: self.floors.removal_order().to_vec(),
            floors_left: self.floors.len(),
            final_ball: self.world.ball().clone(),
            frames: self.frames,
            timeline: self.timeline,
            settings: self.settings,
        }
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub settings: Settings,
    pub frames: Vec<Frame>,
    pub timeline: EventTimeline,
    /// Floor ids in the order they broke
    pub removal_order: Vec<FloorId>,
    pub floors_left: usize,
    pub final_ball: Ball,
}

impl RunOutput {
    /// Write the video, with audio when configured
    ///
    /// If a sound asset is missing and `fallback_to_video_only` is set, the
    /// video is still written and the report says audio was omitted.
    pub fn export(&self, exporter: &MediaExporter) -> Result<ExportReport, ExportError> {
        let fps = self.settings.fps as f64;
        let output = self.settings.output.as_path();

        let Some(audio) = &self.settings.audio else {
            exporter.export(&self.frames, fps, output)?;
            return Ok(ExportReport::VideoOnly);
        };

        let sounds = SoundBank::from_settings(audio);
        match exporter.export_with_audio(
            &self.frames,
            &self.timeline,
            &sounds,
            fps,
            audio.latency_offset_seconds,
            output,
        ) {
            Err(err) if err.is_audio_asset_error() && audio.fallback_to_video_only => {
                log::warn!("Audio omitted: {err}");
                exporter.export(&self.frames, fps, output)?;
                Ok(ExportReport::AudioOmitted {
                    reason: err.to_string(),
                })
            }
            result => result,
        }
    }
}

/// Build, simulate, and export in one call
pub fn run_and_export(
    settings: Settings,
    exporter: &MediaExporter,
) -> Result<(RunOutput, ExportReport), RunError> {
    let output = PipelineDriver::new(settings)?.run();
    let report = output.export(exporter)?;
    Ok((output, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_settings() -> Settings {
        Settings {
            width: 48,
            height: 160,
            fps: 30,
            duration_seconds: 2,
            floor_count: 2,
            floor_spacing: 40.0,
            ball_radius: 6.0,
            ball_start: Some((24.0, 10.0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        let settings = Settings {
            fps: 0,
            ..tiny_settings()
        };
        assert!(matches!(
            PipelineDriver::new(settings),
            Err(ConfigError::NonPositiveFps(0))
        ));
    }

    #[test]
    fn test_frame_count_exact() {
        let output = PipelineDriver::new(tiny_settings()).expect("valid").run();
        assert_eq!(output.frames.len(), 60);
    }

    #[test]
    fn test_advance_steps_once_per_frame() {
        let mut driver = PipelineDriver::new(tiny_settings()).expect("valid");
        for n in 1..=5 {
            driver.advance();
            assert_eq!(driver.frames().len(), n);
            assert_eq!(driver.world().steps(), n as u64);
        }
    }

    #[test]
    fn test_cues_only_with_audio() {
        let output = PipelineDriver::new(tiny_settings()).expect("valid").run();
        assert!(!output.removal_order.is_empty());
        assert!(output.timeline.is_empty());
    }

    #[test]
    fn test_export_without_frames_fails() {
        let output = RunOutput {
            frames: Vec::new(),
            timeline: EventTimeline::new(),
            removal_order: Vec::new(),
            floors_left: 0,
            final_ball: Ball::new(Vec2::ZERO, 1.0, 1.0, 1.0),
            settings: tiny_settings(),
        };
        let err = output.export(&MediaExporter::default()).unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport));
    }
}
