//! Floorfall entry point
//!
//! Loads settings, runs the simulation, and exports the video.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use floorfall::media::FfmpegEncoder;
use floorfall::{MediaExporter, PipelineDriver, Settings};

#[derive(Parser, Debug)]
#[command(version, about = "Render a ball breaking through stacked floors to a video file")]
struct Args {
    /// JSON settings file (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output video path
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    fps: Option<u32>,

    /// Duration in seconds
    #[arg(long)]
    duration: Option<u32>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Number of stacked floors
    #[arg(long)]
    floors: Option<usize>,

    /// Sound played each time a floor breaks
    #[arg(long)]
    sound: Option<PathBuf>,

    /// Seconds added to every sound cue (negative plays earlier)
    #[arg(long, allow_hyphen_values = true)]
    audio_offset: Option<f64>,

    /// Write the video without audio if a sound asset is missing
    #[arg(long)]
    allow_silent: bool,

    /// Also save the last frame as a PNG
    #[arg(long)]
    poster: Option<PathBuf>,

    /// ffmpeg executable
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };

        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if let Some(fps) = self.fps {
            settings.fps = fps;
        }
        if let Some(duration) = self.duration {
            settings.duration_seconds = duration;
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(floors) = self.floors {
            settings.floor_count = floors;
        }
        if let Some(sound) = &self.sound {
            let mut audio = settings.audio.take().unwrap_or_default();
            audio.sounds.insert(audio.default_sound.clone(), sound.clone());
            settings.audio = Some(audio);
        }
        if let Some(audio) = settings.audio.as_mut() {
            if let Some(offset) = self.audio_offset {
                audio.latency_offset_seconds = offset;
            }
            if self.allow_silent {
                audio.fallback_to_video_only = true;
            }
        } else if self.audio_offset.is_some() {
            log::warn!("--audio-offset ignored: no sound configured");
        }

        settings.validate().context("invalid settings")?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.settings()?;

    if args.print_config {
        println!("{}", settings.to_json()?);
        return Ok(());
    }

    let exporter = MediaExporter::new(FfmpegEncoder::new(&args.ffmpeg));
    let output = PipelineDriver::new(settings)
        .context("building simulation")?
        .run();

    if let Some(poster) = &args.poster {
        if let Some(last) = output.frames.last() {
            last.save_png(poster)
                .with_context(|| format!("saving poster frame to {}", poster.display()))?;
            log::info!("Poster frame saved as {}", poster.display());
        }
    }

    let report = output
        .export(&exporter)
        .with_context(|| format!("exporting {}", output.settings.output.display()))?;

    log::info!(
        "Done: {} frames, {} of {} floors broken, {report}",
        output.frames.len(),
        output.removal_order.len(),
        output.removal_order.len() + output.floors_left
    );
    Ok(())
}
