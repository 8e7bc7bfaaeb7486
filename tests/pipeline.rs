//! End-to-end runs of the simulate -> render pipeline

use floorfall::media::{ExportReport, FfmpegEncoder};
use floorfall::pipeline::run_and_export;
use floorfall::sim::FloorId;
use floorfall::{
    AudioSettings, ConfigError, ExportError, MediaExporter, PipelineDriver, RunError, RunOutput,
    Settings,
};

const WHITE: [u8; 3] = [255, 255, 255];
const RED: [u8; 3] = [255, 0, 0];

/// Three floors at y = 206, 156, 106; ball dropped from rest at y = 20
fn three_floor_scenario() -> Settings {
    Settings {
        width: 64,
        height: 256,
        fps: 60,
        duration_seconds: 10,
        floor_count: 3,
        floor_spacing: 50.0,
        ball_radius: 10.0,
        ball_start: Some((32.0, 20.0)),
        ..Default::default()
    }
}

fn run(settings: Settings) -> RunOutput {
    PipelineDriver::new(settings).expect("valid settings").run()
}

#[test]
fn test_frame_count_is_fps_times_duration() {
    let output = run(three_floor_scenario());
    assert_eq!(output.frames.len(), 600);
    assert!(output.frames.iter().all(|f| f.width() == 64 && f.height() == 256));
}

#[test]
fn test_floors_break_top_down() {
    let output = run(three_floor_scenario());
    assert_eq!(output.removal_order, vec![FloorId(2), FloorId(1), FloorId(0)]);
    assert_eq!(output.floors_left, 0);

    // Nothing left to stop the ball: it ends far below the canvas, still falling
    assert!(output.final_ball.pos.y > 1000.0);
    assert!(output.final_ball.vel.y > 0.0);
}

#[test]
fn test_frames_reflect_floor_removal() {
    let output = run(three_floor_scenario());
    let first = &output.frames[0];
    let last = output.frames.last().expect("frames");

    // Three full-width floors, 5 px thick
    assert_eq!(first.count(WHITE), 3 * 5 * 64);
    assert!(first.count(RED) > 0);
    assert_eq!(last.count(WHITE), 0);
    assert_eq!(last.count(RED), 0);
}

#[test]
fn test_runs_are_bit_identical() {
    let a = run(three_floor_scenario());
    let b = run(three_floor_scenario());
    assert_eq!(a.frames, b.frames);
    assert_eq!(a.removal_order, b.removal_order);
    assert_eq!(a.final_ball, b.final_ball);
}

#[test]
fn test_cues_follow_removals() {
    let settings = Settings {
        audio: Some(AudioSettings::with_default_sound("hit.wav")),
        ..three_floor_scenario()
    };
    let output = run(settings);

    let cues = output.timeline.cues();
    assert_eq!(cues.len(), 3);
    assert!(cues.windows(2).all(|w| w[0].frame_index < w[1].frame_index));
    assert!(cues.iter().all(|c| c.sound.as_str() == "hit"));

    let schedule = output.timeline.to_audio_schedule(60.0, -0.27);
    for (cue, clip) in cues.iter().zip(&schedule) {
        let expected = cue.frame_index as f64 / 60.0 - 0.27;
        assert!((clip.start_seconds - expected).abs() < 1e-9);
    }
}

#[test]
fn test_missing_sound_asset_is_reported() {
    let settings = Settings {
        audio: Some(AudioSettings::with_default_sound("/no/such/dir/hit.wav")),
        ..three_floor_scenario()
    };
    let output = run(settings);
    let err = output.export(&MediaExporter::default()).unwrap_err();
    assert!(matches!(err, ExportError::AssetNotFound { .. }));
}

#[test]
fn test_floor_stays_when_ball_never_arrives() {
    // One second is not enough to reach the floor from this height
    let settings = Settings {
        width: 64,
        height: 2000,
        fps: 30,
        duration_seconds: 1,
        floor_count: 1,
        ball_radius: 10.0,
        ball_start: Some((32.0, 20.0)),
        ..Default::default()
    };
    let output = run(settings);
    assert_eq!(output.frames.len(), 30);
    assert!(output.removal_order.is_empty());
    assert_eq!(output.floors_left, 1);
}

#[test]
fn test_run_and_export_fails_fast_on_bad_config() {
    let settings = Settings {
        duration_seconds: 0,
        ..three_floor_scenario()
    };
    let err = run_and_export(settings, &MediaExporter::default()).unwrap_err();
    assert!(matches!(err, RunError::Config(ConfigError::NonPositiveDuration(0))));
}

/// Stand-in encoder: records its arguments and swallows the frame stream
#[cfg(unix)]
fn stub_encoder(dir: &std::path::Path) -> (FfmpegEncoder, std::path::PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let args_file = dir.join("args.txt");
    let script = dir.join("fake-ffmpeg.sh");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\ncat > /dev/null\n",
            args_file.display()
        ),
    )
    .expect("write stub encoder");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
        .expect("make stub executable");
    (FfmpegEncoder::new(script), args_file)
}

#[cfg(unix)]
#[test]
fn test_missing_asset_falls_back_to_video_only() {
    let dir = std::env::temp_dir().join(format!("floorfall-fallback-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let (encoder, args_file) = stub_encoder(&dir);
    let exporter = MediaExporter::new(encoder);

    let mut audio = AudioSettings::with_default_sound("/no/such/dir/hit.wav");
    let strict = Settings {
        output: dir.join("out.mp4"),
        audio: Some(audio.clone()),
        ..three_floor_scenario()
    };
    audio.fallback_to_video_only = true;
    let lenient = Settings {
        audio: Some(audio),
        ..strict.clone()
    };

    // Without the fallback the asset error propagates before the encoder runs
    let err = run(strict).export(&exporter).unwrap_err();
    assert!(matches!(err, ExportError::AssetNotFound { .. }));
    assert!(!args_file.exists());

    // With it the video is still written, and the report says audio was dropped
    let report = run(lenient).export(&exporter);
    let args = std::fs::read_to_string(&args_file).unwrap_or_default();
    let _ = std::fs::remove_dir_all(&dir);

    match report {
        Ok(ExportReport::AudioOmitted { reason }) => assert!(reason.contains("hit.wav"), "{reason}"),
        other => panic!("expected AudioOmitted, got {other:?}"),
    }
    let args: Vec<&str> = args.lines().collect();
    assert!(args.contains(&"-vf"));
    assert!(!args.contains(&"-filter_complex"));
    assert!(!args.iter().any(|a| a.ends_with("hit.wav")));
}
