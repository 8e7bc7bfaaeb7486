//! `ffmpeg` subprocess encoder
//!
//! Frames are streamed to `ffmpeg` as raw RGB24 on stdin. Audio clips are
//! passed as extra inputs, delayed (or trimmed, when their start is negative)
//! and mixed into one track inside a filter graph.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::ExportError;
use crate::renderer::Frame;

/// libx264 + yuv420p needs even dimensions
const PAD_EVEN: &str = "pad=ceil(iw/2)*2:ceil(ih/2)*2";

/// One audio clip with a resolved asset path
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub path: PathBuf,
    pub start_seconds: f64,
}

/// Everything `ffmpeg` needs to know besides the pixel data
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJob {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frame_count: usize,
    pub clips: Vec<AudioClip>,
    pub output: PathBuf,
}

impl EncodeJob {
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.fps
    }

    /// Command-line arguments (without the program name)
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "-y",
            "-hide_banner",
            "-loglevel",
            "error",
            "-nostats",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        args.push("-s".into());
        args.push(format!("{}x{}", self.width, self.height));
        args.push("-r".into());
        args.push(format_seconds(self.fps));
        args.push("-i".into());
        args.push("-".into());

        for clip in &self.clips {
            args.push("-i".into());
            args.push(clip.path.to_string_lossy().into_owned());
        }

        if self.clips.is_empty() {
            args.push("-vf".into());
            args.push(PAD_EVEN.into());
        } else {
            args.push("-filter_complex".into());
            args.push(self.filter_graph());
            args.extend(["-map", "[vout]", "-map", "[aout]", "-c:a", "aac"].map(String::from));
        }

        args.extend(["-c:v", "libx264", "-pix_fmt", "yuv420p"].map(String::from));
        args.push("-t".into());
        args.push(format_seconds(self.duration_seconds()));
        args.push(self.output.to_string_lossy().into_owned());
        args
    }

    /// Filter graph: pad video, place each clip on the timeline, mix
    fn filter_graph(&self) -> String {
        let mut parts = vec![format!("[0:v]{PAD_EVEN}[vout]")];
        let mut labels = String::new();

        for (i, clip) in self.clips.iter().enumerate() {
            let input = i + 1;
            let placement = if clip.start_seconds >= 0.0 {
                let ms = (clip.start_seconds * 1000.0).round() as u64;
                format!("adelay=delays={ms}:all=1")
            } else {
                format!(
                    "atrim=start={},asetpts=PTS-STARTPTS",
                    format_seconds(-clip.start_seconds)
                )
            };
            parts.push(format!("[{input}:a]{placement}[c{i}]"));
            labels.push_str(&format!("[c{i}]"));
        }

        parts.push(format!(
            "{labels}amix=inputs={}:duration=longest:normalize=0[aout]",
            self.clips.len()
        ));
        parts.join(";")
    }
}

/// Seconds with enough precision for frame-accurate timing, no trailing zeros
fn format_seconds(value: f64) -> String {
    let s = format!("{value:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" { "0".into() } else { s.into() }
}

/// Spawns the system `ffmpeg` and feeds it frames
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run one encode to completion
    pub fn encode(&self, job: &EncodeJob, frames: &[Frame]) -> Result<(), ExportError> {
        let mut child = Command::new(&self.program)
            .args(job.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ExportError::EncoderUnavailable)?;

        // ffmpeg stalls once a full stderr pipe goes unread
        let mut stderr = child.stderr.take();
        let stderr_reader = std::thread::spawn(move || {
            let mut buf = String::new();
            if let Some(pipe) = stderr.as_mut() {
                let _ = pipe.read_to_string(&mut buf);
            }
            buf
        });

        let write_result = match child.stdin.take() {
            Some(mut stdin) => frames
                .iter()
                .try_for_each(|frame| stdin.write_all(frame.as_raw()))
                .and_then(|_| stdin.flush()),
            None => Ok(()),
        };

        let status = child.wait()?;
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(ExportError::EncoderFailed {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        write_result?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(clips: Vec<AudioClip>) -> EncodeJob {
        EncodeJob {
            width: 1088,
            height: 1920,
            fps: 144.0,
            frame_count: 1440,
            clips,
            output: PathBuf::from("out.mp4"),
        }
    }

    fn arg_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(|s| s.as_str())
    }

    #[test]
    fn test_video_only_args() {
        let args = job(Vec::new()).args();
        assert_eq!(arg_after(&args, "-s"), Some("1088x1920"));
        assert_eq!(arg_after(&args, "-r"), Some("144"));
        assert_eq!(arg_after(&args, "-i"), Some("-"));
        assert_eq!(arg_after(&args, "-t"), Some("10"));
        assert_eq!(arg_after(&args, "-vf"), Some(PAD_EVEN));
        assert!(!args.iter().any(|a| a == "-filter_complex"));
        assert!(!args.iter().any(|a| a == "aac"));
        assert_eq!(args.last().map(|s| s.as_str()), Some("out.mp4"));
    }

    #[test]
    fn test_audio_filter_graph() {
        let args = job(vec![
            AudioClip {
                path: PathBuf::from("hit.wav"),
                start_seconds: 0.563_333_3,
            },
            AudioClip {
                path: PathBuf::from("hit.wav"),
                start_seconds: -0.103_333_3,
            },
        ])
        .args();

        let inputs: Vec<_> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "-i")
            .map(|(i, _)| args[i + 1].as_str())
            .collect();
        assert_eq!(inputs, vec!["-", "hit.wav", "hit.wav"]);

        let graph = arg_after(&args, "-filter_complex").expect("filter graph");
        assert!(graph.contains("[1:a]adelay=delays=563:all=1[c0]"), "{graph}");
        assert!(graph.contains("[2:a]atrim=start=0.103333,asetpts=PTS-STARTPTS[c1]"), "{graph}");
        assert!(graph.contains("[c0][c1]amix=inputs=2"), "{graph}");
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "[aout]"));
        assert!(!args.iter().any(|a| a == "-vf"));
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(10.0), "10");
        assert_eq!(format_seconds(0.5), "0.5");
        assert_eq!(format_seconds(1.0 / 3.0), "0.333333");
        assert_eq!(format_seconds(0.0), "0");
    }

    #[test]
    fn test_missing_program_is_reported() {
        let encoder = FfmpegEncoder::new("/nonexistent/ffmpeg-binary");
        let frames = vec![Frame::filled(2, 2, [0, 0, 0])];
        let err = encoder.encode(&job(Vec::new()), &frames).unwrap_err();
        assert!(matches!(err, ExportError::EncoderUnavailable(_)));
    }
}
