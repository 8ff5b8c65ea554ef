use async_trait::async_trait;
use log::{debug, error};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::{MediaConfig, VideoConfig};
use crate::errors::MediaError;
use crate::media::{ComposeRequest, MediaTool};

// @module: ffmpeg/ffprobe backed media tool

/// Media tool that shells out to ffmpeg and ffprobe
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    // @field: Binary paths and timeouts
    media: MediaConfig,

    // @field: Output geometry and caption style
    video: VideoConfig,
}

impl FfmpegTool {
    pub fn new(media: MediaConfig, video: VideoConfig) -> Self {
        Self { media, video }
    }

    /// Arguments for `ffprobe` to print the container duration only
    pub fn probe_args(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            "format=duration".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            path.to_string_lossy().to_string(),
        ]
    }

    /// Arguments for `ffmpeg` to write `seconds` of stereo silence
    pub fn silence_args(output: &Path, seconds: f64) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-f".to_string(),
            "lavfi".to_string(),
            "-i".to_string(),
            "anullsrc=channel_layout=stereo:sample_rate=44100".to_string(),
            "-t".to_string(),
            format!("{}", seconds),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Arguments for `ffmpeg` to compose the captioned video
    pub fn compose_args(&self, request: &ComposeRequest) -> Vec<String> {
        let video = &self.video;
        let subtitle_filter = subtitle_filter(&request.subtitle_path, &video.force_style());

        let mut args: Vec<String> = vec!["-y".to_string()];

        match &request.background {
            Some(background) => {
                args.extend([
                    "-loop".to_string(),
                    "1".to_string(),
                    "-i".to_string(),
                    background.to_string_lossy().to_string(),
                    "-i".to_string(),
                    request.audio_path.to_string_lossy().to_string(),
                    "-vf".to_string(),
                    format!(
                        "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},{filter}",
                        w = video.width,
                        h = video.height,
                        filter = subtitle_filter
                    ),
                    "-shortest".to_string(),
                    "-c:v".to_string(),
                    "libx264".to_string(),
                    "-tune".to_string(),
                    "stillimage".to_string(),
                ]);
            }
            None => {
                args.extend([
                    "-f".to_string(),
                    "lavfi".to_string(),
                    "-i".to_string(),
                    format!(
                        "color=c={}:s={}x{}:r={}",
                        video.background_color, video.width, video.height, video.fps
                    ),
                    "-i".to_string(),
                    request.audio_path.to_string_lossy().to_string(),
                    "-vf".to_string(),
                    subtitle_filter,
                    "-shortest".to_string(),
                    "-c:v".to_string(),
                    "libx264".to_string(),
                ]);
            }
        }

        args.extend([
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            video.audio_bitrate.clone(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            request.output_path.to_string_lossy().to_string(),
        ]);

        args
    }

    /// Run a tool to completion under a timeout and return its stdout
    async fn run(&self, tool: &str, args: &[String], timeout: Duration) -> Result<String, MediaError> {
        debug!("Running {} {}", tool, args.join(" "));

        let future = Command::new(tool)
            .args(args)
            .kill_on_drop(true)
            .output();

        let output = tokio::select! {
            result = future => {
                result.map_err(|e| MediaError::SpawnFailed {
                    tool: tool.to_string(),
                    message: e.to_string(),
                })?
            },
            _ = tokio::time::sleep(timeout) => {
                return Err(MediaError::Timeout {
                    tool: tool.to_string(),
                    timeout,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("{} failed: {}", tool, filtered);
            return Err(MediaError::CommandFailed {
                tool: tool.to_string(),
                status: output.status.code().unwrap_or(-1),
                stderr: filtered,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.media.probe_timeout_secs)
    }

    fn encode_timeout(&self) -> Duration {
        Duration::from_secs(self.media.encode_timeout_secs)
    }
}

#[async_trait]
impl MediaTool for FfmpegTool {
    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError> {
        let stdout = self
            .run(&self.media.ffprobe_path, &Self::probe_args(path), self.probe_timeout())
            .await?;
        let duration = parse_duration(path, &stdout)?;
        debug!("Probed {}: {:.3}s", path.display(), duration);
        Ok(duration)
    }

    async fn generate_silence(&self, output: &Path, seconds: f64) -> Result<(), MediaError> {
        ensure_parent(output, &self.media.ffmpeg_path)?;
        self.run(
            &self.media.ffmpeg_path,
            &Self::silence_args(output, seconds),
            self.encode_timeout(),
        )
        .await?;
        Ok(())
    }

    async fn compose_video(&self, request: &ComposeRequest) -> Result<(), MediaError> {
        ensure_parent(&request.output_path, &self.media.ffmpeg_path)?;
        self.run(&self.media.ffmpeg_path, &self.compose_args(request), self.encode_timeout())
            .await?;
        Ok(())
    }
}

fn ensure_parent(path: &Path, tool: &str) -> Result<(), MediaError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| MediaError::SpawnFailed {
                tool: tool.to_string(),
                message: format!("cannot create {}: {}", parent.display(), e),
            })?;
        }
    }
    Ok(())
}

/// Parse ffprobe's bare duration output
pub fn parse_duration(path: &Path, stdout: &str) -> Result<f64, MediaError> {
    let value = stdout.trim();
    let invalid = || MediaError::InvalidDuration {
        path: path.display().to_string(),
        value: value.to_string(),
    };

    let duration: f64 = value.parse().map_err(|_| invalid())?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(invalid());
    }
    Ok(duration)
}

/// Build the `subtitles=` filter for a caption file.
///
/// Characters with meaning in a filtergraph are backslash-escaped in the path.
pub fn subtitle_filter(subtitle_path: &Path, force_style: &str) -> String {
    format!(
        "subtitles={}:force_style='{}'",
        escape_filter_path(&subtitle_path.to_string_lossy()),
        force_style
    )
}

fn escape_filter_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(c, '\\' | ':' | '\'' | ',' | '[' | ']' | ';') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "encoder",
        "title",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
