/*!
 * External media tools used by the video pipeline.
 *
 * The pipeline needs three things from the outside world: the length of a
 * narration file, a silent placeholder narration for dry runs, and the final
 * video with captions burned in. They sit behind the `MediaTool` trait so the
 * controller can be driven by ffmpeg in production and by a mock in tests.
 *
 * - `ffmpeg`: `FfmpegTool`, backed by the ffmpeg/ffprobe binaries
 * - `mock`: `MockMediaTool`, records calls and writes placeholder files
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::errors::MediaError;

/// Inputs for one video composition
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeRequest {
    /// Narration audio
    pub audio_path: PathBuf,
    /// SubRip captions to burn in
    pub subtitle_path: PathBuf,
    /// Destination video file
    pub output_path: PathBuf,
    /// Still image looped under the captions; a solid colour is used when absent
    pub background: Option<PathBuf>,
}

/// Common trait for the media tool backends
#[async_trait]
pub trait MediaTool: Send + Sync + Debug {
    /// Measure the duration of an audio or video file in seconds
    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError>;

    /// Write a silent audio file of the given length
    async fn generate_silence(&self, output: &Path, seconds: f64) -> Result<(), MediaError>;

    /// Render the final video with burned-in captions
    async fn compose_video(&self, request: &ComposeRequest) -> Result<(), MediaError>;
}

pub mod ffmpeg;
pub mod mock;

pub use ffmpeg::FfmpegTool;
pub use mock::MockMediaTool;
