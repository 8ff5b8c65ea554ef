use log::{warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::{AppError, ScriptError};
use crate::file_utils::FileManager;
use crate::media::{ComposeRequest, FfmpegTool, MediaTool};
use crate::script::{Script, VideoMetadata};
use crate::subtitle_timer::SubtitleTimer;
use crate::subtitle_track::SubtitleTrack;
use crate::validation::{InspectionReport, InspectorConfig, TrackInspector};

// @module: Application controller for the short video pipeline

/// File names inside a run's output directory
pub const AUDIO_FILE_NAME: &str = "audio.mp3";
pub const SUBTITLE_FILE_NAME: &str = "subtitles.srt";
pub const VIDEO_FILE_NAME: &str = "video.mp4";
pub const METADATA_FILE_NAME: &str = "meta.json";

/// Number of pipeline steps shown on the progress bar
const PIPELINE_STEPS: u64 = 6;

/// Where the narration duration comes from
#[derive(Debug, Clone, PartialEq)]
pub enum DurationSource {
    /// Probe this audio file
    Audio(PathBuf),
    /// Use a known length in seconds
    Seconds(f64),
}

/// One video to generate
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Identifier used in the output directory name
    pub id: String,
    /// Theme recorded in the metadata and used for the dry-run script
    pub theme: String,
    /// Script file; required unless `dry_run` is set
    pub script_path: Option<PathBuf>,
    /// Pre-rendered narration; required unless `dry_run` is set
    pub audio_path: Option<PathBuf>,
    /// Use the sample script and a silent narration
    pub dry_run: bool,
    /// Regenerate even if the video already exists
    pub force_overwrite: bool,
}

/// Files produced by one generation run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub audio_path: PathBuf,
    pub subtitle_path: PathBuf,
    pub video_path: PathBuf,
    pub metadata_path: PathBuf,
    /// Measured narration length in seconds
    pub duration_secs: f64,
    pub caption_count: usize,
    /// False when an existing video was kept
    pub generated: bool,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Media backend
    media: Arc<dyn MediaTool>,

    // @field: Whether to draw a progress bar
    show_progress: bool,
}

impl Controller {
    // @method: Create a controller backed by ffmpeg
    pub fn with_config(config: Config) -> Self {
        let media = Arc::new(FfmpegTool::new(config.media.clone(), config.video.clone()));
        Self::with_media_tool(config, media)
    }

    // @method: Create a controller with an explicit media backend
    pub fn with_media_tool(config: Config, media: Arc<dyn MediaTool>) -> Self {
        Self {
            config,
            media,
            show_progress: true,
        }
    }

    /// Enable or disable the progress bar
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn timer(&self) -> SubtitleTimer {
        SubtitleTimer::from_config(&self.config.timing)
    }

    /// Build captions for a script and write them as SRT
    pub async fn write_subtitles(
        &self,
        script_path: &Path,
        duration: DurationSource,
        output_path: &Path,
    ) -> Result<SubtitleTrack, AppError> {
        let script = Script::load(script_path)?;
        script.validate()?;

        let duration_secs = match duration {
            DurationSource::Audio(audio) => self.media.probe_duration(&audio).await?,
            DurationSource::Seconds(secs) => secs,
        };

        let track = self.timer().build_track(&script.lines(), duration_secs);
        track.write_to_srt(output_path)?;

        info!(
            "Wrote {} captions covering {:.3}s to {:?}",
            track.len(),
            track.total_duration(),
            output_path
        );
        Ok(track)
    }

    /// Read an SRT file and check its timing with the configured floors
    pub fn inspect_srt(
        &self,
        srt_path: &Path,
        expected_duration: Option<f64>,
    ) -> Result<(SubtitleTrack, InspectionReport), AppError> {
        let track = SubtitleTrack::read_srt(srt_path)?;
        let inspector = TrackInspector::with_config(InspectorConfig::from_timing(&self.config.timing));
        let report = inspector.inspect(&track, expected_duration);
        Ok((track, report))
    }

    /// Run the full pipeline: script, narration, captions, video, metadata
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationReport, AppError> {
        let start_time = std::time::Instant::now();

        let output_dir = FileManager::todays_output_dir(&self.config.paths.output_dir, &request.id);
        let mut report = GenerationReport {
            audio_path: output_dir.join(AUDIO_FILE_NAME),
            subtitle_path: output_dir.join(SUBTITLE_FILE_NAME),
            video_path: output_dir.join(VIDEO_FILE_NAME),
            metadata_path: output_dir.join(METADATA_FILE_NAME),
            output_dir,
            duration_secs: 0.0,
            caption_count: 0,
            generated: false,
        };

        if FileManager::file_exists(&report.video_path) && !request.force_overwrite {
            warn!("Skipping {}, video already exists (use -f to force overwrite)", request.id);
            return Ok(report);
        }

        let progress = self.progress_bar();

        // 1. Script
        progress.set_message("Loading script");
        let script = self.load_script(request)?;
        let lines = script.lines();
        debug!("Script has {} narration lines", lines.len());
        progress.inc(1);

        FileManager::ensure_dir(&report.output_dir)?;

        // 2. Narration
        progress.set_message("Preparing narration");
        if request.dry_run {
            self.media
                .generate_silence(&report.audio_path, self.config.media.dry_run_audio_secs)
                .await?;
        } else {
            let audio = request
                .audio_path
                .as_ref()
                .ok_or_else(|| AppError::File("An audio file is required unless --dry-run is set".to_string()))?;
            FileManager::copy_file(audio, &report.audio_path)?;
        }
        progress.inc(1);

        // 3. Duration
        progress.set_message("Measuring narration");
        report.duration_secs = self.media.probe_duration(&report.audio_path).await?;
        progress.inc(1);

        // 4. Captions
        progress.set_message("Timing captions");
        let track = self.timer().build_track(&lines, report.duration_secs);
        track.write_to_srt(&report.subtitle_path)?;
        report.caption_count = track.len();
        progress.inc(1);

        // 5. Video
        progress.set_message("Composing video");
        let background = FileManager::pick_background(&self.config.paths.assets_dir)?;
        match &background {
            Some(path) => debug!("Using background {:?}", path),
            None => debug!("Using {} background", self.config.video.background_color),
        }
        let compose = ComposeRequest {
            audio_path: report.audio_path.clone(),
            subtitle_path: report.subtitle_path.clone(),
            output_path: report.video_path.clone(),
            background,
        };
        self.media.compose_video(&compose).await?;
        progress.inc(1);

        // 6. Metadata
        progress.set_message("Writing metadata");
        let metadata = VideoMetadata::from_script(&script, &request.theme, &report.output_dir, report.duration_secs);
        let json = metadata
            .to_json()
            .map_err(|e| AppError::Unknown(format!("Failed to serialize metadata: {}", e)))?;
        FileManager::write_to_file(&report.metadata_path, &json)?;
        progress.inc(1);

        progress.finish_and_clear();
        report.generated = true;

        info!(
            "Generated {:?} ({} captions, {:.1}s narration) in {:.1}s",
            report.video_path,
            report.caption_count,
            report.duration_secs,
            start_time.elapsed().as_secs_f64()
        );

        Ok(report)
    }

    fn load_script(&self, request: &GenerationRequest) -> Result<Script, AppError> {
        let script = match (&request.script_path, request.dry_run) {
            (Some(path), _) => Script::load(path)?,
            (None, true) => Script::sample(&request.theme),
            (None, false) => {
                return Err(AppError::Script(ScriptError::Missing(
                    "a script file is required unless --dry-run is set".to_string(),
                )));
            }
        };
        script.validate()?;
        Ok(script)
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(PIPELINE_STEPS);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }
}
