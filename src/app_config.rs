use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::subtitle_timer::{DEFAULT_MIN_DURATION_SECS, DEFAULT_MIN_SHARE};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. Every collaborator receives
/// the section it needs explicitly; nothing is read from the environment.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Caption timing parameters
    #[serde(default)]
    pub timing: TimingConfig,

    /// Video composition settings
    #[serde(default)]
    pub video: VideoConfig,

    /// External tool settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Caption timing parameters
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    /// Minimum fraction of the narration each caption receives (0.0 to 1.0)
    #[serde(default = "default_min_share")]
    pub min_share: f64,

    /// Floor applied to the measured narration duration, in seconds
    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_share: default_min_share(),
            min_duration_secs: default_min_duration_secs(),
        }
    }
}

/// Video composition settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VideoConfig {
    // @field: Output width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    // @field: Output height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    // @field: Frame rate of the solid colour fallback background
    #[serde(default = "default_fps")]
    pub fps: u32,

    // @field: Fallback background colour when no image is available
    #[serde(default = "default_background_color")]
    pub background_color: String,

    // @field: Caption font family
    #[serde(default = "default_font_name")]
    pub font_name: String,

    // @field: Caption font size
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    // @field: Caption fill colour in ASS &HAABBGGRR& notation
    #[serde(default = "default_primary_colour")]
    pub primary_colour: String,

    // @field: Caption outline colour in ASS notation
    #[serde(default = "default_outline_colour")]
    pub outline_colour: String,

    #[serde(default = "default_outline")]
    pub outline: u32,

    #[serde(default = "default_shadow")]
    pub shadow: u32,

    // @field: Bottom margin of the captions in pixels
    #[serde(default = "default_margin_v")]
    pub margin_v: u32,

    // @field: AAC bitrate, e.g. "192k"
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            background_color: default_background_color(),
            font_name: default_font_name(),
            font_size: default_font_size(),
            primary_colour: default_primary_colour(),
            outline_colour: default_outline_colour(),
            outline: default_outline(),
            shadow: default_shadow(),
            margin_v: default_margin_v(),
            audio_bitrate: default_audio_bitrate(),
        }
    }
}

impl VideoConfig {
    /// The `force_style` value passed to ffmpeg's subtitles filter
    pub fn force_style(&self) -> String {
        format!(
            "FontName={},FontSize={},PrimaryColour={},OutlineColour={},Outline={},Shadow={},MarginV={}",
            self.font_name,
            self.font_size,
            self.primary_colour,
            self.outline_colour,
            self.outline,
            self.shadow,
            self.margin_v
        )
    }
}

/// External media tool settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MediaConfig {
    /// ffmpeg binary name or path
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg_path: String,

    /// ffprobe binary name or path
    #[serde(default = "default_ffprobe")]
    pub ffprobe_path: String,

    /// Timeout for duration probes, in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Timeout for encoding runs, in seconds
    #[serde(default = "default_encode_timeout_secs")]
    pub encode_timeout_secs: u64,

    /// Length of the silent narration generated for dry runs, in seconds
    #[serde(default = "default_dry_run_audio_secs")]
    pub dry_run_audio_secs: f64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            ffprobe_path: default_ffprobe(),
            probe_timeout_secs: default_probe_timeout_secs(),
            encode_timeout_secs: default_encode_timeout_secs(),
            dry_run_audio_secs: default_dry_run_audio_secs(),
        }
    }
}

/// Input and output locations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PathsConfig {
    /// Root directory for generated videos
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory searched for background images
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            assets_dir: default_assets_dir(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_min_share() -> f64 {
    DEFAULT_MIN_SHARE
}

fn default_min_duration_secs() -> f64 {
    DEFAULT_MIN_DURATION_SECS
}

fn default_width() -> u32 {
    720
}

fn default_height() -> u32 {
    1280
}

fn default_fps() -> u32 {
    30
}

fn default_background_color() -> String {
    "black".to_string()
}

fn default_font_name() -> String {
    "Noto Sans CJK JP".to_string()
}

fn default_font_size() -> u32 {
    42
}

fn default_primary_colour() -> String {
    "&H00FFFFFF&".to_string()
}

fn default_outline_colour() -> String {
    "&H00000000&".to_string()
}

fn default_outline() -> u32 {
    2
}

fn default_shadow() -> u32 {
    1
}

fn default_margin_v() -> u32 {
    110
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    60
}

fn default_encode_timeout_secs() -> u64 {
    600
}

fn default_dry_run_audio_secs() -> f64 {
    5.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the configuration at `path`, creating it with defaults when missing.
    ///
    /// A log level given on the command line replaces the file's value; the
    /// result is validated after overrides are applied.
    pub fn load_or_create<P: AsRef<Path>>(path: P, log_level: Option<LogLevel>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            warn!("Config file not found at '{}', creating default config.", path.display());
            let config = Self::default();
            config.save(path)?;
            config
        };

        if let Some(log_level) = log_level {
            config.log_level = log_level;
        }

        config.validate()
            .context("Configuration validation failed")?;

        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let timing = &self.timing;
        if !timing.min_share.is_finite() || !(0.0..=1.0).contains(&timing.min_share) {
            return Err(anyhow!("timing.min_share must be between 0 and 1, got {}", timing.min_share));
        }
        if !timing.min_duration_secs.is_finite() || timing.min_duration_secs < 0.0 {
            return Err(anyhow!(
                "timing.min_duration_secs must be a non-negative number, got {}",
                timing.min_duration_secs
            ));
        }

        let video = &self.video;
        if video.width == 0 || video.height == 0 {
            return Err(anyhow!("video dimensions must be non-zero, got {}x{}", video.width, video.height));
        }
        // libx264 with yuv420p rejects odd dimensions
        if video.width % 2 != 0 || video.height % 2 != 0 {
            return Err(anyhow!("video dimensions must be even, got {}x{}", video.width, video.height));
        }
        if video.fps == 0 {
            return Err(anyhow!("video.fps must be positive"));
        }
        if video.font_name.trim().is_empty() {
            return Err(anyhow!("video.font_name must not be empty"));
        }

        let media = &self.media;
        if media.ffmpeg_path.trim().is_empty() || media.ffprobe_path.trim().is_empty() {
            return Err(anyhow!("media.ffmpeg_path and media.ffprobe_path must not be empty"));
        }
        if media.probe_timeout_secs == 0 || media.encode_timeout_secs == 0 {
            return Err(anyhow!("media timeouts must be at least one second"));
        }
        if !media.dry_run_audio_secs.is_finite() || media.dry_run_audio_secs <= 0.0 {
            return Err(anyhow!("media.dry_run_audio_secs must be positive"));
        }

        Ok(())
    }
}
