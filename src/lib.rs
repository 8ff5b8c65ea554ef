/*!
 * # shortsub - captions for short narrated videos
 *
 * A Rust library for timing and burning in captions for short-form videos
 * whose narration is produced by speech synthesis.
 *
 * ## Features
 *
 * - Proportional caption timing from line length and measured audio duration
 * - SubRip (SRT) rendering, parsing and timing inspection
 * - Narration script loading (JSON or plain text) and video metadata
 * - Video composition with burned-in captions through ffmpeg
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_timer`: Interval allocation and timestamp formatting
 * - `subtitle_track`: Caption entries, SRT rendering and parsing
 * - `validation`: Timing checks on existing tracks
 * - `script`: Narration scripts and `meta.json` metadata
 * - `media`: ffprobe/ffmpeg backend behind the `MediaTool` trait
 * - `app_controller`: The generation pipeline
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## Example
 *
 * ```
 * use shortsub::SubtitleTimer;
 *
 * let track = SubtitleTimer::default().build_track(&["a", "bb", "ccc"], 6.0);
 * assert_eq!(track.render().lines().nth(1), Some("00:00:00,000 --> 00:00:01,000"));
 * ```
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod media;
pub mod script;
pub mod subtitle_timer;
pub mod subtitle_track;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, MediaError, ScriptError, SubtitleError};
pub use script::Script;
pub use subtitle_timer::{format_timestamp, render, Interval, SubtitleTimer};
pub use subtitle_track::{SubtitleEntry, SubtitleTrack};
