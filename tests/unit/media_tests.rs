/*!
 * Tests for the ffmpeg backend's argument construction and output parsing
 */

use std::path::{Path, PathBuf};
use shortsub::app_config::{MediaConfig, VideoConfig};
use shortsub::errors::MediaError;
use shortsub::media::ffmpeg::{parse_duration, subtitle_filter};
use shortsub::media::{ComposeRequest, FfmpegTool};

fn compose_request(background: Option<PathBuf>) -> ComposeRequest {
    ComposeRequest {
        audio_path: PathBuf::from("/tmp/run/audio.mp3"),
        subtitle_path: PathBuf::from("/tmp/run/subtitles.srt"),
        output_path: PathBuf::from("/tmp/run/video.mp4"),
        background,
    }
}

/// Test the ffprobe arguments
#[test]
fn test_probeArgs_withPath_shouldRequestBareDuration() {
    let args = FfmpegTool::probe_args(Path::new("audio.mp3"));

    assert!(args.contains(&"format=duration".to_string()));
    assert!(args.contains(&"default=noprint_wrappers=1:nokey=1".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("audio.mp3"));
}

/// Test the silent narration arguments
#[test]
fn test_silenceArgs_withSeconds_shouldUseNullSource() {
    let args = FfmpegTool::silence_args(Path::new("audio.mp3"), 5.0);

    assert!(args.iter().any(|a| a.starts_with("anullsrc")));
    let t_index = args.iter().position(|a| a == "-t").unwrap();
    assert_eq!(args[t_index + 1], "5");
}

/// Test that the configured video size and style reach the filter graph
#[test]
fn test_composeArgs_withCustomVideoConfig_shouldUseIt() {
    let video = VideoConfig {
        width: 1080,
        height: 1920,
        font_size: 60,
        ..VideoConfig::default()
    };
    let tool = FfmpegTool::new(MediaConfig::default(), video);

    let args = tool.compose_args(&compose_request(None));

    assert!(args.contains(&"color=c=black:s=1080x1920:r=30".to_string()));
    let filter_index = args.iter().position(|a| a == "-vf").unwrap();
    assert!(args[filter_index + 1].contains("FontSize=60"));
    assert!(args.contains(&"192k".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("/tmp/run/video.mp4"));
}

/// Test the background image branch
#[test]
fn test_composeArgs_withBackground_shouldCropToFrame() {
    let tool = FfmpegTool::new(MediaConfig::default(), VideoConfig::default());
    let args = tool.compose_args(&compose_request(Some(PathBuf::from("assets/bg.png"))));

    assert!(args.contains(&"assets/bg.png".to_string()));
    let filter_index = args.iter().position(|a| a == "-vf").unwrap();
    assert!(args[filter_index + 1].starts_with("scale=720:1280:force_original_aspect_ratio=increase,crop=720:1280,subtitles="));
}

/// Test the subtitles filter with a plain path
#[test]
fn test_subtitleFilter_withPlainPath_shouldQuoteStyle() {
    let filter = subtitle_filter(Path::new("out/subtitles.srt"), "FontSize=42");
    assert_eq!(filter, "subtitles=out/subtitles.srt:force_style='FontSize=42'");
}

/// Test ffprobe output parsing
#[test]
fn test_parseDuration_withVariousOutputs_shouldValidate() {
    let path = Path::new("audio.mp3");

    assert_eq!(parse_duration(path, "12.345000\n").ok(), Some(12.345));
    assert!(matches!(parse_duration(path, "N/A"), Err(MediaError::InvalidDuration { .. })));
    assert!(matches!(parse_duration(path, ""), Err(MediaError::InvalidDuration { .. })));
    assert!(matches!(parse_duration(path, "-1.0"), Err(MediaError::InvalidDuration { .. })));
}
