/*!
 * Integration tests for the script to SRT workflow
 */

use std::sync::Arc;
use anyhow::Result;

use shortsub::app_controller::{Controller, DurationSource};
use shortsub::file_utils::FileManager;
use shortsub::media::MockMediaTool;
use shortsub::media::mock::MockCall;
use shortsub::subtitle_track::SubtitleTrack;
use shortsub::validation::TrackInspector;
use crate::common;

/// Test writing captions for a known duration and inspecting the result
#[tokio::test]
async fn test_subtitle_workflow_withKnownDuration_shouldWriteCleanTrack() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let script_path = common::create_test_script(temp_dir.path(), "script.json")?;
    let output = temp_dir.path().join("subtitles.srt");

    let mock = MockMediaTool::with_duration(99.0);
    let controller = Controller::with_media_tool(common::test_config(temp_dir.path()), Arc::new(mock.clone()))
        .show_progress(false);

    let track = controller
        .write_subtitles(&script_path, DurationSource::Seconds(12.5), &output)
        .await?;

    assert_eq!(track.len(), 5);
    assert_eq!(track.total_duration(), 12.5);
    assert!(mock.calls().is_empty(), "a known duration must not probe");

    let content = FileManager::read_to_string(&output)?;
    assert!(content.starts_with("1\n00:00:00,000 --> "));
    assert!(content.contains("Why does coffee wake you up?"));
    assert!(content.trim_end().ends_with("Follow for more!"));

    let parsed = SubtitleTrack::read_srt(&output)?;
    assert!(TrackInspector::new().inspect(&parsed, Some(12.5)).passed());
    Ok(())
}

/// Test that the narration length is probed from the audio file
#[tokio::test]
async fn test_subtitle_workflow_withAudioFile_shouldProbeDuration() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script_path = common::create_test_file(temp_dir.path(), "lines.txt", "first\nsecond\nthird\n")?;
    let audio = common::create_test_file(temp_dir.path(), "audio.mp3", "")?;
    let output = temp_dir.path().join("captions").join("out.srt");

    let mock = MockMediaTool::with_duration(7.25);
    let controller = Controller::with_media_tool(common::test_config(temp_dir.path()), Arc::new(mock.clone()))
        .show_progress(false);

    let track = controller
        .write_subtitles(&script_path, DurationSource::Audio(audio.clone()), &output)
        .await?;

    assert_eq!(mock.calls(), vec![MockCall::Probe(audio.display().to_string())]);
    assert_eq!(track.total_duration(), 7.25);
    assert!(output.exists());
    Ok(())
}

/// Test that a probe shorter than the floor still yields a valid track
#[tokio::test]
async fn test_subtitle_workflow_withSilentAudio_shouldUseDurationFloor() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script_path = common::create_test_file(temp_dir.path(), "lines.txt", "only line\n")?;
    let output = temp_dir.path().join("out.srt");

    let controller = Controller::with_media_tool(
        common::test_config(temp_dir.path()),
        Arc::new(MockMediaTool::with_duration(0.0)),
    )
    .show_progress(false);

    let track = controller
        .write_subtitles(&script_path, DurationSource::Audio(temp_dir.path().join("a.mp3")), &output)
        .await?;

    assert_eq!(track.total_duration(), 0.5);
    assert_eq!(
        FileManager::read_to_string(&output)?,
        "1\n00:00:00,000 --> 00:00:00,500\nonly line\n"
    );
    Ok(())
}

/// Test that a blank script is rejected before anything is written
#[test]
fn test_subtitle_workflow_withBlankScript_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script_path = common::create_test_file(temp_dir.path(), "blank.txt", "\n   \n")?;
    let output = temp_dir.path().join("out.srt");

    let controller = Controller::with_media_tool(
        common::test_config(temp_dir.path()),
        Arc::new(MockMediaTool::with_duration(3.0)),
    )
    .show_progress(false);

    let result = tokio_test::block_on(controller.write_subtitles(&script_path, DurationSource::Seconds(3.0), &output));

    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}
