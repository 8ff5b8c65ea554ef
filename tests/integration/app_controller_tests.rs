/*!
 * Integration tests for the full generation pipeline
 */

use std::sync::Arc;
use anyhow::Result;

use shortsub::app_controller::{Controller, DurationSource, GenerationRequest, METADATA_FILE_NAME, SUBTITLE_FILE_NAME};
use shortsub::errors::{AppError, MediaError, ScriptError};
use shortsub::file_utils::FileManager;
use shortsub::media::mock::MockCall;
use shortsub::media::MockMediaTool;
use shortsub::script::{Script, VideoMetadata};
use shortsub::subtitle_track::SubtitleTrack;
use crate::common;

fn dry_run_request(id: &str) -> GenerationRequest {
    GenerationRequest {
        id: id.to_string(),
        theme: "coffee".to_string(),
        script_path: None,
        audio_path: None,
        dry_run: true,
        force_overwrite: false,
    }
}

/// Test a dry run end to end against the mock media tool
#[tokio::test]
async fn test_generate_withDryRun_shouldWriteAllArtifacts() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let mock = MockMediaTool::with_duration(5.0);
    let controller = Controller::with_media_tool(common::test_config(temp_dir.path()), Arc::new(mock.clone()))
        .show_progress(false);

    let report = controller.generate(&dry_run_request("001")).await?;

    assert!(report.generated);
    assert!(report.output_dir.starts_with(temp_dir.path().join("out")));
    assert!(report.output_dir.to_string_lossy().ends_with("_001"));
    assert!(report.audio_path.exists());
    assert!(report.video_path.exists());
    assert_eq!(report.subtitle_path, report.output_dir.join(SUBTITLE_FILE_NAME));
    assert_eq!(report.metadata_path, report.output_dir.join(METADATA_FILE_NAME));

    let sample = Script::sample("coffee");
    assert_eq!(report.caption_count, sample.lines().len());
    assert_eq!(report.duration_secs, 5.0);

    let track = SubtitleTrack::read_srt(&report.subtitle_path)?;
    assert_eq!(track.len(), sample.lines().len());
    assert_eq!(track.total_duration(), 5.0);

    let metadata: VideoMetadata = serde_json::from_str(&FileManager::read_to_string(&report.metadata_path)?)?;
    assert_eq!(metadata.theme, "coffee");
    assert_eq!(metadata.title, sample.title);
    assert_eq!(metadata.duration_secs, 5.0);

    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(calls[0], MockCall::Silence(_)));
    assert!(matches!(calls[1], MockCall::Probe(_)));
    match &calls[2] {
        MockCall::Compose(request) => {
            assert_eq!(request.subtitle_path, report.subtitle_path);
            assert_eq!(request.background, None);
        }
        other => panic!("expected compose, got {:?}", other),
    }
    Ok(())
}

/// Test that a supplied script and audio file are used as-is
#[tokio::test]
async fn test_generate_withScriptAndAudio_shouldCopyNarration() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script_path = common::create_test_script(temp_dir.path(), "script.json")?;
    let audio = common::create_test_file(temp_dir.path(), "narration.mp3", "narration bytes")?;
    let assets = temp_dir.path().join("assets");
    std::fs::create_dir_all(&assets)?;
    let background = common::create_test_file(&assets, "bg.png", "")?;

    let mock = MockMediaTool::with_duration(11.0);
    let controller = Controller::with_media_tool(common::test_config(temp_dir.path()), Arc::new(mock.clone()))
        .show_progress(false);

    let request = GenerationRequest {
        script_path: Some(script_path),
        audio_path: Some(audio),
        dry_run: false,
        ..dry_run_request("002")
    };
    let report = controller.generate(&request).await?;

    assert_eq!(FileManager::read_to_string(&report.audio_path)?, "narration bytes");
    assert_eq!(report.caption_count, 5);
    assert!(!mock.calls().iter().any(|c| matches!(c, MockCall::Silence(_))));
    assert!(mock
        .calls()
        .iter()
        .any(|c| matches!(c, MockCall::Compose(r) if r.background.as_ref() == Some(&background))));
    Ok(())
}

/// Test that an existing video is kept unless overwrite is forced
#[tokio::test]
async fn test_generate_withExistingVideo_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mock = MockMediaTool::with_duration(5.0);
    let controller = Controller::with_media_tool(common::test_config(temp_dir.path()), Arc::new(mock.clone()))
        .show_progress(false);

    let first = controller.generate(&dry_run_request("003")).await?;
    assert!(first.generated);
    let calls_after_first = mock.calls().len();

    let second = controller.generate(&dry_run_request("003")).await?;
    assert!(!second.generated);
    assert_eq!(mock.calls().len(), calls_after_first);

    let forced = GenerationRequest {
        force_overwrite: true,
        ..dry_run_request("003")
    };
    assert!(controller.generate(&forced).await?.generated);
    Ok(())
}

/// Test that a failing composition surfaces as a media error
#[tokio::test]
async fn test_generate_withFailingCompose_shouldReturnMediaError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_media_tool(
        common::test_config(temp_dir.path()),
        Arc::new(MockMediaTool::failing_compose(5.0, "No such filter: 'subtitles'")),
    )
    .show_progress(false);

    let result = controller.generate(&dry_run_request("004")).await;

    match result {
        Err(AppError::Media(MediaError::CommandFailed { stderr, .. })) => {
            assert!(stderr.contains("subtitles"));
        }
        other => panic!("expected a media error, got {:?}", other),
    }
    Ok(())
}

/// Test that a real run without a script is rejected
#[tokio::test]
async fn test_generate_withoutScriptOrDryRun_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mock = MockMediaTool::with_duration(5.0);
    let controller = Controller::with_media_tool(common::test_config(temp_dir.path()), Arc::new(mock.clone()))
        .show_progress(false);

    let request = GenerationRequest {
        dry_run: false,
        ..dry_run_request("005")
    };
    let result = controller.generate(&request).await;

    assert!(matches!(result, Err(AppError::Script(ScriptError::Missing(_)))));
    assert!(mock.calls().is_empty());
    Ok(())
}

/// Test that a real run without narration audio is rejected
#[tokio::test]
async fn test_generate_withoutAudio_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script_path = common::create_test_script(temp_dir.path(), "script.json")?;
    let controller = Controller::with_media_tool(
        common::test_config(temp_dir.path()),
        Arc::new(MockMediaTool::with_duration(5.0)),
    )
    .show_progress(false);

    let request = GenerationRequest {
        script_path: Some(script_path),
        dry_run: false,
        ..dry_run_request("006")
    };

    assert!(matches!(controller.generate(&request).await, Err(AppError::File(_))));
    Ok(())
}

/// Test inspecting a written track with the controller's timing floors
#[tokio::test]
async fn test_inspectSrt_withShortNarration_shouldPassAgainstFloor() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script_path = common::create_test_file(temp_dir.path(), "lines.txt", "hi\nthere\n")?;
    let output = temp_dir.path().join("short.srt");
    let controller = Controller::with_media_tool(
        common::test_config(temp_dir.path()),
        Arc::new(MockMediaTool::with_duration(0.1)),
    )
    .show_progress(false);

    controller
        .write_subtitles(&script_path, DurationSource::Seconds(0.1), &output)
        .await?;
    let (track, report) = controller.inspect_srt(&output, Some(0.1))?;

    assert_eq!(track.total_duration(), 0.5);
    assert!(report.passed(), "unexpected issues: {:?}", report);
    Ok(())
}

/// Test that a track with a gap fails inspection
#[test]
fn test_inspectSrt_withGap_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "gap.srt",
        "1\n00:00:00,000 --> 00:00:01,000\na\n\n2\n00:00:02,000 --> 00:00:03,000\nb\n",
    )?;
    let controller = Controller::with_config(common::test_config(temp_dir.path()));

    let (_, report) = controller.inspect_srt(&path, Some(3.0))?;

    assert!(!report.passed());
    assert_eq!(report.entries[0].seq_num, 2);
    Ok(())
}

/// Test that an unreadable file is an error rather than a failed report
#[test]
fn test_inspectSrt_withMissingFile_shouldReturnError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::test_config(temp_dir.path()));

    assert!(controller.inspect_srt(&temp_dir.path().join("missing.srt"), None).is_err());
    Ok(())
}
