/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use chrono::NaiveDate;
use shortsub::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test the dated output directory layout
#[test]
fn test_datedOutputDir_withDateAndId_shouldJoinThem() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
    let dir = FileManager::dated_output_dir("out", date, "042");

    assert_eq!(dir, Path::new("out/20260307_042"));
}

/// Test that find_files filters by extension without recursing
#[test]
fn test_findFiles_withMixedFiles_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.png", "")?;
    common::create_test_file(dir, "a.JPG", "")?;
    common::create_test_file(dir, "notes.txt", "")?;
    fs::create_dir(dir.join("nested"))?;
    common::create_test_file(&dir.join("nested"), "c.png", "")?;

    let found = FileManager::find_files(dir, &["png", "jpg"])?;

    assert_eq!(found, vec![dir.join("a.JPG"), dir.join("b.png")]);
    Ok(())
}

/// Test background selection from the assets directory
#[test]
fn test_pickBackground_withImages_shouldPickOneOfThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let first = common::create_test_file(dir, "one.png", "")?;
    let second = common::create_test_file(dir, "two.webp", "")?;
    common::create_test_file(dir, "readme.md", "")?;

    let picked = FileManager::pick_background(dir)?.expect("an image should be picked");
    assert!(picked == first || picked == second);
    Ok(())
}

/// Test that a missing or empty assets directory gives no background
#[test]
fn test_pickBackground_withoutImages_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert_eq!(FileManager::pick_background(temp_dir.path())?, None);
    assert_eq!(FileManager::pick_background(temp_dir.path().join("missing"))?, None);
    Ok(())
}

/// Test writing, reading and copying files
#[test]
fn test_writeAndCopy_withNestedTargets_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = temp_dir.path().join("a").join("source.txt");
    let target = temp_dir.path().join("b").join("c").join("target.txt");

    FileManager::write_to_file(&source, "narration")?;
    FileManager::copy_file(&source, &target)?;

    assert_eq!(FileManager::read_to_string(&target)?, "narration");
    Ok(())
}

/// Test that copying a missing file fails
#[test]
fn test_copyFile_withMissingSource_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = FileManager::copy_file(temp_dir.path().join("missing.mp3"), temp_dir.path().join("out.mp3"));

    assert!(result.is_err());
    Ok(())
}
