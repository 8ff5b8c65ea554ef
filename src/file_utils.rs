use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use chrono::{Local, NaiveDate};
use rand::seq::IndexedRandom;
use log::debug;

// @module: File and directory utilities

/// Image extensions accepted as video backgrounds
pub const BACKGROUND_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Per-run output directory, `<root>/<YYYYMMDD>_<id>`
    pub fn dated_output_dir<P: AsRef<Path>>(root: P, date: NaiveDate, id: &str) -> PathBuf {
        root.as_ref().join(format!("{}_{}", date.format("%Y%m%d"), id))
    }

    // @generates: Output directory for today
    pub fn todays_output_dir<P: AsRef<Path>>(root: P, id: &str) -> PathBuf {
        Self::dated_output_dir(root, Local::now().date_naive(), id)
    }

    /// Find files with any of the given extensions directly inside a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    let ext = ext.to_string_lossy();
                    if extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Pick a random background image from the assets directory.
    ///
    /// Returns `None` when the directory is missing or holds no images.
    pub fn pick_background<P: AsRef<Path>>(assets_dir: P) -> Result<Option<PathBuf>> {
        let assets_dir = assets_dir.as_ref();
        if !assets_dir.is_dir() {
            debug!("No assets directory at {:?}, using solid background", assets_dir);
            return Ok(None);
        }

        let candidates = Self::find_files(assets_dir, BACKGROUND_EXTENSIONS)?;
        let mut rng = rand::rng();
        Ok(candidates.choose(&mut rng).cloned())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.exists() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", from));
        }

        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::copy(from, to)
            .with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;

        Ok(())
    }
}
