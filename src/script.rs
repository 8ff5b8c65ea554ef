/*!
 * Narration scripts and video metadata.
 *
 * A script is the text-model output for one short video: a hook sentence,
 * a handful of short body lines and an outro. Captions are built from those
 * lines in narration order.
 */

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::ScriptError;

/// Generated narration script for one short video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Short video title
    #[serde(default)]
    pub title: String,

    /// Opening sentence
    #[serde(default)]
    pub hook: String,

    /// Body sentences in narration order
    #[serde(default)]
    pub body_lines: Vec<String>,

    /// Closing sentence
    #[serde(default)]
    pub outro: String,

    /// Upload description, including the synthetic voice disclosure
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl Script {
    /// Build a script from plain caption lines, one per narration line.
    ///
    /// The first line becomes the hook and the last the outro when there are
    /// at least two lines.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut lines: Vec<String> = lines.iter().map(|l| l.as_ref().to_string()).collect();
        let (hook, outro) = match lines.len() {
            0 => (String::new(), String::new()),
            1 => (lines.remove(0), String::new()),
            _ => {
                let outro = lines.pop().unwrap_or_default();
                (lines.remove(0), outro)
            }
        };

        Script {
            title: String::new(),
            hook,
            body_lines: lines,
            outro,
            description: String::new(),
            hashtags: Vec::new(),
        }
    }

    /// Load a script from disk.
    ///
    /// Files ending in `.json` are parsed as a full script. Anything else is
    /// read as plain text with one caption per non-blank line.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ScriptError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"));

        let script = if is_json {
            serde_json::from_str(&content).map_err(|e| ScriptError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            let lines: Vec<&str> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();
            Self::from_lines(&lines)
        };

        debug!("Loaded script from {} ({} lines)", path.display(), script.lines().len());
        Ok(script)
    }

    /// Fixed script used by dry runs, so the pipeline can be exercised offline
    pub fn sample(theme: &str) -> Self {
        Script {
            title: format!("{}の1分解説", theme),
            hook: format!("今日は「{}」のポイントを30秒で紹介します。", theme),
            body_lines: [
                "ポイントは3つだけ",
                "まず背景を一言でまとめる",
                "次にメリットを短く伝える",
                "最後に注意点を入れる",
                "例え話で理解を助ける",
                "具体策を1つ提示",
                "締めは行動を促す",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            outro: "続きが気になったらフォローしてね。".to_string(),
            description: "AI音声で読み上げています。短く学べる要点まとめです。".to_string(),
            hashtags: ["#学び", "#ショート", "#豆知識", "#1分解説", "#AI音声"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Narration lines: hook, body lines, outro.
    ///
    /// Empty hook or outro are left out; empty body lines are kept so the
    /// caption count matches the script.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.body_lines.len() + 2);
        if !self.hook.is_empty() {
            lines.push(self.hook.clone());
        }
        lines.extend(self.body_lines.iter().cloned());
        if !self.outro.is_empty() {
            lines.push(self.outro.clone());
        }
        lines
    }

    /// Full narration text passed to speech synthesis
    pub fn narration_text(&self) -> String {
        self.lines().join("\n")
    }

    /// Reject scripts with nothing to narrate
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.lines().iter().all(|line| line.trim().is_empty()) {
            return Err(ScriptError::Empty);
        }
        Ok(())
    }
}

/// Description of a produced video, written next to it as `meta.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub hashtags: Vec<String>,
    /// Narration text, one caption per line
    pub script: String,
    pub theme: String,
    /// Output directory of the video
    pub path: PathBuf,
    /// Measured narration length in seconds
    pub duration_secs: f64,
    /// RFC 3339 timestamp with second precision
    pub generated_at: String,
}

impl VideoMetadata {
    pub fn from_script(script: &Script, theme: &str, output_dir: &Path, duration_secs: f64) -> Self {
        VideoMetadata {
            title: script.title.clone(),
            description: script.description.clone(),
            hashtags: script.hashtags.clone(),
            script: script.narration_text(),
            theme: theme.to_string(),
            path: output_dir.to_path_buf(),
            duration_secs,
            generated_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }

    /// Pretty JSON with non-ASCII text left as-is
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
