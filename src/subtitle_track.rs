use std::fmt;
use std::fs;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{warn, debug};

use crate::errors::SubtitleError;
use crate::subtitle_timer::{self, Interval};

// @module: SubRip caption tracks

// @const: SRT timestamp line regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2,}):(\d{2}):(\d{2})[,.](\d{3})")
        .expect("timestamp regex is valid")
});

// @struct: Single caption entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number, starting at 1
    pub seq_num: usize,

    // @field: Time span in seconds
    pub interval: Interval,

    // @field: Caption text
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(seq_num: usize, interval: Interval, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            interval,
            text,
        }
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`) into seconds
    pub fn parse_timestamp(timestamp: &str) -> Result<f64, SubtitleError> {
        let invalid = || SubtitleError::InvalidTimestamp(timestamp.to_string());

        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        if parts.len() != 4 {
            return Err(invalid());
        }

        let hours: u64 = parts[0].parse().map_err(|_| invalid())?;
        let minutes: u64 = parts[1].parse().map_err(|_| invalid())?;
        let seconds: u64 = parts[2].parse().map_err(|_| invalid())?;
        let millis: u64 = parts[3].parse().map_err(|_| invalid())?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(invalid());
        }

        let total_ms = to_total_ms(hours, minutes, seconds, millis).ok_or_else(invalid)?;
        Ok(total_ms as f64 / 1000.0)
    }

    /// Formatted start timestamp
    pub fn format_start_time(&self) -> String {
        subtitle_timer::format_timestamp(self.interval.start)
    }

    /// Formatted end timestamp
    pub fn format_end_time(&self) -> String {
        subtitle_timer::format_timestamp(self.interval.end)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)
    }
}

/// Ordered set of caption entries for one narration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleTrack {
    /// Entries in playback order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<SubtitleEntry>) -> Self {
        SubtitleTrack { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// End of the last caption, or zero for an empty track
    pub fn total_duration(&self) -> f64 {
        self.entries.last().map_or(0.0, |e| e.interval.end)
    }

    /// Render the track as SubRip text
    pub fn render(&self) -> String {
        subtitle_timer::render(self)
    }

    /// Write the track to an SRT file, creating parent directories as needed
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        fs::write(path, self.render())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        debug!("Wrote {} captions to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Read and parse an SRT file
    pub fn read_srt<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        let track = Self::parse_srt_string(&content)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;
        Ok(track)
    }

    /// Parse SubRip text into a track.
    ///
    /// Blocks with an unreadable timestamp line are skipped with a warning.
    /// Entries keep their file order; use the inspector to find overlaps.
    pub fn parse_srt_string(content: &str) -> Result<Self, SubtitleError> {
        let mut entries = Vec::new();

        // State for the block being read
        let mut current_seq_num: Option<usize> = None;
        let mut current_interval: Option<Interval> = None;
        let mut current_text: Vec<&str> = Vec::new();
        let mut skipping = false;

        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        for (line_no, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let (Some(seq_num), Some(interval)) = (current_seq_num, current_interval) {
                    entries.push(SubtitleEntry::new(seq_num, interval, current_text.join("\n")));
                }
                current_seq_num = None;
                current_interval = None;
                current_text.clear();
                skipping = false;
                continue;
            }

            if skipping {
                continue;
            }

            if current_seq_num.is_none() {
                match trimmed.parse::<usize>() {
                    Ok(num) => current_seq_num = Some(num),
                    Err(_) => warn!("Unexpected text at line {} before sequence number: {}", line_no + 1, trimmed),
                }
                continue;
            }

            if current_interval.is_none() {
                match Self::parse_timestamp_line(trimmed) {
                    Some(interval) => current_interval = Some(interval),
                    None => {
                        warn!("Skipping block with invalid timestamp at line {}: {}", line_no + 1, trimmed);
                        current_seq_num = None;
                        skipping = true;
                    }
                }
                continue;
            }

            current_text.push(trimmed);
        }

        if let (Some(seq_num), Some(interval)) = (current_seq_num, current_interval) {
            entries.push(SubtitleEntry::new(seq_num, interval, current_text.join("\n")));
        }

        if entries.is_empty() {
            return Err(SubtitleError::NoEntries);
        }

        Ok(SubtitleTrack { entries })
    }

    fn parse_timestamp_line(line: &str) -> Option<Interval> {
        let caps = TIMESTAMP_REGEX.captures(line)?;
        let start = Self::captures_to_seconds(&caps, 1)?;
        let end = Self::captures_to_seconds(&caps, 5)?;
        Some(Interval::new(start, end))
    }

    fn captures_to_seconds(caps: &regex::Captures, start_idx: usize) -> Option<f64> {
        let field = |offset: usize| -> Option<u64> {
            caps.get(start_idx + offset)?.as_str().parse().ok()
        };
        let hours = field(0)?;
        let minutes = field(1)?;
        let seconds = field(2)?;
        let millis = field(3)?;

        if minutes >= 60 || seconds >= 60 {
            return None;
        }

        Some(to_total_ms(hours, minutes, seconds, millis)? as f64 / 1000.0)
    }
}

/// Combine timestamp fields into milliseconds, `None` on overflow
fn to_total_ms(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes * 60_000 + seconds * 1_000 + millis)
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Track")?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        writeln!(f, "Duration: {}", subtitle_timer::format_timestamp(self.total_duration()))
    }
}
