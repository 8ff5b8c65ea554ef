/*!
 * Proportional caption timing.
 *
 * Maps an ordered list of narration lines onto contiguous time intervals
 * whose widths follow each line's character count, so captions track the
 * narration without needing word-level alignment.
 */

use log::{debug, warn};

use crate::app_config::TimingConfig;
use crate::subtitle_track::{SubtitleEntry, SubtitleTrack};

/// Default minimum share of the total duration given to any single line
pub const DEFAULT_MIN_SHARE: f64 = 0.02;

/// Default floor applied to the measured narration duration, in seconds
pub const DEFAULT_MIN_DURATION_SECS: f64 = 0.5;

/// Half-open time span `[start, end)` in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Width of the interval in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Allocates caption intervals proportionally to line length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubtitleTimer {
    // @field: Minimum fraction of the total duration per line
    min_share: f64,

    // @field: Floor for the total duration in seconds
    min_duration_secs: f64,
}

impl Default for SubtitleTimer {
    fn default() -> Self {
        Self {
            min_share: DEFAULT_MIN_SHARE,
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
        }
    }
}

impl SubtitleTimer {
    /// Create a timer with explicit floors.
    ///
    /// Non-finite or negative values fall back to zero so the allocator stays total.
    pub fn new(min_share: f64, min_duration_secs: f64) -> Self {
        Self {
            min_share: sanitize(min_share),
            min_duration_secs: sanitize(min_duration_secs),
        }
    }

    /// Create a timer from the timing section of the configuration
    pub fn from_config(config: &TimingConfig) -> Self {
        Self::new(config.min_share, config.min_duration_secs)
    }

    pub fn min_share(&self) -> f64 {
        self.min_share
    }

    pub fn min_duration_secs(&self) -> f64 {
        self.min_duration_secs
    }

    /// Duration actually distributed across the lines after the floor is applied
    pub fn effective_duration(&self, duration: f64) -> f64 {
        if duration.is_nan() {
            return self.min_duration_secs;
        }
        duration.max(self.min_duration_secs)
    }

    /// Assign each line a contiguous interval weighted by its character count.
    ///
    /// The result has one interval per line, in input order. Consecutive
    /// intervals share their boundary, the first starts at zero and the last
    /// ends at the effective duration. When the per-line floor makes the
    /// shares sum past one, trailing lines are compressed, possibly to zero width.
    pub fn allocate<S: AsRef<str>>(&self, lines: &[S], duration: f64) -> Vec<Interval> {
        if lines.is_empty() {
            return Vec::new();
        }

        let total_duration = self.effective_duration(duration);
        if total_duration > duration || duration.is_nan() {
            debug!(
                "Duration {:.3}s below floor, allocating {:.3}s instead",
                duration, total_duration
            );
        }

        let char_counts: Vec<usize> = lines
            .iter()
            .map(|line| line.as_ref().chars().count())
            .collect();
        let total_chars: usize = char_counts.iter().sum();

        // With no text at all every line gets the same share
        let equal_share = 1.0 / lines.len() as f64;

        let mut intervals = Vec::with_capacity(lines.len());
        let mut current = 0.0_f64;
        let last_index = lines.len() - 1;

        for (i, &chars) in char_counts.iter().enumerate() {
            let share = if total_chars == 0 {
                equal_share.max(self.min_share)
            } else {
                (chars as f64 / total_chars as f64).max(self.min_share)
            };
            let candidate = share * total_duration;

            let start = current;
            // Shares always sum to at least one, so the last caption closes the track
            let end = if i == last_index {
                total_duration
            } else {
                (current + candidate).min(total_duration)
            };

            intervals.push(Interval::new(start, end));
            current = end;
        }

        let zero_width = intervals.iter().filter(|iv| iv.is_empty()).count();
        if zero_width > 0 {
            warn!(
                "{} of {} captions received no time; the per-line floor consumed the full {:.3}s",
                zero_width,
                intervals.len(),
                total_duration
            );
        }

        intervals
    }

    /// Allocate intervals and pair them with their text as a numbered track
    pub fn build_track<S: AsRef<str>>(&self, lines: &[S], duration: f64) -> SubtitleTrack {
        let entries = self
            .allocate(lines, duration)
            .into_iter()
            .zip(lines.iter())
            .enumerate()
            .map(|(i, (interval, line))| SubtitleEntry::new(i + 1, interval, line.as_ref().to_string()))
            .collect();

        SubtitleTrack::from_entries(entries)
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Format seconds as a SubRip timestamp (`HH:MM:SS,mmm`).
///
/// Seconds are rounded to the nearest millisecond before being split into
/// fields. Negative and NaN inputs format as zero.
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = if seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    format_timestamp_ms(total_ms)
}

/// Format a millisecond count as a SubRip timestamp
pub fn format_timestamp_ms(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Render a track as SubRip text.
///
/// Blocks are separated by one blank line and the output ends with a single
/// newline. An empty track renders as an empty string.
pub fn render(track: &SubtitleTrack) -> String {
    track
        .entries
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
