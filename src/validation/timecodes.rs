/*!
 * Timecode checks for caption tracks.
 *
 * A track produced by the timer is contiguous, starts at zero and ends at the
 * narration length. This module checks an existing track against those
 * properties:
 * - Intervals are ordered (start <= end) and non-empty
 * - Consecutive entries neither overlap nor leave a gap
 * - The last entry closes at the expected narration length, after the
 *   same duration floor the timer applies
 * - Reading speed stays within a readable limit
 *
 * Times are compared at millisecond resolution, the precision of SubRip.
 */

use log::debug;

use crate::app_config::TimingConfig;
use crate::subtitle_timer::SubtitleTimer;
use crate::subtitle_track::{SubtitleEntry, SubtitleTrack};

/// Maximum characters per second before a caption is flagged as hard to read
const DEFAULT_MAX_CPS: f64 = 25.0;

/// Types of timecode issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// End time precedes start time
    InvalidTimeRange {
        start_ms: u64,
        end_ms: u64,
    },
    /// Caption is never shown
    ZeroWidth,
    /// Starts before the previous entry ends
    OverlapsWithEntry {
        other_seq_num: usize,
        overlap_ms: u64,
    },
    /// Starts after the previous entry ends
    Gap {
        prev_seq_num: usize,
        gap_ms: u64,
    },
    /// First caption does not start at zero
    LateStart {
        start_ms: u64,
    },
    /// Last caption does not close at the narration length
    CoverageMismatch {
        end_ms: u64,
        expected_ms: u64,
    },
    /// Reading speed exceeds limit
    ReadingSpeedTooHigh {
        cps: f64,
        max_cps: f64,
    },
}

impl TimecodeIssue {
    /// Whether the issue fails a track, as opposed to being advisory
    pub fn is_defect(&self) -> bool {
        !matches!(self, TimecodeIssue::ZeroWidth | TimecodeIssue::ReadingSpeedTooHigh { .. })
    }
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::InvalidTimeRange { start_ms, end_ms } => {
                write!(f, "Invalid time range: start {}ms > end {}ms", start_ms, end_ms)
            }
            TimecodeIssue::ZeroWidth => write!(f, "Zero-width caption"),
            TimecodeIssue::OverlapsWithEntry { other_seq_num, overlap_ms } => {
                write!(f, "Overlaps with entry {} by {}ms", other_seq_num, overlap_ms)
            }
            TimecodeIssue::Gap { prev_seq_num, gap_ms } => {
                write!(f, "Gap of {}ms after entry {}", gap_ms, prev_seq_num)
            }
            TimecodeIssue::LateStart { start_ms } => {
                write!(f, "Track starts at {}ms instead of 0", start_ms)
            }
            TimecodeIssue::CoverageMismatch { end_ms, expected_ms } => {
                write!(f, "Track ends at {}ms, narration is {}ms", end_ms, expected_ms)
            }
            TimecodeIssue::ReadingSpeedTooHigh { cps, max_cps } => {
                write!(f, "Reading speed too high: {:.1} CPS (max: {:.1})", cps, max_cps)
            }
        }
    }
}

/// Issues found for one entry
#[derive(Debug, Clone)]
pub struct EntryIssues {
    pub seq_num: usize,
    pub issues: Vec<TimecodeIssue>,
}

/// Result of inspecting a whole track
#[derive(Debug, Clone, Default)]
pub struct InspectionReport {
    /// Number of entries inspected
    pub entry_count: usize,
    /// Entries with at least one issue, in track order
    pub entries: Vec<EntryIssues>,
    /// Track-level issues (start and coverage)
    pub track_issues: Vec<TimecodeIssue>,
}

impl InspectionReport {
    pub fn total_issues(&self) -> usize {
        self.track_issues.len() + self.entries.iter().map(|e| e.issues.len()).sum::<usize>()
    }

    /// True when no timing defect was found.
    ///
    /// Zero-width captions and reading speed findings are advisory: the timer
    /// itself produces zero-width tails when the per-line floor saturates.
    pub fn passed(&self) -> bool {
        !self.track_issues.iter().any(TimecodeIssue::is_defect)
            && !self.entries.iter().flat_map(|e| e.issues.iter()).any(TimecodeIssue::is_defect)
    }
}

/// Configuration for timecode inspection
#[derive(Debug, Clone)]
pub struct InspectorConfig {
    /// Maximum characters per second (0 disables the check)
    pub max_cps: f64,
    /// Allowed boundary mismatch in milliseconds
    pub tolerance_ms: u64,
    /// Timing floors the track was built with; coverage is checked against
    /// the floored narration length
    pub timing: TimingConfig,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            max_cps: DEFAULT_MAX_CPS,
            tolerance_ms: 1,
            timing: TimingConfig::default(),
        }
    }
}

impl InspectorConfig {
    /// Default limits with the given timing floors
    pub fn from_timing(timing: &TimingConfig) -> Self {
        Self {
            timing: timing.clone(),
            ..Self::default()
        }
    }
}

/// Checks caption tracks for timing defects
#[derive(Debug, Clone, Default)]
pub struct TrackInspector {
    config: InspectorConfig,
}

impl TrackInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InspectorConfig) -> Self {
        Self { config }
    }

    /// Inspect a track, optionally against the measured narration length in seconds
    pub fn inspect(&self, track: &SubtitleTrack, expected_duration: Option<f64>) -> InspectionReport {
        let mut report = InspectionReport {
            entry_count: track.len(),
            ..Default::default()
        };

        let Some(first) = track.entries.first() else {
            return report;
        };

        let tolerance = self.config.tolerance_ms;

        let first_start = to_ms(first.interval.start);
        if first_start > tolerance {
            report.track_issues.push(TimecodeIssue::LateStart { start_ms: first_start });
        }

        let mut previous: Option<&SubtitleEntry> = None;
        for entry in &track.entries {
            let mut issues = self.check_entry(entry);

            if let Some(prev) = previous {
                let prev_end = to_ms(prev.interval.end);
                let start = to_ms(entry.interval.start);
                if prev_end > start + tolerance {
                    issues.push(TimecodeIssue::OverlapsWithEntry {
                        other_seq_num: prev.seq_num,
                        overlap_ms: prev_end - start,
                    });
                } else if start > prev_end + tolerance {
                    issues.push(TimecodeIssue::Gap {
                        prev_seq_num: prev.seq_num,
                        gap_ms: start - prev_end,
                    });
                }
            }

            if !issues.is_empty() {
                report.entries.push(EntryIssues {
                    seq_num: entry.seq_num,
                    issues,
                });
            }
            previous = Some(entry);
        }

        if let Some(expected) = expected_duration {
            let expected = SubtitleTimer::from_config(&self.config.timing).effective_duration(expected);
            let end_ms = to_ms(track.total_duration());
            let expected_ms = to_ms(expected);
            if end_ms.abs_diff(expected_ms) > tolerance {
                report.track_issues.push(TimecodeIssue::CoverageMismatch { end_ms, expected_ms });
            }
        }

        debug!(
            "Timecode inspection: {} entries, {} issues",
            report.entry_count,
            report.total_issues()
        );

        report
    }

    fn check_entry(&self, entry: &SubtitleEntry) -> Vec<TimecodeIssue> {
        let start_ms = to_ms(entry.interval.start);
        let end_ms = to_ms(entry.interval.end);

        if end_ms < start_ms {
            return vec![TimecodeIssue::InvalidTimeRange { start_ms, end_ms }];
        }
        if end_ms == start_ms {
            return vec![TimecodeIssue::ZeroWidth];
        }

        let mut issues = Vec::new();
        if self.config.max_cps > 0.0 {
            let secs = (end_ms - start_ms) as f64 / 1000.0;
            let cps = entry.text.chars().filter(|c| !c.is_whitespace()).count() as f64 / secs;
            if cps > self.config.max_cps {
                issues.push(TimecodeIssue::ReadingSpeedTooHigh {
                    cps,
                    max_cps: self.config.max_cps,
                });
            }
        }
        issues
    }
}

fn to_ms(seconds: f64) -> u64 {
    if seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}
