/*!
 * Validation of caption tracks.
 *
 * - `timecodes`: checks contiguity, coverage and reading speed of a track
 */

pub mod timecodes;

// Re-export main types
pub use timecodes::{InspectionReport, InspectorConfig, TimecodeIssue, TrackInspector};
