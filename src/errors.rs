/*!
 * Error types for the shortsub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. Caption timing
 * itself never fails; these cover the media tools, script loading and SRT parsing.
 */

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when running external media tools
#[derive(Error, Debug)]
pub enum MediaError {
    /// The tool could not be started at all
    #[error("Failed to execute {tool}: {message}")]
    SpawnFailed {
        /// Binary name
        tool: String,
        /// OS error description
        message: String,
    },

    /// The tool ran but exited unsuccessfully
    #[error("{tool} exited with status {status}: {stderr}")]
    CommandFailed {
        /// Binary name
        tool: String,
        /// Exit code, or -1 when killed by a signal
        status: i32,
        /// Filtered stderr output
        stderr: String,
    },

    /// The tool did not finish in time
    #[error("{tool} timed out after {}s", .timeout.as_secs())]
    Timeout {
        /// Binary name
        tool: String,
        /// Configured limit
        timeout: Duration,
    },

    /// The probe output was not a usable duration
    #[error("Invalid duration reported for {path}: {value}")]
    InvalidDuration {
        /// Probed file
        path: String,
        /// Raw probe output
        value: String,
    },
}

/// Errors that can occur while loading a narration script
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script file could not be read
    #[error("Failed to read script {path}: {message}")]
    Read {
        path: String,
        message: String,
    },

    /// The script JSON was malformed
    #[error("Failed to parse script {path}: {message}")]
    Parse {
        path: String,
        message: String,
    },

    /// No script was supplied where one is required
    #[error("No script given: {0}")]
    Missing(String),

    /// The script has nothing to narrate
    #[error("Script has no narration lines")]
    Empty,
}

/// Errors that can occur while reading subtitle tracks
#[derive(Error, Debug, PartialEq)]
pub enum SubtitleError {
    /// A timestamp could not be parsed
    #[error("Invalid SRT timestamp: {0}")]
    InvalidTimestamp(String),

    /// No caption block could be read
    #[error("No valid subtitle entries were found in the SRT content")]
    NoEntries,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from an external media tool
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Error from script loading
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Error from subtitle parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
