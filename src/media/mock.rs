/*!
 * Mock media tool for testing.
 *
 * Writes small placeholder files instead of running ffmpeg, reports a fixed
 * duration and records every call so tests can assert on the pipeline order.
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::MediaError;
use crate::media::{ComposeRequest, MediaTool};

/// A call made against the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Probe(String),
    Silence(String),
    Compose(ComposeRequest),
}

/// Media tool double with a fixed probe result
#[derive(Debug, Clone)]
pub struct MockMediaTool {
    /// Duration returned by every probe
    duration: f64,
    /// When set, compose fails with this stderr
    compose_failure: Option<String>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockMediaTool {
    /// Create a mock that reports the given narration length
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration,
            compose_failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock whose video composition always fails
    pub fn failing_compose(duration: f64, stderr: &str) -> Self {
        Self {
            compose_failure: Some(stderr.to_string()),
            ..Self::with_duration(duration)
        }
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn touch(path: &Path, tool: &str) -> Result<(), MediaError> {
        let io_error = |e: std::io::Error| MediaError::SpawnFailed {
            tool: tool.to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, b"mock").map_err(io_error)
    }
}

#[async_trait]
impl MediaTool for MockMediaTool {
    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError> {
        self.record(MockCall::Probe(path.display().to_string()));
        Ok(self.duration)
    }

    async fn generate_silence(&self, output: &Path, _seconds: f64) -> Result<(), MediaError> {
        self.record(MockCall::Silence(output.display().to_string()));
        Self::touch(output, "mock-ffmpeg")
    }

    async fn compose_video(&self, request: &ComposeRequest) -> Result<(), MediaError> {
        self.record(MockCall::Compose(request.clone()));
        if let Some(stderr) = &self.compose_failure {
            return Err(MediaError::CommandFailed {
                tool: "mock-ffmpeg".to_string(),
                status: 1,
                stderr: stderr.clone(),
            });
        }
        Self::touch(&request.output_path, "mock-ffmpeg")
    }
}
