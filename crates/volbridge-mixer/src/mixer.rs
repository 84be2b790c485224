//! Sink volume and mute operations

use crate::command::{CommandRunner, command_line};
use crate::parse::{parse_mute, parse_volume};
use crate::{MixerError, VolumeLevel};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Volume and mute control for a single sink.
///
/// Cheap to clone; the sink name and deadline are fixed at construction.
#[derive(Clone)]
pub struct Mixer {
    runner: Arc<dyn CommandRunner>,
    sink: String,
    timeout: Duration,
}

impl Mixer {
    /// Create a mixer for `sink`, bounding every utility call by `timeout`
    pub fn new(runner: Arc<dyn CommandRunner>, sink: impl Into<String>, timeout: Duration) -> Self {
        Self {
            runner,
            sink: sink.into(),
            timeout,
        }
    }

    /// Sink this mixer controls
    pub fn sink(&self) -> &str {
        &self.sink
    }

    /// Deadline applied to each utility call
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Read the current sink volume
    pub async fn query_volume(&self) -> Result<VolumeLevel, MixerError> {
        let output = self.exec(&["get-sink-volume", self.sink.as_str()]).await?;
        parse_volume(&output)
    }

    /// Read the current mute state
    pub async fn query_mute(&self) -> Result<bool, MixerError> {
        let output = self.exec(&["get-sink-mute", self.sink.as_str()]).await?;
        Ok(parse_mute(&output))
    }

    /// Set the sink volume, clamping `requested` into 0-100 first.
    ///
    /// Returns the level actually applied.
    pub async fn apply_volume(&self, requested: i64) -> Result<VolumeLevel, MixerError> {
        let level = VolumeLevel::clamped(requested);
        let percent = level.to_string();
        self.exec(&["set-sink-volume", self.sink.as_str(), percent.as_str()]).await?;
        tracing::debug!("Volume of {} set to {}", self.sink, level);
        Ok(level)
    }

    /// Mute or unmute the sink
    pub async fn apply_mute(&self, muted: bool) -> Result<(), MixerError> {
        let flag = if muted { "1" } else { "0" };
        self.exec(&["set-sink-mute", self.sink.as_str(), flag]).await?;
        tracing::debug!("Mute of {} set to {}", self.sink, muted);
        Ok(())
    }

    async fn exec(&self, args: &[&str]) -> Result<String, MixerError> {
        tracing::debug!("Running {}", command_line(self.runner.program(), args));

        match tokio::time::timeout(self.timeout, self.runner.run(args)).await {
            Ok(result) => result,
            Err(_) => Err(MixerError::Timeout {
                command: command_line(self.runner.program(), args),
                timeout: self.timeout,
            }),
        }
    }
}

impl fmt::Debug for Mixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mixer")
            .field("program", &self.runner.program())
            .field("sink", &self.sink)
            .field("timeout", &self.timeout)
            .finish()
    }
}
