//! Sink volume and mute control
//!
//! Wraps the `pactl` command-line utility (PulseAudio / PipeWire-pulse) so the
//! rest of volbridge can read and change one sink's volume and mute state.
//! Every call goes out to the external process; nothing is cached, since the
//! sink may be changed at any time by other clients.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use volbridge_mixer::{Mixer, PactlRunner};
//!
//! # async fn run() -> Result<(), volbridge_mixer::MixerError> {
//! let mixer = Mixer::new(
//!     Arc::new(PactlRunner::new("pactl")),
//!     "@DEFAULT_SINK@",
//!     Duration::from_secs(5),
//! );
//!
//! let applied = mixer.apply_volume(150).await?;
//! assert_eq!(applied.get(), 100);
//! println!("muted: {}", mixer.query_mute().await?);
//! # Ok(())
//! # }
//! ```

mod command;
mod mixer;
pub mod mock;
mod parse;

pub use command::{CommandRunner, PactlRunner};
pub use mixer::Mixer;
pub use parse::{parse_mute, parse_volume};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Upper bound for a single `pactl` invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum MixerError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Command timed out after {}s: {command}", .timeout.as_secs_f32())]
    Timeout { command: String, timeout: Duration },

    #[error("Could not parse volume: {0:?}")]
    ParseVolume(String),
}

impl MixerError {
    /// The external utility could not be run to completion
    pub fn is_exec(&self) -> bool {
        matches!(
            self,
            MixerError::Spawn { .. } | MixerError::CommandFailed { .. } | MixerError::Timeout { .. }
        )
    }

    /// The utility ran but its output had an unexpected shape
    pub fn is_parse(&self) -> bool {
        matches!(self, MixerError::ParseVolume(_))
    }
}

/// Sink volume as a percentage of nominal output, always within 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeLevel(u8);

impl VolumeLevel {
    pub const MIN: VolumeLevel = VolumeLevel(0);
    pub const MAX: VolumeLevel = VolumeLevel(100);

    /// Saturate any integer into the valid range
    pub fn clamped(value: i64) -> Self {
        // Bounded by the clamp, the cast cannot truncate
        VolumeLevel(value.clamp(0, 100) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for VolumeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
