//! In-memory `pactl` stand-in for testing without an audio server
//!
//! [`MockPactl`] answers the same four subcommands the mixer issues and keeps
//! a single emulated sink. Clones share state, so a test can hand one clone
//! to a [`crate::Mixer`] and inspect the sink and the recorded invocations
//! through another.
//!
//! ```
//! use std::sync::Arc;
//! use volbridge_mixer::mock::MockPactl;
//! use volbridge_mixer::{DEFAULT_TIMEOUT, Mixer};
//!
//! # tokio_test();
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn tokio_test() {
//! let mock = MockPactl::new().with_volume(30);
//! let mixer = Mixer::new(Arc::new(mock.clone()), "@DEFAULT_SINK@", DEFAULT_TIMEOUT);
//!
//! mixer.apply_volume(80).await.unwrap();
//! assert_eq!(mock.volume(), 80);
//! # }
//! ```

use crate::{CommandRunner, MixerError};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// How the mock answers an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
enum Behavior {
    /// Emulate pactl against the in-memory sink
    Normal,
    /// Exit non-zero with the given stderr
    Fail(String),
    /// Never finish (until the caller gives up)
    Hang,
}

/// Emulated sink state
#[derive(Debug, Clone)]
struct MockSinkState {
    /// Volume in percent; may exceed 100 like a real over-amplified sink
    volume: u32,
    muted: bool,
    /// Replaces the generated `get-sink-volume` output when set
    volume_output: Option<String>,
    /// Every invocation, in order
    calls: Vec<Vec<String>>,
}

impl Default for MockSinkState {
    fn default() -> Self {
        Self {
            volume: 100,
            muted: false,
            volume_output: None,
            calls: Vec::new(),
        }
    }
}

/// Fake `pactl` runner
#[derive(Debug, Clone)]
pub struct MockPactl {
    state: Arc<RwLock<MockSinkState>>,
    behavior: Behavior,
}

impl MockPactl {
    /// An unmuted sink at 100%
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSinkState::default())),
            behavior: Behavior::Normal,
        }
    }

    pub fn with_volume(self, volume: u32) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.volume = volume;
        }
        self
    }

    pub fn with_mute(self, muted: bool) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.muted = muted;
        }
        self
    }

    /// Answer `get-sink-volume` with this text verbatim
    pub fn with_volume_output(self, output: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.volume_output = Some(output.into());
        }
        self
    }

    /// Fail every invocation with a non-zero exit and this stderr
    pub fn failing(mut self, stderr: impl Into<String>) -> Self {
        self.behavior = Behavior::Fail(stderr.into());
        self
    }

    /// Never complete any invocation
    pub fn hanging(mut self) -> Self {
        self.behavior = Behavior::Hang;
        self
    }

    pub fn volume(&self) -> u32 {
        self.state.read().map(|s| s.volume).unwrap_or_default()
    }

    pub fn is_muted(&self) -> bool {
        self.state.read().map(|s| s.muted).unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state
            .read()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    pub fn last_call(&self) -> Option<Vec<String>> {
        self.calls().pop()
    }

    fn record(&self, args: &[&str]) {
        if let Ok(mut state) = self.state.write() {
            state.calls.push(args.iter().map(|a| a.to_string()).collect());
        }
    }

    fn emulate(&self, args: &[&str]) -> Result<String, MixerError> {
        let Ok(mut state) = self.state.write() else {
            return Err(self.failure(args, "Connection failure: mock state poisoned"));
        };

        match args {
            ["get-sink-volume", _] => Ok(state
                .volume_output
                .clone()
                .unwrap_or_else(|| volume_report(state.volume))),
            ["get-sink-mute", _] => Ok(format!("Mute: {}", if state.muted { "yes" } else { "no" })),
            ["set-sink-volume", _, percent] => {
                let volume = percent
                    .strip_suffix('%')
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| self.failure(args, "Failed to parse volume."))?;
                state.volume = volume;
                tracing::debug!("[MOCK] Volume set to {}%", volume);
                Ok(String::new())
            }
            ["set-sink-mute", _, flag] => {
                let muted = match *flag {
                    "1" | "true" | "yes" | "on" => true,
                    "0" | "false" | "no" | "off" => false,
                    "toggle" => !state.muted,
                    _ => return Err(self.failure(args, "Invalid mute specification")),
                };
                state.muted = muted;
                tracing::debug!("[MOCK] Sink muted: {}", state.muted);
                Ok(String::new())
            }
            _ => Err(self.failure(args, "Specify a valid command.")),
        }
    }

    fn failure(&self, args: &[&str], stderr: &str) -> MixerError {
        MixerError::CommandFailed {
            command: crate::command::command_line(self.program(), args),
            stderr: stderr.to_string(),
        }
    }
}

impl Default for MockPactl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for MockPactl {
    async fn run(&self, args: &[&str]) -> Result<String, MixerError> {
        self.record(args);

        match &self.behavior {
            Behavior::Normal => self.emulate(args),
            Behavior::Fail(stderr) => Err(self.failure(args, stderr)),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(self.failure(args, "hung invocation finished"))
            }
        }
    }

    fn program(&self) -> &str {
        "pactl"
    }
}

/// Render stereo `get-sink-volume` output the way pactl prints it
fn volume_report(volume: u32) -> String {
    let raw = u64::from(volume) * 65536 / 100;
    let db = if volume == 0 {
        "-inf".to_string()
    } else {
        format!("{:.2}", 60.0 * (f64::from(volume) / 100.0).log10())
    };
    let channel = format!("{raw} / {volume:>3}% / {db} dB");

    format!("Volume: front-left: {channel},   front-right: {channel}\n        balance 0.00")
}
