//! Process invocation for the external mixer utility

use crate::MixerError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Runs one mixer utility invocation and returns its trimmed stdout.
///
/// Implementations do not enforce a deadline themselves; [`crate::Mixer`]
/// wraps every call in its own timeout and drops the future when it
/// elapses, so implementations must release their process on drop.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[&str]) -> Result<String, MixerError>;

    /// Program name used in log lines and error messages
    fn program(&self) -> &str;
}

/// Runs the real `pactl` binary
#[derive(Debug, Clone)]
pub struct PactlRunner {
    program: PathBuf,
    display: String,
}

impl PactlRunner {
    /// Create a runner for the given binary (a bare name is looked up on `PATH`)
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let display = program.to_string_lossy().into_owned();
        Self { program, display }
    }
}

impl Default for PactlRunner {
    fn default() -> Self {
        Self::new("pactl")
    }
}

#[async_trait]
impl CommandRunner for PactlRunner {
    async fn run(&self, args: &[&str]) -> Result<String, MixerError> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| MixerError::Spawn {
                program: self.display.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(MixerError::CommandFailed {
                command: command_line(&self.display, args),
                stderr: stderr.trim().to_string(),
            })
        }
    }

    fn program(&self) -> &str {
        &self.display
    }
}

/// Render an invocation the way it would be typed in a shell
pub(crate) fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
