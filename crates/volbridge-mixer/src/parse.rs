//! Parsers for `pactl` status output

use crate::{MixerError, VolumeLevel};
use regex::Regex;
use std::sync::LazyLock;

/// Matches the percentage field of a channel, e.g. `/  50%`
static PERCENT_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"/\s*(\d+)%").ok());

/// Parse `pactl get-sink-volume` output.
///
/// The output lists one `raw / percent / dB` triple per channel; the first
/// percentage wins. Over-amplified sinks report more than 100%, which is
/// clamped.
pub fn parse_volume(output: &str) -> Result<VolumeLevel, MixerError> {
    let digits = PERCENT_TOKEN
        .as_ref()
        .and_then(|re| re.captures(output))
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| MixerError::ParseVolume(output.to_string()))?;

    let percent: i64 = digits
        .as_str()
        .parse()
        .map_err(|_| MixerError::ParseVolume(output.to_string()))?;

    Ok(VolumeLevel::clamped(percent))
}

/// Parse `pactl get-sink-mute` output (`Mute: yes` / `Mute: no`)
pub fn parse_mute(output: &str) -> bool {
    output.to_lowercase().contains("yes")
}
