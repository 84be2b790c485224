//! Path-to-operation dispatch
//!
//! Matching is deliberately loose: trailing slashes are ignored and the
//! parametrized routes take the last path segment no matter how many
//! segments precede it, so `/api/volume/extra/50` sets the volume to 50.

use crate::response::ApiError;
use std::borrow::Cow;
use std::num::IntErrorKind;

/// Operation selected by a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/api/volume`: read volume and mute
    Status,
    /// `/api/mute`: read mute
    Mute,
    /// `/api/volume/<value>`: set volume (clamped later)
    SetVolume(i64),
    /// `/api/mute/<value>`: set mute
    SetMute(bool),
}

impl Route {
    /// Select the operation for `path` (without query string)
    pub fn parse(path: &str) -> Result<Self, ApiError> {
        let path = path.trim_end_matches('/');

        if path == "/api/volume" {
            Ok(Route::Status)
        } else if path == "/api/mute" {
            Ok(Route::Mute)
        } else if path.starts_with("/api/volume/") {
            parse_volume(last_segment(path)).map(Route::SetVolume)
        } else if path.starts_with("/api/mute/") {
            Ok(Route::SetMute(parse_mute_flag(last_segment(path))))
        } else {
            Err(ApiError::NotFound)
        }
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Signed decimal integer; values beyond `i64` saturate since they clamp anyway
fn parse_volume(value: &str) -> Result<i64, ApiError> {
    match without_digit_separators(value).parse::<i64>() {
        Ok(v) => Ok(v),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(ApiError::InvalidVolume {
                value: value.to_string(),
                reason: e.to_string(),
            }),
        },
    }
}

/// Drop single `_` separators between digits (`1_000`); misplaced ones are kept
/// so the number fails to parse
fn without_digit_separators(value: &str) -> Cow<'_, str> {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    if !digits.contains('_')
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace('_', ""))
}

/// Only the exact tokens `1`, `true` and `yes` mute; anything else unmutes
fn parse_mute_flag(value: &str) -> bool {
    matches!(value, "1" | "true" | "yes")
}
