//! JSON bodies and error-to-status mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use volbridge_mixer::{MixerError, VolumeLevel};

/// Success body; fields that do not apply to the route are omitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MixerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mute: Option<bool>,
}

impl MixerResponse {
    /// `{"volume": .., "mute": ..}`
    pub fn status(volume: VolumeLevel, mute: bool) -> Self {
        Self {
            volume: Some(volume),
            mute: Some(mute),
        }
    }

    /// `{"volume": ..}`
    pub fn volume(volume: VolumeLevel) -> Self {
        Self {
            volume: Some(volume),
            mute: None,
        }
    }

    /// `{"mute": ..}`
    pub fn mute(mute: bool) -> Self {
        Self {
            volume: None,
            mute: Some(mute),
        }
    }
}

/// Error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("invalid volume {value:?}: {reason}")]
    InvalidVolume { value: String, reason: String },

    #[error(transparent)]
    Mixer(#[from] MixerError),
}

impl ApiError {
    /// Bad parameters and mixer failures both surface as 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidVolume { .. } | ApiError::Mixer(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
