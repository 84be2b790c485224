//! HTTP bridge between a home-automation "dimmable light" and a pactl sink
//!
//! Endpoints (GET or POST):
//!
//! | Path | Response |
//! |---|---|
//! | `/api/volume` | `{"volume": 54, "mute": false}` |
//! | `/api/mute` | `{"mute": false}` |
//! | `/api/volume/<n>` | sets volume (clamped to 0-100), `{"volume": 54}` |
//! | `/api/mute/<1\|true\|yes\|other>` | sets mute, `{"mute": true}` |
//!
//! Unknown paths answer 404 `{"error": "not found"}`, failures answer 500
//! `{"error": "<message>"}`. A light's on/off maps to unmute/mute and its
//! brightness to the volume percentage.

pub mod handler;
pub mod response;
pub mod route;

pub use response::{ApiError, ErrorResponse, MixerResponse};
pub use route::Route;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use volbridge_config::BridgeConfig;
use volbridge_mixer::{Mixer, PactlRunner};

/// Build the router; every path goes through [`handler::handle_request`]
pub fn create_app(mixer: Mixer) -> Router {
    Router::new()
        .fallback(handler::handle_request)
        .layer(TraceLayer::new_for_http())
        .with_state(mixer)
}

/// Mixer driving the configured pactl binary and sink
pub fn mixer_from_config(config: &BridgeConfig) -> Mixer {
    Mixer::new(
        Arc::new(PactlRunner::new(&config.binary)),
        config.sink.clone(),
        config.command_timeout(),
    )
}
