//! Request handling

use crate::response::{ApiError, MixerResponse};
use crate::route::Route;
use axum::Json;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tracing::{error, info};
use volbridge_mixer::Mixer;

/// Serve any request: dispatch on the path, run the operation, encode the result.
///
/// GET and POST are treated identically.
pub async fn handle_request(State(mixer): State<Mixer>, method: Method, uri: Uri) -> Response {
    let path = uri.path();

    let result = if method == Method::GET || method == Method::POST {
        dispatch(&mixer, path).await
    } else {
        Err(ApiError::MethodNotAllowed)
    };

    match result {
        Ok(body) => {
            info!("{} {} -> {}", method, path, StatusCode::OK);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e @ (ApiError::NotFound | ApiError::MethodNotAllowed)) => {
            info!("{} {} -> {}", method, path, e.status_code());
            e.into_response()
        }
        Err(e) => {
            error!("Error handling {}: {}", path, e);
            info!("{} {} -> {}", method, path, e.status_code());
            e.into_response()
        }
    }
}

/// Run the operation a path selects
pub async fn dispatch(mixer: &Mixer, path: &str) -> Result<MixerResponse, ApiError> {
    match Route::parse(path)? {
        Route::Status => {
            let volume = mixer.query_volume().await?;
            let mute = mixer.query_mute().await?;
            Ok(MixerResponse::status(volume, mute))
        }
        Route::Mute => Ok(MixerResponse::mute(mixer.query_mute().await?)),
        Route::SetVolume(requested) => {
            let applied = mixer.apply_volume(requested).await?;
            Ok(MixerResponse::volume(applied))
        }
        Route::SetMute(muted) => {
            mixer.apply_mute(muted).await?;
            Ok(MixerResponse::mute(muted))
        }
    }
}
