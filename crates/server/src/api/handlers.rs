//! HTTP handlers for the feed server.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio_util::io::ReaderStream;
use tracing::error;

use airshift_core::feed::{generate_feed, media_mime};

use crate::state::AppState;

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Serves the podcast feed, generated fresh from the output directory.
pub async fn get_feed(State(state): State<Arc<AppState>>) -> Response {
    match generate_feed(
        state.out_dir(),
        state.base_url(),
        state.media_extension(),
        state.feed(),
    )
    .await
    {
        Ok(xml) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        Err(e) => {
            error!(error = %e, "failed to generate feed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Streams one recorded media artifact.
///
/// Only flat filenames with the configured media extension are served;
/// anything else (sidecars, traversal attempts) is a 404.
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    let expected_suffix = format!(".{}", state.media_extension());
    if filename.contains(['/', '\\'])
        || filename.starts_with('.')
        || !filename.ends_with(&expected_suffix)
    {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.out_dir().join(&filename);
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    let mut builder = Response::builder()
        .header(header::CONTENT_TYPE, media_mime(state.media_extension()));
    if let Ok(meta) = file.metadata().await {
        builder = builder.header(header::CONTENT_LENGTH, meta.len());
    }
    builder
        .body(Body::from_stream(ReaderStream::new(file)))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
