use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/feed.xml", get(handlers::get_feed))
        .route("/assets/{filename}", get(handlers::get_asset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
