use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

use crate::api::api_routes;

use super::AppState;

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.settings.server.body_limit_bytes;

    Router::new()
        .merge(api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
