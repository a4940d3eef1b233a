use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::server::AppState;

use super::health::health;
use super::metrics::prometheus_metrics;
use super::push::send_push;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .route("/push/send", post(send_push))
        .fallback(not_found)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "API endpoint not found",
            "available_endpoints": ["/health", "/push/send"]
        })),
    )
}
