//! Push send endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::error::{AppError, Result};
use crate::metrics::RequestMetrics;
use crate::notification::{DispatchResult, NotificationRequest, PushRequest};
use crate::server::AppState;

/// POST /push/send
///
/// 200 with the dispatch result on success, 400 for malformed or invalid
/// requests, 500 when the provider fails the send.
#[tracing::instrument(name = "http.send_push", skip(state, payload))]
pub async fn send_push(
    State(state): State<AppState>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<DispatchResult>)> {
    let request = parse_and_validate(payload).inspect_err(|_| RequestMetrics::record_rejected())?;

    let result = state.dispatcher.dispatch(&request).await;

    let status = if result.succeeded() {
        tracing::info!(target_type = %request.target_type(), "Push send succeeded");
        StatusCode::OK
    } else {
        tracing::error!(
            target_type = %request.target_type(),
            error = result.error().unwrap_or_default(),
            "Push send failed"
        );
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(result)))
}

fn parse_and_validate(
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<NotificationRequest> {
    let Json(raw) = payload.map_err(|_| AppError::MissingBody)?;
    if raw.is_null() {
        return Err(AppError::MissingBody);
    }

    let request = PushRequest::parse(raw)?.into_validated()?;
    Ok(request)
}
