//! Axum route handlers (§6): `POST /v1/tick`, `GET /healthz`, `GET /metrics`.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use autoscale_core::types::InstanceSnapshot;

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// POST /v1/tick
pub async fn tick(
    State(state): State<ApiState>,
    Json(mut snapshot): Json<InstanceSnapshot>,
) -> impl IntoResponse {
    state.defaults.apply(&mut snapshot);
    match state.orchestrator.tick(snapshot, now_ms()).await {
        Ok(outcome) => ApiResponse::ok(outcome).into_response(),
        Err(err) => error_response(&err.to_string(), StatusCode::BAD_REQUEST).into_response(),
    }
}

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let body = autoscale_metrics::prometheus::render(&state.counters.snapshot());
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}
