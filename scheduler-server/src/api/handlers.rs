//! Request handlers for the scheduling HTTP surface.

use axum::{extract::State, http::StatusCode, response::Json};
use scheduler_core::{schedule, ScheduleError, ScheduleRequest, ScheduleResponse};
use serde::Serialize;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: std::sync::Arc<Config>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn root_handler() -> String {
    format!("scheduler-server {}", env!("CARGO_PKG_VERSION"))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /api/schedule`. The solve itself is CPU-bound, so it runs on the
/// async runtime's blocking thread pool rather than inline in this handler.
#[axum::debug_handler]
pub async fn schedule_handler(
    State(state): State<AppState>,
    Json(mut request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.time_limit_seconds.is_none() {
        request.time_limit_seconds = Some(state.config.default_time_limit_seconds);
    }

    let result = tokio::task::spawn_blocking(move || schedule(request))
        .await
        .map_err(|join_err| internal_error(join_err.to_string()))?;

    match result {
        Ok(response) => Ok(Json(response)),
        Err(ScheduleError::InvalidInput(message)) | Err(ScheduleError::InvalidProblem(message)) => {
            Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })))
        }
    }
}

fn internal_error(message: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: message }))
}
