use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use super::auth::AuthUser;
use super::{ApiError, ApiResponse, AppState, HealthStatus};

/// GET /health
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<HealthStatus>>, ApiError> {
    state
        .store()
        .ping()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(ApiResponse::success(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })))
}

/// GET /metrics (admin)
pub async fn metrics(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    state
        .prometheus_handle
        .as_ref()
        .map(metrics_exporter_prometheus::PrometheusHandle::render)
        .ok_or_else(|| ApiError::NotFound("Metrics are not enabled".to_string()))
}
