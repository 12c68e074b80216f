//! Handler for the health check endpoint.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Returns service health.
///
/// # Endpoint
///
/// `GET /health`
///
/// Checks database connectivity with a trivial query; 200 when healthy,
/// 503 otherwise.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_ok = sqlx::query("SELECT 1")
        .execute(state.db.as_ref())
        .await
        .is_ok();

    let response = HealthResponse {
        status: if db_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
    };

    if db_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
