use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::handlers::AppState;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Basic up/down check backed by a store ping.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and store are up", body = HealthInfo),
        (status = 503, description = "Store unreachable", body = HealthInfo),
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (status_code, status) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, HealthStatus::Up),
        Err(err) => {
            error!(error = %err, "database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Down)
        }
    };

    (
        status_code,
        Json(HealthInfo {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }),
    )
}

/// Creates the router for health endpoints
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
