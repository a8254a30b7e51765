use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::error;

use super::{AppState, HealthResponse};

/// GET /health
/// 200 while the user store answers, 503 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match state.store.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            error!("Failed to ping database: {e:#}");
            "error"
        }
    };

    let healthy = database == "ok";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: if healthy { "ok" } else { "unavailable" },
        database,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    };

    (status, Json(body))
}
