//! Health Check

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

use crate::domain::repository::StoreHealth;
use crate::presentation::dto::HealthResponse;

/// Router serving `GET /api/health`
pub fn health_router<R>(repo: R) -> Router
where
    R: StoreHealth + Send + Sync + 'static,
{
    Router::new()
        .route("/api/health", get(health::<R>))
        .with_state(Arc::new(repo))
}

/// GET /api/health - liveness plus a database round trip
pub async fn health<R>(State(repo): State<Arc<R>>) -> (StatusCode, Json<HealthResponse>)
where
    R: StoreHealth + Send + Sync + 'static,
{
    match repo.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: "up",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "down",
                }),
            )
        }
    }
}
