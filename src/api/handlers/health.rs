//! # Health Check Handler

use axum::{extract::State, Json};
use tracing::warn;

use crate::{models::HealthResponse, services::AppState};

/// بررسی سلامت سرویس
///
/// سرویس تا وقتی جواب میده زنده‌ست؛ وضعیت دیتابیس در فیلد `database` میاد.
///
/// # Endpoint
/// `GET /api/healthz`
///
/// # Response
/// ```json
/// { "ok": true, "version": "0.1.0", "database": true }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_ok = match state.database.health_check().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            false
        }
    };

    Json(HealthResponse::alive(db_ok))
}
