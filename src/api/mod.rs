//! # لایه API
//!
//! این ماژول HTTP handlers و routing رو مدیریت میکنه.
//!
//! ## ساختار URL‌ها:
//! - `GET /api/healthz` - Health check
//! - `GET /api/links` - لیست لینک‌ها
//! - `POST /api/links` - ساخت لینک کوتاه
//! - `GET /api/link/:code` - جزئیات لینک با رویدادها
//! - `DELETE /api/link/:code` - حذف لینک
//! - `POST /api/link/:code/click` - ثبت کلیک
//! - `GET /:code` - ثبت کلیک و redirect

mod handlers;
mod middleware;
mod extractors;

pub use handlers::*;
pub use middleware::*;
pub use extractors::*;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use std::time::Duration;

use crate::{
    config::Config,
    database::Database,
    services::AppState,
};

// =====================================
// Router Builder
// =====================================
/// ساخت Router اصلی برنامه
///
/// # Arguments
/// * `db` - هندل دیتابیس
/// * `config` - تنظیمات برنامه
pub fn create_router(db: Database, config: Config) -> Router {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let state = AppState::new(db, config);

    Router::new()
        // Route اصلی redirect
        .route("/:code", get(handlers::link::redirect))

        // API routes
        .nest("/api", api_routes())

        // Middleware‌های عمومی (اولین layer بیرونی‌ترینه)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::request_timing))
                .layer(TimeoutLayer::new(timeout))
                .layer(CompressionLayer::new())
                // داشبورد از دامنه دیگه‌ای سرو میشه
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

/// Route‌های API
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(handlers::health::health_check))
        .route(
            "/links",
            get(handlers::link::list_links).post(handlers::link::create_link),
        )
        .route(
            "/link/:code",
            get(handlers::link::get_link).delete(handlers::link::delete_link),
        )
        .route("/link/:code/click", post(handlers::link::click_link))
}
