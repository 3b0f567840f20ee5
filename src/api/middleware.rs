//! # Middleware
//!
//! Middleware‌های سفارشی برای پردازش request/response

use axum::{
    body::Body,
    http::{header::HeaderValue, Request},
    middleware::Next,
    response::IntoResponse,
};
use std::time::Instant;
use tracing::{info, warn};

/// نام header شناسه درخواست
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// =====================================
// Request Timing Middleware
// =====================================
/// اندازه‌گیری و لاگ زمان پردازش request
///
/// پاسخ‌های 5xx با سطح warn لاگ میشن.
pub async fn request_timing(request: Request<Body>, next: Next) -> impl IntoResponse {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        warn!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

// =====================================
// Request ID Middleware
// =====================================
/// اضافه کردن Request ID به هر request و response
///
/// اگه کلاینت ID معتبر فرستاده باشه همون برمیگرده، وگرنه یکی با nanoid ساخته میشه.
pub async fn request_id(mut request: Request<Body>, next: Next) -> impl IntoResponse {
    let value = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .cloned()
        .unwrap_or_else(generate_request_id);

    request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());

    let mut response = next.run(request).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, value);

    response
}

/// تولید request ID جدید
///
/// الفبای nanoid فقط کاراکترهای URL-safe داره، پس همیشه header معتبره.
fn generate_request_id() -> HeaderValue {
    HeaderValue::from_str(&nanoid::nanoid!(12))
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}
