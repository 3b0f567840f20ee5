//! # Link Handlers
//!
//! Handler‌های لینک‌ها، کلیک و redirect

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    api::extractors::{ClientIp, PublicBase, ValidatedJson},
    error::{AppError, Result},
    models::{
        ClickResponse, CreateLinkRequest, CreateLinkResponse, DeleteResponse,
        LinkDetailResponse, LinkListResponse,
    },
    services::AppState,
};

// =====================================
// List
// =====================================
/// همه لینک‌ها بدون رویدادها
///
/// # Endpoint
/// `GET /api/links`
pub async fn list_links(State(state): State<AppState>) -> Result<Json<LinkListResponse>> {
    let links = state.link_service.list().await?;

    Ok(Json(LinkListResponse { links }))
}

// =====================================
// Detail
// =====================================
/// لینک به همراه رویدادهای کلیکش
///
/// # Endpoint
/// `GET /api/link/:code`
pub async fn get_link(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkDetailResponse>> {
    let link = state.link_service.get_detail(&code).await?;

    Ok(Json(LinkDetailResponse { link }))
}

// =====================================
// Create
// =====================================
/// ساخت لینک کوتاه
///
/// # Endpoint
/// `POST /api/links`
///
/// # Request Body
/// ```json
/// { "url": "https://example.com", "code": "abc123", "title": "Example" }
/// ```
///
/// # Response (201)
/// ```json
/// { "code": "abc123", "shortUrl": "http://localhost:5000/abc123" }
/// ```
pub async fn create_link(
    State(state): State<AppState>,
    base: PublicBase,
    ValidatedJson(request): ValidatedJson<CreateLinkRequest>,
) -> Result<impl IntoResponse> {
    let link = state
        .link_service
        .shorten(request.url, request.code, request.title)
        .await?;

    let response = CreateLinkResponse {
        short_url: base.short_url(&link.code),
        code: link.code,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

// =====================================
// Delete
// =====================================
/// حذف لینک و همه رویدادهاش
///
/// # Endpoint
/// `DELETE /api/link/:code`
pub async fn delete_link(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.link_service.remove(&code).await?;

    Ok(Json(DeleteResponse::ok()))
}

// =====================================
// Click
// =====================================
/// ثبت یک کلیک
///
/// # Endpoint
/// `POST /api/link/:code/click`
///
/// # Response
/// ```json
/// { "clicks": 3 }
/// ```
pub async fn click_link(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ClientIp(ip): ClientIp,
) -> Result<Json<ClickResponse>> {
    let clicks = state.link_service.click(&code, ip).await?;

    Ok(Json(ClickResponse { clicks }))
}

// =====================================
// Redirect
// =====================================
/// ثبت کلیک و redirect به مقصد
///
/// # Endpoint
/// `GET /:code`
///
/// # Response
/// - 307 به URL مقصد
/// - 404 اگه پیدا نشه
///
/// URL‌ها opaque هستن، پس ممکنه header معتبری نسازن؛ اون حالت 500 میده نه panic.
pub async fn redirect(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ClientIp(ip): ClientIp,
) -> Result<impl IntoResponse> {
    let target = state.link_service.resolve(&code, ip).await?;

    let location = HeaderValue::from_str(&target).map_err(|_| {
        AppError::Internal(format!("Target of '{}' is not a valid Location header", code))
    })?;

    info!(code = %code, "Redirecting");

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]))
}
