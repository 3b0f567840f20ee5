//! # Custom Extractors
//!
//! Extractor‌های سفارشی برای استخراج داده از request
//!
//! ## چطور کار میکنه؟
//! وقتی یه extractor به عنوان پارامتر handler تعریف میشه،
//! axum قبل از اجرای handler، extractor رو اجرا میکنه.

use std::net::SocketAddr;

use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, ConnectInfo, FromRequest, FromRequestParts},
    http::{header, request::Parts, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{error::AppError, models::short_url, services::AppState};

// =====================================
// Client IP Extractor
// =====================================
/// استخراج IP کلاینت
///
/// # ترتیب:
/// 1. اولین آدرس `X-Forwarded-For` (پشت proxy)
/// 2. `X-Real-IP`
/// 3. آدرس سوکت (اگه سرور با `ConnectInfo` اجرا شده باشه)
#[derive(Debug, Clone)]
pub struct ClientIp(pub Option<String>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let ip = parts
            .headers
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                parts
                    .headers
                    .get("X-Real-IP")
                    .and_then(|v| v.to_str().ok())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            });

        Ok(ClientIp(ip))
    }
}

// =====================================
// Public Base URL Extractor
// =====================================
/// آدرس پایه برای ساخت لینک کوتاه
///
/// اگه `BASE_URL` تنظیم شده باشه همون استفاده میشه. وگرنه از
/// `X-Forwarded-Proto` (پیش‌فرض http) و header `Host` ساخته میشه.
#[derive(Debug, Clone)]
pub struct PublicBase(pub String);

impl PublicBase {
    /// لینک کوتاه کامل برای یک کد
    #[must_use]
    pub fn short_url(&self, code: &str) -> String {
        short_url(&self.0, code)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for PublicBase {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(base) = &state.config().base_url {
            return Ok(PublicBase(base.clone()));
        }

        let scheme = parts
            .headers
            .get("X-Forwarded-Proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http");

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
            .unwrap_or_else(|| state.config().server_addr());

        Ok(PublicBase(format!("{}://{}", scheme, host)))
    }
}

// =====================================
// JSON with Validation
// =====================================
/// استخراج JSON با اعتبارسنجی خودکار
///
/// - JSON خراب: `BadRequest`
/// - قوانین `Validate` رعایت نشده: `Validation`
///
/// # استفاده:
/// ```rust,ignore
/// async fn handler(ValidatedJson(data): ValidatedJson<CreateLinkRequest>) -> ... {
///     // data حتما valid هست
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data): Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::BadRequest(format!("Invalid JSON: {}", e)))?;

        data.validate()?;

        Ok(ValidatedJson(data))
    }
}
