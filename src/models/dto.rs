//! # Data Transfer Objects (DTOs)
//!
//! شکل بدنه درخواست‌ها و پاسخ‌های HTTP.
//! نام فیلدها با کلاینت موجود (داشبورد) هماهنگه، برای همین `shortUrl` camelCase هست.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Link, LinkDetail};

// =====================================
// Requests
// =====================================
/// درخواست ساخت لینک کوتاه
///
/// # Request Body
/// ```json
/// { "url": "https://example.com", "code": "abc123", "title": "Example" }
/// ```
///
/// فقط `url` اجباریه. `code` و `title` خالی مثل نبودنشون رفتار میکنن.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(
        required(message = "URL is required"),
        length(min = 1, message = "URL is required")
    )]
    pub url: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub title: Option<String>,
}

// =====================================
// Responses
// =====================================
/// پاسخ ساخت لینک
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    pub code: String,

    #[serde(rename = "shortUrl")]
    pub short_url: String,
}

/// لیست لینک‌ها (جدیدترین اول)
#[derive(Debug, Clone, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<Link>,
}

/// جزئیات یک لینک با رویدادهاش
#[derive(Debug, Clone, Serialize)]
pub struct LinkDetailResponse {
    pub link: LinkDetail,
}

/// پاسخ حذف
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl DeleteResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// پاسخ ثبت کلیک
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickResponse {
    pub clicks: i64,
}

// =====================================
// Health Check
// =====================================
/// پاسخ health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub database: bool,
}

impl HealthResponse {
    /// سرویس زنده‌ست؛ وضعیت دیتابیس جدا گزارش میشه
    #[must_use]
    pub fn alive(database_ok: bool) -> Self {
        Self {
            ok: true,
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database_ok,
        }
    }
}
