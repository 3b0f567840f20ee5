//! # ماژول مدیریت خطاها (Error Handling)
//!
//! همه خطاهای برنامه در یک enum جمع شدن. هر نوع خطا باید از بقیه قابل تشخیص باشه
//! تا لایه HTTP بتونه status مناسب رو برگردونه.
//!
//! ## دسته‌بندی
//! - `Validation`: فیلد اجباری ورودی وجود نداره
//! - `Conflict`: کد کوتاه تکراریه
//! - `NotFound`: کد به هیچ لینکی نمیرسه
//! - `Storage` / `Migration`: خطای دیتابیس (برای همون request کشنده‌ست، retry نمیشه)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

// =====================================
// Result Type Alias
// =====================================
/// نوع Result سفارشی برنامه
///
/// به جای `Result<Link, AppError>` میتونیم بنویسیم `Result<Link>`
pub type Result<T, E = AppError> = std::result::Result<T, E>;

// =====================================
// Custom Error Enum
// =====================================
/// خطای اصلی برنامه
///
/// # مفاهیم:
/// - `#[derive(Error)]`: از thiserror برای پیاده‌سازی Error trait
/// - `#[from]`: تبدیل خودکار از خطای کتابخانه‌ها با `?`
#[derive(Debug, Error)]
pub enum AppError {
    // ----------------------------------------
    // خطاهای کاربر (4xx)
    // ----------------------------------------

    /// بدنه درخواست قابل parse نیست - 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// فیلد اجباری وجود نداره - 400
    #[error("Validation error: {0}")]
    Validation(String),

    /// پیدا نشد - 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// کد تکراری - 409
    #[error("Conflict: {0}")]
    Conflict(String),

    // ----------------------------------------
    // خطاهای سرور (5xx)
    // ----------------------------------------

    /// خطای داخلی سرور
    #[error("Internal server error: {0}")]
    Internal(String),

    /// خطای سرور HTTP
    #[error("Server error: {0}")]
    Server(String),

    /// خطای تنظیمات
    #[error("Configuration error: {0}")]
    Config(String),

    /// خطای لایه ذخیره‌سازی
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// خطای اجرای migration
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// خطای IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// گرفتن HTTP status code متناسب با خطا
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Internal(_)
            | Self::Server(_)
            | Self::Config(_)
            | Self::Storage(_)
            | Self::Migration(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// آیا این یه خطای سرور هست؟
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// آیا این خطا از تکراری بودن کد اومده؟
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// ساخت خطای Not Found برای لینک
    #[must_use]
    pub fn link_not_found(code: &str) -> Self {
        Self::NotFound(format!("Link with code '{}' not found", code))
    }

    /// ساخت خطای Conflict برای کد تکراری
    #[must_use]
    pub fn code_taken(code: &str) -> Self {
        Self::Conflict(format!("Code '{}' already exists", code))
    }
}

// =====================================
// Error Response DTO
// =====================================
/// ساختار پاسخ خطا در API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// کد خطا (مثلا "Not Found")
    pub error: String,

    /// پیام خطا
    pub message: String,

    /// کد وضعیت HTTP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorResponse {
    /// ساخت پاسخ خطای جدید
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// اضافه کردن کد وضعیت
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = Some(status.as_u16());
        self
    }
}

// =====================================
// IntoResponse Implementation
// =====================================
/// تبدیل AppError به Response HTTP
///
/// این باعث میشه handler‌ها بتونن مستقیم `Result<_, AppError>` برگردونن
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // جزئیات خطای دیتابیس فقط در لاگ میمونه
        let message = if self.is_server_error() {
            error!(error = %self, "Server error occurred");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let error_response =
            ErrorResponse::new(status.canonical_reason().unwrap_or("Error"), message)
                .with_status(status);

        (status, Json(error_response)).into_response()
    }
}

// =====================================
// From Implementations
// =====================================
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

// =====================================
// Option Extensions
// =====================================
/// Extension trait برای Option
pub trait OptionExt<T> {
    /// تبدیل None به AppError::NotFound
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| AppError::NotFound(message.into()))
    }
}
