//! # Link Shortener Library
//!
//! کوتاه‌کننده لینک با شمارش کلیک و لاگ رویداد برای هر کد.
//!
//! ## ساختار پروژه
//!
//! ```text
//! src/
//! ├── lib.rs          # نقطه ورود کتابخانه - اینجا!
//! ├── main.rs         # نقطه ورود باینری
//! ├── config/         # مدیریت تنظیمات
//! ├── error/          # تعریف خطاها
//! ├── database/       # هندل دیتابیس و Link Store
//! ├── models/         # Link، ClickEvent و DTO‌ها
//! ├── services/       # LinkService و AppState
//! ├── api/            # لایه HTTP (axum)
//! └── utils/          # تولید کد کوتاه
//! ```
//!
//! ## مثال استفاده
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use link_shortener::{database::{Database, LinkRepository}, services::LinkService};
//!
//! #[tokio::main]
//! async fn main() -> link_shortener::Result<()> {
//!     let db = Database::in_memory().await?;
//!     let service = LinkService::new(Arc::new(LinkRepository::new(db)), 1);
//!
//!     let link = service
//!         .shorten(Some("https://example.com".into()), Some("abc123".into()), None)
//!         .await?;
//!     assert_eq!(service.click(&link.code, None).await?, 1);
//!     Ok(())
//! }
//! ```

/// ماژول مدیریت تنظیمات برنامه
pub mod config;

/// ماژول تعریف و مدیریت خطاها
pub mod error;

/// ماژول ارتباط با دیتابیس
pub mod database;

/// ماژول مدل‌های داده
pub mod models;

/// ماژول سرویس‌ها (Business Logic)
pub mod services;

/// ماژول API و HTTP Handlers
pub mod api;

/// ماژول توابع کمکی
pub mod utils;

// =====================================
// Re-exports
// =====================================
/// نتیجه عملیات با خطای سفارشی ما
pub use error::Result;

/// خطای اصلی برنامه
pub use error::AppError;

/// ماژول prelude برای import راحت‌تر آیتم‌های پرکاربرد
///
/// ```rust
/// use link_shortener::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::database::{Database, LinkRepository, LinkStore};
    pub use crate::error::{AppError, Result};
    pub use crate::models::*;
    pub use crate::services::*;
}
