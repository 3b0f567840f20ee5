//! # مدل لینک و رویداد کلیک
//!
//! Entity‌هایی که مستقیم از جدول‌های `links` و `events` خونده میشن.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// =====================================
// Link Entity
// =====================================
/// نگاشت ذخیره‌شده از کد کوتاه به URL مقصد
///
/// # مفاهیم:
/// - `#[derive(FromRow)]`: تبدیل خودکار از ردیف دیتابیس
/// - `clicks` فقط با ثبت کلیک زیاد میشه و همیشه برابر تعداد رویدادهای لینکه
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Link {
    /// شناسه عددی، بعد از حذف دوباره استفاده نمیشه
    pub id: i64,

    /// کد کوتاه یکتا
    pub code: String,

    /// آدرس مقصد (بدون نرمال‌سازی)
    pub url: String,

    /// عنوان نمایشی (اختیاری)
    pub title: Option<String>,

    /// تعداد کلیک
    pub clicks: i64,

    /// تاریخ ایجاد
    pub created_at: DateTime<Utc>,
}

/// ساخت آدرس کوتاه از آدرس پایه و کد
#[must_use]
pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

// =====================================
// ClickEvent Entity
// =====================================
/// یک بار resolve شدن کد
///
/// بعد از ساخت تغییر نمیکنه و فقط همراه لینکش حذف میشه.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ClickEvent {
    pub id: i64,
    pub link_id: i64,

    /// آدرس کلاینت در لحظه کلیک (best-effort)
    pub ip: Option<String>,

    pub ts: DateTime<Utc>,
}

// =====================================
// Store Inputs & Outputs
// =====================================
/// داده برای ساخت لینک جدید (داخلی)
///
/// کد اینجا همیشه مشخصه؛ اگه کاربر نداده باشه سرویس تولیدش میکنه.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub url: String,
    pub code: String,
    pub title: Option<String>,
}

/// نتیجه ثبت یک کلیک
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ClickReceipt {
    pub link_id: i64,

    /// مقصد لینک، برای redirect
    pub url: String,

    /// تعداد کلیک بعد از افزایش
    pub clicks: i64,
}

/// لینک به همراه تاریخچه کلیک‌هاش
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkDetail {
    #[serde(flatten)]
    pub link: Link,

    /// جدیدترین رویداد اول
    pub events: Vec<ClickEvent>,
}
