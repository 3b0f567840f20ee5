//! # Link Store (Repository Pattern)
//!
//! ذخیره‌سازی لینک‌ها و رویدادهای کلیک.
//!
//! ## قراردادها
//! - یکتا بودن `code` رو UNIQUE دیتابیس تضمین میکنه، نه چک کردن قبل از insert
//! - حذف لینک و رویدادهاش در یک تراکنش انجام میشه
//! - افزایش `clicks` و ثبت رویداد در یک تراکنش انجام میشه؛ پس `clicks` همیشه
//!   برابر تعداد رویدادهای لینکه
//!
//! در تراکنش‌ها اولین دستور نوشتنه تا قفل نوشتن SQLite از همون اول گرفته بشه
//! و تراکنش‌های همزمان پشت `busy_timeout` صف بکشن.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::Database;
use crate::{
    error::{AppError, Result},
    models::{ClickEvent, ClickReceipt, Link, NewLink},
};

// =====================================
// Store Trait
// =====================================
/// عملیات لایه ذخیره‌سازی لینک‌ها
///
/// # مفاهیم:
/// - `#[async_trait]`: async در traits
/// - `Send + Sync`: سرویس این trait رو پشت `Arc<dyn LinkStore>` بین threads share میکنه
/// - در تست‌ها `MockLinkStore` با mockall ساخته میشه
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// ساخت لینک جدید با `clicks = 0`
    ///
    /// # Errors
    /// - `Validation`: اگه `url` خالی باشه
    /// - `Conflict`: اگه `code` قبلا استفاده شده باشه (بدون هیچ نوشتن ناقصی)
    async fn create_link(&self, new_link: NewLink) -> Result<Link>;

    /// پیدا کردن لینک با کد
    async fn get_link_by_code(&self, code: &str) -> Result<Option<Link>>;

    /// همه لینک‌ها، جدیدترین (بزرگترین id) اول
    async fn list_links(&self) -> Result<Vec<Link>>;

    /// رویدادهای یک لینک، جدیدترین اول
    async fn get_events_for_link(&self, link_id: i64) -> Result<Vec<ClickEvent>>;

    /// حذف لینک و همه رویدادهاش
    ///
    /// # Errors
    /// - `NotFound`: اگه کد به لینکی نرسه
    async fn delete_link(&self, code: &str) -> Result<()>;

    /// ثبت یک رویداد کلیک و افزایش شمارنده به صورت اتمیک
    ///
    /// # Errors
    /// - `NotFound`: اگه کد به لینکی نرسه (هیچ چیزی نوشته نمیشه)
    async fn record_click_and_increment(
        &self,
        code: &str,
        ip: Option<String>,
    ) -> Result<ClickReceipt>;
}

// =====================================
// SQLite Link Repository
// =====================================
/// پیاده‌سازی `LinkStore` روی SQLite
#[derive(Debug, Clone)]
pub struct LinkRepository {
    db: Database,
}

impl LinkRepository {
    /// ساخت repository جدید
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LinkStore for LinkRepository {
    async fn create_link(&self, new_link: NewLink) -> Result<Link> {
        if new_link.url.is_empty() {
            return Err(AppError::Validation("URL is required".to_string()));
        }

        let inserted = sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (code, url, title, clicks, created_at)
            VALUES (?, ?, ?, 0, ?)
            RETURNING id, code, url, title, clicks, created_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.url)
        .bind(&new_link.title)
        .bind(Utc::now())
        .fetch_one(self.db.pool())
        .await;

        match inserted {
            Ok(link) => {
                debug!(id = link.id, code = %link.code, "Inserted link");
                Ok(link)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::code_taken(&new_link.code))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_link_by_code(&self, code: &str) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, code, url, title, clicks, created_at
            FROM links
            WHERE code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(link)
    }

    async fn list_links(&self) -> Result<Vec<Link>> {
        let links = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, code, url, title, clicks, created_at
            FROM links
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(links)
    }

    async fn get_events_for_link(&self, link_id: i64) -> Result<Vec<ClickEvent>> {
        // id ترتیب کلیک‌های هم‌زمان رو مشخص میکنه
        let events = sqlx::query_as::<_, ClickEvent>(
            r#"
            SELECT id, link_id, ip, ts
            FROM events
            WHERE link_id = ?
            ORDER BY ts DESC, id DESC
            "#,
        )
        .bind(link_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(events)
    }

    async fn delete_link(&self, code: &str) -> Result<()> {
        let mut tx = self.db.begin().await?;

        let events = sqlx::query(
            "DELETE FROM events WHERE link_id IN (SELECT id FROM links WHERE code = ?)",
        )
        .bind(code)
        .execute(&mut *tx)
        .await?;

        let removed = sqlx::query("DELETE FROM links WHERE code = ?")
            .bind(code)
            .execute(&mut *tx)
            .await?;

        if removed.rows_affected() == 0 {
            // drop شدن tx یعنی rollback
            return Err(AppError::link_not_found(code));
        }

        tx.commit().await?;

        debug!(code, events = events.rows_affected(), "Deleted link and its events");
        Ok(())
    }

    async fn record_click_and_increment(
        &self,
        code: &str,
        ip: Option<String>,
    ) -> Result<ClickReceipt> {
        let mut tx = self.db.begin().await?;

        let receipt = sqlx::query_as::<_, ClickReceipt>(
            r#"
            UPDATE links
            SET clicks = clicks + 1
            WHERE code = ?
            RETURNING id AS link_id, url, clicks
            "#,
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(receipt) = receipt else {
            return Err(AppError::link_not_found(code));
        };

        sqlx::query("INSERT INTO events (link_id, ip, ts) VALUES (?, ?, ?)")
            .bind(receipt.link_id)
            .bind(&ip)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(code, clicks = receipt.clicks, "Recorded click");
        Ok(receipt)
    }
}
