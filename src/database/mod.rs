//! # ماژول دیتابیس (Database Layer)
//!
//! `Database` هندل صریح دیتابیسه: یک بار در `main` ساخته میشه، به store تزریق میشه
//! و موقع خاموش شدن سرور بسته میشه.
//!
//! ## الگوهای طراحی:
//! - Repository Pattern: جداسازی لایه داده از منطق (`repository.rs`)
//! - Connection Pool: مدیریت اتصالات دیتابیس

mod repository;

pub use repository::*;

use std::{str::FromStr, sync::Arc, time::Duration};

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
};
use tracing::info;

use crate::error::Result;

// مسیر migration‌ها
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// زمان انتظار برای قفل نوشتن SQLite
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// =====================================
// Database Connection
// =====================================
/// اتصال به دیتابیس با Connection Pool
///
/// # مفاهیم:
/// - `Arc<SqlitePool>`: هر clone فقط counter رو زیاد میکنه، pool کپی نمیشه
#[derive(Debug, Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// اتصال به دیتابیس
    ///
    /// # Arguments
    /// * `database_url` - آدرس دیتابیس (مثلا `sqlite://data/links.db?mode=rwc`)
    /// * `max_connections` - اندازه pool
    ///
    /// # Errors
    /// خطا برمیگردونه اگه پوشه دیتابیس ساخته نشه یا اتصال موفق نباشه
    pub async fn connect(database_url: impl AsRef<str>, max_connections: u32) -> Result<Self> {
        let url = database_url.as_ref();

        // ساخت پوشه والد فایل دیتابیس اگه وجود نداره
        if let Some(path) = url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        // WAL اجازه میده خوندن‌ها همزمان با نوشتن انجام بشن
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect_with(options)
            .await?;

        info!(max_connections, "Database pool opened");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// ساخت دیتابیس in-memory با schema کامل
    ///
    /// فقط یک اتصال داره، چون هر اتصال `:memory:` دیتابیس جدای خودش رو میسازه.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self {
            pool: Arc::new(pool),
        };

        db.migrate().await?;
        Ok(db)
    }

    /// اجرای migration‌ها
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&*self.pool).await?;
        Ok(())
    }

    /// دسترسی به pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// بررسی سلامت دیتابیس
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&*self.pool).await?;
        Ok(())
    }

    /// بستن همه اتصال‌ها
    ///
    /// بعد از این، هر عملیاتی روی pool خطای `PoolClosed` میده.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }

    /// شروع یک تراکنش
    ///
    /// # مفاهیم:
    /// - RAII: اگه Transaction بدون commit drop بشه، rollback میشه
    pub async fn begin(&self) -> Result<sqlx::Transaction<'_, sqlx::Sqlite>> {
        Ok(self.pool.begin().await?)
    }
}
