//! # ماژول سرویس‌ها (Business Logic Layer)
//!
//! ## لایه‌بندی معماری
//!
//! ```text
//! ┌─────────────────┐
//! │    API Layer    │  <-- HTTP handlers (axum)
//! ├─────────────────┤
//! │  Service Layer  │  <-- LinkService (اینجا!)
//! ├─────────────────┤
//! │   Link Store    │  <-- LinkStore / LinkRepository
//! ├─────────────────┤
//! │    Database     │  <-- SQLite
//! └─────────────────┘
//! ```

mod link_service;

pub use link_service::*;

use std::sync::Arc;
use crate::{
    config::Config,
    database::{Database, LinkRepository},
};

// =====================================
// Application State
// =====================================
/// وضعیت برنامه که بین همه handlers اشتراک‌گذاری میشه
///
/// # مفاهیم:
/// - `Arc<T>`: clone کردن state فقط reference count رو زیاد میکنه
#[derive(Clone)]
pub struct AppState {
    /// تنظیمات برنامه
    pub config: Arc<Config>,

    /// هندل دیتابیس (برای health check)
    pub database: Database,

    /// سرویس لینک
    pub link_service: Arc<LinkService>,
}

impl AppState {
    /// ساخت AppState جدید
    ///
    /// همه وابستگی‌ها اینجا به هم وصل میشن.
    #[must_use]
    pub fn new(db: Database, config: Config) -> Self {
        let store = Arc::new(LinkRepository::new(db.clone()));
        let link_service = Arc::new(LinkService::new(store, config.code_generation_attempts));

        Self {
            config: Arc::new(config),
            database: db,
            link_service,
        }
    }

    /// دسترسی به config
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

// =====================================
// Service Trait
// =====================================
/// Marker trait برای services
///
/// همه services باید Send + Sync باشن برای thread-safety
pub trait Service: Send + Sync {}
