//! # سرویس لینک
//!
//! تولید کد، ترجمه خطاهای store و ساخت نمای جزئیات.
//! هیچ اعتبارسنجی دیگه‌ای روی URL یا شکل کد انجام نمیشه.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    database::LinkStore,
    error::{AppError, OptionExt, Result},
    models::{Link, LinkDetail, NewLink},
    utils,
};

use super::Service;

// =====================================
// Link Service
// =====================================
/// سرویس مدیریت لینک‌ها
///
/// # مسئولیت‌ها:
/// - تولید کد وقتی کاربر کد نداده
/// - ترکیب لینک و رویدادهاش
/// - حذف و ثبت کلیک (مستقیم به store)
#[derive(Clone)]
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    code_attempts: u32,
}

impl Service for LinkService {}

impl std::fmt::Debug for LinkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkService")
            .field("code_attempts", &self.code_attempts)
            .finish_non_exhaustive()
    }
}

impl LinkService {
    /// ساخت سرویس جدید
    ///
    /// # Arguments
    /// * `store` - لایه ذخیره‌سازی
    /// * `code_attempts` - تعداد تلاش برای کدهای تولیدی در صورت تصادم (حداقل 1)
    #[must_use]
    pub fn new(store: Arc<dyn LinkStore>, code_attempts: u32) -> Self {
        Self {
            store,
            code_attempts: code_attempts.max(1),
        }
    }

    /// ساخت لینک کوتاه
    ///
    /// کد خالی مثل نبودن کد رفتار میکنه و یه کد تصادفی ۶ کاراکتری ساخته میشه.
    /// تصادم کد کاربر همیشه `Conflict` میده. تصادم کد تولیدی تا `code_attempts`
    /// بار با کد جدید تکرار میشه و بعد `Conflict` میده.
    ///
    /// # Errors
    /// - `Validation`: URL خالی یا نبودنش
    /// - `Conflict`: کد تکراری
    #[instrument(skip(self, url, title))]
    pub async fn shorten(
        &self,
        url: Option<String>,
        code: Option<String>,
        title: Option<String>,
    ) -> Result<Link> {
        let url = utils::non_empty(url)
            .ok_or_else(|| AppError::Validation("URL is required".to_string()))?;
        let title = utils::non_empty(title);

        if let Some(code) = utils::non_empty(code) {
            let link = self.store.create_link(NewLink { url, code, title }).await?;
            info!(code = %link.code, "Created link with custom code");
            return Ok(link);
        }

        let mut attempt = 1;
        loop {
            let code = utils::generate_code();
            let new_link = NewLink {
                url: url.clone(),
                code: code.clone(),
                title: title.clone(),
            };

            match self.store.create_link(new_link).await {
                Ok(link) => {
                    info!(code = %link.code, "Created link with generated code");
                    return Ok(link);
                }
                Err(e) if e.is_conflict() && attempt < self.code_attempts => {
                    warn!(code = %code, attempt, "Generated code collided, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// همه لینک‌ها، جدیدترین اول
    pub async fn list(&self) -> Result<Vec<Link>> {
        self.store.list_links().await
    }

    /// لینک به همراه رویدادهاش
    ///
    /// لینک بدون کلیک لیست رویداد خالی داره، نه خطا.
    #[instrument(skip(self))]
    pub async fn get_detail(&self, code: &str) -> Result<LinkDetail> {
        let link = self
            .store
            .get_link_by_code(code)
            .await?
            .ok_or_not_found(format!("Link with code '{}' not found", code))?;

        let events = self.store.get_events_for_link(link.id).await?;

        Ok(LinkDetail { link, events })
    }

    /// حذف لینک و رویدادهاش
    #[instrument(skip(self))]
    pub async fn remove(&self, code: &str) -> Result<()> {
        self.store.delete_link(code).await?;
        info!(code = %code, "Deleted link");
        Ok(())
    }

    /// ثبت کلیک و برگردوندن تعداد جدید
    #[instrument(skip(self))]
    pub async fn click(&self, code: &str, ip: Option<String>) -> Result<i64> {
        let receipt = self.store.record_click_and_increment(code, ip).await?;
        Ok(receipt.clicks)
    }

    /// ثبت کلیک و برگردوندن مقصد برای redirect
    #[instrument(skip(self))]
    pub async fn resolve(&self, code: &str, ip: Option<String>) -> Result<String> {
        let receipt = self.store.record_click_and_increment(code, ip).await?;
        Ok(receipt.url)
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        database::MockLinkStore,
        models::{ClickEvent, ClickReceipt},
    };
    use chrono::Utc;
    use mockall::predicate::eq;

    fn stored(new_link: &NewLink) -> Link {
        Link {
            id: 1,
            code: new_link.code.clone(),
            url: new_link.url.clone(),
            title: new_link.title.clone(),
            clicks: 0,
            created_at: Utc::now(),
        }
    }

    fn service(store: MockLinkStore, attempts: u32) -> LinkService {
        LinkService::new(Arc::new(store), attempts)
    }

    #[tokio::test]
    async fn test_shorten_with_custom_code() {
        let mut store = MockLinkStore::new();
        store
            .expect_create_link()
            .withf(|l| l.code == "abc123" && l.url == "https://example.com" && l.title.is_none())
            .times(1)
            .returning(|l| Ok(stored(&l)));

        let link = service(store, 1)
            .shorten(
                Some("https://example.com".to_string()),
                Some("abc123".to_string()),
                Some(String::new()),
            )
            .await
            .unwrap();

        assert_eq!(link.code, "abc123");
    }

    #[tokio::test]
    async fn test_shorten_generates_code_when_absent_or_empty() {
        let mut store = MockLinkStore::new();
        store
            .expect_create_link()
            .withf(|l| utils::is_generated_shape(&l.code))
            .times(2)
            .returning(|l| Ok(stored(&l)));
        let service = service(store, 1);

        let a = service
            .shorten(Some("https://example.com".to_string()), None, None)
            .await
            .unwrap();
        let b = service
            .shorten(Some("https://example.com".to_string()), Some(String::new()), None)
            .await
            .unwrap();

        assert!(utils::is_generated_shape(&a.code));
        assert!(utils::is_generated_shape(&b.code));
    }

    #[tokio::test]
    async fn test_shorten_requires_url() {
        let store = MockLinkStore::new();
        let service = service(store, 1);

        for url in [None, Some(String::new())] {
            let err = service.shorten(url, None, None).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_custom_code_conflict_is_never_retried() {
        let mut store = MockLinkStore::new();
        store
            .expect_create_link()
            .times(1)
            .returning(|l| Err(AppError::code_taken(&l.code)));

        let err = service(store, 5)
            .shorten(
                Some("https://example.com".to_string()),
                Some("taken".to_string()),
                None,
            )
            .await
            .unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_generated_collision_surfaces_without_retry_by_default() {
        let mut store = MockLinkStore::new();
        store
            .expect_create_link()
            .times(1)
            .returning(|l| Err(AppError::code_taken(&l.code)));

        let err = service(store, 1)
            .shorten(Some("https://example.com".to_string()), None, None)
            .await
            .unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_generated_collision_retries_up_to_limit() {
        let mut store = MockLinkStore::new();
        let mut calls = 0;
        store.expect_create_link().times(3).returning(move |l| {
            calls += 1;
            if calls < 3 {
                Err(AppError::code_taken(&l.code))
            } else {
                Ok(stored(&l))
            }
        });

        let link = service(store, 3)
            .shorten(Some("https://example.com".to_string()), None, None)
            .await
            .unwrap();

        assert!(utils::is_generated_shape(&link.code));
    }

    #[tokio::test]
    async fn test_storage_error_is_not_retried() {
        let mut store = MockLinkStore::new();
        store
            .expect_create_link()
            .times(1)
            .returning(|_| Err(AppError::Storage(sqlx::Error::PoolClosed)));

        let err = service(store, 3)
            .shorten(Some("https://example.com".to_string()), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_detail_of_missing_link_is_not_found() {
        let mut store = MockLinkStore::new();
        store
            .expect_get_link_by_code()
            .withf(|code| code == "nope")
            .returning(|_| Ok(None));
        store.expect_get_events_for_link().never();

        let err = service(store, 1).get_detail("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_detail_composes_link_and_events() {
        let mut store = MockLinkStore::new();
        store.expect_get_link_by_code().returning(|code| {
            Ok(Some(Link {
                id: 9,
                code: code.to_string(),
                url: "https://example.com".to_string(),
                title: None,
                clicks: 1,
                created_at: Utc::now(),
            }))
        });
        store
            .expect_get_events_for_link()
            .with(eq(9))
            .returning(|link_id| {
                Ok(vec![ClickEvent {
                    id: 1,
                    link_id,
                    ip: Some("10.0.0.1".to_string()),
                    ts: Utc::now(),
                }])
            });

        let detail = service(store, 1).get_detail("abc").await.unwrap();
        assert_eq!(detail.link.id, 9);
        assert_eq!(detail.events.len(), 1);
    }

    #[tokio::test]
    async fn test_click_and_resolve_read_the_receipt() {
        let mut store = MockLinkStore::new();
        store
            .expect_record_click_and_increment()
            .times(2)
            .returning(|_, _| {
                Ok(ClickReceipt {
                    link_id: 1,
                    url: "https://example.com".to_string(),
                    clicks: 4,
                })
            });
        let service = service(store, 1);

        assert_eq!(service.click("abc", None).await.unwrap(), 4);
        assert_eq!(
            service.resolve("abc", None).await.unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn test_remove_propagates_not_found() {
        let mut store = MockLinkStore::new();
        store
            .expect_delete_link()
            .returning(|code| Err(AppError::link_not_found(code)));

        let err = service(store, 1).remove("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
