//! # تست‌های Integration
//!
//! سرویس و store روی SQLite واقعی.
//! تست‌های همزمانی روی یک فایل دیتابیس موقت اجرا میشن تا چند اتصال واقعی داشته باشیم.
//!
//! ```bash
//! cargo test --test integration_tests
//! ```

use std::sync::Arc;

use link_shortener::{
    database::{Database, LinkRepository},
    error::AppError,
    services::LinkService,
};

fn service_on(db: Database, attempts: u32) -> LinkService {
    LinkService::new(Arc::new(LinkRepository::new(db)), attempts)
}

async fn in_memory_service() -> LinkService {
    service_on(Database::in_memory().await.unwrap(), 1)
}

/// دیتابیس فایلی با چند اتصال؛ `TempDir` باید تا آخر تست زنده بمونه
async fn file_database(dir: &tempfile::TempDir) -> Database {
    let url = format!("sqlite://{}", dir.path().join("links.db").display());
    let db = Database::connect(&url, 8).await.unwrap();
    db.migrate().await.unwrap();
    db
}

async fn event_count(db: &Database, link_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE link_id = ?")
        .bind(link_id)
        .fetch_one(db.pool())
        .await
        .unwrap()
}

// =====================================
// سناریوهای کامل
// =====================================
mod scenario_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// ساخت → کلیک → جزئیات → حذف → NotFound
    #[tokio::test]
    async fn test_full_lifecycle() {
        let service = in_memory_service().await;

        let link = service
            .shorten(
                Some("https://example.com".to_string()),
                Some("abc123".to_string()),
                None,
            )
            .await
            .unwrap();
        assert_eq!(link.code, "abc123");
        assert_eq!(link.clicks, 0);

        let clicks = service
            .click("abc123", Some("203.0.113.7".to_string()))
            .await
            .unwrap();
        assert_eq!(clicks, 1);

        let detail = service.get_detail("abc123").await.unwrap();
        assert_eq!(detail.link.clicks, 1);
        assert_eq!(detail.events.len(), 1);
        assert_eq!(detail.events[0].ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(detail.events[0].link_id, detail.link.id);

        service.remove("abc123").await.unwrap();

        let err = service.get_detail("abc123").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_created_link_resolves_with_supplied_fields() {
        let service = in_memory_service().await;

        service
            .shorten(
                Some("https://rust-lang.org".to_string()),
                Some("rust".to_string()),
                Some("Rust".to_string()),
            )
            .await
            .unwrap();

        let detail = service.get_detail("rust").await.unwrap();
        assert_eq!(detail.link.url, "https://rust-lang.org");
        assert_eq!(detail.link.title.as_deref(), Some("Rust"));
        assert_eq!(detail.link.clicks, 0);
        assert!(detail.events.is_empty());
    }

    #[tokio::test]
    async fn test_generated_codes_have_expected_shape() {
        let service = in_memory_service().await;

        let a = service
            .shorten(Some("https://a.example".to_string()), None, None)
            .await
            .unwrap();
        let b = service
            .shorten(Some("https://b.example".to_string()), None, None)
            .await
            .unwrap();

        for code in [&a.code, &b.code] {
            assert_eq!(code.len(), 6);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
        // احتمالی: دو کد تصادفی ۶ کاراکتری تقریبا هیچوقت یکی نیستن
        assert_ne!(a.code, b.code);
    }

    #[tokio::test]
    async fn test_duplicate_code_leaves_original_untouched() {
        let service = in_memory_service().await;

        service
            .shorten(Some("https://first.example".to_string()), Some("dup".to_string()), None)
            .await
            .unwrap();
        let err = service
            .shorten(Some("https://second.example".to_string()), Some("dup".to_string()), None)
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        let links = service.list().await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://first.example");
    }

    #[tokio::test]
    async fn test_delete_removes_from_list_and_purges_events() {
        let db = Database::in_memory().await.unwrap();
        let service = service_on(db.clone(), 1);

        let link = service
            .shorten(Some("https://example.com".to_string()), Some("bye".to_string()), None)
            .await
            .unwrap();
        service.click("bye", None).await.unwrap();
        service.click("bye", None).await.unwrap();

        service.remove("bye").await.unwrap();

        assert!(service.list().await.unwrap().iter().all(|l| l.code != "bye"));
        assert_eq!(event_count(&db, link.id).await, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_twice_is_not_found_twice() {
        let service = in_memory_service().await;

        for _ in 0..2 {
            assert!(matches!(
                service.remove("missing").await,
                Err(AppError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_click_missing_is_not_found() {
        let service = in_memory_service().await;

        assert!(matches!(
            service.click("missing", None).await,
            Err(AppError::NotFound(_))
        ));
    }
}

// =====================================
// تست‌های همزمانی
// =====================================
mod concurrency_tests {
    use super::*;
    use std::collections::BTreeSet;

    const CLICKS: i64 = 50;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_clicks_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_database(&dir).await;
        let service = Arc::new(service_on(db.clone(), 1));

        service
            .shorten(Some("https://example.com".to_string()), Some("hot".to_string()), None)
            .await
            .unwrap();

        let handles: Vec<_> = (0..CLICKS)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.click("hot", Some(format!("10.0.0.{}", i))).await })
            })
            .collect();

        let mut seen = BTreeSet::new();
        for handle in handles {
            seen.insert(handle.await.unwrap().unwrap());
        }

        // هر کلیک یک مقدار یکتا از 1 تا N دیده
        assert_eq!(seen, (1..=CLICKS).collect::<BTreeSet<_>>());

        let detail = service.get_detail("hot").await.unwrap();
        assert_eq!(detail.link.clicks, CLICKS);
        assert_eq!(detail.events.len() as i64, CLICKS);
        assert_eq!(event_count(&db, detail.link.id).await, CLICKS);

        db.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_with_same_code_have_one_winner() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_database(&dir).await;
        let service = Arc::new(service_on(db.clone(), 1));

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .shorten(
                            Some(format!("https://example.com/{}", i)),
                            Some("race".to_string()),
                            None,
                        )
                        .await
                })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert!(e.is_conflict(), "unexpected error: {e}"),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(service.list().await.unwrap().len(), 1);

        db.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_delete_racing_clicks_leaves_no_torn_state() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_database(&dir).await;
        let service = Arc::new(service_on(db.clone(), 1));

        let link = service
            .shorten(Some("https://example.com".to_string()), Some("gone".to_string()), None)
            .await
            .unwrap();

        let clicks: Vec<_> = (0..20)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.click("gone", None).await })
            })
            .collect();
        let delete = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.remove("gone").await })
        };

        for handle in clicks {
            match handle.await.unwrap() {
                Ok(_) | Err(AppError::NotFound(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        delete.await.unwrap().unwrap();

        assert!(matches!(
            service.get_detail("gone").await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(event_count(&db, link.id).await, 0);

        db.close().await;
    }
}

// =====================================
// Property-Based Tests
// =====================================
mod property_tests {
    use link_shortener::utils::{generate_code_with, is_generated_shape, non_empty};
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    proptest! {
        /// هر کد تولیدی با هر seed شکل درستی داره
        #[test]
        fn generated_codes_have_shape(seed: u64) {
            let code = generate_code_with(&mut StdRng::seed_from_u64(seed));
            prop_assert!(is_generated_shape(&code));
        }

        /// non_empty فقط رشته خالی رو حذف میکنه
        #[test]
        fn non_empty_keeps_non_empty_strings(s in ".+") {
            prop_assert_eq!(non_empty(Some(s.clone())), Some(s));
        }
    }
}
