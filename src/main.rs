//! # Link Shortener - نقطه ورود برنامه
//!
//! ترتیب راه‌اندازی: `.env` ← تنظیمات ← tracing ← دیتابیس ← migration ← سرور.
//! بعد از سیگنال خاموشی، درخواست‌های در حال اجرا تموم میشن و pool دیتابیس بسته میشه.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use link_shortener::{
    api::create_router,
    config::{Config, Environment},
    database::Database,
    error::{AppError, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    // اگه فایل .env نباشه اشکالی نداره
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.environment);

    info!("🚀 Starting Link Shortener...");
    info!(environment = ?config.environment, "✅ Configuration loaded");

    let database = Database::connect(&config.database_url, config.database_max_connections).await?;
    info!("✅ Database connected");

    database.migrate().await?;
    info!("✅ Database migrations applied");

    let app = create_router(database.clone(), config.clone());

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("🌐 Server listening on http://{}", listener.local_addr()?);

    // ConnectInfo برای IP کلاینت وقتی proxy header نیست
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::Server(e.to_string()))?;

    database.close().await;
    info!("👋 Server stopped");

    Ok(())
}

/// راه‌اندازی سیستم tracing برای لاگینگ
///
/// EnvFilter از متغیر RUST_LOG میخونه. در production خروجی JSON هست.
fn init_tracing(environment: Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("link_shortener=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if environment.is_production() {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .init();
    }
}

/// منتظر Ctrl-C یا SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
