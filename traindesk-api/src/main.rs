//! # TrainDesk API Server
//!
//! HTTP backend for personal trainers: account registration with email
//! verification, JWT login, and trainer-scoped client and workout records.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Connect to PostgreSQL and apply pending migrations
//! 3. Pick the verification mailer (SMTP, or log-only when unconfigured)
//! 4. Serve until Ctrl+C / SIGTERM, then drain and close the pool
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) DATABASE_URL=postgres://localhost/traindesk \
//!     cargo run -p traindesk-api
//! ```
//!
//! Set `LOG_FORMAT=json` for JSON log lines.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use traindesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use traindesk_shared::{
    db::{
        migrations::{ensure_database_exists, get_migration_status, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    mail::{LogMailer, SmtpMailer, VerificationMailer},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "TrainDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    ensure_database_exists(&config.database.url).await?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let status = get_migration_status(&pool).await?;
    tracing::info!(
        applied = status.applied_migrations,
        latest_version = ?status.latest_version,
        "Database schema ready"
    );

    let mailer: Arc<dyn VerificationMailer> = match &config.smtp {
        Some(settings) => Arc::new(SmtpMailer::new(settings)?),
        None => {
            tracing::warn!("SMTP_HOST not set, verification emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let addr = config.bind_address();
    let state = AppState::new(pool.clone(), config, mailer);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "traindesk_api=debug,traindesk_shared=debug,tower_http=debug".into()
    });

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
