//! # slotbookd — slotbook daemon
//!
//! Composition root that wires the booking store, the booking service, and
//! the HTTP adapter together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize `tracing` logging
//! - Create the selected Booking Store once, at process start
//! - Construct `BookingService`, injecting the store via its port trait
//! - Build the axum router, bind a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use slotbook_adapter_http_axum::router;
use slotbook_adapter_http_axum::state::AppState;
use slotbook_adapter_storage_memory::InMemoryAppointmentRepository;
use slotbook_adapter_storage_sqlite_sqlx::Config as SqliteConfig;
use slotbook_app::ports::AppointmentRepository;
use slotbook_app::services::booking_service::BookingService;

use crate::config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .context("invalid logging filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory booking store");
            serve(&config, InMemoryAppointmentRepository::new()).await
        }
        StorageBackend::Sqlite => {
            tracing::info!(url = %config.storage.database_url, "using sqlite booking store");
            let repo = SqliteConfig::new(config.storage.database_url.clone())
                .open()
                .await
                .context("failed to open sqlite database")?;
            serve(&config, repo).await
        }
    }
}

async fn serve<R>(config: &Config, repo: R) -> anyhow::Result<()>
where
    R: AppointmentRepository + Send + Sync + 'static,
{
    let state = AppState::new(BookingService::new(repo));
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("slotbookd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("slotbookd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received, draining connections");
}
