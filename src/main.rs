//! todo-service server binary

use std::time::Duration;

use anyhow::Context;

use todo_service::api::{create_router, AppState};
use todo_service::config::AppConfig;
use todo_service::storage::create_store;
use todo_service::telemetry::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config.logging)?;

    if let Err(err) = run(config).await {
        tracing::error!(error = %format!("{err:#}"), "Fatal error, shutting down");
        std::process::exit(1);
    }

    Ok(())
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let metrics = init_metrics()?;

    let storage_config = config
        .storage_runtime()
        .context("invalid storage configuration")?;

    tracing::info!(
        backend = ?config.storage.backend,
        db_host = %config.database.host,
        db_port = config.database.port,
        db_name = %config.database.name,
        "Connecting to storage"
    );
    let store = create_store(storage_config)
        .await
        .context("failed to connect to database")?;

    if config.database.init_schema {
        store
            .ensure_schema()
            .await
            .context("failed to initialise database")?;
    } else {
        tracing::info!("Schema initialisation disabled");
    }

    let state = AppState::new(store)
        .with_metrics(metrics)
        .with_request_timeout(Duration::from_secs(config.server.request_timeout_secs));
    let router = create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
