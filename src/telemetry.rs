//! Logging and metrics wiring

use std::time::Instant;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingSection};

pub const REQUESTS_TOTAL: &str = "todo_http_requests_total";
pub const REQUEST_DURATION: &str = "todo_http_request_duration_seconds";
pub const BUILD_INFO: &str = "todo_build_info";

/// Install the global tracing subscriber.
pub fn init_tracing(config: &LoggingSection) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("invalid log level configuration")?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer()).try_init()?;
        }
    }

    Ok(())
}

/// Install the global Prometheus recorder and return a handle for rendering scrapes.
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    gauge!(BUILD_INFO, "version" => env!("CARGO_PKG_VERSION")).set(1.0);

    Ok(handle)
}

/// Record the outcome of one handled request.
pub fn record_request(route: &'static str, status: StatusCode, started: Instant) {
    counter!(
        REQUESTS_TOTAL,
        "route" => route,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    histogram!(REQUEST_DURATION, "route" => route).record(started.elapsed().as_secs_f64());
}
