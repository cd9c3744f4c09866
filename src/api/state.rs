//! API server state

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::storage::TodoStore;

/// Default per-request deadline
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared handler state, constructed once at startup
#[derive(Clone)]
pub struct AppState {
    /// Todo storage backend
    pub store: Arc<dyn TodoStore>,

    /// Prometheus scrape handle (absent when no recorder is installed)
    pub metrics: Option<PrometheusHandle>,

    /// Deadline applied to every storage call made on behalf of a request
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self {
            store,
            metrics: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
