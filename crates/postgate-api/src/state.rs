//! Application state

use metrics_exporter_prometheus::PrometheusHandle;
use postgate_auth::{CookieSettings, TokenCodec};
use postgate_db::UserStore;
use std::sync::Arc;

/// Application state shared across handlers
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub codec: Arc<TokenCodec>,
    pub cookies: CookieSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, codec: Arc<TokenCodec>, cookies: CookieSettings) -> Self {
        Self {
            store,
            codec,
            cookies,
        }
    }
}

/// Handle for rendering the Prometheus exposition
pub struct MetricsHandle {
    handle: PrometheusHandle,
}

impl MetricsHandle {
    pub fn new(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }
}
