//! API routes

mod auth;
pub mod credentials;
mod health;
pub mod metrics;
mod pages;
mod posts;
pub mod types;

use axum::Router;
use std::sync::Arc;

use crate::state::{AppState, MetricsHandle};

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let codec = state.codec.clone();

    let mut router = Router::new()
        .merge(health::routes())
        .merge(pages::routes())
        .merge(auth::routes())
        .merge(posts::routes(codec))
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}
