//! Postgate HTTP API
//!
//! This crate provides the Axum routes for Postgate: signup and login,
//! the bearer-protected post list, and the cookie-protected posts page.

pub mod error;
pub mod routes;
pub mod state;
pub mod views;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
