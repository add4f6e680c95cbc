//! Postgate Credential Store
//!
//! This crate provides the user-record store for Postgate, using SQLite via
//! sqlx for persistence. Handlers only see the [`UserStore`] trait.

pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod utils;

pub use error::DbError;
pub use models::{NewUser, User};
pub use repository::Database;
pub use store::UserStore;
