//! Credential store abstraction

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewUser, User};
use crate::repository::Database;

/// Durable mapping from username to user record
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by exact username
    async fn find_user_by_name(&self, username: &str) -> Result<Option<User>, DbError>;

    /// Persist a new user; `DbError::Duplicate` if the username is taken
    async fn create_user(&self, user: NewUser) -> Result<User, DbError>;
}

#[async_trait]
impl UserStore for Database {
    async fn find_user_by_name(&self, username: &str) -> Result<Option<User>, DbError> {
        self.get_user_by_username(username).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
        self.insert_user(user).await
    }
}
