//! Authentication error types

use thiserror::Error;

/// Failures inside the auth machinery itself
///
/// None of these are caused by the client; handlers map them to a
/// generic internal error.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token signing error: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),

    #[error("Token lifetime of {0}s puts the expiry out of range")]
    TokenLifetime(i64),

    #[error("Blocking task failed: {0}")]
    Task(String),
}

/// Why a presented token was not accepted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// Bad signature, wrong algorithm, or not a token at all
    #[error("malformed or forged token")]
    Malformed,

    /// Correctly signed, but past its expiry
    #[error("token expired")]
    Expired,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::Malformed => "malformed",
            TokenRejection::Expired => "expired",
        }
    }
}
