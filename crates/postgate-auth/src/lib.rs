//! Postgate Authentication
//!
//! Password hashing, signed session tokens, and the two request gates:
//! `api_gate` for bearer-token API clients and `browser_gate` for the
//! cookie-based form flow.

pub mod cookies;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod password;
pub mod token;

pub use cookies::{CookieSettings, removal_cookie, session_cookie};
pub use error::{AuthError, TokenRejection};
pub use extract::{Credential, TOKEN_COOKIE, TokenSource, bearer_token, cookie_token};
pub use middleware::{
    AuthenticatedIdentity, GateOutcome, GateRejection, LOGIN_PATH, api_gate, authenticate,
    browser_gate,
};
pub use password::{hash_password, hash_password_async, verify_password, verify_password_async};
pub use token::{TokenClaims, TokenCodec};
