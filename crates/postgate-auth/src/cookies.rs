//! Session cookie construction

use axum_extra::extract::cookie::Cookie;
use chrono::Duration;

use crate::extract::TOKEN_COOKIE;

/// Attributes applied to the session cookie
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Set the Secure flag (production mode)
    pub secure: bool,
    /// Cookie lifetime; matches the token lifetime
    pub max_age: Duration,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: false,
            max_age: Duration::hours(1),
        }
    }
}

/// Build the HttpOnly cookie carrying a freshly issued token
pub fn session_cookie(token: String, settings: &CookieSettings) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(settings.secure)
        .max_age(::cookie::time::Duration::seconds(settings.max_age.num_seconds()))
        .build()
}

/// Expired, empty session cookie that makes the browser drop its copy
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((TOKEN_COOKIE, "")).path("/").http_only(true).build();
    cookie.make_removal();
    cookie
}
