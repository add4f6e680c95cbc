//! Pulling a candidate token out of a request
//!
//! The extractors never look inside the token; they only find it.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use axum_extra::extract::cookie::CookieJar;

/// Name of the session cookie used by the browser flow
pub const TOKEN_COOKIE: &str = "token";

/// Where a route expects its credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `Authorization: Bearer <token>`
    Header,
    /// The `token` cookie
    Cookie,
}

/// Result of looking for a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Missing,
    Presented(String),
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Header => "header",
            TokenSource::Cookie => "cookie",
        }
    }

    /// Look for a credential in the location this source covers
    pub fn extract(&self, headers: &HeaderMap) -> Credential {
        let token = match self {
            TokenSource::Header => bearer_token(headers).map(str::to_string),
            TokenSource::Cookie => cookie_token(headers),
        };

        match token {
            Some(token) => Credential::Presented(token),
            None => Credential::Missing,
        }
    }
}

/// Extract the bearer token from the Authorization header
///
/// Only the exact `Bearer ` scheme prefix is recognized. The token is the
/// text up to the next single space; anything else, including an empty
/// token (`Bearer  x` with two spaces), counts as no credential.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|rest| rest.split(' ').next())
        .filter(|token| !token.is_empty())
}

/// Extract the session token from the request cookies
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header::COOKIE};

    fn with_header(name: axum::http::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        let headers = with_header(AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_takes_first_segment() {
        let headers = with_header(AUTHORIZATION, "Bearer abc.def.ghi trailing");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_or_malformed_authorization() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&with_header(AUTHORIZATION, "Bearer")), None);
        assert_eq!(bearer_token(&with_header(AUTHORIZATION, "Bearer ")), None);
        assert_eq!(bearer_token(&with_header(AUTHORIZATION, "Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&with_header(AUTHORIZATION, "bearer abc")), None);
    }

    #[test]
    fn test_double_space_after_scheme_is_no_credential() {
        let headers = with_header(AUTHORIZATION, "Bearer  abc.def.ghi");
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(TokenSource::Header.extract(&headers), Credential::Missing);
    }

    #[test]
    fn test_cookie_token() {
        let headers = with_header(COOKIE, "theme=dark; token=abc.def.ghi");
        assert_eq!(cookie_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_missing_cookie() {
        assert_eq!(cookie_token(&HeaderMap::new()), None);
        assert_eq!(cookie_token(&with_header(COOKIE, "theme=dark")), None);
        assert_eq!(cookie_token(&with_header(COOKIE, "token=")), None);
    }

    #[test]
    fn test_sources_do_not_cross() {
        let mut headers = with_header(COOKIE, "token=from-cookie");
        assert_eq!(TokenSource::Header.extract(&headers), Credential::Missing);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(
            TokenSource::Header.extract(&headers),
            Credential::Presented("from-header".to_string())
        );
        assert_eq!(
            TokenSource::Cookie.extract(&headers),
            Credential::Presented("from-cookie".to_string())
        );
    }
}
