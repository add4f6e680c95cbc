//! Request gates for Axum
//!
//! Two policies share one decision procedure ([`authenticate`]) and differ
//! only in where they look for the token and how they reject:
//!
//! - [`api_gate`]: bearer header; 401 for no token, 403 for a bad one.
//! - [`browser_gate`]: `token` cookie; any failure redirects to the login page.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::TokenRejection;
use crate::extract::{Credential, TokenSource};
use crate::token::{TokenClaims, TokenCodec};

/// Where the browser policy sends unauthenticated clients
pub const LOGIN_PATH: &str = "/login";

/// Identity attached to an admitted request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub username: String,
    pub user_id: Option<String>,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl AuthenticatedIdentity {
    /// Create from verified token claims
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            username: claims.sub,
            user_id: claims.uid,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthenticatedIdentity>().cloned().ok_or_else(|| {
            error!("AuthenticatedIdentity requested on a route without an auth gate");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

/// Terminal state of the gate for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Admitted(AuthenticatedIdentity),
    NoCredential,
    Invalid(TokenRejection),
}

/// Find and verify the credential for a request
pub fn authenticate(source: TokenSource, headers: &HeaderMap, codec: &TokenCodec) -> GateOutcome {
    match source.extract(headers) {
        Credential::Missing => GateOutcome::NoCredential,
        Credential::Presented(token) => match codec.verify(&token) {
            Ok(claims) => GateOutcome::Admitted(AuthenticatedIdentity::from_claims(claims)),
            Err(rejection) => GateOutcome::Invalid(rejection),
        },
    }
}

/// Response produced when a gate turns a request away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateRejection {
    /// API client sent no bearer token
    Unauthenticated,
    /// API client sent a token that failed verification
    Forbidden(TokenRejection),
    /// Browser client without a usable session cookie
    RedirectToLogin,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            GateRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "No token provided" })),
            )
                .into_response(),
            GateRejection::Forbidden(_) => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "Invalid token" })),
            )
                .into_response(),
            GateRejection::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
        }
    }
}

fn record_rejection(policy: &'static str, reason: &'static str) {
    metrics::counter!(
        "postgate_gate_rejections_total",
        "policy" => policy,
        "reason" => reason
    )
    .increment(1);
}

/// Gate for API routes (bearer header)
pub async fn api_gate(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, GateRejection> {
    match authenticate(TokenSource::Header, request.headers(), &codec) {
        GateOutcome::Admitted(identity) => {
            debug!("Admitted API request for user: {}", identity.username);
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        GateOutcome::NoCredential => {
            debug!("Rejected API request: no bearer token");
            record_rejection("api", "missing");
            Err(GateRejection::Unauthenticated)
        }
        GateOutcome::Invalid(rejection) => {
            debug!("Rejected API request: {}", rejection);
            record_rejection("api", rejection.as_str());
            Err(GateRejection::Forbidden(rejection))
        }
    }
}

/// Gate for browser pages (session cookie)
pub async fn browser_gate(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, GateRejection> {
    match authenticate(TokenSource::Cookie, request.headers(), &codec) {
        GateOutcome::Admitted(identity) => {
            debug!("Admitted browser request for user: {}", identity.username);
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        GateOutcome::NoCredential => {
            debug!("Redirecting browser request to login: no session cookie");
            record_rejection("browser", "missing");
            Err(GateRejection::RedirectToLogin)
        }
        GateOutcome::Invalid(rejection) => {
            debug!("Redirecting browser request to login: {}", rejection);
            record_rejection("browser", rejection.as_str());
            Err(GateRejection::RedirectToLogin)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{
            HeaderValue,
            header::{AUTHORIZATION, COOKIE, LOCATION},
        },
        middleware::from_fn_with_state,
        routing::get,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new("test-secret-key", Duration::hours(1)))
    }

    fn expired_token(codec: &TokenCodec) -> String {
        let now = Utc::now().timestamp();
        codec
            .issue(&TokenClaims {
                sub: "alice".to_string(),
                uid: None,
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap()
    }

    async fn whoami(identity: AuthenticatedIdentity) -> String {
        identity.username
    }

    fn app(codec: Arc<TokenCodec>) -> Router {
        Router::new()
            .route(
                "/api",
                get(whoami).route_layer(from_fn_with_state(codec.clone(), api_gate)),
            )
            .route(
                "/page",
                get(whoami).route_layer(from_fn_with_state(codec, browser_gate)),
            )
    }

    async fn send(app: Router, uri: &str, header: Option<(axum::http::HeaderName, String)>) -> Response {
        let mut request = axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap();
        if let Some((name, value)) = header {
            request
                .headers_mut()
                .insert(name, HeaderValue::from_str(&value).unwrap());
        }
        app.oneshot(request).await.unwrap()
    }

    #[test]
    fn test_authenticate_outcomes() {
        let codec = codec();
        let token = codec.issue(&codec.claims_for("alice", Some("u-1")).unwrap()).unwrap();

        let mut headers = HeaderMap::new();
        assert_eq!(
            authenticate(TokenSource::Header, &headers, &codec),
            GateOutcome::NoCredential
        );

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer garbage"));
        assert_eq!(
            authenticate(TokenSource::Header, &headers, &codec),
            GateOutcome::Invalid(TokenRejection::Malformed)
        );

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        match authenticate(TokenSource::Header, &headers, &codec) {
            GateOutcome::Admitted(identity) => {
                assert_eq!(identity.username, "alice");
                assert_eq!(identity.user_id.as_deref(), Some("u-1"));
            }
            other => panic!("expected admission, got {:?}", other),
        }
    }

    #[test]
    fn test_expired_token_is_invalid_not_missing() {
        let codec = codec();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("token={}", expired_token(&codec))).unwrap(),
        );

        assert_eq!(
            authenticate(TokenSource::Cookie, &headers, &codec),
            GateOutcome::Invalid(TokenRejection::Expired)
        );
    }

    #[tokio::test]
    async fn test_api_gate_statuses() {
        let codec = codec();
        let token = codec.issue(&codec.claims_for("alice", None).unwrap()).unwrap();

        let response = send(app(codec.clone()), "/api", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(
            app(codec.clone()),
            "/api",
            Some((AUTHORIZATION, "Bearer garbage".to_string())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(
            app(codec.clone()),
            "/api",
            Some((AUTHORIZATION, format!("Bearer {}", expired_token(&codec)))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(app(codec), "/api", Some((AUTHORIZATION, format!("Bearer {}", token)))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_browser_gate_redirects() {
        let codec = codec();

        let response = send(app(codec.clone()), "/page", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), LOGIN_PATH);

        let response = send(
            app(codec.clone()),
            "/page",
            Some((COOKIE, format!("token={}", expired_token(&codec)))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), LOGIN_PATH);

        let token = codec.issue(&codec.claims_for("alice", None).unwrap()).unwrap();
        let response = send(app(codec), "/page", Some((COOKIE, format!("token={}", token)))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_browser_gate_ignores_bearer_header() {
        let codec = codec();
        let token = codec.issue(&codec.claims_for("alice", None).unwrap()).unwrap();

        let response = send(app(codec), "/page", Some((AUTHORIZATION, format!("Bearer {}", token)))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
