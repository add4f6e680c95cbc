//! Credentials extractor
//!
//! Login and signup accept both JSON (API clients) and urlencoded forms
//! (the browser flow). The body's content type decides which transport the
//! response uses.

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};

use crate::error::ApiError;

use super::types::CredentialsBody;

/// How the caller wants the outcome delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// JSON in, JSON out
    Api,
    /// Form in, cookie/redirect or rendered page out
    Browser,
}

/// Submitted credentials plus the transport they arrived on
#[derive(Debug, Clone)]
pub struct Credentials {
    pub transport: Transport,
    pub body: CredentialsBody,
}

impl Credentials {
    /// Both fields, or a validation error if either is missing or empty
    pub fn require(&self) -> Result<(&str, &str), ApiError> {
        match (self.body.username.as_deref(), self.body.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok((username, password))
            }
            _ => Err(ApiError::Validation(
                "Username and password are required".to_string(),
            )),
        }
    }
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false)
}

impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&request) {
            let Json(body) = Json::<CredentialsBody>::from_request(request, state)
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            return Ok(Credentials {
                transport: Transport::Api,
                body,
            });
        }

        let Form(body) = Form::<CredentialsBody>::from_request(request, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;
        Ok(Credentials {
            transport: Transport::Browser,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(content_type: &str, body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/login")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body_selects_api_transport() {
        let creds = Credentials::from_request(
            request("application/json", r#"{"username":"alice","password":"pw1"}"#),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(creds.transport, Transport::Api);
        assert_eq!(creds.require().unwrap(), ("alice", "pw1"));
    }

    #[tokio::test]
    async fn test_form_body_selects_browser_transport() {
        let creds = Credentials::from_request(
            request("application/x-www-form-urlencoded", "username=alice&password=pw1"),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(creds.transport, Transport::Browser);
        assert_eq!(creds.require().unwrap(), ("alice", "pw1"));
    }

    #[tokio::test]
    async fn test_missing_fields_fail_validation() {
        let creds = Credentials::from_request(request("application/json", r#"{"username":"alice"}"#), &())
            .await
            .unwrap();
        assert!(matches!(creds.require(), Err(ApiError::Validation(_))));

        let creds = Credentials::from_request(
            request("application/x-www-form-urlencoded", "username=&password=pw1"),
            &(),
        )
        .await
        .unwrap();
        assert!(matches!(creds.require(), Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_validation_error() {
        let result = Credentials::from_request(request("application/json", "{not json"), &()).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
