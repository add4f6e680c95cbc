//! Signed session tokens

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, TokenRejection};

/// Claims carried inside a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,
    /// User ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issues and verifies HS256 tokens with a server-held secret
///
/// Every token carries an expiry; there is no way to mint one without.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Build claims for a subject, valid from now until now + ttl
    pub fn claims_for(
        &self,
        subject: &str,
        user_id: Option<&str>,
    ) -> Result<TokenClaims, AuthError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::TokenLifetime(self.ttl.num_seconds()))?;

        Ok(TokenClaims {
            sub: subject.to_string(),
            uid: user_id.map(str::to_string),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// Sign claims into a token string
    pub fn issue(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        debug!("Issuing token for subject: {}", claims.sub);
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(AuthError::from)
    }

    /// Check signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenRejection> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenRejection::Expired,
                _ => TokenRejection::Malformed,
            })?;

        // The library accepts exp == now; a token is only valid strictly before exp
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenRejection::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(secret, Duration::hours(1))
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let codec = codec("test-secret-key");
        let claims = codec.claims_for("alice", Some("5f0c6a1e")).unwrap();

        let token = codec.issue(&claims).unwrap();
        let verified = codec.verify(&token).unwrap();

        assert_eq!(verified, claims);
        assert_eq!(verified.exp - verified.iat, 3600);
    }

    #[test]
    fn test_round_trip_without_user_id() {
        let codec = codec("test-secret-key");
        let claims = codec.claims_for("bob", None).unwrap();

        let token = codec.issue(&claims).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_expired_token_rejected_as_expired() {
        let codec = codec("test-secret-key");
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: "alice".to_string(),
            uid: None,
            iat: now - 3630,
            exp: now - 30,
        };

        let token = codec.issue(&claims).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenRejection::Expired));
    }

    #[test]
    fn test_zero_ttl_token_is_already_expired() {
        let codec = TokenCodec::new("test-secret-key", Duration::zero());
        let token = codec.issue(&codec.claims_for("alice", None).unwrap()).unwrap();

        assert_eq!(codec.verify(&token), Err(TokenRejection::Expired));
    }

    #[test]
    fn test_unrepresentable_expiry_is_an_error() {
        let codec = TokenCodec::new("test-secret-key", Duration::seconds(10_000_000_000_000));

        let err = codec.claims_for("alice", None).unwrap_err();
        assert!(matches!(err, AuthError::TokenLifetime(10_000_000_000_000)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = codec("secret-a");
        let verifier = codec("secret-b");
        let token = issuer.issue(&issuer.claims_for("alice", None).unwrap()).unwrap();

        assert_eq!(verifier.verify(&token), Err(TokenRejection::Malformed));
    }

    #[test]
    fn test_garbage_rejected_as_malformed() {
        let codec = codec("test-secret-key");

        assert_eq!(codec.verify("garbage"), Err(TokenRejection::Malformed));
        assert_eq!(codec.verify(""), Err(TokenRejection::Malformed));
        assert_eq!(codec.verify("a.b.c"), Err(TokenRejection::Malformed));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec("test-secret-key");
        let token = codec.issue(&codec.claims_for("alice", None).unwrap()).unwrap();

        let other = codec.issue(&codec.claims_for("mallory", None).unwrap()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let forged = parts.join(".");

        assert_eq!(codec.verify(&forged), Err(TokenRejection::Malformed));
    }
}
