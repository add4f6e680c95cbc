//! Request and response types

use serde::{Deserialize, Serialize};

/// Username/password pair as submitted; either field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response for a successful API login
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// A post in the public list
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub username: &'static str,
    pub title: &'static str,
}
