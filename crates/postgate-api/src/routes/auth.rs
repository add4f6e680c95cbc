//! Signup, login, and logout

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use postgate_auth::{
    LOGIN_PATH, hash_password_async, removal_cookie, session_cookie, verify_password_async,
};
use postgate_db::{NewUser, User};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::views;

use super::credentials::{Credentials, Transport};
use super::types::{LoginResponse, MessageResponse};

/// Where the browser lands after logging in
const AFTER_LOGIN_PATH: &str = "/posts-page";

// ==================== Signup ====================

/// POST /signup
async fn signup(
    State(state): State<AppState>,
    credentials: Credentials,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let (username, password) = credentials.require()?;

    debug!("Signup attempt for user: {}", username);

    if state.store.find_user_by_name(username).await?.is_some() {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    let password_hash = hash_password_async(password).await?;

    state
        .store
        .create_user(NewUser {
            username: username.to_string(),
            password_hash,
        })
        .await
        .map_err(|e| {
            if e.is_duplicate() {
                ApiError::Conflict("Username already taken".to_string())
            } else {
                ApiError::from(e)
            }
        })?;

    metrics::counter!("postgate_signups_total").increment(1);
    info!("Created user: {}", username);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    ))
}

// ==================== Login ====================

/// Look up the user and check the password
async fn check_credentials(state: &AppState, credentials: &Credentials) -> Result<User, ApiError> {
    let (username, password) = credentials.require()?;

    debug!("Login attempt for user: {}", username);

    let user = state
        .store
        .find_user_by_name(username)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    if !verify_password_async(password, &user.password_hash).await? {
        return Err(ApiError::WrongPassword);
    }

    Ok(user)
}

fn record_login(outcome: &'static str) {
    metrics::counter!("postgate_logins_total", "outcome" => outcome).increment(1);
}

/// POST /login
///
/// JSON callers get the token in the body; form callers get it as an
/// HttpOnly cookie and a redirect to the posts page.
async fn login(State(state): State<AppState>, credentials: Credentials) -> Response {
    let transport = credentials.transport;

    let result = check_credentials(&state, &credentials).await.and_then(|user| {
        let claims = state.codec.claims_for(&user.username, Some(&user.id))?;
        let token = state.codec.issue(&claims)?;
        Ok((user, token))
    });

    match result {
        Ok((user, token)) => {
            record_login("success");
            info!("User {} logged in", user.username);

            match transport {
                Transport::Api => Json(LoginResponse {
                    access_token: token,
                })
                .into_response(),
                Transport::Browser => {
                    let jar = CookieJar::new().add(session_cookie(token, &state.cookies));
                    (jar, Redirect::to(AFTER_LOGIN_PATH)).into_response()
                }
            }
        }
        Err(e) => {
            let outcome = match e {
                ApiError::Validation(_) => "invalid",
                ApiError::UserNotFound => "unknown_user",
                ApiError::WrongPassword => "wrong_password",
                _ => "error",
            };
            record_login(outcome);
            if matches!(e, ApiError::UserNotFound | ApiError::WrongPassword) {
                warn!("Rejected login: {}", e);
            }

            match transport {
                Transport::Api => e.into_response(),
                Transport::Browser => {
                    let status = e.status();
                    let message = e.public_message();
                    (status, Html(views::login_page(Some(&message)))).into_response()
                }
            }
        }
    }
}

// ==================== Logout ====================

/// GET /logout
///
/// Only the browser's copy of the cookie is dropped; the token itself
/// stays valid until it expires.
async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.add(removal_cookie()), Redirect::to(LOGIN_PATH))
}

// ==================== Forms ====================

async fn login_form() -> Html<String> {
    Html(views::login_page(None))
}

async fn signup_form() -> Html<String> {
    Html(views::signup_page())
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}
