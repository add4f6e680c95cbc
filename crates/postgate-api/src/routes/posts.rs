//! Protected post routes
//!
//! The same list is served twice: as JSON behind the bearer-token gate and
//! as an HTML page behind the cookie gate.

use axum::{Json, Router, middleware::from_fn_with_state, response::Html, routing::get};
use postgate_auth::{AuthenticatedIdentity, TokenCodec, api_gate, browser_gate};
use std::sync::Arc;
use tracing::debug;

use crate::state::AppState;
use crate::views;

use super::types::Post;

/// The posts every authenticated user can read
const POSTS: &[Post] = &[
    Post {
        username: "vivek",
        title: "post1",
    },
    Post {
        username: "john",
        title: "post2",
    },
];

/// GET /posts
async fn list_posts(identity: AuthenticatedIdentity) -> Json<&'static [Post]> {
    debug!("Serving posts to {}", identity.username);
    Json(POSTS)
}

/// GET /posts-page
async fn posts_page(identity: AuthenticatedIdentity) -> Html<String> {
    Html(views::posts_page(&identity, POSTS))
}

/// Create post routes, each behind its own gate
pub fn routes(codec: Arc<TokenCodec>) -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(list_posts).route_layer(from_fn_with_state(codec.clone(), api_gate)),
        )
        .route(
            "/posts-page",
            get(posts_page).route_layer(from_fn_with_state(codec, browser_gate)),
        )
}
