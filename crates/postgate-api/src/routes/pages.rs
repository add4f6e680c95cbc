//! Landing page

use axum::{Router, response::Html, routing::get};

use crate::state::AppState;
use crate::views;

async fn index() -> Html<String> {
    Html(views::index_page())
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}
