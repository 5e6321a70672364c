//! Root greeting

use axum::{response::Html, routing::get, Router};

use crate::state::AppState;

pub const GREETING: &str = "<p>Blueprint Reader API</p>";

async fn hello() -> Html<&'static str> {
    Html(GREETING)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(hello))
}
