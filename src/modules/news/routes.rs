use axum::{routing::post, Router};

use crate::modules::news::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/news/verify", post(controller::verify))
}
