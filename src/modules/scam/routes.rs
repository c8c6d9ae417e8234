use axum::{routing::post, Router};

use crate::modules::scam::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/scam/detect", post(controller::detect))
}
