use axum::{
    routing::{get, post},
    Router,
};

use crate::modules::document::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/documents", post(controller::register_document).get(controller::list_documents))
        .route(
            "/api/documents/{id}",
            get(controller::get_document).delete(controller::delete_document),
        )
        .route("/api/documents/{id}/verify", post(controller::verify_document))
        .route(
            "/api/documents/{id}/verification",
            get(controller::verification_state).delete(controller::close_verification),
        )
}
