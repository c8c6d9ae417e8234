use axum::{
    routing::{get, post},
    Router,
};

use crate::modules::voice::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/voice/languages", get(controller::list_languages))
        .route("/api/voice/sessions", post(controller::create_session))
        .route(
            "/api/voice/sessions/{id}",
            get(controller::get_session).delete(controller::end_session),
        )
        .route("/api/voice/sessions/{id}/start", post(controller::start_listening))
        .route("/api/voice/sessions/{id}/stop", post(controller::stop_listening))
        .route("/api/voice/sessions/{id}/segment", post(controller::push_segment))
        .route("/api/voice/sessions/{id}/audio", post(controller::push_audio))
        .route("/api/voice/sessions/{id}/error", post(controller::report_error))
}
