use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::flows::FlowError;
use crate::AppState;

pub mod document;
pub mod news;
pub mod report;
pub mod repository;
pub mod scam;
pub mod translate;
pub mod upload;
pub mod voice;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<MessageResponse>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(MessageResponse { message: message.into() }))
}

pub fn flow_error_response(err: FlowError) -> ApiError {
    let status = match err {
        FlowError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        FlowError::Remote(_) | FlowError::Schema(_) => StatusCode::BAD_GATEWAY,
        FlowError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.model.model_name().to_string(),
    })
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
