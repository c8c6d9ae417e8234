use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::flows::scam::{detect_scam_message, ScamCheckRequest};
use crate::modules::scam::schema::{DetectScamRequest, DetectScamResponse};
use crate::modules::{error_response, flow_error_response, ApiError};
use crate::AppState;

pub async fn detect(
    State(state): State<AppState>,
    Json(payload): Json<DetectScamRequest>,
) -> Result<Json<DetectScamResponse>, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let request = ScamCheckRequest { message: payload.message };
    let result = detect_scam_message(state.model.as_ref(), &request)
        .await
        .map_err(flow_error_response)?;

    Ok(Json(DetectScamResponse {
        is_scam: result.is_scam,
        confidence: result.confidence,
        reason: result.reason,
        model: state.model.model_name().to_string(),
    }))
}
