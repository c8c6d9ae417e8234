use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::flows::translate::{translate_text, TranslateRequest};
use crate::modules::translate::schema::{TranslateTextRequest, TranslateTextResponse};
use crate::modules::{error_response, flow_error_response, ApiError};
use crate::AppState;

pub const DEFAULT_TARGET_LANGUAGE: &str = "English";

pub async fn translate(
    State(state): State<AppState>,
    Json(payload): Json<TranslateTextRequest>,
) -> Result<Json<TranslateTextResponse>, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let request = TranslateRequest {
        text: payload.text,
        source_language: payload.source_language,
        target_language: payload
            .target_language
            .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string()),
    };

    let result = translate_text(state.model.as_ref(), &request)
        .await
        .map_err(flow_error_response)?;

    Ok(Json(TranslateTextResponse {
        translated_text: result.translated_text,
        source_language: request.source_language,
        target_language: request.target_language,
    }))
}
