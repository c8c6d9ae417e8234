use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::flows::news::{cross_verify_news, NewsVerifyRequest};
use crate::modules::news::schema::{VerifyNewsRequest, VerifyNewsResponse};
use crate::modules::{error_response, flow_error_response, ApiError};
use crate::AppState;

pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyNewsRequest>,
) -> Result<Json<VerifyNewsResponse>, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let request = NewsVerifyRequest { news_report: payload.news_report };
    let result = cross_verify_news(state.model.as_ref(), &request)
        .await
        .map_err(flow_error_response)?;

    Ok(Json(VerifyNewsResponse {
        verification_result: result.verification_result,
        model: state.model.model_name().to_string(),
    }))
}
