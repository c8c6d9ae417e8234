use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyNewsRequest {
    #[validate(length(min = 20, message = "Please provide a news report to verify."))]
    pub news_report: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyNewsResponse {
    pub verification_result: String,
    pub model: String,
}
