use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct DetectScamRequest {
    #[validate(length(min = 10, message = "Message must be at least 10 characters."))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DetectScamResponse {
    pub is_scam: bool,
    pub confidence: f64,
    pub reason: String,
    pub model: String,
}
