use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct TranslateTextRequest {
    #[validate(length(min = 1, message = "Text cannot be empty"))]
    pub text: String,
    #[validate(length(min = 1, message = "Source language cannot be empty"))]
    pub source_language: String,
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateTextResponse {
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
}
