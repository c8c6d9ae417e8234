use serde::{Deserialize, Serialize};
use validator::Validate;

use super::language::SpeechLanguage;
use super::pipeline::VoiceState;

#[derive(Debug, Deserialize, Validate)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "Language cannot be empty"))]
    pub language: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SegmentRequest {
    #[validate(length(min = 1, message = "Segment cannot be empty"))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecognitionErrorRequest {
    #[validate(length(min = 1, message = "Error message cannot be empty"))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub state: VoiceState,
    pub language: SpeechLanguage,
    pub description: String,
    pub last_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SegmentResponse {
    pub id: String,
    pub state: VoiceState,
    pub description: String,
    pub translated: bool,
    pub translation_failed: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<SpeechLanguage>,
}
