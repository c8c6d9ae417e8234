//! Scam-message detection.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FlowError, ModelBackend, PromptFlow};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScamCheckRequest {
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScamCheckResult {
    pub is_scam: bool,
    #[validate(range(min = 0.0, max = 1.0, message = "Confidence must be between 0 and 1"))]
    pub confidence: f64,
    pub reason: String,
}

const TEMPLATE: &str = "You are an AI expert in detecting scam messages.

You will receive a message and must determine if it is a scam or not.

Return isScam as true if the message is a scam, and false if it is not.
Also, provide a confidence level between 0 and 1, and a reason for your determination.

Message: {{{message}}}";

const OUTPUT_SCHEMA: &str = r#"{"isScam": boolean, "confidence": number between 0 and 1, "reason": string}"#;

pub const DETECT_SCAM_MESSAGE: PromptFlow<ScamCheckRequest, ScamCheckResult> =
    PromptFlow::new("detectScamMessage", TEMPLATE, OUTPUT_SCHEMA);

pub async fn detect_scam_message(
    backend: &dyn ModelBackend,
    request: &ScamCheckRequest,
) -> Result<ScamCheckResult, FlowError> {
    DETECT_SCAM_MESSAGE.run(backend, request).await
}
