//! Text translation between display-named languages ("Hindi", "English").

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_blank, FlowError, ModelBackend, PromptFlow};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[validate(length(min = 1, message = "Text cannot be empty"))]
    pub text: String,
    #[validate(custom(function = "not_blank"))]
    pub source_language: String,
    #[validate(custom(function = "not_blank"))]
    pub target_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResult {
    // An empty translation would silently drop the speaker's words.
    #[validate(custom(function = "not_blank"))]
    pub translated_text: String,
}

const TEMPLATE: &str = "You are a professional translator. Translate the following text from {{{sourceLanguage}}} to {{{targetLanguage}}}. Preserve names, numbers and meaning. Return only the translation.

Text: {{{text}}}";

const OUTPUT_SCHEMA: &str = r#"{"translatedText": string}"#;

pub const TRANSLATE_TEXT: PromptFlow<TranslateRequest, TranslateResult> =
    PromptFlow::new("translateText", TEMPLATE, OUTPUT_SCHEMA);

pub async fn translate_text(
    backend: &dyn ModelBackend,
    request: &TranslateRequest,
) -> Result<TranslateResult, FlowError> {
    TRANSLATE_TEXT.run(backend, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::stub::StubBackend;

    #[tokio::test]
    async fn renders_languages_into_the_prompt() {
        let backend = StubBackend::replying(r#"{"translatedText": "I received a call"}"#);
        let request = TranslateRequest {
            text: "मुझे कॉल आया".to_string(),
            source_language: "Hindi".to_string(),
            target_language: "English".to_string(),
        };

        let result = translate_text(&backend, &request).await.unwrap();
        assert_eq!(result.translated_text, "I received a call");

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].user.contains("from Hindi to English"));
        assert!(prompts[0].user.ends_with("Text: मुझे कॉल आया"));
    }

    #[tokio::test]
    async fn blank_source_language_is_rejected() {
        let backend = StubBackend::replying(r#"{"translatedText": "x"}"#);
        let request = TranslateRequest {
            text: "hola".to_string(),
            source_language: String::new(),
            target_language: "English".to_string(),
        };

        let err = translate_text(&backend, &request).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));
        assert_eq!(backend.calls(), 0);
    }
}
