//! Fake-news cross-verification.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_blank, FlowError, ModelBackend, PromptFlow};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewsVerifyRequest {
    #[validate(length(min = 20, message = "News report must be at least 20 characters"))]
    pub news_report: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsVerifyResult {
    #[validate(custom(function = "not_blank"))]
    pub verification_result: String,
}

const TEMPLATE: &str = "You are an expert fact-checker. Given the following news report, cross-verify it with trusted sources and determine if it is likely accurate.

News Report: {{{newsReport}}}";

const OUTPUT_SCHEMA: &str = r#"{"verificationResult": string explaining whether the report is likely accurate}"#;

pub const CROSS_VERIFY_NEWS: PromptFlow<NewsVerifyRequest, NewsVerifyResult> =
    PromptFlow::new("crossVerifyFakeNews", TEMPLATE, OUTPUT_SCHEMA);

pub async fn cross_verify_news(
    backend: &dyn ModelBackend,
    request: &NewsVerifyRequest,
) -> Result<NewsVerifyResult, FlowError> {
    CROSS_VERIFY_NEWS.run(backend, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::stub::StubBackend;

    const REPORT: &str = "Scientists confirm the moon will be painted blue next year.";

    #[tokio::test]
    async fn returns_the_free_text_judgement() {
        let backend = StubBackend::replying(
            r#"{"verificationResult": "Likely false: no credible outlet reports this."}"#,
        );

        let result = cross_verify_news(&backend, &NewsVerifyRequest { news_report: REPORT.to_string() })
            .await
            .unwrap();

        assert_eq!(result.verification_result, "Likely false: no credible outlet reports this.");
        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].user.contains(&format!("News Report: {}", REPORT)));
    }

    #[tokio::test]
    async fn empty_judgement_is_never_a_success() {
        for reply in [r#"{"verificationResult": ""}"#, r#"{"verificationResult": "  \n"}"#] {
            let backend = StubBackend::replying(reply);
            let err = cross_verify_news(&backend, &NewsVerifyRequest { news_report: REPORT.to_string() })
                .await
                .unwrap_err();
            assert!(matches!(err, FlowError::Schema(_)));
        }
    }

    #[tokio::test]
    async fn short_reports_are_rejected() {
        let backend = StubBackend::replying(r#"{"verificationResult": "n/a"}"#);
        let err = cross_verify_news(&backend, &NewsVerifyRequest { news_report: "too short".to_string() })
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::InvalidInput(_)));
        assert_eq!(backend.calls(), 0);
    }
}
