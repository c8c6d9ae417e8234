use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Settings;
use crate::flows::{FlowError, FlowPrompt, ModelBackend};

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<LlmError> for FlowError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => FlowError::MissingApiKey,
            other => FlowError::Remote(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    id: String,
    choices: Vec<ChatChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub struct LlmResponse {
    pub id: String,
    pub content: String,
    pub usage: Option<ApiUsage>,
}

/// Chat-completion client for an OpenRouter-compatible API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl LlmClient {
    /// A missing API key is not an error here; every request fails with
    /// [`LlmError::MissingApiKey`] instead, so the service can still boot.
    pub fn new(settings: &Settings) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(settings.llm_timeout).build()?;

        Ok(Self {
            client,
            base_url: settings.openrouter_base_url.trim_end_matches('/').to_string(),
            api_key: settings.openrouter_api_key.clone(),
            model: settings.default_model.clone(),
        })
    }

    pub fn default_model(&self) -> &str {
        &self.model
    }

    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        json_mode: bool,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let mut messages = Vec::new();

        if let Some(sys) = system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: sys.to_string(),
            });
        }

        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens,
            temperature,
            response_format: json_mode.then_some(ResponseFormat { kind: "json_object" }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", "https://proofchain.app")
            .header("X-Title", "Proofchain")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&error_text) {
                return Err(LlmError::ApiError(error_response.error.message));
            }
            return Err(LlmError::ApiError(error_text));
        }

        let chat_response: ChatResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No content in response".to_string()))?;

        Ok(LlmResponse {
            id: chat_response.id,
            content,
            usage: chat_response.usage,
        })
    }
}

#[async_trait]
impl ModelBackend for LlmClient {
    async fn generate(&self, prompt: FlowPrompt) -> Result<String, FlowError> {
        let response = self
            .complete(&prompt.user, Some(&prompt.system), true, Some(800), Some(0.2))
            .await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                flow = prompt.flow,
                completion_id = %response.id,
                total_tokens = usage.total_tokens,
                "model usage"
            );
        }

        Ok(response.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: Option<&str>) -> Settings {
        Settings::from_lookup(|key| match key {
            "MONGODB_URI" => Some("mongodb://localhost:27017".to_string()),
            "OPENROUTER_API_KEY" => api_key.map(str::to_string),
            "OPENROUTER_BASE_URL" => Some("http://127.0.0.1:9/api/v1/".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = LlmClient::new(&settings(None)).unwrap();
        let prompt = FlowPrompt {
            flow: "test",
            system: String::new(),
            user: "hi".to_string(),
        };

        let err = client.generate(prompt).await.unwrap_err();
        assert_eq!(err, FlowError::MissingApiKey);
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = LlmClient::new(&settings(Some("key"))).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9/api/v1");
        assert_eq!(client.default_model(), "xiaomi/mimo-v2-flash:free");
    }

    #[test]
    fn request_serializes_json_mode() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![],
            max_tokens: None,
            temperature: None,
            response_format: Some(ResponseFormat { kind: "json_object" }),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["response_format"]["type"], "json_object");
        assert!(value.get("max_tokens").is_none());
    }
}
