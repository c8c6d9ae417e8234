use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Settings;

#[derive(Error, Debug)]
pub enum SttError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),
}

/// Speech-to-text capability used by the voice pipeline. Each call turns one
/// audio clip into one finalized transcript segment.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, audio: Vec<u8>, file_name: &str, language_code: &str) -> Result<String, SttError>;
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Whisper-compatible transcription client (Groq by default).
#[derive(Clone)]
pub struct SttClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl SttClient {
    pub fn new(settings: &Settings) -> Result<Self, SttError> {
        let client = Client::builder().timeout(settings.llm_timeout).build()?;

        Ok(Self {
            client,
            base_url: settings.groq_base_url.trim_end_matches('/').to_string(),
            api_key: settings.groq_api_key.clone(),
            model: settings.stt_model.clone(),
        })
    }

    pub async fn transcribe(
        &self,
        audio_data: Vec<u8>,
        file_name: &str,
        language: Option<&str>,
    ) -> Result<String, SttError> {
        let api_key = self.api_key.as_deref().ok_or(SttError::MissingApiKey)?;

        let extension = Self::extension(file_name);
        if !Self::supported_formats().contains(&extension.as_str()) {
            return Err(SttError::UnsupportedFormat(extension));
        }

        let file_part = Part::bytes(audio_data)
            .file_name(file_name.to_string())
            .mime_str(Self::get_mime_type(&extension))
            .map_err(|e| SttError::InvalidResponse(e.to_string()))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "json");

        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&error_text) {
                return Err(SttError::ApiError(error_response.error.message));
            }
            return Err(SttError::ApiError(error_text));
        }

        let whisper_response: WhisperResponse = response.json().await?;

        Ok(whisper_response.text.trim().to_string())
    }

    fn extension(file_name: &str) -> String {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        }
    }

    fn get_mime_type(extension: &str) -> &'static str {
        match extension {
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            "webm" => "audio/webm",
            "ogg" => "audio/ogg",
            "m4a" => "audio/m4a",
            "flac" => "audio/flac",
            "mp4" => "audio/mp4",
            _ => "application/octet-stream",
        }
    }

    pub fn supported_formats() -> Vec<&'static str> {
        vec!["mp3", "wav", "webm", "ogg", "m4a", "flac", "mp4"]
    }
}

#[async_trait]
impl SpeechRecognizer for SttClient {
    async fn recognize(&self, audio: Vec<u8>, file_name: &str, language_code: &str) -> Result<String, SttError> {
        // Whisper wants ISO-639-1 ("hi"), the UI speaks BCP-47 ("hi-IN").
        let iso = language_code.split('-').next().filter(|s| !s.is_empty());
        self.transcribe(audio, file_name, iso).await
    }
}
