#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use proofchain::config::Settings;
use proofchain::flows::{FlowError, FlowPrompt, ModelBackend};
use proofchain::services::stt::{SpeechRecognizer, SttError};
use proofchain::{app, AppState};

pub const MODEL_NAME: &str = "scripted-model";

/// Replays canned model replies in order and records every prompt it saw.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, FlowError>>>,
    pub prompts: Mutex<Vec<FlowPrompt>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<String, FlowError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn failing(error: FlowError) -> Arc<Self> {
        Self::new(vec![Err(error)])
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn generate(&self, prompt: FlowPrompt) -> Result<String, FlowError> {
        self.prompts.lock().unwrap().push(prompt);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FlowError::Remote("no scripted reply left".to_string())))
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}

/// Returns canned transcripts; an `Err` entry surfaces as an API error.
#[derive(Default)]
pub struct FakeRecognizer {
    transcripts: Mutex<VecDeque<Result<String, String>>>,
    pub languages: Mutex<Vec<String>>,
}

impl FakeRecognizer {
    pub fn new(transcripts: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            transcripts: Mutex::new(transcripts.into()),
            languages: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SpeechRecognizer for FakeRecognizer {
    async fn recognize(&self, _audio: Vec<u8>, _file_name: &str, language_code: &str) -> Result<String, SttError> {
        self.languages.lock().unwrap().push(language_code.to_string());
        match self.transcripts.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(SttError::ApiError(message)),
            None => Err(SttError::ApiError("no scripted transcript left".to_string())),
        }
    }
}

pub fn test_settings() -> Settings {
    Settings::from_lookup(|key| match key {
        "MONGODB_URI" => Some("mongodb://127.0.0.1:27017".to_string()),
        "MONGODB_DATABASE" => Some("proofchain_test".to_string()),
        _ => None,
    })
    .unwrap()
}

/// The MongoDB client connects lazily, so tests that never reach the
/// database run without one.
pub async fn test_state_with(
    settings: Settings,
    model: Arc<dyn ModelBackend>,
    recognizer: Arc<dyn SpeechRecognizer>,
) -> AppState {
    let client = mongodb::Client::with_uri_str(&settings.mongodb_uri).await.unwrap();
    let db = client.database(&settings.mongodb_database);

    AppState::new(db, settings, model, recognizer)
}

pub async fn test_state(model: Arc<dyn ModelBackend>, recognizer: Arc<dyn SpeechRecognizer>) -> AppState {
    test_state_with(test_settings(), model, recognizer).await
}

pub async fn server_with(model: Arc<dyn ModelBackend>, recognizer: Arc<dyn SpeechRecognizer>) -> TestServer {
    TestServer::new(app(test_state(model, recognizer).await)).unwrap()
}

pub async fn server(model: Arc<dyn ModelBackend>) -> TestServer {
    server_with(model, FakeRecognizer::new(vec![])).await
}

pub async fn server_with_upload_limit(max_upload_bytes: usize) -> TestServer {
    let mut settings = test_settings();
    settings.max_upload_bytes = max_upload_bytes;
    let state = test_state_with(settings, ScriptedBackend::new(vec![]), FakeRecognizer::new(vec![])).await;

    TestServer::new(app(state)).unwrap()
}
