use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use mongodb::Database;
use tower_http::cors::CorsLayer;

use crate::config::Settings;
use crate::flows::ModelBackend;
use crate::modules::document::verification::VerificationRegistry;
use crate::modules::voice::store::VoiceSessions;
use crate::services::stt::SpeechRecognizer;

pub mod config;
pub mod flows;
pub mod modules;
pub mod services;

/// Multipart overhead allowed on top of one maximum-size file.
const BODY_LIMIT_FACTOR: usize = 5;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Arc<Settings>,
    pub model: Arc<dyn ModelBackend>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub voice_sessions: VoiceSessions,
    pub verifications: VerificationRegistry,
}

impl AppState {
    pub fn new(
        db: Database,
        settings: Settings,
        model: Arc<dyn ModelBackend>,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> Self {
        Self {
            db,
            settings: Arc::new(settings),
            model,
            recognizer,
            voice_sessions: VoiceSessions::new(),
            verifications: VerificationRegistry::new(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let body_limit = state.settings.max_upload_bytes.saturating_mul(BODY_LIMIT_FACTOR);

    Router::new()
        .merge(modules::routes())
        .merge(modules::scam::routes::routes())
        .merge(modules::news::routes::routes())
        .merge(modules::translate::routes::routes())
        .merge(modules::document::routes::routes())
        .merge(modules::voice::routes::routes())
        .merge(modules::report::routes::routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
