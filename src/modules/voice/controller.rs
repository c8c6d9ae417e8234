use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::modules::upload::UploadForm;
use crate::modules::voice::{
    language::SPEECH_LANGUAGES,
    pipeline::{PipelineError, SegmentOutcome, VoicePipeline, VoiceState},
    schema::{
        LanguagesResponse, RecognitionErrorRequest, SegmentRequest, SegmentResponse, SessionResponse,
        StartSessionRequest,
    },
};
use crate::modules::{error_response, ApiError};
use crate::AppState;

const TRANSLATION_NOTICE: &str = "Could not translate the text. The original speech was kept.";

fn to_response(id: &Uuid, p: &VoicePipeline) -> SessionResponse {
    SessionResponse {
        id: id.to_string(),
        state: p.state(),
        language: p.language(),
        description: p.description().to_string(),
        last_error: p.last_error().map(str::to_string),
    }
}

fn to_segment_response(id: &Uuid, state: VoiceState, outcome: SegmentOutcome) -> SegmentResponse {
    SegmentResponse {
        id: id.to_string(),
        state,
        notice: outcome.translation_failed.then(|| TRANSLATION_NOTICE.to_string()),
        description: outcome.description,
        translated: outcome.translated,
        translation_failed: outcome.translation_failed,
    }
}

fn pipeline_error(e: PipelineError) -> ApiError {
    let status = match e {
        PipelineError::AlreadyListening | PipelineError::NotListening => StatusCode::CONFLICT,
        PipelineError::UnsupportedLanguage(_) => StatusCode::BAD_REQUEST,
    };
    error_response(status, e.to_string())
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid session ID"))
}

async fn find_session(
    state: &AppState,
    id: &str,
) -> Result<(Uuid, std::sync::Arc<tokio::sync::Mutex<VoicePipeline>>), ApiError> {
    let uuid = parse_id(id)?;
    let session = state
        .voice_sessions
        .get(&uuid)
        .await
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Voice session not found"))?;
    Ok((uuid, session))
}

pub async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: SPEECH_LANGUAGES.to_vec(),
    })
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    if let Err(e) = payload.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let mut pipeline = VoicePipeline::new();
    pipeline
        .start_listening(&payload.description, &payload.language)
        .map_err(pipeline_error)?;

    let response_pipeline = pipeline.clone();
    let id = state.voice_sessions.insert(pipeline).await;
    info!(session_id = %id, language = %payload.language, "voice session started");

    Ok((StatusCode::CREATED, Json(to_response(&id, &response_pipeline))))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (uuid, session) = find_session(&state, &id).await?;
    let pipeline = session.lock().await;

    Ok(Json(to_response(&uuid, &pipeline)))
}

pub async fn start_listening(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let (uuid, session) = find_session(&state, &id).await?;
    let mut pipeline = session.lock().await;
    pipeline
        .start_listening(&payload.description, &payload.language)
        .map_err(pipeline_error)?;

    Ok(Json(to_response(&uuid, &pipeline)))
}

pub async fn stop_listening(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (uuid, session) = find_session(&state, &id).await?;
    let mut pipeline = session.lock().await;
    pipeline.stop();

    Ok(Json(to_response(&uuid, &pipeline)))
}

pub async fn push_segment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SegmentRequest>,
) -> Result<Json<SegmentResponse>, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let (uuid, session) = find_session(&state, &id).await?;
    let mut pipeline = session.lock().await;
    let outcome = pipeline
        .on_segment(state.model.as_ref(), &payload.text)
        .await
        .map_err(pipeline_error)?;

    Ok(Json(to_segment_response(&uuid, pipeline.state(), outcome)))
}

pub async fn push_audio(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<SegmentResponse>, ApiError> {
    let (uuid, session) = find_session(&state, &id).await?;

    let mut form = UploadForm::collect(multipart).await?;
    let file = form
        .take_file(&["file", "audio"])
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "No audio file provided"))?;
    let file_name = file.file_name.unwrap_or_else(|| "audio.webm".to_string());

    // Held across recognition too, so clips land in the order they arrive.
    let mut pipeline = session.lock().await;
    if pipeline.state() != VoiceState::Listening {
        return Err(pipeline_error(PipelineError::NotListening));
    }

    let segment = match state
        .recognizer
        .recognize(file.bytes, &file_name, pipeline.language().code)
        .await
    {
        Ok(segment) => segment,
        Err(e) => {
            pipeline.on_error(&e.to_string());
            return Err(error_response(
                StatusCode::BAD_GATEWAY,
                format!("Voice input error: {}", e),
            ));
        }
    };

    let outcome = pipeline
        .on_segment(state.model.as_ref(), &segment)
        .await
        .map_err(pipeline_error)?;

    Ok(Json(to_segment_response(&uuid, pipeline.state(), outcome)))
}

pub async fn report_error(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RecognitionErrorRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let (uuid, session) = find_session(&state, &id).await?;
    let mut pipeline = session.lock().await;
    pipeline.on_error(&payload.message);

    Ok(Json(to_response(&uuid, &pipeline)))
}

pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let uuid = parse_id(&id)?;
    let session = state
        .voice_sessions
        .remove(&uuid)
        .await
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Voice session not found"))?;

    let mut pipeline = session.lock().await;
    pipeline.stop();
    info!(session_id = %uuid, "voice session ended");

    Ok(Json(to_response(&uuid, &pipeline)))
}
