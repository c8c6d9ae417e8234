use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bson::oid::ObjectId;
use tracing::info;

use crate::modules::document::{
    crud::DocumentCrud,
    model::DocumentRecord,
    schema::{DialogStateResponse, DocumentListResponse, DocumentResponse, VerifyDocumentResponse},
    verification::{DialogError, DialogState},
};
use crate::modules::upload::{UploadForm, UploadedFile};
use crate::modules::{error_response, ApiError, MessageResponse};
use crate::services::digest;
use crate::AppState;

const FILE_FIELDS: &[&str] = &["file", "document"];

fn to_response(d: &DocumentRecord) -> DocumentResponse {
    DocumentResponse {
        id: d.id_hex(),
        name: d.name.clone(),
        hash: d.hash.clone(),
        qr_code_url: d.qr_code_url.clone(),
        file_name: d.file_name.clone(),
        content_type: d.content_type.clone(),
        file_size: d.file_size,
        created_at: d.created_at_rfc3339(),
    }
}

fn parse_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid ID format"))
}

fn internal(e: mongodb::error::Error) -> ApiError {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn ensure_within_limit(state: &AppState, file: &UploadedFile) -> Result<(), ApiError> {
    if file.bytes.len() > state.settings.max_upload_bytes {
        return Err(error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Document exceeds {} bytes", state.settings.max_upload_bytes),
        ));
    }
    Ok(())
}

pub async fn register_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>), ApiError> {
    let mut form = UploadForm::collect(multipart).await?;

    let file = form
        .take_file(FILE_FIELDS)
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "No document file provided"))?;

    ensure_within_limit(&state, &file)?;

    let file_name = file.file_name.clone().unwrap_or_else(|| "document".to_string());
    let name = form.field("name").map(str::to_string).unwrap_or_else(|| file_name.clone());

    let record = DocumentRecord::new(
        name,
        digest::sha256_hex(&file.bytes),
        &state.settings.qr_base_url,
        file_name,
        file.content_type,
        file.bytes.len() as u64,
    );

    DocumentCrud::new(&state.db).create(&record).await.map_err(internal)?;
    info!(document_id = %record.id_hex(), hash = %record.hash, "document registered");

    Ok((StatusCode::CREATED, Json(to_response(&record))))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let oid = parse_id(&id)?;

    match DocumentCrud::new(&state.db).find_by_id(&oid).await {
        Ok(Some(d)) => Ok(Json(to_response(&d))),
        Ok(None) => Err(error_response(StatusCode::NOT_FOUND, "Document not found")),
        Err(e) => Err(internal(e)),
    }
}

pub async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentListResponse>, ApiError> {
    let crud = DocumentCrud::new(&state.db);

    let documents = crud.find_recent(50).await.map_err(internal)?;
    let total = crud.count().await.unwrap_or(0);

    Ok(Json(DocumentListResponse {
        data: documents.iter().map(to_response).collect(),
        total,
    }))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let oid = parse_id(&id)?;

    match DocumentCrud::new(&state.db).delete(&oid).await {
        Ok(true) => {
            state.verifications.close(&oid);
            Ok(Json(MessageResponse { message: "Deleted successfully".to_string() }))
        }
        Ok(false) => Err(error_response(StatusCode::NOT_FOUND, "Document not found")),
        Err(e) => Err(internal(e)),
    }
}

pub async fn verify_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<VerifyDocumentResponse>, ApiError> {
    let oid = parse_id(&id)?;

    // Without a selected file the dialog never leaves Idle.
    let mut form = UploadForm::collect(multipart).await?;
    let file = form
        .take_file(FILE_FIELDS)
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "No file selected for verification"))?;
    ensure_within_limit(&state, &file)?;

    let record = DocumentCrud::new(&state.db)
        .find_by_id(&oid)
        .await
        .map_err(internal)?
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Document not found"))?;

    let generation = state.verifications.begin(&oid).map_err(|e| match e {
        DialogError::AlreadyVerifying | DialogError::ResultShown => {
            error_response(StatusCode::CONFLICT, e.to_string())
        }
        DialogError::NotVerifying => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    })?;

    let file_digest = digest::sha256(&file.bytes);
    let status = match state.verifications.finish(&oid, &record.hash, &file_digest) {
        Ok(status) => status,
        Err(e) => {
            state.verifications.close(&oid);
            return Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };
    state.verifications.schedule_auto_close(&oid, generation);

    Ok(Json(VerifyDocumentResponse {
        document_id: oid.to_hex(),
        status,
        computed_hash: hex::encode(file_digest),
        expected_hash: record.hash,
    }))
}

pub async fn verification_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DialogStateResponse>, ApiError> {
    let oid = parse_id(&id)?;
    let dialog_state = state.verifications.state(&oid);

    Ok(Json(DialogStateResponse {
        document_id: oid.to_hex(),
        state: dialog_state,
    }))
}

pub async fn close_verification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DialogStateResponse>, ApiError> {
    let oid = parse_id(&id)?;
    state.verifications.close(&oid);

    Ok(Json(DialogStateResponse {
        document_id: oid.to_hex(),
        state: DialogState::Idle,
    }))
}
