use serde::Serialize;

use super::verification::{DialogState, VerificationStatus};

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub name: String,
    pub hash: String,
    pub qr_code_url: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub file_size: u64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub data: Vec<DocumentResponse>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct VerifyDocumentResponse {
    pub document_id: String,
    pub status: VerificationStatus,
    pub computed_hash: String,
    pub expected_hash: String,
}

#[derive(Debug, Serialize)]
pub struct DialogStateResponse {
    pub document_id: String,
    pub state: DialogState,
}
