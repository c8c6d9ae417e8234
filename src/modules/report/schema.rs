use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::flows::not_blank;
use crate::modules::report::model::{AnomalyKind, EvidenceFile, NewsContentType};
use crate::modules::upload::UploadedFile;

pub const MAX_EVIDENCE_BYTES: usize = 10 * 1024 * 1024;

pub const ALLOWED_EVIDENCE_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/webp", "video/mp4", "video/quicktime"];

fn evidence_error(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("files");
    error.message = Some(message.into());
    error
}

fn validate_evidence(files: &[UploadedFile]) -> Result<(), ValidationError> {
    if files.is_empty() {
        return Err(evidence_error("At least one file is required."));
    }

    if files.iter().any(|f| f.bytes.len() > MAX_EVIDENCE_BYTES) {
        return Err(evidence_error("Max file size is 10MB."));
    }

    let allowed = |f: &UploadedFile| {
        f.content_type
            .as_deref()
            .is_some_and(|ct| ALLOWED_EVIDENCE_TYPES.contains(&ct))
    };
    if !files.iter().all(allowed) {
        return Err(evidence_error("Only .jpg, .png, .webp, .mp4, and .mov files are accepted."));
    }

    Ok(())
}

fn validate_form_evidence(form: &ScamReportForm) -> Result<(), ValidationError> {
    match form.files.as_deref() {
        Some(files) => validate_evidence(files),
        None => Ok(()),
    }
}

/// Multipart scam report after collection. `files` is `None` when the form
/// carried no `files` part at all.
#[derive(Debug, Validate)]
#[validate(schema(function = "validate_form_evidence"))]
pub struct ScamReportForm {
    #[validate(length(min = 20, message = "Please provide a detailed description of the scam."))]
    pub description: String,
    pub is_anonymous: bool,
    pub files: Option<Vec<UploadedFile>>,
}

pub fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "on" | "1" | "yes")
    )
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNewsReportRequest {
    pub content_type: NewsContentType,
    #[validate(length(min = 20, message = "Please provide a detailed description."))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnomalyReportRequest {
    pub report_type: AnomalyKind,
    #[validate(length(min = 20, message = "Please provide more details."))]
    pub details: String,
    #[validate(custom(function = "not_blank"))]
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Scam,
    News,
    Anomaly,
}

#[derive(Debug, Serialize)]
pub struct ScamReportResponse {
    pub id: String,
    pub description: String,
    pub is_anonymous: bool,
    pub evidence: Vec<EvidenceFile>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct NewsReportResponse {
    pub id: String,
    pub content_type: NewsContentType,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct AnomalyReportResponse {
    pub id: String,
    pub report_type: AnomalyKind,
    pub details: String,
    pub evidence: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReportResponse {
    Scam(ScamReportResponse),
    News(NewsReportResponse),
    Anomaly(AnomalyReportResponse),
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub kind: ReportKind,
    pub data: Vec<ReportResponse>,
    pub total: u64,
}
