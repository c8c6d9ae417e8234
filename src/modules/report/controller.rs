use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use validator::Validate;

use crate::modules::report::{
    crud::{AnomalyReportCrud, NewsReportCrud, ScamReportCrud},
    model::{AnomalyReport, EvidenceFile, NewsReport, ScamReport},
    schema::{
        parse_flag, AnomalyReportResponse, CreateAnomalyReportRequest, CreateNewsReportRequest,
        NewsReportResponse, ReportKind, ReportListResponse, ReportResponse, ScamReportForm,
        ScamReportResponse,
    },
};
use crate::modules::repository::{Record, Repository};
use crate::modules::upload::{UploadForm, UploadedFile};
use crate::modules::{error_response, ApiError};
use crate::services::digest;
use crate::AppState;

const LIST_LIMIT: i64 = 50;

fn internal(e: mongodb::error::Error) -> ApiError {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn id_hex(id: &Option<bson::oid::ObjectId>) -> String {
    id.map(|oid| oid.to_hex()).unwrap_or_default()
}

fn to_evidence(file: &UploadedFile) -> EvidenceFile {
    EvidenceFile {
        file_name: file.file_name.clone().unwrap_or_default(),
        content_type: file.content_type.clone().unwrap_or_default(),
        size: file.bytes.len() as u64,
        sha256: digest::sha256_hex(&file.bytes),
    }
}

fn scam_response(r: &ScamReport) -> ScamReportResponse {
    ScamReportResponse {
        id: id_hex(&r.id),
        description: r.description.clone(),
        is_anonymous: r.is_anonymous,
        evidence: r.evidence.clone(),
        created_at: r.created_at.to_rfc3339(),
    }
}

fn news_response(r: &NewsReport) -> NewsReportResponse {
    NewsReportResponse {
        id: id_hex(&r.id),
        content_type: r.content_type,
        description: r.description.clone(),
        created_at: r.created_at.to_rfc3339(),
    }
}

fn anomaly_response(r: &AnomalyReport) -> AnomalyReportResponse {
    AnomalyReportResponse {
        id: id_hex(&r.id),
        report_type: r.report_type,
        details: r.details.clone(),
        evidence: r.evidence.clone(),
        created_at: r.created_at.to_rfc3339(),
    }
}

pub async fn create_scam_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ScamReportResponse>), ApiError> {
    let mut upload = UploadForm::collect(multipart).await?;

    let form = ScamReportForm {
        description: upload.field("description").unwrap_or_default().to_string(),
        is_anonymous: parse_flag(upload.field("is_anonymous")),
        files: upload.take_files("files"),
    };
    if let Err(e) = form.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let evidence = form.files.as_deref().unwrap_or_default().iter().map(to_evidence).collect();
    let report = ScamReport::new(form.description, form.is_anonymous, evidence);

    ScamReportCrud::new(&state.db).create(&report).await.map_err(internal)?;
    info!(
        report_id = %id_hex(&report.id),
        evidence = report.evidence.len(),
        anonymous = report.is_anonymous,
        "scam report filed"
    );

    Ok((StatusCode::CREATED, Json(scam_response(&report))))
}

pub async fn create_news_report(
    State(state): State<AppState>,
    Json(payload): Json<CreateNewsReportRequest>,
) -> Result<(StatusCode, Json<NewsReportResponse>), ApiError> {
    if let Err(e) = payload.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let report = NewsReport::new(payload.content_type, payload.description);

    NewsReportCrud::new(&state.db).create(&report).await.map_err(internal)?;
    info!(report_id = %id_hex(&report.id), content_type = ?report.content_type, "fake news report filed");

    Ok((StatusCode::CREATED, Json(news_response(&report))))
}

pub async fn create_anomaly_report(
    State(state): State<AppState>,
    Json(payload): Json<CreateAnomalyReportRequest>,
) -> Result<(StatusCode, Json<AnomalyReportResponse>), ApiError> {
    if let Err(e) = payload.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let report = AnomalyReport::new(payload.report_type, payload.details, payload.evidence);

    AnomalyReportCrud::new(&state.db).create(&report).await.map_err(internal)?;
    info!(report_id = %id_hex(&report.id), report_type = ?report.report_type, "voting anomaly report filed");

    Ok((StatusCode::CREATED, Json(anomaly_response(&report))))
}

async fn list<T: Record>(
    state: &AppState,
    kind: ReportKind,
    convert: fn(&T) -> ReportResponse,
) -> Result<Json<ReportListResponse>, ApiError> {
    let crud = Repository::<T>::new(&state.db);

    let reports = crud.find_recent(LIST_LIMIT).await.map_err(internal)?;
    let total = crud.count().await.unwrap_or(0);

    Ok(Json(ReportListResponse {
        kind,
        data: reports.iter().map(convert).collect(),
        total,
    }))
}

pub async fn list_scam_reports(State(state): State<AppState>) -> Result<Json<ReportListResponse>, ApiError> {
    list::<ScamReport>(&state, ReportKind::Scam, |r| ReportResponse::Scam(scam_response(r))).await
}

pub async fn list_news_reports(State(state): State<AppState>) -> Result<Json<ReportListResponse>, ApiError> {
    list::<NewsReport>(&state, ReportKind::News, |r| ReportResponse::News(news_response(r))).await
}

pub async fn list_anomaly_reports(State(state): State<AppState>) -> Result<Json<ReportListResponse>, ApiError> {
    list::<AnomalyReport>(&state, ReportKind::Anomaly, |r| ReportResponse::Anomaly(anomaly_response(r))).await
}
