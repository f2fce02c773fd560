use axum::{
    Json,
    body::Bytes,
    extract::{
        Multipart, Query, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
};
use sani_core::{AnalysisReport, ProcessReport};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    #[serde(default)]
    pub service: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub filename: Option<String>,
}

struct UploadedFile {
    filename: Option<String>,
    content_type: String,
    bytes: Bytes,
}

/// First multipart field named `file`, if any.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await?;

        return Ok(Some(UploadedFile {
            filename,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// GET / - liveness
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "sani API is running!",
        "status": "healthy"
    }))
}

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// GET /api/docs - endpoint listing
pub async fn docs() -> Json<Value> {
    Json(json!({
        "name": "sani",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            { "method": "GET", "path": "/api/health", "description": "Health check" },
            { "method": "POST", "path": "/api/upload", "description": "Upload a file (multipart field 'file')" },
            { "method": "POST", "path": "/api/process", "description": "Detect and redact PII in an uploaded image ({\"filename\": ...})" },
            { "method": "GET", "path": "/processed/{file}", "description": "Download a redacted image" },
            { "method": "POST", "path": "/analyze/", "description": "Extract text from a document and sanitize it (optional ?service=)" }
        ]
    }))
}

/// POST /api/upload
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let Some(file) = read_file_field(&mut multipart).await? else {
        return Err(ApiError::BadRequest("No file provided".to_string()));
    };

    let filename = file.filename.unwrap_or_default();
    if filename.is_empty() {
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }

    if !state.config.is_allowed_upload(&filename) {
        return Err(ApiError::BadRequest(format!(
            "File type not allowed. Allowed: {}",
            state.config.server.allowed_extensions.join(", ")
        )));
    }

    let stored = state
        .pipeline
        .uploads()
        .save(&filename, &file.bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Upload failed: {}", e)))?;

    Ok(Json(json!({
        "message": "File uploaded successfully",
        "filename": stored.name,
    })))
}

/// POST /api/process
pub async fn process(
    State(state): State<AppState>,
    body: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessReport>, ApiError> {
    let filename = body
        .ok()
        .and_then(|Json(request)| request.filename)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Filename is required".to_string()))?;

    let report = state
        .pipeline
        .process_image(&filename)
        .await
        .map_err(ApiError::from_processing)?;

    Ok(Json(report))
}

/// POST /analyze/
pub async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let Some(file) = read_file_field(&mut multipart).await? else {
        return Err(ApiError::BadRequest("No file provided".to_string()));
    };

    let report = state
        .pipeline
        .analyze_document(
            file.bytes.to_vec(),
            &file.content_type,
            params.service.as_deref(),
        )
        .await;

    Ok(Json(AnalyzeResponse {
        report,
        filename: file.filename,
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}
