//! Axum route handlers for the document generation API.

use axum::{extract::State, Json};
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::{AppError, GenerationError};
use crate::generation::models::{
    present, CombinedResult, CoverLetterRequest, GenerateAllRequest, HrMessageRequest,
    ResumeRecord, ResumeRequest,
};
use crate::generation::pipeline::{
    generate_all, generate_cover_letter, generate_hr_message, generate_resume,
};
use crate::state::AppState;

const EMPTY_BODY: &str = "Request body is empty";
const RESUME_FAILED: &str = "Resume generation failed. Please try again.";
const COVER_LETTER_FAILED: &str = "Cover letter generation failed.";
const HR_MESSAGE_FAILED: &str = "HR message generation failed.";

// ────────────────────────────────────────────────────────────────────────────
// Response envelope
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            warnings: None,
        })
    }
}

/// Parses a JSON object body. Missing, unparseable, or `{}` bodies are all "empty";
/// required-field checks happen in the pipeline so they also guard non-HTTP callers.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => return Err(AppError::Validation(EMPTY_BODY.to_string())),
    }
    serde_json::from_value(value)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/resume
///
/// Rewrites the resume against the JD and returns the structured record.
/// Model-output problems come back as 422 with the diagnostic message.
pub async fn handle_resume(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<ResumeRecord>>, AppError> {
    let request: ResumeRequest = parse_body(&body)?;
    info!(
        "[/api/resume] resume={} chars | jd={} chars",
        request.resume_text.trim().chars().count(),
        request.jd_text.trim().chars().count()
    );

    let record = generate_resume(state.llm.as_ref(), &request)
        .await
        .map_err(|e| AppError::from_generation(e, RESUME_FAILED, true))?;

    Ok(ApiResponse::ok(record))
}

/// POST /api/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let request: CoverLetterRequest = parse_body(&body)?;
    info!(
        "[/api/cover-letter] company={:?} role={:?}",
        present(&request.company).unwrap_or_default(),
        present(&request.role).unwrap_or_default()
    );

    let letter = generate_cover_letter(state.llm.as_ref(), &request)
        .await
        .map_err(|e| AppError::from_generation(e, COVER_LETTER_FAILED, false))?;

    Ok(ApiResponse::ok(letter))
}

/// POST /api/hr-message
pub async fn handle_hr_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let request: HrMessageRequest = parse_body(&body)?;
    info!(
        "[/api/hr-message] recruiter={:?} company={:?}",
        present(&request.recruiter_name).unwrap_or_default(),
        present(&request.company).unwrap_or_default()
    );

    let message = generate_hr_message(state.llm.as_ref(), &request)
        .await
        .map_err(|e| AppError::from_generation(e, HR_MESSAGE_FAILED, false))?;

    Ok(ApiResponse::ok(message))
}

/// POST /api/generate-all
///
/// Resume + cover letter + HR message in one request. Succeeds whenever the
/// resume step does; dependent-step failures are listed in `warnings`.
pub async fn handle_generate_all(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<CombinedResult>>, AppError> {
    let request: GenerateAllRequest = parse_body(&body)?;
    info!("[/api/generate-all] Starting full generation pipeline");

    let mut result = generate_all(state.llm.as_ref(), &request)
        .await
        .map_err(resume_step_error)?;

    let warnings = std::mem::take(&mut result.warnings);
    Ok(Json(ApiResponse {
        success: true,
        data: result,
        warnings: Some(warnings),
    }))
}

/// Any resume-step failure in generate-all is a 500; model-output diagnostics
/// are echoed because they are already user-safe.
fn resume_step_error(err: GenerationError) -> AppError {
    match err {
        e @ GenerationError::Validation(_) => AppError::Validation(e.to_string()),
        e if e.is_model_output() => AppError::Generation {
            message: format!("Resume generation failed: {e}"),
            source: e,
        },
        source => AppError::Generation {
            message: RESUME_FAILED.to_string(),
            source,
        },
    }
}
