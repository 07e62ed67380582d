use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Number of characters of raw model output carried by `MalformedOutput`.
pub const EXCERPT_CHARS: usize = 200;

/// Failure of a single document pipeline (validate → prompt → complete → normalize).
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Missing required field: '{0}'")]
    Validation(&'static str),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("No JSON found in response. First 200 chars: {excerpt}")]
    MalformedOutput { excerpt: String },

    #[error("Resume JSON missing key: '{0}'")]
    MissingField(&'static str),
}

impl GenerationError {
    pub fn malformed(raw: &str) -> Self {
        GenerationError::MalformedOutput {
            excerpt: raw.chars().take(EXCERPT_CHARS).collect(),
        }
    }

    /// Model-output problems whose message is safe (and useful) to show the caller.
    pub fn is_model_output(&self) -> bool {
        matches!(
            self,
            GenerationError::MalformedOutput { .. } | GenerationError::MissingField(_)
        )
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// A pipeline failure reported to the caller as `message`; `source` stays server-side.
    #[error("{message}")]
    Generation {
        message: String,
        #[source]
        source: GenerationError,
    },
}

impl AppError {
    /// Maps a pipeline error for a single-document endpoint: validation → 400,
    /// model-output problems → 422 when `expose_model_output`, anything else → 500
    /// with the endpoint's generic message.
    pub fn from_generation(
        err: GenerationError,
        generic: &str,
        expose_model_output: bool,
    ) -> Self {
        match err {
            e @ GenerationError::Validation(_) => AppError::Validation(e.to_string()),
            e if expose_model_output && e.is_model_output() => {
                AppError::UnprocessableEntity(e.to_string())
            }
            source => AppError::Generation {
                message: generic.to_string(),
                source,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UnprocessableEntity(msg) => {
                tracing::warn!("Unprocessable model output: {msg}");
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::Generation { message, source } => {
                tracing::error!("Generation error: {source}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_excerpt_is_first_200_chars() {
        let raw = "é".repeat(500);
        match GenerationError::malformed(&raw) {
            GenerationError::MalformedOutput { excerpt } => {
                assert_eq!(excerpt.chars().count(), EXCERPT_CHARS);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::from_generation(
            GenerationError::Validation("jd_text"),
            "Resume generation failed. Please try again.",
            true,
        );
        assert!(matches!(&err, AppError::Validation(m) if m == "Missing required field: 'jd_text'"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_model_output_maps_to_422_only_when_exposed() {
        let exposed = AppError::from_generation(
            GenerationError::MissingField("skills"),
            "generic",
            true,
        );
        assert_eq!(
            exposed.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let hidden = AppError::from_generation(
            GenerationError::MissingField("skills"),
            "generic",
            false,
        );
        assert!(matches!(&hidden, AppError::Generation { message, .. } if message == "generic"));
        assert_eq!(
            hidden.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_llm_failure_hides_details() {
        let err = AppError::from_generation(
            GenerationError::Llm(LlmError::Api {
                status: 401,
                message: "Invalid API Key".to_string(),
            }),
            "Cover letter generation failed.",
            false,
        );
        assert_eq!(err.to_string(), "Cover letter generation failed.");
    }

    #[tokio::test]
    async fn test_every_variant_renders_failure_envelope() {
        let cases = [
            (AppError::Validation("bad".to_string()), StatusCode::BAD_REQUEST, "bad"),
            (
                AppError::UnprocessableEntity("Resume JSON missing key: 'name'".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "Resume JSON missing key: 'name'",
            ),
            (
                AppError::Generation {
                    message: "HR message generation failed.".to_string(),
                    source: GenerationError::Llm(LlmError::EmptyResponse),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "HR message generation failed.",
            ),
        ];

        for (err, status, message) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), status);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body, json!({"success": false, "error": message}));
        }
    }
}
