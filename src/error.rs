use crate::models::language::Language;
use crate::models::quiz::QuizDraft;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

const TRY_AGAIN: &str = "Quiz generation failed, please try again";

/// Why a single model response was rejected. Every variant is retryable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationDefect {
    #[error("response is not valid JSON and fewer than {min} questions could be recovered (got {recovered})")]
    Unparseable { recovered: usize, min: usize },

    #[error("response has no non-empty `questions` array")]
    MissingQuestions,

    #[error("only {kept} structurally valid questions, need at least {min}")]
    TooFewQuestions { kept: usize, min: usize },

    #[error("no {0:?} script characters in generated text")]
    MissingScript(Language),

    #[error("{count} Latin letters in Hindi output")]
    LatinLetters { count: usize },

    #[error("Latin letter ratio {ratio:.3} exceeds {limit:.2}")]
    LatinRatio { ratio: f64, limit: f64 },

    #[error("non-ASCII ratio {ratio:.3} exceeds {limit:.2}")]
    NonAsciiRatio { ratio: f64, limit: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Access denied for chapter {0}")]
    AccessDenied(uuid::Uuid),

    #[error("Chapter not found: {0}")]
    ChapterNotFound(uuid::Uuid),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Model call failed: {0}")]
    ModelCallFailed(String),

    #[error("Generation rejected after {attempts} attempts: {defect}")]
    GenerationValidationFailed {
        attempts: usize,
        defect: GenerationDefect,
    },

    #[error("Quiz was generated but could not be saved: {reason}")]
    PersistenceFailed {
        quiz: Box<QuizDraft>,
        reason: String,
    },

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::AccessDenied(_) => (StatusCode::FORBIDDEN, "forbidden".to_string()),
            Error::ChapterNotFound(id) => (StatusCode::NOT_FOUND, format!("Chapter {} not found", id)),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::ModelCallFailed(ref detail) => {
                tracing::error!(detail = %detail, "model call failed");
                (StatusCode::BAD_GATEWAY, TRY_AGAIN.to_string())
            }
            Error::GenerationValidationFailed { attempts, ref defect } => {
                tracing::error!(attempts, defect = %defect, "generation rejected");
                (StatusCode::BAD_GATEWAY, TRY_AGAIN.to_string())
            }
            Error::PersistenceFailed { ref reason, .. } => {
                tracing::error!(reason = %reason, "generated quiz was not persisted");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Quiz could not be saved, please try again".to_string(),
                )
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
