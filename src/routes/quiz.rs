use crate::{
    dto::quiz_dto::GenerateQuizPayload,
    error::{Error, Result},
    services::quiz_service::{GenerateQuiz, GenerationOptions},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Path(chapter_id): Path<Uuid>,
    Json(payload): Json<GenerateQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let timeout = payload
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| state.quiz_service.default_timeout());

    // Dropping this future on client disconnect aborts the model call.
    let quiz = state
        .quiz_service
        .generate_quiz(
            GenerateQuiz {
                chapter_id,
                requested_by: payload.requested_by,
                regenerate: payload.regenerate,
            },
            GenerationOptions::new(timeout),
        )
        .await?;

    let status = if quiz.cached {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(quiz)))
}

pub async fn get_quiz(
    State(state): State<AppState>,
    Path(chapter_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quiz = state
        .quiz_service
        .get_quiz(chapter_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No quiz for chapter {}", chapter_id)))?;
    Ok(Json(quiz))
}
