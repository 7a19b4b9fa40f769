use crate::error::{Error, Result};
use crate::models::quiz::{Quiz, QuizDraft};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Storage for the current quiz of each chapter.
#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn find_by_chapter(&self, chapter_id: Uuid) -> Result<Option<Quiz>>;

    async fn delete_for_chapter(&self, chapter_id: Uuid) -> Result<u64>;

    /// Writes `draft` as the chapter's only quiz. Any row written in the
    /// meantime by a concurrent regenerate is replaced.
    async fn insert(&self, draft: &QuizDraft) -> Result<Quiz>;
}

const QUIZ_COLUMNS: &str =
    "id, chapter_id, title, questions, created_by, generation_meta, created_at";

#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn find_by_chapter(&self, chapter_id: Uuid) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {} FROM quizzes WHERE chapter_id = $1 ORDER BY created_at DESC LIMIT 1",
            QUIZ_COLUMNS
        ))
        .bind(chapter_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quiz)
    }

    async fn delete_for_chapter(&self, chapter_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM quizzes WHERE chapter_id = $1")
            .bind(chapter_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert(&self, draft: &QuizDraft) -> Result<Quiz> {
        let meta = serde_json::to_value(&draft.meta)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
            .bind(draft.chapter_id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM quizzes WHERE chapter_id = $1")
            .bind(draft.chapter_id)
            .execute(&mut *tx)
            .await?;

        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            r#"
            INSERT INTO quizzes (id, chapter_id, title, questions, created_by, generation_meta)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            QUIZ_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(draft.chapter_id)
        .bind(&draft.title)
        .bind(Json(&draft.questions))
        .bind(draft.created_by)
        .bind(meta)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(quiz)
    }
}

/// In-process store for tests and local runs without a database.
#[derive(Default)]
pub struct MemoryQuizStore {
    quizzes: Mutex<HashMap<Uuid, Quiz>>,
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Quiz>>> {
        self.quizzes
            .lock()
            .map_err(|_| Error::Internal("quiz store lock poisoned".to_string()))
    }
}

#[async_trait]
impl QuizStore for MemoryQuizStore {
    async fn find_by_chapter(&self, chapter_id: Uuid) -> Result<Option<Quiz>> {
        Ok(self.lock()?.get(&chapter_id).cloned())
    }

    async fn delete_for_chapter(&self, chapter_id: Uuid) -> Result<u64> {
        Ok(self.lock()?.remove(&chapter_id).map_or(0, |_| 1))
    }

    async fn insert(&self, draft: &QuizDraft) -> Result<Quiz> {
        let quiz = Quiz {
            id: Uuid::new_v4(),
            chapter_id: draft.chapter_id,
            title: draft.title.clone(),
            questions: Json(draft.questions.clone()),
            created_by: draft.created_by,
            generation_meta: serde_json::to_value(&draft.meta)?,
            created_at: Utc::now(),
        };
        self.lock()?.insert(draft.chapter_id, quiz.clone());
        Ok(quiz)
    }
}
