use crate::models::language::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const OPTION_COUNT: usize = 4;
pub const MIN_QUESTIONS: usize = 10;
pub const TARGET_QUESTIONS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; OPTION_COUNT],
    #[serde(rename = "correctAnswer")]
    pub correct_answer: u8,
}

/// Stored quiz row. At most one exists per chapter.
#[derive(Debug, Clone, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub title: String,
    pub questions: Json<Vec<QuizQuestion>>,
    pub created_by: Uuid,
    pub generation_meta: JsonValue,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    TopicBased,
    ContentBased,
}

/// How an accepted quiz was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMeta {
    pub language: Language,
    pub strategy: StrategyKind,
    pub corrupted: bool,
    pub attempts: usize,
    pub seed: u32,
    pub question_types: Vec<String>,
    pub recovered_partial: bool,
    pub answer_distribution: [usize; OPTION_COUNT],
}

/// A validated quiz that has not been written yet.
#[derive(Debug, Clone)]
pub struct QuizDraft {
    pub chapter_id: Uuid,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
    pub created_by: Uuid,
    pub meta: GenerationMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizRecord {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub cached: bool,
}

impl QuizRecord {
    pub fn from_quiz(quiz: Quiz, cached: bool) -> Self {
        Self {
            id: quiz.id,
            chapter_id: quiz.chapter_id,
            title: quiz.title,
            questions: quiz.questions.0,
            created_by: quiz.created_by,
            created_at: quiz.created_at,
            cached,
        }
    }
}

/// Count of correct answers landing on each option index.
pub fn answer_distribution(questions: &[QuizQuestion]) -> [usize; OPTION_COUNT] {
    let mut counts = [0usize; OPTION_COUNT];
    for q in questions {
        if let Some(slot) = counts.get_mut(q.correct_answer as usize) {
            *slot += 1;
        }
    }
    counts
}

/// True when every correct answer sits on the same index.
pub fn is_degenerate(distribution: &[usize; OPTION_COUNT]) -> bool {
    distribution.iter().filter(|&&c| c > 0).count() <= 1
}
