use crate::error::Result;
use crate::models::chapter::Chapter;
use crate::models::subject::Subject;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Read access to chapter and subject metadata owned by the ingestion side.
#[async_trait]
pub trait ChapterCatalog: Send + Sync {
    async fn chapter(&self, id: Uuid) -> Result<Option<Chapter>>;
    async fn subject(&self, id: Uuid) -> Result<Option<Subject>>;
}

#[derive(Clone)]
pub struct PgChapterCatalog {
    pool: PgPool,
}

impl PgChapterCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChapterCatalog for PgChapterCatalog {
    async fn chapter(&self, id: Uuid) -> Result<Option<Chapter>> {
        let chapter = sqlx::query_as::<_, Chapter>(
            r#"SELECT id, subject_id, name, name_native, extracted_text FROM chapters WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(chapter)
    }

    async fn subject(&self, id: Uuid) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"SELECT id, name, name_native, medium FROM subjects WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(subject)
    }
}

/// In-process catalog for tests and local runs without a database.
#[derive(Default)]
pub struct MemoryCatalog {
    chapters: RwLock<HashMap<Uuid, Chapter>>,
    subjects: RwLock<HashMap<Uuid, Subject>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subject(&self, subject: Subject) {
        if let Ok(mut map) = self.subjects.write() {
            map.insert(subject.id, subject);
        }
    }

    pub fn add_chapter(&self, chapter: Chapter) {
        if let Ok(mut map) = self.chapters.write() {
            map.insert(chapter.id, chapter);
        }
    }
}

#[async_trait]
impl ChapterCatalog for MemoryCatalog {
    async fn chapter(&self, id: Uuid) -> Result<Option<Chapter>> {
        let map = self
            .chapters
            .read()
            .map_err(|_| crate::error::Error::Internal("catalog lock poisoned".to_string()))?;
        Ok(map.get(&id).cloned())
    }

    async fn subject(&self, id: Uuid) -> Result<Option<Subject>> {
        let map = self
            .subjects
            .read()
            .map_err(|_| crate::error::Error::Internal("catalog lock poisoned".to_string()))?;
        Ok(map.get(&id).cloned())
    }
}
