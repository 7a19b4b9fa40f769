use crate::error::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Decides whether a user may generate a quiz for a chapter.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    async fn may_generate(&self, user_id: Uuid, chapter_id: Uuid) -> Result<bool>;
}

/// Active admins and teachers may generate for any chapter.
#[derive(Clone)]
pub struct PgAccessPolicy {
    pool: PgPool,
}

impl PgAccessPolicy {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessPolicy for PgAccessPolicy {
    async fn may_generate(&self, user_id: Uuid, chapter_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE id = $1 AND is_active AND role IN ('admin', 'teacher')
            ) AS allowed
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        let allowed: bool = row.try_get("allowed")?;
        if !allowed {
            tracing::info!(%user_id, %chapter_id, "quiz generation refused by access policy");
        }
        Ok(allowed)
    }
}

/// Fixed answer, for tests and single-user deployments.
#[derive(Clone, Copy, Debug)]
pub struct StaticAccessPolicy(pub bool);

#[async_trait]
impl AccessPolicy for StaticAccessPolicy {
    async fn may_generate(&self, _user_id: Uuid, _chapter_id: Uuid) -> Result<bool> {
        Ok(self.0)
    }
}
