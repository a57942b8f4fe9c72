//! PostgreSQL implementation of ContentStore

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use engage_core::entities::{ContentKind, ContentObject};
use engage_core::traits::{ContentStore, HealthCheck, RepoResult};
use engage_core::value_objects::{ContentId, TenantId};

use crate::mappers::{content_from_model, content_table};
use crate::models::ContentModel;

use super::error::map_db_error;

/// Reads the per-channel content tables
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    /// Create a new PgContentStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        kind: ContentKind,
        id: ContentId,
    ) -> RepoResult<Option<ContentObject>> {
        // Table name comes from a closed enum, never from input
        let sql = format!(
            "SELECT id, tenant_id, name, content, updated_at FROM {} WHERE id = $1 AND tenant_id = $2",
            content_table(kind)
        );

        let result = sqlx::query_as::<_, ContentModel>(&sql)
            .bind(id.into_inner())
            .bind(tenant_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(|m| content_from_model(m, kind)))
    }
}

/// Liveness probe over the connection pool
#[derive(Clone)]
pub struct PgHealthCheck {
    pool: PgPool,
}

impl PgHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgHealthCheck {
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
