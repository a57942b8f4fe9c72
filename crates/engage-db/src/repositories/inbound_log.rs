//! PostgreSQL implementation of InboundLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use engage_core::entities::InboundLog;
use engage_core::traits::{InboundLogRepository, RepoResult};
use engage_core::value_objects::{InboundLogId, RuleId, TenantId};

use crate::models::InboundLogModel;

use super::error::map_db_error;

/// PostgreSQL implementation of InboundLogRepository
#[derive(Clone)]
pub struct PgInboundLogRepository {
    pool: PgPool,
}

impl PgInboundLogRepository {
    /// Create a new PgInboundLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InboundLogRepository for PgInboundLogRepository {
    #[instrument(skip(self, log), fields(log_id = %log.id))]
    async fn create(&self, log: &InboundLog) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO inbound_logs (id, tenant_id, channel, text, metadata, destination,
                                      matched_rule_id, matched_keywords, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(log.id.into_inner())
        .bind(log.tenant_id.into_inner())
        .bind(log.channel.as_str())
        .bind(&log.text)
        .bind(&log.metadata)
        .bind(log.destination.as_deref())
        .bind(log.matched_rule_id.map(RuleId::into_inner))
        .bind(&log.matched_keywords)
        .bind(log.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: InboundLogId,
    ) -> RepoResult<Option<InboundLog>> {
        let result = sqlx::query_as::<_, InboundLogModel>(
            r#"
            SELECT id, tenant_id, channel, text, metadata, destination, matched_rule_id,
                   matched_keywords, created_at
            FROM inbound_logs
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(tenant_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(InboundLog::try_from).transpose()
    }
}
