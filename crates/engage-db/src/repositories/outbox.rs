//! PostgreSQL implementation of OutboxRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use engage_core::entities::OutboxEntry;
use engage_core::traits::{OutboxRepository, RepoResult};
use engage_core::value_objects::{ChannelAccountId, OutboxEntryId, RuleId, TenantId};

use crate::models::OutboxEntryModel;

use super::error::{map_db_error, map_rows};

/// PostgreSQL implementation of OutboxRepository
#[derive(Clone)]
pub struct PgOutboxRepository {
    pool: PgPool,
}

impl PgOutboxRepository {
    /// Create a new PgOutboxRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OutboxRepository for PgOutboxRepository {
    #[instrument(skip(self, entry), fields(entry_id = %entry.id))]
    async fn create(&self, entry: &OutboxEntry) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO outbox_entries (id, tenant_id, channel, channel_account_id, destination,
                                        payload, status, rule_id, error_message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(entry.id.into_inner())
        .bind(entry.tenant_id.into_inner())
        .bind(entry.channel.as_str())
        .bind(entry.channel_account_id.map(ChannelAccountId::into_inner))
        .bind(&entry.destination)
        .bind(&entry.payload)
        .bind(entry.status.as_str())
        .bind(entry.rule_id.map(RuleId::into_inner))
        .bind(entry.error_message.as_deref())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: OutboxEntryId,
    ) -> RepoResult<Option<OutboxEntry>> {
        let result = sqlx::query_as::<_, OutboxEntryModel>(
            r#"
            SELECT id, tenant_id, channel, channel_account_id, destination, payload, status,
                   rule_id, error_message, created_at
            FROM outbox_entries
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(tenant_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(OutboxEntry::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_pending(&self, tenant_id: TenantId, limit: i64) -> RepoResult<Vec<OutboxEntry>> {
        let results = sqlx::query_as::<_, OutboxEntryModel>(
            r#"
            SELECT id, tenant_id, channel, channel_account_id, destination, payload, status,
                   rule_id, error_message, created_at
            FROM outbox_entries
            WHERE tenant_id = $1 AND status = 'PENDING'
            ORDER BY created_at ASC, id ASC
            LIMIT $2
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }
}
