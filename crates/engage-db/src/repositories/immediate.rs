//! PostgreSQL implementation of ImmediateRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use engage_core::entities::ImmediateMessage;
use engage_core::error::DomainError;
use engage_core::traits::{ImmediateRepository, Page, RepoResult};
use engage_core::value_objects::{BroadcastId, ChannelAccountId, ContentId, ImmediateId, TenantId};

use crate::mappers::audience_to_value;
use crate::models::ImmediateModel;

use super::error::{map_db_error, map_rows};

/// PostgreSQL implementation of ImmediateRepository
#[derive(Clone)]
pub struct PgImmediateRepository {
    pool: PgPool,
}

impl PgImmediateRepository {
    /// Create a new PgImmediateRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImmediateRepository for PgImmediateRepository {
    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: ImmediateId,
    ) -> RepoResult<Option<ImmediateMessage>> {
        let result = sqlx::query_as::<_, ImmediateModel>(
            r#"
            SELECT id, tenant_id, name, channel, channel_account_id, template_kind, template_id,
                   payload, audience, status, last_broadcast_id, created_at, updated_at
            FROM immediate_messages
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(tenant_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ImmediateMessage::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, tenant_id: TenantId, page: Page) -> RepoResult<Vec<ImmediateMessage>> {
        let results = sqlx::query_as::<_, ImmediateModel>(
            r#"
            SELECT id, tenant_id, name, channel, channel_account_id, template_kind, template_id,
                   payload, audience, status, last_broadcast_id, created_at, updated_at
            FROM immediate_messages
            WHERE tenant_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self, immediate), fields(immediate_id = %immediate.id))]
    async fn create(&self, immediate: &ImmediateMessage) -> RepoResult<()> {
        let audience = audience_to_value(&immediate.audience)?;

        sqlx::query(
            r#"
            INSERT INTO immediate_messages (id, tenant_id, name, channel, channel_account_id,
                                            template_kind, template_id, payload, audience, status,
                                            last_broadcast_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(immediate.id.into_inner())
        .bind(immediate.tenant_id.into_inner())
        .bind(&immediate.name)
        .bind(immediate.channel.as_str())
        .bind(immediate.channel_account_id.map(ChannelAccountId::into_inner))
        .bind(immediate.template_kind.as_str())
        .bind(immediate.template_id.map(ContentId::into_inner))
        .bind(immediate.payload.as_ref())
        .bind(&audience)
        .bind(immediate.status.as_str())
        .bind(immediate.last_broadcast_id.map(BroadcastId::into_inner))
        .bind(immediate.created_at)
        .bind(immediate.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, immediate), fields(immediate_id = %immediate.id))]
    async fn update(&self, immediate: &ImmediateMessage) -> RepoResult<()> {
        let audience = audience_to_value(&immediate.audience)?;

        let result = sqlx::query(
            r#"
            UPDATE immediate_messages
            SET name = $3, channel = $4, channel_account_id = $5, template_kind = $6,
                template_id = $7, payload = $8, audience = $9, status = $10,
                last_broadcast_id = $11, updated_at = $12
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(immediate.id.into_inner())
        .bind(immediate.tenant_id.into_inner())
        .bind(&immediate.name)
        .bind(immediate.channel.as_str())
        .bind(immediate.channel_account_id.map(ChannelAccountId::into_inner))
        .bind(immediate.template_kind.as_str())
        .bind(immediate.template_id.map(ContentId::into_inner))
        .bind(immediate.payload.as_ref())
        .bind(&audience)
        .bind(immediate.status.as_str())
        .bind(immediate.last_broadcast_id.map(BroadcastId::into_inner))
        .bind(immediate.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ImmediateNotFound(immediate.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, tenant_id: TenantId, id: ImmediateId) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM immediate_messages WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(tenant_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ImmediateNotFound(id));
        }

        Ok(())
    }
}
