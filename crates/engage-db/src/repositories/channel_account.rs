//! PostgreSQL implementation of ChannelAccountRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use engage_core::entities::ChannelAccount;
use engage_core::error::DomainError;
use engage_core::traits::{ChannelAccountRepository, RepoResult};
use engage_core::value_objects::{Channel, ChannelAccountId, TenantId};

use crate::models::ChannelAccountModel;

use super::error::{map_db_error, map_rows, map_unique_violation};

/// PostgreSQL implementation of ChannelAccountRepository
#[derive(Clone)]
pub struct PgChannelAccountRepository {
    pool: PgPool,
}

impl PgChannelAccountRepository {
    /// Create a new PgChannelAccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelAccountRepository for PgChannelAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: ChannelAccountId,
    ) -> RepoResult<Option<ChannelAccount>> {
        let result = sqlx::query_as::<_, ChannelAccountModel>(
            r#"
            SELECT id, tenant_id, channel, name, credentials, enabled, created_at, updated_at
            FROM channel_accounts
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(tenant_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ChannelAccount::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        tenant_id: TenantId,
        channel: Option<Channel>,
    ) -> RepoResult<Vec<ChannelAccount>> {
        let results = sqlx::query_as::<_, ChannelAccountModel>(
            r#"
            SELECT id, tenant_id, channel, name, credentials, enabled, created_at, updated_at
            FROM channel_accounts
            WHERE tenant_id = $1 AND ($2::TEXT IS NULL OR channel = $2)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(channel.map(Channel::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self))]
    async fn find_first_enabled(
        &self,
        tenant_id: TenantId,
        channel: Channel,
    ) -> RepoResult<Option<ChannelAccount>> {
        let result = sqlx::query_as::<_, ChannelAccountModel>(
            r#"
            SELECT id, tenant_id, channel, name, credentials, enabled, created_at, updated_at
            FROM channel_accounts
            WHERE tenant_id = $1 AND channel = $2 AND enabled = TRUE
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(channel.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ChannelAccount::try_from).transpose()
    }

    #[instrument(skip(self, account), fields(account_id = %account.id))]
    async fn create(&self, account: &ChannelAccount) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO channel_accounts (id, tenant_id, channel, name, credentials, enabled,
                                          created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id.into_inner())
        .bind(account.tenant_id.into_inner())
        .bind(account.channel.as_str())
        .bind(&account.name)
        .bind(&account.credentials)
        .bind(account.enabled)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ChannelAccountNameExists))?;

        Ok(())
    }

    #[instrument(skip(self, account), fields(account_id = %account.id))]
    async fn update(&self, account: &ChannelAccount) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE channel_accounts
            SET name = $3, credentials = $4, enabled = $5, updated_at = $6
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(account.id.into_inner())
        .bind(account.tenant_id.into_inner())
        .bind(&account.name)
        .bind(&account.credentials)
        .bind(account.enabled)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ChannelAccountNameExists))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ChannelAccountNotFound(account.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, tenant_id: TenantId, id: ChannelAccountId) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM channel_accounts WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(tenant_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ChannelAccountNotFound(id));
        }

        Ok(())
    }
}
