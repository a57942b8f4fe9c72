//! PostgreSQL implementation of RuleRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use engage_core::entities::Rule;
use engage_core::error::DomainError;
use engage_core::traits::{RepoResult, RuleRepository};
use engage_core::value_objects::{RuleChannel, RuleId, TenantId};

use crate::mappers::RuleInsert;
use crate::models::RuleModel;

use super::error::{map_db_error, map_rows, map_unique_violation};

/// PostgreSQL implementation of RuleRepository
#[derive(Clone)]
pub struct PgRuleRepository {
    pool: PgPool,
}

impl PgRuleRepository {
    /// Create a new PgRuleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleRepository for PgRuleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, tenant_id: TenantId, id: RuleId) -> RepoResult<Option<Rule>> {
        let result = sqlx::query_as::<_, RuleModel>(
            r#"
            SELECT id, tenant_id, channel, name, status, match_type, keywords, tag_ids,
                   response_kind, line_content_id, messenger_content_id, response_payload,
                   metadata, created_at, updated_at
            FROM auto_reply_rules
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(tenant_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Rule::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        tenant_id: TenantId,
        channel: Option<RuleChannel>,
    ) -> RepoResult<Vec<Rule>> {
        let results = sqlx::query_as::<_, RuleModel>(
            r#"
            SELECT id, tenant_id, channel, name, status, match_type, keywords, tag_ids,
                   response_kind, line_content_id, messenger_content_id, response_payload,
                   metadata, created_at, updated_at
            FROM auto_reply_rules
            WHERE tenant_id = $1 AND ($2::TEXT IS NULL OR channel = $2)
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(channel.map(RuleChannel::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self))]
    async fn find_active_by_channel(
        &self,
        tenant_id: TenantId,
        channel: RuleChannel,
    ) -> RepoResult<Vec<Rule>> {
        let results = sqlx::query_as::<_, RuleModel>(
            r#"
            SELECT id, tenant_id, channel, name, status, match_type, keywords, tag_ids,
                   response_kind, line_content_id, messenger_content_id, response_payload,
                   metadata, created_at, updated_at
            FROM auto_reply_rules
            WHERE tenant_id = $1 AND channel = $2 AND status = 'ACTIVE'
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(channel.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self))]
    async fn find_active_global_labels(&self, tenant_id: TenantId) -> RepoResult<Vec<Rule>> {
        let results = sqlx::query_as::<_, RuleModel>(
            r#"
            SELECT id, tenant_id, channel, name, status, match_type, keywords, tag_ids,
                   response_kind, line_content_id, messenger_content_id, response_payload,
                   metadata, created_at, updated_at
            FROM auto_reply_rules
            WHERE tenant_id = $1 AND channel = 'ALL' AND status = 'ACTIVE'
              AND metadata ->> 'kind' = 'LABEL_KEYWORDS'
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .bind(tenant_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self))]
    async fn name_exists(
        &self,
        tenant_id: TenantId,
        channel: RuleChannel,
        name: &str,
        exclude: Option<RuleId>,
    ) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM auto_reply_rules
                WHERE tenant_id = $1 AND channel = $2 AND name = $3
                  AND ($4::UUID IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(channel.as_str())
        .bind(name)
        .bind(exclude.map(RuleId::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self, rule), fields(rule_id = %rule.id))]
    async fn create(&self, rule: &Rule) -> RepoResult<()> {
        let insert = RuleInsert::new(rule);

        sqlx::query(
            r#"
            INSERT INTO auto_reply_rules (id, tenant_id, channel, name, status, match_type,
                                          keywords, tag_ids, response_kind, line_content_id,
                                          messenger_content_id, response_payload, metadata,
                                          created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(insert.id)
        .bind(insert.tenant_id)
        .bind(insert.channel)
        .bind(insert.name)
        .bind(insert.status)
        .bind(insert.match_type)
        .bind(insert.keywords)
        .bind(&insert.tag_ids)
        .bind(insert.response_kind)
        .bind(insert.line_content_id)
        .bind(insert.messenger_content_id)
        .bind(insert.response_payload)
        .bind(&insert.metadata)
        .bind(rule.created_at)
        .bind(rule.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::RuleNameExists))?;

        Ok(())
    }

    #[instrument(skip(self, rule), fields(rule_id = %rule.id))]
    async fn update(&self, rule: &Rule) -> RepoResult<()> {
        let update = RuleInsert::new(rule);

        let result = sqlx::query(
            r#"
            UPDATE auto_reply_rules
            SET channel = $3, name = $4, status = $5, match_type = $6, keywords = $7,
                tag_ids = $8, response_kind = $9, line_content_id = $10,
                messenger_content_id = $11, response_payload = $12, metadata = $13,
                updated_at = $14
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(update.id)
        .bind(update.tenant_id)
        .bind(update.channel)
        .bind(update.name)
        .bind(update.status)
        .bind(update.match_type)
        .bind(update.keywords)
        .bind(&update.tag_ids)
        .bind(update.response_kind)
        .bind(update.line_content_id)
        .bind(update.messenger_content_id)
        .bind(update.response_payload)
        .bind(&update.metadata)
        .bind(rule.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::RuleNameExists))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RuleNotFound(rule.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, tenant_id: TenantId, id: RuleId) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM auto_reply_rules WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(tenant_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RuleNotFound(id));
        }

        Ok(())
    }
}
