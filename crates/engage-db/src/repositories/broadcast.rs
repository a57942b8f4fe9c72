//! PostgreSQL implementation of BroadcastRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use engage_core::entities::{Broadcast, BroadcastStats, Delivery, DeliveryStatus};
use engage_core::error::DomainError;
use engage_core::traits::{BroadcastRepository, Page, RepoResult};
use engage_core::value_objects::{
    BroadcastId, CampaignId, ChannelAccountId, ContentId, DeliveryId, ImmediateId, TenantId,
};

use crate::mappers::delivery_count;
use crate::models::{BroadcastModel, DeliveryCountModel, DeliveryModel};

use super::error::{map_db_error, map_rows};

/// PostgreSQL implementation of BroadcastRepository
#[derive(Clone)]
pub struct PgBroadcastRepository {
    pool: PgPool,
}

impl PgBroadcastRepository {
    /// Create a new PgBroadcastRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BroadcastRepository for PgBroadcastRepository {
    #[instrument(skip(self, broadcast, deliveries), fields(broadcast_id = %broadcast.id, deliveries = deliveries.len()))]
    async fn create_with_deliveries(
        &self,
        broadcast: &Broadcast,
        deliveries: &[Delivery],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO broadcasts (id, tenant_id, channel, channel_account_id, template_kind,
                                    template_id, payload, stats_total, stats_queued, stats_sent,
                                    stats_failed, immediate_id, campaign_id, metadata,
                                    created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(broadcast.id.into_inner())
        .bind(broadcast.tenant_id.into_inner())
        .bind(broadcast.channel.as_str())
        .bind(broadcast.channel_account_id.map(ChannelAccountId::into_inner))
        .bind(broadcast.template_kind.as_str())
        .bind(broadcast.template_id.map(ContentId::into_inner))
        .bind(&broadcast.payload)
        .bind(broadcast.stats.total)
        .bind(broadcast.stats.queued)
        .bind(broadcast.stats.sent)
        .bind(broadcast.stats.failed)
        .bind(broadcast.immediate_id.map(ImmediateId::into_inner))
        .bind(broadcast.campaign_id.map(CampaignId::into_inner))
        .bind(&broadcast.metadata)
        .bind(broadcast.created_at)
        .bind(broadcast.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // Bulk insert through UNNEST; a row-per-VALUES insert would exceed the
        // bind parameter limit for large audiences.
        let ids: Vec<Uuid> = deliveries.iter().map(|d| d.id.into_inner()).collect();
        let destinations: Vec<String> = deliveries.iter().map(|d| d.destination.clone()).collect();

        let inserted = sqlx::query(
            r#"
            INSERT INTO deliveries (id, tenant_id, broadcast_id, destination, status,
                                    created_at, updated_at)
            SELECT d.id, $3, $4, d.destination, 'QUEUED', $5, $5
            FROM UNNEST($1::UUID[], $2::TEXT[]) AS d(id, destination)
            "#,
        )
        .bind(&ids)
        .bind(&destinations)
        .bind(broadcast.tenant_id.into_inner())
        .bind(broadcast.id.into_inner())
        .bind(broadcast.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if inserted != deliveries.len() as u64 {
            // Dropping the transaction rolls it back
            return Err(DomainError::InternalError(format!(
                "expected {} deliveries, inserted {inserted}",
                deliveries.len()
            )));
        }

        tx.commit().await.map_err(map_db_error)?;
        debug!(inserted, "Broadcast persisted");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: BroadcastId,
    ) -> RepoResult<Option<Broadcast>> {
        let result = sqlx::query_as::<_, BroadcastModel>(
            r#"
            SELECT id, tenant_id, channel, channel_account_id, template_kind, template_id,
                   payload, stats_total, stats_queued, stats_sent, stats_failed, immediate_id,
                   campaign_id, metadata, created_at, updated_at
            FROM broadcasts
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(tenant_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Broadcast::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, tenant_id: TenantId, page: Page) -> RepoResult<Vec<Broadcast>> {
        let results = sqlx::query_as::<_, BroadcastModel>(
            r#"
            SELECT id, tenant_id, channel, channel_account_id, template_kind, template_id,
                   payload, stats_total, stats_queued, stats_sent, stats_failed, immediate_id,
                   campaign_id, metadata, created_at, updated_at
            FROM broadcasts
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

    #[instrument(skip(self))]
    async fn list_deliveries(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
        status: Option<DeliveryStatus>,
        page: Page,
    ) -> RepoResult<Vec<Delivery>> {
        let results = sqlx::query_as::<_, DeliveryModel>(
            r#"
            SELECT id, tenant_id, broadcast_id, destination, status, error_message,
                   created_at, updated_at
            FROM deliveries
            WHERE tenant_id = $1 AND broadcast_id = $2 AND ($3::TEXT IS NULL OR status = $3)
            ORDER BY created_at ASC, id ASC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(broadcast_id.into_inner())
        .bind(status.map(DeliveryStatus::as_str))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self))]
    async fn find_delivery(
        &self,
        tenant_id: TenantId,
        id: DeliveryId,
    ) -> RepoResult<Option<Delivery>> {
        let result = sqlx::query_as::<_, DeliveryModel>(
            r#"
            SELECT id, tenant_id, broadcast_id, destination, status, error_message,
                   created_at, updated_at
            FROM deliveries
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(tenant_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Delivery::try_from).transpose()
    }

    #[instrument(skip(self, delivery), fields(delivery_id = %delivery.id, status = %delivery.status))]
    async fn update_delivery_if_queued(&self, delivery: &Delivery) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE deliveries
            SET status = $3, error_message = $4, updated_at = $5
            WHERE id = $1 AND tenant_id = $2 AND status = 'QUEUED'
            "#,
        )
        .bind(delivery.id.into_inner())
        .bind(delivery.tenant_id.into_inner())
        .bind(delivery.status.as_str())
        .bind(delivery.error_message.as_deref())
        .bind(delivery.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn count_deliveries_by_status(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
    ) -> RepoResult<Vec<(DeliveryStatus, i64)>> {
        let results = sqlx::query_as::<_, DeliveryCountModel>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM deliveries
            WHERE tenant_id = $1 AND broadcast_id = $2
            GROUP BY status
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(broadcast_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(delivery_count).collect()
    }

    #[instrument(skip(self))]
    async fn update_stats(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
        stats: &BroadcastStats,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE broadcasts
            SET stats_total = $3, stats_queued = $4, stats_sent = $5, stats_failed = $6,
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(broadcast_id.into_inner())
        .bind(tenant_id.into_inner())
        .bind(stats.total)
        .bind(stats.queued)
        .bind(stats.sent)
        .bind(stats.failed)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::BroadcastNotFound(broadcast_id));
        }

        Ok(())
    }
}
