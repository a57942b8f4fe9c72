//! PostgreSQL access to the CRM customer directory and customer tags

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use engage_core::entities::{Customer, CustomerFilter, IdentifierKey, TagAssignment};
use engage_core::traits::{CustomerDirectory, CustomerTagRepository, RepoResult};
use engage_core::value_objects::{CustomerId, TagId, TenantId};

use crate::models::CustomerModel;

use super::error::{is_unique_violation, map_db_error};

/// PostgreSQL implementation of CustomerDirectory
#[derive(Clone)]
pub struct PgCustomerDirectory {
    pool: PgPool,
}

impl PgCustomerDirectory {
    /// Create a new PgCustomerDirectory
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerDirectory for PgCustomerDirectory {
    #[instrument(skip(self))]
    async fn find_by_identifier(
        &self,
        tenant_id: TenantId,
        key: IdentifierKey,
        value: &str,
    ) -> RepoResult<Option<Customer>> {
        let result = sqlx::query_as::<_, CustomerModel>(
            r#"
            SELECT id, tenant_id, customer_type, identifiers
            FROM customers
            WHERE tenant_id = $1 AND identifiers ->> $2 = $3
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(key.field_name())
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Customer::from))
    }

    #[instrument(skip(self))]
    async fn list_by_filter(
        &self,
        tenant_id: TenantId,
        filter: &CustomerFilter,
    ) -> RepoResult<Vec<Customer>> {
        let tag_ids: Vec<String> = filter
            .tag_ids
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();

        let results = sqlx::query_as::<_, CustomerModel>(
            r#"
            SELECT c.id, c.tenant_id, c.customer_type, c.identifiers
            FROM customers c
            WHERE c.tenant_id = $1
              AND ($2::TEXT IS NULL OR c.customer_type = $2)
              AND (cardinality($3::TEXT[]) = 0 OR EXISTS (
                    SELECT 1 FROM customer_tags t
                    WHERE t.tenant_id = c.tenant_id
                      AND t.customer_id = c.id
                      AND t.tag_id = ANY($3)
              ))
            ORDER BY c.created_at ASC, c.id ASC
            LIMIT $4
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(filter.customer_type.as_deref())
        .bind(&tag_ids)
        .bind(i64::try_from(filter.limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Customer::from).collect())
    }
}

/// PostgreSQL implementation of CustomerTagRepository
#[derive(Clone)]
pub struct PgCustomerTagRepository {
    pool: PgPool,
}

impl PgCustomerTagRepository {
    /// Create a new PgCustomerTagRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerTagRepository for PgCustomerTagRepository {
    #[instrument(skip(self))]
    async fn assign(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        tag_id: &TagId,
    ) -> RepoResult<TagAssignment> {
        let result = sqlx::query(
            r#"
            INSERT INTO customer_tags (tenant_id, customer_id, tag_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(tenant_id.into_inner())
        .bind(customer_id.into_inner())
        .bind(tag_id.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(TagAssignment::Created),
            // The unique constraint is the only guard against concurrent duplicates
            Err(e) if is_unique_violation(&e) => Ok(TagAssignment::AlreadyPresent),
            Err(e) => Err(map_db_error(e)),
        }
    }
}
