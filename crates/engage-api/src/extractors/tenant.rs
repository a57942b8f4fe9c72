//! Tenant extractor
//!
//! Every business route is scoped to the tenant named by the `X-Tenant-Id`
//! header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use engage_common::AppError;
use engage_core::value_objects::TenantId;

use crate::response::ApiError;

/// Header carrying the tenant id
pub const TENANT_ID_HEADER: &str = "x-tenant-id";

/// The calling tenant
#[derive(Debug, Clone, Copy)]
pub struct Tenant(pub TenantId);

impl Tenant {
    fn from_header(value: Option<&str>) -> Result<Self, ApiError> {
        let raw = value.map(str::trim).filter(|v| !v.is_empty());
        let raw = raw.ok_or(AppError::MissingTenant)?;
        raw.parse()
            .map(Tenant)
            .map_err(|_| AppError::InvalidTenant(raw.to_string()).into())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(TENANT_ID_HEADER)
            .map(|v| {
                v.to_str()
                    .map_err(|_| AppError::InvalidTenant("non-ASCII header".to_string()))
            })
            .transpose()?;

        Tenant::from_header(value)
    }
}
