//! Audience resolver
//!
//! Turns a manual destination list or a customer filter into a deduplicated,
//! bounded list of channel destinations.

use engage_core::audience::{dedup_destinations, ensure_within_limit};
use engage_core::entities::{CustomerFilter, IdentifierKey};
use engage_core::value_objects::{Channel, TenantId};
use engage_core::{AudienceMode, AudienceSpec, MAX_AUDIENCE_SIZE};
use tracing::{debug, instrument};

use crate::dto::{AudienceEstimateResponse, EstimateAudienceRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::input;

/// Number of destinations returned by an estimate
pub const ESTIMATE_SAMPLE_SIZE: usize = 10;

/// Audience resolver
pub struct AudienceResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AudienceResolver<'a> {
    /// Create a new AudienceResolver
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve destinations for `channel`.
    ///
    /// The result may be empty; callers that send enforce the lower bound.
    #[instrument(skip(self, audience), fields(mode = %audience.mode))]
    pub async fn resolve(
        &self,
        tenant_id: TenantId,
        channel: Channel,
        audience: &AudienceSpec,
    ) -> ServiceResult<Vec<String>> {
        let destinations = match audience.parsed_mode()? {
            AudienceMode::Manual => dedup_destinations(&audience.destinations),
            AudienceMode::Filter => {
                let filter = CustomerFilter {
                    customer_type: audience
                        .customer_type
                        .as_deref()
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string),
                    tag_ids: audience
                        .tag_ids
                        .iter()
                        .filter(|t| !t.is_blank())
                        .cloned()
                        .collect(),
                    limit: MAX_AUDIENCE_SIZE,
                };
                let customers = self
                    .ctx
                    .customer_directory()
                    .list_by_filter(tenant_id, &filter)
                    .await?;

                let key = IdentifierKey::for_audience(channel);
                dedup_destinations(customers.iter().filter_map(|c| c.identifier(key)))
            }
        };

        ensure_within_limit(destinations.len())?;

        debug!(count = destinations.len(), %channel, "Audience resolved");

        Ok(destinations)
    }

    /// Count an audience and return the first few destinations
    #[instrument(skip(self, request))]
    pub async fn estimate(
        &self,
        tenant_id: TenantId,
        request: EstimateAudienceRequest,
    ) -> ServiceResult<AudienceEstimateResponse> {
        let channel = input::channel(&request.channel)?;
        let destinations = self.resolve(tenant_id, channel, &request.audience).await?;

        Ok(AudienceEstimateResponse {
            count: destinations.len(),
            sample: destinations.into_iter().take(ESTIMATE_SAMPLE_SIZE).collect(),
        })
    }
}
