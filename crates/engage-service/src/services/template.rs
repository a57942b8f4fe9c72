//! Template resolver
//!
//! Turns a RAW payload or a content-store reference into a payload snapshot.

use engage_core::entities::{is_empty_payload, ContentKind, ResolvedTemplate, TemplateKind};
use engage_core::value_objects::{ContentId, TenantId};
use engage_core::DomainError;
use serde_json::Value;
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Template resolver
pub struct TemplateResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TemplateResolver<'a> {
    /// Create a new TemplateResolver
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve a send template.
    ///
    /// RAW uses the caller payload as-is and drops any template id. Content
    /// kinds require a template id and copy the stored content.
    #[instrument(skip(self, payload))]
    pub async fn resolve(
        &self,
        tenant_id: TenantId,
        kind: TemplateKind,
        template_id: Option<ContentId>,
        payload: Option<Value>,
    ) -> ServiceResult<ResolvedTemplate> {
        let Some(content_kind) = kind.content_kind() else {
            let payload = payload
                .filter(|p| !is_empty_payload(p))
                .ok_or_else(|| ServiceError::validation("payload is required for RAW templates"))?;
            return Ok(ResolvedTemplate {
                kind,
                template_id: None,
                payload,
            });
        };

        let template_id = template_id.ok_or_else(|| {
            ServiceError::validation(format!("templateId is required for {kind} templates"))
        })?;
        let payload = self.snapshot(tenant_id, content_kind, template_id).await?;

        Ok(ResolvedTemplate {
            kind,
            template_id: Some(template_id),
            payload,
        })
    }

    /// Copy of the `content` field of one tenant-owned content object
    #[instrument(skip(self))]
    pub async fn snapshot(
        &self,
        tenant_id: TenantId,
        kind: ContentKind,
        template_id: ContentId,
    ) -> ServiceResult<Value> {
        let content = self
            .ctx
            .content_store()
            .find_by_id(tenant_id, kind, template_id)
            .await?
            .ok_or(DomainError::ContentNotFound {
                kind,
                id: template_id,
            })?;

        debug!(%template_id, %kind, name = %content.name, "Template resolved");
        Ok(content.content)
    }
}
