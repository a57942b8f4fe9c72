//! Rule service
//!
//! Handles auto-reply rule creation, updates and queries.

use engage_core::entities::{
    normalize_keywords, MatchType, ResponseBinding, Rule, RuleKind, RuleMetadata, TemplateKind,
};
use engage_core::value_objects::{ContentId, RuleChannel, RuleId, TenantId};
use engage_core::DomainError;
use serde_json::Value;
use tracing::{info, instrument};

use crate::dto::{CreateRuleRequest, RuleResponse, UpdateRuleRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::input;
use super::template::TemplateResolver;

/// Rule service
pub struct RuleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RuleService<'a> {
    /// Create a new RuleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new rule
    #[instrument(skip(self, request))]
    pub async fn create_rule(
        &self,
        tenant_id: TenantId,
        request: CreateRuleRequest,
    ) -> ServiceResult<RuleResponse> {
        let channel = input::rule_channel(&request.channel)?;
        let name = input::name(&request.name)?;
        let match_type = match request.match_type.as_deref() {
            Some(m) => input::match_type(m)?,
            None => MatchType::default(),
        };
        let keywords = required_keywords(&request.keywords)?;
        let metadata = RuleMetadata::from_value(request.metadata.unwrap_or(Value::Null));
        ensure_scope(channel, &metadata)?;

        let kind = match request.response_kind.as_deref() {
            Some(k) => input::template_kind(k)?,
            None => TemplateKind::Raw,
        };
        let template_id = input::optional_id("templateId", request.template_id.as_deref())?;
        let response = self
            .bind_response(tenant_id, kind, template_id, request.payload)
            .await?;

        if self
            .ctx
            .rule_repo()
            .name_exists(tenant_id, channel, &name, None)
            .await?
        {
            return Err(DomainError::RuleNameExists.into());
        }

        let mut rule = Rule::new(tenant_id, channel, name, match_type, keywords, response);
        rule.tag_ids = input::tag_ids(&request.tag_ids);
        rule.metadata = metadata;
        if let Some(status) = request.status.as_deref() {
            rule.status = input::rule_status(status)?;
        }

        self.ctx.rule_repo().create(&rule).await?;

        info!(rule_id = %rule.id, channel = %rule.channel, "Rule created");

        Ok(RuleResponse::from(&rule))
    }

    /// Get rule by ID
    #[instrument(skip(self))]
    pub async fn get_rule(&self, tenant_id: TenantId, rule_id: RuleId) -> ServiceResult<RuleResponse> {
        let rule = self.get_rule_entity(tenant_id, rule_id).await?;
        Ok(RuleResponse::from(&rule))
    }

    /// Get rule entity by ID
    #[instrument(skip(self))]
    pub async fn get_rule_entity(&self, tenant_id: TenantId, rule_id: RuleId) -> ServiceResult<Rule> {
        self.ctx
            .rule_repo()
            .find_by_id(tenant_id, rule_id)
            .await?
            .ok_or_else(|| DomainError::RuleNotFound(rule_id).into())
    }

    /// List rules, optionally for one channel scope
    #[instrument(skip(self))]
    pub async fn list_rules(
        &self,
        tenant_id: TenantId,
        channel: Option<&str>,
    ) -> ServiceResult<Vec<RuleResponse>> {
        let channel = channel.map(input::rule_channel).transpose()?;
        let rules = self.ctx.rule_repo().list(tenant_id, channel).await?;
        Ok(rules.iter().map(RuleResponse::from).collect())
    }

    /// Partially update a rule.
    ///
    /// The payload snapshot is taken again whenever the response kind or the
    /// template id changes; an untouched content binding keeps its snapshot.
    #[instrument(skip(self, request))]
    pub async fn update_rule(
        &self,
        tenant_id: TenantId,
        rule_id: RuleId,
        request: UpdateRuleRequest,
    ) -> ServiceResult<RuleResponse> {
        let mut rule = self.get_rule_entity(tenant_id, rule_id).await?;
        let original_name = rule.name.clone();
        let original_channel = rule.channel;

        if let Some(name) = request.name.as_deref() {
            rule.set_name(input::name(name)?);
        }
        if let Some(channel) = request.channel.as_deref() {
            rule.set_channel(input::rule_channel(channel)?);
        }
        if let Some(status) = request.status.as_deref() {
            rule.set_status(input::rule_status(status)?);
        }
        if let Some(match_type) = request.match_type.as_deref() {
            rule.set_match_type(input::match_type(match_type)?);
        }
        if let Some(keywords) = request.keywords.as_deref() {
            rule.set_keywords(required_keywords(keywords)?);
        }
        if let Some(tag_ids) = request.tag_ids.as_deref() {
            rule.set_tag_ids(input::tag_ids(tag_ids));
        }
        if let Some(metadata) = request.metadata {
            rule.set_metadata(RuleMetadata::from_value(metadata));
        }
        ensure_scope(rule.channel, &rule.metadata)?;

        if request.response_kind.is_some()
            || request.template_id.is_some()
            || request.payload.is_some()
        {
            let kind = match request.response_kind.as_deref() {
                Some(k) => input::template_kind(k)?,
                None => rule.response.kind(),
            };
            let template_id = match request.template_id.as_deref() {
                Some(id) => input::optional_id("templateId", Some(id))?,
                None => rule.response.template_id(),
            };

            if kind != TemplateKind::Raw && request.payload.is_some() {
                return Err(payload_not_accepted());
            }

            let unchanged_content = kind != TemplateKind::Raw
                && kind == rule.response.kind()
                && template_id == rule.response.template_id();
            if !unchanged_content {
                let payload = match (kind, request.payload) {
                    (TemplateKind::Raw, Some(payload)) => Some(payload),
                    (TemplateKind::Raw, None) => match &rule.response {
                        ResponseBinding::Raw { payload } => payload.clone(),
                        ResponseBinding::Content { .. } => None,
                    },
                    (_, _) => None,
                };
                let response = self
                    .bind_response(tenant_id, kind, template_id, payload)
                    .await?;
                rule.set_response(response);
            }
        }

        if rule.name != original_name || rule.channel != original_channel {
            let exists = self
                .ctx
                .rule_repo()
                .name_exists(tenant_id, rule.channel, &rule.name, Some(rule.id))
                .await?;
            if exists {
                return Err(DomainError::RuleNameExists.into());
            }
        }

        self.ctx.rule_repo().update(&rule).await?;

        info!(rule_id = %rule.id, "Rule updated");

        Ok(RuleResponse::from(&rule))
    }

    /// Delete a rule
    #[instrument(skip(self))]
    pub async fn delete_rule(&self, tenant_id: TenantId, rule_id: RuleId) -> ServiceResult<()> {
        self.ctx.rule_repo().delete(tenant_id, rule_id).await?;

        info!(rule_id = %rule_id, "Rule deleted");

        Ok(())
    }

    /// Build a response binding, snapshotting content kinds
    async fn bind_response(
        &self,
        tenant_id: TenantId,
        kind: TemplateKind,
        template_id: Option<ContentId>,
        payload: Option<Value>,
    ) -> ServiceResult<ResponseBinding> {
        if !kind.is_rule_response() {
            return Err(ServiceError::validation(format!(
                "Rules cannot respond with {kind} templates"
            )));
        }

        let Some(content_kind) = kind.content_kind() else {
            return Ok(ResponseBinding::Raw { payload });
        };
        if payload.is_some() {
            return Err(payload_not_accepted());
        }

        let template_id = template_id.ok_or_else(|| {
            ServiceError::validation(format!("templateId is required for {kind} responses"))
        })?;
        let snapshot = TemplateResolver::new(self.ctx)
            .snapshot(tenant_id, content_kind, template_id)
            .await?;

        Ok(ResponseBinding::Content {
            kind: content_kind,
            template_id,
            snapshot,
        })
    }
}

fn required_keywords(keywords: &[String]) -> ServiceResult<Vec<String>> {
    let keywords = normalize_keywords(keywords);
    if keywords.is_empty() {
        return Err(DomainError::EmptyKeywords.into());
    }
    Ok(keywords)
}

fn payload_not_accepted() -> ServiceError {
    ServiceError::validation("payload is only accepted for RAW responses")
}

/// The ALL scope is reserved for label-keyword rules
fn ensure_scope(channel: RuleChannel, metadata: &RuleMetadata) -> ServiceResult<()> {
    if channel.is_global() && metadata.kind != Some(RuleKind::LabelKeywords) {
        return Err(ServiceError::validation(
            "The ALL channel is only allowed for LABEL_KEYWORDS rules",
        ));
    }
    Ok(())
}
