//! Inbound dispatcher
//!
//! Evaluates the tenant's rule set against one inbound chat message, records
//! the evaluation, queues the auto-reply and applies tag side effects.

use engage_core::entities::{
    Customer, IdentifierKey, InboundLog, OutboxEntry, TagAssignment,
};
use engage_core::matching::{evaluate, Evaluation};
use engage_core::value_objects::{
    Channel, InboundLogId, OutboxEntryId, RuleId, TagId, TenantId,
};
use engage_core::Rule;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::dto::{
    InboundMessageRequest, InboundResultResponse, PreviewMatchRequest, PreviewMatchResponse,
    TagFailureResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::input;

/// One tag association that could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagWriteError {
    pub tag_id: TagId,
    pub message: String,
}

/// Summary of one dispatched inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct InboundOutcome {
    pub log_id: InboundLogId,
    pub matched_rule_id: Option<RuleId>,
    pub matched_keywords: Vec<String>,
    pub label_matched_count: usize,
    pub outbox_entry_id: Option<OutboxEntryId>,
    pub assigned_tag_ids: Vec<TagId>,
    pub tag_failures: Vec<TagWriteError>,
}

impl InboundOutcome {
    /// A response rule was selected
    #[inline]
    pub fn is_matched(&self) -> bool {
        self.matched_rule_id.is_some()
    }
}

impl From<InboundOutcome> for InboundResultResponse {
    fn from(outcome: InboundOutcome) -> Self {
        Self {
            log_id: outcome.log_id.to_string(),
            matched: outcome.is_matched(),
            matched_rule_id: outcome.matched_rule_id.map(|id| id.to_string()),
            matched_keywords: outcome.matched_keywords,
            label_matched_count: outcome.label_matched_count,
            outbox_entry_id: outcome.outbox_entry_id.map(|id| id.to_string()),
            assigned_tag_ids: outcome
                .assigned_tag_ids
                .into_iter()
                .map(TagId::into_inner)
                .collect(),
            tag_failures: outcome
                .tag_failures
                .into_iter()
                .map(|f| TagFailureResponse {
                    tag_id: f.tag_id.into_inner(),
                    message: f.message,
                })
                .collect(),
        }
    }
}

/// Inbound dispatcher
pub struct InboundDispatcher<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InboundDispatcher<'a> {
    /// Create a new InboundDispatcher
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle one inbound message.
    ///
    /// "No match" is a successful outcome. Log and outbox writes propagate
    /// their errors; per-tag write errors are collected in the outcome.
    #[instrument(skip(self, request), fields(text_len = request.text.len()))]
    pub async fn handle_inbound(
        &self,
        tenant_id: TenantId,
        channel: Channel,
        request: InboundMessageRequest,
    ) -> ServiceResult<InboundOutcome> {
        let (channel_rules, global_rules) = self.load_rules(tenant_id, channel).await?;
        let evaluation = evaluate(&channel_rules, &global_rules, &request.text);

        let destination = request
            .destination
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        // Evaluation log
        let mut log = InboundLog::new(
            tenant_id,
            channel,
            request.text,
            request.metadata.unwrap_or_else(|| Value::Object(Default::default())),
            destination.clone(),
        );
        if let Some(m) = &evaluation.response {
            log = log.with_match(m.rule.id, m.keywords.clone());
        }
        self.ctx.inbound_log_repo().create(&log).await?;

        // Auto-reply
        let outbox_entry_id = match (&evaluation.response, destination.as_deref()) {
            (Some(m), Some(destination)) => {
                self.enqueue_reply(tenant_id, channel, m.rule, destination)
                    .await?
            }
            _ => None,
        };

        // Tag side effects
        let tag_ids = evaluation.tag_ids();
        let (assigned_tag_ids, tag_failures) = match destination.as_deref() {
            Some(destination) if !tag_ids.is_empty() => {
                self.apply_tags(tenant_id, channel, destination, tag_ids)
                    .await?
            }
            _ => (Vec::new(), Vec::new()),
        };

        let outcome = InboundOutcome {
            log_id: log.id,
            matched_rule_id: log.matched_rule_id,
            matched_keywords: log.matched_keywords,
            label_matched_count: evaluation.labels.len(),
            outbox_entry_id,
            assigned_tag_ids,
            tag_failures,
        };

        info!(
            log_id = %outcome.log_id,
            matched = outcome.is_matched(),
            labels = outcome.label_matched_count,
            tags = outcome.assigned_tag_ids.len(),
            tag_failures = outcome.tag_failures.len(),
            "Inbound message dispatched"
        );

        Ok(outcome)
    }

    /// Dispatch an inbound message arriving on the named channel
    pub async fn handle_request(
        &self,
        tenant_id: TenantId,
        channel: &str,
        request: InboundMessageRequest,
    ) -> ServiceResult<InboundResultResponse> {
        let channel = input::chat_channel(channel)?;
        let outcome = self.handle_inbound(tenant_id, channel, request).await?;
        Ok(outcome.into())
    }

    /// Evaluate the rule set without writing anything
    #[instrument(skip(self, request))]
    pub async fn preview_match(
        &self,
        tenant_id: TenantId,
        request: PreviewMatchRequest,
    ) -> ServiceResult<PreviewMatchResponse> {
        let channel = input::chat_channel(&request.channel)?;
        let (channel_rules, global_rules) = self.load_rules(tenant_id, channel).await?;
        let evaluation = evaluate(&channel_rules, &global_rules, &request.text);

        Ok(preview_response(&evaluation))
    }

    /// Active rules for the channel, plus the tenant's global label rules
    async fn load_rules(
        &self,
        tenant_id: TenantId,
        channel: Channel,
    ) -> ServiceResult<(Vec<Rule>, Vec<Rule>)> {
        let scope = channel.rule_scope().ok_or_else(|| {
            ServiceError::validation(format!("Inbound messages are not supported on {channel}"))
        })?;

        let channel_rules = self
            .ctx
            .rule_repo()
            .find_active_by_channel(tenant_id, scope)
            .await?;
        let global_rules = self.ctx.rule_repo().find_active_global_labels(tenant_id).await?;

        debug!(
            channel_rules = channel_rules.len(),
            global_rules = global_rules.len(),
            "Rules loaded"
        );

        Ok((channel_rules, global_rules))
    }

    /// Queue the rule's payload, if it has one worth sending
    async fn enqueue_reply(
        &self,
        tenant_id: TenantId,
        channel: Channel,
        rule: &Rule,
        destination: &str,
    ) -> ServiceResult<Option<OutboxEntryId>> {
        let Some(payload) = rule.outbound_payload() else {
            debug!(rule_id = %rule.id, "Matched rule has no payload to send");
            return Ok(None);
        };

        let account = self
            .ctx
            .channel_account_repo()
            .find_first_enabled(tenant_id, channel)
            .await?;

        let entry = OutboxEntry::pending(tenant_id, channel, destination.to_string(), payload.clone())
            .with_rule(rule.id)
            .with_account(account.map(|a| a.id));
        self.ctx.outbox_repo().create(&entry).await?;

        info!(outbox_entry_id = %entry.id, rule_id = %rule.id, "Auto-reply queued");

        Ok(Some(entry.id))
    }

    /// Attach tags to the sender's customer record.
    ///
    /// Returns the tags now present on the customer and the ones that failed.
    async fn apply_tags(
        &self,
        tenant_id: TenantId,
        channel: Channel,
        destination: &str,
        tag_ids: Vec<TagId>,
    ) -> ServiceResult<(Vec<TagId>, Vec<TagWriteError>)> {
        let Some(customer) = self.find_customer(tenant_id, channel, destination).await? else {
            debug!(%channel, "No customer for inbound sender; tags skipped");
            return Ok((Vec::new(), Vec::new()));
        };

        let mut assigned = Vec::with_capacity(tag_ids.len());
        let mut failures = Vec::new();
        for tag_id in tag_ids {
            match self
                .ctx
                .customer_tag_repo()
                .assign(tenant_id, customer.id, &tag_id)
                .await
            {
                Ok(TagAssignment::Created) => {
                    debug!(customer_id = %customer.id, tag_id = %tag_id, "Tag assigned");
                    assigned.push(tag_id);
                }
                Ok(TagAssignment::AlreadyPresent) => assigned.push(tag_id),
                Err(e) => {
                    warn!(customer_id = %customer.id, tag_id = %tag_id, error = %e, "Tag write failed");
                    failures.push(TagWriteError {
                        tag_id,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok((assigned, failures))
    }

    async fn find_customer(
        &self,
        tenant_id: TenantId,
        channel: Channel,
        destination: &str,
    ) -> ServiceResult<Option<Customer>> {
        let Some(key) = IdentifierKey::for_inbound(channel) else {
            return Ok(None);
        };
        Ok(self
            .ctx
            .customer_directory()
            .find_by_identifier(tenant_id, key, destination)
            .await?)
    }
}

fn preview_response(evaluation: &Evaluation<'_>) -> PreviewMatchResponse {
    PreviewMatchResponse {
        matched: evaluation.is_matched(),
        rule_id: evaluation.response.as_ref().map(|m| m.rule.id.to_string()),
        rule_name: evaluation.response.as_ref().map(|m| m.rule.name.clone()),
        matched_keywords: evaluation
            .response
            .as_ref()
            .map(|m| m.keywords.clone())
            .unwrap_or_default(),
        label_rule_ids: evaluation
            .labels
            .iter()
            .map(|m| m.rule.id.to_string())
            .collect(),
        tag_ids: evaluation
            .tag_ids()
            .into_iter()
            .map(TagId::into_inner)
            .collect(),
    }
}
