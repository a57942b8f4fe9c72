//! Rule entity <-> model mapper

use serde_json::Value;
use uuid::Uuid;

use engage_core::entities::{ContentKind, ResponseBinding, Rule, RuleMetadata};
use engage_core::error::DomainError;
use engage_core::value_objects::{ContentId, RuleId, TagId, TenantId};

use super::enums::{parse_match_type, parse_rule_channel, parse_rule_status, parse_template_kind};
use crate::models::RuleModel;

/// Convert RuleModel to Rule entity
impl TryFrom<RuleModel> for Rule {
    type Error = DomainError;

    fn try_from(model: RuleModel) -> Result<Self, Self::Error> {
        let kind = parse_template_kind(&model.response_kind)?;
        let response = match kind.content_kind() {
            None => ResponseBinding::Raw {
                payload: model.response_payload,
            },
            Some(content_kind) => {
                let template_id = match content_kind {
                    ContentKind::Line => model.line_content_id,
                    ContentKind::Messenger => model.messenger_content_id,
                    ContentKind::Email | ContentKind::Sms => None,
                }
                .ok_or_else(|| {
                    DomainError::DatabaseError(format!(
                        "rule {} has response kind {kind} without a template id",
                        model.id
                    ))
                })?;

                ResponseBinding::Content {
                    kind: content_kind,
                    template_id: ContentId::from_uuid(template_id),
                    snapshot: model.response_payload.unwrap_or(Value::Null),
                }
            }
        };

        Ok(Rule {
            id: RuleId::from_uuid(model.id),
            tenant_id: TenantId::from_uuid(model.tenant_id),
            channel: parse_rule_channel(&model.channel)?,
            name: model.name,
            status: parse_rule_status(&model.status),
            match_type: parse_match_type(&model.match_type)?,
            keywords: model.keywords,
            tag_ids: model.tag_ids.into_iter().map(TagId::from).collect(),
            response,
            metadata: RuleMetadata::from_value(model.metadata),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Column values for inserting or updating a rule
pub struct RuleInsert<'a> {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub channel: &'static str,
    pub name: &'a str,
    pub status: &'static str,
    pub match_type: &'static str,
    pub keywords: &'a [String],
    pub tag_ids: Vec<String>,
    pub response_kind: &'static str,
    pub line_content_id: Option<Uuid>,
    pub messenger_content_id: Option<Uuid>,
    pub response_payload: Option<&'a Value>,
    pub metadata: Value,
}

impl<'a> RuleInsert<'a> {
    pub fn new(rule: &'a Rule) -> Self {
        Self {
            id: rule.id.into_inner(),
            tenant_id: rule.tenant_id.into_inner(),
            channel: rule.channel.as_str(),
            name: &rule.name,
            status: rule.status.as_str(),
            match_type: rule.match_type.as_str(),
            keywords: &rule.keywords,
            tag_ids: rule.tag_ids.iter().map(|t| t.as_str().to_string()).collect(),
            response_kind: rule.response.kind().as_str(),
            line_content_id: rule.response.line_content_id().map(ContentId::into_inner),
            messenger_content_id: rule
                .response
                .messenger_content_id()
                .map(ContentId::into_inner),
            response_payload: rule.response.payload(),
            metadata: rule.metadata.to_value(),
        }
    }
}
