//! Rule entity - keyword-triggered auto-reply and tagging rule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::content::{is_empty_payload, ContentKind, TemplateKind};
use crate::value_objects::{ContentId, RuleChannel, RuleId, TagId, TenantId};

/// Metadata key holding the rule kind discriminator
pub const RULE_KIND_KEY: &str = "kind";

/// Rule status; only active rules are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    #[default]
    Active,
    Inactive,
}

impl RuleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "INACTIVE" => Some(Self::Inactive),
            _ => None,
        }
    }

    /// Anything other than `ACTIVE` is treated as inactive
    pub fn from_str_lossy(s: &str) -> Self {
        if s.eq_ignore_ascii_case("ACTIVE") {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// Keyword comparison mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    #[default]
    Contains,
    Equals,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "CONTAINS",
            Self::Equals => "EQUALS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONTAINS" => Some(Self::Contains),
            "EQUALS" => Some(Self::Equals),
            _ => None,
        }
    }
}

/// Rule kind discriminator stored in the metadata bag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    /// Global tagging rule, never produces a reply
    LabelKeywords,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LabelKeywords => "LABEL_KEYWORDS",
        }
    }
}

/// Free-form rule metadata with a typed `kind`
///
/// Unknown keys are preserved untouched. An unrecognised `kind` value is kept
/// in `extra` so it round-trips, but the rule is then treated as a plain
/// auto-reply rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleMetadata {
    pub kind: Option<RuleKind>,
    pub extra: Map<String, Value>,
}

impl RuleMetadata {
    pub fn label_keywords() -> Self {
        Self {
            kind: Some(RuleKind::LabelKeywords),
            extra: Map::new(),
        }
    }

    /// Build from an untyped JSON bag (non-objects yield empty metadata)
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut extra) = value else {
            return Self::default();
        };

        let kind = match extra.get(RULE_KIND_KEY).and_then(Value::as_str) {
            Some(k) if k.eq_ignore_ascii_case(RuleKind::LabelKeywords.as_str()) => {
                extra.remove(RULE_KIND_KEY);
                Some(RuleKind::LabelKeywords)
            }
            _ => None,
        };

        Self { kind, extra }
    }

    /// Flatten back into a JSON object
    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        if let Some(kind) = self.kind {
            map.insert(RULE_KIND_KEY.to_string(), Value::String(kind.as_str().to_string()));
        }
        Value::Object(map)
    }
}

/// What a rule answers with when it is selected as the response
///
/// Content bindings carry the payload copied from the content object when the
/// rule was last saved; it is never re-read at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBinding {
    Raw {
        payload: Option<Value>,
    },
    Content {
        kind: ContentKind,
        template_id: ContentId,
        snapshot: Value,
    },
}

impl ResponseBinding {
    pub fn raw(payload: Value) -> Self {
        Self::Raw {
            payload: Some(payload),
        }
    }

    pub fn kind(&self) -> TemplateKind {
        match self {
            Self::Raw { .. } => TemplateKind::Raw,
            Self::Content { kind, .. } => TemplateKind::from(*kind),
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Raw { payload } => payload.as_ref(),
            Self::Content { snapshot, .. } => Some(snapshot),
        }
    }

    pub fn template_id(&self) -> Option<ContentId> {
        match self {
            Self::Raw { .. } => None,
            Self::Content { template_id, .. } => Some(*template_id),
        }
    }

    /// Template id when bound to the LINE content store
    pub fn line_content_id(&self) -> Option<ContentId> {
        match self {
            Self::Content {
                kind: ContentKind::Line,
                template_id,
                ..
            } => Some(*template_id),
            _ => None,
        }
    }

    /// Template id when bound to the Messenger content store
    pub fn messenger_content_id(&self) -> Option<ContentId> {
        match self {
            Self::Content {
                kind: ContentKind::Messenger,
                template_id,
                ..
            } => Some(*template_id),
            _ => None,
        }
    }
}

impl Default for ResponseBinding {
    fn default() -> Self {
        Self::Raw { payload: None }
    }
}

/// Rule entity
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: RuleId,
    pub tenant_id: TenantId,
    pub channel: RuleChannel,
    pub name: String,
    pub status: RuleStatus,
    pub match_type: MatchType,
    pub keywords: Vec<String>,
    pub tag_ids: Vec<TagId>,
    pub response: ResponseBinding,
    pub metadata: RuleMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    /// Create a new active rule
    pub fn new(
        tenant_id: TenantId,
        channel: RuleChannel,
        name: String,
        match_type: MatchType,
        keywords: Vec<String>,
        response: ResponseBinding,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RuleId::new(),
            tenant_id,
            channel,
            name,
            status: RuleStatus::Active,
            match_type,
            keywords,
            tag_ids: Vec::new(),
            response,
            metadata: RuleMetadata::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == RuleStatus::Active
    }

    /// Label-keyword rules only tag; they are never chosen as the reply
    #[inline]
    pub fn is_label_rule(&self) -> bool {
        self.metadata.kind == Some(RuleKind::LabelKeywords)
    }

    /// Payload to queue when this rule answers an inbound message
    pub fn outbound_payload(&self) -> Option<&Value> {
        if self.is_label_rule() {
            return None;
        }
        self.response.payload().filter(|p| !is_empty_payload(p))
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.touch();
    }

    pub fn set_channel(&mut self, channel: RuleChannel) {
        self.channel = channel;
        self.touch();
    }

    pub fn set_status(&mut self, status: RuleStatus) {
        self.status = status;
        self.touch();
    }

    pub fn set_match_type(&mut self, match_type: MatchType) {
        self.match_type = match_type;
        self.touch();
    }

    pub fn set_keywords(&mut self, keywords: Vec<String>) {
        self.keywords = keywords;
        self.touch();
    }

    pub fn set_tag_ids(&mut self, tag_ids: Vec<TagId>) {
        self.tag_ids = tag_ids;
        self.touch();
    }

    /// Replace the response binding; the old template id goes with it
    pub fn set_response(&mut self, response: ResponseBinding) {
        self.response = response;
        self.touch();
    }

    pub fn set_metadata(&mut self, metadata: RuleMetadata) {
        self.metadata = metadata;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Evaluation order: most recently updated first, ties broken by id descending
pub fn by_precedence(a: &Rule, b: &Rule) -> Ordering {
    b.updated_at
        .cmp(&a.updated_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Trim keywords and drop the empty ones, keeping order and duplicates
pub fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
