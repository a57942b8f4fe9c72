//! Audience specification and destination list rules

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::DomainError;
use crate::value_objects::TagId;

/// Upper bound on destinations for a single broadcast, and on filter candidates
pub const MAX_AUDIENCE_SIZE: usize = 20_000;

/// How an audience is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudienceMode {
    Manual,
    Filter,
}

impl AudienceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::Filter => "FILTER",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MANUAL" => Ok(Self::Manual),
            "FILTER" => Ok(Self::Filter),
            _ => Err(DomainError::InvalidAudienceMode(s.to_string())),
        }
    }
}

/// Audience as supplied by a caller
///
/// `mode` stays a plain string so an unknown mode surfaces as a validation
/// error at resolution time instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceSpec {
    pub mode: String,
    #[serde(default)]
    pub destinations: Vec<String>,
    #[serde(default)]
    pub customer_type: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

impl AudienceSpec {
    pub fn manual(destinations: Vec<String>) -> Self {
        Self {
            mode: AudienceMode::Manual.as_str().to_string(),
            destinations,
            ..Default::default()
        }
    }

    pub fn filter(customer_type: Option<String>, tag_ids: Vec<TagId>) -> Self {
        Self {
            mode: AudienceMode::Filter.as_str().to_string(),
            customer_type,
            tag_ids,
            ..Default::default()
        }
    }

    pub fn parsed_mode(&self) -> Result<AudienceMode, DomainError> {
        AudienceMode::parse(&self.mode)
    }
}

/// Trim, drop empties and remove case-insensitive duplicates.
///
/// The first occurrence wins, keeping its original casing and position.
pub fn dedup_destinations<I, S>(destinations: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in destinations {
        let d = raw.as_ref().trim();
        if d.is_empty() {
            continue;
        }
        if seen.insert(d.to_lowercase()) {
            out.push(d.to_string());
        }
    }
    out
}

/// A send needs at least one and at most [`MAX_AUDIENCE_SIZE`] destinations
pub fn ensure_sendable(count: usize) -> Result<(), DomainError> {
    if count == 0 {
        return Err(DomainError::NoDestinations);
    }
    ensure_within_limit(count)
}

pub fn ensure_within_limit(count: usize) -> Result<(), DomainError> {
    if count > MAX_AUDIENCE_SIZE {
        return Err(DomainError::TooManyDestinations {
            max: MAX_AUDIENCE_SIZE,
            actual: count,
        });
    }
    Ok(())
}
