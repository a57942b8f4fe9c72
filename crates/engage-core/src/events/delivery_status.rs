//! Delivery status event reported by the delivery worker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{DeliveryOutcome, DeliveryStatus};
use crate::error::DomainError;
use crate::value_objects::DeliveryId;

/// The worker finished (or gave up on) one delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatusUpdated {
    pub delivery_id: DeliveryId,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default = "Utc::now")]
    pub occurred_at: DateTime<Utc>,
}

impl DeliveryStatusUpdated {
    pub fn sent(delivery_id: DeliveryId) -> Self {
        Self {
            delivery_id,
            status: DeliveryStatus::Sent,
            error_message: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn failed(delivery_id: DeliveryId, error_message: Option<String>) -> Self {
        Self {
            delivery_id,
            status: DeliveryStatus::Failed,
            error_message,
            occurred_at: Utc::now(),
        }
    }

    /// Reported outcome; a worker can never report `QUEUED`
    pub fn outcome(&self) -> Result<DeliveryOutcome, DomainError> {
        match self.status {
            DeliveryStatus::Sent => Ok(DeliveryOutcome::Sent),
            DeliveryStatus::Failed => Ok(DeliveryOutcome::Failed {
                error_message: self.error_message.clone(),
            }),
            DeliveryStatus::Queued => Err(DomainError::ValidationError(
                "Delivery outcome must be SENT or FAILED".to_string(),
            )),
        }
    }
}
