//! Payment event log entry
//!
//! One inbound billing notification or internal subscription transition,
//! stored exactly as received.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{PaymentEventId, SubscriptionId};

/// Event names the crate itself emits
pub mod events {
    pub const SUBSCRIPTION_PENDING: &str = "subscription.pending";
    pub const PURCHASE_VERIFIED: &str = "purchase.verified";
    pub const PURCHASE_REPLAYED: &str = "purchase.replayed";
    pub const SUBSCRIPTION_CANCELED: &str = "subscription.canceled";
}

/// A single entry of the append-only payment event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub id: PaymentEventId,

    /// The subscription this event concerns, when known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub subscription_id: Option<SubscriptionId>,

    /// Event name, free-form for inbound events
    pub event_name: String,

    /// Payload, verbatim
    pub payload: serde_json::Value,

    pub received_at: DateTime<Utc>,
}

impl PaymentEvent {
    pub fn new(
        event_name: impl Into<String>,
        payload: serde_json::Value,
        subscription_id: Option<SubscriptionId>,
    ) -> Self {
        Self {
            id: PaymentEventId::new(),
            subscription_id,
            event_name: event_name.into(),
            payload,
            received_at: Utc::now(),
        }
    }

    /// Build an event whose payload is a JSON snapshot of `entity`
    pub fn snapshot<T: Serialize>(
        event_name: impl Into<String>,
        entity: &T,
        subscription_id: Option<SubscriptionId>,
    ) -> Self {
        let payload = serde_json::to_value(entity).unwrap_or(serde_json::Value::Null);
        Self::new(event_name, payload, subscription_id)
    }
}

impl fmt::Display for PaymentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.received_at.format("%Y-%m-%d %H:%M:%S"),
            self.event_name
        )
    }
}
