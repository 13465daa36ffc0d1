//! Billing event recording
//!
//! Every inbound store notification and every internal subscription
//! transition ends up in the payment event log. Recording never judges the
//! payload: anything that arrives is kept.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TallyResult;
use crate::models::{PaymentEvent, SubscriptionId};
use crate::storage::Storage;

/// Service for the payment event log
pub struct BillingService<'a> {
    storage: &'a Storage,
}

impl<'a> BillingService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Append an event with a JSON payload
    ///
    /// Fails only when the log cannot be written.
    pub fn record_event(
        &self,
        event_name: &str,
        payload: Value,
        subscription_id: Option<SubscriptionId>,
    ) -> TallyResult<PaymentEvent> {
        let event = PaymentEvent::new(event_name, payload, subscription_id);
        self.append(event)
    }

    /// Append an event whose payload arrived as text
    ///
    /// Valid JSON is stored as parsed; anything else is stored as a JSON
    /// string holding the text unchanged.
    pub fn record_raw(
        &self,
        event_name: &str,
        raw: &str,
        subscription_id: Option<SubscriptionId>,
    ) -> TallyResult<PaymentEvent> {
        let payload = match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(event = event_name, error = %e, "billing payload is not JSON, storing as text");
                Value::String(raw.to_string())
            }
        };
        self.record_event(event_name, payload, subscription_id)
    }

    pub(crate) fn append(&self, event: PaymentEvent) -> TallyResult<PaymentEvent> {
        self.storage.payment_events.append(&event)?;

        debug!(event = %event.event_name, id = %event.id, "payment event recorded");
        Ok(event)
    }

    /// The last `count` events, oldest first
    pub fn recent(&self, count: usize) -> TallyResult<Vec<PaymentEvent>> {
        self.storage.payment_events.read_recent(count)
    }
}
