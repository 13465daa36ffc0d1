//! Subscription service
//!
//! Drives the PRO subscription lifecycle: purchase intents, verified
//! purchases, and cancellation. Verification is idempotent on the purchase
//! token: replaying a token returns the subscription it already produced.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::BillingSettings;
use crate::error::{TallyError, TallyResult};
use crate::models::payment_event::events;
use crate::models::{
    PaymentEvent, Plan, Subscription, SubscriptionId, SubscriptionStatus, UserId,
};
use crate::storage::Storage;

use super::billing::BillingService;

/// Service for subscription management
pub struct SubscriptionService<'a> {
    storage: &'a Storage,
    billing: &'a BillingSettings,
}

/// A purchase the store has confirmed
#[derive(Debug, Clone)]
pub struct PurchaseVerification {
    pub purchase_token: String,
    /// Falls back to the configured product for the plan
    pub product_id: Option<String>,
    pub plan: Plan,
    pub order_id: Option<String>,
    /// Anchors the paid window
    pub verified_at: DateTime<Utc>,
}

/// Result of a verification
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub subscription: Subscription,
    /// The token had already been processed; nothing changed
    pub replayed: bool,
}

impl<'a> SubscriptionService<'a> {
    pub fn new(storage: &'a Storage, billing: &'a BillingSettings) -> Self {
        Self { storage, billing }
    }

    /// Record that `owner` started buying `plan`
    #[tracing::instrument(skip_all, fields(owner = %owner, plan = %plan))]
    pub fn create_intent(
        &self,
        owner: &UserId,
        plan: Plan,
        product_id: Option<String>,
    ) -> TallyResult<Subscription> {
        let product_id = product_id.unwrap_or_else(|| self.billing.product_id(plan).to_string());
        let subscription = Subscription::pending(owner.clone(), plan, product_id);

        self.storage.subscriptions.insert_unique(subscription.clone())?;
        self.storage.subscriptions.save()?;
        self.audit(events::SUBSCRIPTION_PENDING, &subscription)?;

        info!(subscription = %subscription.id, "purchase intent recorded");
        Ok(subscription)
    }

    /// Activate PRO access for a verified purchase
    ///
    /// The first call for a token activates the owner's latest pending
    /// subscription of the same plan, or creates an active one. Later calls
    /// with the same token change nothing and report `replayed`. A token
    /// already bound to another user is a conflict.
    #[tracing::instrument(skip_all, fields(owner = %owner, plan = %purchase.plan))]
    pub fn verify_purchase(
        &self,
        owner: &UserId,
        purchase: PurchaseVerification,
    ) -> TallyResult<PurchaseOutcome> {
        let token = purchase.purchase_token.trim().to_string();
        if token.is_empty() {
            return Err(TallyError::InvalidInput(
                "purchase token cannot be empty".into(),
            ));
        }

        let _commit = self.storage.commit()?;

        if let Some(existing) = self.storage.subscriptions.find_by_token(&token)? {
            return self.replay(owner, existing);
        }

        let mut subscription = match self.latest_pending(owner, purchase.plan)? {
            Some(pending) => pending,
            None => Subscription::pending(
                owner.clone(),
                purchase.plan,
                self.billing.product_id(purchase.plan),
            ),
        };
        if let Some(product_id) = purchase.product_id {
            subscription.product_id = product_id;
        }
        subscription.activate(
            token.clone(),
            purchase.order_id,
            purchase.verified_at,
            self.billing.duration(purchase.plan),
        )?;

        match self.storage.subscriptions.insert_unique(subscription.clone()) {
            Ok(()) => {}
            Err(e) if e.is_conflict() => {
                // Lost a race on the token; the winner's row is authoritative
                let existing = self
                    .storage
                    .subscriptions
                    .find_by_token(&token)?
                    .ok_or(e)?;
                return self.replay(owner, existing);
            }
            Err(e) => return Err(e),
        }
        self.storage.subscriptions.save()?;
        self.audit(events::PURCHASE_VERIFIED, &subscription)?;

        info!(
            subscription = %subscription.id,
            expires_at = ?subscription.expires_at,
            "purchase verified"
        );
        Ok(PurchaseOutcome {
            subscription,
            replayed: false,
        })
    }

    fn replay(&self, owner: &UserId, existing: Subscription) -> TallyResult<PurchaseOutcome> {
        if &existing.owner != owner {
            warn!(subscription = %existing.id, "purchase token belongs to another user");
            return Err(TallyError::Conflict {
                entity_type: "Purchase token",
                identifier: "already used by another account".into(),
            });
        }

        self.audit(events::PURCHASE_REPLAYED, &existing)?;
        info!(subscription = %existing.id, "purchase already processed");
        Ok(PurchaseOutcome {
            subscription: existing,
            replayed: true,
        })
    }

    fn latest_pending(&self, owner: &UserId, plan: Plan) -> TallyResult<Option<Subscription>> {
        Ok(self
            .storage
            .subscriptions
            .list_for_owner(owner)?
            .into_iter()
            .find(|s| s.status == SubscriptionStatus::Pending && s.plan == plan))
    }

    /// Cancel one of `owner`'s active subscriptions at `now`
    ///
    /// Access continues until the current expiration.
    #[tracing::instrument(skip_all, fields(owner = %owner, subscription = %id))]
    pub fn cancel(
        &self,
        owner: &UserId,
        id: SubscriptionId,
        now: DateTime<Utc>,
    ) -> TallyResult<Subscription> {
        let _commit = self.storage.commit()?;

        let mut subscription = self.get(owner, id)?;
        subscription.cancel(now)?;

        self.storage.subscriptions.insert_unique(subscription.clone())?;
        self.storage.subscriptions.save()?;
        self.audit(events::SUBSCRIPTION_CANCELED, &subscription)?;

        info!(expires_at = ?subscription.expires_at, "subscription canceled");
        Ok(subscription)
    }

    pub fn get(&self, owner: &UserId, id: SubscriptionId) -> TallyResult<Subscription> {
        self.storage
            .subscriptions
            .get(id)?
            .filter(|s| &s.owner == owner)
            .ok_or_else(|| TallyError::subscription_not_found(id.to_string()))
    }

    /// Find by full or short ID
    pub fn find(&self, owner: &UserId, identifier: &str) -> TallyResult<Subscription> {
        self.list(owner)?
            .into_iter()
            .find(|s| s.id.matches(identifier))
            .ok_or_else(|| TallyError::subscription_not_found(identifier))
    }

    /// `owner`'s subscriptions, newest first
    pub fn list(&self, owner: &UserId) -> TallyResult<Vec<Subscription>> {
        self.storage.subscriptions.list_for_owner(owner)
    }

    fn audit(&self, event_name: &str, subscription: &Subscription) -> TallyResult<()> {
        BillingService::new(self.storage).append(PaymentEvent::snapshot(
            event_name,
            subscription,
            Some(subscription.id),
        ))?;
        Ok(())
    }
}
