//! PRO entitlement resolution
//!
//! Answers "does this user have PRO right now?" from stored subscriptions.
//! The answer is computed at read time against the caller's clock; nothing
//! is written.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::TallyResult;
use crate::models::{Plan, Subscription, SubscriptionStatus, UserId};
use crate::storage::Storage;

/// Result of an entitlement check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entitlement {
    pub entitled: bool,
    /// Plan of the deciding subscription, if any
    pub plan: Option<Plan>,
    /// Expiration of the deciding subscription, if any
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entitlement {
    fn none() -> Self {
        Self {
            entitled: false,
            plan: None,
            expires_at: None,
        }
    }
}

/// Resolves PRO access
pub struct EntitlementResolver<'a> {
    storage: &'a Storage,
}

impl<'a> EntitlementResolver<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Decide `owner`'s access at `now`
    ///
    /// The most recently started active subscription whose window is open
    /// decides. Failing that, a canceled subscription still inside its paid
    /// window entitles. With no open window anywhere, the most recently
    /// started active or canceled subscription is reported as not entitling.
    pub fn check(&self, owner: &UserId, now: DateTime<Utc>) -> TallyResult<Entitlement> {
        let subscriptions = self.storage.subscriptions.list_for_owner(owner)?;

        let deciding = latest(
            subscriptions
                .iter()
                .filter(|s| s.is_currently_entitled(now)),
        )
        .or_else(|| latest(subscriptions.iter().filter(|s| s.grants_access(now))))
        .or_else(|| {
            latest(subscriptions.iter().filter(|s| {
                matches!(
                    s.status,
                    SubscriptionStatus::Active | SubscriptionStatus::Canceled
                )
            }))
        });

        let entitlement = match deciding {
            Some(sub) => decide(sub, now),
            None => Entitlement::none(),
        };

        debug!(
            owner = %owner,
            entitled = entitlement.entitled,
            expires_at = ?entitlement.expires_at,
            "entitlement resolved"
        );
        Ok(entitlement)
    }

    pub fn is_entitled(&self, owner: &UserId, now: DateTime<Utc>) -> TallyResult<bool> {
        Ok(self.check(owner, now)?.entitled)
    }
}

fn latest<'s>(subscriptions: impl Iterator<Item = &'s Subscription>) -> Option<&'s Subscription> {
    subscriptions.max_by(|a, b| {
        a.started_at
            .cmp(&b.started_at)
            .then_with(|| a.created_at.cmp(&b.created_at))
    })
}

fn decide(subscription: &Subscription, now: DateTime<Utc>) -> Entitlement {
    Entitlement {
        entitled: subscription.grants_access(now),
        plan: Some(subscription.plan),
        expires_at: subscription.expires_at,
    }
}
