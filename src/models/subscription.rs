//! Subscription model
//!
//! A subscription is one purchase of PRO access. Its lifecycle is
//! `pending -> active -> {canceled, expired}`. Only a verified purchase
//! activates it, only the owner cancels it, and expiry is never written:
//! it is reported at read time by [`Subscription::effective_status`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{SubscriptionId, UserId};
use crate::error::{TallyError, TallyResult};

/// Billing period of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Yearly,
}

impl Plan {
    /// Accepts the store's plan names as well as the English ones
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "mensal" | "month" => Some(Self::Monthly),
            "yearly" | "annual" | "anual" | "year" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Length of one billing period when settings do not override it
    pub fn default_duration_days(&self) -> i64 {
        match self {
            Self::Monthly => 30,
            Self::Yearly => 365,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "Monthly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

/// Stored state of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Purchase intent recorded, not yet verified
    #[default]
    Pending,
    /// Verified and paid for
    Active,
    /// Canceled by the owner; access runs until expiration
    Canceled,
    /// Past its expiration; only ever reported, never stored by this crate
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's PRO subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier
    pub id: SubscriptionId,

    /// The subscriber
    pub owner: UserId,

    /// Billing period
    pub plan: Plan,

    /// Last stored status
    pub status: SubscriptionStatus,

    /// Store purchase token; globally unique when present
    #[serde(default)]
    pub purchase_token: Option<String>,

    /// Store product identifier
    #[serde(default)]
    pub product_id: String,

    /// Store order identifier
    #[serde(default)]
    pub order_id: Option<String>,

    /// Start of the paid window, set on activation
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    /// End of the paid window (exclusive), set on activation
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// When the owner canceled
    #[serde(default)]
    pub canceled_at: Option<DateTime<Utc>>,

    /// Whether the store will renew at expiration
    pub auto_renew: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Record a purchase intent
    pub fn pending(owner: UserId, plan: Plan, product_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SubscriptionId::new(),
            owner,
            plan,
            status: SubscriptionStatus::Pending,
            purchase_token: None,
            product_id: product_id.into(),
            order_id: None,
            started_at: None,
            expires_at: None,
            canceled_at: None,
            auto_renew: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move a pending subscription to active
    ///
    /// The paid window is `[verified_at, verified_at + duration)`.
    pub fn activate(
        &mut self,
        purchase_token: impl Into<String>,
        order_id: Option<String>,
        verified_at: DateTime<Utc>,
        duration: Duration,
    ) -> TallyResult<()> {
        if self.status != SubscriptionStatus::Pending {
            return Err(TallyError::InvalidTransition {
                from: self.status.as_str(),
                to: SubscriptionStatus::Active.as_str(),
            });
        }

        self.status = SubscriptionStatus::Active;
        self.purchase_token = Some(purchase_token.into());
        self.order_id = order_id;
        self.started_at = Some(verified_at);
        self.expires_at = Some(verified_at + duration);
        self.auto_renew = true;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Cancel an active subscription
    ///
    /// Clears auto-renew and stamps the cancellation time. Access continues
    /// until the existing expiration.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> TallyResult<()> {
        let current = self.effective_status(now);
        if current != SubscriptionStatus::Active {
            return Err(TallyError::InvalidTransition {
                from: current.as_str(),
                to: SubscriptionStatus::Canceled.as_str(),
            });
        }

        self.status = SubscriptionStatus::Canceled;
        self.canceled_at = Some(now);
        self.auto_renew = false;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Status as of `now`: an active or canceled subscription whose window has
    /// closed reads as expired
    pub fn effective_status(&self, now: DateTime<Utc>) -> SubscriptionStatus {
        match self.status {
            SubscriptionStatus::Active | SubscriptionStatus::Canceled
                if !self.window_open(now) =>
            {
                SubscriptionStatus::Expired
            }
            status => status,
        }
    }

    /// Active and not yet expired
    pub fn is_currently_entitled(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.window_open(now)
    }

    /// Whether this subscription still grants PRO access at `now`
    ///
    /// Unlike [`Self::is_currently_entitled`], a canceled subscription keeps
    /// granting access until its expiration.
    pub fn grants_access(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.status,
            SubscriptionStatus::Active | SubscriptionStatus::Canceled
        ) && self.window_open(now)
    }

    fn window_open(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now < expires_at)
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.owner, self.plan, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap()
    }

    fn active(plan: Plan, verified_at: DateTime<Utc>) -> Subscription {
        let mut sub = Subscription::pending(UserId::from("alice"), plan, "pro");
        sub.activate(
            "tok-1",
            Some("GPA.1".into()),
            verified_at,
            Duration::days(plan.default_duration_days()),
        )
        .unwrap();
        sub
    }

    #[test]
    fn test_pending_grants_nothing() {
        let sub = Subscription::pending(UserId::from("alice"), Plan::Monthly, "pro");
        assert_eq!(sub.status, SubscriptionStatus::Pending);
        assert!(!sub.is_currently_entitled(at(1)));
        assert!(!sub.grants_access(at(1)));
        assert_eq!(sub.effective_status(at(1)), SubscriptionStatus::Pending);
    }

    #[test]
    fn test_activation_sets_window() {
        let sub = active(Plan::Yearly, at(1));
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.started_at, Some(at(1)));
        assert_eq!(sub.expires_at, Some(at(1) + Duration::days(365)));
        assert_eq!(sub.purchase_token.as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_activate_twice_is_invalid() {
        let mut sub = active(Plan::Monthly, at(1));
        let err = sub
            .activate("tok-2", None, at(2), Duration::days(30))
            .unwrap_err();
        assert!(matches!(
            err,
            TallyError::InvalidTransition {
                from: "active",
                to: "active"
            }
        ));
    }

    #[test]
    fn test_not_entitled_at_exact_expiration() {
        let sub = active(Plan::Monthly, at(1));
        let expires_at = sub.expires_at.unwrap();

        assert!(sub.is_currently_entitled(expires_at - Duration::seconds(1)));
        assert!(!sub.is_currently_entitled(expires_at));
        assert_eq!(sub.effective_status(expires_at), SubscriptionStatus::Expired);
        // Stored status is untouched
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[test]
    fn test_cancel_keeps_access_until_expiration() {
        let mut sub = active(Plan::Monthly, at(1));
        sub.cancel(at(5)).unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Canceled);
        assert_eq!(sub.canceled_at, Some(at(5)));
        assert!(!sub.auto_renew);
        assert!(!sub.is_currently_entitled(at(6)));
        assert!(sub.grants_access(at(6)));
        assert!(!sub.grants_access(sub.expires_at.unwrap()));
    }

    #[test]
    fn test_cancel_requires_active() {
        let mut pending = Subscription::pending(UserId::from("alice"), Plan::Monthly, "pro");
        assert!(pending.cancel(at(1)).is_err());

        let mut lapsed = active(Plan::Monthly, at(1));
        let err = lapsed.cancel(at(1) + Duration::days(31)).unwrap_err();
        assert!(matches!(
            err,
            TallyError::InvalidTransition { from: "expired", .. }
        ));
    }

    #[test]
    fn test_plan_parsing() {
        assert_eq!(Plan::parse("anual"), Some(Plan::Yearly));
        assert_eq!(Plan::parse("Annual"), Some(Plan::Yearly));
        assert_eq!(Plan::parse("mensal"), Some(Plan::Monthly));
        assert_eq!(Plan::parse("weekly"), None);
    }
}
