//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod billing;
pub mod category;
pub mod subscription;
pub mod transaction;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Field, TallyError, TallyResult, ViolationKind};
use crate::models::{Money, MoneyParseError, UserId};

pub use account::{handle_account_command, AccountCommands};
pub use billing::{handle_billing_command, BillingCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use subscription::{handle_subscription_command, SubscriptionCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

/// The authenticated user, required by every ledger and billing command
pub fn require_user(user: Option<String>) -> TallyResult<UserId> {
    match user.map(|u| u.trim().to_string()) {
        Some(u) if !u.is_empty() => Ok(UserId::new(u)),
        _ => Err(TallyError::InvalidInput(
            "no user given; pass --user or set TALLY_USER".into(),
        )),
    }
}

/// Parse a user-typed amount
///
/// Malformed or over-precise input is reported the same way the ledger
/// reports a non-positive amount.
pub(crate) fn parse_amount(input: &str) -> TallyResult<Money> {
    Money::parse(input).map_err(|e| {
        let message = match e {
            MoneyParseError::TooPrecise(_) => "must have at most two decimal places".to_string(),
            other => other.to_string(),
        };
        TallyError::invalid(ViolationKind::InvalidAmount, Field::Amount, message)
    })
}

pub(crate) fn parse_date(input: &str) -> TallyResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        TallyError::InvalidInput(format!("Invalid date format: '{}'. Use YYYY-MM-DD", input))
    })
}

/// Parse an RFC 3339 instant, defaulting to the current time
pub(crate) fn parse_instant(input: Option<&str>) -> TallyResult<DateTime<Utc>> {
    match input {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| {
                TallyError::InvalidInput(format!(
                    "Invalid timestamp: '{}'. Use RFC 3339, e.g. 2025-01-31T12:00:00Z",
                    s
                ))
            }),
        None => Ok(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_require_user() {
        assert_eq!(require_user(Some(" alice ".into())).unwrap().as_str(), "alice");
        assert!(require_user(Some("  ".into())).is_err());
        assert!(require_user(None).is_err());
    }

    #[test]
    fn test_over_precise_amount_is_invalid_amount() {
        let err = parse_amount("10.001").unwrap_err();
        assert!(err.violations().unwrap().contains(ViolationKind::InvalidAmount));
        assert_eq!(parse_amount("10.5").unwrap().cents(), 1050);
    }

    #[test]
    fn test_parse_instant() {
        let at = parse_instant(Some("2025-01-31T12:00:00Z")).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap());
        assert!(parse_instant(Some("yesterday")).is_err());
    }
}
