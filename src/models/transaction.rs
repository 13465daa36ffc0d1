//! Transaction model
//!
//! A transaction records money moving into an account (income), out of an
//! account (expense), or between two accounts of the same user (transfer).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, TransactionId, UserId};
use super::money::Money;
use crate::error::{Field, ValidationErrors, Violation, ViolationKind};

/// Longest description accepted, in characters
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self, Self::Transfer)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The user who recorded it
    pub owner: UserId,

    /// Income, expense or transfer
    pub kind: TransactionKind,

    /// The account money leaves (expense, transfer) or enters (income)
    pub source_account_id: AccountId,

    /// The receiving account of a transfer; always `None` otherwise
    #[serde(default)]
    pub destination_account_id: Option<AccountId>,

    /// Optional classification; cleared when the category is deleted
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Short description
    pub description: String,

    /// Strictly positive amount; the kind decides the direction
    pub amount: Money,

    /// Calendar date the transaction happened on
    pub date: NaiveDate,

    /// Free-form notes
    #[serde(default)]
    pub notes: String,

    /// When the transaction was recorded
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction with no destination, category or notes
    pub fn new(
        owner: UserId,
        kind: TransactionKind,
        source_account_id: AccountId,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            owner,
            kind,
            source_account_id,
            destination_account_id: None,
            category_id: None,
            description: description.into(),
            amount,
            date,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Every account this transaction touches
    pub fn account_ids(&self) -> impl Iterator<Item = AccountId> + '_ {
        std::iter::once(self.source_account_id).chain(self.destination_account_id)
    }

    /// Whether the transaction moves money in or out of `account_id`
    pub fn touches(&self, account_id: AccountId) -> bool {
        self.source_account_id == account_id || self.destination_account_id == Some(account_id)
    }

    /// Rules that can be checked without looking at any other record
    ///
    /// Ownership of the referenced accounts and category needs the store and
    /// is checked by the transaction validator.
    pub fn structural_violations(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if !self.amount.is_positive() {
            errors.push(Violation::new(
                ViolationKind::InvalidAmount,
                Field::Amount,
                format!("amount must be positive, got {}", self.amount),
            ));
        } else if !self.amount.is_within_limit() {
            errors.push(Violation::new(
                ViolationKind::InvalidAmount,
                Field::Amount,
                format!("amount cannot exceed {}", Money::MAX_AMOUNT),
            ));
        }

        let description_len = self.description.trim().chars().count();
        if description_len == 0 {
            errors.push(Violation::new(
                ViolationKind::InvalidDescription,
                Field::Description,
                "description cannot be empty",
            ));
        } else if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.push(Violation::new(
                ViolationKind::InvalidDescription,
                Field::Description,
                format!(
                    "description too long ({} chars, max {})",
                    self.description.chars().count(),
                    MAX_DESCRIPTION_LEN
                ),
            ));
        }

        match (self.kind, self.destination_account_id) {
            (TransactionKind::Transfer, None) => errors.push(Violation::new(
                ViolationKind::MissingDestination,
                Field::DestinationAccount,
                "a transfer needs a destination account",
            )),
            (TransactionKind::Transfer, Some(destination))
                if destination == self.source_account_id =>
            {
                errors.push(Violation::new(
                    ViolationKind::SameAccountTransfer,
                    Field::DestinationAccount,
                    "cannot transfer to the source account",
                ))
            }
            (TransactionKind::Income | TransactionKind::Expense, Some(_)) => {
                errors.push(Violation::new(
                    ViolationKind::UnexpectedDestination,
                    Field::DestinationAccount,
                    format!("{} cannot have a destination account", self.kind),
                ))
            }
            _ => {}
        }

        errors
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date, self.kind, self.amount, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: TransactionKind) -> Transaction {
        Transaction::new(
            UserId::from("alice"),
            kind,
            AccountId::new(),
            "Groceries",
            Money::from_cents(3000),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        )
    }

    #[test]
    fn test_valid_expense_has_no_violations() {
        assert!(sample(TransactionKind::Expense).structural_violations().is_empty());
    }

    #[test]
    fn test_transfer_requires_destination() {
        let txn = sample(TransactionKind::Transfer);
        assert_eq!(
            txn.structural_violations().kinds(),
            vec![ViolationKind::MissingDestination]
        );
    }

    #[test]
    fn test_transfer_to_self_rejected() {
        let mut txn = sample(TransactionKind::Transfer);
        txn.destination_account_id = Some(txn.source_account_id);
        assert_eq!(
            txn.structural_violations().kinds(),
            vec![ViolationKind::SameAccountTransfer]
        );
    }

    #[test]
    fn test_income_with_destination_rejected() {
        let mut txn = sample(TransactionKind::Income);
        txn.destination_account_id = Some(AccountId::new());
        assert!(txn
            .structural_violations()
            .contains(ViolationKind::UnexpectedDestination));
    }

    #[test]
    fn test_all_violations_reported_together() {
        let mut txn = sample(TransactionKind::Expense);
        txn.amount = Money::zero();
        txn.description = "  ".into();
        txn.destination_account_id = Some(AccountId::new());

        assert_eq!(
            txn.structural_violations().kinds(),
            vec![
                ViolationKind::InvalidAmount,
                ViolationKind::InvalidDescription,
                ViolationKind::UnexpectedDestination,
            ]
        );
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut txn = sample(TransactionKind::Income);
        txn.amount = Money::from_cents(-100);
        assert!(txn.structural_violations().contains(ViolationKind::InvalidAmount));
    }

    #[test]
    fn test_amount_above_limit_rejected() {
        let mut txn = sample(TransactionKind::Income);
        txn.amount = Money::MAX_AMOUNT;
        assert!(txn.structural_violations().is_empty());

        txn.amount = Money::MAX_AMOUNT + Money::from_cents(1);
        assert_eq!(
            txn.structural_violations().kinds(),
            vec![ViolationKind::InvalidAmount]
        );
    }

    #[test]
    fn test_description_length_limit() {
        let mut txn = sample(TransactionKind::Expense);
        txn.description = "x".repeat(MAX_DESCRIPTION_LEN);
        assert!(txn.structural_violations().is_empty());

        txn.description.push('x');
        assert!(txn
            .structural_violations()
            .contains(ViolationKind::InvalidDescription));
    }

    #[test]
    fn test_touches() {
        let mut txn = sample(TransactionKind::Transfer);
        let destination = AccountId::new();
        txn.destination_account_id = Some(destination);

        assert!(txn.touches(txn.source_account_id));
        assert!(txn.touches(destination));
        assert!(!txn.touches(AccountId::new()));
        assert_eq!(txn.account_ids().count(), 2);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(TransactionKind::parse("TRANSFER"), Some(TransactionKind::Transfer));
        assert_eq!(TransactionKind::parse("expense"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse("refund"), None);
    }
}
