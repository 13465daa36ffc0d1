//! Account model
//!
//! Represents financial accounts (cash, checking, savings, cards, etc.).
//! An account never stores its current balance; see
//! [`crate::services::balance`] for how it is derived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, UserId};
use super::money::Money;
use crate::error::{Field, Violation, ViolationKind};

/// Icon used when the caller does not pick one
pub const DEFAULT_ACCOUNT_ICON: &str = "wallet";

/// Color used when the caller does not pick one
pub const DEFAULT_ACCOUNT_COLOR: &str = "#12A454";

const MAX_NAME_LEN: usize = 100;

/// Type of financial account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Cash/wallet
    #[default]
    Cash,
    /// Checking account
    Checking,
    /// Savings account
    Savings,
    /// Credit card
    CreditCard,
    /// Debit card
    DebitCard,
    /// Investment account
    Investment,
    /// Other account type
    Other,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" | "wallet" => Some(Self::Cash),
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            "credit" | "credit_card" | "creditcard" => Some(Self::CreditCard),
            "debit" | "debit_card" | "debitcard" => Some(Self::DebitCard),
            "investment" => Some(Self::Investment),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Checking => write!(f, "Checking"),
            Self::Savings => write!(f, "Savings"),
            Self::CreditCard => write!(f, "Credit Card"),
            Self::DebitCard => write!(f, "Debit Card"),
            Self::Investment => write!(f, "Investment"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A financial account owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// The user this account belongs to
    pub owner: UserId,

    /// Account name, unique per owner (e.g., "Wallet")
    pub name: String,

    /// Type of account
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Balance before any recorded transaction
    pub initial_balance: Money,

    /// Display icon
    pub icon: String,

    /// Display color as `#RRGGBB`
    pub color: String,

    /// Inactive accounts are kept for history but hidden from day-to-day use
    pub active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with default values
    pub fn new(owner: UserId, name: impl Into<String>, account_type: AccountType) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            owner,
            name: name.into(),
            account_type,
            initial_balance: Money::zero(),
            icon: DEFAULT_ACCOUNT_ICON.to_string(),
            color: DEFAULT_ACCOUNT_COLOR.to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new account with an initial balance
    pub fn with_initial_balance(
        owner: UserId,
        name: impl Into<String>,
        account_type: AccountType,
        initial_balance: Money,
    ) -> Self {
        let mut account = Self::new(owner, name, account_type);
        account.initial_balance = initial_balance;
        account
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Mark this account as inactive
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Mark this account as active again
    pub fn reactivate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(AccountValidationError::NameTooLong(self.name.chars().count()));
        }

        if !is_hex_color(&self.color) {
            return Err(AccountValidationError::InvalidColor(self.color.clone()));
        }

        if !self.initial_balance.is_within_limit() {
            return Err(AccountValidationError::BalanceOutOfRange(self.initial_balance));
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// `#RRGGBB`
pub(crate) fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("Account name cannot be empty")]
    EmptyName,
    #[error("Account name too long ({0} chars, max 100)")]
    NameTooLong(usize),
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("Initial balance {0} is out of range")]
    BalanceOutOfRange(Money),
}

impl From<AccountValidationError> for Violation {
    fn from(err: AccountValidationError) -> Self {
        match err {
            AccountValidationError::EmptyName | AccountValidationError::NameTooLong(_) => {
                Violation::new(ViolationKind::InvalidName, Field::Name, err.to_string())
            }
            AccountValidationError::InvalidColor(_) => {
                Violation::new(ViolationKind::InvalidColor, Field::Color, err.to_string())
            }
            AccountValidationError::BalanceOutOfRange(_) => {
                Violation::new(ViolationKind::InvalidAmount, Field::Amount, err.to_string())
            }
        }
    }
}
