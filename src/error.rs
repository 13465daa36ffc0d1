//! Custom error types for Tally
//!
//! This module defines the error hierarchy for the ledger and entitlement
//! core using thiserror. Validation failures carry the complete list of
//! violated rules rather than only the first one, so callers can report every
//! offending field at once.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The field of an input that a validation rule points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Amount,
    Name,
    Color,
    Description,
    SourceAccount,
    DestinationAccount,
    Category,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount => write!(f, "amount"),
            Self::Name => write!(f, "name"),
            Self::Color => write!(f, "color"),
            Self::Description => write!(f, "description"),
            Self::SourceAccount => write!(f, "source_account"),
            Self::DestinationAccount => write!(f, "destination_account"),
            Self::Category => write!(f, "category"),
        }
    }
}

/// The rule a value broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Amount is zero, negative, too large, or carries more than two fractional digits
    InvalidAmount,
    /// A transfer without a destination account
    MissingDestination,
    /// An income or expense that names a destination account
    UnexpectedDestination,
    /// Account does not exist or belongs to another user
    CrossOwnerAccount,
    /// Transfer whose source and destination are the same account
    SameAccountTransfer,
    /// Category does not exist, or is neither the user's nor a default
    UnauthorizedCategory,
    /// Empty or overlong name
    InvalidName,
    /// Malformed display color
    InvalidColor,
    /// Empty or overlong description
    InvalidDescription,
}

/// A single broken rule, tied to the field that broke it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub field: Field,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, field: Field, message: impl Into<String>) -> Self {
        Self {
            kind,
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found while validating one input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Kinds of all violations, in the order they were found
    pub fn kinds(&self) -> Vec<ViolationKind> {
        self.0.iter().map(|v| v.kind).collect()
    }

    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.0.iter().any(|v| v.kind == kind)
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Violation> for ValidationErrors {
    fn from(violation: Violation) -> Self {
        Self(vec![violation])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// The main error type for Tally operations
#[derive(Error, Debug)]
pub enum TallyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Input broke one or more structural or ownership rules
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Malformed caller input outside the transaction rules (dates, plans, months)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Uniqueness constraint hit
    #[error("{entity_type} already exists: {identifier}")]
    Conflict {
        entity_type: &'static str,
        identifier: String,
    },

    /// Deleting the entity would orphan dependent records
    #[error("Cannot delete {entity_type} '{identifier}': referenced by {dependents} transaction(s)")]
    ReferentialIntegrity {
        entity_type: &'static str,
        identifier: String,
        dependents: usize,
    },

    /// The caller may not modify this entity (e.g. shared default categories)
    #[error("Not permitted: {0}")]
    Forbidden(String),

    /// A subscription was asked to make a transition its state does not allow
    #[error("Invalid subscription transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    /// The underlying store is unavailable
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TallyError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for subscriptions
    pub fn subscription_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Subscription",
            identifier: identifier.into(),
        }
    }

    /// Wrap a single violation
    pub fn invalid(kind: ViolationKind, field: Field, message: impl Into<String>) -> Self {
        Self::Validation(Violation::new(kind, field, message).into())
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a uniqueness conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Only store unavailability is worth retrying; everything else is final
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_))
    }

    /// The collected violations, if this is a validation error
    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for TallyError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Tally operations
pub type TallyResult<T> = Result<T, TallyError>;
