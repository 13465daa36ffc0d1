//! Category model
//!
//! Categories classify transactions as a kind of income or expense. A
//! category either belongs to one user or is a shared system default that
//! every user sees but no user may change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::is_hex_color;
use super::ids::{CategoryId, UserId};
use crate::error::{Field, Violation, ViolationKind};

/// Icon used when the caller does not pick one
pub const DEFAULT_CATEGORY_ICON: &str = "more_horiz";

/// Color used when the caller does not pick one
pub const DEFAULT_CATEGORY_COLOR: &str = "#6B7280";

const MAX_NAME_LEN: usize = 100;

/// Whether a category records money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// Who a category belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryOwner {
    /// Created by and visible to a single user
    Owned(UserId),
    /// System default, visible to everyone, writable only by the system path
    Shared,
}

/// A transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Owning user, or shared
    pub owner: CategoryOwner,

    /// Category name
    pub name: String,

    /// Income or expense
    pub kind: CategoryKind,

    /// Display icon
    pub icon: String,

    /// Display color as `#RRGGBB`
    pub color: String,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a category owned by `owner`
    pub fn new(owner: UserId, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self::build(CategoryOwner::Owned(owner), name.into(), kind)
    }

    /// Create a shared default category; only the system seeding path calls this
    pub(crate) fn new_default(
        name: impl Into<String>,
        kind: CategoryKind,
        icon: &str,
        color: &str,
    ) -> Self {
        let mut category = Self::build(CategoryOwner::Shared, name.into(), kind);
        category.icon = icon.to_string();
        category.color = color.to_string();
        category
    }

    fn build(owner: CategoryOwner, name: String, kind: CategoryKind) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            owner,
            name,
            kind,
            icon: DEFAULT_CATEGORY_ICON.to_string(),
            color: DEFAULT_CATEGORY_COLOR.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Shared system categories are the defaults
    pub fn is_default(&self) -> bool {
        matches!(self.owner, CategoryOwner::Shared)
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        matches!(&self.owner, CategoryOwner::Owned(owner) if owner == user)
    }

    /// Owned by `user`, or a default
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        self.is_default() || self.is_owned_by(user)
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(self.name.chars().count()));
        }

        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryValidationError {
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("Category name too long ({0} chars, max 100)")]
    NameTooLong(usize),
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
}

impl From<CategoryValidationError> for Violation {
    fn from(err: CategoryValidationError) -> Self {
        match err {
            CategoryValidationError::EmptyName | CategoryValidationError::NameTooLong(_) => {
                Violation::new(ViolationKind::InvalidName, Field::Name, err.to_string())
            }
            CategoryValidationError::InvalidColor(_) => {
                Violation::new(ViolationKind::InvalidColor, Field::Color, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_category() {
        let alice = UserId::from("alice");
        let category = Category::new(alice.clone(), "Coffee", CategoryKind::Expense);

        assert!(!category.is_default());
        assert!(category.is_owned_by(&alice));
        assert!(category.is_visible_to(&alice));
        assert!(!category.is_visible_to(&UserId::from("bob")));
        assert_eq!(category.icon, DEFAULT_CATEGORY_ICON);
    }

    #[test]
    fn test_default_category_visible_to_all() {
        let category =
            Category::new_default("Food", CategoryKind::Expense, "restaurant", "#EF4444");

        assert!(category.is_default());
        assert!(category.is_visible_to(&UserId::from("anyone")));
        assert!(!category.is_owned_by(&UserId::from("anyone")));
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new(UserId::from("a"), "", CategoryKind::Income);
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "Salary".into();
        assert!(category.validate().is_ok());

        category.color = "#12345".into();
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_owner_serialization() {
        let owned = CategoryOwner::Owned(UserId::from("alice"));
        assert_eq!(serde_json::to_string(&owned).unwrap(), r#"{"owned":"alice"}"#);
        assert_eq!(
            serde_json::to_string(&CategoryOwner::Shared).unwrap(),
            r#""shared""#
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(CategoryKind::parse("Income"), Some(CategoryKind::Income));
        assert_eq!(CategoryKind::parse("expense"), Some(CategoryKind::Expense));
        assert_eq!(CategoryKind::parse("transfer"), None);
    }
}
