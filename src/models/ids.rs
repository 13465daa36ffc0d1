//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Whether `identifier` names this ID, either as the full UUID or
            /// as the short prefixed form produced by `Display`
            pub fn matches(&self, identifier: &str) -> bool {
                self.0.to_string() == identifier || self.to_string() == identifier
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.simple().to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(AccountId, "acc-");
define_id!(TransactionId, "txn-");
define_id!(CategoryId, "cat-");
define_id!(SubscriptionId, "sub-");
define_id!(PaymentEventId, "evt-");

/// Identifier of an authenticated user, as issued by the identity provider
///
/// The ledger never creates users; it only scopes data by this opaque key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_creation() {
        let id = AccountId::new();
        assert!(!id.as_uuid().is_nil());
    }

    #[test]
    fn test_id_display() {
        let id = AccountId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("acc-"));
        assert_eq!(display.len(), 12); // "acc-" + 8 chars
    }

    #[test]
    fn test_id_matches_short_and_full_forms() {
        let id = SubscriptionId::new();
        assert!(id.matches(&id.to_string()));
        assert!(id.matches(&id.as_uuid().to_string()));
        assert!(!id.matches("sub-00000000"));
    }

    #[test]
    fn test_id_parse_with_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: CategoryId = format!("cat-{}", uuid_str).parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
        assert_eq!(CategoryId::parse(uuid_str).unwrap(), id);
    }

    #[test]
    fn test_id_serialization() {
        let id = TransactionId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: TransactionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_user_id_is_opaque() {
        let user = UserId::from("auth0|42");
        assert_eq!(user.as_str(), "auth0|42");
        assert_eq!(serde_json::to_string(&user).unwrap(), "\"auth0|42\"");
    }
}
