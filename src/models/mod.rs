//! Core data models for Tally
//!
//! This module contains the data structures of the ledger (accounts,
//! categories, transactions) and of PRO entitlement (subscriptions and the
//! payment event log).

pub mod account;
pub mod category;
pub mod ids;
pub mod money;
pub mod payment_event;
pub mod subscription;
pub mod transaction;

pub use account::{Account, AccountType};
pub use category::{Category, CategoryKind, CategoryOwner};
pub use ids::{AccountId, CategoryId, PaymentEventId, SubscriptionId, TransactionId, UserId};
pub use money::{Money, MoneyParseError};
pub use payment_event::PaymentEvent;
pub use subscription::{Plan, Subscription, SubscriptionStatus};
pub use transaction::{Transaction, TransactionKind};
