//! Tally - personal finance ledger with PRO entitlement
//!
//! This library provides the core of the Tally application: a per-user
//! ledger of accounts, categories and transactions whose balances are always
//! derived from the recorded rows, and a subscription state machine that
//! decides whether a user currently has PRO access.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and persisted settings
//! - `error`: Error types, including collected validation violations
//! - `models`: Core data models (accounts, transactions, subscriptions, etc.)
//! - `storage`: JSON table storage and the payment event log
//! - `services`: Business logic layer
//! - `cli`: Command handlers for the `tally` binary
//! - `display`: Plain-text formatting for terminal output
//!
//! # Example
//!
//! ```rust,ignore
//! use tally::config::paths::TallyPaths;
//! use tally::services::EntitlementResolver;
//! use tally::storage::Storage;
//!
//! let mut storage = Storage::new(TallyPaths::new()?)?;
//! storage.load_all()?;
//! let pro = EntitlementResolver::new(&storage).is_entitled(&"alice".into(), chrono::Utc::now())?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{TallyError, TallyResult};
