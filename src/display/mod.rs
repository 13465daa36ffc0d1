//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display as
//! plain-text tables and detail views.

pub mod account;
pub mod category;
pub mod subscription;
pub mod summary;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use category::{format_category_details, format_category_tree};
pub use subscription::{
    format_entitlement, format_payment_events, format_subscription_details,
    format_subscription_list,
};
pub use summary::format_monthly_summary;
pub use transaction::{
    format_transaction_details, format_transaction_register, NameLookup,
};
