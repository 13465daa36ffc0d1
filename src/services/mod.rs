//! Service layer for Tally
//!
//! Services sit on top of the storage layer. They scope every read and write
//! to the calling user, validate input, and derive balances, summaries and
//! entitlements from stored records.

pub mod account;
pub mod balance;
pub mod billing;
pub mod category;
pub mod entitlement;
pub mod subscription;
pub mod summary;
pub mod transaction;
pub mod validation;

pub use account::{AccountService, AccountSummary, CreateAccountInput};
pub use balance::{balance_effect, compute_balance};
pub use billing::BillingService;
pub use category::{CategoryService, CreateCategoryInput};
pub use entitlement::{Entitlement, EntitlementResolver};
pub use subscription::{PurchaseOutcome, PurchaseVerification, SubscriptionService};
pub use summary::{monthly_summary, CategorySpending, MonthlySummary};
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionPatch, TransactionService};
pub use validation::TransactionValidator;
