//! Storage layer for Tally
//!
//! JSON table files with atomic writes, loaded into in-memory repositories,
//! plus the append-only payment event log.

pub mod accounts;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod payment_events;
pub mod subscriptions;
pub mod transactions;

use std::sync::{Mutex, MutexGuard};

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use payment_events::PaymentEventLog;
pub use subscriptions::SubscriptionRepository;
pub use transactions::TransactionRepository;

use crate::config::paths::TallyPaths;
use crate::error::TallyError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TallyPaths,
    pub accounts: AccountRepository,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    pub subscriptions: SubscriptionRepository,
    pub payment_events: PaymentEventLog,
    /// Held for the whole check-then-write of operations spanning tables
    commit: Mutex<()>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TallyPaths) -> Result<Self, TallyError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            subscriptions: SubscriptionRepository::new(paths.subscriptions_file()),
            payment_events: PaymentEventLog::new(paths.payment_events_log()),
            commit: Mutex::new(()),
            paths,
        })
    }

    pub fn paths(&self) -> &TallyPaths {
        &self.paths
    }

    /// Load all tables from disk
    pub fn load_all(&mut self) -> Result<(), TallyError> {
        self.accounts.load()?;
        self.categories.load()?;
        self.transactions.load()?;
        self.subscriptions.load()?;
        Ok(())
    }

    /// Take the store-wide commit lock
    ///
    /// Writers that check one table against another (transaction writes
    /// against accounts, account deletion against transactions) hold this
    /// until their rows are saved.
    pub fn commit(&self) -> Result<MutexGuard<'_, ()>, TallyError> {
        self.commit
            .lock()
            .map_err(|e| file_io::lock_error("commit", e))
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_commit_lock_released_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        drop(storage.commit().unwrap());
        let _guard = storage.commit().unwrap();
    }
}
