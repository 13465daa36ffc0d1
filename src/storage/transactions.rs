//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with an
//! index from each account to every transaction touching it as source or
//! destination.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;

use crate::error::TallyError;
use crate::models::{AccountId, CategoryId, Transaction, TransactionId, UserId};

use super::file_io::{lock_error, read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Newest first: date descending, then creation descending
pub(crate) fn newest_first(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Repository for transaction persistence with an account index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: account_id -> transaction_ids (source or destination)
    by_account: RwLock<HashMap<AccountId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_account: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the index
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;
        let mut by_account = self.by_account.write().map_err(|e| lock_error("write", e))?;

        data.clear();
        by_account.clear();

        for txn in file_data.transactions {
            for account_id in txn.account_ids() {
                by_account.entry(account_id).or_default().push(txn.id);
            }
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(newest_first);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        Ok(data.get(&id).cloned())
    }

    /// All of `owner`'s transactions, newest first
    pub fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Transaction>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;

        let mut transactions: Vec<_> = data
            .values()
            .filter(|t| &t.owner == owner)
            .cloned()
            .collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// Every transaction with `account_id` as source or destination
    pub fn for_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        let by_account = self.by_account.read().map_err(|e| lock_error("read", e))?;

        let ids = by_account
            .get(&account_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// How many transactions reference `account_id`
    pub fn count_for_account(&self, account_id: AccountId) -> Result<usize, TallyError> {
        let by_account = self.by_account.read().map_err(|e| lock_error("read", e))?;
        Ok(by_account.get(&account_id).map_or(0, Vec::len))
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;
        let mut by_account = self.by_account.write().map_err(|e| lock_error("write", e))?;

        if let Some(old) = data.get(&txn.id) {
            for account_id in old.account_ids() {
                if let Some(ids) = by_account.get_mut(&account_id) {
                    ids.retain(|&id| id != txn.id);
                }
            }
        }

        for account_id in txn.account_ids() {
            by_account.entry(account_id).or_default().push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    pub fn delete(&self, id: TransactionId) -> Result<bool, TallyError> {
        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;
        let mut by_account = self.by_account.write().map_err(|e| lock_error("write", e))?;

        match data.remove(&id) {
            Some(txn) => {
                for account_id in txn.account_ids() {
                    if let Some(ids) = by_account.get_mut(&account_id) {
                        ids.retain(|&tid| tid != id);
                    }
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Detach every transaction from `category_id`; returns how many changed
    pub fn clear_category(&self, category_id: CategoryId) -> Result<usize, TallyError> {
        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;

        let now = Utc::now();
        let mut cleared = 0;
        for txn in data.values_mut() {
            if txn.category_id == Some(category_id) {
                txn.category_id = None;
                txn.updated_at = now;
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        Ok(data.len())
    }
}
