//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json. The
//! (owner, name) uniqueness rule is checked and applied under one write lock.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{Account, AccountId, UserId};

use super::file_io::{lock_error, read_json, write_json_atomic};

/// Serializable account data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;

        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }

        Ok(())
    }

    /// Save accounts to disk
    pub fn save(&self) -> Result<(), TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        write_json_atomic(&self.path, &AccountData { accounts })
    }

    pub fn get(&self, id: AccountId) -> Result<Option<Account>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        Ok(data.get(&id).cloned())
    }

    /// All accounts of `owner`, active first, then by name
    pub fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Account>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;

        let mut accounts: Vec<_> = data
            .values()
            .filter(|a| a.is_owned_by(owner))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| {
            b.active
                .cmp(&a.active)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(accounts)
    }

    /// Find one of `owner`'s accounts by name (case-insensitive)
    pub fn find_by_name(&self, owner: &UserId, name: &str) -> Result<Option<Account>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;

        let name_lower = name.to_lowercase();
        Ok(data
            .values()
            .find(|a| a.is_owned_by(owner) && a.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Insert a new account, or replace an existing one with the same id
    ///
    /// Fails with a conflict if another account of the same owner already
    /// uses the name; the repository is unchanged in that case.
    pub fn insert_unique(&self, account: Account) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;

        let name_lower = account.name.to_lowercase();
        let taken = data.values().any(|a| {
            a.id != account.id && a.owner == account.owner && a.name.to_lowercase() == name_lower
        });
        if taken {
            return Err(TallyError::Conflict {
                entity_type: "Account",
                identifier: account.name,
            });
        }

        data.insert(account.id, account);
        Ok(())
    }

    pub fn delete(&self, id: AccountId) -> Result<bool, TallyError> {
        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;
        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        Ok(data.len())
    }
}
