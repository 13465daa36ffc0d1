//! Account service
//!
//! Business logic for accounts: creation with per-owner unique names,
//! activation state, deletion guarded by referential integrity, and balances
//! derived from the transaction table.

use tracing::{debug, info};

use crate::error::{TallyError, TallyResult, Violation};
use crate::models::{Account, AccountId, AccountType, Money, UserId};
use crate::storage::Storage;

use super::balance::compute_balance;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// An account together with its current balance
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    pub balance: Money,
}

/// Input for creating a new account
#[derive(Debug, Clone, Default)]
pub struct CreateAccountInput {
    pub name: String,
    pub account_type: AccountType,
    pub initial_balance: Money,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account for `owner`
    #[tracing::instrument(skip_all, fields(owner = %owner))]
    pub fn create(&self, owner: &UserId, input: CreateAccountInput) -> TallyResult<Account> {
        let mut account = Account::with_initial_balance(
            owner.clone(),
            input.name.trim(),
            input.account_type,
            input.initial_balance,
        );
        if let Some(icon) = input.icon {
            account.icon = icon;
        }
        if let Some(color) = input.color {
            account.color = color;
        }

        account
            .validate()
            .map_err(|e| TallyError::Validation(Violation::from(e).into()))?;

        self.storage.accounts.insert_unique(account.clone())?;
        self.storage.accounts.save()?;

        info!(account = %account.id, name = %account.name, "account created");
        Ok(account)
    }

    /// Get one of `owner`'s accounts
    ///
    /// Another user's account is reported as not found.
    pub fn get(&self, owner: &UserId, id: AccountId) -> TallyResult<Account> {
        self.storage
            .accounts
            .get(id)?
            .filter(|a| a.is_owned_by(owner))
            .ok_or_else(|| TallyError::account_not_found(id.to_string()))
    }

    /// Find an account by name or by ID string
    pub fn find(&self, owner: &UserId, identifier: &str) -> TallyResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.find_by_name(owner, identifier)? {
            return Ok(Some(account));
        }

        Ok(self
            .storage
            .accounts
            .list_for_owner(owner)?
            .into_iter()
            .find(|a| a.id.matches(identifier)))
    }

    /// Like [`Self::find`], but a miss is an error
    pub fn resolve(&self, owner: &UserId, identifier: &str) -> TallyResult<Account> {
        self.find(owner, identifier)?
            .ok_or_else(|| TallyError::account_not_found(identifier))
    }

    /// `owner`'s accounts, active first, then by name
    pub fn list(&self, owner: &UserId, include_inactive: bool) -> TallyResult<Vec<Account>> {
        let accounts = self.storage.accounts.list_for_owner(owner)?;
        if include_inactive {
            Ok(accounts)
        } else {
            Ok(accounts.into_iter().filter(|a| a.active).collect())
        }
    }

    /// Accounts with their balances computed at read time
    pub fn list_with_balances(
        &self,
        owner: &UserId,
        include_inactive: bool,
    ) -> TallyResult<Vec<AccountSummary>> {
        self.list(owner, include_inactive)?
            .into_iter()
            .map(|account| {
                let balance = self.compute(&account)?;
                Ok(AccountSummary { account, balance })
            })
            .collect()
    }

    /// Current balance of one account
    pub fn balance(&self, owner: &UserId, id: AccountId) -> TallyResult<Money> {
        let account = self.get(owner, id)?;
        self.compute(&account)
    }

    fn compute(&self, account: &Account) -> TallyResult<Money> {
        let transactions = self.storage.transactions.for_account(account.id)?;
        let balance = compute_balance(account, &transactions);
        debug!(account = %account.id, %balance, rows = transactions.len(), "balance computed");
        Ok(balance)
    }

    /// Hide an account from day-to-day use, keeping its history
    pub fn deactivate(&self, owner: &UserId, id: AccountId) -> TallyResult<Account> {
        self.set_active(owner, id, false)
    }

    pub fn reactivate(&self, owner: &UserId, id: AccountId) -> TallyResult<Account> {
        self.set_active(owner, id, true)
    }

    fn set_active(&self, owner: &UserId, id: AccountId, active: bool) -> TallyResult<Account> {
        let mut account = self.get(owner, id)?;
        if active {
            account.reactivate();
        } else {
            account.deactivate();
        }

        self.storage.accounts.insert_unique(account.clone())?;
        self.storage.accounts.save()?;

        info!(account = %account.id, active, "account activation changed");
        Ok(account)
    }

    /// Delete an account that no transaction references
    ///
    /// The reference count is taken under the commit lock, so no transaction
    /// can slip in between the check and the delete.
    #[tracing::instrument(skip_all, fields(owner = %owner, account = %id))]
    pub fn delete(&self, owner: &UserId, id: AccountId) -> TallyResult<Account> {
        let _commit = self.storage.commit()?;

        let account = self.get(owner, id)?;
        let dependents = self.storage.transactions.count_for_account(id)?;
        if dependents > 0 {
            return Err(TallyError::ReferentialIntegrity {
                entity_type: "Account",
                identifier: account.name,
                dependents,
            });
        }

        self.storage.accounts.delete(id)?;
        self.storage.accounts.save()?;

        info!(name = %account.name, "account deleted");
        Ok(account)
    }
}
