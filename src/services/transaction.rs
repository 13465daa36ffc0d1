//! Transaction service
//!
//! Create, update and delete go through a single write path: build the
//! resulting row, validate all of it, and only then persist it under the
//! store's commit lock.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::error::{TallyError, TallyResult};
use crate::models::{
    AccountId, CategoryId, Money, Transaction, TransactionId, TransactionKind, UserId,
};
use crate::storage::Storage;

use super::validation::TransactionValidator;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    /// Matches the source or the destination account
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    /// Inclusive
    pub start_date: Option<NaiveDate>,
    /// Inclusive
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |k| txn.kind == k)
            && self.account_id.map_or(true, |a| txn.touches(a))
            && self.category_id.map_or(true, |c| txn.category_id == Some(c))
            && self.start_date.map_or(true, |d| txn.date >= d)
            && self.end_date.map_or(true, |d| txn.date <= d)
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionKind,
    pub source_account_id: AccountId,
    pub destination_account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves a field as it is
///
/// For the optional references, `Some(None)` clears the field.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub kind: Option<TransactionKind>,
    pub source_account_id: Option<AccountId>,
    pub destination_account_id: Option<Option<AccountId>>,
    pub category_id: Option<Option<CategoryId>>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.source_account_id.is_none()
            && self.destination_account_id.is_none()
            && self.category_id.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.notes.is_none()
    }

    fn apply(self, txn: &mut Transaction) {
        if let Some(kind) = self.kind {
            txn.kind = kind;
        }
        if let Some(source) = self.source_account_id {
            txn.source_account_id = source;
        }
        if let Some(destination) = self.destination_account_id {
            txn.destination_account_id = destination;
        }
        if let Some(category) = self.category_id {
            txn.category_id = category;
        }
        if let Some(description) = self.description {
            txn.description = description.trim().to_string();
        }
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(notes) = self.notes {
            txn.notes = notes;
        }
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new transaction for `owner`
    ///
    /// Every rule is checked before anything is written; on failure the
    /// error lists every violation and the store is unchanged.
    #[tracing::instrument(skip_all, fields(owner = %owner))]
    pub fn create(
        &self,
        owner: &UserId,
        input: CreateTransactionInput,
    ) -> TallyResult<Transaction> {
        let mut txn = Transaction::new(
            owner.clone(),
            input.kind,
            input.source_account_id,
            input.description.trim(),
            input.amount,
            input.date,
        );
        txn.destination_account_id = input.destination_account_id;
        txn.category_id = input.category_id;
        if let Some(notes) = input.notes {
            txn.notes = notes;
        }

        self.commit(txn, "transaction created")
    }

    /// Apply `patch` and re-validate the whole resulting row
    #[tracing::instrument(skip_all, fields(owner = %owner, transaction = %id))]
    pub fn update(
        &self,
        owner: &UserId,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> TallyResult<Transaction> {
        let mut txn = self.get(owner, id)?;
        patch.apply(&mut txn);
        txn.updated_at = Utc::now();

        self.commit(txn, "transaction updated")
    }

    fn commit(&self, txn: Transaction, message: &'static str) -> TallyResult<Transaction> {
        let _commit = self.storage.commit()?;

        TransactionValidator::new(self.storage).validate(&txn)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(
            transaction = %txn.id,
            kind = %txn.kind,
            amount = %txn.amount,
            "{}", message
        );
        Ok(txn)
    }

    /// Get one of `owner`'s transactions
    pub fn get(&self, owner: &UserId, id: TransactionId) -> TallyResult<Transaction> {
        self.storage
            .transactions
            .get(id)?
            .filter(|t| &t.owner == owner)
            .ok_or_else(|| TallyError::transaction_not_found(id.to_string()))
    }

    /// Find a transaction by its full or short ID
    pub fn find(&self, owner: &UserId, identifier: &str) -> TallyResult<Transaction> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.get(owner, id);
        }

        self.storage
            .transactions
            .list_for_owner(owner)?
            .into_iter()
            .find(|t| t.id.matches(identifier))
            .ok_or_else(|| TallyError::transaction_not_found(identifier))
    }

    pub fn delete(&self, owner: &UserId, id: TransactionId) -> TallyResult<Transaction> {
        let _commit = self.storage.commit()?;

        let txn = self.get(owner, id)?;
        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        info!(transaction = %id, "transaction deleted");
        Ok(txn)
    }

    /// `owner`'s transactions matching `filter`, by date then creation, newest first
    pub fn list(&self, owner: &UserId, filter: &TransactionFilter) -> TallyResult<Vec<Transaction>> {
        let matching = self
            .storage
            .transactions
            .list_for_owner(owner)?
            .into_iter()
            .filter(|t| filter.matches(t));

        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }
}
