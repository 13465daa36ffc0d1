//! Balance calculation
//!
//! Balances are never stored. They are derived by aggregation every time:
//!
//! `initial + income(src) - expense(src) - transfer(src) + transfer(dst)`

use crate::models::{Account, AccountId, Money, Transaction, TransactionKind};

/// Signed effect of `txn` on the balance of `account_id`
///
/// Zero when the transaction does not touch the account.
pub fn balance_effect(txn: &Transaction, account_id: AccountId) -> Money {
    let mut effect = Money::zero();

    if txn.source_account_id == account_id {
        effect += match txn.kind {
            TransactionKind::Income => txn.amount,
            TransactionKind::Expense | TransactionKind::Transfer => -txn.amount,
        };
    }

    if txn.kind == TransactionKind::Transfer && txn.destination_account_id == Some(account_id) {
        effect += txn.amount;
    }

    effect
}

/// Current balance of `account` given any set of transactions
///
/// Transactions that do not reference the account contribute nothing, so the
/// caller may pass the account's own transactions or the whole table.
pub fn compute_balance(account: &Account, transactions: &[Transaction]) -> Money {
    account.initial_balance
        + transactions
            .iter()
            .map(|txn| balance_effect(txn, account.id))
            .sum::<Money>()
}
