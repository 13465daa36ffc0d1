//! Transaction validation
//!
//! One pipeline shared by create and update. It runs every rule and returns
//! the complete list of violations; nothing is written unless the list is
//! empty.

use tracing::debug;

use crate::error::{Field, TallyResult, ValidationErrors, Violation, ViolationKind};
use crate::models::{AccountId, Transaction, TransactionKind, UserId};
use crate::storage::Storage;

/// Checks a candidate transaction row against the store
pub struct TransactionValidator<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionValidator<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Collect every violation of `txn`
    ///
    /// The outer result only fails when the store itself cannot be read.
    pub fn check(&self, txn: &Transaction) -> TallyResult<ValidationErrors> {
        let mut errors = txn.structural_violations();

        if !self.owns_account(&txn.owner, txn.source_account_id)? {
            errors.push(Violation::new(
                ViolationKind::CrossOwnerAccount,
                Field::SourceAccount,
                "source account not found",
            ));
        }

        if txn.kind == TransactionKind::Transfer {
            if let Some(destination) = txn.destination_account_id {
                if !self.owns_account(&txn.owner, destination)? {
                    errors.push(Violation::new(
                        ViolationKind::CrossOwnerAccount,
                        Field::DestinationAccount,
                        "destination account not found",
                    ));
                }
            }
        }

        if let Some(category_id) = txn.category_id {
            let visible = self
                .storage
                .categories
                .get(category_id)?
                .is_some_and(|c| c.is_visible_to(&txn.owner));
            if !visible {
                errors.push(Violation::new(
                    ViolationKind::UnauthorizedCategory,
                    Field::Category,
                    "category not found",
                ));
            }
        }

        if !errors.is_empty() {
            debug!(
                transaction = %txn.id,
                violations = errors.len(),
                "transaction rejected"
            );
        }

        Ok(errors)
    }

    /// Fail with every violation, or succeed when there are none
    pub fn validate(&self, txn: &Transaction) -> TallyResult<()> {
        self.check(txn)?.into_result()?;
        Ok(())
    }

    // A foreign account reads the same as a missing one
    fn owns_account(&self, owner: &UserId, account_id: AccountId) -> TallyResult<bool> {
        Ok(self
            .storage
            .accounts
            .get(account_id)?
            .is_some_and(|a| a.is_owned_by(owner)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::{Account, AccountType, Category, CategoryKind, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        alice_wallet: Account,
        alice_bank: Account,
        bob_wallet: Account,
    }

    fn setup() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let alice_wallet = Account::new(UserId::from("alice"), "Wallet", AccountType::Cash);
        let alice_bank = Account::new(UserId::from("alice"), "Bank", AccountType::Checking);
        let bob_wallet = Account::new(UserId::from("bob"), "Wallet", AccountType::Cash);
        for account in [&alice_wallet, &alice_bank, &bob_wallet] {
            storage.accounts.insert_unique(account.clone()).unwrap();
        }

        Fixture {
            _temp_dir: temp_dir,
            storage,
            alice_wallet,
            alice_bank,
            bob_wallet,
        }
    }

    fn txn(kind: TransactionKind, source: &Account) -> Transaction {
        Transaction::new(
            UserId::from("alice"),
            kind,
            source.id,
            "test",
            Money::from_cents(1000),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        )
    }

    #[test]
    fn test_valid_transfer() {
        let f = setup();
        let mut t = txn(TransactionKind::Transfer, &f.alice_wallet);
        t.destination_account_id = Some(f.alice_bank.id);

        assert!(TransactionValidator::new(&f.storage).validate(&t).is_ok());
    }

    #[test]
    fn test_foreign_source_account() {
        let f = setup();
        let t = txn(TransactionKind::Expense, &f.bob_wallet);

        let errors = TransactionValidator::new(&f.storage).check(&t).unwrap();
        assert_eq!(errors.kinds(), vec![ViolationKind::CrossOwnerAccount]);
        assert_eq!(errors.violations()[0].field, Field::SourceAccount);
    }

    #[test]
    fn test_missing_source_account_reads_as_foreign() {
        let f = setup();
        let mut t = txn(TransactionKind::Expense, &f.alice_wallet);
        t.source_account_id = AccountId::new();

        let errors = TransactionValidator::new(&f.storage).check(&t).unwrap();
        assert_eq!(errors.kinds(), vec![ViolationKind::CrossOwnerAccount]);
    }

    #[test]
    fn test_foreign_destination_account() {
        let f = setup();
        let mut t = txn(TransactionKind::Transfer, &f.alice_wallet);
        t.destination_account_id = Some(f.bob_wallet.id);

        let errors = TransactionValidator::new(&f.storage).check(&t).unwrap();
        assert_eq!(errors.kinds(), vec![ViolationKind::CrossOwnerAccount]);
        assert_eq!(errors.violations()[0].field, Field::DestinationAccount);
    }

    #[test]
    fn test_category_must_be_own_or_default() {
        let f = setup();
        let bobs = Category::new(UserId::from("bob"), "Hobby", CategoryKind::Expense);
        let alices = Category::new(UserId::from("alice"), "Coffee", CategoryKind::Expense);
        let shared = Category::new_default("Food", CategoryKind::Expense, "restaurant", "#6B7280");
        for c in [&bobs, &alices, &shared] {
            f.storage.categories.insert_unique(c.clone()).unwrap();
        }
        let validator = TransactionValidator::new(&f.storage);

        let mut t = txn(TransactionKind::Expense, &f.alice_wallet);
        t.category_id = Some(bobs.id);
        assert_eq!(
            validator.check(&t).unwrap().kinds(),
            vec![ViolationKind::UnauthorizedCategory]
        );

        t.category_id = Some(alices.id);
        assert!(validator.validate(&t).is_ok());

        t.category_id = Some(shared.id);
        assert!(validator.validate(&t).is_ok());
    }

    #[test]
    fn test_reports_structural_and_ownership_together() {
        let f = setup();
        let mut t = txn(TransactionKind::Income, &f.bob_wallet);
        t.amount = Money::zero();
        t.destination_account_id = Some(f.alice_bank.id);

        let err = TransactionValidator::new(&f.storage)
            .validate(&t)
            .unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(
            violations.kinds(),
            vec![
                ViolationKind::InvalidAmount,
                ViolationKind::UnexpectedDestination,
                ViolationKind::CrossOwnerAccount,
            ]
        );
    }
}
