//! Category service
//!
//! The owner-facing path for categories. Users create, rename and delete
//! their own categories and read the shared defaults, which this path never
//! changes.

use tracing::info;

use crate::error::{TallyError, TallyResult, Violation};
use crate::models::{Category, CategoryId, CategoryKind, UserId};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name: String,
    pub kind: CategoryKind,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a category owned by `owner`
    #[tracing::instrument(skip_all, fields(owner = %owner))]
    pub fn create(&self, owner: &UserId, input: CreateCategoryInput) -> TallyResult<Category> {
        let mut category = Category::new(owner.clone(), input.name.trim(), input.kind);
        if let Some(icon) = input.icon {
            category.icon = icon;
        }
        if let Some(color) = input.color {
            category.color = color;
        }

        category
            .validate()
            .map_err(|e| TallyError::Validation(Violation::from(e).into()))?;

        self.storage.categories.insert_unique(category.clone())?;
        self.storage.categories.save()?;

        info!(category = %category.id, name = %category.name, kind = %category.kind, "category created");
        Ok(category)
    }

    /// `owner`'s categories and the shared defaults, by kind then name
    pub fn list(&self, owner: &UserId) -> TallyResult<Vec<Category>> {
        self.storage.categories.list_visible(owner)
    }

    /// Get a category visible to `owner`
    pub fn get(&self, owner: &UserId, id: CategoryId) -> TallyResult<Category> {
        self.storage
            .categories
            .get(id)?
            .filter(|c| c.is_visible_to(owner))
            .ok_or_else(|| TallyError::category_not_found(id.to_string()))
    }

    /// Find a visible category by name or ID string
    ///
    /// A name matching both one of the owner's categories and a default
    /// resolves to the owner's own.
    pub fn find(
        &self,
        owner: &UserId,
        identifier: &str,
        kind: Option<CategoryKind>,
    ) -> TallyResult<Option<Category>> {
        let name_lower = identifier.to_lowercase();
        let mut candidates: Vec<_> = self
            .list(owner)?
            .into_iter()
            .filter(|c| kind.map_or(true, |k| c.kind == k))
            .filter(|c| c.name.to_lowercase() == name_lower || c.id.matches(identifier))
            .collect();
        candidates.sort_by_key(|c| c.is_default());

        Ok(candidates.into_iter().next())
    }

    pub fn resolve(
        &self,
        owner: &UserId,
        identifier: &str,
        kind: Option<CategoryKind>,
    ) -> TallyResult<Category> {
        self.find(owner, identifier, kind)?
            .ok_or_else(|| TallyError::category_not_found(identifier))
    }

    /// Rename one of `owner`'s categories
    pub fn rename(&self, owner: &UserId, id: CategoryId, name: &str) -> TallyResult<Category> {
        let mut category = self.owned(owner, id)?;
        category.rename(name.trim());

        category
            .validate()
            .map_err(|e| TallyError::Validation(Violation::from(e).into()))?;

        self.storage.categories.insert_unique(category.clone())?;
        self.storage.categories.save()?;

        info!(category = %category.id, name = %category.name, "category renamed");
        Ok(category)
    }

    /// Delete one of `owner`'s categories
    ///
    /// Transactions that used it lose their category but are kept. Returns
    /// the deleted category and how many transactions were detached.
    #[tracing::instrument(skip_all, fields(owner = %owner, category = %id))]
    pub fn delete(&self, owner: &UserId, id: CategoryId) -> TallyResult<(Category, usize)> {
        let _commit = self.storage.commit()?;

        let category = self.owned(owner, id)?;
        let detached = self.storage.transactions.clear_category(id)?;
        self.storage.categories.delete(id)?;

        self.storage.transactions.save()?;
        self.storage.categories.save()?;

        info!(name = %category.name, detached, "category deleted");
        Ok((category, detached))
    }

    // Visible and writable by the owner: defaults are visible but not writable
    fn owned(&self, owner: &UserId, id: CategoryId) -> TallyResult<Category> {
        let category = self.get(owner, id)?;
        if category.is_default() {
            return Err(TallyError::Forbidden(format!(
                "'{}' is a default category and cannot be changed",
                category.name
            )));
        }
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::error::ViolationKind;
    use crate::models::{Account, AccountType, Money, TransactionKind};
    use crate::services::transaction::{CreateTransactionInput, TransactionService};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        initialize_storage(&storage).unwrap();
        (temp_dir, storage)
    }

    fn alice() -> UserId {
        UserId::from("alice")
    }

    fn input(name: &str, kind: CategoryKind) -> CreateCategoryInput {
        CreateCategoryInput {
            name: name.into(),
            kind,
            icon: None,
            color: None,
        }
    }

    #[test]
    fn test_create_and_list() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let created = service
            .create(&alice(), input("Coffee", CategoryKind::Expense))
            .unwrap();
        assert_eq!(created.color, "#6B7280");

        let visible = service.list(&alice()).unwrap();
        assert_eq!(visible.len(), 15);
        assert!(visible.iter().any(|c| c.id == created.id));

        // Bob sees only the defaults
        assert_eq!(service.list(&UserId::from("bob")).unwrap().len(), 14);
    }

    #[test]
    fn test_duplicate_conflicts() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service
            .create(&alice(), input("Coffee", CategoryKind::Expense))
            .unwrap();
        assert!(service
            .create(&alice(), input("coffee", CategoryKind::Expense))
            .unwrap_err()
            .is_conflict());
        assert!(service
            .create(&alice(), input("Coffee", CategoryKind::Income))
            .is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let err = CategoryService::new(&storage)
            .create(&alice(), input(" ", CategoryKind::Expense))
            .unwrap_err();
        assert!(err.violations().unwrap().contains(ViolationKind::InvalidName));
    }

    #[test]
    fn test_defaults_are_read_only() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let food = service
            .resolve(&alice(), "Food", Some(CategoryKind::Expense))
            .unwrap();
        assert!(food.is_default());

        assert!(matches!(
            service.rename(&alice(), food.id, "Groceries"),
            Err(TallyError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&alice(), food.id),
            Err(TallyError::Forbidden(_))
        ));
        assert_eq!(service.get(&alice(), food.id).unwrap().name, "Food");
    }

    #[test]
    fn test_own_name_shadows_default_in_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let mine = service
            .create(&alice(), input("Food", CategoryKind::Expense))
            .unwrap();

        let found = service.find(&alice(), "food", None).unwrap().unwrap();
        assert_eq!(found.id, mine.id);

        let for_bob = service
            .find(&UserId::from("bob"), "food", None)
            .unwrap()
            .unwrap();
        assert!(for_bob.is_default());
    }

    #[test]
    fn test_rename_and_foreign_access() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let category = service
            .create(&alice(), input("Pets", CategoryKind::Expense))
            .unwrap();

        let renamed = service.rename(&alice(), category.id, "Animals").unwrap();
        assert_eq!(renamed.name, "Animals");

        assert!(service
            .rename(&UserId::from("bob"), category.id, "Mine")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_delete_detaches_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let category = service
            .create(&alice(), input("Coffee", CategoryKind::Expense))
            .unwrap();

        let wallet = Account::new(alice(), "Wallet", AccountType::Cash);
        storage.accounts.insert_unique(wallet.clone()).unwrap();
        let txn = TransactionService::new(&storage)
            .create(
                &alice(),
                CreateTransactionInput {
                    kind: TransactionKind::Expense,
                    source_account_id: wallet.id,
                    destination_account_id: None,
                    category_id: Some(category.id),
                    description: "Espresso".into(),
                    amount: Money::from_cents(450),
                    date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
                    notes: None,
                },
            )
            .unwrap();

        let (_, detached) = service.delete(&alice(), category.id).unwrap();
        assert_eq!(detached, 1);

        let kept = storage.transactions.get(txn.id).unwrap().unwrap();
        assert_eq!(kept.category_id, None);
        assert!(service.get(&alice(), category.id).unwrap_err().is_not_found());
    }
}
